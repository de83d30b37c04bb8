// trafficlens-api: Socket.IO channel client for detection-server telemetry

pub mod channel;
pub mod error;
pub mod protocol;

pub use channel::{ChannelConfig, ChannelEvent, ChannelHandle, ReconnectConfig, socket_io_endpoint};
pub use error::Error;
