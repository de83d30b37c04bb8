// ── Telemetry session ──
//
// Adapts the raw Socket.IO channel into typed events and typed commands.
// The dashboard never sees transport details.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use trafficlens_api::{ChannelConfig, ChannelEvent, ChannelHandle};

use crate::error::CoreError;
use crate::event::InboundEvent;
use crate::model::Command;

/// Start the channel task and return the command side plus the event side.
///
/// Must be called from within a tokio runtime. Cancelling `cancel` (or
/// calling [`TelemetrySession::shutdown`]) closes the connection.
pub fn connect(config: ChannelConfig, cancel: CancellationToken) -> (TelemetrySession, TelemetryStream) {
    tracing::info!(endpoint = %config.endpoint, "starting telemetry session");
    let (handle, events) = ChannelHandle::spawn(config, cancel);
    (TelemetrySession { handle }, TelemetryStream { events })
}

/// Sends commands to the detection server.
#[derive(Clone)]
pub struct TelemetrySession {
    handle: ChannelHandle,
}

impl TelemetrySession {
    /// Queue a command. Commands issued before the connection is up are
    /// sent once it is.
    pub fn send(&self, command: Command) -> Result<(), CoreError> {
        tracing::debug!(%command, "sending command");
        self.handle.emit(command.wire_name())?;
        Ok(())
    }

    pub fn shutdown(&self) {
        self.handle.shutdown();
    }
}

/// Ordered stream of typed server events.
pub struct TelemetryStream {
    events: mpsc::UnboundedReceiver<ChannelEvent>,
}

impl TelemetryStream {
    /// Next event the dashboard handles. Malformed payloads and unknown
    /// event names are skipped. `None` once the channel task has exited.
    pub async fn next(&mut self) -> Option<InboundEvent> {
        while let Some(raw) = self.events.recv().await {
            match translate(raw) {
                Ok(Some(event)) => return Some(event),
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, "dropping inbound event"),
            }
        }
        None
    }
}

/// Map one channel event onto the dashboard's event vocabulary.
pub fn translate(event: ChannelEvent) -> Result<Option<InboundEvent>, CoreError> {
    match event {
        ChannelEvent::Connected { .. } => Ok(Some(InboundEvent::Connected)),
        ChannelEvent::Disconnected { reason } => {
            tracing::debug!(%reason, "session disconnected");
            Ok(Some(InboundEvent::Disconnected))
        }
        ChannelEvent::ConnectFailed { reason } => Ok(Some(InboundEvent::ConnectError { reason })),
        ChannelEvent::Message { name, payload } => InboundEvent::decode(&name, payload),
    }
}
