// ── Outbound commands and user controls ──

use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// Command sent to the detection server. The wire name is the Socket.IO
/// event name; no payload is attached.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, IntoStaticStr, EnumString, EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum Command {
    StartMonitoring,
    StopMonitoring,
    BlockSources,
}

impl Command {
    pub fn wire_name(self) -> &'static str {
        self.into()
    }
}

/// A user interaction with the dashboard controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Control {
    Start,
    Stop,
    Block,
    ClearLogs,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn wire_names_are_snake_case() {
        let names: Vec<&str> = Command::iter().map(Command::wire_name).collect();
        assert_eq!(
            names,
            ["start_monitoring", "stop_monitoring", "block_sources"]
        );
        assert_eq!(Command::BlockSources.to_string(), "block_sources");
    }

    #[test]
    fn parses_wire_names() {
        assert_eq!(
            Command::from_str("stop_monitoring").unwrap(),
            Command::StopMonitoring
        );
        assert!(Command::from_str("reboot").is_err());
    }
}
