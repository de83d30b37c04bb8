// ── Inbound events ──
//
// Typed view of what the detection server pushes. Decoding is keyed on
// the Socket.IO event name; payloads go through the lenient model types.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::CoreError;
use crate::model::{AlertEvent, ChartSample, LogEvent, PacketEvent, StatsSnapshot};

/// An event the dashboard reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    StatsUpdate(StatsSnapshot),
    Packet(PacketEvent),
    Alert(AlertEvent),
    Log(LogEvent),
    ChartUpdate(ChartSample),
    Connected,
    Disconnected,
    ConnectError { reason: String },
}

impl InboundEvent {
    /// Decode a named server event.
    ///
    /// Returns `Ok(None)` for event names the dashboard does not handle.
    /// A payload that is not a JSON object is a [`CoreError::Decode`].
    pub fn decode(name: &str, payload: Value) -> Result<Option<Self>, CoreError> {
        let event = match name {
            "stats_update" => Self::StatsUpdate(from_object(name, payload)?),
            "packet" => Self::Packet(from_object(name, payload)?),
            "alert" => Self::Alert(from_object(name, payload)?),
            "log" => Self::Log(from_object(name, payload)?),
            "chart_update" => Self::ChartUpdate(from_object(name, payload)?),
            _ => {
                tracing::debug!(event = name, "ignoring unhandled event");
                return Ok(None);
            }
        };
        Ok(Some(event))
    }

    /// The Socket.IO event name this event corresponds to.
    pub fn name(&self) -> &'static str {
        match self {
            Self::StatsUpdate(_) => "stats_update",
            Self::Packet(_) => "packet",
            Self::Alert(_) => "alert",
            Self::Log(_) => "log",
            Self::ChartUpdate(_) => "chart_update",
            Self::Connected => "connect",
            Self::Disconnected => "disconnect",
            Self::ConnectError { .. } => "connect_error",
        }
    }
}

fn from_object<T: DeserializeOwned>(event: &str, payload: Value) -> Result<T, CoreError> {
    if !payload.is_object() {
        return Err(CoreError::decode(
            event,
            format!("expected a JSON object, got {}", json_kind(&payload)),
        ));
    }
    serde_json::from_value(payload).map_err(|e| CoreError::decode(event, e.to_string()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::model::{LogKind, MonitorStatus};

    #[test]
    fn decodes_known_events() {
        let event = InboundEvent::decode(
            "packet",
            json!({"src_ip": "10.0.0.5", "protocol": "TCP", "length": 64, "is_attack": true}),
        )
        .unwrap();
        assert_eq!(
            event,
            Some(InboundEvent::Packet(PacketEvent {
                src_ip: "10.0.0.5".into(),
                protocol: "TCP".into(),
                length: 64,
                is_attack: true,
            }))
        );

        let Some(InboundEvent::StatsUpdate(stats)) =
            InboundEvent::decode("stats_update", json!({"status": "ATTACK"})).unwrap()
        else {
            panic!("expected stats_update");
        };
        assert_eq!(stats.status, MonitorStatus::Attack);

        let Some(InboundEvent::Log(log)) =
            InboundEvent::decode("log", json!({"message": "hi", "type": "alert"})).unwrap()
        else {
            panic!("expected log");
        };
        assert_eq!(log.kind, LogKind::Alert);
    }

    #[test]
    fn chart_update_accepts_integers() {
        let event = InboundEvent::decode("chart_update", json!({"normal": 12, "attack": 3}))
            .unwrap()
            .unwrap();
        assert_eq!(
            event,
            InboundEvent::ChartUpdate(ChartSample {
                normal: 12.0,
                attack: 3.0
            })
        );
        assert_eq!(event.name(), "chart_update");
    }

    #[test]
    fn chart_update_drops_non_finite_values() {
        let event = InboundEvent::decode("chart_update", json!({"normal": "inf", "attack": "NaN"}))
            .unwrap()
            .unwrap();
        assert_eq!(event, InboundEvent::ChartUpdate(ChartSample::default()));
    }

    #[test]
    fn unknown_event_is_ignored() {
        assert_eq!(
            InboundEvent::decode("heartbeat", json!({"x": 1})).unwrap(),
            None
        );
    }

    #[test]
    fn non_object_payload_is_a_decode_error() {
        let err = InboundEvent::decode("alert", json!("DDoS")).unwrap_err();
        assert!(matches!(&err, CoreError::Decode { event, .. } if event == "alert"));
        assert_eq!(
            err.to_string(),
            "Malformed 'alert' event: expected a JSON object, got a string"
        );

        assert!(InboundEvent::decode("packet", Value::Null).is_err());
    }
}
