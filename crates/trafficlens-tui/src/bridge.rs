//! Session bridge: forwards typed telemetry events into the action loop.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use trafficlens_core::TelemetryStream;

use crate::action::Action;

/// Pump `stream` into `action_tx` until it ends or `cancel` fires.
///
/// Sends [`Action::SessionEnded`] once the channel task has exited.
pub async fn run_session_bridge(
    mut stream: TelemetryStream,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            event = stream.next() => {
                let Some(event) = event else {
                    info!("telemetry stream ended");
                    let _ = action_tx.send(Action::SessionEnded);
                    break;
                };
                debug!(event = event.name(), "telemetry event");
                if action_tx.send(Action::Inbound(event)).is_err() {
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use trafficlens_config::Config;
    use trafficlens_core::InboundEvent;

    use super::*;

    /// A loopback URL with nothing listening on it.
    fn closed_port_url() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn unreachable_server_reports_error_then_ends() {
        let mut config = Config::default();
        config.server.url = closed_port_url();
        let cancel = CancellationToken::new();
        let (_session, stream) =
            trafficlens_core::session::connect(config.to_channel_config().unwrap(), cancel.clone());

        let (tx, mut rx) = mpsc::unbounded_channel();
        tokio::spawn(run_session_bridge(stream, tx, cancel));

        let first = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap();
        assert!(matches!(
            first,
            Some(Action::Inbound(InboundEvent::ConnectError { .. }))
        ));
        let second = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap();
        assert_eq!(second, Some(Action::SessionEnded));
    }
}
