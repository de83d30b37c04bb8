//! Terminal input pump.
//!
//! Merges crossterm input with the tick and frame cadences into one
//! ordered channel consumed by the action loop.

use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    Resize { cols: u16, rows: u16 },
    Tick,
    Render,
}

impl Event {
    /// Keep key presses and resizes; drop releases, repeats, focus and paste.
    fn from_terminal(event: CrosstermEvent) -> Option<Self> {
        match event {
            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Self::Key(key)),
            CrosstermEvent::Resize(cols, rows) => Some(Self::Resize { cols, rows }),
            _ => None,
        }
    }
}

pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
}

impl EventReader {
    /// Read from the real terminal.
    pub fn new(tick_rate: Duration, frame_rate: Duration) -> Self {
        Self::from_stream(EventStream::new(), tick_rate, frame_rate)
    }

    /// Read from any stream of terminal events. Input read errors end the
    /// input side only; ticks and frames keep flowing until stopped.
    pub fn from_stream<S>(input: S, tick_rate: Duration, frame_rate: Duration) -> Self
    where
        S: Stream<Item = std::io::Result<CrosstermEvent>> + Send + Unpin + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        tokio::spawn(pump(input, cadence(tick_rate), cadence(frame_rate), tx, cancel.clone()));
        Self { rx, cancel }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

fn cadence(period: Duration) -> Interval {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

async fn pump<S>(
    mut input: S,
    mut ticks: Interval,
    mut frames: Interval,
    tx: mpsc::UnboundedSender<Event>,
    cancel: CancellationToken,
) where
    S: Stream<Item = std::io::Result<CrosstermEvent>> + Unpin,
{
    let mut input_open = true;
    loop {
        let event = tokio::select! {
            () = cancel.cancelled() => break,
            _ = ticks.tick() => Event::Tick,
            _ = frames.tick() => Event::Render,
            next = input.next(), if input_open => match next {
                Some(Ok(raw)) => match Event::from_terminal(raw) {
                    Some(event) => event,
                    None => continue,
                },
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "terminal input failed");
                    input_open = false;
                    continue;
                }
                None => {
                    input_open = false;
                    continue;
                }
            },
        };

        if tx.send(event).is_err() {
            break;
        }
    }
}
