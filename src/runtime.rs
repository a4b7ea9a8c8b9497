//! # Live Counting Runtime
//!
//! Two threads of control:
//!
//! 1. **Producer**: a blocking task that polls the [`EventSource`], stamps
//!    every event with the wall-clock time and pushes it into a channel.
//! 2. **Consumer**: the only owner of the [`Counter`] and the
//!    [`CheckpointSink`]. It drains the channel, closes hour windows as they
//!    elapse and, once the [`CancellationToken`] fires, drains what is left
//!    and writes one final checkpoint.
//!
//! Because the consumer is the only code that ever checkpoints, a shutdown
//! request can never interleave with a write already in progress.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use log::{debug, info, warn};
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;

use crate::counter::{CheckpointSink, Counter};
use crate::event::{EventSource, InputEvent, SourceEvent};
use crate::store::HourlyRecord;

/// Source of the current wall-clock time
pub type Clock = fn() -> NaiveDateTime;

/// Local wall-clock time, the clock used outside of tests
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// An event together with the time it was received
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedEvent {
    pub event: InputEvent,
    pub at: NaiveDateTime,
}

/// Poll `source` until cancelled, forwarding stamped events to `tx`
///
/// A [`SourceEvent::Shutdown`] or a source error cancels `cancel` so the
/// consumer winds down too.
pub fn produce(
    mut source: impl EventSource,
    tx: &UnboundedSender<TimedEvent>,
    cancel: &CancellationToken,
    poll_interval: Duration,
    clock: Clock,
) -> Result<()> {
    while !cancel.is_cancelled() {
        match source.next_event(poll_interval) {
            Ok(Some(SourceEvent::Input(event))) => {
                let timed = TimedEvent { event, at: clock() };
                if tx.send(timed).is_err() {
                    debug!("Event channel closed, producer stopping");
                    break;
                }
            }
            Ok(Some(SourceEvent::Shutdown)) => {
                info!("Shutdown requested from the event source");
                cancel.cancel();
                break;
            }
            Ok(None) => {}
            Err(e) => {
                cancel.cancel();
                return Err(e.context("Event source failed"));
            }
        }
    }
    Ok(())
}

/// Drive the counter from `rx` until cancelled, then flush a final record
///
/// Returns the final forced checkpoint. A failed write ends the loop with
/// the error: a counter that cannot persist has nothing left to do.
pub async fn consume(
    counter: &mut Counter,
    sink: &mut dyn CheckpointSink,
    rx: &mut UnboundedReceiver<TimedEvent>,
    cancel: &CancellationToken,
    clock: Clock,
) -> Result<HourlyRecord> {
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            received = rx.recv() => match received {
                Some(timed) => counter.observe_into(&timed.event, timed.at, sink)?,
                None => break,
            },
        }
    }

    // Events already queued before the stop still count
    rx.close();
    while let Some(timed) = rx.recv().await {
        counter.observe_into(&timed.event, timed.at, sink)?;
    }

    let record = counter.checkpoint(clock());
    sink.write(&record)
        .context("Failed to write final checkpoint")?;
    Ok(record)
}

/// Run producer and consumer until `cancel` fires or the source stops
pub async fn run<S, K>(
    source: S,
    sink: &mut K,
    primary_key: &str,
    poll_interval: Duration,
    cancel: CancellationToken,
    clock: Clock,
) -> Result<HourlyRecord>
where
    S: EventSource + 'static,
    K: CheckpointSink,
{
    let (tx, mut rx) = mpsc::unbounded_channel();

    let producer_cancel = cancel.clone();
    let producer = tokio::task::spawn_blocking(move || {
        produce(source, &tx, &producer_cancel, poll_interval, clock)
    });

    let mut counter = Counter::new(primary_key, clock());
    info!("mousestats started");

    let result = consume(&mut counter, sink, &mut rx, &cancel, clock).await;

    // Make sure the producer stops even if the consumer bailed out early
    cancel.cancel();
    match producer.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!("{:#}", e),
        Err(e) => warn!("Event producer panicked: {}", e),
    }

    info!("mousestats stopping");
    result
}

/// Cancel `cancel` on interrupt, terminate or hangup
pub fn spawn_signal_listener(cancel: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            _ = cancel.cancelled() => {}
            signal = wait_for_signal() => {
                match signal {
                    Ok(name) => info!("Received {}, saving and exiting", name),
                    Err(e) => warn!("Signal handling failed, stopping: {:#}", e),
                }
                cancel.cancel();
            }
        }
    })
}

#[cfg(unix)]
async fn wait_for_signal() -> Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt =
        signal(SignalKind::interrupt()).context("Failed to install SIGINT handler")?;
    let mut terminate =
        signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?;
    let mut hangup = signal(SignalKind::hangup()).context("Failed to install SIGHUP handler")?;

    let name = tokio::select! {
        _ = interrupt.recv() => "SIGINT",
        _ = terminate.recv() => "SIGTERM",
        _ = hangup.recv() => "SIGHUP",
    };
    Ok(name)
}

#[cfg(not(unix))]
async fn wait_for_signal() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;
    Ok("Ctrl+C")
}
