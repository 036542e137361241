use super::command::SessionEvent;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;

/// Sends [`SessionEvent::Tick`] every `period` until `schedule` is cancelled
/// or the runtime goes away.
pub(crate) fn spawn_ticker(
    period: Duration,
    schedule: CancellationToken,
    events: mpsc::UnboundedSender<SessionEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::debug!(target: "story_session", "Ticker started ({:?} interval)", period);

        loop {
            tokio::select! {
                biased;
                _ = schedule.cancelled() => break,
                _ = ticker.tick() => {
                    if events.send(SessionEvent::Tick).is_err() {
                        break;
                    }
                }
            }
        }

        tracing::debug!(target: "story_session", "Ticker stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_ticks_until_cancelled() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let schedule = CancellationToken::new();
        let task = spawn_ticker(Duration::from_millis(100), schedule.clone(), tx);

        tokio::time::sleep(Duration::from_millis(350)).await;
        schedule.cancel();
        task.await.unwrap();

        let mut ticks = 0;
        while let Ok(SessionEvent::Tick) = rx.try_recv() {
            ticks += 1;
        }
        assert_eq!(ticks, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_when_receiver_dropped() {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = spawn_ticker(Duration::from_millis(10), CancellationToken::new(), tx);
        drop(rx);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(task.is_finished());
    }
}
