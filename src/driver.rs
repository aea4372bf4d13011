//! Heartbeat and command loop for a feed session.
//!
//! The driver owns the [`FeedManager`] and handles exactly one thing at a
//! time: a timer tick or a user command. Ticks never overlap and a slow
//! consumer delays the next tick instead of producing a burst.

use crate::feed::FeedManager;
use crate::metrics::RunningStats;
use crate::types::feed::FeedEntry;
use crate::types::score::ScoreResult;
use crate::types::transaction::Transaction;
use rand::rngs::StdRng;
use rand::Rng;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// User actions forwarded to the session
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Start,
    Pause,
    Reset,
    Stats,
    Analyze(Transaction),
    Shutdown,
}

/// State changes reported back to the presentation layer
#[derive(Debug, Clone)]
pub enum DashboardEvent {
    /// A simulated transaction arrived
    FeedUpdated {
        latest: FeedEntry,
        visible: Vec<FeedEntry>,
        stats: RunningStats,
    },
    /// A manual analysis finished
    Analysis {
        transaction: Transaction,
        result: ScoreResult,
        stats: RunningStats,
    },
    StreamingChanged(bool),
    Reset,
    Stats(RunningStats),
}

/// Drives a [`FeedManager`] from a fixed-interval heartbeat
pub struct FeedDriver<R = StdRng> {
    manager: FeedManager<R>,
    tick_interval: Duration,
}

impl<R: Rng> FeedDriver<R> {
    pub fn new(manager: FeedManager<R>, tick_interval: Duration) -> Self {
        Self {
            manager,
            tick_interval,
        }
    }

    pub fn manager(&self) -> &FeedManager<R> {
        &self.manager
    }

    /// Run until a [`Command::Shutdown`] arrives or every command sender is
    /// dropped, then hand the manager back.
    pub async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        events: mpsc::UnboundedSender<DashboardEvent>,
    ) -> FeedManager<R> {
        let mut interval = tokio::time::interval(self.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        interval.tick().await;

        info!(
            tick_interval_ms = self.tick_interval.as_millis() as u64,
            streaming = self.manager.is_streaming(),
            "Feed driver started"
        );

        loop {
            tokio::select! {
                biased;

                command = commands.recv() => match command {
                    Some(Command::Shutdown) | None => break,
                    Some(command) => self.handle(command, &events),
                },
                _ = interval.tick() => {
                    if let Some(latest) = self.manager.tick() {
                        emit(&events, DashboardEvent::FeedUpdated {
                            latest,
                            visible: self.manager.visible_history().cloned().collect(),
                            stats: *self.manager.stats(),
                        });
                    }
                }
            }
        }

        info!(
            analyzed = self.manager.stats().analyzed(),
            "Feed driver stopped"
        );
        self.manager
    }

    fn handle(&mut self, command: Command, events: &mpsc::UnboundedSender<DashboardEvent>) {
        debug!(?command, "Handling command");
        let event = match command {
            Command::Start => {
                self.manager.start();
                DashboardEvent::StreamingChanged(true)
            }
            Command::Pause => {
                self.manager.pause();
                DashboardEvent::StreamingChanged(false)
            }
            Command::Reset => {
                self.manager.reset();
                DashboardEvent::Reset
            }
            Command::Stats => DashboardEvent::Stats(*self.manager.stats()),
            Command::Analyze(transaction) => {
                let result = self.manager.submit_manual_transaction(&transaction);
                DashboardEvent::Analysis {
                    transaction,
                    result,
                    stats: *self.manager.stats(),
                }
            }
            Command::Shutdown => return,
        };
        emit(events, event);
    }
}

fn emit(events: &mpsc::UnboundedSender<DashboardEvent>, event: DashboardEvent) {
    if events.send(event).is_err() {
        debug!("Event receiver dropped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::types::score::RiskLevel;
    use tokio::time::Instant;

    type Harness = (
        mpsc::Sender<Command>,
        mpsc::UnboundedReceiver<DashboardEvent>,
        tokio::task::JoinHandle<FeedManager>,
    );

    fn spawn_driver(seed: u64) -> Harness {
        let (command_tx, command_rx) = mpsc::channel(16);
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let manager = FeedManager::with_seed(&AppConfig::default(), seed).unwrap();
        let driver = FeedDriver::new(manager, Duration::from_secs(2));
        let handle = tokio::spawn(driver.run(command_rx, event_tx));
        (command_tx, event_rx, handle)
    }

    #[tokio::test(start_paused = true)]
    async fn test_streaming_emits_one_entry_per_tick() {
        let (commands, mut events, handle) = spawn_driver(1);
        let started = Instant::now();

        commands.send(Command::Start).await.unwrap();
        assert!(matches!(
            events.recv().await,
            Some(DashboardEvent::StreamingChanged(true))
        ));

        let mut ids = Vec::new();
        for _ in 0..3 {
            match events.recv().await {
                Some(DashboardEvent::FeedUpdated {
                    latest,
                    visible,
                    stats,
                }) => {
                    assert_eq!(visible.first(), Some(&latest));
                    assert_eq!(stats.analyzed(), latest.id - 220);
                    ids.push(latest.id);
                }
                other => panic!("unexpected event: {other:?}"),
            }
        }
        assert_eq!(ids, vec![221, 222, 223]);
        assert!(started.elapsed() >= Duration::from_secs(6));
        assert!(started.elapsed() < Duration::from_secs(8));

        commands.send(Command::Shutdown).await.unwrap();
        let manager = handle.await.unwrap();
        assert_eq!(manager.stats().analyzed(), 3);
        assert_eq!(manager.history().count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_paused_driver_is_idle() {
        let (commands, mut events, handle) = spawn_driver(2);

        tokio::time::sleep(Duration::from_secs(20)).await;
        commands.send(Command::Stats).await.unwrap();
        match events.recv().await {
            Some(DashboardEvent::Stats(stats)) => assert_eq!(stats.analyzed(), 0),
            other => panic!("unexpected event: {other:?}"),
        }

        drop(commands);
        let manager = handle.await.unwrap();
        assert_eq!(manager.history().count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_analyze_command_skips_history() {
        let (commands, mut events, handle) = spawn_driver(3);
        let tx = Transaction::new(12000.0, 200.0)
            .foreign(true)
            .high_risk_country(true)
            .refusals(3);

        commands.send(Command::Analyze(tx.clone())).await.unwrap();
        match events.recv().await {
            Some(DashboardEvent::Analysis {
                transaction,
                result,
                stats,
            }) => {
                assert_eq!(transaction, tx);
                assert_eq!(result.level, RiskLevel::Fraud);
                assert_eq!(stats.frauds(), 1);
            }
            other => panic!("unexpected event: {other:?}"),
        }

        commands.send(Command::Shutdown).await.unwrap();
        let manager = handle.await.unwrap();
        assert_eq!(manager.history().count(), 0);
        assert_eq!(manager.last_transaction_id(), 220);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_stops_stream() {
        let (commands, mut events, handle) = spawn_driver(4);

        commands.send(Command::Start).await.unwrap();
        events.recv().await;
        assert!(matches!(
            events.recv().await,
            Some(DashboardEvent::FeedUpdated { .. })
        ));

        commands.send(Command::Reset).await.unwrap();
        assert!(matches!(events.recv().await, Some(DashboardEvent::Reset)));

        tokio::time::sleep(Duration::from_secs(10)).await;
        commands.send(Command::Shutdown).await.unwrap();
        let manager = handle.await.unwrap();

        assert!(!manager.is_streaming());
        assert_eq!(manager.history().count(), 0);
        assert_eq!(manager.last_transaction_id(), 220);
        assert_eq!(manager.stats().analyzed(), 0);
        assert!(events.try_recv().is_err());
    }
}
