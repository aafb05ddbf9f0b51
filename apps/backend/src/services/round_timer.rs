//! Background task that rolls rounds over at their deadlines.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::services::coordinator::GameCoordinator;

/// Spawn the single authoritative round timer.
///
/// The task sleeps until the current deadline, asks the coordinator to roll
/// over, and re-reads the deadline. While no round is running (Idle, or a
/// round frozen after failed scoring) it parks until the coordinator signals
/// a new deadline. It stops when `shutdown` is cancelled.
pub fn spawn_round_timer(
    coordinator: Arc<GameCoordinator>,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Round timer started");
        loop {
            let changed = coordinator.deadline_changed();
            match coordinator.next_deadline() {
                Some(deadline) => {
                    tokio::select! {
                        _ = shutdown.cancelled() => break,
                        _ = changed => continue,
                        _ = tokio::time::sleep_until(deadline) => {}
                    }
                    match coordinator.rollover_if_due() {
                        Ok(Some(scoreboard)) => {
                            debug!(round = scoreboard.round_number, "Timer rolled round over");
                        }
                        Ok(None) => {}
                        Err(err) => {
                            error!(error = %err, "Rollover failed; timer parked until a retry succeeds");
                        }
                    }
                }
                None => {
                    tokio::select! {
                        _ = shutdown.cancelled() => break,
                        _ = changed => {}
                    }
                }
            }
        }
        info!("Round timer stopped");
    })
}
