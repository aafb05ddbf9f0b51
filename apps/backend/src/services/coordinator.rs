//! The game coordinator: one lock over registry, ledger, board and round
//! controller, plus the two-phase rollover.
//!
//! Lock discipline:
//! - every public operation takes `inner` once, does its checks and writes,
//!   projects the caller's status and releases it; nothing awaits under it
//! - rollover holds `rollover_gate` for its whole duration so the timer and a
//!   forced advance never interleave, and takes `inner` twice: once to flip
//!   Active -> Scoring and freeze the ledger, once to apply the deltas, reset
//!   per-round state and open the next round. Scoring runs between the two
//!   with `inner` released; writes arriving then see `Scoring` and are rejected.

use parking_lot::Mutex;
use tokio::sync::futures::Notified;
use tokio::sync::Notify;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::config::{GameConfig, RoundStartPolicy};
use crate::domain::round::RoundView;
use crate::domain::scoreboard::Scoreboard;
use crate::domain::scoring::{AllianceScoring, ScoringEngine, SupportSnapshot};
use crate::domain::{validate_player_name, Phase};
use crate::errors::domain::{DomainError, InfraErrorKind};
use crate::services::message_board::MessageBoard;
use crate::services::registry::PlayerRegistry;
use crate::services::round_controller::RoundController;
use crate::services::status::{PlayerStatus, StatusProjector};
use crate::services::support_ledger::SupportLedger;

/// Support choices frozen at the Active -> Scoring flip.
///
/// Kept until the round has been applied, so a failed scoring pass can be
/// inspected and retried against the exact same data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrozenRound {
    pub round_number: u32,
    pub support: SupportSnapshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RolloverTrigger {
    /// Timer woke up; only rolls an Active round past its deadline.
    Deadline,
    /// Admin request; rolls whatever is running, retries a stuck round.
    Forced,
}

struct GameInner {
    registry: PlayerRegistry,
    ledger: SupportLedger,
    board: MessageBoard,
    round: RoundController,
    pending: Option<FrozenRound>,
    last_scoreboard: Option<Scoreboard>,
}

impl GameInner {
    fn status_for(&self, private_id: &str, now: Instant) -> Result<PlayerStatus, DomainError> {
        let player = self.registry.lookup(private_id)?;
        let projector = StatusProjector {
            registry: &self.registry,
            ledger: &self.ledger,
            board: &self.board,
            round: self.round.current_phase(now),
        };
        Ok(projector.snapshot(player))
    }
}

pub struct GameCoordinator {
    inner: Mutex<GameInner>,
    rollover_gate: Mutex<()>,
    engine: Box<dyn ScoringEngine>,
    start_policy: RoundStartPolicy,
    deadline_changed: Notify,
}

impl GameCoordinator {
    pub fn new(config: &GameConfig) -> Self {
        Self::with_engine(config, Box::new(AllianceScoring))
    }

    pub fn with_engine(config: &GameConfig, engine: Box<dyn ScoringEngine>) -> Self {
        let mut round = RoundController::new(config.round_duration);
        if config.start_policy == RoundStartPolicy::Immediate {
            match round.start(Instant::now()) {
                Ok(true) => info!(round = 1, "Round started at boot"),
                Ok(false) => {}
                Err(err) => error!(error = %err, "Round 1 could not be opened at boot"),
            }
        }

        Self {
            inner: Mutex::new(GameInner {
                registry: PlayerRegistry::new(),
                ledger: SupportLedger::new(),
                board: MessageBoard::new(),
                round,
                pending: None,
                last_scoreboard: None,
            }),
            rollover_gate: Mutex::new(()),
            engine,
            start_policy: config.start_policy,
            deadline_changed: Notify::new(),
        }
    }

    pub fn register_player(&self, player_name: &str) -> Result<PlayerStatus, DomainError> {
        let now = Instant::now();
        let (status, started) = {
            let mut inner = self.inner.lock();
            // the only failure left after the round opens is a duplicate name,
            // which cannot happen while Idle
            validate_player_name(player_name)?;
            let started = self.start_policy == RoundStartPolicy::FirstRegistration
                && inner.round.start(now)?;
            let private_id = inner.registry.register(player_name)?.private_id.clone();
            (inner.status_for(private_id.as_str(), now)?, started)
        };

        info!(player = %player_name, round = status.round_number, "Player joined");
        if started {
            info!(round = 1, "Round started by first registration");
            self.deadline_changed.notify_one();
        }
        Ok(status)
    }

    pub fn get_status(&self, private_id: &str) -> Result<PlayerStatus, DomainError> {
        self.inner.lock().status_for(private_id, Instant::now())
    }

    pub fn send_message(
        &self,
        private_id: &str,
        recipient_player_name: &str,
        message: &str,
    ) -> Result<PlayerStatus, DomainError> {
        let now = Instant::now();
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        let sender = inner.registry.lookup(private_id)?.name.clone();
        let token = match inner.round.guard_mutation() {
            Ok(token) => token,
            Err(err) => {
                warn!(
                    player = %sender,
                    round = inner.round.round_number(),
                    phase = inner.round.phase().as_str(),
                    "Message rejected"
                );
                return Err(err);
            }
        };
        inner.board.send(
            &token,
            &inner.registry,
            &sender,
            recipient_player_name,
            message,
        )?;
        debug!(player = %sender, to = %recipient_player_name, round = token.round_number(), "Message delivered");

        inner.status_for(private_id, now)
    }

    pub fn register_support(
        &self,
        private_id: &str,
        player_to_support: &str,
    ) -> Result<PlayerStatus, DomainError> {
        let now = Instant::now();
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        let supporter = inner.registry.lookup(private_id)?.name.clone();
        let token = match inner.round.guard_mutation() {
            Ok(token) => token,
            Err(err) => {
                warn!(
                    player = %supporter,
                    round = inner.round.round_number(),
                    phase = inner.round.phase().as_str(),
                    "Support rejected"
                );
                return Err(err);
            }
        };
        inner
            .ledger
            .set_support(&token, &inner.registry, &supporter, player_to_support)?;
        debug!(player = %supporter, target = %player_to_support, round = token.round_number(), "Support recorded");

        inner.status_for(private_id, now)
    }

    pub fn current_phase(&self) -> RoundView {
        self.inner.lock().round.current_phase(Instant::now())
    }

    /// Open round 1 if the game is still Idle. Returns whether it did.
    pub fn start(&self) -> Result<bool, DomainError> {
        let started = self.inner.lock().round.start(Instant::now())?;
        if started {
            info!(round = 1, "Round started");
            self.deadline_changed.notify_one();
        }
        Ok(started)
    }

    /// Deadline of the running round; `None` while Idle or Scoring.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.inner.lock().round.deadline()
    }

    /// Resolves after round 1 opens or a rollover moves the deadline.
    pub fn deadline_changed(&self) -> Notified<'_> {
        self.deadline_changed.notified()
    }

    /// Timer entry point: roll over only if the running round is past its deadline.
    pub fn rollover_if_due(&self) -> Result<Option<Scoreboard>, DomainError> {
        self.rollover(RolloverTrigger::Deadline)
    }

    /// Score the current round now, whatever its deadline.
    ///
    /// From Idle this opens round 1 and scores it immediately. From a round
    /// stuck in Scoring after a failed pass it retries the frozen snapshot.
    pub fn advance_round(&self) -> Result<Scoreboard, DomainError> {
        self.rollover(RolloverTrigger::Forced)?.ok_or_else(|| {
            DomainError::infra(
                InfraErrorKind::Other("rollover".into()),
                "Forced rollover produced no scoreboard",
            )
        })
    }

    pub fn last_scoreboard(&self) -> Option<Scoreboard> {
        self.inner.lock().last_scoreboard.clone()
    }

    /// Frozen round awaiting (re)scoring, if any.
    pub fn pending_snapshot(&self) -> Option<FrozenRound> {
        self.inner.lock().pending.clone()
    }

    pub fn player_count(&self) -> usize {
        self.inner.lock().registry.len()
    }

    fn rollover(&self, trigger: RolloverTrigger) -> Result<Option<Scoreboard>, DomainError> {
        let _gate = self.rollover_gate.lock();

        let frozen = {
            let mut inner = self.inner.lock();
            let now = Instant::now();
            match (inner.round.phase(), trigger) {
                (Phase::Idle, RolloverTrigger::Deadline) => return Ok(None),
                (Phase::Idle, RolloverTrigger::Forced) => {
                    inner.round.start(now)?;
                    info!(round = 1, "Round started by forced rollover");
                }
                (Phase::Active, RolloverTrigger::Deadline) if !inner.round.is_due(now) => {
                    return Ok(None)
                }
                // a round parked after failed scoring waits for a forced retry
                (Phase::Scoring, RolloverTrigger::Deadline) => return Ok(None),
                _ => {}
            }

            match inner.pending.clone() {
                Some(frozen) => {
                    warn!(round = frozen.round_number, "Retrying scoring of frozen round");
                    frozen
                }
                None => {
                    let round_number = inner.round.begin_scoring()?;
                    let frozen = FrozenRound {
                        round_number,
                        support: inner.ledger.snapshot_all(&inner.registry),
                    };
                    inner.pending = Some(frozen.clone());
                    frozen
                }
            }
        };

        let deltas = self.engine.score(&frozen.support).map_err(|err| {
            error!(round = frozen.round_number, error = %err, "Scoring failed; round stays frozen");
            err
        })?;

        let scoreboard = {
            let mut guard = self.inner.lock();
            let inner = &mut *guard;

            let next_round = inner.round.begin_next_round(Instant::now())?;
            inner.registry.apply_score_deltas(&deltas);
            inner.registry.record_last_round(&frozen.support);
            inner.ledger.reset();
            inner.board.reset();
            inner.pending = None;

            let registry = &inner.registry;
            let scoreboard =
                Scoreboard::build(frozen.round_number, &frozen.support, &deltas, |name| {
                    registry.score_of(name).unwrap_or_default()
                });
            inner.last_scoreboard = Some(scoreboard.clone());

            info!(
                round = frozen.round_number,
                next_round,
                players = frozen.support.len(),
                "Round scored"
            );
            scoreboard
        };

        self.deadline_changed.notify_one();
        Ok(Some(scoreboard))
    }
}
