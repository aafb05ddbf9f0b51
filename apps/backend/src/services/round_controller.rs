//! Round phase state machine.
//!
//! `Idle --start--> Active --deadline--> Scoring --scored--> Active(n+1)`
//!
//! The controller is plain data; it lives inside the coordinator's lock, so
//! every transition and every [`MutationGuard`] check happen under that lock.

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::domain::round::{seconds_until, Phase, RoundView};
use crate::errors::domain::{DomainError, InfraErrorKind};

#[derive(Debug)]
pub struct RoundController {
    round_number: u32,
    phase: Phase,
    deadline: Option<Instant>,
    duration: Duration,
}

/// Proof that the phase was `Active` when the lock was taken.
///
/// Only the controller can mint one; ledger and board writes require it.
/// Releasing the guard is dropping it together with the lock it was
/// obtained under.
#[derive(Debug)]
pub struct MutationGuard {
    round_number: u32,
}

impl MutationGuard {
    pub fn round_number(&self) -> u32 {
        self.round_number
    }
}

impl RoundController {
    pub fn new(duration: Duration) -> Self {
        Self {
            round_number: 0,
            phase: Phase::Idle,
            deadline: None,
            duration,
        }
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Deadline of the running round; `None` unless Active.
    pub fn deadline(&self) -> Option<Instant> {
        match self.phase {
            Phase::Active => self.deadline,
            _ => None,
        }
    }

    pub fn current_phase(&self, now: Instant) -> RoundView {
        RoundView {
            round_number: self.round_number,
            phase: self.phase,
            seconds_remaining: self.deadline().map_or(0, |d| seconds_until(d, now)),
        }
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline().is_some_and(|d| now >= d)
    }

    pub fn guard_mutation(&self) -> Result<MutationGuard, DomainError> {
        match self.phase {
            Phase::Active => Ok(MutationGuard {
                round_number: self.round_number,
            }),
            _ => Err(DomainError::round_not_active(self.round_number)),
        }
    }

    /// Idle -> Active(1). Returns false if the game already started.
    ///
    /// Fails without changing phase when the deadline is not representable.
    pub fn start(&mut self, now: Instant) -> Result<bool, DomainError> {
        if self.phase != Phase::Idle {
            return Ok(false);
        }
        self.open_round(1, now)?;
        Ok(true)
    }

    /// Active -> Scoring; returns the number of the round being frozen.
    pub fn begin_scoring(&mut self) -> Result<u32, DomainError> {
        if self.phase != Phase::Active {
            return Err(DomainError::infra(
                InfraErrorKind::Other(format!("{:?}", self.phase)),
                format!("Cannot score round {} outside Active", self.round_number),
            ));
        }
        self.phase = Phase::Scoring;
        debug!(round = self.round_number, "Transition: Active -> Scoring");
        Ok(self.round_number)
    }

    /// Scoring -> Active(n+1); returns the new round number.
    pub fn begin_next_round(&mut self, now: Instant) -> Result<u32, DomainError> {
        if self.phase != Phase::Scoring {
            return Err(DomainError::infra(
                InfraErrorKind::Other(format!("{:?}", self.phase)),
                format!("Round {} has not been scored", self.round_number),
            ));
        }
        let next = self.round_number + 1;
        self.open_round(next, now)?;
        Ok(next)
    }

    fn open_round(&mut self, round_number: u32, now: Instant) -> Result<(), DomainError> {
        let deadline = now.checked_add(self.duration).ok_or_else(|| {
            DomainError::infra(
                InfraErrorKind::Other("deadline".into()),
                format!(
                    "Round {round_number} deadline overflows ({}s round duration)",
                    self.duration.as_secs()
                ),
            )
        })?;
        self.round_number = round_number;
        self.phase = Phase::Active;
        self.deadline = Some(deadline);
        debug!(round = round_number, "Transition: -> Active");
        Ok(())
    }
}
