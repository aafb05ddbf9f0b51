pub mod coordinator;
pub mod message_board;
pub mod registry;
pub mod round_controller;
pub mod round_timer;
pub mod status;
pub mod support_ledger;

#[cfg(test)]
mod tests_concurrency;
#[cfg(test)]
mod tests_coordinator;

pub use coordinator::{FrozenRound, GameCoordinator};
pub use round_timer::spawn_round_timer;
pub use status::{OtherPlayerView, PlayerStatus};
