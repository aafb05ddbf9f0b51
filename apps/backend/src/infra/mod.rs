//! Process wiring: building the shared application state.

pub mod state;
