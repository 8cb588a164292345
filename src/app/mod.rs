//! Application orchestration — typing runtime, state, event loop plumbing
//! and input handling.

pub mod event;
pub mod handler;
pub mod script_runtime;
pub mod sequencer;
pub mod state;
