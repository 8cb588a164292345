//! Core logic – the typing state machine, its errors, and terminal scripts.
//!
//! Nothing in this module depends on tokio or any TUI crate.  Timers and
//! rendering are layered on top in `app` and `ui`.

pub mod error;
pub mod script;
pub mod typing;
