//! Event router: the single owner of registry and room state.
//!
//! Transport tasks and the delivery bridge talk to the router through a
//! [`RouterHandle`]; the [`EventRouter`] actor drains the command queue and
//! applies each command to completion before taking the next one.

pub mod actor;
pub mod command;
pub mod handle;

pub use actor::EventRouter;
pub use command::{RouterCommand, RouterStats};
pub use handle::RouterHandle;
