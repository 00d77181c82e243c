//! Light tracker shared types.
//!
//! Everything the control unit exchanges with its collaborators lives here,
//! organized by domain: axis/mode/sensor value types, the transient error
//! taxonomy, collaborator traits, and the tracker configuration tables.

pub mod config;
pub mod error;
pub mod io;
pub mod state;
