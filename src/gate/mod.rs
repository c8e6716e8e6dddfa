//! # Pre-Login Gate
//!
//! The match engine for inbound connection events. Given a username and the
//! client's remote address, it decides whether the address is exempt
//! ([`Outcome::Matched`]), listed but not matching
//! ([`Outcome::MismatchedRanges`]), or absent from the registry
//! ([`Outcome::NoRule`]), and maps that to the disposition the host
//! enforces.

mod handler;
mod outcome;

pub use handler::{GateDecision, SessionGate};
pub use outcome::{evaluate, Outcome};
