//! # Exemption Registry
//!
//! This module owns the mapping from username to exempted network ranges.
//! It provides add/remove/remove-all/lookup operations, serializes to and
//! from the persisted configuration file, and guarantees each mutating
//! operation is durably saved before it reports success.
//!
//! ## Invariants
//!
//! - A username key is never present with an empty range list; removing a
//!   user's last range removes the key.
//! - No duplicate ranges per user (value equality).
//! - The persisted form and the in-memory form stay consistent: a mutation
//!   either fully succeeds (memory and disk) or fully fails (neither).

mod cidr;
mod store;

pub use cidr::{CidrParseError, CidrRange};
pub use store::ExemptionRegistry;
