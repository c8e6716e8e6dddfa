//! # SessionSkip
//!
//! A login-gate extension for multiplayer-game proxies. SessionSkip decides,
//! per connecting user, whether the normal session-authentication handshake
//! may be skipped, based on a configured allow-list of (username, network
//! range) pairs.
//!
//! ## Features
//!
//! - Username to CIDR-range exemption registry, persisted to a YAML file
//! - IPv4 and IPv6 range containment matching
//! - Concurrent-safe mutation with atomic persistence
//! - Administrative command surface with prefix completion
//!
//! ## Architecture
//!
//! The host proxy dispatches pre-login connection events into
//! [`gate::SessionGate`], which queries the [`registry::ExemptionRegistry`]
//! and returns one of three dispositions: proceed with normal
//! authentication, bypass it, or deny the connection with an explanatory
//! message. Administrative input flows through [`command::ExemptCommand`],
//! which parses a subcommand and its arguments, invokes the registry, and
//! formats a single-line response.

pub mod command;
pub mod config;
pub mod gate;
pub mod registry;
