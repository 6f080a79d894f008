//! API implementation submodules.
//!
//! Each submodule contains `impl OvumClient` blocks that extend the public
//! client with domain-specific methods. The struct definition stays in
//! `lib.rs`.

mod appointments;
mod auth;
mod batches;
mod builder;
mod eggs;
mod evaluation;
mod frames;
mod overview;
mod patients;
mod staff;

pub use builder::OvumClientBuilder;
