//! AquaCtl firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod actuators;
pub mod app;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod net;
pub mod pins;
pub mod scheduler;

// Hardware-facing modules; simulation stubs keep them building on the host.
pub mod adapters;
pub mod drivers;
pub mod sensors;
