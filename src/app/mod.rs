//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the business rules for the aquarium controller:
//! the per-tick orchestration of sampling, range evaluation, alerting and
//! actuator decisions. All interaction with hardware happens through
//! **port traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod events;
pub mod ports;
pub mod reading;
pub mod service;
