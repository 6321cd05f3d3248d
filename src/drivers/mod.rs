//! Actuator drivers, hardware initialisation, and peripheral helpers.

pub mod adc;
pub mod hw_init;
pub mod outputs;
pub mod relay;
pub mod servo;
