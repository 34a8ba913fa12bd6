//! Connectivity and command core of the Hobby House node.
//!
//! The node listens for MQTT commands and drives a security relay and an RGB
//! light. This crate holds everything except the hardware bindings:
//!
//! - `domain`: device state, intents and the ports implemented by drivers
//! - `app`: usecases owning the device state
//! - `controllers`: MQTT payload decoding
//! - `infrastructure`: `embedded-hal` output drivers, the network reconnector,
//!   the MQTT session manager and the control loop
//!
//! The ESP32 binary in `firmware/` wires these to real peripherals.

#![no_std]

pub mod app;
pub mod config;
pub mod controllers;
pub mod domain;
pub mod infrastructure;
