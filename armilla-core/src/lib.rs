//! Board-agnostic runtime shell for the Armilla wearable
//!
//! This crate contains all shell logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (display, backlight, vibrator, radio)
//! - Application capability contract and per-app container
//! - Touch gesture classification
//! - Power state machine (idle timer, sleep/wake bookkeeping)
//! - System manager (app rings, navigation, event routing)
//! - Configuration and crash record types
//!
//! Everything here is exercised by host unit tests; the `armilla-firmware`
//! crate wires these pieces to Embassy tasks and real peripherals.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// This must go first so the macros are visible to the rest of the crate.
#[macro_use]
mod fmt;

pub mod app;
pub mod apps;
pub mod config;
pub mod container;
pub mod crash;
pub mod event;
pub mod gesture;
pub mod manager;
pub mod net;
pub mod power;
pub mod traits;
