//! Hardware-independent core library for chipinfo-rs
//!
//! This crate holds everything the chip info firmware does that does not touch
//! a register: the chip and MAC models, the console report layout, the shared
//! console lock, store recovery and configuration resolution, the connectivity
//! state machine and the startup sequence itself.
//!
//! It is `#![no_std]` so it compiles on both the ESP32-S3 target and desktop
//! hosts (for the simulator and tests).

#![no_std]

pub mod chip;
pub mod config;
pub mod connectivity;
pub mod console;
pub mod mac;
pub mod network;
pub mod orchestrator;
pub mod report;
pub mod store;
pub mod worker;
