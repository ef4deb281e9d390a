//! # homepanel-domain
//!
//! Pure domain model for the homepanel control panel.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Devices** (light, lock, thermostat, fan) and their strongly typed state
//! - Define **Value domains** (discrete enums and bounded numeric ranges)
//! - Define **Action log entries** (immutable records of committed mutations)
//! - Define **Scenes** (named batches of device targets)
//! - Contain all invariant enforcement: no device can hold a value outside its domain
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app` or the binary.

pub mod error;
pub mod id;
pub mod time;

pub mod action_log;
pub mod device;
pub mod scene;
