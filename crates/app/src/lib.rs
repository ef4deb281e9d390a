//! # homepanel-app
//!
//! Application layer: the device registry, the action log, the automation
//! engine and the **port definitions** (traits) they depend on.
//!
//! ## Responsibilities
//! - Define **port traits** the engine is generic over:
//!   - `Clock`: source of timestamps for log entries
//!   - `ChangePublisher`: notification of committed state changes
//! - Own the canonical device set (`DeviceRegistry`) and the most-recent-first
//!   action log (`ActionLog`)
//! - Implement toggle, value assignment and scene activation
//!   (`AutomationEngine`), all-or-nothing and synchronous
//! - Provide **in-process infrastructure** (change bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `homepanel-domain` only (plus `tokio::sync` for channels).
//! Never imports the binary crate.

pub mod action_log;
pub mod automation_engine;
pub mod change_bus;
pub mod config;
pub mod ports;
pub mod registry;
