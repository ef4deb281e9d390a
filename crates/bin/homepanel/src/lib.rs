//! # homepanel: control-panel console
//!
//! Composition root: loads configuration, wires the automation engine to an
//! in-process change bus and drives it from a line-oriented console.
//!
//! ## Dependency rule
//! This is the only crate that depends on both `homepanel-domain` and
//! `homepanel-app` for wiring. No domain logic belongs here.

pub mod config;
pub mod console;
