//! Shared test utilities for the ctx workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only and is never published.
//!
//! # Modules
//!
//! - [`env`]: [`env::TestEnv`], an isolated global config plus project tree

pub mod env;
