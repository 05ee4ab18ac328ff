//! Common test utilities for viewtree integration tests.
//!
//! This module provides:
//! - `RepoFixture`: builder for JSON repository snapshots
//! - `Harness`: a view wired to a fixture, a recording host and memory state
//! - `TestEnv`: temp directory plus helpers to run the `viewtree` binary

#![allow(dead_code)]

pub mod env;
pub mod fixtures;
pub mod harness;

pub use env::*;
pub use fixtures::*;
pub use harness::*;
