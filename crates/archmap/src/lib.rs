//! Archmap - architecture graph tracking.
//!
//! A project's architecture is stored as a graph of components (nodes) and
//! typed relationships (edges), with per-component version progress and
//! linked feature files. This crate provides the domain model, the
//! repository contracts that load it, an in-memory backend, and the
//! read-only query engine that answers structural questions about it.

#![forbid(unsafe_code)]

pub mod config;
pub mod domain;
pub mod error;
pub mod query;
pub mod storage;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;
