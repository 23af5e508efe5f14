//! Shared test utilities for the HST component engine workspace.
//!
//! This crate provides standardised fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only and is never published.
//!
//! # Modules
//!
//! - [`nodes`]: fluent builders for raw component and configuration nodes
//! - [`documents`]: [`TestDocuments`](documents::TestDocuments) for on-disk configuration documents

pub mod documents;
pub mod nodes;
