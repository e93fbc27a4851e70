//! # th-core
//!
//! Core domain logic for Trail Herald.
//!
//! This crate provides the change-event envelope, the safe JSON path
//! lookup used by extraction rules, and the event-name keyed table that
//! maps a CloudTrail-style audit record to a human-readable resource
//! identifier. Everything here is pure: no I/O, no shared state.

pub mod envelope;
pub mod extract;
pub mod path;

pub use envelope::ChangeEvent;
pub use extract::{extract_resource, rule_for, DetailSource, ExtractionRule, ResourceIdentifier};
pub use path::{lookup, lookup_str, PathStep};
