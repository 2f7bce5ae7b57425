//! Core types shared across the collection-policy facilities
//!
//! This crate holds constants only, so the core, the CLI and tests agree on
//! the same names:
//!
//! - **Schema constants**: canonical logging field keys and event names
//! - **Vocabulary**: element/attribute names and namespace URIs of the
//!   collection-policy document

pub mod schema;
pub mod vocabulary;
