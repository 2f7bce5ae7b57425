//! Collection Policy Core - the collection-policy document model
//!
//! A collection policy is a small XML document declaring which content
//! models a repository collection accepts, the defaults stamped on new
//! members of each type, and the predicate linking members to the
//! collection. This crate provides:
//! - `PolicyDocument`: parse + validate, accessors, content-model
//!   add/remove, serialization
//! - The collection-policy schema and the `SchemaValidator` seam
//! - An owned XML tree preserving namespace declarations across load/save
//! - `PolicyConfig` for the values stamped on new entries
//! - The error and logging facilities
//!
//! # Example
//!
//! ```
//! use collection_policy_core::{PolicyConfig, PolicyDocument};
//!
//! let mut policy = PolicyDocument::empty();
//! policy.add_content_model("islandora:sp_basic_image", "Image", "islandora", &PolicyConfig::default());
//! assert_eq!(policy.remove_content_model(["islandora:sp_basic_image"]), 1);
//!
//! let text = policy.to_xml().unwrap();
//! let reloaded = PolicyDocument::from_xml(&text).unwrap();
//! assert_eq!(reloaded.relationship(), "isMemberOfCollection");
//! ```

pub mod config;
pub mod document;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod schema;
pub mod xml;

#[doc(hidden)]
pub use collection_policy_core_types as core_types;
#[doc(hidden)]
pub use tracing;

// Re-export commonly used types
pub use config::PolicyConfig;
pub use document::PolicyDocument;
pub use errors::{ExError, ExErrorKind, PolicyError, Result};
pub use model::{normalize_namespace, ContentModelEntry};
pub use schema::{schema_path, CollectionPolicySchema, SchemaValidator};
