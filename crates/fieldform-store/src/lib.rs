//! # fieldform-store
//!
//! Field descriptors and the store collaborator that supplies and persists
//! them. This crate owns the wire shape of a form definition; the form
//! engine in `fieldform-forms` only reads it.
//!
//! ## Modules
//!
//! - [`value`] - Scalar field values
//! - [`descriptor`] - [`FieldDescriptor`] and its type and variant tags
//! - [`store`] - The [`FieldStore`] trait and the in-memory backend
//! - [`file`] - A JSON-file backend
//! - [`cache`] - TTL caching and fetch retries over any backend
//! - [`retry`] - Exponential backoff
//! - [`seed`] - The sample profile form

pub mod cache;
pub mod descriptor;
pub mod file;
pub mod retry;
pub mod seed;
pub mod store;
pub mod value;

pub use cache::CachedFieldStore;
pub use descriptor::{summarize, FieldDescriptor, FieldType, Variant};
pub use file::JsonFileStore;
pub use retry::RetryPolicy;
pub use seed::seed_fields;
pub use store::{open_from_settings, FieldStore, InMemoryFieldStore};
pub use value::FieldValue;
