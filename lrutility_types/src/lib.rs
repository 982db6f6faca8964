//! # `lrutility_types`
//!
//! The "data" side of `lrutility`.
//!
//! - [`namespace`] is the closed set of XMP namespaces a Lightroom sidecar
//!   uses, with helpers to build qualified attribute keys.
//! - [`record`] holds the typed [`MetadataRecord`](record::MetadataRecord)
//!   handed back to callers.
//! - [`fields`] says **how to read** each record field: which qualified key
//!   it comes from, what kind of value it is, and what it defaults to.
//!
//! If you're looking to read another attribute, add a field to the record and
//! a row to its group's table in [`fields`]. The extractor in `lrutility`
//! doesn't need to change.

#![forbid(unsafe_code)]

pub mod fields;
pub mod namespace;
pub mod record;
