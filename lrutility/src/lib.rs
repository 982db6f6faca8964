//! # `lrutility`
//!
//! A small toolkit for photographers who manage their raw files with Adobe
//! Lightroom (or Camera Raw).
//!
//! Lightroom writes an `.xmp` sidecar next to each raw file it knows about.
//! This crate reads those sidecars into a typed [`MetadataRecord`], and builds
//! two batch jobs on top of that:
//!
//! - [`cull`]: delete every raw file (and its sidecar) rated as a reject.
//! - [`chunk`]: pack a folder into zip archives under a size limit, so it can
//!   be uploaded somewhere with per-file caps.
//!
//! ## Reading a sidecar
//!
//! ```no_run
//! let record = lrutility::extract("DSC01234.xmp")?;
//!
//! if record.basic.rating == Some(1) {
//!     println!("{} is a reject", record.develop.raw_file_name.as_deref().unwrap_or("?"));
//! }
//! # Ok::<(), lrutility::ExtractError>(())
//! ```
//!
//! ## Adding fields
//!
//! The record and the tables describing how to fill it live in the
//! `lrutility_types` crate. Please start there if an attribute you need isn't
//! read yet.
//!
//! ## License
//!
//! This project is dual-licensed under either the Apache License 2.0 or the MIT License at your option.

#![forbid(unsafe_code)]

pub mod chunk;
pub mod coerce;
pub mod cull;
pub mod error;
pub mod extract;

pub use error::ExtractError;
pub use extract::{Extractor, extract, extract_str};

/// Re-exports of the record types from `lrutility_types`.
pub mod types {
    pub use lrutility_types::{
        namespace::{Namespace, QualifiedKey},
        record::*,
    };
}

pub use types::MetadataRecord;

pub(crate) mod util {
    /// Helper function to initialize the logger for testing.
    #[cfg(test)]
    pub fn logger() {
        _ = env_logger::builder()
            .is_test(true)
            .filter_level(log::LevelFilter::max())
            .format_file(true)
            .format_line_number(true)
            .try_init();
    }
}
