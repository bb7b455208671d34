//! Error handling for toolenv
//!
//! Resolution and cache operations surface failures through
//! [`anyhow::Result`], with the contract violations this crate itself detects
//! expressed as strongly typed [`ToolenvError`] variants so callers can match
//! on them precisely (via `Error::downcast_ref`).
//!
//! # Error philosophy
//!
//! Most "failures" in dependency resolution are not errors at all: a
//! requirement nobody resolves is simply absent from the result mapping, an
//! inexact answer under `exact_only` is discarded and the requirement stays
//! open, and an unresolvable requirement type is logged and dropped. The
//! typed variants below cover the cases that must stop an operation loudly:
//!
//! - [`ToolenvError::BulkResolutionMismatch`]: a bulk resolver claimed a
//!   pass but returned the wrong number of dependencies. Zipping that answer
//!   positionally would silently misassign dependencies to requirements, so
//!   resolution aborts instead.
//! - [`ToolenvError::AmbiguousResolution`]: a single-requirement lookup
//!   produced more than one mapping entry, which the resolution algorithm
//!   makes impossible; seeing it means a resolver broke the contract.
//! - [`ToolenvError::CacheRemoval`]: a forced rebuild could not delete the
//!   existing cache entry. The failure is logged and propagated; the build
//!   never proceeds on top of a half-removed directory.

use std::path::PathBuf;
use thiserror::Error;

/// Typed failures detected by the resolution chain and the dependency cache.
#[derive(Error, Debug)]
pub enum ToolenvError {
    /// A bulk resolver returned a non-empty answer whose length does not
    /// match the resolvable requirement list.
    ///
    /// Bulk resolution is positional; a count mismatch would pair
    /// dependencies with the wrong requirements, so it is fatal.
    #[error(
        "resolver '{resolver}' bulk-resolved {actual} dependencies for {expected} requirements"
    )]
    BulkResolutionMismatch {
        /// Type tag of the offending resolver.
        resolver: String,
        /// Number of resolvable requirements passed in.
        expected: usize,
        /// Number of dependencies the resolver returned.
        actual: usize,
    },

    /// A single-requirement lookup somehow produced multiple mapping
    /// entries.
    #[error("lookup of '{name}' produced {count} dependencies, expected at most one")]
    AmbiguousResolution {
        /// Name of the requirement that was looked up.
        name: String,
        /// Number of entries the resolution produced.
        count: usize,
    },

    /// A forced cache rebuild failed to delete the existing entry.
    #[error("failed to remove cached environment directory '{}'", path.display())]
    CacheRemoval {
        /// The cache entry that could not be removed.
        path: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_contract() {
        let error = ToolenvError::BulkResolutionMismatch {
            resolver: "conda".to_string(),
            expected: 3,
            actual: 2,
        };
        assert_eq!(
            error.to_string(),
            "resolver 'conda' bulk-resolved 2 dependencies for 3 requirements"
        );

        let error = ToolenvError::AmbiguousResolution {
            name: "samtools".to_string(),
            count: 2,
        };
        assert!(error.to_string().contains("samtools"));
        assert!(error.to_string().contains("expected at most one"));
    }

    #[test]
    fn test_cache_removal_preserves_io_source() {
        let error = ToolenvError::CacheRemoval {
            path: PathBuf::from("/tmp/cache/abc12345"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let source = std::error::Error::source(&error).expect("io source");
        assert!(source.to_string().contains("denied"));
    }
}
