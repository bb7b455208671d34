//! Core types for toolenv
//!
//! The foundation layer shared by the resolution chain and the dependency
//! cache. Today that is the error system; the value types and capability
//! contracts live in [`crate::requirement`] and [`crate::resolvers`].
//!
//! # Error management
//!
//! toolenv separates contract violations from ordinary "nothing found"
//! outcomes:
//!
//! - **Strongly-typed errors** ([`ToolenvError`]) cover failures the crate
//!   itself detects: bulk-resolution count mismatches, ambiguous
//!   single-requirement lookups, and cache-entry removal failures.
//! - **Contextual propagation** via [`anyhow`] wraps resolver and filesystem
//!   errors with the operation that was in flight, so a failed cache build
//!   names both the dependency and the directory involved.
//!
//! Unresolved requirements are deliberately *not* errors; they are absent
//! entries in the result mapping, and callers are expected to check for
//! missing entries.

pub mod error;

pub use self::error::ToolenvError;
