//! # Verdant Common
//!
//! Common types and shared abstractions for Verdant.
//!
//! This crate provides foundational types used across the garden subsystems:
//! - ID types (PlotId, PlantId, ItemId)
//! - Version and magic-byte information for persisted blobs
//! - The blob error type
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod ids;
pub mod version;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::ids::*;
    pub use crate::version::*;
}

pub use prelude::*;
