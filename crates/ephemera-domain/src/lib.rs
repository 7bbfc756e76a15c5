//! Ephemera Domain Layer
//!
//! This crate contains the core business logic and domain model for Ephemera.
//! It has ZERO external dependencies and defines the fundamental concepts,
//! value objects, and trait interfaces that all other layers depend upon.
//!
//! ## Key Concepts
//!
//! - **Tracked resource**: an ephemeral object (a custom quote product) whose
//!   fate the lifecycle manager owns until a claim settles or a TTL expires
//! - **Claim**: a transaction that, upon reaching a settled status,
//!   legitimizes permanent retention of the resource it references
//! - **Deletion mode**: soft (reversible trash) vs hard (irreversible)
//! - **Pricing**: the quote calculator that produces the ephemeral resources
//!   in the first place
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture:
//! - No external crate dependencies
//! - Pure business logic only
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod pricing;
pub mod resource;
pub mod traits;
pub mod transaction;

// Re-exports for convenience
pub use pricing::{MonitoringSelection, Quote, QuoteRequest, RateCard, VehicleDetails, Zone};
pub use resource::{ClaimId, DeletionMode, ResourceId, TrackedResource};
pub use transaction::{ClaimStatus, Transaction};
