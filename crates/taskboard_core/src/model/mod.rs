//! Board domain model.
//!
//! # Responsibility
//! - Define the work-item record shared by the store and every view.
//!
//! # Invariants
//! - Every entity is identified by a stable `EntityId`.
//! - Entities are never deleted; only `status` changes after creation.

pub mod entity;
