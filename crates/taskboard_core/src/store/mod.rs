//! In-memory state store.
//!
//! # Responsibility
//! - Own the ordered entity sequence for the process lifetime.
//! - Fan out snapshots to subscribers after every effective mutation.
//!
//! # Invariants
//! - The store is the only place entities are mutated.
//! - Subscribers only ever see owned copies of the sequence.

pub mod observable;
