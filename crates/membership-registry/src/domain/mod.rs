//! # Domain Layer (Inner Hexagon)
//!
//! Pure membership and invitation rules.
//! NO I/O, NO async, NO external dependencies.
//!
//! - Dependencies point INWARD only (adapters depend on this, not vice versa).
//! - Every transition is all-or-nothing: validation happens before mutation.

pub mod entities;
pub mod invariants;
pub mod registry;
pub mod value_objects;

pub use entities::*;
pub use invariants::*;
pub use registry::*;
pub use value_objects::*;
