//! # Ports Layer (Middle Hexagon)
//!
//! Trait definitions between the registry and the outside world.
//!
//! - **Driving Port (Inbound)**: `MembershipRegistryApi`
//! - **Driven Port (Outbound)**: `EventPublisher`
//! - No concrete implementations in this module

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
