//! # Membership Registry
//!
//! A single-tenant subscription registry: the owner sets the price, accounts
//! subscribe and cancel themselves, and members invite other accounts to share
//! their subscription either fully or fractionally.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | Owner never subscribes, invites or is invited | `domain/registry.rs` - `ensure_not_owner()` |
//! | INVARIANT-2 | Membership keyed by its own account | `domain/invariants.rs` - `check_membership_keying_invariant()` |
//! | INVARIANT-3 | At most one invitation per invitee | `domain/registry.rs` - `send_join_request()` |
//! | INVARIANT-4 | Price snapshot never rewritten by `change_price` | `domain/registry.rs` - `change_price()` |
//! | INVARIANT-5 | `owned_previous_membership` is a one-way ratchet | `domain/entities.rs` - `Membership::deactivate()` |
//! | INVARIANT-6 | Failed calls change nothing | `domain/registry.rs` (validate first), `service.rs` (rollback) |
//!
//! ## Operations
//!
//! | Operation | Caller | Failure kinds |
//! |-----------|--------|---------------|
//! | `subscribe` | any non-owner | `OwnerNotAllowed`, `MembershipAlreadyExists` |
//! | `cancel` | active member | `NoActiveMembership` |
//! | `change_price` | owner | `OwnableUnauthorizedAccount` |
//! | `send_join_request` | active member | `OwnerNotAllowed`, `NoActiveMembership`, `MembershipAlreadyExists`, `RequestAlreadyExists` |
//! | `confirm_request` | invitee | `PotentialAccountOnly`, `RequestAlreadyConfirmed` |
//! | `reject_request` | invitee | `RequestDoesntExists` |
//!
//! ## Layout
//!
//! | Component | Location | Purpose |
//! |-----------|----------|---------|
//! | Registry | `domain/registry.rs` | State and transitions |
//! | Invariants | `domain/invariants.rs` | Post-commit consistency checks |
//! | Events | `events.rs` | Emitted events, request/response payloads |
//! | Service | `service.rs` | Serialised async access, publishing |
//! | Telemetry | `telemetry.rs` | `tracing` subscriber setup |
//!
//! ## Usage Example
//!
//! ```ignore
//! use membership_registry::prelude::*;
//!
//! let (service, _events) = create_test_service(owner);
//! service.subscribe(member).await?;
//! service.send_fractional_request(member, friend).await?;
//! service.confirm_request(friend).await?;
//! assert_eq!(service.access_scope(friend).await, Some(AccessScope::Partial));
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod config;
pub mod domain;
pub mod errors;
pub mod events;
pub mod ports;
pub mod service;
pub mod telemetry;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain entities
    pub use crate::domain::entities::{
        AccessScope, Invitation, Membership, RegistryConfig, RegistryCounters, RequestKind,
        RequestStatus,
    };

    // Value objects
    pub use crate::domain::value_objects::{Address, RenewalPeriod, U256};

    // Registry
    pub use crate::domain::registry::{Checkpoint, MembershipRegistry};

    // Invariants
    pub use crate::domain::invariants::{
        check_all_invariants, InvariantCheckResult, InvariantViolation,
    };

    // Ports
    pub use crate::ports::inbound::MembershipRegistryApi;
    pub use crate::ports::outbound::EventPublisher;

    // Events
    pub use crate::events::{
        topics, RegistryCommand, RegistryEvent, RegistryRequestPayload, RegistryResponsePayload,
    };

    // Errors
    pub use crate::errors::{
        AddressParseError, ConfigError, PublishError, RegistryError, ServiceError,
    };

    // Adapters
    pub use crate::adapters::{InMemoryEventPublisher, TracingEventPublisher};

    // Config & telemetry
    pub use crate::config::{ServiceConfig, TelemetryConfig};
    pub use crate::telemetry::{init_tracing, TelemetryError};

    // Service
    pub use crate::service::{create_test_service, RegistryService, ServiceStats};
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_prelude_exports() {
        use prelude::*;
        let _ = ServiceConfig::default();
        let _ = Address::ZERO;
        let _ = RequestKind::default();
    }
}
