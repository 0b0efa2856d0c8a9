//! # Domain Invariants
//!
//! Consistency rules that must hold between any two calls.
//!
//! - INVARIANT-1: Owner Exclusion (no membership, never inviter or invitee)
//! - INVARIANT-2: Membership Keying (record key equals `main_acct`)
//! - INVARIANT-3: Invitation Keying (record key equals `to_acct`, no self-invites)
//! - INVARIANT-4: Counter Bound (active members never exceed subscriptions)
//! - INVARIANT-5: Cancellation Ratchet (inactive implies `owned_previous_membership`)

use crate::domain::registry::MembershipRegistry;
use crate::domain::value_objects::Address;
use serde::{Deserialize, Serialize};

// =============================================================================
// INVARIANT CHECKS
// =============================================================================

/// INVARIANT-1: the owner never appears in membership or invitation records.
#[must_use]
pub fn check_owner_exclusion_invariant(registry: &MembershipRegistry) -> bool {
    let owner = registry.owner();
    registry.membership(&owner).is_none()
        && registry
            .requests()
            .all(|(_, r)| r.from_acct != owner && r.to_acct != owner)
}

/// INVARIANT-2: every membership is stored under its own account.
#[must_use]
pub fn check_membership_keying_invariant(registry: &MembershipRegistry) -> bool {
    registry.memberships().all(|(key, m)| *key == m.main_acct)
}

/// INVARIANT-3: every invitation is stored under its invitee.
#[must_use]
pub fn check_request_keying_invariant(registry: &MembershipRegistry) -> bool {
    registry
        .requests()
        .all(|(key, r)| *key == r.to_acct && r.from_acct != r.to_acct)
}

/// INVARIANT-4: subscribe count bounds the live member count.
#[must_use]
pub fn check_counter_invariant(registry: &MembershipRegistry) -> bool {
    registry.active_members() as u64 <= registry.subscribers()
}

/// INVARIANT-5: a cancelled membership remembers it existed.
#[must_use]
pub fn check_cancellation_ratchet_invariant(registry: &MembershipRegistry) -> bool {
    registry
        .memberships()
        .all(|(_, m)| m.active || m.owned_previous_membership)
}

/// Check all invariants at once.
#[must_use]
pub fn check_all_invariants(registry: &MembershipRegistry) -> InvariantCheckResult {
    let mut violations = Vec::new();

    if !check_owner_exclusion_invariant(registry) {
        violations.push(InvariantViolation::OwnerParticipates(registry.owner()));
    }

    for (key, m) in registry.memberships() {
        if *key != m.main_acct {
            violations.push(InvariantViolation::MembershipMiskeyed {
                key: *key,
                main_acct: m.main_acct,
            });
        }
        if !m.active && !m.owned_previous_membership {
            violations.push(InvariantViolation::CancellationNotRecorded(*key));
        }
    }

    if !check_request_keying_invariant(registry) {
        for (key, r) in registry.requests() {
            if *key != r.to_acct || r.from_acct == r.to_acct {
                violations.push(InvariantViolation::RequestMiskeyed {
                    key: *key,
                    to_acct: r.to_acct,
                });
            }
        }
    }

    if !check_counter_invariant(registry) {
        violations.push(InvariantViolation::CounterBelowActive {
            subscribers: registry.subscribers(),
            active: registry.active_members(),
        });
    }

    if violations.is_empty() {
        InvariantCheckResult::Valid
    } else {
        InvariantCheckResult::Invalid(violations)
    }
}

// =============================================================================
// INVARIANT TYPES
// =============================================================================

/// Result of checking all invariants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantCheckResult {
    /// All invariants hold.
    Valid,
    /// One or more invariants violated.
    Invalid(Vec<InvariantViolation>),
}

impl InvariantCheckResult {
    /// Returns true if all invariants hold.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Returns the violations, if any.
    #[must_use]
    pub fn violations(&self) -> &[InvariantViolation] {
        match self {
            Self::Valid => &[],
            Self::Invalid(v) => v,
        }
    }
}

/// A specific invariant violation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvariantViolation {
    /// INVARIANT-1 violated.
    OwnerParticipates(Address),
    /// INVARIANT-2 violated.
    MembershipMiskeyed {
        /// Map key.
        key: Address,
        /// Account stored in the record.
        main_acct: Address,
    },
    /// INVARIANT-3 violated.
    RequestMiskeyed {
        /// Map key.
        key: Address,
        /// Invitee stored in the record.
        to_acct: Address,
    },
    /// INVARIANT-4 violated.
    CounterBelowActive {
        /// Subscribe count.
        subscribers: u64,
        /// Active memberships.
        active: usize,
    },
    /// INVARIANT-5 violated.
    CancellationNotRecorded(Address),
}

// =============================================================================
// TESTS
// =============================================================================
