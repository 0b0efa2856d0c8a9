//! # Core Domain Entities
//!
//! Records owned by the registry: the product configuration, one membership
//! per subscribing account, and at most one join request per invitee.

use crate::domain::value_objects::{Address, RenewalPeriod, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// REGISTRY CONFIG
// =============================================================================

/// The subscription product. Only `price` changes after creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Product name.
    pub name: String,
    /// Current price charged to new subscribers.
    pub price: U256,
    /// Renewal period; stored, not enforced.
    pub renewal_period: RenewalPeriod,
    /// Account that created the registry.
    pub owner: Address,
}

impl RegistryConfig {
    /// Creates a configuration.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        price: U256,
        renewal_period: RenewalPeriod,
        owner: Address,
    ) -> Self {
        Self {
            name: name.into(),
            price,
            renewal_period,
            owner,
        }
    }

    /// Returns true if `account` is the owner.
    #[must_use]
    pub fn is_owner(&self, account: &Address) -> bool {
        self.owner == *account
    }
}

// =============================================================================
// MEMBERSHIP
// =============================================================================

/// One account's subscription record.
///
/// Created on first subscribe and never removed; cancel only flips `active`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    /// Account this record belongs to.
    pub main_acct: Address,
    /// Currently subscribed.
    pub active: bool,
    /// Set on first cancel, never cleared.
    pub owned_previous_membership: bool,
    /// Price snapshot taken at the most recent subscribe.
    pub price: U256,
}

impl Membership {
    /// A fresh, active membership at `price`.
    #[must_use]
    pub fn new(main_acct: Address, price: U256) -> Self {
        Self {
            main_acct,
            active: true,
            owned_previous_membership: false,
            price,
        }
    }

    /// Reactivates a cancelled membership at the current price.
    pub fn reactivate(&mut self, price: U256) {
        self.active = true;
        self.price = price;
    }

    /// Deactivates the membership and records the prior ownership.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.owned_previous_membership = true;
    }
}

// =============================================================================
// JOIN REQUESTS
// =============================================================================

/// Kind of access a join request offers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    /// Full co-holder of the inviter's subscription.
    #[default]
    NonFractional,
    /// Partial holder of the inviter's subscription.
    Fractional,
}

impl RequestKind {
    /// Builds the kind from the legacy boolean flag.
    #[must_use]
    pub const fn from_flag(fractional: bool) -> Self {
        if fractional {
            Self::Fractional
        } else {
            Self::NonFractional
        }
    }

    /// Returns true for a fractional request.
    #[must_use]
    pub const fn is_fractional(&self) -> bool {
        matches!(self, Self::Fractional)
    }

    /// Access scope conferred once confirmed.
    #[must_use]
    pub const fn scope(&self) -> AccessScope {
        match self {
            Self::NonFractional => AccessScope::Full,
            Self::Fractional => AccessScope::Partial,
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFractional => write!(f, "non-fractional"),
            Self::Fractional => write!(f, "fractional"),
        }
    }
}

/// Lifecycle of a join request. Rejection deletes the record instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Sent, awaiting the invitee.
    #[default]
    Pending,
    /// Accepted by the invitee. Terminal.
    Confirmed,
}

/// An outstanding or confirmed invitation, keyed by `to_acct`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invitation {
    /// Inviting member.
    pub from_acct: Address,
    /// Invited account.
    pub to_acct: Address,
    /// Fractional or full access.
    pub kind: RequestKind,
    /// Pending or confirmed.
    pub status: RequestStatus,
}

impl Invitation {
    /// A new pending invitation.
    #[must_use]
    pub fn pending(from_acct: Address, to_acct: Address, kind: RequestKind) -> Self {
        Self {
            from_acct,
            to_acct,
            kind,
            status: RequestStatus::Pending,
        }
    }

    /// True while awaiting the invitee.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }

    /// True once confirmed.
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.status == RequestStatus::Confirmed
    }

    /// Returns true for a fractional invitation.
    #[must_use]
    pub fn is_fractional(&self) -> bool {
        self.kind.is_fractional()
    }
}

// =============================================================================
// ACCESS
// =============================================================================

/// What an account may use of the subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessScope {
    /// Own active membership or confirmed non-fractional invitation.
    Full,
    /// Confirmed fractional invitation.
    Partial,
}

// =============================================================================
// COUNTERS
// =============================================================================

/// Global counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryCounters {
    /// Successful subscribe calls, including re-subscriptions. Never decremented.
    pub subscribers: u64,
    /// Successful cancel calls. Never decremented.
    pub cancellations: u64,
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(b: u8) -> Address {
        Address::new([b; 20])
    }

    #[test]
    fn test_membership_lifecycle() {
        let mut m = Membership::new(addr(1), U256::from(100));
        assert!(m.active);
        assert!(!m.owned_previous_membership);

        m.deactivate();
        assert!(!m.active);
        assert!(m.owned_previous_membership);

        m.reactivate(U256::from(200));
        assert!(m.active);
        assert!(m.owned_previous_membership);
        assert_eq!(m.price, U256::from(200));
    }

    #[test]
    fn test_request_kind_flag() {
        assert_eq!(RequestKind::from_flag(false), RequestKind::NonFractional);
        assert_eq!(RequestKind::from_flag(true), RequestKind::Fractional);
        assert!(RequestKind::Fractional.is_fractional());
        assert_eq!(RequestKind::default(), RequestKind::NonFractional);
    }

    #[test]
    fn test_request_kind_scope() {
        assert_eq!(RequestKind::NonFractional.scope(), AccessScope::Full);
        assert_eq!(RequestKind::Fractional.scope(), AccessScope::Partial);
    }

    #[test]
    fn test_invitation_pending() {
        let inv = Invitation::pending(addr(1), addr(2), RequestKind::Fractional);
        assert!(inv.is_pending());
        assert!(!inv.is_confirmed());
        assert!(inv.is_fractional());
    }

    #[test]
    fn test_config_owner() {
        let config = RegistryConfig::new("Key", U256::from(1), RenewalPeriod(60), addr(9));
        assert!(config.is_owner(&addr(9)));
        assert!(!config.is_owner(&addr(1)));
    }

    #[test]
    fn test_kind_serde() {
        let json = serde_json::to_string(&RequestKind::NonFractional).unwrap();
        assert_eq!(json, "\"non_fractional\"");
    }
}
