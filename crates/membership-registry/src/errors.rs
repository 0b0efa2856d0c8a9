//! # Error Types
//!
//! All error types for the membership registry.

use crate::domain::invariants::InvariantViolation;
use crate::domain::value_objects::Address;
use thiserror::Error;

// =============================================================================
// REGISTRY ERRORS
// =============================================================================

/// Business-rule violations. A failed call never mutates state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Account already holds an active membership.
    #[error("membership already exists: {0:?}")]
    MembershipAlreadyExists(Address),

    /// The owner cannot take part as a member.
    #[error("owner not allowed: {0:?}")]
    OwnerNotAllowed(Address),

    /// An invitation for this account already exists.
    #[error("request already exists: {0:?}")]
    RequestAlreadyExists(Address),

    /// No matching pending invitation.
    #[error("request doesn't exist: {0:?}")]
    RequestDoesntExists(Address),

    /// Only the invited account can confirm.
    #[error("potential account only: {0:?}")]
    PotentialAccountOnly(Address),

    /// Caller is not the owner.
    #[error("unauthorized account: {0:?}")]
    OwnableUnauthorizedAccount(Address),

    /// Caller has no active membership.
    #[error("no active membership: {0:?}")]
    NoActiveMembership(Address),

    /// Invitation was already confirmed.
    #[error("request already confirmed: {0:?}")]
    RequestAlreadyConfirmed(Address),
}

impl RegistryError {
    /// The account named by the error.
    #[must_use]
    pub fn account(&self) -> Address {
        match self {
            Self::MembershipAlreadyExists(a)
            | Self::OwnerNotAllowed(a)
            | Self::RequestAlreadyExists(a)
            | Self::RequestDoesntExists(a)
            | Self::PotentialAccountOnly(a)
            | Self::OwnableUnauthorizedAccount(a)
            | Self::NoActiveMembership(a)
            | Self::RequestAlreadyConfirmed(a) => *a,
        }
    }

    /// Stable error name, used in logs and response payloads.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MembershipAlreadyExists(_) => "MembershipAlreadyExists",
            Self::OwnerNotAllowed(_) => "OwnerNotAllowed",
            Self::RequestAlreadyExists(_) => "RequestAlreadyExists",
            Self::RequestDoesntExists(_) => "RequestDoesntExists",
            Self::PotentialAccountOnly(_) => "PotentialAccountOnly",
            Self::OwnableUnauthorizedAccount(_) => "OwnableUnauthorizedAccount",
            Self::NoActiveMembership(_) => "NoActiveMembership",
            Self::RequestAlreadyConfirmed(_) => "RequestAlreadyConfirmed",
        }
    }
}

// =============================================================================
// SERVICE ERRORS
// =============================================================================

/// Errors surfaced by [`crate::service::RegistryService`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The call was rejected by the registry.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// A committed transition left the registry inconsistent.
    #[error("invariant violated: {0:?}")]
    InvariantViolated(Vec<InvariantViolation>),
}

impl ServiceError {
    /// Returns the registry error, if this is one.
    #[must_use]
    pub fn as_registry(&self) -> Option<&RegistryError> {
        match self {
            Self::Registry(err) => Some(err),
            Self::InvariantViolated(_) => None,
        }
    }
}

// =============================================================================
// PUBLISH ERRORS
// =============================================================================

/// Errors from the outbound event publisher.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PublishError {
    /// Serializing the event failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The sink refused or dropped the event.
    #[error("event sink unavailable: {0}")]
    Unavailable(String),
}

// =============================================================================
// CONFIG / PARSE ERRORS
// =============================================================================

/// Invalid configuration values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Environment variable is not a recognised boolean.
    #[error("invalid boolean for {var}: {value:?}")]
    InvalidBool {
        /// Variable name.
        var: String,
        /// Value found.
        value: String,
    },
}

/// Failure to parse an [`Address`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressParseError {
    /// Not valid hex.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Decoded to the wrong number of bytes.
    #[error("invalid address length: {0} bytes, expected 20")]
    InvalidLength(usize),
}

// =============================================================================
// TESTS
// =============================================================================
