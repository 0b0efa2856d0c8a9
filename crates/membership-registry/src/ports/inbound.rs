//! # Driving Ports (API - Inbound)
//!
//! The operations exposed by the membership registry. Every call carries the
//! authenticated caller explicitly; the registry never reads ambient identity.

use crate::domain::entities::{AccessScope, Invitation, Membership, RegistryConfig, RequestKind};
use crate::domain::value_objects::{Address, U256};
use crate::errors::ServiceError;
use crate::events::RegistryEvent;
use async_trait::async_trait;

// =============================================================================
// MEMBERSHIP REGISTRY API (Primary Driving Port)
// =============================================================================

/// Primary API for the membership registry.
///
/// Writes are serialised: each completes or fails entirely before the next
/// one observes the registry.
///
/// ## Usage
///
/// ```ignore
/// api.subscribe(member).await?;
/// api.send_join_request(member, friend, RequestKind::Fractional).await?;
/// api.confirm_request(friend).await?;
/// ```
#[async_trait]
pub trait MembershipRegistryApi: Send + Sync {
    // === Membership lifecycle ===

    /// Subscribe `caller` at the current price.
    async fn subscribe(&self, caller: Address) -> Result<RegistryEvent, ServiceError>;

    /// Cancel `caller`'s active membership.
    async fn cancel(&self, caller: Address) -> Result<RegistryEvent, ServiceError>;

    /// Owner-only price change.
    async fn change_price(
        &self,
        caller: Address,
        new_price: U256,
    ) -> Result<RegistryEvent, ServiceError>;

    // === Join requests ===

    /// Invite `to` with the given access kind.
    async fn send_join_request(
        &self,
        caller: Address,
        to: Address,
        kind: RequestKind,
    ) -> Result<RegistryEvent, ServiceError>;

    /// Invite `to` as a full co-holder.
    async fn send_nonfractional_request(
        &self,
        caller: Address,
        to: Address,
    ) -> Result<RegistryEvent, ServiceError> {
        self.send_join_request(caller, to, RequestKind::NonFractional)
            .await
    }

    /// Invite `to` as a partial holder.
    async fn send_fractional_request(
        &self,
        caller: Address,
        to: Address,
    ) -> Result<RegistryEvent, ServiceError> {
        self.send_join_request(caller, to, RequestKind::Fractional)
            .await
    }

    /// Confirm the invitation addressed to `caller`.
    async fn confirm_request(&self, caller: Address) -> Result<RegistryEvent, ServiceError>;

    /// Reject the invitation `from` sent to `caller`.
    async fn reject_request(
        &self,
        caller: Address,
        from: Address,
    ) -> Result<RegistryEvent, ServiceError>;

    // === Reads ===

    /// Product configuration.
    async fn subscription_data(&self) -> RegistryConfig;

    /// Total successful subscribe calls.
    async fn subscribers(&self) -> u64;

    /// Total successful cancel calls.
    async fn cancellations(&self) -> u64;

    /// Membership record for `account`.
    async fn membership(&self, account: Address) -> Option<Membership>;

    /// Whether `account` holds an active membership.
    async fn is_subscribed(&self, account: Address) -> bool;

    /// Invitation addressed to `invitee`.
    async fn pending_request(&self, invitee: Address) -> Option<Invitation>;

    /// Whether an invitation exists for `invitee`.
    async fn request_sent(&self, invitee: Address) -> bool;

    /// Access `account` currently has.
    async fn access_scope(&self, account: Address) -> Option<AccessScope>;
}
