//! # Event Schema
//!
//! Events emitted by committed transitions, plus the request/response
//! payloads accepted by [`crate::service::RegistryService::handle_request`].
//!
//! Identity comes from the `caller` supplied by the execution environment,
//! never from a field inside the command.
//!
//! | Command | Event on success |
//! |---------|------------------|
//! | `Subscribe` | `Subscribed` |
//! | `Cancel` | `Cancelled` |
//! | `ChangePrice` | `PriceChanged` |
//! | `SendJoinRequest` | `JoinRequestSent` |
//! | `ConfirmRequest` | `JoinRequestConfirmed` |
//! | `RejectRequest` | `JoinRequestRejected` |

use crate::domain::entities::RequestKind;
use crate::domain::value_objects::{Address, U256};
use crate::errors::RegistryError;
use serde::{Deserialize, Serialize};

// =============================================================================
// DOMAIN EVENTS
// =============================================================================

/// A committed state change. Failed calls produce no event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RegistryEvent {
    /// Account subscribed or re-subscribed.
    Subscribed {
        /// Subscribing account.
        account: Address,
        /// Price snapshotted into the membership.
        price: U256,
        /// True when an existing cancelled membership was reactivated.
        resubscription: bool,
    },
    /// Account cancelled its membership.
    Cancelled {
        /// Cancelling account.
        account: Address,
    },
    /// Owner changed the price.
    PriceChanged {
        /// Previous price.
        old_price: U256,
        /// New price.
        new_price: U256,
    },
    /// A member invited another account.
    JoinRequestSent {
        /// Inviter.
        from: Address,
        /// Invitee.
        to: Address,
        /// Requested access.
        kind: RequestKind,
    },
    /// The invitee accepted.
    JoinRequestConfirmed {
        /// Inviter.
        from: Address,
        /// Invitee.
        to: Address,
        /// Granted access.
        kind: RequestKind,
    },
    /// The invitee declined; the invitation was removed.
    JoinRequestRejected {
        /// Inviter.
        from: Address,
        /// Invitee.
        to: Address,
    },
}

impl RegistryEvent {
    /// Topic this event is published under.
    #[must_use]
    pub fn topic(&self) -> &'static str {
        match self {
            Self::Subscribed { .. } => topics::SUBSCRIBED,
            Self::Cancelled { .. } => topics::CANCELLED,
            Self::PriceChanged { .. } => topics::PRICE_CHANGED,
            Self::JoinRequestSent { .. } => topics::JOIN_REQUEST_SENT,
            Self::JoinRequestConfirmed { .. } => topics::JOIN_REQUEST_CONFIRMED,
            Self::JoinRequestRejected { .. } => topics::JOIN_REQUEST_REJECTED,
        }
    }
}

// =============================================================================
// REQUEST / RESPONSE PAYLOADS
// =============================================================================

/// A mutating operation, without the caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RegistryCommand {
    /// Subscribe the caller.
    Subscribe,
    /// Cancel the caller's membership.
    Cancel,
    /// Owner-only price change.
    ChangePrice {
        /// Price for future subscribers.
        new_price: U256,
    },
    /// Invite `to`.
    SendJoinRequest {
        /// Invitee.
        to: Address,
        /// Requested access.
        #[serde(default)]
        kind: RequestKind,
    },
    /// Confirm the invitation addressed to the caller.
    ConfirmRequest,
    /// Reject the invitation `from` sent to the caller.
    RejectRequest {
        /// Inviter.
        from: Address,
    },
}

impl RegistryCommand {
    /// Operation name for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Subscribe => "subscribe",
            Self::Cancel => "cancel",
            Self::ChangePrice { .. } => "change_price",
            Self::SendJoinRequest { .. } => "send_join_request",
            Self::ConfirmRequest => "confirm_request",
            Self::RejectRequest { .. } => "reject_request",
        }
    }
}

/// An authenticated call into the registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryRequestPayload {
    /// Authenticated caller supplied by the execution environment.
    pub caller: Address,
    /// What to do.
    pub command: RegistryCommand,
}

/// Outcome of a [`RegistryRequestPayload`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryResponsePayload {
    /// Whether the call committed.
    pub success: bool,
    /// Event produced on success.
    pub event: Option<RegistryEvent>,
    /// Error name on failure (e.g. `MembershipAlreadyExists`).
    pub error_kind: Option<String>,
    /// Account named by the error.
    pub error_account: Option<Address>,
    /// Human-readable failure message.
    pub error_message: Option<String>,
}

impl RegistryResponsePayload {
    /// A committed call.
    #[must_use]
    pub fn committed(event: RegistryEvent) -> Self {
        Self {
            success: true,
            event: Some(event),
            error_kind: None,
            error_account: None,
            error_message: None,
        }
    }

    /// A rejected call.
    #[must_use]
    pub fn rejected(err: &RegistryError) -> Self {
        Self {
            success: false,
            event: None,
            error_kind: Some(err.kind().to_string()),
            error_account: Some(err.account()),
            error_message: Some(err.to_string()),
        }
    }

    /// A call that committed but failed the post-commit invariant check.
    #[must_use]
    pub fn inconsistent(message: String) -> Self {
        Self {
            success: false,
            event: None,
            error_kind: Some("InvariantViolated".to_string()),
            error_account: None,
            error_message: Some(message),
        }
    }
}

// =============================================================================
// EVENT BUS TOPICS
// =============================================================================

/// Topic names for published events.
pub mod topics {
    /// Subscribe and re-subscribe.
    pub const SUBSCRIBED: &str = "registry.membership.subscribed";
    /// Cancel.
    pub const CANCELLED: &str = "registry.membership.cancelled";
    /// Price change.
    pub const PRICE_CHANGED: &str = "registry.config.price_changed";
    /// Invitation sent.
    pub const JOIN_REQUEST_SENT: &str = "registry.request.sent";
    /// Invitation confirmed.
    pub const JOIN_REQUEST_CONFIRMED: &str = "registry.request.confirmed";
    /// Invitation rejected.
    pub const JOIN_REQUEST_REJECTED: &str = "registry.request.rejected";
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_topics() {
        let a = Address::new([1u8; 20]);
        assert_eq!(RegistryEvent::Cancelled { account: a }.topic(), topics::CANCELLED);
        assert_eq!(
            RegistryEvent::JoinRequestRejected { from: a, to: a }.topic(),
            topics::JOIN_REQUEST_REJECTED
        );
    }

    #[test]
    fn test_event_json_is_tagged() {
        let event = RegistryEvent::Cancelled {
            account: Address::new([2u8; 20]),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "cancelled");
    }

    #[test]
    fn test_command_kind_defaults_to_non_fractional() {
        let to = Address::new([5u8; 20]);
        let mut json = serde_json::to_value(RegistryCommand::SendJoinRequest {
            to,
            kind: RequestKind::Fractional,
        })
        .unwrap();
        json.as_object_mut().unwrap().remove("kind");

        let cmd: RegistryCommand = serde_json::from_value(json).unwrap();
        assert_eq!(
            cmd,
            RegistryCommand::SendJoinRequest {
                to,
                kind: RequestKind::NonFractional
            }
        );
    }

    #[test]
    fn test_rejected_payload() {
        let who = Address::new([4u8; 20]);
        let resp = RegistryResponsePayload::rejected(&RegistryError::RequestAlreadyExists(who));
        assert!(!resp.success);
        assert_eq!(resp.error_kind.as_deref(), Some("RequestAlreadyExists"));
        assert_eq!(resp.error_account, Some(who));
        assert!(resp.event.is_none());
    }
}
