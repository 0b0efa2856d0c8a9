//! # Membership Registry
//!
//! The state struct and every transition. Each operation validates all of its
//! preconditions before touching state, so a returned error means nothing
//! changed.
//!
//! ```text
//! NeverSubscribed --subscribe--> Active --cancel--> Cancelled --subscribe--> Active ...
//! NoInvitation --send--> Pending --confirm--> Confirmed
//!                        Pending --reject---> NoInvitation
//! ```

use crate::domain::entities::{
    AccessScope, Invitation, Membership, RegistryConfig, RegistryCounters, RequestKind,
    RequestStatus,
};
use crate::domain::value_objects::{Address, RenewalPeriod, U256};
use crate::errors::RegistryError;
use crate::events::{RegistryCommand, RegistryEvent};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// All state owned by one subscription product.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipRegistry {
    config: RegistryConfig,
    memberships: HashMap<Address, Membership>,
    requests: HashMap<Address, Invitation>,
    counters: RegistryCounters,
}

impl MembershipRegistry {
    /// Creates an empty registry owned by `owner`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        price: U256,
        renewal_period: RenewalPeriod,
        owner: Address,
    ) -> Self {
        Self::with_config(RegistryConfig::new(name, price, renewal_period, owner))
    }

    /// Creates an empty registry from a prepared configuration.
    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            memberships: HashMap::new(),
            requests: HashMap::new(),
            counters: RegistryCounters::default(),
        }
    }

    // =========================================================================
    // MEMBERSHIP LIFECYCLE
    // =========================================================================

    /// Subscribes `caller` at the current price, creating or reactivating
    /// its membership.
    pub fn subscribe(&mut self, caller: Address) -> Result<RegistryEvent, RegistryError> {
        self.ensure_not_owner(caller)?;
        if self.is_subscribed(&caller) {
            return Err(RegistryError::MembershipAlreadyExists(caller));
        }

        let price = self.config.price;
        let resubscription = match self.memberships.get_mut(&caller) {
            Some(existing) => {
                existing.reactivate(price);
                true
            }
            None => {
                self.memberships.insert(caller, Membership::new(caller, price));
                false
            }
        };
        self.counters.subscribers += 1;

        Ok(RegistryEvent::Subscribed {
            account: caller,
            price,
            resubscription,
        })
    }

    /// Cancels the caller's active membership.
    pub fn cancel(&mut self, caller: Address) -> Result<RegistryEvent, RegistryError> {
        let membership = self
            .memberships
            .get_mut(&caller)
            .filter(|m| m.active)
            .ok_or(RegistryError::NoActiveMembership(caller))?;

        membership.deactivate();
        self.counters.cancellations += 1;

        Ok(RegistryEvent::Cancelled { account: caller })
    }

    /// Owner-only. Existing memberships keep their snapshotted price.
    pub fn change_price(
        &mut self,
        caller: Address,
        new_price: U256,
    ) -> Result<RegistryEvent, RegistryError> {
        if !self.config.is_owner(&caller) {
            return Err(RegistryError::OwnableUnauthorizedAccount(caller));
        }

        let old_price = std::mem::replace(&mut self.config.price, new_price);
        Ok(RegistryEvent::PriceChanged {
            old_price,
            new_price,
        })
    }

    // =========================================================================
    // JOIN REQUESTS
    // =========================================================================

    /// Invites `to` to share the caller's subscription.
    ///
    /// Checks, first failure wins: caller is owner, caller not active,
    /// invitee active, invitee is owner, invitation for `to` already exists.
    pub fn send_join_request(
        &mut self,
        caller: Address,
        to: Address,
        kind: RequestKind,
    ) -> Result<RegistryEvent, RegistryError> {
        self.ensure_not_owner(caller)?;
        if !self.is_subscribed(&caller) {
            return Err(RegistryError::NoActiveMembership(caller));
        }
        if self.is_subscribed(&to) {
            return Err(RegistryError::MembershipAlreadyExists(to));
        }
        self.ensure_not_owner(to)?;
        if self.requests.contains_key(&to) {
            return Err(RegistryError::RequestAlreadyExists(to));
        }

        self.requests.insert(to, Invitation::pending(caller, to, kind));
        Ok(RegistryEvent::JoinRequestSent {
            from: caller,
            to,
            kind,
        })
    }

    /// Non-fractional convenience wrapper around [`Self::send_join_request`].
    pub fn send_nonfractional_request(
        &mut self,
        caller: Address,
        to: Address,
    ) -> Result<RegistryEvent, RegistryError> {
        self.send_join_request(caller, to, RequestKind::NonFractional)
    }

    /// Fractional convenience wrapper around [`Self::send_join_request`].
    pub fn send_fractional_request(
        &mut self,
        caller: Address,
        to: Address,
    ) -> Result<RegistryEvent, RegistryError> {
        self.send_join_request(caller, to, RequestKind::Fractional)
    }

    /// Confirms the invitation addressed to `caller`.
    pub fn confirm_request(&mut self, caller: Address) -> Result<RegistryEvent, RegistryError> {
        let request = self
            .requests
            .get_mut(&caller)
            .ok_or(RegistryError::PotentialAccountOnly(caller))?;
        if request.is_confirmed() {
            return Err(RegistryError::RequestAlreadyConfirmed(caller));
        }

        request.status = RequestStatus::Confirmed;
        Ok(RegistryEvent::JoinRequestConfirmed {
            from: request.from_acct,
            to: caller,
            kind: request.kind,
        })
    }

    /// Rejects the pending invitation `from` sent to `caller`, removing it.
    pub fn reject_request(
        &mut self,
        caller: Address,
        from: Address,
    ) -> Result<RegistryEvent, RegistryError> {
        let matches = self
            .requests
            .get(&caller)
            .is_some_and(|r| r.from_acct == from && r.is_pending());
        if !matches {
            return Err(RegistryError::RequestDoesntExists(from));
        }

        self.requests.remove(&caller);
        Ok(RegistryEvent::JoinRequestRejected { from, to: caller })
    }

    /// Dispatches a [`RegistryCommand`] issued by `caller`.
    pub fn execute(
        &mut self,
        caller: Address,
        command: &RegistryCommand,
    ) -> Result<RegistryEvent, RegistryError> {
        match command {
            RegistryCommand::Subscribe => self.subscribe(caller),
            RegistryCommand::Cancel => self.cancel(caller),
            RegistryCommand::ChangePrice { new_price } => self.change_price(caller, *new_price),
            RegistryCommand::SendJoinRequest { to, kind } => {
                self.send_join_request(caller, *to, *kind)
            }
            RegistryCommand::ConfirmRequest => self.confirm_request(caller),
            RegistryCommand::RejectRequest { from } => self.reject_request(caller, *from),
        }
    }

    // =========================================================================
    // CHECKPOINTS
    // =========================================================================

    /// Captures the entries `command` issued by `caller` can touch.
    #[must_use]
    pub fn checkpoint(&self, caller: Address, command: &RegistryCommand) -> Checkpoint {
        let invitee = match command {
            RegistryCommand::SendJoinRequest { to, .. } => Some(*to),
            RegistryCommand::ConfirmRequest | RegistryCommand::RejectRequest { .. } => Some(caller),
            RegistryCommand::Subscribe
            | RegistryCommand::Cancel
            | RegistryCommand::ChangePrice { .. } => None,
        };

        Checkpoint {
            price: self.config.price,
            counters: self.counters,
            membership: (caller, self.memberships.get(&caller).cloned()),
            request: invitee.map(|to| (to, self.requests.get(&to).cloned())),
        }
    }

    /// Restores the entries captured by [`Self::checkpoint`].
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        self.config.price = checkpoint.price;
        self.counters = checkpoint.counters;

        let (account, membership) = checkpoint.membership;
        match membership {
            Some(m) => self.memberships.insert(account, m),
            None => self.memberships.remove(&account),
        };

        if let Some((to, request)) = checkpoint.request {
            match request {
                Some(r) => self.requests.insert(to, r),
                None => self.requests.remove(&to),
            };
        }
    }

    // =========================================================================
    // READS
    // =========================================================================

    /// Product configuration.
    #[must_use]
    pub fn subscription_data(&self) -> &RegistryConfig {
        &self.config
    }

    /// Owner account.
    #[must_use]
    pub fn owner(&self) -> Address {
        self.config.owner
    }

    /// Current price.
    #[must_use]
    pub fn price(&self) -> U256 {
        self.config.price
    }

    /// Total successful subscribe calls.
    #[must_use]
    pub fn subscribers(&self) -> u64 {
        self.counters.subscribers
    }

    /// Total successful cancel calls.
    #[must_use]
    pub fn cancellations(&self) -> u64 {
        self.counters.cancellations
    }

    /// Both counters.
    #[must_use]
    pub fn counters(&self) -> RegistryCounters {
        self.counters
    }

    /// Number of memberships currently active.
    #[must_use]
    pub fn active_members(&self) -> usize {
        self.memberships.values().filter(|m| m.active).count()
    }

    /// Membership record, if `account` ever subscribed.
    #[must_use]
    pub fn membership(&self, account: &Address) -> Option<&Membership> {
        self.memberships.get(account)
    }

    /// Returns true if `account` holds an active membership.
    #[must_use]
    pub fn is_subscribed(&self, account: &Address) -> bool {
        self.memberships.get(account).is_some_and(|m| m.active)
    }

    /// Invitation addressed to `invitee`, pending or confirmed.
    #[must_use]
    pub fn pending_request(&self, invitee: &Address) -> Option<&Invitation> {
        self.requests.get(invitee)
    }

    /// Returns true if an invitation record exists for `invitee`.
    #[must_use]
    pub fn request_sent(&self, invitee: &Address) -> bool {
        self.requests.contains_key(invitee)
    }

    /// Iterates all membership records.
    pub fn memberships(&self) -> impl Iterator<Item = (&Address, &Membership)> {
        self.memberships.iter()
    }

    /// Iterates all invitation records.
    pub fn requests(&self) -> impl Iterator<Item = (&Address, &Invitation)> {
        self.requests.iter()
    }

    /// Access `account` currently has to the subscription.
    ///
    /// Shared access lasts only while the inviter stays subscribed.
    #[must_use]
    pub fn access_scope(&self, account: &Address) -> Option<AccessScope> {
        if self.is_subscribed(account) {
            return Some(AccessScope::Full);
        }
        self.requests
            .get(account)
            .filter(|r| r.is_confirmed() && self.is_subscribed(&r.from_acct))
            .map(|r| r.kind.scope())
    }

    /// Returns true if `account` has any access.
    #[must_use]
    pub fn has_access(&self, account: &Address) -> bool {
        self.access_scope(account).is_some()
    }

    fn ensure_not_owner(&self, account: Address) -> Result<(), RegistryError> {
        if self.config.is_owner(&account) {
            Err(RegistryError::OwnerNotAllowed(account))
        } else {
            Ok(())
        }
    }
}

/// The registry entries one command may modify, taken before it runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Checkpoint {
    price: U256,
    counters: RegistryCounters,
    membership: (Address, Option<Membership>),
    request: Option<(Address, Option<Invitation>)>,
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: Address = Address::new([0xAA; 20]);
    const MAIN: Address = Address::new([0x01; 20]);
    const SUB: Address = Address::new([0x02; 20]);
    const OTHER: Address = Address::new([0x03; 20]);

    fn registry() -> MembershipRegistry {
        MembershipRegistry::new(
            "KeySubscription",
            U256::from(100),
            RenewalPeriod::from_secs(600),
            OWNER,
        )
    }

    // =========================================================================
    // CONFIG
    // =========================================================================

    #[test]
    fn test_new_registry_is_empty() {
        let reg = registry();
        assert_eq!(reg.subscribers(), 0);
        assert_eq!(reg.cancellations(), 0);
        assert_eq!(reg.subscription_data().name, "KeySubscription");
        assert_eq!(reg.price(), U256::from(100));
        assert_eq!(reg.subscription_data().renewal_period.as_secs(), 600);
        assert_eq!(reg.owner(), OWNER);
    }

    #[test]
    fn test_change_price_by_owner() {
        let mut reg = registry();
        let event = reg.change_price(OWNER, U256::from(200)).unwrap();
        assert_eq!(reg.price(), U256::from(200));
        assert_eq!(
            event,
            RegistryEvent::PriceChanged {
                old_price: U256::from(100),
                new_price: U256::from(200)
            }
        );
    }

    #[test]
    fn test_change_price_by_non_owner() {
        let mut reg = registry();
        assert_eq!(
            reg.change_price(MAIN, U256::from(200)),
            Err(RegistryError::OwnableUnauthorizedAccount(MAIN))
        );
        assert_eq!(reg.price(), U256::from(100));
    }

    // =========================================================================
    // SUBSCRIBE / CANCEL
    // =========================================================================

    #[test]
    fn test_subscribe() {
        let mut reg = registry();
        let event = reg.subscribe(MAIN).unwrap();

        assert_eq!(reg.subscribers(), 1);
        assert!(reg.is_subscribed(&MAIN));
        let m = reg.membership(&MAIN).unwrap();
        assert_eq!(m.main_acct, MAIN);
        assert_eq!(m.price, U256::from(100));
        assert!(!m.owned_previous_membership);
        assert!(matches!(
            event,
            RegistryEvent::Subscribed {
                resubscription: false,
                ..
            }
        ));
    }

    #[test]
    fn test_subscribe_twice_fails() {
        let mut reg = registry();
        reg.subscribe(MAIN).unwrap();
        assert_eq!(
            reg.subscribe(MAIN),
            Err(RegistryError::MembershipAlreadyExists(MAIN))
        );
        assert_eq!(reg.subscribers(), 1);
    }

    #[test]
    fn test_owner_cannot_subscribe() {
        let mut reg = registry();
        assert_eq!(reg.subscribe(OWNER), Err(RegistryError::OwnerNotAllowed(OWNER)));
        reg.subscribe(MAIN).unwrap();
        reg.change_price(OWNER, U256::from(5)).unwrap();
        assert_eq!(reg.subscribe(OWNER), Err(RegistryError::OwnerNotAllowed(OWNER)));
        assert!(reg.membership(&OWNER).is_none());
    }

    #[test]
    fn test_cancel() {
        let mut reg = registry();
        reg.subscribe(MAIN).unwrap();
        reg.cancel(MAIN).unwrap();

        let m = reg.membership(&MAIN).unwrap();
        assert!(!reg.is_subscribed(&MAIN));
        assert!(m.owned_previous_membership);
        assert_eq!(reg.cancellations(), 1);
        // subscriber count is a running total
        assert_eq!(reg.subscribers(), 1);
    }

    #[test]
    fn test_cancel_without_membership() {
        let mut reg = registry();
        assert_eq!(reg.cancel(MAIN), Err(RegistryError::NoActiveMembership(MAIN)));

        reg.subscribe(MAIN).unwrap();
        reg.cancel(MAIN).unwrap();
        assert_eq!(reg.cancel(MAIN), Err(RegistryError::NoActiveMembership(MAIN)));
        assert_eq!(reg.cancellations(), 1);
    }

    #[test]
    fn test_resubscribe_keeps_history() {
        let mut reg = registry();
        reg.subscribe(MAIN).unwrap();
        reg.cancel(MAIN).unwrap();
        reg.change_price(OWNER, U256::from(300)).unwrap();
        let event = reg.subscribe(MAIN).unwrap();

        let m = reg.membership(&MAIN).unwrap();
        assert!(m.active);
        assert!(m.owned_previous_membership);
        assert_eq!(m.price, U256::from(300));
        assert_eq!(reg.subscribers(), 2);
        assert!(matches!(
            event,
            RegistryEvent::Subscribed {
                resubscription: true,
                ..
            }
        ));
    }

    #[test]
    fn test_price_snapshot() {
        let mut reg = registry();
        reg.subscribe(MAIN).unwrap();
        reg.change_price(OWNER, U256::from(200)).unwrap();
        reg.subscribe(SUB).unwrap();

        assert_eq!(reg.membership(&MAIN).unwrap().price, U256::from(100));
        assert_eq!(reg.membership(&SUB).unwrap().price, U256::from(200));
    }

    #[test]
    fn test_active_members() {
        let mut reg = registry();
        reg.subscribe(MAIN).unwrap();
        reg.subscribe(SUB).unwrap();
        reg.cancel(MAIN).unwrap();
        assert_eq!(reg.active_members(), 1);
    }

    // =========================================================================
    // JOIN REQUESTS
    // =========================================================================

    #[test]
    fn test_send_join_request() {
        let mut reg = registry();
        reg.subscribe(MAIN).unwrap();
        reg.send_nonfractional_request(MAIN, SUB).unwrap();

        assert!(reg.request_sent(&SUB));
        let req = reg.pending_request(&SUB).unwrap();
        assert_eq!(req.from_acct, MAIN);
        assert_eq!(req.status, RequestStatus::Pending);
        assert!(!req.is_fractional());
    }

    #[test]
    fn test_send_fractional_request() {
        let mut reg = registry();
        reg.subscribe(MAIN).unwrap();
        reg.send_fractional_request(MAIN, SUB).unwrap();
        assert!(reg.pending_request(&SUB).unwrap().is_fractional());
    }

    #[test]
    fn test_send_request_to_active_member() {
        let mut reg = registry();
        reg.subscribe(MAIN).unwrap();
        assert_eq!(
            reg.send_nonfractional_request(MAIN, MAIN),
            Err(RegistryError::MembershipAlreadyExists(MAIN))
        );
    }

    #[test]
    fn test_send_request_twice() {
        let mut reg = registry();
        reg.subscribe(MAIN).unwrap();
        reg.subscribe(OTHER).unwrap();
        reg.send_nonfractional_request(MAIN, SUB).unwrap();

        assert_eq!(
            reg.send_nonfractional_request(MAIN, SUB),
            Err(RegistryError::RequestAlreadyExists(SUB))
        );
        assert_eq!(
            reg.send_fractional_request(OTHER, SUB),
            Err(RegistryError::RequestAlreadyExists(SUB))
        );
    }

    #[test]
    fn test_owner_cannot_send_request() {
        let mut reg = registry();
        assert_eq!(
            reg.send_nonfractional_request(OWNER, MAIN),
            Err(RegistryError::OwnerNotAllowed(OWNER))
        );
    }

    #[test]
    fn test_cannot_invite_owner() {
        let mut reg = registry();
        reg.subscribe(MAIN).unwrap();
        assert_eq!(
            reg.send_nonfractional_request(MAIN, OWNER),
            Err(RegistryError::OwnerNotAllowed(OWNER))
        );
    }

    #[test]
    fn test_inactive_member_cannot_send_request() {
        let mut reg = registry();
        assert_eq!(
            reg.send_nonfractional_request(MAIN, SUB),
            Err(RegistryError::NoActiveMembership(MAIN))
        );
        reg.subscribe(MAIN).unwrap();
        reg.cancel(MAIN).unwrap();
        assert_eq!(
            reg.send_nonfractional_request(MAIN, SUB),
            Err(RegistryError::NoActiveMembership(MAIN))
        );
        assert!(!reg.request_sent(&SUB));
    }

    #[test]
    fn test_confirm_request() {
        let mut reg = registry();
        reg.subscribe(MAIN).unwrap();
        reg.send_nonfractional_request(MAIN, SUB).unwrap();
        let event = reg.confirm_request(SUB).unwrap();

        assert!(reg.pending_request(&SUB).unwrap().is_confirmed());
        assert_eq!(
            event,
            RegistryEvent::JoinRequestConfirmed {
                from: MAIN,
                to: SUB,
                kind: RequestKind::NonFractional
            }
        );
    }

    #[test]
    fn test_confirm_by_wrong_account() {
        let mut reg = registry();
        reg.subscribe(MAIN).unwrap();
        reg.send_nonfractional_request(MAIN, SUB).unwrap();

        assert_eq!(
            reg.confirm_request(MAIN),
            Err(RegistryError::PotentialAccountOnly(MAIN))
        );
        assert!(reg.pending_request(&SUB).unwrap().is_pending());
    }

    #[test]
    fn test_confirm_twice() {
        let mut reg = registry();
        reg.subscribe(MAIN).unwrap();
        reg.send_nonfractional_request(MAIN, SUB).unwrap();
        reg.confirm_request(SUB).unwrap();
        assert_eq!(
            reg.confirm_request(SUB),
            Err(RegistryError::RequestAlreadyConfirmed(SUB))
        );
    }

    #[test]
    fn test_reject_request() {
        let mut reg = registry();
        reg.subscribe(MAIN).unwrap();
        reg.send_nonfractional_request(MAIN, SUB).unwrap();
        reg.reject_request(SUB, MAIN).unwrap();

        assert!(reg.pending_request(&SUB).is_none());
        assert!(!reg.request_sent(&SUB));

        // invitee can be invited again afterwards
        reg.send_fractional_request(MAIN, SUB).unwrap();
        assert!(reg.request_sent(&SUB));
    }

    #[test]
    fn test_reject_unknown_sender() {
        let mut reg = registry();
        reg.subscribe(MAIN).unwrap();
        reg.send_nonfractional_request(MAIN, SUB).unwrap();

        assert_eq!(
            reg.reject_request(SUB, OWNER),
            Err(RegistryError::RequestDoesntExists(OWNER))
        );
        assert!(reg.request_sent(&SUB));
    }

    #[test]
    fn test_reject_confirmed_request() {
        let mut reg = registry();
        reg.subscribe(MAIN).unwrap();
        reg.send_nonfractional_request(MAIN, SUB).unwrap();
        reg.confirm_request(SUB).unwrap();

        assert_eq!(
            reg.reject_request(SUB, MAIN),
            Err(RegistryError::RequestDoesntExists(MAIN))
        );
        assert!(reg.pending_request(&SUB).unwrap().is_confirmed());
    }

    #[test]
    fn test_execute_dispatch() {
        let mut reg = registry();
        reg.execute(MAIN, &RegistryCommand::Subscribe).unwrap();
        reg.execute(
            MAIN,
            &RegistryCommand::SendJoinRequest {
                to: SUB,
                kind: RequestKind::Fractional,
            },
        )
        .unwrap();
        reg.execute(SUB, &RegistryCommand::RejectRequest { from: MAIN })
            .unwrap();
        assert!(!reg.request_sent(&SUB));

        assert_eq!(
            reg.execute(MAIN, &RegistryCommand::ChangePrice { new_price: U256::one() }),
            Err(RegistryError::OwnableUnauthorizedAccount(MAIN))
        );
        reg.execute(MAIN, &RegistryCommand::Cancel).unwrap();
        assert_eq!(reg.cancellations(), 1);
    }

    // =========================================================================
    // ACCESS
    // =========================================================================

    #[test]
    fn test_access_scope() {
        let mut reg = registry();
        reg.subscribe(MAIN).unwrap();
        reg.send_nonfractional_request(MAIN, SUB).unwrap();
        reg.send_fractional_request(MAIN, OTHER).unwrap();

        assert_eq!(reg.access_scope(&MAIN), Some(AccessScope::Full));
        assert_eq!(reg.access_scope(&SUB), None);

        reg.confirm_request(SUB).unwrap();
        reg.confirm_request(OTHER).unwrap();
        assert_eq!(reg.access_scope(&SUB), Some(AccessScope::Full));
        assert_eq!(reg.access_scope(&OTHER), Some(AccessScope::Partial));
        assert!(!reg.is_subscribed(&SUB));
    }

    #[test]
    fn test_shared_access_ends_with_inviter() {
        let mut reg = registry();
        reg.subscribe(MAIN).unwrap();
        reg.send_nonfractional_request(MAIN, SUB).unwrap();
        reg.confirm_request(SUB).unwrap();
        assert!(reg.has_access(&SUB));

        reg.cancel(MAIN).unwrap();
        assert!(!reg.has_access(&SUB));
        assert!(!reg.has_access(&OWNER));
    }

    // =========================================================================
    // CHECKPOINTS & SNAPSHOTS
    // =========================================================================

    #[test]
    fn test_rollback_restores_every_command() {
        let mut base = registry();
        base.subscribe(MAIN).unwrap();
        base.subscribe(OTHER).unwrap();
        base.send_fractional_request(OTHER, SUB).unwrap();

        let cases = [
            (SUB, RegistryCommand::Subscribe),
            (MAIN, RegistryCommand::Cancel),
            (OWNER, RegistryCommand::ChangePrice { new_price: U256::from(7) }),
            (
                MAIN,
                RegistryCommand::SendJoinRequest {
                    to: Address::new([0x04; 20]),
                    kind: RequestKind::NonFractional,
                },
            ),
            (SUB, RegistryCommand::ConfirmRequest),
            (SUB, RegistryCommand::RejectRequest { from: OTHER }),
        ];

        for (caller, command) in cases {
            let mut reg = base.clone();
            let checkpoint = reg.checkpoint(caller, &command);
            reg.execute(caller, &command).unwrap();
            assert_ne!(reg, base, "{command:?} changed nothing");

            reg.rollback(checkpoint);
            assert_eq!(reg, base, "{command:?} not fully rolled back");
        }
    }

    #[test]
    fn test_resubscribe_rollback_keeps_history() {
        let mut reg = registry();
        reg.subscribe(MAIN).unwrap();
        reg.cancel(MAIN).unwrap();
        let before = reg.clone();

        let checkpoint = reg.checkpoint(MAIN, &RegistryCommand::Subscribe);
        reg.subscribe(MAIN).unwrap();
        reg.rollback(checkpoint);

        assert_eq!(reg, before);
        assert!(reg.membership(&MAIN).unwrap().owned_previous_membership);
    }

    #[test]
    fn test_json_snapshot_round_trip() {
        let mut reg = registry();
        reg.subscribe(MAIN).unwrap();
        reg.send_fractional_request(MAIN, SUB).unwrap();
        reg.confirm_request(SUB).unwrap();
        reg.send_nonfractional_request(MAIN, OTHER).unwrap();
        reg.change_price(OWNER, U256::from(250)).unwrap();

        let json = serde_json::to_string(&reg).unwrap();
        assert!(json.contains(&MAIN.to_hex()));

        let restored: MembershipRegistry = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, reg);
        assert_eq!(restored.access_scope(&SUB), Some(AccessScope::Partial));
    }
}
