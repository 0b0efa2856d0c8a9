//! # Membership Registry Service
//!
//! Async wrapper that serialises calls into the registry and publishes the
//! resulting events.
//!
//! - Every write holds the registry lock for the full transition.
//! - With `check_invariants`, a transition that breaks an invariant is
//!   rolled back to a checkpoint of the entries it touched and reported as
//!   `ServiceError::InvariantViolated`.
//! - Events are published after the lock is released; publication failures
//!   are logged and counted, the transition stays committed.

use crate::adapters::InMemoryEventPublisher;
use crate::config::ServiceConfig;
use crate::domain::entities::{AccessScope, Invitation, Membership, RegistryConfig, RequestKind};
use crate::domain::invariants::{check_all_invariants, InvariantCheckResult};
use crate::domain::registry::MembershipRegistry;
use crate::domain::value_objects::{Address, RenewalPeriod, U256};
use crate::errors::ServiceError;
use crate::events::{
    RegistryCommand, RegistryEvent, RegistryRequestPayload, RegistryResponsePayload,
};
use crate::ports::inbound::MembershipRegistryApi;
use crate::ports::outbound::EventPublisher;

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Statistics for the registry service.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServiceStats {
    /// Calls that committed.
    pub committed_calls: u64,
    /// Calls rejected by a business rule.
    pub rejected_calls: u64,
    /// Calls rolled back after an invariant check failed.
    pub rolled_back_calls: u64,
    /// Events delivered to the publisher.
    pub events_published: u64,
    /// Events the publisher refused.
    pub publish_failures: u64,
}

/// The registry service.
pub struct RegistryService<P: EventPublisher> {
    /// Service configuration.
    config: ServiceConfig,
    /// Registry state; the write lock serialises transitions.
    registry: Arc<RwLock<MembershipRegistry>>,
    /// Outbound event sink.
    publisher: Arc<P>,
    /// Service statistics.
    stats: Arc<RwLock<ServiceStats>>,
}

impl<P: EventPublisher> RegistryService<P> {
    /// Create a service around an existing registry.
    pub fn new(registry: MembershipRegistry, publisher: Arc<P>, config: ServiceConfig) -> Self {
        info!(
            name = %registry.subscription_data().name,
            owner = %registry.owner(),
            price = %registry.price(),
            "Membership registry service created"
        );
        Self {
            config,
            registry: Arc::new(RwLock::new(registry)),
            publisher,
            stats: Arc::new(RwLock::new(ServiceStats::default())),
        }
    }

    /// Current service statistics.
    pub async fn stats(&self) -> ServiceStats {
        self.stats.read().await.clone()
    }

    /// A copy of the full registry state.
    pub async fn snapshot(&self) -> MembershipRegistry {
        self.registry.read().await.clone()
    }

    /// Number of memberships currently active.
    pub async fn active_members(&self) -> usize {
        self.registry.read().await.active_members()
    }

    /// Handle a request payload from the execution environment.
    ///
    /// Never fails: rejections are reported inside the response.
    #[instrument(skip(self, payload), fields(correlation_id = %correlation_id))]
    pub async fn handle_request(
        &self,
        correlation_id: Uuid,
        payload: RegistryRequestPayload,
    ) -> RegistryResponsePayload {
        match self
            .execute_with_id(correlation_id, payload.caller, payload.command)
            .await
        {
            Ok(event) => RegistryResponsePayload::committed(event),
            Err(ServiceError::Registry(err)) => RegistryResponsePayload::rejected(&err),
            Err(err @ ServiceError::InvariantViolated(_)) => {
                RegistryResponsePayload::inconsistent(err.to_string())
            }
        }
    }

    /// Apply `command` on behalf of `caller`.
    pub async fn execute(
        &self,
        caller: Address,
        command: RegistryCommand,
    ) -> Result<RegistryEvent, ServiceError> {
        self.execute_with_id(Uuid::new_v4(), caller, command).await
    }

    #[instrument(
        skip(self, command),
        fields(correlation_id = %correlation_id, caller = %caller, op = command.name())
    )]
    async fn execute_with_id(
        &self,
        correlation_id: Uuid,
        caller: Address,
        command: RegistryCommand,
    ) -> Result<RegistryEvent, ServiceError> {
        let outcome = {
            let mut registry = self.registry.write().await;
            let checkpoint = self
                .config
                .check_invariants
                .then(|| registry.checkpoint(caller, &command));

            match registry.execute(caller, &command) {
                Err(err) => Err(ServiceError::from(err)),
                Ok(event) => match checkpoint {
                    Some(checkpoint) => match check_all_invariants(&registry) {
                        InvariantCheckResult::Valid => Ok(event),
                        InvariantCheckResult::Invalid(violations) => {
                            registry.rollback(checkpoint);
                            Err(ServiceError::InvariantViolated(violations))
                        }
                    },
                    None => Ok(event),
                },
            }
        };

        match &outcome {
            Ok(event) => {
                info!(topic = event.topic(), "Registry call committed");
                self.stats.write().await.committed_calls += 1;
                if self.config.publish_events {
                    self.publish(event).await;
                }
            }
            Err(ServiceError::Registry(err)) => {
                warn!(error_kind = err.kind(), account = %err.account(), "Registry call rejected");
                self.stats.write().await.rejected_calls += 1;
            }
            Err(ServiceError::InvariantViolated(violations)) => {
                error!(?violations, "Invariant violated, transition rolled back");
                self.stats.write().await.rolled_back_calls += 1;
            }
        }

        outcome
    }

    async fn publish(&self, event: &RegistryEvent) {
        match self.publisher.publish(event).await {
            Ok(()) => self.stats.write().await.events_published += 1,
            Err(e) => {
                warn!(error = %e, topic = event.topic(), "Failed to publish registry event");
                self.stats.write().await.publish_failures += 1;
            }
        }
    }
}

/// Create a service with an in-memory publisher, for tests.
///
/// Registry: `KeySubscription`, price 100, renewal period 600s.
#[must_use]
pub fn create_test_service(
    owner: Address,
) -> (RegistryService<InMemoryEventPublisher>, Arc<InMemoryEventPublisher>) {
    let registry = MembershipRegistry::new(
        "KeySubscription",
        U256::from(100),
        RenewalPeriod::from_secs(600),
        owner,
    );
    let publisher = Arc::new(InMemoryEventPublisher::new());
    let service = RegistryService::new(registry, Arc::clone(&publisher), ServiceConfig::default());
    (service, publisher)
}

// =============================================================================
// MembershipRegistryApi Implementation
// =============================================================================

#[async_trait]
impl<P: EventPublisher> MembershipRegistryApi for RegistryService<P> {
    async fn subscribe(&self, caller: Address) -> Result<RegistryEvent, ServiceError> {
        self.execute(caller, RegistryCommand::Subscribe).await
    }

    async fn cancel(&self, caller: Address) -> Result<RegistryEvent, ServiceError> {
        self.execute(caller, RegistryCommand::Cancel).await
    }

    async fn change_price(
        &self,
        caller: Address,
        new_price: U256,
    ) -> Result<RegistryEvent, ServiceError> {
        self.execute(caller, RegistryCommand::ChangePrice { new_price })
            .await
    }

    async fn send_join_request(
        &self,
        caller: Address,
        to: Address,
        kind: RequestKind,
    ) -> Result<RegistryEvent, ServiceError> {
        self.execute(caller, RegistryCommand::SendJoinRequest { to, kind })
            .await
    }

    async fn confirm_request(&self, caller: Address) -> Result<RegistryEvent, ServiceError> {
        self.execute(caller, RegistryCommand::ConfirmRequest).await
    }

    async fn reject_request(
        &self,
        caller: Address,
        from: Address,
    ) -> Result<RegistryEvent, ServiceError> {
        self.execute(caller, RegistryCommand::RejectRequest { from })
            .await
    }

    async fn subscription_data(&self) -> RegistryConfig {
        self.registry.read().await.subscription_data().clone()
    }

    async fn subscribers(&self) -> u64 {
        self.registry.read().await.subscribers()
    }

    async fn cancellations(&self) -> u64 {
        self.registry.read().await.cancellations()
    }

    async fn membership(&self, account: Address) -> Option<Membership> {
        let membership = self.registry.read().await.membership(&account).cloned();
        debug!(account = %account, found = membership.is_some(), "Membership lookup");
        membership
    }

    async fn is_subscribed(&self, account: Address) -> bool {
        self.registry.read().await.is_subscribed(&account)
    }

    async fn pending_request(&self, invitee: Address) -> Option<Invitation> {
        let request = self.registry.read().await.pending_request(&invitee).cloned();
        debug!(invitee = %invitee, found = request.is_some(), "Request lookup");
        request
    }

    async fn request_sent(&self, invitee: Address) -> bool {
        self.registry.read().await.request_sent(&invitee)
    }

    async fn access_scope(&self, account: Address) -> Option<AccessScope> {
        self.registry.read().await.access_scope(&account)
    }
}

// =============================================================================
// TESTS
// =============================================================================
