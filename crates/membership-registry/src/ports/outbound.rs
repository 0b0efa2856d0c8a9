//! # Driven Ports (SPI - Outbound)
//!
//! Interfaces the registry service depends on.

use crate::errors::PublishError;
use crate::events::RegistryEvent;
use async_trait::async_trait;

// =============================================================================
// EVENT PUBLISHER
// =============================================================================

/// Sink for committed registry events.
///
/// Called after the transition is committed and the write lock released.
/// A failure here is reported but never undoes the transition.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish one event under its topic.
    async fn publish(&self, event: &RegistryEvent) -> Result<(), PublishError>;
}
