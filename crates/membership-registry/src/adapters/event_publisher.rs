//! # Event Publisher Adapters
//!
//! `InMemoryEventPublisher` keeps every event for inspection (tests, embedding).
//! `TracingEventPublisher` writes each event to the log as JSON.

use crate::errors::PublishError;
use crate::events::RegistryEvent;
use crate::ports::outbound::EventPublisher;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use tracing::info;

// =============================================================================
// IN-MEMORY PUBLISHER
// =============================================================================

/// Records published events in order.
#[derive(Debug)]
pub struct InMemoryEventPublisher {
    events: Mutex<Vec<RegistryEvent>>,
    available: AtomicBool,
}

impl Default for InMemoryEventPublisher {
    fn default() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            available: AtomicBool::new(true),
        }
    }
}

impl InMemoryEventPublisher {
    /// Create an empty publisher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All events published so far.
    pub async fn events(&self) -> Vec<RegistryEvent> {
        self.events.lock().await.clone()
    }

    /// Events published under `topic`.
    pub async fn events_for(&self, topic: &str) -> Vec<RegistryEvent> {
        self.events
            .lock()
            .await
            .iter()
            .filter(|e| e.topic() == topic)
            .cloned()
            .collect()
    }

    /// Drop all recorded events.
    pub async fn clear(&self) {
        self.events.lock().await.clear();
    }

    /// Simulate the sink going down (`false`) or coming back (`true`).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventPublisher {
    async fn publish(&self, event: &RegistryEvent) -> Result<(), PublishError> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(PublishError::Unavailable("in-memory sink disabled".to_string()));
        }
        self.events.lock().await.push(event.clone());
        Ok(())
    }
}

// =============================================================================
// TRACING PUBLISHER
// =============================================================================

/// Logs every event at `info` under its topic.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventPublisher;

#[async_trait]
impl EventPublisher for TracingEventPublisher {
    async fn publish(&self, event: &RegistryEvent) -> Result<(), PublishError> {
        let payload =
            serde_json::to_string(event).map_err(|e| PublishError::Serialization(e.to_string()))?;
        info!(topic = event.topic(), %payload, "Registry event");
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Address;
    use crate::events::topics;

    fn cancelled(b: u8) -> RegistryEvent {
        RegistryEvent::Cancelled {
            account: Address::new([b; 20]),
        }
    }

    #[tokio::test]
    async fn test_in_memory_records_in_order() {
        let publisher = InMemoryEventPublisher::new();
        publisher.publish(&cancelled(1)).await.unwrap();
        publisher.publish(&cancelled(2)).await.unwrap();

        assert_eq!(publisher.events().await, vec![cancelled(1), cancelled(2)]);
        assert_eq!(publisher.events_for(topics::CANCELLED).await.len(), 2);
        assert!(publisher.events_for(topics::SUBSCRIBED).await.is_empty());

        publisher.clear().await;
        assert!(publisher.events().await.is_empty());
    }

    #[tokio::test]
    async fn test_in_memory_unavailable() {
        let publisher = InMemoryEventPublisher::new();
        publisher.set_available(false);
        assert!(matches!(
            publisher.publish(&cancelled(1)).await,
            Err(PublishError::Unavailable(_))
        ));
        assert!(publisher.events().await.is_empty());

        publisher.set_available(true);
        publisher.publish(&cancelled(1)).await.unwrap();
        assert_eq!(publisher.events().await.len(), 1);
    }

    #[tokio::test]
    async fn test_tracing_publisher() {
        assert!(TracingEventPublisher.publish(&cancelled(3)).await.is_ok());
    }
}
