//! Change-event feed seam to the hosted realtime provider

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use tokio::sync::broadcast;

use super::{ChangeEvent, ResourceType};
use crate::types::ClinicResult;

/// Capacity of each per-resource broadcast channel
const CHANNEL_CAPACITY: usize = 64;

/// A stream of change events for the tracked tables
///
/// Implementations wrap the backend's realtime channels, one per resource
/// table, scoped to the authenticated tenant.
#[async_trait]
pub trait ChangeFeed: Send + Sync {
    /// Open a subscription for one resource's change events
    async fn subscribe(
        &self,
        resource: ResourceType,
    ) -> ClinicResult<broadcast::Receiver<ChangeEvent>>;
}

/// In-process change feed for tests and development
///
/// Events published here fan out to every subscriber of the matching
/// resource, in publish order per resource.
#[derive(Debug, Default)]
pub struct MemoryFeed {
    channels: RwLock<HashMap<ResourceType, broadcast::Sender<ChangeEvent>>>,
}

impl MemoryFeed {
    /// Create a feed with no channels yet
    pub fn new() -> Self {
        Self::default()
    }

    fn sender(&self, resource: ResourceType) -> broadcast::Sender<ChangeEvent> {
        self.channels
            .write()
            .unwrap()
            .entry(resource)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .clone()
    }

    /// Publish a change event to all subscribers of its resource
    ///
    /// Returns the number of subscribers that received it.
    pub fn publish(&self, event: ChangeEvent) -> usize {
        self.sender(event.resource).send(event).unwrap_or(0)
    }

    /// Drop a resource's channel, closing all its receivers
    ///
    /// Simulates the backend dropping a realtime channel so reconnect
    /// behavior can be exercised.
    pub fn drop_channel(&self, resource: ResourceType) {
        self.channels.write().unwrap().remove(&resource);
    }
}

#[async_trait]
impl ChangeFeed for MemoryFeed {
    async fn subscribe(
        &self,
        resource: ResourceType,
    ) -> ClinicResult<broadcast::Receiver<ChangeEvent>> {
        Ok(self.sender(resource).subscribe())
    }
}
