//! Router mapping change events to cache invalidation

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::{CacheKey, ChangeFeed, InvalidationSink, QueryCache, ResourceType};

/// Lifecycle of one per-resource channel subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Unsubscribed,
    Subscribing,
    Subscribed,
    Unsubscribing,
}

/// Exponential backoff for resubscribing after a channel drop
#[derive(Debug, Clone, Copy)]
pub struct BackoffPolicy {
    pub base: Duration,
    pub cap: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(250),
            cap: Duration::from_secs(30),
        }
    }
}

impl BackoffPolicy {
    /// Delay before attempt `n` (1-based), doubling up to the cap
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base.saturating_mul(factor).min(self.cap)
    }
}

/// Configuration for the change notification router
#[derive(Debug, Clone, Copy, Default)]
pub struct RouterConfig {
    pub backoff: BackoffPolicy,
}

/// Routes backend change events to client-cache invalidation
///
/// One listener task per tracked resource. Any insert/update/delete stales
/// that resource's cache key, plus the dashboard statistics key for the
/// resources that feed the dashboard. Invalidation is idempotent, so no
/// cross-channel ordering is needed.
pub struct ChangeRouter;

impl ChangeRouter {
    /// Start listener tasks for `resources` and return their handle
    ///
    /// Must be called within a tokio runtime. Dropped channels are
    /// resubscribed with exponential backoff rather than left silently
    /// desynchronized.
    pub fn spawn(
        feed: Arc<dyn ChangeFeed>,
        cache: Arc<QueryCache>,
        resources: &[ResourceType],
        config: RouterConfig,
    ) -> RouterHandle {
        let active = Arc::new(AtomicBool::new(true));
        let states = Arc::new(RwLock::new(
            resources
                .iter()
                .map(|r| (*r, ChannelState::Unsubscribed))
                .collect::<HashMap<_, _>>(),
        ));

        let tasks = resources
            .iter()
            .map(|resource| {
                tokio::spawn(listen(
                    *resource,
                    Arc::clone(&feed),
                    Arc::clone(&cache),
                    Arc::clone(&active),
                    Arc::clone(&states),
                    config.backoff,
                ))
            })
            .collect();

        RouterHandle {
            active,
            tasks,
            states,
            cache,
        }
    }
}

fn set_state(
    states: &RwLock<HashMap<ResourceType, ChannelState>>,
    resource: ResourceType,
    state: ChannelState,
) {
    states.write().unwrap().insert(resource, state);
}

fn invalidate_for(cache: &QueryCache, resource: ResourceType) {
    cache.invalidate(CacheKey::Resource(resource));
    if resource.feeds_dashboard() {
        cache.invalidate(CacheKey::DashboardStats);
    }
}

async fn listen(
    resource: ResourceType,
    feed: Arc<dyn ChangeFeed>,
    cache: Arc<QueryCache>,
    active: Arc<AtomicBool>,
    states: Arc<RwLock<HashMap<ResourceType, ChannelState>>>,
    backoff: BackoffPolicy,
) {
    let mut attempt: u32 = 0;

    'resubscribe: loop {
        if !active.load(Ordering::Acquire) {
            break;
        }
        set_state(&states, resource, ChannelState::Subscribing);

        let mut rx = match feed.subscribe(resource).await {
            Ok(rx) => rx,
            Err(err) => {
                attempt += 1;
                let delay = backoff.delay(attempt);
                warn!(?resource, %err, attempt, ?delay, "subscribe failed, retrying");
                sleep(delay).await;
                continue 'resubscribe;
            }
        };
        set_state(&states, resource, ChannelState::Subscribed);
        debug!(?resource, "channel subscribed");

        loop {
            match rx.recv().await {
                Ok(event) => {
                    // Late events after teardown must not touch the cache.
                    if !active.load(Ordering::Acquire) {
                        break 'resubscribe;
                    }
                    attempt = 0;
                    debug!(?resource, change = ?event.change, "change event");
                    invalidate_for(&cache, resource);
                }
                Err(RecvError::Lagged(missed)) => {
                    // Missed events mean the cache is stale regardless.
                    warn!(?resource, missed, "receiver lagged, invalidating");
                    invalidate_for(&cache, resource);
                }
                Err(RecvError::Closed) => {
                    if !active.load(Ordering::Acquire) {
                        break 'resubscribe;
                    }
                    attempt += 1;
                    let delay = backoff.delay(attempt);
                    warn!(?resource, attempt, ?delay, "channel dropped, resubscribing");
                    sleep(delay).await;
                    continue 'resubscribe;
                }
            }
        }
    }

    set_state(&states, resource, ChannelState::Unsubscribed);
}

/// Handle over the router's listener tasks
pub struct RouterHandle {
    active: Arc<AtomicBool>,
    tasks: Vec<JoinHandle<()>>,
    states: Arc<RwLock<HashMap<ResourceType, ChannelState>>>,
    cache: Arc<QueryCache>,
}

impl RouterHandle {
    /// Current subscription state for one resource
    pub fn state(&self, resource: ResourceType) -> ChannelState {
        self.states
            .read()
            .unwrap()
            .get(&resource)
            .copied()
            .unwrap_or(ChannelState::Unsubscribed)
    }

    /// Whether the router is still routing events
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Tear down all subscriptions (component unmount)
    ///
    /// Immediate from the caller's perspective; any in-flight event after
    /// this point is ignored by the listeners.
    pub fn shutdown(self) {
        self.active.store(false, Ordering::Release);
        for (resource, state) in self.states.write().unwrap().iter_mut() {
            debug!(?resource, "unsubscribing");
            *state = ChannelState::Unsubscribed;
        }
        for task in &self.tasks {
            task.abort();
        }
        info!("change router shut down");
    }

    /// Tear down on authenticated-user change (logout or account switch)
    ///
    /// Clears the entire cache before unsubscribing so no data leaks into
    /// the next session on the same client.
    pub fn auth_changed(self) {
        self.cache.clear();
        info!("auth change: cache cleared");
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_to_cap() {
        let policy = BackoffPolicy {
            base: Duration::from_millis(100),
            cap: Duration::from_millis(500),
        };

        assert_eq!(policy.delay(1), Duration::from_millis(100));
        assert_eq!(policy.delay(2), Duration::from_millis(200));
        assert_eq!(policy.delay(3), Duration::from_millis(400));
        assert_eq!(policy.delay(4), Duration::from_millis(500));
        assert_eq!(policy.delay(10), Duration::from_millis(500));
    }

    #[test]
    fn test_dashboard_resources() {
        assert!(ResourceType::Animals.feeds_dashboard());
        assert!(ResourceType::Clients.feeds_dashboard());
        assert!(ResourceType::Consultations.feeds_dashboard());
        assert!(ResourceType::Appointments.feeds_dashboard());
        assert!(!ResourceType::Prescriptions.feeds_dashboard());
        assert!(!ResourceType::Vaccinations.feeds_dashboard());
        assert!(!ResourceType::Invoices.feeds_dashboard());
        assert!(!ResourceType::StockItems.feeds_dashboard());
    }
}
