//! Event bus implementation.
//!
//! Each tool manager owns its own bus; there is no process-wide instance,
//! so several documents can be edited side by side.

use parking_lot::RwLock;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::broadcast;
use uuid::Uuid;

use super::events::{EditorEvent, EventCategory};

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
    }
}

/// Which events a subscriber receives
#[derive(Debug, Clone, Default)]
pub enum EventFilter {
    /// Every event.
    #[default]
    All,
    /// Events in any of these categories.
    Categories(Vec<EventCategory>),
}

impl EventFilter {
    pub fn matches(&self, event: &EditorEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Categories(categories) => categories.contains(&event.category()),
        }
    }
}

type EventHandler = Box<dyn Fn(EditorEvent) + Send + Sync>;

/// Configuration for the event bus
#[derive(Debug, Clone)]
pub struct EventBusConfig {
    /// Capacity of the broadcast channel used by polling receivers.
    pub channel_capacity: usize,
    /// Keep recently published events for inspection.
    pub enable_history: bool,
    /// Maximum number of retained events.
    pub max_history_size: usize,
    /// Age after which retained events are dropped.
    pub history_retention: Duration,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 256,
            enable_history: false,
            max_history_size: 500,
            history_retention: Duration::from_secs(120),
        }
    }
}

#[derive(Debug, Clone)]
struct RetainedEvent {
    event: EditorEvent,
    at: Instant,
}

/// Error types for event bus operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum EventBusError {
    /// Nobody is listening
    #[error("No active subscribers")]
    NoSubscribers,
}

/// Distributes editor events to handlers and polling receivers
pub struct EventBus {
    sender: broadcast::Sender<EditorEvent>,
    handlers: Arc<RwLock<HashMap<SubscriptionId, (EventFilter, EventHandler)>>>,
    history: Arc<RwLock<VecDeque<RetainedEvent>>>,
    config: EventBusConfig,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_config(EventBusConfig::default())
    }

    pub fn with_config(config: EventBusConfig) -> Self {
        let (sender, _) = broadcast::channel(config.channel_capacity.max(1));
        Self {
            sender,
            handlers: Arc::new(RwLock::new(HashMap::new())),
            history: Arc::new(RwLock::new(VecDeque::new())),
            config,
        }
    }

    /// Publish an event to all subscribers
    ///
    /// Handlers run synchronously on the calling thread before the event is
    /// forwarded to polling receivers. Returns the number of polling
    /// receivers reached.
    pub fn publish(&self, event: EditorEvent) -> Result<usize, EventBusError> {
        if self.config.enable_history {
            self.retain(&event);
        }

        let handlers = self.handlers.read();
        for (filter, handler) in handlers.values() {
            if filter.matches(&event) {
                handler(event.clone());
            }
        }

        match self.sender.send(event) {
            Ok(count) => Ok(count),
            Err(_) if handlers.is_empty() => Err(EventBusError::NoSubscribers),
            Err(_) => Ok(0),
        }
    }

    /// Publish, treating "no subscribers" as success.
    ///
    /// Editing code uses this: an unobserved editor is not an error.
    pub fn emit(&self, event: EditorEvent) {
        let description = event.description();
        match self.publish(event) {
            Ok(receivers) => tracing::trace!("event: {} ({} receivers)", description, receivers),
            Err(EventBusError::NoSubscribers) => tracing::trace!("event: {} (unobserved)", description),
        }
    }

    /// Register a synchronous handler
    ///
    /// The handler runs on the publishing thread and must not publish on
    /// the same bus.
    pub fn subscribe<F>(&self, filter: EventFilter, handler: F) -> SubscriptionId
    where
        F: Fn(EditorEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId::new();
        self.handlers.write().insert(id, (filter, Box::new(handler)));
        tracing::debug!("Subscription {} added", id);
        id
    }

    /// Receiver for polling events, e.g. from a tokio task
    pub fn receiver(&self) -> broadcast::Receiver<EditorEvent> {
        self.sender.subscribe()
    }

    /// Returns true if the subscription existed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.handlers.write().remove(&id).is_some();
        if removed {
            tracing::debug!("Subscription {} removed", id);
        }
        removed
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.read().len()
    }

    /// Retained events since `since`, or all of them. Empty when history
    /// is disabled.
    pub fn history(&self, since: Option<Instant>) -> Vec<EditorEvent> {
        if !self.config.enable_history {
            return Vec::new();
        }

        self.history
            .read()
            .iter()
            .filter(|e| since.is_none_or(|since| e.at >= since))
            .map(|e| e.event.clone())
            .collect()
    }

    pub fn clear_history(&self) {
        self.history.write().clear();
    }

    pub fn config(&self) -> &EventBusConfig {
        &self.config
    }

    fn retain(&self, event: &EditorEvent) {
        let mut history = self.history.write();
        let now = Instant::now();
        history.push_back(RetainedEvent {
            event: event.clone(),
            at: now,
        });

        let retention = self.config.history_retention;
        while history
            .front()
            .is_some_and(|e| now.duration_since(e.at) > retention)
        {
            history.pop_front();
        }
        while history.len() > self.config.max_history_size {
            history.pop_front();
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .field("config", &self.config)
            .finish()
    }
}
