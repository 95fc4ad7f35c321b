//! # Event Bus Module
//!
//! Publish/subscribe distribution of editor events to hosts and rendering
//! surfaces:
//! - Publishers emit typed events without knowing subscribers
//! - Subscribers filter by category and receive events of interest
//! - Polling receivers are available for async hosts
//!
//! ## Usage
//!
//! ```rust,ignore
//! use annotkit_core::event_bus::{DocumentEvent, EditorEvent, EventBus, EventCategory, EventFilter};
//!
//! let bus = EventBus::new();
//! let subscription = bus.subscribe(
//!     EventFilter::Categories(vec![EventCategory::Document]),
//!     |event| {
//!         if let EditorEvent::Document(DocumentEvent::RegionChanged { page, rect }) = event {
//!             println!("redraw page {} at {:?}", page, rect);
//!         }
//!     },
//! );
//!
//! bus.unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
