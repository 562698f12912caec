//! Invitation lifecycle events.
//!
//! The actions fire an [`InvitationEvent`] after every successful create,
//! resolve, cleanup and purge. If no listeners are registered, they are
//! silently ignored.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use rosterly::register_event_listeners;
//! use rosterly::events::listeners::LoggingListener;
//!
//! fn main() {
//!     register_event_listeners(|registry| {
//!         registry.listen(LoggingListener::new());
//!     });
//! }
//! ```
//!
//! Implement [`Listener`] for custom handling, e.g. notifying the invitee.

mod event;
mod listener;
mod registry;

pub mod listeners;

pub use event::InvitationEvent;
pub use listener::Listener;
pub use registry::{EventRegistry, dispatch, has_listeners, register_event_listeners};
