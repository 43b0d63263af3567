//! DEL - DOM Event Listener
//!
//! Declarative event delegation over a `del_dom::Document`.
//!
//! Instead of one native listener per element, rules like
//! "on `click` for `div.item` under `<ul>`" are registered on a container.
//! The container gets a single native listener per canonical event; when an
//! event bubbles through it, the bubble path is walked and matching handlers
//! fire in order.
//!
//! # Example
//! ```rust,ignore
//! use del_delegate::{Delegator, Handler, Rules};
//!
//! let del = Delegator::new();
//! del.listen(&doc, &Rules::new()
//!     .rule("[mouseup mousedown] .my-elm", Handler::new(|ev| println!("{}", ev.event_type())))
//!     .rule("a", Handler::new(|_| false)));
//!
//! del.fire(&doc, &mut NativeEvent::new("click").with_target(link));
//! ```

mod config;
mod delegator;
mod dispatch;
mod error;
mod event;
mod handler;
mod registry;
pub mod rules;
pub mod selector;
pub mod taxonomy;

pub use config::Config;
pub use delegator::Delegator;
pub use dispatch::DispatchOutcome;
pub use error::RuleError;
pub use event::{DelegatedEvent, NormalizedEvent};
pub use handler::{Handler, Propagation};
pub use registry::Filter;
pub use rules::{RuleKey, Rules};
pub use selector::Selector;
pub use taxonomy::{Gate, Taxonomy};

pub use del_dom::{Document, ListenerId, NativeEvent, NodeId};
