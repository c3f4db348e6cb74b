//! # Item Quest Session
//!
//! The request/response session tracker: CRUD dispatch against the
//! configured API, single-slot request and response traces, one-time quest
//! credit per action kind, and the custom field registry whose values are
//! merged into outgoing item payloads.

pub mod demo;
pub mod fields;
pub mod quest;
pub mod session;
pub mod transport;

pub use demo::random_item;
pub use fields::CustomFieldRegistry;
pub use quest::{QuestTracker, XP_PER_QUEST};
pub use session::{items_from, no_json_body, ApiSession, ItemPatch, NewItem, GENERIC_FAILURE};
pub use transport::{HttpResponse, HttpTransport, Transport};
