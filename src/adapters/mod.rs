// Adapters layer: concrete implementations of the domain ports (storage, http, notifications).

pub mod http;
pub mod notify;
pub mod storage;

pub use http::HttpStorefront;
pub use notify::{CollectingNotifier, ConsoleNotifier, TracingNotifier};
pub use storage::{LocalStorage, MemoryStorage};
