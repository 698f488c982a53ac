//! ZenTube Core Library
//!
//! This crate provides the settings-application engine for the ZenTube focus
//! extension's content script. It is environment-free: the browser DOM and
//! the extension storage area are reached only through the traits defined
//! here, so the whole engine runs under plain `cargo test`.
//!
//! # Architecture
//!
//! The engine keeps an in-memory mirror of the user's preference flags and
//! re-asserts the matching page state through a `PageDom` implementation
//! every time it is triggered — by the initial storage read, by a storage
//! change notification, or by a coalesced burst of DOM mutations.
//!
//! # Modules
//!
//! - `settings`: the preference record and its storage-key dispatch
//! - `page`: the `PageDom` seam between engine and hosting environment
//! - `rules`: selector table and the stateless visibility rules
//! - `engine`: the apply pass and the one-shot warning latch
//! - `watch`: mutation-burst coalescing for the DOM observer
//! - `outline`: in-memory page model and the page outline text format

pub mod engine;
pub mod outline;
pub mod page;
pub mod rules;
pub mod settings;
pub mod watch;

// Re-export commonly used types
pub use engine::Engine;
pub use outline::{MemoryPage, OutlineError};
pub use page::{PageDom, Visibility};
pub use settings::{SettingKey, Settings};
pub use watch::MutationCoalescer;
