//! State management module
//!
//! This module handles all persisted gallery state:
//! - Shared data structures (data.rs)
//! - The storage interface and key layout (store.rs)
//! - The SQLite-backed store (library.rs)

pub mod data;
pub mod library;
pub mod store;

pub use data::{AccessCode, PhotoRecord};
pub use library::Library;
pub use store::GalleryStore;
