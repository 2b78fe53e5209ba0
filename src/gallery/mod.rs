//! The two gallery roles
//!
//! The admin writes photo collections under an access code, the client
//! reads the collection for the code it logged in with. They share nothing
//! but the store.

pub mod admin;
pub mod auth;
pub mod client;
pub mod encode;

pub use admin::AdminGallery;
pub use auth::FixedCredentials;
pub use client::{ClientGallery, Download};
