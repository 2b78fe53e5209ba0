//! Storage interface shared by the admin and client roles
//!
//! The store is a flat key/value space. Photo collections live under
//! `gallery_<CODE>` as JSON arrays, and two standalone session values
//! live under fixed keys.

use std::rc::Rc;

use super::data::{AccessCode, PhotoRecord};
use crate::error::Result;

/// Session key marking an authenticated admin (value `"true"`)
pub const ADMIN_AUTH_KEY: &str = "adminAuth";

/// Session key holding the code the client last authenticated with
pub const CLIENT_AUTH_KEY: &str = "clientGalleryAuth";

/// Prefix for per-code photo collections
pub const COLLECTION_PREFIX: &str = "gallery_";

/// Key under which a code's collection is stored
pub fn collection_key(code: &AccessCode) -> String {
    format!("{}{}", COLLECTION_PREFIX, code.as_str())
}

/// Persistent gallery storage
///
/// A missing collection is an empty one; there is no explicit create or
/// delete for collections. Every write replaces the whole list.
pub trait GalleryStore {
    /// Read the collection stored under `code` (empty if never written)
    fn get_collection(&self, code: &AccessCode) -> Result<Vec<PhotoRecord>>;

    /// Replace the collection stored under `code`
    fn put_collection(&self, code: &AccessCode, records: &[PhotoRecord]) -> Result<()>;

    fn get_flag(&self, key: &str) -> Result<Option<String>>;

    fn set_flag(&self, key: &str, value: &str) -> Result<()>;

    fn clear_flag(&self, key: &str) -> Result<()>;
}

impl<T: GalleryStore + ?Sized> GalleryStore for Rc<T> {
    fn get_collection(&self, code: &AccessCode) -> Result<Vec<PhotoRecord>> {
        (**self).get_collection(code)
    }

    fn put_collection(&self, code: &AccessCode, records: &[PhotoRecord]) -> Result<()> {
        (**self).put_collection(code, records)
    }

    fn get_flag(&self, key: &str) -> Result<Option<String>> {
        (**self).get_flag(key)
    }

    fn set_flag(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_flag(key, value)
    }

    fn clear_flag(&self, key: &str) -> Result<()> {
        (**self).clear_flag(key)
    }
}

impl<T: GalleryStore + ?Sized> GalleryStore for &T {
    fn get_collection(&self, code: &AccessCode) -> Result<Vec<PhotoRecord>> {
        (**self).get_collection(code)
    }

    fn put_collection(&self, code: &AccessCode, records: &[PhotoRecord]) -> Result<()> {
        (**self).put_collection(code, records)
    }

    fn get_flag(&self, key: &str) -> Result<Option<String>> {
        (**self).get_flag(key)
    }

    fn set_flag(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_flag(key, value)
    }

    fn clear_flag(&self, key: &str) -> Result<()> {
        (**self).clear_flag(key)
    }
}
