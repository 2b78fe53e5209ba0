//! Client gallery: access-code login, viewing and downloading

use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

use super::auth::CredentialCheck;
use super::encode;
use crate::error::{GalleryError, Result};
use crate::state::store::CLIENT_AUTH_KEY;
use crate::state::{AccessCode, GalleryStore, PhotoRecord};

/// Bytes ready to be saved under the photo's original name
#[derive(Debug, Clone)]
pub struct Download {
    pub record_id: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Client side of the gallery pair
pub struct ClientGallery<S, C> {
    store: S,
    credentials: C,
    code: Option<AccessCode>,
    images: Vec<PhotoRecord>,
    /// Records whose download spinner is showing
    downloading: HashSet<String>,
}

impl<S: GalleryStore, C: CredentialCheck> ClientGallery<S, C> {
    pub fn new(store: S, credentials: C) -> Self {
        Self {
            store,
            credentials,
            code: None,
            images: Vec::new(),
            downloading: HashSet::new(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.code.is_some()
    }

    pub fn code(&self) -> Option<&AccessCode> {
        self.code.as_ref()
    }

    pub fn images(&self) -> &[PhotoRecord] {
        &self.images
    }

    /// Reopen the gallery saved at the last successful login
    pub fn restore(&mut self) -> Result<()> {
        let saved = self.store.get_flag(CLIENT_AUTH_KEY)?;
        if let Some(code) = saved.as_deref().and_then(AccessCode::parse) {
            info!("Restoring client session for {}", code);
            self.images = self.store.get_collection(&code)?;
            self.code = Some(code);
        }
        Ok(())
    }

    pub fn login(&mut self, input: &str) -> Result<()> {
        let code = match AccessCode::parse(input) {
            Some(code) if self.credentials.check_client_code(&code) => code,
            _ => {
                warn!("Rejected client access code");
                return Err(GalleryError::InvalidAccessCode);
            }
        };

        let images = self.store.get_collection(&code)?;
        self.store.set_flag(CLIENT_AUTH_KEY, code.as_str())?;

        info!("Client opened gallery {} ({} photos)", code, images.len());
        self.images = images;
        self.code = Some(code);
        Ok(())
    }

    pub fn logout(&mut self) -> Result<()> {
        self.store.clear_flag(CLIENT_AUTH_KEY)?;
        self.code = None;
        self.images.clear();
        self.downloading.clear();
        Ok(())
    }

    /// Read the collection for `code`; a code with no uploads is just empty
    pub fn load_gallery(&mut self, code: &AccessCode) -> Result<&[PhotoRecord]> {
        self.images = self.store.get_collection(code)?;
        Ok(&self.images)
    }

    /// Reload the current gallery, e.g. after the admin changed it
    pub fn refresh(&mut self) -> Result<()> {
        if let Some(code) = self.code.clone() {
            self.load_gallery(&code)?;
        }
        Ok(())
    }

    pub fn is_downloading(&self, record_id: &str) -> bool {
        self.downloading.contains(record_id)
    }

    /// Decode a photo for saving and mark it as downloading.
    ///
    /// The mark stays until `finish_download`, which the caller schedules
    /// after a fixed delay whatever happens to the save itself.
    pub fn begin_download(&mut self, record: &PhotoRecord) -> Result<Download> {
        self.downloading.insert(record.id.clone());

        let (_, bytes) = encode::decode_data_url(&record.encoded_data)?;
        Ok(Download {
            record_id: record.id.clone(),
            file_name: record.original_name.clone(),
            bytes,
        })
    }

    pub fn finish_download(&mut self, record_id: &str) {
        self.downloading.remove(record_id);
    }
}

impl Download {
    /// Write the photo to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, &self.bytes)?;
        info!("💾 Saved {} ({}) to {}", self.file_name, self.record_id, path.display());
        Ok(())
    }
}
