//! Admin portal: password login, uploads and the overview of all galleries

use std::path::PathBuf;
use tracing::{error, info, warn};

use super::auth::CredentialCheck;
use super::encode::{self, EncodedBatch, EncodedFile};
use crate::error::{GalleryError, Result};
use crate::state::store::ADMIN_AUTH_KEY;
use crate::state::{AccessCode, GalleryStore, PhotoRecord};

/// What happened to one upload batch
///
/// `uploaded` holds every record that reached the store. When `failure` is
/// set the batch stopped early and those records were kept anyway.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadReport {
    pub uploaded: Vec<PhotoRecord>,
    pub failure: Option<String>,
}

impl UploadReport {
    pub fn success_message(&self) -> String {
        format!("Successfully uploaded {} photo(s)!", self.uploaded.len())
    }
}

/// Admin side of the gallery pair
///
/// Uploads accept any code string. The overview only reads the codes in
/// `aggregate_codes`, which is a separate list from the client allow-list.
pub struct AdminGallery<S, C> {
    store: S,
    credentials: C,
    aggregate_codes: Vec<AccessCode>,
    authenticated: bool,
    /// Overview list, concatenated per code in `aggregate_codes` order
    images: Vec<PhotoRecord>,
}

impl<S: GalleryStore, C: CredentialCheck> AdminGallery<S, C> {
    pub fn new(store: S, credentials: C, aggregate_codes: &[String]) -> Self {
        Self {
            store,
            credentials,
            aggregate_codes: aggregate_codes
                .iter()
                .filter_map(|code| AccessCode::parse(code))
                .collect(),
            authenticated: false,
            images: Vec::new(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn images(&self) -> &[PhotoRecord] {
        &self.images
    }

    /// Pick up a persisted session without asking for the password again
    pub fn restore(&mut self) -> Result<()> {
        if self.store.get_flag(ADMIN_AUTH_KEY)?.as_deref() == Some("true") {
            info!("Restoring admin session");
            self.images = self.collect_all()?;
            self.authenticated = true;
        }
        Ok(())
    }

    pub fn login(&mut self, password: &str) -> Result<()> {
        if !self.credentials.check_admin_password(password) {
            warn!("Rejected admin login");
            return Err(GalleryError::InvalidPassword);
        }

        // Nothing is committed until the overview has loaded
        let images = self.collect_all()?;
        self.store.set_flag(ADMIN_AUTH_KEY, "true")?;

        self.images = images;
        self.authenticated = true;
        info!("Admin logged in");
        Ok(())
    }

    pub fn logout(&mut self) -> Result<()> {
        self.store.clear_flag(ADMIN_AUTH_KEY)?;
        self.authenticated = false;
        self.images.clear();
        info!("Admin logged out");
        Ok(())
    }

    /// Rebuild the overview from the fixed list of known codes.
    /// Collections under other codes stay invisible here.
    pub fn load_all(&mut self) -> Result<()> {
        self.images = self.collect_all()?;
        Ok(())
    }

    fn collect_all(&self) -> Result<Vec<PhotoRecord>> {
        let mut all = Vec::new();
        for code in &self.aggregate_codes {
            all.extend(self.store.get_collection(code)?);
        }

        info!("Loaded {} photos across {} galleries", all.len(), self.aggregate_codes.len());
        Ok(all)
    }

    /// Check the upload form before any file is touched
    pub fn validate_upload(&self, code: &str, file_count: usize) -> Result<AccessCode> {
        if !self.authenticated {
            return Err(GalleryError::NotAuthenticated);
        }

        match AccessCode::parse(code) {
            Some(code) if file_count > 0 => Ok(code),
            _ => Err(GalleryError::MissingUploadInput),
        }
    }

    /// Validate, encode and store `files` in order on the calling thread.
    ///
    /// Only form validation is an `Err`; encoding or storage trouble ends
    /// up in the report's `failure`.
    pub fn upload(&mut self, code: &str, files: &[PathBuf]) -> Result<UploadReport> {
        let code = self.validate_upload(code, files.len())?;
        let batch = encode::encode_batch(files);
        Ok(self.store_batch(&code, batch))
    }

    /// Persist an encoded batch under `code`, one record at a time.
    ///
    /// Records are written as they go, so when a later file failed to encode
    /// or store the earlier ones stay uploaded.
    pub fn store_batch(&mut self, code: &AccessCode, batch: EncodedBatch) -> UploadReport {
        let mut report = UploadReport {
            uploaded: Vec::with_capacity(batch.files.len()),
            failure: None,
        };

        for file in batch.files {
            match self.append(code, file) {
                Ok(record) => report.uploaded.push(record),
                Err(e) => {
                    error!("Failed to store upload: {}", e);
                    report.failure = Some(e.to_string());
                    return report;
                }
            }
        }

        report.failure = batch.failure;
        if report.failure.is_none() {
            info!("✅ Uploaded {} photo(s) to {}", report.uploaded.len(), code);
        }
        report
    }

    /// Store one already-encoded file under `code`
    pub fn append(&mut self, code: &AccessCode, file: EncodedFile) -> Result<PhotoRecord> {
        if !self.authenticated {
            return Err(GalleryError::NotAuthenticated);
        }

        let record = PhotoRecord::new(code, &file.name, file.data_url);

        let mut collection = self.store.get_collection(code)?;
        collection.push(record.clone());
        self.store.put_collection(code, &collection)?;

        self.images.push(record.clone());
        Ok(record)
    }

    /// Remove a photo from the gallery it was uploaded to.
    ///
    /// Callers confirm with the user first. Returns whether anything was
    /// removed; deleting an id that is already gone changes nothing.
    pub fn delete(&mut self, record_id: &str, code: &str) -> Result<bool> {
        if !self.authenticated {
            return Err(GalleryError::NotAuthenticated);
        }

        let Some(code) = AccessCode::parse(code) else {
            return Ok(false);
        };

        let mut collection = self.store.get_collection(&code)?;
        let before = collection.len();
        collection.retain(|record| record.id != record_id);
        let removed = collection.len() != before;

        if removed {
            self.store.put_collection(&code, &collection)?;
            info!("🗑️  Deleted {} from {}", record_id, code);
        }

        self.images.retain(|record| record.id != record_id);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StudioConfig;
    use crate::gallery::auth::FixedCredentials;
    use crate::state::Library;
    use std::path::Path;

    fn admin(library: &Library) -> AdminGallery<&Library, FixedCredentials> {
        let config = StudioConfig::default();
        AdminGallery::new(
            library,
            FixedCredentials::from_config(&config),
            &config.aggregate_codes,
        )
    }

    fn write_images(dir: &Path, names: &[&str]) -> Vec<PathBuf> {
        names
            .iter()
            .map(|name| {
                let path = dir.join(name);
                std::fs::write(&path, name.as_bytes()).unwrap();
                path
            })
            .collect()
    }

    #[test]
    fn test_login_sets_flag() {
        let library = Library::open_in_memory().unwrap();
        let mut admin = admin(&library);

        admin.login("admin123").unwrap();
        assert!(admin.is_authenticated());
        assert_eq!(library.get_flag(ADMIN_AUTH_KEY).unwrap().as_deref(), Some("true"));
    }

    #[test]
    fn test_wrong_password_leaves_state_alone() {
        let library = Library::open_in_memory().unwrap();
        let mut admin = admin(&library);

        let err = admin.login("hunter2").unwrap_err();
        assert!(matches!(err, GalleryError::InvalidPassword));
        assert!(!admin.is_authenticated());
        assert_eq!(library.get_flag(ADMIN_AUTH_KEY).unwrap(), None);
    }

    #[test]
    fn test_restore_and_logout() {
        let library = Library::open_in_memory().unwrap();
        admin(&library).login("admin123").unwrap();

        let mut reloaded = admin(&library);
        reloaded.restore().unwrap();
        assert!(reloaded.is_authenticated());

        reloaded.logout().unwrap();
        assert!(!reloaded.is_authenticated());

        let mut again = admin(&library);
        again.restore().unwrap();
        assert!(!again.is_authenticated());
    }

    #[test]
    fn test_upload_validation() {
        let dir = tempfile::tempdir().unwrap();
        let files = write_images(dir.path(), &["a.jpg"]);
        let library = Library::open_in_memory().unwrap();
        let mut admin = admin(&library);

        assert!(matches!(
            admin.upload("EVENT2024", &files),
            Err(GalleryError::NotAuthenticated)
        ));

        admin.login("admin123").unwrap();
        assert!(matches!(admin.upload("", &files), Err(GalleryError::MissingUploadInput)));
        assert!(matches!(admin.upload("EVENT2024", &[]), Err(GalleryError::MissingUploadInput)));
        assert!(admin.images().is_empty());

        // A blank but non-empty code is its own bucket
        let report = admin.upload("  ", &files).unwrap();
        assert_eq!(report.uploaded[0].owner_code, "  ");
        let blank = AccessCode::parse("  ").unwrap();
        assert_eq!(library.get_collection(&blank).unwrap().len(), 1);
    }

    #[test]
    fn test_upload_keeps_order_and_uppercases_code() {
        let dir = tempfile::tempdir().unwrap();
        let files = write_images(dir.path(), &["f1.jpg", "f2.png"]);
        let library = Library::open_in_memory().unwrap();
        let mut admin = admin(&library);
        admin.login("admin123").unwrap();

        let report = admin.upload("wedding2024", &files).unwrap();
        assert_eq!(report.failure, None);
        assert_eq!(report.uploaded.len(), 2);
        assert_eq!(report.success_message(), "Successfully uploaded 2 photo(s)!");

        let code = AccessCode::parse("WEDDING2024").unwrap();
        let stored = library.get_collection(&code).unwrap();
        let names: Vec<&str> = stored.iter().map(|r| r.original_name.as_str()).collect();
        assert_eq!(names, vec!["f1.jpg", "f2.png"]);
        assert!(stored.iter().all(|r| r.owner_code == "WEDDING2024"));
        assert_eq!(admin.images(), stored.as_slice());
    }

    #[test]
    fn test_upload_appends_to_existing() {
        let dir = tempfile::tempdir().unwrap();
        let files = write_images(dir.path(), &["a.jpg", "b.jpg"]);
        let library = Library::open_in_memory().unwrap();
        let mut admin = admin(&library);
        admin.login("admin123").unwrap();

        admin.upload("EVENT2024", &files[..1]).unwrap();
        admin.upload("EVENT2024", &files[1..]).unwrap();

        let stored = library.get_collection(&AccessCode::parse("EVENT2024").unwrap()).unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[1].original_name, "b.jpg");
    }

    #[test]
    fn test_partial_upload_is_not_rolled_back() {
        let dir = tempfile::tempdir().unwrap();
        let mut files = write_images(dir.path(), &["ok.jpg"]);
        files.push(dir.path().join("missing.jpg"));
        let library = Library::open_in_memory().unwrap();
        let mut admin = admin(&library);
        admin.login("admin123").unwrap();

        let report = admin.upload("EVENT2024", &files).unwrap();
        assert_eq!(report.failure.as_deref(), Some(encode::UPLOAD_FAILED));
        assert_eq!(report.uploaded.len(), 1);

        let stored = library.get_collection(&AccessCode::parse("EVENT2024").unwrap()).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].original_name, "ok.jpg");
        assert_eq!(admin.images().len(), 1);
    }

    #[test]
    fn test_overview_only_reads_known_codes() {
        let dir = tempfile::tempdir().unwrap();
        let files = write_images(dir.path(), &["a.jpg"]);
        let library = Library::open_in_memory().unwrap();
        let mut admin = admin(&library);
        admin.login("admin123").unwrap();

        admin.upload("BACKSTAGE", &files).unwrap();
        admin.upload("EVENT2024", &files).unwrap();
        // Freshly uploaded records show up until the next reload
        assert_eq!(admin.images().len(), 2);

        admin.load_all().unwrap();
        assert_eq!(admin.images().len(), 1);
        assert_eq!(admin.images()[0].owner_code, "EVENT2024");
        assert_eq!(library.stored_codes().unwrap().len(), 2);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let files = write_images(dir.path(), &["a.jpg", "b.jpg"]);
        let library = Library::open_in_memory().unwrap();
        let mut admin = admin(&library);
        admin.login("admin123").unwrap();

        let uploaded = admin.upload("EVENT2024", &files).unwrap().uploaded;
        let target = &uploaded[0];

        assert!(admin.delete(&target.id, &target.owner_code).unwrap());
        let code = AccessCode::parse("EVENT2024").unwrap();
        assert_eq!(library.get_collection(&code).unwrap(), vec![uploaded[1].clone()]);
        assert_eq!(admin.images(), &[uploaded[1].clone()]);

        assert!(!admin.delete(&target.id, &target.owner_code).unwrap());
        assert_eq!(library.get_collection(&code).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_background_batch_is_stored_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let files = write_images(dir.path(), &["p1.jpg", "p2.webp", "p3.png"]);
        let library = Library::open_in_memory().unwrap();
        let mut admin = admin(&library);
        admin.login("admin123").unwrap();

        let code = admin.validate_upload("portrait2024", files.len()).unwrap();
        let batch = encode::encode_files(files).await;
        let report = admin.store_batch(&code, batch);

        assert_eq!(report.failure, None);
        let stored = library.get_collection(&code).unwrap();
        let names: Vec<&str> = stored.iter().map(|r| r.original_name.as_str()).collect();
        assert_eq!(names, vec!["p1.jpg", "p2.webp", "p3.png"]);
        assert_eq!(stored, report.uploaded);
    }

    #[tokio::test]
    async fn test_background_batch_keeps_files_before_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut files = write_images(dir.path(), &["first.jpg", "notes.txt"]);
        files.extend(write_images(dir.path(), &["after.jpg"]));
        let library = Library::open_in_memory().unwrap();
        let mut admin = admin(&library);
        admin.login("admin123").unwrap();

        let code = admin.validate_upload("EVENT2024", files.len()).unwrap();
        let report = admin.store_batch(&code, encode::encode_files(files).await);

        assert_eq!(report.failure.as_deref(), Some("Error uploading files. Please try again."));
        let stored = library.get_collection(&code).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].original_name, "first.jpg");
    }

    #[test]
    fn test_batch_after_logout_stores_nothing() {
        let library = Library::open_in_memory().unwrap();
        let mut admin = admin(&library);
        let code = AccessCode::parse("EVENT2024").unwrap();
        let batch = EncodedBatch {
            files: vec![EncodedFile {
                name: "a.jpg".to_string(),
                data_url: encode::encode_bytes("a.jpg", b"x"),
            }],
            failure: None,
        };

        let report = admin.store_batch(&code, batch);
        assert!(report.uploaded.is_empty());
        assert!(report.failure.is_some());
        assert!(library.get_collection(&code).unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_collection_blocks_login() {
        let library = Library::open_in_memory().unwrap();
        library.set_flag("gallery_EVENT2024", "not json").unwrap();
        let mut admin = admin(&library);

        let err = admin.login("admin123").unwrap_err();
        assert!(matches!(err, GalleryError::CorruptCollection { .. }));
        assert!(!admin.is_authenticated());
        assert_eq!(library.get_flag(ADMIN_AUTH_KEY).unwrap(), None);
    }

    #[test]
    fn test_delete_requires_session() {
        let library = Library::open_in_memory().unwrap();
        let mut admin = admin(&library);
        assert!(matches!(
            admin.delete("1_abc", "EVENT2024"),
            Err(GalleryError::NotAuthenticated)
        ));
    }
}
