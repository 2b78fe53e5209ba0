use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::data::{AccessCode, PhotoRecord};
use super::store::{collection_key, GalleryStore, COLLECTION_PREFIX};
use crate::error::{GalleryError, Result};

/// The Library manages the SQLite key/value database.
/// It holds every photo collection (images inline) and the session values.
pub struct Library {
    conn: Connection,
    db_path: PathBuf,
}

impl Library {
    /// Open or create the database at `db_path`.
    ///
    /// The default location comes from `StudioConfig::db_path`:
    /// - Linux: ~/.local/share/studio-gallery/gallery.db
    /// - macOS: ~/Library/Application Support/studio-gallery/gallery.db
    /// - Windows: %APPDATA%\studio-gallery\gallery.db
    pub fn open(db_path: &Path) -> Result<Self> {
        // Ensure the parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)?;

        info!("📁 Gallery store opened at: {}", db_path.display());

        let library = Library {
            conn,
            db_path: db_path.to_path_buf(),
        };
        library.init_schema()?;

        Ok(library)
    }

    /// Open a throwaway database that lives only as long as this value
    pub fn open_in_memory() -> Result<Self> {
        let library = Library {
            conn: Connection::open_in_memory()?,
            db_path: PathBuf::from(":memory:"),
        };
        library.init_schema()?;
        Ok(library)
    }

    /// Create the key/value table if it doesn't exist.
    fn init_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key             TEXT PRIMARY KEY,
                value           TEXT NOT NULL,
                updated_at      INTEGER NOT NULL
            )",
            [],
        )?;

        debug!("Gallery schema initialized");

        Ok(())
    }

    /// Get the path to the database file
    pub fn path(&self) -> &PathBuf {
        &self.db_path
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().timestamp()],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(())
    }

    /// All keys starting with `prefix`, sorted
    pub fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM kv WHERE substr(key, 1, length(?1)) = ?1 ORDER BY key")?;

        let keys = stmt
            .query_map([prefix], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(keys)
    }

    /// Every code that has a collection on disk, whether or not any
    /// fixed code list knows about it
    pub fn stored_codes(&self) -> Result<Vec<AccessCode>> {
        Ok(self
            .keys_with_prefix(COLLECTION_PREFIX)?
            .iter()
            .filter_map(|key| AccessCode::parse(&key[COLLECTION_PREFIX.len()..]))
            .collect())
    }
}

impl GalleryStore for Library {
    fn get_collection(&self, code: &AccessCode) -> Result<Vec<PhotoRecord>> {
        match self.get(&collection_key(code))? {
            Some(json) => serde_json::from_str(&json).map_err(|source| {
                GalleryError::CorruptCollection {
                    code: code.to_string(),
                    source,
                }
            }),
            None => Ok(Vec::new()),
        }
    }

    fn put_collection(&self, code: &AccessCode, records: &[PhotoRecord]) -> Result<()> {
        let json = serde_json::to_string(records).map_err(|source| {
            GalleryError::CorruptCollection {
                code: code.to_string(),
                source,
            }
        })?;
        self.put(&collection_key(code), &json)?;

        debug!("Wrote {} records under {}", records.len(), code);
        Ok(())
    }

    fn get_flag(&self, key: &str) -> Result<Option<String>> {
        self.get(key)
    }

    fn set_flag(&self, key: &str, value: &str) -> Result<()> {
        self.put(key, value)
    }

    fn clear_flag(&self, key: &str) -> Result<()> {
        self.remove(key)
    }
}

// Implement Debug for better error messages
impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("db_path", &self.db_path)
            .finish()
    }
}
