// SPDX-License-Identifier: MPL-2.0
//! Append-only media catalog with CBOR persistence.
//!
//! The catalog is the durable list of everything the capture and recording
//! flows produced. Entries are only ever appended; queries iterate in
//! insertion order, which matches capture order. The on-disk format is CBOR
//! (compact, fast, clearly separated from the user-editable TOML
//! preferences).
//!
//! Loading is forgiving: a missing file yields an empty catalog, and an
//! unreadable or corrupt file yields an empty catalog plus a warning string
//! the caller may surface — the catalog never takes the process down.

use crate::domain::{MediaItem, MediaType};
use crate::error::{Error, Result};
use std::fs;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

/// Catalog file name within the app data directory.
const CATALOG_FILE: &str = "catalog.cbor";

/// Directory name under the platform data dir.
const APP_NAME: &str = "Tiltdeck";

/// Append-only store of captured media entries.
#[derive(Debug, Default)]
pub struct MediaCatalog {
    items: Vec<MediaItem>,
    /// Persistence target; `None` keeps the catalog in memory only.
    path: Option<PathBuf>,
}

impl MediaCatalog {
    /// Creates an empty catalog without persistence (tests, demos).
    #[must_use]
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Opens the catalog at the platform default location.
    ///
    /// Returns the catalog and an optional warning when an existing file
    /// could not be read or parsed.
    pub fn open_default() -> (Self, Option<String>) {
        match default_catalog_path() {
            Some(path) => Self::open(path),
            None => (Self::in_memory(), None),
        }
    }

    /// Opens the catalog at an explicit path, creating it lazily on first
    /// insert.
    pub fn open(path: PathBuf) -> (Self, Option<String>) {
        if !path.exists() {
            return (
                Self {
                    items: Vec::new(),
                    path: Some(path),
                },
                None,
            );
        }

        match fs::File::open(&path) {
            Ok(file) => {
                let reader = BufReader::new(file);
                match ciborium::from_reader::<Vec<MediaItem>, _>(reader) {
                    Ok(items) => (
                        Self {
                            items,
                            path: Some(path),
                        },
                        None,
                    ),
                    Err(err) => (
                        Self {
                            items: Vec::new(),
                            path: Some(path),
                        },
                        Some(format!("media catalog is unreadable, starting empty: {err}")),
                    ),
                }
            }
            Err(err) => (
                Self {
                    items: Vec::new(),
                    path: Some(path),
                },
                Some(format!("media catalog could not be opened: {err}")),
            ),
        }
    }

    /// Next free item id (monotonically increasing, never reused).
    #[must_use]
    pub fn next_id(&self) -> u64 {
        self.items
            .iter()
            .map(MediaItem::id)
            .max()
            .map_or(1, |id| id + 1)
    }

    /// Appends an entry and persists the catalog when a path is configured.
    ///
    /// Ids must be unique; inserting a duplicate id is rejected.
    pub fn insert(&mut self, item: MediaItem) -> Result<()> {
        if self.items.iter().any(|existing| existing.id() == item.id()) {
            return Err(Error::Catalog(format!(
                "duplicate media id {}",
                item.id()
            )));
        }
        tracing::debug!(id = item.id(), name = item.name(), "catalog insert");
        self.items.push(item);
        self.persist()
    }

    /// Entries of one media type, in insertion order. The iterator is
    /// restartable: each call walks the catalog from the beginning.
    pub fn query_by_type(&self, media_type: MediaType) -> impl Iterator<Item = &MediaItem> {
        self.items
            .iter()
            .filter(move |item| item.media_type() == media_type)
    }

    /// All entries in insertion order.
    #[must_use]
    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn persist(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = fs::File::create(path)?;
        let writer = BufWriter::new(file);
        ciborium::into_writer(&self.items, writer)
            .map_err(|e| Error::Catalog(e.to_string()))
    }
}

fn default_catalog_path() -> Option<PathBuf> {
    dirs::data_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CATALOG_FILE);
        path
    })
}
