use chrono::{DateTime, Utc};
use idiomaster_core::{prefs::PrefsStore, CoreError};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::task;

pub mod content;
pub mod paths;

const FILE_VERSION: u32 = 1;

#[derive(Clone, Serialize, Deserialize)]
struct FileImage {
    version: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    entries: BTreeMap<String, Value>,
}

impl FileImage {
    fn new_empty() -> Self {
        let now = Utc::now();
        Self {
            version: FILE_VERSION,
            created_at: now,
            updated_at: now,
            entries: BTreeMap::new(),
        }
    }
}

/// Preference store persisted to one JSON file. Every mutation rewrites the
/// file atomically through a temp file in the same directory.
pub struct JsonPrefs {
    path: PathBuf,
    state: RwLock<FileImage>,
}

impl JsonPrefs {
    pub async fn open_default() -> Result<Self, CoreError> {
        Self::open(paths::default_prefs_file()).await
    }

    pub async fn open(path: PathBuf) -> Result<Self, CoreError> {
        ensure_parent_dirs(&path)?;
        let state = load_or_init(&path).await?;
        Ok(Self {
            path,
            state: RwLock::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn save(&self) -> Result<(), CoreError> {
        let snapshot = {
            let mut s = self.state.write();
            s.updated_at = Utc::now();
            s.clone()
        };
        let path = self.path.clone();

        // Join error -> CoreError, inner io::Error -> CoreError
        task::spawn_blocking(move || write_atomic(&path, &snapshot))
            .await
            .map_err(|_| CoreError::Storage("io"))?
            .map_err(|_| CoreError::Storage("io"))?;
        Ok(())
    }
}

fn ensure_parent_dirs(path: &Path) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|_| CoreError::Storage("io"))?;
    }
    Ok(())
}

// An unreadable or unparsable file opens as empty state rather than failing;
// the next save overwrites it with a clean image.
async fn load_or_init(path: &Path) -> Result<FileImage, CoreError> {
    if path.exists() {
        let p = path.to_path_buf();
        let buf = task::spawn_blocking(move || {
            let mut f = fs::File::open(&p)?;
            let mut buf = String::new();
            f.read_to_string(&mut buf)?;
            Ok::<String, std::io::Error>(buf)
        })
        .await
        .map_err(|_| CoreError::Storage("io"))?
        .map_err(|_| CoreError::Storage("io"))?;
        match serde_json::from_str::<FileImage>(&buf) {
            Ok(mut img) => {
                img.updated_at = Utc::now();
                Ok(img)
            }
            Err(err) => {
                tracing::warn!(%err, path = %path.display(), "prefs file unreadable, starting empty");
                Ok(FileImage::new_empty())
            }
        }
    } else {
        let img = FileImage::new_empty();
        write_atomic(path, &img).map_err(|_| CoreError::Storage("io"))?;
        Ok(img)
    }
}

fn write_atomic(path: &Path, img: &FileImage) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_vec_pretty(img).expect("serialize");
    let mut tmp = NamedTempFile::new_in(path.parent().unwrap_or_else(|| Path::new(".")))?;
    tmp.write_all(&json)?;
    tmp.flush()?;
    let _ = fs::remove_file(path);
    tmp.persist(path)?;
    Ok(())
}

use async_trait::async_trait;

#[async_trait]
impl PrefsStore for JsonPrefs {
    async fn get(&self, key: &str) -> Option<Value> {
        self.state.read().entries.get(key).cloned()
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), CoreError> {
        {
            let mut s = self.state.write();
            s.entries.insert(key.to_string(), value);
        }
        self.save().await
    }

    async fn remove(&self, key: &str) -> Result<(), CoreError> {
        let removed = {
            let mut s = self.state.write();
            s.entries.remove(key).is_some()
        };
        if removed {
            self.save().await?;
        }
        Ok(())
    }

    async fn clear(&self) -> Result<(), CoreError> {
        {
            let mut s = self.state.write();
            s.entries.clear();
        }
        self.save().await
    }

    async fn keys(&self) -> Vec<String> {
        self.state.read().entries.keys().cloned().collect()
    }
}
