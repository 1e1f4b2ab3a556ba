//! Durable world store
//!
//! The whole `World` is one JSON document. Every mutation runs inside
//! `Store::transaction` against a working copy; a successful closure is
//! written out (temp file, then rename) before it replaces the live copy,
//! and a failing one leaves no trace.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::world::{IntegrityError, World};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store I/O failed for {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("Store is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Store is inconsistent: {0}")]
    Corrupt(#[from] IntegrityError),
}

#[derive(Debug, Default)]
pub struct Store {
    world: World,
    path: Option<PathBuf>,
}

impl Store {
    /// A store that never touches disk
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open a file-backed store, starting empty if the file does not exist
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let world = match fs::read_to_string(&path) {
            Ok(text) => {
                let world: World = serde_json::from_str(&text)?;
                world.check_integrity()?;
                tracing::info!("Loaded store from {:?}", path);
                world
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!("No store at {:?}, starting empty", path);
                World::new()
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        Ok(Self {
            world,
            path: Some(path),
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Atomic read-modify-write of the world
    pub fn transaction<T, E>(&mut self, f: impl FnOnce(&mut World) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let mut working = self.world.clone();
        let value = f(&mut working)?;
        if let Some(path) = &self.path {
            persist(path, &working)?;
        }
        self.world = working;
        Ok(value)
    }
}

fn persist(path: &Path, world: &World) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    let text = serde_json::to_string_pretty(world)?;
    let staging = path.with_extension("json.tmp");
    fs::write(&staging, text).map_err(io_err)?;
    fs::rename(&staging, path).map_err(io_err)?;
    Ok(())
}
