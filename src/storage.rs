use crate::imports::*;

use serde::{Deserialize, Serialize};
use std::path::Path;

/*
    Types:
    * StoreData - Serialized shape of data.json
    * DataStore - In-memory record collections plus the commit-on-success bookkeeping

    Collections are Vecs so insertion order is the default listing order.
*/

pub const DATA_FILE: &str = "data.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreData {
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub notes: Vec<Note>,
}

#[derive(Debug)]
pub struct DataStore {
    path: PathBuf,
    data: StoreData,
    dirty: bool,
}

impl DataStore {
    /// Store that never touched disk yet. Nothing is written until `commit`.
    pub fn empty(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(DATA_FILE),
            data: StoreData::default(),
            dirty: false,
        }
    }

    #[tracing::instrument(skip_all, err, fields(dir = %dir.as_ref().display()))]
    pub async fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let path = dir.as_ref().join(DATA_FILE);
        if !tokio::fs::try_exists(&path)
            .await
            .context(format!("failed to check {}", path.display()))?
        {
            tracing::info!(path = %path.display(), "No data file yet, starting empty");
            return Ok(Self::empty(dir));
        }

        let raw = tokio::fs::read_to_string(&path)
            .await
            .context(format!("failed to read {}", path.display()))?;
        let data: StoreData = serde_json::from_str(&raw)
            .context(format!("failed to parse {}", path.display()))?;
        tracing::info!(
            contacts = data.contacts.len(),
            notes = data.notes.len(),
            "Data loaded"
        );
        Ok(Self {
            path,
            data,
            dirty: false,
        })
    }

    /// Writes to disk only when something changed since the last commit.
    #[tracing::instrument(skip_all, err, fields(dirty = self.dirty))]
    pub async fn commit(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context(format!("failed to create {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(&self.data).context("failed to serialize data")?;
        tokio::fs::write(&self.path, raw)
            .await
            .context(format!("failed to write {}", self.path.display()))?;
        self.dirty = false;
        tracing::debug!(path = %self.path.display(), "Data committed");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn data(&self) -> &StoreData {
        &self.data
    }

    pub fn all<R: Record>(&self) -> &[R] {
        R::collection(&self.data)
    }

    pub fn len<R: Record>(&self) -> usize {
        self.all::<R>().len()
    }

    pub fn get<R: Record>(&self, uid: Uuid) -> Result<&R> {
        self.all::<R>()
            .iter()
            .find(|item| item.uid() == uid)
            .ok_or_else(|| AssistantError::not_found(format!("{} '{uid}' not found", R::SINGULAR)))
    }

    pub fn insert<R: Record>(&mut self, item: R) -> Result<()> {
        let uid = item.uid();
        if self.all::<R>().iter().any(|existing| existing.uid() == uid) {
            return Err(AssistantError::programming(format!(
                "{} '{uid}' already exists",
                R::SINGULAR
            )));
        }
        R::collection_mut(&mut self.data).push(item);
        self.dirty = true;
        Ok(())
    }

    /// Replaces the record with the same uid, keeping its position.
    pub fn update<R: Record>(&mut self, item: R) -> Result<()> {
        let uid = item.uid();
        let slot = R::collection_mut(&mut self.data)
            .iter_mut()
            .find(|existing| existing.uid() == uid)
            .ok_or_else(|| AssistantError::not_found(format!("{} '{uid}' not found", R::SINGULAR)))?;
        *slot = item;
        self.dirty = true;
        Ok(())
    }

    pub fn remove<R: Record>(&mut self, uid: Uuid) -> Result<R> {
        let items = R::collection_mut(&mut self.data);
        let position = items
            .iter()
            .position(|item| item.uid() == uid)
            .ok_or_else(|| AssistantError::not_found(format!("{} '{uid}' not found", R::SINGULAR)))?;
        let removed = items.remove(position);
        self.dirty = true;
        Ok(removed)
    }

    pub fn clear(&mut self) {
        self.data = StoreData::default();
        self.dirty = true;
    }
}
