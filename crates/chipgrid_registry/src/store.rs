//! Persistence for custom chip types.
//!
//! Each type is one JSON record keyed by its name. [`DirStore`] keeps the
//! records as files named `<prefix><type>.json` and fingerprints every record
//! it reads or writes, so [`TypeStore::poll_changes`] can report files that
//! another session rewrote in the meantime.

use crate::error::StoreError;
use chipgrid_common::ContentHash;
use chipgrid_config::StorageConfig;
use chipgrid_ir::{ChipTypeData, TypeName};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Backing storage for custom chip types.
pub trait TypeStore {
    /// Reads every stored type.
    fn load_all(&mut self) -> Result<Vec<(TypeName, ChipTypeData)>, StoreError>;

    /// Reads one type, `None` if no record exists.
    fn load(&mut self, name: &TypeName) -> Result<Option<ChipTypeData>, StoreError>;

    /// Writes one type, replacing any previous record.
    fn save(&mut self, name: &TypeName, data: &ChipTypeData) -> Result<(), StoreError>;

    /// Deletes the record of one type. Missing records are not an error.
    fn remove(&mut self, name: &TypeName) -> Result<(), StoreError>;

    /// Names whose records were created, changed, or deleted by someone else
    /// since this store last read or wrote them, in name order.
    fn poll_changes(&mut self) -> Result<Vec<TypeName>, StoreError>;
}

fn to_record(data: &ChipTypeData) -> Result<String, StoreError> {
    serde_json::to_string_pretty(data).map_err(|e| StoreError::Serialization {
        reason: e.to_string(),
    })
}

fn from_record(path: &Path, text: &str) -> Result<ChipTypeData, StoreError> {
    serde_json::from_str(text).map_err(|e| StoreError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// One JSON file per type inside a directory.
#[derive(Debug)]
pub struct DirStore {
    dir: PathBuf,
    prefix: String,
    seen: BTreeMap<TypeName, ContentHash>,
}

impl DirStore {
    /// A store over `dir`. The directory is created on the first write.
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            seen: BTreeMap::new(),
        }
    }

    /// A store laid out as `[storage]` describes, relative to `root`.
    pub fn from_config(root: &Path, config: &StorageConfig) -> Self {
        Self::new(root.join(&config.dir), config.prefix.clone())
    }

    /// The directory holding the records.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File that holds the record of `name`.
    pub fn path_for(&self, name: &TypeName) -> PathBuf {
        self.dir.join(format!("{}{}.json", self.prefix, name))
    }

    fn name_of(&self, path: &Path) -> Option<TypeName> {
        let file = path.file_name()?.to_str()?;
        let name = file.strip_prefix(&self.prefix)?.strip_suffix(".json")?;
        (!name.is_empty()).then(|| TypeName::new(name))
    }

    fn read(&self, path: &Path) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Every record currently on disk, keyed by type name.
    fn scan(&self) -> Result<BTreeMap<TypeName, (PathBuf, String)>, StoreError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.dir.clone(),
                    source,
                })
            }
        };

        let mut records = BTreeMap::new();
        for entry in entries {
            let path = entry
                .map_err(|source| StoreError::Io {
                    path: self.dir.clone(),
                    source,
                })?
                .path();
            let Some(name) = self.name_of(&path) else {
                continue;
            };
            if let Some(text) = self.read(&path)? {
                records.insert(name, (path, text));
            }
        }
        Ok(records)
    }
}

impl TypeStore for DirStore {
    fn load_all(&mut self) -> Result<Vec<(TypeName, ChipTypeData)>, StoreError> {
        let records = self.scan()?;
        self.seen.clear();
        let mut types = Vec::with_capacity(records.len());
        for (name, (path, text)) in records {
            let data = from_record(&path, &text)?;
            self.seen.insert(name.clone(), ContentHash::from_text(&text));
            types.push((name, data));
        }
        Ok(types)
    }

    fn load(&mut self, name: &TypeName) -> Result<Option<ChipTypeData>, StoreError> {
        let path = self.path_for(name);
        match self.read(&path)? {
            Some(text) => {
                let data = from_record(&path, &text)?;
                self.seen.insert(name.clone(), ContentHash::from_text(&text));
                Ok(Some(data))
            }
            None => {
                self.seen.remove(name);
                Ok(None)
            }
        }
    }

    fn save(&mut self, name: &TypeName, data: &ChipTypeData) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let text = to_record(data)?;
        let path = self.path_for(name);
        fs::write(&path, &text).map_err(|source| StoreError::Io { path, source })?;
        self.seen.insert(name.clone(), ContentHash::from_text(&text));
        Ok(())
    }

    fn remove(&mut self, name: &TypeName) -> Result<(), StoreError> {
        let path = self.path_for(name);
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(source) => return Err(StoreError::Io { path, source }),
        }
        self.seen.remove(name);
        Ok(())
    }

    fn poll_changes(&mut self) -> Result<Vec<TypeName>, StoreError> {
        let records = self.scan()?;
        let mut changed = BTreeSet::new();
        for (name, (_, text)) in &records {
            if self.seen.get(name) != Some(&ContentHash::from_text(text)) {
                changed.insert(name.clone());
            }
        }
        for name in self.seen.keys() {
            if !records.contains_key(name) {
                changed.insert(name.clone());
            }
        }
        Ok(changed.into_iter().collect())
    }
}

/// Keeps serialized records in memory. Used for tests and one-shot runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: BTreeMap<TypeName, String>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl TypeStore for MemoryStore {
    fn load_all(&mut self) -> Result<Vec<(TypeName, ChipTypeData)>, StoreError> {
        self.records
            .iter()
            .map(|(name, text)| Ok((name.clone(), from_record(Path::new(name.as_str()), text)?)))
            .collect()
    }

    fn load(&mut self, name: &TypeName) -> Result<Option<ChipTypeData>, StoreError> {
        self.records
            .get(name)
            .map(|text| from_record(Path::new(name.as_str()), text))
            .transpose()
    }

    fn save(&mut self, name: &TypeName, data: &ChipTypeData) -> Result<(), StoreError> {
        self.records.insert(name.clone(), to_record(data)?);
        Ok(())
    }

    fn remove(&mut self, name: &TypeName) -> Result<(), StoreError> {
        self.records.remove(name);
        Ok(())
    }

    /// Nobody else can write to process memory.
    fn poll_changes(&mut self) -> Result<Vec<TypeName>, StoreError> {
        Ok(Vec::new())
    }
}
