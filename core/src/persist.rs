//! Durable key-value persistence for the form.
//!
//! The form keeps two entries in a string key-value store: `params` holds
//! the parameter list as a JSON array, `paramValues` holds the values as a
//! JSON object keyed by decimal id. Storage is injected through
//! [`ParamStorage`]; [`FileStorage`] keeps every key in one JSON file and
//! [`MemoryStorage`] is a shareable in-memory map.
//!
//! Anything that cannot be read or decoded is treated as absent.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::store::ParamStore;
use crate::types::{Model, Param};

/// Storage key for the encoded parameter list.
pub const PARAMS_KEY: &str = "params";

/// Storage key for the encoded id → value mapping.
pub const PARAM_VALUES_KEY: &str = "paramValues";


// ---------------------------------------------------------------------------
// ParamStorage
// ---------------------------------------------------------------------------

/// A string key-value store the form can write its state into.
pub trait ParamStorage {
    /// Read the entry under `key`, `None` when absent.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing any previous entry.
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;
}


/// In-memory storage. Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored entry.
    pub fn items(&self) -> BTreeMap<String, String> {
        self.items.borrow().clone()
    }
}

impl ParamStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}


/// Storage backed by a single JSON object file.
///
/// The file is read once on open and rewritten in full on every write.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
    items: BTreeMap<String, String>,
}

impl FileStorage {
    /// Open the storage file at `path`.
    ///
    /// A missing file is empty storage. A file that cannot be read or
    /// parsed is also treated as empty and will be overwritten on the next
    /// write.
    pub fn open(path: &Path) -> Self {
        let items = match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(items) => items,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "storage file malformed, starting empty");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "storage file unreadable, starting empty");
                BTreeMap::new()
            }
        };
        FileStorage {
            path: path.to_path_buf(),
            items,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ParamStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&self.items)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}


// ---------------------------------------------------------------------------
// Encode / decode
// ---------------------------------------------------------------------------

pub fn encode_params(params: &[Param]) -> Result<String> {
    Ok(serde_json::to_string(params)?)
}

/// Decode a stored parameter list. A list that repeats an id is rejected.
pub fn decode_params(raw: &str) -> Option<Vec<Param>> {
    let params: Vec<Param> = serde_json::from_str(raw).ok()?;
    let mut seen = BTreeSet::new();
    if params.iter().all(|p| seen.insert(p.id)) {
        Some(params)
    } else {
        None
    }
}

pub fn encode_values(values: &BTreeMap<u32, String>) -> Result<String> {
    Ok(serde_json::to_string(values)?)
}

pub fn decode_values(raw: &str) -> Option<BTreeMap<u32, String>> {
    serde_json::from_str(raw).ok()
}


/// Read and decode one entry; every failure collapses to `None`.
fn read_entry<T>(
    storage: &dyn ParamStorage,
    key: &str,
    decode: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    let raw = match storage.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(key, error = %e, "storage read failed, using defaults");
            return None;
        }
    };
    let decoded = decode(&raw);
    if decoded.is_none() {
        warn!(key, "stored entry is malformed, using defaults");
    }
    decoded
}


// ---------------------------------------------------------------------------
// Hydrate / sync
// ---------------------------------------------------------------------------

/// Build the store from storage, falling back to the supplied defaults for
/// each entry that is absent or undecodable.
pub fn hydrate(storage: &dyn ParamStorage, params: Vec<Param>, model: &Model) -> ParamStore {
    let stored_params = read_entry(storage, PARAMS_KEY, decode_params);
    let stored_values = read_entry(storage, PARAM_VALUES_KEY, decode_values);
    info!(
        params_from_storage = stored_params.is_some(),
        values_from_storage = stored_values.is_some(),
        "hydrated parameter store"
    );
    let values = stored_values.unwrap_or_else(|| {
        model
            .param_values
            .iter()
            .map(|pv| (pv.param_id, pv.value.clone()))
            .collect()
    });
    ParamStore::from_parts(stored_params.unwrap_or(params), values)
}

/// Write both entries for the current store state.
pub fn sync(storage: &mut dyn ParamStorage, store: &ParamStore) -> Result<()> {
    storage.set_item(PARAMS_KEY, &encode_params(store.params())?)?;
    storage.set_item(PARAM_VALUES_KEY, &encode_values(store.values())?)?;
    debug!(params = store.len(), "synced parameter store");
    Ok(())
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
