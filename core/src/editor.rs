//! The parameter form component.
//!
//! `ParamEditor` owns the store, the rename session, the add-row name draft
//! and, when constructed with storage, the persistence backend. Every
//! mutation of the parameter list or the values is written through to
//! storage; scratch and draft edits are not.

use tracing::{debug, info, warn};

use crate::edit::EditSession;
use crate::error::{EditorError, Result};
use crate::persist::{self, ParamStorage};
use crate::store::ParamStore;
use crate::types::{Model, Param, Seed};


pub struct ParamEditor {
    store: ParamStore,
    session: EditSession,
    new_param_name: String,
    storage: Option<Box<dyn ParamStorage>>,
}

impl ParamEditor {
    /// Create an in-memory editor seeded from the given defaults.
    pub fn new(params: Vec<Param>, model: Model) -> Self {
        ParamEditor {
            store: ParamStore::from_seed(params, &model),
            session: EditSession::Idle,
            new_param_name: String::new(),
            storage: None,
        }
    }

    /// In-memory editor from a [`Seed`].
    pub fn from_seed(seed: Seed) -> Self {
        Self::new(seed.params, seed.model)
    }

    /// Create a persisted editor.
    ///
    /// State is rehydrated from `storage` where present, otherwise taken
    /// from the defaults, and then written straight back. The editor is
    /// returned even when that write fails; the second element carries the
    /// write result so the caller can report it.
    pub fn with_storage(
        params: Vec<Param>,
        model: Model,
        storage: Box<dyn ParamStorage>,
    ) -> (Self, Result<()>) {
        let store = persist::hydrate(&*storage, params, &model);
        let mut editor = ParamEditor {
            store,
            session: EditSession::Idle,
            new_param_name: String::new(),
            storage: Some(storage),
        };
        let written = editor.persist();
        if let Err(e) = &written {
            warn!(error = %e, "initial write to storage failed");
        }
        info!(params = editor.store.len(), "parameter editor ready");
        (editor, written)
    }

    // -------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------

    pub fn params(&self) -> &[Param] {
        self.store.params()
    }

    pub fn value(&self, id: u32) -> &str {
        self.store.value(id)
    }

    pub fn store(&self) -> &ParamStore {
        &self.store
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    /// Current add-row name draft.
    pub fn new_param_name(&self) -> &str {
        &self.new_param_name
    }

    /// Whether mutations are written to storage.
    pub fn is_persistent(&self) -> bool {
        self.storage.is_some()
    }

    /// Export every value as id/value pairs.
    pub fn model(&self) -> Model {
        self.store.export_model()
    }

    // -------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------

    /// Set the value of parameter `id`.
    ///
    /// Returns `Ok(false)` when `id` is unknown; nothing is written then.
    pub fn change_value(&mut self, id: u32, value: impl Into<String>) -> Result<bool> {
        if !self.store.set_value(id, value) {
            return Ok(false);
        }
        debug!(id, "value changed");
        self.persist()?;
        Ok(true)
    }

    /// Replace the add-row name draft.
    pub fn set_new_param_name(&mut self, name: impl Into<String>) {
        self.new_param_name = name.into();
    }

    /// Add a parameter named after the draft, then clear the draft.
    ///
    /// When no id is left the draft is kept and `IdsExhausted` is returned.
    pub fn add_param(&mut self) -> Result<Param> {
        let param = self
            .store
            .add_param(&self.new_param_name)
            .ok_or(EditorError::IdsExhausted)?;
        self.new_param_name.clear();
        debug!(id = param.id, name = %param.name, "parameter added");
        self.persist()?;
        Ok(param)
    }

    /// Rename a parameter directly, bypassing the edit session.
    pub fn rename_param(&mut self, id: u32, name: impl Into<String>) -> Result<()> {
        if !self.store.rename_param(id, name) {
            return Err(EditorError::UnknownParam(id));
        }
        debug!(id, "parameter renamed");
        self.persist()
    }

    // -------------------------------------------------------------------
    // Edit session
    // -------------------------------------------------------------------

    /// Enter edit mode on `id`. Any other open edit is abandoned.
    pub fn begin_edit(&mut self, id: u32) -> bool {
        self.session.begin(id, &self.store)
    }

    /// Update the uncommitted name.
    pub fn edit_input(&mut self, text: impl Into<String>) -> bool {
        self.session.input(text)
    }

    /// Commit the open edit. Returns the id that was saved, if any.
    pub fn save_edit(&mut self) -> Result<Option<u32>> {
        let saved = self.session.save(&mut self.store);
        if let Some(id) = saved {
            debug!(id, "rename saved");
            self.persist()?;
        }
        Ok(saved)
    }

    fn persist(&mut self) -> Result<()> {
        match self.storage.as_mut() {
            Some(storage) => persist::sync(&mut **storage, &self.store),
            None => Ok(()),
        }
    }
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
