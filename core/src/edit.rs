//! Rename session for a single parameter row.
//!
//! `Idle` until a row's label is double-activated or its edit affordance is
//! used; `Editing` holds the uncommitted name until save. There is no cancel
//! transition. Beginning an edit on another row while one is open abandons
//! the open scratch without committing it.

use tracing::debug;

use crate::store::ParamStore;


/// Which parameter, if any, is being renamed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditSession {
    #[default]
    Idle,
    Editing { param_id: u32, scratch: String },
}

impl EditSession {
    /// Enter edit mode on `id`, seeding the scratch with its current name.
    ///
    /// Returns `false` and leaves the session unchanged when `id` is unknown.
    pub fn begin(&mut self, id: u32, store: &ParamStore) -> bool {
        let Some(param) = store.get(id) else {
            return false;
        };
        if let EditSession::Editing { param_id, scratch } = self {
            if *param_id != id {
                debug!(abandoned = *param_id, scratch = %scratch, "switching edit target");
            }
        }
        *self = EditSession::Editing {
            param_id: id,
            scratch: param.name.clone(),
        };
        true
    }

    /// Replace the scratch text. Ignored when idle.
    pub fn input(&mut self, text: impl Into<String>) -> bool {
        match self {
            EditSession::Editing { scratch, .. } => {
                *scratch = text.into();
                true
            }
            EditSession::Idle => false,
        }
    }

    /// Commit the scratch as the parameter's new name and return to idle.
    ///
    /// Returns the id of the session that was closed, or `None` when idle.
    /// If the target no longer exists the session is still closed.
    pub fn save(&mut self, store: &mut ParamStore) -> Option<u32> {
        match std::mem::take(self) {
            EditSession::Editing { param_id, scratch } => {
                if !store.rename_param(param_id, scratch) {
                    debug!(param_id, "edit target vanished before save");
                }
                Some(param_id)
            }
            EditSession::Idle => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, EditSession::Idle)
    }

    /// Id of the parameter being edited.
    pub fn editing_id(&self) -> Option<u32> {
        match self {
            EditSession::Editing { param_id, .. } => Some(*param_id),
            EditSession::Idle => None,
        }
    }

    /// Whether `id` is the parameter being edited.
    pub fn is_editing(&self, id: u32) -> bool {
        self.editing_id() == Some(id)
    }

    /// Uncommitted name, if editing.
    pub fn scratch(&self) -> Option<&str> {
        match self {
            EditSession::Editing { scratch, .. } => Some(scratch),
            EditSession::Idle => None,
        }
    }
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
