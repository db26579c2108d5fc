//! Parameter store.
//!
//! Two parallel collections keyed by parameter id: the ordered list of
//! definitions and the id → value mapping. Parameters are add-only, so every
//! value entry always has a live definition.

use std::collections::BTreeMap;

use tracing::debug;

use crate::types::{Model, Param, ParamValue};


/// Ordered parameter definitions plus their current values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamStore {
    params: Vec<Param>,
    values: BTreeMap<u32, String>,
}

impl ParamStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from the initial parameter list and model.
    ///
    /// Model entries for ids with no matching parameter are dropped.
    pub fn from_seed(params: Vec<Param>, model: &Model) -> Self {
        let values = model
            .param_values
            .iter()
            .map(|pv| (pv.param_id, pv.value.clone()))
            .collect();
        Self::from_parts(params, values)
    }

    /// Build a store from already-decoded collections.
    pub fn from_parts(params: Vec<Param>, mut values: BTreeMap<u32, String>) -> Self {
        let before = values.len();
        values.retain(|id, _| params.iter().any(|p| p.id == *id));
        if values.len() != before {
            debug!(dropped = before - values.len(), "dropped values without a parameter");
        }
        ParamStore { params, values }
    }

    // -------------------------------------------------------------------
    // Values
    // -------------------------------------------------------------------

    /// Current value for `id`, or `""` when unset.
    pub fn value(&self, id: u32) -> &str {
        self.values.get(&id).map(String::as_str).unwrap_or("")
    }

    /// Upsert the value for `id`. Any string is accepted.
    ///
    /// Returns `false` and changes nothing when `id` is not a parameter.
    pub fn set_value(&mut self, id: u32, value: impl Into<String>) -> bool {
        if !self.contains(id) {
            debug!(id, "ignoring value for unknown parameter");
            return false;
        }
        self.values.insert(id, value.into());
        true
    }

    // -------------------------------------------------------------------
    // Parameters
    // -------------------------------------------------------------------

    /// Next id to allocate: one past the largest id, or 1 when empty.
    ///
    /// `None` once the largest id is `u32::MAX`.
    pub fn next_id(&self) -> Option<u32> {
        match self.params.iter().map(|p| p.id).max() {
            Some(max) => max.checked_add(1),
            None => Some(1),
        }
    }

    /// Append a new parameter with an empty value.
    ///
    /// A blank name is replaced with `"Recent parameter {id}"`. Returns
    /// `None` and changes nothing when no id is left to allocate.
    pub fn add_param(&mut self, name: &str) -> Option<Param> {
        let Some(id) = self.next_id() else {
            debug!("parameter ids exhausted");
            return None;
        };
        let name = if name.trim().is_empty() {
            format!("Recent parameter {}", id)
        } else {
            name.to_string()
        };
        let param = Param::new(id, name);
        self.params.push(param.clone());
        self.values.insert(id, String::new());
        Some(param)
    }

    /// Replace the name of parameter `id`, keeping its position and kind.
    ///
    /// Returns `false` when no such parameter exists.
    pub fn rename_param(&mut self, id: u32, name: impl Into<String>) -> bool {
        match self.params.iter_mut().find(|p| p.id == id) {
            Some(param) => {
                param.name = name.into();
                true
            }
            None => false,
        }
    }

    /// Look up a parameter by id.
    pub fn get(&self, id: u32) -> Option<&Param> {
        self.params.iter().find(|p| p.id == id)
    }

    /// Whether a parameter with `id` exists.
    pub fn contains(&self, id: u32) -> bool {
        self.get(id).is_some()
    }

    /// Parameters in display order.
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// The id → value mapping.
    pub fn values(&self) -> &BTreeMap<u32, String> {
        &self.values
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// True if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    // -------------------------------------------------------------------
    // Export
    // -------------------------------------------------------------------

    /// Export all values as id/value pairs, ascending by id.
    pub fn export_model(&self) -> Model {
        Model::new(
            self.values
                .iter()
                .map(|(id, value)| ParamValue::new(*id, value.clone()))
                .collect(),
        )
    }
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
