//! Parameter definitions and the exported model shape.
//!
//! Field names on the wire follow the JSON the form has always stored:
//! `type` for the parameter kind, `paramId` / `paramValues` in camelCase.

use serde::{Deserialize, Serialize};


// ---------------------------------------------------------------------------
// Param
// ---------------------------------------------------------------------------

/// Value kind of a parameter. Only plain text is supported.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    #[default]
    String,
}


/// A named field definition with a stable integer identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Param {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: ParamKind,
}

impl Param {
    /// Create a text parameter.
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Param {
            id,
            name: name.into(),
            kind: ParamKind::String,
        }
    }
}


// ---------------------------------------------------------------------------
// ParamValue / Model
// ---------------------------------------------------------------------------

/// The current text associated with one parameter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ParamValue {
    pub param_id: u32,
    pub value: String,
}

impl ParamValue {
    pub fn new(param_id: u32, value: impl Into<String>) -> Self {
        ParamValue {
            param_id,
            value: value.into(),
        }
    }
}


/// Exported form state: every value as an id/value pair.
///
/// `colors` is never populated by the form. It is kept so the shape matches
/// the larger model the form is embedded in.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[serde(default)]
    pub param_values: Vec<ParamValue>,
    #[serde(default)]
    pub colors: Vec<String>,
}

impl Model {
    pub fn new(param_values: Vec<ParamValue>) -> Self {
        Model {
            param_values,
            colors: Vec::new(),
        }
    }
}


// ---------------------------------------------------------------------------
// Seed
// ---------------------------------------------------------------------------

/// Construction input supplied by the embedding application.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Seed {
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default)]
    pub model: Model,
}

impl Seed {
    /// The demo data the form ships with.
    pub fn sample() -> Self {
        Seed {
            params: vec![Param::new(1, "Purpose"), Param::new(2, "Length")],
            model: Model::new(vec![
                ParamValue::new(1, "everyday"),
                ParamValue::new(2, "maxi"),
            ]),
        }
    }
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn param_serializes_kind_as_type() {
        let json = serde_json::to_string(&Param::new(3, "Color")).unwrap();
        assert_eq!(json, r#"{"id":3,"name":"Color","type":"string"}"#);
    }

    #[test]
    fn param_without_type_defaults_to_string() {
        let p: Param = serde_json::from_str(r#"{"id":1,"name":"Purpose"}"#).unwrap();
        assert_eq!(p.kind, ParamKind::String);
    }

    #[test]
    fn model_uses_camel_case_field_names() {
        let model = Model::new(vec![ParamValue::new(1, "everyday")]);
        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(json["paramValues"][0]["paramId"], 1);
        assert_eq!(json["paramValues"][0]["value"], "everyday");
        assert_eq!(json["colors"], serde_json::json!([]));
    }

    #[test]
    fn model_colors_optional_on_decode() {
        let model: Model =
            serde_json::from_str(r#"{"paramValues":[{"paramId":2,"value":"maxi"}]}"#)
                .unwrap();
        assert!(model.colors.is_empty());
        assert_eq!(model.param_values[0], ParamValue::new(2, "maxi"));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let res: Result<Param, _> =
            serde_json::from_str(r#"{"id":1,"name":"x","type":"number"}"#);
        assert!(res.is_err());
    }

    #[test]
    fn sample_seed_has_two_params() {
        let seed = Seed::sample();
        assert_eq!(seed.params.len(), 2);
        assert_eq!(seed.params[0].name, "Purpose");
        assert_eq!(seed.model.param_values[1].value, "maxi");
    }
}
