//! Run a raw, untyped vars map through coercion.
//!
//! A persisted `VarsMap` is keyed by variable id or name and its values may
//! be anything JSON can hold. Each key is resolved to a declared kind
//! (definitions first, then the predefined table) and its value coerced.
use serde::Serialize;
use serde_json::{Map, Value};

use crate::coerce::convert_var_value_to_type;
use crate::definition::VariableDefinition;
use crate::predefined::{predefined_name_for_key, PredefinedVariableName};
use crate::variables::{DeviceVar, VarValue, VariableType, VarsMap};

#[derive(Debug, Clone, Default, Serialize)]
pub struct Normalized {
    pub vars: VarsMap,
    /// Keys matching neither a definition nor a predefined variable; dropped.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unknown_keys: Vec<String>,
    /// `device_var` entries whose value is not `d`, `m` or `h`; kept as-is.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub invalid_device_values: Vec<String>,
}

enum Resolved<'a> {
    Defined(&'a VariableDefinition),
    Predefined(PredefinedVariableName),
}

impl Resolved<'_> {
    fn kind(&self) -> VariableType {
        match self {
            Self::Defined(def) => def.variable_type,
            Self::Predefined(name) => name.defaults().type_,
        }
    }

    fn is_device_var(&self) -> bool {
        match self {
            Self::Defined(def) => def.name() == PredefinedVariableName::DeviceVar.as_str(),
            Self::Predefined(name) => *name == PredefinedVariableName::DeviceVar,
        }
    }
}

fn resolve<'a>(key: &str, definitions: &'a [VariableDefinition]) -> Option<Resolved<'a>> {
    if let Some(def) = definitions.iter().find(|d| d.matches_key(key)) {
        return Some(Resolved::Defined(def));
    }
    predefined_name_for_key(key).map(Resolved::Predefined)
}

pub fn normalize_vars_map(raw: &Map<String, Value>, definitions: &[VariableDefinition]) -> Normalized {
    let mut out = Normalized::default();
    for (key, value) in raw {
        let Some(resolved) = resolve(key, definitions) else {
            tracing::warn!(key = %key, "no variable definition for key; dropping");
            out.unknown_keys.push(key.clone());
            continue;
        };
        let kind = resolved.kind();
        let coerced = convert_var_value_to_type(Some(value), kind);
        tracing::debug!(key = %key, kind = %kind, value = %coerced, "coerced");

        if resolved.is_device_var() {
            let valid = matches!(&coerced, VarValue::String(s) if DeviceVar::parse(s).is_some());
            if !valid {
                tracing::warn!(key = %key, value = %coerced, "device_var outside d|m|h");
                out.invalid_device_values.push(key.clone());
            }
        }
        out.vars.insert(key.clone(), coerced);
    }
    out
}

impl Normalized {
    /// Add the default of every defined variable the map has no entry for,
    /// under either its id or its name.
    pub fn fill_defaults(&mut self, definitions: &[VariableDefinition]) {
        for def in definitions {
            if self.vars.keys().any(|k| def.matches_key(k)) {
                continue;
            }
            self.vars.insert(def.id().to_string(), def.default_value());
        }
    }
}

/// Each definition's default, keyed by variable id.
pub fn defaults_vars_map(definitions: &[VariableDefinition]) -> VarsMap {
    definitions
        .iter()
        .map(|d| (d.id().to_string(), d.default_value()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn defs() -> Vec<VariableDefinition> {
        serde_json::from_value(json!([
            {"id": 1, "name": "lives", "variable_type": "number", "varDefaultName": "lives", "varDefaultValue": 3},
            {"id": 2, "name": "door_open", "variable_type": "boolean", "varDefaultName": "door_open", "varDefaultValue": "false"},
            {"id": 3, "name": "nickname", "variable_type": "string", "varDefaultName": "nickname", "varDefaultValue": ""}
        ]))
        .unwrap()
    }

    fn raw(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn coerces_by_definition_id_and_name() {
        let out = normalize_vars_map(
            &raw(json!({"1": "5", "door_open": "true", "3": 0})),
            &defs(),
        );
        assert_eq!(out.vars.get("1"), Some(&VarValue::Number(5.0)));
        assert_eq!(out.vars.get("door_open"), Some(&VarValue::Boolean(true)));
        assert_eq!(out.vars.get("3"), Some(&VarValue::from("")));
        assert!(out.unknown_keys.is_empty());
    }

    #[test]
    fn falls_back_to_predefined_table() {
        let out = normalize_vars_map(
            &raw(json!({"-2": "12.5", "vrmode_var": "yes", "-8": null, "device_var": "m"})),
            &[],
        );
        assert_eq!(out.vars.get("-2"), Some(&VarValue::Number(12.5)));
        assert_eq!(out.vars.get("vrmode_var"), Some(&VarValue::Boolean(false)));
        assert_eq!(out.vars.get("-8"), Some(&VarValue::from("")));
        assert_eq!(out.vars.get("device_var"), Some(&VarValue::from("m")));
        assert!(out.invalid_device_values.is_empty());
    }

    #[test]
    fn unknown_keys_are_reported_not_fatal() {
        let out = normalize_vars_map(&raw(json!({"99": 1, "mystery": "x", "score": 4})), &defs());
        assert_eq!(out.unknown_keys, vec!["99".to_string(), "mystery".to_string()]);
        assert_eq!(out.vars.len(), 1);
        assert_eq!(out.vars.get("score"), Some(&VarValue::Number(4.0)));
    }

    #[test]
    fn padded_numerals_are_not_ids() {
        let out = normalize_vars_map(&raw(json!({"-02": 7, "+1": "5", "01": 2, "-2": 3})), &defs());
        assert_eq!(out.unknown_keys, vec!["-02".to_string(), "+1".to_string(), "01".to_string()]);
        assert_eq!(out.vars.len(), 1);
        assert_eq!(out.vars.get("-2"), Some(&VarValue::Number(3.0)));
    }

    #[test]
    fn invalid_device_value_is_kept_and_flagged() {
        let out = normalize_vars_map(&raw(json!({"-9": "tablet"})), &[]);
        assert_eq!(out.vars.get("-9"), Some(&VarValue::from("tablet")));
        assert_eq!(out.invalid_device_values, vec!["-9".to_string()]);
    }

    #[test]
    fn definitions_shadow_predefined_lookup() {
        let mut defs = defs();
        defs.push(VariableDefinition {
            base: crate::definition::CogObjectDefinition { id: -2, name: "score".into() },
            variable_type: VariableType::String,
            var_default_name: "score".into(),
            var_default_value: VarValue::from(""),
        });
        let out = normalize_vars_map(&raw(json!({"-2": 7})), &defs);
        assert_eq!(out.vars.get("-2"), Some(&VarValue::from("7")));
    }

    #[test]
    fn defaults_map_coerces_stored_defaults() {
        let map = defaults_vars_map(&defs());
        assert_eq!(map.get("1"), Some(&VarValue::Number(3.0)));
        assert_eq!(map.get("2"), Some(&VarValue::Boolean(false)));
        assert_eq!(map.get("3"), Some(&VarValue::from("")));
    }

    #[test]
    fn fill_defaults_only_adds_missing_variables() {
        let defs = defs();
        let mut out = normalize_vars_map(&raw(json!({"lives": "9"})), &defs);
        out.fill_defaults(&defs);
        assert_eq!(out.vars.len(), 3);
        assert_eq!(out.vars.get("lives"), Some(&VarValue::Number(9.0)));
        assert!(!out.vars.contains_key("1"));
        assert_eq!(out.vars.get("2"), Some(&VarValue::Boolean(false)));
        assert_eq!(out.vars.get("3"), Some(&VarValue::from("")));
    }

    #[test]
    fn output_serializes_compactly() {
        let out = normalize_vars_map(&raw(json!({"lives": "2"})), &defs());
        assert_eq!(serde_json::to_value(&out).unwrap(), json!({"vars": {"lives": 2}}));
    }
}
