//! Persisted variable definition records.
use serde::{Deserialize, Serialize};

use crate::predefined::{is_predefined_id, PredefinedVariableName};
use crate::variables::{id_from_key, VarCategory, VarValue, VariableType};

/// Fields every cog object carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CogObjectDefinition {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDefinition {
    #[serde(flatten)]
    pub base: CogObjectDefinition,
    pub variable_type: VariableType,
    #[serde(rename = "varDefaultName")]
    pub var_default_name: String,
    #[serde(rename = "varDefaultValue")]
    pub var_default_value: VarValue,
}

impl VariableDefinition {
    /// Definition of a predefined variable as the platform adds it: name
    /// and kind from the table, value at the kind's default.
    pub fn predefined(name: PredefinedVariableName) -> Self {
        let defaults = name.defaults();
        Self {
            base: CogObjectDefinition { id: defaults.id, name: name.as_str().to_string() },
            variable_type: defaults.type_,
            var_default_name: name.as_str().to_string(),
            var_default_value: defaults.type_.default_value(),
        }
    }

    pub fn id(&self) -> i64 {
        self.base.id
    }

    pub fn name(&self) -> &str {
        &self.base.name
    }

    pub fn is_predefined(&self) -> bool {
        is_predefined_id(self.base.id)
    }

    /// Only predefined-ness can be read off a record; anything else is
    /// reported as user defined.
    pub fn category(&self) -> VarCategory {
        if self.is_predefined() {
            VarCategory::Predefined
        } else {
            VarCategory::UserDefined
        }
    }

    /// `varDefaultValue` coerced to the declared kind; stored defaults are
    /// not guaranteed to match it.
    pub fn default_value(&self) -> VarValue {
        self.variable_type.coerce(&self.var_default_value.to_json())
    }

    /// True if `key` (a `VarsMap` key) refers to this variable.
    pub fn matches_key(&self, key: &str) -> bool {
        self.base.name == key || id_from_key(key) == Some(self.base.id)
    }
}
