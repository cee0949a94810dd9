//! Project-level ("brain") metadata: the record describing the whole
//! experience rather than any single variable.
use serde::{Deserialize, Serialize};

use crate::variables::{VarValue, VariableType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrainProperty {
    Version,
    /// Title of the full context.
    Title,
}

impl BrainProperty {
    pub const ALL: [BrainProperty; 2] = [Self::Version, Self::Title];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Version => "version",
            Self::Title => "title",
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "version" => Some(Self::Version),
            "title" => Some(Self::Title),
            _ => None,
        }
    }

    pub fn value_type(self) -> VariableType {
        match self {
            Self::Version => VariableType::Number,
            Self::Title => VariableType::String,
        }
    }

    pub fn default_value(self) -> VarValue {
        self.value_type().default_value()
    }
}

pub fn brain_property_defaults() -> impl Iterator<Item = (BrainProperty, VarValue)> {
    BrainProperty::ALL.into_iter().map(|p| (p, p.default_value()))
}

/// Missing fields take their property's default.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Brain {
    pub version: f64,
    pub title: String,
}

impl Brain {
    pub fn get(&self, property: BrainProperty) -> VarValue {
        match property {
            BrainProperty::Version => VarValue::Number(self.version),
            BrainProperty::Title => VarValue::String(self.title.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults() {
        assert_eq!(BrainProperty::Version.default_value(), VarValue::Number(0.0));
        assert_eq!(BrainProperty::Title.default_value(), VarValue::String(String::new()));
        let all: Vec<_> = brain_property_defaults().collect();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn record_defaults_match_property_defaults() {
        let brain = Brain::default();
        for (p, d) in brain_property_defaults() {
            assert_eq!(brain.get(p), d, "{}", p.as_str());
        }
    }

    #[test]
    fn partial_record_fills_missing_fields() {
        let brain: Brain = serde_json::from_value(json!({"title": "Onboarding"})).unwrap();
        assert_eq!(brain.version, 0.0);
        assert_eq!(brain.get(BrainProperty::Title), VarValue::from("Onboarding"));
        assert_eq!(BrainProperty::parse("title"), Some(BrainProperty::Title));
        assert_eq!(BrainProperty::parse("Title"), None);
    }
}
