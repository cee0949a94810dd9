//! Variable kinds, values and categories.
//!
//! Everything a persisted project record can say about a variable's *shape*:
//! the closed set of kinds (`number | boolean | string`), the default value of
//! each kind, the runtime value union, and the descriptive category tags.
//!
//! Kind tokens arrive as plain strings in untyped JSON (the `variable_type`
//! field of a definition), so [`is_variable_type`] / [`VariableType::parse`]
//! narrow them before anything else trusts them.
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::coerce::js_number_to_string;

// ------------------------------- Kinds ------------------------------------ //

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    Number,
    Boolean,
    String,
}

impl VariableType {
    pub const ALL: [VariableType; 3] = [Self::Number, Self::Boolean, Self::String];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::String => "string",
        }
    }

    /// Exact, case-sensitive match against the kind tokens.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            "string" => Some(Self::String),
            _ => None,
        }
    }

    pub fn default_value(self) -> VarValue {
        match self {
            Self::Number => VarValue::Number(0.0),
            Self::Boolean => VarValue::Boolean(false),
            Self::String => VarValue::String(String::new()),
        }
    }

    /// Coerce a present JSON value to this kind.
    /// See [`crate::coerce::convert_var_value_to_type`] for the rules.
    pub fn coerce(self, value: &serde_json::Value) -> VarValue {
        crate::coerce::convert_var_value_to_type(Some(value), self)
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{0}` is not a variable type (expected number, boolean or string)")]
pub struct UnknownVariableType(pub String);

impl FromStr for VariableType {
    type Err = UnknownVariableType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownVariableType(s.to_string()))
    }
}

/// True iff `token` is exactly one of `number`, `boolean`, `string`.
pub fn is_variable_type(token: &str) -> bool {
    VariableType::parse(token).is_some()
}

/// Every kind paired with its default value.
pub fn variable_type_defaults() -> impl Iterator<Item = (VariableType, VarValue)> {
    VariableType::ALL.into_iter().map(|k| (k, k.default_value()))
}

// ------------------------------- Values ----------------------------------- //

/// A variable's runtime value. Serialized as a bare JSON scalar.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum VarValue {
    Number(f64),
    Boolean(bool),
    String(String),
}

pub type ArrayOfValues = Vec<VarValue>;

/// Keys are a variable id (rendered as a string) OR a variable name.
pub type VarsMap = IndexMap<String, VarValue>;

/// The id a `VarsMap` key stands for. Only the canonical rendering counts:
/// `"-2"` is an id, `"-02"`, `"+2"` and `"-0"` are names.
pub fn id_from_key(key: &str) -> Option<i64> {
    key.parse::<i64>().ok().filter(|id| id.to_string() == key)
}

impl VarValue {
    pub fn variable_type(&self) -> VariableType {
        match self {
            Self::Number(_) => VariableType::Number,
            Self::Boolean(_) => VariableType::Boolean,
            Self::String(_) => VariableType::String,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The not-a-number sentinel produced by numeric coercion of junk input.
    pub fn is_nan(&self) -> bool {
        matches!(self, Self::Number(n) if n.is_nan())
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Number(n) => json_num_pref_i64(*n),
            Self::Boolean(b) => serde_json::Value::Bool(*b),
            Self::String(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl Serialize for VarValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            // JSON has no NaN/Infinity
            Self::Number(n) if !n.is_finite() => serializer.serialize_unit(),
            Self::Number(n) if is_exact_i64(*n) => serializer.serialize_i64(*n as i64),
            Self::Number(n) => serializer.serialize_f64(*n),
            Self::Boolean(b) => serializer.serialize_bool(*b),
            Self::String(s) => serializer.serialize_str(s),
        }
    }
}

impl fmt::Display for VarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => f.write_str(&js_number_to_string(*n)),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<f64> for VarValue {
    fn from(n: f64) -> Self { Self::Number(n) }
}

impl From<bool> for VarValue {
    fn from(b: bool) -> Self { Self::Boolean(b) }
}

impl From<&str> for VarValue {
    fn from(s: &str) -> Self { Self::String(s.to_string()) }
}

impl From<String> for VarValue {
    fn from(s: String) -> Self { Self::String(s) }
}

// `i64::MAX as f64` rounds up to 2^63, which is out of range; compare
// against 2^63 exclusively.
const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;

fn is_exact_i64(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0 && n >= -TWO_POW_63 && n < TWO_POW_63
}

// Prefer emitting integers when exact
fn json_num_pref_i64(n: f64) -> serde_json::Value {
    if is_exact_i64(n) {
        serde_json::Value::from(n as i64)
    } else {
        // non-finite becomes null
        serde_json::Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }
}

// ----------------------------- Categories --------------------------------- //

/// Where a variable came from. Descriptive only; coercion ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarCategory {
    UserDefined,
    Global,
    Predefined,
    Autogenerated,
}

impl VarCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UserDefined => "user_defined",
            Self::Global => "global",
            Self::Predefined => "predefined",
            Self::Autogenerated => "autogenerated",
        }
    }
}

// ------------------------------- Device ----------------------------------- //

/// Values the `device_var` predefined variable may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceVar {
    #[serde(rename = "d")]
    Desktop,
    #[serde(rename = "m")]
    Mobile,
    #[serde(rename = "h")]
    Headset,
}

impl DeviceVar {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Desktop => "d",
            Self::Mobile => "m",
            Self::Headset => "h",
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "d" => Some(Self::Desktop),
            "m" => Some(Self::Mobile),
            "h" => Some(Self::Headset),
            _ => None,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Mobile => "mobile",
            Self::Headset => "headset",
        }
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_have_native_type_of_their_kind() {
        for (kind, value) in variable_type_defaults() {
            assert_eq!(value.variable_type(), kind);
        }
        assert_eq!(VariableType::Number.default_value(), VarValue::Number(0.0));
        assert_eq!(VariableType::Boolean.default_value(), VarValue::Boolean(false));
        assert_eq!(VariableType::String.default_value(), VarValue::String(String::new()));
    }

    #[test]
    fn kind_tokens_are_exact_and_case_sensitive() {
        for ok in ["number", "boolean", "string"] {
            assert!(is_variable_type(ok), "{ok}");
        }
        for bad in ["", "Number", "BOOLEAN", " string", "string ", "bool", "int", "null"] {
            assert!(!is_variable_type(bad), "{bad:?}");
        }
        let err = "Number".parse::<VariableType>().unwrap_err();
        assert_eq!(err, UnknownVariableType("Number".into()));
        assert_eq!("boolean".parse::<VariableType>().unwrap(), VariableType::Boolean);
    }

    #[test]
    fn kind_serde_uses_lowercase_tokens() {
        assert_eq!(serde_json::to_value(VariableType::Boolean).unwrap(), json!("boolean"));
        let k: VariableType = serde_json::from_value(json!("string")).unwrap();
        assert_eq!(k, VariableType::String);
        assert!(serde_json::from_value::<VariableType>(json!("String")).is_err());
        for k in VariableType::ALL {
            assert_eq!(VariableType::parse(&k.to_string()), Some(k));
        }
    }

    #[test]
    fn var_value_serializes_as_bare_scalars() {
        assert_eq!(serde_json::to_string(&VarValue::Number(42.0)).unwrap(), "42");
        assert_eq!(serde_json::to_string(&VarValue::Number(3.5)).unwrap(), "3.5");
        assert_eq!(serde_json::to_string(&VarValue::Number(f64::NAN)).unwrap(), "null");
        assert_eq!(serde_json::to_string(&VarValue::Boolean(true)).unwrap(), "true");
        assert_eq!(serde_json::to_string(&VarValue::from("hi")).unwrap(), "\"hi\"");
        assert_eq!(VarValue::Number(-2.0).to_json(), json!(-2));
        assert_eq!(VarValue::Number(f64::INFINITY).to_json(), json!(null));
    }

    #[test]
    fn integers_past_i64_stay_floats() {
        let two_63 = 9_223_372_036_854_775_808.0;
        let text = serde_json::to_string(&VarValue::Number(two_63)).unwrap();
        assert_ne!(text, "9223372036854775807");
        assert_eq!(text.parse::<f64>().unwrap(), two_63);
        assert_eq!(VarValue::Number(two_63).to_json().as_f64(), Some(two_63));
        assert!(VarValue::Number(two_63).to_json().as_i64().is_none());

        let min = -9_223_372_036_854_775_808.0;
        assert_eq!(VarValue::Number(min).to_json(), json!(i64::MIN));
        let below = VarValue::Number(-2.0 * two_63).to_json();
        assert!(below.as_i64().is_none());
        assert_eq!(below.as_f64(), Some(-2.0 * two_63));
    }

    #[test]
    fn only_canonical_keys_are_ids() {
        assert_eq!(id_from_key("-2"), Some(-2));
        assert_eq!(id_from_key("0"), Some(0));
        assert_eq!(id_from_key("17"), Some(17));
        for key in ["-02", "-0002", "+1", "-0", "007", " 1", "1 ", "", "score"] {
            assert_eq!(id_from_key(key), None, "{key:?}");
        }
    }

    #[test]
    fn var_value_deserializes_only_scalars() {
        let v: VarValue = serde_json::from_value(json!(7)).unwrap();
        assert_eq!(v, VarValue::Number(7.0));
        let v: VarValue = serde_json::from_value(json!(false)).unwrap();
        assert_eq!(v, VarValue::Boolean(false));
        let v: VarValue = serde_json::from_value(json!("x")).unwrap();
        assert_eq!(v, VarValue::String("x".into()));
        assert!(serde_json::from_value::<VarValue>(json!(null)).is_err());
        assert!(serde_json::from_value::<VarValue>(json!([1])).is_err());
        assert!(serde_json::from_value::<VarValue>(json!({"a": 1})).is_err());
    }

    #[test]
    fn vars_map_round_trips_through_json() {
        let raw = json!({"-2": 10, "lang": "en", "vrmode_var": true});
        let map: VarsMap = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(map.get("-2"), Some(&VarValue::Number(10.0)));
        assert_eq!(serde_json::to_value(&map).unwrap(), raw);
    }

    #[test]
    fn category_and_device_tokens() {
        assert_eq!(serde_json::to_value(VarCategory::UserDefined).unwrap(), json!("user_defined"));
        assert_eq!(VarCategory::Autogenerated.as_str(), "autogenerated");
        assert_eq!(DeviceVar::parse("h"), Some(DeviceVar::Headset));
        assert_eq!(DeviceVar::parse("D"), None);
        assert_eq!(serde_json::to_value(DeviceVar::Mobile).unwrap(), json!("m"));
        assert_eq!(DeviceVar::Desktop.description(), "desktop");
    }
}
