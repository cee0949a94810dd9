//! Value coercion: untyped JSON in, a value of the declared kind out.
//!
//! Persisted project data is loose. A number variable may come back as
//! `"3.5"`, a boolean as `"true"`, a string as `0`. Coercion normalizes all of
//! that into a [`VarValue`] and never fails: junk degrades to a sentinel
//! (`false`, `""`, or NaN).
//!
//! Truthiness follows the web runtime that writes these records:
//!
//! | input                          | truthy |
//! |--------------------------------|--------|
//! | absent, `null`                 | no     |
//! | `false`                        | no     |
//! | `0`, `-0`                      | no     |
//! | `""`                           | no     |
//! | anything else (incl. `[]`, `{}`) | yes  |
//!
//! An absent value (`None`) and an explicit `null` differ only for the
//! number kind: absent → NaN, `null` → `0`.
use serde_json::Value;

use crate::variables::{VarValue, VariableType};

// ------------------------------ Front API --------------------------------- //

/// Normalize `value` into the native representation of `kind`.
///
/// - `boolean`: text is `true` iff it equals `"true"` exactly; anything else
///   goes through truthiness.
/// - `string`: falsy input → `""`, otherwise its textual form. Note numeric
///   zero is falsy, so `0` → `""`.
/// - `number`: numeric conversion; unparseable input → NaN.
pub fn convert_var_value_to_type(value: Option<&Value>, kind: VariableType) -> VarValue {
    match kind {
        VariableType::Boolean => match value {
            Some(Value::String(s)) => VarValue::Boolean(s == "true"),
            other => VarValue::Boolean(is_truthy(other)),
        },
        VariableType::String => match value {
            Some(v) if is_truthy(Some(v)) => VarValue::String(to_js_string(v)),
            _ => VarValue::String(String::new()),
        },
        VariableType::Number => VarValue::Number(to_js_number(value)),
    }
}

pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

// ------------------------------ To string --------------------------------- //

/// Textual form of a JSON value.
/// Arrays join their elements with `,` (nulls become empty); objects render
/// as `[object Object]`.
pub fn to_js_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => js_number_to_string(n.as_f64().unwrap_or(f64::NAN)),
        Value::String(s) => s.clone(),
        Value::Array(xs) => xs
            .iter()
            .map(|x| match x {
                Value::Null => String::new(),
                other => to_js_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Shortest round-trip decimal form; exponent notation outside
/// `[1e-6, 1e21)`, written with an explicit sign (`1e+21`).
pub fn js_number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        // also -0
        return "0".to_string();
    }
    let abs = n.abs();
    if abs >= 1e21 || abs < 1e-6 {
        let s = format!("{n:e}");
        return match s.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => s,
        };
    }
    format!("{n}")
}

// ------------------------------ To number --------------------------------- //

pub fn to_js_number(value: Option<&Value>) -> f64 {
    match value {
        None => f64::NAN,
        Some(Value::Null) => 0.0,
        Some(Value::Bool(b)) => if *b { 1.0 } else { 0.0 },
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => string_to_number(s),
        Some(arr @ Value::Array(_)) => string_to_number(&to_js_string(arr)),
        Some(Value::Object(_)) => f64::NAN,
    }
}

/// Numeric value of a string; anything that is not a complete numeric
/// literal yields NaN.
pub fn string_to_number(s: &str) -> f64 {
    let t = s.trim_matches(is_js_whitespace);
    if t.is_empty() {
        return 0.0;
    }
    match t {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    for (prefixes, radix) in [(["0x", "0X"], 16), (["0o", "0O"], 8), (["0b", "0B"], 2)] {
        if let Some(digits) = prefixes.iter().find_map(|p| t.strip_prefix(*p)) {
            return parse_radix(digits, radix);
        }
    }
    // `f64::from_str` also takes `inf`, `nan`, `infinity`; keep to plain literals.
    if !t.bytes().all(|b| matches!(b, b'0'..=b'9' | b'+' | b'-' | b'.' | b'e' | b'E')) {
        return f64::NAN;
    }
    t.parse::<f64>().unwrap_or(f64::NAN)
}

/// WhiteSpace and LineTerminator as the web runtime trims them. Narrower
/// than `char::is_whitespace`, which also takes U+0085.
fn is_js_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t' | '\u{b}' | '\u{c}' | ' ' | '\u{a0}' | '\u{feff}'
            | '\n' | '\r' | '\u{2028}' | '\u{2029}'
            | '\u{1680}' | '\u{2000}'..='\u{200a}' | '\u{202f}' | '\u{205f}' | '\u{3000}'
    )
}

/// Integer literal in `radix`, rounded to f64 once.
fn parse_radix(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    let mut acc: u128 = 0;
    // digits past 128 bits: count them and keep a sticky bit for rounding
    let mut dropped = 0i32;
    let mut sticky = false;
    for c in digits.chars() {
        let Some(d) = c.to_digit(radix) else {
            return f64::NAN;
        };
        if dropped == 0 {
            if let Some(next) = acc.checked_mul(radix as u128).and_then(|v| v.checked_add(d as u128)) {
                acc = next;
                continue;
            }
        }
        dropped += 1;
        sticky |= d != 0;
    }
    if sticky {
        acc |= 1;
    }
    // radix is a power of two, so the scaling is exact
    acc as f64 * (radix as f64).powi(dropped)
}

// ------------------------------- Tests ------------------------------------ //
