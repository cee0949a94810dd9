//! jq pre-filter for input documents.
use jaq_core::{load, Compiler, Ctx, RcIter};
use jaq_json::Val;
use serde_json::Value;

use crate::error::{Error, Result};

/// Run a jq filter over the document read from `file`; every output becomes
/// its own document.
pub fn run_jaq(file: &str, filter_src: &str, input: &Value) -> Result<Vec<Value>> {
    let failed = |message: String| Error::Jq { file: file.to_string(), message };

    let arena = load::Arena::default();
    let modules = load::Loader::new(jaq_std::defs().chain(jaq_json::defs()))
        .load(&arena, load::File { code: filter_src, path: () })
        .map_err(|errs| failed(join(errs.iter().map(|(_, e)| format!("parse error: {e:?}")))))?;
    let filter = Compiler::default()
        .with_funs(jaq_std::funs().chain(jaq_json::funs()))
        .compile(modules)
        .map_err(|errs| {
            let undefined = errs.iter().flat_map(|(_, list)| list.iter());
            failed(join(undefined.map(|(name, u)| format!("undefined `{name}`: {u:?}"))))
        })?;

    let inputs = RcIter::new(core::iter::empty());
    filter
        .run((Ctx::new([], &inputs), Val::from(input.clone())))
        .map(|item| {
            let v = item.map_err(|e| failed(format!("{e:?}")))?;
            // Val displays as JSON text
            serde_json::from_str::<Value>(&v.to_string()).map_err(|e| failed(e.to_string()))
        })
        .collect()
}

fn join(messages: impl Iterator<Item = String>) -> String {
    messages.collect::<Vec<_>>().join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn selects_nested_vars() {
        let doc = json!({"project": {"vars": {"-2": "4"}}});
        let out = run_jaq("save.json", ".project.vars", &doc).unwrap();
        assert_eq!(out, vec![json!({"-2": "4"})]);
    }

    #[test]
    fn every_output_is_a_document() {
        let doc = json!({"sessions": [{"score": 1}, {"score": 2}]});
        let out = run_jaq("save.json", ".sessions[]", &doc).unwrap();
        assert_eq!(out, vec![json!({"score": 1}), json!({"score": 2})]);
    }

    #[test]
    fn failures_name_the_document() {
        match run_jaq("save.json", ".[", &json!({})) {
            Err(Error::Jq { file, message }) => {
                assert_eq!(file, "save.json");
                assert!(message.starts_with("parse error"), "{message}");
            }
            other => panic!("expected a jq error, got {other:?}"),
        }
        match run_jaq("save.json", "no_such_fn", &json!({})) {
            Err(Error::Jq { message, .. }) => assert!(message.contains("no_such_fn"), "{message}"),
            other => panic!("expected a jq error, got {other:?}"),
        }
    }
}
