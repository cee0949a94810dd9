//! Input documents: paths/globs → parsed JSON, optionally narrowed by a JSON
//! pointer and/or a jq filter.
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::definition::VariableDefinition;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Default)]
pub struct DocumentSource {
    /// Literal paths or glob patterns.
    pub inputs: Vec<String>,
    /// Applied first, e.g. `/project/vars`.
    pub json_pointer: Option<String>,
    /// Applied after the pointer; each output is a separate document.
    pub jq_expr: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub file: String,
    pub value: Value,
}

impl DocumentSource {
    pub fn load(&self) -> Result<Vec<Document>> {
        let mut out = Vec::new();
        for source_path in resolve_file_path_patterns(&self.inputs)? {
            let file = source_path.to_string_lossy().to_string();
            tracing::debug!(file = %file, "loading document");
            let value = read_json::<Value>(&source_path)?;
            let value = match self.json_pointer.as_deref() {
                None => value,
                Some(pointer) => value.pointer(pointer).cloned().ok_or_else(|| Error::MissingPointer {
                    file: file.clone(),
                    pointer: pointer.to_string(),
                })?,
            };
            match self.jq_expr.as_deref() {
                None => out.push(Document { file, value }),
                Some(jq_expr) => {
                    for value in crate::jq_exec::run_jaq(&file, jq_expr, &value)? {
                        out.push(Document { file: file.clone(), value });
                    }
                }
            }
        }
        Ok(out)
    }
}

impl Document {
    /// The document as a raw vars map (a JSON object).
    pub fn as_vars_object(&self) -> Result<&Map<String, Value>> {
        self.value.as_object().ok_or_else(|| Error::Json {
            file: self.file.clone(),
            path: ".".to_string(),
            message: "expected an object of variable values".to_string(),
        })
    }
}

/// A JSON array of variable definitions.
pub fn load_definitions(path: &Path) -> Result<Vec<VariableDefinition>> {
    let defs = read_json::<Vec<VariableDefinition>>(path)?;
    tracing::debug!(count = defs.len(), file = %path.display(), "loaded variable definitions");
    Ok(defs)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let source = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    crate::path_de::from_str_with_path(&path.to_string_lossy(), &source)
}

pub fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'['))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let before = out.len();
            for entry in glob::glob(pattern)? {
                out.push(entry?);
            }
            if out.len() == before {
                // explicitly a glob but matched nothing
                return Err(Error::NoGlobMatch(pattern.to_string()));
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
