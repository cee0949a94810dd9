use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// Deserialize with JSON-path context in error messages.
/// `file` only labels the error.
pub fn from_str_with_path<T: DeserializeOwned>(file: &str, src: &str) -> Result<T> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| path_error(file, err))
}

/// Same as [`from_str_with_path`], for an already-parsed document.
pub fn from_value_with_path<T: DeserializeOwned>(file: &str, value: serde_json::Value) -> Result<T> {
    serde_path_to_error::deserialize::<_, T>(value).map_err(|err| path_error(file, err))
}

fn path_error<E: std::fmt::Display>(file: &str, err: serde_path_to_error::Error<E>) -> Error {
    Error::Json {
        file: file.to_string(),
        path: err.path().to_string(),
        message: err.into_inner().to_string(),
    }
}
