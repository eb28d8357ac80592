// Copyright 2024 The DocAssert Authors
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt::Display;

/// The expected value cannot be turned into a JSON tree.
///
/// This points at a malformed expectation rather than at the document under test,
/// so it aborts matching before any difference is collected.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum NormalizeError {
    #[error("Type '{0}' not supported")]
    UnsupportedType(&'static str),

    #[error("Map keys must be strings, found a key of type '{0}'")]
    NonStringKey(&'static str),

    #[error("'{0}' is not a valid JSON number")]
    InvalidDecimal(String),

    #[error("{0}")]
    Custom(String),
}

impl serde::ser::Error for NormalizeError {
    fn custom<T: Display>(msg: T) -> Self {
        NormalizeError::Custom(msg.to_string())
    }
}

/// Every mismatch found while matching a document, in the order they were found.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
#[error("Json validation failed. Problem(s):\n{}", .errors.join("\n"))]
pub struct ValidationFailed {
    pub errors: Vec<String>,
}

impl ValidationFailed {
    pub fn new(errors: Vec<String>) -> Self {
        ValidationFailed { errors }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum ValidationError {
    #[error(transparent)]
    Failed(#[from] ValidationFailed),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

/// Failure to match the JSON body of an HTTP response.
#[derive(Debug, thiserror::Error)]
pub enum ResponseError {
    #[error("error reading the response body: {0}")]
    Body(#[from] reqwest::Error),

    #[error("error parsing JSON response from the server: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<NormalizeError> for ResponseError {
    fn from(err: NormalizeError) -> Self {
        ResponseError::Validation(ValidationError::Normalize(err))
    }
}

impl From<ValidationFailed> for ResponseError {
    fn from(err: ValidationFailed) -> Self {
        ResponseError::Validation(ValidationError::Failed(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_failed_message() {
        let err = ValidationFailed::new(vec![
            "'$.id' not found".to_string(),
            "Excess found in the JSON document: '$.b'".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "Json validation failed. Problem(s):\n'$.id' not found\nExcess found in the JSON document: '$.b'"
        );
    }

    #[test]
    fn test_validation_error_is_transparent() {
        let err: ValidationError = NormalizeError::UnsupportedType("u16").into();
        assert_eq!(err.to_string(), "Type 'u16' not supported");

        let err: ValidationError = ValidationFailed::new(vec!["'$' not found".to_string()]).into();
        assert_eq!(
            err.to_string(),
            "Json validation failed. Problem(s):\n'$' not found"
        );
    }
}
