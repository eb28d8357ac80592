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

#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

use serde::Serialize;
use serde_json::Value;
use std::fmt::Display;

pub use crate::error::{NormalizeError, ResponseError, ValidationError, ValidationFailed};
pub use crate::json_diff::{CompareMode, Config};
pub use crate::normalizer::{normalize, Decimal};
pub use crate::response::{matches_response, matches_str, validate_response, validate_str};

mod domain;
mod error;
mod json_diff;
mod normalizer;
mod response;

/// Outcome of matching a JSON document against an expected value.
///
/// The report holds every mismatch found, in the order they were found: missing
/// values, type and value mismatches first, then excess array elements, then excess
/// fields when the comparison is strict.
///
/// # Examples
///
/// ```
/// use json_conform::{matches_value, Config};
/// use serde_json::json;
///
/// let report = matches_value(&json!({ "level": 2 }), &json!({ "level": 3 }), &Config::default());
/// assert!(!report.is_match());
/// assert_eq!(report.errors(), ["Value for '$.level' was '2' but should have been '3'"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Report {
    errors: Vec<String>,
}

impl Report {
    fn new(errors: Vec<String>) -> Self {
        Self { errors }
    }

    /// Whether the document conforms to the expected value.
    pub fn is_match(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Turns a failed report into a [`ValidationFailed`] carrying its errors.
    pub fn into_result(self) -> Result<(), ValidationFailed> {
        if self.is_match() {
            Ok(())
        } else {
            Err(ValidationFailed::new(self.errors))
        }
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_match() {
            return write!(f, "Json validation passed.");
        }

        write!(f, "{}", self.errors.join("\n"))
    }
}

/// Matches `actual` against `expected`, collecting every mismatch.
///
/// `expected` is first turned into a JSON tree with [`normalize`]; an expected value
/// that can't be represented is an error, mismatches never are.
///
/// # Examples
///
/// ```
/// use json_conform::{matches, CompareMode, Config};
/// use serde::Serialize;
/// use serde_json::json;
///
/// #[derive(Serialize)]
/// struct Hero {
///     name: &'static str,
///     level: i32,
///     id: i32,
/// }
///
/// let actual = json!({ "name": "Jenny Smith", "level": 2 });
/// let expected = Hero { name: "Jenny Doe", level: 2, id: 42 };
///
/// let report = matches(&actual, &expected, &Config::new(CompareMode::Inclusive)).unwrap();
/// assert_eq!(
///     report.errors(),
///     [
///         "Value for '$.name' was 'Jenny Smith' but should have been 'Jenny Doe'",
///         "'$.id' not found",
///     ]
/// );
/// ```
pub fn matches<T>(actual: &Value, expected: &T, config: &Config) -> Result<Report, NormalizeError>
where
    T: ?Sized + Serialize,
{
    let expected = normalize(expected)?;
    Ok(matches_value(actual, &expected, config))
}

/// Matches `actual` against an expected JSON tree that is already built, for instance
/// with [`serde_json::json!`].
pub fn matches_value(actual: &Value, expected: &Value, config: &Config) -> Report {
    let errors = json_diff::diff(actual, expected, config)
        .iter()
        .map(|difference| difference.to_string())
        .collect();
    Report::new(errors)
}

/// Validates `actual` against `expected`, failing with every mismatch found.
///
/// # Examples
///
/// ```
/// use json_conform::{validate, CompareMode, Config};
/// use serde::Serialize;
/// use serde_json::json;
///
/// #[derive(Serialize)]
/// struct Pair {
///     a: i32,
/// }
///
/// let actual = json!({ "a": 1, "b": 2 });
/// assert!(validate(&actual, &Pair { a: 1 }, &Config::default()).is_ok());
///
/// let err = validate(&actual, &Pair { a: 1 }, &Config::new(CompareMode::Strict)).unwrap_err();
/// assert_eq!(
///     err.to_string(),
///     "Json validation failed. Problem(s):\nExcess found in the JSON document: '$.b'"
/// );
/// ```
pub fn validate<T>(actual: &Value, expected: &T, config: &Config) -> Result<(), ValidationError>
where
    T: ?Sized + Serialize,
{
    Ok(matches(actual, expected, config)?.into_result()?)
}

/// Validates `actual` against an already built expected JSON tree.
pub fn validate_value(
    actual: &Value,
    expected: &Value,
    config: &Config,
) -> Result<(), ValidationFailed> {
    matches_value(actual, expected, config).into_result()
}
