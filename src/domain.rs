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

use serde_json::Value;

use crate::json_diff::path::Path;

/// Kind of a JSON node as it shows up in mismatch messages.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum JsonKind {
    Object,
    Array,
    String,
    Number,
    Boolean,
    Null,
}

impl JsonKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Object(_) => JsonKind::Object,
            Value::Array(_) => JsonKind::Array,
            Value::String(_) => JsonKind::String,
            Value::Number(_) => JsonKind::Number,
            Value::Bool(_) => JsonKind::Boolean,
            Value::Null => JsonKind::Null,
        }
    }

    /// Leaves are compared by value; containers only by kind.
    pub fn is_leaf(&self) -> bool {
        !matches!(self, JsonKind::Object | JsonKind::Array)
    }
}

impl Display for JsonKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JsonKind::Object => write!(f, "Object"),
            JsonKind::Array => write!(f, "Array"),
            JsonKind::String => write!(f, "String"),
            JsonKind::Number => write!(f, "Number"),
            JsonKind::Boolean => write!(f, "Boolean"),
            JsonKind::Null => write!(f, "Null"),
        }
    }
}

/// One node of a flattened JSON tree.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Item<'a> {
    pub path: Path<'a>,
    pub kind: JsonKind,
    // textual form of a leaf, empty for containers
    pub value: String,
    // number of direct children, zero for leaves
    pub len: usize,
}

impl<'a> Item<'a> {
    pub(crate) fn leaf(path: Path<'a>, value: &Value) -> Self {
        let text = match value {
            Value::String(text) => text.clone(),
            Value::Null => "null".to_string(),
            // the number's source text, never a float round trip
            Value::Number(number) => number.to_string(),
            other => other.to_string(),
        };

        Self {
            path,
            kind: JsonKind::of(value),
            value: text,
            len: 0,
        }
    }

    pub(crate) fn container(path: Path<'a>, kind: JsonKind, len: usize) -> Self {
        Self {
            path,
            kind,
            value: String::new(),
            len,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json_diff::path::Key;
    use serde_json::json;

    #[test]
    fn test_kind_of() {
        assert_eq!(JsonKind::of(&json!({})), JsonKind::Object);
        assert_eq!(JsonKind::of(&json!([])), JsonKind::Array);
        assert_eq!(JsonKind::of(&json!("x")), JsonKind::String);
        assert_eq!(JsonKind::of(&json!(1.5)), JsonKind::Number);
        assert_eq!(JsonKind::of(&json!(false)), JsonKind::Boolean);
        assert_eq!(JsonKind::of(&json!(null)), JsonKind::Null);
    }

    #[test]
    fn test_leaf_text() {
        let path = Path::Root.append(Key::Field("a"));
        assert_eq!(Item::leaf(path.clone(), &json!("Jenny")).value, "Jenny");
        assert_eq!(Item::leaf(path.clone(), &json!(true)).value, "true");
        assert_eq!(Item::leaf(path.clone(), &json!(null)).value, "null");
        assert_eq!(Item::leaf(path.clone(), &json!(42)).value, "42");
        assert_eq!(Item::leaf(path, &json!(12.45)).value, "12.45");
    }

    #[test]
    fn test_leaf_number_keeps_source_text() {
        let parsed: Value =
            serde_json::from_str(r#"[12.4500, 12345678901234567890123, 0.10000000000000000001]"#)
                .unwrap();
        let texts: Vec<String> = parsed
            .as_array()
            .unwrap()
            .iter()
            .map(|value| Item::leaf(Path::Root, value).value)
            .collect();
        assert_eq!(
            texts,
            vec!["12.4500", "12345678901234567890123", "0.10000000000000000001"]
        );
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(JsonKind::String.to_string(), "String");
        assert_eq!(JsonKind::Boolean.to_string(), "Boolean");
        assert!(JsonKind::Null.is_leaf());
        assert!(!JsonKind::Array.is_leaf());
    }
}
