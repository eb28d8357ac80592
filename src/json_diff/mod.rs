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

pub(crate) mod path;

use path::{Key, Path};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{
    collections::{HashMap, HashSet},
    fmt,
};
use tracing::{debug, trace};

use crate::domain::{Item, JsonKind};

/// Mode for how JSON values should be compared.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum CompareMode {
    /// Fields present in the document but absent from the expected value are ignored.
    #[default]
    Inclusive,
    /// Fields present in the document but absent from the expected value are reported
    /// as excess.
    Strict,
}

/// Configuration for how a JSON document is matched against an expected value.
///
/// Deserializes from `{"strict": true}`; `exact_match` is accepted as an alias.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, alias = "exact_match")]
    strict: bool,
}

impl Config {
    /// Create a new [`Config`] using the given [`CompareMode`].
    pub fn new(compare_mode: CompareMode) -> Self {
        Self::default().compare_mode(compare_mode)
    }

    /// Change the config's compare mode.
    pub fn compare_mode(mut self, compare_mode: CompareMode) -> Self {
        self.strict = compare_mode == CompareMode::Strict;
        self
    }

    /// Switch strict mode on or off.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }
}

/// Depth-first view of a JSON tree: every node by path plus the paths of all array elements.
#[derive(Debug, Default)]
pub(crate) struct Flattened<'a> {
    items: Vec<Item<'a>>,
    index: HashMap<Path<'a>, usize>,
    array_indices: Vec<Path<'a>>,
}

impl<'a> Flattened<'a> {
    pub(crate) fn new(json: &'a Value) -> Self {
        let mut flattened = Self::default();
        flattened.fold(json, Path::Root);
        flattened
    }

    fn fold(&mut self, json: &'a Value, path: Path<'a>) {
        match json {
            Value::Object(map) => {
                self.push(Item::container(path.clone(), JsonKind::Object, map.len()));
                for (key, value) in map {
                    self.fold(value, path.append(Key::Field(key)));
                }
            }
            Value::Array(values) => {
                self.push(Item::container(path.clone(), JsonKind::Array, values.len()));
                for (idx, value) in values.iter().enumerate() {
                    let element = path.append(Key::Idx(idx));
                    self.array_indices.push(element.clone());
                    self.fold(value, element);
                }
            }
            leaf => self.push(Item::leaf(path, leaf)),
        }
    }

    fn push(&mut self, item: Item<'a>) {
        self.index.insert(item.path.clone(), self.items.len());
        self.items.push(item);
    }

    pub(crate) fn get(&self, path: &Path<'a>) -> Option<&Item<'a>> {
        self.index.get(path).map(|&idx| &self.items[idx])
    }

    /// Leaves and empty containers, the nodes with nothing beneath them.
    pub(crate) fn terminals(&self) -> impl Iterator<Item = &Item<'a>> {
        self.items
            .iter()
            .filter(|item| item.kind.is_leaf() || item.len == 0)
    }
}

/// A single way in which the document fails to conform to the expected value.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Difference<'a> {
    NotFound {
        path: Path<'a>,
    },
    Type {
        path: Path<'a>,
        actual: JsonKind,
        expected: JsonKind,
    },
    Value {
        path: Path<'a>,
        actual: String,
        expected: String,
    },
    ExcessArrayElement {
        path: Path<'a>,
    },
    ExcessField {
        path: Path<'a>,
    },
}

impl<'a> fmt::Display for Difference<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Difference::NotFound { path } => write!(f, "'{}' not found", path),
            Difference::Type {
                path,
                actual,
                expected,
            } => write!(
                f,
                "Type for '{}' was {} but should have been {}",
                path, actual, expected
            ),
            Difference::Value {
                path,
                actual,
                expected,
            } => write!(
                f,
                "Value for '{}' was '{}' but should have been '{}'",
                path, actual, expected
            ),
            Difference::ExcessArrayElement { path } => {
                write!(f, "Excess array elements in the JSON document: '{}'", path)
            }
            Difference::ExcessField { path } => {
                write!(f, "Excess found in the JSON document: '{}'", path)
            }
        }
    }
}

/// Compares `actual` against `expected` and returns every difference found, in report order:
/// missing, type and value mismatches in expected traversal order, then excess array
/// elements, then (strict mode only) excess fields.
pub(crate) fn diff<'a>(
    actual: &'a Value,
    expected: &'a Value,
    config: &Config,
) -> Vec<Difference<'a>> {
    let actual = Flattened::new(actual);
    let expected = Flattened::new(expected);
    debug!(
        actual_nodes = actual.items.len(),
        actual_array_elements = actual.array_indices.len(),
        expected_nodes = expected.items.len(),
        expected_array_elements = expected.array_indices.len(),
        strict = config.is_strict(),
        "flattened documents"
    );

    let mut acc = vec![];
    // paths whose kinds disagree; nothing beneath them is compared
    let mut pruned: Vec<Path<'a>> = vec![];
    let mut reported: HashSet<Path<'a>> = HashSet::new();

    for item in &expected.items {
        if pruned.iter().any(|p| p.prefixes(&item.path)) {
            continue;
        }

        match actual.get(&item.path) {
            None => {
                // a missing non-empty container surfaces through its missing leaves
                if item.kind.is_leaf() || item.len == 0 {
                    acc.push(Difference::NotFound {
                        path: item.path.clone(),
                    });
                }
            }
            Some(found) if found.kind != item.kind => {
                acc.push(Difference::Type {
                    path: item.path.clone(),
                    actual: found.kind,
                    expected: item.kind,
                });
                pruned.push(item.path.clone());
                reported.insert(item.path.clone());
            }
            Some(found) if found.value != item.value => {
                acc.push(Difference::Value {
                    path: item.path.clone(),
                    actual: found.value.clone(),
                    expected: item.value.clone(),
                });
                reported.insert(item.path.clone());
            }
            Some(_) => {}
        }
    }

    let expected_indices: HashSet<&Path<'a>> = expected.array_indices.iter().collect();
    let mut excess_indices: HashSet<Path<'a>> = HashSet::new();
    for path in &actual.array_indices {
        if expected_indices.contains(path) || pruned.iter().any(|p| p.prefixes(path)) {
            continue;
        }

        excess_indices.insert(path.clone());
        acc.push(Difference::ExcessArrayElement { path: path.clone() });
    }

    if config.is_strict() {
        for item in actual.terminals() {
            if expected.get(&item.path).is_some()
                || reported.contains(&item.path)
                || pruned.iter().any(|p| p.prefixes(&item.path))
                || excess_indices.contains(&item.path)
            {
                continue;
            }

            acc.push(Difference::ExcessField {
                path: item.path.clone(),
            });
        }
    }

    for difference in &acc {
        trace!(%difference, "difference found");
    }
    debug!(differences = acc.len(), "comparison finished");

    acc
}
