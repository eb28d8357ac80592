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

use std::fmt;

/// Address of a node inside a JSON tree, rendered as `$`, `$.field` or `$.list[0]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum Path<'a> {
    Root,
    Keys(Vec<Key<'a>>),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub(crate) enum Key<'a> {
    Idx(usize),
    Field(&'a str),
}

impl<'a> fmt::Display for Key<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Key::Idx(idx) => write!(f, "[{}]", idx),
            Key::Field(key) => write!(f, ".{}", key),
        }
    }
}

impl<'a> Path<'a> {
    pub(crate) fn append(&self, next: Key<'a>) -> Path<'a> {
        match self {
            Path::Root => Path::Keys(vec![next]),
            Path::Keys(list) => {
                let mut copy = list.clone();
                copy.push(next);
                Path::Keys(copy)
            }
        }
    }

    /// Whether `self` is `other` or one of its ancestors.
    pub(crate) fn prefixes(&self, other: &Path) -> bool {
        match (self, other) {
            (Path::Root, _) => true,
            (Path::Keys(_), Path::Root) => false,
            (Path::Keys(ancestor), Path::Keys(descendant)) => {
                ancestor.len() <= descendant.len()
                    && ancestor
                        .iter()
                        .zip(descendant.iter())
                        .all(|(lhs, rhs)| lhs == rhs)
            }
        }
    }
}

impl<'a> fmt::Display for Path<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "$")?;
        if let Path::Keys(keys) = self {
            for key in keys {
                write!(f, "{}", key)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Path::Root.to_string(), "$");

        let path = Path::Root
            .append(Key::Field("shadows"))
            .append(Key::Idx(1))
            .append(Key::Field("name"));
        assert_eq!(path.to_string(), "$.shadows[1].name");

        let path = Path::Root.append(Key::Idx(0)).append(Key::Idx(2));
        assert_eq!(path.to_string(), "$[0][2]");
    }

    #[test]
    fn test_append_leaves_parent_untouched() {
        let parent = Path::Root.append(Key::Field("a"));
        let child = parent.append(Key::Field("b"));
        assert_eq!(parent, Path::Keys(vec![Key::Field("a")]));
        assert_eq!(child, Path::Keys(vec![Key::Field("a"), Key::Field("b")]));
    }

    #[test]
    fn test_prefixes() {
        let root = Path::Root;
        let a = root.append(Key::Field("a"));
        let a_b = a.append(Key::Field("b"));
        let a_0 = a.append(Key::Idx(0));
        let c = root.append(Key::Field("c"));

        assert!(root.prefixes(&root));
        assert!(root.prefixes(&a_b));
        assert!(a.prefixes(&a));
        assert!(a.prefixes(&a_b));
        assert!(a.prefixes(&a_0));
        assert!(!a_b.prefixes(&a));
        assert!(!a.prefixes(&root));
        assert!(!c.prefixes(&a_b));
        assert!(!a_0.prefixes(&a_b));
    }

    #[test]
    fn test_field_and_index_keys_differ() {
        let field = Path::Root.append(Key::Field("0"));
        let index = Path::Root.append(Key::Idx(0));
        assert_ne!(field, index);
        assert!(!field.prefixes(&index));
    }
}
