// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Ordered attribute storage for input nodes.
//!
//! Attributes keep their document order. In JSON they are written as an
//! object (`{"open": "[", "close": "]"}`) whose key order is preserved on
//! both read and write.
//!
//! # Absent, blank and present
//!
//! Several rules distinguish an attribute that is missing from one that is
//! present but blank. [`Attributes::lookup`] returns an [`AttributeLookup`]
//! that keeps the three cases apart; [`AttributeLookup::or_default`] then
//! resolves them:
//!
//! | lookup            | `or_default("(")` |
//! |-------------------|-------------------|
//! | `Absent`          | `Some("(")`       |
//! | `Blank`           | `None`            |
//! | `Value("[")`      | `Some("[")`       |

use std::fmt;

use serde::de::{MapAccess, Visitor as SerdeVisitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Result of looking up an attribute by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeLookup<'a> {
    /// The attribute is not set.
    Absent,
    /// The attribute is set to an empty or whitespace-only string.
    Blank,
    /// The attribute is set to a non-blank value (returned raw).
    Value(&'a str),
}

impl<'a> AttributeLookup<'a> {
    /// Resolve against a default: absent gives the default, blank gives
    /// `None`, anything else gives the raw value.
    pub fn or_default(self, default: &'a str) -> Option<&'a str> {
        match self {
            AttributeLookup::Absent => Some(default),
            AttributeLookup::Blank => None,
            AttributeLookup::Value(value) => Some(value),
        }
    }

    /// The value when it is present and non-blank.
    pub fn value(self) -> Option<&'a str> {
        match self {
            AttributeLookup::Value(value) => Some(value),
            AttributeLookup::Absent | AttributeLookup::Blank => None,
        }
    }
}

/// Ordered `(name, value)` attribute pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    /// Create an empty attribute list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an attribute, replacing the value in place if the name is
    /// already set.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.0.push((name, value)),
        }
    }

    /// Raw value of an attribute, blank values included.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Three-way lookup of an attribute.
    pub fn lookup(&self, name: &str) -> AttributeLookup<'_> {
        match self.get(name) {
            None => AttributeLookup::Absent,
            Some(value) if is_blank(value) => AttributeLookup::Blank,
            Some(value) => AttributeLookup::Value(value),
        }
    }

    /// Iterate the attributes in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Returns true when `value` holds only markup whitespace.
///
/// The whitespace class is the one of ECMAScript `\s`: Unicode `White_Space`
/// without U+0085 (NEXT LINE), plus U+FEFF (BYTE ORDER MARK).
fn is_blank(value: &str) -> bool {
    value
        .chars()
        .all(|c| c == '\u{FEFF}' || (c != '\u{0085}' && c.is_whitespace()))
}

/// Look up `key`, falling back to `default` when absent and to `None` when
/// present but blank.
pub fn attribute_or_default<'a>(
    attributes: &'a Attributes,
    key: &str,
    default: &'a str,
) -> Option<&'a str> {
    attributes.lookup(key).or_default(default)
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut attributes = Attributes::new();
        for (name, value) in iter {
            attributes.set(name, value);
        }
        attributes
    }
}

impl Serialize for Attributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

struct AttributesVisitor;

impl<'de> SerdeVisitor<'de> for AttributesVisitor {
    type Value = Attributes;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of attribute names to string values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut attributes = Attributes::new();
        while let Some((name, value)) = access.next_entry::<String, String>()? {
            attributes.set(name, value);
        }
        Ok(attributes)
    }
}

impl<'de> Deserialize<'de> for Attributes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(AttributesVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_lookup_three_ways() {
        let a = attrs(&[("open", "["), ("close", "   "), ("separators", "")]);
        assert_eq!(a.lookup("open"), AttributeLookup::Value("["));
        assert_eq!(a.lookup("close"), AttributeLookup::Blank);
        assert_eq!(a.lookup("separators"), AttributeLookup::Blank);
        assert_eq!(a.lookup("notation"), AttributeLookup::Absent);
    }

    #[test]
    fn test_blank_uses_markup_whitespace() {
        let a = attrs(&[("bom", "\u{FEFF}"), ("nel", "\u{0085}"), ("nbsp", " \u{00A0}\u{3000}")]);
        assert_eq!(a.lookup("bom"), AttributeLookup::Blank);
        assert_eq!(a.lookup("nel"), AttributeLookup::Value("\u{0085}"));
        assert_eq!(a.lookup("nbsp"), AttributeLookup::Blank);
        assert_eq!(attribute_or_default(&a, "bom", ","), None);
        assert_eq!(attribute_or_default(&a, "nel", ","), Some("\u{0085}"));
    }

    #[test]
    fn test_attribute_or_default() {
        let a = attrs(&[("open", "{"), ("separators", " \t")]);
        assert_eq!(attribute_or_default(&a, "open", "("), Some("{"));
        assert_eq!(attribute_or_default(&a, "close", ")"), Some(")"));
        assert_eq!(attribute_or_default(&a, "separators", ","), None);
    }

    #[test]
    fn test_value_is_raw() {
        let a = attrs(&[("linethickness", " 2px ")]);
        assert_eq!(a.lookup("linethickness").value(), Some(" 2px "));
        assert_eq!(a.lookup("missing").value(), None);
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut a = attrs(&[("a", "1"), ("b", "2")]);
        a.set("a", "3");
        let pairs: Vec<_> = a.iter().collect();
        assert_eq!(pairs, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn test_json_preserves_order() {
        let a: Attributes =
            serde_json::from_str(r#"{"close": "]", "open": "[", "separators": ";"}"#).unwrap();
        let names: Vec<_> = a.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["close", "open", "separators"]);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            r#"{"close":"]","open":"[","separators":";"}"#
        );
    }
}
