//! Canonical types exchanged with the data-access layer.

use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// A sorted-set entry: member plus score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMember {
    member: Vec<u8>,
    score: f64,
}

impl ScoredMember {
    pub fn new(member: impl Into<Vec<u8>>, score: f64) -> Self {
        Self {
            member: member.into(),
            score,
        }
    }

    pub fn member(&self) -> &[u8] {
        &self.member
    }

    pub fn score(&self) -> f64 {
        self.score
    }
}

/// Insertion-ordered string map.
///
/// Re-inserting a key replaces its value but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValueMap {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl FieldValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Insert a value, returning the previous one for that key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.index.get(&key) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos].1, value)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.index.get(key).map(|&pos| self.entries[pos].1.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Serialize for FieldValueMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

/// `LIMIT offset count` window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub offset: i64,
    pub count: i64,
}

impl Range {
    pub fn new(offset: i64, count: i64) -> Self {
        Self { offset, count }
    }
}

/// Options for `SORT`. Every option is optional; unset options keep the
/// server defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortParameters {
    pub by_pattern: Option<Vec<u8>>,
    pub get_patterns: Option<Vec<Vec<u8>>>,
    pub limit: Option<Range>,
    pub order: Option<Order>,
    pub alphabetic: Option<bool>,
}

impl SortParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by(mut self, pattern: impl Into<Vec<u8>>) -> Self {
        self.by_pattern = Some(pattern.into());
        self
    }

    /// Add a `GET` pattern; may be called repeatedly.
    pub fn get(mut self, pattern: impl Into<Vec<u8>>) -> Self {
        self.get_patterns
            .get_or_insert_with(Vec::new)
            .push(pattern.into());
        self
    }

    pub fn limit(mut self, offset: i64, count: i64) -> Self {
        self.limit = Some(Range::new(offset, count));
        self
    }

    pub fn order(mut self, order: Order) -> Self {
        self.order = Some(order);
        self
    }

    pub fn alpha(mut self, alphabetic: bool) -> Self {
        self.alphabetic = Some(alphabetic);
        self
    }
}

/// Where `LINSERT` places the new element relative to the pivot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Before,
    After,
}
