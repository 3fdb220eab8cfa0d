use serde::{Deserialize, Serialize};

use crate::cursor::BinaryCursor;
use crate::error::Result;

/// Ordered key → value string metadata.
///
/// Used for every tag scope in a file (system and user metadata, each stream,
/// each layout, each frame); every scope owns its own instance. Keys are
/// unique: inserting an existing key replaces its value in place, so the
/// first occurrence keeps its position and the last value wins.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagDictionary {
    entries: Vec<(String, String)>,
}

impl TagDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `count` (key, value) string pairs.
    pub fn read_from(cursor: &mut BinaryCursor<'_>, count: u16) -> Result<Self> {
        let mut tags = Self {
            entries: Vec::with_capacity(count as usize),
        };
        for _ in 0..count {
            let key = cursor.read_length_prefixed_string()?;
            let value = cursor.read_length_prefixed_string()?;
            tags.insert(key, value);
        }
        Ok(tags)
    }

    /// Read a `u16` tag count followed by that many pairs.
    pub fn read_counted(cursor: &mut BinaryCursor<'_>) -> Result<Self> {
        let count = cursor.read_u16()?;
        Self::read_from(cursor, count)
    }

    /// Insert or replace. Returns the previous value for `key`, if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TagDictionary {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tags = Self::new();
        for (k, v) in iter {
            tags.insert(k, v);
        }
        tags
    }
}
