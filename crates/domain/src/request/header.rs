//! HTTP header multimap

use indexmap::IndexMap;

/// Values stored under one header name, keeping the first spelling seen.
#[derive(Debug, Clone, PartialEq, Eq)]
struct HeaderEntry {
    name: String,
    values: Vec<String>,
}

/// An ordered collection of HTTP headers.
///
/// Names compare case-insensitively. Each name maps to an ordered list of
/// values; insertion order of names is preserved for the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    items: IndexMap<String, HeaderEntry>,
}

impl Headers {
    /// Creates an empty header collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn key(name: &str) -> String {
        name.to_ascii_lowercase()
    }

    /// Appends a value under `name`, keeping any existing values.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.items
            .entry(Self::key(&name))
            .or_insert_with(|| HeaderEntry {
                name,
                values: Vec::new(),
            })
            .values
            .push(value.into());
    }

    /// Replaces every value under `name` with `value`.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let key = Self::key(&name);
        self.items.insert(
            key,
            HeaderEntry {
                name,
                values: vec![value.into()],
            },
        );
    }

    /// Returns the first value stored under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.items
            .get(&Self::key(name))
            .and_then(|entry| entry.values.first())
            .map(String::as_str)
    }

    /// Returns every value stored under `name`.
    #[must_use]
    pub fn get_all(&self, name: &str) -> &[String] {
        self.items
            .get(&Self::key(name))
            .map_or(&[], |entry| entry.values.as_slice())
    }

    /// Returns true if at least one value is stored under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.items.contains_key(&Self::key(name))
    }

    /// Iterates `(name, value)` pairs, one per value, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.items.values().flat_map(|entry| {
            entry
                .values
                .iter()
                .map(move |value| (entry.name.as_str(), value.as_str()))
        })
    }

    /// Returns the number of distinct header names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if there are no headers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.add(name, value);
        }
        headers
    }
}
