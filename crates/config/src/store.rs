//! Entry store holding raw configuration values

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;
use types::{utils, BindError, RawValue, Result};

const TOKEN_PREFIX: &str = "--";

/// Ordered mapping from key to raw value
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct EntryStore {
    entries: BTreeMap<String, RawValue>,
}

impl EntryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `--key=value` / `--key` tokens.
    ///
    /// A repeated `--key=value` promotes the entry to a list and further
    /// repeats append to it. A bare `--key` stores a `true` flag. Tokens
    /// before a malformed one stay applied.
    pub fn add_tokens<I, S>(&mut self, tokens: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for token in tokens {
            let token = token.as_ref();
            let body = token
                .strip_prefix(TOKEN_PREFIX)
                .ok_or_else(|| BindError::MalformedArgument {
                    argument: token.to_string(),
                })?;

            match utils::split_assignment(body) {
                (key, Some(value)) => self.accumulate(key, value),
                (key, None) => {
                    debug!(key = %key, "Storing flag");
                    self.entries.insert(key.to_string(), RawValue::Flag(true));
                }
            }
        }

        Ok(())
    }

    /// Merge a generic mapping, last write wins
    pub fn add_mapping<I, K, V>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<RawValue>,
    {
        for (key, value) in entries {
            let key = key.into();
            let value = value.into();
            debug!(key = %key, kind = value.kind(), "Merging entry");
            self.entries.insert(key, value);
        }
    }

    /// Merge a string property set, last write wins
    pub fn add_properties<I, K, V>(&mut self, properties: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.add_mapping(
            properties
                .into_iter()
                .map(|(key, value)| (key, RawValue::Text(value.into()))),
        );
    }

    /// Raw value stored under `key`
    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.entries.get(key)
    }

    /// Whether `key` has an entry
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn accumulate(&mut self, key: &str, value: &str) {
        // Flags and pre-typed values are replaced, never promoted
        let next = match self.entries.remove(key) {
            Some(RawValue::List(mut values)) => {
                values.push(value.to_string());
                debug!(key = %key, count = values.len(), "Appended to list entry");
                RawValue::List(values)
            }
            Some(RawValue::Text(previous)) => {
                debug!(key = %key, "Promoted entry to list");
                RawValue::List(vec![previous, value.to_string()])
            }
            _ => {
                debug!(key = %key, "Storing entry");
                RawValue::Text(value.to_string())
            }
        };
        self.entries.insert(key.to_string(), next);
    }
}
