//! Keyword options and positional arguments
//!
//! Blocks are configured the same way at construction and at runtime: a bag of
//! named options is handed down the type's chain, each level *takes* the keys it
//! recognizes and passes the remainder on. Whatever is left at the end is
//! reported as unknown.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

use super::block::BlockError;
use super::value::Value;

/// Insertion-ordered set of named options
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    entries: Vec<(String, Value)>,
}

impl Options {
    /// Create an empty option set
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert an option, replacing an existing value for the same key in place
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Remove and return an option
    pub fn take(&mut self, key: &str) -> Option<Value> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    /// Remove a string option
    ///
    /// Fails with [`BlockError::InvalidValue`] if the key is present with a
    /// non-string value; the key is consumed either way.
    pub fn take_string(&mut self, key: &str) -> Result<Option<String>, BlockError> {
        match self.take(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(BlockError::invalid_value(key, "string", &other)),
        }
    }

    /// Remove a boolean option
    pub fn take_bool(&mut self, key: &str) -> Result<Option<bool>, BlockError> {
        match self.take(key) {
            None => Ok(None),
            Some(Value::Boolean(b)) => Ok(Some(b)),
            Some(other) => Err(BlockError::invalid_value(key, "boolean", &other)),
        }
    }

    /// Look up an option without consuming it
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Option names in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse options from a JSON object
    ///
    /// # Example
    /// ```
    /// use ctrl_block::core::options::Options;
    ///
    /// let options = Options::from_json(r#"{"enabled": false, "endln": ";"}"#).unwrap();
    /// assert_eq!(options.len(), 2);
    /// ```
    pub fn from_json(text: &str) -> Result<Self, BlockError> {
        let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(text)
            .map_err(|e| BlockError::Config(format!("Invalid options: {}", e)))?;

        let mut options = Options::new();
        for (key, json) in map {
            let value: Value = serde_json::from_value(json)
                .map_err(|e| BlockError::Config(format!("Invalid value for '{}': {}", key, e)))?;
            options.insert(key, value);
        }
        Ok(options)
    }

    /// Fail with the runtime "cannot set" error if anything is left over
    pub fn ensure_settled(self) -> Result<(), BlockError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(BlockError::Config(format!(
                "Does not know how to set '{}'",
                self
            )))
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Options {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut options = Options::new();
        for (k, v) in iter {
            options.insert(k, v);
        }
        options
    }
}

impl Serialize for Options {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl fmt::Display for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

/// Positional arguments plus named options, as handed to a constructor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    pub positional: Vec<Value>,
    pub named: Options,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Add a named option
    pub fn opt(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.named.insert(key, value);
        self
    }

    /// Fail if any argument was not claimed during construction
    ///
    /// Positional leftovers are reported before named ones.
    pub fn finish(self) -> Result<(), BlockError> {
        if !self.positional.is_empty() {
            let listed: Vec<String> = self.positional.iter().map(ToString::to_string).collect();
            return Err(BlockError::unknown_parameters(&listed));
        }
        if !self.named.is_empty() {
            let listed: Vec<String> = self.named.keys().map(str::to_string).collect();
            return Err(BlockError::unknown_parameters(&listed));
        }
        Ok(())
    }
}

impl From<Options> for Args {
    fn from(named: Options) -> Self {
        Self {
            positional: Vec::new(),
            named,
        }
    }
}
