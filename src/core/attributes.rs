//! Generic attribute introspection
//!
//! Every block declares its introspectable fields as a name → value mapping.
//! [`introspect`] applies a key selection and an exclusion list to that
//! mapping. Exclusion is applied after selection, so an excluded name never
//! appears in a result even when it was explicitly requested.

use serde::Serialize;
use std::collections::BTreeMap;

use super::block::BlockError;
use super::value::Value;

/// Name → value mapping describing a block's state
pub type Attributes = BTreeMap<String, Value>;

/// Which attributes a `get` call asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keys {
    /// Every attribute
    All,
    /// Exactly these attributes, returned as a mapping
    Many(Vec<String>),
    /// A single attribute, returned as a bare value
    One(String),
}

impl Keys {
    pub fn many<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Keys::Many(names.into_iter().map(Into::into).collect())
    }

    pub fn one(name: impl Into<String>) -> Self {
        Keys::One(name.into())
    }
}

impl From<&str> for Keys {
    fn from(name: &str) -> Self {
        Keys::One(name.to_string())
    }
}

impl From<String> for Keys {
    fn from(name: String) -> Self {
        Keys::One(name)
    }
}

impl From<&[&str]> for Keys {
    fn from(names: &[&str]) -> Self {
        Keys::many(names.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for Keys {
    fn from(names: [&str; N]) -> Self {
        Keys::many(names)
    }
}

impl From<Vec<String>> for Keys {
    fn from(names: Vec<String>) -> Self {
        Keys::Many(names)
    }
}

impl From<Option<Vec<String>>> for Keys {
    fn from(names: Option<Vec<String>>) -> Self {
        names.map_or(Keys::All, Keys::Many)
    }
}

/// Result of an introspection call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Introspection {
    /// Mapping result of [`Keys::All`] or [`Keys::Many`]
    Map(Attributes),
    /// Scalar result of [`Keys::One`]
    Value(Value),
}

impl Introspection {
    pub fn into_map(self) -> Option<Attributes> {
        match self {
            Introspection::Map(map) => Some(map),
            Introspection::Value(_) => None,
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Introspection::Value(value) => Some(value),
            Introspection::Map(_) => None,
        }
    }
}

/// Select attributes by `keys`, then drop every name in `exclude`
///
/// Names in `exclude` that are not part of the result are ignored. A single
/// excluded key is reported as [`BlockError::KeyNotFound`], the same as a key
/// that does not exist.
pub fn introspect(
    mut attributes: Attributes,
    keys: &Keys,
    exclude: &[&str],
) -> Result<Introspection, BlockError> {
    match keys {
        Keys::All => {
            for name in exclude {
                attributes.remove(*name);
            }
            Ok(Introspection::Map(attributes))
        }
        Keys::Many(names) => {
            let mut selected = Attributes::new();
            for name in names {
                let value = attributes
                    .remove(name)
                    .or_else(|| selected.get(name).cloned())
                    .ok_or_else(|| BlockError::KeyNotFound(name.clone()))?;
                selected.insert(name.clone(), value);
            }
            for name in exclude {
                selected.remove(*name);
            }
            Ok(Introspection::Map(selected))
        }
        Keys::One(name) => {
            if exclude.contains(&name.as_str()) {
                return Err(BlockError::KeyNotFound(name.clone()));
            }
            attributes
                .remove(name)
                .map(Introspection::Value)
                .ok_or_else(|| BlockError::KeyNotFound(name.clone()))
        }
    }
}
