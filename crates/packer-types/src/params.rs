//! Ordered parameter sets for a single method call.

use crate::value::Value;

/// Access credential parameter, supplied by the transport instead.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Protocol version parameter, supplied by the transport instead.
pub const VERSION_KEY: &str = "v";
/// Keys starting with this character carry client-side metadata.
pub const META_KEY_PREFIX: char = ':';

/// Whether `key` must stay out of generated script source.
pub fn is_reserved_key(key: &str) -> bool {
    key == ACCESS_TOKEN_KEY || key == VERSION_KEY || key.starts_with(META_KEY_PREFIX)
}

/// Ordered mapping of parameter name to [`Value`].
///
/// Keys are unique: setting an existing key replaces its value in place, so
/// the original position is kept.
///
/// ```
/// use packer_types::Params;
///
/// let params = Params::new()
///     .with("user_ids", vec![1, 2])
///     .with("fields", "photo_100");
/// assert_eq!(params.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: Vec<(String, Value)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Params::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Insert or replace `key`. Returns the previous value, if any.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Entries that may appear in generated source (reserved keys skipped).
    pub fn visible(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.iter().filter(|(k, _)| !is_reserved_key(k))
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.set(k, v);
        }
        params
    }
}
