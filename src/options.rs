//! Renderer options and their translation into command-line tokens.
//!
//! Option keys are passed through to the renderer verbatim as `--key` flags,
//! there is no closed enumeration. Insertion order of keys determines the
//! order of the emitted flags; updating an existing key keeps its position.

use crate::{Error, Result};

/// Value attached to a single renderer option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// Flag with no argument, e.g. `--quiet`
    Flag,
    /// Single argument, e.g. `--format jpg`. An empty string behaves like
    /// [`OptionValue::Flag`].
    Value(String),
    /// Repeatable key/value argument, e.g. cookies or custom headers. Each
    /// pair produces its own occurrence of the flag.
    Pairs(Vec<(String, String)>),
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Value(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::Value(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        OptionValue::Value(value.to_string())
    }
}

impl From<u64> for OptionValue {
    fn from(value: u64) -> Self {
        OptionValue::Value(value.to_string())
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        OptionValue::Value(value.to_string())
    }
}

impl From<Vec<(String, String)>> for OptionValue {
    fn from(value: Vec<(String, String)>) -> Self {
        OptionValue::Pairs(value)
    }
}

impl From<Vec<(&str, &str)>> for OptionValue {
    fn from(value: Vec<(&str, &str)>) -> Self {
        OptionValue::Pairs(
            value
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

/// Insertion-ordered mapping of renderer options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    entries: Vec<(String, OptionValue)>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an option, overwriting the value of an existing key in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    /// Set a flag-only option such as `quiet`.
    pub fn flag(&mut self, key: impl Into<String>) -> &mut Self {
        self.set(key, OptionValue::Flag)
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Merge `other` on top of this mapping: existing keys keep their
    /// position but take the new value, unknown keys are appended in order.
    pub(crate) fn merge(&mut self, other: Options) {
        for (key, value) in other.entries {
            self.set(key, value);
        }
    }

    /// Normalized `(flag, value)` pairs in insertion order. Keys are
    /// lower-cased and prefixed with `--` unless the prefix is already there;
    /// each pair of a repeatable value yields its own emission.
    pub(crate) fn normalize(&self) -> Result<Vec<(String, Emission)>> {
        let mut out = Vec::new();
        for (key, value) in &self.entries {
            let flag = normalize_key(key);
            match value {
                OptionValue::Flag => out.push((flag, Emission::None)),
                OptionValue::Value(v) if v.is_empty() => out.push((flag, Emission::None)),
                OptionValue::Value(v) => out.push((flag, Emission::Single(v.clone()))),
                OptionValue::Pairs(pairs) => {
                    for (first, second) in pairs {
                        if first.is_empty() || second.is_empty() {
                            return Err(Error::InvalidOptionValue { option: key.clone() });
                        }
                        out.push((flag.clone(), Emission::Pair(first.clone(), second.clone())));
                    }
                }
            }
        }
        Ok(out)
    }

    /// Flat token sequence: the flag token is always emitted, value tokens
    /// only when present, so flag-only options never leave a trailing empty
    /// token but still appear in the vector (the `--xvfb` sentinel relies on
    /// this).
    pub fn to_tokens(&self) -> Result<Vec<String>> {
        let mut tokens = Vec::new();
        for (flag, emission) in self.normalize()? {
            tokens.push(flag);
            match emission {
                Emission::None => {}
                Emission::Single(v) => tokens.push(v),
                Emission::Pair(first, second) => {
                    tokens.push(first);
                    tokens.push(second);
                }
            }
        }
        Ok(tokens)
    }
}

impl<K: Into<String>, V: Into<OptionValue>> FromIterator<(K, V)> for Options {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut options = Options::new();
        for (key, value) in iter {
            options.set(key, value);
        }
        options
    }
}

impl<'de> serde::Deserialize<'de> for OptionValue {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct ValueVisitor;

        impl<'de> serde::de::Visitor<'de> for ValueVisitor {
            type Value = OptionValue;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("null, a string, a number, or a list of string pairs")
            }

            fn visit_unit<E>(self) -> std::result::Result<OptionValue, E>
            where
                E: serde::de::Error,
            {
                Ok(OptionValue::Flag)
            }

            fn visit_none<E>(self) -> std::result::Result<OptionValue, E>
            where
                E: serde::de::Error,
            {
                Ok(OptionValue::Flag)
            }

            // Booleans mark presence only, e.g. {"quiet": false}.
            fn visit_bool<E>(self, _: bool) -> std::result::Result<OptionValue, E>
            where
                E: serde::de::Error,
            {
                Ok(OptionValue::Flag)
            }

            fn visit_str<E>(self, v: &str) -> std::result::Result<OptionValue, E>
            where
                E: serde::de::Error,
            {
                Ok(OptionValue::Value(v.to_string()))
            }

            fn visit_i64<E>(self, v: i64) -> std::result::Result<OptionValue, E>
            where
                E: serde::de::Error,
            {
                Ok(OptionValue::Value(v.to_string()))
            }

            fn visit_u64<E>(self, v: u64) -> std::result::Result<OptionValue, E>
            where
                E: serde::de::Error,
            {
                Ok(OptionValue::Value(v.to_string()))
            }

            fn visit_f64<E>(self, v: f64) -> std::result::Result<OptionValue, E>
            where
                E: serde::de::Error,
            {
                Ok(OptionValue::Value(v.to_string()))
            }

            fn visit_seq<A>(self, mut seq: A) -> std::result::Result<OptionValue, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut pairs = Vec::new();
                while let Some(pair) = seq.next_element::<(String, String)>()? {
                    pairs.push(pair);
                }
                Ok(OptionValue::Pairs(pairs))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

impl<'de> serde::Deserialize<'de> for Options {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct MapVisitor;

        impl<'de> serde::de::Visitor<'de> for MapVisitor {
            type Value = Options;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a map of option names to values")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Options, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                let mut options = Options::new();
                while let Some((key, value)) = map.next_entry::<String, OptionValue>()? {
                    options.set(key, value);
                }
                Ok(options)
            }
        }

        deserializer.deserialize_map(MapVisitor)
    }
}

/// Value part of a normalized option emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Emission {
    None,
    Single(String),
    Pair(String, String),
}

fn normalize_key(key: &str) -> String {
    let lowered = key.to_lowercase();
    if lowered.starts_with("--") {
        lowered
    } else {
        format!("--{lowered}")
    }
}
