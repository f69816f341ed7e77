//! Request parameters and the normalizer that flattens them.
//!
//! Callers build a nested [`RequestParams`] tree; [`normalize`] turns it into a
//! flat, sorted [`NormalizedParams`] set that the signer can canonicalize:
//!
//! ```text
//! { InstanceIds: ["ins-1", "ins-2"], Filters: { Name: "zone" } }
//!   → InstanceIds.0=ins-1, InstanceIds.1=ins-2, Filters.Name=zone
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{ApiError, Result};

// ============ ParamValue ============

/// A single request parameter value.
///
/// `Undefined` means "not set": the key is dropped during normalization.
/// `Null`, `false`, `0` and empty collections are real values and are kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ParamValue {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Array(Vec<ParamValue>),
    Object(RequestParams),
}

impl ParamValue {
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// String slice if this is a [`ParamValue::String`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Value as the normalizer writes it under its own key.
    ///
    /// Collections have no single flat value and render empty.
    pub fn to_flat_string(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => n.to_string(),
            Self::String(s) => s.clone(),
            Self::Undefined | Self::Null | Self::Array(_) | Self::Object(_) => String::new(),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&String> for ParamValue {
    fn from(v: &String) -> Self {
        Self::String(v.clone())
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

macro_rules! impl_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ParamValue {
                fn from(v: $t) -> Self {
                    Self::Number(serde_json::Number::from(v))
                }
            }
        )*
    };
}

impl_from_number!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

impl From<f64> for ParamValue {
    /// Non-finite floats have no JSON form and become `Null`.
    fn from(v: f64) -> Self {
        serde_json::Number::from_f64(v).map_or(Self::Null, Self::Number)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Undefined, Into::into)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(v: Vec<T>) -> Self {
        Self::Array(v.into_iter().map(Into::into).collect())
    }
}

impl From<RequestParams> for ParamValue {
    fn from(v: RequestParams) -> Self {
        Self::Object(v)
    }
}

impl From<serde_json::Value> for ParamValue {
    fn from(v: serde_json::Value) -> Self {
        use serde_json::Value;
        match v {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => Self::Object(RequestParams(
                map.into_iter().map(|(k, v)| (k, Self::from(v))).collect(),
            )),
        }
    }
}

// ============ RequestParams ============

/// Nested request parameters, keyed by parameter name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestParams(BTreeMap<String, ParamValue>);

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Insert or replace a parameter.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Insert only if the key is missing or `Undefined`.
    pub fn set_default(&mut self, key: &str, value: impl Into<ParamValue>) {
        if !self.is_defined(key) {
            self.0.insert(key.to_string(), value.into());
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    /// String value of a top-level parameter, if it is a non-empty string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(ParamValue::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Whether the key is present with a value other than `Undefined`.
    pub fn is_defined(&self, key: &str) -> bool {
        self.0.get(key).is_some_and(|v| !v.is_undefined())
    }

    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.0.remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.0.iter()
    }

    /// Build parameters from any serializable value whose JSON form is an object.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self> {
        let json = serde_json::to_value(value).map_err(|e| ApiError::Serialization {
            detail: e.to_string(),
        })?;
        Self::try_from(json)
    }
}

impl TryFrom<serde_json::Value> for RequestParams {
    type Error = ApiError;

    fn try_from(value: serde_json::Value) -> Result<Self> {
        match ParamValue::from(value) {
            ParamValue::Object(params) => Ok(params),
            other => Err(ApiError::Serialization {
                detail: format!("request parameters must be a JSON object, got {other:?}"),
            }),
        }
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for RequestParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

// ============ NormalizedParams ============

/// Flat, key-sorted parameter set ready for signing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedParams(BTreeMap<String, String>);

impl NormalizedParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in lexicographic key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

// ============ Normalizer ============

/// Flatten nested parameters into a canonical flat set.
///
/// - `Undefined` values are dropped at any depth (array slots keep their index).
/// - Objects join with `.`, arrays use 0-based indices.
/// - `Null` and empty arrays/objects render as an empty value under their own key.
/// - Empty or purely numeric key segments are rejected.
pub fn normalize(params: &RequestParams) -> Result<NormalizedParams> {
    let mut out = NormalizedParams::new();
    for (key, value) in params.iter() {
        validate_key(key, key)?;
        flatten_into(key.clone(), value, &mut out)?;
    }
    Ok(out)
}

fn validate_key(segment: &str, full_path: &str) -> Result<()> {
    if segment.is_empty() {
        return Err(ApiError::invalid_parameter(
            full_path,
            "empty parameter names are not allowed",
        ));
    }
    if segment.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::invalid_parameter(
            full_path,
            "purely numeric parameter names are not allowed",
        ));
    }
    Ok(())
}

fn flatten_into(path: String, value: &ParamValue, out: &mut NormalizedParams) -> Result<()> {
    match value {
        ParamValue::Undefined => {}
        ParamValue::Null => out.insert(path, ""),
        ParamValue::Bool(b) => out.insert(path, b.to_string()),
        ParamValue::Number(n) => out.insert(path, n.to_string()),
        ParamValue::String(s) => out.insert(path, s.clone()),
        ParamValue::Array(items) => {
            if items.is_empty() {
                out.insert(path, "");
                return Ok(());
            }
            for (idx, item) in items.iter().enumerate() {
                flatten_into(format!("{path}.{idx}"), item, out)?;
            }
        }
        ParamValue::Object(map) => {
            if map.is_empty() {
                out.insert(path, "");
                return Ok(());
            }
            for (key, item) in map.iter() {
                let child = format!("{path}.{key}");
                validate_key(key, &child)?;
                flatten_into(child, item, out)?;
            }
        }
    }
    Ok(())
}
