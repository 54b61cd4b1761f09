//! Helpers over untyped wire values.

use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::{Error, Result};

pub const KIND: &str = "NetworkPolicy";
pub const API_VERSION: &str = "networking.k8s.io/v1";

/// Returns the field's value when the key is set to something other than `null`.
pub fn field<'a>(v: &'a Value, key: &str) -> Option<&'a Value> {
    v.get(key).filter(|v| !v.is_null())
}

pub fn object<'a>(v: &'a Value, path: &str) -> Result<&'a Map<String, Value>> {
    v.as_object()
        .ok_or_else(|| Error::malformed(path, "expected an object"))
}

pub fn array<'a>(v: &'a Value, path: impl Into<String>) -> Result<&'a Vec<Value>> {
    v.as_array().ok_or_else(|| Error::NotAnArray(path.into()))
}

pub fn decode<T: DeserializeOwned>(v: &Value, path: &str) -> Result<T> {
    T::deserialize(v).map_err(|e| Error::malformed(path, e))
}

pub fn encode<T: Serialize>(v: &T, path: &str) -> Result<Value> {
    serde_json::to_value(v).map_err(|e| Error::malformed(path, e))
}
