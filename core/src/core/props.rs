// ssrpipe/src/core/props.rs

//! The `Props` accumulator: named values threaded from step to step.

use crate::error::{SsrPipeError, SsrPipeResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A mapping of named values produced by steps.
///
/// Values are stored as JSON so that steps with unrelated value types can
/// share one accumulator, and so the final mapping can be handed to the
/// renderer as-is. Keys merge last-write-wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Props(Map<String, Value>);

impl Props {
  pub fn new() -> Self {
    Props(Map::new())
  }

  /// Serializes `value` and stores it under `key`, replacing any previous value.
  pub fn insert<T: Serialize>(&mut self, key: impl Into<String>, value: T) -> SsrPipeResult<()> {
    let key = key.into();
    let encoded = serde_json::to_value(value).map_err(|source| SsrPipeError::PropsEncode {
      key: key.clone(),
      source,
    })?;
    self.0.insert(key, encoded);
    Ok(())
  }

  /// Builder flavour of [`Props::insert`].
  pub fn with<T: Serialize>(mut self, key: impl Into<String>, value: T) -> SsrPipeResult<Self> {
    self.insert(key, value)?;
    Ok(self)
  }

  /// Stores an already-encoded value.
  pub fn insert_value(&mut self, key: impl Into<String>, value: Value) {
    self.0.insert(key.into(), value);
  }

  /// Decodes the value under `key`. Absent keys yield `Ok(None)`.
  pub fn get<T: DeserializeOwned>(&self, key: &str) -> SsrPipeResult<Option<T>> {
    match self.0.get(key) {
      None => Ok(None),
      Some(raw) => T::deserialize(raw)
        .map(Some)
        .map_err(|source| SsrPipeError::PropsDecode {
          key: key.to_string(),
          source,
        }),
    }
  }

  pub fn get_value(&self, key: &str) -> Option<&Value> {
    self.0.get(key)
  }

  pub fn remove(&mut self, key: &str) -> Option<Value> {
    self.0.remove(key)
  }

  pub fn contains_key(&self, key: &str) -> bool {
    self.0.contains_key(key)
  }

  pub fn keys(&self) -> impl Iterator<Item = &str> {
    self.0.keys().map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// Merges `other` into `self`. Keys present in both take `other`'s value.
  pub fn merge(&mut self, other: Props) {
    for (key, value) in other.0 {
      self.0.insert(key, value);
    }
  }

  pub fn into_value(self) -> Value {
    Value::Object(self.0)
  }

  pub fn as_map(&self) -> &Map<String, Value> {
    &self.0
  }
}

impl From<Map<String, Value>> for Props {
  fn from(map: Map<String, Value>) -> Self {
    Props(map)
  }
}

impl TryFrom<Value> for Props {
  type Error = SsrPipeError;

  fn try_from(value: Value) -> Result<Self, Self::Error> {
    match value {
      Value::Object(map) => Ok(Props(map)),
      other => Err(SsrPipeError::malformed(format!(
        "props must be a JSON object, got {}",
        json_kind(&other)
      ))),
    }
  }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Props {
  fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
    Props(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
  }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "a boolean",
    Value::Number(_) => "a number",
    Value::String(_) => "a string",
    Value::Array(_) => "an array",
    Value::Object(_) => "an object",
  }
}
