use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// A scalar field value.
///
/// Records are dynamic maps, so a field can hold an integer, a float or
/// free text. Untagged serde representation keeps the stored JSON flat:
/// `{"name":"Ana","quantity":3}`, no enum wrappers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    /// Coerce raw form input into a value: integer if the text parses as
    /// one, float if it parses as one, otherwise the text itself.
    ///
    /// "12" becomes `Int(12)`, "9.99" becomes `Float(9.99)` and "12a"
    /// stays `Str("12a")`. Non-numeric input is stored, not rejected.
    pub fn coerce(raw: &str) -> Value {
        let trimmed = raw.trim();
        if let Ok(i) = trimmed.parse::<i64>() {
            return Value::Int(i);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            return Value::Float(f);
        }
        Value::Str(raw.to_string())
    }

    /// Read the value as a record id, if it is a non-negative integer.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Int(i) if *i >= 0 => Some(*i as u64),
            _ => None,
        }
    }
}

// Rendering form: no quotes around strings, cells show the raw text.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

/// One stored record: an optional primary key plus a field map.
///
/// The id is `None` until insert assigns one; it is immutable afterwards.
/// Serialized flat, so the persisted JSON matches the field layout:
/// `{"id":1,"name":"Ana","email":"ana@x.com"}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field setter.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Field in rendering form, empty when absent.
    pub fn display(&self, field: &str) -> String {
        self.get(field).map(|v| v.to_string()).unwrap_or_default()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ ")?;
        let mut first = true;
        if let Some(id) = self.id {
            write!(f, "\"id\": {}", id)?;
            first = false;
        }
        for (key, value) in &self.fields {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "\"{}\": {}", key, value)?;
            first = false;
        }
        write!(f, " }}")
    }
}

/// Configuration for the storefront database
#[derive(Debug, Clone)]
pub struct StoreConfig {
    // Database location settings
    pub db_path: PathBuf,
    pub create_dirs: bool, // Create parent directories if they don't exist

    // Backing store config
    pub cache_capacity_mb: usize,
    pub flush_interval_ms: Option<u64>,
    pub mode: StoreMode,
}

#[derive(Debug, Clone, Copy)]
pub enum StoreMode {
    HighThroughput,
    LowSpace,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("storefront.db"),
            create_dirs: true,

            cache_capacity_mb: 64,
            flush_interval_ms: Some(100),
            mode: StoreMode::HighThroughput,
        }
    }
}

impl StoreConfig {
    /// Create a new configuration with a specific database path
    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        let mut config = Self::default();
        config.db_path = path.as_ref().to_path_buf();
        config
    }
}
