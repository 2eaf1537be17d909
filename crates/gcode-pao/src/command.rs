//! In-memory representation of one G-code instruction line.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GcodeError, Result};

/// X axis parameter.
pub const X: char = 'X';
/// Y axis parameter.
pub const Y: char = 'Y';
/// Z axis parameter.
pub const Z: char = 'Z';
/// Extruder parameter.
pub const E: char = 'E';
/// Feedrate parameter.
pub const F: char = 'F';

/// Cartesian axis parameters.
pub const AXES: [char; 3] = [X, Y, Z];

/// Parameter value, typed per parameter at parse time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Remainder contained a decimal point and parsed as a float.
    Float(f64),
    /// Remainder parsed as an integer.
    Integer(i64),
    /// Remainder kept verbatim because it was not numeric.
    Text(String),
}

impl Value {
    /// Numeric view of the value. `None` for text.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(v) => Some(*v as f64),
            Value::Text(_) => None,
        }
    }

    /// Is this a raw-text fallback?
    pub fn is_text(&self) -> bool {
        matches!(self, Value::Text(_))
    }

    /// Build the narrowest value for a number: integral values become
    /// `Integer`, everything else `Float`.
    pub fn from_number(value: f64) -> Self {
        if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
            Value::Integer(value as i64)
        } else {
            Value::Float(value)
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Floats keep a decimal point so they re-parse as floats.
            Value::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{v:.1}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Integer(v) => write!(f, "{v}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_owned())
    }
}

/// Parameters of a command, keyed by letter, in insertion order.
///
/// Keys are unique. Inserting an existing key replaces its value and
/// keeps the key at its original position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Params(Vec<(char, Value)>);

impl Params {
    /// Create an empty parameter map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a parameter, returning the previous value.
    pub fn insert(&mut self, key: char, value: Value) -> Option<Value> {
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.0.push((key, value));
                None
            }
        }
    }

    /// Look up a parameter.
    pub fn get(&self, key: char) -> Option<&Value> {
        self.0.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Does the map carry this key?
    pub fn contains_key(&self, key: char) -> bool {
        self.get(key).is_some()
    }

    /// Does the map carry at least one of these keys?
    pub fn contains_any(&self, keys: &[char]) -> bool {
        keys.iter().any(|&k| self.contains_key(k))
    }

    /// Iterate over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (char, &Value)> {
        self.0.iter().map(|(k, v)| (*k, v))
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Is the map empty?
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(char, Value)> for Params {
    fn from_iter<I: IntoIterator<Item = (char, Value)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

/// One parsed instruction: a mnemonic plus its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCommand")]
pub struct Command {
    command: String,
    params: Params,
}

/// Deserialized form of [`Command`], checked by [`Command::new`].
#[derive(Deserialize)]
struct RawCommand {
    command: String,
    #[serde(default)]
    params: Params,
}

impl TryFrom<RawCommand> for Command {
    type Error = GcodeError;

    fn try_from(raw: RawCommand) -> Result<Self> {
        Command::new(raw.command, raw.params)
    }
}

impl Command {
    /// Create a command. Any non-empty mnemonic is accepted.
    pub fn new(command: impl Into<String>, params: Params) -> Result<Self> {
        let command = command.into();
        if command.is_empty() {
            return Err(GcodeError::EmptyMnemonic);
        }
        Ok(Self { command, params })
    }

    /// Instruction mnemonic as read (e.g. `G1`).
    pub fn mnemonic(&self) -> &str {
        &self.command
    }

    /// Parameters in insertion order.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Mutable access to the parameters.
    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    /// Numeric value of a parameter, if present and numeric.
    pub fn number(&self, key: char) -> Option<f64> {
        self.params.get(key).and_then(Value::as_f64)
    }

    /// Does the mnemonic match `token` exactly?
    pub fn is(&self, token: &str) -> bool {
        self.command == token
    }
}
