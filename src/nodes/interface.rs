//! Socket data flowing between nodes

use std::collections::{BTreeMap, HashMap};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{NodeError, NodeResult};
use crate::ragged::Ragged;
use crate::topology::{Handle, TypedHandle};

/// A single value on a socket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Empty/null value; also marks a failed batch position
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Vector([f64; 3]),
    /// Vertex indices (an edge's endpoints or a face's loop)
    Indices(Vec<usize>),
    /// Reference to a kernel object
    Handle(Handle),
}

impl Value {
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_handle(&self) -> Option<Handle> {
        match self {
            Value::Handle(handle) => Some(*handle),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Int(i) => Some(*i != 0),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_index(&self) -> Option<usize> {
        match self {
            Value::Int(i) => usize::try_from(*i).ok(),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "None",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::Vector(_) => "Vector",
            Value::Indices(_) => "Indices",
            Value::Handle(_) => "Handle",
        }
    }
}

impl From<Handle> for Value {
    fn from(handle: Handle) -> Self {
        Value::Handle(handle)
    }
}

impl From<TypedHandle> for Value {
    fn from(typed: TypedHandle) -> Self {
        Value::Handle(typed.handle())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::None, Into::into)
    }
}

/// Nested list of values carried by one socket
pub type SocketData = Ragged<Value>;

/// Read argument `index` of an aligned tuple.
///
/// Interlaced batches leave the slots of exhausted lanes empty; an empty slot
/// is an `InvalidInput` for that tuple only.
pub fn tuple_arg<'a>(tuple: &'a [Option<Value>], index: usize, port: &str) -> NodeResult<&'a Value> {
    tuple.get(index).and_then(Option::as_ref).ok_or_else(|| {
        NodeError::InvalidInput(format!("no value for '{port}' in this argument tuple"))
    })
}

/// Read a kernel handle from argument `index` of an aligned tuple
pub fn tuple_handle(tuple: &[Option<Value>], index: usize, port: &str) -> NodeResult<Handle> {
    let value = tuple_arg(tuple, index, port)?;
    value.as_handle().ok_or_else(|| mismatch(port, "a kernel handle", value))
}

/// Read a flag from argument `index`; integers count as flags
pub fn tuple_bool(tuple: &[Option<Value>], index: usize, port: &str) -> NodeResult<bool> {
    let value = tuple_arg(tuple, index, port)?;
    value.as_bool().ok_or_else(|| mismatch(port, "a boolean", value))
}

pub fn tuple_str<'a>(tuple: &'a [Option<Value>], index: usize, port: &str) -> NodeResult<&'a str> {
    let value = tuple_arg(tuple, index, port)?;
    value.as_str().ok_or_else(|| mismatch(port, "a string", value))
}

pub fn tuple_f64(tuple: &[Option<Value>], index: usize, port: &str) -> NodeResult<f64> {
    let value = tuple_arg(tuple, index, port)?;
    value.as_f64().ok_or_else(|| mismatch(port, "a number", value))
}

fn mismatch(port: &str, expected: &str, found: &Value) -> NodeError {
    NodeError::InvalidInput(format!(
        "'{port}' expects {expected}, got {}",
        found.type_name()
    ))
}

/// Everything a node receives for one evaluation: linked socket data plus
/// its JSON parameters
#[derive(Debug, Clone, Default)]
pub struct NodeInputs {
    sockets: HashMap<String, SocketData>,
    params: serde_json::Value,
}

impl NodeInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: link `data` to socket `name`
    pub fn with_socket(mut self, name: &str, data: impl Into<SocketData>) -> Self {
        self.set_socket(name, data);
        self
    }

    pub fn with_params(mut self, params: serde_json::Value) -> Self {
        self.params = params;
        self
    }

    pub fn set_socket(&mut self, name: &str, data: impl Into<SocketData>) {
        self.sockets.insert(name.to_string(), data.into());
    }

    pub fn socket(&self, name: &str) -> Option<&SocketData> {
        self.sockets.get(name)
    }

    pub fn is_linked(&self, name: &str) -> bool {
        self.sockets.contains_key(name)
    }

    pub fn any_linked(&self) -> bool {
        !self.sockets.is_empty()
    }

    /// Deserialize this node's parameters. Missing parameters take defaults.
    pub fn params<P: DeserializeOwned + Default>(&self, node: &str) -> NodeResult<P> {
        if self.params.is_null() {
            return Ok(P::default());
        }
        serde_json::from_value(self.params.clone()).map_err(|source| NodeError::Params {
            node: node.to_string(),
            source,
        })
    }

    /// Flattened socket values, or `fallback` as a one-element lane when the
    /// socket is not linked
    pub fn lane(&self, name: &str, fallback: Value) -> NodeResult<Vec<Value>> {
        match self.sockets.get(name) {
            Some(data) => data.clone().flattened(),
            None => Ok(vec![fallback]),
        }
    }

    /// Flattened socket values; an unlinked socket is an error
    pub fn required_lane(&self, name: &str) -> NodeResult<Vec<Value>> {
        self.sockets
            .get(name)
            .ok_or_else(|| NodeError::MissingInput(name.to_string()))?
            .clone()
            .flattened()
    }
}

/// Output sockets of one evaluation, by name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NodeOutputs {
    sockets: BTreeMap<String, SocketData>,
}

impl NodeOutputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, data: SocketData) -> Self {
        self.set(name, data);
        self
    }

    pub fn set(&mut self, name: &str, data: SocketData) {
        self.sockets.insert(name.to_string(), data);
    }

    pub fn get(&self, name: &str) -> Option<&SocketData> {
        self.sockets.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sockets.keys().map(String::as_str)
    }
}
