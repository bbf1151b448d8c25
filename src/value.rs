use std::fmt;
use std::iter;

use crate::tree::ConfigTree;

/// A typed configuration value.
///
/// Arrays are homogeneous. A key moves from a scalar to the matching array
/// variant the first time a second value is accumulated into it.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Unset,
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    StringArray(Vec<String>),
    IntegerArray(Vec<i64>),
    FloatArray(Vec<f64>),
    BooleanArray(Vec<bool>),
    /// A nested configuration, exclusively owned by its parent.
    SubTree(ConfigTree),
}

/// The type tag of a [`Value`], used for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Unset,
    String,
    Integer,
    Float,
    Boolean,
    StringArray,
    IntegerArray,
    FloatArray,
    BooleanArray,
    SubTree,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Unset => "unset",
            ValueKind::String => "string",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::Boolean => "boolean",
            ValueKind::StringArray => "string array",
            ValueKind::IntegerArray => "integer array",
            ValueKind::FloatArray => "float array",
            ValueKind::BooleanArray => "boolean array",
            ValueKind::SubTree => "sub-tree",
        };
        f.write_str(name)
    }
}

/// How an incoming value interacts with an existing value at the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Assignment {
    /// `key=value`: follows the caller's load/merge policy.
    #[default]
    Default,
    /// `key:=value`: always replaces.
    ForceReplace,
    /// `key+=value`: always accumulates.
    ForceAppend,
}

impl Assignment {
    /// The operator text as written in a configuration file.
    pub fn operator(&self) -> &'static str {
        match self {
            Assignment::Default => "=",
            Assignment::ForceReplace => ":=",
            Assignment::ForceAppend => "+=",
        }
    }
}

/// A value stored in a tree, plus the assignment mode it was written with.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Parameter {
    pub value: Value,
    pub assignment: Assignment,
}

impl Parameter {
    pub fn new(value: Value) -> Self {
        Parameter {
            value,
            assignment: Assignment::Default,
        }
    }

    pub fn with_assignment(value: Value, assignment: Assignment) -> Self {
        Parameter { value, assignment }
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Unset => ValueKind::Unset,
            Value::String(_) => ValueKind::String,
            Value::Integer(_) => ValueKind::Integer,
            Value::Float(_) => ValueKind::Float,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::StringArray(_) => ValueKind::StringArray,
            Value::IntegerArray(_) => ValueKind::IntegerArray,
            Value::FloatArray(_) => ValueKind::FloatArray,
            Value::BooleanArray(_) => ValueKind::BooleanArray,
            Value::SubTree(_) => ValueKind::SubTree,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(
            self,
            Value::StringArray(_)
                | Value::IntegerArray(_)
                | Value::FloatArray(_)
                | Value::BooleanArray(_)
        )
    }

    pub fn is_sub_tree(&self) -> bool {
        matches!(self, Value::SubTree(_))
    }

    pub fn as_sub_tree(&self) -> Option<&ConfigTree> {
        match self {
            Value::SubTree(tree) => Some(tree),
            _ => None,
        }
    }

    pub fn as_sub_tree_mut(&mut self) -> Option<&mut ConfigTree> {
        match self {
            Value::SubTree(tree) => Some(tree),
            _ => None,
        }
    }

    /// Accumulate `incoming` into this value.
    ///
    /// Same-typed scalars become an array (existing value first); arrays of the
    /// same base type are extended. On a type mismatch the value is left as it
    /// was and `incoming` is handed back. Sub-trees are not handled here.
    pub(crate) fn accumulate(&mut self, incoming: Value) -> Result<(), Value> {
        let current = std::mem::take(self);
        let (merged, rejected) = match (current, incoming) {
            (Value::Unset, v) => (v, None),
            (v, Value::Unset) => (v, None),

            (Value::String(a), Value::String(b)) => (Value::StringArray(vec![a, b]), None),
            (Value::String(a), Value::StringArray(b)) => (Value::StringArray(prepend(a, b)), None),
            (Value::StringArray(a), Value::String(b)) => (Value::StringArray(append(a, vec![b])), None),
            (Value::StringArray(a), Value::StringArray(b)) => (Value::StringArray(append(a, b)), None),

            (Value::Integer(a), Value::Integer(b)) => (Value::IntegerArray(vec![a, b]), None),
            (Value::Integer(a), Value::IntegerArray(b)) => (Value::IntegerArray(prepend(a, b)), None),
            (Value::IntegerArray(a), Value::Integer(b)) => (Value::IntegerArray(append(a, vec![b])), None),
            (Value::IntegerArray(a), Value::IntegerArray(b)) => (Value::IntegerArray(append(a, b)), None),

            (Value::Float(a), Value::Float(b)) => (Value::FloatArray(vec![a, b]), None),
            (Value::Float(a), Value::FloatArray(b)) => (Value::FloatArray(prepend(a, b)), None),
            (Value::FloatArray(a), Value::Float(b)) => (Value::FloatArray(append(a, vec![b])), None),
            (Value::FloatArray(a), Value::FloatArray(b)) => (Value::FloatArray(append(a, b)), None),

            (Value::Boolean(a), Value::Boolean(b)) => (Value::BooleanArray(vec![a, b]), None),
            (Value::Boolean(a), Value::BooleanArray(b)) => (Value::BooleanArray(prepend(a, b)), None),
            (Value::BooleanArray(a), Value::Boolean(b)) => (Value::BooleanArray(append(a, vec![b])), None),
            (Value::BooleanArray(a), Value::BooleanArray(b)) => (Value::BooleanArray(append(a, b)), None),

            (current, incoming) => (current, Some(incoming)),
        };
        *self = merged;
        match rejected {
            None => Ok(()),
            Some(incoming) => Err(incoming),
        }
    }

    // ── Best-effort coercions ───────────────────────────────────────

    /// Textual form of a scalar. Arrays and sub-trees have none.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::String(s) => Some(s.clone()),
            Value::Integer(i) => Some(i.to_string()),
            Value::Float(n) => Some(format_float(*n)),
            Value::Boolean(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Float(n) => Some(*n as i64),
            Value::Boolean(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            Value::Integer(i) => Some(*i as f64),
            Value::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            Value::Integer(i) => Some(*i != 0),
            Value::Float(n) => Some(*n != 0.0),
            _ => None,
        }
    }

    pub fn as_string_array(&self) -> Option<Vec<String>> {
        match self {
            Value::StringArray(items) => Some(items.clone()),
            Value::String(s) => Some(vec![s.clone()]),
            _ => None,
        }
    }

    pub fn as_i64_array(&self) -> Option<Vec<i64>> {
        match self {
            Value::IntegerArray(items) => Some(items.clone()),
            Value::Integer(i) => Some(vec![*i]),
            _ => None,
        }
    }

    pub fn as_f64_array(&self) -> Option<Vec<f64>> {
        match self {
            Value::FloatArray(items) => Some(items.clone()),
            Value::Float(n) => Some(vec![*n]),
            Value::IntegerArray(items) => Some(items.iter().map(|i| *i as f64).collect()),
            Value::Integer(i) => Some(vec![*i as f64]),
            _ => None,
        }
    }

    pub fn as_bool_array(&self) -> Option<Vec<bool>> {
        match self {
            Value::BooleanArray(items) => Some(items.clone()),
            Value::Boolean(b) => Some(vec![*b]),
            _ => None,
        }
    }
}

fn prepend<T>(head: T, tail: Vec<T>) -> Vec<T> {
    iter::once(head).chain(tail).collect()
}

fn append<T>(mut head: Vec<T>, tail: Vec<T>) -> Vec<T> {
    head.extend(tail);
    head
}

/// Locale-independent float rendering that always reads back as a float
/// (`1.0`, `0.25`, `1e20`).
pub fn format_float(n: f64) -> String {
    format!("{:?}", n)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list<T, F: Fn(&T) -> String>(
            f: &mut fmt::Formatter<'_>,
            items: &[T],
            render: F,
        ) -> fmt::Result {
            let parts: Vec<String> = items.iter().map(render).collect();
            write!(f, "[{}]", parts.join(", "))
        }

        match self {
            Value::Unset => Ok(()),
            Value::String(s) => f.write_str(s),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(n) => f.write_str(&format_float(*n)),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::StringArray(items) => list(f, items, |s| s.clone()),
            Value::IntegerArray(items) => list(f, items, |i| i.to_string()),
            Value::FloatArray(items) => list(f, items, |n| format_float(*n)),
            Value::BooleanArray(items) => list(f, items, |b| b.to_string()),
            Value::SubTree(tree) => {
                let keys: Vec<&str> = tree.keys().collect();
                write!(f, "{{{}}}", keys.join(", "))
            }
        }
    }
}

// ── Conversions ─────────────────────────────────────────────────────

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::StringArray(items)
    }
}

impl From<Vec<&str>> for Value {
    fn from(items: Vec<&str>) -> Self {
        Value::StringArray(items.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<i64>> for Value {
    fn from(items: Vec<i64>) -> Self {
        Value::IntegerArray(items)
    }
}

impl From<Vec<f64>> for Value {
    fn from(items: Vec<f64>) -> Self {
        Value::FloatArray(items)
    }
}

impl From<Vec<bool>> for Value {
    fn from(items: Vec<bool>) -> Self {
        Value::BooleanArray(items)
    }
}

impl From<ConfigTree> for Value {
    fn from(tree: ConfigTree) -> Self {
        Value::SubTree(tree)
    }
}
