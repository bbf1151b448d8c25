use std::collections::HashMap;

use crate::error::ConfigError;
use crate::value::{Assignment, Parameter, Value, ValueKind};

/// One entry of the order sequence: a key, or a comment kept for round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    Key(String),
    /// Comment or blank line, identified by its 0-based source line.
    Comment(usize),
}

/// A hierarchical, order-preserving store of parameters and comments.
///
/// Every key in `parameters` and every id in `comments` appears exactly once
/// in `order`, at the position where it was first seen. Keys never contain
/// `.`; a dotted path walks into nested sub-trees.
#[derive(Debug, Clone, Default)]
pub struct ConfigTree {
    parameters: HashMap<String, Parameter>,
    comments: HashMap<usize, String>,
    order: Vec<Token>,
    multiple: bool,
}

impl PartialEq for ConfigTree {
    /// Trees compare by content and order; the multiple-sources flag is
    /// bookkeeping and does not take part.
    fn eq(&self, other: &Self) -> bool {
        self.parameters == other.parameters
            && self.comments == other.comments
            && self.order == other.order
    }
}

impl ConfigTree {
    pub fn new() -> Self {
        ConfigTree::default()
    }

    /// A tree with no keys and no comments.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of top-level keys.
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// True once a second source has been combined into this tree.
    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    pub(crate) fn mark_multiple(&mut self) {
        self.multiple = true;
    }

    /// Top-level keys in recorded order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().filter_map(|token| match token {
            Token::Key(key) => Some(key.as_str()),
            Token::Comment(_) => None,
        })
    }

    /// Top-level keys with their parameters, in recorded order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Parameter)> {
        self.keys()
            .filter_map(|key| self.parameters.get(key).map(|param| (key, param)))
    }

    /// The order sequence, comments included.
    pub fn tokens(&self) -> &[Token] {
        &self.order
    }

    pub fn comment(&self, id: usize) -> Option<&str> {
        self.comments.get(&id).map(String::as_str)
    }

    pub(crate) fn push_comment(&mut self, id: usize, text: String) {
        if self.comments.insert(id, text).is_none() {
            self.order.push(Token::Comment(id));
        }
    }

    /// Remove a comment from the comment map and the order sequence.
    pub fn del_comment(&mut self, id: usize) -> Option<String> {
        let removed = self.comments.remove(&id)?;
        self.order.retain(|token| *token != Token::Comment(id));
        Some(removed)
    }

    /// Consume the tree, yielding its top-level parameters in recorded order.
    pub(crate) fn into_entries(mut self) -> Vec<(String, Parameter)> {
        let mut entries = Vec::with_capacity(self.parameters.len());
        for token in std::mem::take(&mut self.order) {
            if let Token::Key(key) = token {
                if let Some(param) = self.parameters.remove(&key) {
                    entries.push((key, param));
                }
            }
        }
        entries
    }

    // ── Lookup ──────────────────────────────────────────────────────

    /// The parameter at a (possibly dotted) path.
    pub fn parameter(&self, path: &str) -> Option<&Parameter> {
        if let Some(param) = self.parameters.get(path) {
            return Some(param);
        }
        let (first, rest) = path.split_once('.')?;
        self.parameters
            .get(first)?
            .value
            .as_sub_tree()?
            .parameter(rest)
    }

    pub fn get(&self, path: &str) -> Option<&Value> {
        self.parameter(path).map(|param| &param.value)
    }

    pub fn contains_key(&self, path: &str) -> bool {
        self.parameter(path).is_some()
    }

    pub fn get_sub_tree(&self, path: &str) -> Option<&ConfigTree> {
        self.get(path)?.as_sub_tree()
    }

    pub fn get_sub_tree_mut(&mut self, path: &str) -> Option<&mut ConfigTree> {
        if self.parameters.contains_key(path) {
            return self.parameters.get_mut(path)?.value.as_sub_tree_mut();
        }
        let (first, rest) = path.split_once('.')?;
        self.parameters
            .get_mut(first)?
            .value
            .as_sub_tree_mut()?
            .get_sub_tree_mut(rest)
    }

    /// Scalars in their textual form.
    pub fn get_string(&self, path: &str) -> Option<String> {
        self.get(path)?.as_text()
    }

    /// Integers; floats are truncated and booleans map to 0/1.
    pub fn get_int(&self, path: &str) -> Option<i64> {
        self.get(path)?.as_i64()
    }

    pub fn get_float(&self, path: &str) -> Option<f64> {
        self.get(path)?.as_f64()
    }

    /// Booleans; numbers are true when non-zero.
    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get(path)?.as_bool()
    }

    /// String arrays; a single string is returned as a one-element array.
    pub fn get_string_array(&self, path: &str) -> Option<Vec<String>> {
        self.get(path)?.as_string_array()
    }

    pub fn get_int_array(&self, path: &str) -> Option<Vec<i64>> {
        self.get(path)?.as_i64_array()
    }

    pub fn get_float_array(&self, path: &str) -> Option<Vec<f64>> {
        self.get(path)?.as_f64_array()
    }

    pub fn get_bool_array(&self, path: &str) -> Option<Vec<bool>> {
        self.get(path)?.as_bool_array()
    }

    // ── Mutation ────────────────────────────────────────────────────

    /// Overwrite the value at `path`. A key keeps its original position
    /// when it already exists. Anything in the way of a dotted path,
    /// including a scalar, is replaced by a sub-tree.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> Result<(), ConfigError> {
        check_path(path)?;
        self.set_parameter(path, Parameter::new(value.into()));
        Ok(())
    }

    pub(crate) fn set_parameter(&mut self, path: &str, param: Parameter) {
        let Some((first, rest)) = path.split_once('.') else {
            *self.slot(path) = param;
            return;
        };
        let slot = &mut self.slot(first).value;
        if let Value::SubTree(sub) = slot {
            sub.set_parameter(rest, param);
        } else {
            let mut sub = ConfigTree::new();
            sub.set_parameter(rest, param);
            *slot = Value::SubTree(sub);
        }
    }

    /// Accumulate `value` at `path`.
    ///
    /// An unset key takes the value as-is. A scalar of the same type becomes
    /// an array, an array of the same type is extended. Anything else is a
    /// `TypeMismatch` and leaves the key untouched.
    pub fn add(&mut self, path: &str, value: impl Into<Value>) -> Result<(), ConfigError> {
        check_path(path)?;
        self.add_parameter(path, Parameter::new(value.into()))
    }

    pub(crate) fn add_parameter(&mut self, path: &str, param: Parameter) -> Result<(), ConfigError> {
        let Some((first, rest)) = path.split_once('.') else {
            return self.add_leaf(path, param);
        };
        match self.parameters.get_mut(first) {
            Some(existing) => match &mut existing.value {
                Value::SubTree(sub) => sub.add_parameter(rest, param).map_err(|e| e.under(first)),
                other => Err(ConfigError::type_mismatch(
                    first,
                    other.kind(),
                    ValueKind::SubTree,
                )),
            },
            None => {
                let mut sub = ConfigTree::new();
                sub.add_parameter(rest, param).map_err(|e| e.under(first))?;
                *self.slot(first) = Parameter::new(Value::SubTree(sub));
                Ok(())
            }
        }
    }

    fn add_leaf(&mut self, key: &str, param: Parameter) -> Result<(), ConfigError> {
        let Some(existing) = self.parameters.get_mut(key) else {
            *self.slot(key) = param;
            return Ok(());
        };

        let Parameter { value, assignment } = param;
        match value {
            Value::SubTree(theirs) => match &mut existing.value {
                Value::SubTree(mine) => {
                    let mut staged = mine.clone();
                    staged.absorb(theirs).map_err(|e| e.under(key))?;
                    *mine = staged;
                }
                slot @ Value::Unset => *slot = Value::SubTree(theirs),
                other => {
                    return Err(ConfigError::type_mismatch(
                        key,
                        other.kind(),
                        ValueKind::SubTree,
                    ))
                }
            },
            value => {
                let existing_kind = existing.value.kind();
                existing.value.accumulate(value).map_err(|rejected| {
                    ConfigError::type_mismatch(key, existing_kind, rejected.kind())
                })?;
            }
        }
        if assignment != Assignment::Default {
            existing.assignment = assignment;
        }
        Ok(())
    }

    /// Add every key of `other` into this tree, in `other`'s order.
    fn absorb(&mut self, other: ConfigTree) -> Result<(), ConfigError> {
        for (key, param) in other.into_entries() {
            self.add_parameter(&key, param)?;
        }
        Ok(())
    }

    /// Remove the key at `path`, returning its value. A sub-tree left
    /// without keys is removed from its parent as well.
    pub fn del(&mut self, path: &str) -> Option<Value> {
        if let Some(param) = self.parameters.remove(path) {
            self.forget_key(path);
            return Some(param.value);
        }
        let (first, rest) = path.split_once('.')?;
        let sub = self.parameters.get_mut(first)?.value.as_sub_tree_mut()?;
        let removed = sub.del(rest)?;
        if sub.is_empty() {
            self.parameters.remove(first);
            self.forget_key(first);
        }
        Some(removed)
    }

    fn forget_key(&mut self, key: &str) {
        self.order
            .retain(|token| !matches!(token, Token::Key(k) if k == key));
    }

    /// Get or create the parameter slot for a top-level key, recording the
    /// key in the order sequence the first time it is seen.
    fn slot(&mut self, key: &str) -> &mut Parameter {
        if !self.parameters.contains_key(key) {
            self.order.push(Token::Key(key.to_string()));
        }
        self.parameters.entry(key.to_string()).or_default()
    }
}

/// Reject paths that would not read back as the same key: empty or padded
/// segments, `=` or line breaks, a leading comment marker, or a trailing
/// operator character.
fn check_path(path: &str) -> Result<(), ConfigError> {
    let segments_ok = path.split('.').all(|segment| {
        !segment.is_empty() && segment.trim() == segment && !segment.contains(['=', '\n', '\r'])
    });
    if segments_ok && !path.starts_with(['#', ';']) && !path.ends_with(['+', ':']) {
        Ok(())
    } else {
        Err(ConfigError::invalid_key(path))
    }
}
