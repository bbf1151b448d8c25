use std::fmt::Write;

use crate::tree::ConfigTree;
use crate::value::{format_float, Value};

/// JSON formatting style.
#[derive(Clone, Copy)]
pub enum JsonStyle {
    /// Compact: no whitespace between tokens.
    Compact,
    /// Pretty: 2-space indented, one entry per line.
    Pretty,
}

struct JsonWriter {
    buf: String,
    style: JsonStyle,
    depth: usize,
}

impl JsonWriter {
    fn new(style: JsonStyle) -> Self {
        JsonWriter {
            buf: String::new(),
            style,
            depth: 0,
        }
    }

    fn is_pretty(&self) -> bool {
        matches!(self.style, JsonStyle::Pretty)
    }

    fn newline(&mut self) {
        if self.is_pretty() {
            self.buf.push('\n');
            for _ in 0..self.depth {
                self.buf.push_str("  ");
            }
        }
    }

    fn space(&mut self) {
        if self.is_pretty() {
            self.buf.push(' ');
        }
    }

    /// Keys in recorded order; comments are not part of the JSON view.
    fn write_tree(&mut self, tree: &ConfigTree) {
        self.buf.push('{');
        self.depth += 1;

        let mut first = true;
        for (key, param) in tree.entries() {
            self.entry_sep(&mut first);
            self.write_key(key);
            self.write_value(&param.value);
        }

        self.depth -= 1;
        if !first {
            self.newline();
        }
        self.buf.push('}');
    }

    fn write_value(&mut self, value: &Value) {
        match value {
            Value::Unset => self.buf.push_str("null"),
            Value::String(s) => self.write_string_value(s),
            Value::Integer(i) => {
                let _ = write!(&mut self.buf, "{}", i);
            }
            Value::Float(n) => self.write_float(*n),
            Value::Boolean(b) => self.buf.push_str(if *b { "true" } else { "false" }),
            Value::StringArray(items) => self.write_array(items, |w, s| w.write_string_value(s)),
            Value::IntegerArray(items) => self.write_array(items, |w, i| {
                let _ = write!(&mut w.buf, "{}", i);
            }),
            Value::FloatArray(items) => self.write_array(items, |w, n| w.write_float(*n)),
            Value::BooleanArray(items) => {
                self.write_array(items, |w, b| w.buf.push_str(if *b { "true" } else { "false" }))
            }
            Value::SubTree(tree) => self.write_tree(tree),
        }
    }

    fn write_float(&mut self, n: f64) {
        // JSON has no NaN or infinity.
        if n.is_finite() {
            self.buf.push_str(&format_float(n));
        } else {
            self.buf.push_str("null");
        }
    }

    fn write_array<T>(&mut self, items: &[T], write_item: impl Fn(&mut JsonWriter, &T)) {
        self.buf.push('[');
        self.depth += 1;

        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.buf.push(',');
            }
            self.newline();
            write_item(self, item);
        }

        self.depth -= 1;
        if !items.is_empty() {
            self.newline();
        }
        self.buf.push(']');
    }

    fn entry_sep(&mut self, first: &mut bool) {
        if *first {
            *first = false;
        } else {
            self.buf.push(',');
        }
        self.newline();
    }

    fn write_key(&mut self, key: &str) {
        self.write_string_value(key);
        self.buf.push(':');
        self.space();
    }

    fn write_string_value(&mut self, s: &str) {
        self.buf.push('"');
        for ch in s.chars() {
            match ch {
                '"' => self.buf.push_str("\\\""),
                '\\' => self.buf.push_str("\\\\"),
                '\n' => self.buf.push_str("\\n"),
                '\r' => self.buf.push_str("\\r"),
                '\t' => self.buf.push_str("\\t"),
                '\u{0008}' => self.buf.push_str("\\b"),
                '\u{000C}' => self.buf.push_str("\\f"),
                c if c < '\u{0020}' => {
                    let _ = write!(&mut self.buf, "\\u{:04x}", c as u32);
                }
                c => self.buf.push(c),
            }
        }
        self.buf.push('"');
    }
}

/// Serialize a tree to a compact JSON string (no whitespace).
pub fn to_json(tree: &ConfigTree) -> String {
    let mut w = JsonWriter::new(JsonStyle::Compact);
    w.write_tree(tree);
    w.buf
}

/// Serialize a tree to a pretty-printed JSON string (2-space indent).
pub fn to_json_pretty(tree: &ConfigTree) -> String {
    let mut w = JsonWriter::new(JsonStyle::Pretty);
    w.write_tree(tree);
    w.buf
}

impl ConfigTree {
    pub fn to_json(&self) -> String {
        to_json(self)
    }

    pub fn to_json_pretty(&self) -> String {
        to_json_pretty(self)
    }
}
