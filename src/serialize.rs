use crate::infer::reads_back_as_string;
use crate::tree::{ConfigTree, Token};
use crate::value::{format_float, Assignment, Value};

/// Render a tree back to configuration text.
///
/// Comments are emitted verbatim in their recorded position. Arrays become
/// one line per element; sub-trees are flattened with dotted prefixes.
pub fn marshal(tree: &ConfigTree) -> String {
    let mut lines = Vec::new();
    write_tree(tree, "", &mut lines);
    let mut out = String::new();
    for line in lines {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

fn write_tree(tree: &ConfigTree, prefix: &str, lines: &mut Vec<String>) {
    for token in tree.tokens() {
        match token {
            Token::Comment(id) => {
                if let Some(text) = tree.comment(*id) {
                    lines.push(text.to_string());
                }
            }
            Token::Key(key) => {
                let Some(param) = tree.parameter(key) else {
                    continue;
                };
                let path = format!("{}{}", prefix, key);
                if let Value::SubTree(sub) = &param.value {
                    write_tree(sub, &format!("{}.", path), lines);
                    continue;
                }
                // Only the first line carries the operator; later lines
                // accumulate on re-parse.
                for (i, text) in value_texts(&param.value).into_iter().enumerate() {
                    let operator = if i == 0 {
                        param.assignment.operator()
                    } else {
                        Assignment::Default.operator()
                    };
                    lines.push(format!("{}{}{}", path, operator, text));
                }
            }
        }
    }
}

/// One text per line the value occupies.
fn value_texts(value: &Value) -> Vec<String> {
    match value {
        Value::Unset => vec![String::new()],
        Value::String(s) => vec![quote_string(s)],
        Value::Integer(i) => vec![i.to_string()],
        Value::Float(n) => vec![format_float(*n)],
        Value::Boolean(b) => vec![b.to_string()],
        Value::StringArray(items) => items.iter().map(|s| quote_string(s)).collect(),
        Value::IntegerArray(items) => items.iter().map(i64::to_string).collect(),
        Value::FloatArray(items) => items.iter().map(|n| format_float(*n)).collect(),
        Value::BooleanArray(items) => items.iter().map(bool::to_string).collect(),
        Value::SubTree(_) => Vec::new(),
    }
}

/// Prefix a `"` when the bare text would be read back as something else.
fn quote_string(s: &str) -> String {
    if reads_back_as_string(s) {
        s.to_string()
    } else {
        format!("\"{}", s)
    }
}

impl ConfigTree {
    /// Render this tree to configuration text.
    pub fn marshal(&self) -> String {
        marshal(self)
    }
}
