use crate::value::Value;

const TRUE_WORDS: [&str; 3] = ["yes", "true", "on"];
const FALSE_WORDS: [&str; 4] = ["no", "none", "false", "off"];

/// Turn the trimmed raw text of a value into a typed [`Value`].
///
/// Precedence: a leading `"` forces a string (one quote is stripped),
/// then boolean words, then base-10 integers, then floats, then plain string.
pub fn infer(raw: &str) -> Value {
    if let Some(rest) = raw.strip_prefix('"') {
        return Value::String(rest.to_string());
    }
    if TRUE_WORDS.contains(&raw) {
        return Value::Boolean(true);
    }
    if FALSE_WORDS.contains(&raw) {
        return Value::Boolean(false);
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Value::Integer(i);
    }
    if looks_numeric(raw) {
        match raw.parse::<f64>() {
            Ok(n) if n.is_finite() => return Value::Float(n),
            _ => {}
        }
    }
    Value::String(raw.to_string())
}

/// Only decimal/exponential notation counts as a float; `inf` and `NaN`
/// stay strings, and so does anything out of `f64` range.
fn looks_numeric(raw: &str) -> bool {
    raw.bytes().any(|b| b.is_ascii_digit())
        && raw
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
}

/// True when `s` would come back as the same string if written unquoted.
pub(crate) fn reads_back_as_string(s: &str) -> bool {
    s.trim() == s && infer(s) == Value::String(s.to_string())
}
