use crate::tree::ConfigTree;
use crate::value::Value;

/// Read-only lookup by possibly nested key, for template engines and other
/// consumers that only need to resolve names.
///
/// Paths may use `.` or `>` between segments (`database.user`, `database>user`).
pub trait Lookup {
    fn lookup_segments(&self, segments: &[&str]) -> Option<&Value>;

    fn lookup(&self, path: &str) -> Option<&Value> {
        let segments: Vec<&str> = path.split(['.', '>']).map(str::trim).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return None;
        }
        self.lookup_segments(&segments)
    }

    /// Textual form of a scalar at `path`, for interpolation.
    fn lookup_text(&self, path: &str) -> Option<String> {
        self.lookup(path)?.as_text()
    }
}

impl Lookup for ConfigTree {
    fn lookup_segments(&self, segments: &[&str]) -> Option<&Value> {
        let (last, parents) = segments.split_last()?;
        let mut current = self;
        for segment in parents {
            current = current.get_sub_tree(segment)?;
        }
        current.get(last)
    }
}
