pub mod ast;
pub mod engine;
pub mod error;
pub mod file;
pub mod infer;
pub mod json;
pub mod lookup;
pub mod parser;
pub mod serialize;
pub mod shared;
pub mod tree;
pub mod value;

pub use engine::Policy;
pub use error::ConfigError;
pub use lookup::Lookup;
pub use parser::{ParseMode, ParseOptions};
pub use shared::SharedConfig;
pub use tree::{ConfigTree, Token};
pub use value::{Assignment, Parameter, Value, ValueKind};

// ── Core API ───────────────────────────────────────────────────────

/// Parse configuration text into a new tree with the default (lenient) rules.
pub fn parse_config(input: &str) -> Result<ConfigTree, ConfigError> {
    engine::parse_tree(input, &ParseOptions::default())
}

/// Parse configuration text into a new tree with explicit options.
pub fn parse_config_with(input: &str, options: &ParseOptions) -> Result<ConfigTree, ConfigError> {
    engine::parse_tree(input, options)
}

/// Combine `src` into `dst`, replacing values at keys both trees define.
pub fn load_tree(dst: &mut ConfigTree, src: &ConfigTree) -> Result<(), ConfigError> {
    dst.load_tree(src)
}

/// Combine `src` into `dst`, accumulating values at keys both trees define.
pub fn merge_tree(dst: &mut ConfigTree, src: &ConfigTree) -> Result<(), ConfigError> {
    dst.merge_tree(src)
}

#[cfg(test)]
mod tests;
