use tracing::debug;

use crate::ast::{Line, NumberedLine};
use crate::error::ConfigError;
use crate::parser::{self, ParseOptions};
use crate::tree::ConfigTree;
use crate::value::{Assignment, Parameter};

/// How a second source is combined into a non-empty destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Existing values are replaced (`set`).
    Load,
    /// Existing values are accumulated into arrays (`add`).
    Merge,
}

/// Parse a whole block of text into a fresh tree.
///
/// Repeated keys inside the block always accumulate, whatever policy the
/// block is later combined with. `key:=value` replaces earlier values.
pub fn parse_tree(input: &str, options: &ParseOptions) -> Result<ConfigTree, ConfigError> {
    let lines = parser::parse(input, options)?;
    let mut tree = ConfigTree::new();
    for NumberedLine { number, line } in lines {
        apply_line(&mut tree, number, line).map_err(|e| e.at_line(number + 1))?;
    }
    Ok(tree)
}

fn apply_line(tree: &mut ConfigTree, number: usize, line: Line) -> Result<(), ConfigError> {
    match line {
        Line::Comment(text) => {
            tree.push_comment(number, text);
            Ok(())
        }
        Line::Assign {
            key,
            assignment,
            value,
        } => {
            let param = Parameter::with_assignment(value, assignment);
            match assignment {
                Assignment::ForceReplace => {
                    tree.set_parameter(&key, param);
                    Ok(())
                }
                Assignment::Default | Assignment::ForceAppend => tree.add_parameter(&key, param),
            }
        }
    }
}

/// Combine `src` into `dst` under `policy`.
///
/// An empty destination adopts the source wholesale. Otherwise every key of
/// the source is applied to a staged copy of the destination, which replaces
/// the destination only if every key applied cleanly.
pub fn combine(dst: &mut ConfigTree, src: ConfigTree, policy: Policy) -> Result<(), ConfigError> {
    if src.is_empty() {
        return Ok(());
    }
    if dst.is_empty() {
        debug!(keys = src.len(), "destination empty, adopting source");
        *dst = src;
        return Ok(());
    }

    let mut staged = dst.clone();
    for (key, param) in src.into_entries() {
        let accumulate = match param.assignment {
            Assignment::ForceReplace => false,
            Assignment::ForceAppend => true,
            Assignment::Default => policy == Policy::Merge,
        };
        if accumulate {
            staged.add_parameter(&key, param)?;
        } else {
            staged.set_parameter(&key, param);
        }
    }
    staged.mark_multiple();
    debug!(keys = staged.len(), ?policy, "combined source into destination");
    *dst = staged;
    Ok(())
}

fn combine_text(
    dst: &mut ConfigTree,
    input: &str,
    options: &ParseOptions,
    policy: Policy,
) -> Result<(), ConfigError> {
    if input.is_empty() {
        return Ok(());
    }
    let src = parse_tree(input, options)?;
    debug!(lines = input.lines().count(), ?policy, "parsed configuration text");
    combine(dst, src, policy)
}

impl ConfigTree {
    /// Parse `input` and combine it with replace semantics.
    pub fn load_text(&mut self, input: &str) -> Result<(), ConfigError> {
        combine_text(self, input, &ParseOptions::default(), Policy::Load)
    }

    /// Parse `input` and combine it with accumulate semantics.
    pub fn merge_text(&mut self, input: &str) -> Result<(), ConfigError> {
        combine_text(self, input, &ParseOptions::default(), Policy::Merge)
    }

    pub fn load_text_with(&mut self, input: &str, options: &ParseOptions) -> Result<(), ConfigError> {
        combine_text(self, input, options, Policy::Load)
    }

    pub fn merge_text_with(&mut self, input: &str, options: &ParseOptions) -> Result<(), ConfigError> {
        combine_text(self, input, options, Policy::Merge)
    }

    /// Combine an already-built tree with replace semantics.
    pub fn load_tree(&mut self, src: &ConfigTree) -> Result<(), ConfigError> {
        combine(self, src.clone(), Policy::Load)
    }

    /// Combine an already-built tree with accumulate semantics.
    pub fn merge_tree(&mut self, src: &ConfigTree) -> Result<(), ConfigError> {
        combine(self, src.clone(), Policy::Merge)
    }
}
