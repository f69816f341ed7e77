//! `${Name}` placeholder substitution.

use std::collections::BTreeMap;

use regex::Regex;

use crate::error::{ToolboxError, ToolboxResult};

/// Matches any `${...}` token left without a map entry.
const UNMATCHED_PLACEHOLDER: &str = r"\$\{[^}]*\}";

/// Replace every occurrence of a map key in `template` with its value.
///
/// Keys are matched literally (regex-escaped) and longer keys win over their
/// prefixes. Any remaining `${...}` token renders as the empty string.
pub fn replace_template(template: &str, map: &BTreeMap<String, String>) -> ToolboxResult<String> {
    let mut keys: Vec<&str> = map
        .keys()
        .map(String::as_str)
        .filter(|k| !k.is_empty())
        .collect();
    keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    let pattern = keys
        .iter()
        .map(|k| regex::escape(k))
        .chain(std::iter::once(UNMATCHED_PLACEHOLDER.to_string()))
        .collect::<Vec<_>>()
        .join("|");

    let re = Regex::new(&pattern)
        .map_err(|e| ToolboxError::ValidationError(format!("Invalid template keys: {e}")))?;

    let rendered = re.replace_all(template, |caps: &regex::Captures<'_>| {
        map.get(&caps[0]).cloned().unwrap_or_default()
    });
    Ok(rendered.into_owned())
}

/// Template variables describing an object key.
///
/// For `photos/2024/cat.tar.gz`:
///
/// | Variable      | Value                  |
/// |---------------|------------------------|
/// | `${Key}`      | `photos/2024/cat.tar.gz` |
/// | `${Dir}`      | `photos/2024/`         |
/// | `${Name}`     | `cat.tar.gz`           |
/// | `${BaseName}` | `cat.tar`              |
/// | `${Ext}`      | `.gz`                  |
pub fn object_key_vars(key: &str) -> BTreeMap<String, String> {
    let (dir, name) = match key.rfind('/') {
        Some(idx) => key.split_at(idx + 1),
        None => ("", key),
    };
    // 以 "." 开头的文件名（如 .env）视为没有扩展名
    let (base_name, ext) = match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    };

    [
        ("${Key}", key),
        ("${Dir}", dir),
        ("${Name}", name),
        ("${BaseName}", base_name),
        ("${Ext}", ext),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}
