//! Glob matching of review rule patterns against changed file sets.
//!
//! Rule patterns use shell-glob syntax extended with brace alternation and
//! `**` directory wildcards. Brace groups may nest, which the glob library
//! does not accept directly, so patterns are expanded into brace-free
//! alternatives before compilation.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

/// Reports whether any changed file matches the rule pattern.
///
/// Matching is case-sensitive and `*` does not cross `/` boundaries; `**`
/// matches zero or more path components.
///
/// # Errors
///
/// Returns the glob compiler error when the pattern is malformed.
pub fn is_match<S: AsRef<str>>(files: &[S], pattern: &str) -> Result<bool, globset::Error> {
    let matcher = build_matcher(pattern)?;
    Ok(files.iter().any(|file| matcher.is_match(file.as_ref())))
}

/// Compiles a rule pattern into a matcher over its brace-free alternatives.
pub(crate) fn build_matcher(pattern: &str) -> Result<GlobSet, globset::Error> {
    let mut builder = GlobSetBuilder::new();
    for alternative in expand_braces(pattern) {
        let glob = GlobBuilder::new(&alternative)
            .literal_separator(true)
            .build()?;
        builder.add(glob);
    }
    builder.build()
}

/// Expands the first balanced brace group and recurses over the result.
///
/// Unbalanced braces are left in place so the glob compiler reports them.
fn expand_braces(pattern: &str) -> Vec<String> {
    let mut prefix = String::new();
    let mut chars = pattern.chars();

    while let Some(c) = chars.next() {
        if c != '{' {
            prefix.push(c);
            continue;
        }

        let mut depth = 1_usize;
        let mut body = String::new();
        for inner in chars.by_ref() {
            match inner {
                '{' => {
                    depth += 1;
                    body.push(inner);
                }
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                    body.push(inner);
                }
                _ => body.push(inner),
            }
        }

        if depth != 0 {
            return vec![pattern.to_owned()];
        }

        let suffix: String = chars.collect();
        let mut expanded = Vec::new();
        for alternative in split_alternatives(&body) {
            expanded.extend(expand_braces(&format!("{prefix}{alternative}{suffix}")));
        }
        return expanded;
    }

    vec![prefix]
}

/// Splits a brace group body on commas outside nested groups.
fn split_alternatives(body: &str) -> Vec<String> {
    let mut depth = 0_usize;
    let mut current = String::new();
    let mut alternatives = Vec::new();

    for c in body.chars() {
        match c {
            '{' => {
                depth += 1;
                current.push(c);
            }
            '}' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ',' if depth == 0 => alternatives.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }

    alternatives.push(current);
    alternatives
}
