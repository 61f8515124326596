//! Lexical path concatenation.
//!
//! Node resolution only glues path segments together with `/`. Collapsing
//! `.` and `..` is left to callers.

/// Join `base` and `rel` with a single `/`.
///
/// An empty side yields the other side unchanged, so the root of a node
/// resolves to its base path and a node with an empty base path passes
/// paths through untouched.
pub fn join(base: &str, rel: &str) -> String {
    if rel.is_empty() {
        return base.to_owned();
    }
    if base.is_empty() {
        return rel.to_owned();
    }

    let base = base.trim_end_matches('/');
    let rel = rel.trim_start_matches('/');
    if base.is_empty() {
        // base was "/" (or several slashes)
        return format!("/{rel}");
    }
    if rel.is_empty() {
        return base.to_owned();
    }
    format!("{base}/{rel}")
}
