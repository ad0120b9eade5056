//! Conditional guards around optional resources

/// Closing directive matching every guard
pub const GUARD_END: &str = "{{- end }}";

/// Wrap `content` in `guard` ... `{{- end }}`
///
/// A newline is inserted before the closing directive when `content` does
/// not already end with one.
pub fn wrap_with_guard(content: &str, guard: &str) -> String {
    let mut out = String::with_capacity(guard.len() + content.len() + GUARD_END.len() + 3);
    out.push_str(guard);
    out.push('\n');
    out.push_str(content);
    if !content.is_empty() && !content.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(GUARD_END);
    out.push('\n');
    out
}
