/// Reads an optional environment variable.
///
/// Returns `None` when the variable is unset, not valid unicode, or blank
/// after trimming. The returned value is trimmed.
pub fn optional_env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
