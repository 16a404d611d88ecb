//! Small string helpers shared by the aggregators.

use serde_json::Value;

/// Keep at most `max` characters of `s`, never splitting a UTF-8 sequence.
pub(crate) fn excerpt(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((end, _)) => s[..end].to_string(),
        None => s.to_string(),
    }
}

/// Like [`excerpt`], with newlines flattened to spaces for one-line display.
pub(crate) fn one_line(s: &str, max: usize) -> String {
    excerpt(s, max).replace('\n', " ")
}

/// Compact JSON text of an arbitrary value, used when no better detail exists.
pub(crate) fn compact(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Final path component of `path`, or the whole string when there is none.
pub(crate) fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_counts_characters_not_bytes() {
        assert_eq!(excerpt("héllo wörld", 7), "héllo w");
        assert_eq!(excerpt("short", 80), "short");
    }

    #[test]
    fn test_one_line_flattens_after_truncating() {
        assert_eq!(one_line("a\nb\nc", 3), "a b");
    }

    #[test]
    fn test_basename() {
        assert_eq!(basename("/usr/bin/git"), "git");
        assert_eq!(basename("git"), "git");
        assert_eq!(basename("C:\\tools\\rg.exe"), "rg.exe");
        assert_eq!(basename("dir/"), "");
    }
}
