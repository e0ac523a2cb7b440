//! Path helpers for the archive cursor.
//!
//! Paths are relative to the archive root and never carry a leading slash.
//! The cursor form additionally ends in `/` unless it is the root (`""`).

/// Normalize a path by resolving `.` and `..` segments.
///
/// Returns a relative path with no leading or trailing slashes. `..` at the
/// root is dropped.
pub fn normalize(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split('/').filter(|s| !s.is_empty()) {
        match part {
            ".." => {
                parts.pop();
            }
            "." => {}
            _ => parts.push(part),
        }
    }

    parts.join("/")
}

/// Join `path` onto the cursor `current` and normalize the result.
///
/// A leading `/` in `path` resolves from the archive root.
pub fn join(current: &str, path: &str) -> String {
    if path.starts_with('/') {
        normalize(path)
    } else {
        normalize(&format!("{}{}", current, path))
    }
}

/// Convert a normalized path into cursor form.
pub fn as_cursor(path: &str) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!("{}/", path)
    }
}

/// Parent of a cursor, in cursor form. The root is its own parent.
pub fn parent(cursor: &str) -> String {
    match cursor.trim_end_matches('/').rsplit_once('/') {
        Some((parent, _)) => as_cursor(parent),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("a/b/"), "a/b");
        assert_eq!(normalize("./a//b/./c"), "a/b/c");
        assert_eq!(normalize("a/../b"), "b");
        assert_eq!(normalize("../../a"), "a");
        assert_eq!(normalize("a/.."), "");
    }

    #[test]
    fn test_join() {
        assert_eq!(join("", "dir1"), "dir1");
        assert_eq!(join("dir1/", "sub"), "dir1/sub");
        assert_eq!(join("dir1/", "sub/"), "dir1/sub");
        assert_eq!(join("dir1/", "../other"), "other");
        assert_eq!(join("dir1/", "/top"), "top");
        assert_eq!(join("dir1/", "."), "dir1");
        assert_eq!(join("dir1/", "/"), "");
    }

    #[test]
    fn test_as_cursor() {
        assert_eq!(as_cursor(""), "");
        assert_eq!(as_cursor("a/b"), "a/b/");
    }

    #[test]
    fn test_parent() {
        assert_eq!(parent(""), "");
        assert_eq!(parent("dir1/"), "");
        assert_eq!(parent("a/b/"), "a/");
        assert_eq!(parent("a/b/c/"), "a/b/");
    }
}
