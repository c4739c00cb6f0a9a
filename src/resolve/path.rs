//! String-level path helpers.
//! All paths handed to the host use forward slashes regardless of platform, so
//! these operate on `&str` rather than `Path`.

/// Join `root` and `path` with exactly one `/`.
/// Backslashes are converted first; `..` segments are not interpreted here.
pub fn combine_paths(root: &str, path: &str) -> String {
    let root = root.replace('\\', "/");
    let path = path.replace('\\', "/");
    format!(
        "{}/{}",
        root.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Forward slashes, no trailing slash. Idempotent.
pub fn normalize(path: &str) -> String {
    path.replace('\\', "/").trim_end_matches('/').to_string()
}

/// Last non-empty segment of `path`, if any.
pub fn file_name(path: &str) -> Option<&str> {
    path.rsplit(['/', '\\']).find(|s| !s.is_empty())
}

/// Folder part of `path` with leading and trailing slash.
/// A path already ending in `/` is returned untouched.
pub fn get_folder(path: &str) -> String {
    if path.ends_with('/') {
        return path.to_string();
    }
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    match segments.split_last() {
        Some((_, parents)) if !parents.is_empty() => format!("/{}/", parents.join("/")),
        _ => "/".to_string(),
    }
}

/// True when the `..` segments of a relative path climb above its start.
pub fn escapes_root(path: &str) -> bool {
    let mut depth: i64 = 0;
    for seg in path.split(['/', '\\']) {
        match seg {
            "" | "." => {}
            ".." => {
                depth -= 1;
                if depth < 0 {
                    return true;
                }
            }
            _ => depth += 1,
        }
    }
    false
}

/// Lexically drop `.` segments and fold each `..` into its parent.
/// Forward slashes, no trailing slash; a leading `/` or drive prefix is kept
/// and `..` never climbs above it.
pub fn collapse_dots(path: &str) -> String {
    let path = path.replace('\\', "/");
    let absolute = path.starts_with('/');
    let mut out: Vec<&str> = Vec::new();
    for seg in path.split('/') {
        match seg {
            "" | "." => {}
            ".." => match out.last() {
                Some(&last) if last != ".." && !(out.len() == 1 && last.ends_with(':')) => {
                    out.pop();
                }
                Some(&last) if last.ends_with(':') && out.len() == 1 => {}
                None if absolute => {}
                _ => out.push(".."),
            },
            _ => out.push(seg),
        }
    }
    let joined = out.join("/");
    if absolute { format!("/{joined}") } else { joined }
}
