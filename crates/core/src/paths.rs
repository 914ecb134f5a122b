//! Posix path helpers with the semantics of Node's `path.posix`.
//!
//! Content keys and slugs are always forward-slash strings regardless of the
//! platform the pipeline runs on, so these helpers never go through
//! `std::path`.

/// A path split into the same parts Node's `path.parse` produces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPath {
    /// `/` for absolute paths, empty otherwise.
    pub root: String,
    /// Everything before the final segment.
    pub dir: String,
    /// Final segment without its extension.
    pub name: String,
    /// Extension including the leading dot, or empty.
    pub ext: String,
}

impl ParsedPath {
    /// Final segment including the extension.
    pub fn base(&self) -> String {
        format!("{}{}", self.name, self.ext)
    }

    /// Drop the extension, keeping root, dir and name.
    pub fn without_ext(mut self) -> Self {
        self.ext.clear();
        self
    }

    /// Replace the final segment's name, dropping the extension.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self.ext.clear();
        self
    }

    /// Replace the directory portion.
    pub fn with_dir(mut self, dir: impl Into<String>) -> Self {
        self.dir = dir.into();
        self
    }

    /// Reassemble the parts the way Node's `path.format` does.
    pub fn format(&self) -> String {
        let dir = if self.dir.is_empty() {
            self.root.as_str()
        } else {
            self.dir.as_str()
        };
        let base = self.base();

        if dir.is_empty() {
            base
        } else if dir == self.root {
            format!("{dir}{base}")
        } else {
            format!("{dir}/{base}")
        }
    }
}

/// Split a posix path into root, dir, name and extension.
///
/// ```
/// use ssgmods_core::paths::parse;
///
/// let parsed = parse("blog/post.page.tsx");
/// assert_eq!(parsed.dir, "blog");
/// assert_eq!(parsed.name, "post.page");
/// assert_eq!(parsed.ext, ".tsx");
/// ```
pub fn parse(path: &str) -> ParsedPath {
    let root = if path.starts_with('/') { "/" } else { "" };
    let trimmed = path.trim_end_matches('/');

    if trimmed.is_empty() {
        return ParsedPath {
            root: root.to_string(),
            dir: root.to_string(),
            ..ParsedPath::default()
        };
    }

    let (dir, base) = match trimmed.rfind('/') {
        Some(index) => {
            let dir = trimmed[..index].trim_end_matches('/');
            let dir = if dir.is_empty() { root } else { dir };
            (dir, &trimmed[index + 1..])
        }
        None => ("", trimmed),
    };

    let (name, ext) = match base.rfind('.') {
        Some(index) if index > 0 && base != ".." => (&base[..index], &base[index..]),
        _ => (base, ""),
    };

    ParsedPath {
        root: root.to_string(),
        dir: dir.to_string(),
        name: name.to_string(),
        ext: ext.to_string(),
    }
}

/// Directory portion of a path; `.` when there is none.
pub fn dirname(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/".to_string();
    }

    match trimmed.rfind('/') {
        None => ".".to_string(),
        Some(index) => {
            let dir = trimmed[..index].trim_end_matches('/');
            if dir.is_empty() {
                "/".to_string()
            } else {
                dir.to_string()
            }
        }
    }
}

/// Final segment of a path, extension included.
pub fn basename(path: &str) -> String {
    parse(path).base()
}

/// Join segments with `/` and normalize the result.
pub fn join<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    let joined = parts
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    if joined.is_empty() {
        ".".to_string()
    } else {
        normalize_path(&joined)
    }
}

/// Convert backslashes to `/` and collapse `.`, `..` and repeated separators.
///
/// Unlike Node, an empty input stays empty so that an empty slug is still
/// recognizable as "no slug".
pub fn normalize_path(path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }

    let path = path.replace('\\', "/");
    let absolute = path.starts_with('/');
    let trailing = path.ends_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if absolute => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let mut normalized = segments.join("/");
    if normalized.is_empty() {
        return if absolute { "/".to_string() } else { ".".to_string() };
    }
    if trailing {
        normalized.push('/');
    }
    if absolute {
        normalized.insert(0, '/');
    }
    normalized
}
