// src/core/url.rs

/// Strips a dataset family's fixed URL prefix. The prefix is a property of
/// the family, never stored per record. `restore(strip(u)) == u` for every
/// absolute `u`; relative URLs are taken to be in stored form already.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UrlCompactor {
    prefix: String,
}

impl UrlCompactor {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Remove the prefix on an exact byte match, else return `url` as is.
    /// A remainder that `restore` would pass through (empty, or carrying
    /// its own `://`) is not stripped.
    pub fn strip<'a>(&self, url: &'a str) -> &'a str {
        if self.prefix.is_empty() {
            return url;
        }
        match url.strip_prefix(self.prefix.as_str()) {
            Some(rest) if !rest.is_empty() && !rest.contains("://") => rest,
            _ => url,
        }
    }

    /// Undo `strip`. Absolute URLs (already carrying a scheme) are left alone.
    pub fn restore(&self, stored: &str) -> String {
        if stored.is_empty() || stored.contains("://") {
            stored.to_string()
        } else {
            format!("{}{}", self.prefix, stored)
        }
    }
}

/// Last path segment of a URL; empty input gives an empty name.
pub fn file_name(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or("")
}

/// Two-digit component number from a paper filename:
/// `9709_s18_qp_42.pdf` → `42`, else the first `_NN_` infix.
pub fn component_from_file_name(name: &str) -> Option<String> {
    if let Some(stem) = name.strip_suffix(".pdf") {
        if let Some(pos) = stem.rfind('_') {
            let tail = &stem[pos + 1..];
            if is_two_digits(tail) {
                return Some(tail.to_string());
            }
        }
    }

    let bytes = name.as_bytes();
    (0..bytes.len().saturating_sub(3))
        .find(|&i| {
            bytes[i] == b'_'
                && bytes[i + 1].is_ascii_digit()
                && bytes[i + 2].is_ascii_digit()
                && bytes[i + 3] == b'_'
        })
        .map(|i| name[i + 1..i + 3].to_string())
}

fn is_two_digits(s: &str) -> bool {
    s.len() == 2 && s.bytes().all(|b| b.is_ascii_digit())
}
