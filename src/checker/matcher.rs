use regex::Regex;
use std::ops::Range;

use crate::error::Result;

/// A module reference recognized on a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceMatch {
    pub module_name: String,
    pub referenced_version: String,
    pub line_text: String,
    /// Byte range of the version token within `line_text`.
    pub version_span: Range<usize>,
}

/// Recognizes `source = "<registry><module>/<version>.zip"` lines.
///
/// The pattern is compiled once for a registry base URL and reused for
/// every line of every file.
///
/// # Example
///
/// ```
/// use tfmodcheck::checker::ReferenceMatcher;
///
/// let matcher = ReferenceMatcher::new("https://modules.example.com/")?;
/// let line = r#"  source = "https://modules.example.com/vpc/2.0.zip""#;
///
/// let found = matcher.matches(line).unwrap();
/// assert_eq!(found.module_name, "vpc");
/// assert_eq!(found.referenced_version, "2.0");
///
/// assert_eq!(
///     matcher.rewrite(line, "vpc", "2.3"),
///     r#"  source = "https://modules.example.com/vpc/2.3.zip""#
/// );
/// # Ok::<(), tfmodcheck::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ReferenceMatcher {
    base_url: String,
    pattern: Regex,
}

impl ReferenceMatcher {
    /// Compiles the reference pattern for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pattern`](crate::Error::Pattern) when the pattern
    /// cannot be built, e.g. a URL long enough to exceed the regex size limit.
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = normalize_base_url(base_url);
        let pattern = format!(
            r#"^\s*source\s*=\s*"{}(?P<name>[^/"]+)/(?P<version>[^/"]+)\.zip"\s*$"#,
            regex::escape(&base_url)
        );
        let pattern = Regex::new(&pattern)?;
        Ok(Self { base_url, pattern })
    }

    /// The registry base URL, always ending in `/`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Extracts the module name and version from a reference line.
    ///
    /// The line must not include its terminator. Whether the module is
    /// known to the registry is not checked here.
    pub fn matches(&self, line: &str) -> Option<ReferenceMatch> {
        let caps = self.pattern.captures(line)?;
        let name = caps.name("name")?;
        let version = caps.name("version")?;
        Some(ReferenceMatch {
            module_name: name.as_str().to_string(),
            referenced_version: version.as_str().to_string(),
            line_text: line.to_string(),
            version_span: version.range(),
        })
    }

    /// Replaces the version of `module_name` on `line` with `new_version`.
    ///
    /// Everything outside the version token is kept byte-for-byte. Lines
    /// that don't match, or that reference another module, come back
    /// unchanged.
    pub fn rewrite(&self, line: &str, module_name: &str, new_version: &str) -> String {
        match self.matches(line) {
            Some(found) if found.module_name == module_name => {
                let mut out = String::with_capacity(line.len() + new_version.len());
                out.push_str(&line[..found.version_span.start]);
                out.push_str(new_version);
                out.push_str(&line[found.version_span.end..]);
                out
            }
            _ => line.to_string(),
        }
    }
}

/// Ensures the registry base URL ends with a single `/`.
pub fn normalize_base_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    format!("{}/", trimmed)
}
