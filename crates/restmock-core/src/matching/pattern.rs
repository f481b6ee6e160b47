//! URL template compilation with positional `?` wildcards.

use crate::error::MockError;
use regex::Regex;

/// Compiled URL template.
///
/// A template is a sequence of `/`-prefixed segments, each either a literal
/// (`[\w-]+`) or the wildcard `?`. The compiled matcher tests whether a
/// concrete request path belongs to the template and extracts the wildcard
/// values left-to-right.
#[derive(Debug, Clone)]
pub struct UrlPattern {
    template: String,
    regex: Regex,
    wildcards: usize,
}

impl UrlPattern {
    /// Compile a template, rejecting anything outside the grammar.
    ///
    /// The empty template is legal and matches only the empty path; no
    /// trailing slash, no empty segments.
    pub fn compile(template: &str) -> Result<Self, MockError> {
        if !template_is_valid(template) {
            return Err(MockError::InvalidTemplate {
                template: template.to_string(),
            });
        }

        let mut regex_str = String::from("^");
        let mut wildcards = 0;
        for segment in template.split('/').skip(1) {
            regex_str.push('/');
            if segment == "?" {
                regex_str.push_str(r"([\w\-]+)");
                wildcards += 1;
            } else {
                // literal segments are [\w-]+, nothing to escape
                regex_str.push_str(segment);
            }
        }
        regex_str.push('$');

        let regex = Regex::new(&regex_str).expect("valid regex");
        Ok(Self {
            template: template.to_string(),
            regex,
            wildcards,
        })
    }

    /// The source template.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Number of wildcard segments in the template.
    pub fn wildcards(&self) -> usize {
        self.wildcards
    }

    /// Match a URL and extract the ordered wildcard values.
    ///
    /// The query string is stripped before matching; `None` means the path
    /// does not belong to this template.
    pub fn extract(&self, raw_url: &str) -> Option<Vec<String>> {
        let path = raw_url.split('?').next().unwrap_or("");
        let caps = self.regex.captures(path)?;
        Some(
            (1..=self.wildcards)
                .filter_map(|i| caps.get(i).map(|m| m.as_str().to_owned()))
                .collect(),
        )
    }
}

fn template_is_valid(template: &str) -> bool {
    if template.is_empty() {
        return true;
    }
    if !template.starts_with('/') || template.ends_with('/') {
        return false;
    }
    template.split('/').skip(1).all(|segment| {
        segment == "?"
            || (!segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'))
    })
}
