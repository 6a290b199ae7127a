use regex::Regex;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum RuleError {
    #[error("Invalid regex pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A compiled find pattern. Two patterns are equal when their source text is.
#[derive(Debug, Clone)]
pub struct FindPattern(Regex);

impl FindPattern {
    pub fn new(pattern: &str) -> Result<Self, RuleError> {
        Regex::new(pattern)
            .map(Self)
            .map_err(|source| RuleError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
    }

    pub fn regex(&self) -> &Regex {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl PartialEq for FindPattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for FindPattern {}

/// Set of transformations applied uniformly to every selected file name.
///
/// Built through the `with_*` methods, which normalise empty text to "not set"
/// and compile the find pattern up front, so a constructed value is always
/// usable by [`compute_name`](super::compute_name).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleConfiguration {
    prefix: String,
    suffix: String,
    remove_from_start: usize,
    remove_from_end: usize,
    add_extension: Option<String>,
    regex_find: Option<FindPattern>,
    regex_replace: Option<String>,
    date_format: Option<String>,
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

impl RuleConfiguration {
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn with_remove_from_start(mut self, count: usize) -> Self {
        self.remove_from_start = count;
        self
    }

    pub fn with_remove_from_end(mut self, count: usize) -> Self {
        self.remove_from_end = count;
        self
    }

    /// Replacement extension, appended verbatim (include the dot).
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.add_extension = non_empty(extension.into());
        self
    }

    /// Set the find pattern and its literal replacement.
    pub fn with_regex(mut self, find: &str, replace: impl Into<String>) -> Result<Self, RuleError> {
        self.regex_find = if find.is_empty() {
            None
        } else {
            Some(FindPattern::new(find)?)
        };
        self.regex_replace = non_empty(replace.into());
        Ok(self)
    }

    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = non_empty(format.into());
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn remove_from_start(&self) -> usize {
        self.remove_from_start
    }

    pub fn remove_from_end(&self) -> usize {
        self.remove_from_end
    }

    pub fn add_extension(&self) -> Option<&str> {
        self.add_extension.as_deref()
    }

    pub fn regex_find(&self) -> Option<&FindPattern> {
        self.regex_find.as_ref()
    }

    pub fn regex_replace(&self) -> Option<&str> {
        self.regex_replace.as_deref()
    }

    pub fn date_format(&self) -> Option<&str> {
        self.date_format.as_deref()
    }

    /// True when no rule would change a name.
    pub fn is_identity(&self) -> bool {
        self.prefix.is_empty()
            && self.suffix.is_empty()
            && self.remove_from_start == 0
            && self.remove_from_end == 0
            && self.add_extension.is_none()
            && self.regex_find.is_none()
            && self.date_format.is_none()
    }
}

/// Parse a character count typed as text. Anything that is not a
/// non-negative integer counts as zero.
pub fn parse_count(text: &str) -> usize {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0;
    }

    match trimmed.parse::<usize>() {
        Ok(count) => count,
        Err(e) => {
            warn!(value = %trimmed, error = %e, "Invalid count, using 0");
            0
        }
    }
}
