use super::{Constrained, StringRules};
use crate::schema::Refinement;
use crate::{Error, Result};
use kanon_value::Value;
use regex::Regex;
use std::sync::LazyLock;

static EMAIL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$").ok());
static URL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://[^\s/?#]+[^\s]*$").ok());
static UUID: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$").ok()
});

fn string_rule<F>(name: &'static str, check: F) -> Refinement
where
    F: Fn(&str) -> std::result::Result<(), String> + Send + Sync + 'static,
{
    Refinement::new(name, move |value| match value {
        Value::String(text) => check(text),
        _ => Ok(()),
    })
}

fn format_rule(name: &'static str, pattern: &'static LazyLock<Option<Regex>>, message: &'static str) -> Refinement {
    string_rule(name, move |text| {
        let matched = pattern.as_ref().is_some_and(|re| re.is_match(text));
        if matched { Ok(()) } else { Err(message.to_string()) }
    })
}

impl Constrained<StringRules> {
    /// At least `min` characters
    #[must_use]
    pub fn min_length(&self, min: usize) -> Self {
        self.push(string_rule("min_length", move |text| {
            if text.chars().count() >= min {
                Ok(())
            } else {
                Err(format!("String must contain at least {min} character(s)"))
            }
        }))
    }

    /// At most `max` characters
    #[must_use]
    pub fn max_length(&self, max: usize) -> Self {
        self.push(string_rule("max_length", move |text| {
            if text.chars().count() <= max {
                Ok(())
            } else {
                Err(format!("String must contain at most {max} character(s)"))
            }
        }))
    }

    /// Exactly `len` characters
    #[must_use]
    pub fn length(&self, len: usize) -> Self {
        self.push(string_rule("length", move |text| {
            if text.chars().count() == len {
                Ok(())
            } else {
                Err(format!("String must contain exactly {len} character(s)"))
            }
        }))
    }

    /// At least one character
    #[must_use]
    pub fn nonempty(&self) -> Self {
        self.push(string_rule("nonempty", |text| {
            if text.is_empty() {
                Err("String must contain at least 1 character(s)".to_string())
            } else {
                Ok(())
            }
        }))
    }

    /// An email address
    #[must_use]
    pub fn email(&self) -> Self {
        self.push(format_rule("email", &EMAIL, "Invalid email"))
    }

    /// An absolute URL with a scheme
    #[must_use]
    pub fn url(&self) -> Self {
        self.push(format_rule("url", &URL, "Invalid url"))
    }

    /// A hyphenated UUID
    #[must_use]
    pub fn uuid(&self) -> Self {
        self.push(format_rule("uuid", &UUID, "Invalid uuid"))
    }

    /// Matches a regular expression
    ///
    /// # Errors
    ///
    /// Returns `InvalidPattern` if `pattern` does not compile.
    pub fn regex(&self, pattern: &str) -> Result<Self> {
        let re = Regex::new(pattern).map_err(|source| Error::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(self.push(string_rule("regex", move |text| {
            if re.is_match(text) {
                Ok(())
            } else {
                Err(format!("String must match pattern {}", re.as_str()))
            }
        })))
    }

    /// Starts with `prefix`
    #[must_use]
    pub fn starts_with(&self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.push(string_rule("starts_with", move |text| {
            if text.starts_with(prefix.as_str()) {
                Ok(())
            } else {
                Err(format!("String must start with \"{prefix}\""))
            }
        }))
    }

    /// Ends with `suffix`
    #[must_use]
    pub fn ends_with(&self, suffix: impl Into<String>) -> Self {
        let suffix = suffix.into();
        self.push(string_rule("ends_with", move |text| {
            if text.ends_with(suffix.as_str()) {
                Ok(())
            } else {
                Err(format!("String must end with \"{suffix}\""))
            }
        }))
    }

    /// Contains `needle`
    #[must_use]
    pub fn includes(&self, needle: impl Into<String>) -> Self {
        let needle = needle.into();
        self.push(string_rule("includes", move |text| {
            if text.contains(needle.as_str()) {
                Ok(())
            } else {
                Err(format!("String must include \"{needle}\""))
            }
        }))
    }
}
