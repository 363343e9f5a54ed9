//! Logical field names with an optional `${var}` placeholder.
//!
//! Only the first `${` and the first `}` of a name are considered. The
//! placeholder is resolved against the same parameter map the field value is
//! read from, so `"db.${env}.url"` with `env = "prod"` reads `"db.prod.url"`.

use std::borrow::Cow;

use super::{Converter, Parameters};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Placeholder {
    start: usize,
    end: usize,
    var: String,
}

/// A parsed logical field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameTemplate {
    name: String,
    placeholder: Option<Placeholder>,
}

impl NameTemplate {
    /// Parses `name` once.
    ///
    /// The template is dynamic when `${` occurs and the first `}` of the name
    /// sits at or after it. A `}` preceding the `${` leaves the name static.
    pub fn parse(name: impl Into<String>) -> Self {
        let name = name.into();
        let placeholder = match (name.find("${"), name.find('}')) {
            (Some(start), Some(end)) if end >= start => Some(Placeholder {
                start,
                end,
                var: name[start + 2..end].to_string(),
            }),
            _ => None,
        };
        Self { name, placeholder }
    }

    /// The name as declared, placeholder included.
    pub fn declared(&self) -> &str {
        &self.name
    }

    /// The placeholder variable, if the template is dynamic.
    pub fn var(&self) -> Option<&str> {
        self.placeholder.as_ref().map(|p| p.var.as_str())
    }

    pub fn is_dynamic(&self) -> bool {
        self.placeholder.is_some()
    }

    /// Computes the effective lookup key.
    ///
    /// When the placeholder variable is missing from `parameters`, or its
    /// value has no string form, the declared name is returned unchanged.
    pub fn resolve<P>(&self, parameters: &P) -> Cow<'_, str>
    where
        P: Parameters + ?Sized,
    {
        let Some(placeholder) = &self.placeholder else {
            return Cow::Borrowed(&self.name);
        };

        let Some(substitute) = parameters
            .lookup(&placeholder.var)
            .and_then(Converter::to_text)
        else {
            return Cow::Borrowed(&self.name);
        };

        let prefix = &self.name[..placeholder.start];
        let suffix = &self.name[placeholder.end + 1..];
        let mut key = String::with_capacity(prefix.len() + substitute.len() + suffix.len());
        key.push_str(prefix);
        key.push_str(&substitute);
        key.push_str(suffix);
        Cow::Owned(key)
    }
}
