use std::collections::BTreeSet;

use url::{ParseError, Url};

use crate::route::{normalize_path, strip_locale_prefix};

/// Folds hrefs found on a rendered page into same-site routes.
///
/// Cross-origin links are dropped. Query strings and fragments are ignored,
/// only the path takes part in the route.
#[derive(Debug, Clone)]
pub struct LinkNormalizer {
    base: Url,
    source_locale: String,
}

impl LinkNormalizer {
    pub fn new(base: Url, source_locale: impl Into<String>) -> Self {
        Self {
            base,
            source_locale: source_locale.into(),
        }
    }

    pub fn source_locale(&self) -> &str {
        &self.source_locale
    }

    /// Normalized same-origin paths, still carrying their locale prefix.
    pub fn same_origin_paths<I, S>(&self, hrefs: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        hrefs
            .into_iter()
            .filter_map(|href| self.path_of(href.as_ref()))
            .map(|path| normalize_path(&path))
            .collect()
    }

    /// Locale-agnostic routes: same-origin paths with the source locale stripped.
    pub fn routes<I, S>(&self, hrefs: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.same_origin_paths(hrefs)
            .into_iter()
            .map(|path| strip_locale_prefix(&path, &self.source_locale))
            .collect()
    }

    fn path_of(&self, href: &str) -> Option<String> {
        let trimmed = href.trim();
        if trimmed.is_empty() {
            return None;
        }
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with('#') || lower.starts_with('?') || lower.starts_with("javascript:") {
            return None;
        }

        let absolute = match Url::parse(trimmed) {
            Ok(url) => url,
            // Relative and scheme-relative links resolve against the base, which
            // also folds dot segments.
            Err(ParseError::RelativeUrlWithoutBase) => self.base.join(trimmed).ok()?,
            Err(_) => return None,
        };

        if absolute.origin() != self.base.origin() {
            return None;
        }
        Some(absolute.path().to_string())
    }
}
