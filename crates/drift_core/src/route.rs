/// Route of the site root.
pub const ROOT_ROUTE: &str = "/";

/// Fully qualified URL of `route` rendered in `locale`: `{base}/{locale}{route}`.
///
/// A trailing slash on `base` is dropped. `route` is expected to start with `/`.
pub fn build_locale_url(base: &str, locale: &str, route: &str) -> String {
    format!("{}/{}{}", base.trim_end_matches('/'), locale, route)
}

/// Fold a locale-prefixed path back to its locale-agnostic route.
///
/// Only a whole first segment equal to `locale` is removed; every other path,
/// including paths prefixed with a different locale, is returned unchanged.
pub fn strip_locale_prefix(path: &str, locale: &str) -> String {
    let Some(rest) = path.strip_prefix('/').and_then(|p| p.strip_prefix(locale)) else {
        return path.to_string();
    };
    if rest.is_empty() {
        ROOT_ROUTE.to_string()
    } else if rest.starts_with('/') {
        rest.to_string()
    } else {
        path.to_string()
    }
}

/// Canonical route form of a URL path.
///
/// Empty becomes `/`, a leading `/` is forced and a trailing `/` is removed
/// unless the path is the root. Applying it twice yields the same route.
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return ROOT_ROUTE.to_string();
    }
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// Filesystem-safe stem for a route: `/a/b` becomes `a_b`, the root becomes `index`.
pub fn safe_filename(route: &str) -> String {
    let name = route.trim_matches('/').replace('/', "_");
    if name.is_empty() {
        "index".to_string()
    } else {
        name
    }
}
