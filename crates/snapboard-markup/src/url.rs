//! Link target checks for formatters that build `href`/`src` themselves

const ALLOWED_SCHEMES: [&str; 3] = ["http://", "https://", "mailto:"];

/// Returns the trimmed URL if it is absolute with an allowed scheme or a
/// site-relative path.
pub(crate) fn safe_url(raw: &str) -> Option<&str> {
    let url = raw.trim();
    if url.is_empty() || url.chars().any(char::is_control) {
        return None;
    }
    if url.starts_with('/') && !url.starts_with("//") {
        return Some(url);
    }
    let allowed = ALLOWED_SCHEMES.iter().any(|scheme| {
        url.len() > scheme.len()
            && url
                .get(..scheme.len())
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    });
    allowed.then_some(url)
}
