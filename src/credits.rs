/// Hands a URL to something that can display it.
pub trait UrlOpener {
    fn open_url(&self, url: &str);
}

/// Opens URLs with the operating system's default handler.
pub struct SystemOpener;

impl UrlOpener for SystemOpener {
    fn open_url(&self, url: &str) {
        if let Err(e) = open::that(url) {
            log::debug!("Could not open {}: {}", url, e);
        }
    }
}

/// Accept `raw` if it is an absolute URL: a scheme, a colon, and a
/// non-empty remainder with no whitespace or control characters.
pub fn parse_credits_url(raw: &str) -> Option<&str> {
    let url = raw.trim();
    let (scheme, rest) = url.split_once(':')?;

    let mut chars = scheme.chars();
    if !chars.next()?.is_ascii_alphabetic() {
        return None;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        return None;
    }

    if rest.is_empty() || rest.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return None;
    }
    // "http:" and "https:" need an authority
    if matches!(scheme.to_ascii_lowercase().as_str(), "http" | "https") {
        let authority = rest
            .strip_prefix("//")
            .map(|r| r.split(['/', '?', '#']).next().unwrap_or_default());
        if authority.map_or(true, str::is_empty) {
            return None;
        }
    }

    Some(url)
}

/// Open the credits link if `raw` parses as a URL. Returns whether an open was attempted.
pub fn open_credits(raw: &str, opener: &dyn UrlOpener) -> bool {
    match parse_credits_url(raw) {
        Some(url) => {
            log::info!("Opening credits link {}", url);
            opener.open_url(url);
            true
        }
        None => false,
    }
}
