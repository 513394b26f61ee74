use once_cell::sync::Lazy;
use regex::Regex;

use super::line::strip_quotes;
use super::record::Hyperlink;

static FORMULA_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)^=HYPERLINK\("([^"]+)","([^"]+)"\)$"#).expect("formula regex should compile")
});

static BARE_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(https?://\S+|www\.\S+)$").expect("bare URL regex should compile")
});

static EMBEDDED_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(https?://\S+|www\.\S+)").expect("embedded URL regex should compile")
});

/// A named extraction step. `extract` returns `None` to pass the value on.
pub struct Rule {
    pub name: &'static str,
    pub extract: fn(&str) -> Option<Hyperlink>,
}

/// Evaluated top to bottom; the first rule that matches wins.
pub static RULES: &[Rule] = &[
    Rule {
        name: "formula",
        extract: formula,
    },
    Rule {
        name: "bare_url",
        extract: bare_url,
    },
    Rule {
        name: "embedded_url",
        extract: embedded_url,
    },
];

/// Work out display text and target URL for a location-style field.
///
/// Falls back to `{ text: value, url: None }` when no rule applies.
pub fn extract_hyperlink(value: &str) -> Hyperlink {
    let value = strip_quotes(value);
    RULES
        .iter()
        .find_map(|rule| (rule.extract)(value))
        .unwrap_or_else(|| Hyperlink::new(value, None))
}

/// `=HYPERLINK("url","text")`, anchored to the whole value.
fn formula(value: &str) -> Option<Hyperlink> {
    let caps = FORMULA_RE.captures(value)?;
    Some(Hyperlink::new(&caps[2], Some(caps[1].to_string())))
}

fn bare_url(value: &str) -> Option<Hyperlink> {
    if !BARE_URL_RE.is_match(value) {
        return None;
    }
    Some(Hyperlink::new(value, Some(with_scheme(value))))
}

fn embedded_url(value: &str) -> Option<Hyperlink> {
    let m = EMBEDDED_URL_RE.find(value)?;
    Some(Hyperlink::new(value, Some(with_scheme(m.as_str()))))
}

/// `www.` hosts get `https://`; anything already carrying a scheme is left alone.
fn with_scheme(url: &str) -> String {
    let has_scheme = url
        .get(..4)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("http"));
    if has_scheme {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}
