//! Page content analysis
//!
//! Turns a fetched HTML document into clean text:
//! 1. Strip scripts, styles and site chrome (navigation, headers, footers,
//!    cookie banners, ads, popups)
//! 2. Pick a title: `<title>`, then the first `<h1>`, then the URL
//! 3. Reject login and error pages by their content
//! 4. Take the text of the main content region, falling back to `<body>`

use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Elements removed before any text is read
const STRIP_SELECTORS: &[&str] = &[
    "script",
    "style",
    "noscript",
    "template",
    "nav",
    "header",
    "footer",
    "iframe",
    "svg",
    ".sidebar",
    "#sidebar",
    ".menu",
    ".nav",
    ".navigation",
    ".breadcrumb",
    ".breadcrumbs",
    ".cookie-banner",
    ".cookie-consent",
    ".cookie",
    "#cookie-banner",
    ".ad",
    ".ads",
    ".advertisement",
    ".popup",
    ".modal",
    "[role=navigation]",
    "[role=banner]",
    "[role=contentinfo]",
];

/// Main content regions, in order of preference
const MAIN_CONTENT_SELECTORS: &[&str] = &[
    "main",
    "article",
    "[role=\"main\"]",
    ".content",
    ".main-content",
    "#content",
    "#main",
];

/// Title phrases marking a login, registration or password page
const LOGIN_TITLE_PHRASES: &[&str] = &[
    "login",
    "log in",
    "logon",
    "sign in",
    "signin",
    "sign up",
    "signup",
    "register",
    "create account",
    "forgot password",
    "reset password",
    "authentication required",
];

/// Form text marking a password form as a login form
const LOGIN_FORM_HINTS: &[&str] = &["login", "log in", "sign in", "signin", "email", "username"];

/// Title phrases marking an error page
const ERROR_TITLE_PHRASES: &[&str] = &[
    "404",
    "500",
    "502",
    "503",
    "page not found",
    "not found",
    "internal server error",
    "access denied",
    "forbidden",
    "unauthorized",
    "service unavailable",
    "bad gateway",
];

/// Body phrases marking an error page, when the page is also short
const ERROR_BODY_PHRASES: &[&str] = &[
    "page not found",
    "404 not found",
    "page you requested",
    "page you are looking for",
    "does not exist",
    "no longer available",
    "internal server error",
    "access denied",
    "something went wrong",
];

/// Body text shorter than this (characters) is eligible for the error-phrase check
const ERROR_BODY_MAX_CHARS: usize = 200;

/// Which content-based filters are active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentRules {
    pub filter_login_pages: bool,
    pub filter_error_pages: bool,
}

/// Title and text extracted from a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedContent {
    pub title: String,
    pub text: String,
}

/// Result of analyzing a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentVerdict {
    /// Page is worth keeping
    Keep(ExtractedContent),
    /// Page looks like a login or registration page
    LoginPage,
    /// Page looks like an error page
    ErrorPage,
}

/// Analyzes an HTML document
///
/// # Arguments
///
/// * `html` - The raw HTML document
/// * `url` - The page URL, used as the title of last resort
/// * `rules` - Which content filters apply
pub fn analyze(html: &str, url: &Url, rules: ContentRules) -> ContentVerdict {
    let mut document = Html::parse_document(html);
    strip_chrome(&mut document);

    let title = extract_title(&document).unwrap_or_else(|| url.to_string());

    if rules.filter_login_pages && (contains_phrase(&title, LOGIN_TITLE_PHRASES) || has_login_form(&document)) {
        return ContentVerdict::LoginPage;
    }

    if rules.filter_error_pages && looks_like_error(&document, &title) {
        return ContentVerdict::ErrorPage;
    }

    ContentVerdict::Keep(ExtractedContent {
        title,
        text: main_text(&document),
    })
}

/// Detaches every element matching [`STRIP_SELECTORS`]
fn strip_chrome(document: &mut Html) {
    let Ok(selector) = Selector::parse(&STRIP_SELECTORS.join(", ")) else {
        return;
    };

    let ids: Vec<_> = document.select(&selector).map(|element| element.id()).collect();
    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

fn extract_title(document: &Html) -> Option<String> {
    ["title", "h1"].iter().find_map(|tag| {
        let selector = Selector::parse(tag).ok()?;
        document
            .select(&selector)
            .next()
            .map(element_text)
            .filter(|text| !text.is_empty())
    })
}

/// A password input inside a form whose text mentions logging in
fn has_login_form(document: &Html) -> bool {
    let (Ok(form_selector), Ok(password_selector), Ok(field_selector)) = (
        Selector::parse("form"),
        Selector::parse("input[type=password]"),
        Selector::parse("input, button, label"),
    ) else {
        return false;
    };

    document.select(&form_selector).any(|form| {
        if form.select(&password_selector).next().is_none() {
            return false;
        }

        let mut form_text = element_text(form);
        for field in form.select(&field_selector) {
            for attr in ["name", "id", "placeholder", "aria-label", "value", "type"] {
                if let Some(value) = field.value().attr(attr) {
                    form_text.push(' ');
                    form_text.push_str(value);
                }
            }
        }

        let form_text = form_text.to_lowercase();
        LOGIN_FORM_HINTS.iter().any(|hint| form_text.contains(hint))
    })
}

fn looks_like_error(document: &Html, title: &str) -> bool {
    if contains_phrase(title, ERROR_TITLE_PHRASES) {
        return true;
    }

    let body = body_text(document);
    body.chars().count() < ERROR_BODY_MAX_CHARS && contains_phrase(&body, ERROR_BODY_PHRASES)
}

/// Text of the first non-empty main content region, else of the body
fn main_text(document: &Html) -> String {
    MAIN_CONTENT_SELECTORS
        .iter()
        .filter_map(|css| Selector::parse(css).ok())
        .find_map(|selector| {
            document
                .select(&selector)
                .map(element_text)
                .find(|text| !text.is_empty())
        })
        .unwrap_or_else(|| body_text(document))
}

fn body_text(document: &Html) -> String {
    Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next().map(element_text))
        .unwrap_or_else(|| element_text(document.root_element()))
}

/// All text under an element, whitespace collapsed
fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

/// Collapses runs of whitespace to single spaces and trims
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whole-word, case-insensitive phrase match
fn contains_phrase(text: &str, phrases: &[&str]) -> bool {
    let words: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    let haystack = format!(" {} ", collapse_whitespace(&words));

    phrases
        .iter()
        .any(|phrase| haystack.contains(&format!(" {} ", phrase)))
}
