//! Page / mode classification of the widget's host URL.
//!
//! The widget reports the page it is embedded in (`url` in the request
//! body). The page family and its deployment variant drive instruction
//! augmentation and message tagging further down the pipeline.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Page / mode tags
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Page {
    Goalsetter,
    Bbh,
    #[default]
    Unknown,
}

impl Page {
    pub fn is_unknown(&self) -> bool {
        *self == Page::Unknown
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Live,
    Temp,
    Review,
    Prod,
    #[default]
    Unknown,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Live => "live",
            Mode::Temp => "temp",
            Mode::Review => "review",
            Mode::Prod => "prod",
            Mode::Unknown => "unknown",
        }
    }

    /// Uppercase tag used at the head of synthesized intake messages
    /// (e.g. `REVIEW`).
    pub fn tag(&self) -> String {
        self.as_str().to_uppercase()
    }
}

/// Classification of the caller's origin page.
///
/// Exactly one of the `is_*` flags is set when `mode` is known; all are
/// false otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlContext {
    #[serde(default, skip_serializing_if = "Page::is_unknown")]
    pub page: Page,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub is_review: bool,
    #[serde(default)]
    pub is_temp: bool,
    #[serde(default)]
    pub is_live: bool,
    #[serde(default)]
    pub is_prod: bool,
}

impl UrlContext {
    pub fn new(page: Page, mode: Mode) -> Self {
        Self {
            page,
            mode,
            is_review: mode == Mode::Review,
            is_temp: mode == Mode::Temp,
            is_live: mode == Mode::Live,
            is_prod: mode == Mode::Prod,
        }
    }

    pub fn unknown() -> Self {
        Self::default()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Pattern table
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

// Order matters: first match wins, and each family lists its suffixed
// variants before the bare prod page.
const PAGE_PATTERNS: &[(Page, &[(Mode, &str)])] = &[
    (
        Page::Goalsetter,
        &[
            (Mode::Live, r"/clients/[^/]+/goalsetter_live\.html$"),
            (Mode::Temp, r"/clients/[^/]+/goalsetter_temp\.html$"),
            (Mode::Review, r"/clients/[^/]+/goalsetter_review\.html$"),
            (Mode::Prod, r"/clients/[^/]+/goalsetter\.html$"),
        ],
    ),
    (
        Page::Bbh,
        &[
            (Mode::Live, r"/clients/bbh/[^/]+_live\.html$"),
            (Mode::Temp, r"/clients/bbh/[^/]+_temp\.html$"),
            (Mode::Review, r"/clients/bbh/[^/]+_review\.html$"),
            (Mode::Prod, r"/clients/bbh/[^/]+\.html$"),
        ],
    ),
];

fn compiled_patterns() -> &'static [(Page, Mode, Regex)] {
    static TABLE: OnceLock<Vec<(Page, Mode, Regex)>> = OnceLock::new();
    TABLE.get_or_init(|| {
        PAGE_PATTERNS
            .iter()
            .flat_map(|(page, variants)| {
                variants.iter().map(move |(mode, pattern)| {
                    let re = Regex::new(pattern).expect("static URL pattern must compile");
                    (*page, *mode, re)
                })
            })
            .collect()
    })
}

/// Classify the widget's host URL into a page family and mode.
///
/// A missing or empty URL, or one that matches no pattern, yields
/// [`UrlContext::unknown`].
pub fn classify(url: Option<&str>) -> UrlContext {
    let url = match url {
        Some(u) if !u.is_empty() => u,
        _ => return UrlContext::unknown(),
    };

    compiled_patterns()
        .iter()
        .find(|(_, _, re)| re.is_match(url))
        .map(|(page, mode, _)| UrlContext::new(*page, *mode))
        .unwrap_or_else(UrlContext::unknown)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
