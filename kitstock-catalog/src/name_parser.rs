//! Canonical entity names from raw storage filenames.
//!
//! Uploaded keys wrap the human-readable name in storage artifacts:
//! ```text
//! Valencia_1980-81_5_crxple       -> Valencia 1980-81
//! Premier_League_ZXZX_(1)        -> Premier League
//! Retro_Coleccio%CC%81n_1_ab12cd -> Retro
//! ```
//!
//! Canonicalization is an ordered rule chain: the first rule that matches
//! wins, and an input no rule matches passes through unmodified with a
//! logged warning — a bad name never fails the run. Rule order is data
//! ([`NameOptions::rules`]), not code, since cover and product paths need
//! different precedence.

use std::sync::OnceLock;

use regex::Regex;

/// A single canonicalization rule, tried in the order listed in
/// [`NameOptions::rules`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// Full `<name>[_<1-2 digit seq>]_<6-char code>` match: strip the
    /// trailing upload code and the optional sequence segment.
    DelimiterCode,
    /// Truncate at the configured uppercase marker segment (the literal
    /// token flagging cover assets).
    MarkerToken,
    /// Split at the first known keyword segment ("Collection"/"Colección",
    /// either language, accented or not) and keep the prefix.
    KeywordSplit,
    /// Loose trim: drop a trailing `" (N)"` index and trailing code-shaped
    /// segments without requiring a full grammar match.
    SuffixTrim,
}

/// Options controlling canonicalization for one extraction path.
#[derive(Debug, Clone)]
pub struct NameOptions {
    /// Rules to try, in order. The identity fallback always runs last.
    pub rules: Vec<RuleKind>,
    /// Marker segment flagging cover assets, matched case-insensitively as
    /// a whole `_`/space-delimited segment.
    pub marker: String,
    /// Keyword segments to split on, matched case-insensitively.
    pub keywords: Vec<String>,
    /// Title-case the result. Cover catalogs store title-cased names;
    /// product catalogs keep the filename's own casing.
    pub title_case: bool,
}

impl NameOptions {
    /// Options for cover-image name extraction (collections and capsules).
    ///
    /// Keyword and marker rules run before the code grammar so that a cover
    /// key like `Retro_Colección_1_ab12cd` yields "Retro" rather than
    /// "Retro Colección". Keyword comes first: names that carry both a
    /// keyword and the marker ("Premier League Collection ZXZX (1)") must
    /// lose both.
    pub fn cover() -> Self {
        Self {
            rules: vec![
                RuleKind::KeywordSplit,
                RuleKind::MarkerToken,
                RuleKind::DelimiterCode,
                RuleKind::SuffixTrim,
            ],
            marker: "ZXZX".to_string(),
            keywords: vec![
                "colección".to_string(),
                "coleccion".to_string(),
                "collection".to_string(),
            ],
            title_case: true,
        }
    }

    /// Options for multi-image product name extraction.
    pub fn product() -> Self {
        Self {
            rules: vec![
                RuleKind::DelimiterCode,
                RuleKind::MarkerToken,
                RuleKind::KeywordSplit,
                RuleKind::SuffixTrim,
            ],
            marker: "ZXZX".to_string(),
            keywords: vec![
                "colección".to_string(),
                "coleccion".to_string(),
                "collection".to_string(),
            ],
            title_case: false,
        }
    }
}

impl Default for NameOptions {
    fn default() -> Self {
        Self::product()
    }
}

/// Derive the canonical entity name from a filename stem (extension already
/// stripped).
///
/// Never fails: when no rule matches, the stem is kept as-is and a warning
/// is logged. Post-processing (separator replacement, whitespace collapse,
/// optional title-casing) applies to whichever rule fired.
pub fn canonical_name(stem: &str, options: &NameOptions) -> String {
    let decoded = decode_accent_escapes(stem);

    let base = options
        .rules
        .iter()
        .find_map(|rule| apply_rule(&decoded, *rule, options));

    let base = match base {
        Some(b) => b,
        None => {
            log::warn!("no naming rule matched {stem:?}; keeping it unmodified");
            decoded
        }
    };

    normalize(&base, options.title_case)
}

/// Extract the embedded sequence number from a filename stem: the 1–2 digit
/// segment immediately preceding the trailing 6-char upload code.
///
/// Images without a sequence number return `None` and must sort after all
/// numbered images.
pub fn sequence_number(stem: &str) -> Option<u32> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"_(\d{1,2})_[A-Za-z0-9]{6}$").unwrap());
    re.captures(stem)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

// ── Rules ───────────────────────────────────────────────────────────────────

fn apply_rule(stem: &str, rule: RuleKind, options: &NameOptions) -> Option<String> {
    match rule {
        RuleKind::DelimiterCode => match_delimiter_code(stem),
        RuleKind::MarkerToken => split_at_marker(stem, &options.marker),
        RuleKind::KeywordSplit => split_at_keyword(stem, &options.keywords),
        RuleKind::SuffixTrim => trim_suffix(stem),
    }
}

/// `<name>[_<1-2 digit seq>]_<6 alphanumeric>` — the upload grammar used by
/// bulk imports. The sequence segment is optional; both it and the code are
/// stripped.
fn match_delimiter_code(stem: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^(.+?)(?:_\d{1,2})?_[A-Za-z0-9]{6}$").unwrap());
    re.captures(stem).map(|c| c[1].to_string())
}

/// Truncate at the first whole segment equal to `marker` (case-insensitive).
/// Segments are delimited by `_` or spaces; both conventions appear in the
/// stored keys.
fn split_at_marker(stem: &str, marker: &str) -> Option<String> {
    let segments: Vec<&str> = stem.split(['_', ' ']).collect();
    let pos = segments
        .iter()
        .position(|s| s.eq_ignore_ascii_case(marker))?;
    if pos == 0 {
        return None;
    }
    Some(segments[..pos].join(" "))
}

/// Truncate at the first segment equal to any configured keyword
/// (case-insensitive, including non-ASCII accented forms).
fn split_at_keyword(stem: &str, keywords: &[String]) -> Option<String> {
    let segments: Vec<&str> = stem.split(['_', ' ']).collect();
    let pos = segments.iter().position(|s| {
        let lower = s.to_lowercase();
        keywords.iter().any(|k| lower == k.to_lowercase())
    })?;
    if pos == 0 {
        return None;
    }
    Some(segments[..pos].join(" "))
}

/// Loose application of the upload grammar: drop a trailing `" (N)"` index,
/// then a trailing exactly-6-alphanumeric segment, then an optional 1–2
/// digit segment before it. Matches only if something was actually trimmed.
fn trim_suffix(stem: &str) -> Option<String> {
    static PAREN: OnceLock<Regex> = OnceLock::new();
    let paren = PAREN.get_or_init(|| Regex::new(r"\s*\(\d+\)\s*$").unwrap());

    let stripped = paren.replace(stem, "").to_string();

    let mut segments: Vec<&str> = stripped.split('_').collect();
    if let Some(&last) = segments.last() {
        if last.len() == 6 && last.chars().all(|c| c.is_ascii_alphanumeric()) {
            segments.pop();
            if let Some(&prev) = segments.last() {
                if (1..=2).contains(&prev.len()) && prev.chars().all(|c| c.is_ascii_digit()) {
                    segments.pop();
                }
            }
        }
    }

    let trimmed = segments.join("_");
    if trimmed.is_empty() || trimmed == stem {
        None
    } else {
        Some(trimmed)
    }
}

// ── Post-processing ─────────────────────────────────────────────────────────

/// The one URL-escape artifact that survives in stored keys: a
/// percent-encoded combining acute accent following its base vowel.
const ACCENT_ESCAPES: &[(&str, &str)] = &[
    ("a%CC%81", "á"),
    ("e%CC%81", "é"),
    ("i%CC%81", "í"),
    ("o%CC%81", "ó"),
    ("u%CC%81", "ú"),
    ("A%CC%81", "Á"),
    ("E%CC%81", "É"),
    ("I%CC%81", "Í"),
    ("O%CC%81", "Ó"),
    ("U%CC%81", "Ú"),
];

fn decode_accent_escapes(stem: &str) -> String {
    if !stem.contains("%CC%81") && !stem.contains("%cc%81") {
        return stem.to_string();
    }
    let mut out = stem.replace("%cc%81", "%CC%81");
    for (escaped, decoded) in ACCENT_ESCAPES {
        out = out.replace(escaped, decoded);
    }
    out
}

/// Separator replacement, whitespace collapse, trim, optional title-casing.
fn normalize(name: &str, title_case: bool) -> String {
    let spaced = name.replace('_', " ");
    let collapsed = spaced.split_whitespace().collect::<Vec<_>>().join(" ");
    if title_case {
        title_case_words(&collapsed)
    } else {
        collapsed
    }
}

fn title_case_words(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(|c| c.to_lowercase()))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
