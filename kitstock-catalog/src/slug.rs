//! URL-safe slugs from canonical names.
//!
//! `slugify` is pure and deterministic; its output alphabet is exactly
//! `[a-z0-9-]`. An optional domain suffix (e.g. `-coleccion`) disambiguates
//! slugs across entity kinds that share a URL namespace.

/// Derive a URL-safe slug from a canonical name.
///
/// Steps: fold diacritics to ASCII, lowercase, drop everything outside
/// `[a-z0-9\s-]`, collapse whitespace runs to single hyphens, collapse
/// repeated hyphens, trim hyphens, then append `suffix` (if any) and
/// re-apply the hyphen cleanup so the invariant holds for any suffix.
pub fn slugify(name: &str, suffix: Option<&str>) -> String {
    let mut slug = clean(name);
    if let Some(suffix) = suffix {
        slug.push(' ');
        slug.push_str(suffix);
        slug = clean(&slug);
    }
    slug
}

fn clean(input: &str) -> String {
    let folded: String = input
        .to_lowercase()
        .chars()
        .map(fold_ascii)
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || *c == '-')
        .collect();

    // Whitespace runs become single hyphens; existing hyphens survive, so a
    // second collapse pass removes any doubling that introduces.
    let hyphenated = folded.split_whitespace().collect::<Vec<_>>().join("-");

    let mut out = String::with_capacity(hyphenated.len());
    for c in hyphenated.chars() {
        if c == '-' && out.ends_with('-') {
            continue;
        }
        out.push(c);
    }
    out.trim_matches('-').to_string()
}

/// Fold the Latin diacritics that occur in the catalogs' two naming
/// languages down to ASCII. Anything unlisted passes through (and is then
/// dropped by the alphabet filter unless already slug-safe).
fn fold_ascii(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' | 'ã' | 'å' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        _ => c,
    }
}
