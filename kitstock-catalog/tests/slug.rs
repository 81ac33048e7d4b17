use kitstock_catalog::slug::slugify;

#[test]
fn basic_name() {
    assert_eq!(slugify("Premier League", None), "premier-league");
}

#[test]
fn accents_folded() {
    assert_eq!(slugify("Colección Retro", None), "coleccion-retro");
    assert_eq!(slugify("América", None), "america");
}

#[test]
fn domain_suffix_appended() {
    assert_eq!(slugify("América", Some("-coleccion")), "america-coleccion");
    assert_eq!(slugify("Premier League", Some("-coleccion")), "premier-league-coleccion");
}

#[test]
fn special_characters_removed() {
    assert_eq!(slugify("Boca Juniors '81 (Home)", None), "boca-juniors-81-home");
}

#[test]
fn whitespace_and_hyphen_runs_collapse() {
    assert_eq!(slugify("Real   Madrid -- 2003-04", None), "real-madrid-2003-04");
}

#[test]
fn leading_and_trailing_hyphens_trimmed() {
    assert_eq!(slugify("- Retro -", None), "retro");
}

#[test]
fn deterministic_on_repeated_application() {
    let name = "Colección Água Ñandú";
    assert_eq!(slugify(name, None), slugify(name, None));
}

#[test]
fn output_alphabet_is_slug_safe() {
    for name in ["Colección Retro", "¡Vamos! México 98", "A_B\tC", "ZXZX"] {
        let slug = slugify(name, Some("-coleccion"));
        assert!(
            slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
            "unexpected character in slug {slug:?}"
        );
    }
}
