use std::collections::HashSet;
use std::path::PathBuf;

use kitstock_catalog::{CoverEntity, ProductEntity};
use kitstock_store::{
    append_covers, append_products, load_covers, load_exclusions, load_products,
};

fn cover(id: u32, name: &str, cover: &str) -> CoverEntity {
    CoverEntity {
        id,
        name: name.to_string(),
        slug: format!("{}-coleccion", name.to_lowercase().replace(' ', "-")),
        description: String::new(),
        cover: cover.to_string(),
    }
}

#[test]
fn fresh_cover_table_gets_header_and_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("collections.csv");

    append_covers(
        &path,
        &[
            cover(1, "Premier League", "https://cdn/pl.png"),
            cover(2, "La Liga", "https://cdn/ll.png"),
        ],
    )
    .unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some("id,Name,slug,description,cover"));
    assert_eq!(lines.clone().count(), 2);

    let state = load_covers(&path);
    assert_eq!(state.existing, 2);
    assert_eq!(state.next_id, 3);
    assert!(state.urls.contains("https://cdn/pl.png"));
}

#[test]
fn append_to_existing_table_writes_no_second_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("collections.csv");

    append_covers(&path, &[cover(1, "Premier League", "https://cdn/pl.png")]).unwrap();
    append_covers(&path, &[cover(2, "Serie A", "https://cdn/sa.png")]).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let header_count = content
        .lines()
        .filter(|l| l.starts_with("id,Name"))
        .count();
    assert_eq!(header_count, 1);

    let state = load_covers(&path);
    assert_eq!(state.existing, 2);
    assert_eq!(state.next_id, 3);
}

#[test]
fn appending_backs_up_the_existing_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("collections.csv");

    append_covers(&path, &[cover(1, "Premier League", "https://cdn/pl.png")]).unwrap();
    append_covers(&path, &[cover(2, "Serie A", "https://cdn/sa.png")]).unwrap();

    let backups: Vec<PathBuf> = std::fs::read_dir(dir.path().join("backups"))
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(backups.len(), 1);

    // The backup holds the pre-append state: header plus the first row only.
    let backup = std::fs::read_to_string(&backups[0]).unwrap();
    assert_eq!(backup.lines().count(), 2);
}

#[test]
fn missing_table_loads_empty_with_fresh_id_sequence() {
    let dir = tempfile::tempdir().unwrap();
    let state = load_covers(&dir.path().join("nope.csv"));
    assert_eq!(state.existing, 0);
    assert_eq!(state.next_id, 1);
    assert!(state.urls.is_empty());
}

#[test]
fn manual_edits_do_not_disturb_identity_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("collections.csv");

    append_covers(&path, &[cover(7, "Premier League", "https://cdn/pl.png")]).unwrap();

    // Operator fills in a description by hand.
    let content = std::fs::read_to_string(&path).unwrap();
    let edited = content.replace(
        "Premier League,premier-league-coleccion,,",
        "Premier League,premier-league-coleccion,English top flight,",
    );
    assert_ne!(content, edited);
    std::fs::write(&path, edited).unwrap();

    let state = load_covers(&path);
    assert_eq!(state.existing, 1);
    assert_eq!(state.next_id, 8);
    assert!(state.urls.contains("https://cdn/pl.png"));
}

#[test]
fn duplicate_identity_keys_collapse_to_one() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("collections.csv");
    std::fs::write(
        &path,
        "id,Name,slug,description,cover\n1,A,a,,https://cdn/x.png\n2,B,b,,https://cdn/x.png\n",
    )
    .unwrap();

    let state = load_covers(&path);
    assert_eq!(state.existing, 2);
    assert_eq!(state.urls.len(), 1);
    assert_eq!(state.next_id, 3);
}

#[test]
fn garbage_file_loads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("collections.csv");
    std::fs::write(&path, "this is not,a real\ntable").unwrap();

    let state = load_covers(&path);
    assert_eq!(state.existing, 0);
    assert!(state.urls.is_empty());
}

#[test]
fn product_images_round_trip_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("products.csv");

    let product = ProductEntity {
        id: "3e2c1a9a-0000-4000-8000-000000000001".to_string(),
        name: "Real Madrid 2003-04".to_string(),
        price: String::new(),
        description: String::new(),
        images: vec![
            "https://cdn/rm1.png".to_string(),
            "https://cdn/rm2.png".to_string(),
        ],
        collection_ids: String::new(),
        capsule_ids: String::new(),
    };
    append_products(&path, &[product]).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let record = reader.records().next().unwrap().unwrap();
    assert_eq!(record.get(1), Some("Real Madrid 2003-04"));

    let images: Vec<String> = serde_json::from_str(record.get(4).unwrap()).unwrap();
    assert_eq!(images, vec!["https://cdn/rm1.png", "https://cdn/rm2.png"]);

    let state = load_products(&path);
    assert_eq!(state.existing, 1);
    assert!(state.names.contains("Real Madrid 2003-04"));
}

#[test]
fn exclusion_list_trims_and_skips_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("delete.txt");
    std::fs::write(&path, "Valencia_1980-81_5_crxple\n\n  Colo-Colo_2006_6_cwa7mo  \n").unwrap();

    let list = load_exclusions(&path);
    let expected: HashSet<String> = ["Valencia_1980-81_5_crxple", "Colo-Colo_2006_6_cwa7mo"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(list, expected);
}

#[test]
fn missing_exclusion_list_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_exclusions(&dir.path().join("delete.txt")).is_empty());
}
