use super::*;

#[test]
fn test_parse_skips_blanks_and_comments() {
    let text = "# header\n\na1\n  D4   swap-pieces  \nb2 f6 # trailing comment\n   \n";
    let openings = parse_openings(text);

    assert_eq!(openings.len(), 3);
    assert_eq!(openings[0].moves, ["a1"]);
    assert_eq!(openings[1].moves, ["d4", "swap-pieces"]);
    assert_eq!(openings[2].moves, ["b2", "f6"]);
}

#[test]
fn test_display() {
    let opening = Opening::parse("c3 swap-pieces").unwrap();
    assert_eq!(opening.to_string(), "c3 swap-pieces");
}

#[test]
fn test_load_openings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("openings.txt");
    std::fs::write(&path, "a1\nb2\n").unwrap();

    let openings = load_openings(&path).unwrap();
    assert_eq!(openings.len(), 2);
}

#[test]
fn test_load_rejects_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.txt");
    std::fs::write(&path, "# nothing here\n\n").unwrap();

    assert!(matches!(load_openings(&path), Err(OpeningsError::Empty(_))));
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.txt");

    assert!(matches!(load_openings(&path), Err(OpeningsError::Read { .. })));
}
