use super::*;
use crate::config::parse_delimiter;
use std::io::Write;
use std::path::PathBuf;

fn input_path() -> PathBuf {
    PathBuf::from("words.csv")
}

fn pairs(table: &Table) -> Vec<(String, String)> {
    table
        .records
        .iter()
        .map(|r| {
            (
                r.get("word").unwrap().to_string(),
                r.get("reading").unwrap().to_string(),
            )
        })
        .collect()
}

#[test]
fn test_parse_preserves_row_order() {
    let text = "word,reading\n犬,いぬ\n猫,ねこ\n鳥,とり\n";
    let table = parse_records(&input_path(), text, b',').unwrap();

    assert_eq!(table.len(), 3);
    assert_eq!(
        pairs(&table),
        vec![
            ("犬".to_string(), "いぬ".to_string()),
            ("猫".to_string(), "ねこ".to_string()),
            ("鳥".to_string(), "とり".to_string()),
        ]
    );
}

#[test]
fn test_header_lookup_by_name_not_position() {
    let text = "reading,meaning,word\nいぬ,dog,犬\n";
    let table = parse_records(&input_path(), text, b',').unwrap();

    let record = &table.records[0];
    assert_eq!(record.get("word"), Some("犬"));
    assert_eq!(record.get("reading"), Some("いぬ"));
    assert_eq!(record.get("meaning"), Some("dog"));
    assert_eq!(table.header.columns(), &["reading", "meaning", "word"]);
}

#[test]
fn test_values_stay_strings() {
    let text = "word,reading\n001,  2.50 \n";
    let table = parse_records(&input_path(), text, b',').unwrap();

    assert_eq!(table.records[0].get("word"), Some("001"));
    assert_eq!(table.records[0].get("reading"), Some("  2.50 "));
}

#[test]
fn test_quoted_fields_keep_delimiters() {
    let text = "word,reading\n\"a,b\",\"c\"\"d\"\n";
    let table = parse_records(&input_path(), text, b',').unwrap();

    assert_eq!(table.records[0].get("word"), Some("a,b"));
    assert_eq!(table.records[0].get("reading"), Some("c\"d"));
}

#[test]
fn test_tab_alias_matches_literal_tab() {
    let text = "word\treading\n犬\tいぬ\n猫\tねこ\n";

    let literal = parse_records(&input_path(), text, b'\t').unwrap();
    let named = parse_records(&input_path(), text, parse_delimiter("tab").unwrap()).unwrap();
    let escaped = parse_records(&input_path(), text, parse_delimiter("\\t").unwrap()).unwrap();

    assert_eq!(pairs(&literal), pairs(&named));
    assert_eq!(pairs(&literal), pairs(&escaped));
    assert_eq!(literal.len(), 2);
}

#[test]
fn test_header_only_yields_no_records() {
    let table = parse_records(&input_path(), "word,reading\n", b',').unwrap();
    assert!(table.is_empty());
    assert_eq!(table.header.len(), 2);
}

#[test]
fn test_empty_input_is_malformed() {
    let result = parse_records(&input_path(), "", b',');
    assert!(matches!(result, Err(DeckError::MalformedInput { .. })));
    assert!(result.unwrap_err().to_string().contains("missing header row"));
}

#[test]
fn test_short_row_has_no_trailing_value() {
    let text = "word,reading\n犬\n";
    let table = parse_records(&input_path(), text, b',').unwrap();

    let record = &table.records[0];
    assert_eq!(record.get("word"), Some("犬"));
    assert_eq!(record.get("reading"), None);

    let err = record.require("reading").unwrap_err();
    match err {
        DeckError::MissingColumn { column, line } => {
            assert_eq!(column, "reading");
            assert_eq!(line, Some(2));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_extra_cells_are_ignored() {
    let text = "word,reading\n犬,いぬ,extra,more\n";
    let table = parse_records(&input_path(), text, b',').unwrap();

    let record = &table.records[0];
    assert_eq!(record.get("word"), Some("犬"));
    assert_eq!(record.get("reading"), Some("いぬ"));
    assert_eq!(record.values().len(), 4);
    assert_eq!(pairs(&table), vec![("犬".to_string(), "いぬ".to_string())]);
}

#[test]
fn test_require_columns_reports_missing_header() {
    let table = parse_records(&input_path(), "word,kana\n犬,いぬ\n", b',').unwrap();

    assert!(table.require_columns(&["word"]).is_ok());
    let err = table.require_columns(&["word", "reading"]).unwrap_err();
    assert!(matches!(
        err,
        DeckError::MissingColumn { ref column, line: None } if column == "reading"
    ));
}

#[test]
fn test_duplicate_header_resolves_to_last() {
    let table = parse_records(&input_path(), "word,word\nfirst,second\n", b',').unwrap();
    assert_eq!(table.records[0].get("word"), Some("second"));
}

#[test]
fn test_record_lines_are_one_based() {
    let text = "word,reading\na,b\nc,d\n";
    let table = parse_records(&input_path(), text, b',').unwrap();
    assert_eq!(table.records[0].line, 2);
    assert_eq!(table.records[1].line, 3);
}

#[test]
fn test_read_missing_file() {
    let result = read_records(Path::new("definitely/not/here.csv"), &ReaderOptions::default());
    assert!(matches!(result, Err(DeckError::FileNotFound { .. })));
}

#[test]
fn test_read_strips_bom() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bom.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all("\u{feff}word,reading\n犬,いぬ\n".as_bytes())
        .unwrap();
    drop(file);

    let table = read_records(&path, &ReaderOptions::default()).unwrap();
    assert_eq!(table.header.columns()[0], "word");
    assert_eq!(table.records[0].get("word"), Some("犬"));
}

#[test]
fn test_read_rejects_invalid_utf8_when_strict() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("latin1.csv");
    std::fs::write(&path, b"word,reading\ncaf\xe9,kafe\n").unwrap();

    let strict = read_records(&path, &ReaderOptions::default());
    match strict {
        Err(DeckError::MalformedInput { line, .. }) => assert_eq!(line, 2),
        other => panic!("expected malformed input, got {other:?}"),
    }

    let lossy = read_records(
        &path,
        &ReaderOptions {
            delimiter: b',',
            encoding: TextEncoding::Utf8Lossy,
        },
    )
    .unwrap();
    assert_eq!(lossy.records[0].get("word"), Some("caf\u{fffd}"));
}
