use std::fs::File;
use std::io::{self, Cursor, Write};

use cooklang_parser::{
    parse_file, parse_reader, parse_str, ErrorKind, ParseError, ParserConfig, RecipeParser,
};
use tempfile::NamedTempFile;

const RECIPE: &str = ">> servings: 2\nPeel @potatoes{4%large} and boil in a #pot{} for ~{20%minutes}.\n";

fn recipe_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_every_source_gives_the_same_recipe() {
    let expected = parse_str(RECIPE).unwrap();
    let file = recipe_file(RECIPE);

    assert_eq!(parse_file(file.path()).unwrap(), expected);
    assert_eq!(
        RecipeParser::builder()
            .file(File::open(file.path()).unwrap())
            .parse()
            .unwrap(),
        expected
    );
    assert_eq!(parse_reader(Cursor::new(RECIPE.as_bytes().to_vec())).unwrap(), expected);
}

#[test]
fn test_callback_one_byte_at_a_time() {
    let mut remaining = RECIPE.as_bytes().to_vec();
    remaining.reverse();

    let recipe = RecipeParser::builder()
        .callback(move |buf: &mut [u8]| match remaining.pop() {
            Some(byte) => {
                buf[0] = byte;
                Ok(1)
            }
            None => Ok(0),
        })
        .parse()
        .unwrap();

    assert_eq!(recipe, parse_str(RECIPE).unwrap());
}

#[test]
fn test_tiny_chunks_split_multibyte_characters() {
    let source = ">> titre: Pâte à crêpes 🥞\nMélanger la @farine{250%g}.";
    let config = ParserConfig {
        read_chunk_size: 1,
        initial_capacity: 0,
    };

    let recipe = RecipeParser::builder()
        .text(source)
        .config(config)
        .parse()
        .unwrap();

    assert_eq!(recipe, parse_str(source).unwrap());
    assert_eq!(recipe.metadata_value("titre"), Some("Pâte à crêpes 🥞"));
}

#[test]
fn test_callback_failure() {
    let mut calls = 0;
    let err = RecipeParser::builder()
        .callback(move |buf: &mut [u8]| {
            calls += 1;
            if calls > 1 {
                return Err(io::Error::new(io::ErrorKind::Other, "disk on fire"));
            }
            buf[..5].copy_from_slice(b"Stir ");
            Ok(5)
        })
        .config(ParserConfig {
            read_chunk_size: 8,
            initial_capacity: 0,
        })
        .parse()
        .unwrap_err();

    match err {
        ParseError::Io { offset, source } => {
            assert_eq!(offset, 5);
            assert_eq!(source.to_string(), "disk on fire");
        }
        other => panic!("expected io error, got {:?}", other),
    }
}

#[test]
fn test_byte_order_mark_is_skipped() {
    let file = recipe_file("\u{feff}>> servings: 3\n");
    let recipe = parse_file(file.path()).unwrap();

    assert_eq!(recipe.metadata[0].identifier, "servings");
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = parse_file(dir.path().join("absent.cook")).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Reader);
}

#[test]
fn test_second_source_is_a_usage_error() {
    let err = RecipeParser::builder()
        .text("Stir.")
        .reader(Cursor::new(Vec::new()))
        .build()
        .err()
        .unwrap();

    assert_eq!(err.kind(), ErrorKind::Usage);
    assert_eq!(err.to_string(), "Usage error: input source already set");
}

#[test]
fn test_builder_without_source() {
    let err = RecipeParser::builder().parse().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Usage);
}
