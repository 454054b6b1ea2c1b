use std::fs;
use std::path::Path;

use assert_cmd::Command;
use lopdf::{dictionary, Document, Object, Stream};
use predicates::prelude::*;

fn write_pdf(path: &Path, pages: usize, title: &str, author: &str) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let kids: Vec<Object> = (0..pages)
        .map(|_| {
            let content_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            })
            .into()
        })
        .collect();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(title),
        "Author" => Object::string_literal(author),
    });
    doc.trailer.set("Info", info_id);

    doc.save(path).unwrap();
}

fn shelfmark(config_home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("shelfmark").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home).env("HOME", config_home);
    cmd
}

fn library() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let books = dir.path().join("books");
    fs::create_dir_all(books.join("shelf")).unwrap();

    write_pdf(&books.join("shelf").join("good.pdf"), 3, "The Silent Shore", "Ann Vale");
    fs::write(books.join("Broken.PDF"), b"not a pdf at all").unwrap();
    fs::write(books.join("notes.txt"), b"ignored").unwrap();
    dir
}

#[test]
fn test_catalog_writes_unknown_row_for_corrupt_pdf() {
    let dir = library();
    let output = dir.path().join("out").join("catalog.csv");

    shelfmark(dir.path())
        .arg("catalog")
        .arg(dir.path().join("books"))
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Unreadable files:"))
        .stdout(predicate::str::contains("Broken.PDF"));

    let mut reader = csv::Reader::from_path(&output).unwrap();
    let header: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(header[0], "Book Title");
    assert_eq!(header[8], "Source File");

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);

    assert_eq!(&rows[0][0], "Unknown");
    assert_eq!(&rows[0][6], "Unknown");
    assert_eq!(&rows[0][7], "PDF");
    assert!(rows[0][8].ends_with("Broken.PDF"));

    assert_eq!(&rows[1][0], "The Silent Shore");
    assert_eq!(&rows[1][1], "Ann Vale");
    assert_eq!(&rows[1][6], "3");
    assert!(rows[1][8].ends_with("good.pdf"));
}

#[test]
fn test_catalog_json_skips_unreadable() {
    let dir = library();
    let output = dir.path().join("catalog.json");

    shelfmark(dir.path())
        .args(["catalog", "--format", "json", "--skip-unreadable", "--output"])
        .arg(&output)
        .arg(dir.path().join("books"))
        .assert()
        .success();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(json["records"].as_array().unwrap().len(), 1);
    assert_eq!(json["records"][0]["title"], "The Silent Shore");
    assert_eq!(json["records"][0]["year"], "Unknown");
    assert_eq!(json["skipped"].as_array().unwrap().len(), 1);
    assert!(json["generated_at"].is_string());
}

#[test]
fn test_catalog_empty_directory_fails() {
    let dir = tempfile::tempdir().unwrap();

    shelfmark(dir.path())
        .arg("catalog")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No PDF files found"));
}

#[test]
fn test_config_set_then_get() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("custom.json");

    shelfmark(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "batch.on_unreadable", "skip"])
        .assert()
        .success();

    shelfmark(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "batch.on_unreadable"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"skip\""));

    shelfmark(dir.path())
        .args(["config", "get", "acquisition.max_pages"])
        .assert()
        .success()
        .stdout(predicate::str::contains("8"));
}

#[test]
fn test_inspect_json() {
    let dir = library();

    shelfmark(dir.path())
        .args(["inspect", "--format", "json"])
        .arg(dir.path().join("books").join("shelf").join("good.pdf"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"metadata_title\""))
        .stdout(predicate::str::contains("\"Ann Vale\""));
}
