//! End-to-end runs of the CLI entry point against temporary files.

use clap::Parser;
use tempfile::TempDir;

use crate::common;
use pdfweave::cli::{self, Cli};
use pdfweave::error::PdfWeaveError;

fn write_pdf(dir: &TempDir, name: &str, bytes: &[u8]) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).unwrap();
    path.to_string_lossy().into_owned()
}

#[tokio::test]
async fn test_merge_command_writes_output() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(&dir, "a.pdf", &common::text_pdf(&["a1", "a2"]));
    let b = write_pdf(&dir, "b.pdf", &common::text_pdf(&["b1"]));
    let out = dir.path().join("out.pdf");

    let cli = Cli::try_parse_from([
        "pdfweave",
        "merge",
        &a,
        &b,
        "-o",
        out.to_str().unwrap(),
        "-q",
    ])
    .unwrap();
    cli::run(cli).await.unwrap();

    let merged = std::fs::read(&out).unwrap();
    assert_eq!(common::page_count(&merged), 3);
    assert_eq!(common::page_text(&merged, 3), "b1");
}

#[tokio::test]
async fn test_merge_with_inline_commands() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(&dir, "a.pdf", &common::text_pdf(&["a1", "a2", "a3"]));
    let out = dir.path().join("out.pdf");

    let cli = Cli::try_parse_from([
        "pdfweave",
        "merge",
        &a,
        "-o",
        out.to_str().unwrap(),
        "--commands",
        "1:3,1",
        "-q",
    ])
    .unwrap();
    cli::run(cli).await.unwrap();

    let merged = std::fs::read(&out).unwrap();
    assert_eq!(common::page_count(&merged), 2);
    assert_eq!(common::page_text(&merged, 1), "a3");
    assert_eq!(common::page_text(&merged, 2), "a1");
}

#[tokio::test]
async fn test_merge_with_script_file_and_bookmarks() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(
        &dir,
        "a.pdf",
        &common::pdf_with_outline(&["a1", "a2"], &[(1, "Alpha", 1)]),
    );
    let script_path = dir.path().join("script.txt");
    std::fs::write(&script_path, "--keep-bookmarks\n1:all\n").unwrap();
    let out = dir.path().join("out.pdf");

    let cli = Cli::try_parse_from([
        "pdfweave",
        "merge",
        &a,
        "-o",
        out.to_str().unwrap(),
        "--script",
        script_path.to_str().unwrap(),
        "-q",
    ])
    .unwrap();
    cli::run(cli).await.unwrap();

    let merged = std::fs::read(&out).unwrap();
    let titles: Vec<String> = common::outline_of(&merged)
        .into_iter()
        .map(|(_, t, _)| t)
        .collect();
    assert_eq!(titles, vec!["File 1", "Alpha"]);
}

#[tokio::test]
async fn test_merge_refuses_to_overwrite_without_force() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(&dir, "a.pdf", &common::text_pdf(&["a1"]));
    let out = dir.path().join("out.pdf");
    std::fs::write(&out, b"existing").unwrap();

    let args = [
        "pdfweave",
        "merge",
        &a,
        "-o",
        out.to_str().unwrap(),
        "-q",
    ];
    let cli = Cli::try_parse_from(args).unwrap();
    let err = cli::run(cli).await.unwrap_err();
    assert!(matches!(err, PdfWeaveError::OutputExists { .. }));
    assert_eq!(err.exit_code(), 4);
    assert_eq!(std::fs::read(&out).unwrap(), b"existing");

    let mut forced: Vec<&str> = args.to_vec();
    forced.push("--force");
    let cli = Cli::try_parse_from(forced).unwrap();
    cli::run(cli).await.unwrap();
    assert_eq!(common::page_count(&std::fs::read(&out).unwrap()), 1);
}

#[tokio::test]
async fn test_merge_glob_pattern_expands_in_sorted_order() {
    let dir = TempDir::new().unwrap();
    write_pdf(&dir, "ch2.pdf", &common::text_pdf(&["two"]));
    write_pdf(&dir, "ch1.pdf", &common::text_pdf(&["one"]));
    let pattern = dir.path().join("ch*.pdf");
    let out = dir.path().join("out.pdf");

    let cli = Cli::try_parse_from([
        "pdfweave",
        "merge",
        pattern.to_str().unwrap(),
        "-o",
        out.to_str().unwrap(),
        "-q",
    ])
    .unwrap();
    cli::run(cli).await.unwrap();

    let merged = std::fs::read(&out).unwrap();
    assert_eq!(common::page_text(&merged, 1), "one");
    assert_eq!(common::page_text(&merged, 2), "two");
}

#[tokio::test]
async fn test_merge_no_matching_inputs() {
    let dir = TempDir::new().unwrap();
    let pattern = dir.path().join("missing*.pdf");
    let out = dir.path().join("out.pdf");

    let cli = Cli::try_parse_from([
        "pdfweave",
        "merge",
        pattern.to_str().unwrap(),
        "-o",
        out.to_str().unwrap(),
    ])
    .unwrap();
    let err = cli::run(cli).await.unwrap_err();
    assert!(matches!(err, PdfWeaveError::NoInputFiles));
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
async fn test_merge_rejects_encrypted_input() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(&dir, "a.pdf", &common::text_pdf(&["a1"]));
    let locked = write_pdf(&dir, "locked.pdf", &common::encrypted_pdf(b"pw"));
    let out = dir.path().join("out.pdf");

    let cli = Cli::try_parse_from([
        "pdfweave",
        "merge",
        &a,
        &locked,
        "-o",
        out.to_str().unwrap(),
        "-q",
    ])
    .unwrap();
    let err = cli::run(cli).await.unwrap_err();
    assert!(matches!(err, PdfWeaveError::EncryptedSource { position: 2 }));
    assert!(!out.exists());
}

#[tokio::test]
async fn test_analyze_command_runs() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(&dir, "a.pdf", &common::text_pdf(&["a1", "a2"]));

    let cli = Cli::try_parse_from(["pdfweave", "analyze", &a]).unwrap();
    cli::run(cli).await.unwrap();
}

#[tokio::test]
async fn test_analyze_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.pdf");

    let cli = Cli::try_parse_from(["pdfweave", "analyze", missing.to_str().unwrap()]).unwrap();
    let err = cli::run(cli).await.unwrap_err();
    assert!(matches!(err, PdfWeaveError::Io { .. }));
    assert_eq!(err.exit_code(), 5);
}
