//! End-to-end translation: source text in, artifact bytes out.

use std::fs;

use neander_asm::{AsmError, ErrorKind, MemoryImage, assemble_source};

fn artifact(source: &str) -> Vec<u16> {
    assemble_source(source).expect("source should assemble").to_words()
}

#[test]
fn load_and_halt() {
    assert_eq!(artifact(".CODE\nLDA 0x0A\nHLT"), vec![0x4E03, 0x5244, 0x20, 0x0A, 0xF0]);
}

#[test]
fn data_cell_shifted_by_header() {
    let words = artifact(".DATA\n5 42\n.CODE\nSTA 5\nHLT");
    assert_eq!(&words[..5], &[0x4E03, 0x5244, 0x10, 5, 0xF0]);
    assert_eq!(words[5 + 2], 42);
    assert_eq!(words.len(), 8);
}

#[test]
fn every_mnemonic() {
    let source = "\
; every instruction once
.CODE
NOP
STA 0x80
LDA 0x81
ADD 0x82
OR  0x83
AND 0x84
NOT 0
JMP 2
JN  4
JZ  6
HLT
";
    let words = artifact(source);
    assert_eq!(
        &words[2..],
        &[
            0x00, 0x10, 0x80, 0x20, 0x81, 0x30, 0x82, 0x40, 0x83, 0x50, 0x84, 0x60, 0,
            0x80, 2, 0x90, 4, 0xA0, 6, 0xF0,
        ]
    );
}

#[test]
fn sum_program() {
    let source = "\
.DATA
128 3      ; a
129 4      ; b
.CODE
LDA 128
ADD 129
STA 130
HLT
";
    let image = assemble_source(source).unwrap();
    assert_eq!(image.max_address(), 129);
    assert_eq!(&image.live_window()[..7], &[0x20, 128, 0x30, 129, 0x10, 130, 0xF0]);
    assert_eq!(image.get(128), Some(3));
    assert_eq!(image.get(129), Some(4));
    assert_eq!(image.get(130), Some(0));
}

#[test]
fn unknown_mnemonic_reports_line() {
    let err = assemble_source(".CODE\nNOP\n; comment\nNOP\nXYZ\nHLT").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Semantic);
    assert_eq!(err.line(), Some(5));
    assert_eq!(err.to_string(), "line 5: unknown mnemonic 'XYZ'");
}

#[test]
fn grammar_errors_are_grammar_kind() {
    for source in [".DATA\nHLT 1", ".DATA\n1", "5 5", "LDA LDA"] {
        let err = assemble_source(source).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Grammar, "{}", source);
    }
}

#[test]
fn save_writes_artifact_file() {
    let dir = std::env::temp_dir().join(format!("neander-asm-test-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("bytecode.mem");

    let image = assemble_source(".CODE\nLDA 0x0A\nHLT").unwrap();
    assert_eq!(image.save(&path).unwrap(), 5);

    let bytes = fs::read(&path).unwrap();
    assert_eq!(bytes, vec![0x03, 0x4E, 0x44, 0x52, 0x20, 0, 0x0A, 0, 0xF0, 0]);
    assert_eq!(MemoryImage::from_artifact(&bytes).unwrap(), image);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn save_to_missing_directory_fails() {
    let path = std::env::temp_dir()
        .join(format!("neander-asm-missing-{}", std::process::id()))
        .join("nested")
        .join("bytecode.mem");
    let err = MemoryImage::new().save(&path).unwrap_err();
    assert!(matches!(err, AsmError::Emit { .. }));
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn demo_program_assembles() {
    let image = assemble_source(include_str!("../demos/sum.asm")).unwrap();
    assert_eq!(&image.live_window()[..7], &[0x20, 128, 0x30, 129, 0x10, 130, 0xF0]);
    assert_eq!(image.get(129), Some(4));
}
