//! tests/inject.rs — batteries d'intégration pour hdrguard-core
//!
//! On passe par le vrai système de fichiers (tempdir) : le header est posé
//! par le test (rôle du générateur), puis encadré en place par l'opération.

use std::fs;
use std::time::Duration;

use camino::Utf8PathBuf;
use indoc::indoc;
use pretty_assertions::assert_eq;

use hdrguard_core::{
    inject_file, is_wrapped, wrap, Error, InjectOptions, OnWrapped, Outcome, Settle, GUARD_CLOSE,
    GUARD_OPEN, GUARD_OVERHEAD,
};

// -----------------------------------------------------------------------------
// Helpers de test
// -----------------------------------------------------------------------------

const HEADER: &str = indoc! {r#"
    #ifndef ACCEL_MODES_H
    #define ACCEL_MODES_H

    struct ModesConstants {
        int is_init;
    };

    void update_constants(struct ModesConstants *mc);

    #endif
"#};

fn quick() -> InjectOptions {
    InjectOptions {
        settle: Some(Settle {
            poll: Duration::from_millis(5),
            quiet: Duration::from_millis(10),
            timeout: Duration::from_millis(500),
        }),
        grace: Duration::ZERO,
        ..InjectOptions::default()
    }
}

fn fixture(name: &str, content: &str) -> (tempfile::TempDir, Utf8PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = Utf8PathBuf::from_path_buf(dir.path().join(name)).unwrap();
    fs::write(&path, content).unwrap();
    (dir, path)
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[test]
fn wraps_in_place_exactly() {
    let (_dir, path) = fixture("accel_modes.h", HEADER);

    let out = inject_file(&path, &quick()).unwrap();

    assert_eq!(out, Outcome::Wrapped { bytes: HEADER.len() + GUARD_OVERHEAD });
    let got = fs::read_to_string(&path).unwrap();
    assert_eq!(got, format!("{GUARD_OPEN}{HEADER}{GUARD_CLOSE}"));
    assert_eq!(got.len(), HEADER.len() + GUARD_OVERHEAD);
}

#[test]
fn declaration_survives_between_guards() {
    let (_dir, path) = fixture("decl.h", "void foo();");

    inject_file(&path, &quick()).unwrap();

    let got = fs::read_to_string(&path).unwrap();
    assert!(got.contains("void foo();"));
    assert!(got.starts_with(GUARD_OPEN));
    assert!(got.ends_with(GUARD_CLOSE));
}

#[test]
fn empty_header_gets_bare_guard() {
    let (_dir, path) = fixture("empty.h", "");

    inject_file(&path, &quick()).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), format!("{GUARD_OPEN}{GUARD_CLOSE}"));
}

#[test]
fn second_run_skips_by_default() {
    let (_dir, path) = fixture("twice.h", HEADER);
    inject_file(&path, &quick()).unwrap();
    let first = fs::read_to_string(&path).unwrap();

    let out = inject_file(&path, &quick()).unwrap();

    assert_eq!(out, Outcome::Skipped);
    assert_eq!(fs::read_to_string(&path).unwrap(), first);
}

#[test]
fn strict_mode_fails_on_existing_guard() {
    let (_dir, path) = fixture("strict.h", HEADER);
    inject_file(&path, &quick()).unwrap();
    let before = fs::read_to_string(&path).unwrap();

    let opts = InjectOptions { on_wrapped: OnWrapped::Fail, ..quick() };
    match inject_file(&path, &opts) {
        Err(Error::AlreadyWrapped(p)) => assert_eq!(p, path),
        other => panic!("attendu AlreadyWrapped, reçu {other:?}"),
    }
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn force_mode_stacks_guards() {
    // Comportement historique : chaque passage ajoute une couche.
    let (_dir, path) = fixture("stack.h", HEADER);
    let opts = InjectOptions { on_wrapped: OnWrapped::Rewrap, ..quick() };

    inject_file(&path, &opts).unwrap();
    inject_file(&path, &opts).unwrap();

    let got = fs::read_to_string(&path).unwrap();
    assert_eq!(got, wrap(&wrap(HEADER)));
    assert_eq!(got.len(), HEADER.len() + 2 * GUARD_OVERHEAD);
}

#[test]
fn missing_header_is_not_found_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = Utf8PathBuf::from_path_buf(dir.path().join("absent.h")).unwrap();

    let opts = InjectOptions {
        settle: Some(Settle {
            poll: Duration::from_millis(5),
            quiet: Duration::from_millis(10),
            timeout: Duration::from_millis(50),
        }),
        ..quick()
    };
    match inject_file(&path, &opts) {
        Err(Error::NotFound(p)) => assert_eq!(p, path),
        other => panic!("attendu NotFound, reçu {other:?}"),
    }
    assert!(!path.exists());
}

#[test]
fn no_wait_reads_directly() {
    let (_dir, path) = fixture("direct.h", "int x;\n");

    let opts = InjectOptions { settle: None, ..quick() };
    inject_file(&path, &opts).unwrap();

    assert!(is_wrapped(&fs::read_to_string(&path).unwrap()));
}

#[test]
fn no_wait_missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = Utf8PathBuf::from_path_buf(dir.path().join("absent.h")).unwrap();

    let opts = InjectOptions { settle: None, ..quick() };
    assert!(matches!(inject_file(&path, &opts), Err(Error::NotFound(_))));
}

#[test]
fn explicit_out_leaves_source_untouched() {
    let (_dir, path) = fixture("src.h", HEADER);
    let out_path = path.with_file_name("wrapped.h");

    let opts = InjectOptions { out: Some(out_path.clone()), ..quick() };
    inject_file(&path, &opts).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), HEADER);
    assert_eq!(fs::read_to_string(&out_path).unwrap(), wrap(HEADER));
}
