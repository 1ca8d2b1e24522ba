//! CLI unit tests

use crate::commands;

#[test]
fn test_format_amount_uses_comma_decimal() {
    assert_eq!(commands::format_amount(-24.9), "R$ 24,90");
    assert_eq!(commands::format_amount(1200.0), "R$ 1200,00");
    assert_eq!(commands::format_amount(0.0), "R$ 0,00");
}

#[test]
fn test_resolve_db_path_prefers_explicit_flag() {
    let explicit = std::path::Path::new("/tmp/custom-fluxo.db");
    let resolved = commands::resolve_db_path(Some(explicit)).unwrap();
    assert_eq!(resolved, explicit);
}

#[test]
fn test_init_creates_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("fluxo.db");

    commands::cmd_init(&db).unwrap();
    assert!(db.exists());
}

#[test]
fn test_seed_refuses_non_empty_account() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("fluxo.db");

    commands::cmd_seed(&db, "u1").unwrap();
    let err = commands::cmd_seed(&db, "u1").unwrap_err();
    assert!(err.to_string().contains("already has"));

    // A different account on the same database is still empty.
    commands::cmd_seed(&db, "u2").unwrap();
}
