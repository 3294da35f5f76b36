// Units of work and file-backed databases

mod common;

use catalog_core::Category;
use catalog_core_types::RequestContext;
use catalog_store::{init_db, DbConfig, DbTarget, ProductRepo};
use common::{new_db, product};
use std::collections::HashMap;
use tempfile::TempDir;

#[test]
fn test_committed_session_is_visible() {
    let mut db = new_db();

    let session = db.session(RequestContext::new()).unwrap();
    let mut hat = product("Hat", 1500, true, Category::Cloths);
    let id = ProductRepo::create(&session, &mut hat).unwrap();
    session.commit().unwrap();

    assert_eq!(ProductRepo::find(db.connection(), id).unwrap(), Some(hat));
}

#[test]
fn test_rolled_back_session_leaves_no_rows() {
    let mut db = new_db();

    let session = db.session(RequestContext::new().with_origin("test")).unwrap();
    ProductRepo::create(&session, &mut product("Hat", 1500, true, Category::Cloths)).unwrap();
    ProductRepo::create(&session, &mut product("Cap", 900, true, Category::Cloths)).unwrap();
    assert_eq!(ProductRepo::all(&session).unwrap().len(), 2);
    session.rollback().unwrap();

    assert!(ProductRepo::all(db.connection()).unwrap().is_empty());
}

#[test]
fn test_dropped_session_rolls_back() {
    let mut db = new_db();
    {
        let session = db.session(RequestContext::new()).unwrap();
        ProductRepo::create(&session, &mut product("Hat", 1500, true, Category::Cloths)).unwrap();
    }
    assert!(ProductRepo::all(db.connection()).unwrap().is_empty());
}

#[test]
fn test_remove_all_between_units_of_work() {
    let mut db = new_db();

    let session = db.session(RequestContext::new()).unwrap();
    for name in ["A", "B", "C"] {
        ProductRepo::create(&session, &mut product(name, 100, true, Category::Unknown)).unwrap();
    }
    session.commit().unwrap();

    let session = db.session(RequestContext::new()).unwrap();
    assert_eq!(ProductRepo::remove_all(&session).unwrap(), 3);
    session.commit().unwrap();

    assert!(ProductRepo::all(db.connection()).unwrap().is_empty());
}

#[test]
fn test_file_database_persists_across_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("catalog.db");
    let config = DbConfig::new(format!("sqlite://{}", path.display()));

    let db = init_db(&config).unwrap();
    assert_eq!(db.target(), &DbTarget::File(path.clone()));
    let mut saw = product("Saw", 2599, true, Category::Tools);
    let id = ProductRepo::create(db.connection(), &mut saw).unwrap();
    db.close().unwrap();

    assert!(path.exists());

    let db = init_db(&config).unwrap();
    let found = ProductRepo::find(db.connection(), id).unwrap();
    assert_eq!(found, Some(saw));
}

#[test]
fn test_config_from_vars_drives_init() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("env.db");

    let mut vars = HashMap::new();
    vars.insert("DATABASE_URI".to_string(), path.display().to_string());
    let config = DbConfig::from_vars(vars).unwrap();

    let db = init_db(&config).unwrap();
    assert!(!db.is_in_memory());
    assert!(ProductRepo::all(db.connection()).unwrap().is_empty());
}

#[test]
fn test_in_memory_databases_are_private() {
    let first = new_db();
    let second = new_db();

    ProductRepo::create(first.connection(), &mut product("Hat", 100, true, Category::Cloths))
        .unwrap();

    assert_eq!(ProductRepo::all(first.connection()).unwrap().len(), 1);
    assert!(ProductRepo::all(second.connection()).unwrap().is_empty());
}
