use bookstore_core::db::open_db_in_memory;
use bookstore_core::{
    BookPatch, BookRecord, CatalogRepository, CollectionName, DeleteOutcome, InsertOutcome,
    NewBook, RepoError, SqliteCatalogRepository, UpdateOutcome,
};

fn repo() -> SqliteCatalogRepository {
    let conn = open_db_in_memory().expect("in-memory store should open");
    SqliteCatalogRepository::try_new(conn, CollectionName::default())
        .expect("collection bootstrap should succeed")
}

fn vortex() -> NewBook {
    NewBook::new(
        "example1",
        "The Vortex",
        "José Eustasio Rivera",
        "958-30-0804-4",
        "292",
        "1924",
    )
}

#[test]
fn find_all_on_empty_collection_returns_empty() {
    let repo = repo();
    assert!(repo.find_all().unwrap().is_empty());
    assert_eq!(repo.count().unwrap(), 0);
}

#[test]
fn insert_and_find_by_business_id_roundtrip() {
    let repo = repo();
    let key = repo.insert(&vortex()).unwrap();

    let loaded = repo.find_by_business_id("example1").unwrap().unwrap();
    assert_eq!(loaded.storage_key, key);
    assert_eq!(loaded.title, "The Vortex");
    assert_eq!(loaded.author, "José Eustasio Rivera");
    assert_eq!(loaded.edition, "958-30-0804-4");
    assert_eq!(loaded.pages, "292");
    assert_eq!(loaded.year, "1924");
}

#[test]
fn find_by_business_id_absent_is_none() {
    let repo = repo();
    repo.insert(&vortex()).unwrap();
    assert!(repo.find_by_business_id("missing").unwrap().is_none());
}

#[test]
fn find_all_preserves_insertion_order_and_projection_shape() {
    let repo = repo();
    repo.insert(&vortex()).unwrap();
    repo.insert(&NewBook::new("b2", "Second", "Someone", "", "10", "2001"))
        .unwrap();

    let all = repo.find_all().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, "example1");
    assert_eq!(all[1].id, "b2");
    assert_eq!(all[1].edition, "");
}

#[test]
fn insert_if_unique_rejects_composite_duplicate() {
    let repo = repo();
    assert!(matches!(
        repo.insert_if_unique(&vortex()).unwrap(),
        InsertOutcome::Inserted(_)
    ));
    assert_eq!(
        repo.insert_if_unique(&vortex()).unwrap(),
        InsertOutcome::Conflict
    );
    assert_eq!(repo.count().unwrap(), 1);
}

#[test]
fn insert_if_unique_uses_all_five_fields() {
    let repo = repo();
    repo.insert_if_unique(&vortex()).unwrap();

    let mut same_id_other_title = vortex();
    same_id_other_title.title = "La Vorágine".to_string();
    assert!(matches!(
        repo.insert_if_unique(&same_id_other_title).unwrap(),
        InsertOutcome::Inserted(_)
    ));

    let mut other_edition_only = vortex();
    other_edition_only.edition = "second".to_string();
    assert_eq!(
        repo.insert_if_unique(&other_edition_only).unwrap(),
        InsertOutcome::Conflict
    );

    assert_eq!(repo.count().unwrap(), 2);
}

#[test]
fn find_matching_returns_every_composite_match() {
    let repo = repo();
    repo.insert(&vortex()).unwrap();
    repo.insert(&vortex()).unwrap();
    repo.insert(&NewBook::new("example1", "Other", "", "", "", ""))
        .unwrap();

    assert_eq!(repo.find_matching(&vortex()).unwrap().len(), 2);
}

#[test]
fn find_matching_agrees_with_record_composite_match() {
    let repo = repo();
    let mut stored = vec![vortex()];
    for field in 0..5 {
        let mut variant = vortex();
        match field {
            0 => variant.business_id = "example9".to_string(),
            1 => variant.title = "La Vorágine".to_string(),
            2 => variant.author = "J. E. Rivera".to_string(),
            3 => variant.pages = "300".to_string(),
            _ => variant.year = "1925".to_string(),
        }
        stored.push(variant);
    }
    let mut edition_only = vortex();
    edition_only.edition = "second".to_string();
    stored.push(edition_only);
    for book in &stored {
        repo.insert(book).expect("insert should succeed");
    }

    let mut records: Vec<BookRecord> = Vec::new();
    for book in &stored {
        for record in repo.find_matching(book).expect("lookup should succeed") {
            if !records.iter().any(|r| r.storage_key == record.storage_key) {
                records.push(record);
            }
        }
    }
    assert_eq!(records.len(), stored.len());

    for candidate in &stored {
        let mut expected: Vec<_> = records
            .iter()
            .filter(|record| record.matches(candidate))
            .map(|record| record.storage_key)
            .collect();
        let mut actual: Vec<_> = repo
            .find_matching(candidate)
            .expect("lookup should succeed")
            .into_iter()
            .map(|record| record.storage_key)
            .collect();
        expected.sort();
        actual.sort();
        assert_eq!(actual, expected, "candidate {candidate:?}");
    }
}

#[test]
fn update_fields_changes_only_given_fields() {
    let repo = repo();
    repo.insert(&vortex()).unwrap();

    let patch = BookPatch {
        year: Some("1925".to_string()),
        title: Some(String::new()),
        ..BookPatch::default()
    };
    let outcome = repo
        .update_fields("example1", &patch.effective_fields())
        .unwrap();
    assert_eq!(outcome, UpdateOutcome::Updated);

    let loaded = repo.find_by_business_id("example1").unwrap().unwrap();
    assert_eq!(loaded.year, "1925");
    assert_eq!(loaded.title, "The Vortex");
    assert_eq!(loaded.author, "José Eustasio Rivera");
    assert_eq!(loaded.pages, "292");
    assert_eq!(loaded.edition, "958-30-0804-4");
}

#[test]
fn update_fields_with_unchanged_values_still_reports_updated() {
    let repo = repo();
    repo.insert(&vortex()).unwrap();

    let patch = BookPatch {
        year: Some("1924".to_string()),
        ..BookPatch::default()
    };
    assert_eq!(
        repo.update_fields("example1", &patch.effective_fields())
            .unwrap(),
        UpdateOutcome::Updated
    );
}

#[test]
fn update_fields_missing_target_is_no_match() {
    let repo = repo();
    let patch = BookPatch {
        author: Some("Nobody".to_string()),
        ..BookPatch::default()
    };
    assert_eq!(
        repo.update_fields("does-not-exist", &patch.effective_fields())
            .unwrap(),
        UpdateOutcome::NoMatch
    );
}

#[test]
fn update_fields_rejects_empty_field_set_without_touching_storage() {
    let repo = repo();
    repo.insert(&vortex()).unwrap();

    let err = repo
        .update_fields("example1", &BookPatch::default().effective_fields())
        .unwrap_err();
    assert!(matches!(err, RepoError::EmptyUpdate));
    assert_eq!(
        repo.find_by_business_id("example1").unwrap().unwrap().year,
        "1924"
    );
}

#[test]
fn update_fields_touches_only_first_record_with_shared_id() {
    let repo = repo();
    repo.insert(&vortex()).unwrap();
    let mut twin = vortex();
    twin.title = "Twin".to_string();
    repo.insert(&twin).unwrap();

    let patch = BookPatch {
        pages: Some("300".to_string()),
        ..BookPatch::default()
    };
    repo.update_fields("example1", &patch.effective_fields())
        .unwrap();

    let all = repo.find_all().unwrap();
    assert_eq!(all[0].pages, "300");
    assert_eq!(all[1].pages, "292");
}

#[test]
fn delete_by_business_id_removes_one_record() {
    let repo = repo();
    repo.insert(&vortex()).unwrap();
    repo.insert(&vortex()).unwrap();

    assert_eq!(
        repo.delete_by_business_id("example1").unwrap(),
        DeleteOutcome::Deleted
    );
    assert_eq!(repo.count().unwrap(), 1);
}

#[test]
fn delete_missing_target_is_no_match() {
    let repo = repo();
    repo.insert(&vortex()).unwrap();

    assert_eq!(
        repo.delete_by_business_id("does-not-exist").unwrap(),
        DeleteOutcome::NoMatch
    );
    assert_eq!(repo.count().unwrap(), 1);
}

#[test]
fn numeric_looking_fields_are_stored_verbatim() {
    let repo = repo();
    repo.insert(&NewBook::new("odd", "Odd", "A", "", "0292", "circa 1900"))
        .unwrap();

    let loaded = repo.find_by_business_id("odd").unwrap().unwrap();
    assert_eq!(loaded.pages, "0292");
    assert_eq!(loaded.year, "circa 1900");
}
