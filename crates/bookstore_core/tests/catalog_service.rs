use bookstore_core::db::open_db_in_memory;
use bookstore_core::{
    canonical_books, seed_catalog, CatalogRepository, CatalogService, CatalogViews,
    CollectionName, CreateBookRequest, CreateOutcome, DeleteOutcome, ServiceError,
    SqliteCatalogRepository, UpdateBookRequest, UpdateOutcome, ViewData, ViewName,
};

fn seeded_service() -> CatalogService<SqliteCatalogRepository> {
    let conn = open_db_in_memory().expect("in-memory store should open");
    let repo = SqliteCatalogRepository::try_new(conn, CollectionName::default()).unwrap();
    seed_catalog(&repo, &canonical_books()).unwrap();
    CatalogService::new(repo)
}

fn vortex_request() -> CreateBookRequest {
    CreateBookRequest {
        id: "example1".to_string(),
        title: "The Vortex".to_string(),
        author: "José Eustasio Rivera".to_string(),
        pages: "292".to_string(),
        edition: "another edition".to_string(),
        year: "1924".to_string(),
    }
}

#[test]
fn get_book_returns_seeded_projection() {
    let service = seeded_service();
    let book = service.get_book("example1").unwrap().unwrap();

    assert_eq!(book.id, "example1");
    assert_eq!(book.title, "The Vortex");
    assert_eq!(book.edition, "958-30-0804-4");
    assert!(service.get_book("nope").unwrap().is_none());
}

#[test]
fn create_duplicate_reports_duplicate_and_keeps_count() {
    let service = seeded_service();
    let outcome = service.create_book(vortex_request()).unwrap();

    assert_eq!(outcome, CreateOutcome::Duplicate);
    assert_eq!(service.repository().count().unwrap(), 3);
}

#[test]
fn create_same_id_different_title_is_created() {
    let service = seeded_service();
    let mut request = vortex_request();
    request.title = "The Vortex (annotated)".to_string();

    assert_eq!(service.create_book(request).unwrap(), CreateOutcome::Created);
    assert_eq!(service.repository().count().unwrap(), 4);
}

#[test]
fn update_changes_only_non_empty_fields() {
    let service = seeded_service();
    let request = UpdateBookRequest {
        year: Some("1925".to_string()),
        author: Some(String::new()),
        ..UpdateBookRequest::default()
    };

    assert_eq!(
        service.update_book("example1", request).unwrap(),
        UpdateOutcome::Updated
    );
    let book = service.get_book("example1").unwrap().unwrap();
    assert_eq!(book.year, "1925");
    assert_eq!(book.author, "José Eustasio Rivera");
    assert_eq!(book.title, "The Vortex");
}

#[test]
fn update_with_no_effective_fields_is_rejected() {
    let service = seeded_service();
    let request = UpdateBookRequest {
        title: Some(String::new()),
        ..UpdateBookRequest::default()
    };

    let err = service.update_book("example1", request).unwrap_err();
    assert!(matches!(err, ServiceError::EmptyUpdate));
}

#[test]
fn update_and_delete_of_missing_id_are_no_match() {
    let service = seeded_service();
    let request = UpdateBookRequest {
        title: Some("x".to_string()),
        ..UpdateBookRequest::default()
    };

    assert_eq!(
        service.update_book("does-not-exist", request).unwrap(),
        UpdateOutcome::NoMatch
    );
    assert_eq!(
        service.delete_book("does-not-exist").unwrap(),
        DeleteOutcome::NoMatch
    );
    assert_eq!(service.repository().count().unwrap(), 3);
}

#[test]
fn distinct_aggregates_have_no_duplicates() {
    let service = seeded_service();
    service
        .create_book(CreateBookRequest {
            id: "example4".to_string(),
            title: "The Raven".to_string(),
            author: "Edgar Allan Poe".to_string(),
            pages: "20".to_string(),
            edition: String::new(),
            year: "1843".to_string(),
        })
        .unwrap();
    service
        .create_book(CreateBookRequest {
            id: "anon".to_string(),
            title: "Untitled".to_string(),
            ..CreateBookRequest::default()
        })
        .unwrap();

    let authors = service.distinct_authors().unwrap();
    assert_eq!(
        authors,
        vec![
            "Edgar Allan Poe".to_string(),
            "José Eustasio Rivera".to_string(),
            "Mary Shelley".to_string(),
        ]
    );

    let years = service.distinct_years().unwrap();
    assert_eq!(
        years,
        vec![
            String::new(),
            "1818".to_string(),
            "1843".to_string(),
            "1924".to_string(),
        ]
    );
}

#[test]
fn catalog_views_shape_service_output() {
    let service = seeded_service();

    let table = CatalogViews::book_table(&service).unwrap();
    assert_eq!(table.view, ViewName::BookTable);
    match &table.data {
        ViewData::Books(books) => assert_eq!(books.len(), 3),
        other => panic!("unexpected view data: {other:?}"),
    }

    let authors = CatalogViews::authors(&service).unwrap();
    assert_eq!(authors.view.as_str(), "authors.html");
    let json = serde_json::to_value(&authors.data).unwrap();
    assert_eq!(json["Authors"].as_array().unwrap().len(), 3);

    let years = CatalogViews::years(&service).unwrap();
    assert_eq!(years.view.as_str(), "years.html");

    assert_eq!(CatalogViews::index().view.as_str(), "index");
    assert_eq!(CatalogViews::search_bar().view.as_str(), "search-bar");
    assert!(serde_json::to_value(&CatalogViews::index().data)
        .unwrap()
        .is_null());
}
