use vlib_application::{
    Catalog, CatalogEvent, LOAD_FAILED_MESSAGE, OpenPlan, SearchControl, SearchOutcome, ViewState,
    convert_and_open, load, plan_open, remove, run_search, sync_folder, toggle_read,
};

use super::*;

async fn loaded(service: &RecordingService) -> Catalog {
    let mut catalog = Catalog::new();
    catalog.begin_load();
    catalog.apply(load(service).await);
    catalog
}

fn two_books() -> Vec<Book> {
    vec![
        make_book(1, "Annals", ".epub", false),
        make_book(2, "Bestiary", ".pdf", true),
    ]
}

#[tokio::test]
async fn search_then_clear_switches_display_mode() {
    let service = RecordingService::with_books(two_books());
    let mut catalog = loaded(&service).await;

    let mut control = SearchControl::default();
    for ch in "best".chars() {
        control.insert_char(ch);
    }
    let query = control.submit().expect("non-blank query");
    let event = run_search(&service, &query).await.expect("search succeeds");
    catalog.apply(event);

    assert!(catalog.is_searching);
    assert_eq!(catalog.displayed_books, vec![make_book(2, "Bestiary", ".pdf", true)]);

    catalog.apply(CatalogEvent::Searched(control.clear()));
    assert!(!catalog.is_searching);
    assert_eq!(catalog.displayed_books, catalog.all_books);
    assert_eq!(control.query(), "");
}

#[tokio::test]
async fn search_without_matches_still_counts_as_searching() {
    let service = RecordingService::with_books(two_books());
    let mut catalog = loaded(&service).await;

    let event = run_search(&service, "zzz").await.expect("search succeeds");
    catalog.apply(event);
    assert!(catalog.is_searching);
    assert!(catalog.displayed_books.is_empty());
    assert_eq!(catalog.all_books.len(), 2);
}

#[tokio::test]
async fn blank_query_issues_no_request() {
    let service = RecordingService::with_books(two_books());
    let catalog = loaded(&service).await;
    let before = catalog.displayed_books.clone();

    let mut control = SearchControl::default();
    control.insert_char(' ');
    assert_eq!(control.submit(), None);

    assert_eq!(service.calls(), vec![Call::ListAll]);
    assert_eq!(catalog.displayed_books, before);
}

#[tokio::test]
async fn failed_search_is_silent() {
    let service = RecordingService::with_books(two_books());
    let catalog = loaded(&service).await;
    service.fail(Operation::Search);

    assert_eq!(run_search(&service, "annals").await, None);
    assert_eq!(catalog.view_state, ViewState::Ready);
    assert!(!catalog.is_searching);
}

#[tokio::test]
async fn toggle_read_reloads_exactly_once() {
    let service = RecordingService::with_books(two_books());
    let mut catalog = loaded(&service).await;
    let annals = catalog.displayed_books[0].clone();

    let event = toggle_read(&service, &annals).await.expect("reload event");
    catalog.apply(event);

    assert_eq!(
        service.calls(),
        vec![Call::ListAll, Call::ToggleRead(annals.id.clone()), Call::ListAll]
    );
    assert_eq!(catalog.view_state, ViewState::Ready);
    assert_eq!(
        catalog.displayed_books,
        vec![
            make_book(1, "Annals", ".epub", true),
            make_book(2, "Bestiary", ".pdf", true),
        ]
    );
    assert_eq!(catalog.all_books, catalog.displayed_books);
    assert!(!catalog.is_searching);
}

#[tokio::test]
async fn delete_reloads_exactly_once() {
    let service = RecordingService::with_books(two_books());
    let mut catalog = loaded(&service).await;
    let bestiary = catalog.displayed_books[1].clone();

    let event = remove(&service, &bestiary).await.expect("reload event");
    catalog.apply(event);

    assert_eq!(service.count(&Call::ListAll), 2);
    assert_eq!(catalog.all_books, service.books());
    assert_eq!(catalog.all_books, vec![make_book(1, "Annals", ".epub", false)]);
}

#[tokio::test]
async fn delete_from_search_mode_returns_to_full_list() {
    let service = RecordingService::with_books(two_books());
    let mut catalog = loaded(&service).await;
    catalog.apply(run_search(&service, "annals").await.expect("search succeeds"));
    assert!(catalog.is_searching);

    let annals = catalog.displayed_books[0].clone();
    catalog.apply(remove(&service, &annals).await.expect("reload event"));
    assert!(!catalog.is_searching);
    assert_eq!(catalog.displayed_books, vec![make_book(2, "Bestiary", ".pdf", true)]);
}

#[tokio::test]
async fn failed_mutation_skips_reload_and_keeps_state() {
    let service = RecordingService::with_books(two_books());
    let catalog = loaded(&service).await;
    service.fail(Operation::ToggleRead);
    service.fail(Operation::Remove);

    let annals = catalog.displayed_books[0].clone();
    assert_eq!(toggle_read(&service, &annals).await, None);
    assert_eq!(remove(&service, &annals).await, None);

    assert_eq!(service.count(&Call::ListAll), 1);
    assert_eq!(catalog.displayed_books, two_books());
}

#[tokio::test]
async fn pdf_opens_without_service_calls() {
    let service = RecordingService::default();
    let book = make_book(2, "Bestiary", ".pdf", true);

    let plan = plan_open(&service, &book);
    assert_eq!(
        plan,
        OpenPlan::Navigate(format!("{TEST_BASE_URL}/books/Bestiary/view"))
    );
    assert!(service.calls().is_empty());
}

#[tokio::test]
async fn declined_conversion_touches_nothing() {
    let service = RecordingService::default();
    let book = make_book(1, "Annals", ".epub", false);

    let plan = plan_open(&service, &book);
    assert_eq!(plan, OpenPlan::ConfirmConvert(book));
    // Declining simply drops the plan.
    drop(plan);
    assert!(service.calls().is_empty());
}

#[tokio::test]
async fn confirmed_conversion_resolves_path_then_navigates() {
    let service = RecordingService::with_books(two_books());
    let book = make_book(1, "Annals", ".epub", false);

    let event = convert_and_open(&service, &book).await;
    assert_eq!(
        event,
        CatalogEvent::Navigate(format!("{TEST_BASE_URL}/books/Annals/view"))
    );
    assert_eq!(
        service.calls(),
        vec![
            Call::Search("Annals".to_string()),
            Call::Convert("/library/Annals.epub".to_string()),
        ]
    );
}

#[tokio::test]
async fn conversion_of_unknown_title_alerts_without_navigation() {
    let service = RecordingService::default();
    let book = make_book(9, "Ghost", ".mobi", false);

    let event = convert_and_open(&service, &book).await;
    assert_eq!(
        event,
        CatalogEvent::OpenFailed("Cannot open book: no book matches title 'Ghost'".to_string())
    );
    assert_eq!(service.count(&Call::Convert("/library/Ghost.mobi".to_string())), 0);
}

#[tokio::test]
async fn conversion_failure_alerts() {
    let service = RecordingService::with_books(two_books());
    service.fail(Operation::Convert);
    let book = make_book(1, "Annals", ".epub", false);

    match convert_and_open(&service, &book).await {
        CatalogEvent::OpenFailed(message) => {
            assert!(message.starts_with("Cannot open book: "));
            assert!(message.contains("injected failure"));
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn failed_initial_load_offers_retry() {
    let service = RecordingService::with_books(two_books());
    service.fail(Operation::ListAll);

    let mut catalog = loaded(&service).await;
    assert_eq!(
        catalog.view_state,
        ViewState::Error(LOAD_FAILED_MESSAGE.to_string())
    );
    assert!(catalog.displayed_books.is_empty());

    service.recover(Operation::ListAll);
    catalog.begin_load();
    catalog.apply(load(&service).await);
    assert_eq!(service.count(&Call::ListAll), 2);
    assert_eq!(catalog.view_state, ViewState::Ready);
    assert_eq!(catalog.displayed_books, two_books());
}

#[tokio::test]
async fn stale_reload_overwrites_newer_state() {
    let service = RecordingService::with_books(two_books());
    let mut catalog = loaded(&service).await;

    // Two refreshes in flight; the older response lands last and wins.
    let older = vec![make_book(1, "Annals", ".epub", false)];
    service.queue_list(Ok(older.clone()));
    let first = load(&service).await;
    let second = load(&service).await;
    catalog.apply(second);
    catalog.apply(first);
    assert_eq!(catalog.all_books, older);
}

#[tokio::test]
async fn sync_reports_summary_then_reloads() {
    let service = RecordingService::with_books(two_books()).with_folder("/srv/books");
    let mut catalog = loaded(&service).await;

    let events = sync_folder(&service, "/srv/books").await;
    assert_eq!(events.len(), 2);
    assert!(matches!(&events[0], CatalogEvent::Synced(summary) if summary.total_books_found == 2));
    for event in events {
        catalog.apply(event);
    }
    assert_eq!(
        service.calls(),
        vec![
            Call::ListAll,
            Call::SyncFromFolder("/srv/books".to_string()),
            Call::ListAll,
        ]
    );
}

#[tokio::test]
async fn failed_sync_keeps_catalog() {
    let service = RecordingService::with_books(two_books());
    service.fail(Operation::SyncFromFolder);

    let events = sync_folder(&service, "/nowhere").await;
    assert!(matches!(events.as_slice(), [CatalogEvent::SyncFailed(_)]));
    assert_eq!(service.count(&Call::ListAll), 0);
}

#[tokio::test]
async fn cleared_search_never_touches_service() {
    let service = RecordingService::with_books(two_books());
    let mut catalog = loaded(&service).await;
    catalog.apply(CatalogEvent::Searched(SearchOutcome::Cleared));
    assert_eq!(service.calls(), vec![Call::ListAll]);
    assert_eq!(catalog.displayed_books, two_books());
}
