use super::*;

use std::sync::{Arc, Mutex};

use futures::{future::BoxFuture, FutureExt};
use tokio::sync::oneshot;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Todo {
    id: u32,
    title: &'static str,
}

fn todo(id: u32, title: &'static str) -> Todo {
    Todo { id, title }
}

type Store = EntityStore<Todo, String>;

fn controlled<T: Send + 'static>() -> (
    oneshot::Sender<Result<T, String>>,
    impl Future<Output = Result<T, String>>,
) {
    let (tx, rx) = oneshot::channel();
    let producer = async move {
        rx.await
            .unwrap_or_else(|_| Err("producer abandoned".to_string()))
    };
    (tx, producer)
}

#[tokio::test]
async fn success_records_result_and_clears_busy() {
    let store = Store::new();

    let fetched = store
        .fetch_entity(async { Ok(todo(1, "write docs")) })
        .await
        .expect("fetch");

    assert_eq!(fetched, todo(1, "write docs"));
    assert_eq!(store.entity().read(), Some(todo(1, "write docs")));
    assert_eq!(store.error_fetching_entity().read(), None);
    assert!(!store.is_fetching_entity().read());
}

#[tokio::test]
async fn failure_records_error_keeps_result_and_returns_error() {
    let store = Store::new();
    store.set_entity(todo(1, "old"));

    let err = store
        .fetch_entity(async { Err("offline".to_string()) })
        .await
        .expect_err("must fail");

    assert_eq!(err, "offline");
    assert_eq!(store.error_fetching_entity().read(), Some("offline".to_string()));
    assert_eq!(store.entity().read(), Some(todo(1, "old")));
    assert!(!store.is_fetching_entity().read());
}

#[tokio::test]
async fn busy_is_set_and_error_cleared_before_producer_settles() {
    let store = Store::new();
    store
        .fetch_entities(async { Err("first attempt".to_string()) })
        .await
        .expect_err("must fail");
    store.set_entities(vec![todo(9, "kept")]);

    let (tx, producer) = controlled::<Vec<Todo>>();
    let run = store.fetch_entities(producer);
    tokio::pin!(run);

    assert!(futures::poll!(&mut run).is_pending());
    assert!(store.is_fetching_entities().read());
    assert_eq!(store.error_fetching_entities().read(), None);
    assert_eq!(store.entities().read(), Some(vec![todo(9, "kept")]));

    tx.send(Ok(vec![todo(1, "a"), todo(2, "b")])).expect("send");
    let fetched = run.await.expect("fetch");

    assert_eq!(fetched.len(), 2);
    assert!(!store.is_fetching_entities().read());
}

#[tokio::test]
async fn busy_drops_only_after_outcome_is_visible() {
    let store = Arc::new(Store::new());
    let observed = Arc::new(Mutex::new(Vec::new()));

    let _subscription = {
        let result = store.entity_created().clone();
        let error = store.error_creating().clone();
        let observed = Arc::clone(&observed);
        store.is_creating().subscribe(move |busy: &bool| {
            observed
                .lock()
                .expect("observed")
                .push((*busy, result.read(), error.read()));
        })
    };

    store
        .create_entity(async { Ok(todo(3, "created")) })
        .await
        .expect("create");
    store
        .create_entity(async { Err("conflict".to_string()) })
        .await
        .expect_err("must fail");

    let observed = observed.lock().expect("observed").clone();
    assert_eq!(
        observed,
        vec![
            (false, None, None),
            (true, None, None),
            (false, Some(todo(3, "created")), None),
            (true, Some(todo(3, "created")), None),
            (false, Some(todo(3, "created")), Some("conflict".to_string())),
        ]
    );
}

#[tokio::test]
async fn operation_kinds_do_not_interfere() {
    let store = Store::new();
    let (tx, producer) = controlled::<Todo>();
    let update = store.update_entity(producer);
    tokio::pin!(update);
    assert!(futures::poll!(&mut update).is_pending());

    store
        .delete_entity(async { Err("forbidden".to_string()) })
        .await
        .expect_err("must fail");

    assert!(store.is_updating().read());
    assert!(!store.is_deleting().read());
    assert_eq!(store.error_updating().read(), None);
    assert_eq!(store.error_deleting().read(), Some("forbidden".to_string()));
    assert!(store.is_busy(OperationKind::Update));
    assert!(store.any_busy());

    tx.send(Ok(todo(4, "renamed"))).expect("send");
    update.await.expect("update");

    assert_eq!(store.entity_updated().read(), Some(todo(4, "renamed")));
    assert!(!store.any_busy());
}

#[tokio::test]
async fn calling_an_operation_marks_busy_before_it_is_awaited() {
    let store = Store::new();
    store
        .fetch_entity(async { Err("stale".to_string()) })
        .await
        .expect_err("must fail");

    let (tx, producer) = controlled::<Todo>();
    let run = store.fetch_entity(producer);
    assert!(store.is_fetching_entity().read());
    assert_eq!(store.error_fetching_entity().read(), None);

    tx.send(Ok(todo(5, "later"))).expect("send");
    assert_eq!(run.await.expect("fetch"), todo(5, "later"));
    assert!(!store.is_fetching_entity().read());
}

#[tokio::test]
async fn never_polled_operation_clears_busy_when_dropped() {
    let store = Store::new();
    let (_tx, producer) = controlled::<Vec<Todo>>();

    let run = store.fetch_entities(producer);
    assert!(store.is_fetching_entities().read());
    drop(run);

    assert!(!store.is_fetching_entities().read());
    assert_eq!(store.entities().read(), None);
}

#[tokio::test]
async fn dropping_an_in_flight_operation_still_clears_busy() {
    let store = Store::new();
    let (_tx, producer) = controlled::<Todo>();

    {
        let run = store.fetch_entity(producer);
        tokio::pin!(run);
        assert!(futures::poll!(&mut run).is_pending());
        assert!(store.is_fetching_entity().read());
    }

    assert!(!store.is_fetching_entity().read());
    assert_eq!(store.entity().read(), None);
}

#[tokio::test]
async fn concurrent_runs_of_same_kind_are_last_write_wins() {
    let store = Store::new();
    let (first_tx, first) = controlled::<Todo>();
    let (second_tx, second) = controlled::<Todo>();

    let first_run = store.fetch_entity(first);
    let second_run = store.fetch_entity(second);
    let settle = async move {
        tokio::task::yield_now().await;
        second_tx.send(Ok(todo(2, "second"))).expect("send second");
        tokio::task::yield_now().await;
        first_tx.send(Ok(todo(1, "first"))).expect("send first");
    };

    let (first_outcome, second_outcome, ()) = tokio::join!(first_run, second_run, settle);

    assert_eq!(first_outcome.expect("first"), todo(1, "first"));
    assert_eq!(second_outcome.expect("second"), todo(2, "second"));
    assert!(!store.is_fetching_entity().read());
    assert_eq!(store.entity().read(), Some(todo(1, "first")));
}

#[tokio::test]
async fn manual_reset_of_result_ignores_busy_state() {
    let store = Store::new();
    store.set_entity(todo(5, "optimistic"));
    let (_tx, producer) = controlled::<Todo>();
    let run = store.fetch_entity(producer);
    tokio::pin!(run);
    assert!(futures::poll!(&mut run).is_pending());

    store.reset_entity();

    assert_eq!(store.entity().read(), None);
    assert!(store.is_fetching_entity().read());
}

#[tokio::test]
async fn paired_resets_clear_busy_and_error_but_not_result() {
    let store = Store::new();
    store
        .create_entity(async { Ok(todo(6, "made")) })
        .await
        .expect("create");
    store
        .create_entity(async { Err("invalid".to_string()) })
        .await
        .expect_err("must fail");
    store.creating_state().busy().write(true);

    store.reset_creating();

    assert!(!store.is_creating().read());
    assert_eq!(store.error_creating().read(), None);
    assert_eq!(store.entity_created().read(), Some(todo(6, "made")));

    store.reset_created();
    assert_eq!(store.entity_created().read(), None);
}

#[tokio::test]
async fn single_cell_resets_touch_only_their_cell() {
    let store = Store::new();
    store
        .fetch_entities(async { Err("timeout".to_string()) })
        .await
        .expect_err("must fail");
    store.set_entities(vec![todo(1, "x")]);
    store.entities_state().busy().write(true);

    store.reset_entities_error();
    assert_eq!(store.error_fetching_entities().read(), None);
    assert!(store.is_fetching_entities().read());
    assert!(store.entities().read().is_some());

    store.reset_entities_fetching();
    assert!(!store.is_fetching_entities().read());
    assert!(store.entities().read().is_some());

    store.reset_entities();
    assert_eq!(store.entities().read(), None);
}

#[tokio::test]
async fn stores_do_not_share_state() {
    let todos = Store::new();
    let others = Store::new();

    todos
        .fetch_entity(async { Ok(todo(1, "mine")) })
        .await
        .expect("fetch");

    assert_eq!(others.entity().read(), None);
}

#[tokio::test]
async fn fetch_parallel_delegates_to_join() {
    let store = Store::new();
    let producers: Vec<(&str, BoxFuture<'static, Result<usize, String>>)> = vec![
        ("users", async { Ok(3) }.boxed()),
        ("roles", async { Ok(2) }.boxed()),
    ];

    let joined = store.fetch_parallel(producers).await.expect("join");

    assert_eq!(joined["users"], 3);
    assert_eq!(joined["roles"], 2);
    assert!(!store.any_busy());
}
