use reverb::{
    Event, EventEmitter, EventKey, HookResult, ListenerId, Status,
    testing::{CountingHook, RecordingHook},
};
use std::sync::Arc;

mod common;
use common::{FailingHook, OrderRecordingHook, entries, init_tracing, log};

#[tokio::test]
async fn test_empty_emitter_runs_no_hooks() {
    init_tracing();
    let emitter = EventEmitter::<()>::new();
    let before = CountingHook::new();
    let after = CountingHook::new();
    emitter.before(before.clone()).after(after.clone());

    for name in ["", "anything", "GET /"] {
        assert_eq!(emitter.emit(name, ()).await.unwrap(), Status::NotFound);
    }
    assert_eq!(before.count(), 0);
    assert_eq!(after.count(), 0);
}

#[tokio::test]
async fn test_descending_priority_regardless_of_registration() {
    let log = log();
    let emitter = EventEmitter::<()>::new();
    emitter
        .on("e", OrderRecordingHook::next("1", &log), 1)
        .unwrap();
    emitter
        .on("e", OrderRecordingHook::next("5", &log), 5)
        .unwrap();
    emitter
        .on("e", OrderRecordingHook::next("3", &log), 3)
        .unwrap();

    assert_eq!(emitter.emit("e", ()).await.unwrap(), Status::Ok);
    assert_eq!(entries(&log), vec!["5", "3", "1"]);
}

#[tokio::test]
async fn test_false_short_circuits() {
    let log = log();
    let emitter = EventEmitter::<()>::new();
    emitter
        .on("e", OrderRecordingHook::next("low", &log), 0)
        .unwrap();
    emitter.on("e", |_: Event<()>| async { false }, 10).unwrap();

    assert_eq!(emitter.emit("e", ()).await.unwrap(), Status::Abort);
    assert!(entries(&log).is_empty());
}

#[tokio::test]
async fn test_before_receives_running_listener() {
    let emitter = EventEmitter::<&'static str>::new();
    let recorder = RecordingHook::new();
    emitter.before(recorder.clone());

    let high = emitter
        .on("e", |_: Event<&'static str>| async {}, 2)
        .unwrap();
    let low = emitter
        .on("e", |_: Event<&'static str>| async {}, 1)
        .unwrap();
    emitter.emit("e", "payload").await.unwrap();

    let events = recorder.events();
    let seen: Vec<(ListenerId, i32)> = events
        .iter()
        .map(|event| (event.listener(), event.priority()))
        .collect();
    assert_eq!(seen, vec![(high, 2), (low, 1)]);
    assert!(events.iter().all(|event| *event.args() == "payload"));
    assert!(events.iter().all(|event| event.pattern() == "e"));
}

#[tokio::test]
async fn test_listener_error_propagates() {
    let log = log();
    let emitter = EventEmitter::<()>::new();
    emitter
        .on("e", FailingHook { message: "listener failed" }, 1)
        .unwrap();
    emitter
        .on("e", OrderRecordingHook::next("later", &log), 0)
        .unwrap();

    let err = emitter.emit("e", ()).await.unwrap_err();
    assert_eq!(err.to_string(), "listener failed");
    assert!(entries(&log).is_empty());
}

#[tokio::test]
async fn test_merge_uses_own_hooks() {
    let log = log();
    let a = EventEmitter::<()>::new();
    let b = EventEmitter::<()>::new();
    a.before(OrderRecordingHook::next("a:before", &log));
    a.after(OrderRecordingHook::next("a:after", &log));
    b.before(OrderRecordingHook::next("b:before", &log));
    b.on("only-b", OrderRecordingHook::next("listener", &log), 0)
        .unwrap();

    a.merge(&b);
    assert_eq!(a.emit("only-b", ()).await.unwrap(), Status::Ok);
    assert_eq!(entries(&log), vec!["a:before", "listener", "a:after"]);
}

#[tokio::test]
async fn test_merge_is_a_snapshot() {
    let a = EventEmitter::<()>::new();
    let b = EventEmitter::<()>::new();
    b.on("early", |_: Event<()>| async {}, 0).unwrap();

    a.merge(&b);
    b.on("late", |_: Event<()>| async {}, 0).unwrap();
    a.on("mine", |_: Event<()>| async {}, 0).unwrap();

    assert_eq!(a.emit("early", ()).await.unwrap(), Status::Ok);
    assert_eq!(a.emit("late", ()).await.unwrap(), Status::NotFound);
    assert_eq!(b.emit("mine", ()).await.unwrap(), Status::NotFound);
    assert_eq!(
        a.keys(),
        vec![EventKey::literal("early"), EventKey::literal("mine")]
    );
}

#[tokio::test]
async fn test_same_hook_twice_gets_two_handles() {
    let counter = CountingHook::new();
    let emitter = EventEmitter::<()>::new();
    let first = emitter.on("e", counter.clone(), 0).unwrap();
    let second = emitter.on("e", counter.clone(), 0).unwrap();
    assert_ne!(first, second);
    assert_eq!(emitter.listeners("e").len(), 2);

    emitter.emit("e", ()).await.unwrap();
    assert_eq!(counter.count(), 2);

    assert!(emitter.unbind("e", first));
    counter.reset();
    emitter.emit("e", ()).await.unwrap();
    assert_eq!(counter.count(), 1);
}

#[tokio::test]
async fn test_nested_emit_on_same_emitter() {
    let log = log();
    let emitter = Arc::new(EventEmitter::<()>::new());
    emitter
        .on("inner", OrderRecordingHook::next("inner", &log), 0)
        .unwrap();

    let nested = emitter.clone();
    let outer_log = log.clone();
    emitter
        .on(
            "outer",
            move |_: Event<()>| {
                let nested = nested.clone();
                let log = outer_log.clone();
                async move {
                    log.lock().unwrap().push("outer:start".to_string());
                    let status = nested.emit("inner", ()).await?;
                    log.lock().unwrap().push(format!("outer:{status}"));
                    Ok::<_, reverb::BoxError>(HookResult::Next)
                }
            },
            0,
        )
        .unwrap();

    assert_eq!(emitter.emit("outer", ()).await.unwrap(), Status::Ok);
    assert_eq!(
        entries(&log),
        vec!["outer:start", "inner", "outer:200 OK"]
    );
}

#[tokio::test]
async fn test_listener_may_register_during_dispatch() {
    let emitter = Arc::new(EventEmitter::<()>::new());
    let registrar = emitter.clone();
    emitter
        .on(
            "grow",
            move |_: Event<()>| {
                let registrar = registrar.clone();
                async move {
                    registrar.on("grown", |_: Event<()>| async {}, 0).map(|_| ())
                }
            },
            0,
        )
        .unwrap();

    emitter.emit("grow", ()).await.unwrap();
    assert_eq!(emitter.emit("grown", ()).await.unwrap(), Status::Ok);
}
