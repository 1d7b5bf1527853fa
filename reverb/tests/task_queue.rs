use reverb::{HookResult, ItemQueue, Status, TaskQueue};
use std::sync::{Arc, Mutex};

mod common;
use common::{Log, entries, log};

fn labelled(
    label: &'static str,
    log: &Log,
) -> impl Fn(()) -> std::future::Ready<()> + Send + Sync + 'static {
    let log = log.clone();
    move |_| {
        log.lock().unwrap().push(label.to_string());
        std::future::ready(())
    }
}

#[test]
fn test_push_and_shift_placement() {
    let mut queue = ItemQueue::new();
    queue.add("a", 5).add("b", -3).add("c", 2);
    queue.push("bottom").shift("top");

    let order: Vec<&str> = std::iter::from_fn(|| queue.consume()).collect();
    assert_eq!(order, vec!["top", "a", "c", "b", "bottom"]);
}

#[test]
fn test_push_on_empty_queue() {
    let mut queue = ItemQueue::new();
    queue.push(1).push(2).shift(3);
    // bounds start at zero
    assert_eq!(queue.priorities().collect::<Vec<_>>(), vec![1, -1, -2]);
    assert_eq!(queue.len(), 3);
    assert_eq!(queue.consume(), Some(3));
}

#[tokio::test]
async fn test_task_queue_wraps_each_task() {
    let log = log();
    let mut queue = TaskQueue::new();
    queue
        .add(labelled("low", &log), 1)
        .add(labelled("high", &log), 9)
        .before(labelled("before", &log))
        .after(labelled("after", &log));

    assert_eq!(queue.run(()).await.unwrap(), Status::Ok);
    assert!(queue.is_empty());
    assert_eq!(
        entries(&log),
        vec!["before", "high", "after", "before", "low", "after"]
    );
}

#[tokio::test]
async fn test_task_queue_stop_aborts() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut queue = TaskQueue::new();
    let first = seen.clone();
    let second = seen.clone();
    queue
        .add(
            move |n: u32| {
                first.lock().unwrap().push(n);
                async { HookResult::Stop }
            },
            1,
        )
        .add(
            move |n: u32| {
                second.lock().unwrap().push(n + 1);
                async { true }
            },
            0,
        );

    assert_eq!(queue.run(7).await.unwrap(), Status::Abort);
    assert_eq!(*seen.lock().unwrap(), vec![7]);
    assert_eq!(queue.len(), 1);
}

#[tokio::test]
async fn test_empty_task_queue_is_not_found() {
    let mut queue = TaskQueue::<()>::new();
    assert_eq!(queue.run(()).await.unwrap(), Status::NotFound);
}
