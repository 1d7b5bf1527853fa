//! Sequential async task runner.
//!
//! A [`TaskQueue`] is an [`ItemQueue`] of tasks. Running it consumes the
//! tasks in priority order and awaits each one, wrapped by the optional
//! `before` and `after` tasks. The first `Stop` aborts the run.

use crate::{
    error::BoxError, hook::HookResult, queue::ItemQueue, response::IntoHookResult, status::Status,
};
use futures::future::BoxFuture;
use std::{fmt, future::Future, sync::Arc};

/// An async callable queued in a [`TaskQueue`].
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a task over `{A}`",
    label = "missing `Task` implementation",
    note = "Closures of the form `Fn({A}) -> impl Future` are tasks when their output implements `IntoHookResult`."
)]
pub trait Task<A>: Send + Sync + 'static {
    /// Run the task with the queue's arguments.
    fn call(&self, args: &A) -> impl Future<Output = Result<HookResult, BoxError>> + Send;
}

/// Dynamic object-safe version of [`Task`].
pub trait DynTask<A>: Send + Sync + 'static {
    /// Run the task (dynamic dispatch version).
    fn call_dyn<'a>(&'a self, args: &'a A) -> BoxFuture<'a, Result<HookResult, BoxError>>;
}

impl<A, T: Task<A>> DynTask<A> for T {
    fn call_dyn<'a>(&'a self, args: &'a A) -> BoxFuture<'a, Result<HookResult, BoxError>> {
        Box::pin(self.call(args))
    }
}

impl<A, F, Fut> Task<A> for F
where
    A: Clone + Send + Sync + 'static,
    F: Fn(A) -> Fut + Send + Sync + 'static,
    Fut: Future + Send,
    Fut::Output: IntoHookResult,
{
    fn call(&self, args: &A) -> impl Future<Output = Result<HookResult, BoxError>> + Send {
        let fut = (self)(args.clone());
        async move { fut.await.into_hook_result() }
    }
}

/// A queue of tasks run one after another.
pub struct TaskQueue<A> {
    queue: ItemQueue<Arc<dyn DynTask<A>>>,
    before: Option<Arc<dyn DynTask<A>>>,
    after: Option<Arc<dyn DynTask<A>>>,
}

impl<A> Default for TaskQueue<A> {
    fn default() -> Self {
        Self {
            queue: ItemQueue::new(),
            before: None,
            after: None,
        }
    }
}

impl<A> fmt::Debug for TaskQueue<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskQueue")
            .field("len", &self.queue.len())
            .field("priorities", &self.queue.priorities().collect::<Vec<_>>())
            .field("before", &self.before.is_some())
            .field("after", &self.after.is_some())
            .finish()
    }
}

impl<A: 'static> TaskQueue<A> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a task with the given priority.
    pub fn add(&mut self, task: impl Task<A>, priority: i32) -> &mut Self {
        self.add_dyn(Arc::new(task), priority)
    }

    /// Queue an already shared task.
    pub fn add_dyn(&mut self, task: Arc<dyn DynTask<A>>, priority: i32) -> &mut Self {
        self.queue.add(task, priority);
        self
    }

    /// Queue a task below everything added so far.
    pub fn push(&mut self, task: impl Task<A>) -> &mut Self {
        self.queue.push(Arc::new(task));
        self
    }

    /// Queue a task above everything added so far.
    pub fn shift(&mut self, task: impl Task<A>) -> &mut Self {
        self.queue.shift(Arc::new(task));
        self
    }

    /// Set the task run before every queued task.
    pub fn before(&mut self, task: impl Task<A>) -> &mut Self {
        self.before = Some(Arc::new(task));
        self
    }

    /// Set the task run after every queued task.
    pub fn after(&mut self, task: impl Task<A>) -> &mut Self {
        self.after = Some(Arc::new(task));
        self
    }

    /// Number of queued tasks.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns true if no task is queued.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Run every queued task in priority order.
    ///
    /// Returns [`Status::NotFound`] without calling any hook when the queue
    /// is empty, [`Status::Abort`] as soon as a task or hook stops, and
    /// [`Status::Ok`] once the queue is drained. Errors are returned as is
    /// and leave the remaining tasks queued.
    pub async fn run(&mut self, args: A) -> Result<Status, BoxError> {
        if self.queue.is_empty() {
            return Ok(Status::NotFound);
        }

        while let Some(task) = self.queue.consume() {
            if let Some(before) = &self.before {
                if before.call_dyn(&args).await? == HookResult::Stop {
                    return Ok(Status::Abort);
                }
            }
            if task.call_dyn(&args).await? == HookResult::Stop {
                return Ok(Status::Abort);
            }
            if let Some(after) = &self.after {
                if after.call_dyn(&args).await? == HookResult::Stop {
                    return Ok(Status::Abort);
                }
            }
        }

        Ok(Status::Ok)
    }
}
