//! Conversion of task and hook outputs into [`HookResult`].

use crate::{error::BoxError, hook::HookResult};

/// Trait for converting a task's or hook's output into a [`HookResult`].
///
/// # Default Implementations
///
/// - `()` → Next
/// - `bool` → `false` = Stop, `true` = Next
/// - `HookResult` → As is
/// - `Option<T>` → `None` = Next, otherwise delegates to `T`
/// - `Result<T, E>` → Delegates to inner `T` or propagates the error
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be turned into a `HookResult`",
    label = "missing `IntoHookResult` implementation",
    note = "Return `()`, `bool`, `HookResult`, or a `Result` of one of them."
)]
pub trait IntoHookResult {
    /// Convert the output into propagation behavior or an error.
    fn into_hook_result(self) -> Result<HookResult, BoxError>;
}

impl IntoHookResult for () {
    fn into_hook_result(self) -> Result<HookResult, BoxError> {
        Ok(HookResult::Next)
    }
}

impl IntoHookResult for bool {
    fn into_hook_result(self) -> Result<HookResult, BoxError> {
        Ok(if self {
            HookResult::Next
        } else {
            HookResult::Stop
        })
    }
}

impl IntoHookResult for HookResult {
    fn into_hook_result(self) -> Result<HookResult, BoxError> {
        Ok(self)
    }
}

impl<T: IntoHookResult> IntoHookResult for Option<T> {
    fn into_hook_result(self) -> Result<HookResult, BoxError> {
        match self {
            Some(t) => t.into_hook_result(),
            None => Ok(HookResult::Next),
        }
    }
}

impl<T, E> IntoHookResult for Result<T, E>
where
    T: IntoHookResult,
    E: Into<BoxError>,
{
    fn into_hook_result(self) -> Result<HookResult, BoxError> {
        match self {
            Ok(t) => t.into_hook_result(),
            Err(e) => Err(e.into()),
        }
    }
}
