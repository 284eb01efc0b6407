//! Message wording for task-wrapping toasts
//!
//! [`Notifier::promise`](crate::Notifier::promise) needs three messages:
//! one for the loading toast and one per outcome. Outcome messages are
//! either literal or computed from the task's value or error once it
//! settles.

/// A message that is either fixed up front or derived from the task
/// outcome.
pub enum MessageText<V> {
    /// Fixed wording.
    Literal(String),
    /// Wording computed from the settled value.
    Compute(Box<dyn FnOnce(&V) -> String + Send>),
}

impl<V> MessageText<V> {
    /// Message derived from the outcome value.
    pub fn compute(f: impl FnOnce(&V) -> String + Send + 'static) -> Self {
        MessageText::Compute(Box::new(f))
    }

    /// Resolves to final wording against the settled value.
    pub fn resolve(self, value: &V) -> String {
        match self {
            MessageText::Literal(text) => text,
            MessageText::Compute(f) => f(value),
        }
    }
}

impl<V> From<&str> for MessageText<V> {
    fn from(text: &str) -> Self {
        MessageText::Literal(text.to_string())
    }
}

impl<V> From<String> for MessageText<V> {
    fn from(text: String) -> Self {
        MessageText::Literal(text)
    }
}

impl<V> std::fmt::Debug for MessageText<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageText::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
            MessageText::Compute(_) => f.write_str("Compute(…)"),
        }
    }
}

/// Wording for the three phases of a wrapped task.
#[derive(Debug)]
pub struct PromiseMessages<T, E> {
    /// Shown in the loading toast while the task runs.
    pub loading: String,
    /// Shown in the success toast when the task completes.
    pub success: MessageText<T>,
    /// Shown in the error toast when the task fails.
    pub error: MessageText<E>,
}

impl<T, E> PromiseMessages<T, E> {
    pub fn new(
        loading: impl Into<String>,
        success: impl Into<MessageText<T>>,
        error: impl Into<MessageText<E>>,
    ) -> Self {
        Self {
            loading: loading.into(),
            success: success.into(),
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_ignores_the_value() {
        let text: MessageText<u32> = "done".into();
        assert_eq!(text.resolve(&7), "done");
    }

    #[test]
    fn computed_sees_the_value() {
        let text = MessageText::compute(|v: &u32| format!("got {v}"));
        assert_eq!(text.resolve(&7), "got 7");
    }
}
