//! Priority-ordered component runner.
//!
//! The contract mirrors the classic initializer-runner surface: register
//! every component, set the completion callback, then trigger execution.
//! Registration is fully synchronous; execution happens on a spawned task
//! and reports through the callback exactly once.

use std::sync::Arc;

use thiserror::Error;

use crate::error::BoxError;
use crate::modules::Initializer;

/// Error type for component registration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RunnerError {
    #[error("initializer component does not declare a static priority")]
    MissingPriority,
}

/// What a module offers for registration.
pub struct ComponentRegistration {
    pub priority: Option<u32>,
    pub component: Arc<dyn Initializer>,
}

/// A component that ran and failed.
#[derive(Debug)]
pub struct ComponentFailure {
    pub namespace: String,
    pub source: BoxError,
}

/// Completion callback, invoked exactly once with the overall outcome.
pub type RunnerCallback = Box<dyn FnOnce(Result<(), ComponentFailure>) + Send>;

/// Runs registered components to completion in ascending priority order.
#[derive(Default)]
pub struct PriorityRunner {
    components: Vec<(u32, String, Arc<dyn Initializer>)>,
    callback: Option<RunnerCallback>,
}

impl PriorityRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and queue one component.
    pub fn register_component(
        &mut self,
        namespace: &str,
        registration: ComponentRegistration,
    ) -> Result<(), RunnerError> {
        let priority = registration.priority.ok_or(RunnerError::MissingPriority)?;
        self.components
            .push((priority, namespace.to_string(), registration.component));
        Ok(())
    }

    /// Install the completion callback.
    pub fn set_callback(&mut self, callback: RunnerCallback) {
        self.callback = Some(callback);
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Execute every registered component sequentially, lowest priority
    /// first, ties in registration order. The first failure stops the run
    /// and is reported through the callback.
    pub fn instantiate_components(mut self) {
        // sort_by_key is stable, so equal priorities keep registration order
        self.components.sort_by_key(|(priority, _, _)| *priority);
        let components = self.components;
        let callback = self.callback;

        tokio::spawn(async move {
            for (priority, namespace, component) in components {
                tracing::debug!(namespace = %namespace, priority, "Running initializer");
                if let Err(source) = component.run().await {
                    tracing::error!(namespace = %namespace, error = %source, "Initializer failed");
                    if let Some(callback) = callback {
                        callback(Err(ComponentFailure { namespace, source }));
                    }
                    return;
                }
            }
            if let Some(callback) = callback {
                callback(Ok(()));
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    struct Recorder {
        priority: Option<u32>,
        tag: u32,
        order: Arc<Mutex<Vec<u32>>>,
        fail: bool,
    }

    impl Initializer for Recorder {
        fn priority(&self) -> Option<u32> {
            self.priority
        }

        fn run(&self) -> futures_util::future::BoxFuture<'static, Result<(), BoxError>> {
            let order = self.order.clone();
            let tag = self.tag;
            let fail = self.fail;
            Box::pin(async move {
                order.lock().unwrap().push(tag);
                if fail {
                    Err("deliberate".into())
                } else {
                    Ok(())
                }
            })
        }
    }

    fn registration(
        priority: Option<u32>,
        tag: u32,
        order: &Arc<Mutex<Vec<u32>>>,
        fail: bool,
    ) -> ComponentRegistration {
        ComponentRegistration {
            priority,
            component: Arc::new(Recorder {
                priority,
                tag,
                order: order.clone(),
                fail,
            }),
        }
    }

    #[test]
    fn test_registration_requires_priority() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut runner = PriorityRunner::new();
        let err = runner
            .register_component("bad", registration(None, 0, &order, false))
            .unwrap_err();
        assert_eq!(err, RunnerError::MissingPriority);
    }

    #[tokio::test]
    async fn test_components_run_in_priority_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut runner = PriorityRunner::new();
        runner
            .register_component("second", registration(Some(5), 5, &order, false))
            .unwrap();
        runner
            .register_component("first", registration(Some(1), 1, &order, false))
            .unwrap();

        let (tx, rx) = oneshot::channel();
        runner.set_callback(Box::new(move |outcome| {
            let _ = tx.send(outcome);
        }));
        runner.instantiate_components();

        rx.await.unwrap().unwrap();
        assert_eq!(*order.lock().unwrap(), vec![1, 5]);
    }

    #[tokio::test]
    async fn test_failure_stops_the_run() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut runner = PriorityRunner::new();
        runner
            .register_component("boom", registration(Some(1), 1, &order, true))
            .unwrap();
        runner
            .register_component("after", registration(Some(2), 2, &order, false))
            .unwrap();

        let (tx, rx) = oneshot::channel();
        runner.set_callback(Box::new(move |outcome| {
            let _ = tx.send(outcome);
        }));
        runner.instantiate_components();

        let failure = rx.await.unwrap().unwrap_err();
        assert_eq!(failure.namespace, "boom");
        assert_eq!(*order.lock().unwrap(), vec![1]);
    }
}
