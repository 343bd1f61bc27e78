//! Classification session
//!
//! Owns the current outcome and the busy flag. At most one classification
//! is in flight at a time; a second submission is rejected, not queued.

use crate::models::{ApiResponseError, Outcome};
use crate::providers::Classifier;
use crate::services::validator::{validate_json_input, ValidationError, RECOGNISED_FIELDS};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Fallback when the classification task itself dies
pub const UNKNOWN_FAILURE_MESSAGE: &str = "An unknown error occurred during classification.";

/// Reasons a submission never reaches the classifier
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("A classification is already in progress")]
    Busy,
}

/// Process-wide classification state
pub struct ClassificationSession {
    classifier: Arc<dyn Classifier>,
    busy: AtomicBool,
    outcome: RwLock<Outcome>,
}

/// Clears the busy flag when the in-flight call ends, however it ends
struct BusyGuard {
    session: Arc<ClassificationSession>,
}

impl BusyGuard {
    fn acquire(session: &Arc<ClassificationSession>) -> Option<Self> {
        session
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self {
                session: Arc::clone(session),
            })
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.session.busy.store(false, Ordering::Release);
    }
}

impl ClassificationSession {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            classifier,
            busy: AtomicBool::new(false),
            outcome: RwLock::new(Outcome::Pending),
        }
    }

    /// Name of the underlying classifier
    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    /// Whether the underlying classifier has a credential
    pub fn is_configured(&self) -> bool {
        self.classifier.is_configured()
    }

    /// Whether a classification is currently in flight
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Snapshot of the current outcome
    pub fn outcome(&self) -> Outcome {
        self.outcome
            .read()
            .map(|outcome| outcome.clone())
            .unwrap_or_default()
    }

    fn set_outcome(&self, outcome: Outcome) {
        if let Ok(mut current) = self.outcome.write() {
            *current = outcome;
        }
    }

    /// Validate and classify one document
    ///
    /// Validation failures leave the previous outcome untouched. Otherwise the
    /// previous outcome is cleared before the call is issued, and the call runs
    /// on its own task so it completes even if the caller goes away.
    pub async fn submit(self: &Arc<Self>, raw_text: &str) -> Result<Outcome, SubmitError> {
        let input = validate_json_input(raw_text)?;

        if !input.has_expected_shape() {
            warn!(
                "Input has none of the fields {:?}; classification quality may suffer",
                RECOGNISED_FIELDS
            );
        } else {
            debug!("Input fields found: {:?}", input.recognised_fields());
        }

        let guard = BusyGuard::acquire(self).ok_or_else(|| {
            warn!("Rejected submission: classification already in progress");
            SubmitError::Busy
        })?;

        self.set_outcome(Outcome::Pending);

        let session = Arc::clone(self);
        let json_text = input.raw().to_string();
        let task = tokio::spawn(async move {
            // Dropped last, after the outcome is stored
            let _guard = guard;
            let call = AssertUnwindSafe(session.classifier.classify(&json_text)).catch_unwind();

            let outcome = match call.await {
                Ok(Ok(classification)) => {
                    info!(
                        "Classification completed: has_quantitative_data={}",
                        classification.has_quantitative_data
                    );
                    Outcome::Success(classification)
                }
                Ok(Err(e)) => {
                    error!("Classification failed ({}): {}", e.kind(), e);
                    Outcome::Failure(ApiResponseError::from(e))
                }
                Err(_) => {
                    error!("Classifier panicked");
                    Outcome::Failure(ApiResponseError::new(UNKNOWN_FAILURE_MESSAGE))
                }
            };

            session.set_outcome(outcome.clone());
            outcome
        });

        match task.await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                // Only reachable when the runtime cancels the task
                error!("Classification task aborted: {}", e);
                Ok(Outcome::Failure(ApiResponseError::new(UNKNOWN_FAILURE_MESSAGE)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClassificationResult;
    use crate::providers::ClassifyError;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    /// Returns queued replies in order and counts calls
    struct ScriptedClassifier {
        calls: AtomicUsize,
        inputs: std::sync::Mutex<Vec<String>>,
        replies: std::sync::Mutex<Vec<Result<ClassificationResult, ClassifyError>>>,
        gate: Option<Arc<Notify>>,
    }

    impl ScriptedClassifier {
        fn new(replies: Vec<Result<ClassificationResult, ClassifyError>>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                inputs: std::sync::Mutex::new(Vec::new()),
                replies: std::sync::Mutex::new(replies),
                gate: None,
            }
        }

        fn gated(mut self, gate: Arc<Notify>) -> Self {
            self.gate = Some(gate);
            self
        }
    }

    #[async_trait]
    impl Classifier for ScriptedClassifier {
        fn name(&self) -> &str {
            "scripted"
        }

        fn is_configured(&self) -> bool {
            true
        }

        async fn classify(&self, json_text: &str) -> Result<ClassificationResult, ClassifyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inputs.lock().unwrap().push(json_text.to_string());
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.replies.lock().unwrap().remove(0)
        }
    }

    #[derive(Default)]
    struct PanickingClassifier {
        started: AtomicBool,
    }

    #[async_trait]
    impl Classifier for PanickingClassifier {
        fn name(&self) -> &str {
            "panicking"
        }

        fn is_configured(&self) -> bool {
            true
        }

        async fn classify(&self, _json_text: &str) -> Result<ClassificationResult, ClassifyError> {
            self.started.store(true, Ordering::SeqCst);
            panic!("classifier exploded");
        }
    }

    fn verdict(has: bool, reasoning: Option<&str>) -> ClassificationResult {
        ClassificationResult {
            has_quantitative_data: has,
            reasoning: reasoning.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_valid_input_invokes_classifier_once_with_raw_text() {
        let classifier = Arc::new(ScriptedClassifier::new(vec![Ok(verdict(true, Some("Km")))]));
        let session = Arc::new(ClassificationSession::new(classifier.clone()));

        let raw = "{ \"text_content\" : \"Km = 5 μM\" }";
        let outcome = session.submit(raw).await.unwrap();

        assert_eq!(outcome, Outcome::Success(verdict(true, Some("Km"))));
        assert_eq!(session.outcome(), outcome);
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 1);
        assert_eq!(classifier.inputs.lock().unwrap().as_slice(), &[raw.to_string()]);
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_classifier() {
        let classifier = Arc::new(ScriptedClassifier::new(vec![]));
        let session = Arc::new(ClassificationSession::new(classifier.clone()));

        assert_eq!(
            session.submit("   ").await,
            Err(SubmitError::Validation(ValidationError::Empty))
        );
        assert!(matches!(
            session.submit(r#"{"a":}"#).await,
            Err(SubmitError::Validation(ValidationError::InvalidJson { .. }))
        ));
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
        assert!(session.outcome().is_pending());
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn test_validation_failure_keeps_previous_outcome() {
        let classifier = Arc::new(ScriptedClassifier::new(vec![Ok(verdict(false, None))]));
        let session = Arc::new(ClassificationSession::new(classifier));

        session.submit("{}").await.unwrap();
        assert!(session.submit("").await.is_err());
        assert_eq!(session.outcome(), Outcome::Success(verdict(false, None)));
    }

    #[tokio::test]
    async fn test_failure_replaces_previous_result() {
        let classifier = Arc::new(ScriptedClassifier::new(vec![
            Ok(verdict(true, Some("first"))),
            Err(ClassifyError::transport("connection reset")),
        ]));
        let session = Arc::new(ClassificationSession::new(classifier));

        session.submit("{}").await.unwrap();
        let outcome = session.submit("{}").await.unwrap();

        assert_eq!(outcome, Outcome::Failure(ApiResponseError::new("connection reset")));
        assert_eq!(session.outcome(), outcome);
    }

    #[tokio::test]
    async fn test_busy_while_in_flight_and_second_submission_rejected() {
        let gate = Arc::new(Notify::new());
        let classifier = Arc::new(
            ScriptedClassifier::new(vec![Ok(verdict(true, None))]).gated(gate.clone()),
        );
        let session = Arc::new(ClassificationSession::new(classifier.clone()));

        let first = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.submit("{}").await })
        };

        while classifier.calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }
        assert!(session.is_busy());
        assert!(session.outcome().is_pending());

        assert_eq!(session.submit("{}").await, Err(SubmitError::Busy));

        gate.notify_one();
        let outcome = first.await.unwrap().unwrap();

        assert_eq!(outcome, Outcome::Success(verdict(true, None)));
        assert!(!session.is_busy());
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_panicking_classifier_becomes_failure() {
        let session = Arc::new(ClassificationSession::new(Arc::new(
            PanickingClassifier::default(),
        )));

        let outcome = session.submit("{}").await.unwrap();

        assert_eq!(
            outcome,
            Outcome::Failure(ApiResponseError::new(UNKNOWN_FAILURE_MESSAGE))
        );
        assert_eq!(session.outcome(), outcome);
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn test_panic_failure_is_stored_before_busy_clears() {
        let classifier = Arc::new(PanickingClassifier::default());
        let session = Arc::new(ClassificationSession::new(classifier.clone()));

        let submit = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.submit("{}").await })
        };

        while !classifier.started.load(Ordering::SeqCst) || session.is_busy() {
            tokio::task::yield_now().await;
        }

        // The submitting task may not have resumed yet
        assert_eq!(
            session.outcome(),
            Outcome::Failure(ApiResponseError::new(UNKNOWN_FAILURE_MESSAGE))
        );
        submit.await.unwrap().unwrap();
    }
}
