use crate::domain::model::{DeletionOutcome, ProgressEvent, RunSummary, UserRecord};
use crate::domain::ports::{ProgressSink, UserDirectory};
use chrono::Utc;

const DELETED_STATUS: u16 = 204;

/// Sends one deletion request per record, strictly in order and without
/// retries. A failed record never stops the ones after it.
pub struct BatchProcessor<'a, D: UserDirectory, P: ProgressSink> {
    directory: &'a D,
    progress: &'a P,
}

impl<'a, D: UserDirectory, P: ProgressSink> BatchProcessor<'a, D, P> {
    pub fn new(directory: &'a D, progress: &'a P) -> Self {
        Self {
            directory,
            progress,
        }
    }

    pub async fn process(&self, records: Vec<UserRecord>) -> Vec<DeletionOutcome> {
        let total = records.len();
        let mut outcomes = Vec::with_capacity(total);

        for (index, record) in records.into_iter().enumerate() {
            let user_id = record.user_id.trim().to_string();

            self.progress.report(ProgressEvent::Processing {
                user_id: user_id.clone(),
                position: index + 1,
                total,
            });

            let outcome = self.delete_one(user_id).await;
            if !outcome.succeeded {
                tracing::warn!(
                    "Failed to delete user {} (status: {}): {}",
                    outcome.user_id,
                    outcome
                        .status_code
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "none".to_string()),
                    outcome.error.as_deref().unwrap_or_default()
                );
            }
            outcomes.push(outcome);

            self.progress.report(ProgressEvent::Completed {
                processed: index + 1,
                total,
            });
        }

        outcomes
    }

    pub async fn run(&self, records: Vec<UserRecord>) -> RunSummary {
        let started_at = Utc::now();
        let outcomes = self.process(records).await;
        RunSummary::from_outcomes(outcomes, started_at, Utc::now())
    }

    async fn delete_one(&self, user_id: String) -> DeletionOutcome {
        if let Some(reason) = UserRecord::unusable_id_reason(&user_id) {
            return DeletionOutcome::unreachable(user_id, reason);
        }

        match self.directory.delete_user(&user_id).await {
            Ok(response) if response.status == DELETED_STATUS => {
                tracing::debug!("Deleted user {}", user_id);
                DeletionOutcome::deleted(user_id)
            }
            Ok(response) => DeletionOutcome::rejected(user_id, response.status, response.body),
            Err(e) => DeletionOutcome::unreachable(user_id, e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::DeleteResponse;
    use crate::utils::error::{DeleteError, Result};
    use std::collections::HashMap;
    use std::sync::Mutex;

    enum Scripted {
        Status(u16, &'static str),
        Unreachable(&'static str),
    }

    struct FakeDirectory {
        responses: HashMap<&'static str, Scripted>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeDirectory {
        fn new(responses: Vec<(&'static str, Scripted)>) -> Self {
            Self {
                responses: responses.into_iter().collect(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl UserDirectory for FakeDirectory {
        async fn delete_user(&self, user_id: &str) -> Result<DeleteResponse> {
            self.calls.lock().unwrap().push(user_id.to_string());
            match self.responses.get(user_id) {
                Some(Scripted::Status(status, body)) => Ok(DeleteResponse {
                    status: *status,
                    body: body.to_string(),
                }),
                Some(Scripted::Unreachable(message)) => Err(DeleteError::Transport {
                    message: message.to_string(),
                }),
                None => Ok(DeleteResponse {
                    status: 204,
                    body: String::new(),
                }),
            }
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        events: Mutex<Vec<ProgressEvent>>,
    }

    impl ProgressSink for RecordingProgress {
        fn report(&self, event: ProgressEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    fn records(ids: &[&str]) -> Vec<UserRecord> {
        ids.iter().map(UserRecord::new).collect()
    }

    #[tokio::test]
    async fn test_all_deleted() {
        let directory = FakeDirectory::new(vec![]);
        let progress = RecordingProgress::default();
        let processor = BatchProcessor::new(&directory, &progress);

        let summary = processor.run(records(&["A", "B", "C"])).await;

        assert_eq!(summary.total, 3);
        assert_eq!(summary.succeeded, 3);
        assert!(summary.failures.is_empty());
        assert_eq!(summary.success_message(), "Successfully deleted 3 out of 3 users");
    }

    #[tokio::test]
    async fn test_outcomes_keep_input_order() {
        let directory = FakeDirectory::new(vec![
            ("B", Scripted::Status(404, "not found")),
            ("D", Scripted::Unreachable("connection refused")),
        ]);
        let progress = RecordingProgress::default();
        let processor = BatchProcessor::new(&directory, &progress);

        let outcomes = processor.process(records(&["A", "B", "C", "D", "E"])).await;

        let ids: Vec<&str> = outcomes.iter().map(|o| o.user_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C", "D", "E"]);
        assert_eq!(directory.calls(), vec!["A", "B", "C", "D", "E"]);
    }

    #[tokio::test]
    async fn test_not_found_is_failure_and_run_continues() {
        let directory = FakeDirectory::new(vec![("B", Scripted::Status(404, "not found"))]);
        let progress = RecordingProgress::default();
        let processor = BatchProcessor::new(&directory, &progress);

        let outcomes = processor.process(records(&["A", "B", "C"])).await;

        assert_eq!(outcomes[1], DeletionOutcome::rejected("B", 404, "not found"));
        assert!(outcomes[0].succeeded);
        assert!(outcomes[2].succeeded);
    }

    #[tokio::test]
    async fn test_transport_error_has_no_status() {
        let directory =
            FakeDirectory::new(vec![("A", Scripted::Unreachable("dns error: no such host"))]);
        let progress = RecordingProgress::default();
        let processor = BatchProcessor::new(&directory, &progress);

        let outcomes = processor.process(records(&["A"])).await;

        assert!(!outcomes[0].succeeded);
        assert_eq!(outcomes[0].status_code, None);
        assert!(outcomes[0]
            .error
            .as_deref()
            .unwrap()
            .contains("dns error: no such host"));
    }

    #[tokio::test]
    async fn test_other_success_statuses_are_failures() {
        let directory = FakeDirectory::new(vec![("A", Scripted::Status(200, "{}"))]);
        let progress = RecordingProgress::default();
        let processor = BatchProcessor::new(&directory, &progress);

        let summary = processor.run(records(&["A"])).await;

        assert_eq!(summary.succeeded, 0);
        assert_eq!(summary.failures[0].status_code, Some(200));
    }

    #[tokio::test]
    async fn test_unusable_ids_fail_without_a_request() {
        let directory = FakeDirectory::new(vec![]);
        let progress = RecordingProgress::default();
        let processor = BatchProcessor::new(&directory, &progress);

        let summary = processor.run(records(&["A", "", "  ", ".", "..", "B"])).await;

        assert_eq!(directory.calls(), vec!["A", "B"]);
        assert_eq!(summary.total, 6);
        assert_eq!(summary.succeeded, 2);
        let failed: Vec<&str> = summary.failures.iter().map(|f| f.user_id.as_str()).collect();
        assert_eq!(failed, vec!["", "", ".", ".."]);
        assert!(summary.failures.iter().all(|f| f.status_code.is_none()));
        assert_eq!(summary.failures[0].error.as_deref(), Some("user_id is empty"));
        assert_eq!(
            summary.failures[3].error.as_deref(),
            Some("user_id is not a valid path segment")
        );
    }

    #[tokio::test]
    async fn test_no_retries() {
        let directory = FakeDirectory::new(vec![("A", Scripted::Status(503, "unavailable"))]);
        let progress = RecordingProgress::default();
        let processor = BatchProcessor::new(&directory, &progress);

        processor.process(records(&["A"])).await;

        assert_eq!(directory.calls(), vec!["A"]);
    }

    #[tokio::test]
    async fn test_progress_events_per_record() {
        let directory = FakeDirectory::new(vec![("B", Scripted::Status(500, "server error"))]);
        let progress = RecordingProgress::default();
        let processor = BatchProcessor::new(&directory, &progress);

        processor.process(records(&["A", "B"])).await;

        let events = progress.events.lock().unwrap().clone();
        assert_eq!(
            events,
            vec![
                ProgressEvent::Processing {
                    user_id: "A".to_string(),
                    position: 1,
                    total: 2
                },
                ProgressEvent::Completed {
                    processed: 1,
                    total: 2
                },
                ProgressEvent::Processing {
                    user_id: "B".to_string(),
                    position: 2,
                    total: 2
                },
                ProgressEvent::Completed {
                    processed: 2,
                    total: 2
                },
            ]
        );
        assert_eq!(events.last().unwrap().fraction(), 1.0);
    }

    #[tokio::test]
    async fn test_empty_input_makes_no_calls() {
        let directory = FakeDirectory::new(vec![]);
        let progress = RecordingProgress::default();
        let processor = BatchProcessor::new(&directory, &progress);

        let summary = processor.run(Vec::new()).await;

        assert_eq!(summary.total, 0);
        assert!(directory.calls().is_empty());
        assert!(progress.events.lock().unwrap().is_empty());
    }
}
