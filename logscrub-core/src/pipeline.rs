// logscrub-core/src/pipeline.rs
//! Invocation adapters: download, scrub and re-upload one object per invocation.
//!
//! [`Scrubber::handle_event`] is the only entry point a host runtime needs. It never
//! returns an error. Every failure below it is logged with its kind, message and
//! source chain, then folded into the terminal result of the active protocol:
//! `false` for event notifications and unrecognized payloads, a `PermanentFailure`
//! task result for batch jobs.

use std::error::Error;
use std::sync::Arc;

use log::{error, info, warn};
use serde::Serialize;
use serde_json::json;

use crate::config::ScrubConfig;
use crate::engine::{ScrubEngine, ScrubOutcome};
use crate::errors::ScrubError;
use crate::invocation::{
    BatchJobRequest, BatchJobResponse, InvocationEvent, InvocationResult, ObjectRef, TaskResult,
};
use crate::store::ObjectStore;
use crate::GenericValue;

/// Outcome of scrubbing one stored object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrubReport {
    pub bucket: String,
    pub source_key: String,
    pub destination_key: String,
    pub source_deleted: bool,
    #[serde(flatten)]
    pub outcome: ScrubOutcome,
}

pub struct Scrubber {
    store: Arc<dyn ObjectStore>,
    engine: ScrubEngine,
    config: ScrubConfig,
}

impl Scrubber {
    pub fn new(store: Arc<dyn ObjectStore>, config: ScrubConfig) -> Result<Self, ScrubError> {
        let engine = ScrubEngine::new(&config)?;
        Ok(Self {
            store,
            engine,
            config,
        })
    }

    pub fn engine(&self) -> &ScrubEngine {
        &self.engine
    }

    /// Runs the full pipeline for one object: get, scrub, put, optional delete.
    pub async fn scrub_object(&self, object: &ObjectRef) -> Result<ScrubReport, ScrubError> {
        let ObjectRef { bucket, key } = object;
        info!("Scrubbing s3://{}/{}", bucket, key);

        let body = self.store.get(bucket, key).await?;
        info!("Downloaded s3://{}/{} ({} bytes)", bucket, key, body.len());

        let (cleaned, outcome) = self.engine.scrub_bytes(&body)?;

        let destination_key = self.config.destination_key(key);
        self.store.put(bucket, &destination_key, cleaned).await?;
        info!("Uploaded cleaned object to s3://{}/{}", bucket, destination_key);

        let mut source_deleted = false;
        if self.config.delete_source && destination_key != *key {
            self.store.delete(bucket, key).await?;
            info!("Deleted source object s3://{}/{}", bucket, key);
            source_deleted = true;
        }

        Ok(ScrubReport {
            bucket: bucket.clone(),
            source_key: key.clone(),
            destination_key,
            source_deleted,
            outcome,
        })
    }

    /// Dispatches a raw invocation payload to the matching protocol.
    pub async fn handle_event(&self, event: &GenericValue) -> InvocationResult {
        match InvocationEvent::from_value(event) {
            Ok(InvocationEvent::Notification(object)) => self.handle_notification(&object).await,
            Ok(InvocationEvent::BatchJob(request)) => self.handle_batch_job(&request).await,
            Err(ScrubError::UnrecognizedEvent) => {
                warn!("Ignoring unrecognized invocation event: neither 'Records' nor 'tasks' present.");
                InvocationResult::Status(false)
            }
            Err(e) => {
                log_failure(&e);
                InvocationResult::Status(false)
            }
        }
    }

    /// Event-notification protocol: `true` on success, `false` on any failure.
    pub async fn handle_notification(&self, object: &ObjectRef) -> InvocationResult {
        info!("Added file to S3 bucket {}: {}", object.bucket, object.key);
        match self.scrub_object(object).await {
            Ok(report) => {
                info!(
                    "Finished processing {} ({} record(s), {} field(s) nulled)",
                    report.source_key,
                    report.outcome.records,
                    report.outcome.total_nulled()
                );
                InvocationResult::Status(true)
            }
            Err(e) => {
                log_failure(&e);
                InvocationResult::Status(false)
            }
        }
    }

    /// Batch-job protocol: the first task is processed and reported in the envelope.
    pub async fn handle_batch_job(&self, request: &BatchJobRequest) -> InvocationResult {
        let Some(task) = request.tasks.first() else {
            log_failure(&ScrubError::Event("batch job has no tasks".to_string()));
            return InvocationResult::Status(false);
        };
        if request.tasks.len() > 1 {
            warn!(
                "Batch job carries {} tasks; only task '{}' is processed.",
                request.tasks.len(),
                task.task_id
            );
        }

        let object = task.object_ref();
        let result = match self.scrub_object(&object).await {
            Ok(report) => {
                info!("Task {} succeeded for {}", task.task_id, report.source_key);
                TaskResult::succeeded(&task.task_id, &object.key)
            }
            Err(e) => {
                log_failure(&e);
                TaskResult::permanent_failure(&task.task_id, &e)
            }
        };

        InvocationResult::BatchJob(BatchJobResponse::new(request, result))
    }
}

/// Logs a failure as one structured JSON line: kind, message and source chain.
pub fn log_failure(err: &ScrubError) {
    let mut stack_trace = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        stack_trace.push(cause.to_string());
        source = cause.source();
    }
    let message = json!({
        "errorType": err.kind(),
        "errorMessage": err.to_string(),
        "stackTrace": stack_trace,
    });
    error!("{}", message);
}
