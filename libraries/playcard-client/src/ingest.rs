//! Batch ingestion: hash, negotiate, transfer and wait for each file.
//!
//! All state (seen identities, progress counter, results) is local to one
//! call, so independent batches may run concurrently.

use crate::error::{PlatformError, Result};
use crate::platform::MediaPlatform;
use crate::poller::{poll_transcode, PollOutcome};
use crate::source::{dedupe_files, SourceFile};
use crate::types::{FailurePolicy, IngestOptions, IngestProgress, PollSettings};
use futures_util::stream::{self, StreamExt};
use playcard_core::{content_id, dedupe_by_content, IngestedFile};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// A file that could not be ingested.
#[derive(Debug)]
pub struct IngestFailure {
    pub file_name: String,
    pub error: PlatformError,
}

/// Outcome of a batch.
///
/// `ingested` is in selection order with content duplicates removed. Under
/// [`FailurePolicy::Abort`] it holds only files that finished before the
/// first failure, and `failures` has at most one entry.
#[derive(Debug, Default)]
pub struct IngestReport {
    pub ingested: Vec<IngestedFile>,
    pub failures: Vec<IngestFailure>,
    /// The batch was stopped through its cancellation token
    pub cancelled: bool,
}

impl IngestReport {
    /// Every selected file made it through
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && !self.cancelled
    }

    /// The error that stopped or first disturbed the batch
    pub fn first_error(&self) -> Option<&PlatformError> {
        self.failures.first().map(|failure| &failure.error)
    }
}

enum FileOutcome {
    Ingested(IngestedFile),
    Cancelled,
}

/// Ingest a batch of files.
///
/// Repeated selections of the same file are dropped before any bytes are
/// read. With `options.concurrency` above 1 that many files are in flight
/// at once, but results and progress are still delivered in selection
/// order. `progress` is called after each file that completes while the
/// batch goes on.
pub async fn ingest_files<P, F>(
    platform: &P,
    files: Vec<SourceFile>,
    options: &IngestOptions,
    cancel: &CancellationToken,
    mut progress: F,
) -> IngestReport
where
    P: MediaPlatform + ?Sized,
    F: FnMut(IngestProgress) + Send,
{
    let files = dedupe_files(files);
    let total = files.len();
    let poll = &options.poll;

    info!(
        files = total,
        concurrency = options.concurrency,
        policy = ?options.failure_policy,
        "Starting ingest"
    );

    let mut pipelines = stream::iter(files.iter().map(move |file| async move {
        let outcome = if cancel.is_cancelled() {
            Ok(FileOutcome::Cancelled)
        } else {
            ingest_one(platform, file, poll, cancel).await
        };
        (file, outcome)
    }))
    .buffered(options.concurrency.max(1));

    let mut report = IngestReport::default();
    let mut completed = 0;

    while let Some((file, outcome)) = pipelines.next().await {
        match outcome {
            Ok(FileOutcome::Ingested(item)) => {
                report.ingested.push(item);
            }
            Ok(FileOutcome::Cancelled) => {
                report.cancelled = true;
                break;
            }
            Err(error) => {
                warn!(file = %file.name(), error = %error, "Ingest failed");
                report.failures.push(IngestFailure {
                    file_name: file.name().to_string(),
                    error,
                });
                if options.failure_policy == FailurePolicy::Abort {
                    break;
                }
            }
        }

        completed += 1;
        progress(IngestProgress {
            completed,
            total,
            current_file: file.name().to_string(),
        });
    }

    // Dropping the stream stops any pipelines still in flight
    drop(pipelines);

    let before = report.ingested.len();
    report.ingested = dedupe_by_content(report.ingested);

    info!(
        ingested = report.ingested.len(),
        duplicates = before - report.ingested.len(),
        failures = report.failures.len(),
        cancelled = report.cancelled,
        "Ingest finished"
    );

    report
}

async fn ingest_one<P>(
    platform: &P,
    file: &SourceFile,
    poll: &PollSettings,
    cancel: &CancellationToken,
) -> Result<FileOutcome>
where
    P: MediaPlatform + ?Sized,
{
    let bytes = file.read().await?;
    let local_id = content_id(&bytes);
    debug!(file = %file.name(), content_id = %local_id, "Hashed");

    let slot = platform.negotiate_upload(&local_id, Some(file.name())).await?;

    match slot.destination() {
        Some(destination) => {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    info!(file = %file.name(), "Transfer cancelled");
                    return Ok(FileOutcome::Cancelled);
                }
                sent = platform.transfer(destination, bytes, file.content_type()) => sent?,
            }
        }
        None => debug!(file = %file.name(), "Platform already holds this content"),
    }

    let descriptor = match poll_transcode(platform, &slot.slot_id, poll, cancel).await? {
        PollOutcome::Ready(descriptor) => descriptor,
        PollOutcome::Cancelled => return Ok(FileOutcome::Cancelled),
    };

    info!(
        file = %file.name(),
        slot_id = %slot.slot_id,
        content_id = %descriptor.content_id,
        "File ingested"
    );

    Ok(FileOutcome::Ingested(IngestedFile {
        file_name: file.name().to_string(),
        file_size: file.size(),
        local_id,
        descriptor,
        icon: file.icon().cloned(),
    }))
}
