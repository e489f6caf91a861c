//! Transcode status polling.

use crate::error::{PlatformError, Result};
use crate::platform::MediaPlatform;
use crate::types::PollSettings;
use playcard_core::TranscodeDescriptor;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// How a poll ended when it did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Ready(TranscodeDescriptor),
    /// Stopped by the caller; the upload itself is still valid
    Cancelled,
}

impl PollOutcome {
    pub fn into_descriptor(self) -> Option<TranscodeDescriptor> {
        match self {
            Self::Ready(descriptor) => Some(descriptor),
            Self::Cancelled => None,
        }
    }
}

/// Query transcode status until a descriptor is reported.
///
/// Returns as soon as a descriptor is available. Sleeps `settings.interval`
/// between checks and gives up with `TranscodeTimedOut` after
/// `settings.max_attempts` checks. Cancellation is honoured both during a
/// query and during the sleep.
pub async fn poll_transcode<P>(
    platform: &P,
    slot_id: &str,
    settings: &PollSettings,
    cancel: &CancellationToken,
) -> Result<PollOutcome>
where
    P: MediaPlatform + ?Sized,
{
    for attempt in 1..=settings.max_attempts {
        let status = tokio::select! {
            biased;
            () = cancel.cancelled() => return Ok(cancelled(slot_id, attempt)),
            status = platform.transcode_status(slot_id, settings.loudnorm) => status?,
        };

        if let Some(descriptor) = status {
            info!(slot_id, attempt, content_id = %descriptor.content_id, "Transcode ready");
            return Ok(PollOutcome::Ready(descriptor));
        }

        debug!(slot_id, attempt, "Transcode pending");

        tokio::select! {
            biased;
            () = cancel.cancelled() => return Ok(cancelled(slot_id, attempt)),
            () = tokio::time::sleep(settings.interval) => {}
        }
    }

    Err(PlatformError::TranscodeTimedOut {
        slot_id: slot_id.to_string(),
        attempts: settings.max_attempts,
    })
}

fn cancelled(slot_id: &str, attempt: u32) -> PollOutcome {
    info!(slot_id, attempt, "Transcode polling cancelled");
    PollOutcome::Cancelled
}
