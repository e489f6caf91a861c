//! Create, append, list and show workflows.
//!
//! Each workflow ingests first and writes the playlist last, so a batch
//! that aborts or is cancelled never leaves a half-updated card.

use crate::error::{CliError, Result};
use playcard_client::{
    mime_type_for_file, CardSummary, FailurePolicy, IngestOptions, IngestProgress, IngestReport,
    PlatformClient, SavedPlaylist, SourceFile,
};
use playcard_core::{
    build_chapters, compose_body, merge_chapters, sanitize_content, BodyOptions, IconRef,
    IngestedFile, MediaTotals, PlaylistContent,
};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Files and presentation for a new or extended playlist.
#[derive(Debug, Clone, Default)]
pub struct PlaylistRequest {
    pub files: Vec<SourceFile>,
    /// Icon for new chapters whose file carries none
    pub icon: Option<IconRef>,
    /// Large cover image URL, used on create only
    pub cover_image: Option<String>,
}

/// What a create or append did.
#[derive(Debug)]
pub struct PlaylistOutcome {
    pub card_id: Option<String>,
    pub title: String,
    pub content: PlaylistContent,
    /// Chapters that were not in the playlist before
    pub added: usize,
    pub report: IngestReport,
    pub saved: SavedPlaylist,
}

/// Expand the given paths into source files.
///
/// Directories contribute their audio files (not recursively), sorted by
/// name. Plain files are taken as given.
pub async fn collect_sources(paths: &[PathBuf]) -> Result<Vec<SourceFile>> {
    let mut files = Vec::new();

    for path in paths {
        if tokio::fs::metadata(path).await?.is_dir() {
            for entry in audio_files_in(path).await? {
                files.push(SourceFile::open(entry).await?);
            }
        } else {
            files.push(SourceFile::open(path).await?);
        }
    }

    Ok(files)
}

async fn audio_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut paths = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if entry.file_type().await?.is_file() && mime_type_for_file(&path).starts_with("audio/") {
            paths.push(path);
        }
    }

    paths.sort();
    Ok(paths)
}

/// Upload `request.files` and create a new playlist from them.
pub async fn create_playlist<F>(
    client: &PlatformClient,
    title: &str,
    request: PlaylistRequest,
    options: &IngestOptions,
    cancel: &CancellationToken,
    progress: F,
) -> Result<PlaylistOutcome>
where
    F: FnMut(IngestProgress) + Send,
{
    if request.files.is_empty() {
        return Err(CliError::NothingToAdd);
    }

    let mut report = client
        .ingest(request.files, options, cancel, progress)
        .await;
    let ingested = usable_results(&mut report, options.failure_policy)?;

    let chapters = build_chapters(&ingested, request.icon.as_ref());
    let content = merge_chapters(None, chapters, request.icon.as_ref())?;

    let body_options = BodyOptions {
        cover_image: request.cover_image,
        totals: Some(MediaTotals::of(&content)),
    };
    let body = compose_body(title, &content, &body_options, None);
    let saved = client.content().save(&body).await?;

    info!(card_id = ?saved.card_id, chapters = content.chapters.len(), "Playlist created");

    Ok(PlaylistOutcome {
        card_id: saved.card_id.clone(),
        title: title.to_string(),
        added: content.chapters.len(),
        content,
        report,
        saved,
    })
}

/// Upload `request.files` and append them to an existing playlist.
///
/// Tracks the playlist already holds are skipped; the whole content is
/// re-keyed and written back.
pub async fn append_to_playlist<F>(
    client: &PlatformClient,
    card_id: &str,
    title: Option<&str>,
    request: PlaylistRequest,
    options: &IngestOptions,
    cancel: &CancellationToken,
    progress: F,
) -> Result<PlaylistOutcome>
where
    F: FnMut(IngestProgress) + Send,
{
    if request.files.is_empty() {
        return Err(CliError::NothingToAdd);
    }

    // Fetch first so a wrong id fails before anything is uploaded
    let stored = client.content().fetch(card_id).await?;
    // Count after the same de-dup the merge applies, so collapsed
    // duplicates in the stored document are not mistaken for new chapters
    let before = merge_chapters(Some(&stored.document), Vec::new(), None)?
        .chapters
        .len();

    let mut report = client
        .ingest(request.files, options, cancel, progress)
        .await;
    let ingested = usable_results(&mut report, options.failure_policy)?;

    let chapters = build_chapters(&ingested, request.icon.as_ref());
    let content = merge_chapters(Some(&stored.document), chapters, request.icon.as_ref())?;

    let title = title
        .or_else(|| stored.title())
        .unwrap_or(card_id)
        .to_string();
    let body = compose_body(&title, &content, &BodyOptions::default(), Some(card_id));
    let saved = client.content().save(&body).await?;

    let added = content.chapters.len().saturating_sub(before);
    info!(card_id, added, chapters = content.chapters.len(), "Playlist updated");

    Ok(PlaylistOutcome {
        card_id: Some(card_id.to_string()),
        title,
        content,
        added,
        report,
        saved,
    })
}

/// Playlists owned by the configured account.
pub async fn list_playlists(client: &PlatformClient, show_deleted: bool) -> Result<Vec<CardSummary>> {
    Ok(client.content().list_mine(show_deleted).await?)
}

/// A stored playlist, sanitized the way a merge would read it.
pub async fn show_playlist(client: &PlatformClient, card_id: &str) -> Result<(String, PlaylistContent)> {
    let stored = client.content().fetch(card_id).await?;
    let content = sanitize_content(Some(&stored.document))?;
    let title = stored.title().unwrap_or(card_id).to_string();
    Ok((title, content))
}

/// Decide whether a batch's results may be written to a playlist.
///
/// Aborted and cancelled batches are not saved. Under skip-and-continue the
/// surviving files are saved as long as there is at least one.
fn usable_results(report: &mut IngestReport, policy: FailurePolicy) -> Result<Vec<IngestedFile>> {
    if report.cancelled {
        return Err(CliError::Cancelled {
            ingested: report.ingested.len(),
        });
    }

    if policy == FailurePolicy::Abort && !report.failures.is_empty() {
        let failure = report.failures.remove(0);
        return Err(CliError::IngestAborted {
            file: failure.file_name,
            ingested: report.ingested.len(),
            source: failure.error,
        });
    }

    for failure in &report.failures {
        warn!(file = %failure.file_name, error = %failure.error, "Skipped file");
    }

    if report.ingested.is_empty() {
        return Err(CliError::NothingToAdd);
    }

    Ok(report.ingested.clone())
}

/// Render a playlist as one line per chapter.
pub fn describe(title: &str, content: &PlaylistContent) -> String {
    let totals = MediaTotals::of(content);
    let mut out = format!(
        "{} ({} chapters, {})\n",
        title,
        content.chapters.len(),
        format_duration(totals.duration)
    );

    for chapter in &content.chapters {
        let Some(track) = chapter.track() else {
            continue;
        };
        out.push_str(&format!(
            "  {}  {:<40} {:>8}  {}\n",
            chapter.key,
            chapter.title,
            format_duration(track.duration),
            track.track_url.as_str()
        ));
    }

    out
}

/// Format seconds as `m:ss` or `h:mm:ss`
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    let (h, m, s) = (total / 3600, (total / 60) % 60, total % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}
