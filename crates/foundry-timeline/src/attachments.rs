//! Attachment bookkeeping: file edits, download URLs and viewer filtering.

use tracing::debug;
use url::Url;

use foundry_models::{
    Attachment, FileMetadata, FounderId, TimelineEvent, TimelineEventFile, TimelineEventFileId,
    TimelineEventId,
};
use foundry_persistence::Database;

use crate::error::{Result, TimelineError};
use crate::submission::Uploads;

/// Builds the download URL of an attached file.
pub fn download_url(
    public_url: &Url,
    startup_slug: &str,
    event_id: &TimelineEventId,
    file_id: &TimelineEventFileId,
) -> Result<Url> {
    let path = format!(
        "startups/{}/timeline_events/{}/timeline_event_files/{}/download",
        startup_slug, event_id, file_id
    );
    Ok(public_url.join(&path)?)
}

/// Applies a batch of file edits to an event.
///
/// Must run inside a store transaction: the first missing file or upload
/// aborts the batch and the transaction discards the edits already made.
pub fn sync_attachments(
    db: &mut Database,
    event_id: &TimelineEventId,
    files: &[FileMetadata],
    uploads: &Uploads,
) -> Result<()> {
    for meta in files {
        if meta.persisted {
            if meta.delete {
                let file_id = TimelineEventFileId::from(meta.identifier.as_str());
                let removed = db.remove_file(event_id, &file_id)?;
                debug!(event_id = %event_id, file_id = %removed.id, "removed attachment");
            }
            continue;
        }

        let content_ref = uploads
            .get(&meta.identifier)
            .ok_or_else(|| TimelineError::not_found("upload", &meta.identifier))?;
        let title = meta
            .title
            .clone()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| meta.identifier.clone());
        let file = TimelineEventFile::new(event_id.clone(), title, meta.private, content_ref.clone());
        debug!(event_id = %event_id, file_id = %file.id, "attached file");
        db.add_file(file);
    }
    Ok(())
}

/// Viewers who belong to the owning startup see private attachments.
pub fn is_privileged(db: &Database, event: &TimelineEvent, viewer: Option<&FounderId>) -> bool {
    viewer
        .and_then(|id| db.founders.get(id))
        .is_some_and(|founder| founder.belongs_to(&event.startup_id))
}

/// Files then links, in stored order, without private items unless the
/// viewer is privileged.
pub fn attachments_for(
    db: &Database,
    event: &TimelineEvent,
    viewer: Option<&FounderId>,
    public_url: &Url,
) -> Result<Vec<Attachment>> {
    let privileged = is_privileged(db, event, viewer);
    let slug = &db.startup(&event.startup_id)?.slug;

    let mut attachments = Vec::new();
    for file in db.files_for(&event.id) {
        if file.private && !privileged {
            continue;
        }
        attachments.push(Attachment::File {
            id: file.id.clone(),
            title: file.title.clone(),
            private: file.private,
            url: download_url(public_url, slug, &event.id, &file.id)?.to_string(),
        });
    }
    attachments.extend(
        event
            .links
            .iter()
            .filter(|link| privileged || !link.private)
            .cloned()
            .map(Attachment::Link),
    );
    Ok(attachments)
}
