/*
[INPUT]:  Draft snapshot handed over by the controller on submit
[OUTPUT]: Uploaded images, inserted submission row, per-upload report
[POS]:    Persistence saga - upload stage followed by insert stage
[UPDATE]: When the record layout, buckets, or object key scheme change
*/

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use street_art_adapter::{AdapterError, BlobStoreGateway, PersistenceGateway};
use thiserror::Error;
use tracing::{info, warn};

use crate::draft::{FileAttachment, SubmissionDraft};

/// Snapshot of the draft taken when submit was accepted
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionRequest {
    draft: SubmissionDraft,
}

impl SubmissionRequest {
    pub fn new(draft: SubmissionDraft) -> Self {
        Self { draft }
    }

    pub fn draft(&self) -> &SubmissionDraft {
        &self.draft
    }
}

/// Result of the upload stage for one image field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Uploaded { url: String },
    Failed { reason: String },
    /// No file was attached
    Missing,
}

impl UploadOutcome {
    /// Public URL, or `None` for a failed or absent upload
    pub fn url(&self) -> Option<&str> {
        match self {
            UploadOutcome::Uploaded { url } => Some(url),
            UploadOutcome::Failed { .. } | UploadOutcome::Missing => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, UploadOutcome::Failed { .. })
    }
}

/// Row written to the submission table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub artist_name: String,
    pub artist_email: String,
    pub artist_about: String,
    pub artist_image: Option<String>,
    pub artist_portfolio_link: String,
    pub artist_social_link: String,
    pub artwork_title: String,
    pub artwork_details: String,
    pub artwork_image: Option<String>,
    pub artwork_category: String,
    pub artwork_price: String,
    pub artwork_size: String,
}

impl SubmissionRecord {
    pub fn from_draft(
        draft: &SubmissionDraft,
        artist_image: Option<String>,
        artwork_image: Option<String>,
    ) -> Self {
        Self {
            artist_name: draft.artist_name.clone(),
            artist_email: draft.artist_email.clone(),
            artist_about: draft.artist_about.clone(),
            artist_image,
            artist_portfolio_link: draft.artist_portfolio_link.clone(),
            artist_social_link: draft.artist_social_link.clone(),
            artwork_title: draft.artwork_title.clone(),
            artwork_details: draft.artwork_details.clone(),
            artwork_image,
            artwork_category: draft.artwork_category.clone(),
            artwork_price: draft.artwork_price.clone(),
            artwork_size: draft.artwork_size.clone(),
        }
    }
}

/// What the saga did, for logging by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReport {
    pub artist_image: UploadOutcome,
    pub artwork_image: UploadOutcome,
    pub record: SubmissionRecord,
}

/// Table and buckets the saga writes to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionTargets {
    pub table: String,
    pub artist_bucket: String,
    pub artwork_bucket: String,
}

impl Default for SubmissionTargets {
    fn default() -> Self {
        Self {
            table: "street_art_submission".to_string(),
            artist_bucket: "artist-photos".to_string(),
            artwork_bucket: "artwork-images".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("failed to encode submission record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("insert into {table} failed: {source}")]
    Insert {
        table: String,
        #[source]
        source: AdapterError,
    },
}

/// Storage key: millisecond timestamp prefix plus the original file name
pub fn object_key(file_name: &str, now: DateTime<Utc>) -> String {
    format!("{}_{}", now.timestamp_millis(), file_name)
}

/// Upload-then-insert with no rollback.
///
/// Both uploads run concurrently and finish before the insert is issued. A
/// failed upload stores null for its image column; only the insert decides
/// whether the submission succeeded.
#[derive(Clone)]
pub struct SubmissionSaga {
    persistence: Arc<dyn PersistenceGateway>,
    blobs: Arc<dyn BlobStoreGateway>,
    targets: SubmissionTargets,
}

impl SubmissionSaga {
    pub fn new(
        persistence: Arc<dyn PersistenceGateway>,
        blobs: Arc<dyn BlobStoreGateway>,
        targets: SubmissionTargets,
    ) -> Self {
        Self {
            persistence,
            blobs,
            targets,
        }
    }

    pub fn targets(&self) -> &SubmissionTargets {
        &self.targets
    }

    pub async fn run(&self, request: SubmissionRequest) -> Result<SubmissionReport, SubmissionError> {
        let draft = request.draft;
        let now = Utc::now();

        let (artist_image, artwork_image) = tokio::join!(
            self.upload(&self.targets.artist_bucket, draft.artist_image.as_ref(), now),
            self.upload(&self.targets.artwork_bucket, draft.artwork_image.as_ref(), now),
        );

        let record = SubmissionRecord::from_draft(
            &draft,
            artist_image.url().map(str::to_string),
            artwork_image.url().map(str::to_string),
        );
        let payload = serde_json::to_value(&record)?;
        self.persistence
            .insert(&self.targets.table, payload)
            .await
            .map_err(|source| SubmissionError::Insert {
                table: self.targets.table.clone(),
                source,
            })?;

        info!(
            table = %self.targets.table,
            artist = %record.artist_name,
            artwork = %record.artwork_title,
            "submission stored"
        );
        Ok(SubmissionReport {
            artist_image,
            artwork_image,
            record,
        })
    }

    async fn upload(
        &self,
        bucket: &str,
        attachment: Option<&FileAttachment>,
        now: DateTime<Utc>,
    ) -> UploadOutcome {
        let Some(attachment) = attachment else {
            return UploadOutcome::Missing;
        };
        let key = object_key(attachment.file_name(), now);

        let bytes = match attachment.read().await {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(bucket, path = %attachment.path().display(), error = %err, "cannot read attachment");
                return UploadOutcome::Failed {
                    reason: format!("read {}: {err}", attachment.path().display()),
                };
            }
        };

        if let Err(err) = self
            .blobs
            .upload(bucket, &key, bytes, attachment.content_type())
            .await
        {
            warn!(bucket, key = %key, error = %err, "upload failed, storing null url");
            return UploadOutcome::Failed {
                reason: err.to_string(),
            };
        }

        match self.blobs.public_url(bucket, &key) {
            Ok(url) => {
                info!(bucket, key = %key, "image uploaded");
                UploadOutcome::Uploaded { url }
            }
            Err(err) => {
                warn!(bucket, key = %key, error = %err, "cannot resolve public url");
                UploadOutcome::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }
}
