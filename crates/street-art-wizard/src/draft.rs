/*
[INPUT]:  Field edits and local file paths from the front end
[OUTPUT]: SubmissionDraft aggregate, Field identifiers, FileAttachment handles
[POS]:    Domain model - the single in-progress submission
[UPDATE]: When submission columns or attachment metadata change
*/

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use street_art_adapter::Filters;
use thiserror::Error;

/// Every editable column of a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    ArtistName,
    ArtistEmail,
    ArtistAbout,
    ArtistImage,
    ArtistPortfolioLink,
    ArtistSocialLink,
    ArtworkTitle,
    ArtworkDetails,
    ArtworkImage,
    ArtworkCategory,
    ArtworkPrice,
    ArtworkSize,
}

/// How a field is edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    LongText,
    File,
}

impl Field {
    pub const ALL: [Field; 12] = [
        Field::ArtistName,
        Field::ArtistEmail,
        Field::ArtistAbout,
        Field::ArtistImage,
        Field::ArtistPortfolioLink,
        Field::ArtistSocialLink,
        Field::ArtworkTitle,
        Field::ArtworkDetails,
        Field::ArtworkImage,
        Field::ArtworkCategory,
        Field::ArtworkPrice,
        Field::ArtworkSize,
    ];

    /// Column name in the submission table
    pub fn column(self) -> &'static str {
        match self {
            Field::ArtistName => "artistName",
            Field::ArtistEmail => "artistEmail",
            Field::ArtistAbout => "artistAbout",
            Field::ArtistImage => "artistImage",
            Field::ArtistPortfolioLink => "artistPortfolioLink",
            Field::ArtistSocialLink => "artistSocialLink",
            Field::ArtworkTitle => "artworkTitle",
            Field::ArtworkDetails => "artworkDetails",
            Field::ArtworkImage => "artworkImage",
            Field::ArtworkCategory => "artworkCategory",
            Field::ArtworkPrice => "artworkPrice",
            Field::ArtworkSize => "artworkSize",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::ArtistName => "Artist Name",
            Field::ArtistEmail => "Artist Email",
            Field::ArtistAbout => "Artist About",
            Field::ArtistImage => "Artist Image",
            Field::ArtistPortfolioLink => "Artist Portfolio Link",
            Field::ArtistSocialLink => "Artist Social Link",
            Field::ArtworkTitle => "Artwork Title",
            Field::ArtworkDetails => "Artwork Details",
            Field::ArtworkImage => "Artwork Image",
            Field::ArtworkCategory => "Artwork Category",
            Field::ArtworkPrice => "Artwork Price",
            Field::ArtworkSize => "Artwork Size",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Field::ArtistImage | Field::ArtworkImage => FieldKind::File,
            Field::ArtistAbout | Field::ArtworkDetails => FieldKind::LongText,
            _ => FieldKind::Text,
        }
    }

    /// Part of the (name, email) pair that identifies a returning artist
    pub fn is_identity(self) -> bool {
        matches!(self, Field::ArtistName | Field::ArtistEmail)
    }

    /// Only collected from artists submitting for the first time
    pub fn is_new_artist_only(self) -> bool {
        matches!(
            self,
            Field::ArtistAbout
                | Field::ArtistImage
                | Field::ArtistPortfolioLink
                | Field::ArtistSocialLink
        )
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Errors raised while attaching a local file
#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} is not a regular file")]
    NotAFile(PathBuf),

    #[error("{0} has no file name")]
    NoFileName(PathBuf),
}

/// Local file chosen for an image field, not yet uploaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttachment {
    path: PathBuf,
    file_name: String,
    size_bytes: u64,
    content_type: String,
    dimensions: Option<(u32, u32)>,
}

impl FileAttachment {
    /// Build a handle from already-known metadata; the MIME type is guessed
    /// from the extension.
    pub fn from_metadata(path: impl Into<PathBuf>, size_bytes: u64) -> Result<Self, AttachmentError> {
        let path = path.into();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .ok_or_else(|| AttachmentError::NoFileName(path.clone()))?;
        let content_type = mime_guess::from_path(&path)
            .first_raw()
            .unwrap_or("application/octet-stream")
            .to_string();

        Ok(Self {
            path,
            file_name,
            size_bytes,
            content_type,
            dimensions: None,
        })
    }

    /// Inspect a file on disk: it must be a readable regular file. Image
    /// dimensions are probed when the format is decodable.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, AttachmentError> {
        let path = path.as_ref().to_path_buf();
        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|source| AttachmentError::Io {
                path: path.clone(),
                source,
            })?;
        if !metadata.is_file() {
            return Err(AttachmentError::NotAFile(path));
        }

        let mut attachment = Self::from_metadata(path.clone(), metadata.len())?;
        attachment.dimensions = tokio::task::spawn_blocking(move || image::image_dimensions(&path).ok())
            .await
            .ok()
            .flatten();
        Ok(attachment)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.dimensions
    }

    /// Read the file contents for upload
    pub async fn read(&self) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }

    /// One-line preview: name, size, type and dimensions when known
    pub fn preview(&self) -> String {
        let mut parts = vec![
            self.file_name.clone(),
            human_size(self.size_bytes),
            self.content_type.clone(),
        ];
        if let Some((width, height)) = self.dimensions {
            parts.push(format!("{width}x{height}"));
        }
        parts.join(" · ")
    }
}

fn human_size(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    let value = bytes as f64;
    if value < KIB {
        format!("{bytes} B")
    } else if value < KIB * KIB {
        format!("{:.1} KB", value / KIB)
    } else {
        format!("{:.1} MB", value / (KIB * KIB))
    }
}

/// The (name, email) pair used to detect a returning artist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistIdentity {
    pub name: String,
    pub email: String,
}

impl ArtistIdentity {
    /// Columns fetched by the returning-artist lookup
    pub const COLUMNS: [&'static str; 2] = ["artistName", "artistEmail"];

    /// Exact-match filters on both identity columns
    pub fn to_filters(&self) -> Filters {
        Filters::new()
            .eq(Field::ArtistName.column(), self.name.clone())
            .eq(Field::ArtistEmail.column(), self.email.clone())
    }
}

/// The in-progress submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionDraft {
    pub artist_name: String,
    pub artist_email: String,
    pub artist_about: String,
    pub artist_image: Option<FileAttachment>,
    pub artist_portfolio_link: String,
    pub artist_social_link: String,
    pub artwork_title: String,
    pub artwork_details: String,
    pub artwork_image: Option<FileAttachment>,
    pub artwork_category: String,
    pub artwork_price: String,
    pub artwork_size: String,
}

impl SubmissionDraft {
    pub fn text(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::ArtistName => &self.artist_name,
            Field::ArtistEmail => &self.artist_email,
            Field::ArtistAbout => &self.artist_about,
            Field::ArtistPortfolioLink => &self.artist_portfolio_link,
            Field::ArtistSocialLink => &self.artist_social_link,
            Field::ArtworkTitle => &self.artwork_title,
            Field::ArtworkDetails => &self.artwork_details,
            Field::ArtworkCategory => &self.artwork_category,
            Field::ArtworkPrice => &self.artwork_price,
            Field::ArtworkSize => &self.artwork_size,
            Field::ArtistImage | Field::ArtworkImage => return None,
        };
        Some(value.as_str())
    }

    pub(crate) fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        let value = match field {
            Field::ArtistName => &mut self.artist_name,
            Field::ArtistEmail => &mut self.artist_email,
            Field::ArtistAbout => &mut self.artist_about,
            Field::ArtistPortfolioLink => &mut self.artist_portfolio_link,
            Field::ArtistSocialLink => &mut self.artist_social_link,
            Field::ArtworkTitle => &mut self.artwork_title,
            Field::ArtworkDetails => &mut self.artwork_details,
            Field::ArtworkCategory => &mut self.artwork_category,
            Field::ArtworkPrice => &mut self.artwork_price,
            Field::ArtworkSize => &mut self.artwork_size,
            Field::ArtistImage | Field::ArtworkImage => return None,
        };
        Some(value)
    }

    pub fn attachment(&self, field: Field) -> Option<&FileAttachment> {
        match field {
            Field::ArtistImage => self.artist_image.as_ref(),
            Field::ArtworkImage => self.artwork_image.as_ref(),
            _ => None,
        }
    }

    pub(crate) fn attachment_slot(&mut self, field: Field) -> Option<&mut Option<FileAttachment>> {
        match field {
            Field::ArtistImage => Some(&mut self.artist_image),
            Field::ArtworkImage => Some(&mut self.artwork_image),
            _ => None,
        }
    }

    /// Non-empty text or an attached file. Whitespace counts as content.
    pub fn is_present(&self, field: Field) -> bool {
        match field.kind() {
            FieldKind::File => self.attachment(field).is_some(),
            FieldKind::Text | FieldKind::LongText => {
                self.text(field).is_some_and(|value| !value.is_empty())
            }
        }
    }

    /// Identity pair, once both halves are filled in. Values are kept as
    /// typed since matching is exact.
    pub fn identity(&self) -> Option<ArtistIdentity> {
        if self.is_present(Field::ArtistName) && self.is_present(Field::ArtistEmail) {
            Some(ArtistIdentity {
                name: self.artist_name.clone(),
                email: self.artist_email.clone(),
            })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_and_file_accessors_are_disjoint() {
        let mut draft = SubmissionDraft::default();
        for field in Field::ALL {
            let is_file = field.kind() == FieldKind::File;
            assert_eq!(draft.text(field).is_none(), is_file, "{field}");
            assert_eq!(draft.text_mut(field).is_none(), is_file, "{field}");
            assert_eq!(draft.attachment_slot(field).is_some(), is_file, "{field}");
        }
    }

    #[test]
    fn test_only_empty_text_is_missing() {
        let draft = SubmissionDraft {
            artist_name: " ".to_string(),
            artist_email: "a@b.c".to_string(),
            ..SubmissionDraft::default()
        };
        assert!(draft.is_present(Field::ArtistName));
        assert!(draft.is_present(Field::ArtistEmail));
        assert!(!draft.is_present(Field::ArtistAbout));
        assert!(!draft.is_present(Field::ArtistImage));

        let identity = draft.identity().expect("both identity fields are non-empty");
        assert_eq!(identity.name, " ");
    }

    #[test]
    fn test_identity_filters_use_column_names() {
        let identity = ArtistIdentity {
            name: "Banksy".to_string(),
            email: "b@example.com".to_string(),
        };
        let pairs = identity.to_filters().to_query_pairs();
        assert_eq!(pairs[0], ("artistName".to_string(), "eq.Banksy".to_string()));
        assert_eq!(pairs[1], ("artistEmail".to_string(), "eq.b@example.com".to_string()));
        assert_eq!(
            ArtistIdentity::COLUMNS,
            [Field::ArtistName.column(), Field::ArtistEmail.column()]
        );
    }

    #[test]
    fn test_attachment_metadata_and_preview() {
        let attachment = FileAttachment::from_metadata("/tmp/wall piece.png", 2048).expect("attachment");
        assert_eq!(attachment.file_name(), "wall piece.png");
        assert_eq!(attachment.content_type(), "image/png");
        assert_eq!(attachment.preview(), "wall piece.png · 2.0 KB · image/png");
    }

    #[test]
    fn test_unknown_extension_falls_back_to_octet_stream() {
        let attachment = FileAttachment::from_metadata("/tmp/scan.zzz", 10).expect("attachment");
        assert_eq!(attachment.content_type(), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_open_rejects_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = FileAttachment::open(dir.path()).await.unwrap_err();
        assert!(matches!(err, AttachmentError::NotAFile(_)));
    }

    #[tokio::test]
    async fn test_open_reads_size_of_non_image_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello").expect("write fixture");

        let attachment = FileAttachment::open(&path).await.expect("open");
        assert_eq!(attachment.size_bytes(), 5);
        assert_eq!(attachment.dimensions(), None);
        assert_eq!(attachment.read().await.expect("read"), b"hello");
    }
}
