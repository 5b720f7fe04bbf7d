use thiserror::Error;
use url::Url;

use crate::model::ids::{ChapterId, PdfId, SubjectId, TopicId, VideoId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("title cannot be empty")]
    EmptyTitle,

    #[error("video link must be an http(s) URL")]
    InvalidVideoUrl,

    #[error("PDF file is empty")]
    EmptyPdf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    pub teacher_name: String,
    pub description: String,
    pub icon: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub id: ChapterId,
    pub subject_id: SubjectId,
    pub name: String,
    pub number: u32,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub id: TopicId,
    pub chapter_id: ChapterId,
    pub name: String,
    pub number: u32,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoSource {
    YouTube(Url),
    /// Uploaded file served by the backend at this URL.
    Uploaded(Url),
}

impl VideoSource {
    #[must_use]
    pub fn url(&self) -> &Url {
        match self {
            VideoSource::YouTube(url) | VideoSource::Uploaded(url) => url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Video {
    pub id: VideoId,
    pub topic_id: TopicId,
    pub title: String,
    pub description: Option<String>,
    pub source: VideoSource,
    pub duration_secs: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pdf {
    pub id: PdfId,
    pub topic_id: TopicId,
    pub title: String,
    pub description: Option<String>,
}

/// Teacher input for attaching a YouTube video to a topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVideo {
    topic_id: TopicId,
    title: String,
    description: Option<String>,
    url: Url,
}

impl NewVideo {
    /// # Errors
    ///
    /// Returns `CatalogError` for a blank title or a link that is not http(s).
    pub fn new(
        topic_id: TopicId,
        title: &str,
        description: &str,
        link: &str,
    ) -> Result<Self, CatalogError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(CatalogError::EmptyTitle);
        }
        let url = parse_http_url(link)?;
        Ok(Self {
            topic_id,
            title: title.to_string(),
            description: normalize_optional(description),
            url,
        })
    }

    #[must_use]
    pub fn topic_id(&self) -> &TopicId {
        &self.topic_id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }
}

/// Teacher input for uploading a PDF to a topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPdf {
    topic_id: TopicId,
    title: String,
    description: Option<String>,
    bytes: Vec<u8>,
}

impl NewPdf {
    /// # Errors
    ///
    /// Returns `CatalogError` for a blank title or empty file contents.
    pub fn new(
        topic_id: TopicId,
        title: &str,
        description: &str,
        bytes: Vec<u8>,
    ) -> Result<Self, CatalogError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(CatalogError::EmptyTitle);
        }
        if bytes.is_empty() {
            return Err(CatalogError::EmptyPdf);
        }
        Ok(Self {
            topic_id,
            title: title.to_string(),
            description: normalize_optional(description),
            bytes,
        })
    }

    #[must_use]
    pub fn topic_id(&self) -> &TopicId {
        &self.topic_id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Parse a link and accept only http and https schemes.
///
/// # Errors
///
/// Returns `CatalogError::InvalidVideoUrl` otherwise.
pub fn parse_http_url(link: &str) -> Result<Url, CatalogError> {
    let url = Url::parse(link.trim()).map_err(|_| CatalogError::InvalidVideoUrl)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(CatalogError::InvalidVideoUrl),
    }
}

fn normalize_optional(value: &str) -> Option<String> {
    Some(value.trim().to_string()).filter(|v| !v.is_empty())
}
