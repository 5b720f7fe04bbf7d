use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use study_core::model::{
    Chapter, ChapterId, NewPdf, NewVideo, Pdf, PdfId, Subject, SubjectId, Topic, TopicId, Video,
};

use crate::api::CatalogApi;
use crate::auth_context::AuthContext;
use crate::error::{ApiError, CatalogError};

/// Cache file name for a PDF. Ids from the server must not leave the cache directory.
fn cached_pdf_name(id: &PdfId) -> Result<String, ApiError> {
    let refused = || ApiError::InvalidPayload(format!("unusable PDF id: {id:?}"));
    let parsed: PdfId = id.as_str().parse().map_err(|_| refused())?;
    let name = format!("{parsed}.pdf");
    let mut components = Path::new(&name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !parsed.as_str().contains("..") => Ok(name),
        _ => Err(refused()),
    }
}

/// Browsing subjects → chapters → topics → videos/PDFs, plus teacher uploads.
#[derive(Clone)]
pub struct CatalogService {
    api: Arc<dyn CatalogApi>,
    auth: Arc<AuthContext>,
    cache_dir: PathBuf,
}

impl CatalogService {
    #[must_use]
    pub fn new(api: Arc<dyn CatalogApi>, auth: Arc<AuthContext>, cache_dir: PathBuf) -> Self {
        Self {
            api,
            auth,
            cache_dir,
        }
    }

    #[must_use]
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// # Errors
    ///
    /// Returns `CatalogError::Api` if the request fails.
    pub async fn subjects(&self) -> Result<Vec<Subject>, CatalogError> {
        Ok(self.api.subjects().await?)
    }

    /// Chapters in ascending chapter number.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Api` if the request fails.
    pub async fn chapters(&self, subject_id: &SubjectId) -> Result<Vec<Chapter>, CatalogError> {
        let mut chapters = self.api.chapters(subject_id).await?;
        chapters.sort_by_key(|chapter| chapter.number);
        Ok(chapters)
    }

    /// Topics in ascending topic number.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Api` if the request fails.
    pub async fn topics(&self, chapter_id: &ChapterId) -> Result<Vec<Topic>, CatalogError> {
        let mut topics = self.api.topics(chapter_id).await?;
        topics.sort_by_key(|topic| topic.number);
        Ok(topics)
    }

    /// # Errors
    ///
    /// Returns `CatalogError::Api` if the request fails.
    pub async fn videos(&self, topic_id: &TopicId) -> Result<Vec<Video>, CatalogError> {
        Ok(self.api.videos(topic_id).await?)
    }

    /// # Errors
    ///
    /// Returns `CatalogError::Api` if the request fails.
    pub async fn pdfs(&self, topic_id: &TopicId) -> Result<Vec<Pdf>, CatalogError> {
        Ok(self.api.pdfs(topic_id).await?)
    }

    /// Download a PDF into the cache directory and return its path.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Api` if the download fails or the id cannot
    /// name a file, and `CatalogError::Cache` if the file cannot be written.
    pub async fn download_pdf(&self, pdf: &Pdf) -> Result<PathBuf, CatalogError> {
        let file_name = cached_pdf_name(&pdf.id)?;
        let bytes = self.api.pdf_bytes(&pdf.id).await?;
        tokio::fs::create_dir_all(&self.cache_dir).await?;
        let path = self.cache_dir.join(file_name);
        tokio::fs::write(&path, &bytes).await?;
        log::info!("cached PDF {} ({} bytes)", pdf.id, bytes.len());
        Ok(path)
    }

    /// Attach a YouTube link to a topic. Teachers and admins only.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Auth` for students and `CatalogError::Api` on failure.
    pub async fn add_video(&self, video: &NewVideo) -> Result<Video, CatalogError> {
        self.auth.require_author("adding a video")?;
        let created = self.api.add_video(video).await?;
        log::info!("added video {} to topic {}", created.id, created.topic_id);
        Ok(created)
    }

    /// Upload a PDF to a topic. Teachers and admins only.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Auth` for students and `CatalogError::Api` on failure.
    pub async fn add_pdf(&self, pdf: &NewPdf) -> Result<Pdf, CatalogError> {
        self.auth.require_author("uploading a PDF")?;
        let created = self.api.add_pdf(pdf).await?;
        log::info!("uploaded PDF {} to topic {}", created.id, created.topic_id);
        Ok(created)
    }

    /// Read a PDF from disk for upload.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Cache` if the file cannot be read and
    /// `CatalogError::Input` if it is empty or the title is blank.
    pub async fn read_pdf_file(
        &self,
        topic_id: TopicId,
        title: &str,
        description: &str,
        path: &Path,
    ) -> Result<NewPdf, CatalogError> {
        let bytes = tokio::fs::read(path).await?;
        Ok(NewPdf::new(topic_id, title, description, bytes)?)
    }
}
