// Interface to the messaging endpoint's API client
use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Failure reported by a transport call.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request cancelled")]
    Cancelled,
    #[error("endpoint rejected request: {0}")]
    Rejected(String),
    #[error("network failure: {0}")]
    Network(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TransportError {
    pub fn is_cancellation(&self) -> bool {
        matches!(self, TransportError::Cancelled)
    }
}

/// How the endpoint should interpret message text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextFormat {
    #[default]
    Plain,
    Html,
}

impl std::fmt::Display for TextFormat {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            TextFormat::Plain => write!(f, "plain"),
            TextFormat::Html => write!(f, "html"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineButton {
    pub text: String,
    pub callback_data: String,
}

/// Per-call delivery extras
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendOptions {
    pub disable_notification: bool,
    pub reply_to_message_id: Option<i64>,
    /// Inline keyboard rows; only the last chunk of a message carries them.
    pub buttons: Vec<Vec<InlineButton>>,
}

impl SendOptions {
    pub fn without_buttons(&self) -> Self {
        Self {
            buttons: Vec::new(),
            ..self.clone()
        }
    }
}

/// Source of a media payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputFile {
    Path(PathBuf),
    Url(String),
    /// Identifier of a file already stored by the endpoint.
    FileId(String),
    Bytes { name: String, data: Vec<u8> },
}

impl std::fmt::Display for InputFile {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            InputFile::Path(p) => write!(f, "{}", p.display()),
            InputFile::Url(u) => write!(f, "{u}"),
            InputFile::FileId(id) => write!(f, "file-id:{id}"),
            InputFile::Bytes { name, data } => write!(f, "{name} ({} bytes)", data.len()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Photo,
    Video,
    Document,
}

/// One item of a media group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputMedia {
    pub kind: MediaKind,
    pub file: InputFile,
    pub caption: Option<String>,
}

/// Send/edit primitives of the messaging endpoint.
///
/// Implementations return `TransportError::Cancelled` when `cancel` fires
/// mid-request; every other error is treated as retryable by default.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send_text(
        &self,
        destination: &str,
        text: &str,
        format: TextFormat,
        options: &SendOptions,
        cancel: &CancellationToken,
    ) -> Result<(), TransportError>;

    async fn edit_text(
        &self,
        destination: &str,
        message_id: i64,
        text: &str,
        format: TextFormat,
        cancel: &CancellationToken,
    ) -> Result<(), TransportError>;

    async fn send_document(
        &self,
        destination: &str,
        document: &InputFile,
        caption: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<(), TransportError>;

    async fn send_photo(
        &self,
        destination: &str,
        photo: &InputFile,
        caption: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<(), TransportError>;

    async fn send_video(
        &self,
        destination: &str,
        video: &InputFile,
        caption: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<(), TransportError>;

    async fn send_media_group(
        &self,
        destination: &str,
        media: &[InputMedia],
        cancel: &CancellationToken,
    ) -> Result<(), TransportError>;
}
