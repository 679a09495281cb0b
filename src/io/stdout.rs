// Dry-run transport: prints every call instead of contacting an endpoint
use crate::transport::{InputFile, InputMedia, SendOptions, TextFormat, Transport, TransportError};
use async_trait::async_trait;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Default)]
pub struct StdoutTransport {
    calls: AtomicUsize,
}

impl StdoutTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of transport calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn emit(
        &self,
        header: &str,
        body: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<(), TransportError> {
        if cancel.is_cancelled() {
            return Err(TransportError::Cancelled);
        }
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let mut out = std::io::stdout().lock();
        writeln!(out, "--- #{n} {header} ---")?;
        if let Some(body) = body {
            writeln!(out, "{body}")?;
        }
        out.flush()?;
        Ok(())
    }
}

#[async_trait]
impl Transport for StdoutTransport {
    async fn send_text(
        &self,
        destination: &str,
        text: &str,
        format: TextFormat,
        options: &SendOptions,
        cancel: &CancellationToken,
    ) -> Result<(), TransportError> {
        let buttons: usize = options.buttons.iter().map(Vec::len).sum();
        let header = format!(
            "send_text to={destination} format={format} chars={} buttons={buttons}",
            text.chars().count()
        );
        self.emit(&header, Some(text), cancel)
    }

    async fn edit_text(
        &self,
        destination: &str,
        message_id: i64,
        text: &str,
        format: TextFormat,
        cancel: &CancellationToken,
    ) -> Result<(), TransportError> {
        let header = format!("edit_text to={destination} message={message_id} format={format}");
        self.emit(&header, Some(text), cancel)
    }

    async fn send_document(
        &self,
        destination: &str,
        document: &InputFile,
        caption: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<(), TransportError> {
        let header = format!("send_document to={destination} file={document}");
        self.emit(&header, caption, cancel)
    }

    async fn send_photo(
        &self,
        destination: &str,
        photo: &InputFile,
        caption: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<(), TransportError> {
        let header = format!("send_photo to={destination} file={photo}");
        self.emit(&header, caption, cancel)
    }

    async fn send_video(
        &self,
        destination: &str,
        video: &InputFile,
        caption: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<(), TransportError> {
        let header = format!("send_video to={destination} file={video}");
        self.emit(&header, caption, cancel)
    }

    async fn send_media_group(
        &self,
        destination: &str,
        media: &[InputMedia],
        cancel: &CancellationToken,
    ) -> Result<(), TransportError> {
        let header = format!("send_media_group to={destination} items={}", media.len());
        let listing: Vec<String> = media
            .iter()
            .map(|m| format!("{:?} {}", m.kind, m.file))
            .collect();
        self.emit(&header, Some(&listing.join("\n")), cancel)
    }
}
