//! Top-level sender: format, classify, chunk, then deliver chunk by chunk.
//!
//! Chunks of one message go out strictly in order; chunk `n + 1` is not
//! started until chunk `n`'s retry sequence has resolved.

use crate::config::{ConfigError, SenderConfig};
use crate::constants::ERROR_TEMPLATE_KEY;
use crate::content::{self, Chunk, ContentKind, MarkupChunker, plain};
use crate::retry::{Cancelled, RetryPolicy, execute_with_retry};
use crate::template::Templates;
use crate::transport::{InputFile, InputMedia, SendOptions, TextFormat, Transport};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Errors that cross the `send` contract; ordinary delivery failures do not.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),
    #[error("delivery cancelled")]
    Cancelled,
}

impl From<Cancelled> for DispatchError {
    fn from(_: Cancelled) -> Self {
        DispatchError::Cancelled
    }
}

impl DispatchError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DispatchError::Cancelled)
    }
}

/// Outcome of delivering one content unit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub total_chunks: usize,
    /// 1-based indices of chunks that were not delivered.
    pub failed_chunks: Vec<usize>,
}

impl DeliveryReport {
    pub fn is_success(&self) -> bool {
        self.failed_chunks.is_empty()
    }
}

pub struct Sender<T: Transport + ?Sized> {
    transport: Arc<T>,
    config: Arc<SenderConfig>,
    templates: Templates,
    markup: MarkupChunker,
    retry: RetryPolicy,
}

impl<T: Transport + ?Sized> Sender<T> {
    pub fn new(
        transport: Arc<T>,
        config: SenderConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let templates = Templates::new(config.templates.clone());
        let markup = MarkupChunker::new(config.container_tag().map(str::to_string));
        let retry = RetryPolicy::new(config.max_retry_attempts);
        Ok(Self {
            transport,
            config: Arc::new(config),
            templates,
            markup,
            retry,
        })
    }

    pub fn with_retry_policy(
        mut self,
        retry: RetryPolicy,
    ) -> Self {
        self.retry = retry;
        self
    }

    pub fn config(&self) -> &SenderConfig {
        &self.config
    }

    pub fn templates(&self) -> &Templates {
        &self.templates
    }

    /// Formats, chunks and delivers `content`.
    ///
    /// Returns `Ok(true)` when every chunk was delivered (or there was nothing
    /// to deliver). Failed chunks are logged and yield `Ok(false)`; only
    /// configuration problems and cancellation are returned as errors.
    pub async fn send(
        &self,
        content: &str,
        destination: Option<&str>,
        template_key: &str,
        options: Option<&SendOptions>,
        cancel: &CancellationToken,
    ) -> Result<bool, DispatchError> {
        let report = self
            .send_detailed(content, destination, template_key, options, cancel)
            .await?;
        Ok(report.is_success())
    }

    /// Like [`Sender::send`], but reports which chunks failed.
    pub async fn send_detailed(
        &self,
        content: &str,
        destination: Option<&str>,
        template_key: &str,
        options: Option<&SendOptions>,
        cancel: &CancellationToken,
    ) -> Result<DeliveryReport, DispatchError> {
        let destination = self.config.resolve_destination(destination)?;
        let formatted = self.templates.format(template_key, content);
        let max_len = self.config.max_content_length;
        let chunks = content::build_chunks(&formatted, max_len, &self.markup);
        if chunks.is_empty() {
            debug!(destination, "nothing to deliver");
            return Ok(DeliveryReport::default());
        }

        let options = options.cloned().unwrap_or_default();
        let leading_options = options.without_buttons();
        let total = chunks.len();
        let mut report = DeliveryReport {
            total_chunks: total,
            failed_chunks: Vec::new(),
        };
        for chunk in &chunks {
            if cancel.is_cancelled() {
                return Err(DispatchError::Cancelled);
            }
            let chunk_options = if chunk.index == total {
                &options
            } else {
                &leading_options
            };
            let delivered = self
                .dispatch_chunk(destination, chunk, chunk_options, cancel)
                .await?;
            if !delivered {
                report.failed_chunks.push(chunk.index);
            }
        }

        if report.is_success() {
            info!(destination, chunks = total, "content delivered");
        } else {
            error!(
                destination,
                chunks = total,
                failed = ?report.failed_chunks,
                "some chunks were not delivered"
            );
        }
        Ok(report)
    }

    async fn dispatch_chunk(
        &self,
        destination: &str,
        chunk: &Chunk,
        options: &SendOptions,
        cancel: &CancellationToken,
    ) -> Result<bool, Cancelled> {
        let max_len = self.config.max_content_length;
        let format = chunk.kind.text_format();
        let len = chunk.char_len();
        if len <= max_len {
            return self
                .dispatch_text(destination, &chunk.text, format, options, cancel)
                .await;
        }
        if chunk.kind == ContentKind::Markup {
            // wrapped markup is not re-split; the endpoint may reject it
            warn!(
                destination,
                chunk = chunk.index,
                len,
                max_len,
                "markup chunk exceeds limit, sending as-is"
            );
            return self
                .dispatch_text(destination, &chunk.text, format, options, cancel)
                .await;
        }
        let mut all_delivered = true;
        for (sub, piece) in plain::split(&chunk.text, max_len).enumerate() {
            if cancel.is_cancelled() {
                return Err(Cancelled);
            }
            if !self
                .dispatch_text(destination, piece, format, options, cancel)
                .await?
            {
                warn!(destination, chunk = chunk.index, sub_chunk = sub + 1, "sub-chunk not delivered");
                all_delivered = false;
            }
        }
        Ok(all_delivered)
    }

    async fn dispatch_text(
        &self,
        destination: &str,
        text: &str,
        format: TextFormat,
        options: &SendOptions,
        cancel: &CancellationToken,
    ) -> Result<bool, Cancelled> {
        let transport = &self.transport;
        execute_with_retry("send_text", &self.retry, cancel, || {
            transport.send_text(destination, text, format, options, cancel)
        })
        .await
    }

    /// Sends `message` to the configured error destination without chunking.
    ///
    /// Uses the `"error"` template when one is configured.
    pub async fn send_error(
        &self,
        message: &str,
        cancel: &CancellationToken,
    ) -> Result<bool, DispatchError> {
        let destination = self.config.error_destination()?;
        let formatted = self.templates.format(ERROR_TEMPLATE_KEY, message);
        let format = content::classify(&formatted).text_format();
        let options = SendOptions::default();
        Ok(self
            .dispatch_text(destination, &formatted, format, &options, cancel)
            .await?)
    }

    /// Waits `delay`, then delivers like [`Sender::send`].
    ///
    /// Cancellation or any error while waiting or sending is logged and
    /// reported as `false`.
    pub async fn schedule_after_delay(
        &self,
        delay: Duration,
        content: &str,
        destination: Option<&str>,
        template_key: &str,
        options: Option<&SendOptions>,
        cancel: &CancellationToken,
    ) -> bool {
        tokio::select! {
            _ = cancel.cancelled() => {
                warn!(?delay, "scheduled delivery cancelled before dispatch");
                return false;
            }
            _ = tokio::time::sleep(delay) => {}
        }
        match self
            .send(content, destination, template_key, options, cancel)
            .await
        {
            Ok(delivered) => delivered,
            Err(e) => {
                warn!(error = %e, "scheduled delivery failed");
                false
            }
        }
    }

    /// Replaces the text of an already delivered message.
    pub async fn edit_existing(
        &self,
        destination: Option<&str>,
        message_id: i64,
        content: &str,
        cancel: &CancellationToken,
    ) -> Result<bool, DispatchError> {
        let destination = self.config.resolve_destination(destination)?;
        let format = content::classify(content).text_format();
        let transport = &self.transport;
        Ok(execute_with_retry("edit_text", &self.retry, cancel, || {
            transport.edit_text(destination, message_id, content, format, cancel)
        })
        .await?)
    }

    pub async fn send_document(
        &self,
        destination: Option<&str>,
        document: &InputFile,
        caption: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<bool, DispatchError> {
        let destination = self.config.resolve_destination(destination)?;
        let transport = &self.transport;
        Ok(execute_with_retry("send_document", &self.retry, cancel, || {
            transport.send_document(destination, document, caption, cancel)
        })
        .await?)
    }

    pub async fn send_photo(
        &self,
        destination: Option<&str>,
        photo: &InputFile,
        caption: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<bool, DispatchError> {
        let destination = self.config.resolve_destination(destination)?;
        let transport = &self.transport;
        Ok(execute_with_retry("send_photo", &self.retry, cancel, || {
            transport.send_photo(destination, photo, caption, cancel)
        })
        .await?)
    }

    pub async fn send_video(
        &self,
        destination: Option<&str>,
        video: &InputFile,
        caption: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<bool, DispatchError> {
        let destination = self.config.resolve_destination(destination)?;
        let transport = &self.transport;
        Ok(execute_with_retry("send_video", &self.retry, cancel, || {
            transport.send_video(destination, video, caption, cancel)
        })
        .await?)
    }

    pub async fn send_media_group(
        &self,
        destination: Option<&str>,
        media: &[InputMedia],
        cancel: &CancellationToken,
    ) -> Result<bool, DispatchError> {
        let destination = self.config.resolve_destination(destination)?;
        if media.is_empty() {
            debug!(destination, "empty media group, nothing to deliver");
            return Ok(true);
        }
        let transport = &self.transport;
        Ok(execute_with_retry("send_media_group", &self.retry, cancel, || {
            transport.send_media_group(destination, media, cancel)
        })
        .await?)
    }
}
