#![allow(dead_code)]
use async_trait::async_trait;
use chunk_relay::transport::{
    InputFile, InputMedia, SendOptions, TextFormat, Transport, TransportError,
};
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// One recorded transport call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub method: &'static str,
    pub destination: String,
    pub payload: String,
    pub format: Option<TextFormat>,
    pub options: SendOptions,
}

/// Scripted outcome for the next call; calls past the script succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    Fail,
    Cancel,
}

/// Transport stub that records calls and replays scripted outcomes.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<Call>>,
    script: Mutex<VecDeque<Outcome>>,
    always_fail: bool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scripted(outcomes: &[Outcome]) -> Self {
        Self {
            script: Mutex::new(outcomes.iter().copied().collect()),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            always_fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn payloads(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.payload).collect()
    }

    fn record(
        &self,
        method: &'static str,
        destination: &str,
        payload: String,
        format: Option<TextFormat>,
        options: SendOptions,
    ) -> Result<(), TransportError> {
        self.calls.lock().unwrap().push(Call {
            method,
            destination: destination.to_string(),
            payload,
            format,
            options,
        });
        if self.always_fail {
            return Err(TransportError::Network("connection reset".into()));
        }
        match self.script.lock().unwrap().pop_front() {
            None | Some(Outcome::Ok) => Ok(()),
            Some(Outcome::Fail) => Err(TransportError::Rejected("Too Many Requests".into())),
            Some(Outcome::Cancel) => Err(TransportError::Cancelled),
        }
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send_text(
        &self,
        destination: &str,
        text: &str,
        format: TextFormat,
        options: &SendOptions,
        _cancel: &CancellationToken,
    ) -> Result<(), TransportError> {
        self.record("send_text", destination, text.to_string(), Some(format), options.clone())
    }

    async fn edit_text(
        &self,
        destination: &str,
        message_id: i64,
        text: &str,
        format: TextFormat,
        _cancel: &CancellationToken,
    ) -> Result<(), TransportError> {
        self.record(
            "edit_text",
            destination,
            format!("{message_id}:{text}"),
            Some(format),
            SendOptions::default(),
        )
    }

    async fn send_document(
        &self,
        destination: &str,
        document: &InputFile,
        caption: Option<&str>,
        _cancel: &CancellationToken,
    ) -> Result<(), TransportError> {
        let payload = format!("{document}|{}", caption.unwrap_or_default());
        self.record("send_document", destination, payload, None, SendOptions::default())
    }

    async fn send_photo(
        &self,
        destination: &str,
        photo: &InputFile,
        caption: Option<&str>,
        _cancel: &CancellationToken,
    ) -> Result<(), TransportError> {
        let payload = format!("{photo}|{}", caption.unwrap_or_default());
        self.record("send_photo", destination, payload, None, SendOptions::default())
    }

    async fn send_video(
        &self,
        destination: &str,
        video: &InputFile,
        caption: Option<&str>,
        _cancel: &CancellationToken,
    ) -> Result<(), TransportError> {
        let payload = format!("{video}|{}", caption.unwrap_or_default());
        self.record("send_video", destination, payload, None, SendOptions::default())
    }

    async fn send_media_group(
        &self,
        destination: &str,
        media: &[InputMedia],
        _cancel: &CancellationToken,
    ) -> Result<(), TransportError> {
        let payload = media
            .iter()
            .map(|m| m.file.to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.record("send_media_group", destination, payload, None, SendOptions::default())
    }
}

/// Words of `n` characters total, single-space separated.
pub fn text_of_length(n: usize) -> String {
    let mut text = String::with_capacity(n);
    while text.len() < n {
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str("lorem");
    }
    text.truncate(n);
    text.trim_end().to_string()
}

/// True when every `<tag>` in `markup` is closed in order.
pub fn is_balanced(markup: &str) -> bool {
    let mut stack: Vec<String> = Vec::new();
    let mut rest = markup;
    while let Some(start) = rest.find('<') {
        let Some(len) = rest[start..].find('>') else {
            return false;
        };
        let tag = &rest[start + 1..start + len];
        rest = &rest[start + len + 1..];
        if let Some(name) = tag.strip_prefix('/') {
            if stack.pop().as_deref() != Some(name) {
                return false;
            }
        } else if !tag.ends_with('/') && !tag.starts_with('!') {
            let name = tag.split_whitespace().next().unwrap_or_default();
            if !matches!(name, "br" | "hr" | "img") {
                stack.push(name.to_string());
            }
        }
    }
    stack.is_empty()
}
