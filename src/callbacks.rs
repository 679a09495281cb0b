//! Prefix-routed handlers for inbound interactive callbacks.
//!
//! Handlers are scanned in registration order and the first whose prefix
//! matches the callback data wins, so register specific prefixes before
//! broader ones.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Inbound button press, as delivered by the update-receiving surface
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackQuery {
    pub id: String,
    pub from_user_id: i64,
    pub chat_id: Option<i64>,
    pub message_id: Option<i64>,
    pub data: Option<String>,
}

#[async_trait]
pub trait CallbackHandler: Send + Sync {
    async fn handle(
        &self,
        query: &CallbackQuery,
        cancel: &CancellationToken,
    ) -> Result<()>;
}

#[derive(Default)]
pub struct CallbackRegistry {
    handlers: Vec<(String, Arc<dyn CallbackHandler>)>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        prefix: impl Into<String>,
        handler: Arc<dyn CallbackHandler>,
    ) {
        let prefix = prefix.into();
        if self.handlers.iter().any(|(p, _)| *p == prefix) {
            debug!(prefix = %prefix, "prefix already registered; earlier handler keeps precedence");
        }
        self.handlers.push((prefix, handler));
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Prefix of the handler that would receive `data`.
    pub fn route(
        &self,
        data: &str,
    ) -> Option<&str> {
        self.find(data).map(|(prefix, _)| prefix.as_str())
    }

    fn find(
        &self,
        data: &str,
    ) -> Option<&(String, Arc<dyn CallbackHandler>)> {
        self.handlers
            .iter()
            .find(|(prefix, _)| data.starts_with(prefix.as_str()))
    }

    /// Routes `query` to the first matching handler.
    ///
    /// Returns `Ok(false)` when the query has no data or nothing matches.
    pub async fn dispatch(
        &self,
        query: &CallbackQuery,
        cancel: &CancellationToken,
    ) -> Result<bool> {
        let Some(data) = query.data.as_deref() else {
            debug!(query_id = %query.id, "callback without data");
            return Ok(false);
        };
        let Some((prefix, handler)) = self.find(data) else {
            debug!(query_id = %query.id, data, "no handler for callback");
            return Ok(false);
        };
        debug!(query_id = %query.id, prefix = %prefix, "routing callback");
        handler
            .handle(query, cancel)
            .await
            .with_context(|| format!("callback handler for prefix {prefix:?} failed"))?;
        Ok(true)
    }
}
