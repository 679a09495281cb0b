use async_trait::async_trait;
use chunk_relay::callbacks::{CallbackHandler, CallbackQuery, CallbackRegistry};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

#[derive(Default)]
struct Recorder {
    name: &'static str,
    seen: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

#[async_trait]
impl CallbackHandler for Recorder {
    async fn handle(
        &self,
        query: &CallbackQuery,
        _cancel: &CancellationToken,
    ) -> anyhow::Result<()> {
        self.seen
            .lock()
            .unwrap()
            .push(format!("{}:{}", self.name, query.data.as_deref().unwrap_or_default()));
        if self.fail {
            anyhow::bail!("handler exploded");
        }
        Ok(())
    }
}

fn query(data: Option<&str>) -> CallbackQuery {
    CallbackQuery {
        id: "q1".into(),
        from_user_id: 7,
        chat_id: Some(100),
        message_id: Some(5),
        data: data.map(str::to_string),
    }
}

fn registry(seen: &Arc<Mutex<Vec<String>>>) -> CallbackRegistry {
    let mut registry = CallbackRegistry::new();
    registry.register(
        "ack:",
        Arc::new(Recorder {
            name: "ack",
            seen: Arc::clone(seen),
            ..Recorder::default()
        }),
    );
    registry.register(
        "a",
        Arc::new(Recorder {
            name: "broad",
            seen: Arc::clone(seen),
            ..Recorder::default()
        }),
    );
    registry
}

#[tokio::test]
async fn first_registered_prefix_wins() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let registry = registry(&seen);
    let cancel = CancellationToken::new();

    assert!(registry.dispatch(&query(Some("ack:42")), &cancel).await.unwrap());
    assert!(registry.dispatch(&query(Some("archive")), &cancel).await.unwrap());

    assert_eq!(*seen.lock().unwrap(), vec!["ack:ack:42", "broad:archive"]);
    assert_eq!(registry.route("ack:1"), Some("ack:"));
    assert_eq!(registry.len(), 2);
}

#[tokio::test]
async fn unmatched_or_empty_data_is_not_handled() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let registry = registry(&seen);
    let cancel = CancellationToken::new();

    assert!(!registry.dispatch(&query(Some("zzz")), &cancel).await.unwrap());
    assert!(!registry.dispatch(&query(None), &cancel).await.unwrap());
    assert!(seen.lock().unwrap().is_empty());
    assert_eq!(registry.route("zzz"), None);
}

#[tokio::test]
async fn handler_failure_carries_prefix_context() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut registry = CallbackRegistry::new();
    registry.register(
        "boom",
        Arc::new(Recorder {
            name: "boom",
            seen: Arc::clone(&seen),
            fail: true,
        }),
    );
    let cancel = CancellationToken::new();

    let err = registry
        .dispatch(&query(Some("boom!")), &cancel)
        .await
        .unwrap_err();
    let rendered = format!("{err:#}");
    assert!(rendered.contains("\"boom\""), "{rendered}");
    assert!(rendered.contains("handler exploded"), "{rendered}");
}

#[test]
fn empty_registry_routes_nothing() {
    let registry = CallbackRegistry::new();
    assert!(registry.is_empty());
    assert_eq!(registry.route("anything"), None);
}
