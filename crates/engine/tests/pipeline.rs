//! Phase semantics of the trigger pipeline

#![allow(clippy::unwrap_used, clippy::panic)]

mod common;

use async_trait::async_trait;
use common::{CallLog, call_log, calls};
use curata_engine::{
    Error, Hook, HookContext, HookRegistry, Record, RecordType, Result, TriggerMode,
    TriggerPipeline,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Hook that records its invocation and stamps the record
struct Spy {
    id: &'static str,
    log: CallLog,
}

#[async_trait]
impl Hook for Spy {
    fn name(&self) -> &'static str {
        self.id
    }

    async fn run(
        &self,
        _ctx: &HookContext<'_>,
        mut record: Record,
        _options: &Value,
    ) -> Result<Record> {
        self.log.lock().unwrap().push(self.id.to_string());
        let mut trail = record
            .get_path("metadata.trail")
            .and_then(|v| v.as_array().cloned())
            .unwrap_or_default();
        trail.push(json!(self.id));
        record.set_path("metadata.trail", Value::Array(trail))?;
        Ok(record)
    }

    async fn run_with_response(
        &self,
        _ctx: &HookContext<'_>,
        _record: &Record,
        _options: &Value,
        mut response: Value,
    ) -> Result<Value> {
        self.log.lock().unwrap().push(self.id.to_string());
        let mut seen = response
            .get("seen")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        seen.push(json!(self.id));
        response["seen"] = Value::Array(seen);
        Ok(response)
    }
}

/// Hook that always fails
struct Broken {
    log: CallLog,
}

#[async_trait]
impl Hook for Broken {
    fn name(&self) -> &'static str {
        "broken"
    }

    async fn run(
        &self,
        _ctx: &HookContext<'_>,
        _record: Record,
        _options: &Value,
    ) -> Result<Record> {
        self.log.lock().unwrap().push("broken".to_string());
        Err(Error::Core(curata_core::Error::Message(
            "deliberate failure".to_string(),
        )))
    }
}

/// Hook that reports over a channel, for observing the detached post phase
struct Reporter {
    id: &'static str,
    tx: mpsc::UnboundedSender<String>,
    fail: bool,
}

#[async_trait]
impl Hook for Reporter {
    fn name(&self) -> &'static str {
        self.id
    }

    async fn run(
        &self,
        ctx: &HookContext<'_>,
        record: Record,
        _options: &Value,
    ) -> Result<Record> {
        self.tx.send(format!("{}:{}", self.id, ctx.oid)).unwrap();
        if self.fail {
            return Err(Error::Core(curata_core::Error::Message(
                "deliberate failure".to_string(),
            )));
        }
        Ok(record)
    }
}

fn pipeline_with(hooks: Vec<(&str, Arc<dyn Hook>)>) -> TriggerPipeline {
    let mut registry = HookRegistry::new();
    for (id, hook) in hooks {
        registry.register(id, hook);
    }
    TriggerPipeline::new(Arc::new(registry))
}

fn record_type(config: Value) -> RecordType {
    RecordType::from_json(config).unwrap()
}

#[tokio::test]
async fn test_pre_hooks_run_in_declared_order() {
    let log = call_log();
    let pipeline = pipeline_with(vec![
        ("first", Arc::new(Spy { id: "first", log: log.clone() })),
        ("second", Arc::new(Spy { id: "second", log: log.clone() })),
        ("third", Arc::new(Spy { id: "third", log: log.clone() })),
    ]);
    let rt = record_type(json!({
        "name": "rdmp",
        "hooks": {"onCreate": {"pre": [
            {"function": "first"},
            {"function": "second"},
            {"function": "third"}
        ]}}
    }));

    let record = pipeline
        .run_pre_save_hooks("oid-1", Record::default(), &rt, TriggerMode::OnCreate, None)
        .await
        .unwrap();

    assert_eq!(calls(&log), vec!["first", "second", "third"]);
    // The record threads: each hook saw its predecessor's write.
    assert_eq!(
        record.get_path("metadata.trail"),
        Some(json!(["first", "second", "third"]))
    );
}

#[tokio::test]
async fn test_pre_failure_aborts_remaining_hooks() {
    let log = call_log();
    let pipeline = pipeline_with(vec![
        ("first", Arc::new(Spy { id: "first", log: log.clone() })),
        ("broken", Arc::new(Broken { log: log.clone() })),
        ("third", Arc::new(Spy { id: "third", log: log.clone() })),
    ]);
    let rt = record_type(json!({
        "name": "rdmp",
        "hooks": {"onUpdate": {"pre": [
            {"function": "first"},
            {"function": "broken"},
            {"function": "third"}
        ]}}
    }));

    let result = pipeline
        .run_pre_save_hooks("oid-1", Record::default(), &rt, TriggerMode::OnUpdate, None)
        .await;

    assert!(result.is_err());
    assert_eq!(calls(&log), vec!["first", "broken"]);
}

#[tokio::test]
async fn test_unknown_hook_is_fatal_in_pre() {
    let log = call_log();
    let pipeline = pipeline_with(vec![(
        "known",
        Arc::new(Spy { id: "known", log: log.clone() }),
    )]);
    let rt = record_type(json!({
        "name": "rdmp",
        "hooks": {"onCreate": {"pre": [
            {"function": "missing"},
            {"function": "known"}
        ]}}
    }));

    let result = pipeline
        .run_pre_save_hooks("oid-1", Record::default(), &rt, TriggerMode::OnCreate, None)
        .await;

    assert!(matches!(result, Err(Error::UnknownHook(id)) if id == "missing"));
    assert!(calls(&log).is_empty());
}

#[tokio::test]
async fn test_post_sync_threads_response() {
    let log = call_log();
    let pipeline = pipeline_with(vec![
        ("first", Arc::new(Spy { id: "first", log: log.clone() })),
        ("second", Arc::new(Spy { id: "second", log: log.clone() })),
    ]);
    let rt = record_type(json!({
        "name": "rdmp",
        "hooks": {"onCreate": {"postSync": [
            {"function": "first"},
            {"function": "second"}
        ]}}
    }));

    let response = pipeline
        .run_post_save_sync_hooks(
            "oid-1",
            &Record::default(),
            &rt,
            TriggerMode::OnCreate,
            None,
            json!({}),
        )
        .await
        .unwrap();

    assert_eq!(response["seen"], json!(["first", "second"]));
}

#[tokio::test]
async fn test_post_hooks_run_detached_and_survive_failure() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let pipeline = pipeline_with(vec![
        (
            "failing",
            Arc::new(Reporter { id: "failing", tx: tx.clone(), fail: true }),
        ),
        (
            "after",
            Arc::new(Reporter { id: "after", tx: tx.clone(), fail: false }),
        ),
    ]);
    drop(tx);
    let rt = record_type(json!({
        "name": "rdmp",
        "hooks": {"onUpdate": {"post": [
            {"function": "failing"},
            {"function": "after"}
        ]}}
    }));

    // Dispatch returns immediately; the failing hook never surfaces.
    pipeline.run_post_save_hooks("oid-9", &Record::default(), &rt, TriggerMode::OnUpdate, None);

    // The registry keeps the senders alive, so collect exactly two reports.
    let mut reports = vec![rx.recv().await.unwrap(), rx.recv().await.unwrap()];
    reports.sort();
    assert_eq!(reports, vec!["after:oid-9", "failing:oid-9"]);
}

#[tokio::test]
async fn test_unknown_hook_is_skipped_in_post() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let pipeline = pipeline_with(vec![(
        "present",
        Arc::new(Reporter { id: "present", tx: tx.clone(), fail: false }),
    )]);
    drop(tx);
    let rt = record_type(json!({
        "name": "rdmp",
        "hooks": {"onCreate": {"post": [
            {"function": "missing"},
            {"function": "present"}
        ]}}
    }));

    pipeline.run_post_save_hooks("oid-2", &Record::default(), &rt, TriggerMode::OnCreate, None);

    assert_eq!(rx.recv().await, Some("present:oid-2".to_string()));
    // Nothing else was dispatched.
    let quiet = tokio::time::timeout(std::time::Duration::from_millis(50), rx.recv()).await;
    assert!(quiet.is_err());
}

#[tokio::test]
async fn test_phase_with_no_hooks_is_a_no_op() {
    let pipeline = pipeline_with(vec![]);
    let rt = record_type(json!({"name": "rdmp"}));

    let record = Record::with_metadata(json!({"title": "unchanged"}));
    let out = pipeline
        .run_pre_save_hooks("oid-1", record, &rt, TriggerMode::OnCreate, None)
        .await
        .unwrap();
    assert_eq!(out.get_path("metadata.title"), Some(json!("unchanged")));

    let response = pipeline
        .run_post_save_sync_hooks(
            "oid-1",
            &out,
            &rt,
            TriggerMode::OnCreate,
            None,
            json!({"ok": true}),
        )
        .await
        .unwrap();
    assert_eq!(response, json!({"ok": true}));
}
