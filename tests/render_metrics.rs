use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use gurshabad::application::ports::{AngProvider, ProviderError};
use gurshabad::application::renderer::{
    AngRenderer, METRIC_LINES_SKIPPED_TOTAL, METRIC_RENDER_TOTAL, RenderPane,
};
use gurshabad::domain::ang::AngNumber;
use gurshabad::infra::storage::MemoryStorage;
use gurshabad::presentation::container::HtmlBuffer;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use serde_json::{Value, json};

struct ScriptedProvider;

#[async_trait]
impl AngProvider for ScriptedProvider {
    async fn fetch_ang(&self, ang: AngNumber) -> Result<Value, ProviderError> {
        match ang.get() {
            1 => Ok(json!([
                { "id": "a", "unicode": "ਸਤਿ" },
                { "id": "b", "translation": "missing script" },
            ])),
            2 => Ok(json!({ "page": [] })),
            _ => Err(ProviderError::Status { status: 503 }),
        }
    }
}

#[tokio::test]
async fn render_paths_emit_outcome_counters() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");

    let renderer = AngRenderer::new(
        Arc::new(ScriptedProvider),
        Arc::new(MemoryStorage::default()),
    );
    for ang in [1, 2, 3] {
        let pane = RenderPane::new(HtmlBuffer::new());
        renderer
            .render(AngNumber::new(ang).expect("valid ang"), &pane)
            .await;
    }

    let mut counters: HashMap<String, u64> = HashMap::new();
    for (composite_key, _, _, value) in snapshotter.snapshot().into_vec() {
        let key = composite_key.key();
        let outcome = key
            .labels()
            .find(|label| label.key() == "outcome")
            .map(|label| format!("{{{}}}", label.value()))
            .unwrap_or_default();
        if let DebugValue::Counter(count) = value {
            counters.insert(format!("{}{outcome}", key.name()), count);
        }
    }

    let rendered = format!("{METRIC_RENDER_TOTAL}{{rendered}}");
    let empty = format!("{METRIC_RENDER_TOTAL}{{empty}}");
    let failed = format!("{METRIC_RENDER_TOTAL}{{failed}}");
    assert_eq!(counters.get(&rendered), Some(&1));
    assert_eq!(counters.get(&empty), Some(&1));
    assert_eq!(counters.get(&failed), Some(&1));
    assert_eq!(counters.get(METRIC_LINES_SKIPPED_TOTAL), Some(&1));
}
