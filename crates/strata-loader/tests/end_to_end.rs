use std::sync::Arc;

use serde_json::{json, Value};
use strata_loader::{
    InMemoryObjectSource, InMemoryScene, LoadSession, LoaderConfig, LoaderEvent,
};
use strata_store::dump;

const URL: &str = "https://models.example.org/streams/b7c1/objects/commit-root";

fn fast_config() -> LoaderConfig {
    LoaderConfig {
        yield_budget_ms: 0,
        ..LoaderConfig::default()
    }
}

fn quad_mesh(store: &InMemoryObjectSource, name: &str, units: &str) -> Value {
    let vertices: Vec<Value> = [
        0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0, //
        2.0, 0.0, 0.0, 2.0, 1.0, 0.0,
    ]
    .into_iter()
    .map(Value::from)
    .collect();
    let faces: Vec<Value> = [1, 0, 1, 2, 3, 1, 1, 4, 5, 2].into_iter().map(Value::from).collect();
    json!({
        "speckle_type": "Objects.Geometry.Mesh",
        "name": name,
        "units": units,
        "vertices": store.insert_chunked(&vertices, 5).unwrap(),
        "faces": store.insert_chunked(&faces, 4).unwrap(),
    })
}

fn progress_values(rx: &mut tokio::sync::broadcast::Receiver<LoaderEvent>) -> (Vec<f64>, Vec<String>) {
    let mut progress = Vec::new();
    let mut warnings = Vec::new();
    while let Ok(event) = rx.try_recv() {
        match event {
            LoaderEvent::Progress { progress: p, id } => {
                assert_eq!(id, URL);
                progress.push(p);
            }
            LoaderEvent::Warning { message } => warnings.push(message),
        }
    }
    (progress, warnings)
}

#[tokio::test]
async fn single_mesh_of_two_quads() {
    let store = InMemoryObjectSource::new();
    let mesh = quad_mesh(&store, "slab", "mm");
    let mesh_id = store.insert(mesh).unwrap();
    store
        .insert(json!({
            "id": "commit-root",
            "speckle_type": "Base",
            "@elements": [{"referencedId": mesh_id.as_str()}],
        }))
        .unwrap();

    let scene = Arc::new(InMemoryScene::new());
    let session = LoadSession::new(URL, None, fast_config(), Arc::new(store), scene.clone()).unwrap();
    let mut rx = session.subscribe();

    let summary = session.load().await.unwrap();
    assert_eq!(summary.converted, 1);
    assert_eq!(summary.failed, 0);

    let objects = scene.objects();
    assert_eq!(objects.len(), 1);
    let result = &objects[0].result;
    assert_eq!(result.type_tag, "Mesh");
    assert_eq!(result.geometry.triangle_count(), 4);
    assert_eq!(result.geometry.vertex_count(), 6);
    assert_eq!(result.geometry.positions[12], 0.002);
    assert_eq!(result.geometry.normals.len(), result.geometry.positions.len());
    assert!(!result.metadata.contains_key("vertices"));
    assert!(!result.metadata.contains_key("faces"));

    let (progress, warnings) = progress_values(&mut rx);
    assert!(warnings.is_empty());
    assert_eq!(progress.len() as u64, summary.fragments);
    assert!(progress.windows(2).all(|w| w[0] <= w[1]), "{progress:?}");
    assert_eq!(progress.last().copied(), Some(1.0));
}

#[tokio::test]
async fn nested_containers_and_a_broken_sibling() {
    let store = InMemoryObjectSource::new();
    let good = quad_mesh(&store, "good", "m");
    let mut broken = quad_mesh(&store, "broken", "m");
    broken["faces"] = json!([2, 0, 1, 2, 3]);
    let good_id = store.insert(good).unwrap();
    let broken_id = store.insert(broken).unwrap();
    store
        .insert(json!({
            "id": "commit-root",
            "@levels": {
                "ground": {"@walls": [{"referencedId": good_id.as_str()}]},
                "roof": [{"referencedId": broken_id.as_str()}],
            },
        }))
        .unwrap();

    let scene = Arc::new(InMemoryScene::new());
    let session = LoadSession::new(URL, None, fast_config(), Arc::new(store), scene.clone()).unwrap();
    let summary = session.load().await.unwrap();

    assert_eq!(summary.converted, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(scene.objects()[0].result.metadata["name"], json!("good"));
    assert_eq!(scene.filtered_view_count(), 1);
}

#[tokio::test]
async fn declared_total_drives_progress() {
    let store = InMemoryObjectSource::new();
    let mesh = quad_mesh(&store, "slab", "m");
    let mesh_id = store.insert(mesh).unwrap();
    store
        .insert(json!({
            "id": "commit-root",
            "totalChildrenCount": 1,
            "__closure": {mesh_id.as_str(): 1},
            "@elements": [{"referencedId": mesh_id.as_str()}],
        }))
        .unwrap();

    let scene = Arc::new(InMemoryScene::new());
    let session = LoadSession::new(URL, None, fast_config(), Arc::new(store), scene).unwrap();
    let mut rx = session.subscribe();
    let summary = session.load().await.unwrap();

    assert_eq!(summary.fragments, 2);
    let (progress, _) = progress_values(&mut rx);
    assert_eq!(progress, vec![0.5, 1.0]);
}

#[tokio::test]
async fn loads_from_a_dump_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("objects.jsonl");
    let lines = [
        json!({"id": "m1", "speckle_type": "Objects.Geometry.Mesh",
               "vertices": [0, 0, 0, 1, 0, 0, 0, 1, 0], "faces": [0, 0, 1, 2]}),
        json!({"id": "commit-root", "children": [{"referencedId": "m1"}]}),
    ];
    let text: String = lines.iter().map(|v| format!("{v}\n")).collect();
    std::fs::write(&path, text).unwrap();

    let store = dump::open(&path).unwrap();
    let scene = Arc::new(InMemoryScene::new());
    let session = LoadSession::new(URL, None, fast_config(), Arc::new(store), scene.clone()).unwrap();
    session.load().await.unwrap();
    assert_eq!(scene.len(), 1);

    session.unload();
    assert!(scene.is_empty());
}
