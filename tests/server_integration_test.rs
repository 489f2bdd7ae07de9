use specialty_coffee::core::FeatureRecord;
use specialty_coffee::domain::model::FeatureValue;
use specialty_coffee::web::handlers::{ErrorResponse, HealthResponse, PredictResponse};
use specialty_coffee::web::{self, AppState};
use specialty_coffee::{
    ArtifactClassifier, Classifier, InferenceAdapter, Label, LoadStrategy, LocalStorage, Result, Verdict,
};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::net::TcpListener;

const BOURBON: &str = "Bourbon-Related (e.g., Bourbon, Caturra, SL28)";

struct FixedClassifier(i64);

impl Classifier for FixedClassifier {
    fn predict(&self, _record: &FeatureRecord) -> Result<Label> {
        Ok(Label(self.0))
    }
}

#[derive(Default)]
struct RecordingClassifier {
    seen: Mutex<Vec<FeatureRecord>>,
}

impl Classifier for RecordingClassifier {
    fn predict(&self, record: &FeatureRecord) -> Result<Label> {
        self.seen.lock().unwrap().push(*record);
        Ok(Label(1))
    }
}

async fn spawn_app<C: Classifier + 'static>(state: AppState<C>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(web::serve(listener, Arc::new(state), std::future::pending()));
    format!("http://{}", addr)
}

async fn spawn_stub<C: Classifier + 'static>(classifier: C) -> String {
    spawn_app(AppState::new(InferenceAdapter::new(classifier), "stub", LoadStrategy::Eager)).await
}

fn reference_form(altitude: &str) -> Vec<(&'static str, String)> {
    vec![
        ("altitude", altitude.to_string()),
        ("region", "South America".to_string()),
        ("processing", "Washed / Wet".to_string()),
        ("variety", BOURBON.to_string()),
    ]
}

async fn submit(base: &str, form: &[(&'static str, String)]) -> (u16, String) {
    let response = reqwest::Client::new()
        .post(format!("{}/", base))
        .form(form)
        .send()
        .await
        .unwrap();
    let status = response.status().as_u16();
    (status, response.text().await.unwrap())
}

#[tokio::test]
async fn test_initial_page_shows_no_result() {
    let base = spawn_stub(FixedClassifier(1)).await;

    let response = reqwest::get(format!("{}/", base)).await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let html = response.text().await.unwrap();
    assert!(html.contains("How special is your specialty coffee?"));
    assert!(!html.contains("EXCELLENT"));
    assert!(!html.contains("VERY GOOD"));
}

#[tokio::test]
async fn test_excellent_when_classifier_returns_one() {
    let base = spawn_stub(FixedClassifier(1)).await;

    let (status, html) = submit(&base, &reference_form("1800")).await;
    assert_eq!(status, 200);
    assert!(html.contains("EXCELLENT specialty coffee"));
    assert!(!html.contains("VERY GOOD"));
}

#[tokio::test]
async fn test_very_good_when_classifier_returns_zero() {
    let base = spawn_stub(FixedClassifier(0)).await;

    let (status, html) = submit(&base, &reference_form("1800")).await;
    assert_eq!(status, 200);
    assert!(html.contains("VERY GOOD specialty coffee"));
    assert!(!html.contains("EXCELLENT"));
}

#[tokio::test]
async fn test_unexpected_label_shows_neither_message() {
    let base = spawn_stub(FixedClassifier(2)).await;

    let (status, html) = submit(&base, &reference_form("1800")).await;
    assert_eq!(status, 500);
    assert!(html.contains("class=\"error\""));
    assert!(!html.contains("EXCELLENT"));
    assert!(!html.contains("VERY GOOD"));
}

#[tokio::test]
async fn test_form_values_reach_classifier_unchanged() {
    let classifier = Arc::new(RecordingClassifier::default());
    let base = spawn_stub(classifier.clone()).await;

    // Field order in the body differs from the record order.
    let form = vec![
        ("variety", BOURBON.to_string()),
        ("processing", "Washed / Wet".to_string()),
        ("altitude", "1800".to_string()),
        ("region", "South America".to_string()),
    ];
    let (status, _) = submit(&base, &form).await;
    assert_eq!(status, 200);

    let seen = classifier.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let columns: Vec<_> = seen[0].columns().collect();
    assert_eq!(
        columns,
        vec![
            ("altitude", FeatureValue::Numeric(1800.0)),
            ("region", FeatureValue::Category("South America")),
            ("processing", FeatureValue::Category("Washed / Wet")),
            ("variety", FeatureValue::Category(BOURBON)),
        ]
    );
}

#[tokio::test]
async fn test_boundary_rejects_out_of_domain_input() {
    let classifier = Arc::new(RecordingClassifier::default());
    let base = spawn_stub(classifier.clone()).await;

    let (status, html) = submit(&base, &reference_form("599")).await;
    assert_eq!(status, 422);
    assert!(html.contains("altitude"));
    assert!(!html.contains("EXCELLENT"));

    let mut form = reference_form("1800");
    form[1].1 = "Antarctica".to_string();
    let (status, html) = submit(&base, &form).await;
    assert_eq!(status, 422);
    assert!(html.contains("Antarctica"));

    assert!(classifier.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_incomplete_form_renders_error_panel() {
    let classifier = Arc::new(RecordingClassifier::default());
    let base = spawn_stub(classifier.clone()).await;

    let form = vec![
        ("altitude", "1800".to_string()),
        ("region", "South America".to_string()),
    ];
    let (status, html) = submit(&base, &form).await;
    assert_eq!(status, 422);
    assert!(html.contains("class=\"error\""));
    assert!(html.contains("processing"));
    assert!(html.contains("How special is your specialty coffee?"));

    let response = reqwest::Client::new()
        .post(format!("{}/", base))
        .body("altitude=1800")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 422);
    assert!(response.text().await.unwrap().contains("class=\"error\""));

    assert!(classifier.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_json_api_malformed_bodies_return_json_errors() {
    let classifier = Arc::new(RecordingClassifier::default());
    let base = spawn_stub(classifier.clone()).await;
    let client = reqwest::Client::new();

    let bodies = [
        serde_json::json!({"altitude": "high", "region": "Brazil", "processing": "Other", "variety": "Typica"}),
        serde_json::json!({"altitude": -5, "region": "Brazil", "processing": "Other", "variety": "Typica"}),
        serde_json::json!({"region": "Brazil", "processing": "Other", "variety": "Typica"}),
    ];
    for body in bodies {
        let response = client
            .post(format!("{}/api/predict", base))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 422, "body {}", body);
        let error: ErrorResponse = response.json().await.unwrap();
        assert_eq!(error.category, "input");
        assert!(!error.error.is_empty());
    }

    let response = client
        .post(format!("{}/api/predict", base))
        .body("altitude=1800")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 422);
    let error: ErrorResponse = response.json().await.unwrap();
    assert_eq!(error.category, "input");

    assert!(classifier.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_json_api() {
    let base = spawn_stub(FixedClassifier(1)).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/predict", base))
        .json(&serde_json::json!({
            "altitude": 1800,
            "region": "South America",
            "processing": "Washed / Wet",
            "variety": BOURBON
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let body: PredictResponse = response.json().await.unwrap();
    assert_eq!(body.label, Label(1));
    assert_eq!(body.verdict, Verdict::Excellent);
    assert!(body.message.contains("EXCELLENT"));

    let response = client
        .post(format!("{}/api/predict", base))
        .json(&serde_json::json!({
            "altitude": 100,
            "region": "South America",
            "processing": "Washed / Wet",
            "variety": BOURBON
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 422);
    let body: ErrorResponse = response.json().await.unwrap();
    assert_eq!(body.category, "input");
}

#[tokio::test]
async fn test_json_api_unexpected_label() {
    let base = spawn_stub(FixedClassifier(-1)).await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/predict", base))
        .json(&serde_json::json!({
            "altitude": 1800,
            "region": "Brazil",
            "processing": "Other",
            "variety": "Typica"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 500);
    let body: ErrorResponse = response.json().await.unwrap();
    assert_eq!(body.category, "contract");
}

#[tokio::test]
async fn test_health() {
    let base = spawn_stub(FixedClassifier(0)).await;

    let body: HealthResponse = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body.status, "ok");
    assert_eq!(body.model_path, "stub");
    assert_eq!(body.load_strategy, LoadStrategy::Eager);
}

#[tokio::test]
async fn test_end_to_end_with_artifact_and_header_image() {
    let dir = TempDir::new().unwrap();
    let image = dir.path().join("coffeeheader.jpg");
    std::fs::write(&image, b"\xFF\xD8\xFF\xE0 not really a jpeg").unwrap();

    let model = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("model/coffee_clf.json");
    let classifier =
        ArtifactClassifier::open(LocalStorage::current_dir(), model.clone(), LoadStrategy::PerRequest).unwrap();
    let state = AppState::new(
        InferenceAdapter::new(classifier),
        model.display().to_string(),
        LoadStrategy::PerRequest,
    )
    .with_header_image(image);
    let base = spawn_app(state).await;

    let form = vec![
        ("altitude", "2100".to_string()),
        ("region", "Africa".to_string()),
        ("processing", "Natural / Dry".to_string()),
        ("variety", "Ethiopian Varieties".to_string()),
    ];
    let (status, html) = submit(&base, &form).await;
    assert_eq!(status, 200);
    assert!(html.contains("EXCELLENT"));

    let response = reqwest::get(format!("{}/photo/coffeeheader.jpg", base)).await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert!(response.bytes().await.unwrap().starts_with(b"\xFF\xD8"));
}

#[tokio::test]
async fn test_missing_header_image_is_not_fatal() {
    let state = AppState::new(InferenceAdapter::new(FixedClassifier(0)), "stub", LoadStrategy::Eager)
        .with_header_image("/nonexistent/coffeeheader.jpg");
    let base = spawn_app(state).await;

    assert_eq!(reqwest::get(format!("{}/", base)).await.unwrap().status().as_u16(), 200);
    assert_eq!(
        reqwest::get(format!("{}/photo/coffeeheader.jpg", base))
            .await
            .unwrap()
            .status()
            .as_u16(),
        404
    );
}
