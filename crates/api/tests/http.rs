//! HTTP integration tests against the sample artifacts

use api::{create_router, AppState};
use inference_engine::{ArtifactPaths, InferenceEngine};
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::{json, Value};
use std::sync::Arc;

fn state() -> AppState {
    let paths = ArtifactPaths::in_dir(concat!(env!("CARGO_MANIFEST_DIR"), "/../../artifacts"));
    AppState::new(InferenceEngine::load(&paths).unwrap())
}

async fn spawn_app() -> String {
    serve(state()).await
}

async fn serve(state: AppState) -> String {
    let app = create_router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn month_to_month_customer() -> Value {
    json!({
        "gender": "Female",
        "SeniorCitizen": 0,
        "Partner": "Yes",
        "Dependents": "No",
        "tenure": 12,
        "PhoneService": "Yes",
        "MultipleLines": "No",
        "InternetService": "Fiber optic",
        "OnlineSecurity": "No",
        "OnlineBackup": "Yes",
        "DeviceProtection": "No",
        "TechSupport": "No",
        "StreamingTV": "Yes",
        "StreamingMovies": "No",
        "Contract": "Month-to-month",
        "PaperlessBilling": "Yes",
        "PaymentMethod": "Electronic check",
        "MonthlyCharges": 70.0,
        "TotalCharges": 2500.0
    })
}

fn two_year_customer() -> Value {
    let mut customer = month_to_month_customer();
    let fields = customer.as_object_mut().unwrap();
    fields.insert("tenure".into(), json!(60));
    fields.insert("Contract".into(), json!("Two year"));
    fields.insert("InternetService".into(), json!("DSL"));
    fields.insert("PaymentMethod".into(), json!("Credit card (automatic)"));
    fields.insert("PaperlessBilling".into(), json!("No"));
    fields.insert("TechSupport".into(), json!("Yes"));
    fields.insert("OnlineSecurity".into(), json!("Yes"));
    fields.insert("MonthlyCharges".into(), json!(55.0));
    fields.insert("TotalCharges".into(), json!(3300.0));
    customer
}

async fn post_json(base: &str, path: &str, body: &Value) -> (u16, Value) {
    let response = reqwest::Client::new()
        .post(format!("{}{}", base, path))
        .json(body)
        .send()
        .await
        .unwrap();
    let status = response.status().as_u16();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn test_predict_high_risk() {
    let base = spawn_app().await;
    let (status, body) = post_json(&base, "/predict", &month_to_month_customer()).await;

    assert_eq!(status, 200);
    assert_eq!(body["PredictedChurn"], 1);
    assert_eq!(body["ChurnProbability"], 0.8);
    assert_eq!(
        body["SuggestedAction"],
        "High risk of churn. Suggest offering a personalised retention plan."
    );
}

#[tokio::test]
async fn test_predict_low_risk_on_versioned_route() {
    let base = spawn_app().await;
    let (status, body) = post_json(&base, "/api/v1/predict", &two_year_customer()).await;

    assert_eq!(status, 200);
    assert_eq!(body["PredictedChurn"], 0);
    assert_eq!(body["ChurnProbability"], 0.01);
    assert_eq!(
        body["SuggestedAction"],
        "Low churn risk. Recommend maintaining current engagement strategies."
    );
}

#[tokio::test]
async fn test_missing_tenure_is_rejected() {
    let base = spawn_app().await;
    let mut customer = month_to_month_customer();
    customer.as_object_mut().unwrap().remove("tenure");

    let (status, body) = post_json(&base, "/predict", &customer).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "validation_error");
    assert!(body["message"].as_str().unwrap().contains("tenure"));
}

#[tokio::test]
async fn test_out_of_domain_binary_is_rejected() {
    let base = spawn_app().await;
    let mut customer = month_to_month_customer();
    customer["Partner"] = json!("Maybe");

    let (status, body) = post_json(&base, "/predict", &customer).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_unseen_category_and_extra_field_are_ignored() {
    let base = spawn_app().await;
    let mut customer = month_to_month_customer();
    customer["InternetService"] = json!("Satellite");
    customer["customerID"] = json!("7590-VHVEG");

    let (status, body) = post_json(&base, "/predict", &customer).await;
    assert_eq!(status, 200);
    let p = body["ChurnProbability"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&p));
}

#[tokio::test]
async fn test_malformed_body() {
    let base = spawn_app().await;
    let response = reqwest::Client::new()
        .post(format!("{}/predict", base))
        .header("content-type", "application/json")
        .body("{\"tenure\": ")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "malformed_body");
}

#[tokio::test]
async fn test_numeric_field_as_string_is_malformed() {
    let base = spawn_app().await;
    let mut customer = month_to_month_customer();
    customer["TotalCharges"] = json!("2500.0");

    let (status, body) = post_json(&base, "/predict", &customer).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "malformed_body");
}

#[tokio::test]
async fn test_demo_form_roundtrip() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let page = client
        .get(format!("{}/demo", base))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("<form"));
    assert!(page.contains("name=\"PaymentMethod\""));

    let fields = [
        ("gender", "Female"),
        ("SeniorCitizen", "0"),
        ("Partner", "Yes"),
        ("Dependents", "No"),
        ("tenure", "12"),
        ("PhoneService", "Yes"),
        ("MultipleLines", "No"),
        ("InternetService", "Fiber optic"),
        ("OnlineSecurity", "No"),
        ("OnlineBackup", "Yes"),
        ("DeviceProtection", "No"),
        ("TechSupport", "No"),
        ("StreamingTV", "Yes"),
        ("StreamingMovies", "No"),
        ("Contract", "Month-to-month"),
        ("PaperlessBilling", "Yes"),
        ("PaymentMethod", "Electronic check"),
        ("MonthlyCharges", "70"),
        ("TotalCharges", "2500"),
    ];
    let response = client
        .post(format!("{}/demo", base))
        .form(&fields)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let html = response.text().await.unwrap();
    assert!(html.contains("Churn probability: 0.80"));
    assert!(html.contains("High risk of churn"));

    let mut missing = fields.to_vec();
    missing.retain(|(name, _)| *name != "TotalCharges");
    let response = client
        .post(format!("{}/demo", base))
        .form(&missing)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    assert!(response
        .text()
        .await
        .unwrap()
        .contains("Missing required field: TotalCharges"));
}

#[tokio::test]
async fn test_health_counts_predictions() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    post_json(&base, "/predict", &month_to_month_customer()).await;
    post_json(&base, "/predict", &two_year_customer()).await;

    let health: Value = client
        .get(format!("{}/api/v1/health", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["feature_columns"], 30);
    assert_eq!(health["prediction_count"], 2);
}

#[tokio::test]
async fn test_metrics_disabled_without_recorder() {
    let base = spawn_app().await;
    let response = reqwest::get(format!("{}/metrics", base)).await.unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn test_metrics_served_with_recorder() {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    // Record through the same handle the endpoint renders
    metrics::with_local_recorder(&recorder, || {
        metrics::counter!("churn_predictions_total", "label" => "churn").increment(1);
    });

    let base = serve(state().with_metrics(handle)).await;
    let response = reqwest::get(format!("{}/metrics", base)).await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("churn_predictions_total{label=\"churn\"} 1"));
}
