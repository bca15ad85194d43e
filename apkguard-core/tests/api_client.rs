use std::time::Duration;

use apkguard_core::api::{ApiClient, ApiConfig, ApiError};
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// reqwest::blocking cannot run inside a tokio test runtime, so the mock
// server lives on its own runtime.
fn start_server() -> (tokio::runtime::Runtime, MockServer) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let server = rt.block_on(MockServer::start());
    (rt, server)
}

fn mount(rt: &tokio::runtime::Runtime, server: &MockServer, mock: Mock) {
    rt.block_on(mock.mount(server));
}

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(ApiConfig::default().with_base_url(server.uri())).unwrap()
}

#[test]
fn test_health_check() {
    let (rt, server) = start_server();
    mount(
        &rt,
        &server,
        Mock::given(method("GET"))
            .and(path("/api/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "healthy",
                "model_loaded": true,
                "timestamp": "2024-08-30T12:00:00",
                "version": "1.0.0",
                "dataset": "DroidRL fullset_train.csv"
            }))),
    );

    let health = client_for(&server).health_check().unwrap();
    assert!(health.is_healthy());
    assert!(health.model_loaded);
    assert_eq!(health.version, "1.0.0");
    assert_eq!(health.dataset.as_deref(), Some("DroidRL fullset_train.csv"));
}

#[test]
fn test_statistics() {
    let (rt, server) = start_server();
    mount(
        &rt,
        &server,
        Mock::given(method("GET"))
            .and(path("/api/statistics"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total_analyses": 2847,
                "malicious_detected": 1156,
                "legitimate_verified": 1691,
                "accuracy": 95.2,
                "false_positives": 23,
                "processing_speed": "18.5s average",
                "model_version": "2.1.0",
                "last_updated": "2024-08-30T12:00:00",
                "dataset_info": {
                    "training_samples": 10560,
                    "source": "DroidRL Academic Dataset",
                    "features": 583
                }
            }))),
    );

    let stats = client_for(&server).statistics().unwrap();
    assert_eq!(stats.total_analyses, 2847);
    assert_eq!(stats.dataset_info.features, 583);
}

#[test]
fn test_analyze_uploads_multipart_field() {
    let (rt, server) = start_server();
    mount(
        &rt,
        &server,
        Mock::given(method("POST"))
            .and(path("/api/analyze"))
            .and(body_string_contains("name=\"apk_file\""))
            .and(body_string_contains("filename=\"bank_test.apk\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "analysis_id": "42",
                "prediction": "SAFE",
                "risk_score": 2.5
            }))),
    );

    let dir = tempfile::tempdir().unwrap();
    let apk = dir.path().join("bank_test.apk");
    std::fs::write(&apk, vec![0u8; 4096]).unwrap();

    let response = client_for(&server).analyze_apk(&apk).unwrap();
    assert_eq!(response["analysis_id"], "42");
    assert_eq!(response["prediction"], "SAFE");
}

#[test]
fn test_batch_analyze_sends_every_file() {
    let (rt, server) = start_server();
    mount(
        &rt,
        &server,
        Mock::given(method("POST"))
            .and(path("/api/batch-analyze"))
            .and(body_string_contains("filename=\"a.apk\""))
            .and(body_string_contains("filename=\"b.apk\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "total_processed": 2
            }))),
    );

    let dir = tempfile::tempdir().unwrap();
    let paths: Vec<_> = ["a.apk", "b.apk"]
        .iter()
        .map(|name| {
            let p = dir.path().join(name);
            std::fs::write(&p, b"PK").unwrap();
            p
        })
        .collect();

    let response = client_for(&server).batch_analyze(&paths).unwrap();
    assert_eq!(response["total_processed"], 2);
}

#[test]
fn test_demo_predict_and_report() {
    let (rt, server) = start_server();
    mount(
        &rt,
        &server,
        Mock::given(method("POST"))
            .and(path("/api/demo-predict"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "result": { "prediction": "MALICIOUS" }
            }))),
    );
    mount(
        &rt,
        &server,
        Mock::given(method("GET"))
            .and(path("/api/reports/abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "abc" }))),
    );

    let client = client_for(&server);
    let predicted = client.demo_predict(&json!({})).unwrap();
    assert_eq!(predicted["result"]["prediction"], "MALICIOUS");
    assert_eq!(client.report("abc").unwrap()["id"], "abc");
}

#[test]
fn test_error_status_keeps_body() {
    let (rt, server) = start_server();
    mount(
        &rt,
        &server,
        Mock::given(method("POST"))
            .and(path("/api/train-model"))
            .respond_with(
                ResponseTemplate::new(500).set_body_string("{\"error\": \"Training failed\"}"),
            ),
    );

    let err = client_for(&server).train_model().unwrap_err();
    match err {
        ApiError::Status { status, ref body } => {
            assert_eq!(status, 500);
            assert!(body.contains("Training failed"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_invalid_json_is_decode_error() {
    let (rt, server) = start_server();
    mount(
        &rt,
        &server,
        Mock::given(method("GET"))
            .and(path("/api/health"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json")),
    );

    let err = client_for(&server).health_check().unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)), "got {err:?}");
}

#[test]
fn test_slow_response_times_out() {
    let (rt, server) = start_server();
    mount(
        &rt,
        &server,
        Mock::given(method("GET"))
            .and(path("/api/health"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2))),
    );

    let config = ApiConfig::default()
        .with_base_url(server.uri())
        .with_timeout(Duration::from_millis(200));
    let err = ApiClient::new(config).unwrap().health_check().unwrap_err();
    assert!(matches!(err, ApiError::Timeout), "got {err:?}");
    assert_eq!(
        err.user_message(),
        "Request timeout. The analysis is taking longer than expected."
    );
}

#[test]
fn test_unreachable_backend_is_network_error() {
    // Port 9 (discard) is not expected to accept HTTP connections
    let config = ApiConfig::default()
        .with_base_url("http://127.0.0.1:9")
        .with_timeout(Duration::from_secs(5));
    let err = ApiClient::new(config).unwrap().health_check().unwrap_err();
    assert!(matches!(err, ApiError::Network(_)), "got {err:?}");
}

#[test]
fn test_missing_upload_is_io_error() {
    let client = ApiClient::new(ApiConfig::default()).unwrap();
    let err = client
        .analyze_apk(std::path::Path::new("/nonexistent/missing.apk"))
        .unwrap_err();
    assert!(matches!(err, ApiError::Io(_)));
}
