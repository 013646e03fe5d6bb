//! Integration tests for AdminClient against a mock admin API


use answer_client::{AdminClient, AdminError};
use chat_core::admin::{StatsRange, DEFAULT_CSV_FILENAME, DYNAMIC_PROMPT_LABEL};
use chrono::NaiveDate;
use test_utils::{recorded_bodies, MockResponseBuilder};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEY: &str = "clave-secreta";

async fn mount_stats(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/admin/stats"))
        .and(header("X-Admin-API-Key", KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockResponseBuilder::stats()))
        .mount(server)
        .await;
}

async fn connected(server: &MockServer) -> AdminClient {
    mount_stats(server).await;
    let mut admin = AdminClient::with_client(reqwest::Client::new(), &server.uri());
    admin.connect(KEY).await.expect("connect");
    admin
}

#[tokio::test]
async fn test_connect_success_returns_stats() {
    let mock_server = MockServer::start().await;
    let admin = connected(&mock_server).await;
    assert!(admin.is_connected());
}

#[tokio::test]
async fn test_connect_with_wrong_key_is_auth_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/stats"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(MockResponseBuilder::detail("Clave de API inválida.")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut admin = AdminClient::with_client(reqwest::Client::new(), &mock_server.uri());
    let err = admin.connect("nope").await.unwrap_err();
    assert!(matches!(err, AdminError::Auth));
    assert!(err.requires_reauth());
    assert!(!admin.is_connected());
}

#[tokio::test]
async fn test_connect_server_failure() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/stats"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let mut admin = AdminClient::with_client(reqwest::Client::new(), &mock_server.uri());
    let err = admin.connect(KEY).await.unwrap_err();
    assert!(matches!(err, AdminError::Server { status: 500, .. }));
    assert!(!admin.is_connected());
}

#[tokio::test]
async fn test_stats_with_date_range() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/stats"))
        .and(query_param("start_date", "2024-01-01"))
        .and(query_param("end_date", "2024-01-31T23:59:59.999999"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "total_conversations": 1,
            "total_tokens": 10,
            "total_cost": "0.000050",
            "normal_mode_count": 1,
            "tutor_mode_count": 0
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    let mut admin = connected(&mock_server).await;

    let range = StatsRange {
        start: NaiveDate::from_ymd_opt(2024, 1, 1),
        end: NaiveDate::from_ymd_opt(2024, 1, 31),
    };
    let stats = admin.stats(&range).await.expect("stats");
    assert_eq!(stats.total_conversations, 1);
    assert_eq!(stats.total_cost, "0.000050");
}

#[tokio::test]
async fn test_conversations_listing() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/conversations"))
        .and(header("X-Admin-API-Key", KEY))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(MockResponseBuilder::conversations()),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    let mut admin = connected(&mock_server).await;

    let logs = admin.conversations().await.expect("conversations");
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].mode, "tutor");
    assert_eq!(logs[0].short_conversation_id(), "9b2c1f1e...");
    assert_eq!(logs[1].total_tokens, Some(50));
    assert_ne!(logs[1].display_question(), DYNAMIC_PROMPT_LABEL);
}

#[tokio::test]
async fn test_401_mid_session_drops_key() {
    let mock_server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/admin/clear-logs"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&mock_server)
        .await;
    let mut admin = connected(&mock_server).await;

    let err = admin.clear_logs().await.unwrap_err();
    assert!(matches!(err, AdminError::Auth));
    assert!(!admin.is_connected());
    assert!(matches!(
        admin.conversations().await,
        Err(AdminError::NotConnected)
    ));
}

#[tokio::test]
async fn test_clear_logs_returns_message() {
    let mock_server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/admin/clear-logs"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(MockResponseBuilder::message("Historial de logs eliminado.")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    let mut admin = connected(&mock_server).await;

    let response = admin.clear_logs().await.expect("clear");
    assert_eq!(response.message, "Historial de logs eliminado.");
}

#[tokio::test]
async fn test_error_detail_is_surfaced() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/change-password"))
        .respond_with(ResponseTemplate::new(400).set_body_json(MockResponseBuilder::detail(
            "La nueva contraseña debe tener al menos 4 caracteres.",
        )))
        .expect(1)
        .mount(&mock_server)
        .await;
    let mut admin = connected(&mock_server).await;

    match admin.change_password("abc").await {
        Err(AdminError::Server { status, detail }) => {
            assert_eq!(status, 400);
            assert_eq!(detail, "La nueva contraseña debe tener al menos 4 caracteres.");
        }
        other => panic!("unexpected result: {other:?}"),
    }
    // A rejected rotation keeps the old key usable.
    assert!(admin.is_connected());
}

#[tokio::test]
async fn test_change_password_disconnects() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/change-password"))
        .and(header("X-Admin-API-Key", KEY))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(MockResponseBuilder::message("Contraseña actualizada con éxito.")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    let mut admin = connected(&mock_server).await;

    let response = admin.change_password("nueva-clave").await.expect("rotate");
    assert_eq!(response.message, "Contraseña actualizada con éxito.");
    assert!(!admin.is_connected());

    let bodies = recorded_bodies(&mock_server).await;
    assert_eq!(
        bodies.last(),
        Some(&serde_json::json!({ "new_password": "nueva-clave" }))
    );
}

#[tokio::test]
async fn test_export_csv_uses_disposition_filename() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/conversations/csv"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "content-disposition",
                    "attachment; filename=\"reporte_conversaciones_cundibot.csv\"",
                )
                .set_body_raw("ID Conversacion,Fecha\nabc,2024-05-01 08:00:00\n", "text/csv"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    let mut admin = connected(&mock_server).await;

    let export = admin.export_csv().await.expect("csv");
    assert_eq!(export.filename, "reporte_conversaciones_cundibot.csv");
    assert!(String::from_utf8_lossy(&export.content).starts_with("ID Conversacion,Fecha"));
}

#[tokio::test]
async fn test_export_csv_default_filename() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/conversations/csv"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("a,b\n", "text/csv"))
        .mount(&mock_server)
        .await;
    let mut admin = connected(&mock_server).await;

    let export = admin.export_csv().await.expect("csv");
    assert_eq!(export.filename, DEFAULT_CSV_FILENAME);
}

#[tokio::test]
async fn test_upload_sends_each_file_as_part() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/upload-and-regenerate"))
        .and(header("X-Admin-API-Key", KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message": "Base de conocimiento regenerada.",
            "details": "Índice regenerado con éxito a partir de 2 documento(s)."
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    let mut admin = connected(&mock_server).await;

    let dir = tempfile::tempdir().expect("tempdir");
    let first = dir.path().join("reglamento.pdf");
    let second = dir.path().join("calendario.pdf");
    std::fs::write(&first, b"%PDF-1.4 uno").unwrap();
    std::fs::write(&second, b"%PDF-1.4 dos").unwrap();

    let response = admin
        .upload_and_regenerate(&[first, second])
        .await
        .expect("upload");
    assert_eq!(response.message, "Base de conocimiento regenerada.");
    assert!(response.details.is_some());

    let requests = mock_server.received_requests().await.unwrap();
    let upload = requests.last().unwrap();
    let body = String::from_utf8_lossy(&upload.body);
    assert_eq!(body.matches("name=\"files\"").count(), 2);
    assert!(body.contains("filename=\"reglamento.pdf\""));
    assert!(body.contains("%PDF-1.4 dos"));
}

#[tokio::test]
async fn test_upload_missing_file_is_io_error() {
    let mock_server = MockServer::start().await;
    let mut admin = connected(&mock_server).await;

    let dir = tempfile::tempdir().expect("tempdir");
    let err = admin
        .upload_and_regenerate(&[dir.path().join("missing.pdf")])
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::Io(_)));
    assert!(admin.is_connected());
}
