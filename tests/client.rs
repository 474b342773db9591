use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use topic_dashboard::{ModelingClient, SelectedFile, Settings, UploadError};
use wiremock::matchers::{body_string_contains, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, route: &str) -> ModelingClient {
    let settings = Settings {
        endpoint: format!("{}{route}", server.uri()),
        request_timeout_secs: Some(10),
    };
    ModelingClient::new(&settings).expect("client")
}

#[tokio::test]
async fn posts_file_as_single_multipart_part() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/topic-clustered-model-HTTP-trigger"))
        .and(header_regex("content-type", "^multipart/form-data; boundary="))
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains("filename=\"data.csv\""))
        .and(body_string_contains("id,text\n1,hello world\n"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"report":"https://x/report.csv"}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "/api/topic-clustered-model-HTTP-trigger");
    let file = SelectedFile::new("data.csv", b"id,text\n1,hello world\n".to_vec());

    let response = client.send(&file).await.expect("response");
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, r#"{"report":"https://x/report.csv"}"#);
}

#[tokio::test]
async fn error_statuses_still_return_the_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("{\"error\":\"boom\"}"))
        .mount(&server)
        .await;

    let client = client_for(&server, "/run");
    let response = client
        .send(&SelectedFile::new("book.xlsx", vec![0x50, 0x4b]))
        .await
        .expect("response");

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body, "{\"error\":\"boom\"}");
}

/// An endpoint on a port nothing listens on.
fn closed_port_endpoint() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}/run")
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() {
    let settings = Settings {
        endpoint: closed_port_endpoint(),
        request_timeout_secs: Some(10),
    };
    let client = ModelingClient::new(&settings).expect("client");

    let err = client
        .send(&SelectedFile::new("data.csv", b"x".to_vec()))
        .await
        .unwrap_err();
    assert!(matches!(err, UploadError::Transport(_)), "{err}");
}

#[tokio::test]
async fn download_returns_bytes_and_rejects_missing_artifacts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/out/report.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string("topic,count\n0,12\n"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/out/missing.csv"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server, "/run");
    let bytes = client
        .download(&format!("{}/out/report.csv", server.uri()))
        .await
        .expect("download");
    assert_eq!(bytes, b"topic,count\n0,12\n");

    let err = client
        .download(&format!("{}/out/missing.csv", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, UploadError::Status(status) if status == StatusCode::NOT_FOUND));
}
