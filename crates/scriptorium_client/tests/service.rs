use std::time::Duration;

use pretty_assertions::assert_eq;
use scriptorium_client::{
    ClientSettings, HttpJobService, JobService, JobStatus, ServiceFailureKind, UploadPart,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn service(base_url: &str) -> HttpJobService {
    let settings = ClientSettings {
        base_url: base_url.to_string(),
        ..ClientSettings::default()
    };
    HttpJobService::new(&settings).expect("service")
}

fn count_occurrences(haystack: &[u8], needle: &[u8]) -> usize {
    haystack.windows(needle.len()).filter(|w| *w == needle).count()
}

#[tokio::test]
async fn upload_posts_multipart_and_returns_task_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "task_id": "f47ac10b"
        })))
        .mount(&server)
        .await;

    let parts = vec![
        UploadPart {
            file_name: "letter.docx".to_string(),
            bytes: b"first body".to_vec(),
        },
        UploadPart {
            file_name: "reply.docx".to_string(),
            bytes: b"second body".to_vec(),
        },
    ];

    let task_id = service(&server.uri()).upload(parts).await.expect("upload ok");
    assert_eq!(task_id, "f47ac10b");

    let requests = server.received_requests().await.expect("recorded requests");
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    let content_type = request
        .headers
        .get("content-type")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    assert!(content_type.starts_with("multipart/form-data"));
    // Field name repeated once per file.
    assert_eq!(count_occurrences(&request.body, b"name=\"files[]\""), 2);
    assert_eq!(count_occurrences(&request.body, b"first body"), 1);
    assert_eq!(count_occurrences(&request.body, b"second body"), 1);
    assert_eq!(
        count_occurrences(&request.body, b"filename=\"letter.docx\""),
        1
    );
}

#[tokio::test]
async fn upload_failure_maps_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let parts = vec![UploadPart {
        file_name: "letter.docx".to_string(),
        bytes: b"body".to_vec(),
    }];
    let err = service(&server.uri()).upload(parts).await.unwrap_err();
    assert_eq!(err.kind, ServiceFailureKind::HttpStatus(500));
}

#[tokio::test]
async fn upload_rejects_non_json_ack() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let parts = vec![UploadPart {
        file_name: "letter.docx".to_string(),
        bytes: b"body".to_vec(),
    }];
    let err = service(&server.uri()).upload(parts).await.unwrap_err();
    assert_eq!(err.kind, ServiceFailureKind::MalformedResponse);
}

#[tokio::test]
async fn start_posts_to_process_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/process/f47ac10b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "processing_started"
        })))
        .expect(1)
        .mount(&server)
        .await;

    service(&server.uri()).start("f47ac10b").await.expect("start ok");
}

#[tokio::test]
async fn status_parses_full_result_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/f47ac10b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "completed",
            "progress": 100,
            "message": "Processing completed",
            "processed_files": [
                {
                    "original_name": "letter.docx",
                    "processed_name": "processed_letter_1714000000.docx",
                    "download_url": "/download/processed_letter_1714000000.docx"
                },
                {
                    "original_name": "broken.docx",
                    "error": "conversion failed"
                }
            ],
            "compiled_doc": {
                "name": "compiled_1714000000.docx",
                "download_url": "/download/compiled_1714000000.docx"
            },
            "file_paths": ["/srv/uploads/1714000000_letter.docx"]
        })))
        .mount(&server)
        .await;

    let report = service(&server.uri())
        .status("f47ac10b")
        .await
        .expect("status ok");

    assert_eq!(report.status, JobStatus::Completed);
    assert!(report.status.is_terminal());
    assert_eq!(report.progress, 100);
    assert_eq!(report.message, "Processing completed");

    let files = report.processed_files.expect("processed files");
    assert_eq!(files.len(), 2);
    assert_eq!(
        files[0].processed_name.as_deref(),
        Some("processed_letter_1714000000.docx")
    );
    assert!(files[0].error.is_none());
    assert_eq!(files[1].error.as_deref(), Some("conversion failed"));
    assert!(files[1].download_url.is_none());

    let compiled = report.compiled_doc.expect("compiled doc");
    assert_eq!(compiled.name, "compiled_1714000000.docx");
}

#[tokio::test]
async fn non_terminal_statuses_are_recognized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/early"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "uploaded",
            "progress": 0,
            "message": "Files uploaded"
        })))
        .mount(&server)
        .await;

    let report = service(&server.uri()).status("early").await.expect("status ok");
    assert_eq!(report.status, JobStatus::Uploaded);
    assert!(!report.status.is_terminal());
}

#[tokio::test]
async fn preview_and_download_return_blob_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/preview/processed_letter_1.docx"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(b"PK\x03\x04doc".to_vec(), "application/octet-stream"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/download/processed_letter_1.docx"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(b"PK\x03\x04full".to_vec(), "application/octet-stream"),
        )
        .mount(&server)
        .await;

    let service = service(&server.uri());
    let preview = service
        .preview("processed_letter_1.docx")
        .await
        .expect("preview ok");
    assert_eq!(&preview[..], b"PK\x03\x04doc");

    let download = service
        .download("processed_letter_1.docx")
        .await
        .expect("download ok");
    assert_eq!(&download[..], b"PK\x03\x04full");
}

#[tokio::test]
async fn preview_failure_maps_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/preview/missing.docx"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = service(&server.uri())
        .preview("missing.docx")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ServiceFailureKind::HttpStatus(404));
}

#[tokio::test]
async fn download_rejects_too_large_artifact() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download/huge.docx"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "application/octet-stream")
                .insert_header("Content-Length", "11")
                .set_body_raw(b"01234567890".to_vec(), "application/octet-stream"),
        )
        .mount(&server)
        .await;

    let settings = ClientSettings {
        base_url: server.uri(),
        max_artifact_bytes: 10,
        ..ClientSettings::default()
    };
    let service = HttpJobService::new(&settings).expect("service");
    let err = service.download("huge.docx").await.unwrap_err();
    assert_eq!(
        err.kind,
        ServiceFailureKind::TooLarge {
            max_bytes: 10,
            actual: Some(11)
        }
    );
}

#[tokio::test]
async fn slow_status_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(serde_json::json!({
                    "status": "processing",
                    "progress": 1,
                    "message": "slow"
                })),
        )
        .mount(&server)
        .await;

    let settings = ClientSettings {
        base_url: server.uri(),
        request_timeout: Duration::from_millis(50),
        ..ClientSettings::default()
    };
    let service = HttpJobService::new(&settings).expect("service");
    let err = service.status("slow").await.unwrap_err();
    assert_eq!(err.kind, ServiceFailureKind::Timeout);
}

#[tokio::test]
async fn invalid_base_url_is_rejected_up_front() {
    let settings = ClientSettings {
        base_url: "not a url".to_string(),
        ..ClientSettings::default()
    };
    let err = HttpJobService::new(&settings).unwrap_err();
    assert_eq!(err.kind, ServiceFailureKind::InvalidUrl);
}
