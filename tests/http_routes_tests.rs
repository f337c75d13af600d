mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use proofreader_lib::core::config::AppConfig;
use proofreader_lib::document::package::DocxPackage;
use proofreader_lib::{router, AppState};
use serde_json::Value;
use tower::ServiceExt;

use common::{docx_with_paragraphs, ScriptedModel};

const BOUNDARY: &str = "proofreader-test-boundary";

struct Part<'a> {
    name: &'a str,
    filename: Option<&'a str>,
    bytes: &'a [u8],
}

fn file<'a>(name: &'a str, filename: &'a str, bytes: &'a [u8]) -> Part<'a> {
    Part {
        name,
        filename: Some(filename),
        bytes,
    }
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part.filename {
            Some(filename) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                    part.name
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", part.name).as_bytes(),
            ),
        }
        body.extend_from_slice(part.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn app(model: ScriptedModel) -> Router {
    let config = AppConfig::from_lookup(|key| match key {
        "GOOGLE_API_KEY" => Some("test-key".to_string()),
        _ => None,
    })
    .expect("config");
    router(AppState::new(config, model))
}

async fn post(app: Router, uri: &str, parts: &[Part<'_>]) -> (StatusCode, Vec<(String, String)>, Vec<u8>) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let headers = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                value.to_str().unwrap_or_default().to_string(),
            )
        })
        .collect();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes()
        .to_vec();
    (status, headers, body)
}

fn header_value<'a>(headers: &'a [(String, String)], name: &str) -> &'a str {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
        .unwrap_or_default()
}

fn error_code(body: &[u8]) -> String {
    let value: Value = serde_json::from_slice(body).expect("json error body");
    value["code"].as_str().unwrap_or_default().to_string()
}

#[tokio::test]
async fn health_reports_model_name() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .expect("request");
    let response = app(ScriptedModel::default())
        .oneshot(request)
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.expect("body").to_bytes();
    let value: Value = serde_json::from_slice(&body).expect("json");
    assert_eq!(value["status"], "ok");
    assert_eq!(value["model"], "scripted-model");
}

#[tokio::test]
async fn missing_file_field_is_a_bad_request() {
    let parts = [Part {
        name: "note",
        filename: None,
        bytes: b"no file here",
    }];
    let (status, _, body) = post(app(ScriptedModel::default()), "/api/proofread/analyze", &parts).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "INVALID_INPUT");
}

#[tokio::test]
async fn non_multipart_body_gets_a_json_error() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/proofread/analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"file":"essay.docx"}"#))
        .expect("request");
    let response = app(ScriptedModel::default())
        .oneshot(request)
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response.into_body().collect().await.expect("body").to_bytes();
    assert_eq!(error_code(&body), "INVALID_INPUT");
}

#[tokio::test]
async fn unsupported_extension_is_a_bad_request() {
    let parts = [file("file", "notes.txt", b"plain text")];
    let (status, _, body) = post(app(ScriptedModel::default()), "/api/coherence/analyze", &parts).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "UNSUPPORTED_FORMAT");
}

#[tokio::test]
async fn pdf_on_revision_download_is_rejected_before_any_model_call() {
    let parts = [file("file", "report.pdf", b"%PDF-1.4 not really")];
    let (status, _, body) = post(
        app(ScriptedModel::default()),
        "/api/proofread/download/revised",
        &parts,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "UNSUPPORTED_FORMAT");
}

#[tokio::test]
async fn proofread_analyze_returns_findings_as_json() {
    let docx = docx_with_paragraphs(&["Please reviu teh doc."]);
    let model = ScriptedModel::replying(&[
        "[WRONG] reviu -> [CORRECT] review -> [SENTENCE] Please reviu teh doc.",
    ]);
    let parts = [file("file", "essay.docx", &docx)];
    let (status, _, body) = post(app(model), "/api/proofread/analyze", &parts).await;
    assert_eq!(status, StatusCode::OK);

    let findings: Value = serde_json::from_slice(&body).expect("json");
    assert_eq!(findings[0]["wrong"], "reviu");
    assert_eq!(findings[0]["correct"], "review");
    assert_eq!(findings[0]["page"], 1);
}

#[tokio::test]
async fn revised_download_contains_corrected_text() {
    let docx = docx_with_paragraphs(&["Please reviu teh doc.", "Untouched paragraph."]);
    let model = ScriptedModel::replying(&[
        "[WRONG] reviu -> [CORRECT] review -> [SENTENCE] Please reviu teh doc.\n\
         [WRONG] teh -> [CORRECT] the -> [SENTENCE] Please reviu teh doc.",
    ]);
    let parts = [file("file", "essay.docx", &docx)];
    let (status, headers, body) = post(app(model), "/api/proofread/download/revised", &parts).await;
    assert_eq!(status, StatusCode::OK);
    assert!(header_value(&headers, "content-disposition").contains("revised_essay.docx"));

    let package = DocxPackage::open(&body).expect("revised docx");
    assert_eq!(
        package.paragraph_texts(),
        vec!["Please review the doc.".to_string(), "Untouched paragraph.".to_string()]
    );
}

#[tokio::test]
async fn zip_download_bundles_both_documents() {
    let docx = docx_with_paragraphs(&["Please reviu the doc."]);
    let model = ScriptedModel::replying(&[
        "[WRONG] reviu -> [CORRECT] review -> [SENTENCE] Please reviu the doc.",
    ]);
    let parts = [file("file", "essay.docx", &docx)];
    let (status, headers, body) = post(app(model), "/api/proofread/download/zip", &parts).await;
    assert_eq!(status, StatusCode::OK);
    assert!(header_value(&headers, "content-disposition").contains("proofread_essay.zip"));

    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(body)).expect("zip");
    let mut names: Vec<String> = archive.file_names().map(ToString::to_string).collect();
    names.sort();
    assert_eq!(names, vec!["highlighted_essay.docx", "revised_essay.docx"]);

    let mut highlighted = Vec::new();
    std::io::Read::read_to_end(
        &mut archive.by_name("highlighted_essay.docx").expect("entry"),
        &mut highlighted,
    )
    .expect("read entry");
    let package = DocxPackage::open(&highlighted).expect("highlighted docx");
    let marked: Vec<&str> = package.paragraphs()[0]
        .runs()
        .iter()
        .filter(|run| run.format.is_highlighted())
        .map(|run| run.text.as_str())
        .collect();
    assert_eq!(marked, vec!["reviu"]);
}

#[tokio::test]
async fn comparison_lists_changed_paragraphs() {
    let original = docx_with_paragraphs(&["Intro.", "The cat sat."]);
    let revised = docx_with_paragraphs(&["Intro.", "The dog sat."]);
    let parts = [
        file("file1", "v1.docx", &original),
        file("file2", "v2.docx", &revised),
    ];
    let (status, _, body) = post(app(ScriptedModel::default()), "/api/compare/analyze", &parts).await;
    assert_eq!(status, StatusCode::OK);

    let rows: Value = serde_json::from_slice(&body).expect("json");
    assert_eq!(rows.as_array().map(Vec::len), Some(1));
    assert_eq!(rows[0]["changed_words"], "dog");
}

#[tokio::test]
async fn comparison_download_of_identical_documents_is_a_bad_request() {
    let doc = docx_with_paragraphs(&["Same text."]);
    let parts = [file("file1", "a.docx", &doc), file("file2", "b.docx", &doc)];
    let (status, _, body) = post(app(ScriptedModel::default()), "/api/compare/download", &parts).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "NOTHING_TO_EXPORT");
}

#[tokio::test]
async fn comparison_download_is_named_after_the_original() {
    let original = docx_with_paragraphs(&["The cat sat."]);
    let revised = docx_with_paragraphs(&["The dog sat."]);
    let parts = [
        file("file1", "v1.docx", &original),
        file("file2", "v2.docx", &revised),
    ];
    let (status, headers, _) = post(app(ScriptedModel::default()), "/api/compare/download", &parts).await;
    assert_eq!(status, StatusCode::OK);
    assert!(header_value(&headers, "content-disposition").contains("comparison_v1.docx"));
}

#[tokio::test]
async fn restructure_download_without_recommendations_is_a_bad_request() {
    let docx = docx_with_paragraphs(&["Well organised text."]);
    let parts = [file("file", "essay.docx", &docx)];
    let (status, _, body) = post(
        app(ScriptedModel::replying(&["[]"])),
        "/api/restructure/download",
        &parts,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "NOTHING_TO_EXPORT");
}

#[tokio::test]
async fn restructure_download_highlights_misplaced_paragraph() {
    let docx = docx_with_paragraphs(&["Chapter 1.", "Lunch is at noon.", "Chapter 2."]);
    let model = ScriptedModel::replying(&[
        r#"[{"misplaced_paragraph":"Lunch is at noon.","original_section":"Chapter 1","recommended_section":"Chapter 2"}]"#,
    ]);
    let parts = [file("file", "essay.docx", &docx)];
    let (status, headers, body) = post(app(model), "/api/restructure/download", &parts).await;
    assert_eq!(status, StatusCode::OK);
    assert!(header_value(&headers, "content-disposition")
        .contains("highlighted_recommendations_essay.docx"));

    let package = DocxPackage::open(&body).expect("docx");
    let highlighted: Vec<bool> = package
        .paragraphs()
        .iter()
        .map(|paragraph| paragraph.runs().iter().all(|run| run.format.is_highlighted()))
        .collect();
    assert_eq!(highlighted, vec![false, true, false]);
}
