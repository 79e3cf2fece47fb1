//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use doc_analyzer_database::{
    create_sqlite_pool, migrations::run_sqlite_migrations, AnalysisRepository, DocumentRepository,
    SqlitePool,
};
use doc_analyzer_service::{create_app, llm_client::TextGenerator, AppState};
use doc_analyzer_utils::{AnalyzerResult, ServerConfig};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

pub const BOUNDARY: &str = "doc-analyzer-test-boundary";

/// Generator that always answers with the same text and counts calls.
pub struct StubGenerator {
    response: String,
    calls: AtomicUsize,
}

impl StubGenerator {
    pub fn new(response: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            response: response.into(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, _prompt: &str) -> AnalyzerResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.clone())
    }
}

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub generator: Arc<StubGenerator>,
}

pub async fn test_app(llm_response: &str) -> TestApp {
    let pool = create_sqlite_pool("sqlite::memory:", 1).await.unwrap();
    run_sqlite_migrations(&pool).await.unwrap();

    let generator = StubGenerator::new(llm_response);
    let state = AppState::new(pool.clone(), generator.clone());
    let router = create_app(state, &ServerConfig::default());

    TestApp {
        router,
        pool,
        generator,
    }
}

pub async fn document_count(pool: &SqlitePool) -> usize {
    DocumentRepository::new(pool.clone()).find_all().await.unwrap().len()
}

pub async fn analysis_count(pool: &SqlitePool) -> usize {
    AnalysisRepository::new(pool.clone()).find_all().await.unwrap().len()
}

/// Build a PDF with one page per entry; an empty entry gives a page with no
/// text operators.
pub fn build_pdf(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let operations = if text.is_empty() {
            Vec::new()
        } else {
            vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ]
        };
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages.len() as i64,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Multipart body with a single `file` field.
pub fn multipart_body(filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}
