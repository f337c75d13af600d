#![allow(dead_code)]

use std::collections::VecDeque;
use std::future::Future;
use std::io::{Cursor, Write};
use std::sync::Mutex;

use proofreader_lib::core::errors::{AppError, AppResult};
use proofreader_lib::providers::{ResponseFormat, TextModel};
use zip::write::SimpleFileOptions;

pub const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?><w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"/>"#;

/// Minimal DOCX package: `word/document.xml` wrapping `body`, plus a styles part.
pub fn build_docx(body: &str) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::<u8>::new()));
    let options = SimpleFileOptions::default();

    zip.start_file("word/document.xml", options).expect("start document");
    write!(
        zip,
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}<w:sectPr/></w:body></w:document>"#
    )
    .expect("write document");

    zip.start_file("word/styles.xml", options).expect("start styles");
    zip.write_all(STYLES_XML.as_bytes()).expect("write styles");

    zip.finish().expect("finish zip").into_inner()
}

/// One plain paragraph per entry.
pub fn docx_with_paragraphs(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|text| format!("<w:p><w:r><w:t xml:space=\"preserve\">{text}</w:t></w:r></w:p>"))
        .collect();
    build_docx(&body)
}

/// Replays canned replies in order and records every prompt it receives.
#[derive(Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<AppResult<String>>>,
    prompts: Mutex<Vec<(String, ResponseFormat)>>,
}

impl ScriptedModel {
    pub fn new<I>(replies: I) -> Self
    where
        I: IntoIterator<Item = AppResult<String>>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(replies: &[&str]) -> Self {
        Self::new(replies.iter().map(|reply| Ok(reply.to_string())))
    }

    pub fn prompts(&self) -> Vec<(String, ResponseFormat)> {
        self.prompts.lock().expect("prompts lock").clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().expect("prompts lock").len()
    }
}

impl TextModel for ScriptedModel {
    fn generate(
        &self,
        prompt: &str,
        format: ResponseFormat,
    ) -> impl Future<Output = AppResult<String>> + Send {
        self.prompts
            .lock()
            .expect("prompts lock")
            .push((prompt.to_string(), format));
        let reply = self
            .replies
            .lock()
            .expect("replies lock")
            .pop_front()
            .unwrap_or_else(|| Err(AppError::Network("no scripted reply left".to_string())));
        async move { reply }
    }

    fn model_name(&self) -> &str {
        "scripted-model"
    }
}
