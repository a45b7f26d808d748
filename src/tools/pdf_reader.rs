use std::path::Path;
use std::sync::LazyLock;

use async_trait::async_trait;
use lopdf::Document;
use regex::Regex;
use tracing::{info, warn};

use crate::tools::Tool;

static REPEATED_NEWLINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n+").unwrap());

/// Extracts the text of every page of a PDF.
pub struct ReadDocumentTool;

impl ReadDocumentTool {
    pub fn extract_text(path: &Path) -> anyhow::Result<String> {
        let document = Document::load(path)?;

        let mut report = String::new();
        for page_number in document.get_pages().keys() {
            let content = document.extract_text(&[*page_number])?;
            if !content.is_empty() {
                report.push_str(&content);
                report.push('\n');
            }
        }

        Ok(collapse_newlines(&report))
    }
}

pub(crate) fn collapse_newlines(text: &str) -> String {
    REPEATED_NEWLINES.replace_all(text, "\n").into_owned()
}

/// Agents sometimes wrap the path in quotes or backticks.
fn clean_path(input: &str) -> &str {
    input.trim().trim_matches(|c| c == '"' || c == '\'' || c == '`')
}

#[async_trait]
impl Tool for ReadDocumentTool {
    fn name(&self) -> &str {
        "Read Financial Document"
    }

    fn description(&self) -> &str {
        "Tool to read data from a pdf file from a given path. Input: the file path."
    }

    async fn call(&self, input: &str) -> String {
        let path = clean_path(input).to_string();
        let outcome = tokio::task::spawn_blocking(move || Self::extract_text(Path::new(&path))).await;

        match outcome {
            Ok(Ok(text)) => {
                info!(chars = text.len(), "Extracted document text");
                text
            }
            Ok(Err(e)) => {
                warn!(error = %e, "PDF extraction failed");
                format!("Error reading PDF: {}", e)
            }
            Err(e) => format!("Error reading PDF: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};
    use tempfile::TempDir;

    fn write_sample_pdf(path: &Path, text: &str) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![100.into(), 600.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }

    #[test]
    fn test_collapse_newlines() {
        assert_eq!(collapse_newlines("a\n\n\nb\nc\n\n"), "a\nb\nc\n");
        assert_eq!(collapse_newlines("no breaks"), "no breaks");
    }

    #[test]
    fn test_clean_path() {
        assert_eq!(clean_path("  \"data/x.pdf\"\n"), "data/x.pdf");
        assert_eq!(clean_path("`data/x.pdf`"), "data/x.pdf");
    }

    #[tokio::test]
    async fn test_reads_pdf_text() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("report.pdf");
        write_sample_pdf(&path, "Revenue 2024");

        let output = ReadDocumentTool.call(path.to_str().unwrap()).await;

        assert!(output.contains("Revenue 2024"), "unexpected output: {output}");
        assert!(!output.contains("\n\n"));
    }

    #[tokio::test]
    async fn test_non_pdf_input_returns_error_text() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes.pdf");
        std::fs::write(&path, "just some plain text").unwrap();

        let output = ReadDocumentTool.call(path.to_str().unwrap()).await;
        assert!(output.starts_with("Error reading PDF:"));
    }

    #[tokio::test]
    async fn test_missing_file_returns_error_text() {
        let output = ReadDocumentTool.call("/definitely/not/here.pdf").await;
        assert!(output.starts_with("Error reading PDF:"));
    }
}
