//! Per-format text extraction.
//!
//! The format is chosen from the file extension. Every extractor returns
//! plain UTF-8 text with one logical line (paragraph, HTML text node, PDF
//! text line) per `\n`; whitespace cleanup happens later in the ingest
//! pipeline. Failures are returned, never panicked, so the pipeline can
//! record the file as skipped.

use std::io::Read;
use std::path::Path;

use scraper::node::Node;
use scraper::{ElementRef, Html};
use thiserror::Error;

/// Maximum decompressed bytes to read from a single ZIP entry (zip-bomb protection).
const MAX_XML_ENTRY_BYTES: u64 = 50 * 1024 * 1024;

/// HTML elements whose text never reaches the output.
const HTML_DROP_TAGS: &[&str] = &["script", "style", "noscript"];

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported extension: {0}")]
    UnsupportedExtension(String),
    #[error("PDF extraction failed: {0}")]
    Pdf(String),
    #[error("OOXML extraction failed: {0}")]
    Ooxml(String),
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Pdf,
    Docx,
    Html,
    Text,
}

impl Format {
    /// Format for a lower-case extension without the dot.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "pdf" => Some(Format::Pdf),
            "docx" => Some(Format::Docx),
            "html" | "htm" => Some(Format::Html),
            "txt" | "md" | "rst" => Some(Format::Text),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        Self::from_extension(&extension_of(path))
    }
}

/// Lower-cased extension of `path`, empty when there is none.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default()
}

/// Read `path` and extract its text according to its extension.
pub fn extract_file(path: &Path) -> Result<String, ExtractError> {
    let format = Format::from_path(path)
        .ok_or_else(|| ExtractError::UnsupportedExtension(extension_of(path)))?;
    let bytes = std::fs::read(path)?;
    extract_bytes(&bytes, format)
}

pub fn extract_bytes(bytes: &[u8], format: Format) -> Result<String, ExtractError> {
    match format {
        Format::Pdf => extract_pdf(bytes),
        Format::Docx => extract_docx(bytes),
        Format::Html => Ok(extract_html(&String::from_utf8_lossy(bytes))),
        Format::Text => Ok(String::from_utf8_lossy(bytes).into_owned()),
    }
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))
}

fn read_zip_entry_bounded(
    archive: &mut zip::ZipArchive<std::io::Cursor<&[u8]>>,
    name: &str,
    max_bytes: u64,
) -> Result<Vec<u8>, ExtractError> {
    let entry = archive
        .by_name(name)
        .map_err(|e| ExtractError::Ooxml(format!("{}: {}", name, e)))?;
    let mut out = Vec::new();
    entry
        .take(max_bytes)
        .read_to_end(&mut out)
        .map_err(|e| ExtractError::Ooxml(e.to_string()))?;
    if out.len() as u64 >= max_bytes {
        return Err(ExtractError::Ooxml(format!(
            "ZIP entry {} exceeds size limit ({} bytes)",
            name, max_bytes
        )));
    }
    Ok(out)
}

fn extract_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes))
        .map_err(|e| ExtractError::Ooxml(e.to_string()))?;
    let xml = read_zip_entry_bounded(&mut archive, "word/document.xml", MAX_XML_ENTRY_BYTES)?;
    docx_paragraphs(&xml).map(|lines| lines.join("\n"))
}

/// Text of every non-empty `<w:p>`, trimmed, in document order.
fn docx_paragraphs(xml: &[u8]) -> Result<Vec<String>, ExtractError> {
    use quick_xml::events::Event;

    let mut reader = quick_xml::Reader::from_reader(xml);
    // Runs split words at arbitrary points; inner spaces must survive.
    reader.config_mut().trim_text(false);
    let mut buf = Vec::new();
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text = false;
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"p" => current.clear(),
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"tab" => current.push('\t'),
                b"br" | b"cr" => current.push(' '),
                _ => {}
            },
            Ok(Event::Text(te)) if in_text => {
                let text = te
                    .unescape()
                    .map_err(|e| ExtractError::Ooxml(e.to_string()))?;
                current.push_str(&text);
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    let line = current.trim();
                    if !line.is_empty() {
                        paragraphs.push(line.to_string());
                    }
                    current.clear();
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(ExtractError::Ooxml(e.to_string())),
            _ => {}
        }
        buf.clear();
    }
    Ok(paragraphs)
}

/// Visible text of an HTML document, one trimmed text line per output line.
pub fn extract_html(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut lines = Vec::new();
    collect_html_lines(document.root_element(), &mut lines);
    lines.join("\n")
}

fn collect_html_lines(root: ElementRef, lines: &mut Vec<String>) {
    // Explicit stack: input nesting depth is unbounded.
    let mut stack = vec![*root];
    while let Some(node) = stack.pop() {
        match node.value() {
            Node::Element(element) => {
                let tag = element.name().to_ascii_lowercase();
                if HTML_DROP_TAGS.contains(&tag.as_str()) {
                    continue;
                }
                // Reversed so children pop in document order.
                stack.extend(node.children().rev());
            }
            Node::Text(text) => {
                for line in text.lines() {
                    let line = line.trim();
                    if !line.is_empty() {
                        lines.push(line.to_string());
                    }
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn docx_with_body(body: &str) -> Vec<u8> {
        let mut cursor = std::io::Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut cursor);
            let opts = zip::write::SimpleFileOptions::default();
            zip.start_file("word/document.xml", opts).unwrap();
            write!(
                zip,
                r#"<?xml version="1.0" encoding="UTF-8"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
                body
            )
            .unwrap();
            zip.finish().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(Format::from_path(Path::new("a/B.PDF")), Some(Format::Pdf));
        assert_eq!(Format::from_path(Path::new("x.htm")), Some(Format::Html));
        assert_eq!(Format::from_path(Path::new("notes.rst")), Some(Format::Text));
        assert_eq!(Format::from_path(Path::new("image.png")), None);
        assert_eq!(Format::from_path(Path::new("README")), None);
    }

    #[test]
    fn unsupported_extension_returns_error() {
        let err = extract_file(Path::new("photo.jpeg")).unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedExtension(ref e) if e == "jpeg"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = extract_file(Path::new("/nonexistent/paperbox/missing.txt")).unwrap_err();
        assert!(matches!(err, ExtractError::Io(_)));
    }

    #[test]
    fn invalid_pdf_returns_error() {
        let err = extract_bytes(b"not a pdf", Format::Pdf).unwrap_err();
        assert!(matches!(err, ExtractError::Pdf(_)));
    }

    #[test]
    fn invalid_zip_returns_error_for_docx() {
        let err = extract_bytes(b"not a zip", Format::Docx).unwrap_err();
        assert!(matches!(err, ExtractError::Ooxml(_)));
    }

    #[test]
    fn docx_paragraphs_become_lines() {
        let bytes = docx_with_body(
            "<w:p><w:r><w:t>Social </w:t></w:r><w:r><w:t>systems</w:t></w:r></w:p>\
             <w:p></w:p>\
             <w:p><w:r><w:t xml:space=\"preserve\">  Second &amp; last  </w:t></w:r></w:p>",
        );
        let text = extract_bytes(&bytes, Format::Docx).unwrap();
        assert_eq!(text, "Social systems\nSecond & last");
    }

    #[test]
    fn docx_without_document_xml_is_error() {
        let mut cursor = std::io::Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut cursor);
            zip.start_file("other.xml", zip::write::SimpleFileOptions::default())
                .unwrap();
            zip.write_all(b"<x/>").unwrap();
            zip.finish().unwrap();
        }
        let err = extract_bytes(&cursor.into_inner(), Format::Docx).unwrap_err();
        assert!(matches!(err, ExtractError::Ooxml(_)));
    }

    #[test]
    fn html_drops_scripts_and_styles() {
        let html = "<html><head><title>Page</title><style>p { color: red; }</style></head>\
            <body><h1>Heading</h1><script>var x = 1;</script>\
            <p>First   paragraph.</p><noscript>enable js</noscript><p>Second</p></body></html>";
        let text = extract_html(html);
        assert_eq!(text, "Page\nHeading\nFirst   paragraph.\nSecond");
    }

    #[test]
    fn html_deep_nesting_does_not_exhaust_the_stack() {
        let depth = 5_000;
        let html = format!(
            "<html><body>{}deep text{}<p>after</p></body></html>",
            "<div>".repeat(depth),
            "</div>".repeat(depth)
        );
        // A small stack makes per-level recursion overflow well before `depth`.
        let text = std::thread::Builder::new()
            .stack_size(512 * 1024)
            .spawn(move || extract_html(&html))
            .unwrap()
            .join()
            .unwrap();
        assert_eq!(text, "deep text\nafter");
    }

    #[test]
    fn text_is_read_lossily() {
        let text = extract_bytes(b"caf\xe9 ok", Format::Text).unwrap();
        assert!(text.starts_with("caf"));
        assert!(text.ends_with(" ok"));
    }
}
