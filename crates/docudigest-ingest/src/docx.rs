//! Raw text extraction from Office Open XML (`.docx`) documents.
//!
//! A `.docx` file is a ZIP container; the body lives in `word/document.xml`:
//! ```xml
//! <w:document>
//!   <w:body>
//!     <w:p>
//!       <w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr>
//!       <w:r><w:t xml:space="preserve">Hello </w:t></w:r>
//!       <w:r><w:tab/><w:t>world</w:t><w:br/></w:r>
//!     </w:p>
//!   </w:body>
//! </w:document>
//! ```
//! Only run text is kept. Paragraphs become lines; `<w:tab/>` and `<w:br/>`
//! inside runs become `\t` and `\n`. Styling, numbering and tab-stop
//! definitions are dropped.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::Event;
use thiserror::Error;

const DOCUMENT_PART: &str = "word/document.xml";

#[derive(Error, Debug)]
pub enum DocxError {
    #[error("invalid DOCX container: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("malformed document XML: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Extract the raw paragraph text of a `.docx` file.
pub fn extract_text_from_docx(path: &Path) -> Result<String, DocxError> {
    let file = File::open(path)?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file))?;
    let mut xml = Vec::new();
    archive.by_name(DOCUMENT_PART)?.read_to_end(&mut xml)?;
    document_xml_to_text(&xml)
}

/// Convert the contents of `word/document.xml` to plain text.
///
/// Drawing objects are stored twice under `mc:AlternateContent`; only the
/// `mc:Fallback` copy is read. A paragraph nested inside another (text
/// boxes) is placed on its own line at the point where it occurs.
pub fn document_xml_to_text(xml: &[u8]) -> Result<String, DocxError> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();

    let mut paragraphs: Vec<String> = Vec::new();
    // Open paragraphs, innermost last
    let mut open: Vec<String> = Vec::new();
    // Text outside any paragraph (rare, but seen in hand-built files)
    let mut loose = String::new();
    let mut run_depth = 0usize;
    let mut choice_depth = 0usize;
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) if e.local_name().as_ref() == b"Choice" => choice_depth += 1,
            Event::End(ref e) if e.local_name().as_ref() == b"Choice" => {
                choice_depth = choice_depth.saturating_sub(1)
            }
            Event::Eof => break,
            _ if choice_depth > 0 => {}
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"p" => open.push(String::new()),
                b"r" => run_depth += 1,
                b"t" if run_depth > 0 => in_text = true,
                _ => {}
            },
            Event::Empty(ref e) => match e.local_name().as_ref() {
                b"tab" if run_depth > 0 => sink(&mut open, &mut loose).push('\t'),
                b"br" | b"cr" if run_depth > 0 => sink(&mut open, &mut loose).push('\n'),
                // Self-closing paragraph: an empty line
                b"p" => close_paragraph(String::new(), &mut open, &mut paragraphs),
                _ => {}
            },
            Event::Text(ref e) if in_text => {
                sink(&mut open, &mut loose).push_str(&e.unescape()?);
            }
            Event::CData(ref e) if in_text => {
                sink(&mut open, &mut loose).push_str(&String::from_utf8_lossy(e));
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"r" => run_depth = run_depth.saturating_sub(1),
                b"p" => {
                    if let Some(text) = open.pop() {
                        close_paragraph(text, &mut open, &mut paragraphs);
                    }
                }
                _ => {}
            },
            _ => {}
        }
        buf.clear();
    }

    // Unterminated paragraphs in a truncated part
    while let Some(text) = open.pop() {
        close_paragraph(text, &mut open, &mut paragraphs);
    }
    if !loose.is_empty() {
        paragraphs.push(loose);
    }

    Ok(paragraphs.join("\n"))
}

fn sink<'a>(open: &'a mut Vec<String>, loose: &'a mut String) -> &'a mut String {
    match open.last_mut() {
        Some(current) => current,
        None => loose,
    }
}

fn close_paragraph(text: String, open: &mut [String], paragraphs: &mut Vec<String>) {
    match open.last_mut() {
        Some(parent) => {
            if !parent.is_empty() && !parent.ends_with('\n') {
                parent.push('\n');
            }
            parent.push_str(&text);
            parent.push('\n');
        }
        None => paragraphs.push(text),
    }
}
