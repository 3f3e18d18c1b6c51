//! PDF text extraction

use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// Extracted PDF text plus metadata
#[derive(Debug, Clone)]
pub struct ParsedPdf {
    /// Extracted text content, cleaned and normalized
    pub content: String,
    /// Content hash (sha256, hex)
    pub content_hash: String,
    /// Total pages, when the PDF structure is readable
    pub total_pages: Option<u32>,
}

/// PDF parser with a primary extractor and a raw-content fallback
pub struct PdfParser;

impl PdfParser {
    /// Check that the filename carries a `.pdf` extension
    pub fn is_pdf_filename(filename: &str) -> bool {
        filename
            .rsplit('.')
            .next()
            .map(|ext| ext.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false)
            && filename.contains('.')
    }

    /// Parse PDF bytes into text
    pub fn parse(filename: &str, data: &[u8]) -> Result<ParsedPdf> {
        if !Self::is_pdf_filename(filename) {
            let ext = filename.rsplit('.').next().unwrap_or("").to_string();
            return Err(Error::UnsupportedFileType(ext));
        }

        let content = match pdf_extract::extract_text_from_mem(data) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("pdf-extract failed: {}, trying fallback", e);
                Self::extract_text_fallback(filename, data)?
            }
        };

        let content = cleanup_pdf_text(&content);
        let content = content
            .replace('\0', "")
            .lines()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        if content.trim().is_empty() {
            return Err(Error::file_parse(
                filename,
                "No text content could be extracted from PDF",
            ));
        }

        let total_pages = match lopdf::Document::load_mem(data) {
            Ok(doc) => Some(doc.get_pages().len() as u32),
            Err(_) => None,
        };

        Ok(ParsedPdf {
            content_hash: hash_content(&content),
            content,
            total_pages,
        })
    }

    /// Fallback extraction using lopdf content streams directly
    fn extract_text_fallback(filename: &str, data: &[u8]) -> Result<String> {
        let doc = lopdf::Document::load_mem(data)
            .map_err(|e| Error::file_parse(filename, format!("Failed to load PDF: {}", e)))?;

        let mut all_text = String::new();

        for (page_num, page_id) in doc.get_pages() {
            match doc.get_page_content(page_id) {
                Ok(content) => {
                    let text = Self::extract_text_from_content(&content);
                    if !text.is_empty() {
                        all_text.push_str(&format!("\n--- Page {} ---\n", page_num));
                        all_text.push_str(&text);
                    }
                }
                Err(e) => {
                    tracing::debug!("Could not get content for page {}: {}", page_num, e);
                }
            }
        }

        if all_text.trim().is_empty() {
            return Err(Error::file_parse(
                filename,
                "PDF appears to be image-based or has no extractable text",
            ));
        }

        Ok(all_text)
    }

    /// Extract text show operators from a PDF content stream
    fn extract_text_from_content(content: &[u8]) -> String {
        let content_str = String::from_utf8_lossy(content);
        let mut text = String::new();
        let mut in_text_block = false;
        let mut current_text = String::new();

        for line in content_str.lines() {
            let line = line.trim();

            if line == "BT" {
                in_text_block = true;
                continue;
            }

            if line == "ET" {
                in_text_block = false;
                if !current_text.is_empty() {
                    text.push_str(&current_text);
                    text.push(' ');
                    current_text.clear();
                }
                continue;
            }

            if in_text_block && (line.ends_with("Tj") || line.ends_with("TJ")) {
                if let (Some(start), Some(end)) = (line.find('('), line.rfind(')')) {
                    if start < end {
                        let extracted = &line[start + 1..end];
                        let decoded = extracted
                            .replace("\\n", "\n")
                            .replace("\\r", "\r")
                            .replace("\\t", "\t")
                            .replace("\\(", "(")
                            .replace("\\)", ")")
                            .replace("\\\\", "\\");
                        current_text.push_str(&decoded);
                    }
                }
            }
        }

        text
    }
}

/// Replace problematic glyphs pdf-extract leaves behind with ASCII
/// approximations.
fn cleanup_pdf_text(text: &str) -> String {
    text.replace('\u{2010}', "-") // Hyphen
        .replace('\u{2011}', "-") // Non-breaking hyphen
        .replace('\u{2013}', "-") // En dash
        .replace('\u{2014}', "--") // Em dash
        .replace('\u{2018}', "'") // Left single quote
        .replace('\u{2019}', "'") // Right single quote
        .replace('\u{201C}', "\"") // Left double quote
        .replace('\u{201D}', "\"") // Right double quote
        .replace('\u{2022}', "* ") // Bullet
        .replace('\u{2026}', "...") // Ellipsis
        .replace('\u{00A0}', " ") // Non-breaking space
        .replace('\u{FB01}', "fi") // fi ligature
        .replace('\u{FB02}', "fl") // fl ligature
        .replace('\u{FB00}', "ff") // ff ligature
        .replace('\u{FB03}', "ffi") // ffi ligature
        .replace('\u{FB04}', "ffl") // ffl ligature
}

/// Hash extracted content (sha256, hex)
fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_extension_check_is_case_insensitive() {
        assert!(PdfParser::is_pdf_filename("plan.pdf"));
        assert!(PdfParser::is_pdf_filename("PLAN.PDF"));
        assert!(PdfParser::is_pdf_filename("rapport.climat.Pdf"));
        assert!(!PdfParser::is_pdf_filename("plan.docx"));
        assert!(!PdfParser::is_pdf_filename("pdf"));
        assert!(!PdfParser::is_pdf_filename(""));
    }

    #[test]
    fn non_pdf_upload_is_rejected() {
        let err = PdfParser::parse("notes.txt", b"hello").unwrap_err();
        assert!(matches!(err, Error::UnsupportedFileType(ext) if ext == "txt"));
    }

    #[test]
    fn glyph_cleanup_normalizes_ligatures_and_quotes() {
        let raw = "e\u{FB03}cient \u{201C}net\u{2011}zero\u{201D} target\u{2026}";
        assert_eq!(cleanup_pdf_text(raw), "efficient \"net-zero\" target...");
    }

    #[test]
    fn content_hash_is_stable_and_hex() {
        let a = hash_content("trajectoire 2030");
        let b = hash_content("trajectoire 2030");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, hash_content("trajectoire 2050"));
    }

    #[test]
    fn content_stream_text_extraction_reads_tj_operators() {
        let stream = b"BT\n(Scope 1 emissions) Tj\nET\nBT\n(fell 12\\%) Tj\nET\n";
        let text = PdfParser::extract_text_from_content(stream);
        assert!(text.contains("Scope 1 emissions"));
        assert!(text.contains("fell 12"));
    }
}
