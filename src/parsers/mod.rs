pub mod html;
pub mod text;

#[cfg(test)]
mod tests;

pub use html::{ParsedPage, Platform, RawLink};

use crate::results::DocumentKind;

/// Enum to represent how a discovered URL should be handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserType {
    /// HTML page, parsed for text and links
    Html,
    /// Office or PDF document, handed to the document extractor
    Document(DocumentKind),
    /// Images, stylesheets and scripts
    Other,
}

impl ParserType {
    /// Determines the parser type from the URL path extension
    pub fn from_url(url: &str) -> Self {
        let lower = url.to_lowercase();
        let path = lower
            .split(['?', '#'])
            .next()
            .unwrap_or(lower.as_str());

        if path.ends_with(".pdf") {
            ::log::debug!("Classifying as PDF: {}", url);
            ParserType::Document(DocumentKind::Pdf)
        } else if path.ends_with(".xlsx") {
            ::log::debug!("Classifying as spreadsheet: {}", url);
            ParserType::Document(DocumentKind::Xlsx)
        } else if path.ends_with(".docx") {
            ::log::debug!("Classifying as Word document: {}", url);
            ParserType::Document(DocumentKind::Docx)
        } else if path.ends_with(".csv") {
            ::log::debug!("Classifying as CSV: {}", url);
            ParserType::Document(DocumentKind::Csv)
        } else if path.ends_with(".jpg")
            || path.ends_with(".jpeg")
            || path.ends_with(".png")
            || path.ends_with(".gif")
            || path.ends_with(".svg")
            || path.ends_with(".css")
            || path.ends_with(".js")
        {
            ParserType::Other
        } else {
            ParserType::Html
        }
    }

    /// The document kind, if this URL points at a recognized document
    pub fn document_kind(&self) -> Option<DocumentKind> {
        match self {
            ParserType::Document(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Returns if the parser should extract links
    pub fn should_extract_links(&self) -> bool {
        matches!(self, ParserType::Html)
    }
}
