use crate::parsers::ParserType;
use crate::results::DocumentKind;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_urls() {
        assert_eq!(
            ParserType::from_url("https://example.com/files/CV.pdf"),
            ParserType::Document(DocumentKind::Pdf)
        );
        assert_eq!(
            ParserType::from_url("https://example.com/data.xlsx?download=1"),
            ParserType::Document(DocumentKind::Xlsx)
        );
        assert_eq!(
            ParserType::from_url("https://example.com/letter.docx#page=2"),
            ParserType::Document(DocumentKind::Docx)
        );
        assert_eq!(
            ParserType::from_url("https://example.com/export.csv").document_kind(),
            Some(DocumentKind::Csv)
        );
    }

    #[test]
    fn test_pages_and_assets() {
        let page = ParserType::from_url("https://example.com/about");
        assert_eq!(page, ParserType::Html);
        assert!(page.should_extract_links());
        assert_eq!(page.document_kind(), None);

        let asset = ParserType::from_url("https://example.com/logo.png");
        assert_eq!(asset, ParserType::Other);
        assert!(!asset.should_extract_links());
    }

    #[test]
    fn test_extension_in_query_is_ignored() {
        assert_eq!(
            ParserType::from_url("https://example.com/view?file=report.pdf"),
            ParserType::Html
        );
    }
}
