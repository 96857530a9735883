use crate::parsers::html::{self, Platform};

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE_PAGE: &str = r#"<html>
        <head>
            <title>  Alice   Example </title>
            <meta name="description" content="Personal site of Alice">
            <meta name="Keywords" content="rust, crawling , ,llm">
            <meta property="og:title" content="Alice">
            <script>var tracking = 1;</script>
        </head>
        <body>
            <h1>Alice Example</h1>
            <p>Building   tools
               for the web.</p>
            <style>.x { color: red; }</style>
            <noscript>Enable JavaScript</noscript>
            <ul>
                <li><a href="https://github.com/alice">GitHub</a></li>
                <li><a href="/blog/">My blog</a></li>
                <li><a href="">empty</a></li>
            </ul>
        </body>
    </html>"#;

    #[test]
    fn test_parse_title_and_meta() {
        let page = html::parse(PROFILE_PAGE);
        assert_eq!(page.title, "Alice Example");
        assert_eq!(page.description(), "Personal site of Alice");
        assert_eq!(page.keywords(), vec!["rust", "crawling", "llm"]);
        assert_eq!(page.meta.get("og:title").map(String::as_str), Some("Alice"));
    }

    #[test]
    fn test_missing_title_is_empty() {
        let page = html::parse("<html><body><p>No head here</p></body></html>");
        assert_eq!(page.title, "");
        assert_eq!(page.description(), "");
    }

    #[test]
    fn test_description_falls_back_to_open_graph() {
        let page = html::parse(
            r#"<html><head><meta property="og:description" content="From OG"></head></html>"#,
        );
        assert_eq!(page.description(), "From OG");
    }

    #[test]
    fn test_links_keep_document_order_and_anchor_text() {
        let page = html::parse(PROFILE_PAGE);
        assert_eq!(page.links.len(), 2);
        assert_eq!(page.links[0].href, "https://github.com/alice");
        assert_eq!(page.links[0].text, "GitHub");
        assert_eq!(page.links[1].href, "/blog/");
        assert_eq!(page.links[1].text, "My blog");
    }

    #[test]
    fn test_text_walk_skips_non_content_elements() {
        let page = html::parse(PROFILE_PAGE);
        assert_eq!(
            page.text_lines,
            vec!["Alice Example", "Building tools for the web."]
        );
    }

    #[test]
    fn test_text_walk_emits_each_element_once() {
        let page = html::parse("<body><div>Outer <b>bold</b> tail<p>Inner</p></div></body>");
        assert_eq!(page.text_lines, vec!["Outer tail", "bold", "Inner"]);
    }

    #[test]
    fn test_github_highlights() {
        let html_content = r#"<html><body>
            <span class="p-name">Alice</span>
            <div class="p-note user-profile-bio">Rust developer and crawler enthusiast</div>
            <p>Footer</p>
        </body></html>"#;

        let page = html::parse_with_platform(html_content, Some(Platform::GitHub));
        assert_eq!(
            page.highlights,
            vec!["Alice", "Rust developer and crawler enthusiast"]
        );

        let page = html::parse(html_content);
        assert!(page.highlights.is_empty());
    }

    #[test]
    fn test_platform_from_url() {
        assert_eq!(
            Platform::from_url("https://github.com/alice"),
            Some(Platform::GitHub)
        );
        assert_eq!(
            Platform::from_url("https://www.LinkedIn.com/in/alice"),
            Some(Platform::LinkedIn)
        );
        assert_eq!(Platform::from_url("https://example.com"), None);
    }
}
