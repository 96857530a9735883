use crate::results::PageRecord;
use crate::utils::truncate_chars;
use std::fmt::Write;

/// Renders everything known about the site as plain text for the model
///
/// Sections come in priority order (main page, linked pages by relevance,
/// documents) so the cap at `max_length` characters drops the least useful
/// material first.
pub fn build_context(record: &PageRecord, max_length: usize) -> String {
    let mut context = String::new();

    let _ = writeln!(context, "=== WEBSITE: {} ===", record.url);
    if !record.title.is_empty() {
        let _ = writeln!(context, "Title: {}", record.title);
    }
    if !record.description.is_empty() {
        let _ = writeln!(context, "Description: {}", record.description);
    }
    for (name, value) in &record.metadata {
        if name == "description" {
            continue;
        }
        let _ = writeln!(context, "Meta {}: {}", name, value);
    }
    if !record.text.is_empty() {
        let _ = writeln!(context, "\nContent:\n{}", record.text);
    }

    if !record.links.is_empty() {
        let _ = writeln!(context, "\nLinks:");
        for link in &record.links {
            let label = if link.anchor_text.is_empty() {
                link.url.as_str()
            } else {
                link.anchor_text.as_str()
            };
            let _ = writeln!(context, "- {} ({})", label, link.url);
        }
    }

    let mut linked: Vec<_> = record.linked_pages.values().collect();
    linked.sort_by(|a, b| b.relevance.cmp(&a.relevance).then_with(|| a.url.cmp(&b.url)));
    for page in linked {
        let _ = writeln!(
            context,
            "\n=== LINKED PAGE ({}): {} ===",
            page.content_type, page.url
        );
        if !page.title.is_empty() {
            let _ = writeln!(context, "Title: {}", page.title);
        }
        if !page.description.is_empty() {
            let _ = writeln!(context, "Description: {}", page.description);
        }
        if !page.keywords.is_empty() {
            let _ = writeln!(context, "Keywords: {}", page.keywords.join(", "));
        }
        if page.relevance > 0 {
            let _ = writeln!(context, "Relevance: {}/10", page.relevance);
        }
        if !page.text.is_empty() {
            let _ = writeln!(context, "{}", page.text);
        }
    }

    for document in record.documents.values() {
        let _ = writeln!(
            context,
            "\n=== DOCUMENT ({}): {} ===",
            document.kind.as_str(),
            document.url
        );
        if !document.title.is_empty() {
            let _ = writeln!(context, "Title: {}", document.title);
        }
        if !document.text.is_empty() {
            let _ = writeln!(context, "{}", document.text);
        }
    }

    truncate_chars(&context, max_length)
}

/// Full prompt: context block, the question, then answering rules
pub fn build_prompt(record: &PageRecord, question: &str, max_context_length: usize) -> String {
    format!(
        "You are an assistant answering questions about the website below and the person or \
         organisation behind it.\n\n\
         {}\n\n\
         Question: {}\n\n\
         Instructions:\n\
         - Answer only from the website information above.\n\
         - Mention which page or profile the answer comes from when it helps.\n\
         - If the information is not there, say so plainly.\n\n\
         Answer:",
        build_context(record, max_context_length).trim_end(),
        question.trim()
    )
}
