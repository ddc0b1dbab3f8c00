//! Markdown output formatting.

use std::borrow::Cow;

use crate::models::{EdgePage, PaperPage, PaperRecord};

/// Abstracts longer than this many characters are cut.
const ABSTRACT_PREVIEW_CHARS: usize = 300;

/// Format a page of papers as Markdown.
#[must_use]
pub fn format_paper_page_markdown(page: &PaperPage, heading: &str) -> String {
    if page.is_empty() {
        return "No papers found.".to_string();
    }

    let mut output = match page.total {
        Some(total) => format!("# {heading} ({} of {total} results)\n\n", page.len()),
        None => format!("# {heading} ({} results)\n\n", page.len()),
    };

    for (i, paper) in page.data.iter().enumerate() {
        output.push_str(&format_paper_markdown(paper, i + 1));
        output.push_str("\n---\n\n");
    }

    if let Some(next) = page.next {
        output.push_str(&format!("*More results available from offset {next}.*\n"));
    }

    output
}

/// Format citations or references as Markdown.
#[must_use]
pub fn format_edge_page_markdown(page: &EdgePage, heading: &str) -> String {
    if page.is_empty() {
        return "No linked papers found.".to_string();
    }

    let mut output = format!("# {heading} ({} results)\n\n", page.len());

    for (i, edge) in page.data.iter().enumerate() {
        output.push_str(&format_paper_markdown(&edge.paper, i + 1));
        if edge.is_influential() {
            output.push_str("**Influential citation**\n");
        }
        output.push_str("\n---\n\n");
    }

    output
}

/// Format a single paper as Markdown.
///
/// `index` 0 renders an unnumbered heading.
#[must_use]
pub fn format_paper_markdown(paper: &PaperRecord, index: usize) -> String {
    let mut output = if index > 0 {
        format!("## {}. {}\n\n", index, paper.title_or_default())
    } else {
        format!("## {}\n\n", paper.title_or_default())
    };

    let authors = paper.author_names();
    if !authors.is_empty() {
        output.push_str(&format!("**Authors**: {authors}\n\n"));
    }

    let mut meta = Vec::new();
    if let Some(year) = paper.year() {
        meta.push(format!("**Year**: {year}"));
    }
    if let Some(citations) = paper.citation_count() {
        meta.push(format!("**Citations**: {citations}"));
    }
    if let Some(venue) = paper.venue() {
        meta.push(format!("**Venue**: {venue}"));
    }
    if !meta.is_empty() {
        output.push_str(&format!("{}\n\n", meta.join(" | ")));
    }

    if let Some(url) = paper.url() {
        output.push_str(&format!("**Link**: [Semantic Scholar]({url})\n\n"));
    } else if let Some(id) = paper.paper_id() {
        output.push_str(&format!(
            "**Link**: [Semantic Scholar](https://www.semanticscholar.org/paper/{id})\n\n"
        ));
    }

    if let Some(abs) = paper.r#abstract() {
        let truncated: Cow<'_, str> = if abs.chars().count() > ABSTRACT_PREVIEW_CHARS {
            Cow::Owned(format!("{}...", abs.chars().take(ABSTRACT_PREVIEW_CHARS).collect::<String>()))
        } else {
            Cow::Borrowed(abs)
        };
        output.push_str(&format!("**Abstract**: {truncated}\n"));
    }

    output
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn paper(value: serde_json::Value) -> PaperRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_format_paper_markdown() {
        let p = paper(json!({
            "paperId": "abc",
            "title": "Deep Residual Learning",
            "year": 2016,
            "citationCount": 150000,
            "authors": [{"name": "Kaiming He"}],
            "url": "https://www.semanticscholar.org/paper/abc"
        }));

        let md = format_paper_markdown(&p, 1);
        assert!(md.starts_with("## 1. Deep Residual Learning"));
        assert!(md.contains("**Authors**: Kaiming He"));
        assert!(md.contains("**Year**: 2016 | **Citations**: 150000"));
        assert!(md.contains("(https://www.semanticscholar.org/paper/abc)"));
    }

    #[test]
    fn test_abstract_truncation_is_char_safe() {
        let long = "é".repeat(400);
        let md = format_paper_markdown(&paper(json!({"abstract": long})), 0);
        assert!(md.contains(&format!("{}...", "é".repeat(300))));
        assert!(md.starts_with("## Untitled"));
    }

    #[test]
    fn test_empty_page() {
        let page = PaperPage::default();
        assert_eq!(format_paper_page_markdown(&page, "Search Results"), "No papers found.");
    }

    #[test]
    fn test_page_heading_with_total() {
        let page = PaperPage {
            total: Some(42),
            offset: Some(0),
            next: Some(1),
            data: vec![paper(json!({"title": "One"}))],
        };
        let md = format_paper_page_markdown(&page, "Search Results");
        assert!(md.starts_with("# Search Results (1 of 42 results)"));
        assert!(md.contains("offset 1"));
    }
}
