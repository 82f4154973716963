use std::fs;
use url::Url;

use crate::extractor::domain::ProbeSet;
use crate::extractor::{ContentKind, ExtractionError, ExtractionStrategy, extract};
use crate::fetcher::types::RawDocument;

fn load_fixture(name: &str) -> String {
    fs::read_to_string(format!("src/extractor/tests/fixtures/{name}"))
        .expect("failed to read test fixture")
}

fn document(html: String, url: &str) -> RawDocument {
    RawDocument::from_client_html(Url::parse(url).unwrap(), html)
}

#[test]
fn generic_article_extraction() {
    let doc = document(load_fixture("article.html"), "https://example.com/article");
    let result = extract(&doc, &ProbeSet::canvas()).unwrap();

    assert_eq!(result.strategy, ExtractionStrategy::Generic);
    assert!(result.title.contains("Sample Article"));
    assert!(result.text.contains("first paragraph"));
    assert!(result.text.contains("second paragraph"));
    assert!(result.domain_meta.is_none());
}

#[test]
fn domain_probe_takes_precedence_on_platform_urls() {
    // Both the course-body probe and the generic heuristic would succeed
    // here; the platform URL must route to the probe.
    let doc = document(
        load_fixture("canvas_course.html"),
        "https://school.instructure.com/courses/42/pages/week-3",
    );
    let result = extract(&doc, &ProbeSet::canvas()).unwrap();

    assert_eq!(
        result.strategy,
        ExtractionStrategy::DomainSpecific(ContentKind::Course)
    );
    assert!(result.text.contains("Photosynthesis"));
    assert!(!result.content_html.contains("Generic Container"));

    let meta = result.domain_meta.unwrap();
    assert_eq!(meta.course_title.as_deref(), Some("Biology 101"));
    assert_eq!(
        meta.description().as_deref(),
        Some("Home > Courses > Biology 101")
    );
}

#[test]
fn same_page_off_platform_is_generic() {
    let doc = document(
        load_fixture("canvas_course.html"),
        "https://mirror.example.com/courses/42/pages/week-3",
    );
    let result = extract(&doc, &ProbeSet::canvas()).unwrap();
    assert_eq!(result.strategy, ExtractionStrategy::Generic);
}

#[test]
fn falls_back_to_generic_when_probes_find_nothing() {
    let doc = document(
        load_fixture("canvas_thin.html"),
        "https://school.instructure.com/announcements",
    );
    let result = extract(&doc, &ProbeSet::canvas()).unwrap();

    assert_eq!(result.strategy, ExtractionStrategy::Generic);
    assert!(result.text.contains("campus events"));
}

#[test]
fn boilerplate_shell_yields_no_readable_content() {
    let doc = document(load_fixture("boilerplate.html"), "https://example.com/");
    let result = extract(&doc, &ProbeSet::canvas());
    assert_eq!(result.unwrap_err(), ExtractionError::NoReadableContent);
}

#[test]
fn malformed_html_is_handled_gracefully() {
    let html = format!(
        "<html><head><title>Broken</title><body><article><p>Unclosed tags {}<div>More content",
        "with plenty of text to clear the minimum content bar for extraction. ".repeat(3)
    );
    let doc = document(html, "https://example.com/broken");

    if let Ok(result) = extract(&doc, &ProbeSet::canvas()) {
        assert_eq!(result.title, "Broken");
        assert!(result.text.contains("Unclosed tags"));
    }
}

#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn extract_never_panics(
            html in ".*",
            url in "https://[a-z]+\\.com/.*"
        ) {
            let doc = document(html, &url);
            // Ok or NoReadableContent, never a panic
            let _ = extract(&doc, &ProbeSet::canvas());
        }
    }
}
