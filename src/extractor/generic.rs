use readability::extractor;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use url::Url;

/// Minimum trimmed text length a candidate region must carry.
const MIN_CONTENT_LENGTH: usize = 100;

/// Flat score bonus per paragraph; paragraph-heavy regions are likelier to be
/// the article body.
const PARAGRAPH_BONUS: f64 = 25.0;

/// Score multiplier for regions whose class/id markers look navigational.
const NAVIGATION_PENALTY: f64 = 0.2;

/// Candidate containers, most specific first.
const CANDIDATE_SELECTORS: &[&str] = &[
    "article",
    "main",
    "[role='main']",
    "#content",
    "#main",
    ".content",
    ".post",
    ".article",
    ".entry-content",
    "section",
];

static ANCHOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());
static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").unwrap());

#[derive(Debug)]
pub struct GenericExtraction {
    pub title: Option<String>,
    pub html: String,
    pub text: String,
}

/// Boilerplate-removal extraction: readability first, then a candidate-scoring
/// sweep of the DOM for documents readability cannot make sense of.
pub fn extract(html: &str, url: &Url) -> Option<GenericExtraction> {
    if let Ok(article) = extractor::extract(&mut html.as_bytes(), url)
        && article.text.trim().chars().count() >= MIN_CONTENT_LENGTH
    {
        let title = Some(article.title)
            .filter(|t| !t.trim().is_empty())
            .or_else(|| document_title(html));
        return Some(GenericExtraction {
            title,
            html: article.content,
            text: article.text,
        });
    }

    fallback_extract(html)
}

/// Title preference order: document `<title>`, first `<h1>`, `og:title`.
pub fn document_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    if let Ok(selector) = Selector::parse("title") {
        for element in document.select(&selector) {
            let title = element.text().collect::<String>().trim().to_string();
            if !title.is_empty() {
                return Some(title);
            }
        }
    }

    if let Ok(selector) = Selector::parse("h1") {
        for element in document.select(&selector) {
            let title = element.text().collect::<String>().trim().to_string();
            if !title.is_empty() {
                return Some(title);
            }
        }
    }

    if let Ok(selector) = Selector::parse("meta[property='og:title']") {
        for element in document.select(&selector) {
            if let Some(content) = element.value().attr("content") {
                let title = content.trim().to_string();
                if !title.is_empty() {
                    return Some(title);
                }
            }
        }
    }

    None
}

fn fallback_extract(html: &str) -> Option<GenericExtraction> {
    let document = Html::parse_document(html);

    let mut best: Option<(f64, ElementRef)> = None;
    for selector_str in CANDIDATE_SELECTORS {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        for element in document.select(&selector) {
            let text: String = element.text().collect();
            let text_len = text.trim().chars().count();
            if text_len < MIN_CONTENT_LENGTH {
                continue;
            }
            let score = score_candidate(&element, text_len);
            if best.is_none_or(|(top, _)| score > top) {
                best = Some((score, element));
            }
        }
    }

    if let Some((_, element)) = best {
        let text: String = element.text().collect();
        return Some(GenericExtraction {
            title: document_title(html),
            html: element.html(),
            text,
        });
    }

    // Last resort: the whole body, still subject to the content bar
    let body_selector = Selector::parse("body").ok()?;
    let body = document.select(&body_selector).next()?;
    let text: String = body.text().collect();
    if text.trim().chars().count() < MIN_CONTENT_LENGTH {
        return None;
    }

    Some(GenericExtraction {
        title: document_title(html),
        html: body.html(),
        text,
    })
}

/// Text length discounted by link density, plus a paragraph bonus; menu-like
/// containers are knocked down hard.
fn score_candidate(element: &ElementRef, text_len: usize) -> f64 {
    let link_text: usize = element
        .select(&ANCHOR)
        .map(|a| a.text().collect::<String>().trim().chars().count())
        .sum();
    let link_density = link_text as f64 / text_len.max(1) as f64;
    let paragraphs = element.select(&PARAGRAPH).count();

    let mut score = text_len as f64 * (1.0 - link_density.min(1.0))
        + paragraphs as f64 * PARAGRAPH_BONUS;
    if is_navigation_like(element) {
        score *= NAVIGATION_PENALTY;
    }
    score
}

fn is_navigation_like(element: &ElementRef) -> bool {
    let markers = ["nav", "menu", "sidebar", "breadcrumb", "footer", "header"];
    let id = element.value().id().unwrap_or_default().to_lowercase();
    let classes: Vec<String> = element
        .value()
        .classes()
        .map(|c| c.to_lowercase())
        .collect();

    markers
        .iter()
        .any(|m| id.contains(m) || classes.iter().any(|c| c.contains(m)))
}
