use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::extractor::model::ContentKind;

/// Minimum trimmed text length a probed region must carry to count as a hit.
const MIN_PROBE_TEXT_LEN: usize = 50;

/// A named structural probe: one selector tied to one content-type label.
#[derive(Debug, Clone)]
pub struct Probe {
    kind: ContentKind,
    selector: Selector,
}

impl Probe {
    fn new(kind: ContentKind, selector: &str) -> Self {
        Self {
            kind,
            // probe selectors are fixed literals, parse cannot fail
            selector: Selector::parse(selector).expect("probe selector is valid"),
        }
    }
}

/// Ordered probe table for one structured-platform family, tried first in
/// document order. Probes never fall back internally; a miss is reported to
/// the strategy selector.
#[derive(Debug, Clone)]
pub struct ProbeSet {
    host_suffix: String,
    probes: Vec<Probe>,
    min_text_len: usize,
}

impl ProbeSet {
    /// The Canvas LMS probe table: course body, assignment body, discussion
    /// body, module item, quiz body, syllabus body, in that order.
    pub fn canvas() -> Self {
        Self {
            host_suffix: "instructure.com".to_string(),
            probes: vec![
                Probe::new(ContentKind::Course, "#content"),
                Probe::new(ContentKind::Assignment, ".show-content"),
                Probe::new(ContentKind::Discussion, ".discussion-topic"),
                Probe::new(ContentKind::ModuleItem, ".context_module_item"),
                Probe::new(ContentKind::Quiz, "#questions"),
                Probe::new(ContentKind::Syllabus, "#course_syllabus"),
            ],
            min_text_len: MIN_PROBE_TEXT_LEN,
        }
    }

    /// Whether a URL belongs to this platform family. Matches the apex host
    /// and any subdomain, never path or query components.
    pub fn matches_url(&self, url: &Url) -> bool {
        match url.host_str() {
            Some(host) => {
                host == self.host_suffix || host.ends_with(&format!(".{}", self.host_suffix))
            }
            None => false,
        }
    }
}

/// What a successful probe yields: the matched region's inner markup, its
/// plain text, and the probe's content-type label.
#[derive(Debug, Clone)]
pub struct DomainExtraction {
    pub kind: ContentKind,
    pub html: String,
    pub text: String,
}

/// Auxiliary platform metadata, derived from page chrome rather than the
/// content region itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DomainMetadata {
    pub course_title: Option<String>,
    pub breadcrumbs: Vec<String>,
}

impl DomainMetadata {
    /// Breadcrumb trail rendered as a description line.
    pub fn description(&self) -> Option<String> {
        if self.breadcrumbs.is_empty() {
            None
        } else {
            Some(self.breadcrumbs.join(" > "))
        }
    }
}

/// Run the probe table against a document; the first probe whose matched
/// region carries non-trivial text wins.
pub fn extract(html: &str, probes: &ProbeSet) -> Option<DomainExtraction> {
    let document = Html::parse_document(html);

    for probe in &probes.probes {
        if let Some(element) = document.select(&probe.selector).next() {
            let text: String = element.text().collect();
            let text = text.trim();
            if text.chars().count() > probes.min_text_len {
                return Some(DomainExtraction {
                    kind: probe.kind,
                    html: element.inner_html(),
                    text: text.to_string(),
                });
            }
        }
    }

    None
}

/// Pull course title and breadcrumb trail out of the page chrome.
pub fn extract_metadata(html: &str) -> DomainMetadata {
    let document = Html::parse_document(html);

    let course_title = Selector::parse(".ellipsible").ok().and_then(|selector| {
        document
            .select(&selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty())
    });

    let breadcrumbs = match Selector::parse("#breadcrumbs a") {
        Ok(selector) => document
            .select(&selector)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty())
            .collect(),
        Err(_) => Vec::new(),
    };

    DomainMetadata {
        course_title,
        breadcrumbs,
    }
}
