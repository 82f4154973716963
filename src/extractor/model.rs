use serde::{Deserialize, Serialize};

use crate::extractor::domain::DomainMetadata;

/// Content-type label attached by a structural probe. Structured platforms
/// carry a closed set of page shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Course,
    Assignment,
    Discussion,
    ModuleItem,
    Quiz,
    Syllabus,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Course => "course",
            Self::Assignment => "assignment",
            Self::Discussion => "discussion",
            Self::ModuleItem => "module_item",
            Self::Quiz => "quiz",
            Self::Syllabus => "syllabus",
        }
    }
}

/// Which extractor produced a result. Closed set; there is no open-ended
/// strategy registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtractionStrategy {
    DomainSpecific(ContentKind),
    Generic,
}

/// Output of the strategy selector: the chosen main-content region plus any
/// platform-specific metadata that came with it.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    pub title: String,
    pub content_html: String,
    pub text: String,
    pub strategy: ExtractionStrategy,
    pub domain_meta: Option<DomainMetadata>,
}
