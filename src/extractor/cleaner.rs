use ammonia::Builder;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::collections::HashMap;

/// Elements removed together with their content.
const STRIPPED_ELEMENTS: [&str; 6] = ["script", "style", "nav", "header", "footer", "aside"];

/// The only attributes that survive sanitization, on any element.
const ALLOWED_ATTRIBUTES: [&str; 4] = ["href", "src", "alt", "title"];

/// Class markers for advertisement containers, dropped before the
/// allow-list pass (class attributes do not survive it).
static AD_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".advertisement, .ads, .ad").unwrap());

/// Strip non-content elements and restrict attributes to the allow-list.
/// Sanitizing already-sanitized markup is a no-op.
pub fn sanitize(html: &str) -> String {
    let html = strip_ad_elements(html);

    let mut cleaner = Builder::default();
    cleaner
        .rm_tags(STRIPPED_ELEMENTS)
        .clean_content_tags(STRIPPED_ELEMENTS.into_iter().collect())
        .generic_attributes(ALLOWED_ATTRIBUTES.into_iter().collect())
        .tag_attributes(HashMap::new())
        .link_rel(None);

    cleaner.clean(&html).to_string()
}

/// Remove advertisement-classed subtrees by matching their serialized form.
fn strip_ad_elements(html: &str) -> String {
    let document = Html::parse_fragment(html);

    let mut result = html.to_string();
    for element in document.select(&AD_SELECTOR) {
        let serialized = element.html();
        if result.contains(&serialized) {
            result = result.replace(&serialized, "");
        }
    }
    result
}
