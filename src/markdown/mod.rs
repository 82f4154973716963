use htmd::HtmlToMarkdown;
use htmd::options::{BulletListMarker, CodeBlockStyle, HeadingStyle, Options};
use scraper::Html;

/// Render sanitized HTML as canonical markdown: ATX headings, `-` bullets,
/// fenced code blocks. Pure and deterministic; identical input yields
/// byte-identical output. Downstream AI features consume this text.
pub fn to_markdown(html: &str) -> String {
    let converter = HtmlToMarkdown::builder()
        .options(Options {
            heading_style: HeadingStyle::Atx,
            bullet_list_marker: BulletListMarker::Dash,
            ul_bullet_spacing: 1,
            code_block_style: CodeBlockStyle::Fenced,
            ..Options::default()
        })
        .build();

    converter.convert(html).unwrap_or_else(|_| {
        // conversion failure degrades to the plain text rendering
        let document = Html::parse_fragment(html);
        document.root_element().text().collect::<String>()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atx_headings() {
        let md = to_markdown("<h1>Title</h1><h2>Section</h2>");
        assert!(md.contains("# Title"));
        assert!(md.contains("## Section"));
        assert!(!md.contains("====="));
    }

    #[test]
    fn dash_bullets() {
        let md = to_markdown("<ul><li>first</li><li>second</li></ul>");
        assert!(md.contains("- first"));
        assert!(md.contains("- second"));
        assert!(!md.contains("* first"));
    }

    #[test]
    fn fenced_code_blocks() {
        let md = to_markdown("<pre><code>let x = 1;</code></pre>");
        assert!(md.contains("```"));
        assert!(md.contains("let x = 1;"));
    }

    #[test]
    fn links_and_emphasis_survive() {
        let md = to_markdown(r#"<p>Read <a href="https://example.com/a">the <em>full</em> story</a>.</p>"#);
        assert!(md.contains("https://example.com/a"));
        assert!(md.contains("*full*"));
    }

    #[test]
    fn conversion_is_deterministic() {
        let html = "<h1>Doc</h1><p>Body with <strong>bold</strong> text.</p><ul><li>a</li><li>b</li></ul>";
        assert_eq!(to_markdown(html), to_markdown(html));
    }
}
