use crate::fetcher::errors::FetchError;
use encoding_rs::Encoding;
use regex::Regex;
use std::sync::LazyLock;

/// How much of the body to inspect for `<meta>` charset declarations.
const META_PROBE_BYTES: usize = 4096;

static HEADER_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

static META_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s/>]+)"#).unwrap());

static META_HTTP_EQUIV: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\s+[^>]*?http-equiv\s*=\s*["']?content-type["']?[^>]*?content\s*=\s*["']?[^"'>]*?charset\s*=\s*([^"'\s;/>]+)"#).unwrap()
});

/// Decode a fetched body to UTF-8, returning the text and the name of the
/// encoding it was decoded from.
///
/// Detection order: the Content-Type header charset, then `<meta>`
/// declarations in the first 4KB, then chardetng's statistical guess.
pub fn decode_body(content_type: &str, body: &[u8]) -> Result<(String, String), FetchError> {
    let encoding = detect_encoding(content_type, body);

    let (decoded, actual, had_errors) = encoding.decode(body);
    if had_errors {
        return Err(FetchError::Charset(format!(
            "body is not valid {}",
            actual.name()
        )));
    }

    Ok((decoded.into_owned(), actual.name().to_string()))
}

fn detect_encoding(content_type: &str, body: &[u8]) -> &'static Encoding {
    if let Some(encoding) = label_from(&HEADER_CHARSET, content_type) {
        return encoding;
    }

    let probe = &body[..body.len().min(META_PROBE_BYTES)];
    let probe_str = String::from_utf8_lossy(probe);

    // <meta charset="..."> wins over the older http-equiv form
    if let Some(encoding) = label_from(&META_CHARSET, &probe_str) {
        return encoding;
    }
    if let Some(encoding) = label_from(&META_HTTP_EQUIV, &probe_str) {
        return encoding;
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(probe, false);
    detector.guess(None, true)
}

fn label_from(pattern: &Regex, haystack: &str) -> Option<&'static Encoding> {
    let label = pattern.captures(haystack)?.get(1)?.as_str().to_lowercase();
    Encoding::for_label(label.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charset_from_content_type_header() {
        let body = b"<html><head><title>Test</title></head></html>";
        let (_, charset) = decode_body("text/html; charset=utf-8", body).unwrap();
        assert_eq!(charset, "UTF-8");
    }

    #[test]
    fn charset_from_meta_tag() {
        let body = b"<html><head><meta charset=\"iso-8859-1\"><title>Test</title></head></html>";
        let (_, charset) = decode_body("text/html", body).unwrap();
        // encoding_rs maps ISO-8859-1 to its windows-1252 superset
        assert_eq!(charset, "windows-1252");
    }

    #[test]
    fn charset_from_meta_http_equiv() {
        let body = b"<html><head><meta http-equiv=\"Content-Type\" content=\"text/html; charset=windows-1252\"></head></html>";
        let (_, charset) = decode_body("text/html", body).unwrap();
        assert_eq!(charset, "windows-1252");
    }

    #[test]
    fn decodes_multibyte_utf8() {
        let body = "<p>Hello, \u{4e16}\u{754c}!</p>".as_bytes();
        let (text, charset) = decode_body("text/html; charset=utf-8", body).unwrap();
        assert_eq!(charset, "UTF-8");
        assert!(text.contains("\u{4e16}\u{754c}"));
    }

    #[test]
    fn header_charset_beats_meta() {
        let body =
            b"<html><head><meta charset=\"shift_jis\"></head><body>plain ascii</body></html>";
        let (_, charset) = decode_body("text/html; charset=utf-8", body).unwrap();
        assert_eq!(charset, "UTF-8");
    }
}
