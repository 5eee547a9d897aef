/// Escape text for element content and double-quoted attributes
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Whether markup carries its own document shell (`<!doctype` or `<html`)
pub fn has_document_shell(markup: &str) -> bool {
    let head = markup.trim_start();
    let lower = head
        .get(..head.len().min(512))
        .unwrap_or(head)
        .to_ascii_lowercase();
    lower.starts_with("<!doctype") || lower.contains("<html")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<a href="x">&</a>"#), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
    }

    #[test]
    fn test_has_document_shell() {
        assert!(has_document_shell("<!DOCTYPE html><html></html>"));
        assert!(has_document_shell("  \n<HTML lang=\"en\"><body></body></HTML>"));
        assert!(has_document_shell("<!-- generated -->\n<html>"));
        assert!(!has_document_shell("<div>fragment</div>"));
        assert!(!has_document_shell(""));
    }
}
