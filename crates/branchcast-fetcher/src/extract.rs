//! HTML to plain text

use scraper::{ElementRef, Html, Selector};

/// Elements whose text never reaches readers
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Elements that break the text flow; inline elements join their text as-is
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "caption", "dd", "details", "div", "dl",
    "dt", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hr", "li", "main", "nav", "ol", "p", "pre", "section", "summary", "table", "tbody", "td",
    "tfoot", "th", "thead", "tr", "ul",
];

/// Extract human-readable text from an HTML document.
///
/// Takes the `<body>` (or the whole document when there is none), drops
/// script/style subtrees, separates block-level elements, and collapses
/// every whitespace run to a single space. Text split by inline markup
/// (`T<span>he</span>`, `H<sub>2</sub>O`) stays joined. The result is
/// trimmed and may be empty.
///
/// # Examples
///
/// ```
/// use branchcast_fetcher::extract_text;
///
/// let html = "<html><body><h1>Title</h1><p>First   <em>li</em>ne.</p><script>x()</script></body></html>";
/// assert_eq!(extract_text(html), "Title First line.");
/// ```
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let root = match Selector::parse("body") {
        Ok(body) => document
            .select(&body)
            .next()
            .unwrap_or_else(|| document.root_element()),
        Err(_) => document.root_element(),
    };

    let mut raw = String::new();
    collect_text(root, &mut raw);

    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    let name = element.value().name();
    if SKIPPED_ELEMENTS.contains(&name) {
        return;
    }

    let block = BLOCK_ELEMENTS.contains(&name);
    if block {
        out.push(' ');
    }

    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child) = ElementRef::wrap(child) {
            collect_text(child, out);
        }
    }

    if block {
        out.push(' ');
    }
}
