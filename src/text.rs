// 🧵 Text Reconstructor - HTML tree → plain bill text
//
// LBDC renders new (amended-in) language inside <u> tags instead of capitals.
// Reconstruction walks the tree in document order:
//   text node  → raw text, verbatim
//   <u>        → full inner text, trimmed and uppercased, subtree not visited
//   element    → recurse into children

use scraper::{ElementRef, Node};

/// Tag whose content is restored as uppercase
pub const EMPHASIS_TAG: &str = "u";

/// Reconstruct the text below `element` (the element itself is not emitted)
///
/// Deterministic: the same tree always yields byte-identical output.
pub fn reconstruct_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    append_text(element, &mut out);
    out
}

/// Reconstruct several blocks back to back into one string
pub fn reconstruct_blocks<'a, I>(blocks: I) -> String
where
    I: IntoIterator<Item = ElementRef<'a>>,
{
    let mut out = String::new();
    for block in blocks {
        append_text(block, &mut out);
    }
    out
}

fn append_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                let Some(child_ref) = ElementRef::wrap(child) else {
                    continue;
                };
                if el.name().eq_ignore_ascii_case(EMPHASIS_TAG) {
                    let inner: String = child_ref.text().collect();
                    out.push_str(&inner.trim().to_uppercase());
                } else {
                    append_text(child_ref, out);
                }
            }
            // comments, doctypes, processing instructions
            _ => {}
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn first_pre(html: &Html) -> ElementRef<'_> {
        let selector = Selector::parse("pre").unwrap();
        html.select(&selector).next().unwrap()
    }

    #[test]
    fn test_text_nodes_verbatim() {
        let html = Html::parse_document("<html><body><pre>  Section 1.  The\n   law</pre></body></html>");
        let text = reconstruct_text(first_pre(&html));

        assert_eq!(text, "  Section 1.  The\n   law");
    }

    #[test]
    fn test_underline_uppercased_as_leaf() {
        let html = Html::parse_document(
            "<html><body><pre>shall be <u>amended <b>to</b> read</u> as follows</pre></body></html>",
        );
        let text = reconstruct_text(first_pre(&html));

        assert_eq!(text, "shall be AMENDED TO READ as follows");
        println!("✅ Underline reconstruction test passed");
    }

    #[test]
    fn test_nested_elements_recursed_in_order() {
        let html = Html::parse_document(
            "<html><body><pre><span>one <i>two</i></span> three <font><u>four</u></font></pre></body></html>",
        );
        let text = reconstruct_text(first_pre(&html));

        assert_eq!(text, "one two three FOUR");
    }

    #[test]
    fn test_underline_text_trimmed() {
        let html = Html::parse_document("<html><body><pre>a<u> new </u>b</pre></body></html>");
        let text = reconstruct_text(first_pre(&html));

        assert_eq!(text, "aNEWb");
    }

    #[test]
    fn test_reconstruction_is_deterministic() {
        let html = Html::parse_document(
            "<html><body><pre>a <u>b</u>\n  <s>c</s> d</pre><pre>e</pre></body></html>",
        );
        let selector = Selector::parse("pre").unwrap();

        let first = reconstruct_blocks(html.select(&selector));
        let second = reconstruct_blocks(html.select(&selector));

        assert_eq!(first, second);
        assert_eq!(first, "a B\n  c de");
    }
}
