//! The rendering pipeline.
//!
//! A fixed chain of passes over a single working buffer. The order is part
//! of the contract:
//!
//! 1. images, so the link pass can never capture `![alt](src)`
//! 2. fenced code blocks (content trimmed and escaped)
//! 3. inline code (content escaped)
//! 4. park every generated `<img>`/`<pre>`/`<code>` fragment behind a marker
//! 5. escape the whole remaining buffer
//! 6. swap markers back for their fragments
//! 7. headings, links, emphasis, lists, blockquotes on the escaped buffer
//! 8. paragraph assembly (blank line splits, `\n` to `<br />`)

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::escape::escape_html;
use crate::protect::{FragmentTable, MARKER_DELIMITER};

static IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").unwrap());

static FENCED_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```([\s\S]*?)```").unwrap());

static INLINE_CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());

/// Fragments the escape pass must not touch. The `<pre>` branch comes before
/// the `<code>` branch so a code tag nested in a block is captured with it.
static GENERATED_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<img[^>]+>|<pre[^>]*>.*?</pre>|<code[^>]*>.*?</code>").unwrap()
});

static HEADING3_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^### (.+)$").unwrap());
static HEADING2_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^## (.+)$").unwrap());
static HEADING1_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^# (.+)$").unwrap());

static LINK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap());

static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static ITALIC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.+?)\*").unwrap());

static LIST_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^- (.+)$").unwrap());
static LIST_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:<li[^>]*>.*</li>\n?)+").unwrap());

/// Blockquote lines are matched after the global escape, so the source `>`
/// appears as `&gt;` by the time this runs.
static BLOCKQUOTE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^&gt; (.+)$").unwrap());

const PARAGRAPH_OPEN: &str = r#"<p class="mb-4">"#;

/// Render author-supplied markdown to HTML safe for direct injection.
///
/// Total over all inputs: never panics, never errors. Empty input yields an
/// empty string. Constructs that do not match any recognized pattern are
/// escaped and shown as literal text.
///
/// Image `src` and `alt` are emitted verbatim, and author-typed
/// `<img>`/`<pre>`/`<code>` tags pass through the escape untouched; image
/// destinations and code-shaped markup are trusted author content here.
///
/// # Example
///
/// ```
/// use quill_renderer::render;
///
/// assert_eq!(render(""), "");
/// assert!(render("<script>x</script>").contains("&lt;script&gt;"));
/// ```
#[must_use]
pub fn render(markdown: &str) -> String {
    if markdown.is_empty() {
        return String::new();
    }

    // NUL can never be legitimate post content; stripping it up front means
    // author text cannot alias a protection marker.
    let buffer = markdown.replace(MARKER_DELIMITER, "");

    let buffer = extract_images(&buffer);
    let buffer = extract_fenced_code(&buffer);
    let buffer = extract_inline_code(&buffer);

    let mut table = FragmentTable::new();
    let buffer = protect_generated_tags(&buffer, &mut table);
    let buffer = escape_html(&buffer);
    let buffer = table.restore(buffer);

    let buffer = apply_headings(&buffer);
    let buffer = apply_links(&buffer);
    let buffer = apply_emphasis(&buffer);
    let buffer = apply_lists(&buffer);
    let buffer = apply_blockquotes(&buffer);

    assemble_paragraphs(&buffer)
}

/// Rewrite `![alt](src)` into `<img>` tags, left to right.
///
/// Runs first: the bang form is a strict subset of what the link pass
/// matches, so images must be consumed before links ever run.
fn extract_images(input: &str) -> String {
    IMAGE_RE
        .replace_all(input, |caps: &Captures<'_>| {
            let alt = &caps[1];
            let src = &caps[2];
            format!(
                r#"<img src="{src}" alt="{alt}" class="max-w-full h-auto rounded-lg my-4" style="display: block;" />"#
            )
        })
        .into_owned()
}

/// Rewrite triple-backtick fences into `<pre><code>` blocks.
///
/// Shortest enclosed span wins; content is trimmed and escaped so the block
/// can hold literal `<`, `>` and `&`.
fn extract_fenced_code(input: &str) -> String {
    FENCED_CODE_RE
        .replace_all(input, |caps: &Captures<'_>| {
            format!(
                r#"<pre class="bg-gray-900 text-gray-100 p-4 rounded-lg my-4 overflow-x-auto"><code>{}</code></pre>"#,
                escape_html(caps[1].trim())
            )
        })
        .into_owned()
}

/// Rewrite single-backtick spans into `<code>` spans, content escaped.
fn extract_inline_code(input: &str) -> String {
    INLINE_CODE_RE
        .replace_all(input, |caps: &Captures<'_>| {
            format!(
                r#"<code class="bg-gray-100 px-2 py-1 rounded text-sm">{}</code>"#,
                escape_html(&caps[1])
            )
        })
        .into_owned()
}

/// Park every img/pre/code fragment in the table, in one pass over all three
/// kinds, so none of their angle brackets reach the escape.
fn protect_generated_tags(input: &str, table: &mut FragmentTable) -> String {
    GENERATED_TAG_RE
        .replace_all(input, |caps: &Captures<'_>| table.protect(&caps[0]))
        .into_owned()
}

fn apply_headings(input: &str) -> String {
    let buffer = HEADING3_RE.replace_all(input, r#"<h3 class="text-xl font-bold mt-6 mb-3">$1</h3>"#);
    let buffer = HEADING2_RE.replace_all(&buffer, r#"<h2 class="text-2xl font-bold mt-8 mb-4">$1</h2>"#);
    HEADING1_RE
        .replace_all(&buffer, r#"<h1 class="text-3xl font-bold mt-10 mb-5">$1</h1>"#)
        .into_owned()
}

fn apply_links(input: &str) -> String {
    LINK_RE
        .replace_all(
            input,
            r#"<a href="$2" class="text-purple-600 underline" target="_blank">$1</a>"#,
        )
        .into_owned()
}

fn apply_emphasis(input: &str) -> String {
    let buffer = BOLD_RE.replace_all(input, "<strong>$1</strong>");
    ITALIC_RE.replace_all(&buffer, "<em>$1</em>").into_owned()
}

/// Turn `- ` lines into `<li>` elements and wrap each run of consecutive
/// items in a single `<ul>`.
fn apply_lists(input: &str) -> String {
    let buffer = LIST_ITEM_RE.replace_all(input, r#"<li class="ml-6">$1</li>"#);
    LIST_RUN_RE
        .replace_all(&buffer, r#"<ul class="list-disc my-4">$0</ul>"#)
        .into_owned()
}

fn apply_blockquotes(input: &str) -> String {
    BLOCKQUOTE_RE
        .replace_all(
            input,
            r#"<blockquote class="border-l-4 border-purple-500 pl-4 my-4">$1</blockquote>"#,
        )
        .into_owned()
}

/// Blank lines split paragraphs, remaining newlines become `<br />`, and the
/// whole buffer is wrapped in one paragraph. Empty paragraphs produced by
/// the split are dropped.
fn assemble_paragraphs(input: &str) -> String {
    let buffer = input.replace("\n\n", &format!("</p>{PARAGRAPH_OPEN}"));
    let buffer = buffer.replace('\n', "<br />");
    let buffer = format!("{PARAGRAPH_OPEN}{buffer}</p>");
    buffer.replace(&format!("{PARAGRAPH_OPEN}</p>"), "")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_empty_input_renders_empty() {
        assert_eq!(render(""), "");
    }

    #[test]
    fn test_whitespace_only_is_wrapped() {
        assert_eq!(render("   "), r#"<p class="mb-4">   </p>"#);
    }

    #[test]
    fn test_plain_paragraph() {
        assert_eq!(render("hello world"), r#"<p class="mb-4">hello world</p>"#);
    }

    #[test]
    fn test_blank_line_splits_paragraphs() {
        assert_eq!(
            render("first\n\nsecond"),
            r#"<p class="mb-4">first</p><p class="mb-4">second</p>"#
        );
    }

    #[test]
    fn test_single_newline_becomes_line_break() {
        assert_eq!(render("a\nb"), r#"<p class="mb-4">a<br />b</p>"#);
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let html = render("<script>alert('x')</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("&#039;x&#039;"));
    }

    #[test]
    fn test_heading_levels() {
        assert_eq!(
            render("# Title"),
            r#"<p class="mb-4"><h1 class="text-3xl font-bold mt-10 mb-5">Title</h1></p>"#
        );
        assert!(render("## Sub").contains(r#"<h2 class="text-2xl font-bold mt-8 mb-4">Sub</h2>"#));
        assert!(render("### Third").contains(r#"<h3 class="text-xl font-bold mt-6 mb-3">Third</h3>"#));
    }

    #[test]
    fn test_heading_requires_line_start() {
        let html = render("not # a heading");
        assert!(!html.contains("<h1"));
    }

    #[test]
    fn test_link_opens_new_context() {
        assert_eq!(
            render("[site](https://example.com)"),
            r#"<p class="mb-4"><a href="https://example.com" class="text-purple-600 underline" target="_blank">site</a></p>"#
        );
    }

    #[test]
    fn test_image_tag_shape() {
        assert_eq!(
            render("![cat](http://x/cat.png)"),
            r#"<p class="mb-4"><img src="http://x/cat.png" alt="cat" class="max-w-full h-auto rounded-lg my-4" style="display: block;" /></p>"#
        );
    }

    #[test]
    fn test_image_is_never_a_link() {
        let html = render("![cat](http://x/cat.png)");
        assert_eq!(html.matches("<img ").count(), 1);
        assert!(!html.contains("<a "));
    }

    #[test]
    fn test_image_with_empty_alt() {
        assert!(render("![](a.png)").contains(r#"<img src="a.png" alt="""#));
    }

    #[test]
    fn test_data_uri_image_src_preserved() {
        let html = render("![pic](data:image/png;base64,iVBORw0KGgo=)");
        assert!(html.contains(r#"src="data:image/png;base64,iVBORw0KGgo=""#));
    }

    #[test]
    fn test_image_attributes_are_verbatim() {
        // alt/src are not escaped; a quote in alt text breaks out of the
        // attribute. Deliberate trust boundary, kept as-is.
        let html = render(r#"![a "quote"](x.png)"#);
        assert!(html.contains(r#"alt="a "quote"""#));
    }

    #[test]
    fn test_linked_image() {
        let html = render("[![cat](c.png)](http://l)");
        assert!(html.contains(r#"<a href="http://l""#));
        assert!(html.contains(r#"<img src="c.png""#));
    }

    #[test]
    fn test_bold_and_italic() {
        assert_eq!(
            render("**b** and *i*"),
            r#"<p class="mb-4"><strong>b</strong> and <em>i</em></p>"#
        );
    }

    #[test]
    fn test_inline_code_content_escaped_tag_literal() {
        assert_eq!(
            render("`<b>hi</b>`"),
            r#"<p class="mb-4"><code class="bg-gray-100 px-2 py-1 rounded text-sm">&lt;b&gt;hi&lt;/b&gt;</code></p>"#
        );
    }

    #[test]
    fn test_multiple_inline_code_spans() {
        let html = render("`a` and `b`");
        assert_eq!(html.matches("<code ").count(), 2);
        assert!(html.contains(">a</code>"));
        assert!(html.contains(">b</code>"));
    }

    #[test]
    fn test_fenced_block_escapes_content_and_keeps_lines() {
        assert_eq!(
            render("```\na\n<div>\nb\n```"),
            r#"<p class="mb-4"><pre class="bg-gray-900 text-gray-100 p-4 rounded-lg my-4 overflow-x-auto"><code>a<br />&lt;div&gt;<br />b</code></pre></p>"#
        );
    }

    #[test]
    fn test_fence_trims_surrounding_whitespace() {
        let html = render("```\n  code  \n```");
        assert!(html.contains("<code>code</code>"));
    }

    #[test]
    fn test_unmatched_fence_left_literal() {
        assert_eq!(render("```\ncode"), r#"<p class="mb-4">```<br />code</p>"#);
    }

    #[test]
    fn test_image_syntax_inside_fence_is_shown_literally() {
        // Images are extracted before fences, so the generated tag text
        // becomes fence content and is escaped with it.
        let html = render("```\n![a](b.png)\n```");
        assert!(html.contains("&lt;img"));
        assert!(!html.contains("<img "));
    }

    #[test]
    fn test_emphasis_applies_inside_restored_code_spans() {
        // Restoration runs before the emphasis pass, so markup inside a code
        // span is still rewritten.
        assert_eq!(
            render("`**x**`"),
            r#"<p class="mb-4"><code class="bg-gray-100 px-2 py-1 rounded text-sm"><strong>x</strong></code></p>"#
        );
    }

    #[test]
    fn test_later_passes_apply_inside_restored_code_blocks() {
        // Same ordering consequence for blocks: a hash line on an interior
        // fence line is heading-wrapped after restoration.
        let html = render("```\na\n# x\n```");
        assert!(html.contains("<pre "));
        assert!(html.contains("<h1 "));
    }

    #[test]
    fn test_raw_code_tag_passes_through() {
        // Author-typed code/pre/img tags match the protection scan and skip
        // the escape. Same trust family as image attributes.
        assert_eq!(
            render("<code>x</code>"),
            r#"<p class="mb-4"><code>x</code></p>"#
        );
    }

    #[test]
    fn test_unordered_list_single_wrapper() {
        let html = render("- a\n- b");
        assert_eq!(html.matches("<ul ").count(), 1);
        assert_eq!(html.matches("<li ").count(), 2);
        assert_eq!(
            html,
            r#"<p class="mb-4"><ul class="list-disc my-4"><li class="ml-6">a</li><br /><li class="ml-6">b</li></ul></p>"#
        );
    }

    #[test]
    fn test_lists_split_by_text_make_two_runs() {
        let html = render("- a\n\nmiddle\n\n- b");
        assert_eq!(html.matches("<ul ").count(), 2);
    }

    #[test]
    fn test_blockquote() {
        assert_eq!(
            render("> quoted"),
            r#"<p class="mb-4"><blockquote class="border-l-4 border-purple-500 pl-4 my-4">quoted</blockquote></p>"#
        );
    }

    #[test]
    fn test_typed_marker_text_is_inert() {
        // A literal NUL or marker-shaped string in the input can never alias
        // a real marker; protected fragments still restore correctly.
        let html = render("__PROTECTED_0__ \u{0} ![cat](c.png)");
        assert_eq!(html.matches("<img ").count(), 1);
        assert!(html.contains("__PROTECTED_0__"));
        assert!(!html.contains('\u{0}'));
    }

    #[test]
    fn test_no_marker_leakage() {
        let inputs = [
            "![a](b.png) and `code` and ```\nfence\n```",
            "plain",
            "`one` `two` `three`",
            "```\nx\n``` tail ![i](j.png)",
        ];
        for input in inputs {
            let html = render(input);
            assert!(!html.contains('\u{0}'), "marker leaked for {input:?}");
        }
    }

    #[test]
    fn test_consecutive_images() {
        let html = render("![a](1.png)![b](2.png)");
        assert_eq!(html.matches("<img ").count(), 2);
    }

    #[test]
    fn test_heading_then_paragraph() {
        assert_eq!(
            render("# T\n\nbody"),
            r#"<p class="mb-4"><h1 class="text-3xl font-bold mt-10 mb-5">T</h1></p><p class="mb-4">body</p>"#
        );
    }

    #[test]
    fn test_never_panics_on_pathological_input() {
        let inputs = [
            "![",
            "](",
            "```",
            "`",
            "****",
            "*",
            "[]()",
            "![]()",
            "\n\n\n",
            "- ",
            "> ",
            "# ",
            "``````",
            "![a](b",
            "[x](",
            "**unterminated",
            "\u{0}\u{0}\u{0}",
        ];
        for input in inputs {
            let _ = render(input);
        }
    }
}
