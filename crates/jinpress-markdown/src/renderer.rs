//! Markdown-to-HTML rendering.
//!
//! Walks the pulldown-cmark event stream and emits HTML, collecting a
//! table of contents and the first H1 along the way. Headings get
//! `id` anchors derived with [`slugify`], and relative `.md` links are
//! rewritten to their clean-URL form.

use std::fmt::Write;

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

use crate::escape_html;
use crate::toc::{TocEntry, slugify};

/// Result of rendering a markdown body.
#[derive(Debug, Clone)]
pub struct RenderResult {
    /// Rendered HTML.
    pub html: String,
    /// Plain text of the first H1, if any.
    pub first_heading: Option<String>,
    /// Table of contents entries in document order.
    pub toc: Vec<TocEntry>,
}

/// Renders a markdown body to HTML.
pub fn render_html(markdown: &str) -> RenderResult {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let mut renderer = HtmlRenderer::new();
    for event in Parser::new_ext(markdown, options) {
        renderer.process_event(event);
    }
    renderer.finish()
}

#[derive(Default)]
struct CodeBlock {
    lang: Option<String>,
    buffer: String,
}

struct Heading {
    level: u8,
    text: String,
    html: String,
}

struct HtmlRenderer {
    output: String,
    code: Option<CodeBlock>,
    heading: Option<Heading>,
    image_alt: Option<String>,
    pending_image: Option<(String, String)>,
    in_table_head: bool,
    first_heading: Option<String>,
    toc: Vec<TocEntry>,
}

impl HtmlRenderer {
    fn new() -> Self {
        Self {
            output: String::with_capacity(4096),
            code: None,
            heading: None,
            image_alt: None,
            pending_image: None,
            in_table_head: false,
            first_heading: None,
            toc: Vec::new(),
        }
    }

    fn finish(self) -> RenderResult {
        RenderResult {
            html: self.output,
            first_heading: self.first_heading,
            toc: self.toc,
        }
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) | Event::InlineHtml(html) => self.push_inline(&html),
            Event::SoftBreak => self.soft_break(),
            Event::HardBreak => self.push_inline("<br>"),
            Event::Rule => self.output.push_str("<hr>"),
            Event::TaskListMarker(_)
            | Event::FootnoteReference(_)
            | Event::InlineMath(_)
            | Event::DisplayMath(_) => {
                // Not enabled in the parser options.
            }
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.output.push_str("<p>"),
            Tag::Heading { level, .. } => {
                // Opening tag is written in end_tag once the ID is known.
                self.heading = Some(Heading {
                    level: heading_level_to_num(level),
                    text: String::new(),
                    html: String::new(),
                });
            }
            Tag::BlockQuote(_) => self.output.push_str("<blockquote>"),
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(ref info) if !info.is_empty() => {
                        // Only the first word of the info string is the language.
                        info.split_whitespace().next().map(str::to_owned)
                    }
                    _ => None,
                };
                self.code = Some(CodeBlock {
                    lang,
                    buffer: String::new(),
                });
            }
            Tag::List(start) => match start {
                Some(1) => self.output.push_str("<ol>"),
                Some(n) => write!(self.output, r#"<ol start="{n}">"#).unwrap(),
                None => self.output.push_str("<ul>"),
            },
            Tag::Item => self.output.push_str("<li>"),
            Tag::Table(_) => self.output.push_str("<table>"),
            Tag::TableHead => {
                self.in_table_head = true;
                self.output.push_str("<thead><tr>");
            }
            Tag::TableRow => self.output.push_str("<tr>"),
            Tag::TableCell => {
                self.output
                    .push_str(if self.in_table_head { "<th>" } else { "<td>" });
            }
            Tag::Emphasis => self.push_inline("<em>"),
            Tag::Strong => self.push_inline("<strong>"),
            Tag::Strikethrough => self.push_inline("<s>"),
            Tag::Link { dest_url, .. } => {
                let href = transform_link(&dest_url);
                let open = format!(r#"<a href="{}">"#, escape_html(&href));
                self.push_inline(&open);
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                // Alt text arrives as events; image is written in end_tag.
                self.image_alt = Some(String::new());
                self.pending_image = Some((dest_url.to_string(), title.to_string()));
            }
            _ => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.output.push_str("</p>"),
            TagEnd::Heading(_) => {
                if let Some(heading) = self.heading.take() {
                    let text = heading.text.trim().to_owned();
                    let anchor = slugify(&text);
                    write!(
                        self.output,
                        r#"<h{level} id="{anchor}">{}</h{level}>"#,
                        heading.html.trim(),
                        level = heading.level,
                    )
                    .unwrap();
                    if heading.level == 1 && self.first_heading.is_none() {
                        self.first_heading = Some(text.clone());
                    }
                    self.toc.push(TocEntry {
                        level: heading.level,
                        text,
                        anchor,
                    });
                }
            }
            TagEnd::BlockQuote(_) => self.output.push_str("</blockquote>"),
            TagEnd::CodeBlock => {
                if let Some(code) = self.code.take() {
                    match code.lang.as_deref() {
                        Some(lang) => write!(
                            self.output,
                            "<pre><code class=\"language-{}\">{}</code></pre>",
                            escape_html(lang),
                            escape_html(&code.buffer)
                        )
                        .unwrap(),
                        None => write!(
                            self.output,
                            "<pre><code>{}</code></pre>",
                            escape_html(&code.buffer)
                        )
                        .unwrap(),
                    }
                }
            }
            TagEnd::List(ordered) => {
                self.output
                    .push_str(if ordered { "</ol>" } else { "</ul>" });
            }
            TagEnd::Item => self.output.push_str("</li>"),
            TagEnd::Table => self.output.push_str("</tbody></table>"),
            TagEnd::TableHead => {
                self.in_table_head = false;
                self.output.push_str("</tr></thead><tbody>");
            }
            TagEnd::TableRow => self.output.push_str("</tr>"),
            TagEnd::TableCell => {
                self.output
                    .push_str(if self.in_table_head { "</th>" } else { "</td>" });
            }
            TagEnd::Emphasis => self.push_inline("</em>"),
            TagEnd::Strong => self.push_inline("</strong>"),
            TagEnd::Strikethrough => self.push_inline("</s>"),
            TagEnd::Link => self.push_inline("</a>"),
            TagEnd::Image => {
                let alt = self.image_alt.take().unwrap_or_default();
                if let Some((src, title)) = self.pending_image.take() {
                    let title_attr = if title.is_empty() {
                        String::new()
                    } else {
                        format!(r#" title="{}""#, escape_html(&title))
                    };
                    write!(
                        self.output,
                        r#"<img src="{}"{title_attr} alt="{}">"#,
                        escape_html(&src),
                        escape_html(&alt)
                    )
                    .unwrap();
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(code) = self.code.as_mut() {
            code.buffer.push_str(text);
        } else if let Some(alt) = self.image_alt.as_mut() {
            alt.push_str(text);
        } else if let Some(heading) = self.heading.as_mut() {
            heading.text.push_str(text);
            heading.html.push_str(&escape_html(text));
        } else {
            self.output.push_str(&escape_html(text));
        }
    }

    fn inline_code(&mut self, code: &str) {
        if let Some(alt) = self.image_alt.as_mut() {
            alt.push_str(code);
        } else if let Some(heading) = self.heading.as_mut() {
            heading.text.push_str(code);
            heading.html.push_str("<code>");
            heading.html.push_str(&escape_html(code));
            heading.html.push_str("</code>");
        } else {
            self.output.push_str("<code>");
            self.output.push_str(&escape_html(code));
            self.output.push_str("</code>");
        }
    }

    fn soft_break(&mut self) {
        if let Some(heading) = self.heading.as_mut() {
            heading.text.push(' ');
            heading.html.push(' ');
        } else if let Some(alt) = self.image_alt.as_mut() {
            alt.push(' ');
        } else {
            self.output.push('\n');
        }
    }

    /// Appends inline markup, routed into the current heading or the
    /// main output. Dropped entirely while collecting image alt text,
    /// which is plain text only.
    fn push_inline(&mut self, s: &str) {
        if self.image_alt.is_some() {
            return;
        }
        if let Some(heading) = self.heading.as_mut() {
            heading.html.push_str(s);
        } else {
            self.output.push_str(s);
        }
    }
}

fn heading_level_to_num(level: pulldown_cmark::HeadingLevel) -> u8 {
    use pulldown_cmark::HeadingLevel;
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Rewrites relative `.md` links to their clean-URL form.
///
/// `guide/intro.md` becomes `guide/intro/`, `guide/index.md` becomes
/// `guide/`, and a fragment survives: `intro.md#usage` becomes
/// `intro/#usage`. External links, fragment-only links, and non-`.md`
/// links are returned unchanged.
#[allow(clippy::case_sensitive_file_extension_comparisons)]
fn transform_link(url: &str) -> String {
    if url.starts_with("http://")
        || url.starts_with("https://")
        || url.starts_with("//")
        || url.starts_with("mailto:")
        || url.starts_with("tel:")
        || url.starts_with('#')
    {
        return url.to_owned();
    }
    if !url.ends_with(".md") && !url.contains(".md#") {
        return url.to_owned();
    }

    let (path, fragment) = match url.find('#') {
        Some(pos) => (&url[..pos], &url[pos..]),
        None => (url, ""),
    };

    let clean = path.strip_suffix(".md").unwrap_or(path);
    let clean = if clean == "index" {
        ""
    } else {
        clean.strip_suffix("/index").map_or(clean, |dir| dir)
    };
    let mut result = clean.to_owned();
    if !result.ends_with('/') {
        result.push('/');
    }
    result.push_str(fragment);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_paragraph() {
        let result = render_html("Hello world.");
        assert_eq!(result.html, "<p>Hello world.</p>");
    }

    #[test]
    fn test_heading_gets_anchor_id() {
        let result = render_html("## Getting Started");
        assert_eq!(
            result.html,
            r##"<h2 id="getting-started">Getting Started</h2>"##
        );
    }

    #[test]
    fn test_first_h1_captured() {
        let result = render_html("# Title\n\n## Section\n\n# Second");
        assert_eq!(result.first_heading.as_deref(), Some("Title"));
    }

    #[test]
    fn test_toc_in_document_order() {
        let result = render_html("# One\n\n## Two\n\n### Three\n");
        let entries: Vec<(u8, &str)> = result
            .toc
            .iter()
            .map(|e| (e.level, e.anchor.as_str()))
            .collect();
        assert_eq!(entries, vec![(1, "one"), (2, "two"), (3, "three")]);
    }

    #[test]
    fn test_headings_inside_fences_not_in_toc() {
        let result = render_html("# Real\n\n```\n# not a heading\n```\n");
        assert_eq!(result.toc.len(), 1);
        assert_eq!(result.toc[0].anchor, "real");
    }

    #[test]
    fn test_duplicate_headings_share_anchor() {
        let result = render_html("## Setup\n\n## Setup\n");
        assert_eq!(result.toc[0].anchor, "setup");
        assert_eq!(result.toc[1].anchor, "setup");
    }

    #[test]
    fn test_heading_with_inline_code() {
        let result = render_html("## Using `build`");
        assert!(result.html.contains(r#"<h2 id="using-build">"#));
        assert!(result.html.contains("<code>build</code>"));
    }

    #[test]
    fn test_code_block_with_language() {
        let result = render_html("```rust\nfn main() {}\n```\n");
        assert_eq!(
            result.html,
            "<pre><code class=\"language-rust\">fn main() {}\n</code></pre>"
        );
    }

    #[test]
    fn test_code_block_escapes_html() {
        let result = render_html("```\n<script>\n```\n");
        assert!(result.html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_table() {
        let result = render_html("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(result.html.starts_with("<table><thead><tr><th>a</th>"));
        assert!(result.html.contains("<tbody><tr><td>1</td>"));
        assert!(result.html.ends_with("</tbody></table>"));
    }

    #[test]
    fn test_strikethrough() {
        let result = render_html("~~gone~~");
        assert_eq!(result.html, "<p><s>gone</s></p>");
    }

    #[test]
    fn test_raw_html_passes_through() {
        let result = render_html("<div class=\"custom-block tip\">\n\nhi\n\n</div>\n");
        assert!(result.html.contains("<div class=\"custom-block tip\">"));
    }

    #[test]
    fn test_md_link_rewritten() {
        let result = render_html("[guide](guide/intro.md)");
        assert!(result.html.contains(r#"<a href="guide/intro/">"#));
    }

    #[test]
    fn test_md_index_link_collapsed() {
        let result = render_html("[guide](guide/index.md)");
        assert!(result.html.contains(r#"<a href="guide/">"#));
    }

    #[test]
    fn test_md_link_with_fragment() {
        let result = render_html("[usage](intro.md#usage)");
        assert!(result.html.contains(r#"<a href="intro/#usage">"#));
    }

    #[test]
    fn test_external_link_untouched() {
        let result = render_html("[site](https://example.com/page.md)");
        assert!(result.html.contains(r#"<a href="https://example.com/page.md">"#));
    }

    #[test]
    fn test_non_md_link_untouched() {
        let result = render_html("[file](data.json)");
        assert!(result.html.contains(r#"<a href="data.json">"#));
    }

    #[test]
    fn test_image() {
        let result = render_html("![alt text](img.png \"a title\")");
        assert!(
            result
                .html
                .contains(r#"<img src="img.png" title="a title" alt="alt text">"#)
        );
    }

    #[test]
    fn test_image_alt_markup_flattens_to_text() {
        let result = render_html("![*alt* text](img.png)");
        assert_eq!(
            result.html,
            r#"<p><img src="img.png" alt="alt text"></p>"#
        );
    }

    #[test]
    fn test_text_is_escaped() {
        let result = render_html("a < b & c");
        assert_eq!(result.html, "<p>a &lt; b &amp; c</p>");
    }
}
