//! Markdown AST serialization
//!
//! Converts Markdown AST nodes into Markdown text.

use crate::ast::{inlines_text_len, Block, Inline, ListItem};
use crate::options::{CodeBlockStyle, HeadingStyle, Options};

/// Serialize a block to Markdown string.
///
/// Blocks are rendered on their own and joined with one blank line, so the
/// content of code blocks and verbatim HTML is never rewritten.
pub fn serialize(block: &Block, options: &Options) -> String {
    render_block(block, options)
}

/// Render one block without surrounding blank lines
fn render_block(block: &Block, options: &Options) -> String {
    match block {
        Block::Document(blocks) => render_blocks(blocks, options),

        Block::Heading { level, content } => render_heading(*level, content, options),

        Block::Paragraph(inlines) => render_trimmed_inlines(inlines, options),

        Block::BlockQuote(blocks) => render_blocks(blocks, options)
            .lines()
            .map(|line| {
                if line.is_empty() {
                    ">".to_string()
                } else {
                    format!("> {line}")
                }
            })
            .collect::<Vec<_>>()
            .join("\n"),

        Block::List {
            ordered,
            start,
            items,
        } => render_list(*ordered, *start, items, options),

        Block::CodeBlock {
            language,
            code,
            fenced,
        } => render_code_block(language.as_deref(), code, *fenced, options),

        Block::ThematicBreak => options.hr.clone(),

        Block::Table { headers, rows } => render_table(headers, rows, options),

        Block::Figure { alt, url, caption } => {
            let mut out = format!("![{alt}]({url})");
            if !caption.is_empty() {
                out.push('\n');
                out.push_str(caption);
            }
            out
        }

        Block::HtmlBlock(html) => html.clone(),
    }
}

fn render_blocks(blocks: &[Block], options: &Options) -> String {
    blocks
        .iter()
        .filter(|block| !block.is_blank())
        .map(|block| render_block(block, options))
        .filter(|rendered| !rendered.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Inlines with surrounding whitespace removed
fn render_trimmed_inlines(inlines: &[Inline], options: &Options) -> String {
    let mut text = String::new();
    serialize_inlines(inlines, options, &mut text);
    text.trim().to_string()
}

fn render_heading(level: u8, content: &[Inline], options: &Options) -> String {
    let mut text = String::new();
    serialize_inlines(content, options, &mut text);
    // Headings are single-line in Markdown
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        return text;
    }

    match options.heading_style {
        HeadingStyle::Setext if level <= 2 => {
            let underline = if level == 1 { "=" } else { "-" };
            format!("{text}\n{}", underline.repeat(text.chars().count()))
        }
        _ => format!("{} {text}", "#".repeat(usize::from(level.clamp(1, 6)))),
    }
}

fn render_list(ordered: bool, start: u32, items: &[ListItem], options: &Options) -> String {
    let mut number = start;
    let mut rendered = Vec::with_capacity(items.len());

    for item in items {
        let prefix = if ordered {
            format!("{number}.  ")
        } else {
            format!("{}   ", options.bullet_list_marker)
        };
        // `start` comes from page markup and may sit at the top of the range
        number = number.saturating_add(1);

        let body = render_list_item(item, options);
        let continuation = " ".repeat(prefix.len());

        let mut out = prefix;
        for (i, line) in body.lines().enumerate() {
            if i > 0 {
                out.push('\n');
                if !line.is_empty() {
                    out.push_str(&continuation);
                }
            }
            out.push_str(line);
        }
        rendered.push(out);
    }

    rendered.join("\n")
}

fn render_list_item(item: &ListItem, options: &Options) -> String {
    let mut out = String::new();
    for block in item.content.iter().filter(|block| !block.is_blank()) {
        let rendered = render_block(block, options);
        if rendered.is_empty() {
            continue;
        }
        if !out.is_empty() {
            // Nested lists hang directly under the item text
            out.push_str(if matches!(block, Block::List { .. }) { "\n" } else { "\n\n" });
        }
        out.push_str(&rendered);
    }
    out
}

fn render_code_block(language: Option<&str>, code: &str, fenced: bool, options: &Options) -> String {
    let code = code.trim_end_matches('\n');

    if fenced || options.code_block_style == CodeBlockStyle::Fenced {
        let fence = fence_for(code, &options.fence);
        format!("{fence}{}\n{code}\n{fence}", language.unwrap_or(""))
    } else {
        code.lines()
            .map(|line| {
                if line.is_empty() {
                    String::new()
                } else {
                    format!("    {line}")
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// The configured fence, lengthened when the code itself contains a run of
/// the fence character at least as long.
fn fence_for(code: &str, fence: &str) -> String {
    let Some(fence_char) = fence.chars().next() else {
        return "```".to_string();
    };
    let longest = longest_run(code, fence_char);
    if longest >= fence.chars().count() {
        fence_char.to_string().repeat(longest + 1)
    } else {
        fence.to_string()
    }
}

fn longest_run(text: &str, target: char) -> usize {
    text.chars()
        .fold((0, 0), |(max, current), c| {
            if c == target {
                (max.max(current + 1), current + 1)
            } else {
                (max, 0)
            }
        })
        .0
}

fn render_table(headers: &[Vec<Inline>], rows: &[Vec<Vec<Inline>>], options: &Options) -> String {
    if headers.is_empty() {
        return String::new();
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| inlines_text_len(h)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(inlines_text_len(cell));
            }
        }
    }
    for width in &mut widths {
        *width = (*width).max(3);
    }

    let mut out = String::new();
    serialize_table_row(headers, &widths, options, &mut out);
    out.push('\n');

    out.push('|');
    for width in &widths {
        out.push(' ');
        out.push_str(&"-".repeat(*width));
        out.push_str(" |");
    }

    for row in rows {
        out.push('\n');
        serialize_table_row(row, &widths, options, &mut out);
    }

    out
}

fn serialize_table_row(cells: &[Vec<Inline>], widths: &[usize], options: &Options, out: &mut String) {
    out.push('|');
    for (i, cell) in cells.iter().enumerate() {
        let mut text = String::new();
        serialize_inlines(cell, options, &mut text);
        // Cells must stay on one line
        let text = text.replace('\n', " ");
        let text = text.trim();
        let width = widths.get(i).copied().unwrap_or(3);

        out.push(' ');
        out.push_str(text);
        out.push_str(&" ".repeat(width.saturating_sub(text.chars().count())));
        out.push_str(" |");
    }
}

fn serialize_inlines(inlines: &[Inline], options: &Options, out: &mut String) {
    for inline in inlines {
        serialize_inline(inline, options, out);
    }
}

fn serialize_inline(inline: &Inline, options: &Options, out: &mut String) {
    match inline {
        Inline::Text(text) => out.push_str(text),

        Inline::Strong(content) => {
            wrap_delimited(content, &options.strong_delimiter, options, out);
        }

        Inline::Emphasis(content) => {
            let delimiter = options.em_delimiter.to_string();
            wrap_delimited(content, &delimiter, options, out);
        }

        Inline::Code(code) => {
            if code.is_empty() {
                return;
            }
            let ticks = "`".repeat(longest_run(code, '`') + 1);
            let pad = if code.starts_with('`') || code.ends_with('`') {
                " "
            } else {
                ""
            };
            out.push_str(&ticks);
            out.push_str(pad);
            out.push_str(code);
            out.push_str(pad);
            out.push_str(&ticks);
        }

        Inline::Link {
            content,
            url,
            title,
        } => {
            out.push('[');
            serialize_inlines(content, options, out);
            out.push_str("](");
            out.push_str(url);
            push_title(title.as_deref(), out);
            out.push(')');
        }

        Inline::Image { alt, url, title } => {
            out.push_str("![");
            out.push_str(alt);
            out.push_str("](");
            out.push_str(url);
            push_title(title.as_deref(), out);
            out.push(')');
        }

        Inline::LineBreak => out.push_str("  \n"),

        Inline::HtmlInline(html) => out.push_str(html),
    }
}

/// Wrap inline content in a delimiter, keeping surrounding whitespace
/// outside so `<b> x </b>` becomes ` **x** `.
fn wrap_delimited(content: &[Inline], delimiter: &str, options: &Options, out: &mut String) {
    let mut inner = String::new();
    serialize_inlines(content, options, &mut inner);
    let trimmed = inner.trim();
    if trimmed.is_empty() {
        return;
    }

    if inner.starts_with(char::is_whitespace) {
        out.push(' ');
    }
    out.push_str(delimiter);
    out.push_str(trimmed);
    out.push_str(delimiter);
    if inner.ends_with(char::is_whitespace) {
        out.push(' ');
    }
}

fn push_title(title: Option<&str>, out: &mut String) {
    if let Some(title) = title {
        out.push_str(" \"");
        out.push_str(&title.replace('"', "\\\""));
        out.push('"');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    #[test]
    fn test_paragraph_is_trimmed() {
        let block = Block::Paragraph(vec![text("  Hello World ")]);
        assert_eq!(serialize(&block, &Options::default()), "Hello World");
    }

    #[test]
    fn test_heading_setext_h1() {
        let block = Block::Heading {
            level: 1,
            content: vec![text("Title")],
        };
        assert_eq!(serialize(&block, &Options::default()), "Title\n=====");
    }

    #[test]
    fn test_heading_atx() {
        let block = Block::Heading {
            level: 3,
            content: vec![text("Section")],
        };
        assert_eq!(serialize(&block, &Options::page()), "### Section");
    }

    #[test]
    fn test_strong_keeps_outer_space() {
        let block = Block::Paragraph(vec![
            text("Hello"),
            Inline::Strong(vec![text(" World")]),
        ]);
        assert_eq!(serialize(&block, &Options::default()), "Hello **World**");
    }

    #[test]
    fn test_emphasis_uses_configured_delimiter() {
        let mut options = Options::default();
        options.em_delimiter = '*';
        let block = Block::Paragraph(vec![Inline::Emphasis(vec![text("italic")])]);
        assert_eq!(serialize(&block, &options), "*italic*");
    }

    #[test]
    fn test_inline_code_with_backticks() {
        let block = Block::Paragraph(vec![Inline::Code("a ``b`` c".to_string())]);
        assert_eq!(serialize(&block, &Options::default()), "```a ``b`` c```");
    }

    #[test]
    fn test_link_with_title() {
        let block = Block::Paragraph(vec![Inline::Link {
            content: vec![text("Example")],
            url: "https://example.com".to_string(),
            title: Some("Home".to_string()),
        }]);
        assert_eq!(
            serialize(&block, &Options::default()),
            "[Example](https://example.com \"Home\")"
        );
    }

    #[test]
    fn test_code_block_fenced() {
        let block = Block::CodeBlock {
            language: Some("rust".to_string()),
            code: "let x = 1;\n".to_string(),
            fenced: true,
        };
        assert_eq!(
            serialize(&block, &Options::page()),
            "```rust\nlet x = 1;\n```"
        );
    }

    #[test]
    fn test_fence_grows_past_inner_fence() {
        let block = Block::CodeBlock {
            language: None,
            code: "```\nnested\n```".to_string(),
            fenced: true,
        };
        assert_eq!(
            serialize(&block, &Options::page()),
            "````\n```\nnested\n```\n````"
        );
    }

    #[test]
    fn test_code_block_indented() {
        let block = Block::CodeBlock {
            language: None,
            code: "let x = 1;".to_string(),
            fenced: false,
        };
        assert_eq!(serialize(&block, &Options::default()), "    let x = 1;");
    }

    #[test]
    fn test_blockquote() {
        let block = Block::BlockQuote(vec![
            Block::Paragraph(vec![text("One")]),
            Block::Paragraph(vec![text("Two")]),
        ]);
        assert_eq!(serialize(&block, &Options::default()), "> One\n>\n> Two");
    }

    #[test]
    fn test_unordered_list_page_marker() {
        let block = Block::List {
            ordered: false,
            start: 1,
            items: vec![
                ListItem::from_inlines(vec![text("One")]),
                ListItem::from_inlines(vec![text("Two")]),
            ],
        };
        assert_eq!(serialize(&block, &Options::page()), "-   One\n-   Two");
    }

    #[test]
    fn test_ordered_list_start() {
        let block = Block::List {
            ordered: true,
            start: 3,
            items: vec![
                ListItem::from_inlines(vec![text("Three")]),
                ListItem::from_inlines(vec![text("Four")]),
            ],
        };
        assert_eq!(serialize(&block, &Options::default()), "3.  Three\n4.  Four");
    }

    #[test]
    fn test_nested_list() {
        let inner = Block::List {
            ordered: false,
            start: 1,
            items: vec![ListItem::from_inlines(vec![text("Child")])],
        };
        let block = Block::List {
            ordered: false,
            start: 1,
            items: vec![
                ListItem::new(vec![Block::Paragraph(vec![text("Parent")]), inner]),
                ListItem::from_inlines(vec![text("Sibling")]),
            ],
        };
        assert_eq!(
            serialize(&block, &Options::page()),
            "-   Parent\n    -   Child\n-   Sibling"
        );
    }

    #[test]
    fn test_thematic_break_page() {
        assert_eq!(serialize(&Block::ThematicBreak, &Options::page()), "---");
    }

    #[test]
    fn test_figure_between_paragraphs() {
        let block = Block::Document(vec![
            Block::Paragraph(vec![text("Before")]),
            Block::Figure {
                alt: "A cat".to_string(),
                url: "cat.png".to_string(),
                caption: "Figure 1".to_string(),
            },
            Block::Paragraph(vec![text("After")]),
        ]);
        assert_eq!(
            serialize(&block, &Options::page()),
            "Before\n\n![A cat](cat.png)\nFigure 1\n\nAfter"
        );
    }

    #[test]
    fn test_html_block_is_verbatim() {
        let html = "<script>if (a < b) { run(); }</script>";
        let block = Block::HtmlBlock(html.to_string());
        assert_eq!(serialize(&block, &Options::page()), html);
    }

    #[test]
    fn test_html_block_of_markdown_is_identity() {
        let markdown = "# Title\n\nHello **World**\n\n-   one\n-   two";
        let block = Block::HtmlBlock(markdown.to_string());
        assert_eq!(serialize(&block, &Options::page()), markdown);
    }

    #[test]
    fn test_table() {
        let block = Block::Table {
            headers: vec![vec![text("A")], vec![text("B")]],
            rows: vec![vec![vec![text("1")], vec![text("2")]]],
        };
        assert_eq!(
            serialize(&block, &Options::default()),
            "| A   | B   |\n| --- | --- |\n| 1   | 2   |"
        );
    }

    #[test]
    fn test_html_block_keeps_blank_line_runs() {
        let html = "<script>a();\n\n\n\nb();</script>";
        let block = Block::Document(vec![
            Block::Paragraph(vec![text("Before")]),
            Block::HtmlBlock(html.to_string()),
        ]);
        assert_eq!(serialize(&block, &Options::page()), format!("Before\n\n{html}"));
    }

    #[test]
    fn test_html_inline_keeps_blank_line_runs() {
        let html = "<style>p {}\n\n\n\na {}</style>";
        let block = Block::Paragraph(vec![Inline::HtmlInline(html.to_string())]);
        assert_eq!(serialize(&block, &Options::page()), html);
    }

    #[test]
    fn test_code_block_keeps_blank_line_runs() {
        let block = Block::CodeBlock {
            language: Some("python".to_string()),
            code: "x = 1\n\n\ny = 2".to_string(),
            fenced: true,
        };
        assert_eq!(
            serialize(&block, &Options::page()),
            "```python\nx = 1\n\n\ny = 2\n```"
        );
    }

    #[test]
    fn test_indented_code_blank_lines_have_no_indent() {
        let block = Block::CodeBlock {
            language: None,
            code: "a\n\n\nb".to_string(),
            fenced: false,
        };
        assert_eq!(serialize(&block, &Options::default()), "    a\n\n\n    b");
    }

    #[test]
    fn test_code_block_in_list_item_keeps_blank_lines() {
        let block = Block::List {
            ordered: false,
            start: 1,
            items: vec![ListItem::new(vec![
                Block::Paragraph(vec![text("Run")]),
                Block::CodeBlock {
                    language: None,
                    code: "a\n\n\nb".to_string(),
                    fenced: true,
                },
            ])],
        };
        assert_eq!(
            serialize(&block, &Options::page()),
            "-   Run\n\n    ```\n    a\n\n\n    b\n    ```"
        );
    }

    #[test]
    fn test_ordered_list_numbering_saturates() {
        let block = Block::List {
            ordered: true,
            start: u32::MAX,
            items: vec![
                ListItem::from_inlines(vec![text("a")]),
                ListItem::from_inlines(vec![text("b")]),
            ],
        };
        assert_eq!(
            serialize(&block, &Options::default()),
            "4294967295.  a\n4294967295.  b"
        );
    }

    #[test]
    fn test_blank_blocks_add_no_separators() {
        let block = Block::Document(vec![
            Block::Paragraph(vec![text("a")]),
            Block::Paragraph(vec![text("   ")]),
            Block::Document(vec![]),
            Block::Paragraph(vec![text("b")]),
        ]);
        assert_eq!(serialize(&block, &Options::default()), "a\n\nb");
    }
}
