//! Convert a Node tree to the Markdown AST
//!
//! Rules are consulted first for every element; whatever they don't claim
//! goes through the CommonMark mapping below. Consecutive inline content at
//! block level is gathered into a single paragraph.

use markpage_core::{Block, CodeBlockStyle, Inline, ListItem, Options};

use crate::node::{Node, NodeType};
use crate::rules::{Rule, Rules};
use crate::utilities::{
    clean_attribute, collapse_whitespace, escape_line_start, escape_markdown, is_block, is_skipped,
};

/// Convert a Node tree to a Markdown AST. The tree is only read.
pub fn convert(node: &Node, options: &Options, rules: &Rules) -> Block {
    let ctx = Context { options, rules };
    Block::Document(convert_nodes(std::slice::from_ref(node), &ctx))
}

struct Context<'a> {
    options: &'a Options,
    rules: &'a Rules,
}

/// Image, source and caption of a `<figure>` holding an image
struct FigureParts {
    alt: String,
    url: String,
    caption: String,
}

fn convert_children(node: &Node, ctx: &Context) -> Vec<Block> {
    convert_nodes(&node.children, ctx)
}

fn convert_nodes(nodes: &[Node], ctx: &Context) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut run = Vec::new();

    for node in nodes {
        match node.node_type {
            NodeType::Text => push_text(node, &mut run),
            NodeType::Element if is_block(node.tag_name()) || holds_figure(node, ctx) => {
                flush_run(&mut run, &mut blocks);
                if let Some(block) = convert_element(node, ctx) {
                    blocks.push(block);
                }
            }
            NodeType::Element => convert_inline_element(node, ctx, &mut run),
            NodeType::Document | NodeType::DocumentFragment => {
                flush_run(&mut run, &mut blocks);
                blocks.extend(convert_children(node, ctx));
            }
            NodeType::Comment => {}
        }
    }

    flush_run(&mut run, &mut blocks);
    blocks
}

fn flush_run(run: &mut Vec<Inline>, blocks: &mut Vec<Block>) {
    if inlines_are_blank(run) {
        run.clear();
    } else {
        escape_line_starts(run);
        blocks.push(Block::Paragraph(std::mem::take(run)));
    }
}

/// Convert a block-level element
fn convert_element(node: &Node, ctx: &Context) -> Option<Block> {
    if let Some(rule) = ctx.rules.for_node(node) {
        return match rule {
            Rule::Keep(_) => Some(Block::HtmlBlock(node.outer_html())),
            Rule::Figure => match figure_parts(node) {
                Some(FigureParts { alt, url, caption }) => Some(Block::Figure { alt, url, caption }),
                None => container(convert_children(node, ctx)),
            },
            Rule::Remove(_) => None,
        };
    }

    let tag = node.tag_name();
    if is_skipped(tag) {
        return None;
    }

    match tag {
        // A figure cannot sit inside a paragraph line, so the paragraph
        // is split around it
        "p" if holds_figure(node, ctx) => container(convert_children(node, ctx)),

        "p" => {
            let mut inlines = collect_inlines(node, ctx);
            escape_line_starts(&mut inlines);
            (!inlines_are_blank(&inlines)).then_some(Block::Paragraph(inlines))
        }

        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let level = tag[1..].parse().unwrap_or(1);
            let mut content = collect_inlines(node, ctx);
            escape_line_starts(&mut content);
            (!inlines_are_blank(&content)).then_some(Block::Heading { level, content })
        }

        "blockquote" => {
            let blocks = convert_children(node, ctx);
            (!blocks.is_empty()).then_some(Block::BlockQuote(blocks))
        }

        "ul" | "ol" => {
            let items = collect_list_items(node, ctx);
            if items.is_empty() {
                return None;
            }
            let start = node
                .attr("start")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(1);
            Some(Block::List {
                ordered: tag == "ol",
                start,
                items,
            })
        }

        "pre" => Some(convert_pre(node, ctx.options)),

        "hr" => Some(Block::ThematicBreak),

        "table" => convert_table(node, ctx),

        _ => container(convert_children(node, ctx)),
    }
}

fn container(blocks: Vec<Block>) -> Option<Block> {
    (!blocks.is_empty()).then_some(Block::Document(blocks))
}

/// Whether `node` is or contains a figure that renders as an image
fn holds_figure(node: &Node, ctx: &Context) -> bool {
    std::iter::once(node)
        .chain(node.descendants())
        .any(|n| matches!(ctx.rules.for_node(n), Some(Rule::Figure)) && figure_parts(n).is_some())
}

fn figure_parts(figure: &Node) -> Option<FigureParts> {
    let img = figure.find_first(|n| n.tag_name() == "img")?;
    let caption = figure
        .find_first(|n| n.tag_name() == "figcaption")
        .map(|c| collapse_whitespace(&c.text_content()).trim().to_string())
        .unwrap_or_default();

    Some(FigureParts {
        alt: img.attr("alt").unwrap_or_default().to_string(),
        url: img.attr("src").unwrap_or_default().to_string(),
        caption,
    })
}

fn convert_pre(node: &Node, options: &Options) -> Block {
    let code_node = node.element_children().find(|c| c.tag_name() == "code");
    let code = code_node.unwrap_or(node).text_content();

    let language = code_node
        .into_iter()
        .chain(std::iter::once(node))
        .filter_map(|n| n.attr("class"))
        .flat_map(str::split_whitespace)
        .find_map(|class| {
            class
                .strip_prefix("language-")
                .or_else(|| class.strip_prefix("lang-"))
        })
        .map(str::to_string);

    Block::CodeBlock {
        language,
        code,
        fenced: options.code_block_style == CodeBlockStyle::Fenced,
    }
}

fn collect_list_items(node: &Node, ctx: &Context) -> Vec<ListItem> {
    node.element_children()
        .filter(|child| child.tag_name() == "li")
        .map(|li| ListItem::new(convert_children(li, ctx)))
        .filter(|item| !item.is_blank())
        .collect()
}

fn convert_table(node: &Node, ctx: &Context) -> Option<Block> {
    let mut headers: Vec<Vec<Inline>> = Vec::new();
    let mut rows: Vec<Vec<Vec<Inline>>> = Vec::new();

    let table_rows = node.element_children().flat_map(|child| {
        let section_rows: Vec<(&Node, bool)> = match child.tag_name() {
            "thead" => child
                .element_children()
                .filter(|tr| tr.tag_name() == "tr")
                .map(|tr| (tr, true))
                .collect(),
            "tbody" | "tfoot" => child
                .element_children()
                .filter(|tr| tr.tag_name() == "tr")
                .map(|tr| (tr, false))
                .collect(),
            "tr" => vec![(child, false)],
            _ => Vec::new(),
        };
        section_rows
    });

    for (tr, in_head) in table_rows {
        let mut row = Vec::new();
        let mut all_th = true;
        for cell in tr.element_children() {
            match cell.tag_name() {
                "th" => row.push(collect_inlines(cell, ctx)),
                "td" => {
                    all_th = false;
                    row.push(collect_inlines(cell, ctx));
                }
                _ => {}
            }
        }
        if row.is_empty() {
            continue;
        }
        if headers.is_empty() && rows.is_empty() && (in_head || all_th) {
            headers = row;
        } else {
            rows.push(row);
        }
    }

    if headers.is_empty() {
        if rows.is_empty() {
            return None;
        }
        headers = rows.remove(0);
    }

    Some(Block::Table { headers, rows })
}

fn collect_inlines(node: &Node, ctx: &Context) -> Vec<Inline> {
    let mut inlines = Vec::new();
    collect_inlines_into(node, ctx, &mut inlines);
    inlines
}

fn collect_inlines_into(node: &Node, ctx: &Context, out: &mut Vec<Inline>) {
    for child in &node.children {
        match child.node_type {
            NodeType::Text => push_text(child, out),
            NodeType::Element => convert_inline_element(child, ctx, out),
            NodeType::Document | NodeType::DocumentFragment => collect_inlines_into(child, ctx, out),
            NodeType::Comment => {}
        }
    }
}

fn push_text(node: &Node, out: &mut Vec<Inline>) {
    let text = node.node_value.as_deref().unwrap_or("");
    if !text.is_empty() {
        out.push(Inline::Text(escape_markdown(&collapse_whitespace(text))));
    }
}

/// Convert an element in inline position, appending to `out`
fn convert_inline_element(node: &Node, ctx: &Context, out: &mut Vec<Inline>) {
    if let Some(rule) = ctx.rules.for_node(node) {
        match rule {
            Rule::Keep(_) => out.push(Inline::HtmlInline(node.outer_html())),
            Rule::Figure => match figure_parts(node) {
                Some(FigureParts { alt, url, caption }) => {
                    out.push(Inline::Image {
                        alt,
                        url,
                        title: None,
                    });
                    // Only headings and table cells get here; neither can
                    // hold a line break, so the caption follows on the line
                    if !caption.is_empty() {
                        out.push(Inline::Text(format!(" {}", escape_markdown(&caption))));
                    }
                }
                None => collect_inlines_into(node, ctx, out),
            },
            Rule::Remove(_) => {}
        }
        return;
    }

    let tag = node.tag_name();
    if is_skipped(tag) {
        return;
    }

    match tag {
        "strong" | "b" => {
            let inner = collect_inlines(node, ctx);
            if !inlines_are_blank(&inner) {
                out.push(Inline::Strong(inner));
            }
        }

        "em" | "i" => {
            let inner = collect_inlines(node, ctx);
            if !inlines_are_blank(&inner) {
                out.push(Inline::Emphasis(inner));
            }
        }

        "code" | "kbd" | "samp" | "tt" => {
            let code = node.text_content().replace(['\r', '\n'], " ");
            if !code.is_empty() {
                out.push(Inline::Code(code));
            }
        }

        "a" => {
            let href = clean_attribute(node.attr("href"));
            let content = collect_inlines(node, ctx);
            if href.is_empty() {
                out.extend(content);
            } else {
                out.push(Inline::Link {
                    content,
                    url: href,
                    title: node.attr("title").map(str::to_string),
                });
            }
        }

        "img" => {
            let src = clean_attribute(node.attr("src"));
            if !src.is_empty() {
                out.push(Inline::Image {
                    alt: clean_attribute(node.attr("alt")),
                    url: src,
                    title: node.attr("title").map(str::to_string),
                });
            }
        }

        "br" => out.push(Inline::LineBreak),

        // Anything else (span, mark, nested blocks, unknown tags) passes
        // its content through
        _ => collect_inlines_into(node, ctx, out),
    }
}

/// Escape block markers in text that begins a line: the first text of a
/// block and text after a hard break
fn escape_line_starts(inlines: &mut [Inline]) {
    let mut at_line_start = true;
    for inline in inlines.iter_mut() {
        match inline {
            Inline::Text(text) if text.trim().is_empty() => {}
            Inline::Text(text) => {
                if at_line_start {
                    *text = escape_line_start(text);
                }
                at_line_start = false;
            }
            Inline::LineBreak => at_line_start = true,
            _ => at_line_start = false,
        }
    }
}

fn inlines_are_blank(inlines: &[Inline]) -> bool {
    inlines.iter().all(Inline::is_blank)
}
