//! Narrative formatting: an ordered pipeline of named stages over tagged lines
//!
//! Line stages run first and only ever refine lines still tagged as plain
//! text, so a later stage never re-reads structure an earlier one produced.
//! List grouping and paragraph wrapping then fold the lines into blocks.

use crate::formatting::markup::{self, Node, Tag};
use crate::parsing::grammar::{BOLD, BOLD_LABEL, BULLET, HEADING, NUMBERED};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    Plain(String),
    Strong(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Text,
    Heading(u8),
    Item { ordered: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedLine {
    pub kind: LineKind,
    pub spans: Vec<Span>,
}

impl TaggedLine {
    fn text(text: &str) -> Self {
        Self {
            kind: LineKind::Text,
            spans: vec![Span::Plain(text.to_string())],
        }
    }

    fn blank() -> Self {
        Self {
            kind: LineKind::Blank,
            spans: Vec::new(),
        }
    }

    /// The raw text of a line no inline stage has touched yet.
    fn untouched(&self) -> Option<&str> {
        match (self.kind, self.spans.as_slice()) {
            (LineKind::Text, [Span::Plain(text)]) => Some(text),
            _ => None,
        }
    }
}

/// Line-level stages, in the order they must run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// `### Heading:` → level-2 heading
    Headings,
    /// `**Label:** rest` → level-3 heading, rest kept as text
    BoldLabels,
    /// `**bold**` → strong spans
    Emphasis,
    /// `1. **Label** rest` → ordered item with an emphasised lead-in
    NumberedItems,
    /// `- item` → unordered item
    BulletItems,
}

pub const LINE_STAGES: [Stage; 5] = [
    Stage::Headings,
    Stage::BoldLabels,
    Stage::Emphasis,
    Stage::NumberedItems,
    Stage::BulletItems,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, spans: Vec<Span> },
    List { ordered: bool, items: Vec<Vec<Span>> },
    Line(Vec<Span>),
    Blank,
    Paragraph(Vec<Vec<Span>>),
}

pub fn tag_lines(text: &str) -> Vec<TaggedLine> {
    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                TaggedLine::blank()
            } else {
                TaggedLine::text(line)
            }
        })
        .collect()
}

pub fn apply_stage(stage: Stage, lines: Vec<TaggedLine>) -> Vec<TaggedLine> {
    match stage {
        Stage::Headings => lines.into_iter().map(heading_line).collect(),
        Stage::BoldLabels => lines.into_iter().flat_map(bold_label_line).collect(),
        Stage::Emphasis => lines.into_iter().map(emphasis_line).collect(),
        Stage::NumberedItems => lines.into_iter().map(numbered_line).collect(),
        Stage::BulletItems => lines.into_iter().map(bullet_line).collect(),
    }
}

fn heading_line(line: TaggedLine) -> TaggedLine {
    let title = line
        .untouched()
        .and_then(|text| HEADING.captures(text))
        .map(|caps| caps[1].to_string());

    match title {
        Some(title) => TaggedLine {
            kind: LineKind::Heading(2),
            spans: vec![Span::Plain(title)],
        },
        None => line,
    }
}

fn bold_label_line(line: TaggedLine) -> Vec<TaggedLine> {
    let parsed = line
        .untouched()
        .and_then(|text| BOLD_LABEL.captures(text))
        .map(|caps| (caps[1].trim().to_string(), caps[2].trim().to_string()));
    let Some((label, rest)) = parsed else {
        return vec![line];
    };

    let mut out = vec![TaggedLine {
        kind: LineKind::Heading(3),
        spans: vec![Span::Plain(label)],
    }];
    if !rest.is_empty() {
        out.push(TaggedLine::text(&rest));
    }
    out
}

fn emphasis_line(line: TaggedLine) -> TaggedLine {
    let Some(text) = line.untouched() else {
        return line;
    };

    let mut spans = Vec::new();
    let mut last = 0;
    for caps in BOLD.captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            spans.push(Span::Plain(text[last..whole.start()].to_string()));
        }
        spans.push(Span::Strong(inner.as_str().to_string()));
        last = whole.end();
    }
    if last < text.len() {
        spans.push(Span::Plain(text[last..].to_string()));
    }

    TaggedLine {
        kind: LineKind::Text,
        spans,
    }
}

fn numbered_line(line: TaggedLine) -> TaggedLine {
    let is_numbered = line.kind == LineKind::Text
        && matches!(
            line.spans.as_slice(),
            [Span::Plain(marker), Span::Strong(_), ..] if is_numbered_marker(marker)
        );
    if !is_numbered {
        return line;
    }

    TaggedLine {
        kind: LineKind::Item { ordered: true },
        spans: line.spans.into_iter().skip(1).collect(),
    }
}

/// The whole span is an ordinal marker such as `3. `.
fn is_numbered_marker(text: &str) -> bool {
    let text = text.trim_start();
    NUMBERED.find(text).is_some_and(|m| m.end() == text.len())
}

fn bullet_line(line: TaggedLine) -> TaggedLine {
    let remainder = match (line.kind, line.spans.first()) {
        (LineKind::Text, Some(Span::Plain(first))) => {
            let first = first.trim_start();
            BULLET.find(first).map(|m| first[m.end()..].to_string())
        }
        _ => None,
    };
    let Some(remainder) = remainder else {
        return line;
    };

    let mut spans = Vec::with_capacity(line.spans.len());
    if !remainder.is_empty() {
        spans.push(Span::Plain(remainder));
    }
    spans.extend(line.spans.into_iter().skip(1));

    TaggedLine {
        kind: LineKind::Item { ordered: false },
        spans,
    }
}

/// Fold adjacent items of the same kind into one list.
pub fn group_lists(lines: Vec<TaggedLine>) -> Vec<Block> {
    let mut blocks: Vec<Block> = Vec::new();
    for line in lines {
        match line.kind {
            LineKind::Item { ordered } => {
                if let Some(Block::List { ordered: open, items }) = blocks.last_mut() {
                    if *open == ordered {
                        items.push(line.spans);
                        continue;
                    }
                }
                blocks.push(Block::List {
                    ordered,
                    items: vec![line.spans],
                });
            }
            LineKind::Heading(level) => blocks.push(Block::Heading { level, spans: line.spans }),
            LineKind::Text => blocks.push(Block::Line(line.spans)),
            LineKind::Blank => blocks.push(Block::Blank),
        }
    }
    blocks
}

/// Gather runs of bare lines into paragraphs; structural blocks pass through.
pub fn wrap_paragraphs(blocks: Vec<Block>) -> Vec<Block> {
    let mut out = Vec::new();
    let mut pending: Vec<Vec<Span>> = Vec::new();

    for block in blocks {
        match block {
            Block::Line(spans) => pending.push(spans),
            Block::Blank => flush_paragraph(&mut pending, &mut out),
            structural => {
                flush_paragraph(&mut pending, &mut out);
                out.push(structural);
            }
        }
    }
    flush_paragraph(&mut pending, &mut out);
    out
}

fn flush_paragraph(pending: &mut Vec<Vec<Span>>, out: &mut Vec<Block>) {
    if !pending.is_empty() {
        out.push(Block::Paragraph(std::mem::take(pending)));
    }
}

/// Run every stage in order and return the final blocks.
pub fn to_blocks(text: &str) -> Vec<Block> {
    let normalized = text.replace("\r\n", "\n");
    let lines = LINE_STAGES
        .iter()
        .fold(tag_lines(&normalized), |lines, stage| apply_stage(*stage, lines));
    wrap_paragraphs(group_lists(lines))
}

pub fn render_blocks(blocks: &[Block]) -> Vec<Node> {
    blocks.iter().filter_map(render_block).collect()
}

fn render_block(block: &Block) -> Option<Node> {
    match block {
        Block::Heading { level, spans } => {
            let tag = if *level <= 2 { Tag::H2 } else { Tag::H3 };
            Some(Node::element(tag, span_nodes(spans)))
        }
        Block::List { ordered, items } => {
            let tag = if *ordered { Tag::Ol } else { Tag::Ul };
            let items = items
                .iter()
                .map(|spans| Node::element(Tag::Li, span_nodes(spans)))
                .collect();
            Some(Node::element(tag, items))
        }
        Block::Paragraph(lines) => {
            let mut children = Vec::new();
            for (i, spans) in lines.iter().enumerate() {
                if i > 0 {
                    children.push(Node::LineBreak);
                }
                children.extend(span_nodes(spans));
            }
            Some(Node::element(Tag::P, children))
        }
        Block::Line(spans) => Some(Node::element(Tag::P, span_nodes(spans))),
        Block::Blank => None,
    }
}

fn span_nodes(spans: &[Span]) -> Vec<Node> {
    spans
        .iter()
        .map(|span| match span {
            Span::Plain(text) => Node::text(text.as_str()),
            Span::Strong(text) => Node::element(Tag::Strong, vec![Node::text(text.as_str())]),
        })
        .collect()
}

/// Format a narrative analysis as HTML.
pub fn format_narrative(text: &str) -> String {
    let nodes = render_blocks(&to_blocks(text));
    markup::render(&[Node::with_class(Tag::Div, "analysis-narrative", nodes)])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(stages: &[Stage], text: &str) -> Vec<TaggedLine> {
        stages
            .iter()
            .fold(tag_lines(text), |lines, stage| apply_stage(*stage, lines))
    }

    #[test]
    fn test_headings_stage() {
        let lines = run(&[Stage::Headings], "### Scoring:\ntext");
        assert_eq!(lines[0].kind, LineKind::Heading(2));
        assert_eq!(lines[0].spans, vec![Span::Plain("Scoring".into())]);
        assert_eq!(lines[1].kind, LineKind::Text);
    }

    #[test]
    fn test_bold_labels_stage_splits_remainder() {
        let lines = run(&[Stage::BoldLabels], "**Strengths:** clear writing");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].kind, LineKind::Heading(3));
        assert_eq!(lines[1].spans, vec![Span::Plain("clear writing".into())]);
    }

    #[test]
    fn test_emphasis_stage() {
        let lines = run(&[Stage::Emphasis], "Knows **Rust** well");
        assert_eq!(
            lines[0].spans,
            vec![
                Span::Plain("Knows ".into()),
                Span::Strong("Rust".into()),
                Span::Plain(" well".into()),
            ]
        );
    }

    #[test]
    fn test_numbered_items_need_emphasis_first() {
        let text = "1. **Docker:** containerise services";
        let without = run(&[Stage::NumberedItems], text);
        assert_eq!(without[0].kind, LineKind::Text);

        let with = run(&[Stage::Emphasis, Stage::NumberedItems], text);
        assert_eq!(with[0].kind, LineKind::Item { ordered: true });
        assert_eq!(
            with[0].spans,
            vec![Span::Strong("Docker:".into()), Span::Plain(" containerise services".into())]
        );
    }

    #[test]
    fn test_bullet_items_stage() {
        let lines = run(&LINE_STAGES, "- plain item\n- **Bold** lead");
        assert_eq!(lines[0].kind, LineKind::Item { ordered: false });
        assert_eq!(lines[0].spans, vec![Span::Plain("plain item".into())]);
        assert_eq!(lines[1].spans[0], Span::Strong("Bold".into()));
    }

    #[test]
    fn test_headings_are_not_reprocessed_by_later_stages() {
        let lines = run(&LINE_STAGES, "### - not a bullet:");
        assert_eq!(lines[0].kind, LineKind::Heading(2));
    }

    #[test]
    fn test_group_lists_merges_adjacent_items_only() {
        let blocks = group_lists(run(&LINE_STAGES, "- a\n- b\n\n- c"));
        assert_eq!(blocks.len(), 3);
        assert!(matches!(&blocks[0], Block::List { items, .. } if items.len() == 2));
        assert_eq!(blocks[1], Block::Blank);
    }

    #[test]
    fn test_wrap_paragraphs() {
        let blocks = to_blocks("first line\nsecond line\n\n### Next:\nafter");
        assert_eq!(blocks.len(), 3);
        assert!(matches!(&blocks[0], Block::Paragraph(lines) if lines.len() == 2));
        assert!(matches!(&blocks[1], Block::Heading { level: 2, .. }));
        assert!(matches!(&blocks[2], Block::Paragraph(lines) if lines.len() == 1));
    }

    #[test]
    fn test_format_narrative_markup() {
        let html = format_narrative(
            "### Recommendations:\n**Skills to Add:**\n- Docker\n- Kubernetes\n1. **Tip:** quantify\n\nClosing **note**.",
        );
        assert_eq!(
            html,
            "<div class=\"analysis-narrative\">\n\
             <h2>Recommendations</h2>\n\
             <h3>Skills to Add</h3>\n\
             <ul>\n<li>Docker</li>\n<li>Kubernetes</li>\n</ul>\n\
             <ol>\n<li><strong>Tip:</strong> quantify</li>\n</ol>\n\
             <p>Closing <strong>note</strong>.</p>\n\
             </div>\n"
        );
    }

    #[test]
    fn test_format_is_deterministic() {
        let text = "### Summary:\n**Strengths:**\n- Rust\n\nSome *text* here";
        assert_eq!(format_narrative(text), format_narrative(text));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(format_narrative(""), "<div class=\"analysis-narrative\">\n</div>\n");
    }
}
