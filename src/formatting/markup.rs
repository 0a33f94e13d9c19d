//! Minimal markup tree rendered to HTML

use crate::parsing::grammar::BOLD;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Div,
    Section,
    H2,
    H3,
    H4,
    P,
    Ul,
    Ol,
    Li,
    Strong,
    Span,
}

impl Tag {
    fn name(&self) -> &'static str {
        match self {
            Tag::Div => "div",
            Tag::Section => "section",
            Tag::H2 => "h2",
            Tag::H3 => "h3",
            Tag::H4 => "h4",
            Tag::P => "p",
            Tag::Ul => "ul",
            Tag::Ol => "ol",
            Tag::Li => "li",
            Tag::Strong => "strong",
            Tag::Span => "span",
        }
    }

    /// Containers whose children start on their own line.
    fn is_container(&self) -> bool {
        matches!(self, Tag::Div | Tag::Section | Tag::Ul | Tag::Ol)
    }

    fn is_inline(&self) -> bool {
        matches!(self, Tag::Strong | Tag::Span)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element {
        tag: Tag,
        class: Option<String>,
        children: Vec<Node>,
    },
    Text(String),
    LineBreak,
}

impl Node {
    pub fn element(tag: Tag, children: Vec<Node>) -> Self {
        Node::Element { tag, class: None, children }
    }

    pub fn with_class(tag: Tag, class: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Element {
            tag,
            class: Some(class.into()),
            children,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    /// Concatenated text of this node and its descendants.
    pub fn text_content(&self) -> String {
        match self {
            Node::Element { children, .. } => children.iter().map(Node::text_content).collect(),
            Node::Text(text) => text.clone(),
            Node::LineBreak => "\n".to_string(),
        }
    }

    pub fn render_into(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(&escape_html(text)),
            Node::LineBreak => out.push_str("<br>"),
            Node::Element { tag, class, children } => {
                out.push('<');
                out.push_str(tag.name());
                if let Some(class) = class {
                    out.push_str(" class=\"");
                    out.push_str(&escape_html(class));
                    out.push('"');
                }
                out.push('>');
                if tag.is_container() {
                    out.push('\n');
                }
                for child in children {
                    child.render_into(out);
                }
                out.push_str("</");
                out.push_str(tag.name());
                out.push('>');
                if !tag.is_inline() {
                    out.push('\n');
                }
            }
        }
    }
}

/// Render a sequence of sibling nodes.
pub fn render(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        node.render_into(&mut out);
    }
    out
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Inline nodes for a line of text, turning `**bold**` runs into `<strong>`.
pub fn inline(text: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut last = 0;
    for caps in BOLD.captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            nodes.push(Node::text(&text[last..whole.start()]));
        }
        nodes.push(Node::element(Tag::Strong, vec![Node::text(inner.as_str())]));
        last = whole.end();
    }
    if last < text.len() {
        nodes.push(Node::text(&text[last..]));
    }
    nodes
}

/// Lines joined with explicit line breaks.
pub fn lines_with_breaks<'a>(lines: impl IntoIterator<Item = &'a str>) -> Vec<Node> {
    let mut nodes = Vec::new();
    for (i, line) in lines.into_iter().enumerate() {
        if i > 0 {
            nodes.push(Node::LineBreak);
        }
        nodes.extend(inline(line));
    }
    nodes
}
