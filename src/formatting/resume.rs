//! Resume-shaped formatting for the rewritten resume

use crate::formatting::markup::{self, Node, Tag};
use crate::parsing::grammar::{BOLD, BOLD_LABEL, BOLD_ONLY, BULLET, COMPANY_ROW, DASH_ITEM, IMPROVED_RESUME_LABEL};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeDocument {
    pub blocks: Vec<ResumeBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResumeBlock {
    Section {
        title: String,
        kind: SectionKind,
        blocks: Vec<ResumeBlock>,
    },
    Entry(Entry),
    List(Vec<String>),
    Paragraph(Vec<String>),
}

/// Recognised resume sections, used for styling hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionKind {
    Contact,
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
    Other,
}

impl SectionKind {
    pub fn from_title(title: &str) -> Self {
        let title = title.to_lowercase();
        if title.contains("contact") {
            SectionKind::Contact
        } else if title.contains("summary") || title.contains("objective") || title.contains("profile") {
            SectionKind::Summary
        } else if title.contains("experience") || title.contains("employment") {
            SectionKind::Experience
        } else if title.contains("education") {
            SectionKind::Education
        } else if title.contains("skill") {
            SectionKind::Skills
        } else if title.contains("project") {
            SectionKind::Projects
        } else if title.contains("certification") || title.contains("training") {
            SectionKind::Certifications
        } else {
            SectionKind::Other
        }
    }

    fn css_class(&self) -> &'static str {
        match self {
            SectionKind::Contact => "section-contact",
            SectionKind::Summary => "section-summary",
            SectionKind::Experience => "section-experience",
            SectionKind::Education => "section-education",
            SectionKind::Skills => "section-skills",
            SectionKind::Projects => "section-projects",
            SectionKind::Certifications => "section-certifications",
            SectionKind::Other => "section-other",
        }
    }
}

/// An experience or project entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub parts: Vec<EntryPart>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryPart {
    Title(String),
    CompanyRow { company: String, dates: String },
    Bullets(Vec<Bullet>),
    /// Indented bullets with no top-level bullet to hang from.
    NestedBullets(Vec<String>),
    Paragraph(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bullet {
    pub text: String,
    pub children: Vec<String>,
}

impl Entry {
    pub fn titles(&self) -> Vec<&str> {
        self.parts
            .iter()
            .filter_map(|part| match part {
                EntryPart::Title(title) => Some(title.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn company_rows(&self) -> Vec<(&str, &str)> {
        self.parts
            .iter()
            .filter_map(|part| match part {
                EntryPart::CompanyRow { company, dates } => Some((company.as_str(), dates.as_str())),
                _ => None,
            })
            .collect()
    }

    /// Every indented bullet, whether or not it hangs from a parent.
    pub fn nested_bullets(&self) -> Vec<&str> {
        let mut nested = Vec::new();
        for part in &self.parts {
            match part {
                EntryPart::NestedBullets(items) => nested.extend(items.iter().map(String::as_str)),
                EntryPart::Bullets(bullets) => {
                    for bullet in bullets {
                        nested.extend(bullet.children.iter().map(String::as_str));
                    }
                }
                _ => {}
            }
        }
        nested
    }

    fn push_nested(&mut self, text: String) {
        match self.parts.last_mut() {
            Some(EntryPart::Bullets(bullets)) if !bullets.is_empty() => {
                if let Some(parent) = bullets.last_mut() {
                    parent.children.push(text);
                }
            }
            Some(EntryPart::NestedBullets(items)) => items.push(text),
            _ => self.parts.push(EntryPart::NestedBullets(vec![text])),
        }
    }

    fn push_bullet(&mut self, text: String) {
        let bullet = Bullet { text, children: Vec::new() };
        if let Some(EntryPart::Bullets(bullets)) = self.parts.last_mut() {
            bullets.push(bullet);
            return;
        }
        self.parts.push(EntryPart::Bullets(vec![bullet]));
    }

    fn push_text(&mut self, text: String) {
        if let Some(EntryPart::Paragraph(lines)) = self.parts.last_mut() {
            lines.push(text);
            return;
        }
        self.parts.push(EntryPart::Paragraph(vec![text]));
    }
}

impl ResumeDocument {
    /// All sections in document order.
    pub fn sections(&self) -> Vec<(&str, &[ResumeBlock])> {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                ResumeBlock::Section { title, blocks, .. } => Some((title.as_str(), blocks.as_slice())),
                _ => None,
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Parse the rewritten resume into a document tree.
///
/// Blank lines separate blocks. A block opening with `**Section:**` starts a
/// section that stays open until the next one; other blocks render as
/// entries or paragraphs, inside the open section if there is one.
pub fn parse_resume(text: &str) -> ResumeDocument {
    let normalized = text.replace("\r\n", "\n");
    let body = strip_leading_label(&normalized);

    let mut blocks = Vec::new();
    let mut open: Option<(String, Vec<ResumeBlock>)> = None;

    for chunk in split_blocks(body) {
        let (first, rest) = chunk.split_first().map_or(("", &[][..]), |(f, r)| (*f, r));

        if let Some(caps) = BOLD_LABEL.captures(first) {
            if let Some(section) = open.take() {
                blocks.push(close_section(section));
            }
            let mut lines: Vec<&str> = Vec::with_capacity(chunk.len());
            if let Some(inline) = caps.get(2).filter(|m| !m.as_str().trim().is_empty()) {
                lines.push(inline.as_str());
            }
            lines.extend_from_slice(rest);
            open = Some((caps[1].trim().to_string(), section_body(&lines)));
            continue;
        }

        match open.as_mut() {
            // Blocks after a section label belong to it; a blank line inside a
            // section must not demote its entries to a flat paragraph.
            Some((_, section_blocks)) => section_blocks.extend(section_body(&chunk)),
            None if looks_like_entry(&chunk) => blocks.push(ResumeBlock::Entry(parse_entry(&chunk))),
            None => blocks.push(ResumeBlock::Paragraph(
                chunk.iter().map(|line| line.trim().to_string()).collect(),
            )),
        }
    }

    if let Some(section) = open.take() {
        blocks.push(close_section(section));
    }

    ResumeDocument { blocks }
}

fn close_section((title, blocks): (String, Vec<ResumeBlock>)) -> ResumeBlock {
    ResumeBlock::Section {
        kind: SectionKind::from_title(&title),
        title,
        blocks,
    }
}

fn strip_leading_label(text: &str) -> &str {
    let trimmed = text.trim_start();
    match IMPROVED_RESUME_LABEL.find(trimmed) {
        Some(m) if m.start() == 0 => &trimmed[m.end()..],
        _ => trimmed,
    }
}

/// Non-empty runs of lines separated by blank lines.
fn split_blocks(text: &str) -> Vec<Vec<&str>> {
    let mut chunks = Vec::new();
    let mut current = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Bold text plus a parenthesis or a technologies line marks an entry.
fn looks_like_entry(lines: &[&str]) -> bool {
    let has_bold = lines.iter().any(|line| BOLD.is_match(line));
    let has_marker = lines
        .iter()
        .any(|line| line.contains('(') || line.contains("Technologies"));
    has_bold && has_marker
}

fn section_body(lines: &[&str]) -> Vec<ResumeBlock> {
    if looks_like_entry(lines) {
        return vec![ResumeBlock::Entry(parse_entry(lines))];
    }

    let mut blocks = Vec::new();
    for line in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(marker) = BULLET.find(trimmed) {
            let item = trimmed[marker.end()..].trim().to_string();
            if let Some(ResumeBlock::List(items)) = blocks.last_mut() {
                items.push(item);
                continue;
            }
            blocks.push(ResumeBlock::List(vec![item]));
        } else {
            if let Some(ResumeBlock::Paragraph(text)) = blocks.last_mut() {
                text.push(trimmed.to_string());
                continue;
            }
            blocks.push(ResumeBlock::Paragraph(vec![trimmed.to_string()]));
        }
    }
    blocks
}

fn parse_entry(lines: &[&str]) -> Entry {
    let mut entry = Entry::default();

    for line in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let dash = DASH_ITEM.captures(line);
        let indented = dash.as_ref().is_some_and(|caps| !caps[1].is_empty());

        if let Some(caps) = BOLD_ONLY.captures(trimmed) {
            entry.parts.push(EntryPart::Title(caps[1].trim().to_string()));
        } else if let Some(caps) = COMPANY_ROW.captures(trimmed).filter(|_| !indented) {
            entry.parts.push(EntryPart::CompanyRow {
                company: caps[1].trim().to_string(),
                dates: clean_dates(&caps[2]),
            });
        } else if let Some(caps) = dash {
            let text = caps[2].trim().to_string();
            if indented {
                entry.push_nested(text);
            } else {
                entry.push_bullet(text);
            }
        } else {
            entry.push_text(trimmed.to_string());
        }
    }

    entry
}

fn clean_dates(raw: &str) -> String {
    raw.trim_start_matches(|c: char| matches!(c, '|' | '—' | '–' | '-' | ',' | ':') || c.is_whitespace())
        .trim()
        .to_string()
}

pub fn render_document(document: &ResumeDocument) -> Vec<Node> {
    document.blocks.iter().map(render_block).collect()
}

fn render_block(block: &ResumeBlock) -> Node {
    match block {
        ResumeBlock::Section { title, kind, blocks } => {
            let mut children = vec![Node::element(Tag::H3, vec![Node::text(title.as_str())])];
            children.extend(blocks.iter().map(render_block));
            Node::with_class(Tag::Section, format!("resume-section {}", kind.css_class()), children)
        }
        ResumeBlock::Entry(entry) => render_entry(entry),
        ResumeBlock::List(items) => Node::element(
            Tag::Ul,
            items
                .iter()
                .map(|item| Node::element(Tag::Li, markup::inline(item)))
                .collect(),
        ),
        ResumeBlock::Paragraph(lines) => {
            Node::element(Tag::P, markup::lines_with_breaks(lines.iter().map(String::as_str)))
        }
    }
}

fn render_entry(entry: &Entry) -> Node {
    let children = entry
        .parts
        .iter()
        .map(|part| match part {
            EntryPart::Title(title) => Node::with_class(Tag::H4, "entry-title", vec![Node::text(title.as_str())]),
            EntryPart::CompanyRow { company, dates } => Node::with_class(
                Tag::Div,
                "entry-meta",
                vec![
                    Node::with_class(Tag::Span, "entry-company", vec![Node::text(company.as_str())]),
                    Node::with_class(Tag::Span, "entry-dates", vec![Node::text(dates.as_str())]),
                ],
            ),
            EntryPart::Bullets(bullets) => Node::element(
                Tag::Ul,
                bullets
                    .iter()
                    .map(|bullet| {
                        let mut children = markup::inline(&bullet.text);
                        if !bullet.children.is_empty() {
                            children.push(nested_list(&bullet.children));
                        }
                        Node::element(Tag::Li, children)
                    })
                    .collect(),
            ),
            EntryPart::NestedBullets(items) => nested_list(items),
            EntryPart::Paragraph(lines) => {
                Node::element(Tag::P, markup::lines_with_breaks(lines.iter().map(String::as_str)))
            }
        })
        .collect();

    Node::with_class(Tag::Div, "resume-entry", children)
}

fn nested_list(items: &[String]) -> Node {
    Node::with_class(
        Tag::Ul,
        "nested",
        items
            .iter()
            .map(|item| Node::element(Tag::Li, markup::inline(item)))
            .collect(),
    )
}

/// Format the rewritten resume as HTML.
pub fn format_resume(resume_text: &str) -> String {
    let document = parse_resume(resume_text);
    markup::render(&[Node::with_class(Tag::Div, "improved-resume", render_document(&document))])
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORK: &str = "**Work Experience:**\n- **Acme Corp** (2020-2022)\n  - Built X\n  - Built Y";

    fn only_entry(blocks: &[ResumeBlock]) -> &Entry {
        match blocks {
            [ResumeBlock::Entry(entry)] => entry,
            other => panic!("expected a single entry, got {:?}", other),
        }
    }

    #[test]
    fn test_work_experience_entry() {
        let document = parse_resume(WORK);
        let sections = document.sections();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].0, "Work Experience");

        let entry = only_entry(sections[0].1);
        assert_eq!(entry.company_rows(), vec![("Acme Corp", "(2020-2022)")]);
        assert_eq!(entry.nested_bullets(), vec!["Built X", "Built Y"]);
    }

    #[test]
    fn test_work_experience_markup() {
        let html = format_resume(WORK);
        assert!(html.contains("<section class=\"resume-section section-experience\">"));
        assert!(html.contains("<h3>Work Experience</h3>"));
        assert!(html.contains(
            "<div class=\"entry-meta\">\n<span class=\"entry-company\">Acme Corp</span><span class=\"entry-dates\">(2020-2022)</span></div>"
        ));
        assert!(html.contains("<ul class=\"nested\">\n<li>Built X</li>\n<li>Built Y</li>\n</ul>"));
    }

    #[test]
    fn test_strips_improved_resume_label() {
        let document = parse_resume("**Improved Resume:**\n\n**Skills:** Rust, Go");
        let sections = document.sections();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].0, "Skills");
        assert_eq!(sections[0].1, &[ResumeBlock::Paragraph(vec!["Rust, Go".into()])]);
    }

    #[test]
    fn test_mixed_list_and_paragraph_section() {
        let document = parse_resume("**Skills:**\nLanguages\n- Rust\n- Go\nAlso fluent in Spanish");
        let (_, blocks) = document.sections()[0];
        assert_eq!(
            blocks,
            &[
                ResumeBlock::Paragraph(vec!["Languages".into()]),
                ResumeBlock::List(vec!["Rust".into(), "Go".into()]),
                ResumeBlock::Paragraph(vec!["Also fluent in Spanish".into()]),
            ]
        );
    }

    #[test]
    fn test_section_stays_open_across_blocks() {
        let text = "**Jane Doe**\njane@example.com\n\n\
            **Projects:**\n**Resume Parser**\n- Technologies: Rust, regex\n\n\
            **Chat Bot**\n- Built with (Python)\n  - Deployed on AWS\n\n\
            **Education:**\nBSc Computer Science";
        let document = parse_resume(text);

        assert!(matches!(&document.blocks[0], ResumeBlock::Paragraph(lines) if lines.len() == 2));
        let sections = document.sections();
        assert_eq!(sections.len(), 2);

        let (title, blocks) = sections[0];
        assert_eq!(title, "Projects");
        assert_eq!(blocks.len(), 2);
        let ResumeBlock::Entry(second) = &blocks[1] else {
            panic!("expected entry");
        };
        assert_eq!(second.titles(), vec!["Chat Bot"]);
        assert_eq!(second.nested_bullets(), vec!["Deployed on AWS"]);
    }

    #[test]
    fn test_nested_bullets_hang_from_parent() {
        let entry = parse_entry(&["**Engineer**", "- **Beta Ltd** | Jan 2019 - Present", "- Led team", "  - Hired 3", "Notes here"]);
        assert_eq!(entry.titles(), vec!["Engineer"]);
        assert_eq!(entry.company_rows(), vec![("Beta Ltd", "Jan 2019 - Present")]);
        assert_eq!(
            entry.parts[2],
            EntryPart::Bullets(vec![Bullet {
                text: "Led team".into(),
                children: vec!["Hired 3".into()],
            }])
        );
        assert_eq!(entry.parts[3], EntryPart::Paragraph(vec!["Notes here".into()]));
    }

    #[test]
    fn test_plain_block_keeps_line_breaks() {
        let html = format_resume("Jane Doe\n<jane@example.com>");
        assert_eq!(
            html,
            "<div class=\"improved-resume\">\n<p>Jane Doe<br>&lt;jane@example.com&gt;</p>\n</div>\n"
        );
    }

    #[test]
    fn test_empty_resume() {
        assert!(parse_resume("").is_empty());
        assert!(parse_resume("Improved Resume:   \n").is_empty());
    }

    #[test]
    fn test_section_kinds() {
        assert_eq!(SectionKind::from_title("Contact Information"), SectionKind::Contact);
        assert_eq!(SectionKind::from_title("Professional Summary"), SectionKind::Summary);
        assert_eq!(SectionKind::from_title("Technical Skills"), SectionKind::Skills);
        assert_eq!(SectionKind::from_title("Volunteer Work"), SectionKind::Other);
    }
}
