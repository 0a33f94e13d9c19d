//! Section extraction: bounding named regions of a raw LLM reply

use crate::parsing::grammar::Phrase;
use log::debug;

/// A region of the raw text following a heading phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSpan<'a> {
    /// Byte offset just past the heading phrase.
    pub start: usize,
    /// Byte offset of the terminating heading, or the end of the text.
    pub end: usize,
    pub text: &'a str,
}

impl<'a> SectionSpan<'a> {
    pub fn empty() -> Self {
        Self { start: 0, end: 0, text: "" }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Locate the span after the first occurrence of `heading`, up to the earliest
/// occurrence of any terminator (or the end of the text).
///
/// A missing heading yields an empty span. The first occurrence always wins,
/// even when the phrase is echoed earlier in unrelated prose.
pub fn locate<'a>(text: &'a str, heading: &Phrase, terminators: &[&Phrase]) -> SectionSpan<'a> {
    let Some((_, start)) = heading.find(text) else {
        debug!("Section {:?} not found", heading);
        return SectionSpan::empty();
    };

    let rest = &text[start..];
    let end = Phrase::find_first(terminators, rest)
        .map(|(offset, _)| start + offset)
        .unwrap_or(text.len());

    SectionSpan {
        start,
        end,
        text: &text[start..end],
    }
}

/// String-level convenience over [`locate`].
pub fn extract_section(text: &str, section_name: &str, next_section_names: &[&str]) -> String {
    let heading = Phrase::new(section_name);
    let terminators = Phrase::any_of(next_section_names);
    locate(text, &heading, &[&terminators]).text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str = "### Matching Analysis:\n\
        **Skills Matching:**\n- React\n\
        **Experience Matching:**\n- Led teams\n\
        ### Scoring:\nTotal Score: 70/100\n";

    #[test]
    fn test_extract_section_bounds() {
        let skills = extract_section(REPLY, "Skills Matching", &["Experience Matching", "Scoring"]);
        assert_eq!(skills, ":**\n- React\n**");
    }

    #[test]
    fn test_earliest_terminator_wins_regardless_of_list_order() {
        let skills = extract_section(REPLY, "Skills Matching", &["Scoring", "Experience Matching"]);
        assert!(!skills.contains("Led teams"));
    }

    #[test]
    fn test_missing_heading_is_empty() {
        assert_eq!(extract_section(REPLY, "Education Matching", &["Scoring"]), "");
        let span = locate(REPLY, &Phrase::new("Recommendations"), &[]);
        assert!(span.is_empty());
        assert_eq!(span, SectionSpan::empty());
    }

    #[test]
    fn test_runs_to_end_without_terminator() {
        let scoring = extract_section(REPLY, "scoring", &["Recommendations"]);
        assert_eq!(scoring, ":\nTotal Score: 70/100\n");
    }

    #[test]
    fn test_first_occurrence_is_used() {
        let text = "Summary: short\nmore\nSummary: second";
        let span = locate(text, &Phrase::new("Summary:"), &[&Phrase::new("more")]);
        assert_eq!(span.text, " short\n");
        assert_eq!(span.start, 8);
    }

    #[test]
    fn test_case_insensitive_heading_and_terminator() {
        let text = "SKILLS MATCHING\nx\nscoring\ny";
        assert_eq!(extract_section(text, "Skills Matching", &["Scoring"]), "\nx\n");
    }
}
