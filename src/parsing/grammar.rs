//! Named grammar rules for recognising structure in free-form LLM replies
//!
//! Every pattern the parser and the formatters rely on lives here so each rule
//! can be tested on its own. All regexes are compiled by the `regex` crate,
//! which guarantees linear-time matching on arbitrary input.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// `### Heading:` line, capturing the heading text without the colon.
pub static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*###\s+(.+?):?\s*$").expect("Invalid heading regex"));

/// A line that opens a new labelled block, e.g. `Missing Skills:`.
pub static LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][^:]*:").expect("Invalid label regex"));

/// Bullet markers: `-`, `•`, `*` followed by whitespace.
pub static BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-•*]\s+").expect("Invalid bullet regex"));

/// Ordinal markers: `12.` followed by whitespace.
pub static NUMBERED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s+").expect("Invalid numbered regex"));

/// `**bold**` run anywhere in a line.
pub static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*\n]+?)\*\*").expect("Invalid bold regex"));

/// Line opening with a bold label such as `**Skills:**`, capturing the label and the rest.
pub static BOLD_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\*\*([^*\n]+?):\s*\*\*\s*(.*)$").expect("Invalid bold label regex")
});

/// A heading cut short by a section boundary, e.g. `###` or `### 5.`.
pub static CUT_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#+(?:\s+\d+\.)?\s*$").expect("Invalid cut heading regex"));

/// Dash bullet used by the formatters, capturing the indentation and the item text.
pub static DASH_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)-\s+(.*)$").expect("Invalid dash item regex"));

/// Line that is nothing but a bold run, e.g. `**Senior Engineer**`.
pub static BOLD_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*\*([^*\n]+?)\*\*$").expect("Invalid bold-only regex"));

/// `- **Company** dates` row inside an experience entry.
pub static COMPANY_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-\s+\*\*([^*\n]+?)\*\*\s*(.*)$").expect("Invalid company row regex")
});

/// Line opening an improved resume, e.g. `**Improved Resume:**`, capturing what follows the label.
pub static IMPROVED_RESUME_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t#*]*Improved Resume:[ \t*]*").expect("Invalid improved resume regex")
});

/// Overall score tokens, tried in this order.
pub static TOTAL_SCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Total Score:\s*(\d+)/100").expect("Invalid total score regex"));
pub static LABELLED_SCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Score:\s*(\d+)/100").expect("Invalid score regex"));
pub static BARE_SCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)/100").expect("Invalid bare score regex"));

/// `N/40`, `N/30` and `N/20` tokens of the three score categories.
pub static SKILLS_SCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)/40").expect("Invalid skills score regex"));
pub static EXPERIENCE_SCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)/30").expect("Invalid experience score regex"));
pub static EDUCATION_SCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)/20").expect("Invalid education score regex"));

/// The `N/<max>` token rule for a category maximum.
///
/// The three category maxima share compiled rules; any other maximum is
/// compiled on demand.
pub fn category_score_rule(max: u32) -> Cow<'static, Regex> {
    match max {
        40 => Cow::Borrowed(&*SKILLS_SCORE),
        30 => Cow::Borrowed(&*EXPERIENCE_SCORE),
        20 => Cow::Borrowed(&*EDUCATION_SCORE),
        // A decimal integer is always a valid regex literal.
        _ => Cow::Owned(Regex::new(&format!(r"(\d+)/{}", max)).expect("Invalid category score regex")),
    }
}

/// Parse a run of ASCII digits, saturating instead of overflowing.
pub fn parse_digits(digits: &str) -> u32 {
    digits
        .bytes()
        .filter(u8::is_ascii_digit)
        .fold(0u32, |acc, b| acc.saturating_mul(10).saturating_add(u32::from(b - b'0')))
}

/// A case-insensitive literal phrase with optional alternatives.
///
/// Headings and labels are plain words, so they are matched literally rather
/// than as regexes. When several alternatives occur, the earliest one wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phrase {
    alternatives: Vec<String>,
}

impl Phrase {
    pub fn new(text: &str) -> Self {
        Self::any_of(&[text])
    }

    pub fn any_of(alternatives: &[&str]) -> Self {
        Self {
            alternatives: alternatives
                .iter()
                .filter(|a| !a.is_empty())
                .map(|a| a.to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }

    /// Byte range of the earliest occurrence of any alternative.
    ///
    /// On a tie the longer alternative wins, so `Skills:` beats `Skill`.
    pub fn find(&self, haystack: &str) -> Option<(usize, usize)> {
        // ASCII lowercasing keeps byte offsets identical to the original.
        let lowered = haystack.to_ascii_lowercase();
        self.alternatives
            .iter()
            .filter_map(|alt| lowered.find(alt.as_str()).map(|start| (start, start + alt.len())))
            .min_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)))
    }

    /// Earliest occurrence among several phrases.
    pub fn find_first(phrases: &[&Phrase], haystack: &str) -> Option<(usize, usize)> {
        phrases
            .iter()
            .filter_map(|p| p.find(haystack))
            .min_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_rule() {
        let caps = HEADING.captures("### Matching Analysis:").unwrap();
        assert_eq!(&caps[1], "Matching Analysis");
        assert!(HEADING.is_match("  ### Summary"));
        assert!(!HEADING.is_match("## Summary"));
        assert!(!HEADING.is_match("Summary:"));
    }

    #[test]
    fn test_label_rule() {
        assert!(LABEL.is_match("Missing Skills:"));
        assert!(LABEL.is_match("Overall Fit: strong"));
        assert!(!LABEL.is_match("teams of 5"));
        assert!(!LABEL.is_match("missing skills:"));
        assert!(!LABEL.is_match("Worked with AWS"));
    }

    #[test]
    fn test_bullet_and_numbered_rules() {
        assert!(BULLET.is_match("- React"));
        assert!(BULLET.is_match("• React"));
        assert!(BULLET.is_match("* React"));
        assert!(!BULLET.is_match("-React"));
        assert!(!BULLET.is_match("**Bold**"));
        assert!(NUMBERED.is_match("12. Docker"));
        assert!(!NUMBERED.is_match("3.5 GPA"));
    }

    #[test]
    fn test_bold_rules() {
        let runs: Vec<_> = BOLD
            .captures_iter("**React** and **Node.js**")
            .map(|c| c[1].to_string())
            .collect();
        assert_eq!(runs, vec!["React", "Node.js"]);

        let caps = BOLD_LABEL.captures("**Skills to Add:** Docker").unwrap();
        assert_eq!(&caps[1], "Skills to Add");
        assert_eq!(&caps[2], "Docker");
        assert!(!BOLD_LABEL.is_match("**Acme Corp** (2020)"));

    }

    #[test]
    fn test_cut_heading_rule() {
        assert!(CUT_HEADING.is_match("###"));
        assert!(CUT_HEADING.is_match("### 5."));
        assert!(CUT_HEADING.is_match("## "));
        assert!(!CUT_HEADING.is_match("#1 in the cohort"));
        assert!(!CUT_HEADING.is_match("#rust"));
        assert!(!CUT_HEADING.is_match("### Summary"));
    }

    #[test]
    fn test_resume_line_rules() {
        assert!(BOLD_ONLY.is_match("**Senior Engineer**"));
        assert!(!BOLD_ONLY.is_match("**Senior Engineer** at Acme"));

        let caps = COMPANY_ROW.captures("- **Acme Corp** (2020-2022)").unwrap();
        assert_eq!(&caps[1], "Acme Corp");
        assert_eq!(&caps[2], "(2020-2022)");

        let caps = DASH_ITEM.captures("  - Built X").unwrap();
        assert_eq!(&caps[1], "  ");
        assert_eq!(&caps[2], "Built X");
    }

    #[test]
    fn test_improved_resume_label_rule() {
        assert!(IMPROVED_RESUME_LABEL.is_match("intro\n**Improved Resume:**\nJane"));
        assert!(IMPROVED_RESUME_LABEL.is_match("## improved resume:"));
        assert!(!IMPROVED_RESUME_LABEL.is_match("see the Improved Resume: below"));
    }

    #[test]
    fn test_score_rules() {
        assert_eq!(&TOTAL_SCORE.captures("total score: 73/100").unwrap()[1], "73");
        assert_eq!(&LABELLED_SCORE.captures("Final Score: 64/100").unwrap()[1], "64");
        assert_eq!(&BARE_SCORE.captures("we give 55/100 overall").unwrap()[1], "55");
        assert_eq!(&category_score_rule(40).captures("Skills: 32/40").unwrap()[1], "32");
        assert!(category_score_rule(30).captures("Skills: 32/40").is_none());
        assert!(matches!(category_score_rule(40), Cow::Borrowed(_)));
        assert!(matches!(category_score_rule(20), Cow::Borrowed(_)));
        assert_eq!(&category_score_rule(10).captures("Bonus: 7/10").unwrap()[1], "7");
    }

    #[test]
    fn test_parse_digits_saturates() {
        assert_eq!(parse_digits("073"), 73);
        assert_eq!(parse_digits("99999999999999"), u32::MAX);
    }

    #[test]
    fn test_phrase_matching() {
        let phrase = Phrase::new("Skills Matching");
        assert_eq!(phrase.find("intro\n**SKILLS MATCHING:**"), Some((8, 23)));
        assert_eq!(phrase.find("nothing here"), None);

        let either = Phrase::any_of(&["Scoring", "Experience Matching"]);
        let text = "Experience Matching then Scoring";
        assert_eq!(either.find(text), Some((0, 19)));

        let plural = Phrase::any_of(&["Missing Skill:", "Missing Skills:"]);
        assert_eq!(plural.find("Missing Skills: x"), Some((0, 15)));

        assert!(Phrase::any_of(&[""]).is_empty());
        assert_eq!(Phrase::any_of(&[""]).find("anything"), None);
    }

    #[test]
    fn test_phrase_offsets_survive_unicode() {
        let phrase = Phrase::new("summary:");
        let text = "Résumé • Summary: good";
        let (start, end) = phrase.find(text).unwrap();
        assert_eq!(&text[start..end], "Summary:");
    }
}
