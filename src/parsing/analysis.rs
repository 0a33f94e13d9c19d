//! Assembling the structured analysis record from a raw LLM reply
//!
//! The reply is carved into sections in a fixed order (Skills Matching,
//! Experience Matching, Education Matching, Scoring, Recommendations, Summary)
//! and each section is mined for its labelled lists and score token. Nothing
//! here can fail: absent structure becomes an empty list, empty text or a
//! derived score.

use crate::parsing::grammar::Phrase;
use crate::parsing::lists::extract_items;
use crate::parsing::scores::{
    extract_overall_score, CategoryScore, ScoreBand, EDUCATION_MAX, EXPERIENCE_MAX, SKILLS_MAX,
};
use crate::parsing::sections::locate;
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Matched and missing items for skills or education, with the category score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchBreakdown {
    pub matching: Vec<String>,
    pub missing: Vec<String>,
    pub score: CategoryScore,
}

/// Relevant and missing experience, with the category score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceBreakdown {
    pub relevant: Vec<String>,
    pub missing: Vec<String>,
    pub score: CategoryScore,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendations {
    pub skills_to_add: Vec<String>,
    pub experience_to_highlight: Vec<String>,
    pub education_to_include: Vec<String>,
    pub formatting: Vec<String>,
}

impl Recommendations {
    pub fn is_empty(&self) -> bool {
        self.skills_to_add.is_empty()
            && self.experience_to_highlight.is_empty()
            && self.education_to_include.is_empty()
            && self.formatting.is_empty()
    }
}

/// Structured view of one analysis reply. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedAnalysis {
    /// Overall score, 0..=100
    pub overall_score: u32,
    pub skills_matching: MatchBreakdown,
    pub experience_matching: ExperienceBreakdown,
    pub education_matching: MatchBreakdown,
    pub recommendations: Recommendations,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub overall_fit: String,
}

impl ParsedAnalysis {
    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_score(self.overall_score)
    }

    /// Category scores in display order.
    pub fn category_scores(&self) -> [(&'static str, CategoryScore); 3] {
        [
            ("Skills", self.skills_matching.score),
            ("Experience", self.experience_matching.score),
            ("Education", self.education_matching.score),
        ]
    }
}

struct Topology {
    skills: Phrase,
    experience: Phrase,
    education: Phrase,
    scoring: Phrase,
    recommendations: Phrase,
    recommendations_boundary: Phrase,
    summary_boundary: Phrase,
    summary: Phrase,
    create_an: Phrase,
    paragraph_break: Phrase,

    matching_skills: Phrase,
    missing_skills: Phrase,
    relevant_experience: Phrase,
    missing_experience: Phrase,
    matching_education: Phrase,
    missing_education: Phrase,

    skills_to_add: Phrase,
    experience_to_highlight: Phrase,
    education_to_include: Phrase,
    formatting_boundary: Phrase,
    formatting_and_presentation: Phrase,

    strengths: Phrase,
    weaknesses: Phrase,
    overall_fit: Phrase,
}

static TOPOLOGY: LazyLock<Topology> = LazyLock::new(|| Topology {
    skills: Phrase::new("Skills Matching"),
    experience: Phrase::new("Experience Matching"),
    education: Phrase::new("Education Matching"),
    scoring: Phrase::new("Scoring"),
    recommendations: Phrase::new("Recommendations:"),
    // Sections before it end at the bare word, colon or not.
    recommendations_boundary: Phrase::new("Recommendations"),
    summary_boundary: Phrase::new("Summary"),
    summary: Phrase::new("Summary:"),
    create_an: Phrase::new("Create an"),
    paragraph_break: Phrase::new("\n\n"),

    matching_skills: Phrase::any_of(&["Matching Skills:", "Matching Skill:"]),
    missing_skills: Phrase::any_of(&["Missing Skills:", "Missing Skill:"]),
    relevant_experience: Phrase::new("Relevant Experience:"),
    missing_experience: Phrase::new("Missing Experience:"),
    matching_education: Phrase::new("Matching Education:"),
    missing_education: Phrase::new("Missing Education:"),

    skills_to_add: Phrase::new("Skills to Add:"),
    experience_to_highlight: Phrase::new("Experience to Highlight:"),
    education_to_include: Phrase::new("Education to Include:"),
    formatting_boundary: Phrase::new("Formatting"),
    formatting_and_presentation: Phrase::new("Formatting and Presentation:"),

    strengths: Phrase::new("Strengths:"),
    weaknesses: Phrase::new("Weaknesses:"),
    overall_fit: Phrase::new("Overall Fit:"),
});

/// Parse a raw analysis reply. Total: any input yields a fully populated record.
pub fn assemble(raw: &str) -> ParsedAnalysis {
    let text = raw.replace("\r\n", "\n");
    let t = &*TOPOLOGY;

    let overall_score = extract_overall_score(&text);
    debug!("Overall score: {}", overall_score);

    let skills = locate(&text, &t.skills, &[&t.experience, &t.education, &t.scoring]).text;
    let skills_matching = MatchBreakdown {
        matching: extract_items(skills, &t.matching_skills, &[&t.missing_skills]),
        missing: extract_items(skills, &t.missing_skills, &[&t.experience, &t.education, &t.scoring]),
        score: CategoryScore::extract(skills, SKILLS_MAX, overall_score),
    };

    let experience = locate(&text, &t.experience, &[&t.education, &t.scoring, &t.recommendations_boundary]).text;
    let experience_matching = ExperienceBreakdown {
        relevant: extract_items(experience, &t.relevant_experience, &[&t.missing_experience]),
        missing: extract_items(
            experience,
            &t.missing_experience,
            &[&t.education, &t.scoring, &t.recommendations_boundary],
        ),
        score: CategoryScore::extract(experience, EXPERIENCE_MAX, overall_score),
    };

    let education = locate(&text, &t.education, &[&t.scoring, &t.recommendations_boundary, &t.summary_boundary]).text;
    let education_matching = MatchBreakdown {
        matching: extract_items(education, &t.matching_education, &[&t.missing_education]),
        missing: extract_items(
            education,
            &t.missing_education,
            &[&t.scoring, &t.recommendations_boundary, &t.summary_boundary],
        ),
        score: CategoryScore::extract(education, EDUCATION_MAX, overall_score),
    };

    let recommendations_text = locate(&text, &t.recommendations, &[&t.summary_boundary, &t.create_an]).text;
    let recommendations = Recommendations {
        skills_to_add: extract_items(
            recommendations_text,
            &t.skills_to_add,
            &[
                &t.experience_to_highlight,
                &t.education_to_include,
                &t.formatting_boundary,
                &t.summary_boundary,
            ],
        ),
        experience_to_highlight: extract_items(
            recommendations_text,
            &t.experience_to_highlight,
            &[&t.education_to_include, &t.formatting_boundary, &t.summary_boundary],
        ),
        education_to_include: extract_items(
            recommendations_text,
            &t.education_to_include,
            &[&t.formatting_boundary, &t.summary_boundary],
        ),
        formatting: extract_items(
            recommendations_text,
            &t.formatting_and_presentation,
            &[&t.summary_boundary],
        ),
    };

    let summary = locate(&text, &t.summary, &[&t.create_an]).text;
    let strengths = extract_items(summary, &t.strengths, &[&t.weaknesses, &t.overall_fit]);
    let weaknesses = extract_items(summary, &t.weaknesses, &[&t.overall_fit]);
    // Overall Fit is one paragraph; trailing prose after a blank line is not part of it.
    let overall_fit = clean_free_text(locate(summary, &t.overall_fit, &[&t.create_an, &t.paragraph_break]).text);

    ParsedAnalysis {
        overall_score,
        skills_matching,
        experience_matching,
        education_matching,
        recommendations,
        strengths,
        weaknesses,
        overall_fit,
    }
}

/// Trim a free-text span, dropping bold markers left over from its label.
fn clean_free_text(span: &str) -> String {
    span.trim().trim_start_matches('*').trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::scores::ScoreSource;

    const FULL_REPLY: &str = r#"### Extracted Information:
**Resume:** Jane Doe, Software Engineer

### Matching Analysis:
**Skills Matching:**
**Matching Skills:**
- React
- TypeScript
**Missing Skills:**
- Docker
- Kubernetes orchestration for
  production workloads

**Experience Matching:**
**Relevant Experience:**
- 4 years building SPAs
**Missing Experience:**
- Team leadership

**Education Matching:**
**Matching Education:**
- BSc Computer Science
**Missing Education:**
- None

### Scoring:
- Skills Matching: 28/40
- Experience Matching: 20/30
- Education Matching: 18/20
Total Score: 74/100

### Recommendations:
**Skills to Add:**
- Docker
**Experience to Highlight:**
- Mentoring juniors
**Education to Include:**
- AWS certification
**Formatting and Presentation:**
1. Use consistent dates
2. Quantify results

### Summary:
**Strengths:**
- Strong frontend skills
**Weaknesses:**
- No DevOps exposure
**Overall Fit:** A good fit for the role with some gaps.

### Create an Improved Resume:
**Jane Doe**
"#;

    #[test]
    fn test_assemble_full_reply() {
        let analysis = assemble(FULL_REPLY);

        assert_eq!(analysis.overall_score, 74);
        assert_eq!(analysis.skills_matching.matching, vec!["React", "TypeScript"]);
        assert_eq!(
            analysis.skills_matching.missing,
            vec!["Docker", "Kubernetes orchestration for production workloads"]
        );
        assert_eq!(analysis.experience_matching.relevant, vec!["4 years building SPAs"]);
        assert_eq!(analysis.experience_matching.missing, vec!["Team leadership"]);
        assert_eq!(analysis.education_matching.matching, vec!["BSc Computer Science"]);
        assert_eq!(analysis.education_matching.missing, vec!["None"]);

        assert_eq!(analysis.recommendations.skills_to_add, vec!["Docker"]);
        assert_eq!(analysis.recommendations.experience_to_highlight, vec!["Mentoring juniors"]);
        assert_eq!(analysis.recommendations.education_to_include, vec!["AWS certification"]);
        assert_eq!(
            analysis.recommendations.formatting,
            vec!["Use consistent dates", "Quantify results"]
        );

        assert_eq!(analysis.strengths, vec!["Strong frontend skills"]);
        assert_eq!(analysis.weaknesses, vec!["No DevOps exposure"]);
        assert_eq!(analysis.overall_fit, "A good fit for the role with some gaps.");
    }

    #[test]
    fn test_category_scores_derived_when_sections_lack_tokens() {
        let analysis = assemble(FULL_REPLY);
        // The N/max tokens live under Scoring, outside the matching sections.
        assert_eq!(analysis.skills_matching.score.source, ScoreSource::Derived);
        assert_eq!(analysis.skills_matching.score.value, 30);
        assert_eq!(analysis.experience_matching.score.value, 22);
        assert_eq!(analysis.education_matching.score.value, 15);
    }

    #[test]
    fn test_category_score_reported_inside_section() {
        let reply = "Skills Matching (32/40)\nMatching Skills:\n- Go\nExperience Matching\nTotal Score: 50/100";
        let analysis = assemble(reply);
        assert_eq!(analysis.skills_matching.score.value, 32);
        assert_eq!(analysis.skills_matching.score.source, ScoreSource::Reported);
        assert_eq!(analysis.experience_matching.score.value, 15);
    }

    #[test]
    fn test_empty_and_unrelated_input() {
        for input in ["", "The weather is nice today.", "###\n**\n- \n1."] {
            let analysis = assemble(input);
            assert_eq!(analysis.overall_score, 0);
            assert!(analysis.skills_matching.matching.is_empty());
            assert!(analysis.recommendations.is_empty());
            assert!(analysis.strengths.is_empty());
            assert_eq!(analysis.overall_fit, "");
            assert_eq!(analysis.skills_matching.score.value, 0);
        }
    }

    #[test]
    fn test_only_scoring_section() {
        let analysis = assemble("### Scoring:\nTotal Score: 73/100\n");
        assert_eq!(analysis.overall_score, 73);
        assert!(analysis.skills_matching.matching.is_empty());
        assert!(analysis.skills_matching.missing.is_empty());
        assert!(analysis.experience_matching.relevant.is_empty());
        assert!(analysis.education_matching.matching.is_empty());
        assert!(analysis.recommendations.is_empty());
        assert_eq!(analysis.skills_matching.score.value, 29);
        assert_eq!(analysis.experience_matching.score.value, 22);
        assert_eq!(analysis.education_matching.score.value, 15);
    }

    #[test]
    fn test_crlf_line_endings() {
        let analysis = assemble("Summary:\r\nStrengths:\r\n- Clear writing\r\nOverall Fit: Solid\r\n\r\nlater");
        assert_eq!(analysis.strengths, vec!["Clear writing"]);
        assert_eq!(analysis.overall_fit, "Solid");
    }

    #[test]
    fn test_recommendations_heading_without_colon_ends_matching_sections() {
        let reply = "Experience Matching\nRelevant Experience:\n- A\nMissing Experience:\n- B\n\n\
            ### Recommendations\n**Skills to Add:**\n- Docker\n";
        let analysis = assemble(reply);
        assert_eq!(analysis.experience_matching.relevant, vec!["A"]);
        assert_eq!(analysis.experience_matching.missing, vec!["B"]);

        let reply = "Education Matching\nMissing Education:\n- MSc\n### Recommendations\n- Take a course\n";
        assert_eq!(assemble(reply).education_matching.missing, vec!["MSc"]);
    }

    #[test]
    fn test_overall_fit_stops_at_blank_line() {
        let analysis = assemble("Summary:\nOverall Fit: Good match\nfor the team.\n\nThanks for reading.");
        assert_eq!(analysis.overall_fit, "Good match\nfor the team.");
    }

    #[test]
    fn test_band() {
        assert_eq!(assemble("Total Score: 85/100").band(), ScoreBand::Excellent);
    }
}
