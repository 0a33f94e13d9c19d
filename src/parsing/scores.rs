//! Score extraction: overall `N/100` and per-category `N/<max>` tokens

use crate::parsing::grammar::{category_score_rule, parse_digits, BARE_SCORE, LABELLED_SCORE, TOTAL_SCORE};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

pub const OVERALL_MAX: u32 = 100;
pub const SKILLS_MAX: u32 = 40;
pub const EXPERIENCE_MAX: u32 = 30;
pub const EDUCATION_MAX: u32 = 20;

/// Overall score from the first matching token, clamped to 0..=100; 0 if absent.
pub fn extract_overall_score(text: &str) -> u32 {
    [&*TOTAL_SCORE, &*LABELLED_SCORE, &*BARE_SCORE]
        .iter()
        .find_map(|rule| rule.captures(text))
        .map(|caps| parse_digits(&caps[1]).min(OVERALL_MAX))
        .unwrap_or(0)
}

/// Category score from an `N/<max>` token in the section, or derived from the
/// overall score when the section reports none.
pub fn extract_category_score(section_text: &str, max: u32, overall: u32) -> u32 {
    CategoryScore::extract(section_text, max, overall).value
}

/// Where a category score came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreSource {
    Reported,
    Derived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub value: u32,
    pub max: u32,
    pub source: ScoreSource,
}

impl CategoryScore {
    pub fn extract(section_text: &str, max: u32, overall: u32) -> Self {
        match category_score_rule(max).captures(section_text) {
            Some(caps) => {
                let value = parse_digits(&caps[1]);
                if value > max {
                    warn!("Category score {}/{} exceeds its maximum; keeping reported value", value, max);
                }
                Self { value, max, source: ScoreSource::Reported }
            }
            None => {
                debug!("No N/{} token found, deriving from overall score {}", max, overall);
                Self::derived(overall, max)
            }
        }
    }

    /// `round(overall * max / 100)`, halves rounding up.
    pub fn derived(overall: u32, max: u32) -> Self {
        let value = (u64::from(overall) * u64::from(max) + 50) / 100;
        Self {
            value: u32::try_from(value).unwrap_or(u32::MAX),
            max,
            source: ScoreSource::Derived,
        }
    }

    /// The model reported more points than the category allows.
    pub fn exceeds_max(&self) -> bool {
        self.value > self.max
    }

    pub fn percentage(&self) -> u32 {
        if self.max == 0 {
            return 0;
        }
        ((u64::from(self.value) * 100 + u64::from(self.max) / 2) / u64::from(self.max))
            .try_into()
            .unwrap_or(u32::MAX)
    }
}

/// Display band for an overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreBand {
    Excellent,
    Good,
    NeedsImprovement,
}

impl ScoreBand {
    pub fn from_score(score: u32) -> Self {
        match score {
            80.. => ScoreBand::Excellent,
            60..=79 => ScoreBand::Good,
            _ => ScoreBand::NeedsImprovement,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent match",
            ScoreBand::Good => "Good match",
            ScoreBand::NeedsImprovement => "Needs improvement",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            ScoreBand::Excellent => "score-excellent",
            ScoreBand::Good => "score-good",
            ScoreBand::NeedsImprovement => "score-poor",
        }
    }
}
