//! The ATS analysis prompt
//!
//! The step headings and labels below are the same phrases the parser looks
//! for in the reply, so they must stay in sync with `parsing::analysis`.

use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub ats_analysis: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            ats_analysis: ATS_ANALYSIS_TEMPLATE.to_string(),
        }
    }
}

/// Parameters for prompt template substitution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptParams {
    pub resume_content: String,
    pub job_content: String,
}

impl PromptTemplates {
    pub fn render_ats_prompt(&self, params: &PromptParams) -> String {
        debug!(
            "Rendering ATS prompt (resume {} chars, job {} chars)",
            params.resume_content.len(),
            params.job_content.len()
        );

        self.ats_analysis
            .replace("{resume}", params.resume_content.trim())
            .replace("{job}", params.job_content.trim())
    }
}

const ATS_ANALYSIS_TEMPLATE: &str = r#"You are an Applicant Tracking System (ATS). Evaluate the resume below against the job description, then write an improved version of the resume. Work through these steps in order:

1. **Extract Information:**
   - **Resume:** contact information, professional summary, work experience (titles, companies, dates, achievements), education, skills, certifications, projects and any additional sections.
   - **Job Description:** job title, company, key responsibilities, required and preferred skills, education and experience requirements, certifications.

2. **Matching Analysis:**
   - **Skills Matching:**
     - Matching Skills: skills found in both the resume and the job description.
     - Missing Skills: skills the job requires that the resume lacks.
   - **Experience Matching:**
     - Relevant Experience: experience that lines up with the job's responsibilities.
     - Missing Experience: responsibilities or requirements the resume does not address.
   - **Education Matching:**
     - Matching Education: degrees and institutions that meet the requirements.
     - Missing Education: requirements the resume does not meet.

3. **Scoring:**
   - Score the match out of 100:
     - **Skills Matching (40 points)**
     - **Experience Matching (30 points)**
     - **Education Matching (20 points)**
     - **Additional Qualifications (10 points)**
   - Be strict and deduct points for every missing requirement. Report the result as `Total Score: NN/100`.

4. **Recommendations:**
   - **Skills to Add:** missing skills worth adding.
   - **Experience to Highlight:** how to surface relevant or missing experience.
   - **Education to Include:** further education or certifications to list.
   - **Formatting and Presentation:** layout and presentation tips.

5. **Summary:**
   - **Strengths:** where the resume matches best.
   - **Weaknesses:** where it falls short.
   - **Overall Fit:** an overall assessment of fit.

6. **Create an Improved Resume:**
   - Rewrite the resume using only facts the candidate provided; never invent details. Use `**Section:**` labels for Contact Information, Professional Summary, Work Experience, Education, Skills, Certifications, Projects and Additional Sections, with bullet points for achievements.

Resume:
{resume}

Job Description:
{job}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_inputs() {
        let prompt = PromptTemplates::default().render_ats_prompt(&PromptParams {
            resume_content: "  Jane Doe, Rust engineer\n".to_string(),
            job_content: "Backend role".to_string(),
        });

        assert!(prompt.contains("Resume:\nJane Doe, Rust engineer\n\nJob Description:\nBackend role\n"));
        assert!(!prompt.contains("{resume}"));
        for step in [
            "Extract Information",
            "Matching Analysis",
            "Scoring",
            "Recommendations",
            "Summary",
            "Create an Improved Resume",
        ] {
            assert!(prompt.contains(step), "missing step {}", step);
        }
    }
}
