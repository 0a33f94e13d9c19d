//! Output formatters: console, JSON, Markdown and HTML

use crate::config::{OutputConfig, OutputFormat};
use crate::error::Result;
use crate::formatting::markup::escape_html;
use crate::output::report::AnalysisReport;
use crate::parsing::scores::{CategoryScore, ScoreBand};
use askama::Template;
use colored::{Color, Colorize};
use std::path::Path;

pub trait OutputFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Coloured terminal summary with shortened lists
pub struct ConsoleFormatter {
    use_colors: bool,
    preview_items: usize,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Standalone HTML page around the narrative and resume markup
pub struct HtmlFormatter {
    include_styles: bool,
}

pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    html_formatter: HtmlFormatter,
}

#[derive(Template)]
#[template(source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>ATS Match Report</title>
    {% if include_styles %}
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            line-height: 1.6;
            color: #333;
            max-width: 900px;
            margin: 0 auto;
            padding: 20px;
            background: #f8f9fa;
        }
        .container {
            background: white;
            padding: 30px;
            border-radius: 8px;
            box-shadow: 0 2px 10px rgba(0,0,0,0.1);
        }
        .header {
            text-align: center;
            border-bottom: 3px solid #007acc;
            padding-bottom: 20px;
        }
        .score-badge {
            display: inline-block;
            padding: 8px 16px;
            border-radius: 20px;
            font-weight: bold;
            color: white;
        }
        .score-excellent { background: #28a745; }
        .score-good { background: #ffc107; color: #000; }
        .score-poor { background: #dc3545; }
        .score-breakdown {
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
            gap: 15px;
            margin: 20px 0;
        }
        .score-item {
            background: #f8f9fa;
            padding: 15px;
            border-radius: 6px;
            border-left: 4px solid #007acc;
        }
        .score-item.over-max { border-left-color: #dc3545; }
        .section h2 {
            color: #007acc;
            border-bottom: 2px solid #e9ecef;
            padding-bottom: 10px;
        }
        .resume-entry { margin: 12px 0; }
        .entry-meta {
            display: flex;
            justify-content: space-between;
            font-weight: 600;
        }
        .entry-dates { color: #6c757d; font-weight: normal; }
        ul.nested { margin-top: 4px; }
        .metadata {
            margin-top: 30px;
            font-size: 0.9em;
            color: #6c757d;
        }
    </style>
    {% endif %}
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>ATS Match Report</h1>
            <span class="score-badge {{ score_class }}">{{ overall_score }}/100</span>
            <p>{{ score_label }}</p>
        </div>

        <div class="section">
            <h2>Score Breakdown</h2>
            <div class="score-breakdown">
                {{ scores_html | safe }}
            </div>
        </div>

        <div class="section">
            <h2>Analysis</h2>
            {{ narrative_html | safe }}
        </div>

        {% if has_improved_resume %}
        <div class="section">
            <h2>Improved Resume</h2>
            {{ resume_html | safe }}
        </div>
        {% endif %}

        <div class="metadata">
            <p>Generated by ats-match v{{ version }} on {{ generated_at }}</p>
            {% if has_model %}<p>Model: {{ model }}</p>{% endif %}
            {% if has_resume_file %}<p>Resume: {{ resume_file }}</p>{% endif %}
        </div>
    </div>
</body>
</html>"#, ext = "html")]
struct HtmlTemplate {
    include_styles: bool,
    overall_score: u32,
    score_class: String,
    score_label: String,
    scores_html: String,
    narrative_html: String,
    has_improved_resume: bool,
    resume_html: String,
    version: String,
    generated_at: String,
    has_model: bool,
    model: String,
    has_resume_file: bool,
    resume_file: String,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, preview_items: usize) -> Self {
        Self {
            use_colors,
            preview_items: preview_items.max(1),
        }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let (prefix, color) = match level {
            1 => ("█", Color::Blue),
            _ => ("▓", Color::Green),
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn band_color(band: ScoreBand) -> Color {
        match band {
            ScoreBand::Excellent => Color::Green,
            ScoreBand::Good => Color::Yellow,
            ScoreBand::NeedsImprovement => Color::Red,
        }
    }

    fn format_score_line(&self, label: &str, score: &CategoryScore) -> String {
        let mut line = format!("  {:<12} {:>3}/{:<3} ({}%)", label, score.value, score.max, score.percentage());
        if score.exceeds_max() {
            line.push(' ');
            line.push_str(&self.colorize("[exceeds maximum]", Color::Red));
        }
        line.push('\n');
        line
    }

    /// `label: a, b, c +N more`, or nothing for an empty list.
    fn format_preview(&self, label: &str, items: &[String]) -> String {
        if items.is_empty() {
            return String::new();
        }
        let shown = items
            .iter()
            .take(self.preview_items)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        let hidden = items.len().saturating_sub(self.preview_items);
        if hidden > 0 {
            format!("  {}: {} {}\n", label, shown, self.colorize(&format!("+{} more", hidden), Color::BrightBlack))
        } else {
            format!("  {}: {}\n", label, shown)
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let analysis = &report.analysis;
        let mut output = String::new();

        output.push_str(&self.format_header("ATS MATCH ANALYSIS", 1));
        output.push_str(&format!(
            "Generated: {}",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        if let Some(model) = &report.metadata.model {
            output.push_str(&format!(" | Model: {}", model));
        }
        output.push('\n');

        let verdict = format!("Overall score: {}", report.verdict());
        output.push_str(&self.colorize(&verdict, Self::band_color(report.band)));
        output.push('\n');

        output.push_str(&self.format_header("Category scores", 2));
        for (label, score) in analysis.category_scores() {
            output.push_str(&self.format_score_line(label, &score));
        }

        output.push_str(&self.format_header("Skills", 2));
        output.push_str(&self.format_preview("Matching", &analysis.skills_matching.matching));
        output.push_str(&self.format_preview("Missing", &analysis.skills_matching.missing));

        output.push_str(&self.format_header("Experience", 2));
        output.push_str(&self.format_preview("Relevant", &analysis.experience_matching.relevant));
        output.push_str(&self.format_preview("Missing", &analysis.experience_matching.missing));

        output.push_str(&self.format_header("Education", 2));
        output.push_str(&self.format_preview("Matching", &analysis.education_matching.matching));
        output.push_str(&self.format_preview("Missing", &analysis.education_matching.missing));

        let recommendations = &analysis.recommendations;
        if !recommendations.is_empty() {
            output.push_str(&self.format_header("Recommendations", 2));
            output.push_str(&self.format_preview("Skills to add", &recommendations.skills_to_add));
            output.push_str(&self.format_preview("Experience to highlight", &recommendations.experience_to_highlight));
            output.push_str(&self.format_preview("Education to include", &recommendations.education_to_include));
            output.push_str(&self.format_preview("Formatting", &recommendations.formatting));
        }

        output.push_str(&self.format_header("Summary", 2));
        output.push_str(&self.format_preview("Strengths", &analysis.strengths));
        output.push_str(&self.format_preview("Weaknesses", &analysis.weaknesses));
        if !analysis.overall_fit.is_empty() {
            output.push_str(&format!("  Overall fit: {}\n", analysis.overall_fit));
        }

        if report.improved_resume.is_some() {
            output.push_str(&format!(
                "\n{}\n",
                self.colorize("An improved resume is available in the markdown and html outputs.", Color::Cyan)
            ));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn push_list(output: &mut String, title: &str, items: &[String]) {
        if items.is_empty() {
            return;
        }
        output.push_str(&format!("**{}:**\n", title));
        for item in items {
            output.push_str(&format!("- {}\n", item));
        }
        output.push('\n');
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let analysis = &report.analysis;
        let mut output = String::new();

        output.push_str("# ATS Match Report\n\n");
        output.push_str(&format!("**Overall score:** {}\n\n", report.verdict()));

        output.push_str("## Score Breakdown\n\n| Category | Score | Percent |\n|---|---|---|\n");
        for (label, score) in analysis.category_scores() {
            let flag = if score.exceeds_max() { " (exceeds maximum)" } else { "" };
            output.push_str(&format!(
                "| {} | {}/{}{} | {}% |\n",
                label,
                score.value,
                score.max,
                flag,
                score.percentage()
            ));
        }
        output.push('\n');

        output.push_str("## Matching Analysis\n\n");
        Self::push_list(&mut output, "Matching Skills", &analysis.skills_matching.matching);
        Self::push_list(&mut output, "Missing Skills", &analysis.skills_matching.missing);
        Self::push_list(&mut output, "Relevant Experience", &analysis.experience_matching.relevant);
        Self::push_list(&mut output, "Missing Experience", &analysis.experience_matching.missing);
        Self::push_list(&mut output, "Matching Education", &analysis.education_matching.matching);
        Self::push_list(&mut output, "Missing Education", &analysis.education_matching.missing);

        let recommendations = &analysis.recommendations;
        if !recommendations.is_empty() {
            output.push_str("## Recommendations\n\n");
            Self::push_list(&mut output, "Skills to Add", &recommendations.skills_to_add);
            Self::push_list(&mut output, "Experience to Highlight", &recommendations.experience_to_highlight);
            Self::push_list(&mut output, "Education to Include", &recommendations.education_to_include);
            Self::push_list(&mut output, "Formatting and Presentation", &recommendations.formatting);
        }

        output.push_str("## Summary\n\n");
        Self::push_list(&mut output, "Strengths", &analysis.strengths);
        Self::push_list(&mut output, "Weaknesses", &analysis.weaknesses);
        if !analysis.overall_fit.is_empty() {
            output.push_str(&format!("**Overall Fit:** {}\n\n", analysis.overall_fit));
        }

        if let Some(resume) = &report.improved_resume {
            output.push_str("## Improved Resume\n\n");
            output.push_str(resume);
            output.push_str("\n\n");
        }

        if self.include_metadata {
            output.push_str("---\n\n");
            output.push_str(&format!(
                "*Generated by ats-match v{} on {}*\n",
                report.metadata.version,
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
            ));
            if let Some(model) = &report.metadata.model {
                output.push_str(&format!("*Model: {}*\n", model));
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl HtmlFormatter {
    pub fn new(include_styles: bool) -> Self {
        Self { include_styles }
    }

    fn scores_html(report: &AnalysisReport) -> String {
        report
            .analysis
            .category_scores()
            .iter()
            .map(|(label, score)| {
                let class = if score.exceeds_max() { "score-item over-max" } else { "score-item" };
                format!(
                    "<div class=\"{}\"><strong>{}</strong><br>{}/{} ({}%)</div>\n",
                    class,
                    escape_html(label),
                    score.value,
                    score.max,
                    score.percentage()
                )
            })
            .collect()
    }

    fn create_template_data(&self, report: &AnalysisReport) -> HtmlTemplate {
        HtmlTemplate {
            include_styles: self.include_styles,
            overall_score: report.analysis.overall_score,
            score_class: report.band.css_class().to_string(),
            score_label: report.band.label().to_string(),
            scores_html: Self::scores_html(report),
            narrative_html: report.narrative_html.clone(),
            has_improved_resume: report.improved_resume_html.is_some(),
            resume_html: report.improved_resume_html.clone().unwrap_or_default(),
            version: report.metadata.version.clone(),
            generated_at: report.metadata.generated_at.format("%Y-%m-%d %H:%M UTC").to_string(),
            has_model: report.metadata.model.is_some(),
            model: report.metadata.model.clone().unwrap_or_default(),
            has_resume_file: report.metadata.resume_file.is_some(),
            resume_file: report.metadata.resume_file.clone().unwrap_or_default(),
        }
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        Ok(self.create_template_data(report).render()?)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Html
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::from_config(&OutputConfig::default())
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(config.color_output, config.preview_items),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
            html_formatter: HtmlFormatter::new(config.include_styles),
        }
    }

    pub fn generate_report(&self, report: &AnalysisReport, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
            OutputFormat::Html => self.html_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: &OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| "resume".to_string());

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    format!("{}_ats{}.{}", base_name, timestamp_suffix, format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::report::ReportMetadata;
    use crate::session::AnalysisOutcome;

    const ANALYSIS: &str = "### Skills Matching:\nMatching Skills:\n- Rust\n- Go\n- SQL\n- Docker\n- Linux\n\
        Missing Skills:\n- Kubernetes\n\n### Scoring:\nTotal Score: 64/100\n\n\
        ### Summary:\nOverall Fit: Solid <backend> candidate";

    fn report() -> AnalysisReport {
        let outcome = AnalysisOutcome::from_parts(ANALYSIS, "**Skills:**\n- Rust");
        AnalysisReport::from_outcome(
            &outcome,
            ReportMetadata::new(Some("jane.pdf".into()), Some("Claude 3 Haiku".into())),
        )
    }

    #[test]
    fn test_console_preview() {
        let output = ConsoleFormatter::new(false, 3).format_report(&report()).unwrap();
        assert!(output.contains("Overall score: 64/100 Good match"));
        assert!(output.contains("  Matching: Rust, Go, SQL +2 more\n"));
        assert!(output.contains("  Missing: Kubernetes\n"));
        assert!(output.contains("  Skills        26/40  (65%)"));
    }

    #[test]
    fn test_json_roundtrips_analysis() {
        let json = JsonFormatter::new(false).format_report(&report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["analysis"]["overall_score"], 64);
        assert_eq!(value["band"], "Good");
        assert_eq!(value["analysis"]["skills_matching"]["missing"][0], "Kubernetes");
    }

    #[test]
    fn test_markdown_sections() {
        let markdown = MarkdownFormatter::new(false).format_report(&report()).unwrap();
        assert!(markdown.contains("| Skills | 26/40 | 65% |"));
        assert!(markdown.contains("**Missing Skills:**\n- Kubernetes\n"));
        assert!(markdown.contains("## Improved Resume\n\n**Skills:**\n- Rust"));
        assert!(!markdown.contains("Generated by"));
    }

    #[test]
    fn test_html_embeds_fragments() {
        let html = HtmlFormatter::new(false).format_report(&report()).unwrap();
        assert!(html.contains("<span class=\"score-badge score-good\">64/100</span>"));
        assert!(html.contains("<div class=\"analysis-narrative\">"));
        assert!(html.contains("<div class=\"improved-resume\">"));
        assert!(html.contains("Solid &lt;backend&gt; candidate"));
        assert!(html.contains("Model: Claude 3 Haiku"));
        assert!(!html.contains("<style>"));
    }

    #[test]
    fn test_suggest_filename() {
        assert_eq!(suggest_filename(&OutputFormat::Html, "cv/jane.pdf", false), "jane_ats.html");
        assert_eq!(suggest_filename(&OutputFormat::Json, "", false), "resume_ats.json");
        assert!(suggest_filename(&OutputFormat::Markdown, "jane.pdf", true).ends_with(".md"));
    }

    #[test]
    fn test_save_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("report.md");
        save_report_to_file("# Report", &path).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "# Report");
    }
}
