//! Per-candidate PDF report rendering.
//!
//! The report is deliberately plain: a title, headed sections of paragraphs,
//! and the interview question bank. Section content is assembled by
//! `report_sections` (pure, unit-tested); `render_candidate_report` only
//! turns those sections into a PDF.

use genpdf::elements::{Break, Paragraph};
use genpdf::fonts::{FontData, FontFamily};
use genpdf::{Document, SimplePageDecorator};

use crate::analysis::dimensions::{score_for, DIMENSIONS};
use crate::errors::AppError;
use crate::models::{AnalysisRecord, AnalysisSource};
use crate::report::questions::QUESTION_BANK;

pub mod questions;

/// One headed block of report paragraphs.
pub struct ReportSection {
    pub heading: String,
    pub paragraphs: Vec<String>,
}

/// Renders the full report for one stored analysis as PDF bytes.
pub fn render_candidate_report(record: &AnalysisRecord) -> Result<Vec<u8>, AppError> {
    let font_family = load_font()?;

    let mut doc = Document::new(font_family);
    let title = format!("Candidate Report - {}", record.analysis.candidate_name);
    doc.set_title(title.clone());

    let mut decorator = SimplePageDecorator::new();
    decorator.set_margins(30);
    doc.set_page_decorator(decorator);

    let title_style = genpdf::style::Style::new().bold().with_font_size(18);
    doc.push(Paragraph::new(genpdf::style::StyledString::new(
        title,
        title_style,
    )));
    doc.push(Break::new(1));

    let heading_style = genpdf::style::Style::new().bold().with_font_size(13);
    for section in report_sections(record) {
        doc.push(Paragraph::new(genpdf::style::StyledString::new(
            section.heading,
            heading_style,
        )));
        doc.push(Break::new(0.5));
        for paragraph in section.paragraphs {
            doc.push(Paragraph::new(paragraph));
            doc.push(Break::new(0.5));
        }
        doc.push(Break::new(0.5));
    }

    let mut buffer = Vec::new();
    doc.render(&mut buffer)
        .map_err(|e| AppError::Report(e.to_string()))?;
    Ok(buffer)
}

/// Assembles the report's section content from a record.
pub fn report_sections(record: &AnalysisRecord) -> Vec<ReportSection> {
    let card = &record.analysis.card;
    let mut sections = Vec::new();

    let provenance = match &record.source {
        AnalysisSource::Model { model } => format!("Scored by {model}"),
        AnalysisSource::Placeholder { reason } => format!(
            "PLACEHOLDER RESULT — automated scoring failed ({reason}). \
             The scores below are neutral defaults, not an assessment."
        ),
    };
    sections.push(ReportSection {
        heading: "Overview".to_string(),
        paragraphs: vec![
            format!("Candidate: {}", record.analysis.candidate_name),
            format!(
                "Generated: {}",
                record.created_at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            provenance,
            format!("Overall score: {:.1}/10", card.overall_score),
        ],
    });

    let mut dimension_lines = Vec::new();
    for dimension in &DIMENSIONS {
        dimension_lines.push(format!(
            "{}: {:.1}/10",
            dimension.label,
            score_for(card, dimension.key)
        ));
    }
    sections.push(ReportSection {
        heading: "Dimension scores".to_string(),
        paragraphs: dimension_lines,
    });

    sections.push(ReportSection {
        heading: "Detailed evaluations".to_string(),
        paragraphs: vec![
            format!("Education: {}", card.education_evaluation),
            format!("Experience: {}", card.experience_evaluation),
            format!("Skills: {}", card.skills_evaluation),
            format!("Projects: {}", card.projects_evaluation),
            format!("Overall: {}", card.overall_evaluation),
        ],
    });

    sections.push(ReportSection {
        heading: "Strengths".to_string(),
        paragraphs: card.strengths.iter().map(|s| format!("+ {s}")).collect(),
    });
    sections.push(ReportSection {
        heading: "Concerns".to_string(),
        paragraphs: card.concerns.iter().map(|c| format!("- {c}")).collect(),
    });

    sections.push(ReportSection {
        heading: "Summary".to_string(),
        paragraphs: vec![card.summary.clone()],
    });
    if !card.interview_suggestions.is_empty() {
        sections.push(ReportSection {
            heading: "Interview suggestions".to_string(),
            paragraphs: vec![card.interview_suggestions.clone()],
        });
    }
    if !card.development_potential.is_empty() {
        sections.push(ReportSection {
            heading: "Development potential".to_string(),
            paragraphs: vec![card.development_potential.clone()],
        });
    }

    for category in &QUESTION_BANK {
        sections.push(ReportSection {
            heading: format!("Interview questions — {}", category.category),
            paragraphs: category
                .questions
                .iter()
                .map(|q| format!("{} (focus: {})", q.question, q.focus))
                .collect(),
        });
    }

    sections
}

/// Tries the usual system font locations in order.
fn load_font() -> Result<FontFamily<FontData>, AppError> {
    let candidates = [
        ("", "LiberationSans"),
        ("/usr/share/fonts/truetype/liberation", "LiberationSans"),
        ("/usr/share/fonts/liberation-sans", "LiberationSans"),
        ("/System/Library/Fonts", "Helvetica"),
        ("/Library/Fonts", "Arial"),
    ];
    for (dir, name) in candidates {
        if let Ok(family) = genpdf::fonts::from_files(dir, name, None) {
            return Ok(family);
        }
    }
    Err(AppError::Report(
        "no usable font found on this system".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::placeholder_analysis;
    use chrono::Utc;
    use uuid::Uuid;

    // PDF rendering itself needs fonts installed, so tests cover the
    // section assembly rather than the final bytes.

    fn record(source: AnalysisSource) -> AnalysisRecord {
        AnalysisRecord {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            elapsed_ms: 1200,
            source,
            analysis: placeholder_analysis("Jane Doe"),
        }
    }

    fn all_text(sections: &[ReportSection]) -> String {
        sections
            .iter()
            .flat_map(|s| {
                std::iter::once(s.heading.clone()).chain(s.paragraphs.iter().cloned())
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_sections_cover_every_dimension_and_the_candidate() {
        let record = record(AnalysisSource::Model {
            model: "qwen/qwen3-32b:free".to_string(),
        });
        let text = all_text(&report_sections(&record));

        assert!(text.contains("Jane Doe"));
        assert!(text.contains("Scored by qwen/qwen3-32b:free"));
        for dimension in &DIMENSIONS {
            assert!(text.contains(dimension.label), "missing {}", dimension.label);
        }
    }

    #[test]
    fn test_placeholder_record_is_flagged_in_the_report() {
        let record = record(AnalysisSource::Placeholder {
            reason: "all models failed".to_string(),
        });
        let text = all_text(&report_sections(&record));
        assert!(text.contains("PLACEHOLDER RESULT"));
        assert!(text.contains("all models failed"));
    }

    #[test]
    fn test_question_bank_appears_per_category() {
        let record = record(AnalysisSource::Model {
            model: "stub".to_string(),
        });
        let sections = report_sections(&record);
        let question_sections: Vec<_> = sections
            .iter()
            .filter(|s| s.heading.starts_with("Interview questions"))
            .collect();
        assert_eq!(question_sections.len(), QUESTION_BANK.len());
        assert!(question_sections
            .iter()
            .all(|s| s.paragraphs.len() == 3));
    }

    #[test]
    fn test_empty_optional_fields_drop_their_sections() {
        let mut rec = record(AnalysisSource::Model {
            model: "stub".to_string(),
        });
        rec.analysis.card.interview_suggestions.clear();
        rec.analysis.card.development_potential.clear();
        let sections = report_sections(&rec);
        assert!(!sections
            .iter()
            .any(|s| s.heading == "Interview suggestions"));
        assert!(!sections
            .iter()
            .any(|s| s.heading == "Development potential"));
    }
}
