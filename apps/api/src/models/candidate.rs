//! Candidate scoring data model.
//!
//! A `ScoreCard` is what the LLM returns; an `AnalysisRecord` is what the
//! service stores and serves: the card plus identity, timing, and explicit
//! provenance, so a placeholder produced during an outage can never be
//! mistaken for a real analysis.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The scoring payload produced by the model. Scores are on a 0-10 scale.
///
/// `interview_suggestions` and `development_potential` default to empty:
/// smaller models occasionally drop them, and a missing coaching section is
/// not worth rejecting an otherwise complete analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreCard {
    pub education_score: f64,
    pub experience_score: f64,
    pub skills_score: f64,
    pub projects_score: f64,
    pub overall_score: f64,
    pub education_evaluation: String,
    pub experience_evaluation: String,
    pub skills_evaluation: String,
    pub projects_evaluation: String,
    pub overall_evaluation: String,
    pub strengths: Vec<String>,
    pub concerns: Vec<String>,
    pub summary: String,
    #[serde(default)]
    pub interview_suggestions: String,
    #[serde(default)]
    pub development_potential: String,
}

impl ScoreCard {
    /// Coerces every score into [0, 10]. Model output is untrusted; one wild
    /// value should not discard the rest of the card.
    pub fn clamp_scores(mut self) -> Self {
        for score in [
            &mut self.education_score,
            &mut self.experience_score,
            &mut self.skills_score,
            &mut self.projects_score,
            &mut self.overall_score,
        ] {
            *score = score.clamp(0.0, 10.0);
        }
        self
    }
}

/// A scored candidate: the card plus the name taken from the upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateAnalysis {
    pub candidate_name: String,
    #[serde(flatten)]
    pub card: ScoreCard,
}

/// Where an analysis came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisSource {
    /// A genuine model response, naming the model that produced it (after a
    /// fallback this differs from the requested model).
    Model { model: String },
    /// Every remote strategy failed; the scores are static defaults.
    Placeholder { reason: String },
}

impl AnalysisSource {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, AnalysisSource::Placeholder { .. })
    }
}

/// An immutable, stored analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub source: AnalysisSource,
    #[serde(flatten)]
    pub analysis: CandidateAnalysis,
}

/// Free-text description of the role being hired for, passed through to the
/// scoring prompt unmodified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobProfile {
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub job_requirements: String,
    #[serde(default)]
    pub company_info: String,
    #[serde(default)]
    pub salary_range: String,
    #[serde(default)]
    pub work_location: String,
}

impl JobProfile {
    /// A profile only shapes the prompt when it names a title or requirements.
    pub fn has_context(&self) -> bool {
        !self.job_title.trim().is_empty() || !self.job_requirements.trim().is_empty()
    }
}

/// Static middle-of-the-road scores used when every remote call fails.
/// Callers must pair this with `AnalysisSource::Placeholder`.
pub fn placeholder_analysis(candidate_name: &str) -> CandidateAnalysis {
    let manual_review = |area: &str| {
        format!(
            "AI analysis was unavailable, so {area} could not be evaluated. \
             Review this area manually against the role requirements."
        )
    };

    CandidateAnalysis {
        candidate_name: candidate_name.to_string(),
        card: ScoreCard {
            education_score: 7.0,
            experience_score: 6.0,
            skills_score: 7.0,
            projects_score: 6.0,
            overall_score: 6.5,
            education_evaluation: manual_review("the educational background"),
            experience_evaluation: manual_review("the work experience"),
            skills_evaluation: manual_review("the skill fit"),
            projects_evaluation: manual_review("the project experience"),
            overall_evaluation: manual_review("the candidate's overall profile"),
            strengths: vec![
                "AI analysis unavailable; identify core strengths manually".to_string(),
                "Verify professional abilities through a detailed interview".to_string(),
                "Focus on highlights and achievements listed in the resume".to_string(),
            ],
            concerns: vec![
                "Automated scoring was unavailable, so these scores are defaults".to_string(),
                "Add a manual review step before acting on this record".to_string(),
                "Verify the accuracy and completeness of the resume contents".to_string(),
            ],
            summary: "The AI analysis service was unavailable for this candidate. The scores \
                      shown are neutral defaults, not an assessment. Review the resume manually \
                      across education, experience, skills, and projects, and use an interview \
                      to gauge overall fit."
                .to_string(),
            interview_suggestions: "Without an automated analysis, concentrate the interview on \
                                    verifying core skills in depth, probing the authenticity and \
                                    complexity of project work, and assessing learning ability \
                                    and collaboration."
                .to_string(),
            development_potential: "Growth potential could not be assessed automatically. Use \
                                    the interview to understand the candidate's learning \
                                    appetite, career plans, and skill development trajectory."
                .to_string(),
        },
    }
}
