//! Scoring dimension metadata and the weighted composite used for ranking.

use serde::Serialize;

use crate::models::ScoreCard;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Dimension {
    pub key: &'static str,
    pub label: &'static str,
    pub weight: f64,
    pub description: &'static str,
}

pub const DIMENSIONS: [Dimension; 5] = [
    Dimension {
        key: "education",
        label: "Education",
        weight: 0.2,
        description: "Degree level, school reputation, field relevance",
    },
    Dimension {
        key: "experience",
        label: "Experience",
        weight: 0.3,
        description: "Years of relevant work, seniority, industry fit",
    },
    Dimension {
        key: "skills",
        label: "Skills",
        weight: 0.25,
        description: "Core skills, technical depth, certifications",
    },
    Dimension {
        key: "projects",
        label: "Projects",
        weight: 0.15,
        description: "Project complexity, outcomes, innovation",
    },
    Dimension {
        key: "overall",
        label: "Overall",
        weight: 0.1,
        description: "Communication, leadership, learning ability",
    },
];

pub fn score_for(card: &ScoreCard, key: &str) -> f64 {
    match key {
        "education" => card.education_score,
        "experience" => card.experience_score,
        "skills" => card.skills_score,
        "projects" => card.projects_score,
        "overall" => card.overall_score,
        _ => 0.0,
    }
}

/// Weighted average across the five dimensions, on the same 0-10 scale.
/// Used to order the results list; the per-dimension scores stay untouched.
pub fn weighted_composite(card: &ScoreCard) -> f64 {
    DIMENSIONS
        .iter()
        .map(|d| score_for(card, d.key) * d.weight)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card_with_uniform_score(score: f64) -> ScoreCard {
        ScoreCard {
            education_score: score,
            experience_score: score,
            skills_score: score,
            projects_score: score,
            overall_score: score,
            education_evaluation: String::new(),
            experience_evaluation: String::new(),
            skills_evaluation: String::new(),
            projects_evaluation: String::new(),
            overall_evaluation: String::new(),
            strengths: vec![],
            concerns: vec![],
            summary: String::new(),
            interview_suggestions: String::new(),
            development_potential: String::new(),
        }
    }

    #[test]
    fn test_weights_sum_to_one() {
        let total: f64 = DIMENSIONS.iter().map(|d| d.weight).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_uniform_card_composite_equals_the_score() {
        let card = card_with_uniform_score(8.0);
        assert!((weighted_composite(&card) - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_composite_weighs_experience_heaviest() {
        let mut strong_experience = card_with_uniform_score(5.0);
        strong_experience.experience_score = 10.0;

        let mut strong_overall = card_with_uniform_score(5.0);
        strong_overall.overall_score = 10.0;

        assert!(weighted_composite(&strong_experience) > weighted_composite(&strong_overall));
    }

    #[test]
    fn test_score_for_unknown_key_is_zero() {
        let card = card_with_uniform_score(9.0);
        assert_eq!(score_for(&card, "charisma"), 0.0);
    }
}
