pub mod candidate;
pub mod catalog;

pub use candidate::{
    placeholder_analysis, AnalysisRecord, AnalysisSource, CandidateAnalysis, JobProfile, ScoreCard,
};
