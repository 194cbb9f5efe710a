//! Prompt construction for resume scoring calls.

use crate::models::JobProfile;

/// System prompt for every scoring call. JSON-only output keeps the
/// response parseable without a second extraction pass.
pub const SCORING_SYSTEM: &str = "You are a senior HR expert and technical interviewer \
    who analyzes resumes and gives objective, professional evaluations. \
    You MUST respond with a single valid JSON object and nothing else. \
    Do NOT include any text outside the JSON object.";

/// Builds the scoring prompt for one resume. The job context block is
/// included only when the profile actually describes a role.
pub fn build_scoring_prompt(resume_text: &str, job: &JobProfile) -> String {
    let job_context = if job.has_context() {
        format!(
            "\n\nRole being hired for:\n\
             - Job title: {}\n\
             - Company: {}\n\
             - Salary range: {}\n\
             - Location: {}\n\
             - Requirements: {}\n\n\
             Weigh the candidate's fit against these requirements.",
            or_unspecified(&job.job_title),
            or_unspecified(&job.company_info),
            or_unspecified(&job.salary_range),
            or_unspecified(&job.work_location),
            or_unspecified(&job.job_requirements),
        )
    } else {
        String::new()
    };

    format!(
        "Analyze the following resume in depth and score it on five dimensions, \
         each from 1 to 10 (1-3 unqualified, 4-6 average, 7-8 good, 9-10 excellent).\n\n\
         Resume:\n{resume_text}{job_context}\n\n\
         Dimensions:\n\
         1. education_score: degree level and relevance, school reputation, academic record, \
            continued learning.\n\
         2. experience_score: years of relevant experience, career trajectory, industry fit, \
            employer quality, job stability.\n\
         3. skills_score: core technical skills versus the role, depth and breadth, \
            certifications, soft skills, languages.\n\
         4. projects_score: project scale and complexity, role and responsibility, outcomes, \
            technical innovation, leadership shown.\n\
         5. overall_score: professionalism, learning ability, communication, leadership \
            potential, clarity of career direction.\n\n\
         Return a JSON object with exactly these fields (each evaluation at least 50 words):\n\
         {{\n\
           \"education_score\": number,\n\
           \"experience_score\": number,\n\
           \"skills_score\": number,\n\
           \"projects_score\": number,\n\
           \"overall_score\": number,\n\
           \"education_evaluation\": \"detailed analysis of educational background\",\n\
           \"experience_evaluation\": \"detailed analysis of work experience\",\n\
           \"skills_evaluation\": \"detailed analysis of skill fit\",\n\
           \"projects_evaluation\": \"detailed analysis of project experience\",\n\
           \"overall_evaluation\": \"overall assessment of the candidate\",\n\
           \"strengths\": [\"specific strength\", \"specific strength\", \"specific strength\"],\n\
           \"concerns\": [\"specific concern\", \"specific concern\", \"specific concern\"],\n\
           \"summary\": \"full summary: overall level, role fit, potential, suggested salary, \
             interview focus\",\n\
           \"interview_suggestions\": \"what to probe in an interview with this candidate\",\n\
           \"development_potential\": \"growth prospects and development path\"\n\
         }}\n\n\
         Be objective and constructive; focus on fit with the stated requirements."
    )
}

fn or_unspecified(value: &str) -> &str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        "unspecified"
    } else {
        trimmed
    }
}
