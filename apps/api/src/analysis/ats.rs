//! ATS compatibility scoring — structural completeness only.
//!
//! Starts at 100 and subtracts a fixed penalty per failed check. Each failed
//! check pushes exactly one issue string and one paired recommendation, so
//! `issues.len() == recommendations.len()` always holds. This scorer never
//! looks at a job description.

use serde::{Deserialize, Serialize};

use crate::models::resume::ResumeData;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtsReport {
    pub score: u8,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
}

const PENALTY_MISSING_CONTACT: i32 = 15;
const PENALTY_NO_EXPERIENCE: i32 = 25;
const PENALTY_MISSING_DATES: i32 = 10;
const PENALTY_MISSING_DESCRIPTIONS: i32 = 15;
const PENALTY_NO_EDUCATION: i32 = 10;
const PENALTY_FEW_SKILLS: i32 = 10;

const MIN_SKILL_COUNT: usize = 5;

/// Scores a resume for structural ATS-friendliness, 0–100.
pub fn calculate_ats_score(resume: &ResumeData) -> AtsReport {
    let mut score: i32 = 100;
    let mut issues = Vec::new();
    let mut recommendations = Vec::new();

    let mut fail = |penalty: i32, issue: &str, recommendation: &str| {
        score -= penalty;
        issues.push(issue.to_string());
        recommendations.push(recommendation.to_string());
    };

    if resume.personal_info.email.trim().is_empty() || resume.personal_info.phone.trim().is_empty()
    {
        fail(
            PENALTY_MISSING_CONTACT,
            "Missing contact information",
            "Add both an email address and a phone number so recruiters can reach you",
        );
    }

    if resume.work_experience.is_empty() {
        fail(
            PENALTY_NO_EXPERIENCE,
            "No work experience listed",
            "Add at least one work experience entry, even internships or freelance work",
        );
    }

    let missing_dates = resume.work_experience.iter().any(|w| {
        w.start_date.trim().is_empty()
            || (!w.current && w.end_date.as_deref().map_or(true, |d| d.trim().is_empty()))
    });
    if missing_dates {
        fail(
            PENALTY_MISSING_DATES,
            "Missing dates in work experience",
            "Give every position a start date and either an end date or a current-role marker",
        );
    }

    let blank_descriptions = resume
        .work_experience
        .iter()
        .any(|w| w.description.iter().all(|b| b.trim().is_empty()));
    if blank_descriptions {
        fail(
            PENALTY_MISSING_DESCRIPTIONS,
            "Missing job descriptions",
            "Describe each position with at least one bullet covering what you did",
        );
    }

    if resume.education.is_empty() {
        fail(
            PENALTY_NO_EDUCATION,
            "No education listed",
            "List your education, including degrees in progress",
        );
    }

    if resume.skills.len() < MIN_SKILL_COUNT {
        fail(
            PENALTY_FEW_SKILLS,
            "Limited skills listed",
            "List at least five skills relevant to the roles you target",
        );
    }

    AtsReport {
        score: score.clamp(0, 100) as u8,
        issues,
        recommendations,
    }
}
