//! Readiness aggregation — a richer checklist than the ATS score.
//!
//! Required checks gate `is_ready`; recommended checks only advise. Every
//! check carries a human-readable message and, where the editor can help, a
//! `fix_action` naming the section to jump to.

use serde::{Deserialize, Serialize};

use crate::analysis::job_match::QUANTIFIED_PATTERN;
use crate::models::resume::ResumeData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Pass,
    Fail,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckPriority {
    Required,
    Recommended,
}

/// Editor jump target attached to a failed or warning check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixAction {
    pub section_id: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessCheck {
    pub id: String,
    pub label: String,
    pub status: CheckStatus,
    pub message: String,
    pub detail: Option<String>,
    pub priority: CheckPriority,
    pub fix_action: Option<FixAction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessReport {
    pub checks: Vec<ReadinessCheck>,
    /// True iff every required check passes.
    pub is_ready: bool,
    pub required_passed: usize,
    pub required_total: usize,
    pub recommended_passed: usize,
    pub recommended_total: usize,
}

const SUMMARY_MIN_LEN: usize = 100;
const RECOMMENDED_SKILL_COUNT: usize = 5;

/// Runs the full readiness checklist over a resume snapshot.
pub fn analyze_readiness(resume: &ResumeData) -> ReadinessReport {
    let checks = vec![
        check_contact_info(resume),
        check_work_experience(resume),
        check_education(resume),
        check_summary(resume),
        check_skill_count(resume),
        check_quantified_achievements(resume),
        check_work_dates(resume),
        check_work_descriptions(resume),
    ];

    let required_total = count(&checks, CheckPriority::Required, None);
    let required_passed = count(&checks, CheckPriority::Required, Some(CheckStatus::Pass));
    let recommended_total = count(&checks, CheckPriority::Recommended, None);
    let recommended_passed = count(&checks, CheckPriority::Recommended, Some(CheckStatus::Pass));

    ReadinessReport {
        is_ready: required_passed == required_total,
        checks,
        required_passed,
        required_total,
        recommended_passed,
        recommended_total,
    }
}

fn count(checks: &[ReadinessCheck], priority: CheckPriority, status: Option<CheckStatus>) -> usize {
    checks
        .iter()
        .filter(|c| c.priority == priority && status.map_or(true, |s| c.status == s))
        .count()
}

fn check(
    id: &str,
    label: &str,
    priority: CheckPriority,
    status: CheckStatus,
    message: String,
) -> ReadinessCheck {
    ReadinessCheck {
        id: id.to_string(),
        label: label.to_string(),
        status,
        message,
        detail: None,
        priority,
        fix_action: None,
    }
}

fn fix(section_id: &str, label: &str) -> Option<FixAction> {
    Some(FixAction {
        section_id: section_id.to_string(),
        label: label.to_string(),
    })
}

fn check_contact_info(resume: &ResumeData) -> ReadinessCheck {
    let info = &resume.personal_info;
    let mut missing = Vec::new();
    if info.email.trim().is_empty() {
        missing.push("email");
    }
    if info.phone.trim().is_empty() {
        missing.push("phone");
    }

    let mut c = if missing.is_empty() {
        check(
            "contact-info",
            "Contact information",
            CheckPriority::Required,
            CheckStatus::Pass,
            "Email and phone number are present".to_string(),
        )
    } else {
        let mut c = check(
            "contact-info",
            "Contact information",
            CheckPriority::Required,
            CheckStatus::Fail,
            format!("Missing {}", missing.join(" and ")),
        );
        c.detail = Some("Recruiters need at least one reliable way to reach you".to_string());
        c
    };
    if c.status != CheckStatus::Pass {
        c.fix_action = fix("personal-info", "Add contact details");
    }
    c
}

fn check_work_experience(resume: &ResumeData) -> ReadinessCheck {
    if resume.work_experience.is_empty() {
        let mut c = check(
            "work-experience",
            "Work experience",
            CheckPriority::Required,
            CheckStatus::Fail,
            "No work experience listed".to_string(),
        );
        c.fix_action = fix("work-experience", "Add a position");
        c
    } else {
        check(
            "work-experience",
            "Work experience",
            CheckPriority::Required,
            CheckStatus::Pass,
            format!("{} position(s) listed", resume.work_experience.len()),
        )
    }
}

fn check_education(resume: &ResumeData) -> ReadinessCheck {
    // Certifications or courses count as an education equivalent.
    let equivalent = !resume.certifications.is_empty() || !resume.courses.is_empty();
    if !resume.education.is_empty() || equivalent {
        check(
            "education",
            "Education",
            CheckPriority::Required,
            CheckStatus::Pass,
            "Education or equivalent training is present".to_string(),
        )
    } else {
        let mut c = check(
            "education",
            "Education",
            CheckPriority::Required,
            CheckStatus::Fail,
            "No education, certification, or course listed".to_string(),
        );
        c.fix_action = fix("education", "Add education");
        c
    }
}

fn check_summary(resume: &ResumeData) -> ReadinessCheck {
    let summary = resume
        .personal_info
        .summary
        .as_deref()
        .unwrap_or("")
        .trim()
        .to_string();

    if summary.is_empty() {
        let mut c = check(
            "summary",
            "Professional summary",
            CheckPriority::Recommended,
            CheckStatus::Fail,
            "No summary written".to_string(),
        );
        c.fix_action = fix("personal-info", "Write a summary");
        c
    } else if summary.len() < SUMMARY_MIN_LEN {
        let mut c = check(
            "summary",
            "Professional summary",
            CheckPriority::Recommended,
            CheckStatus::Warning,
            format!(
                "Summary is short ({} of {} characters)",
                summary.len(),
                SUMMARY_MIN_LEN
            ),
        );
        c.fix_action = fix("personal-info", "Expand the summary");
        c
    } else {
        check(
            "summary",
            "Professional summary",
            CheckPriority::Recommended,
            CheckStatus::Pass,
            "Summary is present and substantial".to_string(),
        )
    }
}

fn check_skill_count(resume: &ResumeData) -> ReadinessCheck {
    let n = resume.skills.len();
    if n == 0 {
        let mut c = check(
            "skills",
            "Skills",
            CheckPriority::Recommended,
            CheckStatus::Fail,
            "No skills listed".to_string(),
        );
        c.fix_action = fix("skills", "Add skills");
        c
    } else if n < RECOMMENDED_SKILL_COUNT {
        let mut c = check(
            "skills",
            "Skills",
            CheckPriority::Recommended,
            CheckStatus::Warning,
            format!("Only {n} skill(s) listed; aim for {RECOMMENDED_SKILL_COUNT} or more"),
        );
        c.fix_action = fix("skills", "Add more skills");
        c
    } else {
        check(
            "skills",
            "Skills",
            CheckPriority::Recommended,
            CheckStatus::Pass,
            format!("{n} skills listed"),
        )
    }
}

fn check_quantified_achievements(resume: &ResumeData) -> ReadinessCheck {
    if resume.work_experience.is_empty() {
        return check(
            "quantified-achievements",
            "Quantified achievements",
            CheckPriority::Recommended,
            CheckStatus::Warning,
            "Nothing to quantify until a position is added".to_string(),
        );
    }

    let quantified = resume
        .work_experience
        .iter()
        .flat_map(|w| w.description.iter().chain(w.achievements.iter()))
        .any(|b| QUANTIFIED_PATTERN.is_match(b));

    if quantified {
        check(
            "quantified-achievements",
            "Quantified achievements",
            CheckPriority::Recommended,
            CheckStatus::Pass,
            "At least one bullet carries a measurable result".to_string(),
        )
    } else {
        let mut c = check(
            "quantified-achievements",
            "Quantified achievements",
            CheckPriority::Recommended,
            CheckStatus::Fail,
            "No bullet mentions a number, percentage, or improvement".to_string(),
        );
        c.detail = Some(
            "Rewrite bullets around outcomes, e.g. \"reduced deploy time 40%\"".to_string(),
        );
        c.fix_action = fix("work-experience", "Quantify a bullet");
        c
    }
}

fn check_work_dates(resume: &ResumeData) -> ReadinessCheck {
    let incomplete = resume
        .work_experience
        .iter()
        .filter(|w| {
            w.start_date.trim().is_empty()
                || (!w.current && w.end_date.as_deref().map_or(true, |d| d.trim().is_empty()))
        })
        .count();

    if incomplete == 0 {
        check(
            "work-dates",
            "Employment dates",
            CheckPriority::Recommended,
            CheckStatus::Pass,
            "Every position is fully dated".to_string(),
        )
    } else {
        let mut c = check(
            "work-dates",
            "Employment dates",
            CheckPriority::Recommended,
            CheckStatus::Warning,
            format!("{incomplete} position(s) missing dates"),
        );
        c.fix_action = fix("work-experience", "Complete the dates");
        c
    }
}

fn check_work_descriptions(resume: &ResumeData) -> ReadinessCheck {
    let blank = resume
        .work_experience
        .iter()
        .filter(|w| w.description.iter().all(|b| b.trim().is_empty()))
        .count();

    if blank == 0 {
        check(
            "work-descriptions",
            "Position descriptions",
            CheckPriority::Recommended,
            CheckStatus::Pass,
            "Every position has at least one description bullet".to_string(),
        )
    } else {
        let mut c = check(
            "work-descriptions",
            "Position descriptions",
            CheckPriority::Recommended,
            CheckStatus::Fail,
            format!("{blank} position(s) have no description"),
        );
        c.fix_action = fix("work-experience", "Describe the role");
        c
    }
}
