//! Job-match scoring — keyword overlap between a resume and a job description.
//!
//! Pure and deterministic: same inputs always produce the same output. No
//! randomness, no clock. Matching is lower-cased substring containment over a
//! fixed vocabulary, not tokenized NLP. The weights are load-bearing: keyword
//! coverage contributes up to 50 points, required-skill coverage up to 30,
//! and open suggestions subtract 3 points each, capped at 20.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::analysis::keywords::{COMMON_KEYWORDS, WEAK_PHRASES};
use crate::models::resume::ResumeData;

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    Skill,
    Keyword,
    Experience,
    Achievement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    High,
    Medium,
    Low,
}

/// One actionable improvement surfaced by the analyzer. Ids are derived from
/// the finding itself so identical inputs yield identical output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: String,
    pub kind: SuggestionKind,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub current: Option<String>,
    pub suggested: Option<String>,
    pub action: String,
}

/// Full analysis of a (job description, resume) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobAnalysis {
    pub score: u8,
    /// Capped at 10 for display; the full set still drives the score.
    pub missing_keywords: Vec<String>,
    pub suggestions: Vec<Suggestion>,
    pub strengths: Vec<String>,
    /// Suggestion titles, in generation order.
    pub improvements: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Patterns and scoring constants
// ────────────────────────────────────────────────────────────────────────────

/// Matches bullets that carry a measurable result.
pub static QUANTIFIED_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\d+%|\d+\+|increased|decreased|improved")
        .expect("quantified pattern is valid")
});

/// Captures the text after an explicit skill-list introducer, up to the end
/// of the line or sentence.
static LIST_INTRODUCER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:required skills|must have|requirements)\s*:\s*([^\n.]+)")
        .expect("list introducer pattern is valid")
});

const KEYWORD_WEIGHT: f64 = 50.0;
const SKILL_WEIGHT: f64 = 30.0;
const PENALTY_PER_SUGGESTION: f64 = 3.0;
const MAX_PENALTY: f64 = 20.0;
/// Used for a rate when that side of the comparison has nothing to extract.
const NEUTRAL_RATE: f64 = 0.5;

const MAX_DISPLAYED_MISSING: usize = 10;
const MAX_KEYWORD_SUGGESTIONS: usize = 3;
const MAX_LISTED_SKILL_GAPS: usize = 5;
const REQUIRED_SKILL_FALLBACK: usize = 5;

// ────────────────────────────────────────────────────────────────────────────
// Analyzer
// ────────────────────────────────────────────────────────────────────────────

/// Analyzes how well a resume matches a job description.
///
/// Never fails on well-typed input: an empty job description scores against
/// neutral rates, and a resume with no work history simply skips the
/// bullet-level checks.
pub fn analyze_job_match(job_description: &str, resume: &ResumeData) -> JobAnalysis {
    let jd_lower = job_description.to_lowercase();
    let keywords = extract_keywords(&jd_lower);
    let required_skills = extract_required_skills(job_description, &keywords);
    let blob = resume_text_blob(resume);

    // Full missing set drives the score; only the head is displayed.
    let missing_keywords: Vec<String> = keywords
        .iter()
        .filter(|kw| !blob.contains(kw.as_str()))
        .cloned()
        .collect();

    let skill_gaps = skill_gaps(resume, &required_skills);

    let mut suggestions = Vec::new();
    push_keyword_suggestions(&mut suggestions, &missing_keywords, job_description);
    push_skill_gap_suggestion(&mut suggestions, &skill_gaps);
    push_achievement_suggestion(&mut suggestions, resume);
    push_weak_phrase_suggestion(&mut suggestions, resume);
    push_summary_suggestion(&mut suggestions, resume);

    let keyword_rate = if keywords.is_empty() {
        NEUTRAL_RATE
    } else {
        (keywords.len() - missing_keywords.len()) as f64 / keywords.len() as f64
    };
    let skill_rate = if required_skills.is_empty() {
        NEUTRAL_RATE
    } else {
        (required_skills.len() - skill_gaps.len()) as f64 / required_skills.len() as f64
    };
    let penalty = (suggestions.len() as f64 * PENALTY_PER_SUGGESTION).min(MAX_PENALTY);

    let score = (keyword_rate * KEYWORD_WEIGHT + skill_rate * SKILL_WEIGHT - penalty)
        .round()
        .clamp(0.0, 100.0) as u8;

    let strengths = collect_strengths(resume);
    let improvements = suggestions.iter().map(|s| s.title.clone()).collect();

    JobAnalysis {
        score,
        missing_keywords: missing_keywords
            .into_iter()
            .take(MAX_DISPLAYED_MISSING)
            .collect(),
        suggestions,
        strengths,
        improvements,
    }
}

/// Vocabulary terms found (as substrings) in the lower-cased description.
fn extract_keywords(jd_lower: &str) -> Vec<String> {
    COMMON_KEYWORDS
        .iter()
        .filter(|kw| jd_lower.contains(**kw))
        .map(|kw| kw.to_string())
        .collect()
}

/// Skills named after an explicit list introducer ("required skills:",
/// "must have:", "requirements:"). Falls back to the first extracted
/// keywords when no introducer is present.
fn extract_required_skills(job_description: &str, keywords: &[String]) -> Vec<String> {
    if let Some(captured) = LIST_INTRODUCER
        .captures(job_description)
        .and_then(|c| c.get(1))
    {
        let skills: Vec<String> = captured
            .as_str()
            .split([',', ';'])
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if !skills.is_empty() {
            return skills;
        }
    }
    keywords
        .iter()
        .take(REQUIRED_SKILL_FALLBACK)
        .cloned()
        .collect()
}

/// The whole snapshot as one lower-cased searchable string.
fn resume_text_blob(resume: &ResumeData) -> String {
    serde_json::to_string(resume)
        .unwrap_or_default()
        .to_lowercase()
}

/// Required skills with no substring overlap against any resume skill name.
fn skill_gaps(resume: &ResumeData, required_skills: &[String]) -> Vec<String> {
    let names_lower: Vec<String> = resume
        .skills
        .iter()
        .map(|s| s.name.to_lowercase())
        .filter(|n| !n.is_empty())
        .collect();

    required_skills
        .iter()
        .filter(|req| {
            let req_lower = req.to_lowercase();
            !names_lower
                .iter()
                .any(|name| name.contains(&req_lower) || req_lower.contains(name))
        })
        .cloned()
        .collect()
}

fn push_keyword_suggestions(
    suggestions: &mut Vec<Suggestion>,
    missing_keywords: &[String],
    job_description: &str,
) {
    for kw in missing_keywords.iter().take(MAX_KEYWORD_SUGGESTIONS) {
        let occurrences = count_occurrences(job_description, kw);
        suggestions.push(Suggestion {
            id: format!("keyword-{}", slug(kw)),
            kind: SuggestionKind::Keyword,
            severity: Severity::High,
            title: format!("Add \"{kw}\" to your resume"),
            description: format!(
                "The job description mentions \"{kw}\" {occurrences} time(s) but your resume \
                 never does"
            ),
            current: None,
            suggested: Some(format!(
                "Work \"{kw}\" into a bullet or your skills list where it is true of you"
            )),
            action: "add_keyword".to_string(),
        });
    }
}

fn push_skill_gap_suggestion(suggestions: &mut Vec<Suggestion>, skill_gaps: &[String]) {
    if skill_gaps.is_empty() {
        return;
    }
    let listed: Vec<&str> = skill_gaps
        .iter()
        .take(MAX_LISTED_SKILL_GAPS)
        .map(|s| s.as_str())
        .collect();
    suggestions.push(Suggestion {
        id: "skill-gap".to_string(),
        kind: SuggestionKind::Skill,
        severity: Severity::High,
        title: "Cover the required skills".to_string(),
        description: format!(
            "The posting asks for skills your resume does not list: {}",
            listed.join(", ")
        ),
        current: None,
        suggested: Some("Add the ones you genuinely have to your skills section".to_string()),
        action: "add_skills".to_string(),
    });
}

/// Inspects only the first bullet of the most recent position. Deliberately
/// narrow; the whole-resume scan feeds the strengths list instead.
fn push_achievement_suggestion(suggestions: &mut Vec<Suggestion>, resume: &ResumeData) {
    let first_bullet = resume
        .work_experience
        .first()
        .and_then(|w| w.description.first());

    if let Some(bullet) = first_bullet {
        if !QUANTIFIED_PATTERN.is_match(bullet) {
            suggestions.push(Suggestion {
                id: "achievement-quantify".to_string(),
                kind: SuggestionKind::Achievement,
                severity: Severity::Medium,
                title: "Quantify your most recent achievement".to_string(),
                description: "The lead bullet of your latest position has no measurable result"
                    .to_string(),
                current: Some(bullet.clone()),
                suggested: Some(format!(
                    "{}, improving X by N%",
                    bullet.trim_end_matches('.')
                )),
                action: "edit_bullet".to_string(),
            });
        }
    }
}

fn push_weak_phrase_suggestion(suggestions: &mut Vec<Suggestion>, resume: &ResumeData) {
    let all_bullets = resume
        .work_experience
        .iter()
        .flat_map(|w| w.description.iter())
        .map(|b| b.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");

    let found: Vec<&str> = WEAK_PHRASES
        .iter()
        .filter(|p| all_bullets.contains(**p))
        .copied()
        .collect();

    if !found.is_empty() {
        suggestions.push(Suggestion {
            id: "experience-verbs".to_string(),
            kind: SuggestionKind::Experience,
            severity: Severity::Medium,
            title: "Replace weak phrasing with action verbs".to_string(),
            description: format!(
                "Bullets using {} read as passive to recruiters",
                found
                    .iter()
                    .map(|p| format!("\"{p}\""))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            current: Some(found.join(", ")),
            suggested: Some("Lead with verbs like built, led, shipped, reduced".to_string()),
            action: "edit_bullets".to_string(),
        });
    }
}

fn push_summary_suggestion(suggestions: &mut Vec<Suggestion>, resume: &ResumeData) {
    let summary_len = resume
        .personal_info
        .summary
        .as_deref()
        .map(|s| s.trim().len())
        .unwrap_or(0);
    if summary_len >= 100 {
        return;
    }

    suggestions.push(Suggestion {
        id: "summary".to_string(),
        kind: SuggestionKind::Experience,
        severity: Severity::Low,
        title: "Strengthen your professional summary".to_string(),
        description: if summary_len == 0 {
            "Your resume has no summary".to_string()
        } else {
            format!("Your summary is only {summary_len} characters")
        },
        current: resume.personal_info.summary.clone(),
        suggested: Some(example_summary(resume)),
        action: "edit_summary".to_string(),
    });
}

/// Synthesizes an example summary from position count and leading skills.
fn example_summary(resume: &ResumeData) -> String {
    // Rough heuristic: two years per listed position.
    let years = resume.work_experience.len() * 2;
    let top_skills: Vec<&str> = resume
        .skills
        .iter()
        .take(3)
        .map(|s| s.name.as_str())
        .collect();
    let headline = resume
        .personal_info
        .headline
        .as_deref()
        .unwrap_or("Experienced professional");

    if top_skills.is_empty() {
        format!("{headline} with {years}+ years of hands-on experience delivering results")
    } else {
        format!(
            "{headline} with {years}+ years of experience in {}",
            top_skills.join(", ")
        )
    }
}

/// Strengths are independent of the job description.
fn collect_strengths(resume: &ResumeData) -> Vec<String> {
    let mut strengths = Vec::new();
    if resume.work_experience.len() >= 3 {
        strengths.push("Strong work history across multiple positions".to_string());
    }
    if !resume.education.is_empty() {
        strengths.push("Relevant education listed".to_string());
    }
    if resume.skills.len() >= 8 {
        strengths.push("Comprehensive skill set".to_string());
    }
    let quantified = resume
        .work_experience
        .iter()
        .flat_map(|w| w.description.iter())
        .any(|b| QUANTIFIED_PATTERN.is_match(b));
    if quantified {
        strengths.push("Quantified achievements".to_string());
    }
    strengths
}

/// Case-insensitive occurrence count of a literal keyword in the raw text.
fn count_occurrences(text: &str, keyword: &str) -> usize {
    match Regex::new(&format!("(?i){}", regex::escape(keyword))) {
        Ok(re) => re.find_iter(text).count(),
        Err(_) => 0,
    }
}

fn slug(keyword: &str) -> String {
    keyword
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{Education, PersonalInfo, Skill, WorkExperience};

    fn skill(id: &str, name: &str) -> Skill {
        Skill {
            id: id.to_string(),
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn job(id: &str, bullets: &[&str]) -> WorkExperience {
        WorkExperience {
            id: id.to_string(),
            company: "Acme".to_string(),
            position: "Engineer".to_string(),
            start_date: "2020-01".to_string(),
            end_date: Some("2023-01".to_string()),
            current: false,
            description: bullets.iter().map(|b| b.to_string()).collect(),
            achievements: vec![],
        }
    }

    #[test]
    fn test_sparse_resume_against_demanding_jd_scores_low() {
        let resume = ResumeData {
            skills: vec![skill("s1", "Git")],
            work_experience: vec![job("w1", &["Fixed bugs"])],
            ..Default::default()
        };
        let jd = "Seeking Kubernetes expert with 10+ years DevOps experience";

        let analysis = analyze_job_match(jd, &resume);
        assert!(analysis.score < 50, "score was {}", analysis.score);
        assert!(!analysis.missing_keywords.is_empty());
        assert!(analysis
            .missing_keywords
            .contains(&"kubernetes".to_string()));
    }

    #[test]
    fn test_well_matched_resume_scores_high() {
        let names = [
            "JavaScript",
            "TypeScript",
            "React",
            "Node.js",
            "PostgreSQL",
            "Docker",
            "AWS",
            "GraphQL",
        ];
        let resume = ResumeData {
            personal_info: PersonalInfo {
                summary: Some(
                    "Full-stack engineer with seven years of experience building and scaling \
                     production web platforms end to end across the stack."
                        .to_string(),
                ),
                ..Default::default()
            },
            skills: names
                .iter()
                .enumerate()
                .map(|(i, n)| skill(&format!("s{i}"), n))
                .collect(),
            work_experience: vec![
                job("w1", &["Increased checkout conversion 18% with React"]),
                job("w2", &["Reduced infra cost 30% by moving to Docker on AWS"]),
            ],
            ..Default::default()
        };
        let jd = "We need JavaScript, TypeScript, React, Node.js, PostgreSQL, Docker, AWS, \
                  and GraphQL experience";

        let analysis = analyze_job_match(jd, &resume);
        assert!(analysis.score > 50, "score was {}", analysis.score);
    }

    #[test]
    fn test_empty_job_description_still_scores_in_bounds() {
        let analysis = analyze_job_match("", &ResumeData::default());
        assert!(analysis.score <= 100);
        assert!(analysis.missing_keywords.is_empty());
    }

    #[test]
    fn test_missing_keywords_display_cap_is_ten() {
        // A JD that names far more vocabulary terms than any resume covers.
        let jd = "javascript typescript python java rust golang ruby php kotlin swift sql \
                  react angular vue docker kubernetes terraform aws azure gcp";
        let analysis = analyze_job_match(jd, &ResumeData::default());
        assert!(analysis.missing_keywords.len() <= 10);
        // The score must still reflect the full miss list, not the capped one.
        assert!(analysis.score < 40, "score was {}", analysis.score);
    }

    #[test]
    fn test_idempotent_for_identical_inputs() {
        let resume = ResumeData {
            skills: vec![skill("s1", "Rust")],
            work_experience: vec![job("w1", &["Responsible for maintenance"])],
            ..Default::default()
        };
        let jd = "Rust and Kubernetes required skills: Rust, Kubernetes";

        let a = serde_json::to_string(&analyze_job_match(jd, &resume)).unwrap();
        let b = serde_json::to_string(&analyze_job_match(jd, &resume)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_explicit_required_skills_list_is_parsed() {
        let jd = "A great role. Required skills: Rust, Kubernetes; Terraform";
        let keywords = extract_keywords(&jd.to_lowercase());
        let required = extract_required_skills(jd, &keywords);
        assert_eq!(required, vec!["Rust", "Kubernetes", "Terraform"]);
    }

    #[test]
    fn test_required_skills_fall_back_to_first_keywords() {
        let jd = "docker and kubernetes and terraform";
        let keywords = extract_keywords(&jd.to_lowercase());
        let required = extract_required_skills(jd, &keywords);
        assert_eq!(required.len(), keywords.len().min(5));
        assert!(!required.is_empty());
    }

    #[test]
    fn test_weak_phrases_trigger_experience_suggestion() {
        let resume = ResumeData {
            work_experience: vec![job(
                "w1",
                &["Increased revenue 12%", "Responsible for the build system"],
            )],
            ..Default::default()
        };
        let analysis = analyze_job_match("", &resume);
        assert!(analysis
            .suggestions
            .iter()
            .any(|s| s.kind == SuggestionKind::Experience && s.id == "experience-verbs"));
    }

    #[test]
    fn test_quantified_first_bullet_skips_achievement_suggestion() {
        let resume = ResumeData {
            work_experience: vec![job("w1", &["Improved throughput 3x", "Fixed bugs"])],
            ..Default::default()
        };
        let analysis = analyze_job_match("", &resume);
        assert!(!analysis
            .suggestions
            .iter()
            .any(|s| s.id == "achievement-quantify"));
    }

    #[test]
    fn test_only_first_bullet_of_first_entry_is_inspected() {
        // Quantified bullets further down do not satisfy the check.
        let resume = ResumeData {
            work_experience: vec![job("w1", &["Fixed bugs", "Improved throughput 3x"])],
            ..Default::default()
        };
        let analysis = analyze_job_match("", &resume);
        assert!(analysis
            .suggestions
            .iter()
            .any(|s| s.id == "achievement-quantify"));
        // ...but they do register as a strength.
        assert!(analysis
            .strengths
            .contains(&"Quantified achievements".to_string()));
    }

    #[test]
    fn test_no_work_experience_skips_bullet_checks() {
        let analysis = analyze_job_match("kubernetes", &ResumeData::default());
        assert!(!analysis
            .suggestions
            .iter()
            .any(|s| s.id == "achievement-quantify" || s.id == "experience-verbs"));
    }

    #[test]
    fn test_strengths_reflect_resume_shape() {
        let resume = ResumeData {
            work_experience: vec![
                job("w1", &["Improved x 10%"]),
                job("w2", &["b"]),
                job("w3", &["c"]),
            ],
            education: vec![Education {
                id: "e1".to_string(),
                institution: "UCL".to_string(),
                degree: "BSc".to_string(),
                ..Default::default()
            }],
            skills: (0..8)
                .map(|i| skill(&format!("s{i}"), &format!("Skill{i}")))
                .collect(),
            ..Default::default()
        };
        let analysis = analyze_job_match("", &resume);
        assert_eq!(analysis.strengths.len(), 4);
    }

    #[test]
    fn test_improvements_mirror_suggestion_titles() {
        let analysis = analyze_job_match("kubernetes required", &ResumeData::default());
        let titles: Vec<String> = analysis.suggestions.iter().map(|s| s.title.clone()).collect();
        assert_eq!(analysis.improvements, titles);
    }

    #[test]
    fn test_keyword_suggestion_counts_occurrences() {
        let jd = "Kubernetes first, kubernetes second, KUBERNETES third";
        let analysis = analyze_job_match(jd, &ResumeData::default());
        let kw = analysis
            .suggestions
            .iter()
            .find(|s| s.id == "keyword-kubernetes")
            .expect("keyword suggestion present");
        assert!(kw.description.contains("3 time(s)"));
    }

    #[test]
    fn test_score_bounds_hold_for_extremes() {
        let jd = "javascript typescript python java rust docker kubernetes aws azure gcp \
                  terraform ansible react angular vue sql";
        let analysis = analyze_job_match(jd, &ResumeData::default());
        assert!(analysis.score <= 100);
    }
}
