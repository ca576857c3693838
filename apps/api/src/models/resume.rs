#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A stored resume. `data` carries the full [`ResumeData`] snapshot as JSONB;
/// `customization` carries per-template overrides (colors, fonts, spacing).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub slug: String,
    pub is_public: bool,
    pub template_id: String,
    pub customization: Value,
    pub data: Value,
    pub download_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ResumeRow {
    /// Deserializes the JSONB snapshot into a typed [`ResumeData`].
    pub fn resume_data(&self) -> Result<ResumeData, serde_json::Error> {
        serde_json::from_value(self.data.clone())
    }
}

/// The full resume snapshot as edited by the client.
///
/// Treated as an immutable value: every edit replaces the whole snapshot,
/// never mutates in place. Entry ids are unique within their list for the
/// lifetime of a snapshot and are never reused.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeData {
    #[serde(default)]
    pub personal_info: PersonalInfo,
    #[serde(default)]
    pub work_experience: Vec<WorkExperience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub languages: Vec<Language>,
    #[serde(default)]
    pub certifications: Vec<Certification>,
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub hobbies: Vec<Hobby>,
    #[serde(default)]
    pub extra_curricular: Vec<Activity>,
    #[serde(default)]
    pub custom_sections: Vec<CustomSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub location: String,
    pub headline: Option<String>,
    pub summary: Option<String>,
}

/// A work history entry. `current: true` means the position is ongoing and
/// any stored `end_date` is ignored by formatting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkExperience {
    pub id: String,
    pub company: String,
    pub position: String,
    #[serde(default)]
    pub start_date: String,
    pub end_date: Option<String>,
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub description: Vec<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub id: String,
    pub institution: String,
    pub degree: String,
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub start_date: String,
    pub end_date: Option<String>,
    #[serde(default)]
    pub current: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub level: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Language {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub proficiency: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Certification {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub issuer: String,
    #[serde(default)]
    pub date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hobby {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub organization: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub description: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomSection {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resume_data_deserializes_from_partial_json() {
        let json = r#"{
            "personal_info": { "first_name": "Ada", "email": "ada@example.com" },
            "skills": [{ "id": "s1", "name": "Rust" }]
        }"#;
        let data: ResumeData = serde_json::from_str(json).unwrap();
        assert_eq!(data.personal_info.first_name, "Ada");
        assert_eq!(data.skills.len(), 1);
        assert!(data.work_experience.is_empty());
        assert!(data.personal_info.summary.is_none());
    }

    #[test]
    fn test_resume_data_round_trips() {
        let mut data = ResumeData::default();
        data.personal_info.first_name = "Grace".to_string();
        data.work_experience.push(WorkExperience {
            id: "w1".to_string(),
            company: "Navy".to_string(),
            position: "Programmer".to_string(),
            start_date: "1944-01".to_string(),
            end_date: None,
            current: true,
            description: vec!["Built the first compiler".to_string()],
            achievements: vec![],
        });

        let json = serde_json::to_string(&data).unwrap();
        let back: ResumeData = serde_json::from_str(&json).unwrap();
        assert_eq!(back, data);
    }
}
