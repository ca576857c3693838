//! PDF rendering seam.
//!
//! `AppState` holds an `Arc<dyn PdfRenderer>`, so backends can be swapped
//! without touching the endpoint or handler code. The default backend builds
//! a single-page summary document with lopdf. Template visual styling is out
//! of scope; every template id renders through the same layout and only
//! participates in document metadata and cache keys.

use async_trait::async_trait;
use bytes::Bytes;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};

use crate::errors::AppError;
use crate::models::resume::ResumeData;

/// A finished render. File naming is the caller's concern; the renderer only
/// produces bytes.
#[derive(Debug, Clone)]
pub struct RenderedPdf {
    pub bytes: Bytes,
}

#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render(&self, resume: &ResumeData, template_id: &str)
        -> Result<RenderedPdf, AppError>;
}

/// Default lopdf backend. Layout is CPU-bound, so it runs inside
/// `tokio::task::spawn_blocking`.
pub struct LopdfRenderer;

#[async_trait]
impl PdfRenderer for LopdfRenderer {
    async fn render(
        &self,
        resume: &ResumeData,
        template_id: &str,
    ) -> Result<RenderedPdf, AppError> {
        let resume = resume.clone();
        let template_id = template_id.to_string();
        let bytes = tokio::task::spawn_blocking(move || build_document(&resume, &template_id))
            .await
            .map_err(|e| AppError::Pdf(format!("render task failed: {e}")))??;
        Ok(RenderedPdf {
            bytes: Bytes::from(bytes),
        })
    }
}

// US letter, 1" margins.
const PAGE_WIDTH: i64 = 612;
const PAGE_HEIGHT: i64 = 792;
const MARGIN: f32 = 72.0;

const NAME_SIZE: f32 = 20.0;
const HEADING_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 10.0;
const LEADING: f32 = 14.0;

struct Line {
    text: String,
    size: f32,
    bold: bool,
    gap_before: f32,
}

fn build_document(resume: &ResumeData, template_id: &str) -> Result<Vec<u8>, AppError> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });

    let content = layout_content(resume);
    let content_id = doc.add_object(Stream::new(
        Dictionary::new(),
        content
            .encode()
            .map_err(|e| AppError::Pdf(format!("content stream encoding failed: {e}")))?,
    ));

    let resources = dictionary! {
        "Font" => dictionary! {
            "F1" => Object::Reference(regular_id),
            "F2" => Object::Reference(bold_id),
        },
    };

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => Object::Reference(pages_id),
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        "Resources" => resources,
        "Contents" => Object::Reference(content_id),
    });

    let pages = dictionary! {
        "Type" => "Pages",
        "Count" => 1,
        "Kids" => vec![Object::Reference(page_id)],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(document_title(resume)),
        "Creator" => Object::string_literal(format!("vitae ({template_id})")),
    });
    doc.trailer.set("Info", Object::Reference(info_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| AppError::Pdf(format!("PDF serialization failed: {e}")))?;
    Ok(buffer)
}

fn document_title(resume: &ResumeData) -> String {
    let info = &resume.personal_info;
    let name = format!("{} {}", info.first_name, info.last_name);
    let name = name.trim();
    if name.is_empty() {
        "Resume".to_string()
    } else {
        format!("{name} Resume")
    }
}

/// Lays the resume out as a flat run of text lines and encodes them as one
/// content stream. Lines that would fall below the bottom margin are dropped
/// (single-page summary, not a paginated renderer).
fn layout_content(resume: &ResumeData) -> Content {
    let mut operations = vec![Operation::new("BT", vec![])];
    let mut cursor = PAGE_HEIGHT as f32 - MARGIN;

    for line in collect_lines(resume) {
        cursor -= line.gap_before + LEADING;
        if cursor < MARGIN {
            break;
        }
        let font = if line.bold { "F2" } else { "F1" };
        operations.push(Operation::new(
            "Tf",
            vec![Object::Name(font.into()), line.size.into()],
        ));
        operations.push(Operation::new(
            "Td",
            vec![MARGIN.into(), cursor.into()],
        ));
        operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(sanitize_text(&line.text))],
        ));
        // Reset the text matrix so each line positions absolutely.
        operations.push(Operation::new("ET", vec![]));
        operations.push(Operation::new("BT", vec![]));
    }

    operations.push(Operation::new("ET", vec![]));
    Content { operations }
}

fn collect_lines(resume: &ResumeData) -> Vec<Line> {
    let info = &resume.personal_info;
    let mut lines = Vec::new();

    let name = format!("{} {}", info.first_name, info.last_name)
        .trim()
        .to_string();
    if !name.is_empty() {
        lines.push(heading(&name, NAME_SIZE, 0.0));
    }

    let contact: Vec<&str> = [
        info.email.as_str(),
        info.phone.as_str(),
        info.location.as_str(),
    ]
    .into_iter()
    .filter(|s| !s.trim().is_empty())
    .collect();
    if !contact.is_empty() {
        lines.push(body(&contact.join("  |  "), 2.0));
    }

    if let Some(summary) = info.summary.as_deref().filter(|s| !s.trim().is_empty()) {
        lines.push(heading("Summary", HEADING_SIZE, 10.0));
        lines.push(body(summary, 0.0));
    }

    if !resume.work_experience.is_empty() {
        lines.push(heading("Experience", HEADING_SIZE, 10.0));
        for work in &resume.work_experience {
            let end = if work.current {
                "Present"
            } else {
                work.end_date.as_deref().unwrap_or("")
            };
            lines.push(Line {
                text: format!(
                    "{} at {}  ({} - {})",
                    work.position, work.company, work.start_date, end
                ),
                size: BODY_SIZE,
                bold: true,
                gap_before: 4.0,
            });
            for bullet in work.description.iter().filter(|b| !b.trim().is_empty()) {
                lines.push(body(&format!("- {bullet}"), 0.0));
            }
        }
    }

    if !resume.education.is_empty() {
        lines.push(heading("Education", HEADING_SIZE, 10.0));
        for edu in &resume.education {
            let degree = [edu.degree.as_str(), edu.field.as_str()]
                .into_iter()
                .filter(|s| !s.trim().is_empty())
                .collect::<Vec<_>>()
                .join(", ");
            lines.push(body(&format!("{} - {}", edu.institution, degree), 2.0));
        }
    }

    if !resume.skills.is_empty() {
        lines.push(heading("Skills", HEADING_SIZE, 10.0));
        let names: Vec<&str> = resume.skills.iter().map(|s| s.name.as_str()).collect();
        lines.push(body(&names.join(", "), 0.0));
    }

    lines
}

fn heading(text: &str, size: f32, gap_before: f32) -> Line {
    Line {
        text: text.to_string(),
        size,
        bold: true,
        gap_before,
    }
}

fn body(text: &str, gap_before: f32) -> Line {
    Line {
        text: text.to_string(),
        size: BODY_SIZE,
        bold: false,
        gap_before,
    }
}

/// The built-in Type1 fonts only cover WinAnsi; anything outside printable
/// ASCII is substituted rather than emitted as garbage.
fn sanitize_text(text: &str) -> String {
    text.chars()
        .map(|c| if (' '..='~').contains(&c) { c } else { '?' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{PersonalInfo, Skill, WorkExperience};

    fn sample_resume() -> ResumeData {
        ResumeData {
            personal_info: PersonalInfo {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                phone: "+44 1234".to_string(),
                summary: Some("Engineer and analyst.".to_string()),
                ..Default::default()
            },
            work_experience: vec![WorkExperience {
                id: "w1".to_string(),
                company: "Analytical Engines Ltd".to_string(),
                position: "Programmer".to_string(),
                start_date: "1842".to_string(),
                end_date: None,
                current: true,
                description: vec!["Wrote the first published algorithm".to_string()],
                achievements: vec![],
            }],
            skills: vec![Skill {
                id: "s1".to_string(),
                name: "Mathematics".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_build_document_produces_valid_pdf_bytes() {
        let bytes = build_document(&sample_resume(), "classic").unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(bytes.windows(5).any(|w| w == b"%%EOF"));
    }

    #[test]
    fn test_empty_resume_still_renders() {
        let bytes = build_document(&ResumeData::default(), "classic").unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_document_title_falls_back_without_name() {
        assert_eq!(document_title(&ResumeData::default()), "Resume");
        assert_eq!(document_title(&sample_resume()), "Ada Lovelace Resume");
    }

    #[test]
    fn test_layout_includes_section_lines() {
        let lines = collect_lines(&sample_resume());
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert!(texts.contains(&"Ada Lovelace"));
        assert!(texts.contains(&"Experience"));
        assert!(texts.contains(&"Skills"));
        assert!(texts.iter().any(|t| t.contains("Present")));
    }

    #[test]
    fn test_sanitize_text_replaces_non_ascii() {
        assert_eq!(sanitize_text("naïve café"), "na?ve caf?");
        assert_eq!(sanitize_text("plain"), "plain");
    }

    #[tokio::test]
    async fn test_renderer_trait_returns_bytes() {
        let rendered = LopdfRenderer
            .render(&sample_resume(), "classic")
            .await
            .unwrap();
        assert!(rendered.bytes.starts_with(b"%PDF-"));
    }
}
