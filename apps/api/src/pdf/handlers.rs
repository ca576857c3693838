//! The public download endpoint.
//!
//! Order of operations: rate limit, lookup, cache consult, render under a
//! hard timeout, cache store, respond. Analytics and the download counter
//! run on both hit and miss paths, but only with explicit consent, and
//! always fire-and-forget.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{header, HeaderMap, HeaderName, HeaderValue},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::analytics::{consent_granted, record_download};
use crate::errors::AppError;
use crate::models::resume::{PersonalInfo, ResumeRow};
use crate::pdf::cache::{CachedPdf, PdfCache};
use crate::ratelimit::client_ip;
use crate::state::AppState;

static X_CACHE: HeaderName = HeaderName::from_static("x-cache");

const MAX_NAME_PART_LEN: usize = 50;

/// POST /api/public/:username/:slug/download
pub async fn handle_download(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Path((username, slug)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let ip = client_ip(&headers, addr.ip());
    if !state.rate_limiter.lock().await.check(ip) {
        warn!("download rate limit exceeded for {ip}");
        return Err(AppError::RateLimited);
    }

    // One generic 404 for both "unknown" and "private"; the endpoint must not
    // reveal which.
    let resume = sqlx::query_as::<_, ResumeRow>(
        "SELECT * FROM resumes WHERE username = $1 AND slug = $2 AND is_public = TRUE",
    )
    .bind(&username)
    .bind(&slug)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound("Resume not found".to_string()))?;

    let key = PdfCache::make_key(resume.id, &resume.template_id, &resume.customization);

    if let Some(hit) = state.pdf_cache.lock().await.get(&key) {
        info!("pdf cache hit for {username}/{slug}");
        if consent_granted(&headers) {
            record_download(state.db.clone(), resume.id, true);
        }
        return Ok(pdf_response(hit.bytes, &hit.file_name, true));
    }

    let data = resume.resume_data().map_err(|e| {
        AppError::Internal(anyhow::anyhow!("corrupt resume snapshot {}: {e}", resume.id))
    })?;

    let rendered = match tokio::time::timeout(
        state.config.pdf_timeout,
        state.renderer.render(&data, &resume.template_id),
    )
    .await
    {
        Ok(result) => result?,
        Err(_) => {
            warn!(
                "pdf render timed out after {:?} for {username}/{slug}",
                state.config.pdf_timeout
            );
            return Err(AppError::PdfTimeout);
        }
    };

    let file_name = download_file_name(&data.personal_info);
    state.pdf_cache.lock().await.set(
        key,
        CachedPdf {
            bytes: rendered.bytes.clone(),
            file_name: file_name.clone(),
            created_at: Instant::now(),
        },
    );
    info!("pdf rendered and cached for {username}/{slug}");

    if consent_granted(&headers) {
        record_download(state.db.clone(), resume.id, false);
    }
    Ok(pdf_response(rendered.bytes, &file_name, false))
}

fn pdf_response(bytes: Bytes, file_name: &str, cache_hit: bool) -> Response {
    let disposition = format!("attachment; filename=\"{file_name}\"");
    let mut response = (
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (
                header::CONTENT_DISPOSITION,
                HeaderValue::from_str(&disposition)
                    .unwrap_or_else(|_| HeaderValue::from_static("attachment")),
            ),
        ],
        bytes,
    )
        .into_response();
    response.headers_mut().insert(
        X_CACHE.clone(),
        HeaderValue::from_static(if cache_hit { "HIT" } else { "MISS" }),
    );
    response
}

/// "First_Last_Resume.pdf" from whatever name parts exist; "Resume.pdf" when
/// none survive sanitization.
pub fn download_file_name(info: &PersonalInfo) -> String {
    let parts: Vec<String> = [&info.first_name, &info.last_name]
        .into_iter()
        .map(|p| sanitize_name_part(p))
        .filter(|p| !p.is_empty())
        .collect();

    if parts.is_empty() {
        "Resume.pdf".to_string()
    } else {
        format!("{}_Resume.pdf", parts.join("_"))
    }
}

/// Keeps `[A-Za-z0-9_-]`, mapping everything else to underscores, then
/// collapses runs, trims edge underscores, and truncates.
fn sanitize_name_part(part: &str) -> String {
    let mut out = String::with_capacity(part.len());
    let mut last_was_underscore = false;
    for c in part.chars() {
        let mapped = if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' };
        if mapped == '_' {
            if last_was_underscore {
                continue;
            }
            last_was_underscore = true;
        } else {
            last_was_underscore = false;
        }
        out.push(mapped);
    }
    let trimmed = out.trim_matches('_');
    trimmed.chars().take(MAX_NAME_PART_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(first: &str, last: &str) -> PersonalInfo {
        PersonalInfo {
            first_name: first.to_string(),
            last_name: last.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_plain_names_pass_through() {
        assert_eq!(download_file_name(&info("Ada", "Lovelace")), "Ada_Lovelace_Resume.pdf");
    }

    #[test]
    fn test_spaces_and_punctuation_become_single_underscores() {
        assert_eq!(
            download_file_name(&info("Mary Jane", "O'Brien")),
            "Mary_Jane_O_Brien_Resume.pdf"
        );
    }

    #[test]
    fn test_missing_names_fall_back() {
        assert_eq!(download_file_name(&info("", "")), "Resume.pdf");
        assert_eq!(download_file_name(&info("!!!", "###")), "Resume.pdf");
    }

    #[test]
    fn test_single_name_part_is_enough() {
        assert_eq!(download_file_name(&info("Cher", "")), "Cher_Resume.pdf");
    }

    #[test]
    fn test_name_parts_truncate_at_fifty() {
        let long = "a".repeat(80);
        let name = download_file_name(&info(&long, ""));
        assert_eq!(name, format!("{}_Resume.pdf", "a".repeat(50)));
    }

    #[test]
    fn test_edge_underscores_are_trimmed() {
        assert_eq!(sanitize_name_part("  Ada  "), "Ada");
        assert_eq!(sanitize_name_part("__Ada__"), "Ada");
        assert_eq!(sanitize_name_part("A__d___a"), "A_d_a");
    }

    #[test]
    fn test_hyphens_survive_sanitization() {
        assert_eq!(sanitize_name_part("Jean-Luc"), "Jean-Luc");
    }
}
