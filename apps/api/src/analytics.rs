//! Consent-gated, fire-and-forget download analytics.
//!
//! Nothing is recorded unless the consent cookie carries the literal
//! granted value; absence or any other value silently skips tracking.
//! Failures are logged server-side and never reach the response path.

use axum::http::{header, HeaderMap};
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

/// Cookie that must carry [`CONSENT_GRANTED`] before anything is recorded.
pub const CONSENT_COOKIE: &str = "vitae-analytics-consent";
pub const CONSENT_GRANTED: &str = "granted";

/// True iff the request's Cookie header grants analytics consent.
pub fn consent_granted(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .any(|(name, value)| name == CONSENT_COOKIE && value == CONSENT_GRANTED)
}

/// Records a download event and bumps the resume's counter. Spawned so the
/// response never waits on (or fails because of) the analytics write.
pub fn record_download(db: PgPool, resume_id: Uuid, cache_hit: bool) {
    tokio::spawn(async move {
        if let Err(e) = insert_event(&db, resume_id, cache_hit).await {
            warn!("analytics write failed for resume {resume_id}: {e}");
        }
    });
}

async fn insert_event(db: &PgPool, resume_id: Uuid, cache_hit: bool) -> anyhow::Result<()> {
    sqlx::query("INSERT INTO download_events (resume_id, cache_hit) VALUES ($1, $2)")
        .bind(resume_id)
        .bind(cache_hit)
        .execute(db)
        .await?;

    sqlx::query("UPDATE resumes SET download_count = download_count + 1 WHERE id = $1")
        .bind(resume_id)
        .execute(db)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_cookie(cookie: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static(cookie));
        headers
    }

    #[test]
    fn test_granted_cookie_enables_tracking() {
        let headers = headers_with_cookie("vitae-analytics-consent=granted");
        assert!(consent_granted(&headers));
    }

    #[test]
    fn test_granted_among_other_cookies() {
        let headers =
            headers_with_cookie("theme=dark; vitae-analytics-consent=granted; lang=en");
        assert!(consent_granted(&headers));
    }

    #[test]
    fn test_non_granted_values_are_ignored() {
        assert!(!consent_granted(&headers_with_cookie(
            "vitae-analytics-consent=denied"
        )));
        assert!(!consent_granted(&headers_with_cookie(
            "vitae-analytics-consent="
        )));
    }

    #[test]
    fn test_missing_cookie_means_no_consent() {
        assert!(!consent_granted(&HeaderMap::new()));
        assert!(!consent_granted(&headers_with_cookie("theme=dark")));
    }
}
