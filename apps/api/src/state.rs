use std::collections::HashMap;
use std::sync::Arc;

use sqlx::PgPool;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::Config;
use crate::editor::session::DraftSession;
use crate::models::resume::ResumeData;
use crate::pdf::cache::PdfCache;
use crate::pdf::PdfRenderer;
use crate::ratelimit::RateLimiter;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Pluggable PDF backend. Default: LopdfRenderer.
    pub renderer: Arc<dyn PdfRenderer>,
    /// Response cache for rendered PDFs; prune-then-evict is read-modify-write,
    /// so every access goes through the mutex.
    pub pdf_cache: Arc<Mutex<PdfCache>>,
    pub rate_limiter: Arc<Mutex<RateLimiter>>,
    /// In-memory draft sessions keyed by resume id. The mutex is the single
    /// writer each session requires.
    pub drafts: Arc<Mutex<HashMap<Uuid, DraftSession<ResumeData>>>>,
}

impl AppState {
    pub fn new(db: PgPool, config: Config, renderer: Arc<dyn PdfRenderer>) -> Self {
        let pdf_cache = PdfCache::new(config.pdf_cache_ttl, config.pdf_cache_max_entries);
        let rate_limiter = RateLimiter::new(
            config.rate_limit_max_requests,
            config.rate_limit_window,
        );
        Self {
            db,
            config,
            renderer,
            pdf_cache: Arc::new(Mutex::new(pdf_cache)),
            rate_limiter: Arc::new(Mutex::new(rate_limiter)),
            drafts: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}
