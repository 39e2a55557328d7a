//! Spell validation against an external checker service.
//!
//! The checker is reached with one HTTP GET per text field, passing the
//! text as a query parameter. It answers with a JSON array of correction
//! groups, one per flagged span, each optionally carrying replacement
//! suggestions. This is a best-effort advisory check, not a security
//! boundary: an unreachable, slow, or garbled checker must fail the request
//! cleanly as [`JotError::SpellerUnavailable`], never crash it.

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::error::{JotError, Result};

/// Outcome of checking one text field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected { suggestion: String },
}

/// One flagged span in the checker's response. Only the replacement
/// suggestions matter for the accept/reject decision; everything else the
/// checker sends (position, error code) is ignored.
///
/// The wire field is `s` on the real service; `suggestions` is accepted too.
#[derive(Debug, Deserialize)]
pub struct CorrectionGroup {
    #[serde(default, alias = "s")]
    pub suggestions: Vec<String>,
}

/// Seam between the service layer and the external checker, so tests can
/// script accept/reject/unavailable outcomes without a network.
pub trait Validator: Send + Sync {
    fn check(&self, text: &str) -> impl Future<Output = Result<Verdict>> + Send;
}

/// Production validator backed by the configured HTTP endpoint.
pub struct SpellClient {
    http: reqwest::Client,
    url: String,
}

impl SpellClient {
    /// `timeout` bounds each check call end to end; on expiry the check
    /// fails as unavailable instead of hanging the request.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }
}

impl Validator for SpellClient {
    async fn check(&self, text: &str) -> Result<Verdict> {
        let response = self
            .http
            .get(&self.url)
            .query(&[("text", text)])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                warn!("speller request failed: {e}");
                JotError::SpellerUnavailable
            })?;

        let groups: Vec<CorrectionGroup> = response.json().await.map_err(|e| {
            warn!("speller returned malformed data: {e}");
            JotError::SpellerUnavailable
        })?;

        Ok(verdict(groups))
    }
}

/// Decision rule: reject only when the response is non-empty and the
/// *first* group carries at least one suggestion, surfacing that first
/// suggestion. Groups beyond the first are ignored.
fn verdict(groups: Vec<CorrectionGroup>) -> Verdict {
    match groups
        .into_iter()
        .next()
        .and_then(|g| g.suggestions.into_iter().next())
    {
        Some(suggestion) => Verdict::Rejected { suggestion },
        None => Verdict::Accepted,
    }
}
