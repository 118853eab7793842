//! One-shot HTTP GET with fixed timeouts and a bounded body.

use reqwest::{Client, header};
use tokio::task::JoinHandle;

use crate::{Result, config::SyncConfig, error::Error};

/// Sent as the request `Content-Type`. The upstream service has always been
/// called with it; nothing downstream depends on it.
pub const REQUEST_CONTENT_TYPE: &str = "application/x-java-serialized-object";

// ─── Listener ────────────────────────────────────────────────────────────────

/// Completion callbacks for [`HttpFetcher::send_request`]. Exactly one of the
/// two methods is called per request.
pub trait FetchListener: Send + Sync + 'static {
  fn on_finish(&self, response: String);
  fn on_error(&self, error: Error);
}

// ─── Fetcher ─────────────────────────────────────────────────────────────────

/// Performs single GET requests against the weather service.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
///
/// There is no retry and no status-code branching: whatever body comes back,
/// 200 or not, is handed to the caller. At most `max_body_bytes` of it are
/// kept; longer bodies are truncated and decoded lossily.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
  client:         Client,
  max_body_bytes: usize,
}

impl HttpFetcher {
  pub fn new(config: &SyncConfig) -> Result<Self> {
    let client = Client::builder()
      .connect_timeout(config.connect_timeout())
      .read_timeout(config.read_timeout())
      .build()?;
    Ok(Self { client, max_body_bytes: config.max_body_bytes })
  }

  /// GET `url` and return up to `max_body_bytes` of its body as text.
  pub async fn fetch(&self, url: &str) -> Result<String> {
    let mut resp = self
      .client
      .get(url)
      .header(header::CONTENT_TYPE, REQUEST_CONTENT_TYPE)
      .send()
      .await?;
    let status = resp.status();

    let mut body = Vec::new();
    while body.len() < self.max_body_bytes {
      match resp.chunk().await? {
        Some(chunk) => body.extend_from_slice(&chunk),
        None => break,
      }
    }
    if body.len() >= self.max_body_bytes {
      body.truncate(self.max_body_bytes);
      tracing::debug!(url, limit = self.max_body_bytes, "response body truncated");
    }

    tracing::debug!(url, %status, bytes = body.len(), "fetched");
    Ok(String::from_utf8_lossy(&body).into_owned())
  }

  /// Fetch `url` on a background task and report to `listener`.
  ///
  /// The returned handle may be dropped; the request still runs to
  /// completion or failure.
  pub fn send_request<L: FetchListener>(
    &self,
    url: impl Into<String>,
    listener: L,
  ) -> JoinHandle<()> {
    let fetcher = self.clone();
    let url = url.into();
    tokio::spawn(async move {
      match fetcher.fetch(&url).await {
        Ok(body) => listener.on_finish(body),
        Err(e) => {
          tracing::warn!(%url, error = %e, "request failed");
          listener.on_error(e);
        }
      }
    })
  }
}
