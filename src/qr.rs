//! QR rendering backends.
//!
//! The core only needs "given a payload, eventually a symbol or a failure".
//! `LocalBackend` encodes in-process; `RemoteBackend` asks an image service
//! and retries with a linear backoff, giving up at once when the network is
//! known to be unreachable.

use qrcode::render::unicode;
use qrcode::{EcLevel, QrCode};
use std::io::Read;
use std::thread;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://api.2dcode.biz/v1/create-qr-code";
pub const DEFAULT_SIZE: u32 = 240;
const MAX_IMAGE_BYTES: u64 = 4 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    /// Terminal-ready block characters.
    Text(String),
    /// Encoded image bytes as returned by the remote service.
    Image { url: String, bytes: Vec<u8> },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QrError {
    #[error("network unavailable")]
    Offline,
    #[error("failed after {attempts} attempt(s): {last}")]
    Exhausted { attempts: u32, last: String },
    #[error("cannot encode payload: {0}")]
    Encode(String),
}

pub trait QrBackend {
    fn render(&self, payload: &str) -> Result<Symbol, QrError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalBackend;

impl QrBackend for LocalBackend {
    fn render(&self, payload: &str) -> Result<Symbol, QrError> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::H)
            .map_err(|e| QrError::Encode(e.to_string()))?;
        let text = code
            .render::<unicode::Dense1x2>()
            .dark_color(unicode::Dense1x2::Light)
            .light_color(unicode::Dense1x2::Dark)
            .build();
        Ok(Symbol::Text(text))
    }
}

/// Fetches raw image bytes for a URL; any non-success is an `Err`.
pub trait ImageFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, String>;
}

pub trait Reachability {
    fn is_online(&self) -> bool;
}

/// Reachability decided up front, e.g. from configuration.
#[derive(Debug, Clone, Copy)]
pub struct KnownReachability(pub bool);

impl Reachability for KnownReachability {
    fn is_online(&self) -> bool {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self { agent: ureq::AgentBuilder::new().timeout(timeout).build() }
    }
}

impl ImageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, String> {
        let response = self.agent.get(url).call().map_err(|e| e.to_string())?;
        let mut bytes = Vec::new();
        response
            .into_reader()
            .take(MAX_IMAGE_BYTES)
            .read_to_end(&mut bytes)
            .map_err(|e| e.to_string())?;
        if bytes.is_empty() {
            return Err("empty response body".to_string());
        }
        Ok(bytes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Delay before retry `n` is `base_delay * n`.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 3, base_delay: Duration::from_secs(1) }
    }
}

impl RetryPolicy {
    pub fn delay_before_retry(&self, retry: u32) -> Duration {
        self.base_delay * retry
    }
}

pub struct RemoteBackend<F, R> {
    endpoint: String,
    size: u32,
    fetcher: F,
    reachability: R,
    retry: RetryPolicy,
}

impl<F: ImageFetcher, R: Reachability> RemoteBackend<F, R> {
    pub fn new(
        endpoint: &str,
        size: u32,
        fetcher: F,
        reachability: R,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            size,
            fetcher,
            reachability,
            retry,
        }
    }

    pub fn url_for(&self, payload: &str) -> String {
        format!(
            "{}?data={}&size={}x{}",
            self.endpoint,
            urlencoding::encode(payload),
            self.size,
            self.size
        )
    }
}

impl<F: ImageFetcher, R: Reachability> QrBackend for RemoteBackend<F, R> {
    fn render(&self, payload: &str) -> Result<Symbol, QrError> {
        if !self.reachability.is_online() {
            return Err(QrError::Offline);
        }
        let url = self.url_for(payload);
        let attempts = self.retry.max_attempts.max(1);
        let mut last = String::new();
        for attempt in 1..=attempts {
            if attempt > 1 {
                thread::sleep(self.retry.delay_before_retry(attempt - 1));
            }
            match self.fetcher.fetch(&url) {
                Ok(bytes) => return Ok(Symbol::Image { url, bytes }),
                Err(err) => {
                    tracing::warn!(attempt, attempts, %err, "qr image fetch failed");
                    last = err;
                }
            }
        }
        Err(QrError::Exhausted { attempts, last })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Flaky {
        failures: u32,
        calls: Cell<u32>,
    }

    impl ImageFetcher for Flaky {
        fn fetch(&self, _url: &str) -> Result<Vec<u8>, String> {
            let n = self.calls.get() + 1;
            self.calls.set(n);
            if n <= self.failures {
                Err(format!("boom {n}"))
            } else {
                Ok(vec![0x89, b'P', b'N', b'G'])
            }
        }
    }

    fn fast() -> RetryPolicy {
        RetryPolicy { max_attempts: 3, base_delay: Duration::ZERO }
    }

    fn remote(failures: u32, online: bool) -> RemoteBackend<Flaky, KnownReachability> {
        RemoteBackend::new(
            DEFAULT_ENDPOINT,
            DEFAULT_SIZE,
            Flaky { failures, calls: Cell::new(0) },
            KnownReachability(online),
            fast(),
        )
    }

    #[test]
    fn test_local_backend_renders_blocks() {
        let symbol = LocalBackend.render("bilibili://video/12345").unwrap();
        match symbol {
            Symbol::Text(text) => {
                assert!(text.lines().count() > 10);
                assert!(text.contains('█') || text.contains('▀') || text.contains('▄'));
            }
            other => panic!("unexpected symbol {other:?}"),
        }
    }

    #[test]
    fn test_local_backend_rejects_oversized_payload() {
        let huge = "x".repeat(8000);
        assert!(matches!(LocalBackend.render(&huge), Err(QrError::Encode(_))));
    }

    #[test]
    fn test_url_encodes_payload_and_size() {
        let backend = remote(0, true);
        assert_eq!(
            backend.url_for("bilibili://video/1 2"),
            "https://api.2dcode.biz/v1/create-qr-code?data=bilibili%3A%2F%2Fvideo%2F1%202&size=240x240"
        );
    }

    #[test]
    fn test_retries_until_success() {
        let backend = remote(2, true);
        let symbol = backend.render("x").unwrap();
        assert!(matches!(symbol, Symbol::Image { .. }));
        assert_eq!(backend.fetcher.calls.get(), 3);
    }

    #[test]
    fn test_gives_up_after_bound() {
        let backend = remote(10, true);
        let err = backend.render("x").unwrap_err();
        assert_eq!(
            err,
            QrError::Exhausted { attempts: 3, last: "boom 3".to_string() }
        );
        assert_eq!(backend.fetcher.calls.get(), 3);
    }

    #[test]
    fn test_offline_short_circuits() {
        let backend = remote(0, false);
        assert_eq!(backend.render("x").unwrap_err(), QrError::Offline);
        assert_eq!(backend.fetcher.calls.get(), 0);
    }

    #[test]
    fn test_backoff_is_linear() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_before_retry(1), Duration::from_secs(1));
        assert_eq!(policy.delay_before_retry(2), Duration::from_secs(2));
    }
}
