use crate::qr::{DEFAULT_ENDPOINT, DEFAULT_SIZE, RetryPolicy};
use crate::record::{DEFAULT_SCHEME, UriScheme};
use std::io;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Local,
    Remote,
}

/// Runtime settings, read from `QR_SHELF_*` environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub dir: PathBuf,
    pub scheme: UriScheme,
    pub backend: BackendKind,
    pub endpoint: String,
    pub size: u32,
    pub offline: bool,
    pub retry: RetryPolicy,
    pub use_color: bool,
}

impl Config {
    pub fn from_env() -> io::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> io::Result<Self> {
        let dir = match lookup("QR_SHELF_DIR") {
            Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => {
                let home = lookup("HOME").ok_or_else(|| {
                    io::Error::other("HOME not set; set QR_SHELF_DIR explicitly")
                })?;
                PathBuf::from(home).join(".qr_shelf")
            }
        };

        let scheme = lookup("QR_SHELF_SCHEME")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SCHEME.to_string());

        let backend = match lookup("QR_SHELF_BACKEND").as_deref().map(str::trim) {
            None | Some("") | Some("local") => BackendKind::Local,
            Some("remote") => BackendKind::Remote,
            Some(other) => {
                return Err(io::Error::other(format!(
                    "QR_SHELF_BACKEND must be local or remote, got `{other}`"
                )));
            }
        };

        let size = match lookup("QR_SHELF_SIZE") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                io::Error::other(format!("QR_SHELF_SIZE must be a number, got `{raw}`"))
            })?,
            None => DEFAULT_SIZE,
        };

        Ok(Self {
            dir,
            scheme: UriScheme::new(&scheme),
            backend,
            endpoint: lookup("QR_SHELF_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            size,
            offline: lookup("QR_SHELF_OFFLINE").is_some(),
            retry: RetryPolicy::default(),
            use_color: lookup("NO_COLOR").is_none(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(
        pairs: &[(&str, &str)],
    ) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_under_home() {
        let config = Config::from_lookup(lookup_from(&[("HOME", "/home/u")])).unwrap();
        assert_eq!(config.dir, PathBuf::from("/home/u/.qr_shelf"));
        assert_eq!(config.scheme.name(), "bilibili");
        assert_eq!(config.backend, BackendKind::Local);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.size, 240);
        assert!(!config.offline);
        assert!(config.use_color);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("QR_SHELF_DIR", "/tmp/shelf"),
            ("QR_SHELF_SCHEME", "app"),
            ("QR_SHELF_BACKEND", "remote"),
            ("QR_SHELF_SIZE", "120"),
            ("QR_SHELF_OFFLINE", "1"),
            ("NO_COLOR", "1"),
        ]))
        .unwrap();
        assert_eq!(config.dir, PathBuf::from("/tmp/shelf"));
        assert_eq!(config.scheme.root(), "app://");
        assert_eq!(config.backend, BackendKind::Remote);
        assert_eq!(config.size, 120);
        assert!(config.offline);
        assert!(!config.use_color);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Config::from_lookup(lookup_from(&[])).is_err());
        assert!(
            Config::from_lookup(lookup_from(&[("HOME", "/h"), ("QR_SHELF_BACKEND", "fax")]))
                .is_err()
        );
        assert!(
            Config::from_lookup(lookup_from(&[("HOME", "/h"), ("QR_SHELF_SIZE", "big")]))
                .is_err()
        );
    }
}
