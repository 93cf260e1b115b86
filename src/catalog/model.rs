use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_CIPHER_FORMAT: &str = "openssl";

/// The Mozilla Server Side TLS guideline document.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Guidelines {
    pub version: serde_json::Number,

    #[serde(default)]
    pub href: Option<String>,

    pub configurations: BTreeMap<String, GuidelineConfiguration>,
}

/// Recommendations for one configuration level (modern, intermediate, old).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GuidelineConfiguration {
    pub tls_versions: Vec<String>,

    /// Cipher lists keyed by cipher-list format (`openssl`, `iana`, ...)
    pub ciphers: BTreeMap<String, Vec<String>>,

    /// TLS 1.3 suites, identical for every format
    pub ciphersuites: Vec<String>,

    pub hsts_min_age: u64,

    pub oldest_clients: Vec<String>,

    #[serde(default)]
    pub dh_param_size: Option<u32>,

    pub server_preferred_order: bool,
}

fn default_true() -> bool {
    true
}

fn default_cipher_format() -> String {
    DEFAULT_CIPHER_FORMAT.to_string()
}

/// Capabilities of one server software, as listed in `configs.js`.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ServerProfile {
    pub name: String,

    pub latest_version: String,

    /// First server version able to negotiate TLS 1.3, `None` if it never does
    #[serde(default)]
    pub tls13: Option<String>,

    #[serde(default = "default_cipher_format")]
    pub cipher_format: String,

    #[serde(default)]
    pub supported_ciphers: Option<Vec<String>>,

    #[serde(default = "default_true")]
    pub supports_hsts: bool,

    #[serde(default = "default_true")]
    pub supports_ocsp_stapling: bool,

    #[serde(default = "default_true")]
    pub has_versions: bool,

    #[serde(default = "default_true")]
    pub uses_openssl: bool,

    #[serde(default = "default_true")]
    pub show_supports: bool,

    #[serde(default = "default_true")]
    pub supports_configs: bool,
}

impl ServerProfile {
    /// The cipher allow-list, if the server restricts ciphers at all.
    pub fn cipher_allow_list(&self) -> Option<&[String]> {
        self.supported_ciphers
            .as_deref()
            .filter(|allowed| !allowed.is_empty())
    }
}

/// The TLS library every server is assumed to link against.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LibraryProfile {
    pub latest_version: String,

    #[serde(default)]
    pub tls13: Option<String>,
}
