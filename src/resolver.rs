//! Turns a server, a configuration level and a pair of versions into the
//! state that server templates are rendered from.

use chrono::NaiveDate;
use convert_case::{Case, Casing};
use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::{
    catalog::{self, Catalog, DhParamSource, GuidelineConfiguration, LibraryProfile, ServerProfile},
    version::is_minimum,
};

pub const DEFAULT_CONFIGURATION: &str = "intermediate";

const TLS13: &str = "TLSv1.3";

/// Smallest DH group size shipped as a pre-generated `ffdhe` file.
const PREGENERATED_DH_MIN_BITS: u32 = 2048;

#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error(
    "{server_name} {server_version} does not support TLSv1.3, unable to generate Mozilla \"{config}\" SSL configuration."
)]
#[diagnostic(help(
    "Use a server version with TLS 1.3 support, or a less strict configuration level"
))]
pub struct UnsupportedConfiguration {
    pub server_name: String,
    pub server_version: String,
    pub config: String,
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Catalog(#[from] catalog::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Unsupported(#[from] UnsupportedConfiguration),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveRequest {
    pub server: String,
    pub config: String,

    /// Defaults to the latest version known for the server
    pub server_version: Option<String>,

    /// Defaults to the latest known OpenSSL version
    pub openssl_version: Option<String>,

    pub hsts: bool,
    pub ocsp: bool,
}

impl ResolveRequest {
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            config: DEFAULT_CONFIGURATION.to_string(),
            server_version: None,
            openssl_version: None,
            hsts: true,
            ocsp: true,
        }
    }

    pub fn with_config(mut self, config: impl Into<String>) -> Self {
        self.config = config.into();
        self
    }

    pub fn with_server_version(mut self, version: impl Into<String>) -> Self {
        self.server_version = Some(version.into());
        self
    }

    pub fn with_openssl_version(mut self, version: impl Into<String>) -> Self {
        self.openssl_version = Some(version.into());
        self
    }

    pub fn with_hsts(mut self, enabled: bool) -> Self {
        self.hsts = enabled;
        self
    }

    pub fn with_ocsp(mut self, enabled: bool) -> Self {
        self.ocsp = enabled;
        self
    }
}

// ============================================================================
// Resolved state
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedState {
    pub form: Form,
    pub output: Output,

    /// The whole guideline document
    pub sstls: serde_json::Value,
}

/// The request, echoed back with defaults and capabilities applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub config: String,
    pub hsts: bool,
    pub ocsp: bool,
    pub openssl_version: String,
    pub server: String,
    pub server_version: String,
    pub server_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Output {
    pub ciphers: Vec<String>,
    pub cipher_suites: Vec<String>,
    pub date: String,
    pub dh_command: String,
    pub dh_param_size: Option<u32>,
    pub has_versions: bool,
    pub hsts_max_age: u64,
    pub latest_version: String,
    pub link: String,
    pub oldest_clients: Vec<String>,
    pub openssl_ciphers: Vec<String>,
    pub openssl_cipher_suites: Vec<String>,
    pub protocols: Vec<String>,
    pub server_preferred_order: bool,
    pub show_supports: bool,
    pub supports_configs: bool,
    pub supports_hsts: bool,
    pub supports_ocsp_stapling: bool,
    pub uses_dhe: bool,
    pub uses_openssl: bool,
}

// ============================================================================
// DH parameters
// ============================================================================

/// How the Diffie-Hellman parameters file gets produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DhParameters {
    /// The level uses no finite-field DH
    Unused,

    /// An RFC 7919 `ffdhe` group of this size is shipped with the dataset
    Pregenerated(u32),

    /// No shipped group this small, the user generates one
    Generate(u32),
}

impl DhParameters {
    pub fn for_size(size: Option<u32>) -> Self {
        match size {
            None | Some(0) => DhParameters::Unused,
            Some(bits) if bits >= PREGENERATED_DH_MIN_BITS => DhParameters::Pregenerated(bits),
            Some(bits) => DhParameters::Generate(bits),
        }
    }

    pub fn command(&self, source: &DhParamSource) -> String {
        match self {
            DhParameters::Unused => String::new(),
            DhParameters::Pregenerated(bits) => source.command(*bits),
            DhParameters::Generate(bits) => format!("openssl dhparam {}", bits),
        }
    }
}

/// True when any cipher negotiates finite-field DHE, in either naming scheme.
pub fn uses_dhe<S: AsRef<str>>(ciphers: &[S]) -> bool {
    ciphers.iter().map(AsRef::as_ref).any(|cipher| {
        cipher.starts_with("DHE") || cipher.contains("_DHE_")
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|x| !x.is_empty())
}

fn supports_tls13(
    profile: &ServerProfile,
    library: &LibraryProfile,
    server_version: &str,
    openssl_version: &str,
) -> bool {
    let Some(server_min) = non_empty(profile.tls13.as_deref()) else {
        return false;
    };

    let Some(library_min) = non_empty(library.tls13.as_deref()) else {
        return false;
    };

    is_minimum(server_min, server_version) && is_minimum(library_min, openssl_version)
}

fn select_ciphers(guideline: &GuidelineConfiguration, profile: &ServerProfile) -> Vec<String> {
    let ciphers = guideline
        .ciphers
        .get(&profile.cipher_format)
        .cloned()
        .unwrap_or_default();

    match profile.cipher_allow_list() {
        Some(allowed) => {
            let kept: Vec<_> = ciphers
                .into_iter()
                .filter(|cipher| allowed.contains(cipher))
                .collect();

            debug!(server = %profile.name, kept = kept.len(), "ciphers filtered by allow-list");

            kept
        }
        None => ciphers,
    }
}

// ============================================================================
// Resolver
// ============================================================================

pub struct Resolver<'a> {
    catalog: &'a Catalog,
}

impl<'a> Resolver<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Resolves the request, dating the state with today's local date.
    pub fn resolve(&self, request: &ResolveRequest) -> Result<ResolvedState, Error> {
        self.resolve_on(request, chrono::Local::now().date_naive())
    }

    pub fn resolve_on(
        &self,
        request: &ResolveRequest,
        date: NaiveDate,
    ) -> Result<ResolvedState, Error> {
        let guideline = self.catalog.configuration(&request.config)?;
        let profile = self.catalog.server(&request.server)?;
        let library = self.catalog.library();

        let server_version = non_empty(request.server_version.as_deref())
            .unwrap_or(&profile.latest_version)
            .to_string();

        let openssl_version = non_empty(request.openssl_version.as_deref())
            .unwrap_or(&library.latest_version)
            .to_string();

        let mut protocols = guideline.tls_versions.clone();

        if !supports_tls13(profile, library, &server_version, &openssl_version) {
            debug!(
                server = %request.server,
                %server_version,
                %openssl_version,
                "TLSv1.3 not supported, removing it"
            );

            protocols.retain(|protocol| protocol != TLS13);

            if protocols.is_empty() {
                return Err(UnsupportedConfiguration {
                    server_name: profile.name.clone(),
                    server_version,
                    config: request.config.clone(),
                }
                .into());
            }
        }

        let ciphers = select_ciphers(guideline, profile);

        let dh = DhParameters::for_size(guideline.dh_param_size);
        debug!(?dh, "dh parameters strategy");

        let link = format!(
            "ssl-config {}; {} {}; {} configuration",
            env!("CARGO_PKG_VERSION"),
            profile.name,
            server_version,
            request.config.to_case(Case::Title),
        );

        let form = Form {
            config: request.config.clone(),
            hsts: request.hsts && profile.supports_hsts,
            ocsp: request.ocsp && profile.supports_ocsp_stapling,
            openssl_version,
            server: request.server.clone(),
            server_version,
            server_name: profile.name.clone(),
        };

        let output = Output {
            uses_dhe: uses_dhe(&ciphers),
            openssl_ciphers: ciphers.clone(),
            ciphers,
            cipher_suites: guideline.ciphersuites.clone(),
            openssl_cipher_suites: guideline.ciphersuites.clone(),
            date: date.format("%Y-%m-%d").to_string(),
            dh_command: dh.command(self.catalog.dh_params()),
            dh_param_size: guideline.dh_param_size,
            has_versions: profile.has_versions,
            hsts_max_age: guideline.hsts_min_age,
            latest_version: profile.latest_version.clone(),
            link,
            oldest_clients: guideline.oldest_clients.clone(),
            protocols,
            server_preferred_order: guideline.server_preferred_order,
            show_supports: profile.show_supports,
            supports_configs: profile.supports_configs,
            supports_hsts: profile.supports_hsts,
            supports_ocsp_stapling: profile.supports_ocsp_stapling,
            uses_openssl: profile.uses_openssl,
        };

        Ok(ResolvedState {
            form,
            output,
            sstls: self.catalog.guidelines_document().clone(),
        })
    }
}
