use crate::error::{Result, ScanError};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Protocol family guessed from a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApiKind {
    #[serde(rename = "REST/JSON")]
    RestJson,
    #[serde(rename = "GraphQL")]
    GraphQl,
    #[serde(rename = "SOAP/XML")]
    SoapXml,
    #[serde(rename = "API Documentation")]
    Documentation,
    #[serde(rename = "API Framework")]
    Framework,
    #[serde(rename = "API Server")]
    Server,
}

impl ApiKind {
    pub fn label(&self) -> &'static str {
        match self {
            ApiKind::RestJson => "REST/JSON",
            ApiKind::GraphQl => "GraphQL",
            ApiKind::SoapXml => "SOAP/XML",
            ApiKind::Documentation => "API Documentation",
            ApiKind::Framework => "API Framework",
            ApiKind::Server => "API Server",
        }
    }
}

impl fmt::Display for ApiKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Https,
    Http,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Https => "https",
            Scheme::Http => "http",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single (origin, path) pair to probe.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target {
    origin: String,
    path: String,
}

impl Target {
    /// `origin` must be a bare host (optionally `host:port`), `path` must start with `/`.
    pub fn new(origin: impl Into<String>, path: impl Into<String>) -> Result<Self> {
        let origin = origin.into();
        let path = path.into();

        if origin.is_empty() || origin.contains("://") || origin.contains('/') {
            return Err(ScanError::InvalidTarget(format!(
                "origin must be a bare hostname, got '{}'",
                origin
            )));
        }
        if !path.starts_with('/') {
            return Err(ScanError::InvalidTarget(format!(
                "path must be root-relative, got '{}'",
                path
            )));
        }

        Ok(Self { origin, path })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn url(&self, scheme: Scheme) -> String {
        format!("{}://{}{}", scheme, self.origin, self.path)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.origin, self.path)
    }
}

/// A classified API-positive response. The JSON keys match the files written
/// by earlier versions of the scanner so that merged output stays uniform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeOutcome {
    pub url: String,
    #[serde(rename = "domain")]
    pub origin: String,
    pub path: String,
    pub scheme: Scheme,
    pub is_api: bool,
    #[serde(rename = "api_type")]
    pub kind: Option<ApiKind>,
    pub timestamp: DateTime<Local>,
    pub status_code: Option<u16>,
    /// Written as `"Unknown"` when the response carried no `Server` header.
    #[serde(serialize_with = "serialize_server")]
    pub server: Option<String>,
    #[serde(rename = "cloudflare")]
    pub behind_cdn: bool,
}

fn serialize_server<S: serde::Serializer>(
    server: &Option<String>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(server.as_deref().unwrap_or(UNKNOWN_SERVER))
}

pub const UNKNOWN_SERVER: &str = "Unknown";

impl ProbeOutcome {
    pub fn api(
        target: &Target,
        scheme: Scheme,
        kind: ApiKind,
        status_code: Option<u16>,
        server: Option<String>,
        behind_cdn: bool,
    ) -> Self {
        Self {
            url: target.url(scheme),
            origin: target.origin().to_string(),
            path: target.path().to_string(),
            scheme,
            is_api: true,
            kind: Some(kind),
            timestamp: Local::now(),
            status_code,
            server,
            behind_cdn,
        }
    }

    pub fn server_or_unknown(&self) -> &str {
        self.server.as_deref().unwrap_or(UNKNOWN_SERVER)
    }
}

/// Aggregate figures for a finished (or interrupted) scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanSummary {
    pub elapsed: Duration,
    pub total_targets: usize,
    pub completed: usize,
    pub apis_found: usize,
    pub cdn_flagged: usize,
    pub cancelled: bool,
}

impl ScanSummary {
    pub fn from_outcomes(
        outcomes: &[ProbeOutcome],
        total_targets: usize,
        completed: usize,
        elapsed: Duration,
        cancelled: bool,
    ) -> Self {
        let api_outcomes = outcomes.iter().filter(|o| o.is_api);
        Self {
            elapsed,
            total_targets,
            completed,
            apis_found: api_outcomes.clone().count(),
            cdn_flagged: api_outcomes.filter(|o| o.behind_cdn).count(),
            cancelled,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScanReport {
    pub outcomes: Vec<ProbeOutcome>,
    pub summary: ScanSummary,
}
