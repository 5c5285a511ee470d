//! Response classification.
//!
//! Maps a response body and its headers to a verdict. Rules are evaluated in a
//! fixed order and the first match wins:
//!
//! 1. edge-protection challenge page (blocked, never an API)
//! 2. JSON content type or JSON-ish body tokens
//! 3. GraphQL markers
//! 4. XML content type, XML prolog or SOAP envelope
//! 5. API documentation tooling
//! 6. API framework names in the body
//! 7. API-serving stacks in the `Server` header
//!
//! The JSON token check is a plain substring test. Any HTML page that happens
//! to contain `{"` is reported as REST/JSON, and minified JSON served without
//! a JSON content type and without one of the tokens is missed.

use crate::result::ApiKind;
use reqwest::header::{CONTENT_TYPE, HeaderMap, SERVER};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Api(ApiKind),
    /// An edge-protection challenge page stood in for the real response.
    Blocked,
    NotApi,
}

impl Verdict {
    pub fn is_api(&self) -> bool {
        matches!(self, Verdict::Api(_))
    }

    pub fn kind(&self) -> Option<ApiKind> {
        match self {
            Verdict::Api(kind) => Some(*kind),
            Verdict::Blocked | Verdict::NotApi => None,
        }
    }
}

/// Marker lists consulted by the classifier. All entries are lowercase and
/// matched against a lowercased copy of the body or header, except
/// `xml_prologs` which is matched against the raw body.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    pub edge_vendors: Vec<String>,
    pub challenge_markers: Vec<String>,
    pub json_content_types: Vec<String>,
    pub json_tokens: Vec<String>,
    pub graphql_markers: Vec<String>,
    pub xml_content_types: Vec<String>,
    pub xml_prologs: Vec<String>,
    pub xml_markers: Vec<String>,
    pub documentation: Vec<String>,
    pub frameworks: Vec<String>,
    pub api_servers: Vec<String>,
}

fn words(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            edge_vendors: words(&["cloudflare"]),
            challenge_markers: words(&["challenge", "attention required"]),
            json_content_types: words(&["application/json"]),
            json_tokens: words(&["{\"", "\"data\":", "\"api\":", "\"response\":", "\"result\":"]),
            graphql_markers: words(&["graphql", "\"query\"", "graphiql"]),
            xml_content_types: words(&["xml"]),
            xml_prologs: words(&["<?xml"]),
            xml_markers: words(&["soap:envelope"]),
            documentation: words(&["swagger", "openapi", "api documentation", "api docs", "redoc"]),
            frameworks: words(&["fastapi", "django rest", "express", "flask-restful"]),
            api_servers: words(&["fastapi", "werkzeug", "gunicorn"]),
        }
    }
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle.as_str()))
}

fn header_lower(headers: &HeaderMap, name: reqwest::header::HeaderName) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_lowercase())
        .unwrap_or_default()
}

#[derive(Debug, Clone, Default)]
pub struct Classifier {
    vocabulary: Vocabulary,
}

impl Classifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vocabulary(vocabulary: Vocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn classify(&self, body: &str, headers: &HeaderMap, url: &str) -> Verdict {
        let vocab = &self.vocabulary;
        let body_lower = body.to_lowercase();
        let content_type = header_lower(headers, CONTENT_TYPE);

        if contains_any(&body_lower, &vocab.edge_vendors)
            && contains_any(&body_lower, &vocab.challenge_markers)
        {
            debug!("Challenge page served for {}", url);
            return Verdict::Blocked;
        }

        if contains_any(&content_type, &vocab.json_content_types)
            || contains_any(&body_lower, &vocab.json_tokens)
        {
            return Verdict::Api(ApiKind::RestJson);
        }

        if contains_any(&body_lower, &vocab.graphql_markers) {
            return Verdict::Api(ApiKind::GraphQl);
        }

        if contains_any(&content_type, &vocab.xml_content_types)
            || contains_any(body, &vocab.xml_prologs)
            || contains_any(&body_lower, &vocab.xml_markers)
        {
            return Verdict::Api(ApiKind::SoapXml);
        }

        if contains_any(&body_lower, &vocab.documentation) {
            return Verdict::Api(ApiKind::Documentation);
        }

        if contains_any(&body_lower, &vocab.frameworks) {
            return Verdict::Api(ApiKind::Framework);
        }

        let server = header_lower(headers, SERVER);
        if contains_any(&server, &vocab.api_servers) {
            return Verdict::Api(ApiKind::Server);
        }

        Verdict::NotApi
    }
}
