use crate::classifier::{Classifier, Verdict};
use crate::error::Result;
use crate::headers::browser_headers;
use crate::result::{ProbeOutcome, Scheme, Target};
use reqwest::Client;
use reqwest::header::{HeaderMap, SERVER};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Decides from response headers whether an edge CDN sits in front of the origin.
pub type CdnPredicate = Arc<dyn Fn(&HeaderMap) -> bool + Send + Sync>;

/// Invoked once for every API-positive outcome, as soon as it is classified.
pub type ResultCallback = Arc<dyn Fn(&ProbeOutcome) + Send + Sync>;

pub const MAX_REDIRECTS: usize = 10;

/// Cloudflare stamps every proxied response with a `cf-ray` id.
pub fn cf_ray_present() -> CdnPredicate {
    Arc::new(|headers: &HeaderMap| headers.contains_key("cf-ray"))
}

/// Per-target scheme fallback: HTTPS first, then HTTP, then give up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProbeState {
    AttemptingHttps,
    AttemptingHttp,
    Exhausted,
}

impl ProbeState {
    fn scheme(self) -> Option<Scheme> {
        match self {
            ProbeState::AttemptingHttps => Some(Scheme::Https),
            ProbeState::AttemptingHttp => Some(Scheme::Http),
            ProbeState::Exhausted => None,
        }
    }

    fn next(self) -> Self {
        match self {
            ProbeState::AttemptingHttps => ProbeState::AttemptingHttp,
            ProbeState::AttemptingHttp | ProbeState::Exhausted => ProbeState::Exhausted,
        }
    }
}

#[derive(Clone)]
pub struct Prober {
    client: Client,
    classifier: Arc<Classifier>,
    cdn_predicate: CdnPredicate,
    delay: Duration,
    result_callback: Option<ResultCallback>,
}

impl Prober {
    pub fn new(timeout: Duration, delay: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()?;

        Ok(Self {
            client,
            classifier: Arc::new(Classifier::new()),
            cdn_predicate: cf_ray_present(),
            delay,
            result_callback: None,
        })
    }

    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = Arc::new(classifier);
        self
    }

    pub fn with_cdn_predicate(mut self, predicate: CdnPredicate) -> Self {
        self.cdn_predicate = predicate;
        self
    }

    pub fn with_result_callback(mut self, callback: ResultCallback) -> Self {
        self.result_callback = Some(callback);
        self
    }

    /// Probe one target. Transport failures on either scheme are absorbed;
    /// `None` means neither scheme produced an API-positive response.
    pub async fn probe(&self, target: &Target) -> Option<ProbeOutcome> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let mut state = ProbeState::AttemptingHttps;
        while let Some(scheme) = state.scheme() {
            if let Some(outcome) = self.attempt(target, scheme).await {
                info!(
                    url = %outcome.url,
                    api_type = %outcome.kind.map(|k| k.label()).unwrap_or("-"),
                    server = %outcome.server_or_unknown(),
                    cdn = outcome.behind_cdn,
                    "API found"
                );
                if let Some(ref callback) = self.result_callback {
                    callback(&outcome);
                }
                return Some(outcome);
            }
            state = state.next();
        }

        debug!("No API signal for {}", target);
        None
    }

    async fn attempt(&self, target: &Target, scheme: Scheme) -> Option<ProbeOutcome> {
        let url = target.url(scheme);
        debug!("Fetching {}", url);

        let response = match self
            .client
            .get(&url)
            .headers(browser_headers())
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                let reason = if e.is_timeout() {
                    "timeout"
                } else if e.is_connect() {
                    "connect"
                } else {
                    "transport"
                };
                debug!("{} failed ({}): {}", url, reason, e);
                return None;
            }
        };

        let status_code = response.status().as_u16();
        let headers = response.headers().clone();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                debug!("{} body read failed: {}", url, e);
                return None;
            }
        };

        match self.classifier.classify(&body, &headers, &url) {
            Verdict::Api(kind) => {
                let server = headers
                    .get(SERVER)
                    .and_then(|v| v.to_str().ok())
                    .map(String::from);
                let behind_cdn = (self.cdn_predicate)(&headers);
                Some(ProbeOutcome::api(
                    target,
                    scheme,
                    kind,
                    Some(status_code),
                    server,
                    behind_cdn,
                ))
            }
            Verdict::Blocked => {
                debug!("{} answered with a challenge page ({})", url, status_code);
                None
            }
            Verdict::NotApi => None,
        }
    }
}
