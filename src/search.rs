//! Storefront side of the domain search: input cleanup, result shaping, cart and checkout

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::registrar::RegisterRequest;

/// TLDs every search term is checked against
pub const TLDS: [&str; 26] = [
    ".com", ".net", ".org", ".io", ".app", ".dev", ".xyz", ".co", ".ai", ".tech",
    ".academy", ".art", ".blog", ".cloud", ".data", ".design", ".digital", ".email",
    ".expert", ".finance", ".fund", ".games", ".global", ".group", ".host", ".info",
];

/// Failures shown to the user; the detail is only logged.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Failed to check domain availability.")]
    Availability(String),

    #[error("Domain registration failed.")]
    Registration(String),

    #[error("Failed to fetch TLDs.")]
    Tlds(String),
}

impl SearchError {
    pub fn detail(&self) -> &str {
        match self {
            SearchError::Availability(d) | SearchError::Registration(d) | SearchError::Tlds(d) => d,
        }
    }
}

/// Strip an extension the user typed ("google.com" -> "google") and all spaces.
/// `None` means there is nothing to search for.
pub fn sanitize(term: &str) -> Option<String> {
    let base = term.split('.').next().unwrap_or_default();
    let clean: String = base.chars().filter(|c| *c != ' ').collect();
    (!clean.is_empty()).then_some(clean)
}

/// Full domain names to check for a raw search term
pub fn candidates(term: &str) -> Vec<String> {
    match sanitize(term) {
        Some(name) => TLDS.iter().map(|tld| format!("{name}{tld}")).collect(),
        None => Vec::new(),
    }
}

/// Swap the extension of the current input for `tld`, as the TLD badges do
pub fn with_tld(term: &str, tld: &str) -> String {
    let base = term.split('.').next().unwrap_or_default();
    format!("{base}{tld}")
}

#[derive(Debug, Default, Deserialize)]
pub struct AvailabilityResponse {
    #[serde(default)]
    pub results: Vec<AvailabilityResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResult {
    pub domain_name: String,
    #[serde(default)]
    pub purchasable: Option<bool>,
    #[serde(default)]
    pub purchase_price: Option<f64>,
    #[serde(default)]
    pub premium: Option<bool>,
}

/// One row of the results list
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub domain_name: String,
    pub available: bool,
    pub price: Option<f64>,
    pub premium: bool,
}

impl From<AvailabilityResult> for SearchResult {
    fn from(result: AvailabilityResult) -> Self {
        Self {
            domain_name: result.domain_name,
            available: result.purchasable == Some(true),
            price: result.purchase_price.filter(|p| *p != 0.0),
            premium: result.premium.unwrap_or(false),
        }
    }
}

impl SearchResult {
    pub fn price_label(&self) -> String {
        match self.price {
            Some(price) => format!("{price:.2}"),
            None => "N/A".to_string(),
        }
    }
}

pub fn shape(response: AvailabilityResponse) -> Vec<SearchResult> {
    response.results.into_iter().map(SearchResult::from).collect()
}

/// Holds at most one domain picked from the results, plus the add-on toggles
#[derive(Debug, Default)]
pub struct Cart {
    selected: Option<SearchResult>,
    pub whois_privacy: bool,
    pub ssl: bool,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&SearchResult> {
        self.selected.as_ref()
    }

    /// Only available domains can be added, and only into an empty cart.
    pub fn add(&mut self, result: SearchResult) -> bool {
        if self.selected.is_some() || !result.available {
            return false;
        }
        self.selected = Some(result);
        true
    }

    /// Registration request for the selected domain, one year
    pub fn checkout_request(&self) -> Option<RegisterRequest> {
        let selected = self.selected.as_ref()?;
        Some(RegisterRequest {
            domain_name: selected.domain_name.clone(),
            years: 1,
            use_whois_privacy: self.whois_privacy,
            use_ssl: self.ssl,
        })
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Talks to the registrar proxy the way the storefront does
pub struct ProxyClient {
    base_url: String,
    agent: ureq::Agent,
}

impl ProxyClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            agent: ureq::AgentBuilder::new().build(),
        }
    }

    /// Check a raw search term against every TLD. An empty term yields no
    /// results without contacting the proxy.
    pub fn search(&self, term: &str) -> Result<Vec<SearchResult>, SearchError> {
        let domains = candidates(term);
        if domains.is_empty() {
            debug!("Empty search term, skipping");
            return Ok(Vec::new());
        }
        info!("Searching {} candidates", domains.len());
        self.check(&domains)
    }

    pub fn check(&self, domains: &[String]) -> Result<Vec<SearchResult>, SearchError> {
        let url = format!("{}/api/check-availability", self.base_url);
        let response = self
            .agent
            .post(&url)
            .send_json(serde_json::json!({ "domainNames": domains }))
            .map_err(|e| log_failure(SearchError::Availability(e.to_string())))?;

        let parsed: AvailabilityResponse = response
            .into_json()
            .map_err(|e| log_failure(SearchError::Availability(e.to_string())))?;
        Ok(shape(parsed))
    }

    pub fn tlds(&self) -> Result<serde_json::Value, SearchError> {
        let url = format!("{}/api/tlds", self.base_url);
        self.agent
            .get(&url)
            .call()
            .map_err(|e| log_failure(SearchError::Tlds(e.to_string())))?
            .into_json()
            .map_err(|e| log_failure(SearchError::Tlds(e.to_string())))
    }

    pub fn register(&self, request: &RegisterRequest) -> Result<serde_json::Value, SearchError> {
        let url = format!("{}/api/domain/register", self.base_url);
        let response = match self.agent.post(&url).send_json(request) {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                return Err(log_failure(SearchError::Registration(format!("{status}: {body}"))));
            }
            Err(e) => return Err(log_failure(SearchError::Registration(e.to_string()))),
        };

        response
            .into_json()
            .map_err(|e| log_failure(SearchError::Registration(e.to_string())))
    }

    /// Register the cart's domain; the cart is emptied only on success.
    pub fn checkout(&self, cart: &mut Cart) -> Result<Option<serde_json::Value>, SearchError> {
        let Some(request) = cart.checkout_request() else {
            return Ok(None);
        };
        let response = self.register(&request)?;
        info!("Registration successful for {}", request.domain_name);
        cart.clear();
        Ok(Some(response))
    }
}

fn log_failure(err: SearchError) -> SearchError {
    error!("{err} {}", err.detail());
    err
}
