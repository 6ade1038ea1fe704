use serde::{Deserialize, Serialize};

/// Price sent with every purchase until TLD pricing lookups are wired in
pub const PLACEHOLDER_PRICE: f64 = 12.99;

fn one_year() -> u32 {
    1
}

/// Registration request as posted by the storefront
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub domain_name: String,
    #[serde(default = "one_year")]
    pub years: u32,
    #[serde(default)]
    pub use_whois_privacy: bool,
    #[serde(default, rename = "useSSL")]
    pub use_ssl: bool,
}

impl RegisterRequest {
    pub fn new(domain_name: impl Into<String>) -> Self {
        Self {
            domain_name: domain_name.into(),
            years: 1,
            use_whois_privacy: false,
            use_ssl: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainRef {
    pub domain_name: String,
}

/// Optional purchase add-on
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Addon {
    Privacy,
    Ssl { product: String },
}

/// Body of the registrar's purchase call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchasePayload {
    pub domain: DomainRef,
    pub purchase_price: f64,
    pub years: u32,
    pub addons: Vec<Addon>,
}

impl From<RegisterRequest> for PurchasePayload {
    fn from(request: RegisterRequest) -> Self {
        let mut addons = Vec::new();
        if request.use_whois_privacy {
            addons.push(Addon::Privacy);
        }
        if request.use_ssl {
            addons.push(Addon::Ssl {
                product: "RapidSSL".to_string(),
            });
        }

        Self {
            domain: DomainRef {
                domain_name: request.domain_name,
            },
            purchase_price: PLACEHOLDER_PRICE,
            years: request.years,
            addons,
        }
    }
}
