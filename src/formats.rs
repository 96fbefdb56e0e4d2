use serde::{Deserialize, Serialize};

/// Sentinel title recorded when the page has no top-level heading.
pub const TITLE_NOT_FOUND: &str = "Title not found";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Availability {
    Available,
    Unavailable,
    Unknown,
}

impl Availability {
    pub fn as_str(self) -> &'static str {
        match self {
            Availability::Available => "Available",
            Availability::Unavailable => "Unavailable",
            Availability::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for Availability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a single price-check run. Immutable once the run completes;
/// written once to each sink (JSON snapshot, CSV history, email).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    pub timestamp: String,
    pub date: String,
    pub time: String,
    pub url: String,
    pub target_price: f64,
    pub zip_code: String,
    pub price: Option<f64>,
    pub availability: Availability,
    pub below_target: bool,
    pub product_title: String,
    pub success: bool,
    pub error_message: Option<String>,
    pub email_sent: bool,
}

impl Observation {
    /// Fresh per-run record with every extraction field at its failure
    /// default. `success=false` implies `price` stays absent.
    pub fn begin(url: &str, target_price: f64, zip_code: &str) -> Self {
        let now = chrono::Local::now();
        Self {
            timestamp: now.to_rfc3339(),
            date: now.format("%Y-%m-%d").to_string(),
            time: now.format("%H:%M:%S").to_string(),
            url: url.to_owned(),
            target_price,
            zip_code: zip_code.to_owned(),
            price: None,
            availability: Availability::Unknown,
            below_target: false,
            product_title: TITLE_NOT_FOUND.to_owned(),
            success: false,
            error_message: None,
            email_sent: false,
        }
    }
}

/// One row of `price_history.csv`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRow {
    pub timestamp: String,
    pub date: String,
    pub time: String,
    pub price: Option<f64>,
    pub availability: Availability,
    pub below_target: bool,
    pub product_title: String,
    pub email_sent: bool,
}

impl HistoryRow {
    pub const HEADER: [&'static str; 8] = [
        "timestamp",
        "date",
        "time",
        "price",
        "availability",
        "below_target",
        "product_title",
        "email_sent",
    ];
}

impl From<&Observation> for HistoryRow {
    fn from(observation: &Observation) -> Self {
        Self {
            timestamp: observation.timestamp.clone(),
            date: observation.date.clone(),
            time: observation.time.clone(),
            price: observation.price,
            availability: observation.availability,
            below_target: observation.below_target,
            product_title: observation.product_title.clone(),
            email_sent: observation.email_sent,
        }
    }
}
