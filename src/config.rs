use std::path::PathBuf;

use chrono::NaiveTime;

pub const DEFAULT_PRODUCT_URL: &str = "https://sameday.costco.com/store/costco/products/19230835-kirkland-signature-wild-alaskan-cod-individually-wrapped-2-lb-2-lb";
pub const DEFAULT_TARGET_PRICE: f64 = 21.00;
pub const DEFAULT_ZIP_CODE: &str = "78726";
pub const DEFAULT_RECIPIENT_EMAIL: &str = "climate127@gmail.com";
pub const DEFAULT_SMTP_SERVER: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Immutable runtime configuration, read from the environment once at
/// startup and passed to each component.
#[derive(Debug, Clone)]
pub struct Config {
    pub product_url: String,
    pub target_price: f64,
    pub zip_code: String,
    pub sender_email: String,
    pub sender_password: String,
    pub recipient_email: String,
    pub smtp_server: String,
    pub smtp_port: u16,
    pub schedule_time: NaiveTime,
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl Config {
    /// Unset or unparseable variables silently keep their literal defaults.
    pub fn from_env() -> Self {
        Self {
            product_url: env_or("PRODUCT_URL", DEFAULT_PRODUCT_URL),
            target_price: target_price_or_default(std::env::var("TARGET_PRICE").ok().as_deref()),
            zip_code: env_or("ZIP_CODE", DEFAULT_ZIP_CODE),
            sender_email: env_or("SENDER_EMAIL", ""),
            sender_password: env_or("SENDER_PASSWORD", ""),
            recipient_email: env_or("RECIPIENT_EMAIL", DEFAULT_RECIPIENT_EMAIL),
            smtp_server: env_or("SMTP_SERVER", DEFAULT_SMTP_SERVER),
            smtp_port: smtp_port_or_default(std::env::var("SMTP_PORT").ok().as_deref()),
            schedule_time: schedule_time_or_default(std::env::var("SCHEDULE_TIME").ok().as_deref()),
            data_dir: PathBuf::from(env_or("PRICE_DATA_DIR", "price_data")),
            log_dir: PathBuf::from(env_or("PRICE_LOG_DIR", "price_logs")),
        }
    }

    pub fn has_email_credentials(&self) -> bool {
        !self.sender_email.is_empty() && !self.sender_password.is_empty()
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn target_price_or_default(raw: Option<&str>) -> f64 {
    raw.and_then(|value| value.trim().parse::<f64>().ok())
        .unwrap_or(DEFAULT_TARGET_PRICE)
}

fn smtp_port_or_default(raw: Option<&str>) -> u16 {
    raw.and_then(|value| value.trim().parse::<u16>().ok())
        .unwrap_or(DEFAULT_SMTP_PORT)
}

fn schedule_time_or_default(raw: Option<&str>) -> NaiveTime {
    raw.and_then(|value| NaiveTime::parse_from_str(value.trim(), "%H:%M").ok())
        .unwrap_or(default_schedule_time())
}

/// Daily run time when `SCHEDULE_TIME` is unset: 09:00 local.
fn default_schedule_time() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN)
}
