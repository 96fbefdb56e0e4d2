use anyhow::Context as _;
use url::Url;

use crate::config::Config;
use crate::extract;
use crate::fetch::{HttpPageFetcher, PageFetcher};
use crate::formats::Observation;
use crate::notify;
use crate::store;
use crate::threshold;

/// One complete price check: fetch, extract, evaluate, notify, record.
/// Fetch and extraction failures land in the Observation instead of
/// aborting; the Observation is persisted either way.
pub async fn run(config: &Config) -> anyhow::Result<Observation> {
    let fetcher = HttpPageFetcher;
    let observation = run_with(config, &fetcher).await?;

    store::record(&config.data_dir, &observation);

    if observation.success {
        tracing::info!(
            product = %observation.product_title,
            price = ?observation.price,
            below_target = observation.below_target,
            email_sent = observation.email_sent,
            "price check completed"
        );
    } else {
        tracing::error!(
            error = observation.error_message.as_deref().unwrap_or("unknown error"),
            "price check failed"
        );
    }

    Ok(observation)
}

/// The pipeline against an injectable fetcher. Errors are returned only
/// for configuration problems; per-run failures are recorded in the
/// Observation.
pub async fn run_with(
    config: &Config,
    fetcher: &dyn PageFetcher,
) -> anyhow::Result<Observation> {
    tracing::info!("=== starting price check ===");

    let url = Url::parse(&config.product_url).context("parse product url")?;
    let mut observation =
        Observation::begin(&config.product_url, config.target_price, &config.zip_code);

    tracing::info!(url = %url, zip_code = %config.zip_code, "loading product page");
    let html = match fetcher.fetch(&url, &config.zip_code).await {
        Ok(html) => html,
        Err(err) => {
            tracing::error!(?err, "failed to load product page");
            observation.error_message = Some(format!("failed to load product page: {err:#}"));
            return Ok(observation);
        }
    };

    tracing::info!("extracting price information");
    let extracted = extract::extract(&html);
    observation.product_title = extracted.title;

    let Some(price) = extracted.price else {
        tracing::warn!("could not find price information");
        observation.error_message = Some("Price not found".to_owned());
        return Ok(observation);
    };

    observation.price = Some(price);
    observation.availability = extracted.availability;
    observation.success = true;
    observation.below_target =
        threshold::below_target(observation.success, observation.price, config.target_price);

    let price_display = format!("${price:.2}");
    let target_display = format!("${:.2}", config.target_price);
    tracing::info!(
        product = %observation.product_title,
        price = %price_display,
        availability = %observation.availability,
        "price check results"
    );

    if observation.below_target {
        tracing::warn!(
            price = %price_display,
            target = %target_display,
            "price is below target"
        );
        let email_sent = notify::send_price_alert(config, &observation);
        observation.email_sent = email_sent;
    } else {
        tracing::info!(
            price = %price_display,
            target = %target_display,
            "price is above target"
        );
    }

    Ok(observation)
}
