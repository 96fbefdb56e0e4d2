use anyhow::Context as _;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport as _};

use crate::config::Config;
use crate::formats::{Availability, Observation};
use crate::threshold;

/// Sends the price alert. Missing credentials or a transport error are
/// logged and reported as `false`; neither aborts the run.
pub fn send_price_alert(config: &Config, observation: &Observation) -> bool {
    if !config.has_email_credentials() {
        tracing::warn!("email credentials not configured; skipping notification");
        return false;
    }

    match try_send_alert(config, observation) {
        Ok(()) => {
            tracing::info!(recipient = %config.recipient_email, "price alert email sent");
            true
        }
        Err(err) => {
            tracing::error!(?err, "failed to send price alert email");
            false
        }
    }
}

/// Sends a synthetic alert without fetching anything, to verify the SMTP
/// configuration end to end.
pub fn send_test_alert(config: &Config) -> anyhow::Result<()> {
    tracing::info!("sending test price alert");

    let observation = test_observation(config);
    if send_price_alert(config, &observation) {
        tracing::info!("test email sent");
        Ok(())
    } else {
        anyhow::bail!("test email was not sent")
    }
}

fn try_send_alert(config: &Config, observation: &Observation) -> anyhow::Result<()> {
    let message = build_alert_message(config, observation).context("build alert message")?;
    let transport = smtp_transport(config).context("build smtp transport")?;
    transport.send(&message).context("send alert message")?;
    Ok(())
}

fn smtp_transport(config: &Config) -> anyhow::Result<SmtpTransport> {
    let credentials = Credentials::new(
        config.sender_email.clone(),
        config.sender_password.clone(),
    );
    let transport = SmtpTransport::starttls_relay(&config.smtp_server)
        .with_context(|| format!("configure starttls relay: {}", config.smtp_server))?
        .port(config.smtp_port)
        .credentials(credentials)
        .build();
    Ok(transport)
}

fn build_alert_message(config: &Config, observation: &Observation) -> anyhow::Result<Message> {
    let from: Mailbox = config
        .sender_email
        .parse()
        .context("parse sender address")?;
    let to: Mailbox = config
        .recipient_email
        .parse()
        .context("parse recipient address")?;

    let price = observation.price.context("alert requires an extracted price")?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(alert_subject(price))
        .multipart(MultiPart::alternative_plain_html(
            alert_text_body(observation, price),
            alert_html_body(observation, price),
        ))
        .context("assemble alert message")
}

fn alert_subject(price: f64) -> String {
    format!("PRICE ALERT: watched item on sale - ${price:.2}")
}

fn alert_text_body(observation: &Observation, price: f64) -> String {
    let savings = observation.target_price - price;
    format!(
        "PRICE ALERT\n\
         \n\
         Price drop detected: the price is below your target threshold.\n\
         \n\
         Product: {title}\n\
         Current Price: ${price:.2}\n\
         Your Target: ${target:.2}\n\
         Savings: ${savings:.2}\n\
         Availability: {availability}\n\
         Check Time: {date} at {time}\n\
         \n\
         Shop Now: {url}\n\
         \n\
         This alert was generated by your automated price watcher.\n\
         Timestamp: {timestamp}\n",
        title = observation.product_title,
        target = observation.target_price,
        availability = observation.availability,
        date = observation.date,
        time = observation.time,
        url = observation.url,
        timestamp = observation.timestamp,
    )
}

fn alert_html_body(observation: &Observation, price: f64) -> String {
    let savings = observation.target_price - price;
    format!(
        r#"<html>
<head>
<style>
  body {{ font-family: Arial, sans-serif; }}
  .alert {{ background-color: #f8d7da; border: 1px solid #f5c6cb; padding: 15px; border-radius: 5px; margin: 10px 0; }}
  .info {{ background-color: #e2e3e5; border: 1px solid #d6d8db; padding: 10px; border-radius: 5px; margin: 10px 0; }}
  .price {{ font-size: 24px; font-weight: bold; color: #28a745; }}
  .target {{ font-size: 18px; color: #dc3545; }}
  .button {{ background-color: #007bff; color: white; padding: 10px 20px; text-decoration: none; border-radius: 5px; display: inline-block; margin: 10px 0; }}
</style>
</head>
<body>
<h2>PRICE ALERT</h2>
<div class="alert">
  <h3>Price Drop Detected</h3>
  <p>The price has dropped below your target threshold.</p>
</div>
<div class="info">
  <h4>Product Details:</h4>
  <p><strong>Product:</strong> {title}</p>
  <p><strong>Current Price:</strong> <span class="price">${price:.2}</span></p>
  <p><strong>Your Target:</strong> <span class="target">${target:.2}</span></p>
  <p><strong>Savings:</strong> <span class="price">${savings:.2}</span></p>
  <p><strong>Availability:</strong> {availability}</p>
  <p><strong>Check Time:</strong> {date} at {time}</p>
</div>
<p><a href="{url}" class="button" target="_blank">Shop Now</a></p>
<div style="margin-top: 20px; font-size: 12px; color: #6c757d;">
  <p>This alert was generated by your automated price watcher.</p>
  <p>Timestamp: {timestamp}</p>
</div>
</body>
</html>
"#,
        title = observation.product_title,
        target = observation.target_price,
        availability = observation.availability,
        date = observation.date,
        time = observation.time,
        url = observation.url,
        timestamp = observation.timestamp,
    )
}

fn test_observation(config: &Config) -> Observation {
    let mut observation = Observation::begin(
        &config.product_url,
        config.target_price,
        &config.zip_code,
    );
    observation.product_title = "Test - Kirkland Signature Wild Alaskan Cod".to_owned();
    observation.price = Some(19.99);
    observation.availability = Availability::Available;
    observation.success = true;
    observation.below_target =
        threshold::below_target(true, observation.price, config.target_price);
    observation
}
