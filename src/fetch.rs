use std::time::Duration;

use anyhow::Context as _;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, COOKIE, USER_AGENT};
use url::Url;

/// Returns product page markup for a URL, localized to a postal code.
/// Any failure here is an interaction failure, distinct from price
/// extraction failing on a page that did load.
#[async_trait]
pub trait PageFetcher {
    async fn fetch(&self, url: &Url, zip_code: &str) -> anyhow::Result<String>;
}

/// Plain HTTP fetcher. The postal code travels as a request cookie; pages
/// that require a rendered storefront session are out of scope.
#[derive(Debug, Default)]
pub struct HttpPageFetcher;

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &Url, zip_code: &str) -> anyhow::Result<String> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .context("build http client")?;

        let response = client
            .get(url.clone())
            .header(USER_AGENT, "pricewatch/0.1")
            .header(ACCEPT, "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8")
            .header(COOKIE, format!("zip_code={zip_code}"))
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("GET {url} returned {status}");
        }

        if let Some(content_type) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            let content_type = content_type.to_ascii_lowercase();
            if !(content_type.starts_with("text/html")
                || content_type.starts_with("application/xhtml+xml"))
            {
                anyhow::bail!("GET {url} returned non-html content type: {content_type}");
            }
        }

        response
            .text()
            .await
            .with_context(|| format!("read body: {url}"))
    }
}
