use crate::config::Config;
use crate::settings::api_types::{parse_dropdown_response, GENERIC_ERROR};
use crate::settings::source::DropdownSource;
use crate::settings::types::DropdownOption;
use color_eyre::{eyre::eyre, Result};
use futures::future::{BoxFuture, FutureExt};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Settings API client wrapper
#[derive(Clone)]
pub struct SettingsClient {
  http: reqwest::Client,
  base_url: Url,
  token: Option<String>,
}

impl SettingsClient {
  pub fn new(config: &Config) -> Result<Self> {
    let http = reqwest::Client::builder()
      .timeout(Duration::from_secs(config.settings.timeout_secs))
      .user_agent(concat!("rate-pro-dropdowns/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self {
      http,
      base_url: config.settings.base_url()?,
      token: Config::get_api_token(),
    })
  }

  /// Get all options for a dropdown type
  pub async fn get_dropdown_options(&self, dropdown_type: &str) -> Result<Vec<DropdownOption>> {
    let url = dropdown_url(&self.base_url, dropdown_type)?;
    debug!(%url, "GET dropdown options");

    let mut request = self.http.get(url);
    if let Some(token) = &self.token {
      request = request.bearer_auth(token);
    }

    let response = request.send().await.map_err(|e| {
      warn!(dropdown_type, error = %e, "dropdown options request failed");
      eyre!("{}", GENERIC_ERROR)
    })?;

    let status = response.status().as_u16();
    let body = response.bytes().await.map_err(|e| {
      warn!(dropdown_type, status, error = %e, "failed to read dropdown options body");
      eyre!("{}", GENERIC_ERROR)
    })?;

    parse_dropdown_response(dropdown_type, status, &body)
  }
}

impl DropdownSource for SettingsClient {
  fn fetch_options(&self, dropdown_type: &str) -> BoxFuture<'static, Result<Vec<DropdownOption>>> {
    let client = self.clone();
    let dropdown_type = dropdown_type.to_string();
    async move { client.get_dropdown_options(&dropdown_type).await }.boxed()
  }
}

/// Build `{base}/settings/dropdowns/{type}` with `type` escaped as a single
/// path segment.
pub fn dropdown_url(base: &Url, dropdown_type: &str) -> Result<Url> {
  let mut url = base.clone();
  url
    .path_segments_mut()
    .map_err(|_| eyre!("Settings URL cannot be a base: {}", base))?
    .pop_if_empty()
    .extend(["settings", "dropdowns", dropdown_type]);
  Ok(url)
}
