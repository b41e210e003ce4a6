use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, Proxy};
use tracing::{debug, warn};

use crate::application::{HttpClient, HttpExchange};
use crate::domain::ManagerError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Hands out [`ReqwestHttpExchange`]s sharing a request timeout.
pub struct ReqwestHttpClient {
    timeout: Duration,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestHttpClient {
    fn get_exchange(&self, url: &str) -> Result<Box<dyn HttpExchange>, ManagerError> {
        Ok(Box::new(ReqwestHttpExchange::new(
            Method::GET,
            url,
            None,
            self.timeout,
        )?))
    }

    fn post_exchange(
        &self,
        url: &str,
        content_type: &str,
        body: String,
    ) -> Result<Box<dyn HttpExchange>, ManagerError> {
        Ok(Box::new(ReqwestHttpExchange::new(
            Method::POST,
            url,
            Some((content_type.to_string(), body)),
            self.timeout,
        )?))
    }
}

/// One request/response round trip over `reqwest`.
///
/// The client is built lazily in [`HttpExchange::exchange`] so a proxy set
/// beforehand applies to this exchange only.
pub struct ReqwestHttpExchange {
    method: Method,
    url: url::Url,
    body: Option<(String, String)>,
    timeout: Duration,
    proxy: Option<Proxy>,
    request_headers: HeaderMap,
    response: Option<reqwest::Response>,
    response_headers: HeaderMap,
    entity: Option<String>,
    status_code: u16,
}

impl ReqwestHttpExchange {
    pub fn new(
        method: Method,
        url: &str,
        body: Option<(String, String)>,
        timeout: Duration,
    ) -> Result<Self, ManagerError> {
        let url = url::Url::parse(url)
            .map_err(|e| ManagerError::invalid_argument(format!("bad URL '{}': {}", url, e)))?;

        Ok(Self {
            method,
            url,
            body,
            timeout,
            proxy: None,
            request_headers: HeaderMap::new(),
            response: None,
            response_headers: HeaderMap::new(),
            entity: None,
            status_code: 0,
        })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }
}

#[async_trait]
impl HttpExchange for ReqwestHttpExchange {
    fn set_proxy(&mut self, proxy: &str) -> Result<(), ManagerError> {
        let proxy_url = if proxy.contains("://") {
            proxy.to_string()
        } else {
            format!("http://{}", proxy)
        };

        let proxy = Proxy::all(&proxy_url).map_err(|e| {
            ManagerError::invalid_argument(format!("bad proxy '{}': {}", proxy_url, e))
        })?;
        self.proxy = Some(proxy);
        Ok(())
    }

    fn set_request_header(&mut self, name: &str, value: &str) {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.request_headers.insert(name, value);
            }
            _ => warn!("Dropping invalid request header {}", name),
        }
    }

    async fn exchange(&mut self) -> Result<u16, ManagerError> {
        let mut builder = reqwest::Client::builder().timeout(self.timeout);
        if let Some(proxy) = self.proxy.clone() {
            builder = builder.proxy(proxy);
        }
        let client = builder
            .build()
            .map_err(|e| ManagerError::transport(format!("Failed to build HTTP client: {}", e)))?;

        let mut request = client
            .request(self.method.clone(), self.url.clone())
            .headers(self.request_headers.clone());
        if let Some((content_type, body)) = &self.body {
            request = request
                .header(CONTENT_TYPE, content_type.as_str())
                .body(body.clone());
        }

        debug!("{} {}", self.method, self.url);
        let response = request.send().await.map_err(|e| {
            ManagerError::transport(format!("{} {} failed: {}", self.method, self.url, e))
        })?;

        self.status_code = response.status().as_u16();
        self.response_headers = response.headers().clone();
        self.entity = None;
        self.response = Some(response);

        Ok(self.status_code)
    }

    async fn response_entity_as_string(&mut self) -> Result<String, ManagerError> {
        if let Some(entity) = &self.entity {
            return Ok(entity.clone());
        }

        let response = self
            .response
            .take()
            .ok_or_else(|| ManagerError::illegal_state("no response available"))?;
        let entity = response.text().await.map_err(|e| {
            ManagerError::transport(format!("Failed to read response from {}: {}", self.url, e))
        })?;

        self.entity = Some(entity.clone());
        Ok(entity)
    }

    fn response_header_value(&self, name: &str) -> Option<String> {
        self.response_headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    }

    fn response_header_values(&self, name: &str) -> Vec<String> {
        self.response_headers
            .get_all(name)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(str::to_string)
            .collect()
    }

    fn status_code(&self) -> u16 {
        self.status_code
    }

    fn close(&mut self) {
        self.response = None;
        self.entity = None;
    }
}
