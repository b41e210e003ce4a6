use async_trait::async_trait;

use crate::domain::ManagerError;

/// A single HTTP request/response exchange.
#[async_trait]
pub trait HttpExchange: Send {
    /// Routes the exchange through `proxy` (`host:port` or a full URL).
    fn set_proxy(&mut self, proxy: &str) -> Result<(), ManagerError>;

    /// Overrides any previous header of that name.
    fn set_request_header(&mut self, name: &str, value: &str);

    /// Performs the exchange. Transport failures surface as `Transport`.
    async fn exchange(&mut self) -> Result<u16, ManagerError>;

    async fn response_entity_as_string(&mut self) -> Result<String, ManagerError>;

    fn response_header_value(&self, name: &str) -> Option<String>;

    /// Empty when the header is absent.
    fn response_header_values(&self, name: &str) -> Vec<String>;

    /// Zero before the exchange has run.
    fn status_code(&self) -> u16;

    /// Releases the exchange's resources. Safe to call more than once.
    fn close(&mut self);
}

/// Creates exchanges.
pub trait HttpClient: Send + Sync {
    fn get_exchange(&self, url: &str) -> Result<Box<dyn HttpExchange>, ManagerError>;

    fn post_exchange(
        &self,
        url: &str,
        content_type: &str,
        body: String,
    ) -> Result<Box<dyn HttpExchange>, ManagerError>;
}
