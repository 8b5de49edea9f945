//! API server configuration.

use chatrelay_core::client::ChatClientConfig;

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "0.0.0.0:3000").
    pub bind_addr: String,
    /// Upstream chat API settings.
    pub chat: ChatClientConfig,
    /// HTML-escape reply prose before embedding it.
    pub escape_html: bool,
}

impl ApiConfig {
    /// Config for the given credential with defaults for everything else.
    ///
    /// | Field         | Default                          |
    /// |---------------|----------------------------------|
    /// | `bind_addr`   | `0.0.0.0:3000`                   |
    /// | `chat`        | [`ChatClientConfig::new`]        |
    /// | `escape_html` | `true`                           |
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".into(),
            chat: ChatClientConfig::new(api_key),
            escape_html: true,
        }
    }
}
