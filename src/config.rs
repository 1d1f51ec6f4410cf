use crate::observability::LogFormat;
use clap::Parser;
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;
use url::Url;

pub const SANDBOX_BASE_URL: &str = "https://sandbox-api.iyzipay.com";

/// Merchant credentials for the processor, loaded once at start-up.
///
/// Shared read-only behind an `Arc`; nothing mutates them after construction.
#[derive(Clone)]
pub struct MerchantCredentials {
    pub api_key: String,
    pub secret_key: String,
    pub base_url: Url,
}

impl fmt::Debug for MerchantCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MerchantCredentials")
            .field("api_key", &"<redacted>")
            .field("secret_key", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

#[derive(Parser)]
#[command(author, version, about = "HTTP proxy in front of the iyzico payment API", long_about = None)]
pub struct ServerConfig {
    /// Merchant API key issued by iyzico
    #[arg(long, env = "IYZICO_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Merchant secret key used to sign processor requests
    #[arg(long, env = "IYZICO_SECRET_KEY", hide_env_values = true)]
    pub secret_key: String,

    /// Processor base URL
    #[arg(long, env = "IYZICO_BASE_URL", default_value = SANDBOX_BASE_URL)]
    pub base_url: Url,

    /// Address to listen on
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: std::net::IpAddr,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Timeout for a single processor call, in seconds
    #[arg(long, env = "PROCESSOR_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,
}

impl ServerConfig {
    pub fn credentials(&self) -> MerchantCredentials {
        MerchantCredentials {
            api_key: self.api_key.clone(),
            secret_key: self.secret_key.clone(),
            base_url: self.base_url.clone(),
        }
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn processor_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
