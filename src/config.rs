//! Client configuration

use std::time::Duration;
use serde::{Deserialize, Serialize};
use log::{debug, warn};

/// Production API base
pub const OPENAI_API_BASE: &str
  = "https://api.openai.com/v1";

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig
{   /// API base URL, without trailing slash
    pub api_base: String
  , /// Request timeout in seconds; `None` waits indefinitely
    pub timeout_secs: Option<u64>
  , /// Enable detailed logging
    pub verbose: bool
}

impl Default for ClientConfig
{   fn default() -> Self
    {   ClientConfig
        {   api_base: OPENAI_API_BASE.to_string()
          , timeout_secs: None
          , verbose: false
        }
    }
}

impl ClientConfig
{   /// Defaults overridden by `OPENAI_API_BASE` and `OPENAI_TIMEOUT_SECS`
    pub fn from_env() -> Self
    {   let mut config = ClientConfig::default();

        if let Ok(base) = std::env::var("OPENAI_API_BASE")
        {   if !base.trim().is_empty()
            {   config.api_base = base.trim().to_string();
            }
        }

        if let Ok(secs) = std::env::var("OPENAI_TIMEOUT_SECS")
        {   match secs.trim().parse::<u64>()
            {   Ok(secs) => config.timeout_secs = Some(secs)
              , Err(_) => {
                  warn!("Ignoring OPENAI_TIMEOUT_SECS={:?}", secs);
                }
            }
        }

        config
    }

    /// Base URL with any trailing slash removed
    pub fn base(&self) -> &str
    {   self.api_base.trim_end_matches('/')
    }

    /// Build the HTTP client this configuration describes
    pub fn build_http_client(&self)
      -> Result<reqwest::Client, crate::error::Error>
    {   debug!(
          "Building HTTP client for {} (timeout: {:?})",
          self.base(),
          self.timeout_secs
        );
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = self.timeout_secs
        {   builder = builder.timeout(Duration::from_secs(secs));
        }
        if self.verbose
        {   builder = builder.connection_verbose(true);
        }
        Ok(builder.build()?)
    }
}
