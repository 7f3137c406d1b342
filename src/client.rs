//! Caller-facing handlers.
//!
//! Each handler validates its loosely typed parameters, issues a single
//! request through [`OpenAiClient`], and folds every outcome into one
//! string. Nothing is shared between calls, so handlers can be cloned
//! and invoked concurrently.

use log::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::Error;
use crate::providers::openai::OpenAiClient;
use crate::request::{ChatCompletionParams, ListAssistantsParams};

/// Success text, or the error's display text
fn into_reply(result: Result<String, Error>) -> String
{   match result
    {   Ok(text) => text
      , Err(e) => {
          warn!("Handler returned error: {}", e);
          e.to_string()
        }
    }
}

/// Lists assistants as pretty-printed JSON
#[derive(Debug, Clone)]
pub struct ListAssistantsHandler
{   client: OpenAiClient
}

impl ListAssistantsHandler
{   pub fn new(client: OpenAiClient) -> Self
    {   ListAssistantsHandler { client }
    }

    pub fn from_config(config: &ClientConfig)
      -> Result<Self, Error>
    {   Ok(ListAssistantsHandler::new(OpenAiClient::new(config)?))
    }

    /// Typed variant of [`Self::invoke`]
    pub async fn try_invoke(
      &self
    , params: &ListAssistantsParams
    ) -> Result<String, Error>
    {   let (api_key, query) = params.validate()?;
        debug!("ListAssistantsHandler validated: {:?}", query);
        self.client.list_assistants(&api_key, &query).await
    }

    pub async fn invoke(&self, params: &ListAssistantsParams)
      -> String
    {   into_reply(self.try_invoke(params).await)
    }
}

/// Sends one chat completion and returns the trimmed reply
#[derive(Debug, Clone)]
pub struct ChatCompletionHandler
{   client: OpenAiClient
}

impl ChatCompletionHandler
{   pub fn new(client: OpenAiClient) -> Self
    {   ChatCompletionHandler { client }
    }

    pub fn from_config(config: &ClientConfig)
      -> Result<Self, Error>
    {   Ok(ChatCompletionHandler::new(OpenAiClient::new(config)?))
    }

    /// Typed variant of [`Self::invoke`]
    pub async fn try_invoke(
      &self
    , params: &ChatCompletionParams
    ) -> Result<String, Error>
    {   let (api_key, settings) = params.validate()?;
        info!(
          "Chat completion: model={} schema={}",
          settings.model,
          settings.json_schema.is_some()
        );
        self.client.chat_completion(&api_key, &settings).await
    }

    pub async fn invoke(&self, params: &ChatCompletionParams)
      -> String
    {   into_reply(self.try_invoke(params).await)
    }
}
