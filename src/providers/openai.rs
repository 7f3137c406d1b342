use serde_json::Value;
use log::{debug, trace, error};

use crate::config::ClientConfig;
use crate::error::{Error, UNKNOWN_ERROR, UNPARSED_ERROR};
use crate::request::{
  ApiErrorBody, ChatPayload, ChatResponse, ChatSettings, ListQuery
};

/// Beta header required by the assistants endpoint
const ASSISTANTS_BETA: (&str, &str) = ("OpenAI-Beta", "assistants=v2");

/// OpenAI HTTP client.
///
/// Holds no per-call state; one request goes out per method call.
#[derive(Debug, Clone)]
pub struct OpenAiClient
{   http_client: reqwest::Client
  , api_base: String
}

impl OpenAiClient
{   /// Client against `config.api_base`
    pub fn new(config: &ClientConfig)
      -> Result<Self, Error>
    {   Ok(OpenAiClient::with_http_client(
          config.build_http_client()?,
          config.base()
        ))
    }

    /// Client using a caller-supplied `reqwest::Client`
    pub fn with_http_client(
      http_client: reqwest::Client
    , api_base: impl Into<String>
    ) -> Self
    {   let api_base: String = api_base.into();
        debug!("Creating OpenAiClient for {}", api_base);
        OpenAiClient
        {   http_client
          , api_base: api_base.trim_end_matches('/').to_string()
        }
    }

    /// GET /assistants, returning the body as pretty-printed JSON
    pub async fn list_assistants(
      &self
    , api_key: &str
    , query: &ListQuery
    ) -> Result<String, Error>
    {   debug!(
          "Listing assistants (order: {}, limit: {})",
          query.order, query.limit
        );

        let limit = query.limit.to_string();
        let response = self.http_client
          .get(format!("{}/assistants", self.api_base))
          .query(&[
              ("order", query.order.as_str())
            , ("limit", limit.as_str())
            ])
          .header("Content-Type", "application/json")
          .header("Authorization", format!("Bearer {}", api_key))
          .header(ASSISTANTS_BETA.0, ASSISTANTS_BETA.1)
          .send()
          .await
          .map_err(|e| {
            error!("HTTP error: {}", e);
            Error::from(e)
          })?;

        let status = response.status();
        trace!("Assistants response status: {}", status);

        // Any body that is not JSON counts as a failed request,
        // on both the success and the error path.
        let body: Value = response.json().await.map_err(|e| {
          error!("Assistants body was not JSON: {}", e);
          Error::from(e)
        })?;

        if !status.is_success()
        {   let message = ApiErrorBody::message_of(&body);
            error!("Assistants API error {}: {:?}", status, message);
            return Err(Error::Api
            {   status: status.as_u16()
              , message
              , fallback: UNKNOWN_ERROR
            });
        }

        serde_json::to_string_pretty(&body)
          .map_err(|e| Error::HttpError(e.to_string()))
    }

    /// POST /chat/completions, returning the trimmed reply text
    pub async fn chat_completion(
      &self
    , api_key: &str
    , settings: &ChatSettings
    ) -> Result<String, Error>
    {   debug!("Sending chat completion for: {}", settings.model);

        let payload = ChatPayload::from_settings(settings);
        trace!("Chat payload: {:?}", payload);

        let response = self.http_client
          .post(format!("{}/chat/completions", self.api_base))
          .header("Authorization", format!("Bearer {}", api_key))
          .header("Content-Type", "application/json")
          .json(&payload)
          .send()
          .await
          .map_err(|e| {
            error!("HTTP error: {}", e);
            Error::from(e)
          })?;

        let status = response.status();
        trace!("Chat response status: {}", status);

        let text = response.text().await.map_err(|e| {
          error!("Failed reading chat body: {}", e);
          Error::from(e)
        })?;

        if !status.is_success()
        {   let message = serde_json::from_str::<Value>(&text)
              .ok()
              .and_then(|body| ApiErrorBody::message_of(&body));
            error!("Chat API error {}: {:?}", status, message);
            return Err(Error::Api
            {   status: status.as_u16()
              , message
              , fallback: UNPARSED_ERROR
            });
        }

        let body: Value = serde_json::from_str(&text).map_err(|e| {
          error!("Parse error: {}", e);
          Error::ParseError
        })?;

        let chat_response: ChatResponse
          = serde_json::from_value(body).map_err(|e| {
            error!("Unexpected response shape: {}", e);
            Error::InvalidResponse
          })?;

        chat_response.into_content()
    }
}
