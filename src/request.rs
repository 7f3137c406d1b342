//! Inbound parameter sets, validated settings, and wire types

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use log::debug;

use crate::error::Error;
use crate::models::{is_reasoning_model, ModelLimits};

pub const DEFAULT_ORDER: &str = "desc";
pub const DEFAULT_LIMIT: u64 = 20;
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f64 = 1.0;
pub const DEFAULT_MAX_COMPLETION_TOKENS: u32 = 4096;
pub const DEFAULT_FREQUENCY_PENALTY: f64 = 0.0;

/// Appended to the user content when a JSON schema is supplied,
/// followed by the schema itself.
pub const JSON_SCHEMA_INSTRUCTION: &str
  = "\n\nRespond only with raw JSON that conforms to the JSON schema below. \
     Do not wrap the JSON in markdown code fences (```) and do not add any \
     text before or after it.\nJSON schema:\n";

// ===== Inbound parameters =====

/// Accepts a string, number, or boolean as text; null stays absent.
fn loose<'de, D>(deserializer: D)
  -> Result<Option<String>, D::Error>
where D: Deserializer<'de>
{   let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value
    {   None | Some(Value::Null) => None
      , Some(Value::String(s)) => Some(s)
      , Some(Value::Number(n)) => Some(n.to_string())
      , Some(Value::Bool(b)) => Some(b.to_string())
      , Some(other) => Some(other.to_string())
    })
}

/// Trimmed value, or `None` when absent or blank
fn present(value: &Option<String>) -> Option<&str>
{   value.as_deref()
      .map(str::trim)
      .filter(|s| !s.is_empty())
}

/// Value as given, or `None` when absent or empty
fn non_empty(value: &Option<String>) -> Option<&str>
{   value.as_deref().filter(|s| !s.is_empty())
}

/// Key is passed through untouched; only an empty key is refused.
fn require_api_key(value: &Option<String>)
  -> Result<&str, Error>
{   non_empty(value).ok_or(Error::MissingApiKey)
}

/// Leading integer of `raw`, read the way JavaScript's `parseInt`
/// reads it: leading whitespace, optional sign, optional `0x`, then
/// digits up to the first non-digit. `None` without any digits or
/// when the value overflows `i64`.
fn parse_leading_int(raw: &str) -> Option<i64>
{   let s = raw.trim_start();
    let (negative, s) = match s.as_bytes().first()
    {   Some(b'-') => (true, &s[1..])
      , Some(b'+') => (false, &s[1..])
      , _ => (false, s)
    };
    let (radix, s) = match s.get(..2)
    {   Some("0x") | Some("0X") => (16, &s[2..])
      , _ => (10, s)
    };
    let end = s.find(|c: char| !c.is_digit(radix))
      .unwrap_or(s.len());
    if end == 0
    {   return None;
    }
    let value = i64::from_str_radix(&s[..end], radix).ok()?;
    Some(if negative { -value } else { value })
}

/// Parameters for listing assistants, as received from the caller
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAssistantsParams
{   #[serde(default, deserialize_with = "loose")]
    pub api_key: Option<String>
  , #[serde(default, deserialize_with = "loose")]
    pub order: Option<String>
  , #[serde(default, deserialize_with = "loose")]
    pub limit: Option<String>
}

impl ListAssistantsParams
{   pub fn new(api_key: impl Into<String>) -> Self
    {   ListAssistantsParams
        {   api_key: Some(api_key.into())
          , ..Default::default()
        }
    }

    pub fn order(mut self, order: impl Into<String>) -> Self
    {   self.order = Some(order.into());
        self
    }

    pub fn limit(mut self, limit: impl Into<String>) -> Self
    {   self.limit = Some(limit.into());
        self
    }

    /// Check the key and coerce the query values
    pub fn validate(&self)
      -> Result<(String, ListQuery), Error>
    {   let api_key = require_api_key(&self.api_key)?;

        let order = non_empty(&self.order)
          .unwrap_or(DEFAULT_ORDER)
          .to_string();

        let limit = match non_empty(&self.limit)
        {   None => DEFAULT_LIMIT
          , Some(raw) => parse_leading_int(raw)
              .and_then(|n| u64::try_from(n).ok())
              .filter(|n| *n >= 1)
              .ok_or(Error::InvalidLimit)?
        };

        Ok((api_key.to_string(), ListQuery { order, limit }))
    }
}

/// Validated assistant listing query
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery
{   pub order: String
  , pub limit: u64
}

/// Parameters for a chat completion, as received from the caller
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatCompletionParams
{   #[serde(default, deserialize_with = "loose")]
    pub api_key: Option<String>
  , #[serde(default, deserialize_with = "loose")]
    pub system_prompt: Option<String>
  , #[serde(default, deserialize_with = "loose")]
    pub message: Option<String>
  , #[serde(default, deserialize_with = "loose")]
    pub model: Option<String>
  , #[serde(default, deserialize_with = "loose")]
    pub temperature: Option<String>
  , #[serde(default, deserialize_with = "loose")]
    pub max_tokens: Option<String>
  , #[serde(default, deserialize_with = "loose")]
    pub frequency_penalty: Option<String>
  , #[serde(default, deserialize_with = "loose")]
    pub json_schema: Option<String>
}

impl ChatCompletionParams
{   pub fn new(
      api_key: impl Into<String>
    , message: impl Into<String>
    ) -> Self
    {   ChatCompletionParams
        {   api_key: Some(api_key.into())
          , message: Some(message.into())
          , ..Default::default()
        }
    }

    pub fn system_prompt(mut self, v: impl Into<String>) -> Self
    {   self.system_prompt = Some(v.into());
        self
    }

    pub fn model(mut self, v: impl Into<String>) -> Self
    {   self.model = Some(v.into());
        self
    }

    pub fn temperature(mut self, v: impl Into<String>) -> Self
    {   self.temperature = Some(v.into());
        self
    }

    pub fn max_tokens(mut self, v: impl Into<String>) -> Self
    {   self.max_tokens = Some(v.into());
        self
    }

    pub fn frequency_penalty(mut self, v: impl Into<String>) -> Self
    {   self.frequency_penalty = Some(v.into());
        self
    }

    pub fn json_schema(mut self, v: impl Into<String>) -> Self
    {   self.json_schema = Some(v.into());
        self
    }

    /// Validate in order: key, message, temperature, max tokens,
    /// frequency penalty, schema. The first failure wins.
    pub fn validate(&self)
      -> Result<(String, ChatSettings), Error>
    {   let api_key = require_api_key(&self.api_key)?;

        // Message content is sent untrimmed; only blankness is checked.
        let message = self.message.as_deref()
          .filter(|m| !m.trim().is_empty())
          .ok_or(Error::MissingMessage)?
          .to_string();

        let system_prompt = self.system_prompt.as_deref()
          .filter(|s| !s.trim().is_empty())
          .unwrap_or(DEFAULT_SYSTEM_PROMPT)
          .to_string();

        let model = present(&self.model)
          .unwrap_or(DEFAULT_MODEL)
          .to_string();

        let temperature = match present(&self.temperature)
        {   None => DEFAULT_TEMPERATURE
          , Some(raw) => raw.parse::<f64>()
              .ok()
              .filter(|t| (0.0..=2.0).contains(t))
              .ok_or(Error::InvalidTemperature)?
        };

        let limit = ModelLimits::get().max_tokens(&model);
        let max_tokens = match present(&self.max_tokens)
        {   None => DEFAULT_MAX_COMPLETION_TOKENS
          , Some(raw) => raw.parse::<u32>().ok()
              .unwrap_or(0)
        };
        if max_tokens < 1 || max_tokens > limit
        {   debug!(
              "max_tokens {} outside [1, {}] for {}",
              max_tokens, limit, model
            );
            return Err(Error::InvalidMaxTokens { model, limit });
        }

        let frequency_penalty = match present(&self.frequency_penalty)
        {   None => DEFAULT_FREQUENCY_PENALTY
          , Some(raw) => raw.parse::<f64>()
              .ok()
              .filter(|p| (-2.0..=2.0).contains(p))
              .ok_or(Error::InvalidFrequencyPenalty)?
        };

        let json_schema = match present(&self.json_schema)
        {   None => None
          , Some(raw) => Some(parse_json_schema(raw)?)
        };

        Ok((
          api_key.to_string()
        , ChatSettings
          {   model
            , system_prompt
            , message
            , temperature
            , max_tokens
            , frequency_penalty
            , json_schema
          }
        ))
    }
}

fn parse_json_schema(raw: &str) -> Result<Value, Error>
{   let schema: Value = serde_json::from_str(raw)
      .map_err(|e| Error::InvalidJsonSchema(e.to_string()))?;
    let empty = match &schema
    {   Value::Null => true
      , Value::Object(map) => map.is_empty()
      , Value::Array(items) => items.is_empty()
      , Value::String(s) => s.trim().is_empty()
      , _ => false
    };
    if empty
    {   return Err(Error::EmptyJsonSchema);
    }
    Ok(schema)
}

/// Fully validated chat completion inputs
#[derive(Debug, Clone, PartialEq)]
pub struct ChatSettings
{   pub model: String
  , pub system_prompt: String
  , pub message: String
  , pub temperature: f64
  , pub max_tokens: u32
  , pub frequency_penalty: f64
  , pub json_schema: Option<Value>
}

impl ChatSettings
{   /// User content with the schema instruction appended when present
    pub fn user_content(&self) -> String
    {   match &self.json_schema
        {   Some(schema) => format!(
              "{}{}{}",
              self.message, JSON_SCHEMA_INSTRUCTION, schema
            )
          , None => self.message.clone()
        }
    }
}

// ===== Wire types =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage
{   pub role: String
  , pub content: String
}

impl ChatMessage
{   pub fn system(content: impl Into<String>) -> Self
    {   ChatMessage
        {   role: "system".to_string()
          , content: content.into()
        }
    }

    pub fn user(content: impl Into<String>) -> Self
    {   ChatMessage
        {   role: "user".to_string()
          , content: content.into()
        }
    }
}

/// Chat completion request body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatPayload
{   pub model: String
  , pub messages: Vec<ChatMessage>
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<u32>
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>
}

impl ChatPayload
{   /// Reasoning models get one merged user turn and no sampling
    /// fields; every other model gets system + user turns and all three.
    pub fn from_settings(settings: &ChatSettings) -> Self
    {   if is_reasoning_model(&settings.model)
        {   debug!("Building reasoning payload for {}", settings.model);
            let combined = format!(
              "{}\n\n{}",
              settings.system_prompt,
              settings.user_content()
            );
            return ChatPayload
            {   model: settings.model.clone()
              , messages: vec![ChatMessage::user(combined)]
              , temperature: None
              , max_completion_tokens: None
              , frequency_penalty: None
            };
        }

        ChatPayload
        {   model: settings.model.clone()
          , messages: vec![
              ChatMessage::system(settings.system_prompt.clone())
            , ChatMessage::user(settings.user_content())
            ]
          , temperature: Some(settings.temperature)
          , max_completion_tokens: Some(settings.max_tokens)
          , frequency_penalty: Some(settings.frequency_penalty)
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse
{   #[serde(default)]
    pub choices: Vec<Choice>
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice
{   #[serde(default)]
    pub message: Option<ResponseMessage>
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage
{   #[serde(default)]
    pub content: Option<String>
}

impl ChatResponse
{   /// Trimmed content of the first choice
    pub fn into_content(self) -> Result<String, Error>
    {   self.choices
          .into_iter()
          .next()
          .and_then(|c| c.message)
          .and_then(|m| m.content)
          .map(|content| content.trim().to_string())
          .ok_or(Error::InvalidResponse)
    }
}

/// `{"error": {"message": ...}}` as returned on failure
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody
{   #[serde(default)]
    pub error: Option<ApiErrorDetail>
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail
{   #[serde(default)]
    pub message: Option<String>
}

impl ApiErrorBody
{   /// Non-empty message of an already-parsed error body
    pub fn message_of(body: &Value) -> Option<String>
    {   serde_json::from_value::<ApiErrorBody>(body.clone())
          .ok()
          .and_then(|b| b.error)
          .and_then(|e| e.message)
          .filter(|m| !m.is_empty())
    }
}
