use std::fmt;

/// Error type for assistant listing and chat completion calls.
///
/// `Display` yields the exact text handed back to callers, so a
/// handler only ever has to call `to_string()` on it.
#[derive(Debug, Clone, PartialEq)]
pub enum Error
{   /// API key is missing or empty
    MissingApiKey
  , /// Chat message is missing or empty
    MissingMessage
  , /// Listing limit is not a positive integer
    InvalidLimit
  , /// Temperature is not a number in [0, 2]
    InvalidTemperature
  , /// Max tokens is not an integer in [1, limit] for the model
    InvalidMaxTokens
    {   model: String
      , limit: u32
    }
  , /// Frequency penalty is not a number in [-2.0, 2.0]
    InvalidFrequencyPenalty
  , /// JSON schema does not parse
    InvalidJsonSchema(String)
  , /// JSON schema parses but carries nothing
    EmptyJsonSchema
  , /// API returned a non-success status
    Api
    {   status: u16
      , message: Option<String>
      , fallback: &'static str
    }
  , /// Success body was not JSON
    ParseError
  , /// Success body lacked the assistant reply
    InvalidResponse
  , /// Transport failure
    HttpError(String)
}

/// Fallback used when a listing error body has no message.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Fallback used when a chat error body cannot be read.
pub const UNPARSED_ERROR: &str = "Unable to parse error details.";

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::MissingApiKey => {
              write!(f, "Error: OpenAI API Key is required.")
            }
          , Error::MissingMessage => {
              write!(f, "Error: Message is required.")
            }
          , Error::InvalidLimit => {
              write!(f, "Error: Limit must be a positive integer.")
            }
          , Error::InvalidTemperature => {
              write!(f,
                "Error: Temperature must be a number between 0 and 2."
              )
            }
          , Error::InvalidMaxTokens { model, limit } => {
              write!(f,
                "Error: Max tokens must be an integer between 1 and {} for model {}.",
                limit, model
              )
            }
          , Error::InvalidFrequencyPenalty => {
              write!(f,
                "Error: Frequency penalty must be a number between -2.0 and 2.0."
              )
            }
          , Error::InvalidJsonSchema(detail) => {
              write!(f, "Error: Invalid JSON schema - {}", detail)
            }
          , Error::EmptyJsonSchema => {
              write!(f, "Error: JSON schema must not be empty.")
            }
          , Error::Api { status, message, fallback } => {
              write!(f,
                "Error {}: {}",
                status,
                message.as_deref().unwrap_or(fallback)
              )
            }
          , Error::ParseError => {
              write!(f, "Error: Failed to parse API response.")
            }
          , Error::InvalidResponse => {
              write!(f,
                "Error: Received an invalid response from the API."
              )
            }
          , Error::HttpError(detail) => {
              write!(f, "Error: Request failed - {}", detail)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<reqwest::Error> for Error
{   fn from(e: reqwest::Error) -> Self
    {   Error::HttpError(e.to_string())
    }
}
