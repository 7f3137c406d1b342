//! Static model constraints

use std::collections::HashMap;
use once_cell::sync::Lazy;

/// Limit applied to any model missing from the table
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Models that take a single user turn and no sampling parameters
pub const REASONING_MODELS: [&str; 2] = ["o1-mini", "o1-preview"];

/// Maximum completion tokens per known model.
///
/// Keys are lowercase; lookups lowercase the requested name first and
/// fall back to [`DEFAULT_MAX_TOKENS`] for anything unknown.
pub struct ModelLimits
{   limits: HashMap<&'static str, u32>
}

static MODEL_LIMITS: Lazy<ModelLimits> = Lazy::new(|| {
  ModelLimits
  {   limits: HashMap::from([
        ("gpt-4o", 16384)
      , ("gpt-4o-mini", 16384)
      , ("gpt-4o-2024-08-06", 16384)
      , ("chatgpt-4o-latest", 16384)
      , ("gpt-4-turbo", 4096)
      , ("gpt-4", 8192)
      , ("gpt-3.5-turbo", 4096)
      , ("o1-preview", 32768)
      , ("o1-mini", 65536)
      ])
  }
});

impl ModelLimits
{   /// The shared table
    pub fn get() -> &'static ModelLimits
    {   &MODEL_LIMITS
    }

    /// Max completion tokens for `model`
    pub fn max_tokens(&self, model: &str) -> u32
    {   self.limits
          .get(model.to_lowercase().as_str())
          .copied()
          .unwrap_or(DEFAULT_MAX_TOKENS)
    }
}

pub fn is_reasoning_model(model: &str) -> bool
{   REASONING_MODELS
      .iter()
      .any(|m| m.eq_ignore_ascii_case(model))
}
