pub mod error;
pub mod config;
pub mod models;
pub mod request;
pub mod providers;
pub mod client;

/*

openai-fn: two stateless helpers over the OpenAI HTTP API.

  ListAssistantsHandler  GET  /v1/assistants?order=&limit=
  ChatCompletionHandler  POST /v1/chat/completions

Both take loosely typed parameters, validate them before touching the
network, and always answer with a single string: the payload on success
or an "Error: ..." / "Error {status}: ..." line otherwise.

src/
├── lib.rs              # Re-exports
├── error.rs            # Error enum; Display is the caller-facing text
├── config.rs           # API base and HTTP client settings
├── models.rs           # Per-model token limits, reasoning models
├── request.rs          # Parameters, validation, wire types
├── providers/
│   └── openai.rs       # The HTTP calls
├── client.rs           # Handlers
└── main.rs             # CLI

*/

pub use client::{ChatCompletionHandler, ListAssistantsHandler};
pub use config::ClientConfig;
pub use error::Error;
pub use models::ModelLimits;
pub use providers::openai::OpenAiClient;
pub use request::{ChatCompletionParams, ListAssistantsParams};
