use clap::{Parser, Subcommand};
use log::debug;

use openai_fn::{
  ChatCompletionHandler, ChatCompletionParams, ClientConfig,
  ListAssistantsHandler, ListAssistantsParams
};

#[derive(Parser, Debug)]
#[command(name = "openai-fn", version, about = "List assistants or send a chat completion")]
struct Cli
{   /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", default_value = "", hide_env_values = true)]
    api_key: String
  , /// API base URL (defaults to OPENAI_API_BASE or the public API)
    #[arg(long)]
    api_base: Option<String>
  , /// Request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>
  , /// Log connection-level traffic
    #[arg(long)]
    verbose: bool
  , #[command(subcommand)]
    command: Command
}

#[derive(Subcommand, Debug)]
enum Command
{   /// List assistants
    Assistants
    {   #[arg(long)]
        order: Option<String>
      , #[arg(long)]
        limit: Option<String>
    }
  , /// Send a chat completion
    Chat
    {   #[arg(long)]
        message: String
      , #[arg(long)]
        system_prompt: Option<String>
      , #[arg(long)]
        model: Option<String>
      , #[arg(long, allow_hyphen_values = true)]
        temperature: Option<String>
      , #[arg(long, allow_hyphen_values = true)]
        max_tokens: Option<String>
      , #[arg(long, allow_hyphen_values = true)]
        frequency_penalty: Option<String>
      , #[arg(long)]
        json_schema: Option<String>
    }
}

/// Parameters for the selected subcommand
#[derive(Debug)]
enum Job
{   Assistants(ListAssistantsParams)
  , Chat(ChatCompletionParams)
}

impl Cli
{   /// `base` with any flags given on the command line applied
    fn apply_to(&self, mut config: ClientConfig) -> ClientConfig
    {   if let Some(base) = &self.api_base
        {   config.api_base = base.clone();
        }
        if self.timeout_secs.is_some()
        {   config.timeout_secs = self.timeout_secs;
        }
        config.verbose = self.verbose;
        config
    }

    fn into_job(self) -> Job
    {   match self.command
        {   Command::Assistants { order, limit } => {
              Job::Assistants(ListAssistantsParams
              {   api_key: Some(self.api_key)
                , order
                , limit
              })
            }
          , Command::Chat {
              message,
              system_prompt,
              model,
              temperature,
              max_tokens,
              frequency_penalty,
              json_schema,
            } => {
              Job::Chat(ChatCompletionParams
              {   api_key: Some(self.api_key)
                , system_prompt
                , message: Some(message)
                , model
                , temperature
                , max_tokens
                , frequency_penalty
                , json_schema
              })
            }
        }
    }
}

#[tokio::main]
async fn main()
{   env_logger::init();
    let cli = Cli::parse();

    let config = cli.apply_to(ClientConfig::from_env());
    debug!("Using config: {:?}", config);

    let reply = match cli.into_job()
    {   Job::Assistants(params) => {
          match ListAssistantsHandler::from_config(&config)
          {   Ok(handler) => handler.invoke(&params).await
            , Err(e) => e.to_string()
          }
        }
      , Job::Chat(params) => {
          match ChatCompletionHandler::from_config(&config)
          {   Ok(handler) => handler.invoke(&params).await
            , Err(e) => e.to_string()
          }
        }
    };

    println!("{}", reply);
}
