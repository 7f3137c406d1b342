use httpmock::prelude::*;
use serde_json::json;

use openai_fn::{
  ChatCompletionHandler, ChatCompletionParams, ClientConfig,
  ListAssistantsHandler, ListAssistantsParams, OpenAiClient
};

fn client_for(server: &MockServer) -> OpenAiClient
{   OpenAiClient::with_http_client(
      reqwest::Client::new(),
      server.base_url()
    )
}

/// Nothing listens on port 1
fn unreachable_client() -> OpenAiClient
{   OpenAiClient::with_http_client(
      reqwest::Client::new(),
      "http://127.0.0.1:1"
    )
}

// ===== Handlers without the network =====

#[test]
fn test_empty_key_short_circuits()
{   let list = ListAssistantsHandler::new(unreachable_client());
    let reply = tokio_test::block_on(
      list.invoke(&ListAssistantsParams::new(""))
    );
    assert_eq!(reply, "Error: OpenAI API Key is required.");

    let chat = ChatCompletionHandler::new(unreachable_client());
    let reply = tokio_test::block_on(
      chat.invoke(&ChatCompletionParams::new("", "hello"))
    );
    assert_eq!(reply, "Error: OpenAI API Key is required.");
}

#[tokio::test]
async fn test_validation_errors_make_no_request()
{   let server = MockServer::start_async().await;
    let any = server.mock_async(|when, then| {
      when.path_contains("/");
      then.status(200).body("{}");
    }).await;

    let list = ListAssistantsHandler::new(client_for(&server));
    let reply = list
      .invoke(&ListAssistantsParams::new("sk-x").limit("zero"))
      .await;
    assert_eq!(reply, "Error: Limit must be a positive integer.");

    let chat = ChatCompletionHandler::new(client_for(&server));
    let reply = chat
      .invoke(&ChatCompletionParams::new("sk-x", "hi").temperature("3"))
      .await;
    assert_eq!(
      reply,
      "Error: Temperature must be a number between 0 and 2."
    );

    assert_eq!(any.hits_async().await, 0);
}

// ===== Assistant listing =====

#[tokio::test]
async fn test_list_assistants_success()
{   let server = MockServer::start_async().await;
    let mock = server.mock_async(|when, then| {
      when.method(GET)
        .path("/assistants")
        .query_param("order", "desc")
        .query_param("limit", "20")
        .header("authorization", "Bearer sk-x")
        .header("openai-beta", "assistants=v2")
        .header("content-type", "application/json");
      then.status(200)
        .header("content-type", "application/json")
        .json_body(json!({
          "object": "list",
          "data": [{"id": "asst_1", "name": "Helper"}]
        }));
    }).await;

    let handler = ListAssistantsHandler::new(client_for(&server));
    let reply = handler.invoke(&ListAssistantsParams::new("sk-x")).await;

    mock.assert_async().await;
    let parsed: serde_json::Value = serde_json::from_str(&reply).unwrap();
    assert_eq!(parsed["data"][0]["id"], "asst_1");
    // Pretty-printed with two-space indentation
    assert!(reply.contains("\n  \"data\": ["));
}

#[tokio::test]
async fn test_list_assistants_custom_query()
{   let server = MockServer::start_async().await;
    let mock = server.mock_async(|when, then| {
      when.method(GET)
        .path("/assistants")
        .query_param("order", "asc")
        .query_param("limit", "3");
      then.status(200).json_body(json!({"data": []}));
    }).await;

    let handler = ListAssistantsHandler::new(client_for(&server));
    let params = ListAssistantsParams::new("sk-x").order("asc").limit("3");
    let reply = handler.invoke(&params).await;

    mock.assert_async().await;
    assert!(reply.contains("\"data\": []"));
}

#[tokio::test]
async fn test_list_assistants_api_error()
{   let server = MockServer::start_async().await;
    server.mock_async(|when, then| {
      when.method(GET).path("/assistants");
      then.status(401)
        .json_body(json!({"error": {"message": "invalid key"}}));
    }).await;

    let handler = ListAssistantsHandler::new(client_for(&server));
    let reply = handler.invoke(&ListAssistantsParams::new("sk-x")).await;
    assert_eq!(reply, "Error 401: invalid key");
}

#[tokio::test]
async fn test_list_assistants_error_without_message()
{   let server = MockServer::start_async().await;
    server.mock_async(|when, then| {
      when.method(GET).path("/assistants");
      then.status(500).json_body(json!({"detail": "boom"}));
    }).await;

    let handler = ListAssistantsHandler::new(client_for(&server));
    let reply = handler.invoke(&ListAssistantsParams::new("sk-x")).await;
    assert_eq!(reply, "Error 500: Unknown error");
}

#[tokio::test]
async fn test_list_assistants_non_json_body()
{   let server = MockServer::start_async().await;
    server.mock_async(|when, then| {
      when.method(GET).path("/assistants");
      then.status(200).body("not json");
    }).await;

    let handler = ListAssistantsHandler::new(client_for(&server));
    let reply = handler.invoke(&ListAssistantsParams::new("sk-x")).await;
    assert!(reply.starts_with("Error: Request failed - "), "{}", reply);
}

#[tokio::test]
async fn test_list_assistants_keeps_upstream_key_order()
{   let server = MockServer::start_async().await;
    server.mock_async(|when, then| {
      when.method(GET).path("/assistants");
      then.status(200)
        .header("content-type", "application/json")
        .body(r#"{"object":"list","data":[],"first_id":null,"has_more":false}"#);
    }).await;

    let handler = ListAssistantsHandler::new(client_for(&server));
    let reply = handler.invoke(&ListAssistantsParams::new("sk-x")).await;
    assert_eq!(
      reply,
      "{\n  \"object\": \"list\",\n  \"data\": [],\n  \"first_id\": null,\n  \"has_more\": false\n}"
    );
}

#[tokio::test]
async fn test_list_assistants_empty_error_message()
{   let server = MockServer::start_async().await;
    server.mock_async(|when, then| {
      when.method(GET).path("/assistants");
      then.status(400).body(r#"{"error":{"message":""}}"#);
    }).await;

    let handler = ListAssistantsHandler::new(client_for(&server));
    let reply = handler.invoke(&ListAssistantsParams::new("sk-x")).await;
    assert_eq!(reply, "Error 400: Unknown error");
}

#[tokio::test]
async fn test_list_assistants_sends_key_as_given()
{   let server = MockServer::start_async().await;
    let mock = server.mock_async(|when, then| {
      when.method(GET)
        .path("/assistants")
        .query_param("limit", "10")
        .header("authorization", "Bearer  sk-x");
      then.status(200).json_body(json!({"data": []}));
    }).await;

    let handler = ListAssistantsHandler::new(client_for(&server));
    let params = ListAssistantsParams::new(" sk-x").limit("10abc");
    let reply = handler.invoke(&params).await;

    mock.assert_async().await;
    assert!(reply.contains("\"data\": []"), "{}", reply);
}

#[tokio::test]
async fn test_list_assistants_transport_failure()
{   let handler = ListAssistantsHandler::new(unreachable_client());
    let reply = handler.invoke(&ListAssistantsParams::new("sk-x")).await;
    assert!(reply.starts_with("Error: Request failed - "), "{}", reply);
}

// ===== Chat completion =====

#[tokio::test]
async fn test_chat_returns_trimmed_reply()
{   let server = MockServer::start_async().await;
    let mock = server.mock_async(|when, then| {
      when.method(POST)
        .path("/chat/completions")
        .header("authorization", "Bearer sk-x")
        .json_body(json!({
          "model": "gpt-4o-mini",
          "messages": [
            {"role": "system", "content": "You are a helpful assistant."},
            {"role": "user", "content": "hello"}
          ],
          "temperature": 1.0,
          "max_completion_tokens": 4096,
          "frequency_penalty": 0.0
        }));
      then.status(200)
        .json_body(json!({
          "choices": [{"message": {"content": " hi there "}}]
        }));
    }).await;

    let handler = ChatCompletionHandler::new(client_for(&server));
    let reply = handler
      .invoke(&ChatCompletionParams::new("sk-x", "hello"))
      .await;

    mock.assert_async().await;
    assert_eq!(reply, "hi there");
}

#[tokio::test]
async fn test_chat_reasoning_model_request()
{   let server = MockServer::start_async().await;
    let mock = server.mock_async(|when, then| {
      when.method(POST)
        .path("/chat/completions")
        .json_body(json!({
          "model": "o1-mini",
          "messages": [
            {"role": "user", "content": "Think.\n\nhello"}
          ]
        }));
      then.status(200)
        .json_body(json!({
          "choices": [{"message": {"content": "ok"}}]
        }));
    }).await;

    let handler = ChatCompletionHandler::new(client_for(&server));
    let params = ChatCompletionParams::new("sk-x", "hello")
      .model("o1-mini")
      .system_prompt("Think.");
    let reply = handler.invoke(&params).await;

    mock.assert_async().await;
    assert_eq!(reply, "ok");
}

#[tokio::test]
async fn test_chat_api_error()
{   let server = MockServer::start_async().await;
    server.mock_async(|when, then| {
      when.method(POST).path("/chat/completions");
      then.status(401)
        .json_body(json!({"error": {"message": "invalid key"}}));
    }).await;

    let handler = ChatCompletionHandler::new(client_for(&server));
    let reply = handler
      .invoke(&ChatCompletionParams::new("sk-x", "hello"))
      .await;
    assert_eq!(reply, "Error 401: invalid key");
}

#[tokio::test]
async fn test_chat_api_error_empty_message()
{   let server = MockServer::start_async().await;
    server.mock_async(|when, then| {
      when.method(POST).path("/chat/completions");
      then.status(400).body(r#"{"error":{"message":""}}"#);
    }).await;

    let handler = ChatCompletionHandler::new(client_for(&server));
    let reply = handler
      .invoke(&ChatCompletionParams::new("sk-x", "hello"))
      .await;
    assert_eq!(reply, "Error 400: Unable to parse error details.");
}

#[tokio::test]
async fn test_chat_api_error_unparsable()
{   let server = MockServer::start_async().await;
    server.mock_async(|when, then| {
      when.method(POST).path("/chat/completions");
      then.status(502).body("<html>Bad Gateway</html>");
    }).await;

    let handler = ChatCompletionHandler::new(client_for(&server));
    let reply = handler
      .invoke(&ChatCompletionParams::new("sk-x", "hello"))
      .await;
    assert_eq!(reply, "Error 502: Unable to parse error details.");
}

#[tokio::test]
async fn test_chat_unparsable_success_body()
{   let server = MockServer::start_async().await;
    server.mock_async(|when, then| {
      when.method(POST).path("/chat/completions");
      then.status(200).body("garbage");
    }).await;

    let handler = ChatCompletionHandler::new(client_for(&server));
    let reply = handler
      .invoke(&ChatCompletionParams::new("sk-x", "hello"))
      .await;
    assert_eq!(reply, "Error: Failed to parse API response.");
}

#[tokio::test]
async fn test_chat_missing_content()
{   let bodies = [
      json!({"choices": []})
    , json!({"choices": [{"message": {}}]})
    , json!({"choices": [{"message": {"content": null}}]})
    , json!({"choices": [{"message": {"content": 42}}]})
    , json!({"id": "chatcmpl-1"})
    ];

    for body in bodies
    {   let server = MockServer::start_async().await;
        let reply_body = body.clone();
        server.mock_async(move |when, then| {
          when.method(POST).path("/chat/completions");
          then.status(200).json_body(reply_body);
        }).await;

        let handler = ChatCompletionHandler::new(client_for(&server));
        let reply = handler
          .invoke(&ChatCompletionParams::new("sk-x", "hello"))
          .await;
        assert_eq!(
          reply,
          "Error: Received an invalid response from the API.",
          "body {}", body
        );
    }
}

#[tokio::test]
async fn test_chat_transport_failure()
{   let handler = ChatCompletionHandler::new(unreachable_client());
    let reply = handler
      .invoke(&ChatCompletionParams::new("sk-x", "hello"))
      .await;
    assert!(reply.starts_with("Error: Request failed - "), "{}", reply);
}

// ===== Configuration =====

#[test]
fn test_default_config()
{   let config = ClientConfig::default();
    assert_eq!(config.base(), "https://api.openai.com/v1");
    assert!(config.timeout_secs.is_none());
    assert!(config.build_http_client().is_ok());
}

#[tokio::test]
async fn test_handler_from_config()
{   let server = MockServer::start_async().await;
    server.mock_async(|when, then| {
      when.method(GET).path("/assistants");
      then.status(200).json_body(json!({"data": []}));
    }).await;

    let config = ClientConfig
    {   api_base: format!("{}/", server.base_url())
      , timeout_secs: Some(5)
      , verbose: false
    };
    let handler = ListAssistantsHandler::from_config(&config).unwrap();
    let reply = handler.invoke(&ListAssistantsParams::new("sk-x")).await;
    assert!(reply.contains("\"data\""), "{}", reply);
}
