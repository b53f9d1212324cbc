use chatline_core::{Config, Message, MessageRecord, Session};
use chatline_providers::Client;
use chatline_tools::{FunctionCall, Tool, ToolRegistry};
use mockito::Matcher;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

fn client_for(server: &mockito::Server) -> Client {
    let config = Config::new("sk-test", "gpt-4o")
        .with_endpoint(format!("{}/v1/chat/completions", server.url()));
    Client::with_config(config)
}

fn completion_body(content: &str) -> String {
    json!({
        "id": "chatcmpl-1",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
    })
    .to_string()
}

#[test]
fn test_conversation_turn_with_auto_sync() {
    let temp_dir = TempDir::new().unwrap();
    let history = temp_dir.path().join("chat.history");

    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .match_body(Matcher::PartialJson(json!({
            "model": "gpt-4o",
            "messages": [
                {"role": "system", "content": "You are a helpful assistant."},
                {"role": "user", "content": "Say hi"}
            ]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body("Hi!"))
        .create();

    let client = client_for(&server);
    let mut session = client
        .new_session_with(|s| {
            s.enable_auto_sync_with(&history, |s| {
                s.append_with(|s| s.new_message("system").text("You are a helpful assistant."))
            })
        })
        .unwrap();
    session
        .append_with(|s| s.new_message("user").text("Say hi"))
        .unwrap();

    let response = client.send(|req| req.attach_session(&session));
    mock.assert();

    assert!(response.is_success(), "{:?}", response.error());
    let completion = response.completion().unwrap().to_string();
    assert_eq!(completion, "Hi!\n");
    session
        .append(Message::new("assistant").text(completion))
        .unwrap();

    // A later run reloads the file instead of seeding again.
    let mut seeded_again = false;
    let mut resumed = Session::new();
    resumed
        .enable_auto_sync_with(&history, |_| {
            seeded_again = true;
            Ok(())
        })
        .unwrap();

    assert!(!seeded_again);
    assert_eq!(resumed.history(), session.history());
    let roles: Vec<_> = resumed.history().iter().filter_map(MessageRecord::role).collect();
    assert_eq!(roles, ["system", "user", "assistant"]);
}

#[test]
fn test_image_message_goes_out_as_content_parts() {
    let temp_dir = TempDir::new().unwrap();
    let image = temp_dir.path().join("screen.png");
    std::fs::write(&image, b"png").unwrap();

    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::PartialJson(json!({
            "messages": [{
                "role": "user",
                "content": [
                    {"type": "image_url", "image_url": {"url": "data:image/png;base64,cG5n"}},
                    {"type": "text", "text": "What is on screen?"}
                ]
            }]
        })))
        .with_status(200)
        .with_body(completion_body("A terminal."))
        .create();

    let client = client_for(&server);
    let mut session = client.new_session();
    session
        .append(client.new_message("user").text("What is on screen?").image(&image))
        .unwrap();

    let response = client.send(|req| req.attach_session(&session));
    mock.assert();
    assert_eq!(response.completion(), Some("A terminal.\n"));
}

#[test]
fn test_http_error_becomes_failed_response() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(401)
        .with_body("{\"error\":{\"message\":\"bad key\"}}")
        .create();

    let client = client_for(&server);
    let session = client.new_session();
    let response = client.send(|req| req.attach_session(&session));

    assert!(!response.is_success());
    assert_eq!(response.error(), Some("HTTP 401 Unauthorized"));
    assert!(response.completion().is_none());
}

#[test]
fn test_unreachable_endpoint_becomes_failed_response() {
    let config = Config::new("sk-test", "gpt-4o").with_endpoint("http://127.0.0.1:1/v1/chat/completions");
    let client = Client::with_config(config);

    let response = client.send(|req| req);
    assert!(!response.is_success());
    assert!(!response.error().unwrap().is_empty());
}

struct WeatherTool {
    cities: Mutex<Vec<String>>,
}

impl Tool for WeatherTool {
    fn name(&self) -> &str {
        "get_weather"
    }

    fn description(&self) -> &str {
        "Current weather for a city"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {"city": {"type": "string"}},
            "required": ["city"]
        })
    }

    fn execute(&self, args: Value) -> chatline_tools::base::Result<String> {
        let city = args["city"].as_str().unwrap_or_default().to_string();
        self.cities.lock().unwrap().push(city.clone());
        Ok(format!("Sunny in {}", city))
    }
}

#[test]
fn test_function_call_is_dispatched_to_registry() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::PartialJson(json!({
            "functions": [{"name": "get_weather", "description": "Current weather for a city"}]
        })))
        .with_status(200)
        .with_body(
            json!({
                "choices": [{"message": {
                    "role": "assistant",
                    "content": null,
                    "function_call": {"name": "get_weather", "arguments": "{\"city\":\"Oslo\"}"}
                }}]
            })
            .to_string(),
        )
        .create();

    let tool = Arc::new(WeatherTool {
        cities: Mutex::new(Vec::new()),
    });
    let mut registry = ToolRegistry::new();
    registry.register(tool.clone());

    let client = client_for(&server);
    let mut session = client.new_session();
    session
        .append(client.new_message("user").text("Weather in Oslo?"))
        .unwrap();

    let response = client.send(|req| req.attach_session(&session).attach_tools(&registry));
    mock.assert();

    assert!(response.is_success());
    assert!(response.completion().is_none());
    assert_eq!(
        response.function_call(),
        Some(&FunctionCall::new("get_weather", "{\"city\":\"Oslo\"}"))
    );
    assert_eq!(*tool.cities.lock().unwrap(), vec!["Oslo".to_string()]);
}
