//! End-to-end tests of the request pipeline through `App::handle`.

use std::sync::Arc;

use bytes::Bytes;
use contour_core::{
    schema, Endpoint, FnMiddleware, HandlerInput, InputSchemas, Output, OutputSchemas,
    UploadedFile,
};
use contour_server::{App, HttpResponse, PipelineOptions};
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Map, Value};

async fn body_bytes(response: HttpResponse) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

async fn json_body(response: HttpResponse) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

fn post_json(path: &str, body: &Value) -> Request<Bytes> {
    Request::post(path)
        .header("content-type", "application/json")
        .body(Bytes::from(body.to_string()))
        .unwrap()
}

fn create_user() -> Endpoint {
    Endpoint::post("/")
        .input(InputSchemas::new().body(schema::object().field("username", schema::string())))
        .handle_sync(|input| Ok(Output::json(json!({ "created": input.body["username"] }))))
}

fn hello() -> Endpoint {
    Endpoint::get("/:username")
        .input(InputSchemas::new().params(schema::object().field("username", schema::string())))
        .output(OutputSchemas::new().body(schema::object().field("message", schema::string())))
        .handle_sync(|input| {
            let name = input.param("username").unwrap_or_default();
            Ok(Output::json(json!({ "message": format!("Hello {name}") })))
        })
}

#[tokio::test]
async fn test_invalid_body_yields_error_envelope() {
    let app = App::new().with_endpoint(create_user()).unwrap();

    let response = app.handle(post_json("/", &json!({ "username": 1 }))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({
            "status": "error",
            "message": "Invalid body",
            "data": { "username": { "message": "Expected a string, but found number" } }
        })
    );
}

#[tokio::test]
async fn test_input_error_status_is_configurable() {
    let app = App::new()
        .with_endpoint(create_user())
        .unwrap()
        .with_options(PipelineOptions {
            input_error_status: StatusCode::BAD_REQUEST,
            ..PipelineOptions::default()
        });

    let response = app.handle(post_json("/", &json!({}))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Invalid body");
    assert_eq!(body["data"]["username"]["message"], "data is missing");
}

#[tokio::test]
async fn test_valid_body_reaches_handler() {
    let app = App::new().with_endpoint(create_user()).unwrap();

    let response = app.handle(post_json("/", &json!({ "username": "tarin" }))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    assert_eq!(json_body(response).await, json!({ "created": "tarin" }));
}

#[tokio::test]
async fn test_path_parameter_greeting() {
    let app = App::new().with_endpoint(hello()).unwrap();

    let request = Request::get("/Tarin").body(Bytes::new()).unwrap();
    let response = app.handle(request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "application/json");
    assert_eq!(json_body(response).await, json!({ "message": "Hello Tarin" }));
}

#[tokio::test]
async fn test_encoded_path_parameter_is_decoded() {
    let app = App::new().with_endpoint(hello()).unwrap();

    let request = Request::get("/Ada%20Lovelace").body(Bytes::new()).unwrap();
    let response = app.handle(request).await;
    assert_eq!(
        json_body(response).await,
        json!({ "message": "Hello Ada Lovelace" })
    );
}

#[tokio::test]
async fn test_middleware_stages_compose() {
    let endpoint = Endpoint::get("/greeting")
        .output(OutputSchemas::new().body(schema::object().field("greeting", schema::string())))
        .middleware(FnMiddleware::new("user", |input: &HandlerInput| {
            let name = input.header("x-user").unwrap_or("guest").to_string();
            async move {
                let mut out = Map::new();
                out.insert("user".to_string(), json!(name));
                Ok(out)
            }
        }))
        .middleware(FnMiddleware::new("greeting", |input: &HandlerInput| {
            let user = input
                .middleware_value("user")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            async move {
                let mut out = Map::new();
                out.insert("salutation".to_string(), json!(format!("Welcome, {user}")));
                Ok(out)
            }
        }))
        .handle_sync(|input| {
            let user = input.middleware["user"].as_str().unwrap_or_default().to_string();
            let salutation = input.middleware["salutation"]
                .as_str()
                .unwrap_or_default()
                .to_string();
            Ok(Output::json(json!({ "greeting": format!("{salutation} ({user})") })))
        });
    let app = App::new().with_endpoint(endpoint).unwrap();

    let request = Request::get("/greeting")
        .header("x-user", "tarin")
        .body(Bytes::new())
        .unwrap();
    let response = app.handle(request).await;
    assert_eq!(
        json_body(response).await,
        json!({ "greeting": "Welcome, tarin (tarin)" })
    );
}

#[tokio::test]
async fn test_multipart_output_data_part_parses_back() {
    let body = json!({ "pages": 2, "title": "report" });
    let returned = body.clone();
    let endpoint = Endpoint::get("/report")
        .output(
            OutputSchemas::new()
                .body(schema::object())
                .files(schema::object().field("report", schema::file())),
        )
        .handle_sync(move |_| {
            Ok(Output::json(returned.clone()).file(
                "report",
                UploadedFile::new("report.pdf", "application/pdf", Bytes::from_static(b"%PDF")),
            ))
        });
    let app = App::new().with_endpoint(endpoint).unwrap();

    let response = app
        .handle(Request::get("/report").body(Bytes::new()).unwrap())
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
    let boundary = content_type
        .strip_prefix("multipart/form-data; boundary=")
        .unwrap()
        .to_string();

    let raw = String::from_utf8(body_bytes(response).await.to_vec()).unwrap();
    let parts: Vec<&str> = raw
        .split(&format!("--{boundary}"))
        .filter(|part| !part.is_empty() && !part.starts_with("--"))
        .collect();
    assert_eq!(parts.len(), 2);
    assert!(parts[0].contains("name=\"report\""));
    assert!(parts[0].contains("%PDF"));

    let (headers, content) = parts[1].split_once("\r\n\r\n").unwrap();
    assert!(headers.contains("name=\"data\""));
    let parsed: Value = serde_json::from_str(content.trim_end()).unwrap();
    assert_eq!(parsed, body);
}

#[tokio::test]
async fn test_multipart_request_files_are_validated() {
    let endpoint = Endpoint::post("/avatar")
        .input(
            InputSchemas::new()
                .body(schema::object().field("caption", schema::string()))
                .files(schema::object().field("avatar", schema::file().max_size(8))),
        )
        .handle_sync(|input| {
            let size = input.files.get("avatar").map_or(0, UploadedFile::size);
            Ok(Output::json(json!({ "caption": input.body["caption"], "size": size })))
        });
    let app = App::new().with_endpoint(endpoint).unwrap();

    let multipart = |content: &str| {
        let body = format!(
            "--XyZ\r\nContent-Disposition: form-data; name=\"caption\"\r\n\r\nme\r\n\
             --XyZ\r\nContent-Disposition: form-data; name=\"avatar\"; filename=\"a.png\"\r\n\
             Content-Type: image/png\r\n\r\n{content}\r\n--XyZ--\r\n"
        );
        Request::post("/avatar")
            .header("content-type", "multipart/form-data; boundary=XyZ")
            .body(Bytes::from(body))
            .unwrap()
    };

    let response = app.handle(multipart("12345")).await;
    assert_eq!(json_body(response).await, json!({ "caption": "me", "size": 5 }));

    let response = app.handle(multipart("0123456789")).await;
    let body = json_body(response).await;
    assert_eq!(body["message"], "Invalid files");
    assert!(body["data"]["avatar"].is_object());
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = App::new().with_endpoint(hello()).unwrap();

    let request = Request::delete("/Tarin").body(Bytes::new()).unwrap();
    let response = app.handle(request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        json_body(response).await,
        json!({ "status": "error", "message": "Path Not Found" })
    );
}

#[tokio::test]
async fn test_configuration_errors_are_500() {
    let app = App::new()
        .with_endpoint(Endpoint::get("/bare").handle_sync(|_| Ok(Output::new())))
        .unwrap()
        .with_endpoint(Endpoint::get("/idle").output(OutputSchemas::new().body(schema::object())))
        .unwrap();

    let response = app.handle(Request::get("/bare").body(Bytes::new()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response).await,
        json!({ "status": "error", "message": "Both input type and output type were not specified" })
    );

    let response = app.handle(Request::get("/idle").body(Bytes::new()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response).await,
        json!({ "status": "error", "message": "No logic specified by the server" })
    );
}

#[tokio::test]
async fn test_domain_errors_are_verbatim() {
    let endpoint = Arc::new(
        Endpoint::post("/users")
            .input(InputSchemas::new().body(schema::object().field("username", schema::string())))
            .error(schema::object().field("reason", schema::string()))
            .handle(|input: HandlerInput| async move {
                if input.body["username"] == "taken" {
                    Err(json!({ "reason": "username taken" }))
                } else {
                    Ok(Output::new())
                }
            }),
    );
    let app = App::new().with_endpoint(endpoint).unwrap();

    let response = app
        .handle(post_json("/users", &json!({ "username": "taken" })))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await, json!({ "reason": "username taken" }));

    let response = app
        .handle(post_json("/users", &json!({ "username": "fresh" })))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({}));
}
