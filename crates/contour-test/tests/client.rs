//! Driving a small API through the in-memory client.

use bytes::Bytes;
use contour_core::{
    schema, Endpoint, FnMiddleware, HandlerInput, InputSchemas, Output, OutputSchemas,
    UploadedFile,
};
use contour_server::{App, PipelineOptions};
use contour_test::TestClient;
use http::StatusCode;
use serde_json::{json, Map};

fn api() -> App {
    let search = Endpoint::get("/search")
        .input(
            InputSchemas::new().query(
                schema::object()
                    .field("q", schema::string().min(2))
                    .field("limit", schema::number().optional()),
            ),
        )
        .handle_sync(|input| Ok(Output::json(json!({ "q": input.query["q"] }))));

    let report = Endpoint::get("/reports/:id")
        .input(InputSchemas::new().params(schema::object().field("id", schema::string())))
        .output(
            OutputSchemas::new()
                .body(schema::object().field("id", schema::string()))
                .files(schema::object().field("report", schema::file())),
        )
        .handle_sync(|input| {
            let id = input.param("id").unwrap_or_default().to_string();
            Ok(Output::json(json!({ "id": id })).file(
                "report",
                UploadedFile::new("report.pdf", "application/pdf", Bytes::from_static(b"%PDF")),
            ))
        });

    let whoami = Endpoint::get("/whoami")
        .input(InputSchemas::new().headers(schema::object().field("x-user", schema::string())))
        .output(OutputSchemas::new().body(schema::object()))
        .middleware(FnMiddleware::new("user", |input: &HandlerInput| {
            let user = input.header("x-user").map(str::to_uppercase);
            async move {
                let mut out = Map::new();
                out.insert("user".to_string(), json!(user));
                Ok(out)
            }
        }))
        .handle_sync(|input| Ok(Output::json(json!({ "user": input.middleware["user"] }))));

    App::new()
        .with_endpoint(search)
        .unwrap()
        .with_endpoint(report)
        .unwrap()
        .with_endpoint(whoami)
        .unwrap()
}

#[tokio::test]
async fn test_query_validation_error() {
    let client = TestClient::new(api());
    client
        .get("/search?q=a")
        .send()
        .await
        .assert_status(StatusCode::OK)
        .assert_json(&json!({
            "status": "error",
            "message": "Invalid query",
            "data": { "q": { "message": "String length must be at least 2 characters" } }
        }));
}

#[tokio::test]
async fn test_query_first_value_wins() {
    let client = TestClient::new(api());
    client
        .get("/search?q=rust&q=go")
        .send()
        .await
        .assert_json(&json!({ "q": "rust" }));
}

#[tokio::test]
async fn test_input_error_status_is_configurable() {
    let app = api().with_options(PipelineOptions {
        input_error_status: StatusCode::BAD_REQUEST,
        ..PipelineOptions::default()
    });
    let client = TestClient::new(app);
    client
        .get("/search")
        .send()
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_multipart_response() {
    let client = TestClient::new(api());
    let response = client.get("/reports/r-1").send().await;

    assert!(response.is_multipart());
    let parts = response.multipart().await.unwrap();
    assert_eq!(parts.files["report"].buffer().as_ref(), b"%PDF");
    assert_eq!(response.multipart_json().await.unwrap(), json!({ "id": "r-1" }));
}

#[tokio::test]
async fn test_middleware_sees_validated_headers() {
    let client = TestClient::new(api());
    client
        .get("/whoami")
        .header("X-User", "tarin")
        .send()
        .await
        .assert_json(&json!({ "user": "TARIN" }));

    client
        .get("/whoami")
        .send()
        .await
        .assert_json(&json!({
            "status": "error",
            "message": "Invalid headers",
            "data": { "x-user": { "message": "data is missing" } }
        }));
}
