//! Axum HTTP handlers for the GraphQL endpoint.
//!
//! The POST handler accepts the standard JSON request body, the GET handler
//! serves GraphiQL to browsers and executes URL-parameter queries
//! otherwise. Inbound bodies carrying an empty-string `operationName` are
//! normalized to an absent value before execution; some clients send `""`
//! instead of omitting the field.

use std::sync::Arc;

use async_graphql::http::GraphiQLSource;
use async_graphql::{Request, Variables};
use axum::Json;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use gqlforge_schema::SchemaHost;

use crate::context::ContextFn;

/// The normalized request context, available to resolvers through the
/// engine's data mechanism.
#[derive(Debug, Clone)]
pub struct RequestContext(pub Value);

/// State shared across the GraphQL handlers.
#[derive(Clone)]
pub struct GraphQLState {
    /// Schema slot; empty until bootstrap publishes the schema.
    pub schema: Arc<SchemaHost>,

    /// Canonical context factory.
    pub context: ContextFn,

    /// Whether the GraphiQL page is served on GET.
    pub graphiql: bool,

    /// Path the endpoint is mounted at (used by the GraphiQL page).
    pub path: String,

    /// Query JIT threshold, reserved for the execution engine.
    pub jit: i64,
}

/// GraphQL request body.
#[derive(Debug, Deserialize)]
pub struct GraphQLRequest {
    pub query: String,

    #[serde(rename = "operationName")]
    pub operation_name: Option<String>,

    pub variables: Option<Value>,
}

/// Query parameters for GET requests.
#[derive(Debug, Deserialize)]
pub struct GraphQLQueryParams {
    pub query: Option<String>,

    #[serde(rename = "operationName")]
    pub operation_name: Option<String>,

    /// Variables as a JSON-encoded string.
    pub variables: Option<String>,
}

/// Normalizes an empty-string operation name to an absent value.
#[must_use]
pub fn normalize_operation_name(name: Option<String>) -> Option<String> {
    name.filter(|name| !name.is_empty())
}

/// POST handler: executes the JSON request body.
pub async fn graphql_handler(
    State(state): State<GraphQLState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Json(request): Json<GraphQLRequest>,
) -> Response {
    execute(state, method, uri, headers, request).await
}

/// GET handler: serves GraphiQL to browsers, otherwise executes the query
/// from URL parameters.
pub async fn graphql_handler_get(
    State(state): State<GraphQLState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Query(params): Query<GraphQLQueryParams>,
) -> Response {
    let accepts_html = headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"));

    if state.graphiql && accepts_html && params.query.is_none() {
        return Html(GraphiQLSource::build().endpoint(&state.path).finish()).into_response();
    }

    let Some(query) = params.query else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"errors": [{"message": "missing 'query' parameter"}]})),
        )
            .into_response();
    };

    let variables = params
        .variables
        .and_then(|raw| serde_json::from_str(&raw).ok());

    execute(
        state,
        method,
        uri,
        headers,
        GraphQLRequest {
            query,
            operation_name: params.operation_name,
            variables,
        },
    )
    .await
}

async fn execute(
    state: GraphQLState,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    request: GraphQLRequest,
) -> Response {
    let Some(schema) = state.schema.get() else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"errors": [{"message": "schema is not initialized yet"}]})),
        )
            .into_response();
    };

    let operation_name = normalize_operation_name(request.operation_name);
    let envelope = request_envelope(&method, &uri, &headers);
    let context = (state.context)(envelope, Value::Null).await;

    let mut gql_request = Request::new(&request.query);
    if let Some(operation_name) = operation_name {
        gql_request = gql_request.operation_name(operation_name);
    }
    if let Some(variables) = request.variables {
        gql_request = gql_request.variables(Variables::from_json(variables));
    }
    gql_request = gql_request.data(RequestContext(context));

    debug!(query = %request.query, "executing graphql request");
    let response = schema.execute(gql_request).await;

    // GraphQL responses are 200 OK even when they carry errors.
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(response),
    )
        .into_response()
}

/// Serializes the parts of the HTTP request that context factories see.
fn request_envelope(method: &Method, uri: &Uri, headers: &HeaderMap) -> Value {
    let headers: serde_json::Map<String, Value> = headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), Value::String(value.to_string())))
        })
        .collect();

    json!({
        "method": method.as_str(),
        "uri": uri.to_string(),
        "headers": headers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_operation_name() {
        assert_eq!(normalize_operation_name(None), None);
        assert_eq!(normalize_operation_name(Some(String::new())), None);
        assert_eq!(
            normalize_operation_name(Some("GetRecipes".to_string())),
            Some("GetRecipes".to_string())
        );
    }

    #[test]
    fn test_request_envelope_shape() {
        let mut headers = HeaderMap::new();
        headers.insert("x-request-id", "req-1".parse().unwrap());

        let envelope = request_envelope(
            &Method::POST,
            &"/graphql".parse().unwrap(),
            &headers,
        );

        assert_eq!(envelope["method"], "POST");
        assert_eq!(envelope["uri"], "/graphql");
        assert_eq!(envelope["headers"]["x-request-id"], "req-1");
    }

    #[test]
    fn test_request_body_deserialization() {
        let body: GraphQLRequest = serde_json::from_str(
            r#"{"query": "{ ping }", "operationName": "", "variables": {"a": 1}}"#,
        )
        .unwrap();
        assert_eq!(body.operation_name.as_deref(), Some(""));
        assert_eq!(normalize_operation_name(body.operation_name), None);
        assert_eq!(body.variables.unwrap()["a"], 1);
    }
}
