//! JSON request/response contract for driving a `WebviewClient` remotely.
//!
//! Requests: `{"id": 1, "method": "createWebview", "params": {...}}`.
//! Responses: `{"id": 1, "ok": true, "result": {...}}` or
//! `{"id": 1, "ok": false, "error": {"code": "NOT_FOUND", "message": "..."}}`.

use multiview_common::{Rect, WebviewError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::manager::CreateOptions;
use crate::service::WebviewClient;

const MISSING_ID: &str = "Must provide webview id";
const MISSING_URL: &str = "Must provide url";
const MISSING_CODE: &str = "Must provide code to execute";
const MISSING_FRAME: &str = "Must provide frame";
const MISSING_DATA: &str = "Must provide data";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Echoed back untouched. Any JSON value.
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub id: Value,
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl Response {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            id,
            ok: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Value, err: &WebviewError) -> Self {
        Self {
            id,
            ok: false,
            result: None,
            error: Some(ErrorBody {
                code: err.code().to_string(),
                message: err.to_string(),
            }),
        }
    }
}

pub fn parse_request(line: &str) -> Result<Request, serde_json::Error> {
    serde_json::from_str(line)
}

// =============================================================================
// PARAMS
// =============================================================================

/// Frame as sent on the wire. Missing components are zero.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireFrame {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl From<WireFrame> for Rect {
    fn from(f: WireFrame) -> Self {
        Rect::new(f.x, f.y, f.width, f.height)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateParams {
    id: Option<String>,
    url: Option<String>,
    frame: Option<WireFrame>,
    auto_focus: Option<bool>,
    #[serde(rename = "enableJavaScript")]
    javascript: Option<bool>,
    #[serde(rename = "allowFileAccess")]
    file_access: Option<bool>,
    user_agent: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct IdParams {
    id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LoadUrlParams {
    id: Option<String>,
    url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ByUrlParams {
    url: Option<String>,
    exact_match: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct FrameParams {
    id: Option<String>,
    frame: Option<WireFrame>,
}

#[derive(Debug, Default, Deserialize)]
struct ScriptParams {
    id: Option<String>,
    code: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct MessageParams {
    id: Option<String>,
    data: Option<Value>,
}

/// `null` or absent params read as `{}`.
fn params<T: DeserializeOwned + Default>(raw: Value) -> Result<T, WebviewError> {
    if raw.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(raw)
        .map_err(|e| WebviewError::InvalidArgument(format!("invalid params: {e}")))
}

fn required(value: Option<String>, message: &str) -> Result<String, WebviewError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| WebviewError::InvalidArgument(message.to_string()))
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Run one request against the service. Always produces a response.
///
/// `defaults` supplies every create option the request leaves out.
pub async fn dispatch(client: &WebviewClient, defaults: &CreateOptions, request: Request) -> Response {
    let Request { id, method, params } = request;
    match call(client, defaults, &method, params).await {
        Ok(result) => Response::success(id, result),
        Err(err) => {
            debug!(method = %method, code = err.code(), error = %err, "request failed");
            Response::failure(id, &err)
        }
    }
}

async fn call(
    client: &WebviewClient,
    defaults: &CreateOptions,
    method: &str,
    raw: Value,
) -> Result<Value, WebviewError> {
    match method {
        "createWebview" => {
            let p: CreateParams = params(raw)?;
            let id = required(p.id, MISSING_ID)?;
            let options = CreateOptions {
                url: p.url.or_else(|| defaults.url.clone()),
                frame: p.frame.map(Rect::from).or(defaults.frame),
                auto_focus: p.auto_focus.unwrap_or(defaults.auto_focus),
                javascript: p.javascript.unwrap_or(defaults.javascript),
                file_access: p.file_access.unwrap_or(defaults.file_access),
                user_agent: p.user_agent.or_else(|| defaults.user_agent.clone()),
            };
            client.create(id, options).await?;
            Ok(json!({}))
        }
        "setFocusedWebview" => {
            let p: IdParams = params(raw)?;
            client.focus(required(p.id, MISSING_ID)?).await?;
            Ok(json!({}))
        }
        "getFocusedWebview" => {
            let focused = client.focused().await?;
            Ok(json!({ "id": focused }))
        }
        "hideWebview" => {
            let p: IdParams = params(raw)?;
            client.hide(required(p.id, MISSING_ID)?).await?;
            Ok(json!({}))
        }
        "showWebview" => {
            let p: IdParams = params(raw)?;
            client.show(required(p.id, MISSING_ID)?).await?;
            Ok(json!({}))
        }
        "destroyWebview" => {
            let p: IdParams = params(raw)?;
            client.destroy(required(p.id, MISSING_ID)?).await?;
            Ok(json!({}))
        }
        "loadUrl" => {
            let p: LoadUrlParams = params(raw)?;
            let id = required(p.id, MISSING_ID)?;
            let url = required(p.url, MISSING_URL)?;
            client.navigate(id, url).await?;
            Ok(json!({}))
        }
        "listWebviews" => {
            let ids = client.list().await?;
            Ok(json!({ "webviews": ids }))
        }
        "getWebviewInfo" => {
            let p: IdParams = params(raw)?;
            let info = client.info(required(p.id, MISSING_ID)?).await?;
            to_value(&info)
        }
        "getAllWebviews" => {
            let infos = to_value(&client.info_all().await?)?;
            Ok(json!({ "webviews": infos }))
        }
        "getWebviewsByUrl" => {
            let p: ByUrlParams = params(raw)?;
            let url = required(p.url, MISSING_URL)?;
            let ids = client
                .find_by_url(url, p.exact_match.unwrap_or(false))
                .await?;
            Ok(json!({ "webviews": ids }))
        }
        "setWebviewFrame" => {
            let p: FrameParams = params(raw)?;
            let id = required(p.id, MISSING_ID)?;
            let frame = p
                .frame
                .ok_or_else(|| WebviewError::InvalidArgument(MISSING_FRAME.into()))?;
            client.set_frame(id, frame.into()).await?;
            Ok(json!({}))
        }
        "executeJavaScript" => {
            let p: ScriptParams = params(raw)?;
            let id = required(p.id, MISSING_ID)?;
            let code = required(p.code, MISSING_CODE)?;
            let result = client.evaluate_script(id, code).await?;
            Ok(json!({ "result": result }))
        }
        "sendMessage" => {
            let p: MessageParams = params(raw)?;
            let id = required(p.id, MISSING_ID)?;
            let data = p
                .data
                .ok_or_else(|| WebviewError::InvalidArgument(MISSING_DATA.into()))?;
            client.send_message(id, data).await?;
            Ok(json!({}))
        }
        other => Err(WebviewError::InvalidArgument(format!(
            "unknown method: {other}"
        ))),
    }
}

fn to_value<T: Serialize>(value: &T) -> Result<Value, WebviewError> {
    serde_json::to_value(value).map_err(|e| WebviewError::InvalidArgument(e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::backends::headless::{HeadlessFactory, SurfaceCall};
    use crate::events::EventQueue;
    use crate::service::WebviewService;

    fn start(factory: HeadlessFactory) -> WebviewClient {
        let (service, client) = WebviewService::new(factory, Arc::new(EventQueue::new()));
        tokio::spawn(service.run());
        client
    }

    async fn send(client: &WebviewClient, line: &str) -> Response {
        let request = parse_request(line).unwrap();
        dispatch(client, &CreateOptions::default(), request).await
    }

    #[test]
    fn request_defaults_missing_fields() {
        let req = parse_request(r#"{"method":"listWebviews"}"#).unwrap();
        assert!(req.id.is_null());
        assert!(req.params.is_null());
    }

    #[test]
    fn failure_response_shape() {
        let resp = Response::failure(json!(7), &WebviewError::NotFound("x".into()));
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 7,
                "ok": false,
                "error": {"code": "NOT_FOUND", "message": "webview with id 'x' not found"}
            })
        );
    }

    #[tokio::test]
    async fn create_applies_defaults_and_wire_names() {
        let factory = HeadlessFactory::recording();
        let client = start(factory.clone());

        let resp = send(
            &client,
            r#"{"id":1,"method":"createWebview","params":{"id":"a","frame":{"width":300,"height":200},"enableJavaScript":false,"userAgent":"UA/1"}}"#,
        )
        .await;
        assert!(resp.ok, "{resp:?}");
        assert_eq!(resp.id, json!(1));

        let options = factory
            .calls()
            .into_iter()
            .find_map(|c| match c {
                SurfaceCall::Created { options, .. } => Some(options),
                _ => None,
            })
            .unwrap();
        assert_eq!(options.frame, Some(Rect::new(0.0, 0.0, 300.0, 200.0)));
        assert!(!options.javascript);
        assert!(!options.file_access);
        assert_eq!(options.user_agent.as_deref(), Some("UA/1"));

        let focused = send(&client, r#"{"id":2,"method":"getFocusedWebview"}"#).await;
        assert_eq!(focused.result, Some(json!({"id": "a"})));
    }

    #[tokio::test]
    async fn info_uses_wire_field_names() {
        let client = start(HeadlessFactory::recording());
        send(
            &client,
            r#"{"id":1,"method":"createWebview","params":{"id":"a","url":"https://example.com"}}"#,
        )
        .await;

        let resp = send(&client, r#"{"id":2,"method":"getWebviewInfo","params":{"id":"a"}}"#).await;
        let info = resp.result.unwrap();
        assert_eq!(info["id"], "a");
        assert_eq!(info["url"], "https://example.com");
        assert_eq!(info["isFocused"], true);
        assert_eq!(info["isHidden"], false);

        let all = send(&client, r#"{"id":3,"method":"getAllWebviews"}"#).await;
        assert_eq!(all.result.unwrap()["webviews"][0]["id"], "a");

        let by_url = send(
            &client,
            r#"{"id":4,"method":"getWebviewsByUrl","params":{"url":"https://example.com","exactMatch":true}}"#,
        )
        .await;
        assert_eq!(by_url.result, Some(json!({"webviews": ["a"]})));
    }

    #[tokio::test]
    async fn missing_required_params_are_invalid() {
        let client = start(HeadlessFactory::recording());
        let cases = [
            (r#"{"id":1,"method":"createWebview","params":{}}"#, MISSING_ID),
            (r#"{"id":2,"method":"hideWebview"}"#, MISSING_ID),
            (r#"{"id":3,"method":"loadUrl","params":{"id":"a","url":""}}"#, MISSING_URL),
            (r#"{"id":4,"method":"executeJavaScript","params":{"id":"a"}}"#, MISSING_CODE),
            (r#"{"id":5,"method":"setWebviewFrame","params":{"id":"a"}}"#, MISSING_FRAME),
            (r#"{"id":6,"method":"sendMessage","params":{"id":"a"}}"#, MISSING_DATA),
        ];
        for (line, message) in cases {
            let resp = send(&client, line).await;
            let error = resp.error.unwrap();
            assert_eq!(error.code, "INVALID_ARGUMENT", "{line}");
            assert!(error.message.contains(message), "{line}: {}", error.message);
        }
    }

    #[tokio::test]
    async fn unknown_method_and_bad_params() {
        let client = start(HeadlessFactory::recording());

        let resp = send(&client, r#"{"id":1,"method":"teleport"}"#).await;
        assert!(!resp.ok);
        assert!(resp.error.unwrap().message.contains("teleport"));

        let resp = send(&client, r#"{"id":2,"method":"hideWebview","params":{"id":5}}"#).await;
        assert_eq!(resp.error.unwrap().code, "INVALID_ARGUMENT");
    }

    #[tokio::test]
    async fn not_found_and_script_results() {
        let client = start(HeadlessFactory::recording().with_script_responder(|_| Ok("42".into())));

        let resp = send(&client, r#"{"id":1,"method":"showWebview","params":{"id":"ghost"}}"#).await;
        assert_eq!(resp.error.unwrap().code, "NOT_FOUND");

        send(&client, r#"{"id":2,"method":"createWebview","params":{"id":"a"}}"#).await;
        let resp = send(
            &client,
            r#"{"id":3,"method":"executeJavaScript","params":{"id":"a","code":"6*7"}}"#,
        )
        .await;
        assert_eq!(resp.result, Some(json!({"result": "42"})));

        let resp = send(
            &client,
            r#"{"id":4,"method":"sendMessage","params":{"id":"a","data":{"x":1}}}"#,
        )
        .await;
        assert!(resp.ok);

        let resp = send(&client, r#"{"id":5,"method":"listWebviews"}"#).await;
        assert_eq!(resp.result, Some(json!({"webviews": ["a"]})));
    }
}
