//! Stateless HTTP request builder and response parser for the
//! event-registration API.
//!
//! # Design
//! `EventClient` holds only the base URL and the missing-token policy. Every
//! resource goes through the same generic `build_*` / `parse_*` pair,
//! parameterized by [`Resource`] and [`Operation`]; the caller supplies the
//! bearer token and executes the round trip.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::http::{HttpBody, HttpMethod, HttpRequest, HttpResponse};
use crate::resource::{BodyKind, Operation, Resource};
use crate::session::Session;
use crate::types::{Credentials, Record, SignUp, UploadForm};

/// Route the user is sent to once their token has expired.
pub const SIGN_IN_ROUTE: &str = "/signin";
/// Message returned to the caller when the token has expired.
pub const TOKEN_EXPIRED_MESSAGE: &str = "Token expired";
/// Server message that signals an expired token.
pub const JWT_EXPIRED: &str = "jwt expired";

const LOGIN_FAILED: &str = "Login failed";
const SIGNUP_FAILED: &str = "An error occurred during signup";
/// Message for a current-user lookup that failed without a server message.
pub const FETCH_FAILED_MESSAGE: &str = "Fetch failed";

/// What to send when there is no stored session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingToken {
    /// `Authorization: Bearer null`, what the web client has always sent.
    #[default]
    SendNull,
    /// Leave the `Authorization` header off.
    Omit,
}

#[derive(Debug, Clone)]
pub struct EventClient {
    base_url: String,
    missing_token: MissingToken,
}

#[derive(Deserialize)]
struct DataBody<T> {
    data: Option<T>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl EventClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            missing_token: MissingToken::default(),
        }
    }

    pub fn with_missing_token(mut self, policy: MissingToken) -> Self {
        self.missing_token = policy;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -- authentication bootstrap --------------------------------------------

    pub fn build_login(&self, credentials: &Credentials) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: self.url("/auth/login"),
            headers: vec![json_content_type()],
            body: Some(HttpBody::Json(to_json(credentials)?)),
        })
    }

    /// A rejected login is an error, not a failed envelope.
    pub fn parse_login(&self, response: HttpResponse) -> Result<Envelope<Session>, ApiError> {
        if !response.is_success() {
            let message = server_message(&response).unwrap_or_else(|| LOGIN_FAILED.to_string());
            return Err(ApiError::LoginFailed(message));
        }
        decode_data(&response)
    }

    pub fn build_signup(&self, input: &SignUp) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: self.url("/sign-up"),
            headers: vec![json_content_type()],
            body: Some(HttpBody::Json(to_json(input)?)),
        })
    }

    pub fn parse_signup(&self, response: HttpResponse) -> Result<Envelope<Record>, ApiError> {
        if !response.is_success() {
            let message = server_message(&response).unwrap_or_else(|| SIGNUP_FAILED.to_string());
            return Ok(Envelope::failure(message));
        }
        decode_data(&response)
    }

    // -- current user --------------------------------------------------------

    pub fn build_user_logged(&self, token: Option<&str>) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.url("/users/me"),
            headers: self.auth_headers(token, false),
            body: None,
        }
    }

    /// Returns `Err(ApiError::TokenExpired)` when the server reports an
    /// expired token; the caller clears the session and sends the user to
    /// [`SIGN_IN_ROUTE`].
    pub fn parse_user_logged(&self, response: HttpResponse) -> Result<Envelope<Record>, ApiError> {
        if !response.is_success() {
            let message = server_message(&response);
            if response.status == 500 && message.as_deref() == Some(JWT_EXPIRED) {
                return Err(ApiError::TokenExpired);
            }
            return Ok(Envelope::failure(
                message.unwrap_or_else(|| FETCH_FAILED_MESSAGE.to_string()),
            ));
        }
        decode_data(&response)
    }

    // -- generic resource operations -----------------------------------------

    pub fn build_create<T: Serialize + ?Sized>(
        &self,
        token: Option<&str>,
        resource: Resource,
        payload: &T,
    ) -> Result<HttpRequest, ApiError> {
        let path = self.create_path(resource, BodyKind::Json)?;
        Ok(HttpRequest {
            method: Operation::Create.method(),
            path,
            headers: self.auth_headers(token, true),
            body: Some(HttpBody::Json(to_json(payload)?)),
        })
    }

    /// Multipart create for documents and images.
    pub fn build_upload(
        &self,
        token: Option<&str>,
        resource: Resource,
        form: UploadForm,
    ) -> Result<HttpRequest, ApiError> {
        let path = self.create_path(resource, BodyKind::Multipart)?;
        Ok(HttpRequest {
            method: Operation::Create.method(),
            path,
            headers: self.auth_headers(token, false),
            body: Some(HttpBody::Multipart(form)),
        })
    }

    pub fn build_list(
        &self,
        token: Option<&str>,
        resource: Resource,
    ) -> Result<HttpRequest, ApiError> {
        ensure_supported(resource, Operation::List)?;
        Ok(HttpRequest {
            method: Operation::List.method(),
            path: self.url(resource.collection_path()),
            headers: self.auth_headers(token, false),
            body: None,
        })
    }

    pub fn build_get_one(
        &self,
        token: Option<&str>,
        resource: Resource,
        id: &str,
    ) -> Result<HttpRequest, ApiError> {
        ensure_supported(resource, Operation::GetOne)?;
        Ok(HttpRequest {
            method: Operation::GetOne.method(),
            path: self.record_url(resource, id)?,
            headers: self.auth_headers(token, false),
            body: None,
        })
    }

    pub fn build_update<T: Serialize + ?Sized>(
        &self,
        token: Option<&str>,
        resource: Resource,
        id: &str,
        payload: &T,
    ) -> Result<HttpRequest, ApiError> {
        ensure_supported(resource, Operation::Update)?;
        Ok(HttpRequest {
            method: Operation::Update.method(),
            path: self.record_url(resource, id)?,
            headers: self.auth_headers(token, true),
            body: Some(HttpBody::Json(to_json(payload)?)),
        })
    }

    /// Delete carries a JSON content-type but no body.
    pub fn build_delete(
        &self,
        token: Option<&str>,
        resource: Resource,
        id: &str,
    ) -> Result<HttpRequest, ApiError> {
        ensure_supported(resource, Operation::Delete)?;
        Ok(HttpRequest {
            method: Operation::Delete.method(),
            path: self.record_url(resource, id)?,
            headers: self.auth_headers(token, true),
            body: None,
        })
    }

    /// Parse a create/list/get/update response into an envelope.
    ///
    /// A non-2xx status produces a failed envelope carrying the server
    /// message; only an undecodable success body is an error.
    pub fn parse_data<T: DeserializeOwned>(
        &self,
        response: HttpResponse,
    ) -> Result<Envelope<T>, ApiError> {
        if !response.is_success() {
            return Ok(Envelope::failure(failure_message(&response)));
        }
        decode_data(&response)
    }

    pub fn parse_record(&self, response: HttpResponse) -> Result<Envelope<Record>, ApiError> {
        self.parse_data(response)
    }

    /// The success body of a delete is ignored.
    pub fn parse_delete(&self, response: HttpResponse) -> Result<Envelope<()>, ApiError> {
        if !response.is_success() {
            return Ok(Envelope::failure(failure_message(&response)));
        }
        Ok(Envelope::empty())
    }

    // -- helpers -------------------------------------------------------------

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// `id` is appended as a single percent-encoded path segment.
    fn record_url(&self, resource: Resource, id: &str) -> Result<String, ApiError> {
        let collection = self.url(resource.collection_path());
        let mut url = Url::parse(&collection)
            .map_err(|e| ApiError::InvalidUrl(format!("{collection}: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(collection.clone()))?
            .push(id);
        Ok(url.into())
    }

    fn create_path(&self, resource: Resource, body: BodyKind) -> Result<String, ApiError> {
        ensure_supported(resource, Operation::Create)?;
        match resource.create_path() {
            Some(path) if resource.create_body() == body => Ok(self.url(path)),
            _ => Err(ApiError::UnsupportedOperation {
                resource,
                operation: Operation::Create,
            }),
        }
    }

    fn auth_headers(&self, token: Option<&str>, json: bool) -> Vec<(String, String)> {
        let mut headers = Vec::with_capacity(2);
        match (token, self.missing_token) {
            (Some(token), _) => headers.push(bearer(token)),
            (None, MissingToken::SendNull) => headers.push(bearer("null")),
            (None, MissingToken::Omit) => {
                debug!("no session token, sending request without authorization")
            }
        }
        if json {
            headers.push(json_content_type());
        }
        headers
    }
}

fn ensure_supported(resource: Resource, operation: Operation) -> Result<(), ApiError> {
    if resource.supports(operation) {
        Ok(())
    } else {
        Err(ApiError::UnsupportedOperation { resource, operation })
    }
}

fn bearer(token: &str) -> (String, String) {
    ("authorization".to_string(), format!("Bearer {token}"))
}

fn json_content_type() -> (String, String) {
    ("content-type".to_string(), "application/json".to_string())
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::Serialization(e.to_string()))
}

fn decode_data<T: DeserializeOwned>(response: &HttpResponse) -> Result<Envelope<T>, ApiError> {
    let body: DataBody<T> =
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))?;
    Ok(Envelope::from(body.data))
}

/// `msg` (or `message`) from a JSON error body.
fn server_message(response: &HttpResponse) -> Option<String> {
    let body: ErrorBody = serde_json::from_str(&response.body).ok()?;
    body.msg.or(body.message)
}

/// Server message, else the raw body, else the status line.
fn failure_message(response: &HttpResponse) -> String {
    if let Some(message) = server_message(response) {
        return message;
    }
    let raw = response.body.trim();
    if raw.is_empty() || raw.starts_with('{') {
        format!("HTTP {}", response.status)
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> EventClient {
        EventClient::new("http://localhost:3000")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_login_has_no_authorization() {
        let credentials = Credentials {
            email: "a@b.com".to_string(),
            password: "x".to_string(),
        };
        let req = client().build_login(&credentials).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/auth/login");
        assert!(req.header("authorization").is_none());
        let body: serde_json::Value =
            serde_json::from_str(req.body.as_ref().and_then(HttpBody::as_json).unwrap()).unwrap();
        assert_eq!(body, json!({"email": "a@b.com", "password": "x"}));
    }

    #[test]
    fn parse_login_returns_session() {
        let resp = response(200, r#"{"data":{"token":"t","user":{"_id":"u1","name":"Ana"}}}"#);
        let envelope = client().parse_login(resp).unwrap();
        assert!(!envelope.is_error());
        let session = envelope.into_data().unwrap();
        assert_eq!(session.token, "t");
        assert_eq!(session.user.unwrap()["name"], "Ana");
    }

    #[test]
    fn parse_login_failure_is_an_error() {
        let err = client()
            .parse_login(response(401, r#"{"message":"Invalid credentials"}"#))
            .unwrap_err();
        assert!(matches!(err, ApiError::LoginFailed(ref m) if m == "Invalid credentials"));

        let err = client().parse_login(response(502, "")).unwrap_err();
        assert!(matches!(err, ApiError::LoginFailed(ref m) if m == "Login failed"));
    }

    #[test]
    fn parse_signup_failure_defaults_message() {
        let envelope = client().parse_signup(response(500, "oops")).unwrap();
        assert!(envelope.is_error());
        assert_eq!(envelope.message(), Some("An error occurred during signup"));
    }

    #[test]
    fn authenticated_requests_carry_bearer_token() {
        let c = client();
        let requests = vec![
            c.build_list(Some("abc"), Resource::Events).unwrap(),
            c.build_get_one(Some("abc"), Resource::Schedules, "s1").unwrap(),
            c.build_update(Some("abc"), Resource::Talents, "t1", &json!({"name": "B"})).unwrap(),
            c.build_delete(Some("abc"), Resource::Users, "u1").unwrap(),
            c.build_create(Some("abc"), Resource::Payments, &json!({"registrationID": "r1"}))
                .unwrap(),
            c.build_upload(Some("abc"), Resource::Images, UploadForm::new()).unwrap(),
            c.build_user_logged(Some("abc")),
        ];
        for req in requests {
            assert_eq!(req.header("Authorization"), Some("Bearer abc"), "{}", req.path);
        }
    }

    #[test]
    fn missing_token_sends_null_by_default() {
        let req = client().build_list(None, Resource::Talents).unwrap();
        assert_eq!(req.header("authorization"), Some("Bearer null"));
    }

    #[test]
    fn missing_token_can_be_omitted() {
        let c = client().with_missing_token(MissingToken::Omit);
        let req = c.build_list(None, Resource::Talents).unwrap();
        assert!(req.header("authorization").is_none());
        let req = c.build_list(Some("abc"), Resource::Talents).unwrap();
        assert_eq!(req.header("authorization"), Some("Bearer abc"));
    }

    #[test]
    fn create_uses_resource_create_path() {
        let req = client()
            .build_create(Some("t"), Resource::Events, &json!({"name": "Workshop"}))
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/create-events");
        assert_eq!(req.header("content-type"), Some("application/json"));
    }

    #[test]
    fn record_paths_append_id() {
        let c = client();
        let req = c.build_get_one(Some("t"), Resource::Registrations, "r9").unwrap();
        assert_eq!(req.path, "http://localhost:3000/registration/r9");
        let req = c.build_update(Some("t"), Resource::Documents, "d1", &json!({})).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "http://localhost:3000/documents/d1");
    }

    #[test]
    fn record_id_is_encoded_as_one_segment() {
        let c = client();
        let req = c.build_get_one(Some("t"), Resource::Talents, "a/b?c#d").unwrap();
        assert_eq!(req.path, "http://localhost:3000/talents/a%2Fb%3Fc%23d");
        let req = c.build_delete(Some("t"), Resource::Events, "x y").unwrap();
        assert_eq!(req.path, "http://localhost:3000/events/x%20y");
    }

    #[test]
    fn record_path_rejects_unusable_base_url() {
        let err = EventClient::new("not a url")
            .build_get_one(Some("t"), Resource::Talents, "t1")
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }

    #[test]
    fn delete_sends_content_type_without_body() {
        let req = client().build_delete(Some("t"), Resource::Events, "e1").unwrap();
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert!(req.body.is_none());
    }

    #[test]
    fn upload_has_multipart_body_and_no_json_content_type() {
        let form = UploadForm::new().file("images", "a.png", "image/png", vec![0x89, 0x50]);
        let req = client().build_upload(Some("t"), Resource::Images, form.clone()).unwrap();
        assert_eq!(req.path, "http://localhost:3000/images");
        assert!(req.header("content-type").is_none());
        assert_eq!(req.body, Some(HttpBody::Multipart(form)));
    }

    #[test]
    fn unsupported_operations_are_rejected() {
        let c = client();
        assert!(matches!(
            c.build_get_one(Some("t"), Resource::Users, "u1"),
            Err(ApiError::UnsupportedOperation { .. })
        ));
        assert!(matches!(
            c.build_create(Some("t"), Resource::Users, &json!({})),
            Err(ApiError::UnsupportedOperation { .. })
        ));
        assert!(matches!(
            c.build_create(Some("t"), Resource::Documents, &json!({})),
            Err(ApiError::UnsupportedOperation { .. })
        ));
        assert!(matches!(
            c.build_upload(Some("t"), Resource::Events, UploadForm::new()),
            Err(ApiError::UnsupportedOperation { .. })
        ));
        assert!(c.build_delete(Some("t"), Resource::Payments, "p1").is_err());
    }

    #[test]
    fn parse_data_success_unwraps_data() {
        let resp = response(200, r#"{"data":[{"_id":"e1"},{"_id":"e2"}]}"#);
        let envelope: Envelope<Record> = client().parse_record(resp).unwrap();
        assert!(!envelope.is_error());
        assert_eq!(envelope.data().unwrap().as_array().unwrap().len(), 2);
    }

    #[test]
    fn parse_data_failure_carries_server_msg() {
        let envelope = client().parse_record(response(400, r#"{"msg":"Kuota penuh"}"#)).unwrap();
        assert!(envelope.is_error());
        assert!(envelope.data().is_none());
        assert_eq!(envelope.message(), Some("Kuota penuh"));
    }

    #[test]
    fn parse_data_failure_without_json_uses_body_or_status() {
        let envelope = client().parse_record(response(502, "Bad Gateway")).unwrap();
        assert_eq!(envelope.message(), Some("Bad Gateway"));
        let envelope = client().parse_record(response(503, "")).unwrap();
        assert_eq!(envelope.message(), Some("HTTP 503"));
    }

    #[test]
    fn parse_data_bad_json_is_an_error() {
        let err = client().parse_record(response(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn parse_delete_ignores_success_body() {
        let envelope = client().parse_delete(response(200, "whatever")).unwrap();
        assert!(!envelope.is_error());
        assert!(envelope.data().is_none());
        let envelope = client().parse_delete(response(404, r#"{"msg":"Not found"}"#)).unwrap();
        assert_eq!(envelope.message(), Some("Not found"));
    }

    #[test]
    fn parse_user_logged_detects_expired_token() {
        let err = client()
            .parse_user_logged(response(500, r#"{"msg":"jwt expired"}"#))
            .unwrap_err();
        assert!(matches!(err, ApiError::TokenExpired));
    }

    #[test]
    fn parse_user_logged_other_failures() {
        let envelope = client()
            .parse_user_logged(response(500, r#"{"msg":"jwt malformed"}"#))
            .unwrap();
        assert_eq!(envelope.message(), Some("jwt malformed"));
        let envelope = client().parse_user_logged(response(404, "")).unwrap();
        assert_eq!(envelope.message(), Some("Fetch failed"));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let c = EventClient::new("http://localhost:3000/");
        let req = c.build_list(None, Resource::Events).unwrap();
        assert_eq!(req.path, "http://localhost:3000/events");
    }
}
