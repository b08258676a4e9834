use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{MatchedPath, Multipart, Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

/// Bearer token the server always answers with `500 {"msg":"jwt expired"}`.
pub const EXPIRED_TOKEN: &str = "expired-token";

pub const COLLECTIONS: [&str; 8] = [
    "users",
    "talents",
    "schedules",
    "documents",
    "registration",
    "events",
    "images",
    "payments",
];

const CREATE_ROUTES: [(&str, &str); 5] = [
    ("/create-talents", "talents"),
    ("/create-schedules", "schedules"),
    ("/create-registration", "registration"),
    ("/create-events", "events"),
    ("/create-payments", "payments"),
];

const UPLOAD_ROUTES: [(&str, &str); 2] =
    [("/upload-documents", "documents"), ("/images", "images")];

/// Reference fields and the collection they point into. They are checked on
/// write and expanded into the referenced record on read.
const FOREIGN_KEYS: [(&str, &str); 6] = [
    ("userID", "users"),
    ("eventID", "events"),
    ("talentID", "talents"),
    ("documentID", "documents"),
    ("imageID", "images"),
    ("registrationID", "registration"),
];

const HIDDEN_FIELDS: [&str; 2] = ["password", "confirmPassword"];

#[derive(Debug, Default)]
pub struct Store {
    collections: HashMap<&'static str, Vec<Value>>,
    /// token -> user id
    sessions: HashMap<String, String>,
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct SignUp {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "confirmPassword")]
    pub confirm_password: String,
    #[serde(default)]
    pub no_telp: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// Error response in the backend's `{"msg": ...}` shape.
#[derive(Debug)]
pub struct Failure {
    status: StatusCode,
    msg: String,
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "msg": self.msg }))).into_response()
    }
}

fn fail(status: StatusCode, msg: impl Into<String>) -> Failure {
    Failure {
        status,
        msg: msg.into(),
    }
}

type ApiResult = Result<(StatusCode, Json<Value>), Failure>;

fn data(status: StatusCode, value: Value) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "data": value })))
}

impl Store {
    fn records(&self, collection: &str) -> &[Value] {
        self.collections.get(collection).map(Vec::as_slice).unwrap_or_default()
    }

    fn find(&self, collection: &str, id: &str) -> Option<&Value> {
        self.records(collection).iter().find(|r| r["_id"] == id)
    }

    fn find_mut(&mut self, collection: &str, id: &str) -> Option<&mut Value> {
        self.collections
            .get_mut(collection)?
            .iter_mut()
            .find(|r| r["_id"] == id)
    }

    fn insert(&mut self, collection: &'static str, mut fields: Map<String, Value>) -> Value {
        let id = Uuid::new_v4().simple().to_string();
        fields.insert("_id".to_string(), Value::String(id));
        let record = Value::Object(fields);
        self.collections.entry(collection).or_default().push(record.clone());
        record
    }

    fn remove(&mut self, collection: &str, id: &str) -> Option<Value> {
        let records = self.collections.get_mut(collection)?;
        let index = records.iter().position(|r| r["_id"] == id)?;
        Some(records.remove(index))
    }

    /// Copy of `record` without secrets, with reference fields expanded
    /// `depth` levels deep.
    fn present(&self, record: &Value, depth: u8) -> Value {
        let mut out = record.clone();
        if let Some(fields) = out.as_object_mut() {
            for hidden in HIDDEN_FIELDS {
                fields.remove(hidden);
            }
            if depth > 0 {
                for (key, collection) in FOREIGN_KEYS {
                    let Some(id) = fields.get(key).and_then(Value::as_str).map(str::to_string)
                    else {
                        continue;
                    };
                    if let Some(referenced) = self.find(collection, &id) {
                        fields.insert(key.to_string(), self.present(referenced, depth - 1));
                    }
                }
            }
        }
        out
    }

    fn check_references(&self, fields: &Map<String, Value>) -> Result<(), Failure> {
        for (key, collection) in FOREIGN_KEYS {
            if let Some(id) = fields.get(key).and_then(Value::as_str) {
                if self.find(collection, id).is_none() {
                    let msg = format!("No {collection} with id: {id}");
                    return Err(fail(StatusCode::NOT_FOUND, msg));
                }
            }
        }
        Ok(())
    }

    fn authorize(&self, headers: &HeaderMap) -> Result<String, Failure> {
        let token = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "Authentication invalid"))?;
        if token == EXPIRED_TOKEN {
            return Err(fail(StatusCode::INTERNAL_SERVER_ERROR, "jwt expired"));
        }
        self.sessions
            .get(token)
            .cloned()
            .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "Authentication invalid"))
    }
}

pub fn app() -> Router {
    app_with_db(Db::default())
}

pub fn app_with_db(db: Db) -> Router {
    let mut router = Router::new()
        .route("/auth/login", post(login))
        .route("/sign-up", post(sign_up))
        .route("/users/me", get(current_user))
        .route("/images", get(list_records).post(upload_file))
        .route("/upload-documents", post(upload_file));

    for (path, _) in CREATE_ROUTES {
        router = router.route(path, post(create_record));
    }
    for collection in COLLECTIONS {
        if collection != "images" {
            router = router.route(&format!("/{collection}"), get(list_records));
        }
        router = router.route(
            &format!("/{collection}/{{id}}"),
            get(get_record).put(update_record).delete(delete_record),
        );
    }

    router.with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock backend listening");
    }
    axum::serve(listener, app()).await
}

/// Collection addressed by a `/{collection}` or `/{collection}/{id}` route.
fn collection_of(matched: &MatchedPath) -> Result<&'static str, Failure> {
    let first = matched.as_str().trim_start_matches('/').split('/').next().unwrap_or_default();
    COLLECTIONS
        .into_iter()
        .find(|c| *c == first)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Route not found"))
}

fn route_target(
    routes: &[(&str, &'static str)],
    matched: &MatchedPath,
) -> Result<&'static str, Failure> {
    routes
        .iter()
        .find(|(path, _)| *path == matched.as_str())
        .map(|(_, collection)| *collection)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Route not found"))
}

fn into_object(value: Value) -> Result<Map<String, Value>, Failure> {
    match value {
        Value::Object(fields) => Ok(fields),
        _ => Err(fail(StatusCode::BAD_REQUEST, "Request body must be a JSON object")),
    }
}

async fn sign_up(State(db): State<Db>, Json(input): Json<SignUp>) -> ApiResult {
    if input.password != input.confirm_password {
        return Err(fail(
            StatusCode::BAD_REQUEST,
            "Password and Confirm password do not match",
        ));
    }
    let mut store = db.write().await;
    if store.records("users").iter().any(|u| u["email"] == input.email.as_str()) {
        return Err(fail(StatusCode::BAD_REQUEST, "Email already registered"));
    }
    let mut fields = Map::new();
    fields.insert("name".to_string(), json!(input.name));
    fields.insert("email".to_string(), json!(input.email));
    fields.insert("password".to_string(), json!(input.password));
    fields.insert("no_telp".to_string(), json!(input.no_telp));
    fields.insert("role".to_string(), json!(input.role.unwrap_or_else(|| "user".to_string())));
    fields.insert("avatar".to_string(), json!(""));
    let user = store.insert("users", fields);
    info!(user_id = %user["_id"], "user signed up");
    Ok(data(StatusCode::CREATED, store.present(&user, 0)))
}

async fn login(State(db): State<Db>, Json(input): Json<Credentials>) -> ApiResult {
    let mut store = db.write().await;
    let user = store
        .records("users")
        .iter()
        .find(|u| u["email"] == input.email.as_str() && u["password"] == input.password.as_str())
        .cloned()
        .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "Invalid credentials"))?;
    let token = Uuid::new_v4().simple().to_string();
    let user_id = user["_id"].as_str().unwrap_or_default().to_string();
    store.sessions.insert(token.clone(), user_id);
    Ok(data(
        StatusCode::OK,
        json!({ "token": token, "user": store.present(&user, 0) }),
    ))
}

async fn current_user(State(db): State<Db>, headers: HeaderMap) -> ApiResult {
    let store = db.read().await;
    let user_id = store.authorize(&headers)?;
    let user = store
        .find("users", &user_id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "User not found"))?;
    Ok(data(StatusCode::OK, store.present(user, 0)))
}

async fn list_records(State(db): State<Db>, matched: MatchedPath, headers: HeaderMap) -> ApiResult {
    let collection = collection_of(&matched)?;
    let store = db.read().await;
    store.authorize(&headers)?;
    let records: Vec<Value> = store
        .records(collection)
        .iter()
        .map(|r| store.present(r, 2))
        .collect();
    Ok(data(StatusCode::OK, Value::Array(records)))
}

async fn get_record(
    State(db): State<Db>,
    matched: MatchedPath,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    let collection = collection_of(&matched)?;
    let store = db.read().await;
    store.authorize(&headers)?;
    let record = store
        .find(collection, &id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, format!("No {collection} with id: {id}")))?;
    Ok(data(StatusCode::OK, store.present(record, 2)))
}

async fn create_record(
    State(db): State<Db>,
    matched: MatchedPath,
    headers: HeaderMap,
    Json(input): Json<Value>,
) -> ApiResult {
    let collection = route_target(&CREATE_ROUTES, &matched)?;
    let mut fields = into_object(input)?;
    fields.remove("_id");
    let mut store = db.write().await;
    store.authorize(&headers)?;
    store.check_references(&fields)?;
    let record = store.insert(collection, fields);
    debug!(collection, id = %record["_id"], "record created");
    Ok(data(StatusCode::CREATED, store.present(&record, 0)))
}

async fn upload_file(
    State(db): State<Db>,
    matched: MatchedPath,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> ApiResult {
    let collection = route_target(&UPLOAD_ROUTES, &matched)?;
    db.read().await.authorize(&headers)?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| fail(StatusCode::BAD_REQUEST, e.body_text()))?
    {
        let Some(original_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| fail(StatusCode::BAD_REQUEST, e.body_text()))?;
        if upload.is_none() {
            upload = Some((original_name, mime_type, bytes.len()));
        }
    }
    let (original_name, mime_type, size) =
        upload.ok_or_else(|| fail(StatusCode::BAD_REQUEST, "No file uploaded"))?;

    let mut fields = Map::new();
    fields.insert("fileName".to_string(), json!(format!("uploads/{original_name}")));
    fields.insert("originalName".to_string(), json!(original_name));
    fields.insert("mimeType".to_string(), json!(mime_type));
    fields.insert("size".to_string(), json!(size));
    let mut store = db.write().await;
    let record = store.insert(collection, fields);
    debug!(collection, id = %record["_id"], "file uploaded");
    Ok(data(StatusCode::CREATED, record))
}

async fn update_record(
    State(db): State<Db>,
    matched: MatchedPath,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(input): Json<Value>,
) -> ApiResult {
    let collection = collection_of(&matched)?;
    let mut patch = into_object(input)?;
    patch.remove("_id");
    let mut store = db.write().await;
    store.authorize(&headers)?;
    store.check_references(&patch)?;
    let record = store
        .find_mut(collection, &id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, format!("No {collection} with id: {id}")))?;
    if let Some(fields) = record.as_object_mut() {
        fields.extend(patch);
    }
    let updated = record.clone();
    Ok(data(StatusCode::OK, store.present(&updated, 0)))
}

async fn delete_record(
    State(db): State<Db>,
    matched: MatchedPath,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    let collection = collection_of(&matched)?;
    let mut store = db.write().await;
    store.authorize(&headers)?;
    let removed = store
        .remove(collection, &id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, format!("No {collection} with id: {id}")))?;
    if collection == "users" {
        store.sessions.retain(|_, user_id| *user_id != id);
    }
    Ok(data(StatusCode::OK, store.present(&removed, 0)))
}
