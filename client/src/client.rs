//! Async host for `eventreg-core`.
//!
//! # Design
//! `ApiClient` owns the session store, the reqwest pool and the UI hooks.
//! It reads the token before every authenticated call, executes the request
//! the core builds, and applies the side effects the core only describes:
//! a failed envelope is surfaced through the [`Notifier`], a transport
//! failure or a 401 clears the session, an expired token clears the
//! session and redirects. Calls share nothing else, so they can run concurrently.

use std::sync::Arc;

use eventreg_core::{
    ApiError, Credentials, Envelope, EventClient, FileSessionStore, HttpRequest, HttpResponse,
    MissingToken, Record, Resource, Session, SessionStore, SignUp, UploadForm, FETCH_FAILED_MESSAGE,
    SIGN_IN_ROUTE, TOKEN_EXPIRED_MESSAGE,
};
use serde::Serialize;
use tracing::warn;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::hooks::{LogNavigator, LogNotifier, Navigator, Notifier};
use crate::transport;

#[derive(Clone)]
pub struct ApiClient {
    core: EventClient,
    http: reqwest::Client,
    session: Arc<dyn SessionStore>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    pub fn new(base_url: &str, session: Arc<dyn SessionStore>) -> Self {
        Self {
            core: EventClient::new(base_url),
            http: reqwest::Client::new(),
            session,
            notifier: Arc::new(LogNotifier),
            navigator: Arc::new(LogNavigator),
        }
    }

    /// Client backed by the file session store named in `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut http = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            http = http.timeout(timeout);
        }
        let http = http.build().map_err(ClientError::Transport)?;
        let policy = if config.omit_missing_token {
            MissingToken::Omit
        } else {
            MissingToken::SendNull
        };

        Ok(Self::new(&config.base_url, Arc::new(FileSessionStore::new(&config.session_file)))
            .with_http(http)
            .with_missing_token(policy))
    }

    pub fn with_http(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn with_missing_token(mut self, policy: MissingToken) -> Self {
        self.core = self.core.with_missing_token(policy);
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    pub fn session(&self) -> Result<Option<Session>, ClientError> {
        Ok(self.session.load()?)
    }

    // -- authentication bootstrap --------------------------------------------

    /// Log in and store the returned session. A rejected login is
    /// `Err(ClientError::Api(ApiError::LoginFailed(_)))`.
    #[tracing::instrument(skip_all, fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) -> Result<Envelope<Session>, ClientError> {
        let request = self.core.build_login(credentials)?;
        let response = transport::execute(&self.http, request).await?;
        let envelope = self.core.parse_login(response)?;
        if let Some(session) = envelope.data() {
            self.session.save(session)?;
        }
        Ok(envelope)
    }

    #[tracing::instrument(skip_all, fields(email = %input.email))]
    pub async fn signup(&self, input: &SignUp) -> Result<Envelope<Record>, ClientError> {
        let request = self.core.build_signup(input)?;
        let response = transport::execute(&self.http, request).await?;
        let envelope = self.core.parse_signup(response)?;
        Ok(self.surface(envelope))
    }

    pub fn logout(&self) -> Result<(), ClientError> {
        self.session.clear()?;
        Ok(())
    }

    /// `GET /users/me`. Never alerts. On an expired token the session is
    /// cleared and the navigator is sent to the sign-in route.
    #[tracing::instrument(skip_all)]
    pub async fn get_user_logged(&self) -> Result<Envelope<Record>, ClientError> {
        let request = self.core.build_user_logged(self.token()?.as_deref());
        let response = match self.fetch_with_token(request).await {
            Ok(response) => response,
            Err(ClientError::Transport(err)) => {
                warn!(error = %err, "current user lookup failed");
                return Ok(Envelope::failure(FETCH_FAILED_MESSAGE));
            }
            Err(err) => return Err(err),
        };
        match self.core.parse_user_logged(response) {
            Err(ApiError::TokenExpired) => {
                warn!("token expired, clearing session");
                self.session.clear()?;
                self.navigator.redirect(SIGN_IN_ROUTE);
                Ok(Envelope::failure(TOKEN_EXPIRED_MESSAGE))
            }
            other => Ok(other?),
        }
    }

    // -- generic resource operations -----------------------------------------

    #[tracing::instrument(skip(self, payload))]
    pub async fn create<T: Serialize + ?Sized + Sync>(
        &self,
        resource: Resource,
        payload: &T,
    ) -> Result<Envelope<Record>, ClientError> {
        let request = self.core.build_create(self.token()?.as_deref(), resource, payload)?;
        self.record_call(request).await
    }

    #[tracing::instrument(skip(self, form), fields(files = form.parts.len()))]
    pub async fn upload(
        &self,
        resource: Resource,
        form: UploadForm,
    ) -> Result<Envelope<Record>, ClientError> {
        let request = self.core.build_upload(self.token()?.as_deref(), resource, form)?;
        self.record_call(request).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn list(&self, resource: Resource) -> Result<Envelope<Record>, ClientError> {
        let request = self.core.build_list(self.token()?.as_deref(), resource)?;
        self.record_call(request).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_one(
        &self,
        resource: Resource,
        id: &str,
    ) -> Result<Envelope<Record>, ClientError> {
        let request = self.core.build_get_one(self.token()?.as_deref(), resource, id)?;
        self.record_call(request).await
    }

    #[tracing::instrument(skip(self, payload))]
    pub async fn update<T: Serialize + ?Sized + Sync>(
        &self,
        resource: Resource,
        id: &str,
        payload: &T,
    ) -> Result<Envelope<Record>, ClientError> {
        let request = self.core.build_update(self.token()?.as_deref(), resource, id, payload)?;
        self.record_call(request).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, resource: Resource, id: &str) -> Result<Envelope<()>, ClientError> {
        let request = self.core.build_delete(self.token()?.as_deref(), resource, id)?;
        let response = self.fetch_with_token(request).await?;
        let envelope = self.core.parse_delete(response)?;
        Ok(self.surface(envelope))
    }

    // -- helpers -------------------------------------------------------------

    fn token(&self) -> Result<Option<String>, ClientError> {
        Ok(self.session.token()?)
    }

    async fn record_call(&self, request: HttpRequest) -> Result<Envelope<Record>, ClientError> {
        let response = self.fetch_with_token(request).await?;
        let envelope = self.core.parse_record(response)?;
        Ok(self.surface(envelope))
    }

    /// Authenticated round trip. A transport failure or a rejected token
    /// logs the user out.
    async fn fetch_with_token(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        match transport::execute(&self.http, request).await {
            Ok(response) if response.is_unauthorized() => {
                warn!(status = response.status, "token rejected, clearing session");
                self.drop_session();
                Ok(response)
            }
            Err(ClientError::Transport(err)) => {
                warn!(error = %err, "request failed, clearing session");
                self.drop_session();
                Err(ClientError::Transport(err))
            }
            other => other,
        }
    }

    fn drop_session(&self) {
        if let Err(err) = self.session.clear() {
            warn!(error = %err, "could not clear session");
        }
    }

    fn surface<T>(&self, envelope: Envelope<T>) -> Envelope<T> {
        if envelope.is_error() {
            self.notifier.alert(envelope.message().unwrap_or_default());
        }
        envelope
    }
}
