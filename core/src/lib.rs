//! API client core for the event-registration service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). Every resource (users,
//! talents, schedules, documents, registrations, events, images, payments)
//! shares one generic create/list/get/update/delete path, and every call
//! resolves to an [`Envelope`].
//!
//! # Design
//! - `EventClient` is stateless; the host passes the bearer token in.
//! - Server-reported failures are failed envelopes, not errors. Side effects
//!   (alerting, clearing the session, redirecting) belong to the host.
//! - The session model and its stores live here so every host persists it
//!   the same way.

pub mod client;
pub mod dashboard;
pub mod envelope;
pub mod error;
pub mod http;
pub mod resource;
pub mod session;
pub mod types;

pub use client::{
    EventClient, MissingToken, FETCH_FAILED_MESSAGE, SIGN_IN_ROUTE, TOKEN_EXPIRED_MESSAGE,
};
pub use dashboard::{my_dashboard, Enrollment};
pub use envelope::Envelope;
pub use error::ApiError;
pub use http::{HttpBody, HttpMethod, HttpRequest, HttpResponse};
pub use resource::{BodyKind, Operation, Resource};
pub use session::{
    FileSessionStore, MemorySessionStore, Session, SessionError, SessionStore, SESSION_KEY,
};
pub use types::{
    record_id, Credentials, FilePart, NewEvent, NewPayment, NewRegistration, NewSchedule, NewTalent,
    Record, SignUp, TimeSlot, UploadForm,
};
