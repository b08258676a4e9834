//! The `{error, data, message}` result shape returned by every API call.

use serde::Serialize;

/// Uniform outcome of an API call.
///
/// Fields are private so a failed envelope can never carry data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope<T> {
    error: bool,
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            error: false,
            data: Some(data),
            message: None,
        }
    }

    /// Success without a payload, e.g. a completed delete.
    pub fn empty() -> Self {
        Self {
            error: false,
            data: None,
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: true,
            data: None,
            message: Some(message.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        Envelope {
            error: self.error,
            data: self.data.map(f),
            message: self.message,
        }
    }
}

impl<T> From<Option<T>> for Envelope<T> {
    fn from(data: Option<T>) -> Self {
        data.map_or_else(Self::empty, Self::ok)
    }
}
