//! Resource and operation tables.
//!
//! Every backend entity is reached through the same five operations. The
//! table below fixes the path each one lives under and which operations the
//! backend actually exposes for it.

use std::fmt;
use std::str::FromStr;

use crate::http::HttpMethod;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Users,
    Talents,
    Schedules,
    Documents,
    Registrations,
    Events,
    Images,
    Payments,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    List,
    GetOne,
    Update,
    Delete,
}

/// Shape of the create payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Json,
    Multipart,
}

impl Resource {
    pub const ALL: [Resource; 8] = [
        Resource::Users,
        Resource::Talents,
        Resource::Schedules,
        Resource::Documents,
        Resource::Registrations,
        Resource::Events,
        Resource::Images,
        Resource::Payments,
    ];

    /// Path of the collection; single records live at `{collection}/{id}`.
    pub fn collection_path(self) -> &'static str {
        match self {
            Resource::Users => "/users",
            Resource::Talents => "/talents",
            Resource::Schedules => "/schedules",
            Resource::Documents => "/documents",
            Resource::Registrations => "/registration",
            Resource::Events => "/events",
            Resource::Images => "/images",
            Resource::Payments => "/payments",
        }
    }

    /// Path new records are posted to. `None` for users, which are only
    /// created through sign-up.
    pub fn create_path(self) -> Option<&'static str> {
        match self {
            Resource::Users => None,
            Resource::Talents => Some("/create-talents"),
            Resource::Schedules => Some("/create-schedules"),
            Resource::Documents => Some("/upload-documents"),
            Resource::Registrations => Some("/create-registration"),
            Resource::Events => Some("/create-events"),
            Resource::Images => Some("/images"),
            Resource::Payments => Some("/create-payments"),
        }
    }

    pub fn create_body(self) -> BodyKind {
        match self {
            Resource::Documents | Resource::Images => BodyKind::Multipart,
            _ => BodyKind::Json,
        }
    }

    pub fn supports(self, operation: Operation) -> bool {
        use Operation::*;
        match self {
            Resource::Users => matches!(operation, List | Update | Delete),
            Resource::Talents | Resource::Events => {
                matches!(operation, Create | List | Update | Delete)
            }
            Resource::Schedules | Resource::Registrations => {
                matches!(operation, Create | List | GetOne | Delete)
            }
            Resource::Documents => true,
            Resource::Images | Resource::Payments => matches!(operation, Create | List | GetOne),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Resource::Users => "users",
            Resource::Talents => "talents",
            Resource::Schedules => "schedules",
            Resource::Documents => "documents",
            Resource::Registrations => "registrations",
            Resource::Events => "events",
            Resource::Images => "images",
            Resource::Payments => "payments",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Resource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Resource::ALL
            .into_iter()
            .find(|r| r.name() == wanted || r.collection_path().trim_start_matches('/') == wanted)
            .ok_or_else(|| format!("unknown resource: {s}"))
    }
}

impl Operation {
    pub fn method(self) -> HttpMethod {
        match self {
            Operation::Create => HttpMethod::Post,
            Operation::List | Operation::GetOne => HttpMethod::Get,
            Operation::Update => HttpMethod::Put,
            Operation::Delete => HttpMethod::Delete,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Create => "create",
            Operation::List => "list",
            Operation::GetOne => "get",
            Operation::Update => "update",
            Operation::Delete => "delete",
        };
        f.write_str(name)
    }
}
