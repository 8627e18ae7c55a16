//! Request context carrying the authenticated user and client details.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use resqroute_auth::Claims;
use resqroute_entity::user::UserRole;

/// Client details recorded with activity log entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    /// IP address of the request origin.
    pub ip_address: Option<String>,
    /// User-Agent header value.
    pub user_agent: Option<String>,
}

/// Context for the current authenticated request.
///
/// Built from verified token claims, so identity fields reflect the moment
/// the token was issued rather than the current database row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// Role at issuance.
    pub role: UserRole,
    /// Display name at issuance.
    pub name: String,
    /// Email at issuance.
    pub email: String,
    /// Where the request came from.
    pub client: ClientInfo,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Create a new request context.
    pub fn new(
        user_id: Uuid,
        role: UserRole,
        name: impl Into<String>,
        email: impl Into<String>,
        client: ClientInfo,
    ) -> Self {
        Self {
            user_id,
            role,
            name: name.into(),
            email: email.into(),
            client,
            request_time: Utc::now(),
        }
    }

    /// Build a context from decoded claims.
    pub fn from_claims(claims: &Claims, client: ClientInfo) -> Self {
        Self::new(
            claims.sub,
            claims.role,
            claims.name.clone(),
            claims.email.clone(),
            client,
        )
    }

    /// Whether the caller is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Whether the caller may act on `user_id`'s resources.
    pub fn is_self_or_admin(&self, user_id: Uuid) -> bool {
        self.is_admin() || self.user_id == user_id
    }
}
