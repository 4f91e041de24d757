//! User identity, roles and the caller identity injected into every service.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::ValidateEmail;

use crate::constants::{ROLE_ADMIN, ROLE_CANDIDATE, ROLE_EMPLOYER};
use crate::error::{DomainError, DomainResult};

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Candidate,
    Employer,
    Admin,
}

impl UserRole {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Candidate => ROLE_CANDIDATE,
            UserRole::Employer => ROLE_EMPLOYER,
            UserRole::Admin => ROLE_ADMIN,
        }
    }

    /// Parse a role a user picked at signup. `admin` is never self-assigned.
    pub fn for_signup(value: &str) -> DomainResult<Self> {
        match value.parse::<UserRole>()? {
            UserRole::Admin => Err(DomainError::validation(
                "Role must be 'candidate' or 'employer'",
            )),
            role => Ok(role),
        }
    }
}

impl FromStr for UserRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_CANDIDATE => Ok(UserRole::Candidate),
            ROLE_EMPLOYER => Ok(UserRole::Employer),
            ROLE_ADMIN => Ok(UserRole::Admin),
            other => Err(DomainError::validation(format!("Invalid role '{}'", other))),
        }
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalised email address.
///
/// Emails are compared case-insensitively, so the canonical form is trimmed and
/// lowercased before it is validated or stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let normalized = raw.trim().to_lowercase();
        if !normalized.validate_email() {
            return Err(DomainError::validation("Invalid email format"));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// User domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
    /// Opaque reference owned by the auth provider
    #[serde(skip_serializing)]
    pub credential_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: Email, role: UserRole, credential_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into_string(),
            role,
            credential_id,
            created_at: crate::now(),
        }
    }

    /// Identity this user acts with once authenticated
    pub fn identity(&self) -> CallerIdentity {
        CallerIdentity::new(self.id, self.role)
    }
}

/// Authenticated caller, resolved from a bearer credential before any service
/// method runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerIdentity {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl CallerIdentity {
    pub fn new(user_id: Uuid, role: UserRole) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Fail with `Forbidden` unless the caller has exactly this role.
    pub fn require_role(&self, role: UserRole) -> DomainResult<()> {
        if self.role == role {
            Ok(())
        } else {
            Err(DomainError::Forbidden)
        }
    }

    /// Owners manage their own resources; admins manage everything.
    pub fn can_manage(&self, owner_id: Uuid) -> bool {
        self.user_id == owner_id || self.is_admin()
    }

    pub fn require_manage(&self, owner_id: Uuid) -> DomainResult<()> {
        if self.can_manage(owner_id) {
            Ok(())
        } else {
            Err(DomainError::Forbidden)
        }
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserResponse {
    /// Unique user identifier
    pub id: Uuid,
    /// Normalised email address
    pub email: String,
    /// User role
    pub role: UserRole,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_roles() {
        assert_eq!(UserRole::for_signup("candidate").unwrap(), UserRole::Candidate);
        assert_eq!(UserRole::for_signup("employer").unwrap(), UserRole::Employer);
        assert!(matches!(
            UserRole::for_signup("admin"),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            UserRole::for_signup("recruiter"),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_email_is_normalized() {
        let email = Email::parse("  Jane.Doe@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "jane.doe@example.com");
    }

    #[test]
    fn test_email_rejects_garbage() {
        assert!(Email::parse("not-an-email").is_err());
        assert!(Email::parse("").is_err());
    }

    #[test]
    fn test_caller_permissions() {
        let owner = Uuid::new_v4();
        let employer = CallerIdentity::new(owner, UserRole::Employer);
        let other = CallerIdentity::new(Uuid::new_v4(), UserRole::Employer);
        let admin = CallerIdentity::new(Uuid::new_v4(), UserRole::Admin);

        assert!(employer.can_manage(owner));
        assert!(!other.can_manage(owner));
        assert!(admin.can_manage(owner));
        assert_eq!(
            employer.require_role(UserRole::Candidate),
            Err(DomainError::Forbidden)
        );
    }
}
