// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Identity collaborator: accounts, sessions, and the approval workflow.
//!
//! New accounts start out pending; an administrator approves or denies them
//! from the dashboard. The session token is held in memory only.

use super::{decode, HttpTransport, ServiceError};
use crate::config::IdentityConfig;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Denied,
}

impl ApprovalStatus {
    pub fn label(self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "Pending",
            ApprovalStatus::Approved => "Approved",
            ApprovalStatus::Denied => "Denied",
        }
    }
}

/// An account as stored by the identity service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub uid: String,
    pub email: String,
    pub role: Role,
    pub approval_status: ApprovalStatus,
    /// RFC 3339 timestamp.
    pub created_at: String,
}

/// Opaque session token. Not printed in logs.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(..)")
    }
}

/// A signed-in user and their token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: SessionToken,
    pub user: UserRecord,
}

pub trait IdentityService: Send + Sync {
    fn sign_in(&self, email: &str, password: &str) -> Result<SessionToken, ServiceError>;
    fn register(&self, email: &str, password: &str) -> Result<UserRecord, ServiceError>;
    fn current_user(&self, token: &SessionToken) -> Result<UserRecord, ServiceError>;
    /// All accounts, newest first.
    fn list_users(&self, token: &SessionToken) -> Result<Vec<UserRecord>, ServiceError>;
    fn set_approval(&self, token: &SessionToken, uid: &str, status: ApprovalStatus) -> Result<(), ServiceError>;
    fn sign_out(&self, token: &SessionToken) -> Result<(), ServiceError>;
}

/// Check credentials before they are sent.
pub fn validate_credentials(email: &str, password: &str) -> Result<(), ServiceError> {
    let email = email.trim();
    let valid_email = email
        .split_once('@')
        .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
        .unwrap_or(false);
    if !valid_email {
        return Err(ServiceError::InvalidInput("Please enter a valid email address.".into()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ServiceError::InvalidInput(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long."
        )));
    }
    Ok(())
}

/// Sort accounts newest first.
pub fn newest_first(mut users: Vec<UserRecord>) -> Vec<UserRecord> {
    users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    users
}

#[derive(Deserialize)]
struct SignInResponse {
    token: SessionToken,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApprovalUpdate {
    approval_status: ApprovalStatus,
}

#[derive(Debug, Clone)]
pub struct HttpIdentityClient {
    transport: HttpTransport,
}

impl HttpIdentityClient {
    pub fn new(config: &IdentityConfig) -> Result<Self, ServiceError> {
        Ok(Self {
            transport: HttpTransport::new(&config.base_url, config.timeouts)?,
        })
    }

    fn credentials(email: &str, password: &str) -> serde_json::Value {
        serde_json::json!({ "email": email.trim(), "password": password })
    }
}

impl IdentityService for HttpIdentityClient {
    fn sign_in(&self, email: &str, password: &str) -> Result<SessionToken, ServiceError> {
        let body = Self::credentials(email, password);
        let text = self
            .transport
            .send(Method::POST, "/auth/sign-in", None, Some(&body))?;
        let response: SignInResponse = decode(&text)?;
        Ok(response.token)
    }

    fn register(&self, email: &str, password: &str) -> Result<UserRecord, ServiceError> {
        validate_credentials(email, password)?;
        let body = Self::credentials(email, password);
        let text = self
            .transport
            .send(Method::POST, "/auth/register", None, Some(&body))?;
        decode(&text)
    }

    fn current_user(&self, token: &SessionToken) -> Result<UserRecord, ServiceError> {
        let text = self
            .transport
            .send(Method::GET, "/users/me", Some(token.as_str()), None)?;
        decode(&text)
    }

    fn list_users(&self, token: &SessionToken) -> Result<Vec<UserRecord>, ServiceError> {
        let text = self
            .transport
            .send(Method::GET, "/users", Some(token.as_str()), None)?;
        decode(&text).map(newest_first)
    }

    fn set_approval(&self, token: &SessionToken, uid: &str, status: ApprovalStatus) -> Result<(), ServiceError> {
        if status == ApprovalStatus::Pending {
            return Err(ServiceError::InvalidInput("Accounts can only be approved or denied.".into()));
        }
        let body = serde_json::to_value(ApprovalUpdate {
            approval_status: status,
        })
        .map_err(|e| ServiceError::InvalidInput(e.to_string()))?;
        self.transport.send(
            Method::PATCH,
            &format!("/users/{uid}"),
            Some(token.as_str()),
            Some(&body),
        )?;
        Ok(())
    }

    fn sign_out(&self, token: &SessionToken) -> Result<(), ServiceError> {
        self.transport
            .send(Method::POST, "/auth/sign-out", Some(token.as_str()), None)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(uid: &str, created_at: &str) -> UserRecord {
        UserRecord {
            uid: uid.into(),
            email: format!("{uid}@example.com"),
            role: Role::User,
            approval_status: ApprovalStatus::Pending,
            created_at: created_at.into(),
        }
    }

    #[test]
    fn test_user_record_wire_format() {
        let json = r#"{"uid":"u1","email":"a@b.co","role":"admin","approvalStatus":"approved","createdAt":"2024-05-01T10:00:00Z"}"#;
        let record: UserRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.role, Role::Admin);
        assert_eq!(record.approval_status, ApprovalStatus::Approved);
        assert_eq!(record.created_at, "2024-05-01T10:00:00Z");
    }

    #[test]
    fn test_newest_first() {
        let users = newest_first(vec![
            user("old", "2024-01-01T00:00:00Z"),
            user("new", "2024-06-01T00:00:00Z"),
            user("mid", "2024-03-01T00:00:00Z"),
        ]);
        let order: Vec<_> = users.iter().map(|u| u.uid.as_str()).collect();
        assert_eq!(order, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_credential_validation() {
        assert!(validate_credentials("me@example.com", "secret1").is_ok());
        assert!(validate_credentials("not-an-email", "secret1").is_err());
        let err = validate_credentials("me@example.com", "123").unwrap_err();
        assert!(err.to_string().contains("at least 6"));
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = SessionToken::new("super-secret");
        assert!(!format!("{token:?}").contains("super-secret"));
        let response: SignInResponse = decode(r#"{"token":"abc"}"#).unwrap();
        assert_eq!(response.token.as_str(), "abc");
    }

    #[test]
    fn test_approval_body() {
        let body = serde_json::to_value(ApprovalUpdate {
            approval_status: ApprovalStatus::Denied,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"approvalStatus": "denied"}));
    }
}
