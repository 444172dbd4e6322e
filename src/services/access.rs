// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Route guard: decides which screen a session may see.

use super::identity::{ApprovalStatus, Role, Session, UserRecord};

/// What an account is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Admin,
    Editor,
    AwaitingApproval,
    Denied,
}

/// Screens of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    SignIn,
    Register,
    Pending,
    Denied,
    Editor,
    Admin,
}

impl Route {
    fn is_public(self) -> bool {
        matches!(self, Route::SignIn | Route::Register)
    }
}

pub fn access_level(user: &UserRecord) -> Access {
    match (user.approval_status, user.role) {
        (ApprovalStatus::Approved, Role::Admin) => Access::Admin,
        (ApprovalStatus::Approved, Role::User) => Access::Editor,
        (ApprovalStatus::Pending, _) => Access::AwaitingApproval,
        (ApprovalStatus::Denied, _) => Access::Denied,
    }
}

/// The route actually shown when `requested` is asked for.
pub fn guard(requested: Route, session: Option<&Session>) -> Route {
    let Some(session) = session else {
        return if requested.is_public() {
            requested
        } else {
            Route::SignIn
        };
    };

    match access_level(&session.user) {
        Access::AwaitingApproval => Route::Pending,
        Access::Denied => Route::Denied,
        Access::Editor => Route::Editor,
        Access::Admin => match requested {
            Route::Admin => Route::Admin,
            _ => Route::Editor,
        },
    }
}

/// Swap in a re-fetched account record and return the route the session
/// now leads to from `current`.
pub fn refresh_session(session: &mut Session, user: UserRecord, current: Route) -> Route {
    session.user = user;
    guard(current, Some(session))
}
