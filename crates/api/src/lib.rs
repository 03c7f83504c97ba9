// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod auth;
mod authorization;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthenticationService, Role};
pub use authorization::{
    AdminAuthorizer, AssignmentAuthorizer, Authorizer, Capability, CapabilityCheck,
    StudentAuthorizer,
};
pub use error::{
    ApiError, AuthError, translate_core_error, translate_domain_error, translate_persistence_error,
};
pub use handlers::{
    approve_result, build_student_report, ensure_admin_account, get_class_roster, get_my_report,
    get_my_years, get_result, get_student_results, list_pending_results, list_results, login,
    logout, reject_result, upsert_result, whoami,
};
pub use request_response::{
    AcademicYearsResponse, ClassRosterResponse, ListPendingResultsResponse, ListResultsResponse,
    LoginRequest, LoginResponse, PendingResultInfo, ResultInfo, ReviewResultRequest,
    ReviewResultResponse, RosterEntryInfo, StudentResultsResponse, UpsertResultRequest,
    UpsertResultResponse, WhoAmIResponse,
};
