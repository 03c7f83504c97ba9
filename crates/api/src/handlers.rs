// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Handlers receive the storage handle explicitly, check the caller's
//! capability first, and only then touch result rows.

use marksheet::{ReviewCommand, UpsertResult};
use marksheet_domain::{
    AcademicYear, AccountRole, ResultRecord, StudentReport, SubjectResult, build_report,
    validate_identifier, validate_scores,
};
use marksheet_persistence::{
    AccountData, NewAccount, PendingResult, Persistence, RosterEntry, UpsertOutcome,
};
use tracing::{debug, info};

use crate::auth::{AuthenticatedActor, AuthenticationService, Role};
use crate::authorization::{Authorizer, Capability};
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::request_response::{
    AcademicYearsResponse, ClassRosterResponse, ListPendingResultsResponse, ListResultsResponse,
    LoginRequest, LoginResponse, PendingResultInfo, ResultInfo, ReviewResultRequest,
    ReviewResultResponse, RosterEntryInfo, StudentResultsResponse, UpsertResultRequest,
    UpsertResultResponse, WhoAmIResponse,
};

fn parse_identifier(field: &'static str, value: i64) -> Result<i64, ApiError> {
    validate_identifier(field, value).map_err(translate_domain_error)?;
    Ok(value)
}

fn parse_academic_year(value: &str) -> Result<AcademicYear, ApiError> {
    AcademicYear::new(value).map_err(translate_domain_error)
}

fn teacher_id_of(actor: &AuthenticatedActor, action: &str) -> Result<i64, ApiError> {
    match actor.role {
        Role::Teacher { teacher_id } => Ok(teacher_id),
        Role::Admin | Role::Student { .. } => Err(ApiError::Unauthorized {
            action: action.to_string(),
            required_role: String::from("teacher role"),
        }),
    }
}

fn student_id_of(actor: &AuthenticatedActor, action: &str) -> Result<i64, ApiError> {
    match actor.role {
        Role::Student { student_id } => Ok(student_id),
        Role::Admin | Role::Teacher { .. } => Err(ApiError::Unauthorized {
            action: action.to_string(),
            required_role: String::from("student role"),
        }),
    }
}

/// Creates or replaces a student's result for one subject and year.
///
/// The caller must be a teacher assigned to the subject in the student's
/// class. Score fields left out of the request keep their stored values.
/// Any existing approval is cleared by the write.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The scores to record
/// * `authenticated_actor` - The authenticated actor making the request
///
/// # Returns
///
/// The stored row and whether it was newly created.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not a teacher or is not assigned to the subject and class
/// - An identifier, the academic year, or a score is invalid
/// - The subject or student does not exist
/// - A concurrent write to the same key collided
pub fn upsert_result(
    persistence: &mut Persistence,
    request: &UpsertResultRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<UpsertResultResponse, ApiError> {
    let teacher_id: i64 = teacher_id_of(authenticated_actor, "write_result")?;

    let student_id: i64 = parse_identifier("student_id", request.student_id)?;
    let subject_id: i64 = parse_identifier("subject_id", request.subject_id)?;
    let academic_year: AcademicYear = parse_academic_year(&request.academic_year)?;
    validate_scores(&request.scores()).map_err(translate_domain_error)?;

    debug!(
        teacher_id,
        student_id,
        subject_id,
        academic_year = %academic_year,
        "Handling upsert_result request"
    );

    let subject_exists: bool = persistence
        .subject_exists(subject_id)
        .map_err(|e| translate_persistence_error(e, "Subject"))?;
    if !subject_exists {
        return Err(ApiError::ResourceNotFound {
            resource_type: String::from("Subject"),
            message: format!("Subject {subject_id} does not exist"),
        });
    }

    Authorizer::authorize(
        persistence,
        authenticated_actor,
        Capability::WriteResult {
            subject_id,
            student_id,
        },
    )?;

    let command: UpsertResult = UpsertResult {
        student_id,
        subject_id,
        academic_year,
        scores: request.scores(),
    };

    let outcome: UpsertOutcome = persistence
        .upsert_result(command, teacher_id)
        .map_err(|e| translate_persistence_error(e, "Result"))?;

    let message: String = if outcome.created {
        String::from("Result created successfully")
    } else {
        String::from("Result updated successfully")
    };

    info!(
        result_id = outcome.record.result_id,
        created = outcome.created,
        "Result stored"
    );

    Ok(UpsertResultResponse {
        result: ResultInfo::from(&outcome.record),
        created: outcome.created,
        message,
    })
}

/// Lists every stored result, newest first. Admin only.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the query fails.
pub fn list_results(
    persistence: &mut Persistence,
    authenticated_actor: &AuthenticatedActor,
) -> Result<ListResultsResponse, ApiError> {
    Authorizer::authorize(persistence, authenticated_actor, Capability::ListAllResults)?;

    let records: Vec<ResultRecord> = persistence
        .list_results()
        .map_err(|e| translate_persistence_error(e, "Result"))?;

    Ok(ListResultsResponse {
        results: records.iter().map(ResultInfo::from).collect(),
    })
}

/// Lists results that are not approved, with display names. Admin only.
///
/// Rejected rows are included; they stay in the queue until a teacher
/// edits them or an admin approves them.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the query fails.
pub fn list_pending_results(
    persistence: &mut Persistence,
    authenticated_actor: &AuthenticatedActor,
) -> Result<ListPendingResultsResponse, ApiError> {
    Authorizer::authorize(persistence, authenticated_actor, Capability::ReviewResults)?;

    let pending: Vec<PendingResult> = persistence
        .list_pending_results()
        .map_err(|e| translate_persistence_error(e, "Result"))?;

    Ok(ListPendingResultsResponse {
        results: pending.iter().map(PendingResultInfo::from).collect(),
    })
}

fn review_result(
    persistence: &mut Persistence,
    result_id: i64,
    command: ReviewCommand,
    authenticated_actor: &AuthenticatedActor,
) -> Result<ResultRecord, ApiError> {
    Authorizer::authorize(persistence, authenticated_actor, Capability::ReviewResults)?;
    let result_id: i64 = parse_identifier("result_id", result_id)?;

    debug!(
        result_id,
        admin_id = authenticated_actor.account_id,
        decision = command.name(),
        "Handling review request"
    );

    persistence
        .review_result(result_id, command, authenticated_actor.account_id)
        .map_err(|e| translate_persistence_error(e, "Result"))
}

/// Approves a result, making it visible to its student. Admin only.
///
/// Allowed from any approval state.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the result does not
/// exist.
pub fn approve_result(
    persistence: &mut Persistence,
    result_id: i64,
    request: &ReviewResultRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<ReviewResultResponse, ApiError> {
    let command: ReviewCommand = ReviewCommand::Approve {
        notes: request.notes.clone(),
    };
    let record: ResultRecord = review_result(persistence, result_id, command, authenticated_actor)?;

    Ok(ReviewResultResponse {
        result: ResultInfo::from(&record),
        message: String::from("Result approved successfully"),
    })
}

/// Rejects a result. Admin only.
///
/// Notes default to a fixed message when omitted. A previous approval
/// stamp is kept on the row.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the result does not
/// exist.
pub fn reject_result(
    persistence: &mut Persistence,
    result_id: i64,
    request: &ReviewResultRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<ReviewResultResponse, ApiError> {
    let command: ReviewCommand = ReviewCommand::Reject {
        notes: request.notes.clone(),
    };
    let record: ResultRecord = review_result(persistence, result_id, command, authenticated_actor)?;

    Ok(ReviewResultResponse {
        result: ResultInfo::from(&record),
        message: String::from("Result rejected successfully"),
    })
}

/// Returns a student's raw rows for one year in every approval state.
/// Admin only.
///
/// # Errors
///
/// Returns an error if the actor is not an admin, the input is invalid, or
/// the student does not exist.
pub fn get_student_results(
    persistence: &mut Persistence,
    student_id: i64,
    academic_year: &str,
    authenticated_actor: &AuthenticatedActor,
) -> Result<StudentResultsResponse, ApiError> {
    Authorizer::authorize(
        persistence,
        authenticated_actor,
        Capability::ReadStudentResults { student_id },
    )?;

    let student_id: i64 = parse_identifier("student_id", student_id)?;
    let academic_year: AcademicYear = parse_academic_year(academic_year)?;

    if persistence
        .get_student(student_id)
        .map_err(|e| translate_persistence_error(e, "Student"))?
        .is_none()
    {
        return Err(ApiError::ResourceNotFound {
            resource_type: String::from("Student"),
            message: format!("Student {student_id} does not exist"),
        });
    }

    let records: Vec<ResultRecord> = persistence
        .list_student_results(student_id, academic_year.value())
        .map_err(|e| translate_persistence_error(e, "Result"))?;

    Ok(StudentResultsResponse {
        student_id,
        academic_year: academic_year.value().to_string(),
        results: records.iter().map(ResultInfo::from).collect(),
    })
}

/// Returns a class roster joined with each student's result for a subject.
///
/// The caller must be a teacher assigned to the subject in that class.
/// Students without a recorded result are listed with no result.
///
/// # Errors
///
/// Returns an error if the actor is not assigned, the input is invalid, or
/// the class does not exist.
pub fn get_class_roster(
    persistence: &mut Persistence,
    class_id: i64,
    subject_id: i64,
    academic_year: &str,
    authenticated_actor: &AuthenticatedActor,
) -> Result<ClassRosterResponse, ApiError> {
    teacher_id_of(authenticated_actor, "read_class_roster")?;
    let class_id: i64 = parse_identifier("class_id", class_id)?;
    let subject_id: i64 = parse_identifier("subject_id", subject_id)?;
    let academic_year: AcademicYear = parse_academic_year(academic_year)?;

    Authorizer::authorize(
        persistence,
        authenticated_actor,
        Capability::ReadClassRoster {
            class_id,
            subject_id,
        },
    )?;

    let roster: Vec<RosterEntry> = persistence
        .list_class_roster(class_id, subject_id, academic_year.value())
        .map_err(|e| translate_persistence_error(e, "Class"))?;

    Ok(ClassRosterResponse {
        class_id,
        subject_id,
        academic_year: academic_year.value().to_string(),
        students: roster.iter().map(RosterEntryInfo::from).collect(),
    })
}

/// Builds a student's report of approved results.
///
/// When `academic_year` is missing or does not look like a year range, the
/// most recent year with an approved result is used. A student with no
/// approved results gets an empty report.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn build_student_report(
    persistence: &mut Persistence,
    student_id: i64,
    academic_year: Option<&str>,
) -> Result<StudentReport, ApiError> {
    let requested: Option<&str> = academic_year
        .map(str::trim)
        .filter(|year| AcademicYear::looks_like_range(year));

    let year: String = if let Some(year) = requested {
        year.to_string()
    } else {
        let latest: Option<String> = persistence
            .latest_approved_year(student_id)
            .map_err(|e| translate_persistence_error(e, "Result"))?;
        match latest {
            Some(year) => {
                debug!(student_id, academic_year = %year, "Falling back to latest approved year");
                year
            }
            None => return Ok(StudentReport::empty(student_id, None)),
        }
    };

    let rows: Vec<SubjectResult> = persistence
        .list_approved_subject_results(student_id, &year)
        .map_err(|e| translate_persistence_error(e, "Result"))?;

    Ok(build_report(student_id, &year, &rows))
}

/// Returns the caller's own report. Student only.
///
/// # Errors
///
/// Returns an error if the actor is not a student or the store cannot be
/// read.
pub fn get_my_report(
    persistence: &mut Persistence,
    academic_year: Option<&str>,
    authenticated_actor: &AuthenticatedActor,
) -> Result<StudentReport, ApiError> {
    let student_id: i64 = student_id_of(authenticated_actor, "read_own_report")?;
    Authorizer::authorize(
        persistence,
        authenticated_actor,
        Capability::ReadOwnReport { student_id },
    )?;

    build_student_report(persistence, student_id, academic_year)
}

/// Lists the years in which the caller has approved results. Student only.
///
/// # Errors
///
/// Returns an error if the actor is not a student or the query fails.
pub fn get_my_years(
    persistence: &mut Persistence,
    authenticated_actor: &AuthenticatedActor,
) -> Result<AcademicYearsResponse, ApiError> {
    let student_id: i64 = student_id_of(authenticated_actor, "read_own_report")?;
    Authorizer::authorize(
        persistence,
        authenticated_actor,
        Capability::ReadOwnReport { student_id },
    )?;

    let academic_years: Vec<String> = persistence
        .list_approved_years(student_id)
        .map_err(|e| translate_persistence_error(e, "Result"))?;

    Ok(AcademicYearsResponse {
        student_id,
        academic_years,
    })
}

/// Returns one result.
///
/// Admins may read any row, teachers the rows they wrote, and students
/// their own approved rows.
///
/// # Errors
///
/// Returns an error if the result does not exist or the caller may not
/// read it.
pub fn get_result(
    persistence: &mut Persistence,
    result_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<ResultInfo, ApiError> {
    let result_id: i64 = parse_identifier("result_id", result_id)?;
    Authorizer::authorize(
        persistence,
        authenticated_actor,
        Capability::ReadResult { result_id },
    )?;

    let record: ResultRecord = persistence
        .get_result(result_id)
        .map_err(|e| translate_persistence_error(e, "Result"))?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Result"),
            message: format!("Result {result_id} does not exist"),
        })?;

    Ok(ResultInfo::from(&record))
}

/// Logs in and creates a session.
///
/// # Errors
///
/// Returns an error if the credentials are wrong or the account is
/// disabled.
pub fn login(
    persistence: &mut Persistence,
    request: &LoginRequest,
) -> Result<LoginResponse, ApiError> {
    let (session_token, actor, account, expires_at) =
        AuthenticationService::login(persistence, &request.login_name, &request.password)?;

    Ok(LoginResponse {
        session_token,
        account_id: account.account_id,
        login_name: account.login_name,
        display_name: account.display_name,
        role: actor.role.name().to_string(),
        teacher_id: account.teacher_id,
        student_id: account.student_id,
        expires_at,
    })
}

/// Ends a session.
///
/// # Errors
///
/// Returns an error if the session cannot be deleted.
pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), ApiError> {
    AuthenticationService::logout(persistence, session_token)?;
    Ok(())
}

/// Describes the account behind the current session.
#[must_use]
pub fn whoami(authenticated_actor: &AuthenticatedActor, account: &AccountData) -> WhoAmIResponse {
    WhoAmIResponse {
        account_id: account.account_id,
        login_name: account.login_name.clone(),
        display_name: account.display_name.clone(),
        role: authenticated_actor.role.name().to_string(),
        teacher_id: account.teacher_id,
        student_id: account.student_id,
        last_login_at: account.last_login_at.clone(),
    }
}

/// Creates the first admin account if no enabled admin exists.
///
/// # Returns
///
/// The new account id, or `None` if an admin already existed.
///
/// # Errors
///
/// Returns an error if the lookup or insert fails.
pub fn ensure_admin_account(
    persistence: &mut Persistence,
    login_name: &str,
    password: &str,
) -> Result<Option<i64>, ApiError> {
    let admins: i64 = persistence
        .count_active_admin_accounts()
        .map_err(|e| translate_persistence_error(e, "Account"))?;
    if admins > 0 {
        debug!(admins, "Admin account already present");
        return Ok(None);
    }

    if password.is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("password"),
            message: String::from("Admin password must not be empty"),
        });
    }

    let account_id: i64 = persistence
        .create_account(NewAccount {
            login_name,
            display_name: "Administrator",
            password,
            role: AccountRole::Admin,
            teacher_id: None,
            student_id: None,
        })
        .map_err(|e| translate_persistence_error(e, "Account"))?;

    info!(account_id, login_name = %login_name, "Created bootstrap admin account");
    Ok(Some(account_id))
}
