// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Capability-based authorization.
//!
//! Every handler states the [`Capability`] it needs and asks the actor's
//! [`Authorizer`] to grant it. Admins are checked by role alone, teachers
//! against their (subject, class) assignments, and students against their
//! own student id.

use marksheet_domain::ResultRecord;
use marksheet_persistence::{Persistence, StudentData};
use tracing::debug;

use crate::auth::{AuthenticatedActor, Role};
use crate::error::{ApiError, translate_persistence_error};

/// Something an actor may ask to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Create or replace a student's result for a subject.
    WriteResult { subject_id: i64, student_id: i64 },
    /// Read one stored result.
    ReadResult { result_id: i64 },
    /// Read a class roster joined with results for one subject.
    ReadClassRoster { class_id: i64, subject_id: i64 },
    /// List every stored result.
    ListAllResults,
    /// List, approve and reject results awaiting review.
    ReviewResults,
    /// Read a student's raw rows in every approval state.
    ReadStudentResults { student_id: i64 },
    /// Read a student's approved report and years.
    ReadOwnReport { student_id: i64 },
}

impl Capability {
    /// The action name used in denial messages.
    #[must_use]
    pub const fn action(&self) -> &'static str {
        match self {
            Self::WriteResult { .. } => "write_result",
            Self::ReadResult { .. } => "read_result",
            Self::ReadClassRoster { .. } => "read_class_roster",
            Self::ListAllResults => "list_all_results",
            Self::ReviewResults => "review_results",
            Self::ReadStudentResults { .. } => "read_student_results",
            Self::ReadOwnReport { .. } => "read_own_report",
        }
    }
}

/// A check that grants or refuses capabilities.
pub trait CapabilityCheck {
    /// Grants `capability` or explains why not.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` when the capability is refused,
    /// `ResourceNotFound` when it names a row that does not exist, and
    /// `Internal` if the store cannot be read.
    fn check(&self, persistence: &mut Persistence, capability: Capability)
    -> Result<(), ApiError>;
}

fn denied(capability: Capability, required_role: &str) -> ApiError {
    ApiError::Unauthorized {
        action: capability.action().to_string(),
        required_role: required_role.to_string(),
    }
}

fn result_not_found(result_id: i64) -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: String::from("Result"),
        message: format!("Result {result_id} does not exist"),
    }
}

fn load_result(persistence: &mut Persistence, result_id: i64) -> Result<ResultRecord, ApiError> {
    persistence
        .get_result(result_id)
        .map_err(|e| translate_persistence_error(e, "Result"))?
        .ok_or_else(|| result_not_found(result_id))
}

/// Grants admins everything except the teacher and student scoped actions.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdminAuthorizer;

impl CapabilityCheck for AdminAuthorizer {
    fn check(
        &self,
        _persistence: &mut Persistence,
        capability: Capability,
    ) -> Result<(), ApiError> {
        match capability {
            Capability::WriteResult { .. } | Capability::ReadClassRoster { .. } => {
                Err(denied(capability, "teacher role"))
            }
            Capability::ReadOwnReport { .. } => Err(denied(capability, "student role")),
            Capability::ReadResult { .. }
            | Capability::ListAllResults
            | Capability::ReviewResults
            | Capability::ReadStudentResults { .. } => Ok(()),
        }
    }
}

/// Scopes a teacher to the (subject, class) pairs they are assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignmentAuthorizer {
    teacher_id: i64,
}

impl AssignmentAuthorizer {
    const SCOPE: &'static str = "teacher assigned to the subject and class";

    /// Creates an authorizer for one teacher.
    #[must_use]
    pub const fn new(teacher_id: i64) -> Self {
        Self { teacher_id }
    }

    /// Allows a write when the teacher is assigned to the subject in the
    /// student's class.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the student does not exist and
    /// `Unauthorized` if no matching assignment exists.
    pub fn authorize_write(
        &self,
        persistence: &mut Persistence,
        subject_id: i64,
        student_id: i64,
    ) -> Result<(), ApiError> {
        let student: StudentData = persistence
            .get_student(student_id)
            .map_err(|e| translate_persistence_error(e, "Student"))?
            .ok_or_else(|| ApiError::ResourceNotFound {
                resource_type: String::from("Student"),
                message: format!("Student {student_id} does not exist"),
            })?;

        self.require_assignment(
            persistence,
            subject_id,
            student.class_id,
            Capability::WriteResult {
                subject_id,
                student_id,
            },
        )
    }

    /// Allows a read when the teacher last wrote the result.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the result does not exist and
    /// `Unauthorized` if another teacher owns it.
    pub fn authorize_read(
        &self,
        persistence: &mut Persistence,
        result_id: i64,
    ) -> Result<(), ApiError> {
        let record: ResultRecord = load_result(persistence, result_id)?;
        if record.teacher_id == self.teacher_id {
            Ok(())
        } else {
            debug!(
                teacher_id = self.teacher_id,
                result_id, "Teacher does not own result"
            );
            Err(denied(Capability::ReadResult { result_id }, Self::SCOPE))
        }
    }

    fn require_assignment(
        &self,
        persistence: &mut Persistence,
        subject_id: i64,
        class_id: i64,
        capability: Capability,
    ) -> Result<(), ApiError> {
        let assigned: bool = persistence
            .assignment_exists(self.teacher_id, subject_id, class_id)
            .map_err(|e| translate_persistence_error(e, "Assignment"))?;

        if assigned {
            Ok(())
        } else {
            debug!(
                teacher_id = self.teacher_id,
                subject_id, class_id, "No assignment covers request"
            );
            Err(denied(capability, Self::SCOPE))
        }
    }
}

impl CapabilityCheck for AssignmentAuthorizer {
    fn check(&self, persistence: &mut Persistence, capability: Capability) -> Result<(), ApiError> {
        match capability {
            Capability::WriteResult {
                subject_id,
                student_id,
            } => self.authorize_write(persistence, subject_id, student_id),
            Capability::ReadResult { result_id } => self.authorize_read(persistence, result_id),
            Capability::ReadClassRoster {
                class_id,
                subject_id,
            } => {
                let class_exists: bool = persistence
                    .class_exists(class_id)
                    .map_err(|e| translate_persistence_error(e, "Class"))?;
                if !class_exists {
                    return Err(ApiError::ResourceNotFound {
                        resource_type: String::from("Class"),
                        message: format!("Class {class_id} does not exist"),
                    });
                }
                self.require_assignment(persistence, subject_id, class_id, capability)
            }
            Capability::ListAllResults
            | Capability::ReviewResults
            | Capability::ReadStudentResults { .. } => Err(denied(capability, "admin role")),
            Capability::ReadOwnReport { .. } => Err(denied(capability, "student role")),
        }
    }
}

/// Limits a student to their own approved results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudentAuthorizer {
    student_id: i64,
}

impl StudentAuthorizer {
    /// Creates an authorizer for one student.
    #[must_use]
    pub const fn new(student_id: i64) -> Self {
        Self { student_id }
    }
}

impl CapabilityCheck for StudentAuthorizer {
    fn check(&self, persistence: &mut Persistence, capability: Capability) -> Result<(), ApiError> {
        match capability {
            Capability::ReadOwnReport { student_id } if student_id == self.student_id => Ok(()),
            Capability::ReadOwnReport { .. } => Err(denied(capability, "the same student")),
            Capability::ReadResult { result_id } => {
                let record: ResultRecord = load_result(persistence, result_id)?;
                if record.student_id != self.student_id {
                    return Err(denied(capability, "the same student"));
                }
                // Unapproved rows do not exist as far as the student can tell.
                if !record.is_approved() {
                    return Err(result_not_found(result_id));
                }
                Ok(())
            }
            Capability::WriteResult { .. } | Capability::ReadClassRoster { .. } => {
                Err(denied(capability, "teacher role"))
            }
            Capability::ListAllResults
            | Capability::ReviewResults
            | Capability::ReadStudentResults { .. } => Err(denied(capability, "admin role")),
        }
    }
}

/// The authorizer for an actor, chosen by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorizer {
    Admin,
    Teacher(AssignmentAuthorizer),
    Student(StudentAuthorizer),
}

impl Authorizer {
    /// Picks the authorizer matching the actor's role.
    #[must_use]
    pub const fn for_actor(actor: &AuthenticatedActor) -> Self {
        match actor.role {
            Role::Admin => Self::Admin,
            Role::Teacher { teacher_id } => Self::Teacher(AssignmentAuthorizer::new(teacher_id)),
            Role::Student { student_id } => Self::Student(StudentAuthorizer::new(student_id)),
        }
    }

    /// Grants `capability` to `actor` or returns why not.
    ///
    /// # Errors
    ///
    /// See [`CapabilityCheck::check`].
    pub fn authorize(
        persistence: &mut Persistence,
        actor: &AuthenticatedActor,
        capability: Capability,
    ) -> Result<(), ApiError> {
        Self::for_actor(actor).check(persistence, capability)
    }
}

impl CapabilityCheck for Authorizer {
    fn check(&self, persistence: &mut Persistence, capability: Capability) -> Result<(), ApiError> {
        match self {
            Self::Admin => AdminAuthorizer.check(persistence, capability),
            Self::Teacher(teacher) => teacher.check(persistence, capability),
            Self::Student(student) => student.check(persistence, capability),
        }
    }
}
