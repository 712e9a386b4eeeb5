use std::fmt;

use serde::{Deserialize, Serialize};

use super::domain::{AdopterId, ApplicationId, Pet, PetId};
use super::form::{Form, Question};

/// Errors raised while building an application or moving it between states.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApplicationError {
    #[error("{answers} answers for {questions} questions")]
    InvalidForm { answers: usize, questions: usize },
    #[error("form has no questions to answer")]
    EmptyForm,
    #[error("'{option}' is not a valid option for '{question}'")]
    InvalidAnswer { question: String, option: String },
    #[error("{applicant} already applied to adopt {pet}")]
    ApplicationAlreadyExists { applicant: AdopterId, pet: PetId },
    #[error("application {application} is {status} and can no longer be {attempted}")]
    OperationNotAllowed {
        application: ApplicationId,
        status: ApplicationStatus,
        attempted: &'static str,
    },
    #[error("{0} has already been adopted")]
    PetAlreadyAdopted(PetId),
    #[error("application {application} does not belong to pet {pet}")]
    PetMismatch { application: ApplicationId, pet: PetId },
}

/// Review state of an application. Both decisions are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    InReview,
    Approved,
    Denied,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::InReview => "in_review",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Denied => "denied",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One submitted option bound to the question it answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    question: Question,
    submitted: String,
    matches_preferred: bool,
}

impl Answer {
    /// The submitted text must equal one of the question's options exactly.
    pub fn new(question: &Question, submitted: &str) -> Result<Self, ApplicationError> {
        if !question.has_option(submitted) {
            return Err(ApplicationError::InvalidAnswer {
                question: question.name().to_string(),
                option: submitted.to_string(),
            });
        }

        Ok(Self {
            question: question.clone(),
            submitted: submitted.to_string(),
            matches_preferred: submitted == question.preferred_answer(),
        })
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    pub fn submitted(&self) -> &str {
        &self.submitted
    }

    pub fn matches_preferred(&self) -> bool {
        self.matches_preferred
    }
}

/// Fails with `InvalidForm` unless there is exactly one answer per question.
pub fn ensure_answer_count<S: AsRef<str>>(
    form: &Form,
    answers: &[S],
) -> Result<(), ApplicationError> {
    if answers.len() != form.len() {
        return Err(ApplicationError::InvalidForm {
            answers: answers.len(),
            questions: form.len(),
        });
    }
    if form.is_empty() {
        return Err(ApplicationError::EmptyForm);
    }
    Ok(())
}

/// An applicant's scored submission against a pet's form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    id: ApplicationId,
    answers: Vec<Answer>,
    score: f64,
    status: ApplicationStatus,
    feedback: Option<String>,
}

impl Application {
    /// Bind answers to the form positionally and compute the compatibility score.
    ///
    /// Uniqueness per (pet, applicant) is a registry concern and is checked by the mediator.
    pub fn new<S: AsRef<str>>(
        applicant: AdopterId,
        pet: PetId,
        form: &Form,
        answers: &[S],
    ) -> Result<Self, ApplicationError> {
        ensure_answer_count(form, answers)?;

        let answers = form
            .iter()
            .zip(answers)
            .map(|(question, submitted)| Answer::new(question, submitted.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        let matches = answers
            .iter()
            .filter(|answer| answer.matches_preferred())
            .count();
        let score = matches as f64 / form.len() as f64;

        Ok(Self {
            id: ApplicationId::new(pet, applicant),
            answers,
            score,
            status: ApplicationStatus::InReview,
            feedback: None,
        })
    }

    pub fn id(&self) -> &ApplicationId {
        &self.id
    }

    pub fn applicant(&self) -> &AdopterId {
        &self.id.applicant
    }

    pub fn pet(&self) -> &PetId {
        &self.id.pet
    }

    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    /// Fraction of answers matching the preferred answer, in `[0, 1]`.
    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn status(&self) -> ApplicationStatus {
        self.status
    }

    pub fn is_in_review(&self) -> bool {
        self.status == ApplicationStatus::InReview
    }

    pub fn feedback(&self) -> Option<&str> {
        self.feedback.as_deref()
    }

    /// Approve the application and hand the pet to the applicant.
    ///
    /// Both guards run before either entity changes.
    pub fn approve(&mut self, pet: &mut Pet) -> Result<(), ApplicationError> {
        self.ensure_in_review("approved")?;
        if pet.id() != self.pet() {
            return Err(ApplicationError::PetMismatch {
                application: self.id.clone(),
                pet: pet.id().clone(),
            });
        }

        pet.adopt(&self.id.applicant)?;
        self.status = ApplicationStatus::Approved;
        Ok(())
    }

    pub fn deny(&mut self, feedback: impl Into<String>) -> Result<(), ApplicationError> {
        self.ensure_in_review("denied")?;
        self.status = ApplicationStatus::Denied;
        self.feedback = Some(feedback.into());
        Ok(())
    }

    fn ensure_in_review(&self, attempted: &'static str) -> Result<(), ApplicationError> {
        if self.is_in_review() {
            Ok(())
        } else {
            Err(ApplicationError::OperationNotAllowed {
                application: self.id.clone(),
                status: self.status,
                attempted,
            })
        }
    }

    pub fn status_view(&self) -> ApplicationStatusView {
        ApplicationStatusView {
            application_id: self.id.to_string(),
            pet: self.id.pet.clone(),
            applicant: self.id.applicant.clone(),
            status: self.status.label(),
            score: self.score,
            feedback: self.feedback.clone(),
        }
    }
}

/// Serializable snapshot of an application for listings and CLI output.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationStatusView {
    pub application_id: String,
    pub pet: PetId,
    pub applicant: AdopterId,
    pub status: &'static str,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}
