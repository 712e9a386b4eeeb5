use std::fmt;

use serde::{Deserialize, Serialize};

use super::application::ApplicationError;
use super::form::{Form, FormError};

/// Pets are addressed by their registered name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PetId(pub String);

/// Adopter username.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AdopterId(pub String);

/// Shelter username.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShelterId(pub String);

/// One application per applicant per pet, so the pair is the identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ApplicationId {
    pub pet: PetId,
    pub applicant: AdopterId,
}

impl ApplicationId {
    pub fn new(pet: PetId, applicant: AdopterId) -> Self {
        Self { pet, applicant }
    }
}

impl fmt::Display for PetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for AdopterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ShelterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.pet, self.applicant)
    }
}

/// Person applying to adopt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adopter {
    pub username: AdopterId,
    pub name: String,
}

impl Adopter {
    pub fn new(username: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            username: AdopterId(username.into()),
            name: name.into(),
        }
    }
}

/// Shelter operating pets and reviewing their applications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shelter {
    pub username: ShelterId,
    pub name: String,
    pub allowed_pet_types: Vec<String>,
}

impl Shelter {
    pub fn new(username: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            username: ShelterId(username.into()),
            name: name.into(),
            allowed_pet_types: Vec::new(),
        }
    }

    pub fn with_pet_type(mut self, pet_type: impl Into<String>) -> Self {
        self.allowed_pet_types.push(pet_type.into());
        self
    }

    /// A shelter that never declared pet types accepts any.
    pub fn accepts(&self, pet_type: &str) -> bool {
        self.allowed_pet_types.is_empty()
            || self
                .allowed_pet_types
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(pet_type))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PetStatus {
    Rescued,
    Adopted,
}

impl PetStatus {
    pub const fn label(self) -> &'static str {
        match self {
            PetStatus::Rescued => "rescued",
            PetStatus::Adopted => "adopted",
        }
    }
}

/// A rescued animal, its current questionnaire, and its adoption outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    id: PetId,
    shelter: ShelterId,
    pet_type: String,
    status: PetStatus,
    form: Form,
    applications: u32,
    tutor: Option<AdopterId>,
}

impl Pet {
    pub fn new(name: impl Into<String>, shelter: ShelterId, pet_type: impl Into<String>) -> Self {
        let name = name.into();
        let form = Form::standard_for(&name);
        Self {
            id: PetId(name),
            shelter,
            pet_type: pet_type.into(),
            status: PetStatus::Rescued,
            form,
            applications: 0,
            tutor: None,
        }
    }

    pub fn id(&self) -> &PetId {
        &self.id
    }

    pub fn shelter(&self) -> &ShelterId {
        &self.shelter
    }

    pub fn pet_type(&self) -> &str {
        &self.pet_type
    }

    pub fn status(&self) -> PetStatus {
        self.status
    }

    pub fn is_adopted(&self) -> bool {
        self.status == PetStatus::Adopted
    }

    pub fn tutor(&self) -> Option<&AdopterId> {
        self.tutor.as_ref()
    }

    pub fn applications(&self) -> u32 {
        self.applications
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    /// Replace the questionnaire wholesale, e.g. with a clone of a shared template.
    pub fn assign_form(&mut self, form: Form) {
        self.form = form;
    }

    pub fn add_template_question<I, S>(
        &mut self,
        question: impl Into<String>,
        options: I,
        preferred_answer: impl Into<String>,
    ) -> Result<(), FormError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.form.add_question(question, options, preferred_answer)?;
        Ok(())
    }

    pub(crate) fn record_application(&mut self) {
        self.applications += 1;
    }

    pub(crate) fn adopt(&mut self, adopter: &AdopterId) -> Result<(), ApplicationError> {
        if self.tutor.is_some() || self.is_adopted() {
            return Err(ApplicationError::PetAlreadyAdopted(self.id.clone()));
        }

        self.tutor = Some(adopter.clone());
        self.status = PetStatus::Adopted;
        Ok(())
    }
}
