use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use tracing::{debug, info, warn};

use super::application::{
    ensure_answer_count, Application, ApplicationError, ApplicationStatus,
};
use super::domain::{Adopter, AdopterId, ApplicationId, Pet, PetId, Shelter, ShelterId};
use super::feedback::{FeedbackError, FeedbackSender};
use super::form::{Form, FormError};
use super::notifier::{
    AdopterObserver, ApplicationNotifier, ApplicationObserver, Inbox, ShelterObserver,
};
use super::repository::{AdoptionRepository, RepositoryError};

/// Coordinates application creation and decisions across pets, adopters, notifications,
/// and feedback delivery.
pub trait AdoptionMediator {
    fn create_application<S: AsRef<str>>(
        &self,
        applicant: &AdopterId,
        pet: &PetId,
        answers: &[S],
    ) -> Result<Application, MediatorError>;

    /// Approves a single application. Competing applications stay in review.
    fn approve_application(&self, application: &ApplicationId)
        -> Result<Application, MediatorError>;

    fn deny_application(
        &self,
        application: &ApplicationId,
        feedback: &str,
    ) -> Result<Application, MediatorError>;
}

/// Result of approving one application and denying the competing ones.
#[derive(Debug, Clone, Serialize)]
pub struct AdoptionOutcome {
    pub approved: Application,
    pub denied: Vec<Application>,
}

/// Mediator backed by a repository and a feedback sink chosen at construction.
pub struct ConcreteAdoptionMediator<R, F> {
    repository: Arc<R>,
    feedback: Arc<F>,
    inbox: Inbox,
    notifiers: Mutex<HashMap<ApplicationId, ApplicationNotifier>>,
}

impl<R, F> ConcreteAdoptionMediator<R, F>
where
    R: AdoptionRepository + 'static,
    F: FeedbackSender + 'static,
{
    pub fn new(repository: Arc<R>, feedback: Arc<F>) -> Self {
        Self {
            repository,
            feedback,
            inbox: Inbox::default(),
            notifiers: Mutex::new(HashMap::new()),
        }
    }

    pub fn inbox(&self) -> &Inbox {
        &self.inbox
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    pub fn register_adopter(&self, adopter: Adopter) -> Result<(), MediatorError> {
        info!(adopter = %adopter.username, "registering adopter");
        self.repository.insert_adopter(adopter)?;
        Ok(())
    }

    pub fn register_shelter(&self, shelter: Shelter) -> Result<(), MediatorError> {
        info!(shelter = %shelter.username, "registering shelter");
        self.repository.insert_shelter(shelter)?;
        Ok(())
    }

    /// Register a pet under an existing shelter that accepts its type.
    pub fn register_pet(&self, pet: Pet) -> Result<(), MediatorError> {
        let shelter = self
            .repository
            .shelter(pet.shelter())?
            .ok_or_else(|| MediatorError::ShelterNotFound(pet.shelter().clone()))?;

        if !shelter.accepts(pet.pet_type()) {
            return Err(MediatorError::PetTypeNotAllowed {
                shelter: shelter.username,
                pet_type: pet.pet_type().to_string(),
            });
        }

        info!(pet = %pet.id(), shelter = %shelter.username, "registering pet");
        self.repository.insert_pet(pet)?;
        Ok(())
    }

    /// Replace a pet's form, usually with a clone of a shared template.
    pub fn assign_form(&self, pet: &PetId, form: Form) -> Result<Pet, MediatorError> {
        let mut record = self.resolve_pet(pet)?;
        debug!(pet = %pet, form = form.name(), questions = form.len(), "assigning form");
        record.assign_form(form);
        self.repository.update_pet(record.clone())?;
        Ok(record)
    }

    pub fn add_form_question(
        &self,
        pet: &PetId,
        question: &str,
        options: &[&str],
        preferred_answer: &str,
    ) -> Result<Pet, MediatorError> {
        let mut record = self.resolve_pet(pet)?;
        record.add_template_question(question, options.iter().copied(), preferred_answer)?;
        self.repository.update_pet(record.clone())?;
        Ok(record)
    }

    /// Approve one application and deny every other in-review application for the same pet.
    ///
    /// The chosen application is checked on copies before anything is written. Denials are
    /// delivered one at a time, so a feedback failure leaves the pet adopted with some
    /// competitors still in review; calling again with the same application resumes the
    /// sweep from there.
    pub fn finalize_adoption(
        &self,
        application: &ApplicationId,
        feedback_for_others: &str,
    ) -> Result<AdoptionOutcome, MediatorError> {
        let chosen = self.resolve_application(application)?;
        let mut pet = self.resolve_pet(chosen.pet())?;
        self.resolve_adopter(chosen.applicant())?;

        let resuming = chosen.status() == ApplicationStatus::Approved
            && pet.tutor() == Some(chosen.applicant());

        let approved = if resuming {
            info!(application = %application, "resuming adoption sweep");
            chosen
        } else {
            let mut preview = chosen.clone();
            preview.approve(&mut pet)?;
            self.approve_application(application)?
        };

        let competing: Vec<Application> = self
            .repository
            .applications_for_pet(approved.pet())?
            .into_iter()
            .filter(|candidate| candidate.id() != approved.id() && candidate.is_in_review())
            .collect();

        let mut denied = Vec::with_capacity(competing.len());
        for candidate in competing {
            denied.push(self.deny_application(candidate.id(), feedback_for_others)?);
        }

        info!(
            application = %application,
            denied = denied.len(),
            "adoption finalized"
        );

        Ok(AdoptionOutcome { approved, denied })
    }

    /// Applications for a pet, best score first; ties keep submission order.
    pub fn applications_for_pet(&self, pet: &PetId) -> Result<Vec<Application>, MediatorError> {
        self.resolve_pet(pet)?;
        let mut applications = self.repository.applications_for_pet(pet)?;
        applications.sort_by(|left, right| right.score().total_cmp(&left.score()));
        Ok(applications)
    }

    pub fn applications_for_applicant(
        &self,
        applicant: &AdopterId,
    ) -> Result<Vec<Application>, MediatorError> {
        self.resolve_adopter(applicant)?;
        Ok(self.repository.applications_for_applicant(applicant)?)
    }

    /// Pets listed by a shelter, adopted ones included.
    pub fn pets_for_shelter(&self, shelter: &ShelterId) -> Result<Vec<Pet>, MediatorError> {
        self.repository
            .shelter(shelter)?
            .ok_or_else(|| MediatorError::ShelterNotFound(shelter.clone()))?;
        Ok(self.repository.pets_for_shelter(shelter)?)
    }

    pub fn application(&self, id: &ApplicationId) -> Result<Application, MediatorError> {
        self.resolve_application(id)
    }

    pub fn pet(&self, id: &PetId) -> Result<Pet, MediatorError> {
        self.resolve_pet(id)
    }

    fn resolve_pet(&self, id: &PetId) -> Result<Pet, MediatorError> {
        self.repository
            .pet(id)?
            .ok_or_else(|| MediatorError::PetNotFound(id.clone()))
    }

    fn resolve_adopter(&self, id: &AdopterId) -> Result<Adopter, MediatorError> {
        self.repository
            .adopter(id)?
            .ok_or_else(|| MediatorError::AdopterNotFound(id.clone()))
    }

    fn resolve_application(&self, id: &ApplicationId) -> Result<Application, MediatorError> {
        self.repository
            .application(id)?
            .ok_or_else(|| MediatorError::ApplicationNotFound(id.clone()))
    }

    fn notifiers(&self) -> MutexGuard<'_, HashMap<ApplicationId, ApplicationNotifier>> {
        self.notifiers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn open_notifier(&self, application: &Application, pet: &Pet, message: &str) {
        let adopter_observer: Arc<dyn ApplicationObserver> = Arc::new(AdopterObserver::new(
            application.applicant().clone(),
            application.pet().clone(),
            self.inbox.clone(),
        ));
        let shelter_observer: Arc<dyn ApplicationObserver> = Arc::new(ShelterObserver::new(
            pet.shelter().clone(),
            pet.id().clone(),
            self.inbox.clone(),
        ));

        let mut notifier = ApplicationNotifier::new();
        notifier.attach(adopter_observer);
        notifier.attach(shelter_observer.clone());
        notifier.notify(message);

        // Shelters only hear about new applications; decisions go to the applicant.
        notifier.detach(&shelter_observer);
        self.notifiers().insert(application.id().clone(), notifier);
    }

    /// Final status change for an application; its notifier is dropped afterwards.
    fn close_notifier(&self, application: &Application, message: &str) {
        let mut notifiers = self.notifiers();
        let notifier = notifiers.remove(application.id()).unwrap_or_else(|| {
            debug!(application = %application.id(), "no notifier registered, attaching applicant");
            let mut notifier = ApplicationNotifier::new();
            notifier.attach(Arc::new(AdopterObserver::new(
                application.applicant().clone(),
                application.pet().clone(),
                self.inbox.clone(),
            )));
            notifier
        });
        drop(notifiers);
        notifier.notify(message);
    }
}

impl<R, F> AdoptionMediator for ConcreteAdoptionMediator<R, F>
where
    R: AdoptionRepository + 'static,
    F: FeedbackSender + 'static,
{
    fn create_application<S: AsRef<str>>(
        &self,
        applicant: &AdopterId,
        pet: &PetId,
        answers: &[S],
    ) -> Result<Application, MediatorError> {
        let mut pet = self.resolve_pet(pet)?;
        let adopter = self.resolve_adopter(applicant)?;

        if pet.is_adopted() {
            return Err(ApplicationError::PetAlreadyAdopted(pet.id().clone()).into());
        }

        ensure_answer_count(pet.form(), answers)?;

        let id = ApplicationId::new(pet.id().clone(), adopter.username.clone());
        if self.repository.application(&id)?.is_some() {
            return Err(ApplicationError::ApplicationAlreadyExists {
                applicant: adopter.username,
                pet: pet.id().clone(),
            }
            .into());
        }

        let application =
            Application::new(adopter.username.clone(), pet.id().clone(), pet.form(), answers)?;
        let stored = self.repository.insert_application(application)?;

        pet.record_application();
        self.repository.update_pet(pet.clone())?;

        info!(
            application = %stored.id(),
            score = stored.score(),
            applications = pet.applications(),
            "application created"
        );

        self.open_notifier(
            &stored,
            &pet,
            &format!(
                "@{} applied with a {:.0}% compatibility score, status {}",
                adopter.username,
                stored.score() * 100.0,
                stored.status()
            ),
        );

        Ok(stored)
    }

    fn approve_application(
        &self,
        application: &ApplicationId,
    ) -> Result<Application, MediatorError> {
        let mut record = self.resolve_application(application)?;
        let mut pet = self.resolve_pet(record.pet())?;
        let adopter = self.resolve_adopter(record.applicant())?;

        if let Err(err) = record.approve(&mut pet) {
            warn!(application = %application, error = %err, "approval rejected");
            return Err(err.into());
        }

        self.repository.update_application(record.clone())?;
        self.repository.update_pet(pet)?;

        info!(application = %application, tutor = %adopter.username, "application approved");

        self.close_notifier(
            &record,
            &format!(
                "approved! Congratulations {}, {} is now part of your family",
                adopter.name,
                record.pet()
            ),
        );

        Ok(record)
    }

    fn deny_application(
        &self,
        application: &ApplicationId,
        feedback: &str,
    ) -> Result<Application, MediatorError> {
        let mut record = self.resolve_application(application)?;
        self.resolve_pet(record.pet())?;
        self.resolve_adopter(record.applicant())?;

        if let Err(err) = record.deny(feedback) {
            warn!(application = %application, error = %err, "denial rejected");
            return Err(err.into());
        }

        // Nothing is persisted until the feedback reaches its sink.
        self.feedback
            .send_feedback(record.applicant(), record.pet(), feedback)?;
        self.repository.update_application(record.clone())?;

        info!(application = %application, "application denied");

        self.close_notifier(&record, &format!("status changed to {}", record.status()));

        Ok(record)
    }
}

/// Error raised by the adoption mediator.
#[derive(Debug, thiserror::Error)]
pub enum MediatorError {
    #[error("pet {0} not found")]
    PetNotFound(PetId),
    #[error("adopter {0} not found")]
    AdopterNotFound(AdopterId),
    #[error("shelter {0} not found")]
    ShelterNotFound(ShelterId),
    #[error("application {0} not found")]
    ApplicationNotFound(ApplicationId),
    #[error("shelter {shelter} does not accept {pet_type} pets")]
    PetTypeNotAllowed { shelter: ShelterId, pet_type: String },
    #[error(transparent)]
    Application(#[from] ApplicationError),
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Feedback(#[from] FeedbackError),
}
