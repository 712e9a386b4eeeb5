//! Adoption application questionnaires, scoring, and decisions.
//!
//! Shelters attach a [`Form`] to each pet, adopters answer it, and the resulting
//! [`Application`] is scored by the fraction of preferred answers. The
//! [`ConcreteAdoptionMediator`] drives creation, approval and denial, notifying the parties
//! through per-application observers and routing denial feedback to a [`FeedbackSender`].

pub mod application;
pub mod domain;
pub mod feedback;
pub mod form;
pub mod mediator;
pub mod notifier;
pub mod repository;
pub mod template;

#[cfg(test)]
mod tests;

pub use application::{
    Answer, Application, ApplicationError, ApplicationStatus, ApplicationStatusView,
};
pub use domain::{
    Adopter, AdopterId, ApplicationId, Pet, PetId, PetStatus, Shelter, ShelterId,
};
pub use feedback::{
    ConfiguredFeedbackSender, ConsoleFeedbackAdapter, FeedbackError, FeedbackSender,
    FileFeedbackAdapter,
};
pub use form::{Form, FormError, Question, STANDARD_FORM_NAME};
pub use mediator::{AdoptionMediator, AdoptionOutcome, ConcreteAdoptionMediator, MediatorError};
pub use notifier::{
    AdopterObserver, ApplicationNotifier, ApplicationObserver, Inbox, Notification,
    ShelterObserver,
};
pub use repository::{AdoptionRepository, InMemoryAdoptionRepository, RepositoryError};
pub use template::{
    default_adoption_form, FormTemplateImportError, FormTemplateImporter, DEFAULT_TEMPLATE_NAME,
};
