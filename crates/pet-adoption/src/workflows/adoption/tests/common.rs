use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::workflows::adoption::domain::{Adopter, AdopterId, Pet, PetId, Shelter, ShelterId};
use crate::workflows::adoption::feedback::{FeedbackError, FeedbackSender};
use crate::workflows::adoption::form::Form;
use crate::workflows::adoption::mediator::ConcreteAdoptionMediator;
use crate::workflows::adoption::notifier::ApplicationObserver;
use crate::workflows::adoption::repository::InMemoryAdoptionRepository;

pub(super) const SHELTER: &str = "happy-paws";
pub(super) const PET: &str = "rex";

pub(super) fn shelter_id() -> ShelterId {
    ShelterId(SHELTER.to_string())
}

pub(super) fn pet_id() -> PetId {
    PetId(PET.to_string())
}

pub(super) fn adopter_id(username: &str) -> AdopterId {
    AdopterId(username.to_string())
}

/// Q1 Yes/No preferring Yes, Q2 House/Apartment preferring House.
pub(super) fn yard_form() -> Form {
    let mut form = Form::new("yard");
    form.add_question("Do you want a dog", ["Yes", "No"], "Yes")
        .expect("valid question");
    form.add_question(
        "Do you live in a house or apartment?",
        ["House", "Apartment"],
        "House",
    )
    .expect("valid question");
    form
}

pub(super) fn rex_with_yard_form() -> Pet {
    let mut pet = Pet::new(PET, shelter_id(), "Dog");
    pet.assign_form(yard_form());
    pet
}

pub(super) type TestMediator = ConcreteAdoptionMediator<InMemoryAdoptionRepository, MemoryFeedback>;

pub(super) fn build_mediator() -> (
    TestMediator,
    Arc<InMemoryAdoptionRepository>,
    Arc<MemoryFeedback>,
) {
    let repository = Arc::new(InMemoryAdoptionRepository::default());
    let feedback = Arc::new(MemoryFeedback::default());
    let mediator = mediator_with(repository.clone(), feedback.clone());
    (mediator, repository, feedback)
}

/// Mediator with the happy-paws shelter, rex, and adopters bob, alice and carol registered.
pub(super) fn mediator_with<F: FeedbackSender + 'static>(
    repository: Arc<InMemoryAdoptionRepository>,
    feedback: Arc<F>,
) -> ConcreteAdoptionMediator<InMemoryAdoptionRepository, F> {
    let mediator = ConcreteAdoptionMediator::new(repository, feedback);

    mediator
        .register_shelter(Shelter::new(SHELTER, "Happy Paws Shelter").with_pet_type("Dog"))
        .expect("shelter registers");
    mediator
        .register_pet(rex_with_yard_form())
        .expect("pet registers");
    for (username, name) in [("bob", "Bob"), ("alice", "Alice"), ("carol", "Carol")] {
        mediator
            .register_adopter(Adopter::new(username, name))
            .expect("adopter registers");
    }

    mediator
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct DeliveredFeedback {
    pub(super) adopter: AdopterId,
    pub(super) pet: PetId,
    pub(super) text: String,
}

#[derive(Default)]
pub(super) struct MemoryFeedback {
    delivered: Mutex<Vec<DeliveredFeedback>>,
}

impl MemoryFeedback {
    pub(super) fn delivered(&self) -> Vec<DeliveredFeedback> {
        self.delivered.lock().expect("feedback mutex poisoned").clone()
    }
}

impl FeedbackSender for MemoryFeedback {
    fn send_feedback(
        &self,
        adopter: &AdopterId,
        pet: &PetId,
        feedback: &str,
    ) -> Result<(), FeedbackError> {
        self.delivered
            .lock()
            .expect("feedback mutex poisoned")
            .push(DeliveredFeedback {
                adopter: adopter.clone(),
                pet: pet.clone(),
                text: feedback.to_string(),
            });
        Ok(())
    }
}

/// Delivers to memory except for one attempt, which fails.
pub(super) struct InterruptedFeedback {
    failing_attempt: usize,
    attempts: AtomicUsize,
    pub(super) inner: MemoryFeedback,
}

impl InterruptedFeedback {
    pub(super) fn failing_on(attempt: usize) -> Self {
        Self {
            failing_attempt: attempt,
            attempts: AtomicUsize::new(0),
            inner: MemoryFeedback::default(),
        }
    }
}

impl FeedbackSender for InterruptedFeedback {
    fn send_feedback(
        &self,
        adopter: &AdopterId,
        pet: &PetId,
        feedback: &str,
    ) -> Result<(), FeedbackError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt == self.failing_attempt {
            return Err(FeedbackError::Unavailable("mail relay offline".to_string()));
        }
        self.inner.send_feedback(adopter, pet, feedback)
    }
}

pub(super) struct UnavailableFeedback;

impl FeedbackSender for UnavailableFeedback {
    fn send_feedback(
        &self,
        _adopter: &AdopterId,
        _pet: &PetId,
        _feedback: &str,
    ) -> Result<(), FeedbackError> {
        Err(FeedbackError::Unavailable("mail relay offline".to_string()))
    }
}

#[derive(Default)]
pub(super) struct RecordingObserver {
    pub(super) label: &'static str,
    pub(super) log: Arc<Mutex<Vec<String>>>,
}

impl ApplicationObserver for RecordingObserver {
    fn update(&self, message: &str) {
        self.log
            .lock()
            .expect("observer mutex poisoned")
            .push(format!("{}:{}", self.label, message));
    }
}
