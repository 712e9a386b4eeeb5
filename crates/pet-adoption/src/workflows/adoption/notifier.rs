use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use tracing::info;

use super::domain::{AdopterId, PetId, ShelterId};

/// Subscriber to an application's lifecycle events.
///
/// Observers report what happened; they never touch pets or applications.
pub trait ApplicationObserver: Send + Sync {
    fn update(&self, message: &str);
}

/// Ordered subscriber list scoped to a single application.
#[derive(Default)]
pub struct ApplicationNotifier {
    observers: Vec<Arc<dyn ApplicationObserver>>,
}

impl ApplicationNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, observer: Arc<dyn ApplicationObserver>) {
        self.observers.push(observer);
    }

    /// Remove a previously attached observer. Returns `false` when it was not attached.
    pub fn detach(&mut self, observer: &Arc<dyn ApplicationObserver>) -> bool {
        match self
            .observers
            .iter()
            .position(|attached| Arc::ptr_eq(attached, observer))
        {
            Some(index) => {
                self.observers.remove(index);
                true
            }
            None => false,
        }
    }

    /// Deliver to every attached observer in attachment order. Fire-and-forget.
    pub fn notify(&self, message: &str) {
        for observer in &self.observers {
            observer.update(message);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

/// A delivered notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub recipient: String,
    pub message: String,
}

/// Shared, append-only record of delivered notifications.
#[derive(Debug, Clone, Default)]
pub struct Inbox {
    delivered: Arc<Mutex<Vec<Notification>>>,
}

impl Inbox {
    pub fn deliver(&self, recipient: impl Into<String>, message: impl Into<String>) {
        let notification = Notification {
            recipient: recipient.into(),
            message: message.into(),
        };
        info!(
            recipient = %notification.recipient,
            message = %notification.message,
            "notification delivered"
        );
        self.lock().push(notification);
    }

    pub fn all(&self) -> Vec<Notification> {
        self.lock().clone()
    }

    pub fn for_recipient(&self, recipient: &str) -> Vec<Notification> {
        self.lock()
            .iter()
            .filter(|notification| notification.recipient == recipient)
            .cloned()
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Notification>> {
        self.delivered
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Keeps an applicant informed about their own application.
pub struct AdopterObserver {
    adopter: AdopterId,
    pet: PetId,
    inbox: Inbox,
}

impl AdopterObserver {
    pub fn new(adopter: AdopterId, pet: PetId, inbox: Inbox) -> Self {
        Self {
            adopter,
            pet,
            inbox,
        }
    }
}

impl ApplicationObserver for AdopterObserver {
    fn update(&self, message: &str) {
        self.inbox.deliver(
            self.adopter.0.clone(),
            format!("Your application to adopt {}: {}", self.pet, message),
        );
    }
}

/// Tells a shelter about new applications for one of its pets.
pub struct ShelterObserver {
    shelter: ShelterId,
    pet: PetId,
    inbox: Inbox,
}

impl ShelterObserver {
    pub fn new(shelter: ShelterId, pet: PetId, inbox: Inbox) -> Self {
        Self {
            shelter,
            pet,
            inbox,
        }
    }
}

impl ApplicationObserver for ShelterObserver {
    fn update(&self, message: &str) {
        self.inbox.deliver(
            self.shelter.0.clone(),
            format!("New application to adopt {}: {}", self.pet, message),
        );
    }
}
