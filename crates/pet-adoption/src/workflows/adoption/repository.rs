use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use super::application::Application;
use super::domain::{Adopter, AdopterId, ApplicationId, Pet, PetId, Shelter, ShelterId};

/// Storage abstraction for pets, users, and applications.
///
/// Records are handed out as copies; callers mutate a copy and write it back with `update_*`.
pub trait AdoptionRepository: Send + Sync {
    fn insert_adopter(&self, adopter: Adopter) -> Result<(), RepositoryError>;
    fn insert_shelter(&self, shelter: Shelter) -> Result<(), RepositoryError>;
    fn adopter(&self, id: &AdopterId) -> Result<Option<Adopter>, RepositoryError>;
    fn shelter(&self, id: &ShelterId) -> Result<Option<Shelter>, RepositoryError>;

    fn insert_pet(&self, pet: Pet) -> Result<(), RepositoryError>;
    fn update_pet(&self, pet: Pet) -> Result<(), RepositoryError>;
    fn pet(&self, id: &PetId) -> Result<Option<Pet>, RepositoryError>;
    fn pets_for_shelter(&self, shelter: &ShelterId) -> Result<Vec<Pet>, RepositoryError>;

    fn insert_application(&self, application: Application)
        -> Result<Application, RepositoryError>;
    fn update_application(&self, application: Application) -> Result<(), RepositoryError>;
    fn application(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError>;
    /// Applications for a pet in submission order.
    fn applications_for_pet(&self, pet: &PetId) -> Result<Vec<Application>, RepositoryError>;
    fn applications_for_applicant(
        &self,
        applicant: &AdopterId,
    ) -> Result<Vec<Application>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists: {0}")]
    Conflict(String),
    #[error("record not found: {0}")]
    NotFound(String),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Default)]
struct RegistryState {
    adopters: BTreeMap<AdopterId, Adopter>,
    shelters: BTreeMap<ShelterId, Shelter>,
    pets: BTreeMap<PetId, Pet>,
    applications: Vec<Application>,
}

impl RegistryState {
    fn username_taken(&self, username: &str) -> bool {
        self.adopters.contains_key(&AdopterId(username.to_string()))
            || self.shelters.contains_key(&ShelterId(username.to_string()))
    }
}

/// Process-lifetime registry. Created at startup and dropped at exit; nothing is persisted.
#[derive(Debug, Default)]
pub struct InMemoryAdoptionRepository {
    state: Mutex<RegistryState>,
}

impl InMemoryAdoptionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, RegistryState>, RepositoryError> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::Unavailable("registry mutex poisoned".to_string()))
    }
}

impl AdoptionRepository for InMemoryAdoptionRepository {
    fn insert_adopter(&self, adopter: Adopter) -> Result<(), RepositoryError> {
        let mut state = self.state()?;
        if state.username_taken(&adopter.username.0) {
            return Err(RepositoryError::Conflict(format!(
                "username {}",
                adopter.username
            )));
        }
        state.adopters.insert(adopter.username.clone(), adopter);
        Ok(())
    }

    fn insert_shelter(&self, shelter: Shelter) -> Result<(), RepositoryError> {
        let mut state = self.state()?;
        if state.username_taken(&shelter.username.0) {
            return Err(RepositoryError::Conflict(format!(
                "username {}",
                shelter.username
            )));
        }
        state.shelters.insert(shelter.username.clone(), shelter);
        Ok(())
    }

    fn adopter(&self, id: &AdopterId) -> Result<Option<Adopter>, RepositoryError> {
        Ok(self.state()?.adopters.get(id).cloned())
    }

    fn shelter(&self, id: &ShelterId) -> Result<Option<Shelter>, RepositoryError> {
        Ok(self.state()?.shelters.get(id).cloned())
    }

    fn insert_pet(&self, pet: Pet) -> Result<(), RepositoryError> {
        let mut state = self.state()?;
        if state.pets.contains_key(pet.id()) {
            return Err(RepositoryError::Conflict(format!("pet {}", pet.id())));
        }
        state.pets.insert(pet.id().clone(), pet);
        Ok(())
    }

    fn update_pet(&self, pet: Pet) -> Result<(), RepositoryError> {
        let mut state = self.state()?;
        match state.pets.get_mut(pet.id()) {
            Some(slot) => {
                *slot = pet;
                Ok(())
            }
            None => Err(RepositoryError::NotFound(format!("pet {}", pet.id()))),
        }
    }

    fn pet(&self, id: &PetId) -> Result<Option<Pet>, RepositoryError> {
        Ok(self.state()?.pets.get(id).cloned())
    }

    fn pets_for_shelter(&self, shelter: &ShelterId) -> Result<Vec<Pet>, RepositoryError> {
        Ok(self
            .state()?
            .pets
            .values()
            .filter(|pet| pet.shelter() == shelter)
            .cloned()
            .collect())
    }

    fn insert_application(
        &self,
        application: Application,
    ) -> Result<Application, RepositoryError> {
        let mut state = self.state()?;
        if state
            .applications
            .iter()
            .any(|existing| existing.id() == application.id())
        {
            return Err(RepositoryError::Conflict(format!(
                "application {}",
                application.id()
            )));
        }
        state.applications.push(application.clone());
        Ok(application)
    }

    fn update_application(&self, application: Application) -> Result<(), RepositoryError> {
        let mut state = self.state()?;
        match state
            .applications
            .iter_mut()
            .find(|existing| existing.id() == application.id())
        {
            Some(slot) => {
                *slot = application;
                Ok(())
            }
            None => Err(RepositoryError::NotFound(format!(
                "application {}",
                application.id()
            ))),
        }
    }

    fn application(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        Ok(self
            .state()?
            .applications
            .iter()
            .find(|application| application.id() == id)
            .cloned())
    }

    fn applications_for_pet(&self, pet: &PetId) -> Result<Vec<Application>, RepositoryError> {
        Ok(self
            .state()?
            .applications
            .iter()
            .filter(|application| application.pet() == pet)
            .cloned()
            .collect())
    }

    fn applications_for_applicant(
        &self,
        applicant: &AdopterId,
    ) -> Result<Vec<Application>, RepositoryError> {
        Ok(self
            .state()?
            .applications
            .iter()
            .filter(|application| application.applicant() == applicant)
            .cloned()
            .collect())
    }
}
