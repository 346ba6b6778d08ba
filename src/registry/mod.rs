//! Live participant registry
//!
//! `ParticipantRegistry` is the seam to the service that knows which miners
//! are currently online. `InMemoryRegistry` serves a fixed listing, loaded
//! from a JSON snapshot or built directly in tests.

use crate::errors::{AppError, AppResult};
use crate::types::Participant;
use async_trait::async_trait;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

#[async_trait]
pub trait ParticipantRegistry: Send + Sync {
    /// Every participant currently known to the registry
    async fn list_participants(&self) -> AppResult<Vec<Participant>>;

    async fn participant_by_address(&self, address: &str) -> AppResult<Option<Participant>>;
}

/// Registry over a fixed listing, indexed by address once at construction.
/// Each address appears once in the listing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistry {
    participants: Vec<Participant>,
    by_address: HashMap<String, usize>,
}

impl InMemoryRegistry {
    /// A repeated address keeps the listing slot of its first appearance and
    /// the data of its last record
    pub fn new(participants: Vec<Participant>) -> Self {
        let mut listing: Vec<Participant> = Vec::with_capacity(participants.len());
        let mut by_address: HashMap<String, usize> = HashMap::new();

        for participant in participants {
            match by_address.entry(participant.address.clone()) {
                Entry::Occupied(slot) => {
                    warn!(
                        address = %participant.address,
                        "Duplicate registry entry, keeping the later record"
                    );
                    listing[*slot.get()] = participant;
                }
                Entry::Vacant(slot) => {
                    slot.insert(listing.len());
                    listing.push(participant);
                }
            }
        }

        Self {
            participants: listing,
            by_address,
        }
    }

    /// Load a JSON array of participants
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::Registry(format!("cannot read snapshot {}: {}", path.display(), e))
        })?;
        let participants: Vec<Participant> = serde_json::from_str(&raw)?;
        info!(
            "Loaded {} participants from registry snapshot {}",
            participants.len(),
            path.display()
        );
        Ok(Self::new(participants))
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}

#[async_trait]
impl ParticipantRegistry for InMemoryRegistry {
    async fn list_participants(&self) -> AppResult<Vec<Participant>> {
        Ok(self.participants.clone())
    }

    async fn participant_by_address(&self, address: &str) -> AppResult<Option<Participant>> {
        Ok(self
            .by_address
            .get(address)
            .and_then(|idx| self.participants.get(*idx))
            .cloned())
    }
}
