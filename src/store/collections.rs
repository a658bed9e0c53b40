//! Named collections of saved requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::execute::draft::RequestDraft;
use crate::store::resource::Resource;

/// A request saved inside a collection, disabled entries included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedRequest {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub draft: RequestDraft,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub requests: Vec<SavedRequest>,
    pub created_at: DateTime<Utc>,
}

impl Collection {
    pub fn find_request(&self, name: &str) -> Option<&SavedRequest> {
        self.requests.iter().find(|r| r.name == name)
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateCollection {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requests: Vec<SavedRequest>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateCollection {
    pub name: Option<String>,
    pub description: Option<String>,
    pub requests: Option<Vec<SavedRequest>>,
}

impl Resource for Collection {
    type Create = CreateCollection;
    type Update = UpdateCollection;
    const KIND: &'static str = "Collection";

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn create(input: CreateCollection) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            description: input.description,
            requests: input.requests,
            created_at: Utc::now(),
        }
    }

    fn apply(&mut self, update: UpdateCollection) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(requests) = update.requests {
            self.requests = requests;
        }
    }
}
