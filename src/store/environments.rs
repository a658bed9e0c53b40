//! Named variable sets. Stored and served as-is; nothing interpolates them.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::resource::Resource;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    pub id: Uuid,
    pub name: String,
    pub variables: IndexMap<String, String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateEnvironment {
    pub name: String,
    #[serde(default)]
    pub variables: IndexMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateEnvironment {
    pub name: Option<String>,
    pub variables: Option<IndexMap<String, String>>,
}

impl Resource for Environment {
    type Create = CreateEnvironment;
    type Update = UpdateEnvironment;
    const KIND: &'static str = "Environment";

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn create(input: CreateEnvironment) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            variables: input.variables,
            created_at: Utc::now(),
        }
    }

    fn apply(&mut self, update: UpdateEnvironment) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(variables) = update.variables {
            self.variables = variables;
        }
    }
}
