//! In-memory user/channel directory used to resolve mentions.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chat_argparse::{EntityResolver, NotFound};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    User,
    Channel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub id: String,
    pub name: String,
    pub kind: EntityKind,
}

impl Entity {
    /// Chat mention syntax for this entity.
    pub fn mention(&self) -> String {
        match self.kind {
            EntityKind::User => format!("<@{}>", self.id),
            EntityKind::Channel => format!("<#{}>", self.id),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Record {
    id: String,
    name: String,
}

/// On-disk form: `{"users": [{"id", "name"}], "channels": [...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct DirectoryFile {
    #[serde(default)]
    users: Vec<Record>,
    #[serde(default)]
    channels: Vec<Record>,
}

#[derive(Debug, Clone, Default)]
pub struct Directory {
    entities: HashMap<String, Entity>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read directory: {}", path.display()))?;
        Self::from_json(&contents)
            .with_context(|| format!("failed to parse directory JSON: {}", path.display()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let file: DirectoryFile = serde_json::from_str(json)?;
        let mut dir = Self::new();
        for r in file.users {
            dir.insert(r.id, r.name, EntityKind::User);
        }
        for r in file.channels {
            dir.insert(r.id, r.name, EntityKind::Channel);
        }
        Ok(dir)
    }

    pub fn insert(&mut self, id: impl Into<String>, name: impl Into<String>, kind: EntityKind) {
        let id = id.into();
        let entity = Entity {
            id: id.clone(),
            name: name.into(),
            kind,
        };
        self.entities.insert(id, entity);
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }
}

impl EntityResolver for Directory {
    type Entity = Entity;

    fn resolve(&self, id: &str) -> Result<Entity, NotFound> {
        self.entities.get(id).cloned().ok_or_else(|| NotFound::new(id))
    }
}
