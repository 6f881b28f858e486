//! Resolution of parsed references into live entities.
//!
//! Parsing only yields identifiers. Turning an identifier into a user or a
//! channel is the job of an [`EntityResolver`] the caller passes in.

use indexmap::IndexMap;
use thiserror::Error;

use crate::error::ArgError;
use crate::result::ParseResult;
use crate::schema::Schema;
use crate::value::ValueType;

/// The resolver has no entity with this identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("entity not found: {id}")]
pub struct NotFound {
    pub id: String,
}

impl NotFound {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Looks up an entity (user, channel, role) by its bare identifier.
pub trait EntityResolver {
    type Entity;

    fn resolve(&self, id: &str) -> Result<Self::Entity, NotFound>;
}

/// A [`ParseResult`] together with the entities behind its references.
#[derive(Debug, Clone)]
pub struct Resolved<E> {
    pub result: ParseResult,
    /// Keyed by argument or flag name.
    pub entities: IndexMap<String, E>,
}

impl<E> Resolved<E> {
    pub fn entity(&self, name: &str) -> Option<&E> {
        self.entities.get(name)
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Parse `raw`, then resolve every reference that parsed successfully.
///
/// Lookups happen in schema order. A missing entity becomes an
/// [`ArgError::EntityNotFound`] in the result rather than an early return.
pub fn parse_with_resolver<R: EntityResolver>(
    raw: &str,
    schema: &Schema,
    resolver: &R,
) -> Resolved<R::Entity> {
    let mut result = crate::parse(raw, schema);
    let mut entities = IndexMap::new();

    for def in schema.iter().filter(|d| d.value_type == ValueType::Reference) {
        let Some(id) = result.get_reference(&def.name).map(str::to_string) else {
            continue;
        };
        match resolver.resolve(&id) {
            Ok(entity) => {
                entities.insert(def.name.clone(), entity);
            }
            Err(NotFound { id }) => {
                tracing::debug!(arg = %def.name, %id, "reference did not resolve");
                result.errors.push(ArgError::EntityNotFound {
                    name: def.name.clone(),
                    id,
                });
            }
        }
    }

    Resolved { result, entities }
}
