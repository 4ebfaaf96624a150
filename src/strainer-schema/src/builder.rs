//! Build-once configuration surface for schemas
//!
//! Operator allow-lists, aliasing and case-sensitivity defaults are supplied
//! here, per property, and frozen when `build` publishes the schema.

use indexmap::IndexMap;
use log::debug;

use strainer_shared::{ops, OperatorKind, TypeTag};

use crate::schema::{CollectionElement, PropertyDescriptor, PropertyKind, Schema};

/// A property under construction
#[derive(Debug, Clone)]
pub struct Property {
    name: String,
    physical: Option<String>,
    kind: PropertyKind,
    nullable: bool,
    allowed: Option<Vec<OperatorKind>>,
    case_insensitive_default: bool,
}

impl Property {
    fn new(name: impl Into<String>, kind: PropertyKind) -> Self {
        Self {
            name: name.into(),
            physical: None,
            kind,
            nullable: false,
            allowed: None,
            case_insensitive_default: false,
        }
    }

    /// A scalar property of the given runtime type
    pub fn scalar(name: impl Into<String>, tag: TypeTag) -> Self {
        Self::new(name, PropertyKind::Scalar(tag))
    }

    /// A nested-object property with its own schema
    pub fn nested(name: impl Into<String>, schema: Schema) -> Self {
        Self::new(name, PropertyKind::Nested(schema))
    }

    /// A collection of scalars
    pub fn collection(name: impl Into<String>, element: TypeTag) -> Self {
        Self::new(
            name,
            PropertyKind::Collection(CollectionElement::Scalar(element)),
        )
    }

    /// A collection of nested objects
    pub fn nested_collection(name: impl Into<String>, schema: Schema) -> Self {
        Self::new(
            name,
            PropertyKind::Collection(CollectionElement::Nested(schema)),
        )
    }

    /// Mark the stored value as possibly absent
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Remap this filter-facing name to a different backend name
    pub fn mapped_to(mut self, physical: impl Into<String>) -> Self {
        self.physical = Some(physical.into());
        self
    }

    /// Replace the default operator allow-list
    pub fn operators(mut self, ops: impl IntoIterator<Item = OperatorKind>) -> Self {
        self.allowed = Some(ops.into_iter().collect());
        self
    }

    /// Default string comparisons on this property to case-insensitive
    pub fn case_insensitive(mut self) -> Self {
        self.case_insensitive_default = true;
        self
    }

    fn default_allowed(kind: &PropertyKind) -> Vec<OperatorKind> {
        use OperatorKind::*;
        let counts = [
            CountEquals,
            CountNotEquals,
            CountGreaterThan,
            CountGreaterThanOrEqual,
            CountLessThan,
            CountLessThanOrEqual,
        ];
        match kind {
            PropertyKind::Scalar(tag) => ops::default_operators(tag),
            // Nested objects compare against null only
            PropertyKind::Nested(_) => vec![Equals, NotEquals],
            PropertyKind::Collection(CollectionElement::Scalar(_)) => {
                let mut allowed = vec![Has, DoesNotHave];
                allowed.extend(counts);
                allowed
            }
            PropertyKind::Collection(CollectionElement::Nested(_)) => counts.to_vec(),
        }
    }

    fn into_descriptor(self) -> PropertyDescriptor {
        let allowed = self
            .allowed
            .unwrap_or_else(|| Self::default_allowed(&self.kind));
        PropertyDescriptor {
            name: self.name,
            physical: self.physical,
            kind: self.kind,
            nullable: self.nullable,
            allowed,
            case_insensitive_default: self.case_insensitive_default,
        }
    }
}

/// Builder for a `Schema`
#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    properties: IndexMap<String, PropertyDescriptor>,
}

impl SchemaBuilder {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: IndexMap::new(),
        }
    }

    /// Add a property; a repeated name replaces the earlier definition
    pub fn property(mut self, property: Property) -> Self {
        let descriptor = property.into_descriptor();
        self.properties.insert(descriptor.name.clone(), descriptor);
        self
    }

    /// Freeze the configuration and publish the schema
    pub fn build(self) -> Schema {
        debug!(
            "built schema `{}` with {} properties",
            self.name,
            self.properties.len()
        );
        Schema::from_parts(self.name, self.properties)
    }
}
