//! Schema tables and property-path resolution

use indexmap::IndexMap;

use strainer_shared::{FilterError, OperatorKind, TypeTag};

use crate::builder::SchemaBuilder;

/// What a property holds
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub enum PropertyKind {
    /// A scalar value of the given runtime type
    Scalar(TypeTag),
    /// A nested object with its own schema
    Nested(Schema),
    /// An ordered collection of elements
    Collection(CollectionElement),
}

/// Element type of a collection-valued property
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub enum CollectionElement {
    /// Collection of scalars (supports `Has`/`DoesNotHave` and counts)
    Scalar(TypeTag),
    /// Collection of nested objects (supports counts only)
    Nested(Schema),
}

/// A fully configured property on a schema
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PropertyDescriptor {
    /// Filter-facing name (the alias, when one is configured)
    pub name: String,
    /// Backend name when the filter-facing name is an alias
    pub physical: Option<String>,
    /// What the property holds
    pub kind: PropertyKind,
    /// Whether the stored value may be absent
    pub nullable: bool,
    /// Operators this property accepts
    pub allowed: Vec<OperatorKind>,
    /// Default to case-insensitive string comparisons for this property
    pub case_insensitive_default: bool,
}

impl PropertyDescriptor {
    /// The name the backend sees for this property
    pub fn physical_name(&self) -> &str {
        self.physical.as_deref().unwrap_or(&self.name)
    }

    /// Whether the given operator kind is in the allow-list
    pub fn allows(&self, kind: OperatorKind) -> bool {
        self.allowed.contains(&kind)
    }
}

/// The read-only property table for one entity type
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Schema {
    /// Entity type name, used in error messages and logs
    pub name: String,
    properties: IndexMap<String, PropertyDescriptor>,
}

/// One raw segment of a dotted property path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSegment<'a> {
    /// A named property
    Named(&'a str),
    /// The collection-count pseudo-segment
    Count,
}

/// What a resolved segment turned out to be
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub enum SegmentKind {
    /// Scalar leaf of the given type
    Scalar(TypeTag),
    /// Nested object, traversable by further segments
    Nested,
    /// Collection; only `Count` (or nothing) may follow
    Collection(CollectionElement),
    /// The count pseudo-segment
    Count,
}

/// One segment of a resolved path, carrying what the predicate builder needs
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ResolvedSegment {
    /// Backend name of the property (alias already remapped)
    pub physical: String,
    /// Whether the stored value may be absent
    pub nullable: bool,
    /// What this segment is
    pub kind: SegmentKind,
}

/// A property path resolved against a schema
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ResolvedPath {
    /// Segments in traversal order
    pub segments: Vec<ResolvedSegment>,
    /// Allow-list of the leaf property
    pub allowed: Vec<OperatorKind>,
    /// Case-sensitivity default of the leaf property
    pub case_insensitive_default: bool,
    /// Whether the leaf property is nullable
    pub leaf_nullable: bool,
}

impl ResolvedPath {
    /// The final segment
    pub fn leaf(&self) -> &ResolvedSegment {
        // Resolution rejects empty paths before constructing this
        self.segments.last().expect("resolved path has segments")
    }

    /// True when the path ends in the count pseudo-segment
    pub fn ends_with_count(&self) -> bool {
        matches!(self.leaf().kind, SegmentKind::Count)
    }
}

impl Schema {
    pub(crate) fn from_parts(
        name: String,
        properties: IndexMap<String, PropertyDescriptor>,
    ) -> Self {
        Self { name, properties }
    }

    /// Start building a schema for the named entity type
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    /// Look up a property by its filter-facing name
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.get(name)
    }

    /// Iterate over the properties in declaration order
    pub fn properties(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.properties.values()
    }

    /// Resolve a dotted property path against this schema.
    ///
    /// `path_text` and `offset` locate the path token in the source filter
    /// for error reporting. Fails with `UnknownProperty` when a segment does
    /// not exist and `InvalidPath` when a segment is not traversable (a
    /// property after a scalar leaf, a count after a non-collection).
    pub fn resolve(
        &self,
        segments: &[PathSegment<'_>],
        path_text: &str,
        offset: usize,
    ) -> Result<ResolvedPath, FilterError> {
        if segments.is_empty() {
            return Err(FilterError::InvalidPath {
                path: path_text.to_string(),
                message: "empty property path".to_string(),
                offset,
            });
        }

        let mut resolved = Vec::with_capacity(segments.len());
        let mut current: &Schema = self;
        let mut leaf: Option<&PropertyDescriptor> = None;

        for (i, segment) in segments.iter().enumerate() {
            let last = i + 1 == segments.len();
            match segment {
                PathSegment::Count => {
                    let collection = matches!(
                        resolved.last(),
                        Some(ResolvedSegment {
                            kind: SegmentKind::Collection(_),
                            ..
                        })
                    );
                    if !collection {
                        return Err(FilterError::InvalidPath {
                            path: path_text.to_string(),
                            message: "count applies only to collection properties".to_string(),
                            offset,
                        });
                    }
                    if !last {
                        return Err(FilterError::InvalidPath {
                            path: path_text.to_string(),
                            message: "count must be the final path segment".to_string(),
                            offset,
                        });
                    }
                    resolved.push(ResolvedSegment {
                        physical: String::new(),
                        nullable: false,
                        kind: SegmentKind::Count,
                    });
                }
                PathSegment::Named(name) => {
                    if let Some(prev) = resolved.last() {
                        match prev.kind {
                            SegmentKind::Nested => {}
                            SegmentKind::Scalar(_) => {
                                return Err(FilterError::InvalidPath {
                                    path: path_text.to_string(),
                                    message: format!(
                                        "cannot traverse into scalar segment before `{}`",
                                        name
                                    ),
                                    offset,
                                });
                            }
                            SegmentKind::Collection(_) | SegmentKind::Count => {
                                return Err(FilterError::InvalidPath {
                                    path: path_text.to_string(),
                                    message: format!(
                                        "cannot traverse into collection segment before `{}`",
                                        name
                                    ),
                                    offset,
                                });
                            }
                        }
                    }
                    let Some(descriptor) = current.property(name) else {
                        return Err(FilterError::UnknownProperty {
                            path: path_text.to_string(),
                            offset,
                        });
                    };
                    let kind = match &descriptor.kind {
                        PropertyKind::Scalar(tag) => SegmentKind::Scalar(tag.clone()),
                        PropertyKind::Nested(schema) => {
                            current = schema;
                            SegmentKind::Nested
                        }
                        PropertyKind::Collection(elem) => SegmentKind::Collection(elem.clone()),
                    };
                    resolved.push(ResolvedSegment {
                        physical: descriptor.physical_name().to_string(),
                        nullable: descriptor.nullable,
                        kind,
                    });
                    leaf = Some(descriptor);
                }
            }
        }

        // For `Collection.Count` the governing descriptor is the collection
        let leaf = leaf.expect("path has at least one named segment");
        Ok(ResolvedPath {
            segments: resolved,
            allowed: leaf.allowed.clone(),
            case_insensitive_default: leaf.case_insensitive_default,
            leaf_nullable: leaf.nullable,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Property;
    use pretty_assertions::assert_eq;
    use strainer_shared::EnumDef;

    fn test_schema() -> Schema {
        let nested = Schema::builder("NestedItem")
            .property(Property::scalar("Name", TypeTag::String).nullable())
            .property(Property::scalar("Value", TypeTag::Int))
            .build();
        Schema::builder("TestDocument")
            .property(Property::scalar("Id", TypeTag::Guid))
            .property(Property::scalar("Title", TypeTag::String))
            .property(Property::scalar("Age", TypeTag::Int))
            .property(Property::scalar(
                "BirthMonth",
                TypeTag::Enum(EnumDef::new("BirthMonth", ["January", "February"])),
            ))
            .property(Property::collection("Tags", TypeTag::String))
            .property(Property::nested("SingleNestItem", nested).nullable())
            .build()
    }

    #[test]
    fn test_resolve_top_level_scalar() {
        let schema = test_schema();
        let path = schema
            .resolve(&[PathSegment::Named("Title")], "Title", 0)
            .unwrap();
        assert_eq!(path.segments.len(), 1);
        assert_eq!(path.leaf().kind, SegmentKind::Scalar(TypeTag::String));
        assert_eq!(path.leaf().physical, "Title");
    }

    #[test]
    fn test_resolve_nested_path() {
        let schema = test_schema();
        let path = schema
            .resolve(
                &[PathSegment::Named("SingleNestItem"), PathSegment::Named("Name")],
                "SingleNestItem.Name",
                0,
            )
            .unwrap();
        assert_eq!(path.segments.len(), 2);
        assert_eq!(path.segments[0].kind, SegmentKind::Nested);
        assert!(path.segments[0].nullable);
        assert_eq!(path.leaf().kind, SegmentKind::Scalar(TypeTag::String));
        assert!(path.leaf_nullable);
    }

    #[test]
    fn test_resolve_count_after_collection() {
        let schema = test_schema();
        let path = schema
            .resolve(
                &[PathSegment::Named("Tags"), PathSegment::Count],
                "Tags",
                0,
            )
            .unwrap();
        assert!(path.ends_with_count());
        assert!(path.allowed.contains(&OperatorKind::CountEquals));
    }

    #[test]
    fn test_unknown_property() {
        let schema = test_schema();
        let err = schema
            .resolve(&[PathSegment::Named("Nope")], "Nope", 4)
            .unwrap_err();
        assert_eq!(
            err,
            FilterError::UnknownProperty {
                path: "Nope".into(),
                offset: 4
            }
        );
    }

    #[test]
    fn test_unknown_nested_property() {
        let schema = test_schema();
        let err = schema
            .resolve(
                &[PathSegment::Named("SingleNestItem"), PathSegment::Named("Nope")],
                "SingleNestItem.Nope",
                0,
            )
            .unwrap_err();
        assert!(matches!(err, FilterError::UnknownProperty { .. }));
    }

    #[test]
    fn test_traversal_through_scalar_fails() {
        let schema = test_schema();
        let err = schema
            .resolve(
                &[PathSegment::Named("Title"), PathSegment::Named("Length")],
                "Title.Length",
                0,
            )
            .unwrap_err();
        assert!(matches!(err, FilterError::InvalidPath { .. }));
    }

    #[test]
    fn test_count_after_scalar_fails() {
        let schema = test_schema();
        let err = schema
            .resolve(&[PathSegment::Named("Age"), PathSegment::Count], "Age", 0)
            .unwrap_err();
        assert!(matches!(err, FilterError::InvalidPath { .. }));
    }

    #[test]
    fn test_alias_remaps_physical_name() {
        let schema = Schema::builder("TestDocument")
            .property(Property::scalar("Headline", TypeTag::String).mapped_to("Title"))
            .build();
        let path = schema
            .resolve(&[PathSegment::Named("Headline")], "Headline", 0)
            .unwrap();
        assert_eq!(path.leaf().physical, "Title");
    }
}
