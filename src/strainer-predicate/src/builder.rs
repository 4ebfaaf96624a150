//! Lowering from the bound AST to the predicate tree
//!
//! The AST already carries resolved paths and typed literals, so this pass
//! is total: it maps filter-facing names to physical names, marks guarded
//! steps where nullable nested objects may be absent, and fixes each leaf's
//! missing-value result.

use log::debug;

use strainer_parser::{ComparisonNode, Node};
use strainer_schema::SegmentKind;
use strainer_shared::{Literal, OperatorKind};

use crate::predicate::{Access, AccessStep, Comparison, Predicate};

/// Lower a bound AST into a backend-neutral predicate tree
pub fn build(node: &Node) -> Predicate {
    let predicate = lower(node);
    debug!("built predicate with {} comparisons", node.comparison_count());
    predicate
}

fn lower(node: &Node) -> Predicate {
    match node {
        Node::Comparison(cmp) => Predicate::Comparison(lower_comparison(cmp)),
        Node::And(l, r) => Predicate::And(Box::new(lower(l)), Box::new(lower(r))),
        Node::Or(l, r) => Predicate::Or(Box::new(lower(l)), Box::new(lower(r))),
        Node::Not(inner) => Predicate::Not(Box::new(lower(inner))),
    }
}

fn lower_comparison(cmp: &ComparisonNode) -> Comparison {
    let steps = cmp
        .path
        .resolved
        .segments
        .iter()
        .map(|segment| match segment.kind {
            SegmentKind::Count => AccessStep::Count,
            _ => AccessStep::Field {
                name: segment.physical.clone(),
                guarded: segment.nullable,
            },
        })
        .collect();

    let case_insensitive = cmp.operator.case_insensitive
        || (cmp.path.resolved.case_insensitive_default
            && cmp.operator.kind.supports_case_insensitive());

    // An is-null test holds through an absent parent; every other
    // comparison fails when there is nothing to compare.
    let when_missing = cmp.operator.kind == OperatorKind::Equals
        && matches!(cmp.value, Literal::Null);

    Comparison {
        access: Access { steps },
        op: cmp.operator.kind,
        case_insensitive,
        value: cmp.value.clone(),
        when_missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use strainer_parser::FilterParser;
    use strainer_schema::{Property, Schema};
    use strainer_shared::TypeTag;

    fn schema() -> Schema {
        let nest = Schema::builder("Nest")
            .property(Property::scalar("Name", TypeTag::String).nullable())
            .build();
        Schema::builder("Doc")
            .property(Property::scalar("Title", TypeTag::String).mapped_to("title_col"))
            .property(
                Property::scalar("Label", TypeTag::String).case_insensitive(),
            )
            .property(Property::nested("Nest", nest).nullable())
            .property(Property::collection("Tags", TypeTag::String).nullable())
            .build()
    }

    fn build_one(input: &str) -> Comparison {
        let schema = schema();
        let node = FilterParser::new(&schema).parse(input).unwrap();
        match build(&node) {
            Predicate::Comparison(cmp) => cmp,
            other => panic!("expected a comparison, got {:?}", other),
        }
    }

    #[test]
    fn test_physical_names_flow_into_access() {
        let cmp = build_one(r#"Title == "x""#);
        assert_eq!(
            cmp.access.steps,
            vec![AccessStep::Field {
                name: "title_col".to_string(),
                guarded: false,
            }]
        );
    }

    #[test]
    fn test_nullable_nested_step_is_guarded() {
        let cmp = build_one(r#"Nest.Name == "x""#);
        assert!(matches!(
            cmp.access.steps[0],
            AccessStep::Field { guarded: true, .. }
        ));
        assert!(cmp.access.has_guarded_parent());
        assert!(!cmp.when_missing);
    }

    #[test]
    fn test_is_null_test_holds_through_missing_parent() {
        let cmp = build_one(r#"Nest.Name == null"#);
        assert!(cmp.when_missing);
        let cmp = build_one(r#"Nest.Name != null"#);
        assert!(!cmp.when_missing);
    }

    #[test]
    fn test_count_lowered_to_count_step() {
        let cmp = build_one(r#"Tags #> 0"#);
        assert_eq!(cmp.access.steps.len(), 2);
        assert_eq!(cmp.access.steps[1], AccessStep::Count);
        assert_eq!(cmp.op, OperatorKind::CountGreaterThan);
    }

    #[test]
    fn test_case_insensitivity_from_flag_or_default() {
        assert!(!build_one(r#"Title @= "x""#).case_insensitive);
        assert!(build_one(r#"Title @=* "x""#).case_insensitive);
        // Descriptor default applies without the `*` suffix
        assert!(build_one(r#"Label @= "x""#).case_insensitive);
    }

    #[test]
    fn test_same_input_builds_equal_predicates() {
        let schema = schema();
        let parser = FilterParser::new(&schema);
        let input = r#"(Title == "a" || Tags #> 0) && !(Label @= "b")"#;
        let first = build(&parser.parse(input).unwrap());
        let second = build(&parser.parse(input).unwrap());
        assert_eq!(first, second);
    }
}
