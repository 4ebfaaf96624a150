//! # strainer
//!
//! A filter-expression compiler: human-writable boolean filter strings like
//! `Title @=* "waffle" && Age > 30 || Id == "..."` compile into typed,
//! composable predicate trees against a known document schema.
//!
//! The pipeline runs in one pass per call: lex, bind paths against the
//! schema, parse with precedence, coerce literals to their bound types, and
//! lower to a backend-neutral [`Predicate`]. Any failure anywhere rejects
//! the whole call with a [`FilterError`]; there are no partial predicates.
//!
//! # Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use strainer::{compile, matches, Property, Schema, TypeTag};
//!
//! let schema = Schema::builder("Recipe")
//!     .property(Property::scalar("Title", TypeTag::String))
//!     .property(Property::scalar("Rating", TypeTag::Decimal))
//!     .build();
//!
//! let predicate = compile(&schema, r#"Title @=* "waffle" && Rating >= 4.0"#)?;
//!
//! assert!(matches(&predicate, &json!({ "Title": "Waffle Stack", "Rating": 4.5 })));
//! assert!(!matches(&predicate, &json!({ "Title": "Pancakes", "Rating": 5.0 })));
//! # Ok::<(), strainer::FilterError>(())
//! ```
//!
//! The heavy lifting lives in the member crates; this facade re-exports the
//! public surface:
//!
//! - `strainer-shared`: operators, typed values, the error type
//! - `strainer-schema`: schema configuration and path binding
//! - `strainer-parser`: lexer, parser, literal coercion
//! - `strainer-predicate`: predicate lowering and in-memory evaluation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::uninlined_format_args
)]

use log::debug;

pub use strainer_parser::{FilterParser, Node};
pub use strainer_predicate::{build, matches, Access, AccessStep, Comparison, Predicate};
pub use strainer_schema::{Property, PropertyDescriptor, Schema, SchemaBuilder};
pub use strainer_shared::{
    EnumDef, FilterError, Literal, Operator, OperatorKind, TypeTag, TypedValue,
};

/// Compile a filter string against a schema into a predicate tree.
///
/// Equivalent to parsing with [`FilterParser`] and lowering with [`build`],
/// as one call.
pub fn compile(schema: &Schema, input: &str) -> Result<Predicate, FilterError> {
    let node = FilterParser::new(schema).parse(input)?;
    debug!(
        "compiled filter against `{}`: {} comparisons",
        schema.name,
        node.comparison_count()
    );
    Ok(build(&node))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document_schema() -> Schema {
        let nest = Schema::builder("NestDocument")
            .property(Property::scalar("Name", TypeTag::String).nullable())
            .property(Property::scalar("Number", TypeTag::Int))
            .build();
        Schema::builder("TestDocument")
            .property(Property::scalar("Id", TypeTag::Guid))
            .property(Property::scalar("Title", TypeTag::String).nullable())
            .property(Property::scalar("Age", TypeTag::Int))
            .property(Property::scalar("Favorite", TypeTag::Bool))
            .property(Property::collection("Tags", TypeTag::String).nullable())
            .property(Property::collection("AdditionalIds", TypeTag::Guid).nullable())
            .property(Property::nested_collection("Items", nest.clone()).nullable())
            .property(Property::nested("SingleNestItem", nest).nullable())
            .build()
    }

    fn compiled(input: &str) -> Predicate {
        compile(&document_schema(), input)
            .unwrap_or_else(|e| panic!("failed to compile `{}`: {}", input, e))
    }

    #[test]
    fn test_simple_equality_end_to_end() {
        let predicate = compiled(r#"Title == "lamb""#);
        assert!(matches(&predicate, &json!({ "Title": "lamb" })));
        assert!(!matches(&predicate, &json!({ "Title": "Lamb" })));
        assert!(!matches(&predicate, &json!({})));
    }

    #[test]
    fn test_list_membership_end_to_end() {
        let id = uuid::Uuid::new_v4();
        let predicate = compiled(&format!(r#"Id ^^ ["{}"]"#, id));
        assert!(matches(&predicate, &json!({ "Id": id.to_string() })));
        assert!(!matches(
            &predicate,
            &json!({ "Id": uuid::Uuid::new_v4().to_string() })
        ));
    }

    #[test]
    fn test_array_element_membership_end_to_end() {
        let wanted = uuid::Uuid::new_v4();
        let other = uuid::Uuid::new_v4();
        let has = compiled(&format!(r#"AdditionalIds ^$ "{}""#, wanted));
        let doc = json!({ "AdditionalIds": [wanted.to_string(), other.to_string()] });
        assert!(matches(&has, &doc));
        assert!(!matches(&has, &json!({ "AdditionalIds": [other.to_string()] })));

        let has_not = compiled(&format!(r#"AdditionalIds !^$ "{}""#, wanted));
        assert!(!matches(&has_not, &doc));
        assert!(matches(&has_not, &json!({})));
    }

    #[test]
    fn test_nested_null_root_end_to_end() {
        let is_null = compiled(r#"SingleNestItem == null"#);
        assert!(matches(&is_null, &json!({})));
        assert!(matches(&is_null, &json!({ "SingleNestItem": null })));
        assert!(!matches(&is_null, &json!({ "SingleNestItem": { "Number": 1 } })));

        let name_set = compiled(r#"SingleNestItem.Name != null"#);
        assert!(!matches(&name_set, &json!({})));
        assert!(matches(
            &name_set,
            &json!({ "SingleNestItem": { "Name": "x", "Number": 1 } })
        ));
    }

    #[test]
    fn test_count_semantics_end_to_end() {
        let predicate = compiled(r#"Tags #> 1"#);
        assert!(matches(&predicate, &json!({ "Tags": ["a", "b"] })));
        assert!(!matches(&predicate, &json!({ "Tags": ["a"] })));
        assert!(!matches(&predicate, &json!({ "Tags": null })));
        assert!(!matches(&predicate, &json!({})));
    }

    #[test]
    fn test_compound_precedence_end_to_end() {
        let predicate =
            compiled(r#"(Tags #> 0 && Items #> 0) || (AdditionalIds #> 1)"#);
        let left = json!({
            "Tags": ["a"],
            "Items": [{ "Name": "x", "Number": 1 }]
        });
        let right = json!({
            "AdditionalIds": [
                uuid::Uuid::new_v4().to_string(),
                uuid::Uuid::new_v4().to_string()
            ]
        });
        assert!(matches(&predicate, &left));
        assert!(matches(&predicate, &right));
        assert!(!matches(&predicate, &json!({ "Tags": ["a"] })));
    }

    #[test]
    fn test_compile_is_deterministic() {
        let schema = document_schema();
        let input = r#"!(Favorite == true) && Age ^^ [1, 2, 3] || Title == null"#;
        assert_eq!(
            compile(&schema, input).unwrap(),
            compile(&schema, input).unwrap()
        );
    }

    #[test]
    fn test_every_failure_is_a_parsing_failure() {
        let schema = document_schema();
        for bad in [
            "",
            r#"Nope == 1"#,
            r#"Age == "thirty""#,
            r#"Id > "550e8400-e29b-41d4-a716-446655440000""#,
            r#"Age == (1"#,
            r#"Title == "unterminated"#,
        ] {
            let err = compile(&schema, bad).unwrap_err();
            assert!(
                err.to_string().starts_with("parsing failure"),
                "`{}` displayed `{}`",
                bad,
                err
            );
        }
    }
}
