//! Documentation strings attached to completion candidates.

use crate::syntax::{DeclId, DeclarationKind, SyntaxTree, UnionVariant};

/// Render the hint for a declaration, or for one of its union variants.
///
/// The result is markdown: the signature in an `elm` code fence, followed by
/// the doc comment. Returns an empty string when there is nothing to show.
pub fn format_hint(tree: &SyntaxTree, decl: DeclId, variant: Option<usize>) -> String {
    let Some(declaration) = tree.declaration(decl) else {
        return String::new();
    };

    let signature = match (variant, &declaration.kind) {
        (
            Some(index),
            DeclarationKind::Union {
                name,
                params,
                variants,
            },
        ) => match variants.get(index) {
            Some(variant) => Some(constructor_signature(variant, name, params)),
            None => return String::new(),
        },
        (Some(_), _) => return String::new(),
        (None, _) => declaration.signature.clone(),
    };

    render(signature.as_deref(), declaration.doc.as_deref())
}

/// `Just : a -> Maybe a`
fn constructor_signature(variant: &UnionVariant, parent: &str, params: &[String]) -> String {
    let mut result_type = parent.to_string();
    for param in params {
        result_type.push(' ');
        result_type.push_str(param);
    }

    let mut parts: Vec<&str> = variant.arguments.iter().map(String::as_str).collect();
    parts.push(&result_type);
    format!("{} : {}", variant.name, parts.join(" -> "))
}

fn render(signature: Option<&str>, doc: Option<&str>) -> String {
    let signature = signature.map(str::trim).filter(|s| !s.is_empty());
    let doc = doc.map(str::trim).filter(|d| !d.is_empty());
    match (signature, doc) {
        (Some(signature), Some(doc)) => format!("```elm\n{signature}\n```\n\n---\n\n{doc}"),
        (Some(signature), None) => format!("```elm\n{signature}\n```"),
        (None, Some(doc)) => doc.to_string(),
        (None, None) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{ExposingSpec, TreeBuilder};

    fn tree() -> SyntaxTree {
        TreeBuilder::module("Maybe", ExposingSpec::All)
            .value(
                "withDefault",
                Some("withDefault : a -> Maybe a -> a"),
                Some("Provide a default value."),
            )
            .value("bare", None, None)
            .union_with_params(
                "Maybe",
                &["a"],
                &[("Just", &["a"]), ("Nothing", &[])],
                Some("Represent values that may or may not exist."),
            )
            .value("undocumented", None, Some("Only a doc comment."))
            .build()
    }

    #[test]
    fn signature_and_doc_are_separated_by_rule() {
        assert_eq!(
            format_hint(&tree(), DeclId(0), None),
            "```elm\nwithDefault : a -> Maybe a -> a\n```\n\n---\n\nProvide a default value."
        );
    }

    #[test]
    fn nothing_to_show_is_empty() {
        assert_eq!(format_hint(&tree(), DeclId(1), None), "");
        assert_eq!(format_hint(&tree(), DeclId(42), None), "");
        assert_eq!(format_hint(&tree(), DeclId(0), Some(0)), "");
    }

    #[test]
    fn doc_without_signature_is_plain() {
        assert_eq!(format_hint(&tree(), DeclId(3), None), "Only a doc comment.");
    }

    #[test]
    fn constructor_hint_derives_signature_from_parent() {
        assert_eq!(
            format_hint(&tree(), DeclId(2), Some(0)),
            "```elm\nJust : a -> Maybe a\n```\n\n---\n\nRepresent values that may or may not exist."
        );
        assert_eq!(
            format_hint(&tree(), DeclId(2), Some(1)),
            "```elm\nNothing : Maybe a\n```\n\n---\n\nRepresent values that may or may not exist."
        );
        assert_eq!(format_hint(&tree(), DeclId(2), Some(9)), "");
    }
}
