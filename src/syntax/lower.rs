//! Lowering of tree-sitter-elm concrete syntax trees into [`SyntaxTree`].
//!
//! Only the top level of the file is inspected. Nodes that failed to parse
//! are skipped so a broken declaration never hides the rest of the module.

use super::position::node_to_range;
use super::tree::{
    Declaration, DeclarationKind, ExposedItem, ExposedKind, ExposingSpec, Import,
    ModuleDeclaration, SyntaxTree, UnionVariant,
};
use tree_sitter::{Node, Tree};

const DOC_COMMENT_OPEN: &str = "{-|";

/// Convert a tree produced by the Elm grammar into an outline tree.
pub fn lower_tree(tree: &Tree, source: &str) -> SyntaxTree {
    let root = tree.root_node();
    let mut module = None;
    let mut imports = Vec::new();
    let mut declarations = Vec::new();

    let mut pending_doc: Option<String> = None;
    let mut pending_annotation: Option<(String, String)> = None;

    let mut cursor = root.walk();
    for node in root.named_children(&mut cursor) {
        if node.is_error() || node.is_missing() {
            pending_doc = None;
            pending_annotation = None;
            continue;
        }

        match node.kind() {
            "module_declaration" => {
                module = lower_module_declaration(node, source);
                pending_doc = None;
            }
            "import_clause" => {
                if let Some(import) = lower_import(node, source) {
                    imports.push(import);
                }
                pending_doc = None;
            }
            "block_comment" => {
                let text = node_text(node, source);
                if text.starts_with(DOC_COMMENT_OPEN) {
                    pending_doc = Some(strip_doc_comment(text));
                }
            }
            "line_comment" => {}
            "type_annotation" => {
                if let Some(name) = child_text_of_kind(node, "lower_case_identifier", source) {
                    pending_annotation = Some((name.to_string(), node_text(node, source).to_string()));
                }
            }
            kind => {
                let doc = pending_doc.take();
                let annotation = pending_annotation.take();
                if let Some(mut declaration) = lower_declaration(kind, node, source, annotation) {
                    declaration.doc = doc;
                    declarations.push(declaration);
                }
            }
        }
    }

    SyntaxTree::new(module, imports, declarations)
}

fn lower_declaration(
    kind: &str,
    node: Node,
    source: &str,
    annotation: Option<(String, String)>,
) -> Option<Declaration> {
    let range = node_to_range(node);
    let (decl_kind, signature) = match kind {
        "value_declaration" => {
            let name = value_declaration_name(node, source);
            let signature = match (&name, annotation) {
                (Some(name), Some((annotated, text))) if *name == annotated => Some(text),
                _ => None,
            };
            (DeclarationKind::Value { name }, signature)
        }
        "type_declaration" => {
            let name = child_text_of_kind(node, "upper_case_identifier", source)?.to_string();
            let params = children_text_of_kind(node, "lower_type_name", source);
            let variants = named_children_of_kind(node, "union_variant")
                .into_iter()
                .filter_map(|variant| lower_union_variant(variant, source))
                .collect();
            (
                DeclarationKind::Union {
                    name,
                    params,
                    variants,
                },
                Some(node_text(node, source).to_string()),
            )
        }
        "type_alias_declaration" => {
            let name = child_text_of_kind(node, "upper_case_identifier", source)?.to_string();
            let params = children_text_of_kind(node, "lower_type_name", source);
            (
                DeclarationKind::Alias { name, params },
                Some(node_text(node, source).to_string()),
            )
        }
        "infix_declaration" => {
            let operator = node
                .child_by_field_name("operator")
                .map(|op| node_text(op, source))
                .or_else(|| child_text_of_kind(node, "operator_identifier", source))?
                .to_string();
            let function = node
                .child_by_field_name("functionName")
                .or_else(|| last_named_child(node))
                .map(|f| node_text(f, source).to_string())
                .unwrap_or_default();
            (
                DeclarationKind::Infix { operator, function },
                Some(node_text(node, source).to_string()),
            )
        }
        "port_annotation" => {
            let name = child_text_of_kind(node, "lower_case_identifier", source)?.to_string();
            (
                DeclarationKind::Port { name },
                Some(node_text(node, source).to_string()),
            )
        }
        _ => return None,
    };

    let mut declaration = Declaration::new(decl_kind, range);
    declaration.signature = signature;
    Some(declaration)
}

/// Leftmost identifier of a function head; `None` for pattern heads.
fn value_declaration_name(node: Node, source: &str) -> Option<String> {
    let head = first_named_child_of_kind(node, "function_declaration_left")?;
    child_text_of_kind(head, "lower_case_identifier", source).map(str::to_string)
}

fn lower_union_variant(node: Node, source: &str) -> Option<UnionVariant> {
    if node.has_error() && child_text_of_kind(node, "upper_case_identifier", source).is_none() {
        return None;
    }
    let mut cursor = node.walk();
    let mut children = node
        .named_children(&mut cursor)
        .filter(|child| !is_comment(*child));
    let name_node = children.next()?;
    if name_node.kind() != "upper_case_identifier" {
        return None;
    }
    let arguments = children
        .map(|arg| node_text(arg, source).to_string())
        .collect();
    Some(UnionVariant::new(
        node_text(name_node, source),
        arguments,
        node_to_range(node),
    ))
}

fn lower_module_declaration(node: Node, source: &str) -> Option<ModuleDeclaration> {
    let name = child_text_of_kind(node, "upper_case_qid", source)?.to_string();
    let exposing = first_named_child_of_kind(node, "exposing_list")
        .map(|list| lower_exposing_list(list, source))
        .unwrap_or(ExposingSpec::Explicit(Vec::new()));
    Some(ModuleDeclaration { name, exposing })
}

fn lower_import(node: Node, source: &str) -> Option<Import> {
    let module_name = child_text_of_kind(node, "upper_case_qid", source)?;
    let mut import = Import::new(module_name);
    if let Some(alias) = first_named_child_of_kind(node, "as_clause")
        .and_then(|clause| child_text_of_kind(clause, "upper_case_identifier", source))
    {
        import = import.with_alias(alias);
    }
    if let Some(list) = first_named_child_of_kind(node, "exposing_list") {
        import = import.with_exposing(lower_exposing_list(list, source));
    }
    Some(import)
}

fn lower_exposing_list(node: Node, source: &str) -> ExposingSpec {
    if first_named_child_of_kind(node, "double_dot").is_some() {
        return ExposingSpec::All;
    }

    let mut items = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        let item = match child.kind() {
            "exposed_value" => Some(ExposedItem::new(
                node_text(child, source),
                ExposedKind::Value,
            )),
            "exposed_type" => {
                child_text_of_kind(child, "upper_case_identifier", source).map(|name| {
                    let kind = if first_named_child_of_kind(child, "exposed_union_constructors")
                        .is_some()
                    {
                        ExposedKind::TypeWithConstructors
                    } else {
                        ExposedKind::Type
                    };
                    ExposedItem::new(name, kind)
                })
            }
            "exposed_operator" => child_text_of_kind(child, "operator_identifier", source)
                .map(|op| ExposedItem::new(op, ExposedKind::Operator)),
            _ => None,
        };
        items.extend(item);
    }
    ExposingSpec::Explicit(items)
}

fn strip_doc_comment(text: &str) -> String {
    text.trim_start_matches(DOC_COMMENT_OPEN)
        .trim_end_matches("-}")
        .trim()
        .to_string()
}

fn is_comment(node: Node) -> bool {
    matches!(node.kind(), "block_comment" | "line_comment")
}

fn node_text<'a>(node: Node, source: &'a str) -> &'a str {
    source.get(node.byte_range()).unwrap_or_default()
}

fn first_named_child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .find(|child| child.kind() == kind)
}

fn named_children_of_kind<'t>(node: Node<'t>, kind: &str) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() == kind)
        .collect()
}

fn last_named_child(node: Node) -> Option<Node> {
    node.named_child_count()
        .checked_sub(1)
        .and_then(|index| node.named_child(index as u32))
}

fn child_text_of_kind<'a>(node: Node, kind: &str, source: &'a str) -> Option<&'a str> {
    first_named_child_of_kind(node, kind)
        .map(|child| node_text(child, source))
        .filter(|text| !text.is_empty())
}

fn children_text_of_kind(node: Node, kind: &str, source: &str) -> Vec<String> {
    named_children_of_kind(node, kind)
        .into_iter()
        .map(|child| node_text(child, source).to_string())
        .collect()
}
