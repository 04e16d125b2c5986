//! Programmatic construction of [`SyntaxTree`]s.
//!
//! Used by callers that already hold a parsed representation and by tests.
//! Declarations are laid out on consecutive lines in insertion order.

use super::position::Range;
use super::tree::{
    Declaration, DeclarationKind, ExposingSpec, Import, ModuleDeclaration, SyntaxTree,
    UnionVariant,
};

#[derive(Default)]
pub struct TreeBuilder {
    module: Option<ModuleDeclaration>,
    imports: Vec<Import>,
    declarations: Vec<Declaration>,
    next_line: u32,
}

impl TreeBuilder {
    /// Start a tree with a `module name exposing (...)` header.
    pub fn module(name: impl Into<String>, exposing: ExposingSpec) -> Self {
        Self {
            module: Some(ModuleDeclaration {
                name: name.into(),
                exposing,
            }),
            next_line: 1,
            ..Default::default()
        }
    }

    /// Start a tree without a module header.
    pub fn headless() -> Self {
        Self::default()
    }

    pub fn import(mut self, import: Import) -> Self {
        self.imports.push(import);
        self.next_line += 1;
        self
    }

    /// `name = ...` with an optional annotation and doc comment.
    pub fn value(self, name: &str, annotation: Option<&str>, doc: Option<&str>) -> Self {
        let kind = DeclarationKind::Value {
            name: Some(name.to_string()),
        };
        self.push(kind, annotation.map(str::to_string), doc)
    }

    /// A value whose head is a destructuring pattern.
    pub fn destructuring(self) -> Self {
        self.push(DeclarationKind::Value { name: None }, None, None)
    }

    /// `type name = A | B` where each variant is `(name, argument texts)`.
    pub fn union(self, name: &str, variants: &[(&str, &[&str])]) -> Self {
        self.union_with_params(name, &[], variants, None)
    }

    pub fn union_with_params(
        mut self,
        name: &str,
        params: &[&str],
        variants: &[(&str, &[&str])],
        doc: Option<&str>,
    ) -> Self {
        let line = self.next_line;
        let variants: Vec<UnionVariant> = variants
            .iter()
            .enumerate()
            .map(|(offset, (variant, arguments))| {
                let variant_line = line + 1 + offset as u32;
                UnionVariant::new(
                    *variant,
                    arguments.iter().map(|a| a.to_string()).collect(),
                    Range::lines(variant_line, variant_line),
                )
            })
            .collect();
        let signature = render_union(name, params, &variants);
        self.next_line += variants.len() as u32;
        let kind = DeclarationKind::Union {
            name: name.to_string(),
            params: params.iter().map(|p| p.to_string()).collect(),
            variants,
        };
        self.push(kind, Some(signature), doc)
    }

    /// `type alias name = body`
    pub fn alias(self, name: &str, body: &str, doc: Option<&str>) -> Self {
        let kind = DeclarationKind::Alias {
            name: name.to_string(),
            params: Vec::new(),
        };
        let signature = format!("type alias {name} = {body}");
        self.push(kind, Some(signature), doc)
    }

    /// `infix left 0 (operator) = function`
    pub fn infix(self, operator: &str, function: &str) -> Self {
        let kind = DeclarationKind::Infix {
            operator: operator.to_string(),
            function: function.to_string(),
        };
        let signature = format!("infix left 0 ({operator}) = {function}");
        self.push(kind, Some(signature), None)
    }

    /// `port name : annotation`
    pub fn port(self, name: &str, annotation: &str) -> Self {
        let kind = DeclarationKind::Port {
            name: name.to_string(),
        };
        let signature = format!("port {name} : {annotation}");
        self.push(kind, Some(signature), None)
    }

    pub fn build(self) -> SyntaxTree {
        SyntaxTree::new(self.module, self.imports, self.declarations)
    }

    fn push(mut self, kind: DeclarationKind, signature: Option<String>, doc: Option<&str>) -> Self {
        let line = self.next_line;
        let mut declaration = Declaration::new(kind, Range::lines(line, line));
        declaration.signature = signature;
        declaration.doc = doc.map(str::to_string);
        self.declarations.push(declaration);
        self.next_line += 2;
        self
    }
}

fn render_union(name: &str, params: &[&str], variants: &[UnionVariant]) -> String {
    let mut head = String::from("type ");
    head.push_str(name);
    for param in params {
        head.push(' ');
        head.push_str(param);
    }
    let arms: Vec<String> = variants
        .iter()
        .map(|variant| {
            let mut arm = variant.name.clone();
            for argument in &variant.arguments {
                arm.push(' ');
                arm.push_str(argument);
            }
            arm
        })
        .collect();
    if arms.is_empty() {
        head
    } else {
        format!("{head}\n    = {}", arms.join("\n    | "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_union_signature_from_variants() {
        let tree = TreeBuilder::module("Shape", ExposingSpec::All)
            .union("Shape", &[("Circle", &["Float"]), ("Square", &["Float"])])
            .build();
        let decl = &tree.declarations()[0];
        assert_eq!(
            decl.signature.as_deref(),
            Some("type Shape\n    = Circle Float\n    | Square Float")
        );
    }

    #[test]
    fn declarations_keep_insertion_order() {
        let tree = TreeBuilder::module("Main", ExposingSpec::All)
            .value("main", None, None)
            .alias("Model", "{ count : Int }", None)
            .destructuring()
            .build();
        let names: Vec<Option<&str>> = tree.declarations().iter().map(|d| d.name()).collect();
        assert_eq!(names, vec![Some("main"), Some("Model"), None]);
        assert_eq!(tree.module_name(), Some("Main"));
    }
}
