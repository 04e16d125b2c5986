pub mod builder;
pub mod lower;
pub mod position;
pub mod tree;

pub use builder::TreeBuilder;
pub use lower::lower_tree;
pub use position::{Position, Range};
pub use tree::{
    DeclId, Declaration, DeclarationKind, ExposedItem, ExposedKind, ExposingSpec, Import,
    ModuleDeclaration, SyntaxTree, UnionVariant,
};
