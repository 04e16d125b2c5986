use crate::syntax::SyntaxTree;
use std::sync::Arc;
use url::Url;

/// One known source file: its text, current tree and version.
#[derive(Debug)]
pub struct Document {
    uri: Url,
    text: String,
    tree: Arc<SyntaxTree>,
    version: i32,
    /// Order in which the document was first registered with the forest.
    registration: u64,
    /// Forest-wide stamp of this revision; unique per `set_document`.
    generation: u64,
}

impl Document {
    pub(crate) fn new(
        uri: Url,
        text: String,
        tree: Arc<SyntaxTree>,
        version: i32,
        registration: u64,
        generation: u64,
    ) -> Self {
        Self {
            uri,
            text,
            tree,
            version,
            registration,
            generation,
        }
    }

    pub fn uri(&self) -> &Url {
        &self.uri
    }

    /// Get the text content
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Shared handle to the current tree
    pub fn tree(&self) -> &Arc<SyntaxTree> {
        &self.tree
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn module_name(&self) -> Option<&str> {
        self.tree.module_name()
    }

    pub(crate) fn registration(&self) -> u64 {
        self.registration
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }
}
