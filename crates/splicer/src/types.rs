use serde::{Deserialize, Serialize};

/// Kind of a top-level Go declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclKind {
    /// `import "x"` or `import ( ... )`
    Import,
    /// Function without a receiver
    Function,
    /// Function with a receiver
    Method,
    /// `var`, `const`, `type` and anything else at the top level
    Other,
}

/// A top-level declaration with byte offsets into the text it was parsed from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub kind: DeclKind,

    /// Declared name, for functions and methods
    pub name: Option<String>,

    /// Start byte offset of the declaration keyword
    pub start: usize,

    /// End byte offset (exclusive)
    pub end: usize,

    /// Start of the doc comment group directly above the declaration
    pub leading_comment_start: Option<usize>,

    /// Offset of the closing `)` of a grouped import, or the closing `}` of a function body
    pub closing_delimiter: Option<usize>,
}

impl Declaration {
    /// Offset at which code can be placed ahead of this declaration without
    /// separating it from its doc comment
    pub fn leading_offset(&self) -> usize {
        self.leading_comment_start.unwrap_or(self.start)
    }

    /// True for `import ( ... )`
    pub fn is_grouped_import(&self) -> bool {
        self.kind == DeclKind::Import && self.closing_delimiter.is_some()
    }
}

/// Read-only structural view over one version of a source text.
///
/// Offsets are only valid against the exact text that produced the tree, so a
/// tree must be dropped once that text is spliced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxTree {
    declarations: Vec<Declaration>,
    source_len: usize,
}

impl SyntaxTree {
    pub fn new(declarations: Vec<Declaration>, source_len: usize) -> Self {
        Self {
            declarations,
            source_len,
        }
    }

    /// Top-level declarations in source order
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// Length in bytes of the parsed text
    pub fn source_len(&self) -> usize {
        self.source_len
    }
}

/// How the rendered content relates to the anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorMode {
    /// Insert entries into a block that already exists
    AppendToExistingBlock,
    /// Synthesize the surrounding block as well
    CreateNewBlock,
}

/// Where and how one insertion pass splices its content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertionAnchor {
    pub offset: usize,
    pub mode: AnchorMode,
}

impl InsertionAnchor {
    pub fn append(offset: usize) -> Self {
        Self {
            offset,
            mode: AnchorMode::AppendToExistingBlock,
        }
    }

    pub fn create(offset: usize) -> Self {
        Self {
            offset,
            mode: AnchorMode::CreateNewBlock,
        }
    }
}
