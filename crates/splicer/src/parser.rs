use crate::error::{Result, SplicerError};
use crate::types::{DeclKind, Declaration, SyntaxTree};
use tree_sitter::{Node, Parser};

/// Source of syntax trees for the injector.
///
/// Implementations must be side-effect free with respect to the text and
/// fail with [`SplicerError::ParseError`] when it is not valid source.
pub trait SyntaxParser {
    fn parse(&mut self, text: &str) -> Result<SyntaxTree>;
}

/// Tree-sitter backed Go parser
pub struct GoParser {
    parser: Parser,
}

impl GoParser {
    /// Create a parser loaded with the Go grammar
    pub fn new() -> Result<Self> {
        let language: tree_sitter::Language = tree_sitter_go::LANGUAGE.into();
        let mut parser = Parser::new();
        parser
            .set_language(&language)
            .map_err(|e| SplicerError::tree_sitter(format!("Failed to set language: {e}")))?;

        Ok(Self { parser })
    }

    fn collect_declarations(content: &str, root: Node) -> Vec<Declaration> {
        let mut cursor = root.walk();
        let nodes: Vec<Node> = root
            .children(&mut cursor)
            .filter(|node| node.is_named())
            .collect();

        let mut declarations = Vec::new();
        for (index, node) in nodes.iter().enumerate() {
            let kind = match node.kind() {
                "package_clause" | "comment" => continue,
                "import_declaration" => DeclKind::Import,
                "function_declaration" => DeclKind::Function,
                "method_declaration" => DeclKind::Method,
                _ => DeclKind::Other,
            };

            let closing_delimiter = match kind {
                DeclKind::Import => Self::import_group_close(*node),
                DeclKind::Function | DeclKind::Method => Self::body_close(*node),
                DeclKind::Other => None,
            };

            let name = match kind {
                DeclKind::Function | DeclKind::Method => node
                    .child_by_field_name("name")
                    .and_then(|n| n.utf8_text(content.as_bytes()).ok())
                    .map(str::to_string),
                _ => None,
            };

            declarations.push(Declaration {
                kind,
                name,
                start: node.start_byte(),
                end: node.end_byte(),
                leading_comment_start: Self::leading_comment_start(&nodes, index),
                closing_delimiter,
            });
        }

        declarations
    }

    /// Offset of `)` in `import ( ... )`; `None` for a single ungrouped import
    fn import_group_close(import_node: Node) -> Option<usize> {
        let mut cursor = import_node.walk();
        let spec_list = import_node
            .children(&mut cursor)
            .find(|child| child.kind() == "import_spec_list")?;
        Self::last_token(spec_list, ")")
    }

    /// Offset of the `}` closing a function body
    fn body_close(func_node: Node) -> Option<usize> {
        let body = func_node.child_by_field_name("body")?;
        Self::last_token(body, "}")
    }

    fn last_token(node: Node, token: &str) -> Option<usize> {
        let last = node.child(node.child_count().checked_sub(1)?)?;
        (last.kind() == token).then(|| last.start_byte())
    }

    /// Start of the comment group that documents `nodes[index]`.
    ///
    /// The group must end on the line directly above (or on the same line as)
    /// the declaration, and its comments may not be separated by blank lines.
    /// A comment sharing a line with the previous declaration belongs to that
    /// declaration.
    fn leading_comment_start(nodes: &[Node], index: usize) -> Option<usize> {
        let mut next_row = nodes[index].start_position().row;
        let mut start = None;
        let mut j = index;

        while j > 0 {
            let candidate = nodes[j - 1];
            if candidate.kind() != "comment" || candidate.end_position().row + 1 < next_row {
                break;
            }
            if j >= 2 {
                let before = nodes[j - 2];
                if before.kind() != "comment"
                    && before.end_position().row == candidate.start_position().row
                {
                    break;
                }
            }
            start = Some(candidate.start_byte());
            next_row = candidate.start_position().row;
            j -= 1;
        }

        start
    }

    fn first_error(node: Node) -> Option<Node> {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if !node.has_error() {
            return None;
        }
        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();
        children.into_iter().find_map(Self::first_error)
    }
}

impl SyntaxParser for GoParser {
    fn parse(&mut self, text: &str) -> Result<SyntaxTree> {
        let tree = self
            .parser
            .parse(text, None)
            .ok_or_else(|| SplicerError::parse("Failed to parse source code"))?;

        let root = tree.root_node();
        if root.has_error() {
            let detail = match Self::first_error(root) {
                Some(node) => {
                    let pos = node.start_position();
                    let what = if node.is_missing() {
                        format!("missing `{}`", node.kind())
                    } else {
                        "unexpected syntax".to_string()
                    };
                    format!("{what} at line {}, column {}", pos.row + 1, pos.column + 1)
                }
                None => "syntax error".to_string(),
            };
            return Err(SplicerError::parse(detail));
        }

        // tree-sitter-go accepts a bare list of declarations; a Go file does not
        let mut cursor = root.walk();
        if !root
            .children(&mut cursor)
            .any(|child| child.kind() == "package_clause")
        {
            return Err(SplicerError::parse("missing package clause"));
        }

        Ok(SyntaxTree::new(
            Self::collect_declarations(text, root),
            text.len(),
        ))
    }
}
