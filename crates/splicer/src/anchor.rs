//! Anchor selection for the import and init passes.

use crate::types::{DeclKind, InsertionAnchor, SyntaxTree};

/// Name of the function Go runs implicitly before `main`
pub const STARTUP_FUNCTION: &str = "init";

/// Offset in front of the first non-import top-level declaration, including
/// its doc comment. End of file when there is none.
pub fn first_declaration_offset(tree: &SyntaxTree) -> usize {
    tree.declarations()
        .iter()
        .find(|decl| decl.kind != DeclKind::Import)
        .map_or(tree.source_len(), |decl| decl.leading_offset())
}

/// Anchor for new import lines.
///
/// Appends before the `)` of the first grouped import when one exists. Later
/// import declarations are never touched.
pub fn locate_import_anchor(tree: &SyntaxTree) -> InsertionAnchor {
    tree.declarations()
        .iter()
        .find(|decl| decl.is_grouped_import())
        .and_then(|decl| decl.closing_delimiter)
        .map_or_else(
            || InsertionAnchor::create(first_declaration_offset(tree)),
            InsertionAnchor::append,
        )
}

/// Anchor for init statements: inside the existing receiverless `init`, or a
/// new function in front of the first declaration.
pub fn locate_init_anchor(tree: &SyntaxTree) -> InsertionAnchor {
    tree.declarations()
        .iter()
        .find(|decl| {
            decl.kind == DeclKind::Function && decl.name.as_deref() == Some(STARTUP_FUNCTION)
        })
        .and_then(|decl| decl.closing_delimiter)
        .map_or_else(
            || InsertionAnchor::create(first_declaration_offset(tree)),
            InsertionAnchor::append,
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{GoParser, SyntaxParser};
    use crate::types::AnchorMode;

    fn tree(src: &str) -> SyntaxTree {
        GoParser::new().unwrap().parse(src).unwrap()
    }

    #[test]
    fn test_import_anchor_appends_to_first_group() {
        let src = "package main\n\nimport (\n\t\"a\"\n)\n\nimport (\n\t\"b\"\n)\n\nfunc main() {}\n";
        let anchor = locate_import_anchor(&tree(src));
        assert_eq!(anchor.mode, AnchorMode::AppendToExistingBlock);
        assert_eq!(anchor.offset, src.find(')').unwrap());
    }

    #[test]
    fn test_import_anchor_before_first_declaration() {
        let src = "package main\n\n// Config holds settings.\ntype Config struct{}\n\nfunc main() {}\n";
        let anchor = locate_import_anchor(&tree(src));
        assert_eq!(anchor.mode, AnchorMode::CreateNewBlock);
        assert_eq!(anchor.offset, src.find("// Config").unwrap());
    }

    #[test]
    fn test_import_anchor_skips_ungrouped_import() {
        let src = "package main\n\nimport \"fmt\"\n\nfunc main() { fmt.Println() }\n";
        let anchor = locate_import_anchor(&tree(src));
        assert_eq!(anchor.mode, AnchorMode::CreateNewBlock);
        assert_eq!(anchor.offset, src.find("func main").unwrap());
    }

    #[test]
    fn test_anchor_at_eof_without_declarations() {
        let src = "package main\n";
        let t = tree(src);
        assert_eq!(locate_import_anchor(&t), InsertionAnchor::create(src.len()));
        assert_eq!(locate_init_anchor(&t), InsertionAnchor::create(src.len()));
    }

    #[test]
    fn test_init_anchor_in_existing_init() {
        let src = "package main\n\nfunc main() {}\n\nfunc init() {\n\tsetup()\n}\n";
        let anchor = locate_init_anchor(&tree(src));
        assert_eq!(anchor.mode, AnchorMode::AppendToExistingBlock);
        assert_eq!(anchor.offset, src.rfind('}').unwrap());
    }

    #[test]
    fn test_init_method_is_not_startup_function() {
        let src = "package main\n\nimport (\n\t\"fmt\"\n)\n\ntype T struct{}\n\nfunc (T) init() {}\n\nfunc main() { fmt.Println() }\n";
        let anchor = locate_init_anchor(&tree(src));
        assert_eq!(anchor.mode, AnchorMode::CreateNewBlock);
        assert_eq!(anchor.offset, src.find("type T").unwrap());
    }
}
