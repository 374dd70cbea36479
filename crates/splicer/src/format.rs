use crate::anchor::STARTUP_FUNCTION;
use crate::types::AnchorMode;

/// Comment placed at the head of every injected init block
pub const PROVENANCE_MARKER: &str =
    "//this is autogenerated code with default service loading configuration. Please review it";

/// Render import paths as quoted lines, wrapped in `import ( ... )` for a new block
pub fn render_imports(paths: &[String], mode: AnchorMode) -> String {
    let mut lines = String::new();
    for path in paths {
        lines.push_str("\t\"");
        lines.push_str(path);
        lines.push_str("\"\n");
    }

    match mode {
        AnchorMode::AppendToExistingBlock => lines,
        AnchorMode::CreateNewBlock => format!("import (\n{lines})\n\n"),
    }
}

/// Render init statements behind the provenance marker, wrapped in
/// `func init() { ... }` for a new block
pub fn render_init_statements(statements: &[String], mode: AnchorMode) -> String {
    let mut lines = format!("\t{PROVENANCE_MARKER}\n");
    for statement in statements {
        lines.push('\t');
        lines.push_str(statement);
        lines.push('\n');
    }

    match mode {
        AnchorMode::AppendToExistingBlock => lines,
        AnchorMode::CreateNewBlock => format!("func {STARTUP_FUNCTION}() {{\n{lines}}}\n\n"),
    }
}
