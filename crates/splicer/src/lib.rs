//! # goinject splicer
//!
//! Syntax-aware insertion of imports and `init()` statements into Go sources.
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     │
//!     ├──> Pass 1: imports
//!     │    ├─> Tree-sitter parse → top-level declarations
//!     │    ├─> Anchor: before `)` of the first `import ( ... )`,
//!     │    │           else ahead of the first declaration
//!     │    └─> Render + splice
//!     │
//!     └──> Pass 2: init statements (re-parse of the pass 1 output)
//!          ├─> Anchor: before `}` of `func init()`,
//!          │           else ahead of the first declaration
//!          └─> Render (provenance marker first) + splice
//! ```
//!
//! A pass whose configured list is empty returns its input untouched and
//! never parses it.
//!
//! ## Example
//!
//! ```rust
//! use goinject_splicer::{InjectionConfig, Injector};
//!
//! let config = InjectionConfig::new(
//!     vec!["example.com/loader".to_string()],
//!     vec!["loader.Load(\"config.yaml\")".to_string()],
//! );
//! let injector = Injector::new(config);
//!
//! let src = "package main\n\nimport (\n\t\"fmt\"\n)\n\nfunc main() {\n\tfmt.Println()\n}\n";
//! let out = injector.inject_str(src).unwrap();
//! assert!(out.contains("\t\"fmt\"\n\t\"example.com/loader\"\n)"));
//! assert!(out.contains("func init() {"));
//! ```

mod anchor;
mod config;
mod error;
mod format;
mod injector;
mod parser;
mod splice;
mod types;

pub use anchor::{
    first_declaration_offset, locate_import_anchor, locate_init_anchor, STARTUP_FUNCTION,
};
pub use config::InjectionConfig;
pub use error::{Result, SplicerError};
pub use format::{render_imports, render_init_statements, PROVENANCE_MARKER};
pub use injector::{
    insert_imports, insert_init_statements, FileInjection, InjectionOutcome, Injector,
};
pub use parser::{GoParser, SyntaxParser};
pub use splice::splice;
pub use types::{AnchorMode, DeclKind, Declaration, InsertionAnchor, SyntaxTree};
