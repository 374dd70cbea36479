use serde::{Deserialize, Serialize};

/// Content injected into every processed file.
///
/// Loaded once before the pipeline runs and never mutated afterwards. An empty
/// list turns the corresponding pass into a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InjectionConfig {
    /// Import paths, inserted in this order
    pub imports: Vec<String>,

    /// Statements placed in `func init()`, in this order
    #[serde(alias = "instructions")]
    pub init_statements: Vec<String>,
}

impl InjectionConfig {
    pub fn new(imports: Vec<String>, init_statements: Vec<String>) -> Self {
        Self {
            imports,
            init_statements,
        }
    }

    /// True when neither pass has anything to insert
    pub fn is_empty(&self) -> bool {
        self.imports.is_empty() && self.init_statements.is_empty()
    }

    /// Entries that will most likely render into invalid Go.
    ///
    /// Configured strings are trusted and always inserted verbatim; these are
    /// only reported so a typo in the config shows up in the log.
    pub fn suspicious_entries(&self) -> Vec<String> {
        let mut found = Vec::new();
        for (pos, import) in self.imports.iter().enumerate() {
            if import.trim().is_empty() {
                found.push(format!("imports[{pos}] is blank"));
            } else if import.contains('"') {
                found.push(format!("imports[{pos}] contains a quote: {import:?}"));
            }
        }
        for (pos, statement) in self.init_statements.iter().enumerate() {
            if statement.trim().is_empty() {
                found.push(format!("init_statements[{pos}] is blank"));
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_empty() {
        let config = InjectionConfig::default();
        assert!(config.suspicious_entries().is_empty());
        assert!(config.is_empty());
    }

    #[test]
    fn test_suspicious_entries_reported() {
        let mut config = InjectionConfig::new(vec!["a/b".into()], vec!["a.Load()".into()]);
        assert!(config.suspicious_entries().is_empty());

        config.imports.push("  ".into());
        config.imports.push("x\" // c".into());
        config.init_statements.push(String::new());
        assert_eq!(
            config.suspicious_entries(),
            vec![
                "imports[1] is blank".to_string(),
                "imports[2] contains a quote: \"x\\\" // c\"".to_string(),
                "init_statements[1] is blank".to_string(),
            ]
        );
    }

    #[test]
    fn test_instructions_alias() {
        let config: InjectionConfig =
            toml::from_str("imports = [\"x\"]\ninstructions = [\"x.Init()\"]\n").unwrap();
        assert_eq!(config.imports, vec!["x".to_string()]);
        assert_eq!(config.init_statements, vec!["x.Init()".to_string()]);
    }
}
