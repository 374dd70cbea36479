use anyhow::{bail, Context, Result};
use goinject_module::Requirement;
use goinject_splicer::InjectionConfig;
use serde::Deserialize;
use std::path::Path;

/// Contents of `goinject.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Imports and init statements for the entry file
    pub service_loading: InjectionConfig,

    /// Requirements enforced in go.mod
    pub go_mod: GoModSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GoModSettings {
    pub require: Vec<Requirement>,
}

impl GoModSettings {
    /// Every requirement needs a module path and a version
    fn validate(&self) -> Result<()> {
        for (pos, req) in self.require.iter().enumerate() {
            if req.path.trim().is_empty() {
                bail!("require[{pos}] has a blank path");
            }
            if req.version.trim().is_empty() {
                bail!("require[{pos}] ({}) has a blank version", req.path);
            }
        }
        Ok(())
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let settings = Self::from_toml(&text)
            .with_context(|| format!("parse config {}", path.display()))?;
        log::debug!(
            "Loaded {}: {} imports, {} init statements, {} requirements",
            path.display(),
            settings.service_loading.imports.len(),
            settings.service_loading.init_statements.len(),
            settings.go_mod.require.len()
        );
        Ok(settings)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let settings: Self = toml::from_str(text)?;
        settings.go_mod.validate().context("invalid [[go_mod.require]]")?;
        Ok(settings)
    }
}
