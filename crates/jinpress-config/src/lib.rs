//! Configuration management for JinPress.
//!
//! Parses `jinpress.yml` configuration files with serde and provides
//! discovery of the config file in a project root (falling back to the
//! legacy `config.yml` name).
//!
//! Every field has a default, so a missing section or key never fails
//! deserialization: an empty file yields a fully populated [`Config`].

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "jinpress.yml";

/// Legacy configuration filename, accepted as a fallback.
const LEGACY_CONFIG_FILENAME: &str = "config.yml";

/// Application configuration.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Site-wide metadata.
    pub site: SiteConfig,
    /// Theme configuration (navigation, sidebar, footer).
    #[serde(alias = "themeConfig")]
    pub theme: ThemeConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Site-wide metadata.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    /// Site title, shown in the nav bar and page `<title>`.
    pub title: String,
    /// Site description, used as the default meta description.
    pub description: String,
    /// Content language tag for the `<html lang>` attribute.
    pub lang: String,
    /// Base URL path the site is deployed under (e.g. `/docs/`).
    pub base: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "JinPress Site".to_owned(),
            description: "A JinPress documentation site".to_owned(),
            lang: "en".to_owned(),
            base: "/".to_owned(),
        }
    }
}

/// Theme configuration.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ThemeConfig {
    /// Top navigation bar items.
    pub nav: Vec<NavItem>,
    /// Sidebar sections keyed by URL path prefix, in declaration order.
    pub sidebar: Sidebar,
    /// Footer content.
    pub footer: Footer,
    /// "Edit this page" link configuration.
    pub edit_link: EditLink,
    /// Whether to show the last-updated date on pages.
    #[serde(default = "default_true")]
    pub last_updated: bool,
}

fn default_true() -> bool {
    true
}

/// A navigation link (used for the nav bar and sidebar items).
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct NavItem {
    /// Link label.
    pub text: String,
    /// Link target (site-relative path or external URL).
    pub link: String,
}

/// Footer content.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Footer {
    /// Message shown above the copyright line.
    pub message: String,
    /// Copyright line.
    pub copyright: String,
}

/// "Edit this page" link configuration.
///
/// `pattern` may contain `:path`, replaced with the page's source path
/// relative to the docs directory.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct EditLink {
    /// URL pattern, e.g. `https://example.com/edit/main/docs/:path`.
    pub pattern: String,
    /// Link label.
    pub text: String,
}

/// A sidebar section: a URL path prefix and the items shown under it.
#[derive(Debug, Clone, PartialEq)]
pub struct SidebarSection {
    /// URL path prefix this section applies to (e.g. `/guide/`).
    pub prefix: String,
    /// Items shown when a page matches the prefix.
    pub items: Vec<NavItem>,
}

/// Ordered sidebar sections.
///
/// YAML mappings lose ordering through a plain `HashMap`, and prefix
/// matching is first-match-wins, so the sections are kept as a vector
/// in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sidebar(pub Vec<SidebarSection>);

impl Sidebar {
    /// Items for the first section whose prefix is a prefix of `route`.
    ///
    /// `route` is the page's URL path without the site base.
    pub fn items_for(&self, route: &str) -> &[NavItem] {
        self.0
            .iter()
            .find(|section| route.starts_with(&section.prefix))
            .map_or(&[], |section| section.items.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for Sidebar {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SidebarVisitor;

        impl<'de> Visitor<'de> for SidebarVisitor {
            type Value = Sidebar;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a mapping of path prefixes to lists of nav items")
            }

            fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut sections = Vec::new();
                while let Some((prefix, items)) = map.next_entry::<String, Vec<NavItem>>()? {
                    sections.push(SidebarSection { prefix, items });
                }
                Ok(Sidebar(sections))
            }
        }

        deserializer.deserialize_map(SidebarVisitor)
    }
}

impl Config {
    /// Loads configuration from an explicit file or by discovery in
    /// `project_root`.
    ///
    /// Discovery looks for `jinpress.yml`, then `config.yml`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if no config file exists,
    /// `ConfigError::Parse` for malformed YAML, and
    /// `ConfigError::Validation` for well-formed but invalid values.
    pub fn load(explicit_path: Option<&Path>, project_root: &Path) -> Result<Self, ConfigError> {
        let path = match explicit_path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                path.to_path_buf()
            }
            None => Self::discover(project_root)?,
        };
        Self::load_from_file(&path)
    }

    /// Finds the config file in `project_root`.
    fn discover(project_root: &Path) -> Result<PathBuf, ConfigError> {
        let primary = project_root.join(CONFIG_FILENAME);
        if primary.exists() {
            return Ok(primary);
        }
        let legacy = project_root.join(LEGACY_CONFIG_FILENAME);
        if legacy.exists() {
            return Ok(legacy);
        }
        Err(ConfigError::NotFound(primary))
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self =
            serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.config_path = Some(path.to_path_buf());
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` naming the offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.site.title, "site.title")?;
        require_non_empty(&self.site.lang, "site.lang")?;
        if !self.site.base.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "site.base must start with '/', got '{}'",
                self.site.base
            )));
        }
        for (i, item) in self.theme.nav.iter().enumerate() {
            require_non_empty(&item.text, &format!("theme.nav[{i}].text"))?;
            require_non_empty(&item.link, &format!("theme.nav[{i}].link"))?;
        }
        for section in &self.theme.sidebar.0 {
            if !section.prefix.starts_with('/') {
                return Err(ConfigError::Validation(format!(
                    "theme.sidebar key '{}' must start with '/'",
                    section.prefix
                )));
            }
            for (i, item) in section.items.iter().enumerate() {
                require_non_empty(
                    &item.text,
                    &format!("theme.sidebar['{}'][{i}].text", section.prefix),
                )?;
                require_non_empty(
                    &item.link,
                    &format!("theme.sidebar['{}'][{i}].link", section.prefix),
                )?;
            }
        }
        Ok(())
    }

    /// Site base path normalized to have a leading and trailing slash.
    #[must_use]
    pub fn base(&self) -> String {
        normalize_base(&self.site.base)
    }
}

/// Normalizes a base path to `/.../` form (`/` stays `/`).
#[must_use]
pub fn normalize_base(base: &str) -> String {
    let trimmed = base.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_owned()
    } else {
        format!("/{trimmed}/")
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error reading config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// YAML parse error.
    #[error("YAML parse error in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}
