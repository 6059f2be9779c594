//! Per-call binding context and its serializable configuration form.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dialect::{self, Dialect};
use crate::error::SqlBinderError;
use crate::shape::Naming;

/// Settings every bind and scan call consults.
///
/// Cheap to copy; build one per call or keep one around per connection.
/// ```rust
/// use sql_binder::prelude::*;
///
/// let ctx = BindContext::default()
///     .with_dialect(Dialect::Dollar)
///     .with_tolerant(true);
/// assert_eq!(ctx.dialect, Dialect::Dollar);
/// assert!(ctx.tolerant);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BindContext {
    pub dialect: Dialect,
    pub naming: Naming,
    /// Let record scans drop columns that match no field instead of failing.
    pub tolerant: bool,
}

impl BindContext {
    #[must_use]
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Self::default()
        }
    }

    /// Context for whatever dialect `driver` is registered under.
    #[must_use]
    pub fn for_driver(driver: &str) -> Self {
        Self::new(dialect::dialect_for(driver))
    }

    #[must_use]
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    #[must_use]
    pub fn with_naming(mut self, naming: Naming) -> Self {
        self.naming = naming;
        self
    }

    #[must_use]
    pub fn with_tolerant(mut self, tolerant: bool) -> Self {
        self.tolerant = tolerant;
        self
    }
}

/// Serializable stand-in for [`Naming`] (custom functions cannot come from a file).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NamingStyle {
    #[default]
    Lowercase,
    SnakeCase,
    CamelCase,
    Verbatim,
}

impl From<NamingStyle> for Naming {
    fn from(style: NamingStyle) -> Self {
        match style {
            NamingStyle::Lowercase => Naming::Lowercase,
            NamingStyle::SnakeCase => Naming::SnakeCase,
            NamingStyle::CamelCase => Naming::CamelCase,
            NamingStyle::Verbatim => Naming::Verbatim,
        }
    }
}

/// File/JSON form of the binder settings.
///
/// ```json
/// {
///   "driver": "warehouse",
///   "drivers": { "warehouse": "sequential-dollar" },
///   "naming": "snake-case",
///   "tolerant": false
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BinderConfig {
    /// Driver whose dialect the resulting context uses.
    pub driver: Option<String>,
    /// Explicit dialect; wins over `driver`.
    pub dialect: Option<Dialect>,
    /// Registry overrides applied before `driver` is looked up.
    pub drivers: BTreeMap<String, Dialect>,
    pub naming: NamingStyle,
    pub tolerant: bool,
}

impl BinderConfig {
    /// # Errors
    ///
    /// Returns `SqlBinderError::JsonError` for malformed or unknown fields.
    pub fn from_json_str(json: &str) -> Result<Self, SqlBinderError> {
        Ok(serde_json::from_str(json)?)
    }

    /// # Errors
    ///
    /// Returns `SqlBinderError::IoError` if the file cannot be read, `JsonError` if it does not
    /// parse.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SqlBinderError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    /// Register the driver overrides and build the matching [`BindContext`].
    ///
    /// # Errors
    ///
    /// Returns `SqlBinderError::ConfigError` for a blank driver id.
    pub fn apply(&self) -> Result<BindContext, SqlBinderError> {
        if self.drivers.keys().any(|name| name.trim().is_empty())
            || self.driver.as_deref().is_some_and(|name| name.trim().is_empty())
        {
            return Err(SqlBinderError::ConfigError(
                "driver id must not be blank".to_string(),
            ));
        }

        for (driver, dialect) in &self.drivers {
            dialect::register_driver(driver.as_str(), *dialect);
        }

        let dialect = match (self.dialect, self.driver.as_deref()) {
            (Some(dialect), _) => dialect,
            (None, Some(driver)) => dialect::dialect_for(driver),
            (None, None) => Dialect::Generic,
        };
        tracing::debug!(
            %dialect,
            overrides = self.drivers.len(),
            tolerant = self.tolerant,
            "applied binder config"
        );

        Ok(BindContext {
            dialect,
            naming: self.naming.into(),
            tolerant: self.tolerant,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_fields() {
        let ctx = BindContext::for_driver("postgres")
            .with_naming(Naming::Verbatim)
            .with_tolerant(true);
        assert_eq!(ctx.dialect, Dialect::Dollar);
        assert!(matches!(ctx.naming, Naming::Verbatim));
        assert!(ctx.tolerant);
        assert_eq!(BindContext::for_driver("no-such-driver").dialect, Dialect::Generic);
    }

    #[test]
    fn config_registers_overrides() {
        let cfg = BinderConfig::from_json_str(
            r#"{
                "driver": "config-test-warehouse",
                "drivers": { "config-test-warehouse": "sequential-at" },
                "naming": "snake-case",
                "tolerant": true
            }"#,
        )
        .unwrap();
        let ctx = cfg.apply().unwrap();
        assert_eq!(ctx.dialect, Dialect::At);
        assert!(matches!(ctx.naming, Naming::SnakeCase));
        assert!(ctx.tolerant);
        assert_eq!(dialect::dialect_for("config-test-warehouse"), Dialect::At);
    }

    #[test]
    fn explicit_dialect_wins() {
        let cfg = BinderConfig {
            driver: Some("mysql".into()),
            dialect: Some(Dialect::NamedColon),
            ..BinderConfig::default()
        };
        assert_eq!(cfg.apply().unwrap().dialect, Dialect::NamedColon);
        assert_eq!(BinderConfig::default().apply().unwrap().dialect, Dialect::Generic);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            BinderConfig::from_json_str(r#"{ "dialekt": "generic" }"#),
            Err(SqlBinderError::JsonError(_))
        ));
        assert!(matches!(
            BinderConfig::from_json_str(r#"{ "dialect": "question-mark" }"#),
            Err(SqlBinderError::JsonError(_))
        ));
        let cfg = BinderConfig {
            driver: Some("  ".into()),
            ..BinderConfig::default()
        };
        assert!(matches!(cfg.apply(), Err(SqlBinderError::ConfigError(_))));
    }
}
