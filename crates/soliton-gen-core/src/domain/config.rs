// ============================================================================
// domain/config.rs - REQUEST CONFIGURATIONS
// ============================================================================
//
// One struct per generation request. Built by the CLI from flags or
// deserialized from HTTP JSON bodies, then passed by value through the
// pipeline.

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::field::FieldConfig;
use crate::domain::naming::is_valid_name;

/// Fails unless `value` is a non-empty, valid name.
pub fn require_name(what: &'static str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::MissingName { what });
    }
    if !is_valid_name(value) {
        return Err(DomainError::InvalidName {
            what,
            value: value.to_string(),
        });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework_replace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub go_version: Option<String>,
}

impl ProjectConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        require_name("project name", &self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DomainConfig {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_base: Option<String>,
    #[serde(default)]
    pub soft_delete: bool,
    #[serde(default)]
    pub wire: bool,
    #[serde(default)]
    pub force: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

impl DomainConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        require_name("domain name", &self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    #[serde(default)]
    pub methods: Vec<String>,
    #[serde(default)]
    pub force: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

impl ServiceConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        require_name("service name", &self.name)?;
        if self.name.trim() == "Service" {
            return Err(DomainError::InvalidName {
                what: "service name",
                value: self.name.clone(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValueObjectConfig {
    pub domain: String,
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
    #[serde(default)]
    pub force: bool,
}

impl ValueObjectConfig {
    pub fn validate(&self) -> Result<(), DomainError> {
        require_name("domain", &self.domain)?;
        require_name("value object name", &self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpecificationConfig {
    pub domain: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default)]
    pub force: bool,
}

impl SpecificationConfig {
    pub fn validate(&self) -> Result<(), DomainError> {
        require_name("domain", &self.domain)?;
        require_name("specification name", &self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PolicyConfig {
    pub domain: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default)]
    pub force: bool,
}

impl PolicyConfig {
    pub fn validate(&self) -> Result<(), DomainError> {
        require_name("domain", &self.domain)?;
        require_name("policy name", &self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventConfig {
    pub domain: String,
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default)]
    pub force: bool,
}

impl EventConfig {
    pub fn validate(&self) -> Result<(), DomainError> {
        require_name("domain", &self.domain)?;
        require_name("event name", &self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventHandlerConfig {
    pub domain: String,
    pub event_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default)]
    pub force: bool,
}

impl EventHandlerConfig {
    pub fn validate(&self) -> Result<(), DomainError> {
        require_name("domain", &self.domain)?;
        require_name("event name", &self.event_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_required() {
        assert_eq!(
            DomainConfig::new("  ").validate(),
            Err(DomainError::MissingName { what: "domain name" })
        );
        assert!(DomainConfig::new("Order").validate().is_ok());
    }

    #[test]
    fn names_reject_whitespace_and_separators() {
        let err = ServiceConfig::new("Order Service").validate().unwrap_err();
        assert!(matches!(err, DomainError::InvalidName { what: "service name", .. }));
        assert!(ProjectConfig::new("shop/api").validate().is_err());
    }

    #[test]
    fn names_reject_relative_path_segments() {
        for bad in ["..", ".", "-"] {
            assert!(matches!(
                DomainConfig::new(bad).validate(),
                Err(DomainError::InvalidName { what: "domain name", .. })
            ));
        }
        let cfg = PolicyConfig {
            domain: "..".into(),
            name: "CanShip".into(),
            ..PolicyConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(DomainError::InvalidName { what: "domain", .. })));
    }

    #[test]
    fn ddd_artifacts_require_domain() {
        let cfg = ValueObjectConfig {
            name: "Money".into(),
            ..ValueObjectConfig::default()
        };
        assert_eq!(cfg.validate(), Err(DomainError::MissingName { what: "domain" }));

        let cfg = EventHandlerConfig {
            domain: "order".into(),
            event_name: "OrderPaid".into(),
            ..EventHandlerConfig::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn bare_service_suffix_is_rejected() {
        assert!(ServiceConfig::new("Service").validate().is_err());
    }

    #[test]
    fn domain_config_deserializes_with_defaults() {
        let cfg: DomainConfig = serde_json::from_str(
            r#"{"name":"Widget","fields":[{"name":"price","type":"int64"}]}"#,
        )
        .unwrap();
        assert_eq!(cfg.fields.len(), 1);
        assert!(!cfg.force);
        assert!(!cfg.wire);
        assert_eq!(cfg.table_name, None);
    }
}
