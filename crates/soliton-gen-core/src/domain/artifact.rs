//! Artifact kinds and their on-disk naming.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::layout::ProjectLayout;
use crate::domain::naming::{
    event_base_name, event_handler_name, normalize_event_struct_name, package_name,
    to_pascal_case, to_snake_case,
};

/// Every kind of artifact the generator produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Domain,
    Service,
    #[serde(rename = "valueobject")]
    ValueObject,
    #[serde(rename = "spec")]
    Specification,
    Policy,
    Event,
    EventHandler,
}

impl ArtifactKind {
    /// Kinds that live inside a domain and support rename.
    pub const DDD: [ArtifactKind; 5] = [
        Self::ValueObject,
        Self::Specification,
        Self::Policy,
        Self::Event,
        Self::EventHandler,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Service => "service",
            Self::ValueObject => "valueobject",
            Self::Specification => "spec",
            Self::Policy => "policy",
            Self::Event => "event",
            Self::EventHandler => "event_handler",
        }
    }

    /// File-name prefix used by the DDD kinds.
    pub const fn file_prefix(&self) -> Option<&'static str> {
        match self {
            Self::ValueObject => Some("value_object_"),
            Self::Specification => Some("spec_"),
            Self::Policy => Some("policy_"),
            Self::Event => Some("event_"),
            Self::EventHandler => Some("event_handler_"),
            Self::Domain | Self::Service => None,
        }
    }

    /// Canonical Go type name for a user-supplied artifact name.
    pub fn type_name(&self, name: &str) -> String {
        match self {
            Self::Event => normalize_event_struct_name(name),
            Self::EventHandler => event_handler_name(&normalize_event_struct_name(name)),
            _ => to_pascal_case(name),
        }
    }

    /// Snake-case stem of the artifact's file.
    pub fn file_stem(&self, name: &str) -> String {
        match self {
            Self::Event | Self::EventHandler => {
                to_snake_case(event_base_name(&normalize_event_struct_name(name)))
            }
            _ => to_snake_case(&to_pascal_case(name)),
        }
    }

    /// Location of a DDD artifact's single file.
    ///
    /// Event handlers live in the application package, everything else in
    /// the domain package.
    pub fn file_path(
        &self,
        layout: &ProjectLayout,
        domain: &str,
        name: &str,
    ) -> Result<PathBuf, DomainError> {
        let prefix = self
            .file_prefix()
            .ok_or_else(|| DomainError::UnknownArtifactKind(self.as_str().to_string()))?;
        let package = package_name(domain);
        let file = format!("{prefix}{}.go", self.file_stem(name));
        let dir = match self {
            Self::EventHandler => layout.app_package_dir(&package),
            _ => layout.domain_package_dir(&package),
        };
        Ok(dir.join(file))
    }

    /// Artifact name from a file name, when the file belongs to this kind.
    ///
    /// `event_` also prefixes `event_handler_` files in the application
    /// package; those never share a directory with events.
    pub fn name_from_file(&self, file: &str) -> Option<String> {
        let stem = file
            .strip_prefix(self.file_prefix()?)?
            .strip_suffix(".go")?;
        (!stem.is_empty()).then(|| to_pascal_case(stem))
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "domain" => Ok(Self::Domain),
            "service" => Ok(Self::Service),
            "valueobject" | "value_object" | "valueobjects" => Ok(Self::ValueObject),
            "spec" | "specs" | "specification" => Ok(Self::Specification),
            "policy" | "policies" => Ok(Self::Policy),
            "event" | "events" => Ok(Self::Event),
            "event_handler" | "eventhandler" | "event_handlers" => Ok(Self::EventHandler),
            other => Err(DomainError::UnknownArtifactKind(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aliases() {
        assert_eq!("valueobject".parse(), Ok(ArtifactKind::ValueObject));
        assert_eq!("event-handler".parse(), Ok(ArtifactKind::EventHandler));
        assert_eq!("Spec".parse(), Ok(ArtifactKind::Specification));
        assert!("widget".parse::<ArtifactKind>().is_err());
    }

    #[test]
    fn file_paths_follow_prefix_convention() {
        let layout = ProjectLayout::new("/p", "m");
        assert_eq!(
            ArtifactKind::ValueObject.file_path(&layout, "order", "ShippingAddress").unwrap(),
            PathBuf::from("/p/internal/domain/order/value_object_shipping_address.go")
        );
        assert_eq!(
            ArtifactKind::Event.file_path(&layout, "order", "OrderPaidEvent").unwrap(),
            PathBuf::from("/p/internal/domain/order/event_order_paid.go")
        );
        assert_eq!(
            ArtifactKind::EventHandler.file_path(&layout, "order", "OrderPaid").unwrap(),
            PathBuf::from("/p/internal/application/order/event_handler_order_paid.go")
        );
        assert!(ArtifactKind::Domain.file_path(&layout, "order", "x").is_err());
    }

    #[test]
    fn type_names() {
        assert_eq!(ArtifactKind::Policy.type_name("refund_policy"), "RefundPolicy");
        assert_eq!(ArtifactKind::Event.type_name("paid"), "PaidEvent");
        assert_eq!(ArtifactKind::EventHandler.type_name("OrderPaid"), "OrderPaidHandler");
    }

    #[test]
    fn names_round_trip_through_files() {
        assert_eq!(
            ArtifactKind::Specification.name_from_file("spec_paid_order.go"),
            Some("PaidOrder".into())
        );
        assert_eq!(ArtifactKind::Policy.name_from_file("spec_x.go"), None);
        assert_eq!(ArtifactKind::Policy.name_from_file("policy_.go"), None);
    }
}
