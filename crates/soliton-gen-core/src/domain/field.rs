//! Field types and field resolution.
//!
//! A [`FieldConfig`] is what the user typed; a [`Field`] is everything a
//! template needs to emit that field in every layer (entity struct, GORM tag,
//! DTO binding tags, enum constants).

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::naming::{enum_const, to_camel_case, to_pascal_case, to_snake_case};

// ── FieldType ────────────────────────────────────────────────────────────────

/// The closed set of semantic field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    #[serde(rename = "string")]
    String,
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "int")]
    Int,
    #[serde(rename = "int64")]
    Int64,
    #[serde(rename = "float64")]
    Float64,
    #[serde(rename = "decimal")]
    Decimal,
    #[serde(rename = "bool")]
    Bool,
    #[serde(rename = "time")]
    Time,
    #[serde(rename = "time?")]
    OptionalTime,
    #[serde(rename = "date")]
    Date,
    #[serde(rename = "date?")]
    OptionalDate,
    #[serde(rename = "uuid")]
    Uuid,
    #[serde(rename = "enum")]
    Enum,
    #[serde(rename = "json")]
    Json,
    #[serde(rename = "jsonb")]
    Jsonb,
    #[serde(rename = "bytes")]
    Bytes,
}

impl FieldType {
    pub const ALL: [FieldType; 16] = [
        Self::String,
        Self::Text,
        Self::Int,
        Self::Int64,
        Self::Float64,
        Self::Decimal,
        Self::Bool,
        Self::Time,
        Self::OptionalTime,
        Self::Date,
        Self::OptionalDate,
        Self::Uuid,
        Self::Enum,
        Self::Json,
        Self::Jsonb,
        Self::Bytes,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Text => "text",
            Self::Int => "int",
            Self::Int64 => "int64",
            Self::Float64 => "float64",
            Self::Decimal => "decimal",
            Self::Bool => "bool",
            Self::Time => "time",
            Self::OptionalTime => "time?",
            Self::Date => "date",
            Self::OptionalDate => "date?",
            Self::Uuid => "uuid",
            Self::Enum => "enum",
            Self::Json => "json",
            Self::Jsonb => "jsonb",
            Self::Bytes => "bytes",
        }
    }

    pub const fn description(&self) -> &'static str {
        match self {
            Self::String => "String (varchar 255)",
            Self::Text => "Text (long text)",
            Self::Int => "Integer (32-bit)",
            Self::Int64 => "Integer (64-bit)",
            Self::Float64 => "Float (64-bit)",
            Self::Decimal => "Decimal (10,2)",
            Self::Bool => "Boolean",
            Self::Time => "Timestamp",
            Self::OptionalTime => "Optional Timestamp",
            Self::Date => "Date",
            Self::OptionalDate => "Optional Date",
            Self::Uuid => "UUID (indexed)",
            Self::Enum => "Enum (requires enum_values)",
            Self::Json => "JSON document",
            Self::Jsonb => "JSONB document",
            Self::Bytes => "Binary data",
        }
    }

    /// Go type and GORM tag for non-enum types.
    ///
    /// Tags include their surrounding backticks; an empty tag means none.
    pub const fn storage(&self) -> (&'static str, &'static str) {
        match self {
            Self::String | Self::Enum => ("string", "`gorm:\"size:255\"`"),
            Self::Text => ("string", "`gorm:\"type:text\"`"),
            Self::Int => ("int", "`gorm:\"not null;default:0\"`"),
            Self::Int64 => ("int64", "`gorm:\"not null;default:0\"`"),
            Self::Float64 => ("float64", "`gorm:\"default:0\"`"),
            Self::Decimal => ("float64", "`gorm:\"type:decimal(10,2);default:0\"`"),
            Self::Bool => ("bool", "`gorm:\"default:false\"`"),
            Self::Time => ("time.Time", "`gorm:\"type:timestamp\"`"),
            Self::OptionalTime => ("*time.Time", ""),
            Self::Date => ("time.Time", "`gorm:\"type:date\"`"),
            Self::OptionalDate => ("*time.Time", "`gorm:\"type:date\"`"),
            Self::Uuid => ("string", "`gorm:\"size:36;index\"`"),
            Self::Json => ("datatypes.JSON", ""),
            Self::Jsonb => ("datatypes.JSON", "`gorm:\"type:jsonb\"`"),
            Self::Bytes => ("[]byte", "`gorm:\"type:bytes\"`"),
        }
    }

    /// Maps a Go type found in generated source back to a field type.
    pub fn from_go_type(go_type: &str) -> Option<Self> {
        let optional = go_type.starts_with('*');
        match go_type.trim_start_matches('*') {
            "string" => Some(Self::String),
            "int" => Some(Self::Int),
            "int64" => Some(Self::Int64),
            "float64" => Some(Self::Float64),
            "bool" => Some(Self::Bool),
            "time.Time" if optional => Some(Self::OptionalTime),
            "time.Time" => Some(Self::Time),
            "datatypes.JSON" => Some(Self::Json),
            "[]byte" => Some(Self::Bytes),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "string" | "str" => Ok(Self::String),
            "text" => Ok(Self::Text),
            "int" | "integer" => Ok(Self::Int),
            "int64" | "long" => Ok(Self::Int64),
            "float" | "float64" | "double" => Ok(Self::Float64),
            "decimal" => Ok(Self::Decimal),
            "bool" | "boolean" => Ok(Self::Bool),
            "time" | "datetime" | "timestamp" => Ok(Self::Time),
            "time?" | "datetime?" => Ok(Self::OptionalTime),
            "date" => Ok(Self::Date),
            "date?" => Ok(Self::OptionalDate),
            "uuid" | "id" => Ok(Self::Uuid),
            "enum" => Ok(Self::Enum),
            "json" => Ok(Self::Json),
            "jsonb" => Ok(Self::Jsonb),
            "bytes" | "binary" | "blob" => Ok(Self::Bytes),
            _ => Err(()),
        }
    }
}

// ── FieldConfig ──────────────────────────────────────────────────────────────

/// A user-supplied field declaration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldConfig {
    pub name: String,
    #[serde(rename = "type", default)]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
}

impl FieldConfig {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    pub fn with_enum_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Splits an inline `enum(a|b|c)` type into `enum` plus values.
    fn normalized(&self) -> (String, Vec<String>) {
        let raw = self.type_name.trim();
        if let Some(inner) = raw
            .strip_prefix("enum(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let mut values = parse_enum_values(inner);
            for value in &self.enum_values {
                if !values.contains(value) {
                    values.push(value.clone());
                }
            }
            return ("enum".to_string(), values);
        }
        (raw.to_string(), self.enum_values.clone())
    }
}

/// Parses the comma-separated CLI syntax `name[:type[:comment]]`.
///
/// `status:enum(active|inactive)` declares an enum inline. Empty entries are
/// ignored; validation happens later in [`resolve_fields`].
pub fn parse_fields(spec: &str) -> Vec<FieldConfig> {
    split_top_level(spec)
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(parse_field_definition)
        .collect()
}

fn parse_field_definition(def: &str) -> FieldConfig {
    let (name, rest) = match def.split_once(':') {
        Some((name, rest)) => (name.trim(), rest.trim()),
        None => (def.trim(), ""),
    };

    // A comment follows the type, but enum(...) may not contain ':'.
    let (type_name, comment) = match rest.find(':') {
        Some(idx) if !rest[..idx].contains('(') || rest[..idx].contains(')') => {
            (rest[..idx].trim(), Some(rest[idx + 1..].trim()))
        }
        _ => (rest, None),
    };

    FieldConfig {
        name: name.to_string(),
        type_name: type_name.to_string(),
        comment: comment.filter(|c| !c.is_empty()).map(str::to_string),
        enum_values: Vec::new(),
    }
}

/// Splits on commas that are not inside parentheses.
fn split_top_level(spec: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (idx, c) in spec.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&spec[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(&spec[start..]);
    parts
}

fn parse_enum_values(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

// ── Field ────────────────────────────────────────────────────────────────────

/// One enum constant: `OrderStatusActive = "active"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumConstant {
    pub name: String,
    pub value: String,
}

/// A fully resolved field, ready for templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: String,
    pub snake_name: String,
    pub camel_name: String,
    pub field_type: FieldType,
    pub go_type: String,
    /// Go type as seen from the application package (`order.OrderStatus`).
    pub app_go_type: String,
    pub gorm_tag: String,
    pub json_tag: String,
    pub comment: Option<String>,
    pub is_enum: bool,
    pub is_pointer: bool,
    pub enum_type: String,
    pub enum_values: Vec<String>,
    pub enum_constants: Vec<EnumConstant>,
    /// Gin binding suffix for create requests, e.g. ` binding:"required"`.
    pub create_binding: String,
    /// Gin binding suffix for update requests.
    pub update_binding: String,
}

impl From<&Field> for FieldConfig {
    fn from(field: &Field) -> Self {
        Self {
            name: field.name.clone(),
            type_name: field.field_type.as_str().to_string(),
            comment: field.comment.clone(),
            enum_values: field.enum_values.clone(),
        }
    }
}

/// Whether reserved aggregate-root names may be declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservedNames {
    Reject,
    Allow,
}

const RESERVED_FIELDS: [&str; 4] = ["id", "createdat", "updatedat", "deletedat"];

/// Whether `name` collides with a field the aggregate root already embeds,
/// ignoring case and underscores (`ID`, `Id`, `created_at`, `CreatedAT`).
pub fn is_reserved_field(name: &str) -> bool {
    let folded: String = name
        .chars()
        .filter(|c| *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect();
    RESERVED_FIELDS.contains(&folded.as_str())
}

/// Resolves user field declarations for an owner type (entity, value object
/// or event) living in Go package `package`.
///
/// Fails on the first invalid field.
pub fn resolve_fields(
    configs: &[FieldConfig],
    owner: &str,
    package: &str,
    reserved: ReservedNames,
) -> Result<Vec<Field>, DomainError> {
    let mut seen = HashSet::new();
    let mut fields = Vec::with_capacity(configs.len());

    for cfg in configs {
        let raw_name = cfg.name.trim();
        if raw_name.is_empty() {
            return Err(DomainError::InvalidField {
                field: String::new(),
                reason: "field name is empty".into(),
            });
        }
        let snake = to_snake_case(raw_name);
        if reserved == ReservedNames::Reject && is_reserved_field(raw_name) {
            return Err(DomainError::ReservedField {
                field: raw_name.to_string(),
            });
        }
        if !seen.insert(snake.clone()) {
            return Err(DomainError::DuplicateField { field: snake });
        }
        fields.push(resolve_field(cfg, owner, package)?);
    }

    Ok(fields)
}

fn resolve_field(cfg: &FieldConfig, owner: &str, package: &str) -> Result<Field, DomainError> {
    let name = to_pascal_case(&cfg.name);
    let snake_name = to_snake_case(&cfg.name);
    let (type_name, enum_values) = cfg.normalized();

    let field_type = match FieldType::from_str(&type_name) {
        Ok(_) if !enum_values.is_empty() => FieldType::Enum,
        Ok(t) => t,
        Err(()) => {
            return Err(DomainError::UnsupportedFieldType {
                field: cfg.name.clone(),
                type_name,
            });
        }
    };

    let mut field = Field {
        camel_name: to_camel_case(&cfg.name),
        json_tag: format!("`json:\"{snake_name}\"`"),
        comment: cfg
            .comment
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string),
        field_type,
        go_type: String::new(),
        app_go_type: String::new(),
        gorm_tag: String::new(),
        is_enum: false,
        is_pointer: false,
        enum_type: String::new(),
        enum_values: Vec::new(),
        enum_constants: Vec::new(),
        create_binding: String::new(),
        update_binding: String::new(),
        name,
        snake_name,
    };

    if field_type == FieldType::Enum {
        let Some(first) = enum_values.first() else {
            return Err(DomainError::InvalidField {
                field: cfg.name.clone(),
                reason: "enum requires at least one value".into(),
            });
        };
        let enum_type = format!("{}{}", to_pascal_case(owner), field.name);
        field.gorm_tag = format!("`gorm:\"size:50;default:'{first}'\"`");
        field.go_type = enum_type.clone();
        field.app_go_type = format!("{package}.{enum_type}");
        field.enum_constants = enum_values
            .iter()
            .map(|value| EnumConstant {
                name: format!("{enum_type}{}", enum_const(value)),
                value: value.clone(),
            })
            .collect();
        field.is_enum = true;
        field.enum_type = enum_type;
        field.enum_values = enum_values;
    } else {
        let (go_type, gorm_tag) = field_type.storage();
        field.go_type = go_type.to_string();
        field.app_go_type = go_type.to_string();
        field.gorm_tag = gorm_tag.to_string();
        field.is_pointer = go_type.starts_with('*');
    }

    field.create_binding = create_binding_tag(&field);
    field.update_binding = update_binding_tag(&field);
    Ok(field)
}

fn create_binding_tag(field: &Field) -> String {
    if field.is_pointer {
        return String::new();
    }
    if field.is_enum {
        return one_of_tag("required", &field.enum_values);
    }
    if field.go_type == "string" {
        return " binding:\"required\"".to_string();
    }
    String::new()
}

fn update_binding_tag(field: &Field) -> String {
    if !field.is_enum {
        return String::new();
    }
    one_of_tag("omitempty", &field.enum_values)
}

fn one_of_tag(prefix: &str, values: &[String]) -> String {
    format!(" binding:\"{prefix},oneof={}\"", values.join(" "))
}

/// `(has_time, has_enums)` for a resolved field list.
pub fn field_flags(fields: &[Field]) -> (bool, bool) {
    let has_time = fields.iter().any(|f| f.go_type.contains("time.Time"));
    let has_enums = fields.iter().any(|f| f.is_enum);
    (has_time, has_enums)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cli_field_syntax() {
        let fields = parse_fields("username, price:int64, status:enum(active|inactive), note:text:free form");
        assert_eq!(fields.len(), 4);
        assert_eq!(fields[0], FieldConfig::new("username", ""));
        assert_eq!(fields[1].type_name, "int64");
        assert_eq!(fields[2].type_name, "enum(active|inactive)");
        assert_eq!(fields[3].comment.as_deref(), Some("free form"));
    }

    #[test]
    fn empty_spec_yields_no_fields() {
        assert!(parse_fields("").is_empty());
        assert!(parse_fields(" , ,").is_empty());
    }

    #[test]
    fn type_aliases_parse_case_insensitively() {
        assert_eq!("INTEGER".parse(), Ok(FieldType::Int));
        assert_eq!("datetime?".parse(), Ok(FieldType::OptionalTime));
        assert_eq!("".parse(), Ok(FieldType::String));
        assert_eq!("id".parse(), Ok(FieldType::Uuid));
        assert!("money".parse::<FieldType>().is_err());
    }

    #[test]
    fn resolves_storage_types() {
        let cfgs = [
            FieldConfig::new("price", "int64"),
            FieldConfig::new("shipped_at", "time?"),
            FieldConfig::new("external_id", "uuid"),
        ];
        let fields = resolve_fields(&cfgs, "Order", "order", ReservedNames::Reject).unwrap();

        assert_eq!(fields[0].name, "Price");
        assert_eq!(fields[0].go_type, "int64");
        assert_eq!(fields[0].gorm_tag, "`gorm:\"not null;default:0\"`");
        assert_eq!(fields[0].create_binding, "");

        assert_eq!(fields[1].go_type, "*time.Time");
        assert!(fields[1].is_pointer);
        assert_eq!(fields[1].gorm_tag, "");
        assert_eq!(fields[1].camel_name, "shippedAt");

        assert_eq!(fields[2].gorm_tag, "`gorm:\"size:36;index\"`");
        assert_eq!(fields[2].create_binding, " binding:\"required\"");
        assert_eq!(fields[2].json_tag, "`json:\"external_id\"`");
    }

    #[test]
    fn enum_constants_are_prefixed_with_owner_and_field() {
        let cfgs = [FieldConfig::new("Status", "enum(active|in-active)")];
        let fields = resolve_fields(&cfgs, "Order", "order", ReservedNames::Reject).unwrap();
        let status = &fields[0];

        assert!(status.is_enum);
        assert_eq!(status.enum_type, "OrderStatus");
        assert_eq!(status.app_go_type, "order.OrderStatus");
        assert_eq!(status.gorm_tag, "`gorm:\"size:50;default:'active'\"`");
        let names: Vec<_> = status.enum_constants.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["OrderStatusActive", "OrderStatusInActive"]);
        assert_eq!(status.create_binding, " binding:\"required,oneof=active in-active\"");
        assert_eq!(status.update_binding, " binding:\"omitempty,oneof=active in-active\"");
    }

    #[test]
    fn enum_values_alone_make_an_enum() {
        let cfgs = [FieldConfig::new("kind", "").with_enum_values(["a", "b"])];
        let fields = resolve_fields(&cfgs, "Item", "item", ReservedNames::Reject).unwrap();
        assert!(fields[0].is_enum);
    }

    #[test]
    fn enum_without_values_is_rejected() {
        let cfgs = [FieldConfig::new("kind", "enum")];
        let err = resolve_fields(&cfgs, "Item", "item", ReservedNames::Reject).unwrap_err();
        assert!(matches!(err, DomainError::InvalidField { .. }));
    }

    #[test]
    fn unknown_type_fails_instead_of_defaulting() {
        let cfgs = [FieldConfig::new("name", "string"), FieldConfig::new("cost", "money")];
        let err = resolve_fields(&cfgs, "Item", "item", ReservedNames::Reject).unwrap_err();
        assert_eq!(
            err,
            DomainError::UnsupportedFieldType {
                field: "cost".into(),
                type_name: "money".into()
            }
        );
    }

    #[test]
    fn reserved_names_depend_on_policy() {
        let cfgs = [FieldConfig::new("CreatedAt", "time")];
        let err = resolve_fields(&cfgs, "Order", "order", ReservedNames::Reject).unwrap_err();
        assert_eq!(err, DomainError::ReservedField { field: "CreatedAt".into() });

        let ok = resolve_fields(&cfgs, "OrderPaidEvent", "order", ReservedNames::Allow).unwrap();
        assert_eq!(ok[0].go_type, "time.Time");
    }

    #[test]
    fn identity_fields_are_reserved_in_any_case() {
        for name in ["ID", "Id", "id", "CreatedAT", "updated_at", "DELETED_AT"] {
            assert!(is_reserved_field(name), "{name}");
        }
        for name in ["Identity", "order_id", "created", "valid"] {
            assert!(!is_reserved_field(name), "{name}");
        }

        let cfgs = [FieldConfig::new("ID", "string")];
        let err = resolve_fields(&cfgs, "Widget", "widget", ReservedNames::Reject).unwrap_err();
        assert_eq!(err, DomainError::ReservedField { field: "ID".into() });
    }

    #[test]
    fn duplicates_are_rejected() {
        let cfgs = [FieldConfig::new("title", ""), FieldConfig::new("Title", "text")];
        let err = resolve_fields(&cfgs, "Post", "post", ReservedNames::Reject).unwrap_err();
        assert_eq!(err, DomainError::DuplicateField { field: "title".into() });
    }

    #[test]
    fn flags_scan_resolved_fields() {
        let cfgs = [
            FieldConfig::new("due", "date"),
            FieldConfig::new("state", "enum(a|b)"),
        ];
        let fields = resolve_fields(&cfgs, "Task", "task", ReservedNames::Reject).unwrap();
        assert_eq!(field_flags(&fields), (true, true));
        assert_eq!(field_flags(&[]), (false, false));
    }
}
