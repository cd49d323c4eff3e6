//! Best-effort recovery of artifact details from generated Go source.
//!
//! Scanning is line oriented and only understands the shapes the built-in
//! templates emit. It is the fallback for artifacts that predate the
//! manifest.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::domain::field::{FieldConfig, FieldType, is_reserved_field};
use crate::domain::naming::{lower_first, to_snake_case};

static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]+)""#).expect("quoted literal regex"));
static TARGET_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"target\s+([^\),]+)").expect("target parameter regex"));
static STRUCT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(\w+):"([^"]*)""#).expect("struct tag regex"));

// ── View types ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDetail {
    pub name: String,
    pub snake_name: String,
    pub go_type: String,
    /// Semantic type (`string`, `time?`, `enum`, ...).
    #[serde(rename = "type")]
    pub type_name: String,
    pub is_enum: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub gorm_tag: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub json_tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl From<&FieldDetail> for FieldConfig {
    fn from(detail: &FieldDetail) -> Self {
        FieldConfig {
            name: detail.snake_name.clone(),
            type_name: detail.type_name.clone(),
            comment: detail.comment.clone(),
            enum_values: detail.enum_values.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainSummary {
    pub name: String,
    pub package: String,
    pub module_path: String,
    pub fields: Vec<String>,
    pub has_repository: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DomainFiles {
    pub entity: bool,
    pub repository: bool,
    pub events: bool,
    pub repo_impl: bool,
    pub commands: bool,
    pub queries: bool,
    pub dto: bool,
    pub module: bool,
    pub handler: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainDetail {
    pub name: String,
    pub package: String,
    pub fields: Vec<FieldDetail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    pub files: DomainFiles,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    DomainService,
    CrossDomainService,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceMethodInfo {
    pub name: String,
    pub camel_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceInfo {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    pub methods: Vec<ServiceMethodInfo>,
    #[serde(rename = "type")]
    pub service_type: ServiceType,
}

/// What `service <name>` would do, without doing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceDetection {
    pub service_name: String,
    pub domain_name: String,
    pub domain_exists: bool,
    pub service_type: ServiceType,
    pub target_dir: String,
    pub should_reuse_dto: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_dto_path: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArtifactItem {
    pub name: String,
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArtifactListing {
    pub value_objects: Vec<ArtifactItem>,
    pub specs: Vec<ArtifactItem>,
    pub policies: Vec<ArtifactItem>,
    pub events: Vec<ArtifactItem>,
    pub event_handlers: Vec<ArtifactItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArtifactDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactSource {
    pub file: String,
    pub content: String,
}

// ── Scanners ─────────────────────────────────────────────────────────────────

fn first_quoted(line: &str) -> Option<String> {
    QUOTED.captures(line).map(|c| c[1].to_string())
}

/// Values of every `const (...)` block, grouped by declared type.
///
/// A value line without an explicit type inherits the previous line's type.
pub fn parse_enum_values(content: &str) -> BTreeMap<String, Vec<String>> {
    let mut enums: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut in_const = false;
    let mut last_type = String::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("const (") {
            in_const = true;
            continue;
        }
        if in_const && trimmed.starts_with(')') {
            in_const = false;
            last_type.clear();
            continue;
        }
        if !in_const || trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }
        let code = trimmed.split("//").next().unwrap_or_default();
        if !code.contains('"') {
            continue;
        }
        let parts: Vec<&str> = code.split_whitespace().collect();
        if parts.len() >= 3 && parts[1] != "=" {
            last_type = parts[1].to_string();
        }
        if last_type.is_empty() {
            continue;
        }
        if let Some(value) = first_quoted(code) {
            enums.entry(last_type.clone()).or_default().push(value);
        }
    }

    enums
}

/// Semantic type for a Go field type. Unknown types read back as `string`.
pub fn map_go_type(go_type: &str, enums: &BTreeMap<String, Vec<String>>) -> String {
    if enums.contains_key(go_type) {
        return FieldType::Enum.as_str().to_string();
    }
    FieldType::from_go_type(go_type)
        .unwrap_or(FieldType::String)
        .as_str()
        .to_string()
}

struct RawField<'a> {
    name: &'a str,
    go_type: &'a str,
    tags: &'a str,
    comment: Option<String>,
}

/// Fields of `type <struct_name> struct { ... }`, skipping embedded types.
fn raw_struct_fields<'a>(content: &'a str, struct_name: &str) -> Vec<RawField<'a>> {
    let header = format!("type {struct_name} struct");
    let mut fields = Vec::new();
    let mut in_struct = false;

    for line in content.lines() {
        let trimmed = line.trim();
        if !in_struct {
            in_struct = trimmed.starts_with(&header);
            continue;
        }
        if trimmed.starts_with('}') {
            break;
        }
        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }

        let (code, comment) = match trimmed.split_once("//") {
            Some((code, comment)) => (code.trim(), Some(comment.trim().to_string())),
            None => (trimmed, None),
        };
        let (decl, tags) = match code.split_once('`') {
            Some((decl, tags)) => (decl.trim(), tags.trim_end_matches('`')),
            None => (code, ""),
        };
        let mut parts = decl.split_whitespace();
        let (Some(name), Some(go_type)) = (parts.next(), parts.next()) else {
            continue;
        };
        fields.push(RawField {
            name,
            go_type,
            tags,
            comment: comment.filter(|c| !c.is_empty()),
        });
    }

    fields
}

/// Field declarations of a struct in the shape accepted by generation
/// requests, for value objects and events.
///
/// A field is an enum only when its Go type is the declared type of a
/// `const (...)` block in the same file.
pub fn parse_struct_fields(content: &str, struct_name: &str) -> Vec<FieldConfig> {
    let enums = parse_enum_values(content);
    raw_struct_fields(content, struct_name)
        .into_iter()
        .map(|raw| {
            let type_name = map_go_type(raw.go_type, &enums);
            let enum_values = if type_name == "enum" {
                enums.get(raw.go_type).cloned().unwrap_or_default()
            } else {
                Vec::new()
            };
            FieldConfig {
                name: to_snake_case(raw.name),
                type_name,
                comment: raw.comment,
                enum_values,
            }
        })
        .collect()
}

fn tag_value(tags: &str, key: &str) -> String {
    STRUCT_TAG
        .captures_iter(tags)
        .find(|c| &c[1] == key)
        .map(|c| c[2].to_string())
        .unwrap_or_default()
}

/// Entity fields with storage details; aggregate-root fields are omitted.
pub fn parse_entity_fields(content: &str, entity: &str) -> Vec<FieldDetail> {
    let enums = parse_enum_values(content);
    raw_struct_fields(content, entity)
        .into_iter()
        .filter(|raw| !raw.name.eq_ignore_ascii_case("id") && !is_reserved_field(raw.name))
        .map(|raw| {
            let type_name = map_go_type(raw.go_type, &enums);
            let is_enum = type_name == "enum";
            let json_tag = tag_value(raw.tags, "json");
            let snake_name = json_tag
                .split(',')
                .next()
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| to_snake_case(raw.name));
            FieldDetail {
                name: raw.name.to_string(),
                snake_name,
                go_type: raw.go_type.to_string(),
                enum_values: if is_enum {
                    enums.get(raw.go_type).cloned().unwrap_or_default()
                } else {
                    Vec::new()
                },
                type_name,
                is_enum,
                gorm_tag: tag_value(raw.tags, "gorm"),
                json_tag,
                comment: raw.comment,
            }
        })
        .collect()
}

/// The string literal returned by the function whose signature contains
/// `signature`, e.g. `EventName() string`.
pub fn parse_returned_string(content: &str, signature: &str) -> Option<String> {
    let mut in_func = false;
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.contains(signature) {
            in_func = true;
            if let Some((_, body)) = trimmed.split_once("return ") {
                return first_quoted(body);
            }
            continue;
        }
        if !in_func {
            continue;
        }
        if trimmed.starts_with("return ") {
            if let Some(value) = first_quoted(trimmed) {
                return Some(value);
            }
        }
        if trimmed.starts_with('}') {
            in_func = false;
        }
    }
    None
}

pub fn parse_event_topic(content: &str) -> Option<String> {
    parse_returned_string(content, "EventName() string")
}

pub fn parse_table_name(content: &str) -> Option<String> {
    parse_returned_string(content, "TableName() string")
}

/// Target type of a specification (`IsSatisfiedBy`) or policy (`Validate`).
///
/// `any` reads back as `None`; a package qualifier is dropped.
pub fn parse_target_type(content: &str, method: &str) -> Option<String> {
    let call = format!("{method}(");
    content
        .lines()
        .map(str::trim)
        .filter(|line| line.contains(&call))
        .find_map(|line| TARGET_PARAM.captures(line))
        .and_then(|c| {
            let target = c[1].trim().trim_start_matches('*');
            if target == "any" {
                return None;
            }
            let target = target.rsplit('.').next().unwrap_or(target);
            Some(target.to_string())
        })
}

/// Name of the first struct that embeds `ddd.BaseDomainEvent`.
pub fn parse_event_struct_name(content: &str) -> Option<String> {
    let mut current: Option<&str> = None;
    let mut has_base = false;

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("type ") && trimmed.contains(" struct") {
            current = trimmed.split_whitespace().nth(1);
            has_base = false;
            continue;
        }
        if current.is_none() {
            continue;
        }
        if trimmed.starts_with('}') {
            if has_base {
                return current.map(str::to_string);
            }
            current = None;
            continue;
        }
        if trimmed.contains("ddd.BaseDomainEvent") {
            has_base = true;
        }
    }
    None
}

fn struct_names(content: &str) -> impl Iterator<Item = &str> {
    content
        .lines()
        .map(str::trim)
        .filter_map(|line| line.strip_prefix("type "))
        .filter_map(|rest| rest.split_once(" struct").map(|(name, _)| name.trim()))
}

/// The entity struct of a domain package: the struct whose lower-cased
/// name equals the package name.
pub fn parse_entity_name(content: &str, package: &str) -> Option<String> {
    struct_names(content)
        .find(|name| name.eq_ignore_ascii_case(package))
        .map(str::to_string)
}

/// The first struct named `*Service`.
pub fn parse_service_struct_name(content: &str) -> Option<String> {
    struct_names(content)
        .find(|name| name.ends_with("Service") && *name != "Service")
        .map(str::to_string)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventHandlerSummary {
    /// Event name without the `Event` suffix.
    pub event_name: String,
    pub topic: Option<String>,
    pub domain_package: Option<String>,
}

/// Reads the handled event from the `evt.(*pkg.XEvent)` assertion and the
/// topic from the `Subscribe(` call.
pub fn parse_event_handler_summary(content: &str) -> Option<EventHandlerSummary> {
    let mut summary = EventHandlerSummary::default();

    for line in content.lines() {
        let trimmed = line.trim();
        if let Some((_, after)) = trimmed.split_once("evt.(*") {
            if let Some((type_name, _)) = after.split_once(')') {
                let (package, name) = match type_name.rsplit_once('.') {
                    Some((package, name)) => (Some(package.to_string()), name),
                    None => (None, type_name),
                };
                summary.domain_package = package;
                summary.event_name = name.strip_suffix("Event").unwrap_or(name).to_string();
            }
        }
        if trimmed.contains("Subscribe(") {
            if let Some(topic) = first_quoted(trimmed) {
                summary.topic = Some(topic);
            }
        }
    }

    (!summary.event_name.is_empty()).then_some(summary)
}

fn parse_remark(content: &str, prefix: &str) -> Option<String> {
    content
        .lines()
        .filter_map(|line| line.trim().strip_prefix(prefix))
        .map(str::trim)
        .find(|remark| !remark.is_empty())
        .map(str::to_string)
}

/// `// ServiceRemark: ...` line of a service file.
pub fn parse_service_remark(content: &str) -> Option<String> {
    parse_remark(content, "// ServiceRemark:")
}

/// `// DomainRemark: ...` line of an entity file.
pub fn parse_domain_remark(content: &str) -> Option<String> {
    parse_remark(content, "// DomainRemark:")
}

fn split_method_remark(payload: &str) -> Option<(String, String)> {
    let payload = payload.trim();
    if payload.is_empty() {
        return None;
    }
    let (name, remark) = payload
        .split_once("::")
        .or_else(|| payload.split_once(' '))
        .unwrap_or((payload, ""));
    Some((name.trim().to_string(), remark.trim().to_string()))
}

/// Methods declared on any receiver, with `// MethodRemark: Name::remark`
/// annotations attached.
pub fn parse_service_methods(content: &str) -> Vec<ServiceMethodInfo> {
    let remarks: BTreeMap<String, String> = content
        .lines()
        .filter_map(|line| line.trim().strip_prefix("// MethodRemark:"))
        .filter_map(split_method_remark)
        .collect();

    content
        .lines()
        .map(str::trim)
        .filter_map(|line| line.strip_prefix("func ("))
        .filter_map(|rest| rest.split_once(") ").map(|(_, method)| method))
        .filter_map(|method| method.split_once('(').map(|(name, _)| name.trim()))
        .filter(|name| !name.is_empty())
        .map(|name| ServiceMethodInfo {
            name: name.to_string(),
            camel_name: lower_first(name),
            remark: remarks.get(name).filter(|r| !r.is_empty()).cloned(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENTITY: &str = r#"package order

type OrderStatus string

const (
	OrderStatusPending OrderStatus = "pending"
	OrderStatusPaid    OrderStatus = "paid"
)

type Shade string

const (
	ShadeDark Shade = "dark"
)

type Order struct {
	ddd.BaseAggregateRoot
	ID        string      `gorm:"primaryKey" json:"id"`
	Total     int64       `gorm:"not null;default:0" json:"total"` // in cents
	Status    OrderStatus `gorm:"size:50;default:'pending'" json:"status"`
	PaidAt    *time.Time  `json:"paid_at"`
	CreatedAt time.Time   `json:"created_at"`
}

func (Order) TableName() string {
	return "orders"
}
"#;

    #[test]
    fn entity_fields_skip_base_and_reserved_fields() {
        let fields = parse_entity_fields(ENTITY, "Order");
        let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["Total", "Status", "PaidAt"]);

        assert_eq!(fields[0].type_name, "int64");
        assert_eq!(fields[0].gorm_tag, "not null;default:0");
        assert_eq!(fields[0].comment.as_deref(), Some("in cents"));
        assert!(fields[1].is_enum);
        assert_eq!(fields[1].enum_values, ["pending", "paid"]);
        assert_eq!(fields[2].type_name, "time?");
        assert_eq!(fields[2].snake_name, "paid_at");
    }

    #[test]
    fn unused_const_types_are_not_reported_as_fields() {
        let fields = parse_struct_fields(ENTITY, "Order");
        assert!(fields.iter().all(|f| f.enum_values != ["dark"]));
        assert_eq!(parse_enum_values(ENTITY)["Shade"], ["dark"]);
    }

    #[test]
    fn reads_table_name_and_topic() {
        assert_eq!(parse_table_name(ENTITY).as_deref(), Some("orders"));
        let event = "func (e *OrderPaidEvent) EventName() string {\n\treturn \"order.paid\"\n}\n";
        assert_eq!(parse_event_topic(event).as_deref(), Some("order.paid"));
    }

    #[test]
    fn target_type_drops_any_and_package() {
        let spec = "func (s PaidSpec) IsSatisfiedBy(ctx context.Context, target *order.Order) bool {";
        assert_eq!(parse_target_type(spec, "IsSatisfiedBy").as_deref(), Some("Order"));
        let any = "func (p RefundPolicy) Validate(ctx context.Context, target any) error {";
        assert_eq!(parse_target_type(any, "Validate"), None);
    }

    #[test]
    fn event_struct_requires_base_event() {
        let src = "type Payload struct {\n\tA string\n}\n\ntype OrderPaidEvent struct {\n\tddd.BaseDomainEvent\n\tAmount int64\n}\n";
        assert_eq!(parse_event_struct_name(src).as_deref(), Some("OrderPaidEvent"));
        let fields = parse_struct_fields(src, "OrderPaidEvent");
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "amount");
        assert_eq!(fields[0].type_name, "int64");
    }

    #[test]
    fn event_handler_summary() {
        let src = r#"
func RegisterOrderPaidHandler(bus event.EventBus, h *OrderPaidHandler) error {
	return bus.Subscribe("order.paid", h.Handle)
}

func (h *OrderPaidHandler) Handle(ctx context.Context, evt ddd.DomainEvent) error {
	e, ok := evt.(*order.OrderPaidEvent)
"#;
        let summary = parse_event_handler_summary(src).unwrap();
        assert_eq!(summary.event_name, "OrderPaid");
        assert_eq!(summary.topic.as_deref(), Some("order.paid"));
        assert_eq!(summary.domain_package.as_deref(), Some("order"));
        assert!(parse_event_handler_summary("package x").is_none());
    }

    #[test]
    fn service_methods_and_remarks() {
        let src = r#"// ServiceRemark: Order orchestration
type OrderService struct{}

// MethodRemark: PlaceOrder::Places an order
func (s *OrderService) PlaceOrder(ctx context.Context, req PlaceOrderServiceRequest) (*PlaceOrderServiceResponse, error) {
	return nil, nil
}

func (s *OrderService) Cancel(ctx context.Context) error {
"#;
        assert_eq!(parse_service_remark(src).as_deref(), Some("Order orchestration"));
        let methods = parse_service_methods(src);
        assert_eq!(methods.len(), 2);
        assert_eq!(methods[0].name, "PlaceOrder");
        assert_eq!(methods[0].camel_name, "placeOrder");
        assert_eq!(methods[0].remark.as_deref(), Some("Places an order"));
        assert_eq!(methods[1].remark, None);
    }

    #[test]
    fn struct_names_by_convention() {
        let src = "type OrderItem struct {\n}\n\ntype orderItemRow struct{}\ntype OrderItemService struct {\n";
        assert_eq!(parse_entity_name(src, "orderitem").as_deref(), Some("OrderItem"));
        assert_eq!(parse_entity_name(src, "payment"), None);
        assert_eq!(parse_service_struct_name(src).as_deref(), Some("OrderItemService"));
    }
}
