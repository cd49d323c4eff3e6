//! Identifier normalisation for generated Go code.
//!
//! Every name the generator emits (struct names, file names, JSON tags,
//! table names, route segments, enum constants, event topics) is derived from
//! free-form user input through the pure functions in this module.
//!
//! ```text
//!   "order_item"  ──to_pascal_case──▶  "OrderItem"
//!   "OrderItem"   ──to_snake_case───▶  "order_item"
//!   "category"    ──pluralize───────▶  "categories"
//!   "in-stock"    ──enum_const──────▶  "InStock"
//! ```
//!
//! Pluralisation is a suffix heuristic, not a dictionary.

/// Converts `PascalCase`, `camelCase`, `kebab-case` or `snake_case` to
/// `snake_case`.
///
/// An underscore is inserted before every upper-case ASCII letter that is not
/// at the start of a word, so acronyms split letter by letter
/// (`HTTPServer` → `h_t_t_p_server`).
pub fn to_snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for c in s.chars() {
        if c == '-' || c == ' ' || c == '_' {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }
        if c.is_ascii_uppercase() && !out.is_empty() && !out.ends_with('_') {
            out.push('_');
        }
        out.push(c.to_ascii_lowercase());
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}

/// Converts any supported casing to `PascalCase`.
///
/// Words are found the same way [`to_snake_case`] finds them, then each word
/// is capitalised and the rest lower-cased. For identifiers made of ASCII
/// letters `to_pascal_case(&to_snake_case(x))` reproduces `to_pascal_case(x)`.
pub fn to_pascal_case(s: &str) -> String {
    to_snake_case(s)
        .split('_')
        .filter(|part| !part.is_empty())
        .map(capitalize)
        .collect()
}

/// Converts any supported casing to `camelCase`.
pub fn to_camel_case(s: &str) -> String {
    lower_first(&to_pascal_case(s))
}

/// Upper-cases the first character and leaves the rest untouched.
pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Lower-cases the first character and leaves the rest untouched.
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

fn capitalize(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    upper_first(&lower)
}

/// Returns the plural form used for table names and route bases.
///
/// The result is always lower case.
pub fn pluralize(name: &str) -> String {
    let lower = name.to_ascii_lowercase();
    if ["s", "x", "z", "ch", "sh"]
        .iter()
        .any(|suffix| lower.ends_with(suffix))
    {
        return lower + "es";
    }
    if let Some(stem) = lower.strip_suffix('y') {
        let consonant_before = stem
            .chars()
            .last()
            .is_some_and(|c| !matches!(c, 'a' | 'e' | 'i' | 'o' | 'u'));
        if consonant_before {
            return format!("{stem}ies");
        }
    }
    lower + "s"
}

/// Converts an enum value to a valid Go constant suffix.
///
/// Non-alphanumerics become word breaks, an empty result becomes `Value`,
/// and a leading digit gets a `Value` prefix (`"2fa"` → `Value2fa`).
pub fn enum_const(value: &str) -> String {
    let cleaned: String = value
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let normalized = cleaned.trim_matches('_').to_ascii_lowercase();
    if normalized.is_empty() {
        return "Value".to_string();
    }

    let result: String = normalized
        .split('_')
        .filter(|part| !part.is_empty())
        .map(capitalize)
        .collect();
    if result.starts_with(|c: char| c.is_ascii_digit()) {
        format!("Value{result}")
    } else {
        result
    }
}

/// Go package name for a domain: the lower-cased identifier.
pub fn package_name(name: &str) -> String {
    to_pascal_case(name).to_ascii_lowercase()
}

/// Appends `Service` exactly once: `Order` → `OrderService`.
pub fn normalize_service_name(name: &str) -> String {
    let base = name.trim();
    let base = base.strip_suffix("Service").unwrap_or(base);
    format!("{}Service", to_pascal_case(base))
}

/// Normalises a specification or policy target type.
///
/// Returns the type and whether it is the `any` placeholder.
pub fn normalize_target_type(target: Option<&str>) -> (String, bool) {
    let target = target.map(str::trim).unwrap_or_default();
    if target.is_empty() {
        return ("any".to_string(), true);
    }
    (target.trim_start_matches('*').to_string(), false)
}

/// Canonicalises an event name to end in exactly one `Event` suffix.
pub fn normalize_event_struct_name(name: &str) -> String {
    let pascal = to_pascal_case(name);
    let stem = if pascal.to_ascii_lowercase().ends_with("event") {
        &pascal[..pascal.len() - "event".len()]
    } else {
        pascal.as_str()
    };
    format!("{stem}Event")
}

/// The event name without its `Event` suffix.
pub fn event_base_name(event_struct_name: &str) -> &str {
    event_struct_name
        .strip_suffix("Event")
        .unwrap_or(event_struct_name)
}

/// Derives the event topic `<domain>.<event-base-snake>`.
///
/// An explicit non-blank topic wins. Otherwise the domain's own PascalCase
/// prefix is stripped from the event base so `UserActivatedEvent` in domain
/// `user` becomes `user.activated`.
pub fn normalize_event_topic(topic: Option<&str>, domain: &str, event_struct_name: &str) -> String {
    if let Some(topic) = topic.map(str::trim).filter(|t| !t.is_empty()) {
        return topic.to_string();
    }

    let domain = package_name(domain);
    let base = event_base_name(event_struct_name);
    let domain_pascal = to_pascal_case(&domain);
    let base = base.strip_prefix(domain_pascal.as_str()).unwrap_or(base).trim();
    let base = if base.is_empty() { "event" } else { base };

    format!("{}.{}", domain, to_snake_case(base))
}

/// Handler type name for an event: `OrderPaidEvent` → `OrderPaidHandler`.
pub fn event_handler_name(event_struct_name: &str) -> String {
    format!("{}Handler", event_base_name(event_struct_name))
}

/// Whether `name` is acceptable as an artifact or project name: an ASCII
/// letter followed by letters, digits, `_` or `-`.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
