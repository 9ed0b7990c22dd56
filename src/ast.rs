/// Product tree for a parsed API Blueprint.
///
/// The section processors build this tree; the resolution pass fills model
/// references; the emit layer traverses it to produce JSON or YAML.
///
/// Design principles:
/// - Plain data: pub fields, no behavior beyond small constructors.
/// - Scalar fields use the empty string for "absent" (names, descriptions,
///   bodies), matching how incomplete sections parse; structured options
///   use `Option`.
/// - Ordered collections preserve document order throughout.

use crate::mson::DataStructure;
use crate::symbol_table::SymbolTable;

/// The HTTP methods an action may carry without a warning.
pub const HTTP_METHODS: &[&str] = &[
    "GET", "HEAD", "POST", "PUT", "PATCH", "DELETE", "OPTIONS", "LINK", "UNLINK", "LOCK", "UNLOCK",
    "PROPFIND", "PROPPATCH", "COPY", "MOVE", "MKCOL",
];

/// True when the token is one of the recognized HTTP methods.
pub fn is_http_method(token: &str) -> bool {
    HTTP_METHODS.contains(&token)
}

/// One `key: value` pair from the leading metadata paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub name: String,
    pub value: String,
}

/// An HTTP header. Names preserve their source case; comparisons between
/// headers are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub value: String,
}

pub type Headers = Vec<Header>;

/// A parsed media type per RFC 6838: `type "/" subtype ["+" suffix]`
/// followed by `; key=value` parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaType {
    pub type_name: String,
    pub subtype: String,
    pub suffix: String,
    pub parameters: Vec<(String, String)>,
}

impl MediaType {
    /// Parse a media-type string. Unparseable pieces are left empty; an
    /// empty type or subtype marks the whole value as absent.
    pub fn parse(input: &str) -> MediaType {
        let mut parts = input.split(';');
        let essence = parts.next().unwrap_or("").trim();

        let (type_name, rest) = match essence.split_once('/') {
            Some((t, r)) => (t.trim().to_string(), r.trim()),
            None => (String::new(), ""),
        };
        let (subtype, suffix) = match rest.rsplit_once('+') {
            Some((s, x)) => (s.trim().to_string(), x.trim().to_string()),
            None => (rest.to_string(), String::new()),
        };

        let mut parameters = Vec::new();
        for param in parts {
            if let Some((key, value)) = param.split_once('=') {
                parameters.push((key.trim().to_string(), value.trim().to_string()));
            }
        }

        MediaType {
            type_name,
            subtype,
            suffix,
            parameters,
        }
    }

    /// Serialize back to the canonical string form. A media type missing its
    /// type or subtype serializes to the empty string.
    pub fn serialize(&self) -> String {
        if self.type_name.is_empty() || self.subtype.is_empty() {
            return String::new();
        }

        let mut out = format!("{}/{}", self.type_name, self.subtype);
        if !self.suffix.is_empty() {
            out.push('+');
            out.push_str(&self.suffix);
        }
        for (key, value) in &self.parameters {
            out.push_str("; ");
            out.push_str(key);
            out.push('=');
            out.push_str(&quote_parameter(value));
        }
        out
    }
}

fn is_token_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(ch)
}

/// Quote a parameter value when it contains non-token characters.
fn quote_parameter(value: &str) -> String {
    if !value.is_empty() && value.chars().all(is_token_char) {
        return value.to_string();
    }
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

/// A reference to a named model, written `[Name][]` in a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub id: String,
    /// Set by the resolution pass once the referenced model was found.
    pub resolved: bool,
    /// Where the reference was written; anchors resolution diagnostics.
    pub ranges: Vec<crate::span::CharRange>,
}

/// The body-bearing part of a request, response, or model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    /// Request name, response status code, or model name.
    pub name: String,
    pub description: String,
    pub media_type: Option<MediaType>,
    pub headers: Headers,
    pub body: String,
    pub schema: String,
    pub attributes: Option<DataStructure>,
    pub reference: Option<Reference>,
}

impl Payload {
    /// True when nothing at all was defined for this payload.
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
            && self.schema.is_empty()
            && self.headers.is_empty()
            && self.attributes.is_none()
            && self.reference.is_none()
    }
}

/// Requirement marker on a parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParameterUse {
    #[default]
    Undefined,
    Required,
    Optional,
}

/// One URI template parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub description: String,
    pub type_name: String,
    pub use_: ParameterUse,
    pub default_value: Option<String>,
    pub example_value: Option<String>,
    pub values: Vec<String>,
    /// True when the parameter was written in the MSON-style syntax
    /// (`name: example (type, use) - description`).
    pub new_syntax: bool,
}

/// One request/response interaction within an action.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionExample {
    pub name: String,
    pub description: String,
    pub requests: Vec<Payload>,
    pub responses: Vec<Payload>,
}

/// A single HTTP method on a resource.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Action {
    pub method: String,
    pub name: String,
    pub description: String,
    pub relation: String,
    pub parameters: Vec<Parameter>,
    pub headers: Headers,
    pub attributes: Option<DataStructure>,
    pub examples: Vec<TransactionExample>,
}

/// An HTTP endpoint identified by a URI template.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resource {
    pub uri_template: String,
    pub name: String,
    pub description: String,
    pub model: Option<Payload>,
    pub parameters: Vec<Parameter>,
    pub headers: Headers,
    pub attributes: Option<DataStructure>,
    pub actions: Vec<Action>,
}

/// A named or implicit grouping of resources.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceGroup {
    pub name: String,
    pub description: String,
    pub resources: Vec<Resource>,
}

/// The full parsed document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Blueprint {
    pub metadata: Vec<Metadata>,
    pub name: String,
    pub description: String,
    pub resource_groups: Vec<ResourceGroup>,
    pub data_structures: Vec<DataStructure>,
    /// Named models and named data structures collected during the first
    /// pass; payload references resolve against it afterwards.
    pub symbols: SymbolTable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_type_round_trip() {
        let mt = MediaType::parse("application/schema+json; charset=utf-8");
        assert_eq!(mt.type_name, "application");
        assert_eq!(mt.subtype, "schema");
        assert_eq!(mt.suffix, "json");
        assert_eq!(mt.parameters, vec![("charset".into(), "utf-8".into())]);
        assert_eq!(mt.serialize(), "application/schema+json; charset=utf-8");
    }

    #[test]
    fn media_type_without_subtype_is_absent() {
        assert_eq!(MediaType::parse("application").serialize(), "");
        assert_eq!(MediaType::default().serialize(), "");
    }

    #[test]
    fn media_type_parameter_quoting() {
        let mt = MediaType {
            type_name: "application".into(),
            subtype: "schema".into(),
            suffix: "json".into(),
            parameters: vec![("charset".into(), "utf-8".into()), ("c".into(), "59\r30".into())],
        };
        assert_eq!(
            mt.serialize(),
            "application/schema+json; charset=utf-8; c=\"59\\r30\""
        );
    }

    #[test]
    fn method_set_is_closed() {
        assert!(is_http_method("GET"));
        assert!(is_http_method("PROPPATCH"));
        assert!(!is_http_method("FETCH"));
    }
}
