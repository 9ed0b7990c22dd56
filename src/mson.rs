/// MSON data model.
///
/// MSON (Markdown Schema Object Notation) is the sublanguage behind
/// `Attributes` sections and the `Data Structures` group. It parses into a
/// recursive tree of member types and type sections; the section processors
/// in `sections::mson` drive the recursion, the plain parsing helpers for
/// names, values, and type definitions live here.

use crate::text;

// ── Type names and definitions ──

/// Base types a type section can operate under.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BaseType {
    /// Nothing declared; the base is inferred from nested sections.
    #[default]
    Implicit,
    /// boolean, string, number.
    Primitive,
    /// object — named properties.
    Object,
    /// array or enum — listed values.
    Value,
}

/// The built-in type names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseTypeName {
    Boolean,
    String,
    Number,
    Array,
    Enum,
    Object,
}

impl BaseTypeName {
    pub fn as_str(&self) -> &'static str {
        match self {
            BaseTypeName::Boolean => "boolean",
            BaseTypeName::String => "string",
            BaseTypeName::Number => "number",
            BaseTypeName::Array => "array",
            BaseTypeName::Enum => "enum",
            BaseTypeName::Object => "object",
        }
    }
}

/// A type name: built-in or a reference to a named type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeName {
    Base(BaseTypeName),
    Symbol(String),
}

impl TypeName {
    pub fn as_str(&self) -> &str {
        match self {
            TypeName::Base(base) => base.as_str(),
            TypeName::Symbol(symbol) => symbol,
        }
    }
}

/// A type specification: a name plus nested names, e.g. `array[string]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeSpecification {
    pub name: Option<TypeName>,
    pub nested: Vec<TypeName>,
}

/// Attribute keywords recognized inside a signature's parentheses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeAttribute {
    Required,
    Optional,
    Fixed,
    Sample,
    Default,
    Nullable,
}

impl TypeAttribute {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeAttribute::Required => "required",
            TypeAttribute::Optional => "optional",
            TypeAttribute::Fixed => "fixed",
            TypeAttribute::Sample => "sample",
            TypeAttribute::Default => "default",
            TypeAttribute::Nullable => "nullable",
        }
    }
}

/// A member's declared type: specification plus attribute keywords.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeDefinition {
    pub specification: TypeSpecification,
    pub attributes: Vec<TypeAttribute>,
}

impl TypeDefinition {
    pub fn has_attribute(&self, attribute: TypeAttribute) -> bool {
        self.attributes.contains(&attribute)
    }
}

// ── Values and members ──

/// A scalar value; `variable` marks `*wildcard*` values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Value {
    pub literal: String,
    pub variable: bool,
}

/// Listed values plus the declared type they belong to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueDefinition {
    pub values: Vec<Value>,
    pub type_definition: TypeDefinition,
}

/// A property name: a literal, or a variable pattern with its own type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyName {
    pub literal: String,
    pub variable: Option<ValueDefinition>,
}

/// A member of an array or enum.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueMember {
    pub description: String,
    pub value_definition: ValueDefinition,
    pub sections: Vec<TypeSection>,
}

/// A named member of an object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyMember {
    pub name: PropertyName,
    pub description: String,
    pub value_definition: ValueDefinition,
    pub sections: Vec<TypeSection>,
}

/// One element of a member list.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberType {
    Property(PropertyMember),
    Value(ValueMember),
    /// `Include <type>` — mixes the target type's members in.
    Mixin(TypeDefinition),
    /// `One Of` — mutually exclusive member alternatives.
    OneOf(Vec<MemberType>),
    /// A bare nested member list inside a `One Of`.
    Group(Vec<MemberType>),
}

// ── Type sections ──

/// What a type section contributes to its enclosing member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeSectionTag {
    BlockDescription,
    MemberType,
    Sample,
    Default,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeSectionContent {
    Description(String),
    Value(String),
    Members(Vec<MemberType>),
}

/// A block-level section nested under a member or named type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSection {
    pub tag: TypeSectionTag,
    pub base_type: BaseType,
    pub content: TypeSectionContent,
}

/// A named type from `Data Structures`, or an anonymous `Attributes` type
/// (then `name` is empty).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataStructure {
    pub name: String,
    pub type_definition: TypeDefinition,
    pub sections: Vec<TypeSection>,
}

// ── Parsing helpers ──

/// Parse a scalar value: strips one level of backticks, recognizes
/// `*wildcard*` variables.
pub fn parse_value(input: &str) -> Value {
    let mut subject = input.trim();
    let mut variable = false;

    if subject.len() >= 2 && subject.starts_with('*') && subject.ends_with('*') {
        variable = true;
        subject = subject[1..subject.len() - 1].trim();
    }
    Value {
        literal: strip_backticks(subject).to_string(),
        variable,
    }
}

/// Strip one level of enclosing backticks, if balanced.
pub fn strip_backticks(subject: &str) -> &str {
    let trimmed = subject.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('`') && trimmed.ends_with('`') {
        trimmed[1..trimmed.len() - 1].trim()
    } else {
        trimmed
    }
}

/// Parse a type name token into a built-in or symbol name.
pub fn parse_type_name(token: &str) -> TypeName {
    let subject = strip_backticks(token);
    let lowered = subject.to_ascii_lowercase();
    match lowered.as_str() {
        "boolean" => TypeName::Base(BaseTypeName::Boolean),
        "string" => TypeName::Base(BaseTypeName::String),
        "number" => TypeName::Base(BaseTypeName::Number),
        "array" => TypeName::Base(BaseTypeName::Array),
        "enum" => TypeName::Base(BaseTypeName::Enum),
        "object" => TypeName::Base(BaseTypeName::Object),
        _ => TypeName::Symbol(subject.to_string()),
    }
}

/// Parse a type specification token, which may nest: `array[string, number]`.
pub fn parse_type_specification(token: &str) -> TypeSpecification {
    let subject = token.trim();

    if let Some(open) = subject.find('[') {
        let name = parse_type_name(&subject[..open]);
        let inner = subject[open + 1..].trim_end_matches(']');
        let nested = inner
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(parse_type_name)
            .collect();
        return TypeSpecification {
            name: Some(name),
            nested,
        };
    }

    TypeSpecification {
        name: Some(parse_type_name(subject)),
        nested: Vec::new(),
    }
}

/// Recognize a requirement/variant attribute keyword.
pub fn parse_type_attribute(token: &str) -> Option<TypeAttribute> {
    let subject = token.trim();
    for attribute in [
        TypeAttribute::Required,
        TypeAttribute::Optional,
        TypeAttribute::Fixed,
        TypeAttribute::Sample,
        TypeAttribute::Default,
        TypeAttribute::Nullable,
    ] {
        if text::iequal(subject, attribute.as_str()) {
            return Some(attribute);
        }
    }
    None
}

/// Interpret a signature's attribute tokens as a type definition: keyword
/// tokens become attributes, the first non-keyword token becomes the type
/// specification. Remaining unknown tokens are preserved by the caller in
/// the raw signature but carry no meaning here.
pub fn parse_type_definition(tokens: &[String]) -> TypeDefinition {
    let mut definition = TypeDefinition::default();

    for token in tokens {
        if let Some(attribute) = parse_type_attribute(token) {
            definition.attributes.push(attribute);
        } else if definition.specification.name.is_none() {
            definition.specification = parse_type_specification(token);
        }
    }
    definition
}

/// Derive the base type a member's nested sections operate under.
pub fn base_type_of(specification: &TypeSpecification) -> BaseType {
    match &specification.name {
        None => BaseType::Implicit,
        Some(TypeName::Base(BaseTypeName::Object)) => BaseType::Object,
        Some(TypeName::Base(BaseTypeName::Array)) | Some(TypeName::Base(BaseTypeName::Enum)) => {
            BaseType::Value
        }
        Some(TypeName::Base(_)) => BaseType::Primitive,
        // A symbol's base is unknown until the named type resolves.
        Some(TypeName::Symbol(_)) => BaseType::Implicit,
    }
}
