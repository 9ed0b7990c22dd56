/// MSON section processors: member lists, type sections, mixins, one-of.
///
/// The recursion alternates between two shapes: a member (one list item
/// with a signature and nested type sections) and a type section (block
/// description, sample/default, or a member list). The enclosing base type
/// steers interpretation — listed values belong to arrays and enums,
/// property members to objects, scalar samples to primitives.

use crate::classifier::SectionType;
use crate::diagnostics::{Report, WarningCode};
use crate::markdown::{MarkdownNode, MarkdownNodeKind};
use crate::mson::{
    self, BaseType, DataStructure, MemberType, PropertyMember, PropertyName, TypeDefinition,
    TypeSection, TypeSectionContent, TypeSectionTag, ValueDefinition, ValueMember,
};
use crate::patterns::patterns;
use crate::signature::{parse_signature, Signature, SignatureTraits};
use crate::text;

use super::{drive_list, flatten, ParseContext, SectionProcessor};

const MEMBER_TRAITS: SignatureTraits = SignatureTraits {
    identifier: true,
    value: false,
    values: true,
    attributes: true,
    content: true,
};

/// Warn when a signature left a backtick run unclosed.
pub(crate) fn warn_unterminated(
    signature: &Signature,
    node: &MarkdownNode,
    ctx: &ParseContext,
    report: &mut Report,
) {
    if signature.unterminated_escape {
        report.warn(
            WarningCode::Formatting,
            "unterminated backtick escape, the remainder was taken as written",
            ctx.charmap(&node.range),
        );
    }
}

// ── Type section collection ──

/// Collects the nested type sections of a member, an `Attributes` section,
/// or a named type. Consecutive loose members coalesce into one member-type
/// section.
pub(crate) struct TypeSectionsProcessor {
    pub base: BaseType,
}

impl TypeSectionsProcessor {
    fn members_section<'a>(&self, out: &'a mut Vec<TypeSection>) -> &'a mut Vec<MemberType> {
        let needs_new = !matches!(
            out.last(),
            Some(TypeSection {
                tag: TypeSectionTag::MemberType,
                content: TypeSectionContent::Members(_),
                ..
            })
        );
        if needs_new {
            out.push(TypeSection {
                tag: TypeSectionTag::MemberType,
                base_type: self.base,
                content: TypeSectionContent::Members(Vec::new()),
            });
        }
        match &mut out.last_mut().expect("just ensured").content {
            TypeSectionContent::Members(members) => members,
            _ => unreachable!("last section is a member list"),
        }
    }

    fn property_context(&self) -> bool {
        !matches!(self.base, BaseType::Value)
    }
}

impl SectionProcessor for TypeSectionsProcessor {
    const TYPE: SectionType = SectionType::DataStructure;
    type Output = Vec<TypeSection>;

    fn process_signature(
        &mut self,
        _node: &MarkdownNode,
        _ctx: &mut ParseContext,
        _out: &mut Vec<TypeSection>,
        _report: &mut Report,
    ) {
        // The caller interprets the signature (member, attribute, or named
        // type); only the nested sections are collected here.
    }

    fn process_description(
        &mut self,
        node: &MarkdownNode,
        ctx: &mut ParseContext,
        out: &mut Vec<TypeSection>,
        _report: &mut Report,
    ) {
        let mapped = node.range.map(ctx.source);
        if let Some(TypeSection {
            tag: TypeSectionTag::BlockDescription,
            content: TypeSectionContent::Description(existing),
            ..
        }) = out.last_mut()
        {
            text::two_newlines(existing);
            existing.push_str(&mapped);
            return;
        }
        out.push(TypeSection {
            tag: TypeSectionTag::BlockDescription,
            base_type: self.base,
            content: TypeSectionContent::Description(mapped),
        });
    }

    fn accepts(&self, section: SectionType) -> bool {
        matches!(
            section,
            SectionType::MsonMember
                | SectionType::MsonSampleDefault
                | SectionType::MsonValueMembers
                | SectionType::MsonPropertyMembers
                | SectionType::MsonOneOf
                | SectionType::MsonMixin
        )
    }

    fn process_nested(
        &mut self,
        section: SectionType,
        nodes: &[&MarkdownNode],
        index: usize,
        ctx: &mut ParseContext,
        out: &mut Vec<TypeSection>,
        report: &mut Report,
    ) -> (usize, bool) {
        let node = nodes[index];
        let mut halted = false;

        match section {
            SectionType::MsonMember => {
                let (member, member_halted) =
                    parse_member(node, self.property_context(), ctx, report);
                self.members_section(out).push(member);
                halted = member_halted;
            }
            SectionType::MsonMixin => {
                self.members_section(out).push(parse_mixin(node));
            }
            SectionType::MsonOneOf => {
                if self.base == BaseType::Value {
                    report.warn(
                        WarningCode::LogicalError,
                        "'One Of' type section is only valid for object types",
                        ctx.charmap(&node.range),
                    );
                }
                let (one_of, one_of_halted) = parse_one_of(node, ctx, report);
                self.members_section(out).push(one_of);
                halted = one_of_halted;
            }
            SectionType::MsonValueMembers => {
                let (section, list_halted) =
                    parse_member_list(node, BaseType::Value, false, ctx, report);
                out.push(section);
                halted = list_halted;
            }
            SectionType::MsonPropertyMembers => {
                let (section, list_halted) =
                    parse_member_list(node, BaseType::Object, true, ctx, report);
                out.push(section);
                halted = list_halted;
            }
            SectionType::MsonSampleDefault => {
                out.push(parse_sample_default(node, self.base, ctx, report));
            }
            _ => {}
        }

        (index + 1, halted)
    }
}

// ── Members ──

/// Parse one member list item into a property or value member.
pub(crate) fn parse_member(
    item: &MarkdownNode,
    property: bool,
    ctx: &mut ParseContext,
    report: &mut Report,
) -> (MemberType, bool) {
    let signature = parse_signature(&item.text, MEMBER_TRAITS);
    warn_unterminated(&signature, item, ctx, report);

    let value_definition = ValueDefinition {
        values: signature.values.iter().map(|v| mson::parse_value(v)).collect(),
        type_definition: TypeDefinition {
            specification: signature.type_spec.clone().unwrap_or_default(),
            attributes: signature
                .attributes
                .iter()
                .filter_map(|token| mson::parse_type_attribute(token))
                .collect(),
        },
    };
    let base = mson::base_type_of(&value_definition.type_definition.specification);

    let mut processor = TypeSectionsProcessor { base };
    let mut sections = Vec::new();
    let halted = drive_list(&mut processor, item, ctx, &mut sections, report);

    let member = if property {
        let named = mson::parse_value(&signature.identifier);
        let name = if named.variable {
            PropertyName {
                literal: String::new(),
                variable: Some(ValueDefinition {
                    values: vec![named],
                    type_definition: TypeDefinition::default(),
                }),
            }
        } else {
            PropertyName {
                literal: named.literal,
                variable: None,
            }
        };
        MemberType::Property(PropertyMember {
            name,
            description: signature.content,
            value_definition,
            sections,
        })
    } else {
        // Value members carry their value in the signature's value slot;
        // re-read the identifier position as the listed value when no colon
        // was present.
        let mut definition = value_definition;
        if definition.values.is_empty() && !signature.identifier.is_empty() {
            definition.values = vec![mson::parse_value(&signature.identifier)];
        }
        MemberType::Value(ValueMember {
            description: signature.content,
            value_definition: definition,
            sections,
        })
    };

    (member, halted)
}

fn parse_mixin(item: &MarkdownNode) -> MemberType {
    let (line, _) = text::first_line(&item.text);
    let target = patterns()
        .mixin_signature
        .captures(line.trim())
        .and_then(|capture| capture.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();

    MemberType::Mixin(TypeDefinition {
        specification: mson::parse_type_specification(&target),
        attributes: Vec::new(),
    })
}

fn parse_one_of(
    item: &MarkdownNode,
    ctx: &mut ParseContext,
    report: &mut Report,
) -> (MemberType, bool) {
    let mut alternatives = Vec::new();
    let mut halted = false;

    for child in flatten(&item.children) {
        if child.kind != MarkdownNodeKind::ListItem {
            continue;
        }
        let (line, _) = text::first_line(&child.text);
        if patterns().property_members_keyword.is_match(line.trim()) {
            let (section, group_halted) =
                parse_member_list(child, BaseType::Object, true, ctx, report);
            if let TypeSectionContent::Members(members) = section.content {
                alternatives.push(MemberType::Group(members));
            }
            halted = halted || group_halted;
        } else {
            let (member, member_halted) = parse_member(child, true, ctx, report);
            alternatives.push(member);
            halted = halted || member_halted;
        }
    }

    (MemberType::OneOf(alternatives), halted)
}

/// Parse an explicit `Items`/`Members`/`Properties` section into a
/// member-type section.
fn parse_member_list(
    item: &MarkdownNode,
    base: BaseType,
    property: bool,
    ctx: &mut ParseContext,
    report: &mut Report,
) -> (TypeSection, bool) {
    let mut members = Vec::new();
    let mut halted = false;

    for child in flatten(&item.children) {
        if child.kind != MarkdownNodeKind::ListItem {
            continue;
        }
        let (member, member_halted) = parse_member(child, property, ctx, report);
        members.push(member);
        halted = halted || member_halted;
    }

    (
        TypeSection {
            tag: TypeSectionTag::MemberType,
            base_type: base,
            content: TypeSectionContent::Members(members),
        },
        halted,
    )
}

// ── Sample / Default ──

fn parse_sample_default(
    item: &MarkdownNode,
    base: BaseType,
    ctx: &mut ParseContext,
    report: &mut Report,
) -> TypeSection {
    let signature = parse_signature(
        &item.text,
        SignatureTraits {
            identifier: true,
            values: true,
            value: true,
            ..SignatureTraits::NONE
        },
    );
    warn_unterminated(&signature, item, ctx, report);

    let tag = if text::iequal(&signature.identifier, "Default") {
        TypeSectionTag::Default
    } else {
        TypeSectionTag::Sample
    };

    let content = match base {
        BaseType::Object => {
            if !signature.value.is_empty() {
                report.warn(
                    WarningCode::LogicalError,
                    "a type section for an object cannot have value(s) in the signature \
                     of the type section",
                    ctx.charmap(&item.range),
                );
            }
            let mut members = Vec::new();
            for child in flatten(&item.children) {
                if child.kind == MarkdownNodeKind::ListItem {
                    let (member, _) = parse_member(child, true, ctx, report);
                    members.push(member);
                }
            }
            TypeSectionContent::Members(members)
        }
        BaseType::Value => {
            let mut members: Vec<MemberType> = signature
                .values
                .iter()
                .map(|value| {
                    MemberType::Value(ValueMember {
                        description: String::new(),
                        value_definition: ValueDefinition {
                            values: vec![mson::parse_value(value)],
                            type_definition: TypeDefinition::default(),
                        },
                        sections: Vec::new(),
                    })
                })
                .collect();
            for child in flatten(&item.children) {
                if child.kind == MarkdownNodeKind::ListItem {
                    let (member, _) = parse_member(child, false, ctx, report);
                    members.push(member);
                }
            }
            TypeSectionContent::Members(members)
        }
        _ => {
            // Primitive and implicit bases take the scalar value, extended
            // by any continuation lines and nested code blocks.
            let mut value = signature.value.clone();
            if !signature.remaining_content.is_empty() {
                value.push_str(&signature.remaining_content);
            }
            for child in &item.children {
                if child.kind == MarkdownNodeKind::Code {
                    value.push_str(&child.text);
                }
            }
            TypeSectionContent::Value(value)
        }
    };

    TypeSection {
        tag,
        base_type: base,
        content,
    }
}

/// Parse an `Attributes` list section into an anonymous data structure.
pub(crate) fn parse_attributes(
    item: &MarkdownNode,
    ctx: &mut ParseContext,
    report: &mut Report,
) -> (DataStructure, bool) {
    let (line, _) = text::first_line(&item.text);
    let type_definition = patterns()
        .attributes_signature
        .captures(line.trim())
        .and_then(|capture| capture.get(1))
        .map(|tokens| {
            let parts: Vec<String> = tokens
                .as_str()
                .split(',')
                .map(|part| part.trim().to_string())
                .filter(|part| !part.is_empty())
                .collect();
            mson::parse_type_definition(&parts)
        })
        .unwrap_or_default();

    let base = mson::base_type_of(&type_definition.specification);
    let mut processor = TypeSectionsProcessor { base };
    let mut sections = Vec::new();
    let halted = drive_list(&mut processor, item, ctx, &mut sections, report);

    (
        DataStructure {
            name: String::new(),
            type_definition,
            sections,
        },
        halted,
    )
}

/// Type names a data structure depends on for inclusion: its parent type
/// plus every mixin target, recursively through nested sections. Used by
/// the cycle check.
pub(crate) fn collect_dependencies(structure: &DataStructure) -> Vec<String> {
    let mut dependencies = Vec::new();

    if let Some(mson::TypeName::Symbol(symbol)) =
        &structure.type_definition.specification.name
    {
        dependencies.push(symbol.clone());
    }
    for nested in &structure.type_definition.specification.nested {
        if let mson::TypeName::Symbol(symbol) = nested {
            dependencies.push(symbol.clone());
        }
    }
    for section in &structure.sections {
        if let TypeSectionContent::Members(members) = &section.content {
            collect_member_dependencies(members, &mut dependencies);
        }
    }

    dependencies
}

fn collect_member_dependencies(members: &[MemberType], dependencies: &mut Vec<String>) {
    for member in members {
        match member {
            MemberType::Mixin(definition) => {
                if let Some(mson::TypeName::Symbol(symbol)) = &definition.specification.name {
                    dependencies.push(symbol.clone());
                }
            }
            MemberType::OneOf(alternatives) | MemberType::Group(alternatives) => {
                collect_member_dependencies(alternatives, dependencies);
            }
            MemberType::Property(PropertyMember { sections, .. })
            | MemberType::Value(ValueMember { sections, .. }) => {
                for section in sections {
                    if let TypeSectionContent::Members(nested) = &section.content {
                        collect_member_dependencies(nested, dependencies);
                    }
                }
            }
        }
    }
}
