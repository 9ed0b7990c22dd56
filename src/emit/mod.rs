/// Emit: product tree, report, and source maps to `serde_json::Value`.
///
/// The JSON shape mirrors the product tree field-for-field with camelCase
/// keys; key order follows declaration order so repeated runs are
/// byte-identical. YAML output renders the same value tree.

use serde_json::{json, Map, Value};

use crate::ast::{
    Action, Blueprint, Headers, Parameter, ParameterUse, Payload, Resource, ResourceGroup,
    TransactionExample,
};
use crate::diagnostics::Report;
use crate::mson::{
    DataStructure, MemberType, PropertyMember, TypeDefinition, TypeSection, TypeSectionContent,
    TypeSectionTag, ValueDefinition, ValueMember,
};
use crate::sourcemap::{
    ActionSourceMap, BlueprintSourceMap, ExampleSourceMap, PayloadSourceMap, RangeSet,
    ResourceGroupSourceMap, ResourceSourceMap,
};
use crate::ParseResult;

const AST_VERSION: &str = "1.0";

/// The full serialized result: AST, diagnostics, and (when exported) the
/// source-map tree.
pub fn result_to_json(result: &ParseResult) -> Value {
    let mut root = Map::new();
    root.insert("_version".into(), json!(AST_VERSION));
    root.insert("ast".into(), blueprint_to_json(&result.blueprint));
    root.insert("error".into(), error_to_json(&result.report));
    root.insert("warnings".into(), warnings_to_json(&result.report));
    if let Some(sourcemap) = &result.sourcemap {
        root.insert("sourcemap".into(), sourcemap_to_json(sourcemap));
    }
    Value::Object(root)
}

pub fn blueprint_to_json(blueprint: &Blueprint) -> Value {
    json!({
        "metadata": blueprint
            .metadata
            .iter()
            .map(|entry| json!({ "name": entry.name, "value": entry.value }))
            .collect::<Vec<_>>(),
        "name": blueprint.name,
        "description": blueprint.description,
        "resourceGroups": blueprint
            .resource_groups
            .iter()
            .map(group_to_json)
            .collect::<Vec<_>>(),
        "dataStructures": blueprint
            .data_structures
            .iter()
            .map(data_structure_to_json)
            .collect::<Vec<_>>(),
    })
}

fn group_to_json(group: &ResourceGroup) -> Value {
    json!({
        "name": group.name,
        "description": group.description,
        "resources": group.resources.iter().map(resource_to_json).collect::<Vec<_>>(),
    })
}

fn resource_to_json(resource: &Resource) -> Value {
    json!({
        "name": resource.name,
        "uriTemplate": resource.uri_template,
        "description": resource.description,
        "model": resource.model.as_ref().map(payload_to_json).unwrap_or(Value::Null),
        "parameters": resource.parameters.iter().map(parameter_to_json).collect::<Vec<_>>(),
        "headers": headers_to_json(&resource.headers),
        "attributes": resource
            .attributes
            .as_ref()
            .map(data_structure_to_json)
            .unwrap_or(Value::Null),
        "actions": resource.actions.iter().map(action_to_json).collect::<Vec<_>>(),
    })
}

fn action_to_json(action: &Action) -> Value {
    json!({
        "name": action.name,
        "method": action.method,
        "description": action.description,
        "relation": action.relation,
        "parameters": action.parameters.iter().map(parameter_to_json).collect::<Vec<_>>(),
        "attributes": action
            .attributes
            .as_ref()
            .map(data_structure_to_json)
            .unwrap_or(Value::Null),
        "examples": action.examples.iter().map(example_to_json).collect::<Vec<_>>(),
    })
}

fn example_to_json(example: &TransactionExample) -> Value {
    json!({
        "name": example.name,
        "description": example.description,
        "requests": example.requests.iter().map(payload_to_json).collect::<Vec<_>>(),
        "responses": example.responses.iter().map(payload_to_json).collect::<Vec<_>>(),
    })
}

fn payload_to_json(payload: &Payload) -> Value {
    json!({
        "name": payload.name,
        "description": payload.description,
        "contentType": payload
            .media_type
            .as_ref()
            .map(|media| media.serialize())
            .unwrap_or_default(),
        "headers": headers_to_json(&payload.headers),
        "body": payload.body,
        "schema": payload.schema,
        "reference": payload
            .reference
            .as_ref()
            .map(|reference| json!({ "id": reference.id, "resolved": reference.resolved }))
            .unwrap_or(Value::Null),
        "attributes": payload
            .attributes
            .as_ref()
            .map(data_structure_to_json)
            .unwrap_or(Value::Null),
    })
}

fn headers_to_json(headers: &Headers) -> Value {
    Value::Array(
        headers
            .iter()
            .map(|header| json!({ "name": header.name, "value": header.value }))
            .collect(),
    )
}

fn parameter_to_json(parameter: &Parameter) -> Value {
    json!({
        "name": parameter.name,
        "description": parameter.description,
        "type": parameter.type_name,
        "required": parameter.use_ == ParameterUse::Required,
        "default": parameter.default_value.clone().map(Value::String).unwrap_or(Value::Null),
        "example": parameter.example_value.clone().map(Value::String).unwrap_or(Value::Null),
        "values": parameter.values,
    })
}

// ── MSON ──

fn data_structure_to_json(structure: &DataStructure) -> Value {
    json!({
        "name": structure.name,
        "typeDefinition": type_definition_to_json(&structure.type_definition),
        "sections": structure.sections.iter().map(type_section_to_json).collect::<Vec<_>>(),
    })
}

fn type_definition_to_json(definition: &TypeDefinition) -> Value {
    json!({
        "typeSpecification": {
            "name": definition
                .specification
                .name
                .as_ref()
                .map(|name| Value::String(name.as_str().to_string()))
                .unwrap_or(Value::Null),
            "nestedTypes": definition
                .specification
                .nested
                .iter()
                .map(|name| name.as_str().to_string())
                .collect::<Vec<_>>(),
        },
        "attributes": definition
            .attributes
            .iter()
            .map(|attribute| attribute.as_str())
            .collect::<Vec<_>>(),
    })
}

fn type_section_to_json(section: &TypeSection) -> Value {
    let class = match section.tag {
        TypeSectionTag::BlockDescription => "blockDescription",
        TypeSectionTag::MemberType => "memberType",
        TypeSectionTag::Sample => "sample",
        TypeSectionTag::Default => "default",
    };
    let base_type = match section.base_type {
        crate::mson::BaseType::Implicit => "implicit",
        crate::mson::BaseType::Primitive => "primitive",
        crate::mson::BaseType::Object => "object",
        crate::mson::BaseType::Value => "value",
    };
    let content = match &section.content {
        TypeSectionContent::Description(description) => json!({ "description": description }),
        TypeSectionContent::Value(value) => json!({ "value": value }),
        TypeSectionContent::Members(members) => json!({
            "members": members.iter().map(member_to_json).collect::<Vec<_>>(),
        }),
    };
    json!({ "class": class, "baseType": base_type, "content": content })
}

fn member_to_json(member: &MemberType) -> Value {
    match member {
        MemberType::Property(PropertyMember {
            name,
            description,
            value_definition,
            sections,
        }) => json!({
            "class": "property",
            "name": {
                "literal": name.literal,
                "variable": name.variable.as_ref().map(value_definition_to_json).unwrap_or(Value::Null),
            },
            "description": description,
            "valueDefinition": value_definition_to_json(value_definition),
            "sections": sections.iter().map(type_section_to_json).collect::<Vec<_>>(),
        }),
        MemberType::Value(ValueMember {
            description,
            value_definition,
            sections,
        }) => json!({
            "class": "value",
            "description": description,
            "valueDefinition": value_definition_to_json(value_definition),
            "sections": sections.iter().map(type_section_to_json).collect::<Vec<_>>(),
        }),
        MemberType::Mixin(definition) => json!({
            "class": "mixin",
            "typeDefinition": type_definition_to_json(definition),
        }),
        MemberType::OneOf(members) => json!({
            "class": "oneOf",
            "members": members.iter().map(member_to_json).collect::<Vec<_>>(),
        }),
        MemberType::Group(members) => json!({
            "class": "group",
            "members": members.iter().map(member_to_json).collect::<Vec<_>>(),
        }),
    }
}

fn value_definition_to_json(definition: &ValueDefinition) -> Value {
    json!({
        "values": definition
            .values
            .iter()
            .map(|value| json!({ "literal": value.literal, "variable": value.variable }))
            .collect::<Vec<_>>(),
        "typeDefinition": type_definition_to_json(&definition.type_definition),
    })
}

// ── Diagnostics ──

fn error_to_json(report: &Report) -> Value {
    match &report.error {
        Some(error) => json!({
            "code": error.code.as_str(),
            "message": error.message,
            "sourceMap": ranges_to_json(&error.ranges),
        }),
        None => Value::Null,
    }
}

fn warnings_to_json(report: &Report) -> Value {
    Value::Array(
        report
            .warnings
            .iter()
            .map(|warning| {
                json!({
                    "code": warning.code.as_str(),
                    "message": warning.message,
                    "sourceMap": ranges_to_json(&warning.ranges),
                })
            })
            .collect(),
    )
}

fn ranges_to_json(ranges: &[crate::span::CharRange]) -> Value {
    Value::Array(
        ranges
            .iter()
            .map(|range| json!([range.location, range.length]))
            .collect(),
    )
}

// ── Source maps ──

pub fn sourcemap_to_json(map: &BlueprintSourceMap) -> Value {
    json!({
        "metadata": map.metadata.iter().map(|set| range_set_to_json(set)).collect::<Vec<_>>(),
        "name": range_set_to_json(&map.name),
        "description": range_set_to_json(&map.description),
        "resourceGroups": map
            .resource_groups
            .iter()
            .map(group_map_to_json)
            .collect::<Vec<_>>(),
        "dataStructures": map
            .data_structures
            .iter()
            .map(|set| range_set_to_json(set))
            .collect::<Vec<_>>(),
    })
}

fn group_map_to_json(map: &ResourceGroupSourceMap) -> Value {
    json!({
        "name": range_set_to_json(&map.node),
        "resources": map.resources.iter().map(resource_map_to_json).collect::<Vec<_>>(),
    })
}

fn resource_map_to_json(map: &ResourceSourceMap) -> Value {
    json!({
        "node": range_set_to_json(&map.node),
        "model": map.model.as_ref().map(payload_map_to_json).unwrap_or(Value::Null),
        "parameters": map.parameters.iter().map(|set| range_set_to_json(set)).collect::<Vec<_>>(),
        "headers": map.headers.iter().map(|set| range_set_to_json(set)).collect::<Vec<_>>(),
        "actions": map.actions.iter().map(action_map_to_json).collect::<Vec<_>>(),
    })
}

fn action_map_to_json(map: &ActionSourceMap) -> Value {
    json!({
        "node": range_set_to_json(&map.node),
        "parameters": map.parameters.iter().map(|set| range_set_to_json(set)).collect::<Vec<_>>(),
        "examples": map.examples.iter().map(example_map_to_json).collect::<Vec<_>>(),
    })
}

fn example_map_to_json(map: &ExampleSourceMap) -> Value {
    json!({
        "requests": map.requests.iter().map(payload_map_to_json).collect::<Vec<_>>(),
        "responses": map.responses.iter().map(payload_map_to_json).collect::<Vec<_>>(),
    })
}

fn payload_map_to_json(map: &PayloadSourceMap) -> Value {
    json!({
        "node": range_set_to_json(&map.node),
        "headers": map.headers.iter().map(|set| range_set_to_json(set)).collect::<Vec<_>>(),
        "body": range_set_to_json(&map.body),
        "schema": range_set_to_json(&map.schema),
    })
}

fn range_set_to_json(set: &RangeSet) -> Value {
    ranges_to_json(set)
}

// ── Rendering ──

/// Pretty JSON with a trailing newline.
pub fn render_json(value: &Value) -> String {
    let mut out = serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string());
    out.push('\n');
    out
}

/// YAML rendering of the same value tree.
pub fn render_yaml(value: &Value) -> String {
    serde_yaml::to_string(value).unwrap_or_else(|_| "{}\n".to_string())
}
