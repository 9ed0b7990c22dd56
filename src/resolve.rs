/// Pass 2: symbol resolution.
///
/// Two sub-passes over the finished product tree:
/// 1. Every payload carrying a `[Name][]` reference is filled from the
///    matching registered model (body, schema, headers, attributes). An
///    unresolved reference is a fatal `SymbolError`; the payload is
///    retained empty.
/// 2. Named-type dependencies (parent types and mixin targets) are walked
///    with a visited set; a type including itself transitively is a fatal
///    `SymbolError`, an unknown target a `LogicalErrorWarning`.

use std::collections::HashMap;

use crate::ast::{Blueprint, Payload};
use crate::diagnostics::{ErrorCode, Report, WarningCode};
use crate::span::to_character_ranges;
use crate::symbol_table::SymbolTable;

pub(crate) fn resolve(
    blueprint: &mut Blueprint,
    symbols: &SymbolTable,
    source: &str,
    report: &mut Report,
) {
    for group in &mut blueprint.resource_groups {
        for resource in &mut group.resources {
            if let Some(model) = &mut resource.model {
                resolve_payload(model, symbols, report);
            }
            for action in &mut resource.actions {
                for example in &mut action.examples {
                    for payload in example
                        .requests
                        .iter_mut()
                        .chain(example.responses.iter_mut())
                    {
                        resolve_payload(payload, symbols, report);
                    }
                }
            }
        }
    }

    check_type_cycles(symbols, source, report);
}

fn resolve_payload(payload: &mut Payload, symbols: &SymbolTable, report: &mut Report) {
    let Some(reference) = &mut payload.reference else {
        return;
    };
    if reference.resolved {
        return;
    }

    match symbols.model(&reference.id) {
        Some(symbol) => {
            if payload.body.is_empty() {
                payload.body = symbol.payload.body.clone();
            }
            if payload.schema.is_empty() {
                payload.schema = symbol.payload.schema.clone();
            }
            if payload.attributes.is_none() {
                payload.attributes = symbol.payload.attributes.clone();
            }
            if payload.media_type.is_none() {
                payload.media_type = symbol.payload.media_type.clone();
            }
            // The model's headers come first; the payload's own win on a
            // name clash.
            let own = std::mem::take(&mut payload.headers);
            for header in &symbol.payload.headers {
                if !own
                    .iter()
                    .any(|h| h.name.eq_ignore_ascii_case(&header.name))
                {
                    payload.headers.push(header.clone());
                }
            }
            payload.headers.extend(own);
            reference.resolved = true;
        }
        None => {
            report.fail(
                ErrorCode::Symbol,
                format!("undefined model reference '{}'", reference.id),
                reference.ranges.clone(),
            );
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Visit {
    InProgress,
    Done,
}

fn check_type_cycles(symbols: &SymbolTable, source: &str, report: &mut Report) {
    let mut visited: HashMap<&str, Visit> = HashMap::new();

    for name in symbols.named_types.keys() {
        if !visited.contains_key(name.as_str()) {
            walk_type(name, symbols, source, &mut visited, report);
        }
    }
}

fn walk_type<'a>(
    name: &'a str,
    symbols: &'a SymbolTable,
    source: &str,
    visited: &mut HashMap<&'a str, Visit>,
    report: &mut Report,
) {
    let Some(symbol) = symbols.named_type(name) else {
        return;
    };
    visited.insert(name, Visit::InProgress);

    for dependency in &symbol.dependencies {
        match symbols.named_type(dependency) {
            None => {
                report.warn(
                    WarningCode::LogicalError,
                    format!(
                        "the type '{}' referenced by '{}' is not defined",
                        dependency, name
                    ),
                    to_character_ranges(&symbol.defined_in, source),
                );
            }
            Some(target) => match visited.get(target.name.as_str()) {
                Some(Visit::InProgress) => {
                    report.fail(
                        ErrorCode::Symbol,
                        format!("the type '{}' includes itself transitively", name),
                        to_character_ranges(&symbol.defined_in, source),
                    );
                }
                Some(Visit::Done) => {}
                None => {
                    walk_type(target.name.as_str(), symbols, source, visited, report);
                }
            },
        }
    }

    visited.insert(name, Visit::Done);
}
