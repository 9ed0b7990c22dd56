/// The symbol table: registry of named models and named data structures.
///
/// The section processors populate it while walking the document (pass 1);
/// the resolution pass queries it to fill `[Name][]` payload references and
/// to check mixin cycles (pass 2).
///
/// Both maps are `IndexMap` to preserve declaration order for deterministic
/// output.

use indexmap::IndexMap;

use crate::ast::Payload;
use crate::span::ByteRangeSet;

/// A registered resource model. Nameless models of named resources register
/// under the resource name; a model without any name registers under the
/// empty string and is only locally addressable.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSymbol {
    pub name: String,
    pub payload: Payload,
    pub defined_in: ByteRangeSet,
}

/// A named type declared under `Data Structures` (or implicitly by a
/// resource's `Attributes` section). The definition body stays on the
/// product tree; the symbol records the name, its mixin/parent targets for
/// cycle checking, and where it was declared.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedTypeSymbol {
    pub name: String,
    /// Type names this definition refers to: its parent type plus every
    /// `Include` target, in declaration order.
    pub dependencies: Vec<String>,
    pub defined_in: ByteRangeSet,
}

/// The document-wide symbol table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolTable {
    pub models: IndexMap<String, ModelSymbol>,
    pub named_types: IndexMap<String, NamedTypeSymbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model. Returns the previous definition's range when the
    /// name was already taken (the first definition stays canonical).
    pub fn register_model(&mut self, symbol: ModelSymbol) -> Option<ByteRangeSet> {
        if let Some(existing) = self.models.get(&symbol.name) {
            return Some(existing.defined_in.clone());
        }
        self.models.insert(symbol.name.clone(), symbol);
        None
    }

    pub fn model(&self, name: &str) -> Option<&ModelSymbol> {
        self.models.get(name)
    }

    /// Register a named type. Same first-wins contract as models.
    pub fn register_named_type(&mut self, symbol: NamedTypeSymbol) -> Option<ByteRangeSet> {
        if let Some(existing) = self.named_types.get(&symbol.name) {
            return Some(existing.defined_in.clone());
        }
        self.named_types.insert(symbol.name.clone(), symbol);
        None
    }

    pub fn named_type(&self, name: &str) -> Option<&NamedTypeSymbol> {
        self.named_types.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_model_definition_wins() {
        let mut table = SymbolTable::new();
        let first = ModelSymbol {
            name: "Message".into(),
            payload: Payload {
                body: "AAA\n".into(),
                ..Payload::default()
            },
            defined_in: ByteRangeSet::new(),
        };
        assert!(table.register_model(first).is_none());

        let second = ModelSymbol {
            name: "Message".into(),
            payload: Payload::default(),
            defined_in: ByteRangeSet::new(),
        };
        assert!(table.register_model(second).is_some());
        assert_eq!(table.model("Message").unwrap().payload.body, "AAA\n");
    }
}
