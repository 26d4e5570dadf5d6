//! The input document and the registry built from it.
//!
//! The front end emits a `DeclarationDocument` with three flat collections.
//! `TypeRegistry::from_document` normalizes it:
//!
//! - TypeScript-style declaration merging: duplicate interface names merge by
//!   concatenating member lists, de-duplicating `extends` entries by
//!   structural equality and properties by name, before any simplification.
//! - Inline interface bodies attached to globals are hoisted into synthetic
//!   interfaces (named after the global, first letter upper-cased), so the
//!   registry is the single owner of every interface the engine can reach.
//!
//! After construction the registry is immutable; resolver code only ever
//! borrows from it.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::decl::{GlobalVariable, InterfaceDecl, TypeAlias};

/// The JSON-serializable document produced by the AST front end.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeclarationDocument {
    pub globals: Vec<GlobalVariable>,
    pub interfaces: Vec<InterfaceDecl>,
    pub type_aliases: Vec<TypeAlias>,
}

impl DeclarationDocument {
    pub fn from_json(text: &str) -> serde_json::Result<DeclarationDocument> {
        serde_json::from_str(text)
    }
}

/// Immutable, name-keyed view of a normalized document.
///
/// Interfaces keep document order (an `IndexMap`) so flattened output is
/// deterministic; aliases only ever serve point lookups during
/// simplification.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    interfaces: IndexMap<String, InterfaceDecl>,
    aliases: FxHashMap<String, TypeAlias>,
    globals: Vec<GlobalVariable>,
}

impl TypeRegistry {
    pub fn from_document(document: DeclarationDocument) -> TypeRegistry {
        let mut registry = TypeRegistry::default();
        for decl in document.interfaces {
            registry.insert_interface(decl);
        }
        for alias in document.type_aliases {
            // First declaration wins; aliases do not merge.
            registry.aliases.entry(alias.name.clone()).or_insert(alias);
        }
        for global in &document.globals {
            if let Some(body) = &global.inline_interface_body {
                let mut synthetic = InterfaceDecl::new(synthetic_interface_name(&global.name));
                synthetic.body = body.clone();
                registry.insert_interface(synthetic);
            }
        }
        registry.globals = document.globals;
        registry
    }

    pub fn interface(&self, name: &str) -> Option<&InterfaceDecl> {
        self.interfaces.get(name)
    }

    pub fn is_interface(&self, name: &str) -> bool {
        self.interfaces.contains_key(name)
    }

    pub fn alias(&self, name: &str) -> Option<&TypeAlias> {
        self.aliases.get(name)
    }

    pub fn is_alias(&self, name: &str) -> bool {
        self.aliases.contains_key(name)
    }

    /// All interfaces in document order (synthetic ones last).
    pub fn interfaces(&self) -> impl Iterator<Item = &InterfaceDecl> {
        self.interfaces.values()
    }

    pub fn globals(&self) -> &[GlobalVariable] {
        &self.globals
    }

    fn insert_interface(&mut self, decl: InterfaceDecl) {
        match self.interfaces.get_mut(&decl.name) {
            Some(existing) => merge_interface(existing, decl),
            None => {
                self.interfaces.insert(decl.name.clone(), decl);
            }
        }
    }
}

/// The registry name for a global's hoisted inline body: the global's own
/// name with its first ASCII letter upper-cased (`console` -> `Console`).
pub fn synthetic_interface_name(global_name: &str) -> String {
    let mut chars = global_name.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Declaration merging. Member lists concatenate; `extends` entries dedup by
/// structural equality; properties dedup by name, first declaration winning.
/// Type-parameter lists are taken from the first declaration — merging
/// declarations with incompatible parameter arity is a documented
/// precondition violation, not validated here.
fn merge_interface(into: &mut InterfaceDecl, other: InterfaceDecl) {
    for entry in other.extends {
        if !into.extends.contains(&entry) {
            into.extends.push(entry);
        }
    }
    for property in other.body.properties {
        let seen = into.body.properties.iter().any(|p| p.name == property.name);
        if !seen {
            into.body.properties.push(property);
        }
    }
    into.body.constructors.extend(other.body.constructors);
    into.body.methods.extend(other.body.methods);
    into.body.indexers.extend(other.body.indexers);
    into.body.get_accessors.extend(other.body.get_accessors);
    into.body.set_accessors.extend(other.body.set_accessors);
}
