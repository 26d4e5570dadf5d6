//! Top-level declarations: aliases, interfaces, and global variables.
//!
//! These mirror the three collections of the input document. Interface
//! members are grouped by kind; declaration order is preserved within each
//! group and the collector emits groups in a fixed kind order, so flattened
//! output is deterministic.

use serde::{Deserialize, Serialize};

use crate::types::{Parameter, TypeNode, TypeParam};

/// `type Foo<T> = ...`. Fully eliminated by the simplifier; no alias name
/// survives into symbol resolution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeAlias {
    pub name: String,
    #[serde(default)]
    pub type_parameters: Vec<TypeParam>,
    pub body: TypeNode,
}

/// `interface Foo<T> extends Bar<T> { ... }`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceDecl {
    pub name: String,
    #[serde(default)]
    pub type_parameters: Vec<TypeParam>,
    /// Each entry is expected to simplify to a `Single` naming another
    /// interface; anything else is skipped during collection.
    #[serde(default)]
    pub extends: Vec<TypeNode>,
    #[serde(default)]
    pub body: InterfaceBody,
}

/// The member lists of an interface (or of a global's inline body).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InterfaceBody {
    pub constructors: Vec<Constructor>,
    pub properties: Vec<Property>,
    pub methods: Vec<Method>,
    pub indexers: Vec<Indexer>,
    pub get_accessors: Vec<Accessor>,
    pub set_accessors: Vec<Accessor>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constructor {
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub name: String,
    #[serde(default)]
    pub readonly: bool,
    #[serde(rename = "type")]
    pub prop_type: TypeNode,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Method {
    pub name: String,
    #[serde(default)]
    pub type_parameters: Vec<TypeParam>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    pub return_type: TypeNode,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Indexer {
    pub index_name: String,
    pub index_type: TypeNode,
    pub return_type: TypeNode,
    #[serde(default)]
    pub readonly: bool,
}

/// A get- or set-accessor. For getters `value_type` is the result type; for
/// setters it is the single parameter's type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accessor {
    pub name: String,
    pub value_type: TypeNode,
}

/// A top-level named value. May carry an inline structural body, a declared
/// type, both, or neither; the generator stage decides its nominal type via
/// the prototype-attachment heuristic when nothing explicit is available.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalVariable {
    pub name: String,
    #[serde(default)]
    pub inline_interface_body: Option<InterfaceBody>,
    #[serde(default)]
    pub declared_type: Option<TypeNode>,
}

impl InterfaceDecl {
    pub fn new(name: impl Into<String>) -> InterfaceDecl {
        InterfaceDecl {
            name: name.into(),
            type_parameters: Vec::new(),
            extends: Vec::new(),
            body: InterfaceBody::default(),
        }
    }

    /// Whether this interface's body carries a property literally named
    /// `prototype` whose type is this interface itself. Such an interface
    /// acts as both instance shape and constructor-object shape for a global
    /// value of the same name.
    pub fn has_self_prototype(&self) -> bool {
        self.body
            .properties
            .iter()
            .any(|p| p.name == "prototype" && p.prop_type.is_named(&self.name))
    }
}

