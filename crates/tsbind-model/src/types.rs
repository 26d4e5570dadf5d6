//! Structural type expressions.
//!
//! `TypeNode` is the closed sum over every type shape the front end can
//! produce. It doubles as the wire schema: the front end serializes nodes as
//! externally tagged JSON objects (`{"union": {"members": [...]}}`,
//! `{"single": {"name": "string"}}`, ...), with `"unresolved"` standing in
//! for a node the front end could not classify.
//!
//! Structural equality is derived `PartialEq`; the simplifier and unifier
//! rely on it for dedup and conformance checks, so new fields must keep the
//! derive semantics meaningful.

use serde::{Deserialize, Serialize};

/// Name of the universal top type in the structural model.
///
/// Simplification funnels every unrepresentable shape (unhandled markers,
/// self-referential aliases, emptied unions) into a `Single` carrying this
/// name; the renderer maps it to the nominal "any object" type.
pub const ANY_TYPE_NAME: &str = "any";

/// A structural type expression.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeNode {
    /// `A | B | C`
    Union { members: Vec<TypeNode> },
    /// `A & B & C`
    Intersection { members: Vec<TypeNode> },
    /// `(T)` — grouping only, eliminated by simplification.
    Parenthesized { inner: Box<TypeNode> },
    /// A named or literal type reference, possibly generic.
    Single(SingleType),
    /// A function type. Survives simplification structurally intact but
    /// renders as an opaque callable marker.
    Function(FunctionType),
    /// `T[]`
    Array { element: Box<TypeNode> },
    /// The front end produced no tag at all. Treated as `any`.
    Unresolved,
}

/// A single named/literal type reference: `Foo`, `Foo<A, B>`, `"bar"`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SingleType {
    pub name: Option<String>,
    pub literal: Option<String>,
    pub type_arguments: Vec<TypeNode>,
    /// Set by the front end for AST shapes it recognized but cannot model
    /// (conditional types, mapped types, ...). Simplifies to `any`.
    pub unhandled: bool,
}

/// A function type: `<T>(a: A, b: B) => R`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionType {
    #[serde(default)]
    pub type_parameters: Vec<TypeParam>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    pub return_type: Box<TypeNode>,
}

/// A declared type parameter with optional default and constraint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeParam {
    pub name: String,
    #[serde(default)]
    pub default: Option<TypeNode>,
    #[serde(default)]
    pub constraint: Option<TypeNode>,
}

/// A named value parameter of a function, method, or constructor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: TypeNode,
}

impl TypeNode {
    /// The universal top type: a `Single` named `any`.
    pub fn any() -> TypeNode {
        TypeNode::named(ANY_TYPE_NAME)
    }

    /// A plain named reference with no type arguments.
    pub fn named(name: impl Into<String>) -> TypeNode {
        TypeNode::Single(SingleType {
            name: Some(name.into()),
            ..SingleType::default()
        })
    }

    /// A named reference carrying explicit type arguments.
    pub fn named_with_args(name: impl Into<String>, type_arguments: Vec<TypeNode>) -> TypeNode {
        TypeNode::Single(SingleType {
            name: Some(name.into()),
            type_arguments,
            ..SingleType::default()
        })
    }

    /// An array of the given element type.
    pub fn array(element: TypeNode) -> TypeNode {
        TypeNode::Array {
            element: Box::new(element),
        }
    }

    pub fn as_single(&self) -> Option<&SingleType> {
        match self {
            TypeNode::Single(single) => Some(single),
            _ => None,
        }
    }

    /// The reference name, if this is a plain named `Single`.
    pub fn single_name(&self) -> Option<&str> {
        self.as_single().and_then(|s| s.name.as_deref())
    }

    /// Whether this node is the universal top type.
    pub fn is_any(&self) -> bool {
        self.is_named(ANY_TYPE_NAME)
    }

    /// Whether this node is a `Single` with exactly the given name.
    pub fn is_named(&self, name: &str) -> bool {
        self.single_name() == Some(name)
    }
}

impl TypeParam {
    pub fn new(name: impl Into<String>) -> TypeParam {
        TypeParam {
            name: name.into(),
            default: None,
            constraint: None,
        }
    }
}

impl Parameter {
    pub fn new(name: impl Into<String>, param_type: TypeNode) -> Parameter {
        Parameter {
            name: name.into(),
            param_type,
        }
    }
}
