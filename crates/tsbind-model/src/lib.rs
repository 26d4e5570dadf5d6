//! Data model for the tsbind binding generator.
//!
//! This crate provides the read-only type graph the resolver crates consume:
//! - Structural type expressions (`TypeNode` and friends)
//! - Declarations (`TypeAlias`, `InterfaceDecl`, `GlobalVariable`)
//! - The serde wire document emitted by the AST front end
//!   (`DeclarationDocument`)
//! - The immutable name-keyed registry with TypeScript-style declaration
//!   merging applied (`TypeRegistry`)
//!
//! Everything here is built once from the input document and never mutated
//! afterwards; the engine crates only ever hold shared references into it.

pub mod decl;
pub mod document;
pub mod types;

pub use decl::{
    Accessor, Constructor, GlobalVariable, Indexer, InterfaceBody, InterfaceDecl, Method, Property,
    TypeAlias,
};
pub use document::{DeclarationDocument, TypeRegistry};
pub use types::{FunctionType, Parameter, SingleType, TypeNode, TypeParam};
