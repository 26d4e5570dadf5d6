//! Type-model simplification and symbol-resolution engine for tsbind.
//!
//! This crate is the compiler pass between the AST front end (which emits
//! the structural `tsbind-model` document) and the code emitter (which turns
//! resolved symbols into target-language source). It is single-threaded,
//! pure, and allocation-only — no I/O, no shared mutable state.
//!
//! Pipeline, one-directional:
//!
//! 1. [`simplify::Simplifier`] — fixpoint rewriter producing a canonical
//!    type graph with zero aliases.
//! 2. [`collect`] — flattens interface inheritance into per-interface symbol
//!    lists, carrying type-argument bindings through each `extends` edge.
//! 3. [`unify`] — collapses overload groups to one conforming signature.
//! 4. [`render`] — maps canonical nodes to nominal target type names.
//! 5. [`output::resolve_document`] — drives 1–4 over a whole registry and
//!    produces the emitter-facing document, including global-namespace
//!    property synthesis.

pub mod collect;
pub mod output;
pub mod render;
pub mod simplify;
pub mod unify;

pub use collect::{
    ExtendsCycleError, Symbol, SymbolKind, SymbolParent, collect_symbols, verify_acyclic_extends,
};
pub use output::{
    ResolveOptions, ResolvedAccessor, ResolvedConstructor, ResolvedIndexer, ResolvedInterface,
    ResolvedMethod, ResolvedParameter, ResolvedProgram, ResolvedProperty, ResolvedTypeParam,
    resolve_document,
};
pub use render::{ANY_FUNCTION, ANY_OBJECT, ARRAY_WRAPPER, INTERFACE_PREFIX, RenderScope, TypeRenderer};
pub use simplify::Simplifier;
pub use unify::{SignatureCandidate, UnifiedSignature, unify_signatures};
