//! Symbol Collector: flattening interface inheritance into member symbols.
//!
//! Collection walks an interface's `extends` chain base-first and emits one
//! `Symbol` per member, tagged with the `SymbolParent` context that was
//! active when the member was reached. The context chain carries the type
//! arguments supplied at each `extends` edge, which is what later lets the
//! renderer resolve an inherited member's reference to a base interface's
//! type parameter into the concrete argument bound at that edge.
//!
//! Contexts are freshly built per traversal path and never mutated; they
//! point into the registry but own none of it.
//!
//! Cycle handling: a per-root visited set prevents duplicate member copies
//! under diamond inheritance. A genuinely cyclic `extends` graph is a
//! precondition violation — callers check with [`verify_acyclic_extends`]
//! before walking, the collector itself assumes acyclic input (the same
//! contract the hierarchy code of a full checker uses).

use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;
use tracing::trace;
use tsbind_model::{
    Accessor, Constructor, Indexer, InterfaceDecl, Method, Property, TypeNode, TypeRegistry,
};

use crate::simplify::Simplifier;

/// One link of the inheritance context chain for a collected symbol.
///
/// `type_argument_bindings` holds one simplified `TypeNode` per owner type
/// parameter, supplied by the `extends` edge (or explicit reference) that
/// reached this context; `None` at an unparameterized root.
#[derive(Debug)]
pub struct SymbolParent<'a> {
    pub owner: &'a InterfaceDecl,
    pub type_argument_bindings: Option<Vec<TypeNode>>,
    pub parent: Option<Rc<SymbolParent<'a>>>,
}

impl<'a> SymbolParent<'a> {
    /// Root context for collecting directly from `owner`.
    pub fn root(owner: &'a InterfaceDecl) -> Rc<SymbolParent<'a>> {
        Rc::new(SymbolParent {
            owner,
            type_argument_bindings: None,
            parent: None,
        })
    }

    /// Root context with explicit type arguments, as in a `Foo<string>`
    /// reference used as a collection root.
    pub fn root_with_bindings(
        owner: &'a InterfaceDecl,
        bindings: Vec<TypeNode>,
    ) -> Rc<SymbolParent<'a>> {
        Rc::new(SymbolParent {
            owner,
            type_argument_bindings: Some(bindings),
            parent: None,
        })
    }
}

/// Closed sum over the member kinds a symbol can carry.
#[derive(Clone, Copy, Debug)]
pub enum SymbolKind<'a> {
    Constructor(&'a Constructor),
    Property(&'a Property),
    Method(&'a Method),
    Indexer(&'a Indexer),
    GetAccessor(&'a Accessor),
    SetAccessor(&'a Accessor),
}

/// A collected member plus the context it was collected in.
#[derive(Clone, Debug)]
pub struct Symbol<'a> {
    pub kind: SymbolKind<'a>,
    pub parent: Rc<SymbolParent<'a>>,
}

impl Symbol<'_> {
    /// The member's declared name; constructors and indexers are unnamed.
    pub fn name(&self) -> Option<&str> {
        match self.kind {
            SymbolKind::Property(p) => Some(&p.name),
            SymbolKind::Method(m) => Some(&m.name),
            SymbolKind::GetAccessor(a) | SymbolKind::SetAccessor(a) => Some(&a.name),
            SymbolKind::Constructor(_) | SymbolKind::Indexer(_) => None,
        }
    }
}

/// Collect every member reachable from `root`, base interfaces first.
///
/// When `recursive` is false only `root.owner`'s own members are returned.
/// Symbols are synthesized fresh on every call; nothing is cached across
/// roots.
pub fn collect_symbols<'a>(
    simplifier: &Simplifier<'a>,
    root: &Rc<SymbolParent<'a>>,
    recursive: bool,
) -> Vec<Symbol<'a>> {
    let mut visited = FxHashSet::default();
    visited.insert(root.owner.name.as_str());
    let mut out = Vec::new();
    collect_into(simplifier, root, recursive, &mut visited, &mut out);
    out
}

fn collect_into<'a>(
    simplifier: &Simplifier<'a>,
    context: &Rc<SymbolParent<'a>>,
    recursive: bool,
    visited: &mut FxHashSet<&'a str>,
    out: &mut Vec<Symbol<'a>>,
) {
    if recursive {
        for entry in &context.owner.extends {
            let simplified = simplifier.simplify(entry);
            let Some(single) = simplified.as_single() else {
                continue;
            };
            let Some(name) = single.name.as_deref() else {
                continue;
            };
            let Some(target) = simplifier.registry().interface(name) else {
                continue;
            };
            if !visited.insert(target.name.as_str()) {
                // Diamond inheritance: already collected along this root.
                continue;
            }
            trace!(from = %context.owner.name, to = %target.name, "descending extends edge");
            let child = Rc::new(SymbolParent {
                owner: target,
                type_argument_bindings: Some(single.type_arguments.clone()),
                parent: Some(Rc::clone(context)),
            });
            collect_into(simplifier, &child, recursive, visited, out);
        }
    }

    let body = &context.owner.body;
    let own = body
        .constructors
        .iter()
        .map(SymbolKind::Constructor)
        .chain(body.properties.iter().map(SymbolKind::Property))
        .chain(body.methods.iter().map(SymbolKind::Method))
        .chain(body.indexers.iter().map(SymbolKind::Indexer))
        .chain(body.get_accessors.iter().map(SymbolKind::GetAccessor))
        .chain(body.set_accessors.iter().map(SymbolKind::SetAccessor));
    out.extend(own.map(|kind| Symbol {
        kind,
        parent: Rc::clone(context),
    }));
}

/// A cycle in the simplified `extends` graph.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("inheritance cycle detected: {}", cycle.join(" -> "))]
pub struct ExtendsCycleError {
    /// The offending path, first interface repeated at the end.
    pub cycle: Vec<String>,
}

/// Explicit precondition check for [`collect_symbols`]: verify the whole
/// registry's `extends` graph (after simplification) is acyclic.
///
/// Collection over a cyclic graph does not terminate, so callers that accept
/// untrusted documents run this once up front and report the error instead.
pub fn verify_acyclic_extends(
    registry: &TypeRegistry,
    simplifier: &Simplifier<'_>,
) -> Result<(), ExtendsCycleError> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        OnStack,
        Done,
    }

    fn visit<'a>(
        name: &'a str,
        registry: &'a TypeRegistry,
        simplifier: &Simplifier<'a>,
        marks: &mut FxHashMap<&'a str, Mark>,
        stack: &mut Vec<&'a str>,
    ) -> Result<(), ExtendsCycleError> {
        match marks.get(name) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::OnStack) => {
                let start = stack.iter().position(|n| *n == name).unwrap_or(0);
                let mut cycle: Vec<String> = stack[start..].iter().map(|n| n.to_string()).collect();
                cycle.push(name.to_string());
                return Err(ExtendsCycleError { cycle });
            }
            None => {}
        }
        let Some(decl) = registry.interface(name) else {
            return Ok(());
        };
        marks.insert(name, Mark::OnStack);
        stack.push(name);
        for entry in &decl.extends {
            let simplified = simplifier.simplify(entry);
            if let Some(base) = simplified.single_name() {
                let Some(base_decl) = registry.interface(base) else {
                    continue;
                };
                visit(&base_decl.name, registry, simplifier, marks, stack)?;
            }
        }
        stack.pop();
        marks.insert(name, Mark::Done);
        Ok(())
    }

    let mut marks = FxHashMap::default();
    let mut stack = Vec::new();
    for decl in registry.interfaces() {
        visit(&decl.name, registry, simplifier, &mut marks, &mut stack)?;
    }
    Ok(())
}
