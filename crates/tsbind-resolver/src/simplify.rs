//! Type Simplifier: fixpoint reduction of structural type expressions.
//!
//! `Simplifier::simplify` rewrites a `TypeNode` until no rule applies:
//!
//! - `Parenthesized` unwraps.
//! - Unions absorb `any`, drop `null` members (`undefined` is preserved as a
//!   distinct member — the asymmetry is intentional, it keeps optionality
//!   signaling alive in the output), flatten nested unions, dedup
//!   structurally, and unwrap singletons.
//! - Intersections flatten, dedup, and unwrap singletons.
//! - Alias references expand in place, with supplied type arguments
//!   substituted structurally over the alias body. A self-referential alias
//!   collapses to `any` instead of expanding.
//! - A zero-argument reference to a generic interface with defaulted
//!   parameters expands to carry one argument per parameter
//!   (`Foo` ≡ `Foo<Default, ...>`).
//! - `Unresolved` nodes and `unhandled` markers become `any`.
//!
//! The result is canonical: no `Parenthesized`, no `Unresolved`, no
//! alias-named reference, every union/intersection with ≥ 2 members.
//!
//! Termination: aliases expand only when the self-reference scan comes back
//! clean, and each expansion consumes one alias layer out of a finite alias
//! table; every other rule is size-reducing or terminal. Simplification is
//! total and idempotent.

use std::cell::RefCell;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;
use tsbind_model::{FunctionType, SingleType, TypeAlias, TypeNode, TypeParam, TypeRegistry};

pub struct Simplifier<'a> {
    registry: &'a TypeRegistry,
    /// Aliases currently being expanded on this call path. A re-entry means
    /// a mutually recursive alias group; the inner reference collapses to
    /// `any` exactly like a direct self-reference.
    expanding: RefCell<FxHashSet<String>>,
}

impl<'a> Simplifier<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Simplifier<'a> {
        Simplifier {
            registry,
            expanding: RefCell::new(FxHashSet::default()),
        }
    }

    pub fn registry(&self) -> &'a TypeRegistry {
        self.registry
    }

    /// Reduce `node` to canonical form. Total; never fails.
    pub fn simplify(&self, node: &TypeNode) -> TypeNode {
        match node {
            TypeNode::Parenthesized { inner } => self.simplify(inner),
            TypeNode::Union { members } => self.simplify_union(members),
            TypeNode::Intersection { members } => self.simplify_intersection(members),
            TypeNode::Function(function) => TypeNode::Function(self.simplify_function(function)),
            TypeNode::Array { element } => TypeNode::array(self.simplify(element)),
            TypeNode::Single(single) => self.simplify_single(single),
            TypeNode::Unresolved => TypeNode::any(),
        }
    }

    fn simplify_union(&self, members: &[TypeNode]) -> TypeNode {
        let mut flat = Vec::with_capacity(members.len());
        for member in members {
            let simplified = self.simplify(member);
            if simplified.is_any() {
                // `any | T` is `any`, whatever T is.
                return TypeNode::any();
            }
            match simplified {
                TypeNode::Union { members } => flat.extend(members),
                other => flat.push(other),
            }
        }
        let mut kept: Vec<TypeNode> = Vec::with_capacity(flat.len());
        for member in flat {
            if member.is_named("null") {
                continue;
            }
            if !kept.contains(&member) {
                kept.push(member);
            }
        }
        match kept.len() {
            0 => TypeNode::any(),
            1 => kept.pop().unwrap_or_else(TypeNode::any),
            _ => TypeNode::Union { members: kept },
        }
    }

    fn simplify_intersection(&self, members: &[TypeNode]) -> TypeNode {
        let mut kept: Vec<TypeNode> = Vec::with_capacity(members.len());
        for member in members {
            let simplified = self.simplify(member);
            let flat = match simplified {
                TypeNode::Intersection { members } => members,
                other => vec![other],
            };
            for member in flat {
                if !kept.contains(&member) {
                    kept.push(member);
                }
            }
        }
        match kept.len() {
            0 => TypeNode::any(),
            1 => kept.pop().unwrap_or_else(TypeNode::any),
            _ => TypeNode::Intersection { members: kept },
        }
    }

    fn simplify_function(&self, function: &FunctionType) -> FunctionType {
        FunctionType {
            type_parameters: function
                .type_parameters
                .iter()
                .map(|tp| self.simplify_type_param(tp))
                .collect(),
            parameters: function
                .parameters
                .iter()
                .map(|p| tsbind_model::Parameter {
                    name: p.name.clone(),
                    param_type: self.simplify(&p.param_type),
                })
                .collect(),
            return_type: Box::new(self.simplify(&function.return_type)),
        }
    }

    pub(crate) fn simplify_type_param(&self, param: &TypeParam) -> TypeParam {
        TypeParam {
            name: param.name.clone(),
            default: param.default.as_ref().map(|d| self.simplify(d)),
            constraint: param.constraint.as_ref().map(|c| self.simplify(c)),
        }
    }

    fn simplify_single(&self, single: &SingleType) -> TypeNode {
        if single.unhandled {
            return TypeNode::any();
        }
        let Some(name) = single.name.as_deref() else {
            // Pure literal (or empty) reference; nothing to resolve.
            return TypeNode::Single(single.clone());
        };

        if let Some(alias) = self.registry.alias(name) {
            return self.expand_alias(alias, &single.type_arguments);
        }

        let simplified_args: Vec<TypeNode> = single
            .type_arguments
            .iter()
            .map(|arg| self.simplify(arg))
            .collect();

        if simplified_args.is_empty()
            && let Some(decl) = self.registry.interface(name)
            && !decl.type_parameters.is_empty()
            && decl.type_parameters.iter().any(|tp| tp.default.is_some())
        {
            if !self.expanding.borrow_mut().insert(name.to_string()) {
                // A default mentioning its own interface
                // (`interface Foo<T = Foo>`): the inner reference collapses
                // exactly like a self-referential alias, so the expanded
                // form is a fixpoint.
                trace!(interface = %name, "self-referential default collapses to any");
                return TypeNode::any();
            }
            // Implicit `Foo` ≡ `Foo<Default, ...>` when defaults exist.
            let args = decl
                .type_parameters
                .iter()
                .map(|tp| match &tp.default {
                    Some(default) => self.simplify(default),
                    None => TypeNode::any(),
                })
                .collect();
            self.expanding.borrow_mut().remove(name);
            return TypeNode::Single(SingleType {
                name: Some(name.to_string()),
                literal: single.literal.clone(),
                type_arguments: args,
                unhandled: false,
            });
        }

        TypeNode::Single(SingleType {
            name: Some(name.to_string()),
            literal: single.literal.clone(),
            type_arguments: simplified_args,
            unhandled: false,
        })
    }

    /// Substitute an alias reference with its body and re-simplify.
    ///
    /// Self-referential aliases (`type Foo = number | Foo[]`) are not
    /// expanded; the whole reference collapses to `any`, which keeps the
    /// rewrite bounded.
    fn expand_alias(&self, alias: &TypeAlias, type_arguments: &[TypeNode]) -> TypeNode {
        if contains_name(&alias.body, &alias.name) {
            trace!(alias = %alias.name, "self-referential alias collapses to any");
            return TypeNode::any();
        }
        if !self.expanding.borrow_mut().insert(alias.name.clone()) {
            // Mutually recursive alias group reached back to itself.
            trace!(alias = %alias.name, "cyclic alias group collapses to any");
            return TypeNode::any();
        }
        trace!(alias = %alias.name, "expanding alias");
        let expanded = if alias.type_parameters.is_empty() {
            self.simplify(&alias.body)
        } else {
            let mut bindings: FxHashMap<&str, TypeNode> = FxHashMap::default();
            for (index, param) in alias.type_parameters.iter().enumerate() {
                let supplied = match type_arguments.get(index) {
                    Some(arg) => arg.clone(),
                    None => param.default.clone().unwrap_or_else(TypeNode::any),
                };
                bindings.insert(param.name.as_str(), supplied);
            }
            let substituted = substitute(&alias.body, &bindings);
            self.simplify(&substituted)
        };
        self.expanding.borrow_mut().remove(&alias.name);
        expanded
    }
}

/// Structural substitution: every `Single` whose name is bound in `bindings`
/// is replaced wholesale by the bound node; all other structure is rebuilt
/// with the substitution applied underneath.
fn substitute(node: &TypeNode, bindings: &FxHashMap<&str, TypeNode>) -> TypeNode {
    match node {
        TypeNode::Single(single) => {
            if let Some(name) = single.name.as_deref()
                && let Some(replacement) = bindings.get(name)
            {
                return replacement.clone();
            }
            TypeNode::Single(SingleType {
                name: single.name.clone(),
                literal: single.literal.clone(),
                type_arguments: single
                    .type_arguments
                    .iter()
                    .map(|arg| substitute(arg, bindings))
                    .collect(),
                unhandled: single.unhandled,
            })
        }
        TypeNode::Union { members } => TypeNode::Union {
            members: members.iter().map(|m| substitute(m, bindings)).collect(),
        },
        TypeNode::Intersection { members } => TypeNode::Intersection {
            members: members.iter().map(|m| substitute(m, bindings)).collect(),
        },
        TypeNode::Parenthesized { inner } => TypeNode::Parenthesized {
            inner: Box::new(substitute(inner, bindings)),
        },
        TypeNode::Array { element } => TypeNode::array(substitute(element, bindings)),
        TypeNode::Function(function) => TypeNode::Function(FunctionType {
            type_parameters: function
                .type_parameters
                .iter()
                .map(|tp| TypeParam {
                    name: tp.name.clone(),
                    default: tp.default.as_ref().map(|d| substitute(d, bindings)),
                    constraint: tp.constraint.as_ref().map(|c| substitute(c, bindings)),
                })
                .collect(),
            parameters: function
                .parameters
                .iter()
                .map(|p| tsbind_model::Parameter {
                    name: p.name.clone(),
                    param_type: substitute(&p.param_type, bindings),
                })
                .collect(),
            return_type: Box::new(substitute(&function.return_type, bindings)),
        }),
        TypeNode::Unresolved => TypeNode::Unresolved,
    }
}

/// Whether `node` references `name` anywhere: through unions, intersections,
/// parentheses, arrays, type arguments, and function parameter/return types
/// and type-parameter defaults/constraints.
fn contains_name(node: &TypeNode, name: &str) -> bool {
    match node {
        TypeNode::Single(single) => {
            single.name.as_deref() == Some(name)
                || single
                    .type_arguments
                    .iter()
                    .any(|arg| contains_name(arg, name))
        }
        TypeNode::Union { members } | TypeNode::Intersection { members } => {
            members.iter().any(|m| contains_name(m, name))
        }
        TypeNode::Parenthesized { inner } => contains_name(inner, name),
        TypeNode::Array { element } => contains_name(element, name),
        TypeNode::Function(function) => {
            contains_name(&function.return_type, name)
                || function
                    .parameters
                    .iter()
                    .any(|p| contains_name(&p.param_type, name))
                || function.type_parameters.iter().any(|tp| {
                    tp.default.as_ref().is_some_and(|d| contains_name(d, name))
                        || tp
                            .constraint
                            .as_ref()
                            .is_some_and(|c| contains_name(c, name))
                })
        }
        TypeNode::Unresolved => false,
    }
}
