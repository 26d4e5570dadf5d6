//! Overload Unifier: collapsing an overload set into one signature.
//!
//! The target type system is single-dispatch, so an overload group — symbols
//! sharing kind-specific name, parameter count, and type-parameter count —
//! must resolve to exactly one signature. The rule is purely structural:
//! a position keeps its type only if every candidate agrees on it (after
//! simplification); any disagreement widens that position to the universal
//! top type. No variance, no supertype join, no union — disagreement always
//! means `any`.

use smallvec::SmallVec;
use tsbind_model::{Parameter, TypeNode, TypeParam};

use crate::simplify::Simplifier;

/// One overload candidate, borrowed from a collected symbol.
#[derive(Clone, Copy, Debug)]
pub struct SignatureCandidate<'a> {
    pub type_parameters: &'a [TypeParam],
    pub parameters: &'a [Parameter],
    /// `None` for constructors, which have no return position.
    pub return_type: Option<&'a TypeNode>,
}

/// The single signature an overload group collapses to.
#[derive(Clone, Debug, PartialEq)]
pub struct UnifiedSignature {
    pub type_parameters: Vec<TypeParam>,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<TypeNode>,
}

/// Unify a non-empty overload group into one conforming signature.
///
/// All candidates are expected to share parameter count and type-parameter
/// count (that is the grouping key); positions beyond a shorter candidate's
/// arity widen to `any` rather than panicking.
pub fn unify_signatures(
    simplifier: &Simplifier<'_>,
    candidates: &[SignatureCandidate<'_>],
) -> Option<UnifiedSignature> {
    let first = candidates.first()?;

    let parameters = (0..first.parameters.len())
        .map(|index| {
            let types: SmallVec<[TypeNode; 4]> = candidates
                .iter()
                .map(|c| match c.parameters.get(index) {
                    Some(parameter) => simplifier.simplify(&parameter.param_type),
                    None => TypeNode::any(),
                })
                .collect();
            Parameter {
                // Parameter names are not part of conformance; the first
                // candidate's name is the one that renders.
                name: first.parameters[index].name.clone(),
                param_type: conforming(types),
            }
        })
        .collect();

    let type_parameters = (0..first.type_parameters.len())
        .map(|index| {
            let constraints: SmallVec<[Option<TypeNode>; 4]> = candidates
                .iter()
                .map(|c| {
                    c.type_parameters
                        .get(index)
                        .and_then(|tp| tp.constraint.as_ref())
                        .map(|constraint| simplifier.simplify(constraint))
                })
                .collect();
            let own = &first.type_parameters[index];
            TypeParam {
                name: own.name.clone(),
                default: own.default.as_ref().map(|d| simplifier.simplify(d)),
                constraint: conforming_optional(constraints),
            }
        })
        .collect();

    let returns: SmallVec<[Option<TypeNode>; 4]> = candidates
        .iter()
        .map(|c| c.return_type.map(|rt| simplifier.simplify(rt)))
        .collect();
    let return_type = if first.return_type.is_some() {
        Some(conforming_optional(returns).unwrap_or_else(TypeNode::any))
    } else {
        None
    };

    Some(UnifiedSignature {
        type_parameters,
        parameters,
        return_type,
    })
}

/// The conformance rule: keep the type iff all candidates agree, else `any`.
fn conforming(mut types: SmallVec<[TypeNode; 4]>) -> TypeNode {
    let Some(first) = types.first() else {
        return TypeNode::any();
    };
    if types.iter().all(|t| t == first) {
        types.swap_remove(0)
    } else {
        TypeNode::any()
    }
}

fn conforming_optional(mut types: SmallVec<[Option<TypeNode>; 4]>) -> Option<TypeNode> {
    let Some(first) = types.first() else {
        return None;
    };
    if types.iter().all(|t| t == first) {
        types.swap_remove(0)
    } else {
        Some(TypeNode::any())
    }
}
