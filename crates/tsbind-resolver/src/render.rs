//! Type Renderer: canonical type node -> nominal target type name.
//!
//! Rendering is total. Whatever cannot be expressed nominally — unions,
//! intersections, literals, dangling names — renders as [`ANY_OBJECT`]
//! rather than erroring; the stricter "too complex to keep" filter that
//! drops members entirely lives in the output stage, not here.
//!
//! Type-parameter scope resolution is the interesting part: a name that is
//! a type parameter of the *nearest enclosing symbol* (a method-level
//! generic) stays an open variable and renders verbatim, while a name that
//! is a type parameter of the owning *interface* resolves through the
//! `SymbolParent` binding chain — the argument bound at the `extends` edge
//! that reached this context, rendered one level up the chain. At the chain
//! root (no bindings) the parameter renders verbatim.

use std::rc::Rc;

use tsbind_model::{SingleType, TypeNode, TypeParam, TypeRegistry};

use crate::collect::SymbolParent;
use crate::simplify::Simplifier;

/// Nominal name of the universal "any object" type.
pub const ANY_OBJECT: &str = "AnyObject";
/// Nominal name of the opaque callable marker.
pub const ANY_FUNCTION: &str = "AnyFunction";
/// Prefix applied to declared interface names (`Foo` -> `IFoo`).
pub const INTERFACE_PREFIX: &str = "I";
/// Nominal generic wrapper for array types.
pub const ARRAY_WRAPPER: &str = "Array";

/// The scope a type is rendered in: the symbol's context chain plus the
/// nearest enclosing symbol's own type parameters.
#[derive(Clone, Copy, Debug, Default)]
pub struct RenderScope<'r, 'a> {
    pub parent: Option<&'r Rc<SymbolParent<'a>>>,
    pub symbol_type_parameters: &'r [TypeParam],
}

impl<'r, 'a> RenderScope<'r, 'a> {
    /// Scope with no context chain and no symbol generics. Used for
    /// rendering an interface's own defaults and for free-standing types.
    pub fn root() -> RenderScope<'static, 'static> {
        RenderScope {
            parent: None,
            symbol_type_parameters: &[],
        }
    }

    pub fn of(parent: &'r Rc<SymbolParent<'a>>) -> RenderScope<'r, 'a> {
        RenderScope {
            parent: Some(parent),
            symbol_type_parameters: &[],
        }
    }

    pub fn with_symbol_params(
        parent: &'r Rc<SymbolParent<'a>>,
        symbol_type_parameters: &'r [TypeParam],
    ) -> RenderScope<'r, 'a> {
        RenderScope {
            parent: Some(parent),
            symbol_type_parameters,
        }
    }
}

pub struct TypeRenderer<'a> {
    registry: &'a TypeRegistry,
    simplifier: &'a Simplifier<'a>,
}

impl<'a> TypeRenderer<'a> {
    pub fn new(simplifier: &'a Simplifier<'a>) -> TypeRenderer<'a> {
        TypeRenderer {
            registry: simplifier.registry(),
            simplifier,
        }
    }

    /// Render `node` in `scope`. Total; never fails.
    pub fn render(&self, node: &TypeNode, scope: RenderScope<'_, 'a>) -> String {
        let simplified = self.simplifier.simplify(node);
        self.render_simplified(&simplified, scope)
    }

    fn render_simplified(&self, node: &TypeNode, scope: RenderScope<'_, 'a>) -> String {
        match node {
            TypeNode::Single(single) => self.render_single(single, scope),
            TypeNode::Array { element } => {
                format!(
                    "{ARRAY_WRAPPER}<{}>",
                    self.render_simplified(element, scope)
                )
            }
            TypeNode::Function(_) => ANY_FUNCTION.to_string(),
            // Unions and intersections survive simplification only when
            // genuinely mixed; the nominal side has no spelling for them.
            TypeNode::Union { .. }
            | TypeNode::Intersection { .. }
            | TypeNode::Parenthesized { .. }
            | TypeNode::Unresolved => ANY_OBJECT.to_string(),
        }
    }

    fn render_single(&self, single: &SingleType, scope: RenderScope<'_, 'a>) -> String {
        let Some(name) = single.name.as_deref() else {
            return ANY_OBJECT.to_string();
        };
        if single.literal.is_some() || single.unhandled {
            return ANY_OBJECT.to_string();
        }

        if let Some(primitive) = render_primitive(name) {
            return primitive.to_string();
        }

        if let Some(decl) = self.registry.interface(name) {
            return self.render_interface_reference(decl, &single.type_arguments, scope);
        }

        // Method/constructor-level generic: still an open type variable.
        if scope.symbol_type_parameters.iter().any(|tp| tp.name == name) {
            return name.to_string();
        }

        // Interface-level type parameter: resolve through the binding chain.
        if let Some(context) = scope.parent
            && let Some(index) = context
                .owner
                .type_parameters
                .iter()
                .position(|tp| tp.name == name)
        {
            return match &context.type_argument_bindings {
                Some(bindings) => match bindings.get(index) {
                    // The bound argument was written one level closer to the
                    // inheritance root, so it renders in the parent scope.
                    Some(bound) => {
                        let outer = match &context.parent {
                            Some(parent) => RenderScope::of(parent),
                            None => RenderScope::root(),
                        };
                        self.render_simplified(bound, outer)
                    }
                    None => ANY_OBJECT.to_string(),
                },
                None => name.to_string(),
            };
        }

        ANY_OBJECT.to_string()
    }

    fn render_interface_reference(
        &self,
        decl: &tsbind_model::InterfaceDecl,
        type_arguments: &[TypeNode],
        scope: RenderScope<'_, 'a>,
    ) -> String {
        let name = format!("{INTERFACE_PREFIX}{}", decl.name);
        if !type_arguments.is_empty() {
            let rendered: Vec<String> = type_arguments
                .iter()
                .map(|arg| self.render_simplified(arg, scope))
                .collect();
            return format!("{name}<{}>", rendered.join(", "));
        }
        if decl.type_parameters.is_empty() {
            return name;
        }
        // Zero explicit arguments against a generic interface: synthesize
        // one argument per declared parameter from its default, rendered in
        // the interface's own scope, falling back to the top type.
        let rendered: Vec<String> = decl
            .type_parameters
            .iter()
            .map(|tp| match &tp.default {
                Some(default) => self.render(default, RenderScope::root()),
                None => ANY_OBJECT.to_string(),
            })
            .collect();
        format!("{name}<{}>", rendered.join(", "))
    }
}

/// Fixed keyword table. `void` maps to the top type here; its "no value"
/// meaning in return position is the output stage's concern.
fn render_primitive(name: &str) -> Option<&'static str> {
    match name {
        "boolean" => Some("Boolean"),
        "string" => Some("String"),
        "number" => Some("Number"),
        "any" | "void" | "null" | "undefined" => Some(ANY_OBJECT),
        _ => None,
    }
}
