//! Output stage: the resolved-symbol document a code emitter consumes.
//!
//! For every interface in the registry this flattens inherited members
//! (Symbol Collector), collapses overload groups (Overload Unifier), renders
//! every surviving type nominally (Type Renderer), and — for one
//! distinguished "global namespace object" interface — synthesizes a
//! property per global variable, using the inline body or the
//! prototype-attachment heuristic to pick its nominal type.
//!
//! Members whose value type is too structurally complex to express are
//! dropped here, silently: anything that is not a plain named `Single` after
//! simplification (unions, arrays, literals, unhandled markers, references
//! still carrying type arguments) never reaches the emitter. Method and
//! constructor positions are never dropped; they widen during unification
//! and rendering instead.

use std::rc::Rc;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use serde::Serialize;
use tracing::debug;
use tsbind_model::{
    GlobalVariable, InterfaceDecl, Method, TypeNode, TypeRegistry, document::synthetic_interface_name,
};

use crate::collect::{Symbol, SymbolKind, SymbolParent, collect_symbols};
use crate::render::{ANY_OBJECT, INTERFACE_PREFIX, RenderScope, TypeRenderer};
use crate::simplify::Simplifier;
use crate::unify::{SignatureCandidate, unify_signatures};

/// Options for [`resolve_document`].
#[derive(Clone, Debug, Default)]
pub struct ResolveOptions {
    /// Declared name of the global-namespace-object interface; globals are
    /// attached to it as synthesized properties. `None` skips synthesis.
    pub global_object: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedProgram {
    pub interfaces: Vec<ResolvedInterface>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedInterface {
    pub name: String,
    pub type_parameters: Vec<ResolvedTypeParam>,
    pub constructors: Vec<ResolvedConstructor>,
    pub properties: Vec<ResolvedProperty>,
    pub methods: Vec<ResolvedMethod>,
    pub indexers: Vec<ResolvedIndexer>,
    pub get_accessors: Vec<ResolvedAccessor>,
    pub set_accessors: Vec<ResolvedAccessor>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTypeParam {
    pub name: String,
    pub constraint: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConstructor {
    pub parameters: Vec<ResolvedParameter>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedMethod {
    pub name: String,
    pub type_parameters: Vec<ResolvedTypeParam>,
    pub parameters: Vec<ResolvedParameter>,
    /// `None` means the method produces no value (`void` return).
    pub return_type: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedProperty {
    pub name: String,
    pub readonly: bool,
    #[serde(rename = "type")]
    pub type_name: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedIndexer {
    pub index_name: String,
    pub index_type: String,
    pub return_type: String,
    pub readonly: bool,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedAccessor {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

/// Resolve every interface of the registry into its flattened nominal form.
///
/// Callers that accept untrusted documents should run
/// [`crate::collect::verify_acyclic_extends`] first; this function assumes
/// the `extends` graph is acyclic.
pub fn resolve_document(registry: &TypeRegistry, options: &ResolveOptions) -> ResolvedProgram {
    let simplifier = Simplifier::new(registry);
    let renderer = TypeRenderer::new(&simplifier);

    let mut interfaces: Vec<ResolvedInterface> = registry
        .interfaces()
        .map(|decl| resolve_interface(&simplifier, &renderer, decl, options))
        .collect();

    // A named global object with no declared interface still gets a shell
    // carrying the synthesized globals.
    if let Some(global_object) = options.global_object.as_deref()
        && registry.interface(global_object).is_none()
    {
        let mut shell = ResolvedInterface {
            name: format!("{INTERFACE_PREFIX}{global_object}"),
            ..ResolvedInterface::default()
        };
        synthesize_globals(registry, &simplifier, &renderer, &FxHashSet::default(), &mut shell);
        interfaces.push(shell);
    }

    ResolvedProgram { interfaces }
}

fn resolve_interface<'a>(
    simplifier: &Simplifier<'a>,
    renderer: &TypeRenderer<'a>,
    decl: &'a InterfaceDecl,
    options: &ResolveOptions,
) -> ResolvedInterface {
    debug!(interface = %decl.name, "resolving interface");
    let root = SymbolParent::root(decl);
    let symbols = collect_symbols(simplifier, &root, true);

    let mut resolved = ResolvedInterface {
        name: format!("{INTERFACE_PREFIX}{}", decl.name),
        type_parameters: decl
            .type_parameters
            .iter()
            .map(|tp| ResolvedTypeParam {
                name: tp.name.clone(),
                constraint: tp
                    .constraint
                    .as_ref()
                    .map(|c| renderer.render(c, RenderScope::root())),
            })
            .collect(),
        ..ResolvedInterface::default()
    };

    // Overload groups, keyed by name + arity + type-arity, first-seen order.
    let mut method_groups: IndexMap<(String, usize, usize), Vec<(&Method, Rc<SymbolParent<'a>>)>> =
        IndexMap::new();
    let mut constructor_groups: IndexMap<usize, Vec<(&tsbind_model::Constructor, Rc<SymbolParent<'a>>)>> =
        IndexMap::new();
    // Value members dedup by name; a derived declaration replaces the base
    // one in place (base-first position, derived type).
    let mut properties: IndexMap<String, ResolvedProperty> = IndexMap::new();
    let mut getters: IndexMap<String, ResolvedAccessor> = IndexMap::new();
    let mut setters: IndexMap<String, ResolvedAccessor> = IndexMap::new();

    for symbol in &symbols {
        match symbol.kind {
            SymbolKind::Method(method) => {
                method_groups
                    .entry((
                        method.name.clone(),
                        method.parameters.len(),
                        method.type_parameters.len(),
                    ))
                    .or_default()
                    .push((method, Rc::clone(&symbol.parent)));
            }
            SymbolKind::Constructor(constructor) => {
                constructor_groups
                    .entry(constructor.parameters.len())
                    .or_default()
                    .push((constructor, Rc::clone(&symbol.parent)));
            }
            SymbolKind::Property(property) => {
                let value = simplifier.simplify(&property.prop_type);
                if is_too_complex_to_keep(&value) {
                    continue;
                }
                let scope = RenderScope::of(&symbol.parent);
                properties.insert(
                    property.name.clone(),
                    ResolvedProperty {
                        name: property.name.clone(),
                        readonly: property.readonly,
                        type_name: renderer.render(&value, scope),
                    },
                );
            }
            SymbolKind::GetAccessor(accessor) => {
                if let Some(rendered) = render_value_member(simplifier, renderer, symbol, &accessor.value_type) {
                    getters.insert(
                        accessor.name.clone(),
                        ResolvedAccessor {
                            name: accessor.name.clone(),
                            type_name: rendered,
                        },
                    );
                }
            }
            SymbolKind::SetAccessor(accessor) => {
                if let Some(rendered) = render_value_member(simplifier, renderer, symbol, &accessor.value_type) {
                    setters.insert(
                        accessor.name.clone(),
                        ResolvedAccessor {
                            name: accessor.name.clone(),
                            type_name: rendered,
                        },
                    );
                }
            }
            SymbolKind::Indexer(indexer) => {
                let value = simplifier.simplify(&indexer.return_type);
                if is_too_complex_to_keep(&value) {
                    continue;
                }
                let scope = RenderScope::of(&symbol.parent);
                resolved.indexers.push(ResolvedIndexer {
                    index_name: indexer.index_name.clone(),
                    index_type: renderer.render(&indexer.index_type, scope),
                    return_type: renderer.render(&value, scope),
                    readonly: indexer.readonly,
                });
            }
        }
    }

    for ((name, _, _), group) in &method_groups {
        let candidates: Vec<SignatureCandidate<'_>> = group
            .iter()
            .map(|(method, _)| SignatureCandidate {
                type_parameters: &method.type_parameters,
                parameters: &method.parameters,
                return_type: Some(&method.return_type),
            })
            .collect();
        let Some(signature) = unify_signatures(simplifier, &candidates) else {
            continue;
        };
        let (_, context) = &group[0];
        let scope = RenderScope::with_symbol_params(context, &signature.type_parameters);
        resolved.methods.push(ResolvedMethod {
            name: name.clone(),
            type_parameters: signature
                .type_parameters
                .iter()
                .map(|tp| ResolvedTypeParam {
                    name: tp.name.clone(),
                    constraint: tp.constraint.as_ref().map(|c| renderer.render(c, scope)),
                })
                .collect(),
            parameters: signature
                .parameters
                .iter()
                .map(|p| ResolvedParameter {
                    name: p.name.clone(),
                    type_name: renderer.render(&p.param_type, scope),
                })
                .collect(),
            return_type: signature.return_type.as_ref().and_then(|rt| {
                if rt.is_named("void") {
                    None
                } else {
                    Some(renderer.render(rt, scope))
                }
            }),
        });
    }

    for group in constructor_groups.values() {
        let candidates: Vec<SignatureCandidate<'_>> = group
            .iter()
            .map(|(constructor, _)| SignatureCandidate {
                type_parameters: &[],
                parameters: &constructor.parameters,
                return_type: None,
            })
            .collect();
        let Some(signature) = unify_signatures(simplifier, &candidates) else {
            continue;
        };
        let (_, context) = &group[0];
        let scope = RenderScope::of(context);
        resolved.constructors.push(ResolvedConstructor {
            parameters: signature
                .parameters
                .iter()
                .map(|p| ResolvedParameter {
                    name: p.name.clone(),
                    type_name: renderer.render(&p.param_type, scope),
                })
                .collect(),
        });
    }

    resolved.properties = properties.into_values().collect();
    resolved.get_accessors = getters.into_values().collect();
    resolved.set_accessors = setters.into_values().collect();

    if options.global_object.as_deref() == Some(decl.name.as_str()) {
        // A declared member shadows a same-named global even when the
        // member itself was filtered out above.
        let declared: FxHashSet<&str> = symbols.iter().filter_map(|s| s.name()).collect();
        synthesize_globals(simplifier.registry(), simplifier, renderer, &declared, &mut resolved);
    }

    resolved
}

fn render_value_member<'a>(
    simplifier: &Simplifier<'a>,
    renderer: &TypeRenderer<'a>,
    symbol: &Symbol<'a>,
    value_type: &TypeNode,
) -> Option<String> {
    let value = simplifier.simplify(value_type);
    if is_too_complex_to_keep(&value) {
        return None;
    }
    Some(renderer.render(&value, RenderScope::of(&symbol.parent)))
}

/// Append one synthesized property per global variable whose name is not
/// already declared as a member of the interface.
fn synthesize_globals(
    registry: &TypeRegistry,
    simplifier: &Simplifier<'_>,
    renderer: &TypeRenderer<'_>,
    declared: &FxHashSet<&str>,
    target: &mut ResolvedInterface,
) {
    for global in registry.globals() {
        if declared.contains(global.name.as_str()) {
            continue;
        }
        debug!(global = %global.name, "synthesizing global property");
        target.properties.push(ResolvedProperty {
            name: global.name.clone(),
            readonly: false,
            type_name: global_type_name(registry, simplifier, renderer, global),
        });
    }
}

/// Pick the nominal type for a global variable.
///
/// Order: the hoisted inline body; a declared type naming a self-prototyped
/// interface (the constructor/prototype attachment — `interface X` with a
/// `prototype: X` member is both instance and constructor shape); any other
/// renderable declared type; a same-named (case-folded first letter)
/// self-prototyped interface; finally the top type.
fn global_type_name(
    registry: &TypeRegistry,
    simplifier: &Simplifier<'_>,
    renderer: &TypeRenderer<'_>,
    global: &GlobalVariable,
) -> String {
    if global.inline_interface_body.is_some() {
        return format!(
            "{INTERFACE_PREFIX}{}",
            synthetic_interface_name(&global.name)
        );
    }

    if let Some(declared) = &global.declared_type {
        let simplified = simplifier.simplify(declared);
        if let Some(name) = simplified.single_name()
            && let Some(decl) = registry.interface(name)
            && decl.has_self_prototype()
        {
            return format!("{INTERFACE_PREFIX}{}", decl.name);
        }
        return renderer.render(&simplified, RenderScope::root());
    }

    let capitalized = synthetic_interface_name(&global.name);
    for candidate in [global.name.as_str(), capitalized.as_str()] {
        if let Some(decl) = registry.interface(candidate)
            && decl.has_self_prototype()
        {
            return format!("{INTERFACE_PREFIX}{}", decl.name);
        }
    }

    ANY_OBJECT.to_string()
}

/// The generator-stage "too complex to keep" predicate. Stricter than the
/// renderer's fallback: value members keep only plain named references.
fn is_too_complex_to_keep(node: &TypeNode) -> bool {
    match node {
        TypeNode::Single(single) => {
            single.literal.is_some()
                || single.unhandled
                || !single.type_arguments.is_empty()
                || single.name.as_deref().is_none_or(str::is_empty)
        }
        _ => true,
    }
}
