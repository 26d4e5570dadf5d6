use tsbind_model::{
    DeclarationDocument, InterfaceDecl, Method, Property, TypeNode, TypeParam, TypeRegistry,
};
use tsbind_resolver::{
    Simplifier, SymbolKind, SymbolParent, collect_symbols, verify_acyclic_extends,
};

fn property(name: &str, prop_type: TypeNode) -> Property {
    Property {
        name: name.into(),
        readonly: false,
        prop_type,
    }
}

fn method(name: &str, return_type: TypeNode) -> Method {
    Method {
        name: name.into(),
        type_parameters: Vec::new(),
        parameters: Vec::new(),
        return_type,
    }
}

fn registry(interfaces: Vec<InterfaceDecl>) -> TypeRegistry {
    TypeRegistry::from_document(DeclarationDocument {
        globals: Vec::new(),
        interfaces,
        type_aliases: Vec::new(),
    })
}

fn names(symbols: &[tsbind_resolver::Symbol<'_>]) -> Vec<String> {
    symbols
        .iter()
        .filter_map(|s| s.name().map(str::to_string))
        .collect()
}

#[test]
fn base_members_precede_derived_members() {
    let mut base = InterfaceDecl::new("Base");
    base.body.properties.push(property("a", TypeNode::named("string")));
    base.body.methods.push(method("m", TypeNode::named("void")));

    let mut derived = InterfaceDecl::new("Derived");
    derived.extends.push(TypeNode::named("Base"));
    derived.body.properties.push(property("b", TypeNode::named("number")));

    let registry = registry(vec![base, derived]);
    let simplifier = Simplifier::new(&registry);
    let root = SymbolParent::root(registry.interface("Derived").unwrap());

    let symbols = collect_symbols(&simplifier, &root, true);
    assert_eq!(names(&symbols), vec!["a", "m", "b"]);
}

#[test]
fn non_recursive_collection_returns_own_members_only() {
    let mut base = InterfaceDecl::new("Base");
    base.body.properties.push(property("a", TypeNode::named("string")));

    let mut derived = InterfaceDecl::new("Derived");
    derived.extends.push(TypeNode::named("Base"));
    derived.body.properties.push(property("b", TypeNode::named("number")));

    let registry = registry(vec![base, derived]);
    let simplifier = Simplifier::new(&registry);
    let root = SymbolParent::root(registry.interface("Derived").unwrap());

    let symbols = collect_symbols(&simplifier, &root, false);
    assert_eq!(names(&symbols), vec!["b"]);
}

#[test]
fn diamond_inheritance_collects_shared_base_once() {
    let mut top = InterfaceDecl::new("Top");
    top.body.properties.push(property("t", TypeNode::named("string")));

    let mut left = InterfaceDecl::new("Left");
    left.extends.push(TypeNode::named("Top"));
    left.body.properties.push(property("l", TypeNode::named("string")));

    let mut right = InterfaceDecl::new("Right");
    right.extends.push(TypeNode::named("Top"));
    right.body.properties.push(property("r", TypeNode::named("string")));

    let mut bottom = InterfaceDecl::new("Bottom");
    bottom.extends.push(TypeNode::named("Left"));
    bottom.extends.push(TypeNode::named("Right"));
    bottom.body.properties.push(property("b", TypeNode::named("string")));

    let registry = registry(vec![top, left, right, bottom]);
    let simplifier = Simplifier::new(&registry);
    let root = SymbolParent::root(registry.interface("Bottom").unwrap());

    let symbols = collect_symbols(&simplifier, &root, true);
    assert_eq!(names(&symbols), vec!["t", "l", "r", "b"]);
}

#[test]
fn extends_edges_carry_type_argument_bindings() {
    let mut base = InterfaceDecl::new("Base");
    base.type_parameters = vec![TypeParam::new("T")];
    base.body.methods.push(method("get", TypeNode::named("T")));

    let mut derived = InterfaceDecl::new("Derived");
    derived.type_parameters = vec![TypeParam::new("U")];
    derived.extends.push(TypeNode::named_with_args(
        "Base",
        vec![TypeNode::array(TypeNode::named("U"))],
    ));

    let registry = registry(vec![base, derived]);
    let simplifier = Simplifier::new(&registry);
    let root = SymbolParent::root_with_bindings(
        registry.interface("Derived").unwrap(),
        vec![TypeNode::named("string")],
    );

    let symbols = collect_symbols(&simplifier, &root, true);
    assert_eq!(symbols.len(), 1);
    let symbol = &symbols[0];
    assert!(matches!(symbol.kind, SymbolKind::Method(m) if m.name == "get"));

    // The inherited member's context points at Base, carries the arguments
    // written on the extends edge, and chains back to the Derived root.
    assert_eq!(symbol.parent.owner.name, "Base");
    assert_eq!(
        symbol.parent.type_argument_bindings,
        Some(vec![TypeNode::array(TypeNode::named("U"))])
    );
    let chain_root = symbol.parent.parent.as_ref().expect("chained context");
    assert_eq!(chain_root.owner.name, "Derived");
    assert_eq!(
        chain_root.type_argument_bindings,
        Some(vec![TypeNode::named("string")])
    );
}

#[test]
fn extends_entries_that_are_not_interfaces_are_skipped() {
    let mut derived = InterfaceDecl::new("Derived");
    derived.extends.push(TypeNode::named("Missing"));
    derived.extends.push(TypeNode::Union {
        members: vec![TypeNode::named("string"), TypeNode::named("number")],
    });
    derived.body.properties.push(property("b", TypeNode::named("number")));

    let registry = registry(vec![derived]);
    let simplifier = Simplifier::new(&registry);
    let root = SymbolParent::root(registry.interface("Derived").unwrap());

    let symbols = collect_symbols(&simplifier, &root, true);
    assert_eq!(names(&symbols), vec!["b"]);
}

#[test]
fn acyclic_extends_graph_verifies() {
    let mut base = InterfaceDecl::new("Base");
    base.body.properties.push(property("a", TypeNode::named("string")));
    let mut derived = InterfaceDecl::new("Derived");
    derived.extends.push(TypeNode::named("Base"));

    let registry = registry(vec![base, derived]);
    let simplifier = Simplifier::new(&registry);
    assert!(verify_acyclic_extends(&registry, &simplifier).is_ok());
}

#[test]
fn extends_cycle_is_reported_not_walked() {
    let mut a = InterfaceDecl::new("A");
    a.extends.push(TypeNode::named("B"));
    let mut b = InterfaceDecl::new("B");
    b.extends.push(TypeNode::named("A"));

    let registry = registry(vec![a, b]);
    let simplifier = Simplifier::new(&registry);

    let error = verify_acyclic_extends(&registry, &simplifier)
        .expect_err("cycle should be detected");
    assert_eq!(error.cycle.first(), error.cycle.last());
    assert!(error.cycle.contains(&"A".to_string()));
    assert!(error.cycle.contains(&"B".to_string()));
    assert!(error.to_string().contains("inheritance cycle"));
}

#[test]
fn extends_cycle_through_alias_is_reported() {
    let mut a = InterfaceDecl::new("A");
    a.extends.push(TypeNode::named("ToB"));
    let mut b = InterfaceDecl::new("B");
    b.extends.push(TypeNode::named("A"));

    let registry = TypeRegistry::from_document(DeclarationDocument {
        globals: Vec::new(),
        interfaces: vec![a, b],
        type_aliases: vec![tsbind_model::TypeAlias {
            name: "ToB".into(),
            type_parameters: Vec::new(),
            body: TypeNode::named("B"),
        }],
    });
    let simplifier = Simplifier::new(&registry);

    assert!(verify_acyclic_extends(&registry, &simplifier).is_err());
}
