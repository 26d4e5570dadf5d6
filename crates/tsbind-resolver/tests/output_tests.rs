use tsbind_model::{DeclarationDocument, TypeRegistry};
use tsbind_resolver::{ResolveOptions, ResolvedInterface, resolve_document};

fn registry_from(json: &str) -> TypeRegistry {
    TypeRegistry::from_document(DeclarationDocument::from_json(json).expect("document parses"))
}

fn find<'a>(program: &'a [ResolvedInterface], name: &str) -> &'a ResolvedInterface {
    program
        .iter()
        .find(|i| i.name == name)
        .unwrap_or_else(|| panic!("missing interface {name}"))
}

#[test]
fn interfaces_flatten_with_nominal_names() {
    let registry = registry_from(
        r#"{
            "interfaces": [
                {"name": "Base", "body": {
                    "properties": [{"name": "id", "type": {"single": {"name": "number"}}}]
                }},
                {"name": "Widget", "extends": [{"single": {"name": "Base"}}], "body": {
                    "properties": [{"name": "label", "type": {"single": {"name": "string"}}}],
                    "methods": [{"name": "show", "returnType": {"single": {"name": "void"}}}]
                }}
            ]
        }"#,
    );
    let program = resolve_document(&registry, &ResolveOptions::default());

    let widget = find(&program.interfaces, "IWidget");
    let names: Vec<&str> = widget.properties.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["id", "label"]);
    assert_eq!(widget.properties[0].type_name, "Number");
    assert_eq!(widget.properties[1].type_name, "String");
    // `void` return renders as "no value".
    assert_eq!(widget.methods[0].name, "show");
    assert_eq!(widget.methods[0].return_type, None);
}

#[test]
fn overload_groups_collapse_to_one_method() {
    let registry = registry_from(
        r#"{
            "interfaces": [
                {"name": "Store", "body": {"methods": [
                    {"name": "get",
                     "parameters": [{"name": "key", "type": {"single": {"name": "string"}}}],
                     "returnType": {"single": {"name": "string"}}},
                    {"name": "get",
                     "parameters": [{"name": "index", "type": {"single": {"name": "number"}}}],
                     "returnType": {"single": {"name": "string"}}},
                    {"name": "get",
                     "parameters": [
                         {"name": "key", "type": {"single": {"name": "string"}}},
                         {"name": "fallback", "type": {"single": {"name": "string"}}}
                     ],
                     "returnType": {"single": {"name": "string"}}}
                ]}}
            ]
        }"#,
    );
    let program = resolve_document(&registry, &ResolveOptions::default());

    let store = find(&program.interfaces, "IStore");
    // Same name, different arity: two separate groups.
    assert_eq!(store.methods.len(), 2);

    let unary = &store.methods[0];
    assert_eq!(unary.parameters.len(), 1);
    assert_eq!(unary.parameters[0].name, "key");
    // string vs number widens to the top type.
    assert_eq!(unary.parameters[0].type_name, "AnyObject");
    assert_eq!(unary.return_type.as_deref(), Some("String"));

    let binary = &store.methods[1];
    assert_eq!(binary.parameters.len(), 2);
    assert_eq!(binary.parameters[1].type_name, "String");
}

#[test]
fn complex_value_members_are_dropped_silently() {
    let registry = registry_from(
        r#"{
            "interfaces": [
                {"name": "Mixed", "body": {"properties": [
                    {"name": "ok", "type": {"single": {"name": "string"}}},
                    {"name": "mixed", "type": {"union": {"members": [
                        {"single": {"name": "string"}},
                        {"single": {"name": "number"}}
                    ]}}},
                    {"name": "items", "type": {"array": {"element": {"single": {"name": "string"}}}}},
                    {"name": "tagged", "type": {"single": {"literal": "\"on\""}}},
                    {"name": "boxed", "type": {"single": {"name": "Box", "typeArguments": [
                        {"single": {"name": "string"}}
                    ]}}}
                ]}},
                {"name": "Box", "typeParameters": [{"name": "T"}], "body": {}}
            ]
        }"#,
    );
    let program = resolve_document(&registry, &ResolveOptions::default());

    let mixed = find(&program.interfaces, "IMixed");
    let names: Vec<&str> = mixed.properties.iter().map(|p| p.name.as_str()).collect();
    // Only the plain named reference survives the generator-stage filter.
    assert_eq!(names, vec!["ok"]);
}

#[test]
fn derived_property_overrides_base_in_place() {
    let registry = registry_from(
        r#"{
            "interfaces": [
                {"name": "Base", "body": {"properties": [
                    {"name": "first", "type": {"single": {"name": "string"}}},
                    {"name": "value", "type": {"single": {"name": "string"}}}
                ]}},
                {"name": "Derived", "extends": [{"single": {"name": "Base"}}], "body": {
                    "properties": [{"name": "value", "type": {"single": {"name": "number"}}}]
                }}
            ]
        }"#,
    );
    let program = resolve_document(&registry, &ResolveOptions::default());

    let derived = find(&program.interfaces, "IDerived");
    let names: Vec<&str> = derived.properties.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["first", "value"]);
    assert_eq!(derived.properties[1].type_name, "Number");
}

#[test]
fn prototype_attachment_types_a_bare_global() {
    let registry = registry_from(
        r#"{
            "globals": [{"name": "foo"}],
            "interfaces": [
                {"name": "Global", "body": {}},
                {"name": "Foo", "body": {"properties": [
                    {"name": "prototype", "type": {"single": {"name": "Foo"}}}
                ]}}
            ]
        }"#,
    );
    let program = resolve_document(
        &registry,
        &ResolveOptions {
            global_object: Some("Global".into()),
        },
    );

    let global = find(&program.interfaces, "IGlobal");
    let foo = global
        .properties
        .iter()
        .find(|p| p.name == "foo")
        .expect("global property synthesized");
    assert_eq!(foo.type_name, "IFoo");
}

#[test]
fn inline_body_globals_type_as_their_synthetic_interface() {
    let registry = registry_from(
        r#"{
            "globals": [
                {"name": "console", "inlineInterfaceBody": {
                    "methods": [{"name": "log",
                        "parameters": [{"name": "message", "type": {"single": {"name": "string"}}}],
                        "returnType": {"single": {"name": "void"}}}]
                }}
            ],
            "interfaces": [{"name": "Global", "body": {}}]
        }"#,
    );
    let program = resolve_document(
        &registry,
        &ResolveOptions {
            global_object: Some("Global".into()),
        },
    );

    let global = find(&program.interfaces, "IGlobal");
    assert_eq!(global.properties[0].name, "console");
    assert_eq!(global.properties[0].type_name, "IConsole");

    // The hoisted body resolves like any declared interface.
    let console = find(&program.interfaces, "IConsole");
    assert_eq!(console.methods[0].name, "log");
    assert_eq!(console.methods[0].parameters[0].type_name, "String");
}

#[test]
fn declared_member_shadows_global_of_same_name() {
    let registry = registry_from(
        r#"{
            "globals": [{"name": "version"}],
            "interfaces": [
                {"name": "Global", "body": {"properties": [
                    {"name": "version", "type": {"single": {"name": "string"}}}
                ]}}
            ]
        }"#,
    );
    let program = resolve_document(
        &registry,
        &ResolveOptions {
            global_object: Some("Global".into()),
        },
    );

    let global = find(&program.interfaces, "IGlobal");
    let versions: Vec<&str> = global
        .properties
        .iter()
        .filter(|p| p.name == "version")
        .map(|p| p.type_name.as_str())
        .collect();
    assert_eq!(versions, vec!["String"]);
}

#[test]
fn undeclared_global_object_gets_a_shell_interface() {
    let registry = registry_from(r#"{"globals": [{"name": "thing"}]}"#);
    let program = resolve_document(
        &registry,
        &ResolveOptions {
            global_object: Some("Global".into()),
        },
    );

    let global = find(&program.interfaces, "IGlobal");
    assert_eq!(global.properties[0].name, "thing");
    assert_eq!(global.properties[0].type_name, "AnyObject");
}

#[test]
fn global_with_declared_type_renders_it() {
    let registry = registry_from(
        r#"{
            "globals": [
                {"name": "flag", "declaredType": {"single": {"name": "boolean"}}},
                {"name": "doc", "declaredType": {"single": {"name": "Document"}}}
            ],
            "interfaces": [
                {"name": "Global", "body": {}},
                {"name": "Document", "body": {}}
            ]
        }"#,
    );
    let program = resolve_document(
        &registry,
        &ResolveOptions {
            global_object: Some("Global".into()),
        },
    );

    let global = find(&program.interfaces, "IGlobal");
    assert_eq!(global.properties[0].name, "flag");
    assert_eq!(global.properties[0].type_name, "Boolean");
    assert_eq!(global.properties[1].name, "doc");
    assert_eq!(global.properties[1].type_name, "IDocument");
}

#[test]
fn resolved_program_serializes_for_the_emitter() {
    let registry = registry_from(
        r#"{
            "interfaces": [
                {"name": "Point", "body": {"properties": [
                    {"name": "x", "readonly": true, "type": {"single": {"name": "number"}}}
                ]}}
            ]
        }"#,
    );
    let program = resolve_document(&registry, &ResolveOptions::default());

    let json = serde_json::to_value(&program).expect("serializes");
    assert_eq!(json["interfaces"][0]["name"], "IPoint");
    assert_eq!(json["interfaces"][0]["properties"][0]["type"], "Number");
    assert_eq!(json["interfaces"][0]["properties"][0]["readonly"], true);
}
