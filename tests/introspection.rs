use crate::helpers::*;
use graphql_runtime::ast::Field;
use graphql_runtime::name;
use graphql_runtime::ExecutableDocument;
use graphql_runtime::Request;
use serde_json::json;

#[test]
fn schema_meta_field_names_the_default_query_root() {
    let schema = version_schema();
    let document = query_doc(
        query_op().with_selection(
            Field::new(name!(__schema)).with_selection(
                Field::new(name!(queryType)).with_selection(Field::new(name!(name))),
            ),
        ),
    );
    let document = ExecutableDocument::from_ast(&document)
        .validate(&schema)
        .unwrap();
    let response = graphql_runtime::execute_sync(&schema, &document, Request::new());
    assert_eq!(
        response_json(&response),
        json!({"data": {"__schema": {"queryType": {"name": "RootQueryType"}}}})
    );
}

#[test]
fn type_meta_field_reflects_an_enum_with_deprecation_filtering() {
    let schema = channel_schema();
    let document = query_doc(
        query_op().with_selection(
            Field::new(name!(__type))
                .with_argument(name!(name), "channel")
                .with_selection(Field::new(name!(kind)))
                .with_selection(Field::new(name!(name)))
                .with_selection(
                    Field::new(name!(enumValues)).with_selection(Field::new(name!(name))),
                )
                .with_selection(
                    Field::new(name!(enumValues))
                        .with_alias(name!(allValues))
                        .with_argument(name!(includeDeprecated), true)
                        .with_selection(Field::new(name!(name)))
                        .with_selection(Field::new(name!(isDeprecated)))
                        .with_selection(Field::new(name!(deprecationReason))),
                ),
        ),
    );
    let document = ExecutableDocument::from_ast(&document)
        .validate(&schema)
        .unwrap();
    let response = graphql_runtime::execute_sync(&schema, &document, Request::new());
    assert_eq!(
        response_json(&response),
        json!({"data": {"__type": {
            "kind": "ENUM",
            "name": "channel",
            "enumValues": [
                {"name": "RED"},
                {"name": "GREEN"},
                {"name": "BLUE"},
            ],
            "allValues": [
                {"name": "RED", "isDeprecated": false, "deprecationReason": null},
                {"name": "GREEN", "isDeprecated": false, "deprecationReason": null},
                {"name": "BLUE", "isDeprecated": false, "deprecationReason": null},
                {"name": "PUCE", "isDeprecated": true, "deprecationReason": "it's ugly"},
            ],
        }}})
    );
}

#[test]
fn wrapper_types_chain_through_of_type() {
    let schema = thing_schema();
    let document = query_doc(
        query_op().with_selection(
            Field::new(name!(__type))
                .with_argument(name!(name), "Thing")
                .with_selection(
                    Field::new(name!(fields))
                        .with_selection(Field::new(name!(name)))
                        .with_selection(
                            Field::new(name!("type"))
                                .with_selection(Field::new(name!(kind)))
                                .with_selection(Field::new(name!(name)))
                                .with_selection(
                                    Field::new(name!(ofType))
                                        .with_selection(Field::new(name!(kind)))
                                        .with_selection(Field::new(name!(name))),
                                ),
                        ),
                ),
        ),
    );
    let document = ExecutableDocument::from_ast(&document)
        .validate(&schema)
        .unwrap();
    let response = graphql_runtime::execute_sync(&schema, &document, Request::new());
    assert_eq!(
        response_json(&response),
        json!({"data": {"__type": {"fields": [
            {"name": "id", "type": {
                "kind": "NON_NULL", "name": null,
                "ofType": {"kind": "SCALAR", "name": "ID"},
            }},
            {"name": "name", "type": {
                "kind": "SCALAR", "name": "String", "ofType": null,
            }},
            {"name": "value", "type": {
                "kind": "SCALAR", "name": "Int", "ofType": null,
            }},
        ]}}})
    );
}

#[test]
fn typename_resolves_on_every_composite_type() {
    let schema = thing_schema();
    let document = query_doc(
        query_op()
            .with_selection(Field::new(name!(__typename)))
            .with_selection(
                Field::new(name!(thing))
                    .with_argument(name!(id), "foo")
                    .with_selection(Field::new(name!(__typename))),
            ),
    );
    let document = ExecutableDocument::from_ast(&document)
        .validate(&schema)
        .unwrap();
    let response = graphql_runtime::execute_sync(&schema, &document, Request::new());
    assert_eq!(
        response_json(&response),
        json!({"data": {
            "__typename": "RootQueryType",
            "thing": {"__typename": "Thing"},
        }})
    );
}

#[test]
fn unknown_type_lookup_resolves_to_null() {
    let schema = version_schema();
    let document = query_doc(
        query_op().with_selection(
            Field::new(name!(__type))
                .with_argument(name!(name), "Ghost")
                .with_selection(Field::new(name!(name))),
        ),
    );
    let document = ExecutableDocument::from_ast(&document)
        .validate(&schema)
        .unwrap();
    let response = graphql_runtime::execute_sync(&schema, &document, Request::new());
    assert_eq!(response_json(&response), json!({"data": {"__type": null}}));
}

#[test]
fn introspection_does_not_hide_reachable_types() {
    let schema = channel_schema();
    let document = query_doc(
        query_op().with_selection(
            Field::new(name!(__schema)).with_selection(
                Field::new(name!(types)).with_selection(Field::new(name!(name))),
            ),
        ),
    );
    let document = ExecutableDocument::from_ast(&document)
        .validate(&schema)
        .unwrap();
    let response = graphql_runtime::execute_sync(&schema, &document, Request::new());
    let json = response_json(&response);
    let names: Vec<&str> = json["data"]["__schema"]["types"]
        .as_array()
        .unwrap()
        .iter()
        .map(|ty| ty["name"].as_str().unwrap())
        .collect();
    for expected in [
        "Int", "Float", "String", "Boolean", "ID", "__Schema", "__Type", "channel",
        "ChannelInfo", "RootQueryType",
    ] {
        assert!(names.contains(&expected), "missing {expected} in {names:?}");
    }
}

#[test]
fn directives_are_reflected_with_locations_and_args() {
    let schema = version_schema();
    let document = query_doc(
        query_op().with_selection(
            Field::new(name!(__schema)).with_selection(
                Field::new(name!(directives))
                    .with_selection(Field::new(name!(name)))
                    .with_selection(Field::new(name!(locations)))
                    .with_selection(
                        Field::new(name!(args)).with_selection(Field::new(name!(name))),
                    ),
            ),
        ),
    );
    let document = ExecutableDocument::from_ast(&document)
        .validate(&schema)
        .unwrap();
    let response = graphql_runtime::execute_sync(&schema, &document, Request::new());
    assert_eq!(
        response_json(&response),
        json!({"data": {"__schema": {"directives": [
            {
                "name": "skip",
                "locations": ["FIELD", "FRAGMENT_SPREAD", "INLINE_FRAGMENT"],
                "args": [{"name": "if"}],
            },
            {
                "name": "include",
                "locations": ["FIELD", "FRAGMENT_SPREAD", "INLINE_FRAGMENT"],
                "args": [{"name": "if"}],
            },
        ]}}})
    );
}
