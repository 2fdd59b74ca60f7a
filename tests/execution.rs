use crate::helpers::*;
use graphql_runtime::ast;
use graphql_runtime::ast::Field;
use graphql_runtime::ast::Type;
use graphql_runtime::execution::CancellationToken;
use graphql_runtime::name;
use graphql_runtime::schema::FieldDefinition;
use graphql_runtime::schema::InputValueDefinition;
use graphql_runtime::schema::InterfaceType;
use graphql_runtime::schema::ObjectType;
use graphql_runtime::schema::UnionType;
use graphql_runtime::Context;
use graphql_runtime::ExecutableDocument;
use graphql_runtime::Request;
use graphql_runtime::Resolution;
use graphql_runtime::Value;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Mutex;

#[test]
fn resolves_a_plain_string_field() {
    let schema = version_schema();
    let document = query_doc(query_op().with_selection(Field::new(name!(version))));
    let document = ExecutableDocument::from_ast(&document)
        .validate(&schema)
        .unwrap();
    let response = graphql_runtime::execute_sync(&schema, &document, Request::new());
    assert_eq!(
        response_json(&response),
        json!({"data": {"version": "0.1"}})
    );
}

#[test]
fn reports_a_consumed_deprecated_enum_value() {
    let schema = channel_schema();
    let document = query_doc(
        query_op().with_selection(
            Field::new(name!(info))
                .with_argument(name!(channel), ast::Value::Enum(name!(PUCE)))
                .with_selection(Field::new(name!(name)))
                .with_selection(Field::new(name!(value))),
        ),
    );
    let document = ExecutableDocument::from_ast(&document)
        .validate(&schema)
        .unwrap();
    let response = graphql_runtime::execute_sync(&schema, &document, Request::new());
    let json = response_json(&response);
    assert_eq!(json["data"], json!({"info": {"name": "PUCE", "value": -100}}));
    let errors = json["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert!(errors[0]["message"]
        .as_str()
        .unwrap()
        .contains("deprecated"));
    assert_eq!(errors[0]["path"], json!(["info"]));
}

#[test]
fn reads_a_record_through_the_default_resolvers() {
    let schema = thing_schema();
    let document = query_doc(
        query_op().with_selection(
            Field::new(name!(thing))
                .with_argument(name!(id), "foo")
                .with_selection(Field::new(name!(id)))
                .with_selection(Field::new(name!(name)))
                .with_selection(Field::new(name!(value))),
        ),
    );
    let document = ExecutableDocument::from_ast(&document)
        .validate(&schema)
        .unwrap();
    let response = graphql_runtime::execute_sync(&schema, &document, Request::new());
    assert_eq!(
        response_json(&response),
        json!({"data": {"thing": {"id": "foo", "name": "Foo", "value": 4}}})
    );
}

#[test]
fn null_bubbles_to_the_nearest_nullable_ancestor() {
    let schema = thing_schema();
    let document = query_doc(
        query_op().with_selection(
            Field::new(name!(thing))
                .with_argument(name!(id), "missing")
                .with_selection(Field::new(name!(id))),
        ),
    );
    let document = ExecutableDocument::from_ast(&document)
        .validate(&schema)
        .unwrap();
    let response = graphql_runtime::execute_sync(&schema, &document, Request::new());
    let json = response_json(&response);
    assert_eq!(json["data"], json!({"thing": null}));
    let errors = json["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["path"], json!(["thing", "id"]));
}

#[test]
fn null_for_a_non_null_root_field_nulls_data_entirely() {
    let schema = graphql_runtime::Schema::builder()
        .query(
            ObjectType::query_root().field(
                FieldDefinition::new(name!(must), Type::new_named(name!(String)).non_null())
                    .resolve(|_args, _info| Resolution::null()),
            ),
        )
        .build()
        .unwrap();
    let document = query_doc(query_op().with_selection(Field::new(name!(must))));
    let document = ExecutableDocument::from_ast(&document)
        .validate(&schema)
        .unwrap();
    let response = graphql_runtime::execute_sync(&schema, &document, Request::new());
    let json = response_json(&response);
    assert_eq!(json["data"], json!(null));
    assert_eq!(json["errors"][0]["path"], json!(["must"]));
}

struct Store {
    events: Mutex<Vec<i64>>,
    values: Mutex<HashMap<String, i64>>,
}

#[test]
fn mutation_fields_run_serially_in_document_order() {
    let schema = graphql_runtime::Schema::builder()
        .type_def(
            ObjectType::new(name!(UpdateResult)).field(FieldDefinition::new(
                name!(value),
                Type::new_named(name!(Int)),
            )),
        )
        .query(ObjectType::query_root().field(FieldDefinition::new(
            name!(version),
            Type::new_named(name!(String)),
        )))
        .mutation(
            ObjectType::mutation_root().field(
                FieldDefinition::new(name!(update), Type::new_named(name!(UpdateResult)))
                    .argument(InputValueDefinition::new(
                        name!(id),
                        Type::new_named(name!(ID)).non_null(),
                    ))
                    .argument(InputValueDefinition::new(
                        name!(value),
                        Type::new_named(name!(Int)).non_null(),
                    ))
                    .resolve(|args, info| {
                        let store = info.context().get::<Store>().unwrap();
                        let id = args.get("id").and_then(Value::as_str).unwrap().to_owned();
                        let value = args.get("value").and_then(Value::as_i64).unwrap();
                        store.events.lock().unwrap().push(value);
                        store.values.lock().unwrap().insert(id, value);
                        Resolution::ok(Value::from([("value", Value::Int(value))]))
                    }),
            ),
        )
        .build()
        .unwrap();
    let document = query_doc(
        mutation_op()
            .with_selection(
                Field::new(name!(update))
                    .with_alias(name!(a))
                    .with_argument(name!(id), "foo")
                    .with_argument(name!(value), 1)
                    .with_selection(Field::new(name!(value))),
            )
            .with_selection(
                Field::new(name!(update))
                    .with_alias(name!(b))
                    .with_argument(name!(id), "foo")
                    .with_argument(name!(value), 2)
                    .with_selection(Field::new(name!(value))),
            ),
    );
    let document = ExecutableDocument::from_ast(&document)
        .validate(&schema)
        .unwrap();
    let context = Context::with_value(Store {
        events: Mutex::new(Vec::new()),
        values: Mutex::new(HashMap::new()),
    });
    let response = graphql_runtime::execute_sync(
        &schema,
        &document,
        Request::new().context(context.clone()),
    );
    assert_eq!(
        response_json(&response),
        json!({"data": {"a": {"value": 1}, "b": {"value": 2}}})
    );
    let store = context.get::<Store>().unwrap();
    assert_eq!(*store.events.lock().unwrap(), [1, 2]);
    assert_eq!(store.values.lock().unwrap()["foo"], 2);
}

#[test]
fn skip_and_include_honor_variables_and_literals() {
    let schema = version_schema();
    let document = query_doc(
        query_op()
            .with_variable(ast::VariableDefinition::new(
                name!(on),
                Type::new_named(name!(Boolean)).non_null(),
            ))
            .with_selection(
                Field::new(name!(version)).with_alias(name!(included)).with_directive(
                    ast::Directive::new(name!(include))
                        .with_argument(name!("if"), ast::Value::Variable(name!(on))),
                ),
            )
            .with_selection(
                Field::new(name!(version)).with_alias(name!(skipped)).with_directive(
                    ast::Directive::new(name!(skip)).with_argument(name!("if"), true),
                ),
            ),
    );
    let document = ExecutableDocument::from_ast(&document)
        .validate(&schema)
        .unwrap();
    let response = graphql_runtime::execute_sync(
        &schema,
        &document,
        Request::new().variables(variables(serde_json_bytes::json!({"on": false}))),
    );
    assert_eq!(response_json(&response), json!({"data": {}}));
}

fn pets_schema() -> graphql_runtime::Valid<graphql_runtime::Schema> {
    graphql_runtime::Schema::builder()
        .type_def(
            InterfaceType::new(name!(Pet))
                .field(FieldDefinition::new(
                    name!(name),
                    Type::new_named(name!(String)),
                ))
                .resolve_type(|value, _schema| {
                    match value.get("species")?.as_str()? {
                        "dog" => Some(name!(Dog)),
                        "cat" => Some(name!(Cat)),
                        _ => None,
                    }
                }),
        )
        .type_def(
            ObjectType::new(name!(Dog))
                .implements(name!(Pet))
                .field(FieldDefinition::new(
                    name!(name),
                    Type::new_named(name!(String)),
                ))
                .field(FieldDefinition::new(
                    name!(barks),
                    Type::new_named(name!(Boolean)),
                ))
                .is_type_of(|value| value.get("barks").is_some()),
        )
        .type_def(
            ObjectType::new(name!(Cat))
                .implements(name!(Pet))
                .field(FieldDefinition::new(
                    name!(name),
                    Type::new_named(name!(String)),
                ))
                .field(FieldDefinition::new(
                    name!(meows),
                    Type::new_named(name!(Boolean)),
                ))
                .is_type_of(|value| value.get("meows").is_some()),
        )
        .type_def(
            UnionType::new(name!(CatOrDog))
                .member(name!(Cat))
                .member(name!(Dog)),
        )
        .query(
            ObjectType::query_root()
                .field(
                    FieldDefinition::new(name!(pet), Type::new_named(name!(Pet))).resolve(
                        |_args, _info| {
                            Resolution::ok(Value::from([
                                ("species", Value::from("dog")),
                                ("name", Value::from("Rex")),
                                ("barks", Value::Boolean(true)),
                            ]))
                        },
                    ),
                )
                .field(
                    FieldDefinition::new(name!(catOrDog), Type::new_named(name!(CatOrDog)))
                        .resolve(|_args, _info| {
                            Resolution::ok(Value::from([
                                ("name", Value::from("Whiskers")),
                                ("meows", Value::Boolean(true)),
                            ]))
                        }),
                ),
        )
        .build()
        .unwrap()
}

#[test]
fn interface_values_resolve_through_resolve_type() {
    let schema = pets_schema();
    let document = query_doc(
        query_op().with_selection(
            Field::new(name!(pet))
                .with_selection(Field::new(name!(name)))
                .with_selection(
                    ast::InlineFragment::new(Some(name!(Dog)))
                        .with_selection(Field::new(name!(barks))),
                ),
        ),
    );
    let document = ExecutableDocument::from_ast(&document)
        .validate(&schema)
        .unwrap();
    let response = graphql_runtime::execute_sync(&schema, &document, Request::new());
    assert_eq!(
        response_json(&response),
        json!({"data": {"pet": {"name": "Rex", "barks": true}}})
    );
}

#[test]
fn union_values_resolve_by_scanning_is_type_of() {
    let schema = pets_schema();
    let document = query_doc(
        query_op().with_selection(
            Field::new(name!(catOrDog))
                .with_selection(Field::new(name!(__typename)))
                .with_selection(
                    ast::InlineFragment::new(Some(name!(Cat)))
                        .with_selection(Field::new(name!(meows))),
                ),
        ),
    );
    let document = ExecutableDocument::from_ast(&document)
        .validate(&schema)
        .unwrap();
    let response = graphql_runtime::execute_sync(&schema, &document, Request::new());
    assert_eq!(
        response_json(&response),
        json!({"data": {"catOrDog": {"__typename": "Cat", "meows": true}}})
    );
}

#[test]
fn named_fragments_expand_against_the_runtime_type() {
    let schema = pets_schema();
    let document = query_doc(
        query_op().with_selection(
            Field::new(name!(pet))
                .with_selection(ast::FragmentSpread::new(name!(petFields)))
                .with_selection(
                    ast::InlineFragment::new(Some(name!(Cat)))
                        .with_selection(Field::new(name!(meows))),
                ),
        ),
    )
    .with_definition(
        ast::FragmentDefinition::new(name!(petFields), name!(Pet))
            .with_selection(Field::new(name!(name))),
    );
    let document = ExecutableDocument::from_ast(&document)
        .validate(&schema)
        .unwrap();
    let response = graphql_runtime::execute_sync(&schema, &document, Request::new());
    // The runtime type is Dog, so the Cat inline fragment contributes nothing
    assert_eq!(
        response_json(&response),
        json!({"data": {"pet": {"name": "Rex"}}})
    );
}

#[test]
fn fields_merged_under_one_response_key_combine_their_selections() {
    let schema = thing_schema();
    let document = query_doc(
        query_op()
            .with_selection(
                Field::new(name!(thing))
                    .with_alias(name!(a))
                    .with_argument(name!(id), "foo")
                    .with_selection(Field::new(name!(id))),
            )
            .with_selection(
                Field::new(name!(thing))
                    .with_alias(name!(a))
                    .with_argument(name!(id), "foo")
                    .with_selection(Field::new(name!(name))),
            ),
    );
    let document = ExecutableDocument::from_ast(&document)
        .validate(&schema)
        .unwrap();
    let response = graphql_runtime::execute_sync(&schema, &document, Request::new());
    assert_eq!(
        response_json(&response),
        json!({"data": {"a": {"id": "foo", "name": "Foo"}}})
    );
}

#[test]
fn pending_resolutions_are_awaited() {
    let schema = graphql_runtime::Schema::builder()
        .query(
            ObjectType::query_root().field(
                FieldDefinition::new(name!(delayed), Type::new_named(name!(Int)))
                    .resolve(|_args, _info| {
                        Resolution::future(async { Resolution::ok(7) })
                    }),
            ),
        )
        .build()
        .unwrap();
    let document = query_doc(query_op().with_selection(Field::new(name!(delayed))));
    let document = ExecutableDocument::from_ast(&document)
        .validate(&schema)
        .unwrap();
    let response = graphql_runtime::execute_sync(&schema, &document, Request::new());
    assert_eq!(response_json(&response), json!({"data": {"delayed": 7}}));
}

#[test]
fn subscriptions_execute_as_a_single_query_like_result() {
    let schema = graphql_runtime::Schema::builder()
        .query(ObjectType::query_root().field(FieldDefinition::new(
            name!(version),
            Type::new_named(name!(String)),
        )))
        .subscription(
            ObjectType::subscription_root().field(
                FieldDefinition::new(name!(ticks), Type::new_named(name!(Int)))
                    .resolve(|_args, _info| Resolution::ok(1)),
            ),
        )
        .build()
        .unwrap();
    let document = query_doc(
        ast::OperationDefinition::new(ast::OperationType::Subscription)
            .with_selection(Field::new(name!(ticks))),
    );
    let document = ExecutableDocument::from_ast(&document)
        .validate(&schema)
        .unwrap();
    let response = graphql_runtime::execute_sync(&schema, &document, Request::new());
    assert_eq!(response_json(&response), json!({"data": {"ticks": 1}}));
}

#[test]
fn a_cancelled_execution_returns_a_single_fatal_error() {
    let schema = version_schema();
    let document = query_doc(query_op().with_selection(Field::new(name!(version))));
    let document = ExecutableDocument::from_ast(&document)
        .validate(&schema)
        .unwrap();
    let token = CancellationToken::new();
    token.cancel();
    let response = graphql_runtime::execute_sync(
        &schema,
        &document,
        Request::new().context(Context::new().with_cancellation(token)),
    );
    assert_eq!(
        response_json(&response),
        json!({"errors": [{"message": "execution cancelled"}]})
    );
}

#[test]
fn resolver_errors_null_the_field_and_keep_siblings() {
    let schema = graphql_runtime::Schema::builder()
        .query(
            ObjectType::query_root()
                .field(
                    FieldDefinition::new(name!(bad), Type::new_named(name!(Int)))
                        .resolve(|_args, _info| Resolution::error("boom")),
                )
                .field(
                    FieldDefinition::new(name!(good), Type::new_named(name!(Int)))
                        .resolve(|_args, _info| Resolution::ok(1)),
                ),
        )
        .build()
        .unwrap();
    let document = query_doc(
        query_op()
            .with_selection(Field::new(name!(bad)))
            .with_selection(Field::new(name!(good))),
    );
    let document = ExecutableDocument::from_ast(&document)
        .validate(&schema)
        .unwrap();
    let response = graphql_runtime::execute_sync(&schema, &document, Request::new());
    let json = response_json(&response);
    assert_eq!(json["data"], json!({"bad": null, "good": 1}));
    assert_eq!(json["errors"][0]["message"], "resolver error: boom");
    assert_eq!(json["errors"][0]["path"], json!(["bad"]));
}
