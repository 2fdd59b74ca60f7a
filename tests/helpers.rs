//! Schemas and document-building shorthand shared by the integration tests.

use graphql_runtime::ast;
use graphql_runtime::ast::OperationType;
use graphql_runtime::name;
use graphql_runtime::schema::EnumType;
use graphql_runtime::schema::EnumValueDefinition;
use graphql_runtime::schema::FieldDefinition;
use graphql_runtime::schema::InputValueDefinition;
use graphql_runtime::schema::ObjectType;
use graphql_runtime::schema::Type;
use graphql_runtime::response::JsonMap;
use graphql_runtime::value::ValueMap;
use graphql_runtime::Resolution;
use graphql_runtime::Schema;
use graphql_runtime::Valid;
use graphql_runtime::Value;

pub fn query_doc(operation: ast::OperationDefinition) -> ast::Document {
    ast::Document::new().with_definition(operation)
}

pub fn query_op() -> ast::OperationDefinition {
    ast::OperationDefinition::new(OperationType::Query)
}

pub fn mutation_op() -> ast::OperationDefinition {
    ast::OperationDefinition::new(OperationType::Mutation)
}

pub fn variables(json: serde_json_bytes::Value) -> JsonMap {
    match json {
        serde_json_bytes::Value::Object(map) => map,
        _ => panic!("variables must be a JSON object"),
    }
}

pub fn response_json(response: &graphql_runtime::Response) -> serde_json::Value {
    serde_json::to_value(response).unwrap()
}

/// `version: String` resolving to `"0.1"`.
pub fn version_schema() -> Valid<Schema> {
    Schema::builder()
        .query(
            ObjectType::query_root().field(
                FieldDefinition::new(name!(version), Type::new_named(name!(String)))
                    .resolve(|_args, _info| "0.1".into()),
            ),
        )
        .build()
        .unwrap()
}

/// The `channel` enum with internal color codes, a deprecated `PUCE`, and
/// `info(channel: channel!): ChannelInfo` echoing what it was called with.
pub fn channel_schema() -> Valid<Schema> {
    Schema::builder()
        .type_def(
            EnumType::new(name!(channel))
                .value(EnumValueDefinition::new(name!(RED)).value("r"))
                .value(EnumValueDefinition::new(name!(GREEN)).value("g"))
                .value(EnumValueDefinition::new(name!(BLUE)).value("b"))
                .value(
                    EnumValueDefinition::new(name!(PUCE))
                        .value("p")
                        .deprecated("it's ugly"),
                ),
        )
        .type_def(
            ObjectType::new(name!(ChannelInfo))
                .field(FieldDefinition::new(
                    name!(name),
                    Type::new_named(name!(String)),
                ))
                .field(FieldDefinition::new(
                    name!(value),
                    Type::new_named(name!(Int)),
                )),
        )
        .query(
            ObjectType::query_root().field(
                FieldDefinition::new(name!(info), Type::new_named(name!(ChannelInfo)))
                    .argument(InputValueDefinition::new(
                        name!(channel),
                        Type::new_named(name!(channel)).non_null(),
                    ))
                    .resolve(|args, _info| {
                        assert_eq!(args.get("channel"), Some(&Value::String("p".into())));
                        Resolution::ok(Value::from([
                            ("name", Value::from("PUCE")),
                            ("value", Value::Int(-100)),
                        ]))
                    }),
            ),
        )
        .build()
        .unwrap()
}

/// `thing(id: ID!): Thing` backed by a fixed store with one entry `foo`.
/// An unknown id resolves to an empty record, so its `id: ID!` errors.
pub fn thing_schema() -> Valid<Schema> {
    Schema::builder()
        .type_def(
            ObjectType::new(name!(Thing))
                .field(FieldDefinition::new(
                    name!(id),
                    Type::new_named(name!(ID)).non_null(),
                ))
                .field(FieldDefinition::new(
                    name!(name),
                    Type::new_named(name!(String)),
                ))
                .field(FieldDefinition::new(
                    name!(value),
                    Type::new_named(name!(Int)),
                )),
        )
        .query(
            ObjectType::query_root().field(
                FieldDefinition::new(name!(thing), Type::new_named(name!(Thing)))
                    .argument(InputValueDefinition::new(
                        name!(id),
                        Type::new_named(name!(ID)).non_null(),
                    ))
                    .resolve(|args, _info| {
                        let found = match args.get("id").and_then(Value::as_str) {
                            Some("foo") => Value::from([
                                ("id", Value::from("foo")),
                                ("name", Value::from("Foo")),
                                ("value", Value::Int(4)),
                            ]),
                            _ => Value::Object(ValueMap::default()),
                        };
                        Resolution::ok(found)
                    }),
            ),
        )
        .build()
        .unwrap()
}
