use crate::helpers::*;
use graphql_runtime::ast::OperationType;
use graphql_runtime::ast::Type;
use graphql_runtime::name;
use graphql_runtime::Name;
use graphql_runtime::Value;
use serde_json_bytes::json;

#[test]
fn building_the_same_schema_twice_is_deterministic() {
    assert_eq!(*channel_schema(), *channel_schema());
    assert_eq!(*thing_schema(), *thing_schema());
}

#[test]
fn non_null_wrapping_is_idempotent_and_unwraps_to_the_inner_type() {
    let int = Type::new_named(name!(Int));
    let non_null = int.clone().non_null();
    assert_eq!(non_null.clone().non_null(), non_null);
    assert_eq!(non_null.clone().nullable(), int);
    assert_eq!(non_null.inner_named_type(), "Int");

    // Outermost-first reading: [Int!]! is a non-null list of non-null Int
    let wrapped = Type::new_named(name!(Int)).non_null().list().non_null();
    assert!(wrapped.is_non_null() && wrapped.is_list());
    assert!(wrapped.item_type().is_non_null());
    assert_eq!(wrapped.to_string(), "[Int!]!");
}

#[test]
fn enum_values_round_trip_between_names_and_internal_values() {
    let schema = channel_schema();
    let channel = schema.get_enum("channel").unwrap();
    for (name, def) in &channel.values {
        // Input coercion takes the name to the internal value; reverse
        // lookup takes it back
        assert_eq!(channel.reverse_lookup(&def.value), Some(name));
    }
    assert_eq!(
        channel.reverse_lookup(&Value::from("p")),
        Some(&name!(PUCE))
    );
    assert_eq!(channel.reverse_lookup(&Value::from("x")), None);
}

#[test]
fn root_types_have_conventional_default_names() {
    assert_eq!(
        OperationType::Query.default_root_type_name(),
        "RootQueryType"
    );
    assert_eq!(
        OperationType::Mutation.default_root_type_name(),
        "RootMutationType"
    );
    assert_eq!(
        OperationType::Subscription.default_root_type_name(),
        "RootSubscriptionType"
    );
    let schema = version_schema();
    assert_eq!(schema.query_root.as_str(), "RootQueryType");
}

#[test]
fn identifiers_camel_case_into_type_names() {
    assert_eq!(
        Name::from_identifier("channel_info").unwrap().as_str(),
        "ChannelInfo"
    );
    assert_eq!(Name::from_identifier("thing").unwrap().as_str(), "Thing");
}

#[test]
fn type_field_includes_the_reserved_meta_fields() {
    let schema = thing_schema();
    assert!(schema.type_field("RootQueryType", "__schema").is_ok());
    assert!(schema.type_field("RootQueryType", "__type").is_ok());
    assert!(schema.type_field("Thing", "__typename").is_ok());
    // __schema exists on the query root only
    assert!(schema.type_field("Thing", "__schema").is_err());
}

#[test]
fn custom_scalars_can_override_both_coercion_directions() {
    use graphql_runtime::schema::FieldDefinition;
    use graphql_runtime::schema::ObjectType;
    use graphql_runtime::schema::ScalarType;

    let schema = graphql_runtime::Schema::builder()
        .type_def(
            ScalarType::new(name!(Upper))
                .parse_with(|raw| match raw.as_str() {
                    Some(s) => Ok(Value::String(s.to_uppercase())),
                    None => Err("expected a string".into()),
                })
                .serialize_with(|value| match value {
                    Value::String(s) => Ok(s.to_lowercase().into()),
                    _ => Err("expected a string".into()),
                }),
        )
        .query(ObjectType::query_root().field(FieldDefinition::new(
            name!(code),
            Type::new_named(name!(Upper)),
        )))
        .build()
        .unwrap();
    let upper = schema.get_scalar("Upper").unwrap();
    assert_eq!(upper.parse(&json!("abc")), Ok(Value::from("ABC")));
    assert_eq!(upper.serialize(&Value::from("ABC")), Ok(json!("abc")));
}
