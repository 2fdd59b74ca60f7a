use crate::helpers::*;
use graphql_runtime::ast;
use graphql_runtime::ast::Type;
use graphql_runtime::execution::coerce_variable_values;
use graphql_runtime::name;
use graphql_runtime::schema::EnumType;
use graphql_runtime::schema::EnumValueDefinition;
use graphql_runtime::schema::FieldDefinition;
use graphql_runtime::schema::InputObjectType;
use graphql_runtime::schema::InputValueDefinition;
use graphql_runtime::schema::ObjectType;
use graphql_runtime::Schema;
use graphql_runtime::Valid;
use graphql_runtime::Value;
use serde_json_bytes::json;

fn coercion_schema() -> Valid<Schema> {
    Schema::builder()
        .type_def(
            InputObjectType::new(name!(CarInput))
                .field(InputValueDefinition::new(
                    name!(kilometers),
                    Type::new_named(name!(Float)).non_null(),
                ))
                .field(
                    InputValueDefinition::new(name!(label), Type::new_named(name!(String)))
                        .default_value("n/a"),
                ),
        )
        .type_def(
            EnumType::new(name!(channel))
                .value(EnumValueDefinition::new(name!(RED)).value("r"))
                .value(EnumValueDefinition::new(name!(PUCE)).value("p")),
        )
        .query(ObjectType::query_root().field(FieldDefinition::new(
            name!(ok),
            Type::new_named(name!(Boolean)),
        )))
        .build()
        .unwrap()
}

fn op_with_variable(name: ast::Name, ty: Type) -> ast::OperationDefinition {
    query_op().with_variable(ast::VariableDefinition::new(name, ty))
}

#[test]
fn integer_input_coerces_to_float_and_defaults_fill_in() {
    let schema = coercion_schema();
    let operation = op_with_variable(
        name!(car),
        Type::new_named(name!(CarInput)).non_null(),
    );
    let coerced = coerce_variable_values(
        &schema,
        &operation,
        &variables(json!({"car": {"kilometers": 3000}})),
    )
    .unwrap();
    assert_eq!(
        coerced.get("car"),
        Some(&Value::from([
            ("kilometers", Value::Float(3000.0)),
            ("label", Value::from("n/a")),
        ]))
    );
}

#[test]
fn unknown_input_object_keys_are_rejected() {
    let schema = coercion_schema();
    let operation = op_with_variable(
        name!(car),
        Type::new_named(name!(CarInput)).non_null(),
    );
    let error = coerce_variable_values(
        &schema,
        &operation,
        &variables(json!({"car": {"kilometers": 1, "colour": "red"}})),
    )
    .unwrap_err();
    assert!(error.message().contains("not in type CarInput"));
}

#[test]
fn missing_non_null_input_field_is_rejected() {
    let schema = coercion_schema();
    let operation = op_with_variable(
        name!(car),
        Type::new_named(name!(CarInput)).non_null(),
    );
    let error = coerce_variable_values(&schema, &operation, &variables(json!({"car": {}})))
        .unwrap_err();
    assert!(error.message().contains("CarInput.kilometers"));
}

#[test]
fn a_single_value_coerces_to_a_one_element_list() {
    let schema = coercion_schema();
    let operation = op_with_variable(
        name!(ids),
        Type::new_named(name!(ID)).non_null().list(),
    );
    let coerced =
        coerce_variable_values(&schema, &operation, &variables(json!({"ids": "x"}))).unwrap();
    assert_eq!(
        coerced.get("ids"),
        Some(&Value::List(vec![Value::from("x")]))
    );
}

#[test]
fn enum_names_coerce_to_their_internal_values() {
    let schema = coercion_schema();
    let operation = op_with_variable(name!(pick), Type::new_named(name!(channel)));
    let coerced =
        coerce_variable_values(&schema, &operation, &variables(json!({"pick": "PUCE"})))
            .unwrap();
    assert_eq!(coerced.get("pick"), Some(&Value::from("p")));

    let error =
        coerce_variable_values(&schema, &operation, &variables(json!({"pick": "MAUVE"})))
            .unwrap_err();
    assert!(error.message().contains("enum channel"));
}

#[test]
fn missing_non_null_variable_is_rejected() {
    let schema = coercion_schema();
    let operation = op_with_variable(
        name!(car),
        Type::new_named(name!(CarInput)).non_null(),
    );
    let error = coerce_variable_values(&schema, &operation, &variables(json!({}))).unwrap_err();
    assert!(error.message().contains("non-null variable `$car`"));
}

#[test]
fn absent_nullable_variable_binds_null() {
    let schema = coercion_schema();
    let operation = op_with_variable(name!(maybe), Type::new_named(name!(Int)));
    let coerced = coerce_variable_values(&schema, &operation, &variables(json!({}))).unwrap();
    assert_eq!(coerced.get("maybe"), Some(&Value::Null));
}

#[test]
fn variable_defaults_are_used_without_a_provided_value() {
    let schema = coercion_schema();
    let operation = query_op().with_variable(
        ast::VariableDefinition::new(name!(count), Type::new_named(name!(Int))).with_default(5),
    );
    let coerced = coerce_variable_values(&schema, &operation, &variables(json!({}))).unwrap();
    assert_eq!(coerced.get("count"), Some(&Value::Int(5)));
}

#[test]
fn coercion_is_idempotent_over_its_own_output() {
    let schema = coercion_schema();
    let operation = op_with_variable(
        name!(car),
        Type::new_named(name!(CarInput)).non_null(),
    );
    let raw = variables(json!({"car": {"kilometers": 12.5, "label": "mine"}}));
    let first = coerce_variable_values(&schema, &operation, &raw).unwrap();

    let mut round_tripped = graphql_runtime::response::JsonMap::new();
    round_tripped.insert("car", first.get("car").unwrap().to_json());
    let second = coerce_variable_values(&schema, &operation, &round_tripped).unwrap();
    assert_eq!(first.get("car"), second.get("car"));
}
