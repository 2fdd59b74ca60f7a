//! Coercion of raw input values into the internal value domain:
//! request variables against the operation's variable definitions, and
//! field arguments against their declarations.

use crate::ast;
use crate::ast::Type;
use crate::execution::engine::ExecutionContext;
use crate::execution::engine::LinkedPath;
use crate::execution::engine::PropagateNull;
use crate::response::GraphQLError;
use crate::response::JsonMap;
use crate::response::JsonValue;
use crate::response::RequestError;
use crate::schema::FieldDefinition;
use crate::schema::Schema;
use crate::schema::TypeDefinition;
use crate::validation::Valid;
use crate::value::Value;
use crate::value::ValueMap;
use crate::Node;

macro_rules! request_error {
    ($($arg: tt)+) => {
        return Err(RequestError::new(format_args!($($arg)+)))
    };
}

/// Coerce the values of variables from a request to the types declared by
/// the operation.
///
/// A nullable variable with neither a provided value nor a default is bound
/// to null. Any coercion failure is a request error: the request as a whole
/// is rejected and execution does not start.
pub fn coerce_variable_values(
    schema: &Valid<Schema>,
    operation: &ast::OperationDefinition,
    values: &JsonMap,
) -> Result<Valid<ValueMap>, RequestError> {
    let mut coerced_values = ValueMap::default();
    for variable_def in &operation.variables {
        let name = variable_def.name.as_str();
        if let Some(value) = values.get(name) {
            let value = coerce_variable_value(
                schema,
                "variable",
                "",
                "",
                name,
                &variable_def.ty,
                value,
            )
            .map_err(|err| err.with_location(variable_def.span()))?;
            coerced_values.insert(name.to_owned(), value);
        } else if let Some(default) = &variable_def.default_value {
            let value = coerce_literal(schema, None, &variable_def.ty, default)
                .map_err(|message| {
                    RequestError::new(format_args!(
                        "invalid default for variable `${name}`: {message}"
                    ))
                    .with_location(default.span())
                })?;
            coerced_values.insert(name.to_owned(), value);
        } else if variable_def.ty.is_non_null() {
            return Err(RequestError::new(format_args!(
                "missing value for non-null variable `${name}`"
            ))
            .with_location(variable_def.span()));
        } else {
            // No value and no default: the variable is bound to null
            coerced_values.insert(name.to_owned(), Value::Null);
        }
    }
    Ok(Valid::assume_valid(coerced_values))
}

fn coerce_variable_value(
    schema: &Schema,
    kind: &str,
    parent: &str,
    sep: &str,
    name: &str,
    ty: &Type,
    value: &JsonValue,
) -> Result<Value, RequestError> {
    if value.is_null() {
        if ty.is_non_null() {
            request_error!("null value for non-null {kind} {parent}{sep}{name}")
        } else {
            return Ok(Value::Null);
        }
    }
    let ty_name = match ty {
        Type::List(inner) | Type::NonNullList(inner) => {
            return value
                .as_array()
                .map(Vec::as_slice)
                // A single value coerces to a one-element list
                .unwrap_or(std::slice::from_ref(value))
                .iter()
                .map(|item| coerce_variable_value(schema, kind, parent, sep, name, inner, item))
                .collect::<Result<Vec<Value>, _>>()
                .map(Value::List);
        }
        Type::Named(ty_name) | Type::NonNullNamed(ty_name) => ty_name,
    };
    let Some(ty_def) = schema.types.get(ty_name) else {
        request_error!("undefined type {ty_name} for {kind} {parent}{sep}{name}")
    };
    match ty_def {
        TypeDefinition::Object(_) | TypeDefinition::Interface(_) | TypeDefinition::Union(_) => {
            request_error!("non-input type {ty_name} for {kind} {parent}{sep}{name}")
        }
        TypeDefinition::Scalar(def) => def.parse(value).or_else(|message| {
            request_error!("could not coerce {kind} {parent}{sep}{name}: {message}")
        }),
        TypeDefinition::Enum(def) => {
            // The raw value must be a string naming one of the enum's values
            if let Some(str) = value.as_str() {
                if let Some(value_def) = def.values.get(str) {
                    return Ok(value_def.value.clone());
                }
            }
            request_error!(
                "could not coerce {kind} {parent}{sep}{name}: \
                 {value} is not a value of enum {ty_name}"
            )
        }
        TypeDefinition::InputObject(def) => {
            let Some(object) = value.as_object() else {
                request_error!(
                    "could not coerce {kind} {parent}{sep}{name}: \
                     {value} to input object {ty_name}"
                )
            };
            if let Some(key) = object
                .keys()
                .find(|key| !def.fields.contains_key(key.as_str()))
            {
                request_error!(
                    "input object has key {} not in type {ty_name}",
                    key.as_str()
                )
            }
            let mut coerced = ValueMap::default();
            for (field_name, field_def) in &def.fields {
                if let Some(field_value) = object.get(field_name.as_str()) {
                    coerced.insert(
                        field_name.as_str().to_owned(),
                        coerce_variable_value(
                            schema,
                            "input field",
                            ty_name,
                            ".",
                            field_name,
                            &field_def.ty,
                            field_value,
                        )?,
                    );
                } else if let Some(default) = &field_def.default_value {
                    // Defaults are pre-coerced, no re-validation
                    coerced.insert(field_name.as_str().to_owned(), default.clone());
                } else if field_def.ty.is_non_null() {
                    request_error!(
                        "missing value for non-null input object field {ty_name}.{field_name}"
                    )
                } else {
                    coerced.insert(field_name.as_str().to_owned(), Value::Null);
                }
            }
            Ok(Value::Object(coerced))
        }
    }
}

/// Coerce the arguments of one field against their declarations: the
/// argument node's value if supplied (resolving variables), else the
/// declared default, else null.
///
/// A missing or null value for a non-null argument is a field error.
pub(crate) fn coerce_argument_values(
    ctx: &mut ExecutionContext<'_>,
    path: LinkedPath<'_>,
    field_def: &FieldDefinition,
    field: &Node<ast::Field>,
) -> Result<ValueMap, PropagateNull> {
    let mut coerced = ValueMap::default();
    for (arg_name, arg_def) in &field_def.arguments {
        let supplied = field
            .arguments
            .iter()
            .find(|argument| argument.name == *arg_name);
        let value = match supplied {
            Some(argument) => coerce_literal(
                ctx.schema,
                Some(ctx.variables.as_ref()),
                &arg_def.ty,
                &argument.value,
            ),
            None => match &arg_def.default_value {
                // Pre-coerced, no re-validation
                Some(default) => Ok(default.clone()),
                None if arg_def.ty.is_non_null() => Err(format!(
                    "missing value for required argument `{arg_name}`"
                )),
                None => Ok(Value::Null),
            },
        };
        match value {
            Ok(value) => {
                coerced.insert(arg_name.as_str().to_owned(), value);
            }
            Err(message) => {
                ctx.errors.push(GraphQLError::field_error(
                    format!(
                        "could not coerce argument `{arg_name}` of field `{}`: {message}",
                        field.name
                    ),
                    path,
                    field.span(),
                ));
                return Err(PropagateNull);
            }
        }
    }
    Ok(coerced)
}

/// Coerce a document literal against a type, resolving variable references
/// against the (already coerced) variable map.
pub(crate) fn coerce_literal(
    schema: &Schema,
    variables: Option<&ValueMap>,
    ty: &Type,
    literal: &Node<ast::Value>,
) -> Result<Value, String> {
    if let ast::Value::Variable(name) = literal.as_ref() {
        // Variables were coerced against their own declared type up front;
        // validation guarantees that type is compatible with this position
        let value = variables
            .and_then(|variables| variables.get(name.as_str()))
            .cloned()
            .unwrap_or(Value::Null);
        if value.is_null() && ty.is_non_null() {
            return Err(format!("variable `${name}` is null at a non-null position"));
        }
        return Ok(value);
    }
    if literal.is_null() {
        return if ty.is_non_null() {
            Err(format!("null literal for non-null type {ty}"))
        } else {
            Ok(Value::Null)
        };
    }
    let ty_name = match ty {
        Type::List(inner) | Type::NonNullList(inner) => {
            return match literal.as_ref() {
                ast::Value::List(items) => items
                    .iter()
                    .map(|item| coerce_literal(schema, variables, inner, item))
                    .collect::<Result<Vec<Value>, _>>()
                    .map(Value::List),
                // A single value coerces to a one-element list
                _ => Ok(Value::List(vec![coerce_literal(
                    schema, variables, inner, literal,
                )?])),
            };
        }
        Type::Named(ty_name) | Type::NonNullNamed(ty_name) => ty_name,
    };
    let Some(ty_def) = schema.types.get(ty_name) else {
        return Err(format!("undefined type {ty_name}"));
    };
    match ty_def {
        TypeDefinition::Object(_) | TypeDefinition::Interface(_) | TypeDefinition::Union(_) => {
            Err(format!("non-input type {ty_name}"))
        }
        TypeDefinition::Scalar(def) => {
            let raw = literal_to_json(variables, literal)?;
            def.parse(&raw)
        }
        TypeDefinition::Enum(def) => {
            // An enum literal's name resolves to the value's internal value
            if let ast::Value::Enum(name) = literal.as_ref() {
                if let Some(value_def) = def.values.get(name) {
                    return Ok(value_def.value.clone());
                }
            }
            Err(format!("expected a value of enum {ty_name}"))
        }
        TypeDefinition::InputObject(def) => {
            let ast::Value::Object(entries) = literal.as_ref() else {
                return Err(format!("expected an input object of type {ty_name}"));
            };
            if let Some((key, _)) = entries
                .iter()
                .find(|(key, _)| !def.fields.contains_key(key))
            {
                return Err(format!("input object has key {key} not in type {ty_name}"));
            }
            let mut coerced = ValueMap::default();
            for (field_name, field_def) in &def.fields {
                let supplied = entries.iter().find(|(key, _)| key == field_name);
                if let Some((_, field_value)) = supplied {
                    coerced.insert(
                        field_name.as_str().to_owned(),
                        coerce_literal(schema, variables, &field_def.ty, field_value)?,
                    );
                } else if let Some(default) = &field_def.default_value {
                    coerced.insert(field_name.as_str().to_owned(), default.clone());
                } else if field_def.ty.is_non_null() {
                    return Err(format!(
                        "missing value for non-null input object field {ty_name}.{field_name}"
                    ));
                } else {
                    coerced.insert(field_name.as_str().to_owned(), Value::Null);
                }
            }
            Ok(Value::Object(coerced))
        }
    }
}

/// Lower a literal to raw JSON for a scalar `parse` function, resolving any
/// variable references it contains.
fn literal_to_json(
    variables: Option<&ValueMap>,
    literal: &Node<ast::Value>,
) -> Result<JsonValue, String> {
    Ok(match literal.as_ref() {
        ast::Value::Null => JsonValue::Null,
        ast::Value::Variable(name) => variables
            .and_then(|variables| variables.get(name.as_str()))
            .map(Value::to_json)
            .unwrap_or(JsonValue::Null),
        ast::Value::Enum(name) => name.as_str().into(),
        ast::Value::String(value) => value.as_str().into(),
        ast::Value::Boolean(value) => (*value).into(),
        ast::Value::Int(value) => JsonValue::Number(
            value
                .as_str()
                .parse()
                .map_err(|_| format!("int literal {} overflows", value.as_str()))?,
        ),
        ast::Value::Float(value) => JsonValue::Number(
            value
                .as_str()
                .parse()
                .map_err(|_| format!("float literal {} overflows", value.as_str()))?,
        ),
        ast::Value::List(items) => JsonValue::Array(
            items
                .iter()
                .map(|item| literal_to_json(variables, item))
                .collect::<Result<_, _>>()?,
        ),
        ast::Value::Object(entries) => JsonValue::Object(
            entries
                .iter()
                .map(|(key, value)| {
                    Ok((key.as_str().into(), literal_to_json(variables, value)?))
                })
                .collect::<Result<_, String>>()?,
        ),
    })
}
