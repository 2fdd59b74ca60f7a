//! Completion of resolved values against their declared types.

use crate::ast;
use crate::execution::engine::execute_selection_set;
use crate::execution::engine::try_nullify;
use crate::execution::engine::ExecutionContext;
use crate::execution::engine::ExecutionMode;
use crate::execution::engine::LinkedPath;
use crate::execution::engine::LinkedPathElement;
use crate::execution::engine::ObjectSource;
use crate::execution::engine::PropagateNull;
use crate::execution::engine::Resolved;
use crate::introspection::MetaValue;
use crate::response::GraphQLError;
use crate::response::JsonValue;
use crate::response::PathSegment;
use crate::schema::ObjectType;
use crate::schema::Type;
use crate::schema::TypeDefinition;
use crate::value::Value;
use crate::Name;
use crate::Node;

/// Produce the response value for a resolved field, given its declared type.
///
/// Returns `Err` for a field error being propagated upwards to find a
/// nullable place.
pub(crate) async fn complete_value<'a, 'r>(
    ctx: &mut ExecutionContext<'a>,
    path: LinkedPath<'_>,
    mode: ExecutionMode,
    ty: &Type,
    resolved: Resolved<'r>,
    fields: &[&'a Node<ast::Field>],
) -> Result<JsonValue, PropagateNull> {
    let schema = ctx.schema;
    let span = fields[0].span();
    macro_rules! field_error {
        ($($arg: tt)+) => {
            {
                ctx.errors.push(GraphQLError::field_error(
                    format!($($arg)+),
                    path,
                    span,
                ));
                return Err(PropagateNull);
            }
        };
    }

    // Meta leaves carry plain values
    let resolved = match resolved {
        Resolved::Meta(MetaValue::Leaf(value)) => Resolved::Value(value),
        other => other,
    };

    if let Resolved::Value(Value::Null) = &resolved {
        if ty.is_non_null() {
            field_error!("non-null type {ty} resolved to null")
        }
        return Ok(JsonValue::Null);
    }

    if ty.is_list() {
        let inner_ty = ty.item_type();
        return match resolved {
            Resolved::Value(Value::List(items)) => {
                Box::pin(complete_list_value(
                    ctx,
                    path,
                    mode,
                    ty,
                    inner_ty,
                    fields,
                    items.into_iter().map(Resolved::Value),
                ))
                .await
            }
            Resolved::Meta(MetaValue::List(items)) => {
                Box::pin(complete_list_value(
                    ctx,
                    path,
                    mode,
                    ty,
                    inner_ty,
                    fields,
                    items.map(Resolved::Meta),
                ))
                .await
            }
            Resolved::Value(_) | Resolved::Meta(_) => {
                field_error!("list type {ty} resolved to a non-list value")
            }
        };
    }

    let ty_name = ty.inner_named_type();
    let Some(ty_def) = schema.types.get(ty_name) else {
        // The schema linked every reference at build time
        field_error!("undefined type {ty_name} in a built schema, this is a bug")
    };

    match (ty_def, resolved) {
        (TypeDefinition::InputObject(_), _) => {
            field_error!("field with input object type {ty_name}, this is a bug")
        }
        (TypeDefinition::Scalar(def), Resolved::Value(value)) => match def.serialize(&value) {
            Ok(json) => Ok(json),
            Err(message) => field_error!("could not serialize scalar {ty_name}: {message}"),
        },
        (TypeDefinition::Enum(def), Resolved::Value(value)) => {
            // Reverse lookup: the internal value maps back to its name
            match def.reverse_lookup(&value) {
                Some(name) => Ok(name.as_str().into()),
                None => {
                    field_error!("resolver returned {value}, which is not a value of enum {ty_name}")
                }
            }
        }
        (TypeDefinition::Scalar(_) | TypeDefinition::Enum(_), Resolved::Meta(_)) => {
            field_error!("resolver returned an object, expected leaf type {ty_name}")
        }
        (
            TypeDefinition::Object(_) | TypeDefinition::Interface(_) | TypeDefinition::Union(_),
            Resolved::Value(value),
        ) => {
            if let Value::List(_) = &value {
                field_error!("non-list type {ty} resolved to a list")
            }
            let object_def = match ty_def {
                TypeDefinition::Object(def) => def,
                TypeDefinition::Interface(_) | TypeDefinition::Union(_) => {
                    resolve_runtime_object(ctx, path, span, ty_name, ty_def, &value)?
                }
                _ => unreachable!(), // arms above
            };
            let map = Box::pin(execute_selection_set(
                ctx,
                path,
                mode,
                object_def,
                ObjectSource::Value(&value),
                fields.iter().flat_map(|field| &field.selection_set),
            ))
            .await?;
            Ok(JsonValue::Object(map))
        }
        (
            TypeDefinition::Object(_) | TypeDefinition::Interface(_) | TypeDefinition::Union(_),
            Resolved::Meta(MetaValue::Object(meta)),
        ) => {
            // Introspection objects name their own concrete meta type
            let Some(object_def) = schema.get_object(meta.type_name()) else {
                field_error!(
                    "introspection resolver returned an object of undefined type {}",
                    meta.type_name()
                )
            };
            let map = Box::pin(execute_selection_set(
                ctx,
                path,
                mode,
                object_def,
                ObjectSource::Meta(&*meta),
                fields.iter().flat_map(|field| &field.selection_set),
            ))
            .await?;
            Ok(JsonValue::Object(map))
        }
        (
            TypeDefinition::Object(_) | TypeDefinition::Interface(_) | TypeDefinition::Union(_),
            Resolved::Meta(_),
        ) => {
            field_error!("composite type {ty_name} resolved to a non-object value")
        }
    }
}

/// Pick the concrete object type for a value of an abstract type: ask the
/// abstract type's `resolve_type`, or scan the candidate objects'
/// `is_type_of` discriminators. Exactly one candidate must claim the value.
fn resolve_runtime_object<'s>(
    ctx: &mut ExecutionContext<'s>,
    path: LinkedPath<'_>,
    span: Option<crate::SourceSpan>,
    ty_name: &Name,
    ty_def: &TypeDefinition,
    value: &Value,
) -> Result<&'s Node<ObjectType>, PropagateNull> {
    let schema = ctx.schema;
    macro_rules! field_error {
        ($($arg: tt)+) => {
            {
                ctx.errors.push(GraphQLError::field_error(
                    format!($($arg)+),
                    path,
                    span,
                ));
                return Err(PropagateNull);
            }
        };
    }

    let (resolve_type, candidates): (_, Vec<&Name>) = match ty_def {
        TypeDefinition::Interface(def) => {
            let implementers = ctx
                .implementers
                .get_or_init(|| schema.implementers_map())
                .get(ty_name);
            (
                def.resolve_type.as_ref(),
                implementers.into_iter().flatten().collect(),
            )
        }
        TypeDefinition::Union(def) => (def.resolve_type.as_ref(), def.members.iter().collect()),
        _ => field_error!("type {ty_name} is not abstract, this is a bug"),
    };

    let concrete_name = if let Some(resolve_type) = resolve_type {
        match resolve_type(value, schema) {
            Some(name) => name,
            None => field_error!("could not resolve the concrete type of a value of {ty_name}"),
        }
    } else {
        // No discriminator on the abstract type: scan the candidates
        let mut claimed = candidates.iter().filter(|candidate| {
            schema
                .get_object(candidate)
                .and_then(|def| def.is_type_of.as_ref())
                .is_some_and(|is_type_of| is_type_of(value))
        });
        match (claimed.next(), claimed.next()) {
            (Some(only), None) => (*only).clone(),
            (None, _) => {
                field_error!("no object type of {ty_name} claimed the resolved value")
            }
            (Some(first), Some(second)) => {
                field_error!(
                    "both {first} and {second} claimed a value of {ty_name}, \
                     the concrete type is ambiguous"
                )
            }
        }
    };

    let Some(object_def) = schema.get_object(&concrete_name) else {
        field_error!("resolved concrete type {concrete_name} is not an object of this schema")
    };
    let compatible = match ty_def {
        TypeDefinition::Interface(_) => object_def.implements_interfaces.contains(ty_name),
        TypeDefinition::Union(def) => def.members.contains(&concrete_name),
        _ => false,
    };
    if !compatible {
        field_error!("resolved concrete type {concrete_name} does not belong to {ty_name}")
    }
    Ok(object_def)
}

#[cfg(test)]
mod tests {
    use crate::ast;
    use crate::name;
    use crate::request::Request;
    use crate::schema::FieldDefinition;
    use crate::schema::ObjectType;
    use crate::schema::Type;
    use crate::ExecutableDocument;
    use crate::Resolution;
    use crate::Schema;
    use crate::Value;

    #[test]
    fn error_path_points_at_the_failing_list_item() {
        let schema = Schema::builder()
            .query(
                ObjectType::query_root().field(
                    FieldDefinition::new(
                        name!(f),
                        Type::new_named(name!(Int)).non_null().list(),
                    )
                    .resolve(|_args, _info| {
                        Resolution::ok(Value::List(vec![Value::Int(42), Value::Null]))
                    }),
                ),
            )
            .build()
            .unwrap();
        let document = ast::Document::new().with_definition(
            ast::OperationDefinition::new(ast::OperationType::Query)
                .with_selection(ast::Field::new(name!(f))),
        );
        let document = ExecutableDocument::from_ast(&document)
            .validate(&schema)
            .unwrap();
        let response = crate::execute_sync(&schema, &document, Request::new());
        let response = serde_json::to_string_pretty(&response).unwrap();
        expect_test::expect![[r#"
            {
              "errors": [
                {
                  "message": "non-null type Int! resolved to null",
                  "path": [
                    "f",
                    1
                  ]
                }
              ],
              "data": {
                "f": null
              }
            }"#]]
        .assert_eq(&response);
    }
}

async fn complete_list_value<'a, 'r>(
    ctx: &mut ExecutionContext<'a>,
    path: LinkedPath<'_>,
    mode: ExecutionMode,
    ty: &Type,
    inner_ty: &Type,
    fields: &[&'a Node<ast::Field>],
    items: impl Iterator<Item = Resolved<'r>> + Send,
) -> Result<JsonValue, PropagateNull> {
    let mut completed_list = Vec::with_capacity(items.size_hint().0);
    for (index, item) in items.enumerate() {
        let inner_path = LinkedPathElement {
            element: PathSegment::ListIndex(index),
            next: path,
        };
        let inner_result =
            complete_value(ctx, Some(&inner_path), mode, inner_ty, item, fields).await;
        // On field error, try to nullify that item
        match try_nullify(inner_ty, inner_result) {
            Ok(inner_value) => completed_list.push(inner_value),
            // If the item is non-null, try to nullify the list
            Err(PropagateNull) => return try_nullify(ty, Err(PropagateNull)),
        }
    }
    Ok(JsonValue::Array(completed_list))
}
