//! The tree-walking execution engine: operation, selection set, field.

use crate::ast;
use crate::ast::OperationType;
use crate::collections::HashMap;
use crate::collections::HashSet;
use crate::collections::IndexMap;
use crate::collections::IndexSet;
use crate::execution::input_coercion::coerce_argument_values;
use crate::execution::resolver::Context;
use crate::execution::resolver::FieldError;
use crate::execution::resolver::ResolveInfo;
use crate::execution::result_coercion::complete_value;
use crate::introspection;
use crate::introspection::MetaValue;
use crate::node::SourceSpan;
use crate::response::GraphQLError;
use crate::response::JsonMap;
use crate::response::JsonValue;
use crate::response::PathSegment;
use crate::schema::FieldDefinition;
use crate::schema::ObjectType;
use crate::schema::Schema;
use crate::schema::Type;
use crate::schema::TypeDefinition;
use crate::validation::Valid;
use crate::value::Value;
use crate::value::ValueMap;
use crate::ExecutableDocument;
use crate::Name;
use crate::Node;
use std::sync::OnceLock;

/// How sibling fields of one selection set may be scheduled.
#[derive(Debug, Copy, Clone)]
pub(crate) enum ExecutionMode {
    /// Allowed to resolve fields in any order, including in parallel
    Normal,
    /// Top-level fields of a mutation operation must be executed in order
    Sequential,
}

/// Return in `Err` when a field error occurred at some non-nullable place
/// and null is propagating towards the nearest nullable ancestor.
pub(crate) struct PropagateNull;

/// Linked-list version of `Vec<PathSegment>`, taking advantage of the call stack
pub(crate) type LinkedPath<'a> = Option<&'a LinkedPathElement<'a>>;

pub(crate) struct LinkedPathElement<'a> {
    pub(crate) element: PathSegment,
    pub(crate) next: LinkedPath<'a>,
}

pub(crate) struct ExecutionContext<'a> {
    pub(crate) schema: &'a Valid<Schema>,
    pub(crate) document: &'a Valid<ExecutableDocument>,
    pub(crate) variables: &'a Valid<ValueMap>,
    pub(crate) errors: &'a mut Vec<GraphQLError>,
    pub(crate) root_value: &'a Value,
    pub(crate) context: &'a Context,
    pub(crate) implementers: &'a OnceLock<HashMap<Name, IndexSet<Name>>>,
    /// Set once the cancellation token is observed; the partial result is
    /// then discarded by the request layer.
    pub(crate) cancelled: bool,
}

/// The object a selection set is being resolved against: a runtime value
/// from the user domain, or one of the introspection meta objects.
#[derive(Clone, Copy)]
pub(crate) enum ObjectSource<'a> {
    Value(&'a Value),
    Meta(&'a (dyn introspection::MetaObject + Send + Sync)),
}

/// What a field resolved to, before completion against its declared type.
pub(crate) enum Resolved<'a> {
    Value(Value),
    Meta(MetaValue<'a>),
}

pub(crate) async fn execute_selection_set<'a>(
    ctx: &mut ExecutionContext<'a>,
    path: LinkedPath<'_>,
    mode: ExecutionMode,
    object_type: &ObjectType,
    object_value: ObjectSource<'_>,
    selections: impl IntoIterator<Item = &'a ast::Selection>,
) -> Result<JsonMap, PropagateNull> {
    let mut grouped_field_set = IndexMap::default();
    collect_fields(
        ctx,
        object_type,
        selections,
        &mut HashSet::default(),
        &mut grouped_field_set,
    );

    match mode {
        ExecutionMode::Normal => {
            // Sibling resolvers have no ordering guarantee here, so this
            // loop could schedule them concurrently with
            // `StreamExt::buffer_unordered` and a per-task error buffer.
        }
        ExecutionMode::Sequential => {}
    }

    let mut response_map = JsonMap::with_capacity(grouped_field_set.len());
    for (response_key, fields) in &grouped_field_set {
        // Indexing should not panic: `collect_fields` only creates a `Vec` to push to it
        let field_name = &fields[0].name;
        let Ok(field_def) = ctx.schema.type_field(&object_type.name, field_name) else {
            // Validation established that every selected field is defined
            continue;
        };
        let field_path = LinkedPathElement {
            element: PathSegment::Field((*response_key).clone()),
            next: path,
        };
        let value = execute_field(
            ctx,
            Some(&field_path),
            mode,
            object_type,
            object_value,
            field_def,
            fields,
        )
        .await?;
        response_map.insert(response_key.as_str(), value);
    }
    Ok(response_map)
}

/// Group the fields of a selection set by response key, in first-occurrence
/// order, applying `@skip`/`@include` and fragment type conditions.
fn collect_fields<'a>(
    ctx: &ExecutionContext<'a>,
    object_type: &ObjectType,
    selections: impl IntoIterator<Item = &'a ast::Selection>,
    visited_fragments: &mut HashSet<&'a Name>,
    grouped_fields: &mut IndexMap<&'a Name, Vec<&'a Node<ast::Field>>>,
) {
    for selection in selections {
        if eval_if_arg(selection, "skip", ctx.variables).unwrap_or(false)
            || !eval_if_arg(selection, "include", ctx.variables).unwrap_or(true)
        {
            continue;
        }
        match selection {
            ast::Selection::Field(field) => grouped_fields
                .entry(field.response_key())
                .or_default()
                .push(field),
            ast::Selection::FragmentSpread(spread) => {
                let new = visited_fragments.insert(&spread.fragment_name);
                if !new {
                    continue;
                }
                let Some(fragment) = ctx.document.fragments.get(&spread.fragment_name) else {
                    continue;
                };
                if !does_fragment_type_apply(ctx.schema, object_type, &fragment.type_condition) {
                    continue;
                }
                collect_fields(
                    ctx,
                    object_type,
                    &fragment.selection_set,
                    visited_fragments,
                    grouped_fields,
                )
            }
            ast::Selection::InlineFragment(inline) => {
                if let Some(condition) = &inline.type_condition {
                    if !does_fragment_type_apply(ctx.schema, object_type, condition) {
                        continue;
                    }
                }
                collect_fields(
                    ctx,
                    object_type,
                    &inline.selection_set,
                    visited_fragments,
                    grouped_fields,
                )
            }
        }
    }
}

/// A type condition applies to the current runtime type when it names that
/// type, an interface it implements, or a union it belongs to.
fn does_fragment_type_apply(
    schema: &Schema,
    object_type: &ObjectType,
    fragment_type: &Name,
) -> bool {
    match schema.types.get(fragment_type) {
        Some(TypeDefinition::Object(_)) => *fragment_type == object_type.name,
        Some(TypeDefinition::Interface(_)) => {
            object_type.implements_interfaces.contains(fragment_type)
        }
        Some(TypeDefinition::Union(def)) => def.members.contains(&object_type.name),
        // Undefined or not an output type: validation should have caught this
        _ => false,
    }
}

fn eval_if_arg(
    selection: &ast::Selection,
    directive_name: &str,
    variables: &Valid<ValueMap>,
) -> Option<bool> {
    match selection
        .directives()
        .get(directive_name)?
        .argument_by_name("if")?
        .as_ref()
    {
        ast::Value::Boolean(value) => Some(*value),
        ast::Value::Variable(var) => variables.get(var.as_str())?.as_bool(),
        _ => None,
    }
}

/// Resolve and complete one response key.
async fn execute_field<'a>(
    ctx: &mut ExecutionContext<'a>,
    path: LinkedPath<'_>,
    mode: ExecutionMode,
    object_type: &ObjectType,
    object_value: ObjectSource<'_>,
    field_def: &Node<FieldDefinition>,
    fields: &[&'a Node<ast::Field>],
) -> Result<JsonValue, PropagateNull> {
    if ctx.context.cancellation().is_cancelled() {
        ctx.cancelled = true;
        return Err(PropagateNull);
    }
    let field = fields[0];
    let argument_values = match coerce_argument_values(ctx, path, field_def, field) {
        Ok(argument_values) => argument_values,
        Err(PropagateNull) if field_def.ty.is_non_null() => return Err(PropagateNull),
        Err(PropagateNull) => return Ok(JsonValue::Null),
    };
    report_deprecations(ctx, path, object_type, field_def, field);
    let is_field_of_root_query = || ctx.schema.query_root == object_type.name;
    let resolved_result = match field.name.as_str() {
        "__typename" => Ok(Resolved::Value(Value::String(
            object_type.name.as_str().to_owned(),
        ))),
        "__schema" if is_field_of_root_query() => Ok(Resolved::Meta(MetaValue::object(
            introspection::schema_meta(ctx.schema, ctx.implementers),
        ))),
        "__type" if is_field_of_root_query() => {
            let name = argument_values.get("name").and_then(Value::as_str);
            match name {
                Some(name) => Ok(Resolved::Meta(introspection::type_def_meta(
                    introspection::schema_meta(ctx.schema, ctx.implementers),
                    name,
                ))),
                // `coerce_argument_values` conforms to `__type(name: String!)`,
                // so this indicates a bug; prefer an error over a panic
                None => Err(FieldError::new("expected string argument `name`")),
            }
        }
        _ => match object_value {
            ObjectSource::Meta(meta) => meta
                .resolve_field(field.name.as_str(), &argument_values)
                .map(Resolved::Meta),
            ObjectSource::Value(parent_value) => {
                resolve_user_field(
                    ctx,
                    path,
                    object_type,
                    parent_value,
                    field_def,
                    field,
                    &argument_values,
                )
                .await
                .map(Resolved::Value)
            }
        },
    };
    let completed_result = match resolved_result {
        Ok(resolved) => complete_value(ctx, path, mode, &field_def.ty, resolved, fields).await,
        Err(error) => {
            ctx.errors.push(GraphQLError::field_error(
                format!("resolver error: {}", error.message),
                path,
                field.span(),
            ));
            Err(PropagateNull)
        }
    };
    try_nullify(&field_def.ty, completed_result)
}

/// Invoke the field's resolver, awaiting a pending resolution to its end.
/// A field without a resolver reads the parent's property of the same name.
async fn resolve_user_field<'a>(
    ctx: &ExecutionContext<'a>,
    path: LinkedPath<'_>,
    object_type: &ObjectType,
    parent_value: &Value,
    field_def: &Node<FieldDefinition>,
    field: &Node<ast::Field>,
    argument_values: &ValueMap,
) -> Result<Value, FieldError> {
    let Some(resolver) = field_def.resolver() else {
        return Ok(parent_value
            .get(field.name.as_str())
            .cloned()
            .unwrap_or(Value::Null));
    };
    let info = ResolveInfo {
        field_name: &field.name,
        field_type: &field_def.ty,
        parent_type: &object_type.name,
        parent_value,
        root_value: ctx.root_value,
        schema: ctx.schema,
        fragments: &ctx.document.fragments,
        variables: ctx.variables,
        context: ctx.context,
        path,
    };
    resolver(argument_values, &info).finish().await
}

/// A warning-class error for each deprecated schema member this field
/// consumes: the field itself, any explicitly supplied argument, and any
/// deprecated enum value named by an argument literal.
/// Execution continues normally.
fn report_deprecations(
    ctx: &mut ExecutionContext<'_>,
    path: LinkedPath<'_>,
    object_type: &ObjectType,
    field_def: &Node<FieldDefinition>,
    field: &Node<ast::Field>,
) {
    if let Some(deprecation) = &field_def.deprecation {
        ctx.errors.push(GraphQLError::field_error(
            match &deprecation.reason {
                Some(reason) => format!(
                    "field `{}.{}` is deprecated: {reason}",
                    object_type.name, field_def.name
                ),
                None => format!(
                    "field `{}.{}` is deprecated",
                    object_type.name, field_def.name
                ),
            },
            path,
            field.span(),
        ));
    }
    for argument in &field.arguments {
        let Some(arg_def) = field_def.arguments.get(&argument.name) else {
            continue;
        };
        if let Some(deprecation) = &arg_def.deprecation {
            ctx.errors.push(GraphQLError::field_error(
                match &deprecation.reason {
                    Some(reason) => format!(
                        "argument `{}` of field `{}.{}` is deprecated: {reason}",
                        argument.name, object_type.name, field_def.name
                    ),
                    None => format!(
                        "argument `{}` of field `{}.{}` is deprecated",
                        argument.name, object_type.name, field_def.name
                    ),
                },
                path,
                argument.span(),
            ));
        }
        let enum_def = match ctx.schema.types.get(arg_def.ty.inner_named_type()) {
            Some(TypeDefinition::Enum(def)) => def,
            _ => continue,
        };
        let value_def = match argument.value.as_ref() {
            ast::Value::Enum(value_name) => enum_def.values.get(value_name),
            _ => None,
        };
        let Some(value_def) = value_def else { continue };
        if let Some(deprecation) = &value_def.deprecation {
            ctx.errors.push(GraphQLError::field_error(
                match &deprecation.reason {
                    Some(reason) => format!(
                        "enum value `{}.{}` is deprecated: {reason}",
                        enum_def.name, value_def.name
                    ),
                    None => format!(
                        "enum value `{}.{}` is deprecated",
                        enum_def.name, value_def.name
                    ),
                },
                path,
                argument.span(),
            ));
        }
    }
}

/// Try to insert a propagated null if possible, or keep propagating it.
pub(crate) fn try_nullify(
    ty: &Type,
    result: Result<JsonValue, PropagateNull>,
) -> Result<JsonValue, PropagateNull> {
    match result {
        Ok(json) => Ok(json),
        Err(PropagateNull) => {
            if ty.is_non_null() {
                Err(PropagateNull)
            } else {
                Ok(JsonValue::Null)
            }
        }
    }
}

pub(crate) fn path_to_vec(mut link: LinkedPath<'_>) -> Vec<PathSegment> {
    let mut path = Vec::new();
    while let Some(node) = link {
        path.push(node.element.clone());
        link = node.next;
    }
    path.reverse();
    path
}

pub(crate) fn mode_for(operation_type: OperationType) -> ExecutionMode {
    match operation_type {
        // Subscriptions are executed like queries for their single
        // response; stream delivery is outside this crate
        OperationType::Query | OperationType::Subscription => ExecutionMode::Normal,
        OperationType::Mutation => ExecutionMode::Sequential,
    }
}

impl GraphQLError {
    pub(crate) fn field_error(
        message: impl Into<String>,
        path: LinkedPath<'_>,
        span: Option<SourceSpan>,
    ) -> Self {
        let mut error = Self::new(message.into(), span);
        error.path = path_to_vec(path);
        error
    }
}
