//! Schema introspection: the reserved `__`-prefixed meta-types, and the
//! internal resolvers that answer them from the schema's own type graph.
//!
//! The meta-types are materialized into every schema at build time, so they
//! are themselves introspectable. The engine routes the reserved fields
//! (`__schema` and `__type` on the query root, `__typename` everywhere)
//! to the resolvers in this module instead of user resolvers.

use crate::execution::resolver::FieldError;
use crate::schema::DirectiveLocation;
use crate::schema::EnumType;
use crate::schema::EnumValueDefinition;
use crate::schema::FieldDefinition;
use crate::schema::InputValueDefinition;
use crate::schema::Name;
use crate::schema::ObjectType;
use crate::schema::Type;
use crate::schema::TypeDefinition;
use crate::value::Value;
use crate::value::ValueMap;

mod resolvers;

pub(crate) use self::resolvers::schema_meta;
pub(crate) use self::resolvers::type_def_meta;
pub(crate) use self::resolvers::SchemaMeta;

/// An object resolved internally over the schema graph rather than through
/// user resolvers.
pub(crate) trait MetaObject {
    /// The concrete meta type, e.g. `__Type`.
    fn type_name(&self) -> &str;

    fn resolve_field<'a>(
        &'a self,
        field_name: &'a str,
        arguments: &'a ValueMap,
    ) -> Result<MetaValue<'a>, FieldError>;
}

/// The value of a resolved meta field.
pub(crate) enum MetaValue<'a> {
    Leaf(Value),
    Object(Box<dyn MetaObject + Send + Sync + 'a>),
    List(Box<dyn Iterator<Item = MetaValue<'a>> + Send + 'a>),
}

impl<'a> MetaValue<'a> {
    pub(crate) fn null() -> Self {
        Self::Leaf(Value::Null)
    }

    pub(crate) fn leaf(value: impl Into<Value>) -> Self {
        Self::Leaf(value.into())
    }

    pub(crate) fn object(object: impl MetaObject + Send + Sync + 'a) -> Self {
        Self::Object(Box::new(object))
    }

    pub(crate) fn opt_object(object: Option<impl MetaObject + Send + Sync + 'a>) -> Self {
        match object {
            Some(object) => Self::Object(Box::new(object)),
            None => Self::null(),
        }
    }

    pub(crate) fn list<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = MetaValue<'a>>,
        I::IntoIter: Send + 'a,
    {
        Self::List(Box::new(iter.into_iter()))
    }
}

pub(crate) fn unknown_field(field_name: &str, object: &dyn MetaObject) -> FieldError {
    FieldError::new(format!(
        "unexpected field name: {field_name} in type {}",
        object.type_name()
    ))
}

/// The meta-type definitions registered into every schema.
pub(crate) fn meta_type_definitions() -> Vec<TypeDefinition> {
    let named = |name: &str| Type::new_named(Name::new_unchecked(name));
    let field = |name: &str, ty: Type| FieldDefinition::new(Name::new_unchecked(name), ty);
    let include_deprecated = || {
        InputValueDefinition::new(Name::new_unchecked("includeDeprecated"), named("Boolean"))
            .default_value(false)
    };
    let enum_value = |name: &str| EnumValueDefinition::new(Name::new_unchecked(name));

    vec![
        ObjectType::new(Name::new_unchecked("__Schema"))
            .description("The entry point of introspection: every type and directive the schema defines.")
            .field(field("description", named("String")))
            .field(field("types", named("__Type").non_null().list().non_null()))
            .field(field("queryType", named("__Type").non_null()))
            .field(field("mutationType", named("__Type")))
            .field(field("subscriptionType", named("__Type")))
            .field(field(
                "directives",
                named("__Directive").non_null().list().non_null(),
            ))
            .into(),
        ObjectType::new(Name::new_unchecked("__Type"))
            .description("A type in the schema: a named definition, or a list or non-null wrapper around another type.")
            .field(field("kind", named("__TypeKind").non_null()))
            .field(field("name", named("String")))
            .field(field("description", named("String")))
            .field(
                field("fields", named("__Field").non_null().list())
                    .argument(include_deprecated()),
            )
            .field(field("interfaces", named("__Type").non_null().list()))
            .field(field("possibleTypes", named("__Type").non_null().list()))
            .field(
                field("enumValues", named("__EnumValue").non_null().list())
                    .argument(include_deprecated()),
            )
            .field(
                field("inputFields", named("__InputValue").non_null().list())
                    .argument(include_deprecated()),
            )
            .field(field("ofType", named("__Type")))
            .into(),
        ObjectType::new(Name::new_unchecked("__Field"))
            .field(field("name", named("String").non_null()))
            .field(field("description", named("String")))
            .field(
                field("args", named("__InputValue").non_null().list().non_null())
                    .argument(include_deprecated()),
            )
            .field(field("type", named("__Type").non_null()))
            .field(field("isDeprecated", named("Boolean").non_null()))
            .field(field("deprecationReason", named("String")))
            .into(),
        ObjectType::new(Name::new_unchecked("__InputValue"))
            .field(field("name", named("String").non_null()))
            .field(field("description", named("String")))
            .field(field("type", named("__Type").non_null()))
            .field(field("defaultValue", named("String")))
            .field(field("isDeprecated", named("Boolean").non_null()))
            .field(field("deprecationReason", named("String")))
            .into(),
        ObjectType::new(Name::new_unchecked("__EnumValue"))
            .field(field("name", named("String").non_null()))
            .field(field("description", named("String")))
            .field(field("isDeprecated", named("Boolean").non_null()))
            .field(field("deprecationReason", named("String")))
            .into(),
        ObjectType::new(Name::new_unchecked("__Directive"))
            .field(field("name", named("String").non_null()))
            .field(field("description", named("String")))
            .field(field(
                "locations",
                named("__DirectiveLocation").non_null().list().non_null(),
            ))
            .field(
                field("args", named("__InputValue").non_null().list().non_null())
                    .argument(include_deprecated()),
            )
            .into(),
        EnumType::new(Name::new_unchecked("__TypeKind"))
            .value(enum_value("SCALAR"))
            .value(enum_value("OBJECT"))
            .value(enum_value("INTERFACE"))
            .value(enum_value("UNION"))
            .value(enum_value("ENUM"))
            .value(enum_value("INPUT_OBJECT"))
            .value(enum_value("LIST"))
            .value(enum_value("NON_NULL"))
            .into(),
        EnumType::new(Name::new_unchecked("__DirectiveLocation"))
            .value(enum_value(DirectiveLocation::Query.name()))
            .value(enum_value(DirectiveLocation::Mutation.name()))
            .value(enum_value(DirectiveLocation::Subscription.name()))
            .value(enum_value(DirectiveLocation::Field.name()))
            .value(enum_value(DirectiveLocation::FragmentDefinition.name()))
            .value(enum_value(DirectiveLocation::FragmentSpread.name()))
            .value(enum_value(DirectiveLocation::InlineFragment.name()))
            .into(),
    ]
}
