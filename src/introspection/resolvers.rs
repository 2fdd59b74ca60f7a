use crate::collections::HashMap;
use crate::collections::IndexSet;
use crate::execution::resolver::FieldError;
use crate::introspection::unknown_field;
use crate::introspection::MetaObject;
use crate::introspection::MetaValue;
use crate::schema;
use crate::schema::Name;
use crate::schema::Schema;
use crate::schema::TypeDefinition;
use crate::validation::Valid;
use crate::value::Value;
use crate::value::ValueMap;
use std::borrow::Cow;
use std::sync::OnceLock;

/// The schema plus the lazily computed interface-to-implementers map,
/// shared by every meta resolver of one execution.
#[derive(Clone, Copy)]
pub(crate) struct SchemaMeta<'a> {
    schema: &'a Valid<Schema>,
    implementers: &'a OnceLock<HashMap<Name, IndexSet<Name>>>,
}

pub(crate) fn schema_meta<'a>(
    schema: &'a Valid<Schema>,
    implementers: &'a OnceLock<HashMap<Name, IndexSet<Name>>>,
) -> SchemaMeta<'a> {
    SchemaMeta {
        schema,
        implementers,
    }
}

impl<'a> SchemaMeta<'a> {
    fn implementers_of(&self, interface_name: &str) -> impl Iterator<Item = &'a Name> {
        let schema = self.schema;
        self.implementers
            .get_or_init(|| schema.implementers_map())
            .get(interface_name)
            .into_iter()
            .flatten()
    }
}

pub(crate) fn type_def_meta<'a>(base: SchemaMeta<'a>, name: impl AsRef<str>) -> MetaValue<'a> {
    MetaValue::opt_object(
        base.schema
            .types
            .get_key_value(name.as_ref())
            .map(|(name, def)| TypeDefMeta { base, name, def }),
    )
}

fn type_def_opt<'a>(base: SchemaMeta<'a>, name: &Option<Name>) -> MetaValue<'a> {
    if let Some(name) = name.as_ref() {
        type_def_meta(base, name)
    } else {
        MetaValue::null()
    }
}

fn ty<'a>(base: SchemaMeta<'a>, ty: &'a schema::Type) -> MetaValue<'a> {
    if let schema::Type::Named(name) = ty {
        type_def_meta(base, name)
    } else {
        MetaValue::object(WrapperMeta {
            base,
            ty: Cow::Borrowed(ty),
        })
    }
}

fn deprecation<'a>(deprecation: &Option<schema::Deprecation>) -> (MetaValue<'a>, MetaValue<'a>) {
    (
        MetaValue::leaf(deprecation.is_some()),
        MetaValue::leaf(
            deprecation
                .as_ref()
                .and_then(|deprecation| deprecation.reason.clone()),
        ),
    )
}

/// Although it should be non-null, the `includeDeprecated: Boolean = false`
/// argument is nullable
fn include_deprecated(arguments: &ValueMap) -> bool {
    matches!(arguments.get("includeDeprecated"), Some(Value::Boolean(true)))
}

struct TypeDefMeta<'a> {
    base: SchemaMeta<'a>,
    name: &'a Name,
    def: &'a TypeDefinition,
}

/// Only used for non-null and list types. `TypeDefMeta` is used for
/// everything else.
struct WrapperMeta<'a> {
    base: SchemaMeta<'a>,
    ty: Cow<'a, schema::Type>,
}

struct FieldMeta<'a> {
    base: SchemaMeta<'a>,
    def: &'a schema::FieldDefinition,
}

struct InputValueMeta<'a> {
    base: SchemaMeta<'a>,
    def: &'a schema::InputValueDefinition,
}

struct EnumValueMeta<'a> {
    def: &'a schema::EnumValueDefinition,
}

struct DirectiveMeta<'a> {
    base: SchemaMeta<'a>,
    def: &'a schema::DirectiveDefinition,
}

impl MetaObject for SchemaMeta<'_> {
    fn type_name(&self) -> &str {
        "__Schema"
    }

    fn resolve_field<'a>(
        &'a self,
        field_name: &'a str,
        _arguments: &'a ValueMap,
    ) -> Result<MetaValue<'a>, FieldError> {
        match field_name {
            "description" => Ok(MetaValue::leaf(self.schema.description.clone())),
            "types" => Ok(MetaValue::list(self.schema.types.iter().map(
                |(name, def)| {
                    MetaValue::object(TypeDefMeta {
                        base: *self,
                        name,
                        def,
                    })
                },
            ))),
            "queryType" => Ok(type_def_meta(*self, &self.schema.query_root)),
            "mutationType" => Ok(type_def_opt(*self, &self.schema.mutation_root)),
            "subscriptionType" => Ok(type_def_opt(*self, &self.schema.subscription_root)),
            "directives" => Ok(MetaValue::list(
                self.schema
                    .directive_definitions
                    .values()
                    .map(|def| MetaValue::object(DirectiveMeta { base: *self, def })),
            )),
            _ => Err(unknown_field(field_name, self)),
        }
    }
}

impl MetaObject for TypeDefMeta<'_> {
    fn type_name(&self) -> &str {
        "__Type"
    }

    fn resolve_field<'a>(
        &'a self,
        field_name: &'a str,
        arguments: &'a ValueMap,
    ) -> Result<MetaValue<'a>, FieldError> {
        match field_name {
            "kind" => Ok(MetaValue::leaf(match self.def {
                TypeDefinition::Scalar(_) => "SCALAR",
                TypeDefinition::Object(_) => "OBJECT",
                TypeDefinition::Interface(_) => "INTERFACE",
                TypeDefinition::Union(_) => "UNION",
                TypeDefinition::Enum(_) => "ENUM",
                TypeDefinition::InputObject(_) => "INPUT_OBJECT",
            })),
            "name" => Ok(MetaValue::leaf(self.name.as_str())),
            "description" => Ok(MetaValue::leaf(
                self.def.description().map(|description| description.to_owned()),
            )),
            "fields" => {
                let fields = match self.def {
                    TypeDefinition::Object(def) => &def.fields,
                    TypeDefinition::Interface(def) => &def.fields,
                    TypeDefinition::Scalar(_)
                    | TypeDefinition::Union(_)
                    | TypeDefinition::Enum(_)
                    | TypeDefinition::InputObject(_) => return Ok(MetaValue::null()),
                };
                let include_deprecated = include_deprecated(arguments);
                Ok(MetaValue::list(
                    fields
                        .values()
                        .filter(move |def| include_deprecated || def.deprecation.is_none())
                        .map(|def| {
                            MetaValue::object(FieldMeta {
                                base: self.base,
                                def,
                            })
                        }),
                ))
            }
            "interfaces" => match self.def {
                TypeDefinition::Object(def) => Ok(MetaValue::list(
                    def.implements_interfaces
                        .iter()
                        .filter_map(|name| {
                            self.base.schema.types.get_key_value(name.as_str()).map(
                                |(name, def)| {
                                    MetaValue::object(TypeDefMeta {
                                        base: self.base,
                                        name,
                                        def,
                                    })
                                },
                            )
                        }),
                )),
                TypeDefinition::Interface(_) => Ok(MetaValue::list(std::iter::empty())),
                TypeDefinition::Scalar(_)
                | TypeDefinition::Union(_)
                | TypeDefinition::Enum(_)
                | TypeDefinition::InputObject(_) => Ok(MetaValue::null()),
            },
            "possibleTypes" => match self.def {
                TypeDefinition::Interface(_) => Ok(MetaValue::list(
                    self.base
                        .implementers_of(self.name)
                        .map(|name| type_def_meta(self.base, name)),
                )),
                TypeDefinition::Union(def) => Ok(MetaValue::list(
                    def.members
                        .iter()
                        .map(|name| type_def_meta(self.base, name)),
                )),
                TypeDefinition::Scalar(_)
                | TypeDefinition::Object(_)
                | TypeDefinition::Enum(_)
                | TypeDefinition::InputObject(_) => Ok(MetaValue::null()),
            },
            "enumValues" => {
                let TypeDefinition::Enum(def) = self.def else {
                    return Ok(MetaValue::null());
                };
                let include_deprecated = include_deprecated(arguments);
                Ok(MetaValue::list(
                    def.values
                        .values()
                        .filter(move |def| include_deprecated || def.deprecation.is_none())
                        .map(|def| MetaValue::object(EnumValueMeta { def })),
                ))
            }
            "inputFields" => {
                let TypeDefinition::InputObject(def) = self.def else {
                    return Ok(MetaValue::null());
                };
                let include_deprecated = include_deprecated(arguments);
                Ok(MetaValue::list(
                    def.fields
                        .values()
                        .filter(move |def| include_deprecated || def.deprecation.is_none())
                        .map(|def| {
                            MetaValue::object(InputValueMeta {
                                base: self.base,
                                def,
                            })
                        }),
                ))
            }
            "ofType" => Ok(MetaValue::null()),
            _ => Err(unknown_field(field_name, self)),
        }
    }
}

impl MetaObject for WrapperMeta<'_> {
    fn type_name(&self) -> &str {
        "__Type"
    }

    fn resolve_field<'a>(
        &'a self,
        field_name: &'a str,
        _arguments: &'a ValueMap,
    ) -> Result<MetaValue<'a>, FieldError> {
        match field_name {
            "kind" => Ok(MetaValue::leaf(match &*self.ty {
                schema::Type::List(_) => "LIST",
                schema::Type::NonNullNamed(_) | schema::Type::NonNullList(_) => "NON_NULL",
                // `ty()` resolves named types with `TypeDefMeta`
                schema::Type::Named(_) => {
                    return Err(FieldError::new("wrapper resolver on a named type"))
                }
            })),
            "ofType" => Ok(match &*self.ty {
                schema::Type::List(inner) => ty(self.base, inner),
                schema::Type::NonNullNamed(inner) => type_def_meta(self.base, inner),
                schema::Type::NonNullList(inner) => MetaValue::object(WrapperMeta {
                    base: self.base,
                    ty: Cow::Owned(schema::Type::List(inner.clone())),
                }),
                schema::Type::Named(_) => {
                    return Err(FieldError::new("wrapper resolver on a named type"))
                }
            }),
            "name" | "description" | "fields" | "interfaces" | "possibleTypes" | "enumValues"
            | "inputFields" => Ok(MetaValue::null()),
            _ => Err(unknown_field(field_name, self)),
        }
    }
}

impl MetaObject for FieldMeta<'_> {
    fn type_name(&self) -> &str {
        "__Field"
    }

    fn resolve_field<'a>(
        &'a self,
        field_name: &'a str,
        arguments: &'a ValueMap,
    ) -> Result<MetaValue<'a>, FieldError> {
        match field_name {
            "name" => Ok(MetaValue::leaf(self.def.name.as_str())),
            "description" => Ok(MetaValue::leaf(self.def.description.clone())),
            "args" => {
                let include_deprecated = include_deprecated(arguments);
                Ok(MetaValue::list(
                    self.def
                        .arguments
                        .values()
                        .filter(move |def| include_deprecated || def.deprecation.is_none())
                        .map(|def| {
                            MetaValue::object(InputValueMeta {
                                base: self.base,
                                def,
                            })
                        }),
                ))
            }
            "type" => Ok(ty(self.base, &self.def.ty)),
            "isDeprecated" => Ok(deprecation(&self.def.deprecation).0),
            "deprecationReason" => Ok(deprecation(&self.def.deprecation).1),
            _ => Err(unknown_field(field_name, self)),
        }
    }
}

impl MetaObject for InputValueMeta<'_> {
    fn type_name(&self) -> &str {
        "__InputValue"
    }

    fn resolve_field<'a>(
        &'a self,
        field_name: &'a str,
        _arguments: &'a ValueMap,
    ) -> Result<MetaValue<'a>, FieldError> {
        match field_name {
            "name" => Ok(MetaValue::leaf(self.def.name.as_str())),
            "description" => Ok(MetaValue::leaf(self.def.description.clone())),
            "type" => Ok(ty(self.base, &self.def.ty)),
            "defaultValue" => Ok(MetaValue::leaf(
                self.def
                    .default_value
                    .as_ref()
                    .map(|default| default.to_string()),
            )),
            "isDeprecated" => Ok(deprecation(&self.def.deprecation).0),
            "deprecationReason" => Ok(deprecation(&self.def.deprecation).1),
            _ => Err(unknown_field(field_name, self)),
        }
    }
}

impl MetaObject for EnumValueMeta<'_> {
    fn type_name(&self) -> &str {
        "__EnumValue"
    }

    fn resolve_field<'a>(
        &'a self,
        field_name: &'a str,
        _arguments: &'a ValueMap,
    ) -> Result<MetaValue<'a>, FieldError> {
        match field_name {
            "name" => Ok(MetaValue::leaf(self.def.name.as_str())),
            "description" => Ok(MetaValue::leaf(self.def.description.clone())),
            "isDeprecated" => Ok(deprecation(&self.def.deprecation).0),
            "deprecationReason" => Ok(deprecation(&self.def.deprecation).1),
            _ => Err(unknown_field(field_name, self)),
        }
    }
}

impl MetaObject for DirectiveMeta<'_> {
    fn type_name(&self) -> &str {
        "__Directive"
    }

    fn resolve_field<'a>(
        &'a self,
        field_name: &'a str,
        arguments: &'a ValueMap,
    ) -> Result<MetaValue<'a>, FieldError> {
        match field_name {
            "name" => Ok(MetaValue::leaf(self.def.name.as_str())),
            "description" => Ok(MetaValue::leaf(self.def.description.clone())),
            "locations" => Ok(MetaValue::list(
                self.def
                    .locations
                    .iter()
                    .map(|location| MetaValue::leaf(location.name())),
            )),
            "args" => {
                let include_deprecated = include_deprecated(arguments);
                Ok(MetaValue::list(
                    self.def
                        .arguments
                        .values()
                        .filter(move |def| include_deprecated || def.deprecation.is_none())
                        .map(|def| {
                            MetaValue::object(InputValueMeta {
                                base: self.base,
                                def,
                            })
                        }),
                ))
            }
            _ => Err(unknown_field(field_name, self)),
        }
    }
}
