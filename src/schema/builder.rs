use super::*;
use crate::introspection;
use crate::validation::Valid;

/// Assembles a [`Schema`] from programmatic type definitions.
///
/// A new builder starts with the five built-in scalars, the built-in
/// `@skip` and `@include` directives, and the introspection meta-types.
/// Construction performs a single linking pass: every type reference is
/// checked against a registered type, interface implementations and union
/// memberships are verified, and name collisions are rejected.
pub struct SchemaBuilder {
    description: Option<String>,
    types: IndexMap<NamedType, TypeDefinition>,
    directive_definitions: IndexMap<Name, Node<DirectiveDefinition>>,
    query_root: Option<NamedType>,
    mutation_root: Option<NamedType>,
    subscription_root: Option<NamedType>,
    errors: Vec<BuildError>,
}

/// A defect in the schema definitions handed to the builder.
#[derive(thiserror::Error, Debug, Clone)]
pub enum BuildError {
    #[error("schema does not define a query root operation")]
    NoQueryRoot,

    #[error("the type `{name}` is defined multiple times in the schema")]
    TypeDefinitionCollision { name: Name },

    #[error("the directive `@{name}` is defined multiple times in the schema")]
    DirectiveDefinitionCollision { name: Name },

    #[error("`{coordinate}` references undefined type `{name}`")]
    UndefinedTypeReference { coordinate: String, name: NamedType },

    #[error("`{coordinate}` must have an output type, but `{name}` is {describe}")]
    OutputTypeExpected {
        coordinate: String,
        name: NamedType,
        describe: &'static str,
    },

    #[error("`{coordinate}` must have an input type, but `{name}` is {describe}")]
    InputTypeExpected {
        coordinate: String,
        name: NamedType,
        describe: &'static str,
    },

    #[error("type `{type_name}` claims to implement `{name}`, which is {describe}")]
    ImplementsNonInterface {
        type_name: Name,
        name: Name,
        describe: &'static str,
    },

    #[error("type `{type_name}` does not satisfy interface `{interface}`: missing field `{field}`")]
    MissingInterfaceField {
        type_name: Name,
        interface: Name,
        field: Name,
    },

    #[error(
        "field `{type_name}.{field}` has type `{found}`, \
         which is not covariant with `{interface}.{field}: {expected}`"
    )]
    InterfaceFieldTypeMismatch {
        type_name: Name,
        interface: Name,
        field: Name,
        found: Type,
        expected: Type,
    },

    #[error(
        "member `{name}` of union type `{union_name}` is {describe}, \
         but only object types can be union members"
    )]
    NonObjectUnionMember {
        union_name: Name,
        name: NamedType,
        describe: &'static str,
    },

    #[error(
        "enum type `{type_name}` values `{first}` and `{second}` \
         both map to the internal value `{value}`"
    )]
    AmbiguousEnumValue {
        type_name: Name,
        first: Name,
        second: Name,
        value: String,
    },

    #[error("default value `{value}` for `{coordinate}` does not satisfy its type `{ty}`")]
    InvalidDefaultValue {
        coordinate: String,
        ty: Type,
        value: String,
    },
}

/// All the defects found while building a schema.
#[derive(Debug, Clone)]
pub struct BuildErrors {
    pub errors: Vec<BuildError>,
}

impl fmt::Display for BuildErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for error in &self.errors {
            writeln!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for BuildErrors {}

impl fmt::Debug for SchemaBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaBuilder")
            .field("types", &self.types.keys().collect::<Vec<_>>())
            .field("errors", &self.errors)
            .finish_non_exhaustive()
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaBuilder {
    pub fn new() -> Self {
        let mut builder = Self {
            description: None,
            types: IndexMap::default(),
            directive_definitions: IndexMap::default(),
            query_root: None,
            mutation_root: None,
            subscription_root: None,
            errors: Vec::new(),
        };
        for scalar in built_in_scalars() {
            builder = builder.type_def(scalar);
        }
        for meta_type in introspection::meta_type_definitions() {
            builder = builder.type_def(meta_type);
        }
        for directive in built_in_directives() {
            builder = builder.directive(directive);
        }
        builder
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Register a type definition. The first definition of a name wins;
    /// a redefinition is recorded as a build error.
    pub fn type_def(mut self, ty: impl Into<TypeDefinition>) -> Self {
        let ty = ty.into();
        let name = ty.name().clone();
        if self.types.contains_key(&name) {
            self.errors.push(BuildError::TypeDefinitionCollision { name });
        } else {
            self.types.insert(name, ty);
        }
        self
    }

    /// Register a directive definition.
    pub fn directive(mut self, directive: DirectiveDefinition) -> Self {
        let name = directive.name.clone();
        if self.directive_definitions.contains_key(&name) {
            self.errors
                .push(BuildError::DirectiveDefinitionCollision { name });
        } else {
            self.directive_definitions.insert(name, Node::new(directive));
        }
        self
    }

    /// Register the query root object type.
    pub fn query(mut self, object: ObjectType) -> Self {
        self.query_root = Some(object.name.clone());
        self.type_def(object)
    }

    /// Register the mutation root object type.
    pub fn mutation(mut self, object: ObjectType) -> Self {
        self.mutation_root = Some(object.name.clone());
        self.type_def(object)
    }

    /// Register the subscription root object type.
    pub fn subscription(mut self, object: ObjectType) -> Self {
        self.subscription_root = Some(object.name.clone());
        self.type_def(object)
    }

    /// Link and verify the type graph.
    pub fn build(mut self) -> Result<Valid<Schema>, BuildErrors> {
        let Some(query_root) = self.query_root.clone() else {
            self.errors.push(BuildError::NoQueryRoot);
            return Err(BuildErrors {
                errors: self.errors,
            });
        };

        for ty in self.types.values() {
            match ty {
                TypeDefinition::Object(def) => {
                    check_fields(&self.types, &def.name, &def.fields, &mut self.errors);
                    check_implements(
                        &self.types,
                        &def.name,
                        &def.implements_interfaces,
                        &def.fields,
                        &mut self.errors,
                    );
                }
                TypeDefinition::Interface(def) => {
                    check_fields(&self.types, &def.name, &def.fields, &mut self.errors);
                }
                TypeDefinition::Union(def) => {
                    for member in &def.members {
                        match self.types.get(member) {
                            None => self.errors.push(BuildError::UndefinedTypeReference {
                                coordinate: def.name.to_string(),
                                name: member.clone(),
                            }),
                            Some(TypeDefinition::Object(_)) => {}
                            Some(other) => self.errors.push(BuildError::NonObjectUnionMember {
                                union_name: def.name.clone(),
                                name: member.clone(),
                                describe: other.describe(),
                            }),
                        }
                    }
                }
                TypeDefinition::Enum(def) => check_enum_values(def, &mut self.errors),
                TypeDefinition::InputObject(def) => {
                    for field in def.fields.values() {
                        let coordinate = format!("{}.{}", def.name, field.name);
                        check_input_value(&self.types, &coordinate, field, &mut self.errors);
                    }
                }
                TypeDefinition::Scalar(_) => {}
            }
        }
        for directive in self.directive_definitions.values() {
            for argument in directive.arguments.values() {
                let coordinate = format!("@{}({}:)", directive.name, argument.name);
                check_input_value(&self.types, &coordinate, argument, &mut self.errors);
            }
        }

        if !self.errors.is_empty() {
            return Err(BuildErrors {
                errors: self.errors,
            });
        }
        tracing::debug!(
            types = self.types.len(),
            directives = self.directive_definitions.len(),
            query_root = %query_root,
            "schema built"
        );
        Ok(Valid::assume_valid(Schema {
            description: self.description,
            types: self.types,
            directive_definitions: self.directive_definitions,
            query_root,
            mutation_root: self.mutation_root,
            subscription_root: self.subscription_root,
        }))
    }
}

fn check_fields(
    types: &IndexMap<NamedType, TypeDefinition>,
    type_name: &Name,
    fields: &IndexMap<Name, Node<FieldDefinition>>,
    errors: &mut Vec<BuildError>,
) {
    for field in fields.values() {
        let coordinate = format!("{type_name}.{}", field.name);
        let referenced = field.ty.inner_named_type();
        match types.get(referenced) {
            None => errors.push(BuildError::UndefinedTypeReference {
                coordinate: coordinate.clone(),
                name: referenced.clone(),
            }),
            Some(def) if !def.is_output_type() => errors.push(BuildError::OutputTypeExpected {
                coordinate: coordinate.clone(),
                name: referenced.clone(),
                describe: def.describe(),
            }),
            Some(_) => {}
        }
        for argument in field.arguments.values() {
            let coordinate = format!("{type_name}.{}({}:)", field.name, argument.name);
            check_input_value(types, &coordinate, argument, errors);
        }
    }
}

fn check_input_value(
    types: &IndexMap<NamedType, TypeDefinition>,
    coordinate: &str,
    value: &InputValueDefinition,
    errors: &mut Vec<BuildError>,
) {
    let referenced = value.ty.inner_named_type();
    match types.get(referenced) {
        None => {
            errors.push(BuildError::UndefinedTypeReference {
                coordinate: coordinate.to_owned(),
                name: referenced.clone(),
            });
            return;
        }
        Some(def) if !def.is_input_type() => {
            errors.push(BuildError::InputTypeExpected {
                coordinate: coordinate.to_owned(),
                name: referenced.clone(),
                describe: def.describe(),
            });
            return;
        }
        Some(_) => {}
    }
    if let Some(default) = &value.default_value {
        if !default_value_conforms(types, &value.ty, default) {
            errors.push(BuildError::InvalidDefaultValue {
                coordinate: coordinate.to_owned(),
                ty: value.ty.clone(),
                value: default.to_string(),
            });
        }
    }
}

fn check_implements(
    types: &IndexMap<NamedType, TypeDefinition>,
    type_name: &Name,
    interfaces: &IndexSet<Name>,
    fields: &IndexMap<Name, Node<FieldDefinition>>,
    errors: &mut Vec<BuildError>,
) {
    for interface_name in interfaces {
        let interface = match types.get(interface_name) {
            Some(TypeDefinition::Interface(def)) => def,
            Some(other) => {
                errors.push(BuildError::ImplementsNonInterface {
                    type_name: type_name.clone(),
                    name: interface_name.clone(),
                    describe: other.describe(),
                });
                continue;
            }
            None => {
                errors.push(BuildError::UndefinedTypeReference {
                    coordinate: type_name.to_string(),
                    name: interface_name.clone(),
                });
                continue;
            }
        };
        for interface_field in interface.fields.values() {
            let Some(field) = fields.get(&interface_field.name) else {
                errors.push(BuildError::MissingInterfaceField {
                    type_name: type_name.clone(),
                    interface: interface_name.clone(),
                    field: interface_field.name.clone(),
                });
                continue;
            };
            if !is_covariant(types, &field.ty, &interface_field.ty) {
                errors.push(BuildError::InterfaceFieldTypeMismatch {
                    type_name: type_name.clone(),
                    interface: interface_name.clone(),
                    field: interface_field.name.clone(),
                    found: field.ty.clone(),
                    expected: interface_field.ty.clone(),
                });
            }
        }
    }
}

/// Whether an implementing field's type may stand in for the interface
/// field's type: equal, a subtype, or a stricter (non-null) version thereof.
fn is_covariant(
    types: &IndexMap<NamedType, TypeDefinition>,
    found: &Type,
    expected: &Type,
) -> bool {
    match (found, expected) {
        // A non-null field satisfies a nullable or non-null declaration
        (Type::NonNullNamed(name), _) => {
            is_covariant(types, &Type::Named(name.clone()), &expected.clone().nullable())
        }
        (Type::NonNullList(inner), _) => {
            is_covariant(types, &Type::List(inner.clone()), &expected.clone().nullable())
        }
        // A nullable field never satisfies a non-null declaration
        (_, Type::NonNullNamed(_) | Type::NonNullList(_)) => false,
        (Type::List(found_item), Type::List(expected_item)) => {
            is_covariant(types, found_item, expected_item)
        }
        (Type::List(_), Type::Named(_)) | (Type::Named(_), Type::List(_)) => false,
        (Type::Named(found_name), Type::Named(expected_name)) => {
            found_name == expected_name || {
                // Subtype: the found object implements the expected
                // interface, or is a member of the expected union
                match types.get(expected_name) {
                    Some(TypeDefinition::Interface(_)) => {
                        matches!(types.get(found_name), Some(TypeDefinition::Object(def))
                            if def.implements_interfaces.contains(expected_name))
                    }
                    Some(TypeDefinition::Union(def)) => def.members.contains(found_name),
                    _ => false,
                }
            }
        }
    }
}

fn check_enum_values(def: &EnumType, errors: &mut Vec<BuildError>) {
    // Reverse lookup (internal value -> name) must be unambiguous
    let values: Vec<_> = def.values.values().collect();
    for (i, a) in values.iter().enumerate() {
        for b in &values[i + 1..] {
            if a.value == b.value {
                errors.push(BuildError::AmbiguousEnumValue {
                    type_name: def.name.clone(),
                    first: a.name.clone(),
                    second: b.name.clone(),
                    value: a.value.to_string(),
                });
            }
        }
    }
}

/// Structural conformance of a pre-coerced default against its declared type.
fn default_value_conforms(
    types: &IndexMap<NamedType, TypeDefinition>,
    ty: &Type,
    value: &Value,
) -> bool {
    if value.is_null() {
        return !ty.is_non_null();
    }
    match ty {
        Type::List(item) | Type::NonNullList(item) => match value {
            Value::List(items) => items
                .iter()
                .all(|item_value| default_value_conforms(types, item, item_value)),
            // A single value stands for a one-element list
            other => default_value_conforms(types, item, other),
        },
        Type::Named(name) | Type::NonNullNamed(name) => match types.get(name) {
            Some(TypeDefinition::Scalar(_)) => scalar_default_conforms(name, value),
            Some(TypeDefinition::Enum(def)) => def.reverse_lookup(value).is_some(),
            Some(TypeDefinition::InputObject(def)) => {
                let Value::Object(map) = value else {
                    return false;
                };
                map.keys().all(|key| def.fields.contains_key(key.as_str()))
                    && def.fields.values().all(|field| {
                        match map.get(field.name.as_str()) {
                            Some(field_value) => {
                                default_value_conforms(types, &field.ty, field_value)
                            }
                            None => {
                                !field.ty.is_non_null() || field.default_value.is_some()
                            }
                        }
                    })
            }
            // Non-input types are flagged separately; undefined types too
            _ => true,
        },
    }
}

fn scalar_default_conforms(name: &Name, value: &Value) -> bool {
    match name.as_str() {
        "Int" => matches!(value, Value::Int(int) if i32::try_from(*int).is_ok()),
        "Float" => matches!(value, Value::Int(_) | Value::Float(_)),
        "String" => matches!(value, Value::String(_)),
        "Boolean" => matches!(value, Value::Boolean(_)),
        "ID" => matches!(value, Value::String(_) | Value::Int(_)),
        // Custom scalars accept any pre-coerced value
        _ => true,
    }
}

/// The five built-in scalars with their input and result coercion rules.
fn built_in_scalars() -> Vec<ScalarType> {
    vec![
        ScalarType::new(Name::new_unchecked("Int"))
            .description("A signed 32-bit integer.")
            .parse_with(|raw| match raw.as_i64() {
                Some(int) if i32::try_from(int).is_ok() => Ok(Value::Int(int)),
                Some(int) => Err(format!("value {int} overflows Int")),
                None => Err(format!("cannot coerce {raw} to Int")),
            })
            .serialize_with(|value| match value {
                Value::Int(int) if i32::try_from(*int).is_ok() => Ok((*int).into()),
                Value::Int(int) => Err(format!("value {int} overflows Int")),
                other => Err(format!("cannot serialize {other} as Int")),
            }),
        ScalarType::new(Name::new_unchecked("Float"))
            .description("A signed double-precision floating-point value.")
            .parse_with(|raw| match raw.as_f64() {
                // Integer input converts losslessly
                Some(float) => Ok(Value::Float(float)),
                None => Err(format!("cannot coerce {raw} to Float")),
            })
            .serialize_with(|value| match value {
                Value::Float(float) => Ok((*float).into()),
                Value::Int(int) => Ok((*int as f64).into()),
                other => Err(format!("cannot serialize {other} as Float")),
            }),
        ScalarType::new(Name::new_unchecked("String"))
            .description("A UTF-8 character sequence.")
            .parse_with(|raw| match raw.as_str() {
                Some(s) => Ok(Value::String(s.to_owned())),
                None => Err(format!("cannot coerce {raw} to String")),
            })
            .serialize_with(|value| match value {
                Value::String(s) => Ok(s.as_str().into()),
                other => Err(format!("cannot serialize {other} as String")),
            }),
        ScalarType::new(Name::new_unchecked("Boolean"))
            .description("The `true` and `false` values.")
            .parse_with(|raw| match raw.as_bool() {
                Some(b) => Ok(Value::Boolean(b)),
                None => Err(format!("cannot coerce {raw} to Boolean")),
            })
            .serialize_with(|value| match value {
                Value::Boolean(b) => Ok((*b).into()),
                other => Err(format!("cannot serialize {other} as Boolean")),
            }),
        ScalarType::new(Name::new_unchecked("ID"))
            .description("A unique identifier, serialized as a string.")
            .parse_with(|raw| {
                if let Some(s) = raw.as_str() {
                    Ok(Value::String(s.to_owned()))
                } else if let Some(int) = raw.as_i64() {
                    Ok(Value::Int(int))
                } else {
                    Err(format!("cannot coerce {raw} to ID"))
                }
            })
            .serialize_with(|value| match value {
                Value::String(s) => Ok(s.as_str().into()),
                Value::Int(int) => Ok((*int).into()),
                other => Err(format!("cannot serialize {other} as ID")),
            }),
    ]
}

/// The always-present `@skip` and `@include` directives.
fn built_in_directives() -> Vec<DirectiveDefinition> {
    let executable_selection = [
        DirectiveLocation::Field,
        DirectiveLocation::FragmentSpread,
        DirectiveLocation::InlineFragment,
    ];
    let if_argument = || {
        InputValueDefinition::new(
            Name::new_unchecked("if"),
            Type::new_named(Name::new_unchecked("Boolean")).non_null(),
        )
    };
    let mut skip = DirectiveDefinition::new(Name::new_unchecked("skip"))
        .description("Omits the selection when `if` is true.")
        .argument(if_argument());
    let mut include = DirectiveDefinition::new(Name::new_unchecked("include"))
        .description("Includes the selection only when `if` is true.")
        .argument(if_argument());
    for location in executable_selection {
        skip = skip.location(location);
        include = include.location(location);
    }
    vec![skip, include]
}
