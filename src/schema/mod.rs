//! The schema type model: a self-referential graph of named types.
//!
//! Types reference each other through [`Type`] by name; the references are
//! linked and verified when [`SchemaBuilder::build`] runs. Resolver
//! functions, scalar coercion functions, and abstract-type discriminators
//! are attached directly to the type records.

use crate::ast::OperationType;
use crate::collections::HashMap;
use crate::collections::IndexMap;
use crate::collections::IndexSet;
use crate::execution::resolver::ResolveInfo;
use crate::execution::resolver::Resolution;
use crate::response::JsonValue;
use crate::value::Value;
use crate::value::ValueMap;
use crate::Node;
use std::fmt;
use std::sync::Arc;
use std::sync::LazyLock;

mod builder;

pub use self::builder::BuildError;
pub use self::builder::BuildErrors;
pub use self::builder::SchemaBuilder;
pub use crate::ast::{Name, NamedType, Type};

/// Parses a raw input value (from transport JSON or a document literal)
/// into the internal value domain.
pub type ParseFn = Arc<dyn Fn(&JsonValue) -> Result<Value, String> + Send + Sync>;

/// Serializes an internal value into its raw response form.
pub type SerializeFn = Arc<dyn Fn(&Value) -> Result<JsonValue, String> + Send + Sync>;

/// Tells whether a runtime value is an instance of this object type.
/// Consulted for abstract-type resolution when the interface or union
/// does not discriminate itself.
pub type IsTypeOfFn = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Names the concrete object type for a runtime value of an abstract type.
pub type ResolveTypeFn = Arc<dyn Fn(&Value, &Schema) -> Option<NamedType> + Send + Sync>;

/// Computes a field's value from the coerced arguments and resolution info.
pub type ResolverFn =
    Arc<dyn for<'a> Fn(&ValueMap, &ResolveInfo<'a>) -> Resolution + Send + Sync>;

/// A GraphQL schema: named types, directive definitions, and root types,
/// with all cross-references resolved.
///
/// Built once through [`Schema::builder`], then immutable and freely shared.
#[derive(Clone)]
pub struct Schema {
    pub description: Option<String>,

    /// All named types: built-in scalars, introspection types, and the
    /// programmer-supplied types, in registration order.
    pub types: IndexMap<NamedType, TypeDefinition>,

    /// Built-in and explicit directive definitions
    pub directive_definitions: IndexMap<Name, Node<DirectiveDefinition>>,

    /// Name of the object type for the `query` root operation
    pub query_root: NamedType,

    /// Name of the object type for the `mutation` root operation
    pub mutation_root: Option<NamedType>,

    /// Name of the object type for the `subscription` root operation
    pub subscription_root: Option<NamedType>,
}

/// The definition of a named type.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeDefinition {
    Scalar(Node<ScalarType>),
    Object(Node<ObjectType>),
    Interface(Node<InterfaceType>),
    Union(Node<UnionType>),
    Enum(Node<EnumType>),
    InputObject(Node<InputObjectType>),
}

/// A leaf type bridging between raw transport values and the internal
/// value domain.
#[derive(Clone)]
pub struct ScalarType {
    pub name: Name,
    pub description: Option<String>,
    pub(crate) parse: Option<ParseFn>,
    pub(crate) serialize: Option<SerializeFn>,
}

/// A composite output type with resolvable fields.
#[derive(Clone)]
pub struct ObjectType {
    pub name: Name,
    pub description: Option<String>,
    pub implements_interfaces: IndexSet<Name>,
    pub fields: IndexMap<Name, Node<FieldDefinition>>,
    pub(crate) is_type_of: Option<IsTypeOfFn>,
}

/// An abstract type whose concrete object is picked at runtime.
#[derive(Clone)]
pub struct InterfaceType {
    pub name: Name,
    pub description: Option<String>,
    pub fields: IndexMap<Name, Node<FieldDefinition>>,
    pub(crate) resolve_type: Option<ResolveTypeFn>,
}

/// An abstract type selecting between member object types at runtime.
#[derive(Clone)]
pub struct UnionType {
    pub name: Name,
    pub description: Option<String>,
    pub members: IndexSet<NamedType>,
    pub(crate) resolve_type: Option<ResolveTypeFn>,
}

/// A leaf type with a fixed set of named values.
#[derive(Clone, Debug, PartialEq)]
pub struct EnumType {
    pub name: Name,
    pub description: Option<String>,
    pub values: IndexMap<Name, Node<EnumValueDefinition>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnumValueDefinition {
    pub name: Name,
    /// The internal value this name coerces to on input, and that reverse
    /// lookup maps back to the name on output. Defaults to the name itself
    /// as a string. Must be unique within the enum.
    pub value: Value,
    pub description: Option<String>,
    pub deprecation: Option<Deprecation>,
}

/// A composite input type.
#[derive(Clone, Debug, PartialEq)]
pub struct InputObjectType {
    pub name: Name,
    pub description: Option<String>,
    pub fields: IndexMap<Name, Node<InputValueDefinition>>,
}

/// An output field of an object or interface type.
#[derive(Clone)]
pub struct FieldDefinition {
    pub name: Name,
    pub description: Option<String>,
    pub arguments: IndexMap<Name, Node<InputValueDefinition>>,
    pub ty: Type,
    pub deprecation: Option<Deprecation>,
    pub(crate) resolver: Option<ResolverFn>,
}

/// An argument of a field or directive, or a field of an input object type.
#[derive(Clone, Debug, PartialEq)]
pub struct InputValueDefinition {
    pub name: Name,
    pub description: Option<String>,
    pub ty: Type,
    /// Pre-coerced into the internal value domain; used without
    /// re-validation when the input omits this value.
    pub default_value: Option<Value>,
    pub deprecation: Option<Deprecation>,
}

/// Marks a field, argument, enum value, or input field as deprecated.
///
/// Consuming a deprecated schema member during execution appends a
/// warning-class error to the response.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Deprecation {
    pub reason: Option<String>,
}

/// The definition of a directive: name, arguments, and the positions in an
/// executable document where it may appear.
#[derive(Clone, Debug, PartialEq)]
pub struct DirectiveDefinition {
    pub name: Name,
    pub description: Option<String>,
    pub arguments: IndexMap<Name, Node<InputValueDefinition>>,
    pub locations: Vec<DirectiveLocation>,
}

/// A position in an executable document where a directive may appear.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub enum DirectiveLocation {
    Query,
    Mutation,
    Subscription,
    Field,
    FragmentDefinition,
    FragmentSpread,
    InlineFragment,
}

/// Could not find the requested field definition
#[derive(Debug, Clone, PartialEq)]
pub enum FieldLookupError<'schema> {
    NoSuchType,
    NoSuchField(&'schema NamedType, &'schema TypeDefinition),
}

impl Schema {
    /// Returns a new builder, initialized with the built-in scalars and the
    /// built-in `@skip` and `@include` directives.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    /// Returns the type with the given name, if it is a scalar type
    pub fn get_scalar(&self, name: &str) -> Option<&Node<ScalarType>> {
        if let Some(TypeDefinition::Scalar(ty)) = self.types.get(name) {
            Some(ty)
        } else {
            None
        }
    }

    /// Returns the type with the given name, if it is an object type
    pub fn get_object(&self, name: &str) -> Option<&Node<ObjectType>> {
        if let Some(TypeDefinition::Object(ty)) = self.types.get(name) {
            Some(ty)
        } else {
            None
        }
    }

    /// Returns the type with the given name, if it is an interface type
    pub fn get_interface(&self, name: &str) -> Option<&Node<InterfaceType>> {
        if let Some(TypeDefinition::Interface(ty)) = self.types.get(name) {
            Some(ty)
        } else {
            None
        }
    }

    /// Returns the type with the given name, if it is a union type
    pub fn get_union(&self, name: &str) -> Option<&Node<UnionType>> {
        if let Some(TypeDefinition::Union(ty)) = self.types.get(name) {
            Some(ty)
        } else {
            None
        }
    }

    /// Returns the type with the given name, if it is an enum type
    pub fn get_enum(&self, name: &str) -> Option<&Node<EnumType>> {
        if let Some(TypeDefinition::Enum(ty)) = self.types.get(name) {
            Some(ty)
        } else {
            None
        }
    }

    /// Returns the type with the given name, if it is an input object type
    pub fn get_input_object(&self, name: &str) -> Option<&Node<InputObjectType>> {
        if let Some(TypeDefinition::InputObject(ty)) = self.types.get(name) {
            Some(ty)
        } else {
            None
        }
    }

    /// Returns the name of the object type for the root operation
    /// with the given operation kind
    pub fn root_operation(&self, operation_type: OperationType) -> Option<&NamedType> {
        match operation_type {
            OperationType::Query => Some(&self.query_root),
            OperationType::Mutation => self.mutation_root.as_ref(),
            OperationType::Subscription => self.subscription_root.as_ref(),
        }
    }

    /// Returns the definition of a type's explicit field or meta-field.
    pub fn type_field(
        &self,
        type_name: &str,
        field_name: &str,
    ) -> Result<&Node<FieldDefinition>, FieldLookupError<'_>> {
        let (ty_def_name, ty_def) = self
            .types
            .get_key_value(type_name)
            .ok_or(FieldLookupError::NoSuchType)?;
        self.meta_fields_definitions(type_name)
            .iter()
            .find(|def| def.name == field_name)
            .or_else(|| match ty_def {
                TypeDefinition::Object(ty) => ty.fields.get(field_name),
                TypeDefinition::Interface(ty) => ty.fields.get(field_name),
                TypeDefinition::Scalar(_)
                | TypeDefinition::Union(_)
                | TypeDefinition::Enum(_)
                | TypeDefinition::InputObject(_) => None,
            })
            .ok_or(FieldLookupError::NoSuchField(ty_def_name, ty_def))
    }

    /// Returns a map of interface names to names of object types that
    /// implement that interface.
    ///
    /// The schema only stores the inverse relationship
    /// (in [`ObjectType::implements_interfaces`]), so iterating the
    /// implementers of an interface requires a linear scan of all types.
    /// If that is repeated for multiple interfaces, gathering them all at
    /// once amortizes that cost.
    pub fn implementers_map(&self) -> HashMap<Name, IndexSet<Name>> {
        let mut map = HashMap::<Name, IndexSet<Name>>::default();
        for (ty_name, ty) in &self.types {
            let interfaces = match ty {
                TypeDefinition::Object(def) => &def.implements_interfaces,
                TypeDefinition::Scalar(_)
                | TypeDefinition::Interface(_)
                | TypeDefinition::Union(_)
                | TypeDefinition::Enum(_)
                | TypeDefinition::InputObject(_) => continue,
            };
            for interface in interfaces {
                map.entry(interface.clone())
                    .or_default()
                    .insert(ty_name.clone());
            }
        }
        map
    }

    /// Returns whether `maybe_subtype` is a subtype of `abstract_type`:
    /// it implements the interface, or is a member of the union.
    pub fn is_subtype(&self, abstract_type: &str, maybe_subtype: &str) -> bool {
        self.types.get(abstract_type).is_some_and(|ty| match ty {
            TypeDefinition::Interface(_) => self
                .get_object(maybe_subtype)
                .is_some_and(|def| def.implements_interfaces.contains(abstract_type)),
            TypeDefinition::Union(def) => def.members.contains(maybe_subtype),
            TypeDefinition::Scalar(_)
            | TypeDefinition::Object(_)
            | TypeDefinition::Enum(_)
            | TypeDefinition::InputObject(_) => false,
        })
    }

    /// Returns whether the type `ty` is defined as an input type
    pub fn is_input_type(&self, ty: &Type) -> bool {
        matches!(
            self.types.get(ty.inner_named_type().as_str()),
            Some(TypeDefinition::Scalar(_))
                | Some(TypeDefinition::Enum(_))
                | Some(TypeDefinition::InputObject(_))
        )
    }

    /// Returns whether the type `ty` is defined as an output type
    pub fn is_output_type(&self, ty: &Type) -> bool {
        matches!(
            self.types.get(ty.inner_named_type().as_str()),
            Some(TypeDefinition::Scalar(_))
                | Some(TypeDefinition::Object(_))
                | Some(TypeDefinition::Interface(_))
                | Some(TypeDefinition::Union(_))
                | Some(TypeDefinition::Enum(_))
        )
    }

    /// Return the meta-fields of the given type:
    /// `__typename` on every composite type, plus `__schema` and `__type`
    /// on the query root only.
    pub(crate) fn meta_fields_definitions(&self, type_name: &str) -> &'static [Node<FieldDefinition>] {
        static ROOT_QUERY_FIELDS: LazyLock<[Node<FieldDefinition>; 3]> = LazyLock::new(|| {
            [
                // __typename: String!
                Node::new(FieldDefinition {
                    description: None,
                    name: Name::new_unchecked("__typename"),
                    arguments: IndexMap::default(),
                    ty: Type::new_named(Name::new_unchecked("String")).non_null(),
                    deprecation: None,
                    resolver: None,
                }),
                // __schema: __Schema!
                Node::new(FieldDefinition {
                    description: None,
                    name: Name::new_unchecked("__schema"),
                    arguments: IndexMap::default(),
                    ty: Type::new_named(Name::new_unchecked("__Schema")).non_null(),
                    deprecation: None,
                    resolver: None,
                }),
                // __type(name: String!): __Type
                Node::new(FieldDefinition {
                    description: None,
                    name: Name::new_unchecked("__type"),
                    arguments: [(
                        Name::new_unchecked("name"),
                        Node::new(InputValueDefinition {
                            description: None,
                            name: Name::new_unchecked("name"),
                            ty: Type::new_named(Name::new_unchecked("String")).non_null(),
                            default_value: None,
                            deprecation: None,
                        }),
                    )]
                    .into_iter()
                    .collect(),
                    ty: Type::new_named(Name::new_unchecked("__Type")),
                    deprecation: None,
                    resolver: None,
                }),
            ]
        });
        if self.query_root == type_name {
            // __typename, __schema, __type
            &*ROOT_QUERY_FIELDS
        } else {
            // __typename only
            std::slice::from_ref(&ROOT_QUERY_FIELDS[0])
        }
    }
}

impl TypeDefinition {
    pub fn name(&self) -> &Name {
        match self {
            Self::Scalar(ty) => &ty.name,
            Self::Object(ty) => &ty.name,
            Self::Interface(ty) => &ty.name,
            Self::Union(ty) => &ty.name,
            Self::Enum(ty) => &ty.name,
            Self::InputObject(ty) => &ty.name,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Scalar(ty) => ty.description.as_deref(),
            Self::Object(ty) => ty.description.as_deref(),
            Self::Interface(ty) => ty.description.as_deref(),
            Self::Union(ty) => ty.description.as_deref(),
            Self::Enum(ty) => ty.description.as_deref(),
            Self::InputObject(ty) => ty.description.as_deref(),
        }
    }

    pub(crate) fn describe(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "a scalar type",
            Self::Object(_) => "an object type",
            Self::Interface(_) => "an interface type",
            Self::Union(_) => "a union type",
            Self::Enum(_) => "an enum type",
            Self::InputObject(_) => "an input object type",
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    pub fn is_interface(&self) -> bool {
        matches!(self, Self::Interface(_))
    }

    pub fn is_union(&self) -> bool {
        matches!(self, Self::Union(_))
    }

    pub fn is_enum(&self) -> bool {
        matches!(self, Self::Enum(_))
    }

    pub fn is_input_object(&self) -> bool {
        matches!(self, Self::InputObject(_))
    }

    /// Object, interface, or union: a type with sub-selectable fields.
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Object(_) | Self::Interface(_) | Self::Union(_))
    }

    /// Scalar or enum: a type that terminates a selection.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Scalar(_) | Self::Enum(_))
    }

    /// Returns true if a value of this type can be used as an input value.
    pub fn is_input_type(&self) -> bool {
        matches!(self, Self::Scalar(_) | Self::Enum(_) | Self::InputObject(_))
    }

    /// Returns true if a value of this type can be used as an output value.
    pub fn is_output_type(&self) -> bool {
        matches!(
            self,
            Self::Scalar(_) | Self::Enum(_) | Self::Object(_) | Self::Interface(_) | Self::Union(_)
        )
    }
}

impl ScalarType {
    /// A new scalar that passes values through unchanged in both directions.
    pub fn new(name: Name) -> Self {
        Self {
            name,
            description: None,
            parse: None,
            serialize: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach an input coercion function.
    pub fn parse_with(
        mut self,
        parse: impl Fn(&JsonValue) -> Result<Value, String> + Send + Sync + 'static,
    ) -> Self {
        self.parse = Some(Arc::new(parse));
        self
    }

    /// Attach a result coercion function.
    pub fn serialize_with(
        mut self,
        serialize: impl Fn(&Value) -> Result<JsonValue, String> + Send + Sync + 'static,
    ) -> Self {
        self.serialize = Some(Arc::new(serialize));
        self
    }

    /// Coerce a raw input value into the internal domain.
    pub fn parse(&self, raw: &JsonValue) -> Result<Value, String> {
        match &self.parse {
            Some(parse) => parse(raw),
            None => Ok(Value::from_json(raw)),
        }
    }

    /// Coerce an internal value into its raw response form.
    pub fn serialize(&self, value: &Value) -> Result<JsonValue, String> {
        match &self.serialize {
            Some(serialize) => serialize(value),
            None => Ok(value.to_json()),
        }
    }
}

impl ObjectType {
    pub fn new(name: Name) -> Self {
        Self {
            name,
            description: None,
            implements_interfaces: IndexSet::default(),
            fields: IndexMap::default(),
            is_type_of: None,
        }
    }

    /// The conventional query root object, named `RootQueryType`.
    pub fn query_root() -> Self {
        Self::new(Name::new_unchecked(
            OperationType::Query.default_root_type_name(),
        ))
    }

    /// The conventional mutation root object, named `RootMutationType`.
    pub fn mutation_root() -> Self {
        Self::new(Name::new_unchecked(
            OperationType::Mutation.default_root_type_name(),
        ))
    }

    /// The conventional subscription root object, named `RootSubscriptionType`.
    pub fn subscription_root() -> Self {
        Self::new(Name::new_unchecked(
            OperationType::Subscription.default_root_type_name(),
        ))
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a field. A later field with the same name replaces the earlier one.
    pub fn field(mut self, field: FieldDefinition) -> Self {
        self.fields.insert(field.name.clone(), Node::new(field));
        self
    }

    pub fn implements(mut self, interface: Name) -> Self {
        self.implements_interfaces.insert(interface);
        self
    }

    /// Attach the runtime discriminator used when this object is a candidate
    /// for an abstract type without its own `resolve_type`.
    pub fn is_type_of(mut self, f: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        self.is_type_of = Some(Arc::new(f));
        self
    }
}

impl InterfaceType {
    pub fn new(name: Name) -> Self {
        Self {
            name,
            description: None,
            fields: IndexMap::default(),
            resolve_type: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, field: FieldDefinition) -> Self {
        self.fields.insert(field.name.clone(), Node::new(field));
        self
    }

    pub fn resolve_type(
        mut self,
        f: impl Fn(&Value, &Schema) -> Option<NamedType> + Send + Sync + 'static,
    ) -> Self {
        self.resolve_type = Some(Arc::new(f));
        self
    }
}

impl UnionType {
    pub fn new(name: Name) -> Self {
        Self {
            name,
            description: None,
            members: IndexSet::default(),
            resolve_type: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn member(mut self, member: NamedType) -> Self {
        self.members.insert(member);
        self
    }

    pub fn resolve_type(
        mut self,
        f: impl Fn(&Value, &Schema) -> Option<NamedType> + Send + Sync + 'static,
    ) -> Self {
        self.resolve_type = Some(Arc::new(f));
        self
    }
}

impl EnumType {
    pub fn new(name: Name) -> Self {
        Self {
            name,
            description: None,
            values: IndexMap::default(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn value(mut self, value: EnumValueDefinition) -> Self {
        self.values.insert(value.name.clone(), Node::new(value));
        self
    }

    /// Returns the name of the enum value whose internal value matches,
    /// for result coercion. A bare enum symbol matches a value by name.
    pub fn reverse_lookup(&self, value: &Value) -> Option<&Name> {
        self.values
            .values()
            .find(|def| {
                def.value == *value
                    || matches!(value, Value::Enum(symbol) if def.name == *symbol)
            })
            .map(|def| &def.name)
    }
}

impl EnumValueDefinition {
    /// A new enum value whose internal value is the name itself.
    pub fn new(name: Name) -> Self {
        let value = Value::String(name.as_str().to_owned());
        Self {
            name,
            value,
            description: None,
            deprecation: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach an explicit internal value.
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = value.into();
        self
    }

    pub fn deprecated(mut self, reason: impl Into<String>) -> Self {
        self.deprecation = Some(Deprecation {
            reason: Some(reason.into()),
        });
        self
    }
}

impl InputObjectType {
    pub fn new(name: Name) -> Self {
        Self {
            name,
            description: None,
            fields: IndexMap::default(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, field: InputValueDefinition) -> Self {
        self.fields.insert(field.name.clone(), Node::new(field));
        self
    }
}

impl FieldDefinition {
    pub fn new(name: Name, ty: Type) -> Self {
        Self {
            name,
            description: None,
            arguments: IndexMap::default(),
            ty,
            deprecation: None,
            resolver: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn argument(mut self, argument: InputValueDefinition) -> Self {
        self.arguments
            .insert(argument.name.clone(), Node::new(argument));
        self
    }

    pub fn deprecated(mut self, reason: impl Into<String>) -> Self {
        self.deprecation = Some(Deprecation {
            reason: Some(reason.into()),
        });
        self
    }

    /// Attach the resolver. Without one, execution reads the property named
    /// like the field from the parent object value.
    pub fn resolve(
        mut self,
        resolver: impl for<'a> Fn(&ValueMap, &ResolveInfo<'a>) -> Resolution + Send + Sync + 'static,
    ) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    pub(crate) fn resolver(&self) -> Option<&ResolverFn> {
        self.resolver.as_ref()
    }
}

impl InputValueDefinition {
    pub fn new(name: Name, ty: Type) -> Self {
        Self {
            name,
            description: None,
            ty,
            default_value: None,
            deprecation: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach a default, already in the internal value domain.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn deprecated(mut self, reason: impl Into<String>) -> Self {
        self.deprecation = Some(Deprecation {
            reason: Some(reason.into()),
        });
        self
    }
}

impl DirectiveDefinition {
    pub fn new(name: Name) -> Self {
        Self {
            name,
            description: None,
            arguments: IndexMap::default(),
            locations: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn argument(mut self, argument: InputValueDefinition) -> Self {
        self.arguments
            .insert(argument.name.clone(), Node::new(argument));
        self
    }

    pub fn location(mut self, location: DirectiveLocation) -> Self {
        self.locations.push(location);
        self
    }
}

impl DirectiveLocation {
    /// The location name as it appears in `__DirectiveLocation`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Query => "QUERY",
            Self::Mutation => "MUTATION",
            Self::Subscription => "SUBSCRIPTION",
            Self::Field => "FIELD",
            Self::FragmentDefinition => "FRAGMENT_DEFINITION",
            Self::FragmentSpread => "FRAGMENT_SPREAD",
            Self::InlineFragment => "INLINE_FRAGMENT",
        }
    }

    pub(crate) fn from_operation_type(operation_type: OperationType) -> Self {
        match operation_type {
            OperationType::Query => Self::Query,
            OperationType::Mutation => Self::Mutation,
            OperationType::Subscription => Self::Subscription,
        }
    }
}

impl fmt::Display for DirectiveLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Structural equality: coercion, discriminator, and resolver functions are
// identified by where they hang in the graph, not by code identity, so they
// are excluded from comparisons. Building the same schema twice therefore
// compares equal.

impl PartialEq for ScalarType {
    fn eq(&self, other: &Self) -> bool {
        let Self {
            name,
            description,
            parse: _,
            serialize: _,
        } = self;
        *name == other.name && *description == other.description
    }
}

impl PartialEq for ObjectType {
    fn eq(&self, other: &Self) -> bool {
        let Self {
            name,
            description,
            implements_interfaces,
            fields,
            is_type_of: _,
        } = self;
        *name == other.name
            && *description == other.description
            && *implements_interfaces == other.implements_interfaces
            && *fields == other.fields
    }
}

impl PartialEq for InterfaceType {
    fn eq(&self, other: &Self) -> bool {
        let Self {
            name,
            description,
            fields,
            resolve_type: _,
        } = self;
        *name == other.name && *description == other.description && *fields == other.fields
    }
}

impl PartialEq for UnionType {
    fn eq(&self, other: &Self) -> bool {
        let Self {
            name,
            description,
            members,
            resolve_type: _,
        } = self;
        *name == other.name && *description == other.description && *members == other.members
    }
}

impl PartialEq for FieldDefinition {
    fn eq(&self, other: &Self) -> bool {
        let Self {
            name,
            description,
            arguments,
            ty,
            deprecation,
            resolver: _,
        } = self;
        *name == other.name
            && *description == other.description
            && *arguments == other.arguments
            && *ty == other.ty
            && *deprecation == other.deprecation
    }
}

impl Eq for Schema {}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        let Self {
            description,
            types,
            directive_definitions,
            query_root,
            mutation_root,
            subscription_root,
        } = self;
        *description == other.description
            && *types == other.types
            && *directive_definitions == other.directive_definitions
            && *query_root == other.query_root
            && *mutation_root == other.mutation_root
            && *subscription_root == other.subscription_root
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            description,
            types,
            directive_definitions,
            query_root,
            mutation_root,
            subscription_root,
        } = self;
        f.debug_struct("Schema")
            .field("description", description)
            .field("types", &types.keys().collect::<Vec<_>>())
            .field(
                "directive_definitions",
                &directive_definitions.keys().collect::<Vec<_>>(),
            )
            .field("query_root", query_root)
            .field("mutation_root", mutation_root)
            .field("subscription_root", subscription_root)
            .finish()
    }
}

/// Debug for records holding function fields: print the data fields, and for
/// each function field only whether one is attached.
macro_rules! fmt_skipping_functions {
    ($ty: ident { $($field: ident),* $(,)? } + $($function: ident),*) => {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct(stringify!($ty))
                $(.field(stringify!($field), &self.$field))*
                $(.field(stringify!($function), &self.$function.is_some()))*
                .finish()
        }
    };
}

impl fmt::Debug for ScalarType {
    fmt_skipping_functions!(ScalarType { name, description } + parse, serialize);
}

impl fmt::Debug for ObjectType {
    fmt_skipping_functions!(ObjectType {
        name,
        description,
        implements_interfaces,
        fields
    } + is_type_of);
}

impl fmt::Debug for InterfaceType {
    fmt_skipping_functions!(InterfaceType {
        name,
        description,
        fields
    } + resolve_type);
}

impl fmt::Debug for UnionType {
    fmt_skipping_functions!(UnionType {
        name,
        description,
        members
    } + resolve_type);
}

impl fmt::Debug for FieldDefinition {
    fmt_skipping_functions!(FieldDefinition {
        name,
        description,
        arguments,
        ty,
        deprecation
    } + resolver);
}

impl From<ScalarType> for TypeDefinition {
    fn from(ty: ScalarType) -> Self {
        Self::Scalar(Node::new(ty))
    }
}

impl From<ObjectType> for TypeDefinition {
    fn from(ty: ObjectType) -> Self {
        Self::Object(Node::new(ty))
    }
}

impl From<InterfaceType> for TypeDefinition {
    fn from(ty: InterfaceType) -> Self {
        Self::Interface(Node::new(ty))
    }
}

impl From<UnionType> for TypeDefinition {
    fn from(ty: UnionType) -> Self {
        Self::Union(Node::new(ty))
    }
}

impl From<EnumType> for TypeDefinition {
    fn from(ty: EnumType) -> Self {
        Self::Enum(Node::new(ty))
    }
}

impl From<InputObjectType> for TypeDefinition {
    fn from(ty: InputObjectType) -> Self {
        Self::InputObject(Node::new(ty))
    }
}
