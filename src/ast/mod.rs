//! *Abstract Syntax Tree* for executable GraphQL documents.
//!
//! This AST is the contract between the (external) parser and the rest of the
//! crate: the validator and the execution engine consume these nodes, and a
//! parser implementing [`DocumentParser`][crate::request::DocumentParser] is
//! expected to produce them. Documents may also be built programmatically
//! with the constructors and `with_*` builder methods on each node type.
//!
//! Nodes are wrapped in [`Node`], a reference-counted smart pointer carrying
//! an optional source span. The AST is immutable once built; to modify a
//! node, [`Node::make_mut`] provides copy-on-write semantics.

use crate::Node;
use std::fmt;
use std::sync::Arc;

mod impls;

pub use crate::node::SourceSpan;

/// An executable GraphQL document: operations and fragment definitions.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Document {
    pub definitions: Vec<Definition>,
}

/// A GraphQL identifier.
///
/// Cheap to clone, validated against the GraphQL name grammar on creation.
/// Use the [`name!`][crate::name] macro for names checked at compile time.
#[derive(Clone, Ord, Eq, PartialOrd, PartialEq, Hash)]
pub struct Name(Arc<str>);

/// Refers to the name of a GraphQL type defined elsewhere
pub type NamedType = Name;

/// Tried to create a [`Name`] from a string that is not in valid
/// GraphQL name syntax.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("`{0}` is not a valid GraphQL name")]
pub struct InvalidNameError(pub String);

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Definition {
    OperationDefinition(Node<OperationDefinition>),
    FragmentDefinition(Node<FragmentDefinition>),
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct OperationDefinition {
    pub operation_type: OperationType,
    pub name: Option<Name>,
    pub variables: Vec<Node<VariableDefinition>>,
    pub directives: DirectiveList,
    pub selection_set: Vec<Selection>,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct FragmentDefinition {
    pub name: Name,
    pub type_condition: NamedType,
    pub directives: DirectiveList,
    pub selection_set: Vec<Selection>,
}

#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub enum OperationType {
    Query,
    Mutation,
    Subscription,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct VariableDefinition {
    pub name: Name,
    pub ty: Node<Type>,
    pub default_value: Option<Node<Value>>,
    pub directives: DirectiveList,
}

/// A reference to a type defined elsewhere, with optional list and non-null
/// wrappers.
///
/// The representation makes `NonNull(NonNull(_))` unexpressible:
/// [`non_null`][Self::non_null] on an already non-null type is the identity.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Type {
    Named(NamedType),
    NonNullNamed(NamedType),
    List(Box<Type>),
    NonNullList(Box<Type>),
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Selection {
    Field(Node<Field>),
    FragmentSpread(Node<FragmentSpread>),
    InlineFragment(Node<InlineFragment>),
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Field {
    pub alias: Option<Name>,
    pub name: Name,
    pub arguments: Vec<Node<Argument>>,
    pub directives: DirectiveList,
    pub selection_set: Vec<Selection>,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct FragmentSpread {
    pub fragment_name: Name,
    pub directives: DirectiveList,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct InlineFragment {
    pub type_condition: Option<NamedType>,
    pub directives: DirectiveList,
    pub selection_set: Vec<Selection>,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Argument {
    pub name: Name,
    pub value: Node<Value>,
}

#[derive(Clone, Eq, PartialEq, Hash, Default)]
pub struct DirectiveList(pub Vec<Node<Directive>>);

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Directive {
    pub name: Name,
    pub arguments: Vec<Node<Argument>>,
}

/// A literal value as written in a document.
///
/// Distinct from the runtime [`Value`][crate::value::Value] domain:
/// literals still contain variable references and unresolved enum names.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Value {
    Null,
    Enum(Name),
    Variable(Name),
    String(
        /// The value after escape sequences are resolved
        String,
    ),
    Float(FloatValue),
    Int(IntValue),
    Boolean(bool),
    List(Vec<Node<Value>>),
    Object(Vec<(Name, Node<Value>)>),
}

/// The source text of an integer literal, parsed on demand.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct IntValue(pub(crate) String);

/// The source text of a float literal, parsed on demand.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct FloatValue(pub(crate) String);

impl fmt::Debug for IntValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Debug for FloatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Debug for DirectiveList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Create a [`Name`] from a string literal or identifier,
/// checked for validity at compile time.
///
/// # Examples
///
/// ```
/// use graphql_runtime::name;
///
/// assert_eq!(name!("Query").as_str(), "Query");
/// assert_eq!(name!(Query).as_str(), "Query");
/// ```
#[macro_export]
macro_rules! name {
    ($value: ident) => {
        $crate::name!(stringify!($value))
    };
    ($value: expr) => {{
        const _: () = assert!($crate::ast::Name::valid_syntax($value));
        $crate::ast::Name::new_unchecked($value)
    }};
}
