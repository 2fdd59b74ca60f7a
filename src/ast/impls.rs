use super::*;
use std::borrow::Borrow;
use std::ops::Deref;

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_definition(mut self, definition: impl Into<Definition>) -> Self {
        self.definitions.push(definition.into());
        self
    }
}

impl Name {
    /// Create a new name, checking it against the GraphQL name grammar.
    pub fn new(value: impl AsRef<str>) -> Result<Self, InvalidNameError> {
        let value = value.as_ref();
        if Self::valid_syntax(value) {
            Ok(Self(value.into()))
        } else {
            Err(InvalidNameError(value.to_owned()))
        }
    }

    /// Create a new name without validity checking.
    ///
    /// Constructing an invalid name may cause invalid documents or schemas
    /// to be silently accepted.
    pub fn new_unchecked(value: &str) -> Self {
        Self(value.into())
    }

    /// Returns whether the given string is a valid GraphQL name:
    /// `/[_A-Za-z][_0-9A-Za-z]*/`.
    pub const fn valid_syntax(value: &str) -> bool {
        let bytes = value.as_bytes();
        if bytes.is_empty() {
            return false;
        }
        let mut i = 0;
        while i < bytes.len() {
            let byte = bytes[i];
            let valid = byte == b'_'
                || byte.is_ascii_alphabetic()
                || (i > 0 && byte.is_ascii_digit());
            if !valid {
                return false;
            }
            i += 1;
        }
        true
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derive a conventional type name from a lower-case identifier:
    /// `channel_info` becomes `ChannelInfo`.
    ///
    /// Used by schema-definition layers when a type omits an explicit name.
    pub fn from_identifier(identifier: &str) -> Result<Self, InvalidNameError> {
        let mut camel = String::with_capacity(identifier.len());
        let mut at_word_start = true;
        for c in identifier.chars() {
            if c == '_' {
                at_word_start = true;
            } else if at_word_start {
                camel.extend(c.to_uppercase());
                at_word_start = false;
            } else {
                camel.push(c);
            }
        }
        Self::new(camel)
    }
}

impl Deref for Name {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl Borrow<str> for Name {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq<str> for Name {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Name {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl TryFrom<&str> for Name {
    type Error = InvalidNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl OperationDefinition {
    pub fn new(operation_type: OperationType) -> Self {
        Self {
            operation_type,
            name: None,
            variables: Vec::new(),
            directives: DirectiveList::new(),
            selection_set: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<Name>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_variable(mut self, variable: impl Into<Node<VariableDefinition>>) -> Self {
        self.variables.push(variable.into());
        self
    }

    pub fn with_selection(mut self, selection: impl Into<Selection>) -> Self {
        self.selection_set.push(selection.into());
        self
    }
}

impl FragmentDefinition {
    pub fn new(name: impl Into<Name>, type_condition: impl Into<NamedType>) -> Self {
        Self {
            name: name.into(),
            type_condition: type_condition.into(),
            directives: DirectiveList::new(),
            selection_set: Vec::new(),
        }
    }

    pub fn with_directive(mut self, directive: impl Into<Node<Directive>>) -> Self {
        self.directives.0.push(directive.into());
        self
    }

    pub fn with_selection(mut self, selection: impl Into<Selection>) -> Self {
        self.selection_set.push(selection.into());
        self
    }
}

impl OperationType {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
            Self::Subscription => "subscription",
        }
    }

    /// The conventional name of the root object type for this operation type,
    /// used when a schema-definition layer does not name the root explicitly.
    pub const fn default_root_type_name(self) -> &'static str {
        match self {
            Self::Query => "RootQueryType",
            Self::Mutation => "RootMutationType",
            Self::Subscription => "RootSubscriptionType",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl VariableDefinition {
    pub fn new(name: impl Into<Name>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            default_value: None,
            directives: DirectiveList::new(),
        }
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(Node::new(value.into()));
        self
    }
}

impl Type {
    pub fn new_named(name: impl Into<NamedType>) -> Self {
        Self::Named(name.into())
    }

    /// Returns this type made non-null, if it isn't already.
    pub fn non_null(self) -> Self {
        match self {
            Self::Named(name) => Self::NonNullNamed(name),
            Self::List(inner) => Self::NonNullList(inner),
            Self::NonNullNamed(_) | Self::NonNullList(_) => self,
        }
    }

    /// Returns this type made nullable, if it isn't already.
    pub fn nullable(self) -> Self {
        match self {
            Self::NonNullNamed(name) => Self::Named(name),
            Self::NonNullList(inner) => Self::List(inner),
            Self::Named(_) | Self::List(_) => self,
        }
    }

    /// Returns a list type whose items are this type.
    pub fn list(self) -> Self {
        Self::List(Box::new(self))
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, Self::NonNullNamed(_) | Self::NonNullList(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_) | Self::NonNullList(_))
    }

    pub fn is_named(&self) -> bool {
        matches!(self, Self::Named(_) | Self::NonNullNamed(_))
    }

    /// Returns the item type of a list, or `self` for a named type.
    pub fn item_type(&self) -> &Self {
        match self {
            Self::List(inner) | Self::NonNullList(inner) => inner,
            Self::Named(_) | Self::NonNullNamed(_) => self,
        }
    }

    /// Returns the name of the type with all wrappers removed.
    pub fn inner_named_type(&self) -> &NamedType {
        match self {
            Self::Named(name) | Self::NonNullNamed(name) => name,
            Self::List(inner) | Self::NonNullList(inner) => inner.inner_named_type(),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => write!(f, "{name}"),
            Self::NonNullNamed(name) => write!(f, "{name}!"),
            Self::List(inner) => write!(f, "[{inner}]"),
            Self::NonNullList(inner) => write!(f, "[{inner}]!"),
        }
    }
}

impl Field {
    pub fn new(name: impl Into<Name>) -> Self {
        Self {
            alias: None,
            name: name.into(),
            arguments: Vec::new(),
            directives: DirectiveList::new(),
            selection_set: Vec::new(),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<Name>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_argument(mut self, name: impl Into<Name>, value: impl Into<Value>) -> Self {
        self.arguments.push(Node::new(Argument {
            name: name.into(),
            value: Node::new(value.into()),
        }));
        self
    }

    pub fn with_directive(mut self, directive: impl Into<Node<Directive>>) -> Self {
        self.directives.0.push(directive.into());
        self
    }

    pub fn with_selection(mut self, selection: impl Into<Selection>) -> Self {
        self.selection_set.push(selection.into());
        self
    }

    /// Returns the response key for this field: the alias if there is one,
    /// or the field name.
    pub fn response_key(&self) -> &Name {
        self.alias.as_ref().unwrap_or(&self.name)
    }
}

impl FragmentSpread {
    pub fn new(fragment_name: impl Into<Name>) -> Self {
        Self {
            fragment_name: fragment_name.into(),
            directives: DirectiveList::new(),
        }
    }

    pub fn with_directive(mut self, directive: impl Into<Node<Directive>>) -> Self {
        self.directives.0.push(directive.into());
        self
    }
}

impl InlineFragment {
    pub fn new(type_condition: Option<NamedType>) -> Self {
        Self {
            type_condition,
            directives: DirectiveList::new(),
            selection_set: Vec::new(),
        }
    }

    pub fn with_directive(mut self, directive: impl Into<Node<Directive>>) -> Self {
        self.directives.0.push(directive.into());
        self
    }

    pub fn with_selection(mut self, selection: impl Into<Selection>) -> Self {
        self.selection_set.push(selection.into());
        self
    }
}

impl Selection {
    pub fn directives(&self) -> &DirectiveList {
        match self {
            Self::Field(sel) => &sel.directives,
            Self::FragmentSpread(sel) => &sel.directives,
            Self::InlineFragment(sel) => &sel.directives,
        }
    }
}

impl DirectiveList {
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Returns an iterator of directives with the given name.
    ///
    /// This method is best for repeatable directives.
    pub fn get_all<'def: 'name, 'name>(
        &'def self,
        name: &'name str,
    ) -> impl Iterator<Item = &'def Node<Directive>> + 'name {
        self.0.iter().filter(move |dir| dir.name == name)
    }

    /// Returns the first directive with the given name, if any.
    pub fn get(&self, name: &str) -> Option<&Node<Directive>> {
        self.get_all(name).next()
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

impl Deref for DirectiveList {
    type Target = Vec<Node<Directive>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> IntoIterator for &'a DirectiveList {
    type Item = &'a Node<Directive>;
    type IntoIter = std::slice::Iter<'a, Node<Directive>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Node<Directive>> for DirectiveList {
    fn from_iter<T: IntoIterator<Item = Node<Directive>>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Directive {
    pub fn new(name: impl Into<Name>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    pub fn with_argument(mut self, name: impl Into<Name>, value: impl Into<Value>) -> Self {
        self.arguments.push(Node::new(Argument {
            name: name.into(),
            value: Node::new(value.into()),
        }));
        self
    }

    /// Returns the value of the argument with the given name, if supplied.
    pub fn argument_by_name(&self, name: &str) -> Option<&Node<Value>> {
        self.arguments
            .iter()
            .find(|arg| arg.name == name)
            .map(|arg| &arg.value)
    }
}

impl Argument {
    pub fn new(name: impl Into<Name>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: Node::new(value.into()),
        }
    }
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&Name> {
        match self {
            Self::Enum(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_variable(&self) -> Option<&Name> {
        match self {
            Self::Variable(name) => Some(name),
            _ => None,
        }
    }

    pub fn to_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Node<Value>]> {
        match self {
            Self::List(value) => Some(value),
            _ => None,
        }
    }
}

impl IntValue {
    pub fn new(value: i64) -> Self {
        Self(value.to_string())
    }

    /// The source text of the literal.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FloatValue {
    pub fn new(value: f64) -> Self {
        Self(value.to_string())
    }

    /// The source text of the literal.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(IntValue::new(value.into()))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(IntValue::new(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(FloatValue::new(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Node<OperationDefinition>> for Definition {
    fn from(node: Node<OperationDefinition>) -> Self {
        Self::OperationDefinition(node)
    }
}

impl From<Node<FragmentDefinition>> for Definition {
    fn from(node: Node<FragmentDefinition>) -> Self {
        Self::FragmentDefinition(node)
    }
}

impl From<OperationDefinition> for Definition {
    fn from(def: OperationDefinition) -> Self {
        Self::OperationDefinition(Node::new(def))
    }
}

impl From<FragmentDefinition> for Definition {
    fn from(def: FragmentDefinition) -> Self {
        Self::FragmentDefinition(Node::new(def))
    }
}

impl From<Field> for Selection {
    fn from(field: Field) -> Self {
        Self::Field(Node::new(field))
    }
}

impl From<Node<Field>> for Selection {
    fn from(node: Node<Field>) -> Self {
        Self::Field(node)
    }
}

impl From<FragmentSpread> for Selection {
    fn from(spread: FragmentSpread) -> Self {
        Self::FragmentSpread(Node::new(spread))
    }
}

impl From<InlineFragment> for Selection {
    fn from(inline: InlineFragment) -> Self {
        Self::InlineFragment(Node::new(inline))
    }
}

