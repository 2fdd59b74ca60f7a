//! Static checks of an executable document against a schema.
//!
//! Validation runs before execution. Errors accumulate in a
//! [`DiagnosticList`]; a non-empty list means execution must not start, and
//! the list becomes the `errors` entry of the response.

use crate::ast::OperationType;
use crate::collections::HashSet;
use crate::executable;
use crate::node::SourceSpan;
use crate::response::GraphQLError;
use crate::response::Response;
use crate::response::ResponseData;
use crate::schema::DirectiveLocation;
use crate::schema::Schema;
use crate::ExecutableDocument;
use crate::Name;
use std::fmt;

mod fragment;
mod operation;
mod selection;
mod variable;

pub(crate) use self::selection::Walker;

/// A witness that a value was checked and found valid.
///
/// Execution entry points only accept validated schemas, documents, and
/// variable maps, so an invalid one cannot reach the engine by accident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Valid<T>(pub(crate) T);

impl<T> Valid<T> {
    /// Wrap a value without checking it.
    ///
    /// Execution over a value that would not actually pass validation can
    /// produce unexpected errors, but no unsafety.
    pub fn assume_valid(value: T) -> Self {
        Self(value)
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for Valid<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> AsRef<T> for Valid<T> {
    fn as_ref(&self) -> &T {
        &self.0
    }
}

impl<T: fmt::Display> fmt::Display for Valid<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A defect found in a document, with the lines it was found at.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{data}")]
pub struct ValidationError {
    pub span: Option<SourceSpan>,
    pub data: DiagnosticData,
}

/// Structured data about a validation defect.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum DiagnosticData {
    #[error("the operation `{name}` is defined multiple times")]
    OperationNameCollision { name: Name },

    #[error("an anonymous operation must be the only operation in a document")]
    AmbiguousAnonymousOperation,

    #[error("the fragment `{name}` is defined multiple times")]
    FragmentNameCollision { name: Name },

    #[error("cannot find fragment `{name}` in this document")]
    UndefinedFragment { name: Name },

    #[error("fragment `{name}` cannot reference itself (cycle: {cycle})")]
    FragmentCycle { name: Name, cycle: String },

    #[error("fragment condition on `{on}` is invalid: {on} is {describe}, not a composite type")]
    InvalidFragmentTarget { on: Name, describe: &'static str },

    #[error("cannot find type `{name}` in the schema")]
    UndefinedDefinition { name: Name },

    #[error("type `{type_name}` does not have a field `{field_name}`")]
    UndefinedField { type_name: Name, field_name: Name },

    #[error("field `{field_name}` of leaf type `{type_name}` cannot have a sub-selection")]
    LeafFieldSelection { field_name: Name, type_name: Name },

    #[error("field `{field_name}` of composite type `{type_name}` requires a sub-selection")]
    MissingSubselection { field_name: Name, type_name: Name },

    #[error("the argument `{name}` is not supported by `{coordinate}`")]
    UndefinedArgument { name: Name, coordinate: String },

    #[error("the required argument `{coordinate}` is not provided")]
    RequiredArgument { name: Name, coordinate: String },

    #[error("the argument `{name}` is provided multiple times")]
    UniqueArgument { name: Name },

    #[error("cannot find directive `@{name}` in the schema")]
    UndefinedDirective { name: Name },

    #[error("directive `@{name}` is not supported on {location}")]
    UnsupportedDirectiveLocation {
        name: Name,
        location: DirectiveLocation,
    },

    #[error("the variable `${name}` is declared multiple times")]
    UniqueVariable { name: Name },

    #[error("variable `${name}` must have an input type, `{ty}` is not one")]
    VariableInputType { name: Name, ty: crate::ast::Type },

    #[error("variable `${name}` is not defined by the operation")]
    UndefinedVariable { name: Name },

    #[error(
        "variable `${variable}: {variable_ty}` cannot be used \
         where `{expected_ty}` is expected"
    )]
    IncompatibleVariableUsage {
        variable: Name,
        variable_ty: crate::ast::Type,
        expected_ty: crate::ast::Type,
    },

    #[error(
        "operation cannot select both `{first}` and `{second}` \
         under the response key `{response_key}`"
    )]
    ConflictingFieldName {
        response_key: Name,
        first: Name,
        second: Name,
    },

    #[error(
        "fields selected under the response key `{response_key}` \
         have differing arguments and cannot be merged"
    )]
    ConflictingFieldArguments { response_key: Name },

    #[error("the schema does not support {operation_type} operations")]
    UnsupportedOperation { operation_type: OperationType },
}

/// All the defects found while validating a document, sorted by location.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiagnosticList {
    errors: Vec<ValidationError>,
}

impl DiagnosticList {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, span: Option<SourceSpan>, data: DiagnosticData) {
        self.errors.push(ValidationError { span, data })
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.errors.iter()
    }

    pub(crate) fn sort(&mut self) {
        self.errors
            .sort_by_key(|error| error.span.map(|span| span.start_line).unwrap_or(0))
    }

    /// The serializable form of these diagnostics.
    pub fn to_graphql_errors(&self) -> Vec<GraphQLError> {
        self.iter()
            .map(|error| GraphQLError::new(&error.data, error.span))
            .collect()
    }

    /// The fatal response for a document that failed validation:
    /// all the diagnostics, no `data`.
    pub fn to_response(&self) -> Response {
        Response {
            errors: self.to_graphql_errors(),
            data: ResponseData::Absent,
        }
    }
}

impl fmt::Display for DiagnosticList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for error in &self.errors {
            writeln!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for DiagnosticList {}

impl<'a> IntoIterator for &'a DiagnosticList {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Check an executable document against a schema and return everything
/// wrong with it. An empty list means execution may proceed.
pub fn validate(schema: &Valid<Schema>, document: &ExecutableDocument) -> DiagnosticList {
    let mut errors = DiagnosticList::new();

    for build_error in &document.build_errors {
        let data = match build_error {
            executable::BuildError::AmbiguousAnonymousOperation => {
                DiagnosticData::AmbiguousAnonymousOperation
            }
            executable::BuildError::OperationNameCollision { name } => {
                DiagnosticData::OperationNameCollision { name: name.clone() }
            }
            executable::BuildError::FragmentNameCollision { name } => {
                DiagnosticData::FragmentNameCollision { name: name.clone() }
            }
        };
        errors.push(None, data);
    }

    fragment::validate_fragment_definitions(&mut errors, schema, document);

    let mut reached_fragments = HashSet::default();
    operation::validate_operations(&mut errors, schema, document, &mut reached_fragments);

    // Fragments not spread by any operation still get their structure
    // checked, with no variable declarations in scope.
    let unreached: Vec<Name> = document
        .fragments
        .keys()
        .filter(|name| !reached_fragments.contains(*name))
        .cloned()
        .collect();
    for name in unreached {
        let fragment = &document.fragments[&name];
        let mut walker = Walker::new(schema, document, None, &mut reached_fragments);
        walker.selection_set(
            &mut errors,
            &fragment.type_condition,
            &fragment.selection_set,
        );
    }

    errors.sort();
    if !errors.is_empty() {
        tracing::debug!(count = errors.len(), "document validation failed");
    }
    errors
}
