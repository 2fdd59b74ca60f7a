//! An executable document indexed for execution: operations addressable by
//! name and fragments addressable from spreads.

use crate::ast;
use crate::collections::IndexMap;
use crate::schema::Schema;
use crate::validation;
use crate::validation::DiagnosticList;
use crate::validation::Valid;
use crate::Name;
use crate::Node;

/// Operations and fragments of an [`ast::Document`], indexed by name.
///
/// Building the index records structural defects (duplicate names, multiple
/// anonymous operations) as [`BuildError`]s; they are reported when the
/// document is [validated][Self::validate].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutableDocument {
    pub build_errors: Vec<BuildError>,
    pub anonymous_operation: Option<Node<ast::OperationDefinition>>,
    pub named_operations: IndexMap<Name, Node<ast::OperationDefinition>>,
    pub fragments: IndexMap<Name, Node<ast::FragmentDefinition>>,
}

/// AST definition that could not be indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// Found multiple operations without a name
    AmbiguousAnonymousOperation,

    /// Found multiple operations with the same name
    OperationNameCollision { name: Name },

    /// Found multiple fragments with the same name
    FragmentNameCollision { name: Name },
}

/// A request error returned by [`ExecutableDocument::get_operation`]
///
/// If the `name_request` argument was `Some`, the document does not contain
/// an operation with the requested name.
///
/// If it was `None`, the request is ambiguous because the document contains
/// multiple operations (or zero, though the document would be invalid in
/// that case).
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct GetOperationError();

impl ExecutableDocument {
    /// Index the operations and fragments of a parsed document.
    pub fn from_ast(document: &ast::Document) -> Self {
        let mut indexed = Self::default();
        for definition in &document.definitions {
            match definition {
                ast::Definition::OperationDefinition(operation) => match &operation.name {
                    None => {
                        if indexed.anonymous_operation.is_none() {
                            indexed.anonymous_operation = Some(operation.clone());
                        } else {
                            indexed
                                .build_errors
                                .push(BuildError::AmbiguousAnonymousOperation);
                        }
                    }
                    Some(name) => {
                        if indexed.named_operations.contains_key(name) {
                            indexed.build_errors.push(BuildError::OperationNameCollision {
                                name: name.clone(),
                            });
                        } else {
                            indexed
                                .named_operations
                                .insert(name.clone(), operation.clone());
                        }
                    }
                },
                ast::Definition::FragmentDefinition(fragment) => {
                    if indexed.fragments.contains_key(&fragment.name) {
                        indexed.build_errors.push(BuildError::FragmentNameCollision {
                            name: fragment.name.clone(),
                        });
                    } else {
                        indexed
                            .fragments
                            .insert(fragment.name.clone(), fragment.clone());
                    }
                }
            }
        }
        indexed
    }

    /// Check this document against a schema.
    ///
    /// On success the returned witness is accepted by the execution entry
    /// points; on failure the list of everything wrong with the document is
    /// returned and execution must not start.
    pub fn validate(self, schema: &Valid<Schema>) -> Result<Valid<Self>, DiagnosticList> {
        let errors = validation::validate(schema, &self);
        if errors.is_empty() {
            Ok(Valid::assume_valid(self))
        } else {
            Err(errors)
        }
    }

    /// Returns an iterator of operations, both anonymous and named
    pub fn all_operations(&self) -> impl Iterator<Item = &Node<ast::OperationDefinition>> {
        self.anonymous_operation
            .iter()
            .chain(self.named_operations.values())
    }

    /// Return the relevant operation for a request, or a request error.
    ///
    /// A GraphQL request comes with a document (which may contain multiple
    /// operations) and an optional operation name. When a name is given the
    /// request executes the operation with that name, which is expected to
    /// exist. When it is not given, the document is expected to contain a
    /// single operation to avoid ambiguity.
    pub fn get_operation(
        &self,
        name_request: Option<&str>,
    ) -> Result<&Node<ast::OperationDefinition>, GetOperationError> {
        if let Some(name) = name_request {
            // Honor the request
            self.named_operations.get(name)
        } else if let Some(operation) = &self.anonymous_operation {
            // No name request: the anonymous operation must be the only one
            self.named_operations.is_empty().then_some(operation)
        } else {
            // Return a named operation if it is the only one
            self.named_operations
                .values()
                .next()
                .filter(|_| self.named_operations.len() == 1)
        }
        .ok_or(GetOperationError())
    }
}

impl std::fmt::Display for GetOperationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("no operation matched the request: provide the name of one of the document's operations")
    }
}

impl std::error::Error for GetOperationError {}
