//! Entry points for handling a whole GraphQL request: parse, validate,
//! coerce, execute.

use crate::ast;
use crate::collections::HashMap;
use crate::collections::IndexSet;
use crate::execution::coerce_variable_values;
use crate::execution::engine;
use crate::execution::engine::ExecutionContext;
use crate::execution::engine::ObjectSource;
use crate::execution::resolver::Context;
use crate::response::GraphQLError;
use crate::response::GraphQLLocation;
use crate::response::JsonMap;
use crate::response::RequestError;
use crate::response::Response;
use crate::response::ResponseData;
use crate::schema::Schema;
use crate::validation::Valid;
use crate::value::Value;
use crate::ExecutableDocument;
use crate::Name;
use std::sync::OnceLock;

/// The contract of the external document parser.
///
/// This crate does not include a lexer or parser; anything that can turn a
/// source string into an [`ast::Document`] plugs in here and makes
/// [`run`] available.
pub trait DocumentParser {
    fn parse(&self, source: &str) -> Result<ast::Document, ParseError>;
}

/// A rejection from the external parser.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub location: Option<GraphQLLocation>,
}

/// Per-request inputs: which operation to run, raw variables, the root
/// value, and the opaque context handed to resolvers.
#[derive(Debug, Default)]
pub struct Request {
    operation_name: Option<String>,
    variables: JsonMap,
    root_value: Value,
    context: Context,
}

impl Request {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the operation to execute by name. Required when the document
    /// contains more than one operation.
    pub fn operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    /// The raw variable values of the request, as transport JSON.
    pub fn variables(mut self, variables: JsonMap) -> Self {
        self.variables = variables;
        self
    }

    /// The value the root operation type resolves on.
    pub fn root_value(mut self, root_value: impl Into<Value>) -> Self {
        self.root_value = root_value.into();
        self
    }

    /// The opaque per-request state shared with every resolver.
    pub fn context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }
}

/// Parse, validate, and execute a request in one call.
///
/// Any parse or validation failure becomes a fatal response with `errors`
/// and no `data`.
pub fn run(
    schema: &Valid<Schema>,
    source: &str,
    parser: &dyn DocumentParser,
    request: Request,
) -> Response {
    let document = match parser.parse(source) {
        Ok(document) => document,
        Err(error) => {
            return Response {
                errors: vec![GraphQLError {
                    message: error.message,
                    locations: error.location.into_iter().collect(),
                    path: Vec::new(),
                }],
                data: ResponseData::Absent,
            }
        }
    };
    let document = match ExecutableDocument::from_ast(&document).validate(schema) {
        Ok(document) => document,
        Err(errors) => return errors.to_response(),
    };
    execute_sync(schema, &document, request)
}

/// Execute a validated document, blocking the current thread on any
/// pending resolutions.
pub fn execute_sync(
    schema: &Valid<Schema>,
    document: &Valid<ExecutableDocument>,
    request: Request,
) -> Response {
    futures::executor::block_on(execute(schema, document, request))
}

/// Execute a validated document and produce the response.
///
/// Operation selection or variable coercion failures are fatal: the
/// response carries only `errors`. Field errors during execution coexist
/// with the (possibly partial) `data` tree.
pub async fn execute(
    schema: &Valid<Schema>,
    document: &Valid<ExecutableDocument>,
    request: Request,
) -> Response {
    match execute_request(schema, document, request).await {
        Ok(response) => response,
        Err(request_error) => request_error.into(),
    }
}

async fn execute_request(
    schema: &Valid<Schema>,
    document: &Valid<ExecutableDocument>,
    request: Request,
) -> Result<Response, RequestError> {
    let operation = document
        .get_operation(request.operation_name.as_deref())
        .map_err(RequestError::new)?;
    tracing::debug!(
        operation_type = %operation.operation_type,
        operation = operation.name.as_ref().map(|name| name.as_str()),
        "executing operation"
    );
    let variables = coerce_variable_values(schema, operation, &request.variables)?;

    let root_type_name = schema.root_operation(operation.operation_type).ok_or_else(|| {
        RequestError::new(format_args!(
            "schema does not support {} operations",
            operation.operation_type
        ))
        .with_location(operation.span())
    })?;
    let Some(root_type) = schema.get_object(root_type_name) else {
        // The builder verified the roots; reachable only through
        // `Valid::assume_valid` on a hand-made schema
        return Err(RequestError::new(format_args!(
            "root operation type {root_type_name} is not an object type"
        )));
    };

    let implementers: OnceLock<HashMap<Name, IndexSet<Name>>> = OnceLock::new();
    let mut errors = Vec::new();
    let mut ctx = ExecutionContext {
        schema,
        document,
        variables: &variables,
        errors: &mut errors,
        root_value: &request.root_value,
        context: &request.context,
        implementers: &implementers,
        cancelled: false,
    };
    let result = engine::execute_selection_set(
        &mut ctx,
        None,
        engine::mode_for(operation.operation_type),
        root_type,
        ObjectSource::Value(&request.root_value),
        &operation.selection_set,
    )
    .await;

    if ctx.cancelled {
        // Discard whatever completed before cancellation was observed
        tracing::warn!("execution cancelled");
        return Err(RequestError::new("execution cancelled"));
    }
    let data = match result {
        Ok(map) => ResponseData::Object(map),
        // A field error propagated all the way up
        Err(engine::PropagateNull) => ResponseData::Null,
    };
    Ok(Response { errors, data })
}
