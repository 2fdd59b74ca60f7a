//! The contract between the engine and user-supplied field resolvers.

use crate::ast;
use crate::collections::IndexMap;
use crate::execution::engine::path_to_vec;
use crate::execution::engine::LinkedPath;
use crate::response::PathSegment;
use crate::schema::Schema;
use crate::schema::Type;
use crate::validation::Valid;
use crate::value::Value;
use crate::value::ValueMap;
use crate::Name;
use crate::Node;
use futures::future::BoxFuture;
use std::any::Any;
use std::fmt;
use std::future::Future;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// An error produced by a resolver, or by completing a resolver's value.
///
/// Field errors are non-fatal: they are captured with the field's path,
/// the field becomes null, and sibling fields keep executing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub message: String,
}

impl FieldError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for FieldError {}

impl From<String> for FieldError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for FieldError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// What a resolver hands back to the engine: a finished value or error, or
/// a future the engine awaits before completing the field.
pub enum Resolution {
    Done(Result<Value, FieldError>),
    Pending(BoxFuture<'static, Resolution>),
}

impl Resolution {
    /// A successfully resolved value.
    pub fn ok(value: impl Into<Value>) -> Self {
        Self::Done(Ok(value.into()))
    }

    /// A resolved null.
    pub fn null() -> Self {
        Self::Done(Ok(Value::Null))
    }

    /// A field error.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Done(Err(FieldError::new(message)))
    }

    /// A resolution that is not ready yet. The engine awaits the future,
    /// repeatedly if it resolves to another `Pending`.
    pub fn future(future: impl Future<Output = Resolution> + Send + 'static) -> Self {
        Self::Pending(Box::pin(future))
    }

    /// Await the chain of pending resolutions down to a final result.
    pub(crate) async fn finish(self) -> Result<Value, FieldError> {
        let mut resolution = self;
        loop {
            match resolution {
                Self::Done(result) => return result,
                Self::Pending(future) => resolution = future.await,
            }
        }
    }
}

impl From<Value> for Resolution {
    fn from(value: Value) -> Self {
        Self::Done(Ok(value))
    }
}

impl From<Result<Value, FieldError>> for Resolution {
    fn from(result: Result<Value, FieldError>) -> Self {
        Self::Done(result)
    }
}

macro_rules! resolution_from_value {
    ($($ty: ty),+ $(,)?) => {
        $(
            impl From<$ty> for Resolution {
                fn from(value: $ty) -> Self {
                    Self::ok(value)
                }
            }
        )+
    };
}

resolution_from_value!(bool, i32, i64, f64, &str, String);

impl fmt::Debug for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Done(result) => f.debug_tuple("Done").field(result).finish(),
            Self::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

/// Everything a resolver may inspect besides its coerced arguments.
pub struct ResolveInfo<'a> {
    pub(crate) field_name: &'a Name,
    pub(crate) field_type: &'a Type,
    pub(crate) parent_type: &'a Name,
    pub(crate) parent_value: &'a Value,
    pub(crate) root_value: &'a Value,
    pub(crate) schema: &'a Valid<Schema>,
    pub(crate) fragments: &'a IndexMap<Name, Node<ast::FragmentDefinition>>,
    pub(crate) variables: &'a Valid<ValueMap>,
    pub(crate) context: &'a Context,
    pub(crate) path: LinkedPath<'a>,
}

impl<'a> ResolveInfo<'a> {
    /// The name of the field being resolved.
    pub fn field_name(&self) -> &'a Name {
        self.field_name
    }

    /// The declared type of the field being resolved.
    pub fn field_type(&self) -> &'a Type {
        self.field_type
    }

    /// The name of the object type the field belongs to.
    pub fn parent_type(&self) -> &'a Name {
        self.parent_type
    }

    /// The runtime value the field is being resolved on.
    pub fn parent_value(&self) -> &'a Value {
        self.parent_value
    }

    /// The value the whole operation is being resolved on.
    pub fn root_value(&self) -> &'a Value {
        self.root_value
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    /// The fragments of the executing document.
    pub fn fragments(&self) -> &'a IndexMap<Name, Node<ast::FragmentDefinition>> {
        self.fragments
    }

    /// The operation's coerced variable values.
    pub fn variables(&self) -> &'a ValueMap {
        self.variables
    }

    pub fn context(&self) -> &'a Context {
        self.context
    }

    /// The response path of the field being resolved, root first.
    pub fn path(&self) -> Vec<PathSegment> {
        path_to_vec(self.path)
    }
}

impl fmt::Debug for ResolveInfo<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolveInfo")
            .field("field_name", &self.field_name)
            .field("field_type", &self.field_type)
            .field("parent_type", &self.parent_type)
            .field("path", &self.path())
            .finish_non_exhaustive()
    }
}

/// Opaque per-request state shared with every resolver, plus the request's
/// cancellation token. The engine never inspects the user value.
#[derive(Clone, Default)]
pub struct Context {
    value: Option<Arc<dyn Any + Send + Sync>>,
    cancellation: CancellationToken,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an application value retrievable with [`get`][Self::get].
    pub fn with_value<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            value: Some(Arc::new(value)),
            cancellation: CancellationToken::new(),
        }
    }

    /// Downcast the application value, if one of that type was attached.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.value.as_deref()?.downcast_ref()
    }

    /// Use the given token instead of a fresh one, so the caller keeps a
    /// handle to cancel the execution.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// The token resolvers should poll to notice cancellation of the
    /// whole execution.
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("value", &self.value.is_some())
            .field("cancellation", &self.cancellation)
            .finish()
    }
}

/// Cooperatively cancels an execution.
///
/// The engine checks the token between fields; in-flight resolvers can poll
/// it through [`Context::cancellation`]. Once observed, partial results are
/// discarded and the response carries a single cancellation error.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed)
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
