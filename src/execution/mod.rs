//! Executing a validated operation against a schema.

pub(crate) mod engine;
pub mod input_coercion;
pub mod resolver;
pub(crate) mod result_coercion;

pub use self::input_coercion::coerce_variable_values;
pub use self::resolver::CancellationToken;
pub use self::resolver::Context;
pub use self::resolver::FieldError;
pub use self::resolver::Resolution;
pub use self::resolver::ResolveInfo;
