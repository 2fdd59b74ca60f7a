//! A schema-first GraphQL execution core.
//!
//! `graphql-runtime` provides the three tightly coupled subsystems at the
//! heart of a GraphQL server library:
//!
//! * a **schema model**: a self-referential type graph built through
//!   [`Schema::builder`], with scalars, enums, objects, interfaces, unions,
//!   input objects, wrappers, and directives, plus resolver functions
//!   attached to fields;
//! * an **execution engine**: a tree-walking interpreter that turns a parsed
//!   operation document into a response, honoring selection-set composition,
//!   fragment inlining, variable coercion, field resolution, and null
//!   bubbling;
//! * **introspection**: the reserved `__`-prefixed meta-types, resolved over
//!   the schema's own type graph through the same engine.
//!
//! The lexer/parser is external: callers hand the engine an [`ast::Document`]
//! (build one programmatically, or implement [`request::DocumentParser`]).
//!
//! ```rust
//! use graphql_runtime::name;
//! use graphql_runtime::schema::{FieldDefinition, ObjectType, Type};
//! use graphql_runtime::Schema;
//!
//! let schema = Schema::builder()
//!     .query(
//!         ObjectType::new(name!("RootQueryType")).field(
//!             FieldDefinition::new(name!("version"), Type::new_named(name!("String")))
//!                 .resolve(|_args, _info| "0.1".into()),
//!         ),
//!     )
//!     .build()
//!     .unwrap();
//! assert_eq!(schema.query_root.as_str(), "RootQueryType");
//! ```

#![warn(missing_debug_implementations)]

pub mod ast;
pub mod collections;
pub mod executable;
pub mod execution;
pub(crate) mod introspection;
mod node;
pub mod request;
pub mod response;
pub mod schema;
pub mod validation;
pub mod value;

pub use crate::ast::Name;
pub use crate::executable::ExecutableDocument;
pub use crate::execution::resolver::Context;
pub use crate::execution::resolver::Resolution;
pub use crate::node::Node;
pub use crate::node::SourceSpan;
pub use crate::request::execute;
pub use crate::request::execute_sync;
pub use crate::request::run;
pub use crate::request::Request;
pub use crate::response::Response;
pub use crate::schema::Schema;
pub use crate::validation::Valid;
pub use crate::value::Value;
