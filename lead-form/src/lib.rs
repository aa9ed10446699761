//! Client-side lead form: the declarative validation schema, the
//! enumerated option sets, and the controller that submits to the
//! intake service and branches on the result.

pub mod controller;
pub mod options;
pub mod schema;
