pub mod factories;
pub mod introspect;
pub mod layout;
pub mod validate;
