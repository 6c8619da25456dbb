//! Service layer on top of `models`.
//! - Admin registry binding every entity kind to a list/get/delete adapter.
//! - Service errors with stable codes and form-ready messages.
//! - Runtime bootstrap (connect + migrate).

pub mod errors;
pub mod runtime;
pub mod admin;
#[cfg(test)]
pub mod test_support;
