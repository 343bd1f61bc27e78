//! Service layer module
//!
//! Contains input validation, the classification contract, and the session that owns the current outcome

pub mod contract;
pub mod session;
pub mod validator;

pub use session::{ClassificationSession, SubmitError};
pub use validator::{validate_json_input, ValidatedInput, ValidationError};
