//! API endpoint implementations.

mod credits;
mod function_groups;
mod functions;
mod sessions;

pub use credits::CreditsApi;
pub use function_groups::FunctionGroupsApi;
pub use functions::{FunctionsApi, ListFunctionsQuery};
pub use sessions::SessionsApi;
