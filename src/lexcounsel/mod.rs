pub mod agent;
pub mod case_store;
pub mod clients;
pub mod completion;
pub mod documents;
pub mod localization;
pub mod orchestrator;
pub mod schema;
pub mod trace;
pub mod user_response;
