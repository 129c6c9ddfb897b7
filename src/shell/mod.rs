// Composition root for the attendance service.
//
// Responsibilities
// - Read config from the environment.
// - Instantiate the in-memory infrastructure and seed its collaborators.
// - Wire them into the use case handlers.
// - Spawn the nightly reconciliation worker.

pub mod config;
pub mod graphql;
pub mod http;
pub mod seed;
pub mod state;
pub mod workers;
