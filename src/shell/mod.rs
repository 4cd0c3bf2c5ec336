// Composition root.
//
// - Read config from the environment.
// - Build the application context for the configured backend.
// - Serve the HTML dashboard and the GraphQL API from one router.

pub mod config;
pub mod context;
pub mod graphql;
pub mod http;
pub mod state;
