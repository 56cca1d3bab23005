// Composition root for the cards bounded context.
//
// Responsibilities
// - Read config from the environment.
// - Instantiate concrete infrastructure implementations.
// - Wire them into the command handler and the read side.
// - Expose the HTTP router and the GraphQL schema.

pub mod config;
pub mod graphql;
pub mod http;
pub mod state;
