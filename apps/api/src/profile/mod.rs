//! Master profile: canonical record shape, identity rules, and the
//! append-only merge that grows a user's master from every import.

pub mod handlers;
pub mod identity;
pub mod ids;
pub mod ingest;
pub mod master;
pub mod merge;
pub mod normalize;
pub mod prompts;
pub mod reconcile;
pub mod session;
