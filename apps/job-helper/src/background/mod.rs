// Background process: owns the last known state, runs menu activations,
// answers popup queries and broadcasts every transition.

pub mod broadcast;
pub mod handlers;
pub mod menu;
pub mod messages;
pub mod store;
