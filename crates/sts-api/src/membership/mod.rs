mod model;
mod routes;

pub use model::JoinOutcome;
pub use routes::routes;
