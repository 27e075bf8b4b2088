mod model;
mod routes;

pub use model::UpdateProfileRequest;
pub use routes::routes;
