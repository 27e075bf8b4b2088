mod routes;

pub use routes::{LeaderboardEntry, routes};
