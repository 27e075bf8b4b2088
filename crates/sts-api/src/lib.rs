pub mod assessment;
pub mod auth;
pub mod config;
pub mod course;
pub mod deck;
pub mod error;
pub mod events;
pub mod flashcard;
pub mod group;
pub mod leaderboard;
pub mod membership;
pub mod metrics;
pub mod middleware;
pub mod notification;
pub mod policy;
pub mod relay;
pub mod router;
pub mod state;
pub mod tracing;
pub mod user;
pub mod v1;
pub mod validation;

pub use config::ApiConfig;
pub use state::{ApiState, IdentityConfig};
