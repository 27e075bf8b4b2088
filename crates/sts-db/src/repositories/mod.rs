// All repository functions are generic over `E: Executor<'e, Database = Postgres>`
// so they accept both a `&PgPool` (direct query) and a `&mut Transaction` (atomic operations).

pub mod course;
pub mod deck;
pub mod flashcard;
pub mod group;
pub mod join_request;
pub mod member;
pub mod notification;
pub mod result;
pub mod stats;
pub mod user;
