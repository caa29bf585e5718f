// Data access layer: free functions over `PgPool`, one module per entity.
pub mod follows;
pub mod messages;
pub mod posts;
pub mod users;
