//! Integration tests
//!
//! `router_tests` drive the router in-process and never reach the database.
//! `repository_tests` need PostgreSQL at `DATABASE_URL` and `api_tests` need a
//! running server; both are ignored by default.

mod api_tests;
mod repository_tests;
mod router_tests;
