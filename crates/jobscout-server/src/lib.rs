//! REST API server — search route, cache diagnostics, DTOs, and OpenAPI documentation.

pub mod dto;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;
