//! Job postings: CRUD plus the description embedding each posting carries.

pub mod handlers;
pub mod store;
