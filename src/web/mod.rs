//! HTML front end (form page)

pub mod handlers;
