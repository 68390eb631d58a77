#![doc = "The `stockroom` library crate."]
#![doc = ""]
#![doc = "Product and task records behind a REST API, a credentials sign-in flow, and the"]
#![doc = "access gate that decides per request whether a path is public, needs a session,"]
#![doc = "or needs the admin role. The binary (`main.rs`) wires these into an actix-web server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod resources;
pub mod response;
pub mod routes;
pub mod validation;
