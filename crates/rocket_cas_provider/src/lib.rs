#[macro_use]
extern crate rocket;

pub mod routes;
