// Library for tests to access modules

pub mod analysis;
pub mod config;
pub mod models;
pub mod registry;
pub mod routes;
pub mod worker;
