pub mod auth;
pub mod authz;
pub mod error;
pub mod idgen;
pub mod lifecycle;
pub mod meta;
pub mod policy;
pub mod secret;
pub mod store;
pub mod user;
pub mod validation;
