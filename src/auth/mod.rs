// Authentication: the authority, its client and the gate in front of the store

pub mod audit_logger;
pub mod auth_middleware;
pub mod authority;
pub mod verifier;
