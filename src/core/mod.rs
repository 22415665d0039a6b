// Core domain types shared by the store, the gate and the API layer

pub mod credential;
pub mod errors;
pub mod models;
pub mod resilience;
