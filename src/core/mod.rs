pub mod app;
pub mod config;
pub mod onboarding;
pub mod presentation;
pub mod resource;
pub mod router;
pub mod session;
pub mod token_store;
