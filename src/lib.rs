/// Typed client for the remote task API.
pub mod api;
/// Session lifecycle, credential stores, and the route guard.
pub mod auth;
/// Runtime settings resolved from flags and environment.
pub mod config;
/// Data types: Task, User, Credential, Session, request bodies.
pub mod models;
/// Per-screen view state shared by the browser and terminal clients.
pub mod screens;
/// Axum-based browser client.
pub mod web;
