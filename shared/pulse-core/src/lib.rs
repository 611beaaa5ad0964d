//! Pulse Core - Shared service infrastructure
//!
//! This crate provides:
//! - Standard service trait all microservices implement
//! - The error taxonomy shared by the analysis pipeline and its front ends
//! - Configuration management

pub mod config;
pub mod error;
pub mod service;


pub use config::ServiceConfig;
pub use error::{PulseError, Result};
pub use service::{
    DependencyStatus, HealthStatus, MicroserviceRuntime, PulseService, ReadinessStatus,
};
