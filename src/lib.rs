//! fuzzylab - fuzzy-logic scenario analysis
//!
//! A Mamdani fuzzy inference engine with four built-in scenario profiles,
//! exposed as a library, an HTTP API and a command-line tool.
//!
//! # Architecture
//!
//! - [`engine`] - membership functions, linguistic variables, rules, profiles
//!   and per-request inference sessions
//! - [`domains`] - the comfort, air-quality, light-comfort and plant-care
//!   profiles, built once on first use and shared process-wide
//! - [`analysis`] - payload validation, edge nudging, banding and report
//!   assembly, plus the plant-type policy
//! - [`server`] - axum routes for the scenarios, health and profile listing
//! - [`config`] - TOML configuration with environment overrides
//! - [`error`] - error codes and the JSON error envelope
//!
//! # Example
//!
//! ```rust
//! use fuzzylab::{analyse, Domain, EdgePolicy};
//! use serde_json::json;
//!
//! let report = analyse(
//!     Domain::Comfort,
//!     &json!({ "temperature": 23, "humidity": 50 }),
//!     &EdgePolicy::default(),
//! )
//! .unwrap();
//! assert_eq!(report["comfort_category"], "Comfortable");
//! ```

pub mod analysis;
pub mod config;
pub mod domains;
pub mod engine;
pub mod error;
pub mod server;

// Re-export engine types
pub use engine::{
    ComputeError, DefinitionError, DomainProfile, InferenceSession, LinguisticVariable,
    ProfileBuilder, ProfileSummary, Rule,
};

// Re-export scenario profiles
pub use domains::{get_profile, profile_status, warm_up, Domain, ProfileStatus};

// Re-export analysis entry points
pub use analysis::{analyse, explain, Adjustments, EdgePolicy, PlantPolicy, PlantType};

// Re-export server types
pub use server::{create_router, run_server, AppState, SharedState};

// Re-export configuration types
pub use config::{AppConfig, ConfigError, CorsConfig, EngineConfig, GeneralConfig, LogLevel, ServerConfig};

// Re-export error types
pub use error::{ErrorCode, ErrorContext, ErrorResponse, FuzzyError, FuzzyResult};
