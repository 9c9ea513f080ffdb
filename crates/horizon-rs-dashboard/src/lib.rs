//! Dashboard glue built on the resolved settings.
//!
//! This crate owns the request context handed to views, backend error
//! classification, form messages, and the helpers that turn backend resource
//! lists into form choices.

pub mod api;
pub mod error;
pub mod exceptions;
pub mod forms;
pub mod instances;
pub mod panels;
pub mod request;
pub mod volumes;

/// Backend models and service traits.
pub use api::{ApiError, ComputeApi, NetworkApi, VolumeApi};
/// Dashboard error type.
pub use error::DashboardError;
/// Backend error classification.
pub use exceptions::ErrorCategory;
/// Form message and field helpers.
pub use forms::{CharField, FormMessages, PasswordValidator};
/// Instance launch helpers.
pub use instances::{Choice, FlavorChoice, FlavorSort, InstanceSettings};
/// Panel registration and access checks.
pub use panels::{PanelRegistration, PanelRegistry};
/// Request context and user-facing messages.
pub use request::{Message, MessageLevel, Messages, Request, User};
