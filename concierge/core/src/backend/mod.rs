//! Response Provider Integration
//!
//! This module provides abstracted access to text-generation providers
//! through a common trait interface.
//!
//! # Available Providers
//!
//! - **Gemini**: generateContent REST API (default)
//! - **Scripted**: offline keyword responder
//!
//! # Usage
//!
//! ```ignore
//! use concierge_core::backend::{GeminiProvider, ProviderConfig, ProviderRequest, ResponseProvider};
//!
//! let provider = GeminiProvider::new(ProviderConfig::default());
//! let request = ProviderRequest::new("Be brief.", "Hello!");
//! let reply = provider.generate(&request).await?;
//! ```

mod gemini;
mod scripted;
mod traits;

pub use gemini::GeminiProvider;
pub use scripted::ScriptedProvider;
pub use traits::{
    ProviderConfig, ProviderError, ProviderRequest, ResponseProvider, DEFAULT_BASE_URL,
    DEFAULT_MODEL,
};
