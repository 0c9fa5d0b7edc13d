//! # agentmark-backends
//!
//! [`BackendClient`](agentmark_core::BackendClient) implementations.
//!
//! ## Backends
//!
//! - **OpenAI-compatible**: any `/v1/chat/completions` endpoint with native
//!   tool calling (OpenAI, vLLM, LiteLLM proxies, ...)
//! - **Scripted**: deterministic canned replies for tests and offline runs
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agentmark_backends::OpenAiBackend;
//!
//! let backend = OpenAiBackend::from_env()?;
//! let agent = ToolLoopAgent::builder()
//!     .backend(Arc::new(backend))
//!     .build()?;
//! ```

pub mod openai;
pub mod scripted;

pub use openai::{OpenAiBackend, OpenAiConfig};
pub use scripted::ScriptedBackend;
