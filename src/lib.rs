//! Figlay: design documents to web-oriented layout
//!
//! Figlay turns a design-tool document tree (absolute pixel geometry, paints,
//! typography, auto-layout metadata) into a compact layout schema that code
//! generators and template renderers can consume without re-deriving layout
//! semantics from raw geometry.
//!
//! # Features
//!
//! - **Layout pass** (always on): parent-relative integer boxes, auto-layout
//!   descriptors, visual style extraction, screen selection per page
//! - **Remote** (default): blocking clients for the Figma files API and the
//!   Gemini code generator
//! - **Workflow**: cache lookup, fetch, build, per-screen generation and a
//!   zip bundle, with every collaborator passed in explicitly
//!
//! # Example
//!
//! ```
//! use figlay::FigmaFile;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let file = FigmaFile::from_json(r#"{
//!     "document": {"children": [{
//!         "type": "CANVAS", "name": "Home",
//!         "children": [{
//!             "type": "FRAME", "name": "Screen1",
//!             "absoluteBoundingBox": {"x": 100, "y": 100, "width": 300, "height": 200}
//!         }]
//!     }]}
//! }"#)?;
//!
//! let layout = figlay::build(&file)?;
//! assert_eq!(layout.pages[0].screens[0].bounds.x, 100);
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

pub mod error;
pub use error::{Error, Result};

pub mod json;
pub mod source;
pub use source::{FigmaFile, NodeType, SourceNode};

// The normalization pass
pub mod layout;
pub use layout::{build, LayoutBuilder, LayoutDocument, NormalizedNode, Page, Screen};

pub mod archive;
pub mod cache;
pub mod figma;
pub mod generate;
pub mod pipeline;
pub mod retry;

// Async facade over the blocking workflow
pub mod async_api;
pub use async_api::AsyncConverter;

pub use pipeline::Converter;
pub use retry::RetryPolicy;

/// Which direct children of a page count as screens
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScreenPolicy {
    /// Only FRAME nodes
    #[default]
    FramesOnly,
    /// FRAME, INSTANCE and COMPONENT nodes
    FramesAndComponents,
}

/// Configuration for the conversion workflow
///
/// Defaults point at the public APIs and leave credentials unset; use
/// `ConverterConfig::from_env` to pick them up from the environment.
///
/// # Examples
///
/// ```
/// let cfg = figlay::ConverterConfig::default();
/// assert!(cfg.figma_token.is_none());
/// assert_eq!(cfg.retry.max_attempts, 5);
/// ```
#[derive(Debug, Clone)]
pub struct ConverterConfig {
    /// Figma personal access token
    pub figma_token: Option<String>,
    /// Base URL of the Figma REST API
    pub figma_api_base: String,
    /// Gemini API key
    pub gemini_api_key: Option<String>,
    /// Base URL of the Gemini API
    pub gemini_api_base: String,
    /// Model used for code generation
    pub model: String,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
    /// Backoff for transient remote failures
    pub retry: RetryPolicy,
    /// Screen selection policy for the layout pass
    pub screen_policy: ScreenPolicy,
    /// Directory for the file-backed cache; in-memory cache when unset
    pub cache_dir: Option<PathBuf>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            figma_token: None,
            figma_api_base: "https://api.figma.com".to_string(),
            gemini_api_key: None,
            gemini_api_base: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-2.5-flash-lite".to_string(),
            timeout_ms: 60000,
            retry: RetryPolicy::default(),
            screen_policy: ScreenPolicy::default(),
            cache_dir: None,
        }
    }
}

impl ConverterConfig {
    /// Defaults overridden by `FIGMA_TOKEN`, `FIGMA_API_BASE`,
    /// `GEMINI_API_KEY`, `GEMINI_API_BASE`, `GEMINI_MODEL` and
    /// `FIGLAY_CACHE_DIR`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        Self {
            figma_token: var("FIGMA_TOKEN"),
            figma_api_base: var("FIGMA_API_BASE").unwrap_or(defaults.figma_api_base),
            gemini_api_key: var("GEMINI_API_KEY"),
            gemini_api_base: var("GEMINI_API_BASE").unwrap_or(defaults.gemini_api_base),
            model: var("GEMINI_MODEL").unwrap_or(defaults.model),
            cache_dir: var("FIGLAY_CACHE_DIR").map(PathBuf::from),
            ..defaults
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ConverterConfig::default();
        assert_eq!(config.figma_api_base, "https://api.figma.com");
        assert_eq!(config.screen_policy, ScreenPolicy::FramesOnly);
        assert!(config.cache_dir.is_none());
    }

    #[test]
    fn env_overrides_defaults() {
        let env: HashMap<&str, &str> = [
            ("FIGMA_TOKEN", "figd_abc"),
            ("GEMINI_MODEL", "gemini-2.5-flash"),
            ("GEMINI_API_KEY", "  "),
            ("FIGLAY_CACHE_DIR", "/tmp/figlay"),
        ]
        .into_iter()
        .collect();

        let cfg = ConverterConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.figma_token.as_deref(), Some("figd_abc"));
        assert_eq!(cfg.model, "gemini-2.5-flash");
        assert!(cfg.gemini_api_key.is_none());
        assert_eq!(cfg.cache_dir, Some(PathBuf::from("/tmp/figlay")));
        assert_eq!(cfg.gemini_api_base, "https://generativelanguage.googleapis.com");
    }
}
