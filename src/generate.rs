//! Per-screen code generation.
//!
//! A generator receives exactly one screen of the layout (page name, screen
//! name, absolute box and normalized tree) plus a framework tag, and returns
//! one complete document. The Gemini-backed generator lives behind the
//! `remote` feature; anything implementing `CodeGenerator` can stand in.

use serde::Serialize;

use crate::layout::{NormalizedNode, PixelBox, Screen};
use crate::{Error, Result};

/// The single-screen input handed to a generator
#[derive(Debug, Clone, Serialize)]
pub struct ScreenPayload<'a> {
    pub page: Option<&'a str>,
    pub screen: Option<&'a str>,
    #[serde(rename = "box")]
    pub bounds: PixelBox,
    pub tree: &'a [NormalizedNode],
}

impl<'a> ScreenPayload<'a> {
    pub fn new(page: Option<&'a str>, screen: &'a Screen) -> Self {
        Self {
            page,
            screen: screen.screen.as_deref(),
            bounds: screen.bounds,
            tree: &screen.tree,
        }
    }
}

/// Turns one screen into a generated document
pub trait CodeGenerator: Send {
    fn generate(&self, payload: &ScreenPayload<'_>, framework: &str) -> Result<String>;
}

const PROMPT_RULES: &str = "\
Output only the raw document. No markdown, no code fences, no commentary.

You are rebuilding a user interface from a normalized design layout.
Each node carries a type, a name, a box (x/y relative to its parent, w/h in px),
an optional auto-layout block (dir, gap, padding, align, cross), a style block
and optional text.

Rules:
- Keep the node hierarchy and grouping.
- Auto-layout containers become flex containers; use absolute positioning
  only for decorative overlays.
- Keep exact colors, font sizes, weights, line heights and alignment from style.
- Do not invent fonts or colors.
- Use semantic tags (header, nav, main, section, footer, button).
- The result must be responsive across desktop, tablet and mobile.
- Return ONE complete HTML document.";

/// Assemble the generator prompt for one screen
pub fn build_prompt(payload: &ScreenPayload<'_>, framework: &str) -> Result<String> {
    let input = serde_json::to_string(payload)?;
    Ok(format!(
        "{rules}\n\nTarget framework: {framework}\n\nINPUT:\n{input}\n",
        rules = PROMPT_RULES,
        framework = framework,
        input = input
    ))
}

/// Strip whitespace and markdown code fences from a model reply
pub fn clean_output(raw: &str) -> String {
    raw.trim()
        .replace("```html", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Reject output that is empty or is not an HTML document
pub fn validate_output(code: &str) -> Result<()> {
    if code.trim().is_empty() {
        return Err(Error::GenerationError("Empty model response".into()));
    }
    if !code.to_lowercase().contains("<html") {
        return Err(Error::GenerationError("Model did not return an HTML document".into()));
    }
    Ok(())
}

#[cfg(feature = "remote")]
pub use gemini::GeminiGenerator;

#[cfg(feature = "remote")]
mod gemini {
    use super::*;
    use crate::retry::RetryPolicy;
    use crate::ConverterConfig;
    use reqwest::blocking::Client;
    use std::time::Duration;

    /// Generator backed by the Gemini `generateContent` endpoint
    pub struct GeminiGenerator {
        client: Client,
        api_key: String,
        api_base: String,
        model: String,
        retry: RetryPolicy,
    }

    impl GeminiGenerator {
        /// Build a generator from config. Fails when no API key is configured.
        pub fn new(config: &ConverterConfig) -> Result<Self> {
            let api_key = config
                .gemini_api_key
                .clone()
                .filter(|k| !k.is_empty())
                .ok_or_else(|| Error::ConfigError("GEMINI_API_KEY not set".into()))?;

            let client = Client::builder()
                .timeout(Duration::from_millis(config.timeout_ms))
                .build()
                .map_err(|e| Error::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

            Ok(Self {
                client,
                api_key,
                api_base: config.gemini_api_base.trim_end_matches('/').to_string(),
                model: config.model.clone(),
                retry: config.retry,
            })
        }

        fn call(&self, prompt: &str) -> Result<String> {
            let url = format!(
                "{}/v1beta/models/{}:generateContent",
                self.api_base, self.model
            );
            let body = serde_json::json!({
                "contents": [{ "parts": [{ "text": prompt }] }]
            });

            let res = self
                .client
                .post(&url)
                .query(&[("key", self.api_key.as_str())])
                .json(&body)
                .send()
                .map_err(|e| Error::NetworkError(format!("POST {} failed: {}", url, e)))?;

            let status = res.status();
            if !status.is_success() {
                return Err(Error::HttpStatus {
                    status: status.as_u16(),
                    body: res.text().unwrap_or_default(),
                });
            }

            let reply: serde_json::Value = res.json()?;
            let text = first_text(&reply)
                .ok_or_else(|| Error::GenerationError("Empty model response".into()))?;

            let code = clean_output(text);
            validate_output(&code)?;
            Ok(code)
        }
    }

    /// First non-empty text part across all candidates
    fn first_text(reply: &serde_json::Value) -> Option<&str> {
        reply
            .get("candidates")?
            .as_array()?
            .iter()
            .filter_map(|c| c.pointer("/content/parts")?.as_array())
            .flatten()
            .filter_map(|p| p.get("text")?.as_str())
            .find(|t| !t.trim().is_empty())
    }

    impl CodeGenerator for GeminiGenerator {
        fn generate(&self, payload: &ScreenPayload<'_>, framework: &str) -> Result<String> {
            let prompt = build_prompt(payload, framework)?;
            self.retry.run("code generation", || self.call(&prompt))
        }
    }

}
