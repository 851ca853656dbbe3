//! The conversion workflow: design URL in, bundle of generated screens out.
//!
//! Collaborators are passed in explicitly so the same workflow runs against
//! the real APIs, a file cache, or test doubles.

use crate::archive::{screen_filename, Archive};
use crate::cache::{CacheKey, CacheStore, CachedLayout};
use crate::figma::DocumentSource;
use crate::generate::{CodeGenerator, ScreenPayload};
use crate::layout::{LayoutBuilder, LayoutDocument};
use crate::source::FigmaFile;
use crate::{ConverterConfig, Error, Result};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

/// A layout together with the raw document it came from
#[derive(Debug, Clone)]
pub struct LoadedLayout {
    pub document: Arc<serde_json::Value>,
    pub layout: Arc<LayoutDocument>,
    pub cache: CacheStatus,
}

/// Outcome of a full conversion
#[derive(Debug, Clone)]
pub struct Conversion {
    pub archive: Archive,
    pub screens: usize,
    pub cache: CacheStatus,
}

pub struct Converter {
    source: Box<dyn DocumentSource>,
    cache: Box<dyn CacheStore>,
    generator: Box<dyn CodeGenerator>,
    config: ConverterConfig,
}

impl Converter {
    pub fn new(
        source: Box<dyn DocumentSource>,
        cache: Box<dyn CacheStore>,
        generator: Box<dyn CodeGenerator>,
        config: ConverterConfig,
    ) -> Self {
        Self {
            source,
            cache,
            generator,
            config,
        }
    }

    /// Wire up the Figma and Gemini clients from config. Uses a file cache
    /// when `cache_dir` is set, an in-memory one otherwise.
    #[cfg(feature = "remote")]
    pub fn from_config(config: ConverterConfig) -> Result<Self> {
        let source = Box::new(crate::figma::FigmaClient::new(&config)?);
        let generator = Box::new(crate::generate::GeminiGenerator::new(&config)?);
        let cache: Box<dyn CacheStore> = match &config.cache_dir {
            Some(dir) => Box::new(crate::cache::FileCache::open(dir)?),
            None => Box::new(crate::cache::MemoryCache::new()),
        };
        Ok(Self::new(source, cache, generator, config))
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Cached layout for `(design_url, framework)`, or fetch, build and store one.
    pub fn load_layout(&self, design_url: &str, framework: &str) -> Result<LoadedLayout> {
        let key = CacheKey::new(design_url, framework);

        match self.cache.get(&key) {
            Ok(Some(hit)) => {
                log::debug!("cache hit for {}", design_url);
                return Ok(LoadedLayout {
                    document: hit.document,
                    layout: hit.layout,
                    cache: CacheStatus::Hit,
                });
            }
            Ok(None) => log::debug!("cache miss for {}", design_url),
            Err(e) => log::warn!("cache lookup failed, fetching fresh: {}", e),
        }

        let document = self.source.fetch(design_url)?;
        let file = FigmaFile::from_value(&document)?;
        let layout = LayoutBuilder::with_policy(self.config.screen_policy).build(&file)?;

        let entry = CachedLayout::new(key, document, layout);
        let loaded = LoadedLayout {
            document: entry.document.clone(),
            layout: entry.layout.clone(),
            cache: CacheStatus::Miss,
        };
        if let Err(e) = self.cache.put(entry) {
            log::warn!("failed to store layout in cache: {}", e);
        }
        Ok(loaded)
    }

    /// Generate every screen of the design and bundle the results.
    ///
    /// Fails with `NoScreens` when the layout has nothing to generate, and
    /// on the first screen whose generation fails; no partial bundle is
    /// returned.
    pub fn convert(&self, design_url: &str, framework: &str) -> Result<Conversion> {
        let loaded = self.load_layout(design_url, framework)?;
        let archive = generate_all(self.generator.as_ref(), &loaded.layout, framework)?;
        Ok(Conversion {
            screens: archive.len(),
            archive,
            cache: loaded.cache,
        })
    }
}

/// Run `generator` over every screen of `layout`, in page then screen order
pub fn generate_all(
    generator: &dyn CodeGenerator,
    layout: &LayoutDocument,
    framework: &str,
) -> Result<Archive> {
    if !layout.has_screens() {
        return Err(Error::NoScreens);
    }

    let mut archive = Archive::new();
    for (page, screen) in layout.screens() {
        let name = screen.screen.as_deref().unwrap_or("");
        let filename = screen_filename(name);
        log::info!("generating {}", filename);

        let code = generator.generate(&ScreenPayload::new(page, screen), framework)?;
        if code.trim().is_empty() {
            return Err(Error::GenerationError(format!("empty output for {}", name)));
        }

        archive.add(filename.clone(), code);
        log::info!("saved {}", filename);
    }
    Ok(archive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Page, PixelBox, Screen};

    struct Echo;

    impl CodeGenerator for Echo {
        fn generate(&self, payload: &ScreenPayload<'_>, framework: &str) -> Result<String> {
            Ok(format!(
                "<html>{}/{}/{}</html>",
                payload.page.unwrap_or(""),
                payload.screen.unwrap_or(""),
                framework
            ))
        }
    }

    struct Blank;

    impl CodeGenerator for Blank {
        fn generate(&self, _: &ScreenPayload<'_>, _: &str) -> Result<String> {
            Ok("   ".into())
        }
    }

    fn screen(name: &str) -> Screen {
        Screen {
            screen: Some(name.into()),
            bounds: PixelBox::default(),
            tree: vec![],
        }
    }

    #[test]
    fn every_screen_is_generated_in_order() {
        let layout = LayoutDocument {
            pages: vec![
                Page {
                    page: Some("Marketing".into()),
                    screens: vec![screen("Home"), screen("About Us")],
                },
                Page {
                    page: Some("Empty".into()),
                    screens: vec![],
                },
                Page {
                    page: Some("App".into()),
                    screens: vec![screen("Dashboard")],
                },
            ],
        };
        let archive = generate_all(&Echo, &layout, "html").unwrap();
        assert_eq!(
            archive.filenames().collect::<Vec<_>>(),
            ["home.html", "about_us.html", "dashboard.html"]
        );
        assert_eq!(archive.get("about_us.html"), Some("<html>Marketing/About Us/html</html>"));
    }

    #[test]
    fn no_screens_is_an_error() {
        let layout = LayoutDocument {
            pages: vec![Page {
                page: Some("Empty".into()),
                screens: vec![],
            }],
        };
        assert!(matches!(generate_all(&Echo, &layout, "html"), Err(Error::NoScreens)));
        assert!(matches!(
            generate_all(&Echo, &LayoutDocument::default(), "html"),
            Err(Error::NoScreens)
        ));
    }

    #[test]
    fn blank_output_aborts() {
        let layout = LayoutDocument {
            pages: vec![Page {
                page: None,
                screens: vec![screen("Home")],
            }],
        };
        assert!(matches!(
            generate_all(&Blank, &layout, "html"),
            Err(Error::GenerationError(_))
        ));
    }
}
