//! Bundles generated screens into a single zip download

use std::io::{Cursor, Seek, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::Result;

/// File name for a generated screen: lower-cased, spaces to underscores, `.html`
pub fn screen_filename(screen_name: &str) -> String {
    format!("{}.html", screen_name.to_lowercase().replace(' ', "_"))
}

/// Ordered set of files to bundle
#[derive(Debug, Clone, Default)]
pub struct Archive {
    entries: Vec<(String, String)>,
}

impl Archive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file. A file with the same name is replaced in place.
    pub fn add(&mut self, filename: impl Into<String>, contents: impl Into<String>) {
        let filename = filename.into();
        let contents = contents.into();
        match self.entries.iter_mut().find(|(name, _)| *name == filename) {
            Some(existing) => {
                log::warn!("{} generated twice, keeping the later one", filename);
                existing.1 = contents;
            }
            None => self.entries.push((filename, contents)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn filenames(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn get(&self, filename: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == filename)
            .map(|(_, contents)| contents.as_str())
    }

    fn write_into<W: Write + Seek>(&self, sink: W) -> Result<W> {
        let mut zip = ZipWriter::new(sink);
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
        for (name, contents) in &self.entries {
            zip.start_file(name.as_str(), options)?;
            zip.write_all(contents.as_bytes())?;
        }
        Ok(zip.finish()?)
    }

    /// Zip bytes in memory
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.write_into(Cursor::new(Vec::new()))?.into_inner())
    }

    /// Write the zip to `path`, replacing any existing file
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path.as_ref())?;
        self.write_into(file)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn filenames_from_screen_names() {
        assert_eq!(screen_filename("Home"), "home.html");
        assert_eq!(screen_filename("Sign Up Page"), "sign_up_page.html");
        assert_eq!(screen_filename(""), ".html");
    }

    #[test]
    fn duplicate_names_keep_latest_in_first_position() {
        let mut archive = Archive::new();
        archive.add("a.html", "one");
        archive.add("b.html", "two");
        archive.add("a.html", "three");
        assert_eq!(archive.filenames().collect::<Vec<_>>(), ["a.html", "b.html"]);
        assert_eq!(archive.get("a.html"), Some("three"));
    }

    #[test]
    fn zip_contains_every_entry() {
        let mut archive = Archive::new();
        archive.add("home.html", "<html>home</html>");
        archive.add("about.html", "<html>about</html>");

        let bytes = archive.to_bytes().unwrap();
        let mut zip = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(zip.len(), 2);

        let mut body = String::new();
        zip.by_name("about.html").unwrap().read_to_string(&mut body).unwrap();
        assert_eq!(body, "<html>about</html>");
    }
}
