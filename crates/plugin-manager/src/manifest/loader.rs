//! Manifest Loader
//!
//! Reads one XML manifest and turns its `<class>` entries into records.
//! Any problem rejects the whole file; callers decide whether to go on.
//!
//! ```xml
//! <library path="/usr/lib/libhandlers.so">
//!   <class name="ns::Handler<int>" base_class_name="ns::Base" singleton="true">
//!     <description>Handles ints</description>
//!     <associated_classes>
//!       <class name="ns::Helper"/>
//!     </associated_classes>
//!   </class>
//! </library>
//! ```

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs;
use std::path::Path;
use tracing::debug;

use super::types::ClassRecord;
use crate::common::{ManifestError, ManifestResult};

/// Largest manifest accepted (1MB)
const MAX_MANIFEST_SIZE: u64 = 1_000_000;

/// Parse a manifest file into class records
pub fn parse_file(path: &Path) -> ManifestResult<Vec<ClassRecord>> {
    let io_err = |source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    };

    let metadata = fs::metadata(path).map_err(io_err)?;
    if metadata.len() > MAX_MANIFEST_SIZE {
        return Err(ManifestError::TooLarge(metadata.len()));
    }

    let content = fs::read_to_string(path).map_err(io_err)?;
    let records = parse_str(&content, path)?;

    debug!("Parsed {} classes from {:?}", records.len(), path);
    Ok(records)
}

/// Parse manifest content, stamping every record with `source`
pub fn parse_str(content: &str, source: &Path) -> ManifestResult<Vec<ClassRecord>> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut state = ParseState::default();

    loop {
        match reader.read_event()? {
            Event::Start(e) => state.open(&e, false, source)?,
            Event::Empty(e) => state.open(&e, true, source)?,
            Event::End(e) => state.close(e.name().as_ref())?,
            Event::Text(t) => {
                if let Some(description) = state.description.as_mut() {
                    description.push_str(&t.unescape()?);
                }
            }
            Event::CData(c) => {
                if let Some(description) = state.description.as_mut() {
                    description.push_str(&String::from_utf8_lossy(&c));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    state.finish()
}

#[derive(Default)]
struct ParseState {
    /// Path of the `<library>` currently open
    library: Option<String>,
    libraries_seen: usize,
    classes_in_library: usize,
    /// Class currently open
    class: Option<ClassRecord>,
    /// Text collected inside an open `<description>`
    description: Option<String>,
    in_associated: bool,
    records: Vec<ClassRecord>,
}

impl ParseState {
    fn open(&mut self, e: &BytesStart<'_>, empty: bool, source: &Path) -> ManifestResult<()> {
        match e.name().as_ref() {
            b"library" => {
                if self.library.is_some() {
                    return Err(ManifestError::UnexpectedElement("library".to_string()));
                }
                let path = required_attribute(e, "library", "path")?;
                self.libraries_seen += 1;
                self.classes_in_library = 0;
                if empty {
                    return Err(ManifestError::NoClasses(path));
                }
                self.library = Some(path);
            }
            b"class" if self.in_associated => {
                let name = required_attribute(e, "class", "name")?;
                if let Some(class) = self.class.as_mut() {
                    class.associated_classes.push(name);
                }
            }
            b"class" => {
                if self.class.is_some() {
                    return Err(ManifestError::UnexpectedElement("class".to_string()));
                }
                let Some(library) = self.library.as_ref() else {
                    return Err(ManifestError::UnexpectedElement("class".to_string()));
                };

                let name = required_attribute(e, "class", "name")?;
                let base_class = required_attribute(e, "class", "base_class_name")?;
                let is_singleton = match attribute(e, b"singleton")? {
                    Some(value) => parse_bool(&value)?,
                    None => false,
                };

                self.class = Some(
                    ClassRecord::new(name, base_class, library.clone())
                        .with_singleton(is_singleton)
                        .with_source(source),
                );
                if empty {
                    self.finish_class()?;
                }
            }
            b"description" if self.class.is_some() => {
                if empty {
                    self.set_description(String::new());
                } else {
                    self.description = Some(String::new());
                }
            }
            b"associated_classes" if self.class.is_some() => {
                self.in_associated = !empty;
            }
            b"description" | b"associated_classes" => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                return Err(ManifestError::UnexpectedElement(name));
            }
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, name: &[u8]) -> ManifestResult<()> {
        match name {
            b"class" if self.in_associated => {}
            b"class" => self.finish_class()?,
            b"description" => {
                if let Some(text) = self.description.take() {
                    self.set_description(text);
                }
            }
            b"associated_classes" => self.in_associated = false,
            b"library" => {
                if let Some(library) = self.library.take() {
                    if self.classes_in_library == 0 {
                        return Err(ManifestError::NoClasses(library));
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn set_description(&mut self, text: String) {
        if let Some(class) = self.class.as_mut() {
            class.description = Some(text);
        }
    }

    fn finish_class(&mut self) -> ManifestResult<()> {
        if let Some(class) = self.class.take() {
            class.validate()?;
            self.classes_in_library += 1;
            self.records.push(class);
        }
        Ok(())
    }

    fn finish(self) -> ManifestResult<Vec<ClassRecord>> {
        if self.library.is_some() || self.class.is_some() {
            return Err(ManifestError::UnexpectedEof);
        }
        if self.libraries_seen == 0 {
            return Err(ManifestError::NoLibrary);
        }
        Ok(self.records)
    }
}

fn attribute(e: &BytesStart<'_>, key: &[u8]) -> ManifestResult<Option<String>> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn required_attribute(
    e: &BytesStart<'_>,
    element: &'static str,
    key: &'static str,
) -> ManifestResult<String> {
    match attribute(e, key.as_bytes())? {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ManifestError::MissingAttribute {
            element,
            attribute: key,
        }),
    }
}

fn parse_bool(value: &str) -> ManifestResult<bool> {
    match value.trim() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(ManifestError::InvalidSingleton(other.to_string())),
    }
}
