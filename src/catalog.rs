//! Catalog Provider seam.
//!
//! The engine never acquires section data itself. Anything that can hand
//! over an immutable slice of [`Section`]s for the duration of one request
//! implements [`CatalogProvider`]. [`Catalog`] is the owned snapshot used
//! when records arrive as JSON (the scraper's output format).

use std::path::Path;

use crate::error::CatalogError;
use crate::models::Section;

/// Supplies section records for a generation request.
///
/// Implementations must not change the returned records while a request
/// is running.
pub trait CatalogProvider {
    /// All known sections, in catalog order.
    fn sections(&self) -> &[Section];
}

/// An owned, immutable catalog snapshot.
///
/// # Example
///
/// ```
/// use u_timetable::catalog::{Catalog, CatalogProvider};
///
/// let catalog = Catalog::from_json(r#"[
///     {"sectionId": "CS101 G1", "courseCode": "CS101", "courseName": "Programming",
///      "status": "open", "schedule": [{"day": "Mon", "time": "08:00 - 10:00"}]}
/// ]"#).unwrap();
/// assert_eq!(catalog.sections().len(), 1);
/// assert_eq!(catalog.course_name("CS101"), Some("Programming"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    sections: Vec<Section>,
}

impl Catalog {
    /// Creates a catalog from sections.
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    /// Parses a JSON array of scraped section records.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let sections: Vec<Section> = serde_json::from_str(json)?;
        log::debug!("decoded {} catalog sections", sections.len());
        Ok(Self::new(sections))
    }

    /// Reads and parses a JSON catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Adds a section.
    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// Distinct course codes in first-appearance order.
    pub fn course_codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = Vec::new();
        for s in &self.sections {
            if !codes.contains(&s.course_code.as_str()) {
                codes.push(&s.course_code);
            }
        }
        codes
    }

    /// Name of a course, from its first section that carries one.
    pub fn course_name(&self, code: &str) -> Option<&str> {
        course_name_in(&self.sections, code)
    }

    /// Sections that are not open, for a "notify me when it reopens" list.
    pub fn closed_sections(&self) -> Vec<&Section> {
        self.sections.iter().filter(|s| !s.is_open()).collect()
    }

    /// Sections of one course, in catalog order.
    pub fn sections_of<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a Section> + 'a {
        self.sections.iter().filter(move |s| s.course_code == code)
    }

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the catalog has no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl CatalogProvider for Catalog {
    fn sections(&self) -> &[Section] {
        &self.sections
    }
}

impl CatalogProvider for Vec<Section> {
    fn sections(&self) -> &[Section] {
        self
    }
}

impl CatalogProvider for [Section] {
    fn sections(&self) -> &[Section] {
        self
    }
}

/// Looks up a course name among sections.
pub(crate) fn course_name_in<'a>(sections: &'a [Section], code: &str) -> Option<&'a str> {
    sections
        .iter()
        .find(|s| s.course_code == code && !s.course_name.is_empty())
        .map(|s| s.course_name.as_str())
}
