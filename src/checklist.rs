//! Checklist scraping for pull request bodies.
//!
//! Version 1 of the checklist format, as written by the pull request template:
//!
//! ```text
//! ##Fix List Visability
//! ####Select on:
//! - first item
//! - second item
//! ```
//!
//! The section runs from its header to the next level-1 or level-2 header line
//! (or the end of the body). Everything after the item header, up to the end of
//! the section, is split on line breaks and on `-`; fragments are trimmed and
//! empty ones dropped. Header literals are matched exactly, including the
//! template's own spelling.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Checklist {
    Items(Vec<String>),
    /// The body has no checklist section header.
    SectionMissing,
    /// The section exists but has no item header.
    ItemsMissing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistFormat {
    version: u32,
    section: String,
    items: String,
}

impl ChecklistFormat {
    pub const V1_SECTION: &'static str = "##Fix List Visability";
    pub const V1_ITEMS: &'static str = "####Select on:";

    pub fn new(section: &str, items: &str) -> Self {
        Self {
            version: 1,
            section: section.to_string(),
            items: items.to_string(),
        }
    }

    pub fn v1() -> Self {
        Self::new(Self::V1_SECTION, Self::V1_ITEMS)
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn scrape(&self, body: &str) -> Checklist {
        let Some(start) = body.find(&self.section) else {
            return Checklist::SectionMissing;
        };
        let section = section_text(&body[start + self.section.len()..]);

        let Some(at) = section.find(&self.items) else {
            return Checklist::ItemsMissing;
        };
        let items = section[at + self.items.len()..]
            .split(|c| c == '\n' || c == '-')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect();

        Checklist::Items(items)
    }
}

impl Default for ChecklistFormat {
    fn default() -> Self {
        Self::v1()
    }
}

/// Text from just after the section header to the section's end.
fn section_text(rest: &str) -> &str {
    let mut end = 0;
    for (i, line) in rest.split_inclusive('\n').enumerate() {
        // The remainder of the header line itself belongs to the section.
        if i > 0 && is_top_level_header(line) {
            break;
        }
        end += line.len();
    }
    &rest[..end]
}

fn is_top_level_header(line: &str) -> bool {
    let line = line.trim_start();
    let level = line.chars().take_while(|c| *c == '#').count();
    match level {
        2 => true,
        1 => line[1..].starts_with(char::is_whitespace),
        _ => false,
    }
}
