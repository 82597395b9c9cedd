//! Structured view of a destination file.

use crate::marker::{Marker, begin_marker, classify, end_marker};

/// A named region owned by one ruleset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    /// The region owner (a ruleset name).
    pub name: String,
    /// Text between the delimiters, without the trailing newline.
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Region(Region),
}

/// A destination file as an ordered list of text segments and named regions.
///
/// # Example
///
/// ```
/// use rulesets_blocks::RegionDocument;
///
/// let mut doc = RegionDocument::parse("# Project notes\n");
/// doc.upsert("base", "Be concise.");
/// doc.upsert("react", "Prefer function components.");
/// assert_eq!(doc.region_names(), vec!["base", "react"]);
///
/// doc.remove("base");
/// let rendered = doc.render();
/// assert!(rendered.starts_with("# Project notes"));
/// assert!(!rendered.contains("Be concise."));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionDocument {
    segments: Vec<Segment>,
}

impl RegionDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse file content.
    ///
    /// An opening delimiter without a matching closing delimiter is kept as
    /// plain text, so a hand-damaged file never loses content.
    pub fn parse(content: &str) -> Self {
        let lines: Vec<&str> = content.lines().collect();
        let mut segments = Vec::new();
        let mut text = Vec::new();
        let mut i = 0;

        while i < lines.len() {
            let Some(Marker::Begin(name)) = classify(lines[i]) else {
                text.push(lines[i]);
                i += 1;
                continue;
            };

            let close = lines[i + 1..]
                .iter()
                .position(|line| classify(line) == Some(Marker::End(name)))
                .map(|offset| i + 1 + offset);

            match close {
                Some(end) => {
                    flush_text(&mut segments, &mut text);
                    segments.push(Segment::Region(Region {
                        name: name.to_string(),
                        content: lines[i + 1..end].join("\n"),
                    }));
                    i = end + 1;
                }
                None => {
                    tracing::warn!(region = name, "Unterminated region kept as plain text");
                    text.push(lines[i]);
                    i += 1;
                }
            }
        }
        flush_text(&mut segments, &mut text);

        Self { segments }
    }

    /// All regions in document order.
    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Region(region) => Some(region),
            Segment::Text(_) => None,
        })
    }

    /// Names of all regions in document order.
    pub fn region_names(&self) -> Vec<&str> {
        self.regions().map(|r| r.name.as_str()).collect()
    }

    /// Find the region owned by `name`.
    pub fn region(&self, name: &str) -> Option<&Region> {
        self.regions().find(|r| r.name == name)
    }

    pub fn has_region(&self, name: &str) -> bool {
        self.region(name).is_some()
    }

    /// Replace the content of `name`'s region in place, or append a new
    /// region at the end of the document.
    pub fn upsert(&mut self, name: &str, content: &str) {
        let content = content.trim_end_matches('\n').to_string();
        let existing = self.segments.iter_mut().find_map(|segment| match segment {
            Segment::Region(region) if region.name == name => Some(region),
            _ => None,
        });

        match existing {
            Some(region) => region.content = content,
            None => self.segments.push(Segment::Region(Region {
                name: name.to_string(),
                content,
            })),
        }
    }

    /// Remove `name`'s region. Returns whether a region was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.segments.len();
        self.segments
            .retain(|segment| !matches!(segment, Segment::Region(region) if region.name == name));
        let removed = self.segments.len() != before;
        if removed {
            self.merge_adjacent_text();
        }
        removed
    }

    /// True when nothing but whitespace would be rendered.
    pub fn is_blank(&self) -> bool {
        self.segments.iter().all(|segment| match segment {
            Segment::Text(text) => text.trim().is_empty(),
            Segment::Region(_) => false,
        })
    }

    /// Render the document.
    ///
    /// Segments are separated by one blank line and the output ends with a
    /// single newline; a blank document renders as the empty string.
    pub fn render(&self) -> String {
        let pieces: Vec<String> = self
            .segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Text(text) => {
                    let trimmed = text.trim_matches('\n');
                    (!trimmed.trim().is_empty()).then(|| trimmed.to_string())
                }
                Segment::Region(region) => Some(render_region(region)),
            })
            .collect();

        if pieces.is_empty() {
            String::new()
        } else {
            format!("{}\n", pieces.join("\n\n"))
        }
    }

    fn merge_adjacent_text(&mut self) {
        let mut merged: Vec<Segment> = Vec::with_capacity(self.segments.len());
        for segment in std::mem::take(&mut self.segments) {
            if let (Segment::Text(next), Some(Segment::Text(prev))) = (&segment, merged.last_mut()) {
                prev.push('\n');
                prev.push_str(next);
                continue;
            }
            merged.push(segment);
        }
        self.segments = merged;
    }
}

fn flush_text(segments: &mut Vec<Segment>, text: &mut Vec<&str>) {
    if !text.is_empty() {
        segments.push(Segment::Text(text.join("\n")));
        text.clear();
    }
}

fn render_region(region: &Region) -> String {
    if region.content.is_empty() {
        format!("{}\n{}", begin_marker(&region.name), end_marker(&region.name))
    } else {
        format!(
            "{}\n{}\n{}",
            begin_marker(&region.name),
            region.content,
            end_marker(&region.name)
        )
    }
}
