//! Containment listings
//!
//! A folder requested with a trailing `/` is described by one statement
//! relating the folder to each child through `ldp:contains`. Subjects and
//! objects are written as relative IRIs and resolved against the request IRI
//! by whatever reads the document.

use super::fs::DirEntry;
use super::resolver::strip_extension;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::fmt::Write;

/// `ldp:contains`
pub const LDP_CONTAINS: &str = "http://www.w3.org/ns/ldp#contains";

/// Content type of a synthesized listing
pub const LISTING_CONTENT_TYPE: &str = "text/turtle";

/// Characters escaped in a child's relative IRI. `:` is included so a name
/// can never be read as a scheme.
const IRI_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b':')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// One child of a container
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ContainedMember {
    name: String,
    is_container: bool,
}

impl ContainedMember {
    /// Child as listed: folders keep their name, files lose their final extension
    pub fn from_entry(entry: &DirEntry) -> Self {
        let name = if entry.is_dir {
            entry.name.clone()
        } else {
            strip_extension(&entry.name).to_string()
        };
        Self {
            name,
            is_container: entry.is_dir,
        }
    }

    /// Listing name (`x` or `y/`)
    pub fn listing_name(&self) -> String {
        if self.is_container {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }

    /// Relative IRI reference for this child
    pub fn relative_iri(&self) -> String {
        let mut iri = utf8_percent_encode(&self.name, IRI_ESCAPE).to_string();
        if self.is_container {
            iri.push('/');
        }
        iri
    }
}

/// The children of one folder
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerListing {
    members: Vec<ContainedMember>,
}

impl ContainerListing {
    /// Listing from directory entries, ordered by name, one member per name
    pub fn from_entries(entries: &[DirEntry]) -> Self {
        let mut members: Vec<ContainedMember> = entries.iter().map(ContainedMember::from_entry).collect();
        members.sort();
        members.dedup();
        Self { members }
    }

    pub fn members(&self) -> &[ContainedMember] {
        &self.members
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Serialize as Turtle. An empty folder yields an empty document.
    pub fn to_turtle(&self) -> String {
        let mut turtle = String::new();
        if self.members.is_empty() {
            return turtle;
        }

        let _ = write!(turtle, "<> <{}> ", LDP_CONTAINS);
        for (i, member) in self.members.iter().enumerate() {
            if i > 0 {
                turtle.push_str(", ");
            }
            let _ = write!(turtle, "<{}>", member.relative_iri());
        }
        turtle.push_str(" .\n");
        turtle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_and_folder() {
        let listing = ContainerListing::from_entries(&[DirEntry::file("x.ttl"), DirEntry::dir("y")]);
        assert_eq!(
            listing.to_turtle(),
            "<> <http://www.w3.org/ns/ldp#contains> <x>, <y/> .\n"
        );
    }

    #[test]
    fn test_listing_names() {
        let listing = ContainerListing::from_entries(&[
            DirEntry::file("README"),
            DirEntry::dir("nested"),
            DirEntry::file("archive.tar.gz"),
        ]);
        let names: Vec<String> = listing.members().iter().map(|m| m.listing_name()).collect();
        assert_eq!(names, vec!["README", "archive.tar", "nested/"]);
    }

    #[test]
    fn test_empty_folder_is_empty_document() {
        let listing = ContainerListing::from_entries(&[]);
        assert!(listing.is_empty());
        assert_eq!(listing.to_turtle(), "");
    }

    #[test]
    fn test_shared_stem_listed_once() {
        let listing = ContainerListing::from_entries(&[DirEntry::file("jesse.ttl"), DirEntry::file("jesse.nt")]);
        assert_eq!(listing.members().len(), 1);
    }

    #[test]
    fn test_reserved_characters_escaped() {
        let listing = ContainerListing::from_entries(&[
            DirEntry::file("with space.ttl"),
            DirEntry::file("a#b.ttl"),
            DirEntry::file("x:y.ttl"),
            DirEntry::dir("100%"),
            DirEntry::file("<tag>.nt"),
        ]);
        let iris: Vec<String> = listing.members().iter().map(|m| m.relative_iri()).collect();
        assert_eq!(iris, vec!["100%25/", "%3Ctag%3E", "a%23b", "with%20space", "x%3Ay"]);
    }

    #[test]
    fn test_non_ascii_names() {
        let member = ContainedMember::from_entry(&DirEntry::file("café.ttl"));
        assert_eq!(member.relative_iri(), "caf%C3%A9");
    }
}
