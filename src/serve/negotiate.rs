//! Content negotiation
//!
//! Picks a destination content type from the Accept header. N3 sources get
//! special treatment: when the client accepts `text/n3` at all, the file is
//! served as N3 even if another type is preferred.

use mime::Mime;
use tracing::debug;

/// Content type of Notation3 documents
pub const N3: &str = "text/n3";

/// Chooses among candidate media types for an Accept header
pub trait MediaTypeNegotiator: Send + Sync {
    /// Best candidate for `accept`, or `None` when every candidate is excluded.
    /// Ties are broken by candidate order.
    fn preferred<'a>(&self, accept: &str, candidates: &'a [String]) -> Option<&'a str>;

    /// Whether `accept` admits `media_type` with a non-zero quality
    fn accepts(&self, accept: &str, media_type: &str) -> bool;
}

/// Result of destination negotiation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Negotiation {
    Accepted(String),
    Rejected,
}

/// Pick the destination for a source of `source_content_type`
pub fn negotiate_destination(
    negotiator: &dyn MediaTypeNegotiator,
    source_content_type: &str,
    accept: &str,
    allowed: &[String],
) -> Negotiation {
    if source_content_type == N3 && negotiator.accepts(accept, N3) {
        return Negotiation::Accepted(N3.to_string());
    }

    match negotiator.preferred(accept, allowed) {
        Some(destination) => Negotiation::Accepted(destination.to_string()),
        None => {
            debug!("No destination for {} satisfies Accept: {}", source_content_type, accept);
            Negotiation::Rejected
        }
    }
}

/// One parsed media range
#[derive(Debug, Clone)]
struct MediaRange {
    mime: Mime,
    quality: f32,
}

impl MediaRange {
    /// 2 for an exact match, 1 for `type/*`, 0 for `*/*`
    fn specificity(&self, candidate: &Mime) -> Option<u8> {
        let any_type = self.mime.type_() == mime::STAR;
        let any_subtype = self.mime.subtype() == mime::STAR;

        if any_type && any_subtype {
            Some(0)
        } else if self.mime.type_() != candidate.type_() {
            None
        } else if any_subtype {
            Some(1)
        } else if self.mime.essence_str() == candidate.essence_str() {
            Some(2)
        } else {
            None
        }
    }
}

/// RFC 7231 style Accept parsing on top of the `mime` crate.
///
/// Parameters other than `q` are ignored. Unparseable ranges are skipped.
/// A blank header accepts everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptNegotiator;

impl AcceptNegotiator {
    fn parse(accept: &str) -> Vec<MediaRange> {
        if accept.trim().is_empty() {
            return vec![MediaRange {
                mime: mime::STAR_STAR,
                quality: 1.0,
            }];
        }

        accept
            .split(',')
            .map(str::trim)
            .filter(|range| !range.is_empty())
            .filter_map(|range| match range.parse::<Mime>() {
                Ok(mime) => {
                    let quality = mime
                        .get_param("q")
                        .and_then(|q| q.as_str().parse::<f32>().ok())
                        .map(|q| q.clamp(0.0, 1.0))
                        .unwrap_or(1.0);
                    Some(MediaRange { mime, quality })
                }
                Err(e) => {
                    debug!("Ignoring media range {:?}: {}", range, e);
                    None
                }
            })
            .collect()
    }

    /// Quality of the most specific range matching `candidate`
    fn quality(ranges: &[MediaRange], candidate: &str) -> f32 {
        let Ok(candidate) = candidate.parse::<Mime>() else {
            return 0.0;
        };

        ranges
            .iter()
            .filter_map(|range| range.specificity(&candidate).map(|s| (s, range.quality)))
            .max_by_key(|(specificity, _)| *specificity)
            .map(|(_, quality)| quality)
            .unwrap_or(0.0)
    }
}

impl MediaTypeNegotiator for AcceptNegotiator {
    fn preferred<'a>(&self, accept: &str, candidates: &'a [String]) -> Option<&'a str> {
        let ranges = Self::parse(accept);
        let mut best: Option<(&'a str, f32)> = None;

        for candidate in candidates {
            let quality = Self::quality(&ranges, candidate);
            if quality <= 0.0 {
                continue;
            }
            // Strictly greater keeps the earlier candidate on ties
            if best.map_or(true, |(_, q)| quality > q) {
                best = Some((candidate.as_str(), quality));
            }
        }

        best.map(|(candidate, _)| candidate)
    }

    fn accepts(&self, accept: &str, media_type: &str) -> bool {
        Self::quality(&Self::parse(accept), media_type) > 0.0
    }
}
