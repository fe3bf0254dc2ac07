//! Structured media-type descriptors ("caps") with intersection.
//!
//! A caps value is a disjunction of structures; each structure is a media
//! type plus a set of field constraints. Two caps are compatible when any
//! structure pair shares a media type and every field constrained by both
//! sides has a non-empty intersection. Fields constrained by only one side
//! do not restrict the other.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A single field constraint inside a caps structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapsValue {
    /// A fixed integer, e.g. `rate=44100`.
    Int(i64),
    /// An inclusive integer range, e.g. `width=[16, 4096]`.
    IntRange { min: i64, max: i64 },
    /// A fixed fraction, e.g. `framerate=30/1`.
    Fraction { num: i32, den: i32 },
    /// A fixed string, e.g. `stream-format=avc`.
    Str(String),
    /// A list of alternatives, e.g. `format={ S16LE, F32LE }`.
    List(Vec<CapsValue>),
}

impl CapsValue {
    /// Whether this value pins the field to a single concrete value.
    pub fn is_fixed(&self) -> bool {
        matches!(
            self,
            CapsValue::Int(_) | CapsValue::Fraction { .. } | CapsValue::Str(_)
        )
    }

    /// Intersection of two field constraints, `None` when empty.
    pub fn intersect(&self, other: &CapsValue) -> Option<CapsValue> {
        use CapsValue::*;
        match (self, other) {
            (Int(a), Int(b)) => (a == b).then(|| Int(*a)),
            (Int(v), IntRange { min, max }) | (IntRange { min, max }, Int(v)) => {
                (min <= v && v <= max).then(|| Int(*v))
            }
            (IntRange { min: a0, max: a1 }, IntRange { min: b0, max: b1 }) => {
                let min = *a0.max(b0);
                let max = *a1.min(b1);
                (min <= max).then_some(IntRange { min, max })
            }
            (Fraction { num: a, den: b }, Fraction { num: c, den: d }) => {
                // Compare cross products so 30/1 == 60/2.
                (i64::from(*a) * i64::from(*d) == i64::from(*c) * i64::from(*b))
                    .then_some(Fraction { num: *a, den: *b })
            }
            (Str(a), Str(b)) => (a == b).then(|| Str(a.clone())),
            (List(items), v) | (v, List(items)) => {
                let mut survivors: Vec<CapsValue> = items
                    .iter()
                    .filter_map(|item| item.intersect(v))
                    .collect();
                match survivors.len() {
                    0 => None,
                    1 => survivors.pop(),
                    _ => Some(List(survivors)),
                }
            }
            _ => None,
        }
    }
}

/// One structure of a caps value: media type plus field constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapsStructure {
    /// The media type, e.g. `video/x-raw` or `audio/mpeg`.
    pub media_type: String,

    /// Field constraints, ordered by name for stable display.
    #[serde(default)]
    pub fields: BTreeMap<String, CapsValue>,
}

impl CapsStructure {
    pub fn new(media_type: impl Into<String>) -> Self {
        Self {
            media_type: media_type.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: CapsValue) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Intersection of two structures, `None` when incompatible.
    pub fn intersect(&self, other: &CapsStructure) -> Option<CapsStructure> {
        if self.media_type != other.media_type {
            return None;
        }
        let mut fields = BTreeMap::new();
        for (name, value) in &self.fields {
            match other.fields.get(name) {
                Some(theirs) => {
                    fields.insert(name.clone(), value.intersect(theirs)?);
                }
                None => {
                    fields.insert(name.clone(), value.clone());
                }
            }
        }
        for (name, value) in &other.fields {
            fields.entry(name.clone()).or_insert_with(|| value.clone());
        }
        Some(CapsStructure {
            media_type: self.media_type.clone(),
            fields,
        })
    }

    /// Copy of this structure with every unfixed field dropped.
    ///
    /// The render profile for an encoder is built from its src template
    /// with ranges and lists removed, leaving only the pinned fields.
    pub fn fixed_copy(&self) -> CapsStructure {
        CapsStructure {
            media_type: self.media_type.clone(),
            fields: self
                .fields
                .iter()
                .filter(|(_, v)| v.is_fixed())
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }
}

/// A full caps value: a disjunction of structures.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MediaCaps {
    pub structures: Vec<CapsStructure>,
}

impl MediaCaps {
    /// Caps with a single bare media type and no field constraints.
    pub fn simple(media_type: impl Into<String>) -> Self {
        Self {
            structures: vec![CapsStructure::new(media_type)],
        }
    }

    pub fn from_structures(structures: Vec<CapsStructure>) -> Self {
        Self { structures }
    }

    /// Caps that match nothing.
    pub fn empty() -> Self {
        Self { structures: vec![] }
    }

    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }

    /// Full intersection: every compatible structure pair, in order.
    pub fn intersect(&self, other: &MediaCaps) -> MediaCaps {
        let mut structures = Vec::new();
        for a in &self.structures {
            for b in &other.structures {
                if let Some(merged) = a.intersect(b) {
                    structures.push(merged);
                }
            }
        }
        MediaCaps { structures }
    }

    /// Whether the intersection with `other` is non-empty.
    pub fn can_intersect(&self, other: &MediaCaps) -> bool {
        self.structures
            .iter()
            .any(|a| other.structures.iter().any(|b| a.intersect(b).is_some()))
    }

    /// Copy with every unfixed field dropped from every structure.
    pub fn fixed_copy(&self) -> MediaCaps {
        MediaCaps {
            structures: self.structures.iter().map(|s| s.fixed_copy()).collect(),
        }
    }
}

impl fmt::Display for MediaCaps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.structures.is_empty() {
            return write!(f, "EMPTY");
        }
        let mut first = true;
        for s in &self.structures {
            if !first {
                write!(f, "; ")?;
            }
            first = false;
            write!(f, "{}", s.media_type)?;
            for (name, value) in &s.fields {
                write!(f, ", {}=", name)?;
                fmt_value(f, value)?;
            }
        }
        Ok(())
    }
}

fn fmt_value(f: &mut fmt::Formatter<'_>, value: &CapsValue) -> fmt::Result {
    match value {
        CapsValue::Int(v) => write!(f, "{}", v),
        CapsValue::IntRange { min, max } => write!(f, "[{}, {}]", min, max),
        CapsValue::Fraction { num, den } => write!(f, "{}/{}", num, den),
        CapsValue::Str(s) => write!(f, "{}", s),
        CapsValue::List(items) => {
            write!(f, "{{ ")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                fmt_value(f, item)?;
            }
            write!(f, " }}")
        }
    }
}

/// Error produced when parsing a caps string fails.
#[derive(Debug, thiserror::Error)]
#[error("invalid caps string {input:?}: {reason}")]
pub struct CapsParseError {
    pub input: String,
    pub reason: String,
}

impl FromStr for MediaCaps {
    type Err = CapsParseError;

    /// Parse the textual caps form, e.g.
    /// `audio/x-raw, rate=[8000, 96000], channels=2; audio/mpeg`.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let err = |reason: &str| CapsParseError {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let mut structures = Vec::new();
        for chunk in input.split(';') {
            let chunk = chunk.trim();
            if chunk.is_empty() {
                continue;
            }
            let mut parts = split_top_level(chunk);
            let media_type = parts.remove(0).trim().to_string();
            if media_type.is_empty() || !media_type.contains('/') {
                return Err(err("missing media type"));
            }
            let mut structure = CapsStructure::new(media_type);
            for part in parts {
                let (name, raw) = part
                    .split_once('=')
                    .ok_or_else(|| err("field without '='"))?;
                let value = parse_value(raw.trim()).ok_or_else(|| err("unparseable value"))?;
                structure.fields.insert(name.trim().to_string(), value);
            }
            structures.push(structure);
        }
        if structures.is_empty() {
            return Err(err("no structures"));
        }
        Ok(MediaCaps { structures })
    }
}

/// Split on commas that are not inside `[...]` or `{...}`.
fn split_top_level(chunk: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for c in chunk.chars() {
        match c {
            '[' | '{' => {
                depth += 1;
                current.push(c);
            }
            ']' | '}' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ',' if depth == 0 => {
                parts.push(current.trim().to_string());
                current = String::new();
            }
            _ => current.push(c),
        }
    }
    if !current.trim().is_empty() {
        parts.push(current.trim().to_string());
    }
    parts
}

fn parse_value(raw: &str) -> Option<CapsValue> {
    let raw = raw.trim();
    if let Some(inner) = raw.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
        let (lo, hi) = inner.split_once(',')?;
        return Some(CapsValue::IntRange {
            min: lo.trim().parse().ok()?,
            max: hi.trim().parse().ok()?,
        });
    }
    if let Some(inner) = raw.strip_prefix('{').and_then(|r| r.strip_suffix('}')) {
        let items: Option<Vec<CapsValue>> =
            inner.split(',').map(|item| parse_value(item)).collect();
        return Some(CapsValue::List(items?));
    }
    if let Some((num, den)) = raw.split_once('/') {
        if let (Ok(num), Ok(den)) = (num.trim().parse(), den.trim().parse()) {
            return Some(CapsValue::Fraction { num, den });
        }
    }
    if let Ok(v) = raw.parse::<i64>() {
        return Some(CapsValue::Int(v));
    }
    let unquoted = raw.trim_matches('"');
    if unquoted.is_empty() {
        return None;
    }
    Some(CapsValue::Str(unquoted.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_media_types_intersect_on_equality() {
        let raw: MediaCaps = "audio/x-raw".parse().unwrap();
        let same: MediaCaps = "audio/x-raw".parse().unwrap();
        let other: MediaCaps = "video/x-raw".parse().unwrap();
        assert!(raw.can_intersect(&same));
        assert!(!raw.can_intersect(&other));
    }

    #[test]
    fn ranges_constrain_fixed_values() {
        let template: MediaCaps = "audio/x-raw, rate=[8000, 96000]".parse().unwrap();
        let inside: MediaCaps = "audio/x-raw, rate=44100".parse().unwrap();
        let outside: MediaCaps = "audio/x-raw, rate=192000".parse().unwrap();
        assert!(template.can_intersect(&inside));
        assert!(!template.can_intersect(&outside));
    }

    #[test]
    fn unconstrained_fields_do_not_restrict() {
        let a: MediaCaps = "video/x-raw, width=[16, 4096]".parse().unwrap();
        let b: MediaCaps = "video/x-raw, height=[16, 4096]".parse().unwrap();
        let merged = a.intersect(&b);
        assert_eq!(merged.structures.len(), 1);
        assert_eq!(merged.structures[0].fields.len(), 2);
    }

    #[test]
    fn list_intersection_keeps_survivors() {
        let formats: MediaCaps = "audio/x-raw, format={ S16LE, F32LE }".parse().unwrap();
        let fixed: MediaCaps = "audio/x-raw, format=S16LE".parse().unwrap();
        let merged = formats.intersect(&fixed);
        assert_eq!(
            merged.structures[0].fields.get("format"),
            Some(&CapsValue::Str("S16LE".to_string()))
        );
    }

    #[test]
    fn fraction_comparison_reduces() {
        let a = CapsValue::Fraction { num: 30, den: 1 };
        let b = CapsValue::Fraction { num: 60, den: 2 };
        assert!(a.intersect(&b).is_some());
    }

    #[test]
    fn fixed_copy_drops_ranges_and_lists() {
        let caps: MediaCaps = "video/x-h264, width=[16, 4096], stream-format=avc"
            .parse()
            .unwrap();
        let fixed = caps.fixed_copy();
        let fields = &fixed.structures[0].fields;
        assert!(!fields.contains_key("width"));
        assert_eq!(fields.get("stream-format"), Some(&CapsValue::Str("avc".into())));
    }

    #[test]
    fn multi_structure_caps_parse_and_match_any() {
        let caps: MediaCaps = "audio/mpeg, mpegversion=1; audio/x-raw".parse().unwrap();
        assert_eq!(caps.structures.len(), 2);
        let raw: MediaCaps = "audio/x-raw".parse().unwrap();
        assert!(caps.can_intersect(&raw));
    }

    #[test]
    fn display_round_trips_through_parse() {
        let caps: MediaCaps = "video/x-raw, framerate=30/1, width=[16, 4096]"
            .parse()
            .unwrap();
        let reparsed: MediaCaps = caps.to_string().parse().unwrap();
        assert_eq!(caps, reparsed);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!("".parse::<MediaCaps>().is_err());
        assert!("notamediatype".parse::<MediaCaps>().is_err());
        assert!("audio/x-raw, rate".parse::<MediaCaps>().is_err());
    }
}
