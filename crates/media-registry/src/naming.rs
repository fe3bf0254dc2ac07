//! Display names and file extensions for registry elements.

use crate::descriptor::ElementDescriptor;

/// Substrings stripped from long names. Only lowercase versions of
/// "format", "video" and "audio" are removed; capitalized forms may be
/// part of a trademark name.
const WORDS_TO_REMOVE: &[&str] = &[
    "Muxer",
    "muxer",
    "Encoder",
    "encoder",
    "format",
    "video",
    "audio",
    "instead",
    // Incorrect upstream naming for Sorenson Spark:
    "Flash Video (FLV) /",
];

/// Literal replacements applied after removals.
const WORDS_TO_REPLACE: &[(&str, &str)] = &[("version ", "v"), ("Microsoft", "MS")];

/// A nice display name for an element's long name.
///
/// Removes redundant words, applies the literal replacements, then
/// collapses whitespace. A pure, order-sensitive string transform.
pub fn beautify_factory_name(long_name: &str) -> String {
    let mut name = long_name.to_string();
    for word in WORDS_TO_REMOVE {
        name = name.replace(word, "");
    }
    for (pattern, replacement) in WORDS_TO_REPLACE {
        name = name.replace(pattern, replacement);
    }
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The default file extension for the given muxer factory name.
///
/// Returns `None` for unknown muxers, meaning no extension is enforced.
pub fn extension_for_muxer(muxer: &str) -> Option<&'static str> {
    let ext = match muxer {
        "asfmux" => "asf",
        "avimux" => "avi",
        "ffmux_3g2" => "3g2",
        "ffmux_avm2" => "avm2",
        "ffmux_dvd" => "vob",
        "ffmux_flv" => "flv",
        "ffmux_ipod" => "mp4",
        "ffmux_mpeg" => "mpeg",
        "ffmux_mpegts" => "mpeg",
        "ffmux_psp" => "mp4",
        "ffmux_rm" => "rm",
        "ffmux_svcd" => "mpeg",
        "ffmux_swf" => "swf",
        "ffmux_vcd" => "mpeg",
        "ffmux_vob" => "vob",
        "flvmux" => "flv",
        "gppmux" => "3gp",
        "matroskamux" => "mkv",
        "mj2mux" => "mj2",
        "mp4mux" => "mp4",
        "mpegpsmux" => "mpeg",
        "mpegtsmux" => "mpeg",
        "mvemux" => "mve",
        "mxfmux" => "mxf",
        "oggmux" => "ogv",
        "qtmux" => "mov",
        "webmmux" => "webm",
        _ => return None,
    };
    Some(ext)
}

/// Build a selectable list of `(display_name, descriptor)` pairs.
///
/// Rank-0 descriptors are unusable and filtered out; the rest are
/// beautified and sorted by display name ascending (stable on ties).
pub fn factory_list<'a>(
    descriptors: impl IntoIterator<Item = &'a ElementDescriptor>,
) -> Vec<(String, &'a ElementDescriptor)> {
    let mut entries: Vec<(String, &ElementDescriptor)> = descriptors
        .into_iter()
        .filter(|d| d.rank > 0)
        .map(|d| (beautify_factory_name(&d.long_name), d))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries
}
