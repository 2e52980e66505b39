//! Tag grammar: which lines start a tag and how far a tag extends.
//!
//! A tag is a marker character (`@` by default) followed by a name made of
//! ASCII word characters. Its value is the rest of the line plus any
//! continuation lines, up to a blank line, the next tag, or a line that
//! opens a new block.

use std::fmt;
use std::ops::Range;

use crate::fence::opens_fence;

/// Supported tag kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TagKind {
    /// `@method name`
    Method,
    /// `@event name`
    Event,
    /// `@action name`
    Action,
    /// `@param {types} name description`
    Param,
    /// `@returns {types} description`
    Returns,
    /// `@property {types} name description`
    Property,
}

impl TagKind {
    /// Every supported kind.
    pub const ALL: [Self; 6] = [
        Self::Method,
        Self::Event,
        Self::Action,
        Self::Param,
        Self::Returns,
        Self::Property,
    ];

    /// Look up a kind by its tag name (case-sensitive).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "method" => Some(Self::Method),
            "event" => Some(Self::Event),
            "action" => Some(Self::Action),
            "param" => Some(Self::Param),
            "returns" => Some(Self::Returns),
            "property" => Some(Self::Property),
            _ => None,
        }
    }

    /// Tag name as written after the marker.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Method => "method",
            Self::Event => "event",
            Self::Action => "action",
            Self::Param => "param",
            Self::Returns => "returns",
            Self::Property => "property",
        }
    }

    /// Whether this kind opens a scope that later tags attach to.
    #[must_use]
    pub fn is_structural(self) -> bool {
        matches!(self, Self::Method | Self::Event | Self::Action)
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Leading structure of a markdown line, as byte offsets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LinePrefix {
    /// End of indentation and blockquote markers.
    pub container: usize,
    /// End of the container plus an ATX heading or list item marker.
    pub block: usize,
    /// The line is an ATX heading.
    pub heading: bool,
    /// The line starts a list item.
    pub list_item: bool,
}

impl LinePrefix {
    /// Whether the line starts a new block rather than continuing one.
    #[must_use]
    pub fn opens_block(&self) -> bool {
        self.heading || self.list_item
    }
}

/// Analyze the container and block prefix of `line`.
#[must_use]
pub fn line_prefix(line: &str) -> LinePrefix {
    let bytes = line.as_bytes();
    let mut pos = 0;
    loop {
        pos += leading_blank(&line[pos..]);
        if bytes.get(pos) == Some(&b'>') {
            pos += 1;
        } else {
            break;
        }
    }

    let container = pos;
    let rest = &line[container..];
    if let Some(len) = atx_marker(rest) {
        return LinePrefix {
            container,
            block: container + len,
            heading: true,
            list_item: false,
        };
    }
    if let Some(len) = list_marker(rest) {
        return LinePrefix {
            container,
            block: container + len,
            heading: false,
            list_item: true,
        };
    }
    LinePrefix {
        container,
        block: container,
        heading: false,
        list_item: false,
    }
}

fn leading_blank(s: &str) -> usize {
    s.len() - s.trim_start_matches([' ', '\t']).len()
}

fn atx_marker(rest: &str) -> Option<usize> {
    let hashes = rest.bytes().take_while(|&b| b == b'#').count();
    if !(1..=6).contains(&hashes) {
        return None;
    }
    let after = &rest[hashes..];
    if !after.is_empty() && !after.starts_with([' ', '\t']) {
        return None;
    }
    Some(hashes + leading_blank(after))
}

fn list_marker(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    let len = match bytes.first()? {
        b'-' | b'*' | b'+' => 1,
        b'0'..=b'9' => {
            let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
            match bytes.get(digits) {
                Some(b'.' | b')') if digits <= 9 => digits + 1,
                _ => return None,
            }
        }
        _ => return None,
    };
    let after = &rest[len..];
    if !after.starts_with([' ', '\t']) {
        return None;
    }
    Some(len + leading_blank(after))
}

/// Location of a tag start within a line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagStart {
    /// Byte offset of the marker.
    pub marker: usize,
    /// Byte range of the tag name.
    pub name: Range<usize>,
}

/// Find the tag starting on `line`, if any.
///
/// With `require_line_start` the marker must directly follow the block
/// prefix. Otherwise the first marker that begins a word and is followed by
/// a name counts, so `see @param` is a tag but `me@example.com` is not.
#[must_use]
pub fn find_tag_start(
    line: &str,
    prefix: &LinePrefix,
    marker: char,
    require_line_start: bool,
) -> Option<TagStart> {
    if require_line_start {
        if !line[prefix.block..].starts_with(marker) {
            return None;
        }
        return tag_at(line, prefix.block, marker);
    }

    line[prefix.container..]
        .match_indices(marker)
        .map(|(offset, _)| prefix.container + offset)
        .filter(|&at| {
            line[..at]
                .chars()
                .next_back()
                .is_none_or(char::is_whitespace)
        })
        .find_map(|at| tag_at(line, at, marker))
}

fn tag_at(line: &str, at: usize, marker: char) -> Option<TagStart> {
    let start = at + marker.len_utf8();
    let len = line[start..]
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
        .count();
    (len > 0).then(|| TagStart {
        marker: at,
        name: start..start + len,
    })
}

/// Content a following line contributes to an open tag's value.
///
/// Returns `None` when the line ends the tag: blank lines, new headings or
/// list items, code fences, and lines starting with the marker.
#[must_use]
pub fn continuation(line: &str, marker: char) -> Option<&str> {
    let prefix = line_prefix(line);
    if prefix.opens_block() {
        return None;
    }
    let content = &line[prefix.container..];
    if content.trim().is_empty() || content.starts_with(marker) || opens_fence(content) {
        return None;
    }
    Some(content)
}
