//! The growable string buffer and its built-in operations. Strings are
//! byte buffers: length is the logical byte count, and equality is
//! structural byte-by-byte comparison.

use std::borrow::Cow;
use std::fmt;

/// A growable byte buffer.
///
/// `Vec<u8>` already gives us growable-buffer semantics with amortized
/// append; we keep a thin named wrapper so the evaluator's call sites read
/// in terms of "script strings" rather than raw byte vectors, and so
/// display/formatting has one obvious home.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScriptString(Vec<u8>);

impl ScriptString {
    #[must_use]
    pub fn new_str(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `cat_str(a, b)`: byte concatenation, producing a fresh buffer.
    #[must_use]
    pub fn cat_str(a: &Self, b: &Self) -> Self {
        let mut out = Vec::with_capacity(a.len() + b.len());
        out.extend_from_slice(&a.0);
        out.extend_from_slice(&b.0);
        Self(out)
    }

    /// Structural byte-by-byte equality.
    #[must_use]
    pub fn equals(a: &Self, b: &Self) -> bool {
        a.0 == b.0
    }

    /// Lossily renders the buffer as text for `cout` / diagnostics.
    ///
    /// Script source is UTF-8, so this is exact for any string built purely
    /// from literals and the five builtins; only a `substr` slice that
    /// lands inside a multi-byte codepoint could introduce a lossy
    /// replacement character.
    #[must_use]
    pub fn display_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }
}

impl fmt::Display for ScriptString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_lossy())
    }
}

/// `length`: byte length of the string.
#[must_use]
pub fn length(s: &ScriptString) -> i64 {
    s.len() as i64
}

/// `substr`: substring at byte offset `start`, of byte length `len`.
///
/// Out-of-range `start`/`len` never panics: both ends clamp to the
/// string's bounds rather than erroring.
#[must_use]
pub fn substr(s: &ScriptString, start: i64, len: i64) -> ScriptString {
    let bytes = s.as_bytes();
    let n = bytes.len() as i64;
    if len <= 0 || start >= n || start < 0 && start + len <= 0 {
        return ScriptString::default();
    }
    let start = start.max(0) as usize;
    if start >= bytes.len() {
        return ScriptString::default();
    }
    let end = ((start as i64) + len).clamp(0, n) as usize;
    ScriptString::new_str(bytes[start..end].to_vec())
}

/// `find`: first byte offset of `needle` in `haystack`, or `-1` when absent.
#[must_use]
pub fn find(haystack: &ScriptString, needle: &ScriptString) -> i64 {
    let h = haystack.as_bytes();
    let n = needle.as_bytes();
    if n.is_empty() {
        return 0;
    }
    if n.len() > h.len() {
        return -1;
    }
    h.windows(n.len())
        .position(|window| window == n)
        .map_or(-1, |pos| pos as i64)
}

/// `sort`: returns the input bytes in non-decreasing order.
#[must_use]
pub fn sort(s: &ScriptString) -> ScriptString {
    let mut bytes = s.as_bytes().to_vec();
    bytes.sort_unstable();
    ScriptString::new_str(bytes)
}
