//! Per-character progressive reveal.
//!
//! A [`Typewriter`] owns one line of text and reveals it one grapheme cluster
//! per tick. It does not schedule anything itself; the controller asks it for
//! the next prefix each time its wake-up fires, so there is never more than
//! one character "in flight".

use unicode_segmentation::UnicodeSegmentation;

/// Number of user-perceived characters in `text`.
pub fn grapheme_count(text: &str) -> usize {
    text.graphemes(true).count()
}

/// The first `count` grapheme clusters of `text`.
pub fn grapheme_prefix(text: &str, count: usize) -> &str {
    match text.grapheme_indices(true).nth(count) {
        Some((byte, _)) => &text[..byte],
        None => text,
    }
}

#[derive(Debug, Clone)]
pub struct Typewriter {
    text: String,
    /// Byte offset just past each grapheme.
    ends: Vec<usize>,
    revealed: usize,
    speed_ms: u64,
    cancelled: bool,
}

impl Typewriter {
    /// Creates a typewriter for `text` revealing one grapheme every `speed_ms`.
    ///
    /// A zero speed is treated as 1ms; script validation rejects it earlier.
    pub fn new(text: impl Into<String>, speed_ms: u64) -> Self {
        let text = text.into();
        let ends = text
            .grapheme_indices(true)
            .map(|(start, g)| start + g.len())
            .collect();
        Self {
            text,
            ends,
            revealed: 0,
            speed_ms: speed_ms.max(1),
            cancelled: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Total graphemes in the line.
    pub fn len(&self) -> usize {
        self.ends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ends.is_empty()
    }

    pub fn speed_ms(&self) -> u64 {
        self.speed_ms
    }

    /// Graphemes revealed so far.
    pub fn revealed(&self) -> usize {
        self.revealed
    }

    pub fn prefix(&self) -> &str {
        self.prefix_at(self.revealed)
    }

    fn prefix_at(&self, count: usize) -> &str {
        match count {
            0 => "",
            n => &self.text[..self.ends[n.min(self.ends.len()) - 1]],
        }
    }

    /// True once every grapheme is visible. An empty line is done immediately.
    pub fn is_done(&self) -> bool {
        self.revealed >= self.ends.len()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Time to type the whole line from scratch.
    pub fn duration_ms(&self) -> u64 {
        self.ends.len() as u64 * self.speed_ms
    }

    /// Reveals one more grapheme and returns the longer prefix.
    ///
    /// Returns `None` once done or after [`Typewriter::cancel`].
    pub fn reveal_next(&mut self) -> Option<&str> {
        if self.cancelled || self.is_done() {
            return None;
        }
        self.revealed += 1;
        Some(self.prefix())
    }

    /// Shows the full line without waiting.
    pub fn finish(&mut self) {
        self.revealed = self.ends.len();
    }

    /// Stops the reveal; later ticks are ignored.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Lazy sequence of `(offset_ms, prefix)` frames from the first character
    /// to the full text, independent of the current reveal position.
    pub fn frames(&self) -> Frames<'_> {
        Frames {
            writer: self,
            next: 1,
        }
    }
}

pub struct Frames<'a> {
    writer: &'a Typewriter,
    next: usize,
}

impl<'a> Iterator for Frames<'a> {
    type Item = (u64, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        if self.writer.cancelled || self.next > self.writer.len() {
            return None;
        }
        let count = self.next;
        self.next += 1;
        Some((
            count as u64 * self.writer.speed_ms,
            self.writer.prefix_at(count),
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.writer.len() + 1).saturating_sub(self.next);
        (left, Some(left))
    }
}
