use pulldown_cmark::{Event, Parser};
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// The reading speed of an average adult in words per minute (WPM).
///
/// [Source](https://scholarwithin.com/average-reading-speed)
pub const AVERAGE_ADULT_WPM: usize = 238;

/// The number of words in a piece of content.
#[derive(
    Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Default, Serialize, Deserialize,
)]
pub struct WordCount(pub usize);

/// The number of minutes it would take to read a piece of content.
#[derive(
    Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Default, Serialize, Deserialize,
)]
pub struct ReadTime(pub usize);

impl ReadTime {
    /// Returns the label shown next to a post, e.g. `5 min read`.
    pub fn label(&self) -> String {
        format!("{} min read", self.0)
    }
}

/// The reading metrics for a piece of content.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub struct ReadingMetrics {
    pub word_count: WordCount,
    pub read_time: ReadTime,
}

impl ReadingMetrics {
    /// Returns the [`ReadingMetrics`] for the given Markdown, assuming it is read
    /// at the specified words per minute (WPM).
    ///
    /// Only the prose is counted, not the Markdown syntax around it. Every piece
    /// of content takes at least a minute to read.
    pub fn for_markdown(markdown: &str, wpm: usize) -> Self {
        let word_count = Parser::new(markdown)
            .map(|event| match event {
                Event::Text(text) | Event::Code(text) => text.unicode_words().count(),
                _ => 0,
            })
            .sum::<usize>();

        let wpm = wpm.max(1);
        let read_time = word_count.div_ceil(wpm).max(1);

        Self {
            word_count: WordCount(word_count),
            read_time: ReadTime(read_time),
        }
    }
}
