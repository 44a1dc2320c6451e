//! # Chunker
//!
//! Bounded-size text slicing shared by the summarizer and the narrator.
//!
//! Both iterators are lazy and `Clone`, so a sequence can be restarted by
//! cloning it before consumption. Empty input yields no chunks.

use std::str::SplitWhitespace;

use itertools::Itertools;

/// Words per chunk sent to the text generation model.
pub const DEFAULT_WORDS_PER_CHUNK: usize = 1000;

/// Characters per chunk sent to the speech synthesizer.
pub const DEFAULT_CHARS_PER_CHUNK: usize = 500;

/// Groups the whitespace-separated words of `text` into runs of
/// `words_per_chunk` words joined by single spaces.
pub fn chunk_by_words(text: &str, words_per_chunk: usize) -> WordChunks<'_> {
    WordChunks {
        words: text.split_whitespace(),
        size: words_per_chunk.max(1),
    }
}

/// Slices `text` into runs of exactly `chars_per_chunk` characters, ignoring
/// word boundaries. Concatenating the chunks gives back `text`.
pub fn chunk_by_chars(text: &str, chars_per_chunk: usize) -> CharChunks<'_> {
    CharChunks {
        rest: text,
        size: chars_per_chunk.max(1),
    }
}

#[derive(Debug, Clone)]
pub struct WordChunks<'a> {
    words: SplitWhitespace<'a>,
    size: usize,
}

impl Iterator for WordChunks<'_> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let chunk = self.words.by_ref().take(self.size).join(" ");
        (!chunk.is_empty()).then_some(chunk)
    }
}

#[derive(Debug, Clone)]
pub struct CharChunks<'a> {
    rest: &'a str,
    size: usize,
}

impl<'a> Iterator for CharChunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        // byte offset of the first char past this chunk
        let split_at = self
            .rest
            .char_indices()
            .nth(self.size)
            .map_or(self.rest.len(), |(idx, _)| idx);
        let (chunk, rest) = self.rest.split_at(split_at);
        self.rest = rest;
        Some(chunk)
    }
}
