//! Word frequency summary of a submission's text, rendered as a link to an
//! external word-cloud service.

use crate::file_storing::FileStoringClient;
use std::collections::HashMap;
use std::fmt;
use url::form_urlencoded;

/// How many distinct words feed the cloud.
pub const TOP_WORDS: usize = 100;
/// Cap on how many times one word is repeated in the weighted text.
pub const MAX_WEIGHT: usize = 10;
/// Words must be longer than this many characters.
pub const MIN_WORD_LEN: usize = 2;

const TOKEN_SEPARATORS: [char; 4] = [' ', '\r', '\n', '\t'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordCloud {
    Rendered(String),
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Download failed or the storage service refused it.
    ContentUnavailable,
    /// The text had no words long enough to count.
    NoQualifyingWords,
}

impl WordCloud {
    pub fn url(&self) -> Option<&str> {
        match self {
            WordCloud::Rendered(url) => Some(url),
            WordCloud::Skipped(_) => None,
        }
    }

    pub fn into_url(self) -> Option<String> {
        match self {
            WordCloud::Rendered(url) => Some(url),
            WordCloud::Skipped(_) => None,
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::ContentUnavailable => write!(f, "content unavailable"),
            SkipReason::NoQualifyingWords => write!(f, "no qualifying words"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

/// Decodes file bytes as text, honouring a UTF-8, UTF-16 or UTF-32 byte-order mark.
///
/// Without a BOM the bytes are read as UTF-8. Malformed sequences become U+FFFD.
pub fn decode_text(bytes: &[u8]) -> String {
    match bytes {
        [0xEF, 0xBB, 0xBF, rest @ ..] => String::from_utf8_lossy(rest).into_owned(),
        // UTF-32 LE shares its first two bytes with UTF-16 LE, so it must match first.
        [0xFF, 0xFE, 0x00, 0x00, rest @ ..] => decode_utf32(rest, u32::from_le_bytes),
        [0x00, 0x00, 0xFE, 0xFF, rest @ ..] => decode_utf32(rest, u32::from_be_bytes),
        [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes),
        [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes),
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> String {
    let chunks = bytes.chunks_exact(2);
    let dangling = !chunks.remainder().is_empty();

    let mut text: String = char::decode_utf16(chunks.map(|pair| unit([pair[0], pair[1]])))
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect();
    if dangling {
        text.push(char::REPLACEMENT_CHARACTER);
    }
    text
}

fn decode_utf32(bytes: &[u8], unit: fn([u8; 4]) -> u32) -> String {
    let chunks = bytes.chunks_exact(4);
    let dangling = !chunks.remainder().is_empty();

    let mut text: String = chunks
        .map(|quad| {
            char::from_u32(unit([quad[0], quad[1], quad[2], quad[3]]))
                .unwrap_or(char::REPLACEMENT_CHARACTER)
        })
        .collect();
    if dangling {
        text.push(char::REPLACEMENT_CHARACTER);
    }
    text
}

// First code point of each run of ten decimal digits (general category Nd).
const DECIMAL_DIGIT_ZEROS: &[u32] = &[
    0x0030, 0x0660, 0x06F0, 0x07C0, 0x0966, 0x09E6, 0x0A66, 0x0AE6, 0x0B66, 0x0BE6, 0x0C66,
    0x0CE6, 0x0D66, 0x0DE6, 0x0E50, 0x0ED0, 0x0F20, 0x1040, 0x1090, 0x17E0, 0x1810, 0x1946,
    0x19D0, 0x1A80, 0x1A90, 0x1B50, 0x1BB0, 0x1C40, 0x1C50, 0xA620, 0xA8D0, 0xA900, 0xA9D0,
    0xA9F0, 0xAA50, 0xABF0, 0xFF10, 0x104A0, 0x10D30, 0x11066, 0x110F0, 0x11136, 0x111D0,
    0x112F0, 0x11450, 0x114D0, 0x11650, 0x116C0, 0x11730, 0x118E0, 0x11950, 0x11C50, 0x11D50,
    0x11DA0, 0x11F50, 0x16A60, 0x16AC0, 0x16B50, 0x1D7CE, 0x1D7D8, 0x1D7E2, 0x1D7EC, 0x1D7F6,
    0x1E140, 0x1E2F0, 0x1E4F0, 0x1E950, 0x1FBF0,
];

/// Decimal digits only: superscripts, fractions and roman numerals are not digits.
fn is_decimal_digit(c: char) -> bool {
    if c.is_ascii_digit() {
        return true;
    }
    let code = c as u32;
    c.is_numeric()
        && DECIMAL_DIGIT_ZEROS
            .iter()
            .any(|&zero| code >= zero && code < zero + 10)
}

/// Letters, excluding letter-like numerals such as roman numerals.
fn is_letter(c: char) -> bool {
    c.is_alphabetic() && !c.is_numeric()
}

/// Replaces every character that is not a letter, decimal digit or whitespace with a space.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| {
            if is_letter(c) || is_decimal_digit(c) || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect()
}

/// Splits on spaces, CR, LF and tabs, keeping lowercased words longer than two characters.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(TOKEN_SEPARATORS)
        .filter(|w| w.chars().count() > MIN_WORD_LEN)
        .map(str::to_lowercase)
        .collect()
}

/// Counts tokens and keeps the [`TOP_WORDS`] most frequent, most frequent first.
///
/// Ties keep the order in which words first appeared.
pub fn word_frequencies(tokens: &[String]) -> Vec<WordCount> {
    let mut counts: Vec<WordCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for token in tokens {
        match index.get(token.as_str()) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(token.as_str(), counts.len());
                counts.push(WordCount {
                    word: token.clone(),
                    count: 1,
                });
            }
        }
    }

    // sort_by is stable, which preserves first-seen order on ties
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(TOP_WORDS);
    counts
}

/// Repeats each word `min(count, MAX_WEIGHT)` times, all space separated.
pub fn weighted_blob(frequencies: &[WordCount]) -> String {
    frequencies
        .iter()
        .flat_map(|wc| std::iter::repeat(wc.word.as_str()).take(wc.count.min(MAX_WEIGHT)))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn word_cloud_url(base_url: &str, blob: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(blob.as_bytes()).collect();
    let separator = if base_url.contains('?') { '&' } else { '?' };
    format!("{}{}text={}", base_url, separator, encoded)
}

/// Runs the whole text pipeline over downloaded bytes.
pub fn summarize(bytes: &[u8], base_url: &str) -> WordCloud {
    let text = decode_text(bytes);
    let tokens = tokenize(&sanitize(&text));
    let frequencies = word_frequencies(&tokens);

    if frequencies.is_empty() {
        return WordCloud::Skipped(SkipReason::NoQualifyingWords);
    }

    WordCloud::Rendered(word_cloud_url(base_url, &weighted_blob(&frequencies)))
}

/// Downloads the submission and summarizes it. Never fails: problems become
/// [`WordCloud::Skipped`].
pub async fn build(client: &dyn FileStoringClient, submission_id: &str, base_url: &str) -> WordCloud {
    let outcome = match client.download(submission_id).await {
        Ok(Some(bytes)) => summarize(&bytes, base_url),
        Ok(None) => WordCloud::Skipped(SkipReason::ContentUnavailable),
        Err(e) => {
            tracing::info!(submission_id, error = %e, "Unable to download submission content");
            WordCloud::Skipped(SkipReason::ContentUnavailable)
        }
    };

    if let WordCloud::Skipped(reason) = &outcome {
        tracing::info!(submission_id, %reason, "Unable to produce word cloud");
    }
    outcome
}
