//! Sentence-aware text segmentation.
//!
//! Splits a script line into synthesis-sized pieces without breaking
//! words: sentences are accumulated up to the ceiling, an over-long
//! sentence is word-packed, and only a single word longer than the
//! ceiling is ever emitted over it.

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Split `text` into segments of at most `max_chars` characters.
///
/// The ceiling is measured in characters, not bytes. Joining the result
/// with single spaces reconstructs the input modulo whitespace
/// normalization, and no segment is empty.
pub fn split_into_segments(text: &str, max_chars: usize) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }
    if char_len(text) <= max_chars {
        return vec![text.to_string()];
    }

    let mut segments = Vec::new();
    let mut current = String::new();

    for sentence in split_sentences(text) {
        if char_len(&sentence) > max_chars {
            if !current.is_empty() {
                segments.push(std::mem::take(&mut current));
            }
            pack_words(&sentence, max_chars, &mut segments);
        } else if current.is_empty() {
            current = sentence;
        } else if char_len(&current) + 1 + char_len(&sentence) <= max_chars {
            current.push(' ');
            current.push_str(&sentence);
        } else {
            segments.push(std::mem::take(&mut current));
            current = sentence;
        }
    }

    if !current.is_empty() {
        segments.push(current);
    }

    segments
}

/// Split text into sentences at `.`/`!`/`?` runs followed by whitespace
/// (or end of input). The terminators stay with their sentence.
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);

        if matches!(c, '.' | '!' | '?') {
            while let Some(&next) = chars.peek() {
                if matches!(next, '.' | '!' | '?') {
                    current.push(next);
                    chars.next();
                } else {
                    break;
                }
            }

            if chars.peek().map_or(true, |next| next.is_whitespace()) {
                while chars.peek().map_or(false, |next| next.is_whitespace()) {
                    chars.next();
                }
                let sentence = current.trim().to_string();
                if !sentence.is_empty() {
                    sentences.push(sentence);
                }
                current.clear();
            }
        }
    }

    let tail = current.trim().to_string();
    if !tail.is_empty() {
        sentences.push(tail);
    }

    sentences
}

/// Greedily pack the words of one over-long sentence into segments.
fn pack_words(sentence: &str, max_chars: usize, out: &mut Vec<String>) {
    let mut current = String::new();

    for word in sentence.split_whitespace() {
        let word_len = char_len(word);

        if current.is_empty() {
            if word_len > max_chars {
                // single word over the ceiling goes out verbatim
                out.push(word.to_string());
            } else {
                current = word.to_string();
            }
        } else if char_len(&current) + 1 + word_len <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            out.push(std::mem::take(&mut current));
            if word_len > max_chars {
                out.push(word.to_string());
            } else {
                current = word.to_string();
            }
        }
    }

    if !current.is_empty() {
        out.push(current);
    }
}
