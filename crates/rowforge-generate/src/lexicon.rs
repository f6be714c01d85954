use fake::Fake;
use fake::faker::lorem::en::Word;
use rand::{Rng, RngCore};

/// Source of random lexical strings of an exact length.
pub trait LexicalSource {
    /// Produce a string of exactly `len` characters.
    fn lexify(&self, len: usize, rng: &mut dyn RngCore) -> String;
}

/// Lexical strings assembled from `fake` lorem words and cut to length.
#[derive(Debug, Clone, Copy, Default)]
pub struct FakerLexicon;

impl LexicalSource for FakerLexicon {
    fn lexify(&self, len: usize, rng: &mut dyn RngCore) -> String {
        let mut value = String::with_capacity(len + 16);
        let mut count = 0;
        while count < len {
            let word: String = Word().fake_with_rng(rng);
            if word.is_empty() {
                value.push(char::from(rng.random_range(b'a'..=b'z')));
                count += 1;
                continue;
            }
            for ch in word.chars().take(len - count) {
                value.push(ch);
                count += 1;
            }
        }
        value
    }
}
