//! Programming-language and text-format detection by keyword counting.

use crate::heuristics::keywords::{language_index, lookup, Lang, C_FAMILY, LANGUAGE_TYPES};
use crate::heuristics::tokenizer::Tokenizer;
use tracing::debug;

/// Accuracy assigned once C-family keywords have been seen.
pub const C_FAMILY_ACCURACY: u8 = 60;

/// Ceiling of the weighted pick's accuracy band.
const WEIGHTED_BAND: f64 = 60.0;

/// Keyword statistics for one buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenTally {
    /// Number of tokens found in the keyword table.
    pub tokens: usize,
    /// Union of the languages of all keyword hits.
    pub typeset: Lang,
    /// Hits per language, indexed like [`LANGUAGE_TYPES`].
    pub counts: [u32; 12],
    java_only: u32,
    objc_only: u32,
    cpp_only: u32,
    cpp_java: u32,
    c_cpp: u32,
    found_class: bool,
}

impl TokenTally {
    /// Tokenize `buf` and count keyword hits. C-family keywords inside
    /// `//` or `/* */` comments are ignored.
    pub fn scan(buf: &[u8]) -> Self {
        let mut tally = Self::default();
        let mut line_comment = false;
        let mut block_comment = false;

        for token in Tokenizer::new(buf) {
            if line_comment && token.starts_line {
                line_comment = false;
            }
            if block_comment && token.text == b"*/" {
                block_comment = false;
                continue;
            }
            let Some(lang) = lookup(token.text) else {
                continue;
            };
            tally.tokens += 1;
            tally.typeset |= lang;

            let family = lang & C_FAMILY;
            if !family.is_empty() {
                if line_comment || block_comment {
                    continue;
                }
                if family == Lang::JAVA {
                    tally.java_only += 1;
                } else if family == Lang::OBJC {
                    tally.objc_only += 1;
                } else if family == Lang::CPP {
                    tally.cpp_only += 1;
                } else if family == Lang::CPP | Lang::JAVA {
                    tally.cpp_java += 1;
                    if token.text == b"class" {
                        tally.found_class = true;
                    }
                } else if family == Lang::C | Lang::CPP {
                    tally.c_cpp += 1;
                } else if token.text == b"//" {
                    line_comment = true;
                } else if token.text == b"/*" {
                    block_comment = true;
                }
            }

            for flag in lang.iter() {
                tally.counts[language_index(flag)] += 1;
            }
        }
        tally
    }

    pub fn has_c_family(&self) -> bool {
        self.typeset.intersects(C_FAMILY)
    }

    fn count(&self, lang: Lang) -> u32 {
        self.counts[language_index(lang)]
    }

    /// Decide between C, C++, Java and Objective-C when every keyword seen
    /// belongs to those languages.
    pub fn c_family_pick(&self) -> Option<&'static str> {
        if !self.has_c_family() || !C_FAMILY.contains(self.typeset) {
            return None;
        }
        let mime = |lang: Lang| LANGUAGE_TYPES[language_index(lang)].mime;

        if self.java_only > 1 && self.found_class {
            Some(mime(Lang::JAVA))
        } else if self.cpp_java > 1 {
            if self.count(Lang::JAVA) < self.count(Lang::CPP) {
                Some(mime(Lang::CPP))
            } else {
                Some(mime(Lang::JAVA))
            }
        } else if self.c_cpp + self.cpp_only > 1 {
            if self.cpp_only > 0 {
                Some(mime(Lang::CPP))
            } else {
                Some(mime(Lang::C))
            }
        } else if self.objc_only > 0 {
            Some(mime(Lang::OBJC))
        } else {
            None
        }
    }

    /// Score every language with at least two hits and pick the best.
    /// Java needs a `class` keyword to win.
    pub fn weighted_pick(&self) -> Option<(&'static str, u8)> {
        let mut best: Option<(usize, f64)> = None;
        let mut sum = 0.0;
        for (i, t) in LANGUAGE_TYPES.iter().enumerate() {
            if self.counts[i] <= 1 {
                continue;
            }
            let score = f64::from(self.counts[i]) / f64::from(t.keywords) * t.weight;
            sum += score;
            if best.map_or(score > 0.0, |(_, max)| score > max) {
                best = Some((i, score));
            }
        }

        let (i, score) = best?;
        let lang = LANGUAGE_TYPES[i].lang;
        if lang == Lang::JAVA && !self.found_class {
            return None;
        }
        let accuracy = (score / sum * WEIGHTED_BAND) as u8;
        debug!(
            mime = LANGUAGE_TYPES[i].mime,
            score,
            sum,
            accuracy,
            "Weighted language pick"
        );
        Some((LANGUAGE_TYPES[i].mime, accuracy))
    }
}
