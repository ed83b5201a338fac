//! Keyword and language weight tables for the text classifier.

use bitflags::bitflags;
use once_cell::sync::Lazy;
use std::collections::HashMap;

bitflags! {
    /// Languages a keyword is evidence for.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Lang: u16 {
        const HTML = 0x001;
        const C = 0x002;
        const MAKE = 0x004;
        const PLI = 0x008;
        const ASM = 0x010;
        const PASCAL = 0x020;
        const JAVA = 0x040;
        const CPP = 0x080;
        const MAIL = 0x100;
        const NEWS = 0x200;
        const DIFF = 0x400;
        const OBJC = 0x800;
    }
}

impl Default for Lang {
    fn default() -> Self {
        Lang::empty()
    }
}

/// Languages whose keywords need disambiguation against each other.
pub const C_FAMILY: Lang = Lang::C
    .union(Lang::CPP)
    .union(Lang::JAVA)
    .union(Lang::OBJC);

/// Per-language scoring data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LanguageType {
    pub lang: Lang,
    pub mime: &'static str,
    /// Number of distinct keywords in [`KEYWORDS`] for this language.
    pub keywords: u32,
    pub weight: f64,
}

/// Scoring table, ordered by flag bit.
pub static LANGUAGE_TYPES: [LanguageType; 12] = [
    LanguageType { lang: Lang::HTML, mime: "text/html", keywords: 19, weight: 2.0 },
    LanguageType { lang: Lang::C, mime: "text/x-c", keywords: 13, weight: 1.0 },
    LanguageType { lang: Lang::MAKE, mime: "text/x-makefile", keywords: 4, weight: 1.9 },
    LanguageType { lang: Lang::PLI, mime: "text/x-pli", keywords: 1, weight: 3.0 },
    LanguageType { lang: Lang::ASM, mime: "text/x-assembler", keywords: 6, weight: 2.1 },
    LanguageType { lang: Lang::PASCAL, mime: "text/x-pascal", keywords: 1, weight: 1.0 },
    LanguageType { lang: Lang::JAVA, mime: "text/x-java", keywords: 12, weight: 1.0 },
    LanguageType { lang: Lang::CPP, mime: "text/x-c++", keywords: 19, weight: 1.0 },
    LanguageType { lang: Lang::MAIL, mime: "message/rfc822", keywords: 4, weight: 1.9 },
    LanguageType { lang: Lang::NEWS, mime: "message/news", keywords: 3, weight: 2.0 },
    LanguageType { lang: Lang::DIFF, mime: "text/x-diff", keywords: 4, weight: 2.0 },
    LanguageType { lang: Lang::OBJC, mime: "text/x-objc", keywords: 10, weight: 1.0 },
];

/// Index of `lang` (a single flag) in [`LANGUAGE_TYPES`].
pub fn language_index(lang: Lang) -> usize {
    lang.bits().trailing_zeros() as usize
}

const C_CPP: Lang = Lang::C.union(Lang::CPP);
const CPP_JAVA: Lang = Lang::CPP.union(Lang::JAVA);

/// Recognized tokens and the languages they suggest.
pub static KEYWORDS: &[(&str, Lang)] = &[
    ("<html", Lang::HTML),
    ("<HTML", Lang::HTML),
    ("<head", Lang::HTML),
    ("<HEAD", Lang::HTML),
    ("<body", Lang::HTML),
    ("<BODY", Lang::HTML),
    ("<title", Lang::HTML),
    ("<TITLE", Lang::HTML),
    ("<h1", Lang::HTML),
    ("<H1", Lang::HTML),
    ("<a", Lang::HTML),
    ("<A", Lang::HTML),
    ("<img", Lang::HTML),
    ("<IMG", Lang::HTML),
    ("<!--", Lang::HTML),
    ("<!doctype", Lang::HTML),
    ("<!DOCTYPE", Lang::HTML),
    ("<div", Lang::HTML),
    ("<DIV", Lang::HTML),
    ("<frame", Lang::HTML),
    ("<FRAME", Lang::HTML),
    ("<frameset", Lang::HTML),
    ("<FRAMESET", Lang::HTML),
    ("<script", Lang::HTML),
    ("<SCRIPT", Lang::HTML),
    ("/*", C_FAMILY),
    ("//", C_FAMILY),
    ("#include", C_CPP),
    ("#ifdef", C_CPP),
    ("#ifndef", C_CPP),
    ("bool", C_CPP),
    ("char", C_FAMILY),
    ("int", C_FAMILY),
    ("float", C_FAMILY),
    ("void", C_FAMILY),
    ("extern", C_CPP),
    ("struct", C_CPP),
    ("union", C_CPP),
    ("implements", Lang::JAVA),
    ("super", Lang::JAVA),
    ("import", Lang::JAVA),
    ("class", CPP_JAVA),
    ("public", CPP_JAVA),
    ("private", CPP_JAVA),
    ("explicit", Lang::CPP),
    ("virtual", Lang::CPP),
    ("namespace", Lang::CPP),
    ("#import", Lang::OBJC),
    ("@interface", Lang::OBJC),
    ("@implementation", Lang::OBJC),
    ("@protocol", Lang::OBJC),
    ("CFLAGS", Lang::MAKE),
    ("LDFLAGS", Lang::MAKE),
    ("all:", Lang::MAKE),
    (".PHONY:", Lang::MAKE),
    ("srcdir", Lang::MAKE),
    ("exec_prefix", Lang::MAKE),
    (".ascii", Lang::ASM),
    (".asciiz", Lang::ASM),
    (".byte", Lang::ASM),
    (".even", Lang::ASM),
    (".globl", Lang::ASM),
    ("clr", Lang::ASM),
    ("(input", Lang::PASCAL),
    ("dcl", Lang::PLI),
    ("Received:", Lang::MAIL),
    ("Return-Path:", Lang::MAIL),
    ("Cc:", Lang::MAIL),
    ("Newsgroups:", Lang::NEWS),
    ("Path:", Lang::NEWS),
    ("Organization:", Lang::NEWS),
    ("---", Lang::DIFF),
    ("+++", Lang::DIFF),
    ("***", Lang::DIFF),
    ("@@", Lang::DIFF),
];

static KEYWORD_INDEX: Lazy<HashMap<&'static [u8], Lang>> = Lazy::new(|| {
    KEYWORDS
        .iter()
        .map(|(name, lang)| (name.as_bytes(), *lang))
        .collect()
});

/// Languages suggested by an exact token match.
pub fn lookup(token: &[u8]) -> Option<Lang> {
    KEYWORD_INDEX.get(token).copied()
}
