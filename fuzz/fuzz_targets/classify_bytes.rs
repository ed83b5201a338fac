#![no_main]
use libfuzzer_sys::fuzz_target;
use mimemagic::MimeMagic;
use once_cell::sync::Lazy;

static MAGIC: Lazy<MimeMagic> = Lazy::new(MimeMagic::builtin);

fuzz_target!(|data: &[u8]| {
    let result = MAGIC.classify_named(data, "<fuzz>");
    assert!(result.accuracy <= 100);
});
