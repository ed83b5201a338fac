#![no_main]
use libfuzzer_sys::fuzz_target;
use mimemagic::RuleTable;

fuzz_target!(|data: &[u8]| {
    let mut table = RuleTable::new();
    let report = table.merge_bytes(data, "<fuzz>");
    assert_eq!(report.rules_loaded, table.len());
    // Every loaded rule must be safe to run against arbitrary input.
    let _ = table.find_match(data);
});
