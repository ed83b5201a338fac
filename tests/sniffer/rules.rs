use crate::common::fixtures;
use crate::common::test_utils::{create_temp_file, engine_from_rules};
use mimemagic::sniffer::MIME_BINARY_UNKNOWN;
use mimemagic::{MagicConfig, MagicError, MagicResult, MimeMagic, ParseWarning, RuleTable};

const LIMIT: u64 = 1024 * 1024;

#[test]
fn load_rule_file_from_disk() {
    let file = create_temp_file(
        b"# custom rules\n\
          0\tstring\tMYFMT\tapplication/x-myformat\n\
          >5\tbyte\t2\tapplication/x-myformat-v2\n",
    );
    let (table, report) = RuleTable::load_file(file.path(), LIMIT).unwrap();
    assert!(report.is_clean());
    assert_eq!(report.lines, 3);
    assert_eq!(report.rules_loaded, 2);
    assert_eq!(table.len(), 2);
    assert_eq!(table.rules()[1].line, 3);

    let magic = MimeMagic::new(table);
    assert_eq!(
        magic.classify(b"MYFMT\x02payload"),
        MagicResult::certain("application/x-myformat-v2")
    );
    assert_eq!(
        magic.classify(b"MYFMT\x01payload"),
        MagicResult::certain("application/x-myformat")
    );
}

#[test]
fn missing_and_oversized_rule_files() {
    let err = RuleTable::load_file("/nonexistent/magic", LIMIT).unwrap_err();
    assert!(matches!(err, MagicError::RuleFile { .. }));

    let file = create_temp_file(&[b'#'; 64]);
    let err = RuleTable::load_file(file.path(), 16).unwrap_err();
    assert!(matches!(
        err,
        MagicError::RuleFileTooLarge {
            limit: 16,
            found: 64,
            ..
        }
    ));
}

#[test]
fn malformed_lines_are_reported_and_skipped() {
    let (table, report) = RuleTable::parse_str(
        "0\tstring\tGOOD\tapplication/x-good\n\
         0\tfrobnicate\t1\tapplication/x-bad\n\
         >4\tbyte\t1\tapplication/x-bad-child\n\
         0\tstring\tALSO\tapplication/x-also\n\
         >>4\tbyte\t1\tapplication/x-skip\n",
    );
    assert_eq!(table.len(), 2);
    assert_eq!(report.errors, 3);
    let found: Vec<(usize, ParseWarning)> = report
        .warnings
        .iter()
        .map(|w| (w.line, w.warning.clone()))
        .collect();
    assert_eq!(
        found,
        vec![
            (2, ParseWarning::UnknownType("frobnicate".to_string())),
            (3, ParseWarning::OrphanContinuation),
            (
                5,
                ParseWarning::LevelSkip {
                    previous: 0,
                    found: 2
                }
            ),
        ]
    );
}

#[test]
fn parsing_is_deterministic() {
    let text = mimemagic::sniffer::BUILTIN_MAGIC;
    let (first, _) = RuleTable::parse_str(text);
    let (second, _) = RuleTable::parse_str(text);
    assert_eq!(first, second);
}

#[test]
fn merged_rules_come_after_existing_ones() {
    let mut magic = engine_from_rules("0\tstring\tAB\tapplication/x-first\n");
    let snippet = create_temp_file(b"0\tstring\tABC\tapplication/x-second\n");
    let report = magic.merge_file(snippet.path()).unwrap();
    assert_eq!(report.rules_loaded, 1);
    assert_eq!(magic.table().len(), 2);
    // the earlier, less specific rule still wins
    assert_eq!(magic.classify(b"ABCD").mime_type, "application/x-first");
    assert_eq!(magic.classify(b"AB").mime_type, "application/x-first");

    magic.merge_str("0\tstring\tXY\tapplication/x-third\n");
    assert_eq!(magic.classify(b"XYZ").mime_type, "application/x-third");
}

#[test]
fn failed_continuations_skip_their_subtree() {
    let (table, report) = RuleTable::parse_str(
        "0\tstring\tTOP\tapplication/x-top\n\
         >3\tbyte\t1\tapplication/x-one\n\
         >>4\tbyte\t9\tapplication/x-one-nine\n\
         >3\tbyte\t2\tapplication/x-two\n",
    );
    assert!(report.is_clean());

    let mut evaluated = Vec::new();
    let result = table.find_match_with(b"TOP\x02\x09", &mut |rule| evaluated.push(rule.line));
    assert_eq!(result, Some(MagicResult::certain("application/x-two")));
    assert_eq!(evaluated, vec![1, 2, 4]);

    evaluated.clear();
    let result = table.find_match_with(b"NOPE\x01", &mut |rule| evaluated.push(rule.line));
    assert_eq!(result, None);
    assert_eq!(evaluated, vec![1]);
}

#[test]
fn deepest_matching_description_wins() {
    let magic = MimeMagic::builtin();
    let mut header = fixtures::elf_header(2);
    assert_eq!(magic.classify(&header).mime_type, "application/x-executable");
    header[16] = 4;
    assert_eq!(magic.classify(&header).mime_type, "application/x-core");
}

#[test]
fn engine_from_rule_file() {
    let file = create_temp_file(b"0\tlelong\t0xcafed00d\tapplication/x-cafe\n");
    let (magic, report) = MimeMagic::from_file(file.path(), MagicConfig::default()).unwrap();
    assert!(report.is_clean());
    assert_eq!(
        magic.classify(&0xcafe_d00du32.to_le_bytes()).mime_type,
        "application/x-cafe"
    );
    assert_ne!(
        magic.classify(&0xcafe_d00du32.to_be_bytes()).mime_type,
        "application/x-cafe"
    );
    assert_eq!(
        magic.classify(&[0xFF, 0x00, 0x80, 0x01]),
        MagicResult::new(MIME_BINARY_UNKNOWN, 0)
    );
}
