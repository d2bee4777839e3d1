use codetable::codetable::format::layout::{MAX_CODE_LEN, MAX_WORD_BYTES, PADDING_SIZE};
use codetable::{
    build, decode, CodeTableBuilder, CodeTableError, CodeTableReader, PairOutcome, Record,
    HEADER_SIZE,
};

const SAMPLE: &[(&str, &str)] = &[
    ("wo", "我"),
    ("ni", "你"),
    ("nihao", "你好"),
    ("an", "安"),
    ("ni", "尼"),
    ("zhong", "中"),
    ("a", "啊"),
    ("ni", "你"),
    ("xx", "𠀀"),
    ("an", "按"),
];

fn pairs(records: &[Record]) -> Vec<(&str, &str)> {
    records.iter().map(|r| (r.code(), r.word())).collect()
}

fn decode_file(bytes: &[u8]) -> Vec<Record> {
    decode(bytes, HEADER_SIZE)
        .map(|r| r.expect("record ok"))
        .collect()
}

#[test]
fn decode_of_build_is_the_sorted_deduplicated_input() {
    let table = build(SAMPLE.iter().copied()).expect("build");
    let decoded = decode_file(&table.bytes);

    assert_eq!(
        pairs(&decoded),
        vec![
            ("a", "啊"),
            ("an", "安"),
            ("an", "按"),
            ("ni", "你"),
            ("ni", "尼"),
            ("nihao", "你好"),
            ("wo", "我"),
            ("xx", "𠀀"),
            ("zhong", "中"),
        ]
    );
    assert_eq!(decoded, table.records);
    assert_eq!(table.summary.input, SAMPLE.len());
    assert_eq!(table.summary.accepted, 9);
    assert_eq!(table.summary.duplicates, 1);
}

#[test]
fn index_is_monotonic_and_ends_at_data_length() {
    let table = build(SAMPLE.iter().copied()).expect("build");
    let entries = table.index.entries();

    assert_eq!(entries[0], 0);
    assert!(entries.windows(2).all(|w| w[0] <= w[1]));
    assert!(table.index.is_monotonic());
    assert_eq!(table.index.data_len() as usize, table.data_region().len());
    assert_eq!(table.bytes.len(), HEADER_SIZE + table.data_region().len());
}

#[test]
fn every_group_holds_exactly_its_letter() {
    let table = build(SAMPLE.iter().copied()).expect("build");
    let reader = CodeTableReader::from_bytes(table.bytes.clone());

    let mut total = 0;
    for letter in 'a'..='z' {
        let group: Vec<Record> = reader
            .iter_letter(letter)
            .expect("group")
            .map(|r| r.expect("record ok"))
            .collect();
        assert!(
            group.iter().all(|r| r.code().starts_with(letter)),
            "foreign record in group {}",
            letter
        );
        let expected = table
            .records
            .iter()
            .filter(|r| r.code().starts_with(letter))
            .count();
        assert_eq!(group.len(), expected, "group size mismatch for {}", letter);
        total += group.len();
    }
    assert_eq!(total, table.records.len());
}

#[test]
fn duplicates_do_not_change_the_file() {
    let deduped: Vec<(&str, &str)> = vec![("ni", "你"), ("an", "安"), ("wo", "我")];
    let mut noisy = deduped.clone();
    noisy.extend(deduped.iter().copied());
    noisy.push(("ni", "你"));

    let clean = build(deduped).expect("build clean");
    let dirty = build(noisy).expect("build noisy");
    assert_eq!(clean.bytes, dirty.bytes);
    assert_eq!(dirty.summary.duplicates, 4);
}

#[test]
fn length_limits_sit_on_the_one_byte_fields() {
    assert_eq!(MAX_CODE_LEN, 255);
    assert_eq!(MAX_WORD_BYTES, 253);

    let longest_code = "q".repeat(255);
    assert!(Record::new(longest_code.as_str(), "x").is_ok());
    assert!(matches!(
        Record::new("q".repeat(256), "x"),
        Err(CodeTableError::RecordTooLarge { code_len: 256, .. })
    ));

    // UTF-16 text is always an even number of bytes: 252 is the largest
    // word that fits, 254 the smallest that does not.
    let fits = "字".repeat(126);
    let too_long = "字".repeat(127);
    assert!(Record::new("zi", fits.as_str()).is_ok());
    assert!(matches!(
        Record::new("zi", too_long.as_str()),
        Err(CodeTableError::RecordTooLarge { word_len: 254, .. })
    ));

    let table = build([
        (longest_code.as_str(), "x"),
        ("zi", fits.as_str()),
        ("zi", too_long.as_str()),
        ("ab", "ok"),
    ])
    .expect("build keeps going past a rejected record");
    assert_eq!(table.records.len(), 3);
    assert_eq!(table.summary.rejected_count(), 1);
    assert_eq!(table.summary.rejected[0].word, too_long);

    let decoded = decode_file(&table.bytes);
    assert_eq!(decoded[1].code(), longest_code);
    assert_eq!(decoded[2].word(), fits);
}

#[test]
fn two_record_scenario_has_expected_offsets() {
    let table = build([("ni", "你"), ("ni", "你"), ("an", "安")]).expect("build");

    let record_size = 2 + 4 + PADDING_SIZE;
    assert_eq!(record_size, 12);
    let entries = table.index.entries();
    assert_eq!(entries[0], 0);
    assert_eq!(entries[1], 12); // a
    assert!(entries[2..=13].iter().all(|&e| e == 12)); // b..m
    assert_eq!(entries[14], 24); // n
    assert!(entries[15..].iter().all(|&e| e == 24)); // o..z
    assert_eq!(table.bytes.len(), HEADER_SIZE + 24);

    assert_eq!(table.index.letter_range('a'), Some(0..12));
    assert_eq!(table.index.letter_range('m'), Some(12..12));
    assert_eq!(table.index.letter_range('n'), Some(12..24));

    let decoded = decode_file(&table.bytes);
    assert_eq!(pairs(&decoded), vec![("an", "安"), ("ni", "你")]);
}

#[test]
fn index_offsets_seek_into_the_data_region() {
    let table = build(SAMPLE.iter().copied()).expect("build");
    let n_start = table.index.letter_range('n').expect("range").start as usize;

    let from_n: Vec<Record> = decode(&table.bytes, HEADER_SIZE + n_start)
        .map(|r| r.expect("record ok"))
        .collect();
    assert_eq!(from_n[0].code(), "ni");
    assert!(from_n.iter().all(|r| r.leading_letter() >= b'n'));
}

#[test]
fn empty_build_is_a_bare_header() {
    let table = build(Vec::<(String, String)>::new()).expect("build");
    assert_eq!(table.bytes, vec![0u8; HEADER_SIZE]);
    assert!(decode_file(&table.bytes).is_empty());
}

#[test]
fn malformed_words_are_skipped_without_losing_sync() {
    let table = build([("an", "安"), ("ni", "你"), ("wo", "我")]).expect("build");
    let mut bytes = table.bytes.clone();
    // second record starts 12 bytes into the data region; word at +4
    let word_at = HEADER_SIZE + 12 + 4;
    bytes[word_at] = 0x00;
    bytes[word_at + 1] = 0xDC; // lone low surrogate

    let reader = CodeTableReader::from_bytes(bytes);
    let report = reader.decode_all();
    assert_eq!(pairs(&report.records), vec![("an", "安"), ("wo", "我")]);
    assert_eq!(report.skipped_count(), 1);
    assert_eq!(report.skipped[0].offset, HEADER_SIZE + 12);
    assert!(matches!(
        report.skipped[0].error,
        CodeTableError::InvalidEncoding { field: "word", .. }
    ));
    assert!(report.skipped[0].error.is_recoverable());
    assert!(report.truncated.is_none());
}

#[test]
fn odd_word_length_is_skipped() {
    let table = build([("an", "安"), ("ni", "你")]).expect("build");
    let mut bytes = table.bytes.clone();
    // first record: M=2, N=4 -> make N=5 and insert one extra word byte
    bytes[HEADER_SIZE + 1] = 5;
    bytes.insert(HEADER_SIZE + 6, 0x00);

    let report = CodeTableReader::from_bytes(bytes).decode_all();
    assert_eq!(pairs(&report.records), vec![("ni", "你")]);
    assert!(matches!(
        report.skipped[0].error,
        CodeTableError::InvalidLength { field: "word", length: 3, .. }
    ));
}

#[test]
fn truncation_stops_the_scan_after_earlier_records() {
    let table = build([("an", "安"), ("ni", "你")]).expect("build");
    let cut = &table.bytes[..table.bytes.len() - 3];

    let mut iter = decode(cut, HEADER_SIZE);
    assert_eq!(iter.next().unwrap().unwrap().code(), "an");
    let err = iter.next().unwrap().unwrap_err();
    assert!(matches!(
        err,
        CodeTableError::TruncatedRecord { field: "padding", available: 3, .. }
    ));
    assert!(!err.is_recoverable());
    assert!(iter.next().is_none());

    let report = CodeTableReader::from_bytes(cut.to_vec()).decode_all();
    assert_eq!(report.processed(), 1);
    assert!(report.truncated.is_some());
    assert!(!report.is_clean());
}

#[test]
fn iterator_restarts_from_its_origin() {
    let table = build(SAMPLE.iter().copied()).expect("build");
    let mut iter = decode(&table.bytes, HEADER_SIZE);

    let first: Vec<Record> = iter.by_ref().map(|r| r.unwrap()).collect();
    assert_eq!(iter.position(), table.bytes.len());
    assert!(iter.next().is_none());

    iter.restart();
    assert_eq!(iter.position(), HEADER_SIZE);
    let second: Vec<Record> = iter.map(|r| r.unwrap()).collect();
    assert_eq!(first, second);
}

#[test]
fn raw_lines_are_normalized_and_filtered() {
    let mut builder = CodeTableBuilder::new();
    assert_eq!(builder.add_line("  ni \t 你   好 "), PairOutcome::Accepted);
    assert_eq!(builder.add_line("ni 你 好"), PairOutcome::Duplicate);
    assert_eq!(builder.add_line("Ni 你"), PairOutcome::Filtered);
    assert_eq!(builder.add_line("1a 一"), PairOutcome::Filtered);
    assert_eq!(builder.add_line("lonely"), PairOutcome::Filtered);
    assert_eq!(builder.add_line(""), PairOutcome::Filtered);
    assert_eq!(builder.add_line("a-b 横"), PairOutcome::Rejected);
    assert_eq!(builder.add_pair("", "空"), PairOutcome::Filtered);
    assert_eq!(builder.len(), 1);

    let summary = builder.summary();
    assert_eq!(summary.input, 8);
    assert_eq!(summary.filtered, 5);
    assert!(matches!(
        summary.rejected[0].reason,
        CodeTableError::InvalidCode(_)
    ));

    let table = builder.build().expect("build");
    assert_eq!(pairs(&table.records), vec![("ni", "你 好")]);
}

#[test]
fn equal_codes_keep_first_seen_order() {
    let table = build([("ba", "二"), ("b", "八"), ("ba", "一"), ("b", "巴")]).expect("build");
    assert_eq!(
        pairs(&table.records),
        vec![("b", "八"), ("b", "巴"), ("ba", "二"), ("ba", "一")]
    );
}

#[test]
fn reader_opens_written_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("def3.bin");
    let table = build(SAMPLE.iter().copied()).expect("build");
    table.write_to(&path).expect("write");

    let reader = CodeTableReader::open(&path).expect("open");
    assert_eq!(reader.index_table().expect("index"), table.index);
    assert_eq!(reader.decode_all().records, table.records);
    assert!(matches!(
        reader.iter_letter('A'),
        Err(CodeTableError::InvalidCode(_))
    ));
}

#[test]
fn letter_ranges_outside_the_file_are_refused() {
    let table = build([("an", "安")]).expect("build");
    let cut = table.bytes[..table.bytes.len() - 1].to_vec();
    let reader = CodeTableReader::from_bytes(cut);
    assert!(matches!(
        reader.iter_letter('a'),
        Err(CodeTableError::InvalidFormat(_))
    ));
}
