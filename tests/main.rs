use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::fs;
use std::io::{Read, Write};
use std::num::ParseIntError;

use assert_matches::assert_matches;
use bindarg::{
    impl_complex, options, BindingError, BindingParser, BindingRegistry, Bindings, Bytes,
    Choices, CoerceError, DescriptorBuilder, ParseError, Record, RecordSchema, TextFile,
    ValueError,
};
use flate2::write::GzEncoder;
use flate2::Compression;
use rstest::rstest;

#[derive(Debug, PartialEq, Record)]
struct Scalars {
    #[binding(default_str = "7")]
    count: i64,
    #[binding(default_str = "-2.5")]
    offset: f64,
    #[binding(default_str = "name")]
    label: String,
    #[binding(default_str = "abc")]
    payload: Bytes,
    #[binding(default_str = "200")]
    small: u8,
}

#[test]
fn scalar_defaults() {
    // Setup
    let parser = BindingParser::new("scalars").record::<Scalars>();

    // Execute
    let (scalars,): (Scalars,) = parser.parse_tokens(empty::slice()).unwrap();

    // Verify
    assert_eq!(
        scalars,
        Scalars {
            count: 7,
            offset: -2.5,
            label: "name".to_string(),
            payload: Bytes::from("abc"),
            small: 200,
        }
    );
}

#[test]
fn scalar_default_matches_supplied() {
    // Setup
    let parser = BindingParser::new("scalars").record::<Scalars>();

    // Execute
    let defaulted: Scalars = parser
        .try_parse_record_from(empty::slice::<&str>().iter().copied())
        .unwrap();
    let supplied: Scalars = parser
        .try_parse_record_from([
            "--count", "7", "--offset", "-2.5", "--label", "name", "--payload", "abc", "--small",
            "200",
        ])
        .unwrap();

    // Verify
    assert_eq!(defaulted, supplied);
}

#[test]
fn scalar_out_of_range() {
    // Setup
    let parser = BindingParser::new("scalars").record::<Scalars>();

    // Execute
    let result = parser.try_parse_record_from::<Scalars, _, _>(["--small", "300"]);

    // Verify
    assert_matches!(
        result,
        Err(ParseError::Value { field, source: ValueError::OutOfRange { .. } }) if field == "small"
    );
}

#[derive(Debug, PartialEq, Record)]
struct Sizes {
    #[binding(default = 0)]
    size: u64,
    #[binding(default = u64::MAX)]
    limit: u64,
    #[binding(default = i64::MIN)]
    floor: i64,
}

#[rstest]
#[case(vec![], 0, u64::MAX)]
#[case(vec!["--size", "18446744073709551615"], u64::MAX, u64::MAX)]
#[case(vec!["--limit", "9223372036854775808"], 0, 9_223_372_036_854_775_808)]
fn unsigned_beyond_i64(#[case] tokens: Vec<&str>, #[case] size: u64, #[case] limit: u64) {
    // Setup
    let parser = BindingParser::new("sizes").record::<Sizes>();

    // Execute
    let sizes: Sizes = parser.try_parse_record_from(tokens).unwrap();

    // Verify
    assert_eq!(
        sizes,
        Sizes {
            size,
            limit,
            floor: i64::MIN,
        }
    );
}

#[test]
fn unsigned_overflow() {
    // Setup
    let parser = BindingParser::new("sizes").record::<Sizes>();

    // Execute
    let result = parser.try_parse_record_from::<Sizes, _, _>(["--size", "18446744073709551616"]);

    // Verify
    assert_matches!(
        result,
        Err(ParseError::Value { field, source: ValueError::OutOfRange { target: "u64", .. } }) if field == "size"
    );
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Choices)]
enum Level {
    Debug,
    Info,
    DryRun,
    #[binding(value = "quiet")]
    Silent,
}

#[derive(Debug, Record)]
struct Logging {
    #[binding(default = Level::Info, help = "The log level.")]
    level: Level,
}

#[rstest]
#[case(vec![], Level::Info)]
#[case(vec!["--level", "debug"], Level::Debug)]
#[case(vec!["--level", "info"], Level::Info)]
#[case(vec!["--level", "dry-run"], Level::DryRun)]
#[case(vec!["--level", "quiet"], Level::Silent)]
fn choices_round_trip(#[case] tokens: Vec<&str>, #[case] expected: Level) {
    // Setup
    let parser = BindingParser::new("logging").record::<Logging>();

    // Execute
    let logging: Logging = parser.try_parse_record_from(tokens).unwrap();

    // Verify
    assert_eq!(logging.level, expected);
}

#[rstest]
#[case("loud")]
#[case("Debug")]
#[case("Silent")]
fn choices_unknown(#[case] raw: &str) {
    // Setup
    let parser = BindingParser::new("logging").record::<Logging>();

    // Execute
    let result = parser.try_parse_record_from::<Logging, _, _>(["--level", raw]);

    // Verify
    assert_matches!(
        result,
        Err(ParseError::Coerce { field, source: CoerceError::NoMatchingValue { value, .. } })
            if field == "level" && value == raw
    );
}

#[test]
fn choices_descriptor() {
    // Setup
    let schemas = [RecordSchema::of::<Logging>()];

    // Execute
    let bindings = Bindings::build(&schemas, &DescriptorBuilder::default()).unwrap();

    // Verify
    let level = bindings.get("level").unwrap();
    assert_eq!(
        level.choices().map(<[String]>::to_vec),
        Some(vec![
            "debug".to_string(),
            "info".to_string(),
            "dry-run".to_string(),
            "quiet".to_string(),
        ])
    );
    assert!(!level.required());
    assert_eq!(level.help_text(), "The log level. Optional. Default `info`.");
}

#[derive(Debug, Record)]
struct Separated {
    #[binding(sep = ",")]
    ids: Vec<i64>,
}

#[derive(Debug, Record)]
struct Repeated {
    ids: Vec<i64>,
}

#[test]
fn collection_separator() {
    // Setup
    let parser = BindingParser::new("separated").record::<Separated>();

    // Execute
    let separated: Separated = parser.try_parse_record_from(["--ids", "1,2,3"]).unwrap();

    // Verify
    assert_eq!(separated.ids, vec![1, 2, 3]);
}

#[rstest]
#[case(vec!["--ids", "1", "--ids", "2", "--ids", "3"])]
#[case(vec!["--ids", "1", "2", "3"])]
#[case(vec!["--ids", "1", "--ids", "2", "3"])]
fn collection_repeated(#[case] tokens: Vec<&str>) {
    // Setup
    let parser = BindingParser::new("repeated").record::<Repeated>();

    // Execute
    let repeated: Repeated = parser.try_parse_record_from(tokens).unwrap();

    // Verify
    assert_eq!(repeated.ids, vec![1, 2, 3]);
}

#[test]
fn collection_separator_bad_element() {
    // Setup
    let parser = BindingParser::new("separated").record::<Separated>();

    // Execute
    let result = parser.try_parse_record_from::<Separated, _, _>(["--ids", "1,x,3"]);

    // Verify
    assert_matches!(
        result,
        Err(ParseError::Coerce { field, source: CoerceError::InvalidScalar { value, .. } })
            if field == "ids" && value == "x"
    );
}

#[derive(Debug, Record)]
struct Containers {
    #[binding(default)]
    tags: HashSet<String>,
    #[binding(default)]
    queue: VecDeque<i64>,
    #[binding(default)]
    pair: Box<[i64]>,
    #[binding(sep = ":", default)]
    path: BTreeSet<String>,
}

#[test]
fn collection_containers() {
    // Setup
    let parser = BindingParser::new("containers").record::<Containers>();

    // Execute
    let containers: Containers = parser
        .try_parse_record_from([
            "--tags", "a", "b", "a", "--queue", "3", "1", "--pair", "4", "5", "--path", "x:y:x",
        ])
        .unwrap();

    // Verify
    assert_eq!(
        containers.tags,
        HashSet::from(["a".to_string(), "b".to_string()])
    );
    assert_eq!(containers.queue, VecDeque::from([3, 1]));
    assert_eq!(&*containers.pair, &[4, 5]);
    assert_eq!(
        containers.path,
        BTreeSet::from(["x".to_string(), "y".to_string()])
    );
}

#[test]
fn collection_containers_default() {
    // Setup
    let parser = BindingParser::new("containers").record::<Containers>();

    // Execute
    let containers: Containers = parser
        .try_parse_record_from(empty::slice::<&str>().iter().copied())
        .unwrap();

    // Verify
    assert!(containers.tags.is_empty());
    assert!(containers.queue.is_empty());
    assert!(containers.pair.is_empty());
    assert!(containers.path.is_empty());
}

#[derive(Debug, Record)]
struct Weights {
    #[binding(default)]
    weights: HashMap<String, i64>,
}

#[test]
fn dict_literal() {
    // Setup
    let parser = BindingParser::new("weights").record::<Weights>();

    // Execute
    let weights: Weights = parser
        .try_parse_record_from(["--weights", r#"{"a": 1}"#])
        .unwrap();

    // Verify
    assert_eq!(weights.weights, HashMap::from([("a".to_string(), 1)]));
}

#[test]
fn dict_file() {
    // Setup
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"a": 1}}"#).unwrap();
    let path = file.path().to_str().unwrap().to_string();
    let parser = BindingParser::new("weights").record::<Weights>();

    // Execute
    let weights: Weights = parser
        .try_parse_record_from(["--weights", path.as_str()])
        .unwrap();

    // Verify
    assert_eq!(weights.weights, HashMap::from([("a".to_string(), 1)]));
}

#[rstest]
#[case("not json")]
#[case("[1, 2]")]
fn dict_invalid(#[case] raw: &str) {
    // Setup
    let parser = BindingParser::new("weights").record::<Weights>();

    // Execute
    let result = parser.try_parse_record_from::<Weights, _, _>(["--weights", raw]);

    // Verify
    assert_matches!(result, Err(ParseError::Coerce { field, .. }) if field == "weights");
}

#[derive(Debug, Record)]
struct Untyped {
    #[binding(default)]
    settings: HashMap<String, serde_json::Value>,
}

#[test]
fn dict_untyped() {
    // Setup
    let parser = BindingParser::new("untyped").record::<Untyped>();

    // Execute
    let untyped: Untyped = parser
        .try_parse_record_from(["--settings", r#"{"layers": [1, 2], "name": "x"}"#])
        .unwrap();

    // Verify
    assert_eq!(untyped.settings["layers"], serde_json::json!([1, 2]));
    assert_eq!(untyped.settings["name"], serde_json::json!("x"));
}

#[derive(Debug, Record)]
struct Switches {
    #[binding(default = true)]
    cache: bool,
    #[binding(default = false, help = "Talk more.")]
    verbose: bool,
}

#[rstest]
#[case(vec![], true, false)]
#[case(vec!["--without-cache"], false, false)]
#[case(vec!["--without_cache"], false, false)]
#[case(vec!["--with-verbose"], true, true)]
#[case(vec!["--without-cache", "--with_verbose"], false, true)]
fn switches(#[case] tokens: Vec<&str>, #[case] cache: bool, #[case] verbose: bool) {
    // Setup
    let parser = BindingParser::new("switches").record::<Switches>();

    // Execute
    let switches: Switches = parser.try_parse_record_from(tokens).unwrap();

    // Verify
    assert_eq!(switches.cache, cache);
    assert_eq!(switches.verbose, verbose);
}

#[rstest]
#[case("--cache")]
#[case("--with-cache")]
#[case("--verbose")]
#[case("--without-verbose")]
fn switches_rejected(#[case] token: &str) {
    // Setup
    let parser = BindingParser::new("switches").record::<Switches>();

    // Execute
    let result = parser.try_parse_record_from::<Switches, _, _>([token]);

    // Verify
    assert_matches!(result, Err(ParseError::Engine(_)));
}

#[test]
fn switches_spellings() {
    // Setup
    let schemas = [RecordSchema::of::<Switches>()];

    // Execute
    let bindings = Bindings::build(&schemas, &DescriptorBuilder::default()).unwrap();

    // Verify
    assert_eq!(
        options(bindings.get("cache").unwrap()),
        vec!["--without-cache", "--without_cache"]
    );
    assert_eq!(
        options(bindings.get("verbose").unwrap()),
        vec!["--with-verbose", "--with_verbose"]
    );
    assert_eq!(
        bindings.get("verbose").unwrap().help_text(),
        "Talk more. Optional. verbose is disabled by default."
    );
}

#[derive(Debug, Record)]
struct TextSwitches {
    #[binding(default_str = "true")]
    cache: bool,
    #[binding(default_str = "false")]
    verbose: bool,
}

#[rstest]
#[case(vec![], true, false)]
#[case(vec!["--without-cache", "--with-verbose"], false, true)]
fn switches_text_default(#[case] tokens: Vec<&str>, #[case] cache: bool, #[case] verbose: bool) {
    // Setup
    let parser = BindingParser::new("switches").record::<TextSwitches>();

    // Execute
    let switches: TextSwitches = parser.try_parse_record_from(tokens).unwrap();

    // Verify
    assert_eq!(switches.cache, cache);
    assert_eq!(switches.verbose, verbose);
    let help = parser.render_help().unwrap();
    assert!(help.contains("--without-cache"), "{help}");
    assert!(help.contains("Optional. cache is enabled by default."), "{help}");
}

#[derive(Debug, Record)]
struct BadSwitch {
    #[binding(default_str = "on")]
    cache: bool,
}

#[test]
fn switches_text_default_invalid() {
    // Setup
    let parser = BindingParser::new("switches").record::<BadSwitch>();

    // Execute
    let result = parser.try_parse_record_from::<BadSwitch, _, _>(empty::slice::<&str>().iter().copied());

    // Verify
    assert_matches!(
        result,
        Err(ParseError::Binding(BindingError::DefaultCoercion { field, .. })) if field == "cache"
    );
}

#[derive(Debug, Record)]
struct Spelling {
    a: i64,
    long_param: i64,
}

#[rstest]
#[case(vec!["-a", "1", "--long_param", "2"])]
#[case(vec!["-a", "1", "--long-param", "2"])]
#[case(vec!["--long-param=2", "-a", "1"])]
fn spelling_short_and_long(#[case] tokens: Vec<&str>) {
    // Setup
    let parser = BindingParser::new("spelling").record::<Spelling>();

    // Execute
    let spelling: Spelling = parser.try_parse_record_from(tokens).unwrap();

    // Verify
    assert_eq!(spelling.a, 1);
    assert_eq!(spelling.long_param, 2);
}

#[test]
fn spelling_options() {
    // Setup
    let schemas = [RecordSchema::of::<Spelling>()];

    // Execute
    let bindings = Bindings::build(&schemas, &DescriptorBuilder::default()).unwrap();

    // Verify
    assert_eq!(options(bindings.get("a").unwrap()), vec!["-a"]);
    assert_eq!(
        options(bindings.get("long_param").unwrap()),
        vec!["--long-param", "--long_param"]
    );
}

#[rstest]
#[case(vec!["-a", "1"], "long_param")]
#[case(vec!["--long-param", "2"], "a")]
fn missing_required(#[case] tokens: Vec<&str>, #[case] missing: &str) {
    // Setup
    let parser = BindingParser::new("spelling").record::<Spelling>();

    // Execute
    let result = parser.try_parse_record_from::<Spelling, _, _>(tokens);

    // Verify
    assert_matches!(result, Err(ParseError::MissingRequired { field }) if field == missing);
}

#[test]
fn missing_required_exit_code() {
    // Setup
    let parser = BindingParser::new("spelling").record::<Spelling>();

    // Execute
    let result = parser.parse_tokens::<(Spelling,)>(&["-a", "1"]);

    // Verify
    assert_matches!(result, Err(1));
}

#[derive(Debug, PartialEq, Record)]
#[binding(name = "io")]
struct Io {
    #[binding(alias = "i")]
    input: String,
    #[binding(default_str = "out", alias = "o")]
    output_dir: String,
}

#[derive(Debug, PartialEq, Record)]
#[binding(name = "train")]
struct Train {
    #[binding(default_str = "checkpoints")]
    output_dir: String,
    #[binding(default = 10)]
    epochs: u32,
}

#[test]
fn merge_collision_later_wins() {
    // Setup
    let parser = BindingParser::for_records::<(Io, Train)>("train");

    // Execute
    let merged = parser.try_parse_merged_from(["-i", "data.txt"]).unwrap();

    // Verify
    assert_eq!(merged.records(), &["io", "train"]);
    assert_eq!(
        merged.names().collect::<Vec<_>>(),
        vec!["input", "output_dir", "epochs"]
    );
    assert_eq!(
        merged.get::<String>("output_dir").unwrap(),
        "checkpoints".to_string()
    );
    assert_eq!(
        merged.extract::<Io>().unwrap(),
        Io {
            input: "data.txt".to_string(),
            output_dir: "checkpoints".to_string(),
        }
    );
    assert_eq!(
        merged.extract::<Train>().unwrap(),
        Train {
            output_dir: "checkpoints".to_string(),
            epochs: 10,
        }
    );
}

#[test]
fn merge_collision_replaces_aliases() {
    // Setup
    let parser = BindingParser::for_records::<(Io, Train)>("train");

    // Execute
    let bindings = parser.bindings().unwrap();
    let result = parser.try_parse_merged_from(["-i", "data.txt", "-o", "elsewhere"]);

    // Verify
    assert_eq!(bindings.owner("output_dir"), Some("train"));
    assert!(bindings.get("output_dir").unwrap().aliases().is_empty());
    assert_matches!(result, Err(ParseError::Engine(_)));
}

#[test]
fn merge_order_matters() {
    // Setup
    let parser = BindingParser::for_records::<(Train, Io)>("train");

    // Execute
    let (train, io): (Train, Io) = parser
        .try_parse_from(["-i", "data.txt", "-o", "elsewhere"])
        .unwrap();

    // Verify
    assert_eq!(train.output_dir, "elsewhere");
    assert_eq!(io.output_dir, "elsewhere");
    assert_eq!(io.input, "data.txt");
}

#[derive(Debug, Record)]
struct Tuning {
    #[binding(literal = [1, 3, 5], default = 3)]
    retries: i64,
    #[binding(literal = ["fast", "slow"], default_str = "fast")]
    mode: String,
    #[binding(skip)]
    cache: Vec<String>,
}

#[test]
fn literal_and_skip() {
    // Setup
    let parser = BindingParser::new("tuning").record::<Tuning>();

    // Execute
    let defaulted: Tuning = parser
        .try_parse_record_from(empty::slice::<&str>().iter().copied())
        .unwrap();
    let supplied: Tuning = parser
        .try_parse_record_from(["--retries", "5", "--mode", "slow"])
        .unwrap();

    // Verify
    assert_eq!(defaulted.retries, 3);
    assert_eq!(defaulted.mode, "fast");
    assert!(defaulted.cache.is_empty());
    assert_eq!(supplied.retries, 5);
    assert_eq!(supplied.mode, "slow");
}

#[rstest]
#[case(vec!["--retries", "4"], "retries")]
#[case(vec!["--mode", "medium"], "mode")]
fn literal_rejects(#[case] tokens: Vec<&str>, #[case] field_name: &str) {
    // Setup
    let parser = BindingParser::new("tuning").record::<Tuning>();

    // Execute
    let result = parser.try_parse_record_from::<Tuning, _, _>(tokens);

    // Verify
    assert_matches!(
        result,
        Err(ParseError::Coerce { field, source: CoerceError::NoMatchingValue { .. } })
            if field == field_name
    );
}

#[test]
fn skip_is_not_an_option() {
    // Setup
    let parser = BindingParser::new("tuning").record::<Tuning>();

    // Execute
    let result = parser.try_parse_record_from::<Tuning, _, _>(["--cache", "x"]);

    // Verify
    assert_matches!(result, Err(ParseError::Engine(_)));
}

#[derive(Debug, Record)]
struct Protocol {
    #[binding(choices = ["1.0", "1.1"], default_str = "1.1")]
    protocol: f64,
}

#[rstest]
#[case(vec![], 1.1)]
#[case(vec!["--protocol", "1.0"], 1.0)]
#[case(vec!["--protocol", "1.00"], 1.0)]
fn explicit_choices(#[case] tokens: Vec<&str>, #[case] expected: f64) {
    // Setup
    let parser = BindingParser::new("protocol").record::<Protocol>();

    // Execute
    let protocol: Protocol = parser.try_parse_record_from(tokens).unwrap();

    // Verify
    assert_eq!(protocol.protocol, expected);
}

#[test]
fn explicit_choices_rejects() {
    // Setup
    let parser = BindingParser::new("protocol").record::<Protocol>();

    // Execute
    let result = parser.try_parse_record_from::<Protocol, _, _>(["--protocol", "2"]);

    // Verify
    assert_matches!(
        result,
        Err(ParseError::Coerce { source, .. })
            if source.to_string() == "invalid choice: '2' (choose from '1.0', '1.1')"
    );
}

#[derive(Debug, Record)]
struct Optional {
    #[binding(default = None)]
    threshold: Option<f64>,
}

#[rstest]
#[case(vec![], None)]
#[case(vec!["--threshold", "0.5"], Some(0.5))]
fn optional(#[case] tokens: Vec<&str>, #[case] expected: Option<f64>) {
    // Setup
    let parser = BindingParser::new("optional").record::<Optional>();

    // Execute
    let optional: Optional = parser.try_parse_record_from(tokens).unwrap();

    // Verify
    assert_eq!(optional.threshold, expected);
}

#[derive(Debug, Record)]
struct Reading {
    input: TextFile,
    #[binding(file, default = None)]
    notes: Option<String>,
}

#[test]
fn file_read() {
    // Setup
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "line one\nline two\n").unwrap();
    let path = file.path().to_str().unwrap().to_string();
    let parser = BindingParser::new("reading").record::<Reading>();

    // Execute
    let mut reading: Reading = parser
        .try_parse_record_from(["--input", path.as_str(), "--notes", path.as_str()])
        .unwrap();

    // Verify
    let mut content = String::new();
    reading.input.read_to_string(&mut content).unwrap();
    assert_eq!(content, "line one\nline two\n");
    assert_eq!(reading.notes.as_deref(), Some("line one\nline two\n"));
    assert_eq!(reading.input.path(), path);
}

#[test]
fn file_read_gzip() {
    // Setup
    let directory = tempfile::tempdir().unwrap();
    let path = directory.path().join("corpus.txt.gz");
    let mut encoder = GzEncoder::new(fs::File::create(&path).unwrap(), Compression::default());
    encoder.write_all(b"compressed\n").unwrap();
    encoder.finish().unwrap();
    let path = path.to_str().unwrap().to_string();
    let parser = BindingParser::new("reading").record::<Reading>();

    // Execute
    let mut reading: Reading = parser
        .try_parse_record_from(["--input", path.as_str()])
        .unwrap();

    // Verify
    let mut content = String::new();
    reading.input.read_to_string(&mut content).unwrap();
    assert_eq!(content, "compressed\n");
    assert_eq!(reading.notes, None);
}

#[test]
fn file_missing() {
    // Setup
    let directory = tempfile::tempdir().unwrap();
    let path = directory.path().join("absent.txt");
    let path = path.to_str().unwrap().to_string();
    let parser = BindingParser::new("reading").record::<Reading>();

    // Execute
    let result = parser.try_parse_record_from::<Reading, _, _>(["--input", path.as_str()]);

    // Verify
    assert_matches!(
        result,
        Err(ParseError::Coerce { field, source: CoerceError::CannotOpen { .. } }) if field == "input"
    );
}

#[derive(Debug, Record)]
struct Lines {
    input: TextFile,
}

#[derive(Debug, Record)]
struct Checksum {
    input: TextFile,
    #[binding(default = false)]
    strict: bool,
}

#[test]
fn file_shared_between_records() {
    // Setup
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "shared\n").unwrap();
    let path = file.path().to_str().unwrap().to_string();
    let parser = BindingParser::for_records::<(Lines, Checksum)>("shared");

    // Execute
    let (mut lines, checksum): (Lines, Checksum) = parser
        .try_parse_from(["--input", path.as_str()])
        .unwrap();

    // Verify
    let mut content = String::new();
    lines.input.read_to_string(&mut content).unwrap();
    assert_eq!(content, "shared\n");
    assert_eq!(checksum.input.path(), path);
    assert!(lines.input.same_stream(&checksum.input));
}

#[test]
fn file_extracted_twice() {
    // Setup
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "twice").unwrap();
    let path = file.path().to_str().unwrap().to_string();
    let parser = BindingParser::for_records::<(Lines, Checksum)>("shared");
    let merged = parser
        .try_parse_merged_from(["--input", path.as_str()])
        .unwrap();

    // Execute
    let mut first: Lines = merged.extract().unwrap();
    let second: Lines = merged.extract().unwrap();
    let checksum: Checksum = merged.extract().unwrap();

    // Verify
    let mut content = String::new();
    first.input.read_to_string(&mut content).unwrap();
    assert_eq!(content, "twice");
    assert!(second.input.same_stream(&checksum.input));
}

#[derive(Debug, Record)]
struct Writing {
    #[binding(file_mode = "w")]
    output: TextFile,
}

#[test]
fn file_write() {
    // Setup
    let directory = tempfile::tempdir().unwrap();
    let path = directory.path().join("result.txt");
    let path = path.to_str().unwrap().to_string();
    let parser = BindingParser::new("writing").record::<Writing>();

    // Execute
    let mut writing: Writing = parser
        .try_parse_record_from(["--output", path.as_str()])
        .unwrap();
    writeln!(writing.output, "written").unwrap();
    drop(writing);

    // Verify
    assert_eq!(fs::read_to_string(&path).unwrap(), "written\n");
}

#[derive(Debug, Clone, PartialEq)]
struct Endpoint {
    host: String,
    port: u16,
}

impl_complex!(Endpoint);

fn endpoint(raw: &str) -> Result<Endpoint, String> {
    let (host, port) = raw
        .rsplit_once(':')
        .ok_or_else(|| format!("'{raw}' is not HOST:PORT"))?;

    Ok(Endpoint {
        host: host.to_string(),
        port: port.parse().map_err(|error| format!("{error}"))?,
    })
}

#[derive(Debug, Record)]
struct Connection {
    #[binding(parse = endpoint, help = "The server, as HOST:PORT.")]
    server: Endpoint,
}

#[test]
fn parse_override() {
    // Setup
    let parser = BindingParser::new("connection").record::<Connection>();

    // Execute
    let connection: Connection = parser
        .try_parse_record_from(["--server", "localhost:8080"])
        .unwrap();

    // Verify
    assert_eq!(
        connection.server,
        Endpoint {
            host: "localhost".to_string(),
            port: 8080,
        }
    );
}

#[test]
fn parse_override_rejects() {
    // Setup
    let parser = BindingParser::new("connection").record::<Connection>();

    // Execute
    let result = parser.try_parse_record_from::<Connection, _, _>(["--server", "localhost"]);

    // Verify
    assert_matches!(
        result,
        Err(ParseError::Coerce { field, source: CoerceError::Custom(message) })
            if field == "server" && message == "'localhost' is not HOST:PORT"
    );
}

#[test]
fn parse_override_no_advisories() {
    // Setup
    let schemas = [RecordSchema::of::<Connection>()];

    // Execute
    let bindings = Bindings::build(&schemas, &DescriptorBuilder::default()).unwrap();

    // Verify
    assert!(bindings.get("server").unwrap().advisories().is_empty());
}

fn parse_count(raw: &str) -> Result<i64, ParseIntError> {
    raw.parse()
}

#[derive(Debug, Record)]
struct Wrapper<T> {
    #[binding(parse = parse_count)]
    value: T,
}

#[derive(Debug, Record)]
struct Bare<T> {
    value: T,
}

#[test]
fn generic_record() {
    // Setup
    let parser = BindingParser::new("wrapper").record::<Wrapper<i64>>();

    // Execute
    let wrapper: Wrapper<i64> = parser.try_parse_record_from(["--value", "4"]).unwrap();

    // Verify
    assert_eq!(wrapper.value, 4);
}

#[test]
fn generic_record_unbound() {
    // Setup
    let parser = BindingParser::new("bare").record::<Bare<i64>>();

    // Execute
    let result = parser.try_parse_record_from::<Bare<i64>, _, _>(["--value", "4"]);

    // Verify
    assert_matches!(
        result,
        Err(ParseError::Binding(BindingError::UnknownType { field })) if field == "value"
    );
}

#[test]
fn registry_drains() {
    // Setup
    let mut registry = BindingRegistry::new();
    registry
        .register::<Io>()
        .register::<Train>()
        .prog("train")
        .description("Train a model.");

    // Execute
    let (io, train): (Io, Train) = registry
        .try_parse_from(["-i", "data.txt", "--epochs", "3"])
        .unwrap();

    // Verify
    assert_eq!(io.input, "data.txt");
    assert_eq!(train.epochs, 3);
    assert!(registry.is_empty());
    assert_eq!(registry.meta().about, None);
}

#[test]
fn registry_reused() {
    // Setup
    let mut registry = BindingRegistry::new();
    registry.register::<Io>();
    let _: (Io,) = registry.try_parse_from(["-i", "first.txt"]).unwrap();

    // Execute
    registry.register::<Train>();
    let (train,): (Train,) = registry
        .try_parse_from(empty::slice::<&str>().iter().copied())
        .unwrap();

    // Verify
    assert_eq!(train.output_dir, "checkpoints");
    assert!(registry.is_empty());
}

#[test]
fn help_message() {
    // Setup
    let parser = BindingParser::for_records::<(Io, Train)>("train")
        .about("Train a model.")
        .epilog("See the manual.");

    // Execute
    let help = parser.render_help().unwrap();

    // Verify
    assert!(help.contains("Train a model."), "{help}");
    assert!(help.contains("-i, --input <INPUT>"), "{help}");
    assert!(help.contains("REQUIRED."), "{help}");
    assert!(help.contains("--output-dir <OUTPUT_DIR>"), "{help}");
    assert!(help.contains("See the manual."), "{help}");
}

#[test]
fn help_exit_code() {
    // Setup
    let parser = BindingParser::for_records::<(Io,)>("io");

    // Execute
    let result = parser.parse_tokens::<(Io,)>(&["--help"]);

    // Verify
    assert_matches!(result, Err(0));
}
