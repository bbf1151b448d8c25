use crate::error::ConfigError;
use crate::lookup::Lookup;
use crate::parser::{parse_line, ParseOptions};
use crate::shared::SharedConfig;
use crate::tree::*;
use crate::value::*;
use crate::{load_tree, merge_tree, parse_config, parse_config_with};

// ── Shared fixture runners ──────────────────────────────────────────

/// Embed fixture files at compile time.
const PARSE_FIXTURES: &str = include_str!("../test-data/fixtures/parse.json");
const ERROR_FIXTURES: &str = include_str!("../test-data/fixtures/errors.json");
const MARSHAL_FIXTURES: &str = include_str!("../test-data/fixtures/marshal.json");

/// Build a tree from a fixture's `input`: a single string is parsed, an
/// array of strings is combined chunk by chunk under the fixture's `policy`.
fn build_tree(fixture: &serde_json::Value) -> Result<ConfigTree, ConfigError> {
    let policy = fixture
        .get("policy")
        .and_then(|v| v.as_str())
        .unwrap_or("load");
    match &fixture["input"] {
        serde_json::Value::String(input) => parse_config(input),
        serde_json::Value::Array(chunks) => {
            let mut tree = ConfigTree::new();
            for chunk in chunks {
                let text = chunk.as_str().unwrap();
                match policy {
                    "merge" => tree.merge_text(text)?,
                    "load" => tree.load_text(text)?,
                    other => panic!("unknown policy '{}'", other),
                }
            }
            Ok(tree)
        }
        other => panic!("input must be a string or array, got {}", other),
    }
}

fn tree_as_json(tree: &ConfigTree) -> serde_json::Value {
    serde_json::from_str(&tree.to_json()).unwrap()
}

#[test]
fn test_fixture_parse() {
    let fixtures: Vec<serde_json::Value> = serde_json::from_str(PARSE_FIXTURES).unwrap();

    for fixture in &fixtures {
        let name = fixture["name"].as_str().unwrap();
        let tree = match build_tree(fixture) {
            Ok(tree) => tree,
            Err(err) => panic!("Fixture '{}': unexpected error: {}", name, err),
        };
        let got = tree_as_json(&tree);
        assert_eq!(
            got, fixture["expected"],
            "Fixture '{}': value mismatch\n  Got:      {}\n  Expected: {}",
            name, got, fixture["expected"]
        );
    }
}

#[test]
fn test_fixture_errors() {
    let fixtures: Vec<serde_json::Value> = serde_json::from_str(ERROR_FIXTURES).unwrap();

    for fixture in &fixtures {
        let name = fixture["name"].as_str().unwrap();
        let err = match build_tree(fixture) {
            Ok(tree) => panic!("Fixture '{}': expected an error, got {}", name, tree.to_json()),
            Err(err) => err,
        };
        assert!(
            err.is_type_mismatch(),
            "Fixture '{}': expected a type mismatch, got {:?}",
            name,
            err
        );
        assert_eq!(
            err.key(),
            fixture["key"].as_str(),
            "Fixture '{}': wrong key in {}",
            name,
            err
        );
        if let Some(line) = fixture.get("line").and_then(|v| v.as_u64()) {
            assert_eq!(
                err.line(),
                Some(line as usize),
                "Fixture '{}': wrong line in {}",
                name,
                err
            );
        }
    }
}

#[test]
fn test_fixture_marshal() {
    let fixtures: Vec<serde_json::Value> = serde_json::from_str(MARSHAL_FIXTURES).unwrap();

    for fixture in &fixtures {
        let name = fixture["name"].as_str().unwrap();
        let input = fixture["input"].as_str().unwrap();
        let expected = fixture["expected"].as_str().unwrap();

        let tree = parse_config(input).unwrap();
        let text = tree.marshal();
        assert_eq!(text, expected, "Fixture '{}': marshal mismatch", name);

        // The rendered text must load back to the same values.
        let reparsed = parse_config(&text).unwrap();
        assert_eq!(
            tree_as_json(&reparsed),
            tree_as_json(&tree),
            "Fixture '{}': values changed after a round trip",
            name
        );
    }
}

// ── Round trip & policy equivalence ─────────────────────────────────

const SAMPLE: &str = "# main configuration
; generated for tests
ip=127.0.0.1
port=80
languages=es
languages=en

database.user=admin
database.pass=\"1234
database.pool.size=10
database.pool.timeout=2.5
debug=off
ratio=1e-7
motto=\"\"quoted
flags=yes
flags=no
";

#[test]
fn test_round_trip_preserves_values() {
    let first = parse_config(SAMPLE).unwrap();
    let text = first.marshal();
    let second = parse_config(&text).unwrap();

    for key in [
        "ip",
        "port",
        "languages",
        "database.user",
        "database.pass",
        "database.pool.size",
        "database.pool.timeout",
        "debug",
        "ratio",
        "motto",
        "flags",
    ] {
        assert_eq!(first.get(key), second.get(key), "value of '{}' changed", key);
        assert!(second.get(key).is_some(), "'{}' missing after round trip", key);
    }
    assert_eq!(second.marshal(), text);
}

#[test]
fn test_round_trip_keeps_comments_in_place() {
    let tree = parse_config(SAMPLE).unwrap();
    let text = tree.marshal();
    assert!(text.starts_with("# main configuration\n; generated for tests\nip=127.0.0.1\n"));
    assert!(text.contains("languages=es\nlanguages=en\n\ndatabase.user=admin\n"));
}

#[test]
fn test_load_and_merge_agree_without_repeats() {
    let text = "a=1\nb=two\nc.d=true\n# note\ne=1.5";
    let mut loaded = ConfigTree::new();
    loaded.load_text(text).unwrap();
    let mut merged = ConfigTree::new();
    merged.merge_text(text).unwrap();
    assert_eq!(loaded, merged);
    assert_eq!(loaded, parse_config(text).unwrap());
}

#[test]
fn test_load_tree_and_merge_tree_agree_on_first_source() {
    let src = parse_config(SAMPLE).unwrap();
    let mut a = ConfigTree::new();
    a.load_tree(&src).unwrap();
    let mut b = ConfigTree::new();
    b.merge_tree(&src).unwrap();
    assert_eq!(a, src);
    assert_eq!(b, src);
    assert!(!a.is_multiple());
}

// ── Accumulation ────────────────────────────────────────────────────

#[test]
fn test_repeated_integers_coalesce_in_order() {
    let tree = parse_config("a=1\na=2\na=3").unwrap();
    assert_eq!(tree.get("a"), Some(&Value::IntegerArray(vec![1, 2, 3])));
}

#[test]
fn test_failed_load_leaves_destination_untouched() {
    let mut tree = ConfigTree::new();
    tree.load_text("b=2\n# kept").unwrap();
    let before = tree.clone();

    let err = tree.load_text("a=1\na=x").unwrap_err();
    assert!(err.is_type_mismatch());
    assert_eq!(tree, before);
    assert!(!tree.is_multiple());
}

#[test]
fn test_failed_merge_leaves_destination_untouched() {
    let mut tree = parse_config("a=1\nz=9").unwrap();
    let before = tree.clone();

    // `b` applies cleanly before `a` fails; neither may reach the destination.
    let err = tree.merge_text("b=new\na=x").unwrap_err();
    assert!(err.is_type_mismatch());
    assert_eq!(err.key(), Some("a"));
    assert_eq!(tree, before);
    assert_eq!(tree.get("b"), None);
}

#[test]
fn test_failed_add_leaves_key_untouched() {
    let mut tree = ConfigTree::new();
    tree.add("a", 1).unwrap();
    tree.add("a", 2).unwrap();
    let err = tree.add("a", true).unwrap_err();
    match err {
        ConfigError::TypeMismatch {
            key,
            existing,
            incoming,
        } => {
            assert_eq!(key, "a");
            assert_eq!(existing, ValueKind::IntegerArray);
            assert_eq!(incoming, ValueKind::Boolean);
        }
        other => panic!("expected TypeMismatch, got {:?}", other),
    }
    assert_eq!(tree.get("a"), Some(&Value::IntegerArray(vec![1, 2])));
}

#[test]
fn test_add_concatenates_arrays() {
    let mut tree = ConfigTree::new();
    tree.add("s", vec!["a", "b"]).unwrap();
    tree.add("s", "c").unwrap();
    tree.add("s", vec!["d"]).unwrap();
    assert_eq!(tree.get_string_array("s").unwrap(), vec!["a", "b", "c", "d"]);

    tree.add("f", 0.5).unwrap();
    tree.add("f", vec![1.5, 2.5]).unwrap();
    assert_eq!(tree.get("f"), Some(&Value::FloatArray(vec![0.5, 1.5, 2.5])));
}

#[test]
fn test_add_nested_creates_sub_trees_once() {
    let mut tree = ConfigTree::new();
    tree.add("db.host", "localhost").unwrap();
    tree.add("db.port", 5432).unwrap();
    tree.add("db.port", 5433).unwrap();
    assert_eq!(tree.keys().collect::<Vec<_>>(), vec!["db"]);
    let db = tree.get_sub_tree("db").unwrap();
    assert_eq!(db.keys().collect::<Vec<_>>(), vec!["host", "port"]);
    assert_eq!(db.get_int_array("port").unwrap(), vec![5432, 5433]);
}

#[test]
fn test_mismatch_reports_line_and_path() {
    let err = parse_config("# header\ndb.port=1\ndb.port=x").unwrap_err();
    assert_eq!(err.line(), Some(3));
    assert_eq!(err.key(), Some("db.port"));
    let message = err.to_string();
    assert!(message.starts_with("line 3:"), "{}", message);
    assert!(message.contains("db.port"), "{}", message);
}

// ── Type inference ──────────────────────────────────────────────────

#[test]
fn test_quote_forces_string() {
    let tree = parse_config("p=\"123").unwrap();
    assert_eq!(tree.get("p"), Some(&Value::String("123".to_string())));

    let tree = parse_config("p=\"\"12345").unwrap();
    assert_eq!(tree.get("p"), Some(&Value::String("\"12345".to_string())));
}

#[test]
fn test_boolean_words_in_arrays() {
    let tree = parse_config("t=yes\nt=true\nt=on\nf=no\nf=none\nf=false\nf=off").unwrap();
    assert_eq!(tree.get_bool_array("t").unwrap(), vec![true, true, true]);
    assert_eq!(tree.get_bool_array("f").unwrap(), vec![false, false, false, false]);

    let tree = parse_config("c=On").unwrap();
    assert_eq!(tree.get("c"), Some(&Value::String("On".to_string())));
}

#[test]
fn test_infer_numbers() {
    use crate::infer::infer;
    assert_eq!(infer("42"), Value::Integer(42));
    assert_eq!(infer("+7"), Value::Integer(7));
    assert_eq!(infer("-0"), Value::Integer(0));
    assert_eq!(infer("3.25"), Value::Float(3.25));
    assert_eq!(infer("-1E3"), Value::Float(-1000.0));
    assert_eq!(infer("1.2.3"), Value::String("1.2.3".to_string()));
    assert_eq!(infer("99999999999999999999"), Value::Float(1e20));
    assert_eq!(infer("12abc"), Value::String("12abc".to_string()));
}

// ── Line parser ─────────────────────────────────────────────────────

#[test]
fn test_parse_line_classification() {
    let options = ParseOptions::default();
    assert_eq!(
        parse_line(0, "   # indented comment", &options).unwrap(),
        crate::ast::Line::Comment("   # indented comment".to_string())
    );
    assert_eq!(
        parse_line(0, "", &options).unwrap(),
        crate::ast::Line::Comment(String::new())
    );
    assert_eq!(
        parse_line(0, "just words", &options).unwrap(),
        crate::ast::Line::Comment("just words".to_string())
    );
    assert_eq!(
        parse_line(3, "a . b += 5", &options).unwrap(),
        crate::ast::Line::Assign {
            key: "a.b".to_string(),
            assignment: Assignment::ForceAppend,
            value: Value::Integer(5),
        }
    );
    assert_eq!(
        parse_line(3, "name:=x", &options).unwrap(),
        crate::ast::Line::Assign {
            key: "name".to_string(),
            assignment: Assignment::ForceReplace,
            value: Value::String("x".to_string()),
        }
    );
}

#[test]
fn test_strict_mode_rejects_malformed_lines() {
    let strict = ParseOptions::strict();
    let err = parse_config_with("good=1\nbad key=2", &strict).unwrap_err();
    match err {
        ConfigError::MalformedInput { line, .. } => assert_eq!(line, Some(2)),
        other => panic!("expected MalformedInput, got {:?}", other),
    }

    let err = parse_config_with("=1", &strict).unwrap_err();
    assert_eq!(err.line(), Some(1));

    let tree = parse_config_with("good_key-1.sub=1\n# comment\nplain text", &strict).unwrap();
    assert_eq!(tree.get_int("good_key-1.sub"), Some(1));

    // Lenient parsing takes the key as written.
    let tree = parse_config("good=1\nbad key=2").unwrap();
    assert_eq!(tree.get_int("bad key"), Some(2));
    assert_eq!(tree.marshal(), "good=1\nbad key=2\n");
}

// ── Nesting & lookup ────────────────────────────────────────────────

#[test]
fn test_nested_sub_tree_access() {
    let tree = parse_config("a.b.c=v").unwrap();
    let a = tree.get_sub_tree("a").unwrap();
    let b = a.get_sub_tree("b").unwrap();
    assert_eq!(b.get("c"), Some(&Value::String("v".to_string())));
    assert_eq!(tree.get_string("a.b.c").as_deref(), Some("v"));
    assert!(tree.get_sub_tree("a.b.c").is_none());
}

#[test]
fn test_lookup_for_templates() {
    let tree = parse_config(
        "param1=value1\nparam3.data1=value3-data1\nparam3.data2=value3-data2\nparam4=\"123",
    )
    .unwrap();
    assert_eq!(tree.lookup_text("param1").as_deref(), Some("value1"));
    assert_eq!(tree.lookup_text("param3>data1").as_deref(), Some("value3-data1"));
    assert_eq!(tree.lookup_text("param3.data2").as_deref(), Some("value3-data2"));
    assert_eq!(tree.lookup_text("param4").as_deref(), Some("123"));
    assert!(tree.lookup("param3>").is_none());
    assert!(tree.lookup("missing>data1").is_none());
    assert!(tree.lookup_text("param3").is_none());
}

// ── Load vs merge of trees ──────────────────────────────────────────

#[test]
fn test_load_tree_replaces_merge_tree_accumulates() {
    let dst = parse_config("port=80").unwrap();
    let src = parse_config("port=8080").unwrap();

    let mut loaded = dst.clone();
    load_tree(&mut loaded, &src).unwrap();
    assert_eq!(loaded.get("port"), Some(&Value::Integer(8080)));
    assert!(loaded.is_multiple());

    let mut merged = dst.clone();
    merge_tree(&mut merged, &src).unwrap();
    assert_eq!(merged.get("port"), Some(&Value::IntegerArray(vec![80, 8080])));
    assert!(merged.is_multiple());
}

#[test]
fn test_combining_keeps_destination_order_and_comments() {
    let mut tree = parse_config("# global\nip=127.0.0.1\nport=80").unwrap();
    tree.load_text("# local\ntitle=Welcome\nport=8080").unwrap();
    assert_eq!(tree.keys().collect::<Vec<_>>(), vec!["ip", "port", "title"]);
    assert_eq!(
        tree.marshal(),
        "# global\nip=127.0.0.1\nport=8080\ntitle=Welcome\n"
    );
}

#[test]
fn test_empty_text_is_a_no_op() {
    let mut tree = parse_config("a=1").unwrap();
    tree.merge_text("").unwrap();
    assert!(!tree.is_multiple());
    assert_eq!(tree.len(), 1);
}

// ── Set / Del / Clone ───────────────────────────────────────────────

#[test]
fn test_set_replaces_and_keeps_position() {
    let mut tree = parse_config("a=1\na=2\nb=2").unwrap();
    tree.set("a", "x").unwrap();
    tree.set("a", "y").unwrap();
    tree.set("c", true).unwrap();
    assert_eq!(tree.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    assert_eq!(tree.get("a"), Some(&Value::String("y".to_string())));
    assert_eq!(tree.marshal(), "a=y\nb=2\nc=true\n");

    // set then add accumulates onto the new value
    tree.add("a", "z").unwrap();
    assert_eq!(tree.get_string_array("a").unwrap(), vec!["y", "z"]);
}

#[test]
fn test_set_nested_path() {
    let mut tree = ConfigTree::new();
    tree.set("server.http.port", 8080).unwrap();
    tree.set("server.http.port", 9090).unwrap();
    tree.set("server.name", "main").unwrap();
    assert_eq!(tree.get_int("server.http.port"), Some(9090));
    assert_eq!(tree.marshal(), "server.http.port=9090\nserver.name=main\n");
}

#[test]
fn test_del_removes_key_everywhere() {
    let mut tree = parse_config("# top\nk=1\nk=2\nj=2\ndb.host=x\ndb.port=1").unwrap();
    assert_eq!(tree.del("k"), Some(Value::IntegerArray(vec![1, 2])));
    assert!(tree.get("k").is_none());
    assert!(!tree.marshal().contains("k="));
    assert!(!tree.tokens().contains(&Token::Key("k".to_string())));

    assert!(tree.del("db.port").is_some());
    assert_eq!(tree.marshal(), "# top\nj=2\ndb.host=x\n");

    assert_eq!(tree.del_comment(0).as_deref(), Some("# top"));
    assert_eq!(tree.marshal(), "j=2\ndb.host=x\n");
    assert!(tree.del("missing").is_none());
}

#[test]
fn test_del_last_leaf_removes_empty_parent() {
    let mut tree = parse_config("a.b=1\nc=2\nx.y.z=3\nx.w=4").unwrap();
    assert_eq!(tree.del("a.b"), Some(Value::Integer(1)));
    assert!(tree.get("a").is_none());
    assert_eq!(tree.keys().collect::<Vec<_>>(), vec!["c", "x"]);

    // only the emptied level goes; x still holds w
    tree.del("x.y.z").unwrap();
    assert!(tree.get_sub_tree("x.y").is_none());
    assert_eq!(tree.get_int("x.w"), Some(4));
    assert_eq!(tree.marshal(), "c=2\nx.w=4\n");

    let reloaded = parse_config(&tree.marshal()).unwrap();
    assert_eq!(reloaded, tree);
}

#[test]
fn test_set_and_add_reject_keys_that_cannot_round_trip() {
    let mut tree = parse_config("x.y=1").unwrap();
    for bad in ["", "x.", ".x", "a..b", " a", "a=b", "#a", ";a", "a+", "a:", "a\nb"] {
        let err = tree.set(bad, 1).unwrap_err();
        assert!(
            matches!(err, ConfigError::MalformedInput { line: None, .. }),
            "set {:?}: expected MalformedInput, got {:?}",
            bad,
            err
        );
        let err = tree.add(bad, 2).unwrap_err();
        assert!(
            matches!(err, ConfigError::MalformedInput { line: None, .. }),
            "add {:?}: expected MalformedInput, got {:?}",
            bad,
            err
        );
    }
    assert_eq!(tree.marshal(), "x.y=1\n");

    tree.set("x.z", 2).unwrap();
    tree.add("x-1.y_2", "ok").unwrap();
    let reloaded = parse_config(&tree.marshal()).unwrap();
    assert_eq!(reloaded, tree);
}

#[test]
fn test_out_of_range_float_round_trips_as_text() {
    let tree = parse_config("big=1e400").unwrap();
    assert_eq!(tree.get("big"), Some(&Value::String("1e400".to_string())));
    let reloaded = parse_config(&tree.marshal()).unwrap();
    assert_eq!(reloaded.get("big"), tree.get("big"));
}

#[test]
fn test_clone_is_independent() {
    let original = parse_config("a=1\ndb.host=x\ndb.pool.size=5").unwrap();
    let mut copy = original.clone();

    copy.set("a", 2).unwrap();
    copy.set("db.host", "y").unwrap();
    copy.get_sub_tree_mut("db.pool").unwrap().add("size", 6).unwrap();
    copy.del("db.pool");

    assert_eq!(original.get_int("a"), Some(1));
    assert_eq!(original.get_string("db.host").as_deref(), Some("x"));
    assert_eq!(original.get_int("db.pool.size"), Some(5));
    assert_eq!(original.marshal(), "a=1\ndb.host=x\ndb.pool.size=5\n");
}

// ── Typed accessors ─────────────────────────────────────────────────

#[test]
fn test_typed_accessors_coerce() {
    let tree = parse_config("i=3\nf=2.75\nb=on\ns=text\nz=0\nsub.k=1").unwrap();

    assert_eq!(tree.get_int("f"), Some(2));
    assert_eq!(tree.get_int("b"), Some(1));
    assert_eq!(tree.get_int("s"), None);
    assert_eq!(tree.get_float("i"), Some(3.0));
    assert_eq!(tree.get_float("b"), Some(1.0));
    assert_eq!(tree.get_bool("i"), Some(true));
    assert_eq!(tree.get_bool("z"), Some(false));
    assert_eq!(tree.get_string("i").as_deref(), Some("3"));
    assert_eq!(tree.get_string("f").as_deref(), Some("2.75"));
    assert_eq!(tree.get_string("b").as_deref(), Some("true"));

    // sub-trees never coerce to scalars
    assert_eq!(tree.get_string("sub"), None);
    assert_eq!(tree.get_int("sub"), None);
    assert_eq!(tree.get_bool("sub"), None);

    assert_eq!(tree.get_int_array("i").unwrap(), vec![3]);
    assert_eq!(tree.get_float_array("i").unwrap(), vec![3.0]);
    assert_eq!(tree.get_string_array("s").unwrap(), vec!["text"]);
    assert_eq!(tree.get_string_array("i"), None);
    assert_eq!(tree.get_int("missing"), None);
}

#[test]
fn test_value_display() {
    let tree = parse_config("a=1\na=2\nf=1.0\ns=x\ns=y\nsub.k=1\nsub.j=2").unwrap();
    assert_eq!(tree.get("a").unwrap().to_string(), "[1, 2]");
    assert_eq!(tree.get("f").unwrap().to_string(), "1.0");
    assert_eq!(tree.get("s").unwrap().to_string(), "[x, y]");
    assert_eq!(tree.get("sub").unwrap().to_string(), "{k, j}");
}

// ── JSON Serialization Tests ────────────────────────────────────────

#[test]
fn test_json_nested() {
    let v = tree_as_json(&parse_config("a.b.c=1\na.d=x").unwrap());
    assert_eq!(v["a"]["b"]["c"], 1);
    assert_eq!(v["a"]["d"], "x");
}

#[test]
fn test_json_pretty_matches_compact() {
    let tree = parse_config(SAMPLE).unwrap();
    let compact: serde_json::Value = serde_json::from_str(&tree.to_json()).unwrap();
    let pretty: serde_json::Value = serde_json::from_str(&tree.to_json_pretty()).unwrap();
    assert_eq!(compact, pretty);
    assert!(tree.to_json_pretty().contains("\n  \"ip\": \"127.0.0.1\""));
}

#[test]
fn test_json_escapes_strings() {
    let mut tree = ConfigTree::new();
    tree.set("q", "say \"hi\"\\\t").unwrap();
    let v = tree_as_json(&tree);
    assert_eq!(v["q"], "say \"hi\"\\\t");
}

// ── Collaborators: files and shared trees ───────────────────────────

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("flatconf-{}-{}.conf", std::process::id(), name))
}

#[test]
fn test_file_load_merge_save() {
    let main = temp_path("main");
    let local = temp_path("local");
    std::fs::write(&main, "# main\nport=80\nhost=a\n").unwrap();
    std::fs::write(&local, "port=8080\n").unwrap();

    let mut tree = ConfigTree::new();
    tree.load_file(&main).unwrap();
    tree.merge_file(&local).unwrap();
    assert_eq!(tree.get_int_array("port").unwrap(), vec![80, 8080]);

    tree.save_file(&main).unwrap();
    assert_eq!(
        std::fs::read_to_string(&main).unwrap(),
        "# main\nport=80\nport=8080\nhost=a\n"
    );

    let _ = std::fs::remove_file(&main);
    let _ = std::fs::remove_file(&local);
}

#[test]
fn test_missing_file_is_source_unavailable() {
    let mut tree = ConfigTree::new();
    let err = tree.load_file(temp_path("does-not-exist")).unwrap_err();
    assert!(matches!(err, ConfigError::SourceUnavailable { .. }));
    assert!(tree.is_empty());
}

#[test]
fn test_shared_config_serializes_writers() {
    let shared = SharedConfig::new(parse_config("hits=0").unwrap());
    std::thread::scope(|scope| {
        for i in 1..=4 {
            let shared = shared.clone();
            scope.spawn(move || {
                shared.add("hits", i as i64).unwrap();
            });
        }
    });
    let mut hits = shared.read().get_int_array("hits").unwrap();
    hits.sort();
    assert_eq!(hits, vec![0, 1, 2, 3, 4]);

    shared.write(|tree| tree.set("hits", 0)).unwrap();
    assert_eq!(shared.get("hits"), Some(Value::Integer(0)));
    assert_eq!(shared.snapshot().marshal(), "hits=0\n");
}
