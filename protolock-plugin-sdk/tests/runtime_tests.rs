use pretty_assertions::assert_eq;
use proptest::prelude::*;
use protolock_plugin_sdk::{Data, Definition, Plugin, PluginError, Protolock, Stage, Warning};
use serde_json::{Value, json};
use std::io::{self, Cursor, Write};

fn encode(data: &Data) -> Vec<u8> {
    data.to_json().unwrap()
}

fn run<F>(plugin: &mut Plugin, input: &[u8], callback: F) -> (Result<Data, PluginError>, Vec<u8>, String)
where
    F: FnOnce(Data) -> Data,
{
    let mut output = Vec::new();
    let mut diagnostics = Vec::new();
    let result = plugin.serve(Cursor::new(input), &mut output, &mut diagnostics, callback);
    (result, output, String::from_utf8(diagnostics).unwrap())
}

fn payload_with_definition(filepath: &str) -> Data {
    Data::new(
        Protolock::default(),
        Protolock::new(vec![Definition::new(filepath)]),
    )
}

/// Writer that rejects every write.
struct ClosedPipe;

impl Write for ClosedPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ── Plugin construction ──────────────────────────────────────────

#[test]
fn new_plugin_is_idle() {
    let plugin = Plugin::new("sample");
    assert_eq!(plugin.name(), "sample");
    assert_eq!(plugin.stage(), Stage::Idle);
}

#[test]
fn empty_name_is_accepted() {
    let plugin = Plugin::new("");
    assert_eq!(plugin.name(), "");
}

// ── Successful exchanges ─────────────────────────────────────────

#[test]
fn identity_callback_echoes_payload() {
    let input = json!({
        "current": { "definitions": [{ "filepath": "a.proto", "def": { "messages": [] } }] },
        "updated": { "definitions": [{ "filepath": "a.proto", "def": { "messages": [{ "name": "Ping" }] } }] },
        "pluginWarnings": [{ "filepath": "a.proto", "message": "earlier" }]
    });
    let mut plugin = Plugin::new("identity");
    let (result, output, diagnostics) = run(&mut plugin, &serde_json::to_vec(&input).unwrap(), |d| d);

    assert!(result.is_ok());
    assert!(diagnostics.is_empty());
    assert_eq!(plugin.stage(), Stage::Done);
    let echoed: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(echoed, input);
}

#[test]
fn identity_callback_keeps_unmodeled_keys() {
    let input = json!({
        "current": { "definitions": [], "version": 3 },
        "updated": { "definitions": [{ "filepath": "a.proto", "def": {} }] },
        "pluginWarnings": [
            { "filepath": "a.proto", "message": "x", "rulename": "NoRemovingFields" }
        ],
        "protolockWarnings": [{ "filepath": "a.proto", "message": "y", "rulename": "NoChangingIds" }],
        "plugin_error_message": ""
    });
    let mut plugin = Plugin::new("identity");
    let (result, output, _) = run(&mut plugin, &serde_json::to_vec(&input).unwrap(), |d| d);

    assert!(result.is_ok());
    let echoed: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(echoed, input);
}

#[test]
fn identity_callback_canonicalizes_alternate_spellings() {
    let input = br#"{"current":{"definitions":[]},"updated":{"definitions":[]},"pluginWarnings":[],"protolock_warnings":[{"filepath":"a.proto","message":"x"}]}"#;
    let mut plugin = Plugin::new("identity");
    let (result, output, _) = run(&mut plugin, input, |d| d);

    assert!(result.is_ok());
    let echoed: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(
        echoed,
        json!({
            "current": { "definitions": [] },
            "updated": { "definitions": [] },
            "pluginWarnings": [],
            "protolockWarnings": [{ "filepath": "a.proto", "message": "x" }]
        })
    );
}

#[test]
fn sample_scenario_appends_two_warnings() {
    let input = encode(&payload_with_definition("a.proto"));
    let mut plugin = Plugin::new("sample");
    let (result, output, _) = run(&mut plugin, &input, |mut data| {
        let path = data.updated.definitions[0].filepath.clone();
        data.append_warnings([
            Warning::new(path.clone(), "A sample warning!"),
            Warning::new(path, "Another sample warning.. ah!"),
        ]);
        data
    });

    let returned = result.unwrap();
    let decoded = Data::from_json(&output).unwrap();
    assert_eq!(decoded, returned);
    assert_eq!(
        decoded.plugin_warnings,
        vec![
            Warning::new("a.proto", "A sample warning!"),
            Warning::new("a.proto", "Another sample warning.. ah!"),
        ]
    );
}

#[test]
fn warnings_do_not_fail_the_exchange() {
    let input = encode(&payload_with_definition("a.proto"));
    let mut plugin = Plugin::new("noisy");
    let (result, _, diagnostics) = run(&mut plugin, &input, |mut data| {
        data.append_warnings((0..50).map(|i| Warning::new("a.proto", format!("warning {i}"))));
        data
    });
    assert_eq!(result.unwrap().plugin_warnings.len(), 50);
    assert!(diagnostics.is_empty());
}

#[test]
fn callback_may_return_new_payload() {
    let input = encode(&payload_with_definition("a.proto"));
    let mut plugin = Plugin::new("rewrite");
    let (result, output, _) = run(&mut plugin, &input, |data| {
        Data::new(data.current, Protolock::new(vec![Definition::new("b.proto")]))
    });
    assert!(result.is_ok());
    let decoded = Data::from_json(&output).unwrap();
    assert_eq!(decoded.updated.definitions[0].filepath, "b.proto");
}

#[test]
fn callback_runs_exactly_once() {
    let input = encode(&Data::default());
    let mut calls = 0;
    let mut plugin = Plugin::new("counter");
    let (result, _, _) = run(&mut plugin, &input, |d| {
        calls += 1;
        d
    });
    assert!(result.is_ok());
    assert_eq!(calls, 1);
}

#[test]
fn callback_sees_executing_inputs() {
    let input = encode(&payload_with_definition("x:/:y.proto"));
    let mut seen = None;
    let mut plugin = Plugin::new("observer");
    let (result, _, _) = run(&mut plugin, &input, |d| {
        seen = Some(d.updated.definitions[0].os_path());
        d
    });
    assert!(result.is_ok());
    let expected: std::path::PathBuf = ["x", "y.proto"].iter().collect();
    assert_eq!(seen, Some(expected));
}

// ── Decode failures ──────────────────────────────────────────────

#[test]
fn malformed_input_skips_callback_and_writes_nothing() {
    let mut called = false;
    let mut plugin = Plugin::new("sample");
    let (result, output, diagnostics) = run(&mut plugin, b"{\"current\": {\"definitions\": [", |d| {
        called = true;
        d
    });

    let err = result.unwrap_err();
    assert!(matches!(err, PluginError::Decode { .. }));
    assert_eq!(err.stage(), Stage::Decoding);
    assert_eq!(err.plugin(), "sample");
    assert!(!called);
    assert!(output.is_empty());
    assert!(diagnostics.contains("sample"), "diagnostic: {diagnostics}");
    assert_eq!(plugin.stage(), Stage::Failed);
}

#[test]
fn type_mismatch_is_a_decode_error() {
    let mut plugin = Plugin::new("typed");
    let (result, output, _) = run(&mut plugin, br#"{"current":[],"updated":{}}"#, |d| d);
    assert!(matches!(result, Err(PluginError::Decode { .. })));
    assert!(output.is_empty());
}

#[test]
fn empty_input_is_a_decode_error() {
    let mut plugin = Plugin::new("empty");
    let (result, output, diagnostics) = run(&mut plugin, b"", |d| d);
    assert!(matches!(result, Err(PluginError::Decode { .. })));
    assert!(output.is_empty());
    assert_eq!(diagnostics.lines().count(), 1);
}

// ── Encode-side failures ─────────────────────────────────────────

#[test]
fn dropping_incoming_warnings_is_rejected() {
    let input = encode(&Data::default().with_plugin_warnings(vec![Warning::new("a.proto", "earlier")]));
    let mut plugin = Plugin::new("forgetful");
    let (result, output, diagnostics) = run(&mut plugin, &input, |mut d| {
        d.plugin_warnings.clear();
        d
    });

    let err = result.unwrap_err();
    assert!(matches!(err, PluginError::ContractViolation { expected: 1, .. }));
    assert_eq!(err.stage(), Stage::Encoding);
    assert!(output.is_empty());
    assert!(diagnostics.contains("forgetful"));
}

#[test]
fn reordering_incoming_warnings_is_rejected() {
    let input = encode(&Data::default().with_plugin_warnings(vec![
        Warning::new("a.proto", "first"),
        Warning::new("b.proto", "second"),
    ]));
    let mut plugin = Plugin::new("shuffler");
    let (result, output, _) = run(&mut plugin, &input, |mut d| {
        d.plugin_warnings.reverse();
        d
    });
    assert!(matches!(result, Err(PluginError::ContractViolation { .. })));
    assert!(output.is_empty());
}

#[test]
fn closed_output_is_a_write_error() {
    let input = encode(&Data::default());
    let mut diagnostics = Vec::new();
    let mut plugin = Plugin::new("piped");
    let result = plugin.serve(Cursor::new(input), ClosedPipe, &mut diagnostics, |d| d);

    let err = result.unwrap_err();
    assert!(matches!(err, PluginError::Write { .. }));
    assert_eq!(err.stage(), Stage::Encoding);
    let diagnostics = String::from_utf8(diagnostics).unwrap();
    assert!(diagnostics.starts_with("[protolock:plugin:piped]"));
}

// ── Properties ───────────────────────────────────────────────────

fn warning_strategy() -> impl Strategy<Value = Warning> {
    ("[a-z]{1,8}(:/:[a-z]{1,8}){0,2}\\.proto", "[ -~]{0,40}")
        .prop_map(|(filepath, message)| Warning::new(filepath, message))
}

fn data_strategy() -> impl Strategy<Value = Data> {
    let defs = || prop::collection::vec("[a-z]{1,8}\\.proto", 0..4);
    (defs(), defs(), prop::collection::vec(warning_strategy(), 0..6)).prop_map(
        |(current, updated, warnings)| {
            let snapshot = |paths: Vec<String>| {
                Protolock::new(paths.into_iter().map(Definition::new).collect())
            };
            Data::new(snapshot(current), snapshot(updated)).with_plugin_warnings(warnings)
        },
    )
}

proptest! {
    #[test]
    fn identity_exchange_is_lossless(data in data_strategy()) {
        let mut plugin = Plugin::new("prop");
        let (result, output, _) = run(&mut plugin, &encode(&data), |d| d);
        prop_assert!(result.is_ok());
        prop_assert_eq!(Data::from_json(&output).unwrap(), data);
    }

    #[test]
    fn appended_warnings_follow_existing_ones(
        data in data_strategy(),
        extra in prop::collection::vec(warning_strategy(), 0..6),
    ) {
        let mut plugin = Plugin::new("prop");
        let appended = extra.clone();
        let (result, output, _) = run(&mut plugin, &encode(&data), move |mut d| {
            d.append_warnings(appended);
            d
        });
        prop_assert!(result.is_ok());

        let out = Data::from_json(&output).unwrap();
        prop_assert_eq!(out.plugin_warnings.len(), data.plugin_warnings.len() + extra.len());
        prop_assert_eq!(&out.plugin_warnings[..data.plugin_warnings.len()], &data.plugin_warnings[..]);
        prop_assert_eq!(&out.plugin_warnings[data.plugin_warnings.len()..], &extra[..]);
    }

    #[test]
    fn truncated_input_never_runs_callback(data in data_strategy(), cut in 0usize..1000) {
        let bytes = encode(&data);
        let cut = cut % bytes.len();
        let mut called = false;
        let mut plugin = Plugin::new("prop");
        let (result, output, _) = run(&mut plugin, &bytes[..cut], |d| {
            called = true;
            d
        });
        prop_assert!(result.is_err());
        prop_assert!(!called);
        prop_assert!(output.is_empty());
    }
}
