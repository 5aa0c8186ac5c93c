use apex_log_tree::aggregator::{Child, Frame, Severity};
use apex_log_tree::output::shape;
use apex_log_tree::{parse_log, parse_log_with_options, ParseError, ParseOptions};
use pretty_assertions::assert_eq;

fn frame_at<'a>(parent: &'a Frame, index: usize) -> &'a Frame {
    match &parent.children[index] {
        Child::Frame(frame) => frame,
        Child::Block(_) => panic!("child {} is a block", index),
    }
}

fn reasons(log: &str) -> Vec<String> {
    parse_log(log)
        .unwrap()
        .truncated
        .into_iter()
        .map(|event| event.reason)
        .collect()
}

/// Every resolved frame: duration = exit - timestamp, self = duration - direct children
fn assert_durations_consistent(frame: &Frame) {
    if let Some(exit) = frame.record.exit_timestamp {
        let duration = exit - frame.record.timestamp;
        let nested: i64 = frame.children.iter().filter_map(Child::duration).sum();
        assert_eq!(frame.record.duration, Some(duration), "{}", frame.record.text);
        assert_eq!(frame.record.self_time, Some(duration - nested), "{}", frame.record.text);
    }
    for child in frame.frames() {
        assert_durations_consistent(child);
    }
}

const NESTED_LOG: &str = "\
58.0 APEX_CODE,FINEST;APEX_PROFILING,INFO
Execute Anonymous: Foo.bar();
12:00:00.0 (0)|EXECUTION_STARTED
12:00:00.0 (100)|CODE_UNIT_STARTED|[EXTERNAL]|execute_anonymous_apex
12:00:00.0 (200)|METHOD_ENTRY|[1]|01p|Foo.bar()
12:00:00.0 (250)|STATEMENT_EXECUTE|[2]
12:00:00.0 (300)|SOQL_EXECUTE_BEGIN|[3]|Aggregations:0|SELECT Id FROM Account
12:00:00.0 (700)|SOQL_EXECUTE_END|[3]|Rows:4
12:00:00.0 (800)|USER_DEBUG|[4]|DEBUG|hello
world
12:00:00.0 (900)|METHOD_EXIT|[1]|Foo.bar()
12:00:00.0 (1000)|CODE_UNIT_FINISHED|execute_anonymous_apex
12:00:00.0 (1100)|EXECUTION_FINISHED
";

#[test]
fn test_single_method_scenario() {
    let log = "...EXECUTION_STARTED\n1 (1000)|METHOD_ENTRY|[10]|x|Foo.bar()\n2 (2500)|METHOD_EXIT|[10]\n";
    let result = parse_log(log).unwrap();

    assert_eq!(result.root.children.len(), 1);
    let method = frame_at(&result.root, 0);
    assert_eq!(method.record.kind, "METHOD_ENTRY");
    assert_eq!(method.record.timestamp, 1000);
    assert_eq!(method.record.exit_timestamp, Some(2500));
    assert_eq!(method.record.duration, Some(1500));
    assert_eq!(method.record.self_time, Some(1500));
    assert!(result.truncated.is_empty());
}

#[test]
fn test_nested_log_structure() {
    let result = parse_log(NESTED_LOG).unwrap();
    assert!(result.truncated.is_empty());
    assert_eq!(result.root.record.text, "Log Root");
    assert_eq!(result.root.record.duration, None);

    let execution = frame_at(&result.root, 0);
    assert_eq!(execution.record.duration, Some(1100));

    let unit = frame_at(execution, 0);
    assert_eq!(unit.record.text, "execute_anonymous_apex");

    let method = frame_at(unit, 0);
    assert_eq!(method.children.len(), 3);
    assert!(matches!(method.children[0], Child::Block(_)));

    let soql = frame_at(method, 1);
    assert_eq!(soql.record.text, "SOQL: Aggregations:0 - SELECT Id FROM Account");
    assert_eq!(soql.record.row_count, Some(4));
    assert_eq!(soql.record.duration, Some(400));
    assert_eq!(method.record.self_time, Some(700 - 400));

    match &method.children[2] {
        Child::Block(block) => assert_eq!(block.records[0].text, "USER_DEBUG:DEBUG hello | world"),
        Child::Frame(_) => panic!("expected trailing block"),
    }

    assert_durations_consistent(&result.root);
}

#[test]
fn test_reparse_is_byte_identical() {
    let first = serde_json::to_string(&shape(&parse_log(NESTED_LOG).unwrap()).unwrap()).unwrap();
    let _ = parse_log("1 (5)|METHOD_ENTRY|[1]|a|Other.run()\n*** Skipped 10 bytes\n").unwrap();
    let second = serde_json::to_string(&shape(&parse_log(NESTED_LOG).unwrap()).unwrap()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_concurrent_parses_do_not_interfere() {
    let truncated_log = "1 (5)|METHOD_ENTRY|[1]|a|Other.run()\n1 (6)|EXCEPTION_THROWN|[2]|boom\n";
    let expected_clean = serde_json::to_string(&shape(&parse_log(NESTED_LOG).unwrap()).unwrap()).unwrap();
    let expected_truncated = serde_json::to_string(&shape(&parse_log(truncated_log).unwrap()).unwrap()).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let log = if i % 2 == 0 { NESTED_LOG } else { truncated_log };
                scope.spawn(move || (i, serde_json::to_string(&shape(&parse_log(log).unwrap()).unwrap()).unwrap()))
            })
            .collect();

        for handle in handles {
            let (i, output) = handle.join().unwrap();
            if i % 2 == 0 {
                assert_eq!(output, expected_clean);
            } else {
                assert_eq!(output, expected_truncated);
            }
        }
    });
}

#[test]
fn test_empty_log() {
    for log in [
        "",
        "\n\n",
        "58.0 APEX_CODE,DEBUG;APEX_PROFILING,INFO\n",
        "58.0 APEX_CODE,FINE;APEX_PROFILING,INFO\nExecute Anonymous: x\n12:00:00.0 (0)|EXECUTION_STARTED\n",
    ] {
        let result = parse_log(log).unwrap();
        assert!(result.root.children.is_empty());
        assert!(result.truncated.is_empty());
    }
}

#[test]
fn test_missing_exit_gives_one_unexpected_end() {
    let log = "\
1 (100)|METHOD_ENTRY|[1]|a|Outer.run()
1 (200)|METHOD_ENTRY|[2]|b|Inner.go()
1 (350)|STATEMENT_EXECUTE|[3]
";
    let result = parse_log(log).unwrap();

    assert_eq!(result.truncated.len(), 1);
    assert_eq!(result.truncated[0].reason, "Unexpected-End");
    assert_eq!(result.truncated[0].severity, Severity::Unexpected);
    assert_eq!(result.truncated[0].timestamp, 350);

    let outer = frame_at(&result.root, 0);
    let inner = frame_at(outer, 0);
    assert_eq!(outer.record.exit_timestamp, Some(350));
    assert_eq!(inner.record.exit_timestamp, Some(350));
    assert_eq!(inner.record.duration, Some(150));
    assert_eq!(outer.record.self_time, Some(250 - 150));
}

#[test]
fn test_exception_absorbs_mismatch_then_clears() {
    let log = "\
1 (100)|METHOD_ENTRY|[1]|a|Outer.run()
1 (200)|METHOD_ENTRY|[5]|b|Inner.go()
1 (300)|EXCEPTION_THROWN|[7]|System.DmlException: boom
1 (400)|METHOD_EXIT|[1]
";
    let result = parse_log(log).unwrap();
    assert!(result.truncated.is_empty());

    let outer = frame_at(&result.root, 0);
    let inner = frame_at(outer, 0);
    assert_eq!(inner.record.exit_timestamp, Some(400));
    assert_eq!(outer.record.exit_timestamp, Some(400));
    assert_eq!(result.root.children.len(), 1);

    // Unwinding ended at the matching exit, so a later mismatch is reported
    let log = format!("{}1 (500)|METHOD_ENTRY|[9]|c|Other.x()\n1 (600)|METHOD_EXIT|[8]\n", log);
    let result = parse_log(&log).unwrap();
    assert_eq!(result.truncated.len(), 1);
    assert_eq!(result.truncated[0].reason, "Unexpected-Exit");
    assert_eq!(result.truncated[0].timestamp, 600);
    assert!(matches!(result.root.children.last(), Some(Child::Block(_))));
}

#[test]
fn test_fatal_error_is_reported_and_unwinds() {
    let log = "\
1 (100)|CODE_UNIT_STARTED|[EXTERNAL]|trigger
1 (200)|METHOD_ENTRY|[5]|b|Inner.go()
1 (300)|FATAL_ERROR|System.LimitException: Too many DML rows
1 (400)|CODE_UNIT_FINISHED|trigger
";
    let result = parse_log(log).unwrap();

    assert_eq!(result.truncated.len(), 1);
    assert_eq!(result.truncated[0].reason, "FATAL ERROR! cause=System.LimitException: Too many DML rows");
    assert_eq!(result.truncated[0].severity, Severity::Error);
}

#[test]
fn test_same_kind_closer_with_other_line_does_not_match() {
    let log = "\
1 (100)|METHOD_ENTRY|[1]|a|Outer.run()
1 (150)|METHOD_EXIT|[2]
1 (200)|METHOD_EXIT|[1]
";
    let result = parse_log(log).unwrap();

    let outer = frame_at(&result.root, 0);
    assert_eq!(outer.record.exit_timestamp, Some(150));
    assert_eq!(reasons(log), vec!["Unexpected-Exit".to_string()]);
    // both stray exits end up as root leaves
    match &result.root.children[1] {
        Child::Block(block) => assert_eq!(block.records.len(), 2),
        Child::Frame(_) => panic!("expected a block"),
    }
}

#[test]
fn test_recursive_calls_close_independently() {
    let log = "\
1 (0)|METHOD_ENTRY|[1]|a|Fib.calc()
1 (10)|METHOD_ENTRY|[4]|a|Fib.calc()
1 (20)|METHOD_EXIT|[4]
1 (30)|METHOD_EXIT|[1]
";
    let result = parse_log(log).unwrap();
    let outer = frame_at(&result.root, 0);
    let inner = frame_at(outer, 0);

    assert!(result.truncated.is_empty());
    assert_eq!(inner.record.duration, Some(10));
    assert_eq!(outer.record.self_time, Some(20));
}

#[test]
fn test_duplicate_skip_markers_keep_first() {
    let log = "\
1 (100)|STATEMENT_EXECUTE|[1]
*** Skipped 100 bytes of detailed log
1 (200)|STATEMENT_EXECUTE|[2]
*** Skipped 300 bytes of detailed log
";
    let result = parse_log(log).unwrap();

    assert_eq!(result.truncated.len(), 1);
    assert_eq!(result.truncated[0].reason, "Skipped-Lines");
    assert_eq!(result.truncated[0].timestamp, 100);
    assert_eq!(result.truncated[0].severity, Severity::Skip);
}

#[test]
fn test_truncation_reasons_are_unique() {
    let log = "\
1 (100)|METHOD_ENTRY|[1]|a|A.run()
1 (110)|METHOD_EXIT|[9]
1 (120)|METHOD_ENTRY|[2]|b|B.run()
1 (130)|METHOD_EXIT|[8]
*** Skipped 1 bytes
1 (140)|METHOD_ENTRY|[3]|c|C.run()
";
    let reasons = reasons(log);
    let mut unique = reasons.clone();
    unique.sort();
    unique.dedup();

    assert_eq!(reasons.len(), unique.len());
    // classification events come before tree events, whatever their timestamps
    assert_eq!(reasons, vec!["Skipped-Lines", "Unexpected-Exit", "Unexpected-End"]);
}

#[test]
fn test_managed_package_leaf_keeps_own_duration() {
    let log = "\
1 (0)|METHOD_ENTRY|[1]|a|A.run()
1 (10)|ENTERING_MANAGED_PKG|acme
1 (60)|METHOD_EXIT|[1]
";
    let result = parse_log(log).unwrap();
    let method = frame_at(&result.root, 0);

    match &method.children[0] {
        Child::Block(block) => {
            assert_eq!(block.records[0].namespace.as_deref(), Some("acme"));
            assert_eq!(block.records[0].duration, Some(50));
        }
        Child::Frame(_) => panic!("managed package entries are leaves"),
    }
    assert_eq!(method.record.self_time, Some(60));
}

#[test]
fn test_depth_limit() {
    let log: String = (0..20)
        .map(|i| format!("1 ({})|METHOD_ENTRY|[{}]|a|Deep.call()\n", i, i + 1))
        .collect();

    let result = parse_log_with_options(&log, &ParseOptions::new().with_max_depth(10));
    assert!(matches!(result, Err(ParseError::ResourceLimit { limit: "max_depth", .. })));
    assert!(parse_log_with_options(&log, &ParseOptions::new().with_max_depth(20)).is_ok());
}

#[test]
fn test_malformed_timestamp_fails() {
    let result = parse_log("1 (100)|STATEMENT_EXECUTE|[1]\nnot a time|METHOD_ENTRY|[2]|a|A.run()\n");
    assert!(matches!(
        result,
        Err(ParseError::MalformedField { line: 1, field: "timestamp", .. })
    ));
}

#[test]
fn test_flow_interviews_take_first_interview_name() {
    let log = "\
1 (0)|FLOW_START_INTERVIEWS_BEGIN|1
1 (10)|FLOW_START_INTERVIEW_BEGIN|300x|MyFlow
1 (20)|FLOW_START_INTERVIEW_END|300x|MyFlow
1 (30)|FLOW_START_INTERVIEWS_END|1
";
    let result = parse_log(log).unwrap();
    let interviews = frame_at(&result.root, 0);

    assert_eq!(interviews.record.text, "FLOW_START_INTERVIEWS : 1 - MyFlow");
    assert_eq!(interviews.record.exit_timestamp, Some(30));
    assert!(result.truncated.is_empty());
}

#[test]
fn test_flow_interviews_without_children_keep_text() {
    let log = "\
1 (0)|FLOW_START_INTERVIEWS_BEGIN|1
1 (30)|FLOW_START_INTERVIEWS_END|1
";
    let result = parse_log(log).unwrap();
    let interviews = frame_at(&result.root, 0);

    assert!(interviews.children.is_empty());
    assert_eq!(interviews.record.text, "FLOW_START_INTERVIEWS : 1");
    assert_eq!(interviews.record.duration, Some(30));
}
