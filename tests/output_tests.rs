use apex_log_tree::output::{read_report, reshape, shape, to_report, write_collapsed, write_report};
use apex_log_tree::aggregator::build_collapsed_stacks;
use apex_log_tree::parse_log;
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::tempdir;

const METHOD_LOG: &str = "1 (1000)|METHOD_ENTRY|[10]|x|Foo.bar()\n2 (2500)|METHOD_EXIT|[10]\n";

#[test]
fn test_shaped_scenario() {
    let shaped = shape(&parse_log(METHOD_LOG).unwrap()).unwrap();

    assert_eq!(
        shaped,
        json!({
            "root": {
                "kind": "ROOT",
                "text": "Log Root",
                "children": [{
                    "node": "frame",
                    "kind": "METHOD_ENTRY",
                    "timestamp": 1000,
                    "exitTimestamp": 2500,
                    "duration": 1500,
                    "selfTime": 1500,
                    "text": "Foo.bar()",
                    "lineNumber": 10,
                    "category": "method",
                    "id": 0
                }],
                "id": 1
            },
            "id": 2
        })
    );
}

#[test]
fn test_shaped_diagnostics_and_blocks() {
    let log = "\
58.0 APEX_CODE,DEBUG;APEX_PROFILING,INFO
1 (5)|EXECUTION_STARTED
1 (10)|STATEMENT_EXECUTE|[2]
*** Skipped 10 bytes of detailed log
";
    let shaped = shape(&parse_log(log).unwrap()).unwrap();

    assert_eq!(shaped["truncated"][0]["reason"], json!("Skipped-Lines"));
    assert_eq!(shaped["truncated"][0]["severity"], json!("skip"));
    assert_eq!(shaped["truncated"][1]["reason"], json!("Unexpected-End"));
    assert_eq!(shaped["settings"][0], json!({"category": "APEX_CODE", "level": "DEBUG", "id": 4}));

    let execution = &shaped["root"]["children"][0];
    assert_eq!(execution["node"], json!("frame"));
    let block = &execution["children"][0];
    assert_eq!(block["node"], json!("block"));
    assert_eq!(block["records"][0]["kind"], json!("STATEMENT_EXECUTE"));
    assert!(shaped.get("cpuPeak").is_none());
}

#[test]
fn test_shaping_is_idempotent() {
    let log = "\
1 (0)|METHOD_ENTRY|[1]|a|A.run()
1 (5)|STATEMENT_EXECUTE|[2]
1 (10)|METHOD_ENTRY|[3]|b|B.run()
1 (20)|METHOD_EXIT|[3]
1 (30)|METHOD_EXIT|[9]
";
    let mut shaped = shape(&parse_log(log).unwrap()).unwrap();
    let once = shaped.clone();
    reshape(&mut shaped);

    assert_eq!(shaped, once);
}

#[test]
fn test_report_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("reports/apex.json");
    let result = parse_log(METHOD_LOG).unwrap();

    let report = to_report(&result, "apex.log", Vec::new()).unwrap();
    write_report(&report, &path).unwrap();
    let loaded = read_report(&path).unwrap();

    assert_eq!(loaded.source, "apex.log");
    assert_eq!(loaded.generated_at, report.generated_at);
    assert_eq!(loaded.result, shape(&result).unwrap());
}

#[test]
fn test_collapsed_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stacks.folded");
    let result = parse_log(METHOD_LOG).unwrap();

    write_collapsed(&build_collapsed_stacks(&result.root), &path).unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "Foo.bar() 1500\n");
}
