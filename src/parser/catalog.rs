//! Record catalog: one static entry per log line type tag.
//!
//! Each entry says which fields a line of that kind carries and how the
//! record behaves in the call tree. The table is plain data; the engine
//! only looks at the flags and hooks, never at kind names.

use super::record::Category::{Custom, Free, Method, Pkg};
use super::record::{Category, Fields, Record};
use crate::utils::error::ParseError;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// Attribute setter for kinds whose fields don't fit a template
pub type ExtractFn = fn(&Fields<'_>, &mut Record) -> Result<(), ParseError>;

/// How a record's display text is built
#[derive(Clone, Copy)]
pub enum TextRule {
    None,
    Kind,
    /// `{N}` placeholders, see [`Fields::render`]
    Template(&'static str),
    Custom(fn(&Fields<'_>) -> String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupRule {
    None,
    Kind,
    Fixed(&'static str),
}

/// Invoked when a frame's exit is resolved, with the closing record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseHook {
    /// Copy the closer's row count
    RowCount,
    /// Append the text of the first child (unwrapping a leading block)
    AppendFirstChildText,
}

/// Invoked on the previous record once the next one is classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextHook {
    /// Raise the CPU peak from `Maximum CPU time: N` in the text
    PeakCpu,
    /// End this record where the next one starts
    ///
    /// Such records stay leaves inside a block, so their duration is not
    /// subtracted from the enclosing frame's self-time.
    CloseAtNext,
}

/// Diagnostic raised when a record of this kind is classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alert {
    /// Only when the text names `System.LimitException`
    LimitException,
    FatalError,
}

/// Static description of one record kind
pub struct RecordKind {
    pub name: &'static str,
    pub closing_kinds: &'static [&'static str],
    pub is_exit: bool,
    pub accepts_text: bool,
    pub discontinuity: bool,
    pub line_field: Option<usize>,
    pub rows_field: Option<usize>,
    pub value_field: Option<usize>,
    pub text: TextRule,
    pub group: GroupRule,
    pub namespace: Option<&'static str>,
    pub category: Option<Category>,
    pub on_close: Option<CloseHook>,
    pub on_next: Option<NextHook>,
    pub alert: Option<Alert>,
    pub extract: Option<ExtractFn>,
}

impl fmt::Debug for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordKind")
            .field("name", &self.name)
            .field("closing_kinds", &self.closing_kinds)
            .field("is_exit", &self.is_exit)
            .finish_non_exhaustive()
    }
}

impl RecordKind {
    const fn leaf(name: &'static str) -> Self {
        Self {
            name,
            closing_kinds: &[],
            is_exit: false,
            accepts_text: false,
            discontinuity: false,
            line_field: None,
            rows_field: None,
            value_field: None,
            text: TextRule::None,
            group: GroupRule::None,
            namespace: None,
            category: None,
            on_close: None,
            on_next: None,
            alert: None,
            extract: None,
        }
    }

    const fn frame(name: &'static str, closing_kinds: &'static [&'static str]) -> Self {
        let mut kind = Self::leaf(name);
        kind.closing_kinds = closing_kinds;
        kind
    }

    const fn exit(name: &'static str) -> Self {
        let mut kind = Self::leaf(name);
        kind.is_exit = true;
        kind
    }

    const fn text(mut self, template: &'static str) -> Self {
        self.text = TextRule::Template(template);
        self
    }

    const fn kind_text(mut self) -> Self {
        self.text = TextRule::Kind;
        self
    }

    const fn custom_text(mut self, render: fn(&Fields<'_>) -> String) -> Self {
        self.text = TextRule::Custom(render);
        self
    }

    const fn line(mut self, field: usize) -> Self {
        self.line_field = Some(field);
        self
    }

    const fn rows(mut self, field: usize) -> Self {
        self.rows_field = Some(field);
        self
    }

    const fn value(mut self, field: usize) -> Self {
        self.value_field = Some(field);
        self
    }

    const fn group(mut self, group: &'static str) -> Self {
        self.group = GroupRule::Fixed(group);
        self
    }

    const fn kind_group(mut self) -> Self {
        self.group = GroupRule::Kind;
        self
    }

    const fn system(mut self) -> Self {
        self.namespace = Some("system");
        self
    }

    const fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    const fn accepts_text(mut self) -> Self {
        self.accepts_text = true;
        self
    }

    const fn discontinuity(mut self) -> Self {
        self.discontinuity = true;
        self
    }

    const fn on_close(mut self, hook: CloseHook) -> Self {
        self.on_close = Some(hook);
        self
    }

    const fn on_next(mut self, hook: NextHook) -> Self {
        self.on_next = Some(hook);
        self
    }

    const fn alert(mut self, alert: Alert) -> Self {
        self.alert = Some(alert);
        self
    }

    const fn extract(mut self, extract: ExtractFn) -> Self {
        self.extract = Some(extract);
        self
    }
}

/// Catalog entry of the synthetic root record
pub static ROOT_KIND: RecordKind = RecordKind::leaf("ROOT");

/// Every recognized record kind
pub static CATALOG: &[RecordKind] = &[
    // Callouts and credentials
    RecordKind::leaf("BULK_HEAP_ALLOCATE").text("{2}"),
    RecordKind::leaf("CALLOUT_REQUEST").text("{3} : {2}"),
    RecordKind::leaf("CALLOUT_RESPONSE").text("{3} : {2}"),
    RecordKind::leaf("NAMED_CREDENTIAL_REQUEST").text("{3} : {4} : {5} : {6}"),
    RecordKind::leaf("NAMED_CREDENTIAL_RESPONSE").text("{2}"),
    RecordKind::leaf("NAMED_CREDENTIAL_RESPONSE_DETAIL").text("{3} : {4} {5} : {6} {7}"),
    // Methods and constructors
    RecordKind::frame("CONSTRUCTOR_ENTRY", &["CONSTRUCTOR_EXIT"])
        .category(Method)
        .line(2)
        .custom_text(constructor_text),
    RecordKind::exit("CONSTRUCTOR_EXIT").line(2),
    RecordKind::leaf("EMAIL_QUEUE").line(2),
    RecordKind::frame("METHOD_ENTRY", &["METHOD_EXIT"])
        .category(Method)
        .line(2)
        .custom_text(method_text)
        .extract(method_category),
    RecordKind::exit("METHOD_EXIT").line(2),
    RecordKind::frame("SYSTEM_CONSTRUCTOR_ENTRY", &["SYSTEM_CONSTRUCTOR_EXIT"])
        .category(Method)
        .system()
        .line(2)
        .text("{3}"),
    RecordKind::exit("SYSTEM_CONSTRUCTOR_EXIT").system().line(2),
    RecordKind::frame("SYSTEM_METHOD_ENTRY", &["SYSTEM_METHOD_EXIT"])
        .category(Method)
        .system()
        .line(2)
        .text("{3}"),
    RecordKind::exit("SYSTEM_METHOD_EXIT").system().line(2),
    RecordKind::frame("CODE_UNIT_STARTED", &["CODE_UNIT_FINISHED"]).extract(code_unit_attributes),
    RecordKind::exit("CODE_UNIT_FINISHED").text("{2}"),
    // Visualforce
    RecordKind::frame("VF_APEX_CALL_START", &["VF_APEX_CALL_END"])
        .category(Method)
        .line(2),
    RecordKind::exit("VF_APEX_CALL_END").text("{2}"),
    RecordKind::frame("VF_DESERIALIZE_VIEWSTATE_BEGIN", &["VF_DESERIALIZE_VIEWSTATE_END"])
        .category(Method)
        .system()
        .kind_text(),
    RecordKind::exit("VF_DESERIALIZE_VIEWSTATE_END"),
    RecordKind::frame("VF_EVALUATE_FORMULA_BEGIN", &["VF_EVALUATE_FORMULA_END"])
        .category(Custom)
        .text("{3}")
        .kind_group(),
    RecordKind::exit("VF_EVALUATE_FORMULA_END").text("{2}"),
    RecordKind::frame("VF_SERIALIZE_VIEWSTATE_BEGIN", &["VF_SERIALIZE_VIEWSTATE_END"])
        .category(Method)
        .system()
        .kind_text(),
    RecordKind::exit("VF_SERIALIZE_VIEWSTATE_END"),
    RecordKind::leaf("VF_PAGE_MESSAGE").text("{2}"),
    // Database
    RecordKind::frame("DML_BEGIN", &["DML_END"])
        .category(Free)
        .group("DML")
        .line(2)
        .text("DML {3} {4}")
        .rows(5),
    RecordKind::exit("DML_END").line(2),
    RecordKind::leaf("IDEAS_QUERY_EXECUTE").line(2),
    RecordKind::frame("SOQL_EXECUTE_BEGIN", &["SOQL_EXECUTE_END"])
        .category(Free)
        .group("SOQL")
        .line(2)
        .text("SOQL: {3} - {4}")
        .on_close(CloseHook::RowCount),
    RecordKind::exit("SOQL_EXECUTE_END").line(2).rows(3),
    RecordKind::leaf("SOQL_EXECUTE_EXPLAIN").line(2).text("{3}, line:{line}"),
    RecordKind::frame("SOSL_EXECUTE_BEGIN", &["SOSL_EXECUTE_END"])
        .category(Free)
        .group("SOQL")
        .line(2)
        .text("SOSL: {3}")
        .on_close(CloseHook::RowCount),
    RecordKind::exit("SOSL_EXECUTE_END").line(2).rows(3),
    RecordKind::frame("QUERY_MORE_BEGIN", &["QUERY_MORE_END"])
        .line(2)
        .text("line: {line}"),
    RecordKind::exit("QUERY_MORE_END").line(2).text("line: {line}"),
    RecordKind::leaf("QUERY_MORE_ITERATIONS").line(2).text("line: {line}, iterations:{3}"),
    RecordKind::leaf("SAVEPOINT_ROLLBACK").line(2).text("{3}, line: {line}"),
    RecordKind::leaf("SAVEPOINT_SET").line(2).text("{3}"),
    // Heap, statements and variables
    RecordKind::leaf("HEAP_ALLOCATE").line(2),
    RecordKind::leaf("HEAP_DEALLOCATE").line(2),
    RecordKind::leaf("STATEMENT_EXECUTE").line(2),
    RecordKind::leaf("VARIABLE_SCOPE_BEGIN")
        .line(2)
        .text("{3}")
        .kind_group()
        .value(4),
    RecordKind::leaf("VARIABLE_SCOPE_END"),
    RecordKind::leaf("VARIABLE_ASSIGNMENT")
        .line(2)
        .text("{3}")
        .kind_group()
        .value(4),
    RecordKind::leaf("USER_INFO").line(2).text("{kind}:{3} {4}").kind_group(),
    RecordKind::leaf("USER_DEBUG")
        .accepts_text()
        .line(2)
        .text("{kind}:{3} {4}")
        .kind_group(),
    RecordKind::leaf("STACK_FRAME_VARIABLE_LIST").accepts_text(),
    RecordKind::leaf("STATIC_VARIABLE_LIST").accepts_text(),
    // Limits and profiling
    RecordKind::frame("CUMULATIVE_LIMIT_USAGE", &["CUMULATIVE_LIMIT_USAGE_END"])
        .category(Category::System)
        .kind_text()
        .kind_group(),
    RecordKind::exit("CUMULATIVE_LIMIT_USAGE_END"),
    RecordKind::leaf("CUMULATIVE_PROFILING").accepts_text().text("{2} {3}"),
    RecordKind::frame("CUMULATIVE_PROFILING_BEGIN", &["CUMULATIVE_PROFILING_END"]),
    RecordKind::exit("CUMULATIVE_PROFILING_END"),
    RecordKind::leaf("LIMIT_USAGE")
        .line(2)
        .text("{3} {4} out of {5}")
        .kind_group(),
    RecordKind::leaf("LIMIT_USAGE_FOR_NS")
        .accepts_text()
        .text("{2}")
        .kind_group()
        .on_next(NextHook::PeakCpu),
    RecordKind::leaf("TESTING_LIMITS").accepts_text(),
    RecordKind::leaf("POP_TRACE_FLAGS").system().line(2).text("{4}, line:{line} - {5}"),
    RecordKind::leaf("PUSH_TRACE_FLAGS").system().line(2).text("{4}, line:{line} - {5}"),
    RecordKind::leaf("TOTAL_EMAIL_RECIPIENTS_QUEUED").text("{2}"),
    RecordKind::leaf("SYSTEM_MODE_ENTER").system().text("{2}"),
    RecordKind::leaf("SYSTEM_MODE_EXIT").system().text("{2}"),
    // Execution envelope
    RecordKind::frame("EXECUTION_STARTED", &["EXECUTION_FINISHED"]).kind_text(),
    RecordKind::exit("EXECUTION_FINISHED").kind_text(),
    RecordKind::leaf("ENTERING_MANAGED_PKG")
        .category(Pkg)
        .extract(managed_package)
        .on_next(NextHook::CloseAtNext),
    // Event service
    RecordKind::frame("EVENT_SERVICE_PUB_BEGIN", &["EVENT_SERVICE_PUB_END"])
        .category(Custom)
        .kind_group()
        .text("{2}"),
    RecordKind::exit("EVENT_SERVICE_PUB_END").text("{2}"),
    RecordKind::leaf("EVENT_SERVICE_PUB_DETAIL").text("{2} {3} {4}").kind_group(),
    RecordKind::frame("EVENT_SERVICE_SUB_BEGIN", &["EVENT_SERVICE_SUB_END"])
        .category(Custom)
        .text("{2} {3}")
        .kind_group(),
    RecordKind::exit("EVENT_SERVICE_SUB_END").text("{2} {3}"),
    RecordKind::leaf("EVENT_SERVICE_SUB_DETAIL").text("{2} {3} {4} {5} {6}").kind_group(),
    // Flows
    RecordKind::frame("FLOW_START_INTERVIEWS_BEGIN", &["FLOW_START_INTERVIEWS_END"])
        .category(Custom)
        .group("FLOW_START_INTERVIEWS")
        .text("FLOW_START_INTERVIEWS : {2}")
        .on_close(CloseHook::AppendFirstChildText),
    RecordKind::exit("FLOW_START_INTERVIEWS_END"),
    RecordKind::leaf("FLOW_START_INTERVIEWS_ERROR").text("{2} - {4}"),
    RecordKind::leaf("FLOW_START_INTERVIEW_BEGIN").text("{3}").kind_group(),
    RecordKind::leaf("FLOW_START_INTERVIEW_END"),
    RecordKind::leaf("FLOW_START_INTERVIEW_LIMIT_USAGE").text("{2}").kind_group(),
    RecordKind::leaf("FLOW_START_SCHEDULED_RECORDS").text("{2} : {3}"),
    RecordKind::leaf("FLOW_CREATE_INTERVIEW_BEGIN"),
    RecordKind::leaf("FLOW_CREATE_INTERVIEW_END"),
    RecordKind::leaf("FLOW_CREATE_INTERVIEW_ERROR").text("{2} : {3} : {4} : {5}"),
    RecordKind::frame("FLOW_ELEMENT_BEGIN", &["FLOW_ELEMENT_END"])
        .category(Custom)
        .kind_group()
        .text("{kind} - {3} {4}"),
    RecordKind::exit("FLOW_ELEMENT_END"),
    RecordKind::leaf("FLOW_ELEMENT_DEFERRED").text("{2} {3}").kind_group(),
    RecordKind::leaf("FLOW_ELEMENT_ERROR").text("{kind}{2} {3} {4}"),
    RecordKind::leaf("FLOW_ELEMENT_FAULT").text("{2} : {3} : {4}"),
    RecordKind::leaf("FLOW_ELEMENT_LIMIT_USAGE").text("{2}"),
    RecordKind::leaf("FLOW_INTERVIEW_FINISHED_LIMIT_USAGE").text("{2}"),
    RecordKind::leaf("FLOW_SUBFLOW_DETAIL").text("{2} : {3} : {4} : {5}"),
    RecordKind::leaf("FLOW_VALUE_ASSIGNMENT").text("{3} {4}").kind_group(),
    RecordKind::leaf("FLOW_WAIT_EVENT_RESUMING_DETAIL").text("{2} : {3} : {4} : {5}"),
    RecordKind::leaf("FLOW_WAIT_EVENT_WAITING_DETAIL").text("{2} : {3} : {4} : {5} : {6}"),
    RecordKind::leaf("FLOW_WAIT_RESUMING_DETAIL").text("{2} : {3} : {4}"),
    RecordKind::leaf("FLOW_WAIT_WAITING_DETAIL").text("{2} : {3} : {4} : {5}"),
    RecordKind::leaf("FLOW_INTERVIEW_FINISHED").text("{3}").kind_group(),
    RecordKind::leaf("FLOW_INTERVIEW_PAUSED").text("{2} : {3} : {4}"),
    RecordKind::leaf("FLOW_INTERVIEW_RESUMED").text("{2} : {3}"),
    RecordKind::leaf("FLOW_ACTIONCALL_DETAIL").text("{3} : {4} : {5} : {6}").kind_group(),
    RecordKind::leaf("FLOW_ASSIGNMENT_DETAIL").text("{3} : {4} : {5}").kind_group(),
    RecordKind::leaf("FLOW_LOOP_DETAIL").text("{3} : {4}").kind_group(),
    RecordKind::leaf("FLOW_RULE_DETAIL").text("{3} : {4}").kind_group(),
    RecordKind::frame("FLOW_BULK_ELEMENT_BEGIN", &["FLOW_BULK_ELEMENT_END"])
        .category(Custom)
        .text("{kind} - {2}")
        .kind_group(),
    RecordKind::exit("FLOW_BULK_ELEMENT_END"),
    RecordKind::leaf("FLOW_BULK_ELEMENT_DETAIL").text("{2} : {3} : {4}").kind_group(),
    RecordKind::leaf("FLOW_BULK_ELEMENT_LIMIT_USAGE").text("{2}").kind_group(),
    RecordKind::leaf("FLOW_BULK_ELEMENT_NOT_SUPPORTED").text("{2} : {3} : {4}"),
    // Push notifications
    RecordKind::leaf("PUSH_NOTIFICATION_INVALID_APP").text("{2}.{3}"),
    RecordKind::leaf("PUSH_NOTIFICATION_INVALID_CERTIFICATE").text("{2}.{3}"),
    RecordKind::leaf("PUSH_NOTIFICATION_INVALID_NOTIFICATION")
        .text("{2}.{3} : {4} : {5} : {6} : {7} : {8}"),
    RecordKind::leaf("PUSH_NOTIFICATION_NO_DEVICES").text("{2}.{3}"),
    RecordKind::leaf("PUSH_NOTIFICATION_NOT_ENABLED"),
    RecordKind::leaf("PUSH_NOTIFICATION_SENT").text("{2}.{3} : {4} : {5} : {6} : {7}"),
    // Entitlement processes
    RecordKind::leaf("SLA_END").text("{2} : {3} : {4} : {5} : {6}"),
    RecordKind::leaf("SLA_EVAL_MILESTONE").text("{2}"),
    RecordKind::leaf("SLA_NULL_START_DATE"),
    RecordKind::leaf("SLA_PROCESS_CASE").text("{2}"),
    // Validation rules
    RecordKind::leaf("VALIDATION_ERROR").text("{2}"),
    RecordKind::leaf("VALIDATION_FAIL"),
    RecordKind::leaf("VALIDATION_FORMULA")
        .accepts_text()
        .custom_text(validation_formula_text)
        .kind_group(),
    RecordKind::leaf("VALIDATION_PASS").text("{3}").kind_group(),
    RecordKind::leaf("VALIDATION_RULE").text("{3}").kind_group(),
    // Workflow
    RecordKind::leaf("WF_FLOW_ACTION_BEGIN"),
    RecordKind::leaf("WF_FLOW_ACTION_END"),
    RecordKind::leaf("WF_FLOW_ACTION_ERROR").text("{kind} {4}"),
    RecordKind::leaf("WF_FLOW_ACTION_ERROR_DETAIL").text("{kind} {2}"),
    RecordKind::leaf("WF_FIELD_UPDATE").text(" {2} {3} {4} {5} {6}").kind_group(),
    RecordKind::frame("WF_RULE_EVAL_BEGIN", &["WF_RULE_EVAL_END"])
        .category(Custom)
        .kind_text(),
    RecordKind::exit("WF_RULE_EVAL_END"),
    RecordKind::leaf("WF_RULE_EVAL_VALUE").text("{2}").kind_group(),
    RecordKind::leaf("WF_RULE_FILTER").accepts_text().text("{2}").kind_group(),
    RecordKind::exit("WF_RULE_NOT_EVALUATED"),
    RecordKind::frame("WF_CRITERIA_BEGIN", &["WF_CRITERIA_END", "WF_RULE_NOT_EVALUATED"])
        .category(Custom)
        .group("WF_CRITERIA")
        .text("WF_CRITERIA : {5} : {3}"),
    RecordKind::exit("WF_CRITERIA_END"),
    RecordKind::leaf("WF_FORMULA").accepts_text().text("{2} : {3}").kind_group(),
    RecordKind::leaf("WF_ACTION").text("{2}").kind_group(),
    RecordKind::leaf("WF_ACTIONS_END").text("{2}"),
    RecordKind::leaf("WF_ACTION_TASK").text("{2} : {3} : {4} : {5} : {6} : {7}"),
    RecordKind::leaf("WF_APPROVAL").text("{2} : {3} : {4}"),
    RecordKind::leaf("WF_APPROVAL_REMOVE").text("{2}"),
    RecordKind::leaf("WF_APPROVAL_SUBMIT").text("{2}"),
    RecordKind::leaf("WF_APPROVAL_SUBMITTER").text("{2} : {3} : {4}"),
    RecordKind::leaf("WF_ASSIGN").text("{2} : {3}"),
    RecordKind::leaf("WF_EMAIL_ALERT").text("{2} : {3} : {4}"),
    RecordKind::leaf("WF_EMAIL_SENT").text("{2} : {3} : {4}"),
    RecordKind::leaf("WF_ENQUEUE_ACTIONS").text("{2}"),
    RecordKind::leaf("WF_ESCALATION_ACTION").text("{2} : {3}"),
    RecordKind::leaf("WF_ESCALATION_RULE"),
    RecordKind::leaf("WF_EVAL_ENTRY_CRITERIA").text("{2} : {3} : {4}"),
    RecordKind::leaf("WF_FLOW_ACTION_DETAIL").custom_text(flow_action_detail_text),
    RecordKind::leaf("WF_HARD_REJECT"),
    RecordKind::leaf("WF_NEXT_APPROVER").text("{2} : {3} : {4}"),
    RecordKind::leaf("WF_NO_PROCESS_FOUND"),
    RecordKind::leaf("WF_OUTBOUND_MSG").text("{2} : {3} : {4} : {5}"),
    RecordKind::leaf("WF_PROCESS_FOUND").text("{2} : {3}"),
    RecordKind::leaf("WF_REASSIGN_RECORD").text("{2} : {3}"),
    RecordKind::leaf("WF_RESPONSE_NOTIFY").text("{2} : {3} : {4} : {5}"),
    RecordKind::leaf("WF_RULE_ENTRY_ORDER").text("{2}"),
    RecordKind::leaf("WF_RULE_INVOCATION").text("{2}"),
    RecordKind::leaf("WF_SOFT_REJECT").text("{2}"),
    RecordKind::leaf("WF_SPOOL_ACTION_BEGIN").text("{2}"),
    RecordKind::leaf("WF_TIME_TRIGGER").text("{2} : {3} : {4} : {5}"),
    RecordKind::leaf("WF_TIME_TRIGGERS_BEGIN"),
    // Failures
    RecordKind::leaf("EXCEPTION_THROWN")
        .discontinuity()
        .line(2)
        .text("{3}")
        .kind_group()
        .alert(Alert::LimitException),
    RecordKind::leaf("FATAL_ERROR")
        .accepts_text()
        .discontinuity()
        .text("{2}")
        .alert(Alert::FatalError),
    // External data sources
    RecordKind::leaf("XDS_DETAIL").text("{2}"),
    RecordKind::leaf("XDS_RESPONSE").text("{2} : {3} : {4} : {5} : {6}"),
    RecordKind::leaf("XDS_RESPONSE_DETAIL").text("{2}"),
    RecordKind::leaf("XDS_RESPONSE_ERROR").text("{2}"),
];

/// Find the catalog entry for a type tag
pub fn lookup(kind: &str) -> Option<&'static RecordKind> {
    static INDEX: OnceLock<HashMap<&'static str, &'static RecordKind>> = OnceLock::new();
    INDEX
        .get_or_init(|| CATALOG.iter().map(|entry| (entry.name, entry)).collect())
        .get(kind)
        .copied()
}

/// `ClassName(args)` -> `Name(args)` from the constructor signature
fn constructor_text(fields: &Fields<'_>) -> String {
    let args = fields.get(4);
    let params = args.rfind('(').map_or(args, |open| &args[open..]);
    format!("{}{}", fields.get(5), params)
}

fn method_text(fields: &Fields<'_>) -> String {
    fields
        .non_empty(4)
        .or_else(|| fields.kind())
        .unwrap_or_default()
        .to_string()
}

/// Class loading is not billed as Apex CPU time
fn method_category(_fields: &Fields<'_>, record: &mut Record) -> Result<(), ParseError> {
    if record.text == "System.Type.forName(String, String)" {
        record.category = Some(Category::Loading);
    }
    Ok(())
}

fn validation_formula_text(fields: &Fields<'_>) -> String {
    if fields.len() > 3 {
        format!("{} {}", fields.get(2), fields.get(3))
    } else {
        fields.get(2).to_string()
    }
}

fn flow_action_detail_text(fields: &Fields<'_>) -> String {
    let mut text = format!("{} : {}", fields.get(2), fields.get(3));
    if let Some(extra) = fields.non_empty(4) {
        text.push_str(&format!(" : {} :{}", extra, fields.get(5)));
    }
    text
}

fn managed_package(fields: &Fields<'_>, record: &mut Record) -> Result<(), ParseError> {
    let raw = fields.get(2);
    let namespace = raw.rfind('.').map_or(raw, |dot| &raw[dot + 1..]);
    record.text = namespace.to_string();
    record.namespace = Some(namespace.to_string());
    Ok(())
}

/// Entry points are typed by the prefix of their name: `EventService:`,
/// `Validation:`, `Workflow:`, or anything else (Apex, VF pages, triggers).
fn code_unit_attributes(fields: &Fields<'_>, record: &mut Record) -> Result<(), ParseError> {
    let unit = fields.get(3);
    let name = fields.non_empty(4).unwrap_or(unit);
    let mut sub_parts = unit.split(':');
    let prefix = sub_parts.next().unwrap_or_default();
    let detail = sub_parts.next().unwrap_or_default();

    match prefix {
        "EventService" => {
            let namespace = object_namespace(detail);
            record.category = Some(Category::Method);
            record.group = Some(format!("EventService {}", namespace));
            record.namespace = Some(namespace.to_string());
            record.text = unit.to_string();
        }
        "Validation" => {
            record.category = Some(Category::Custom);
            record.group = Some("Validation".to_string());
            record.text = if name.is_empty() {
                format!("{}:{}", prefix, detail)
            } else {
                name.to_string()
            };
        }
        "Workflow" => {
            record.category = Some(Category::Custom);
            record.group = Some("Workflow".to_string());
            record.text = if name.is_empty() { prefix } else { name }.to_string();
        }
        _ => {
            record.category = Some(Category::Method);
            if name.starts_with("VF:") {
                record.namespace = Some(vf_namespace(name).to_string());
            }
            record.text = name.to_string();
        }
    }
    Ok(())
}

fn object_namespace(object: &str) -> &str {
    object.find("__").map_or("unmanaged", |sep| &object[..sep])
}

/// `VF: /apex/ns__Page` -> `ns`
fn vf_namespace(page: &str) -> &str {
    let Some(sep) = page.find("__") else {
        return "unmanaged";
    };
    let Some(first_slash) = page.find('/') else {
        return "unmanaged";
    };
    let Some(second_slash) = page[first_slash + 1..].find('/').map(|at| at + first_slash + 1) else {
        return "unmanaged";
    };
    page.get(second_slash + 1..sep).unwrap_or("unmanaged")
}
