use super::*;
use crate::console::scripted::{Answer, ScriptedConsole};
use crate::imports::init_tracing;
use crate::spec::parameter::CustomPrompt;

fn tokens(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

fn contact_schema() -> ParameterSchema {
    SchemaBuilder::new()
        .param(ParameterSpecBuilder::text("name").required().interactive())
        .param(ParameterSpecBuilder::text("address").interactive())
        .build()
}

#[test]
fn test_resolve_name_and_absent_address() {
    init_tracing();
    let console = ScriptedConsole::new();
    let values = contact_schema()
        .resolve(&tokens(&["Alice"]), true, &console)
        .unwrap();

    assert_eq!(values.required_text("name").unwrap(), "Alice");
    assert_eq!(values.text("address").unwrap(), None);
    assert_eq!(console.prompt_count(), 0);
}

#[test]
fn test_not_enough_arguments_never_prompts() {
    init_tracing();
    let console = ScriptedConsole::new().line("should not be read");
    let err = contact_schema().resolve(&[], true, &console).unwrap_err();

    assert!(err.to_string().starts_with("not enough arguments"));
    assert_eq!(console.prompt_count(), 0);
    assert_eq!(console.remaining_answers(), 1);
}

#[test]
fn test_too_many_arguments_in_both_modes() {
    init_tracing();
    for non_interactive in [true, false] {
        let console = ScriptedConsole::new();
        let err = contact_schema()
            .resolve(&tokens(&["Alice", "Main st", "extra"]), non_interactive, &console)
            .unwrap_err();
        assert!(err.to_string().starts_with("too many arguments"));
        assert_eq!(console.prompt_count(), 0);
    }
}

#[test]
fn test_interactive_backfill_uses_prompt_text() {
    init_tracing();
    let console = ScriptedConsole::new().line("Bob").line("");
    let values = contact_schema().resolve(&[], false, &console).unwrap();

    assert_eq!(values.required_text("name").unwrap(), "Bob");
    assert!(!values.contains("address"));
    assert_eq!(
        console.prompts(),
        vec!["Enter name", "Enter address (optional)"]
    );
}

#[test]
fn test_interactive_empty_required_fails() {
    init_tracing();
    let console = ScriptedConsole::new().line("");
    let err = contact_schema().resolve(&[], false, &console).unwrap_err();
    assert_eq!(err.to_string(), "missing required argument `name`");
}

#[test]
fn test_empty_placeholder_for_required_is_missing() {
    init_tracing();
    let console = ScriptedConsole::new();
    let err = contact_schema()
        .resolve(&tokens(&[""]), true, &console)
        .unwrap_err();
    assert_eq!(err.to_string(), "missing required argument `name`");
}

#[test]
fn test_round_trip_through_reresolve() {
    init_tracing();
    let schema = SchemaBuilder::new()
        .param(ParameterSpecBuilder::text("title").required())
        .param(ParameterSpecBuilder::new("count", ParamType::Int).required())
        .param(ParameterSpecBuilder::new("pinned", ParamType::Bool))
        .param(ParameterSpecBuilder::new("tags", ParamType::CommaList))
        .build();
    let console = ScriptedConsole::new();

    let cases: [&[&str]; 3] = [
        &["Groceries", "42", "yes", "food,weekly"],
        &["Groceries", "-3", "off", ",,solo,"],
        &["Only title", "0"],
    ];
    for case in cases {
        let first = schema.resolve(&tokens(case), true, &console).unwrap();
        let second = schema.reresolve(&first, true, &console).unwrap();
        assert_eq!(first, second, "{case:?}");
    }
    assert_eq!(console.prompt_count(), 0);
}

#[test]
fn test_reresolve_keeps_false_and_zero() {
    let schema = SchemaBuilder::new()
        .param(ParameterSpecBuilder::new("force", ParamType::Bool).interactive())
        .param(ParameterSpecBuilder::new("days", ParamType::Int).interactive())
        .build();
    let console = ScriptedConsole::new();
    let existing = params! { "force" => false, "days" => 0i64 };

    let values = schema.reresolve(&existing, false, &console).unwrap();
    assert_eq!(values, existing);
    assert_eq!(console.prompt_count(), 0);
}

#[test]
fn test_default_applies_before_prompting() {
    let schema = SchemaBuilder::new()
        .param(
            ParameterSpecBuilder::new("days", ParamType::Int)
                .default_value(7i64)
                .interactive(),
        )
        .build();
    let console = ScriptedConsole::new();

    let values = schema.resolve(&[], false, &console).unwrap();
    assert_eq!(values.int("days").unwrap(), Some(7));
    assert_eq!(console.prompt_count(), 0);

    let values = schema.resolve(&tokens(&["30"]), true, &console).unwrap();
    assert_eq!(values.int("days").unwrap(), Some(30));
}

#[test]
fn test_optional_bool_skip_is_not_false() {
    let schema = SchemaBuilder::new()
        .param(ParameterSpecBuilder::new("force", ParamType::Bool).interactive())
        .build();

    let console = ScriptedConsole::with_answers([Answer::Bool(None)]);
    let values = schema.resolve(&[], false, &console).unwrap();
    assert_eq!(values.bool("force").unwrap(), None);

    let console = ScriptedConsole::with_answers([Answer::Bool(Some(false))]);
    let values = schema.resolve(&[], false, &console).unwrap();
    assert_eq!(values.bool("force").unwrap(), Some(false));
    assert_eq!(console.prompts(), vec!["Select 'force'"]);
}

#[test]
fn test_coercion_failure_names_the_parameter() {
    let schema = SchemaBuilder::new()
        .param(ParameterSpecBuilder::new("days", ParamType::Int).required())
        .build();
    let console = ScriptedConsole::new();

    let err = schema
        .resolve(&tokens(&["soon"]), true, &console)
        .unwrap_err();
    assert_eq!(err.to_string(), "can't parse argument `days`: soon");
    assert_eq!(
        format!("{err:#}"),
        "can't parse argument `days`: soon: invalid integer value: 'soon'"
    );
    let kind = AssistantError::find(&err).unwrap();
    assert_eq!(kind.title(), "Invalid Command");
}

#[test]
fn test_untyped_parser_errors_become_invalid_command() {
    let schema = SchemaBuilder::new()
        .param(
            ParameterSpecBuilder::text("code")
                .required()
                .parser(|raw: &str| -> Result<ParamValue> {
                    anyhow::ensure!(raw.len() == 3, "expected three characters");
                    Ok(ParamValue::Text(raw.to_uppercase()))
                }),
        )
        .build();
    let console = ScriptedConsole::new();

    let values = schema.resolve(&tokens(&["abc"]), true, &console).unwrap();
    assert_eq!(values.required_text("code").unwrap(), "ABC");

    let err = schema.resolve(&tokens(&["ab"]), true, &console).unwrap_err();
    assert_eq!(
        AssistantError::find(&err).unwrap().title(),
        "Invalid Command"
    );
    assert!(err.to_string().contains("expected three characters"));
}

#[test]
fn test_validator_errors_propagate_unchanged() {
    let schema = SchemaBuilder::new()
        .param(
            ParameterSpecBuilder::new("days", ParamType::Int)
                .required()
                .validator(|value: ParamValue| match value {
                    ParamValue::Int(days) if (1..=365).contains(&days) => Ok(value),
                    _ => Err(AssistantError::invalid_data("days must be within 1..=365")),
                }),
        )
        .build();
    let console = ScriptedConsole::new();

    let err = schema.resolve(&tokens(&["400"]), true, &console).unwrap_err();
    assert_eq!(err.to_string(), "days must be within 1..=365");
    assert_eq!(AssistantError::find(&err).unwrap().title(), "Invalid Data");
}

struct QueryPrompt;

impl CustomPrompt for QueryPrompt {
    fn prompt(&self, resolved: &ParameterValues, console: &dyn Console) -> Result<Option<String>> {
        if resolved.text("mode")? != Some("filter") {
            return Ok(None);
        }
        console.prompt_line("Query", None).map(Some)
    }
}

#[test]
fn test_custom_prompt_sees_earlier_parameters() {
    let schema = SchemaBuilder::new()
        .param(ParameterSpecBuilder::text("mode").select(vec![
            SelectOption::new("all", "Show all"),
            SelectOption::new("filter", "Filter"),
        ]))
        .param(
            ParameterSpecBuilder::new("query", ParamType::CommaMap)
                .default_with(|| ParamValue::Map(Default::default()))
                .custom_prompt(QueryPrompt),
        )
        .build();

    let console = ScriptedConsole::with_answers([Answer::Select(Some("all".into()))]);
    let values = schema.resolve(&[], false, &console).unwrap();
    assert_eq!(values.required_text("mode").unwrap(), "all");
    assert!(values.map("query").unwrap().is_empty());
    assert_eq!(console.prompt_count(), 1);

    let console = ScriptedConsole::with_answers([
        Answer::Select(Some("filter".into())),
        Answer::Line("name=ann".into()),
    ]);
    let values = schema.resolve(&[], false, &console).unwrap();
    assert_eq!(values.map("query").unwrap()["name"], "ann");
    assert_eq!(console.prompts(), vec!["Choose mode", "Query"]);
}

#[test]
fn test_typed_containers_pass_through() {
    let schema = SchemaBuilder::new()
        .param(ParameterSpecBuilder::new("keys", ParamType::CommaList).required())
        .build();
    let console = ScriptedConsole::new();
    // A list element containing a comma would split if it went back through text.
    let existing = params! { "keys" => vec!["a,b".to_string()] };

    let values = schema.reresolve(&existing, true, &console).unwrap();
    assert_eq!(values.list("keys").unwrap(), vec!["a,b"]);
}
