//! Plain-text and JSON rendering of rulesets and rule suites.

use comfy_table::{presets::UTF8_FULL, Table};
use serde::Serialize;

use crate::error::Result;
use crate::rule_suite::RuleSuite;
use crate::ruleset::Ruleset;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Table
        }
    }
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn rulesets(rulesets: &[Ruleset], format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return to_json(rulesets);
    }

    let rows = rulesets
        .iter()
        .map(|ruleset| {
            vec![
                opt_id(ruleset.id),
                ruleset.name.clone(),
                json_label(&ruleset.target),
                json_label(&ruleset.enforcement),
                ruleset.source.clone().unwrap_or_default(),
            ]
        })
        .collect::<Vec<_>>();

    Ok(table(vec!["ID", "Name", "Target", "Enforcement", "Source"], rows))
}

pub fn ruleset(ruleset: &Ruleset, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return to_json(ruleset);
    }

    let mut out = String::new();
    push_field(&mut out, "ID", &opt_id(ruleset.id));
    push_field(&mut out, "Name", &ruleset.name);
    push_field(&mut out, "Target", &json_label(&ruleset.target));
    push_field(&mut out, "Enforcement", &json_label(&ruleset.enforcement));
    if let Some(source) = &ruleset.source {
        push_field(&mut out, "Source", source);
    }

    if let Some(ref_name) = ruleset
        .conditions
        .as_ref()
        .and_then(|conditions| conditions.ref_name.as_ref())
    {
        push_field(&mut out, "Include", &ref_name.include.join(", "));
        push_field(&mut out, "Exclude", &ref_name.exclude.join(", "));
    }

    out.push_str("\nRules:\n");
    if ruleset.rules.is_empty() {
        out.push_str("  (none)\n");
    }
    for rule in &ruleset.rules {
        match &rule.parameters {
            Some(parameters) => out.push_str(&format!("  {} {}\n", rule.rule_type, parameters)),
            None => out.push_str(&format!("  {}\n", rule.rule_type)),
        }
    }

    out.push_str("\nBypass actors:\n");
    let rows = ruleset
        .bypass_actors
        .iter()
        .map(|actor| {
            vec![
                actor.actor_type.to_string(),
                opt_id(actor.actor_id),
                json_label(&actor.bypass_mode),
            ]
        })
        .collect::<Vec<_>>();
    if rows.is_empty() {
        out.push_str("  (none)\n");
    } else {
        out.push_str(&table(vec!["Type", "ID", "Mode"], rows));
    }

    Ok(out)
}

pub fn rule_suites(suites: &[RuleSuite], format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return to_json(suites);
    }

    let rows = suites
        .iter()
        .map(|suite| {
            vec![
                suite.id.to_string(),
                suite.result.as_str().to_string(),
                suite.git_ref.clone().unwrap_or_default(),
                suite.actor_name.clone().unwrap_or_default(),
                suite.repository_name.clone().unwrap_or_default(),
                suite.pushed_at.clone().unwrap_or_default(),
            ]
        })
        .collect::<Vec<_>>();

    Ok(table(
        vec!["ID", "Result", "Ref", "Actor", "Repository", "Pushed at"],
        rows,
    ))
}

pub fn rule_suite(suite: &RuleSuite, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return to_json(suite);
    }

    let mut out = String::new();
    push_field(&mut out, "ID", &suite.id.to_string());
    push_field(&mut out, "Result", suite.result.as_str());
    if let Some(evaluation) = suite.evaluation_result {
        push_field(&mut out, "Evaluation", evaluation.as_str());
    }
    push_field(&mut out, "Ref", suite.git_ref.as_deref().unwrap_or_default());
    push_field(&mut out, "Actor", suite.actor_name.as_deref().unwrap_or_default());
    push_field(
        &mut out,
        "Repository",
        suite.repository_name.as_deref().unwrap_or_default(),
    );
    push_field(&mut out, "Before", suite.before_sha.as_deref().unwrap_or_default());
    push_field(&mut out, "After", suite.after_sha.as_deref().unwrap_or_default());
    push_field(&mut out, "Pushed at", suite.pushed_at.as_deref().unwrap_or_default());

    if !suite.rule_evaluations.is_empty() {
        out.push('\n');
        let rows = suite
            .rule_evaluations
            .iter()
            .map(|evaluation| {
                vec![
                    evaluation.rule_source.name.clone().unwrap_or_default(),
                    evaluation.rule_type.clone().unwrap_or_default(),
                    evaluation.enforcement.clone().unwrap_or_default(),
                    evaluation.result.clone().unwrap_or_default(),
                    evaluation.details.clone().unwrap_or_default(),
                ]
            })
            .collect::<Vec<_>>();
        out.push_str(&table(
            vec!["Source", "Rule", "Enforcement", "Result", "Details"],
            rows,
        ));
    }

    Ok(out)
}

fn push_field(out: &mut String, label: &str, value: &str) {
    out.push_str(&format!("{:<12} {}\n", format!("{}:", label), value));
}

fn opt_id(id: Option<u64>) -> String {
    id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string())
}

/// The serde name of a unit enum variant, e.g. `pull_request`.
fn json_label<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(label)) => label,
        _ => String::new(),
    }
}

fn table(header: Vec<&str>, rows: Vec<Vec<String>>) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(header);
    for row in rows {
        table.add_row(row);
    }

    format!("{}\n", table)
}
