pub mod commands;
pub mod common;
pub mod parser;
pub mod reader;

pub use common::*;

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};

use crate::migration::{migrate, MigrationOptions};
use crate::reconcile;
use crate::render::{self, OutputFormat};
use crate::rule_suite::RuleSuiteFilter;
use parser::{parse_scope, ScopeKind};
use reader::{load_config, save_config, ConfigFormat};

#[derive(Parser)]
#[clap(name = "rulekit", version, about = "Manage, export and migrate GitHub rulesets")]
pub struct Args {
    /// Log at debug level unless RUST_LOG says otherwise
    #[clap(short, long, global = true)]
    verbose: bool,

    /// API token, falls back to GITHUB_TOKEN
    #[clap(long, env = "GH_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    /// Base URL of the REST API, overriding the one derived from the host
    #[clap(long, env = "RULEKIT_API_URL", global = true)]
    api_url: Option<String>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Organization rulesets
    Org {
        /// Organization as [HOST/]ORG
        #[clap(long, global = true)]
        owner: Option<String>,

        #[clap(subcommand)]
        action: RulesetAction,
    },
    /// Repository rulesets
    Repo {
        /// Repository as [HOST/]OWNER/REPO
        #[clap(short = 'R', long, env = "GH_REPO", global = true)]
        repo: Option<String>,

        #[clap(subcommand)]
        action: RulesetAction,
    },
}

#[derive(clap::Args)]
struct OutputArgs {
    /// Print JSON instead of a table
    #[clap(long)]
    json: bool,
}

impl OutputArgs {
    fn format(&self) -> OutputFormat {
        OutputFormat::from_json_flag(self.json)
    }
}

#[derive(Subcommand)]
enum RulesetAction {
    /// List rulesets
    #[clap(alias = "ls")]
    List {
        /// Include rulesets inherited from the organization (repositories only)
        #[clap(short = 'p', long)]
        includes_parent: bool,

        #[clap(flatten)]
        output: OutputArgs,
    },
    /// Show a single ruleset
    #[clap(alias = "view")]
    Get {
        id: u64,

        /// Also look among rulesets inherited from the organization (repositories only)
        #[clap(short = 'p', long)]
        includes_parent: bool,

        #[clap(flatten)]
        output: OutputArgs,
    },
    /// Delete a ruleset
    Delete { id: u64 },
    /// Write a ruleset as a portable config file
    Export {
        id: u64,

        /// Also look among rulesets inherited from the organization (repositories only)
        #[clap(short = 'p', long)]
        includes_parent: bool,

        /// Output file, stdout when omitted or `-`
        #[clap(short, long, parse(from_os_str))]
        output: Option<PathBuf>,

        #[clap(long, arg_enum)]
        format: Option<ConfigFormat>,
    },
    /// Apply a portable config file, matched by id or name
    Import {
        /// Config file, `-` for stdin
        #[clap(parse(from_os_str))]
        input: PathBuf,

        /// Create the ruleset when nothing matches
        #[clap(short = 'c', long)]
        create_if_none: bool,

        #[clap(long, arg_enum)]
        format: Option<ConfigFormat>,

        #[clap(flatten)]
        output: OutputArgs,
    },
    /// Copy rulesets to another scope of the same kind
    Migrate {
        /// Destination scope
        destination: String,

        /// Rulesets to migrate, all of them when omitted
        ids: Vec<u64>,

        /// Installation id to use for every integration bypass actor
        #[clap(long, alias = "github-actions-app-id")]
        integration_id: Option<u64>,
    },
    /// Rule suite evaluations
    Insight {
        #[clap(subcommand)]
        action: InsightAction,
    },
}

#[derive(Subcommand)]
enum InsightAction {
    /// List rule suites
    #[clap(alias = "ls")]
    List {
        /// Only suites for this ref
        #[clap(long = "ref")]
        git_ref: Option<String>,

        #[clap(long, possible_values = &["hour", "day", "week", "month"])]
        time_period: Option<String>,

        #[clap(long)]
        actor_name: Option<String>,

        #[clap(long, possible_values = &["pass", "fail", "bypass", "all"])]
        result: Option<String>,

        #[clap(flatten)]
        output: OutputArgs,
    },
    /// Show a single rule suite with its rule evaluations
    #[clap(alias = "view")]
    Get {
        id: u64,

        #[clap(flatten)]
        output: OutputArgs,
    },
}

pub async fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose)?;

    let settings = Settings::new(args.token, args.api_url);
    let (kind, scope, action) = match args.command {
        Command::Org { owner, action } => (ScopeKind::Organization, owner, action),
        Command::Repo { repo, action } => (ScopeKind::Repository, repo, action),
    };
    let scope = scope.ok_or_else(|| match kind {
        ScopeKind::Organization => anyhow!("--owner is required"),
        ScopeKind::Repository => anyhow!("--repo is required"),
    })?;

    execute(&settings, kind, &scope, action).await
}

async fn execute(
    settings: &Settings,
    kind: ScopeKind,
    scope: &str,
    action: RulesetAction,
) -> Result<()> {
    let scope = parse_scope(kind, scope, &settings.default_host)?;
    let provider = settings.provider_for(&scope)?;

    match action {
        RulesetAction::List {
            includes_parent,
            output,
        } => {
            check_includes_parent(kind, includes_parent)?;
            let out = commands::list(&provider, &scope, includes_parent, output.format())
                .await
                .with_context(|| format!("failed to list {} rulesets", kind.label()))?;
            print!("{}", with_newline(out));
        }
        RulesetAction::Get {
            id,
            includes_parent,
            output,
        } => {
            check_includes_parent(kind, includes_parent)?;
            let out = commands::get(&provider, &scope, id, includes_parent, output.format())
                .await
                .with_context(|| format!("failed to get {} ruleset {}", kind.label(), id))?;
            print!("{}", with_newline(out));
        }
        RulesetAction::Delete { id } => {
            commands::delete(&provider, &scope, id)
                .await
                .with_context(|| format!("failed to delete {} ruleset {}", kind.label(), id))?;
        }
        RulesetAction::Export {
            id,
            includes_parent,
            output,
            format,
        } => {
            check_includes_parent(kind, includes_parent)?;
            let config = commands::export(&provider, &scope, id, includes_parent)
                .await
                .with_context(|| format!("failed to export {} ruleset {}", kind.label(), id))?;
            save_config(&config, output.as_deref(), format)
                .context("failed to write ruleset config")?;
        }
        RulesetAction::Import {
            input,
            create_if_none,
            format,
            output,
        } => {
            let config = load_config(&input, format)
                .with_context(|| format!("failed to read `{}`", input.display()))?;
            let reconciled = reconcile::import(&provider, &scope, config, create_if_none)
                .await
                .with_context(|| format!("failed to import {} ruleset", kind.label()))?;
            let out = render::ruleset(reconciled.ruleset(), output.format())?;
            print!("{}", with_newline(out));
        }
        RulesetAction::Migrate {
            destination,
            ids,
            integration_id,
        } => {
            let destination = parse_scope(kind, &destination, &settings.default_host)?;
            let destination_provider = settings.provider_for(&destination)?;
            let options = MigrationOptions {
                source: scope,
                destination,
                ruleset_ids: ids,
                integration_override: integration_id,
            };

            let report = migrate(&provider, &destination_provider, &options)
                .await
                .with_context(|| format!("failed to migrate {} rulesets", kind.label()))?;
            println!(
                "migrated {} of {} rulesets",
                report.succeeded(),
                report.attempted()
            );
            if !report.is_success() {
                bail!("failed to migrate any rulesets");
            }
        }
        RulesetAction::Insight { action } => match action {
            InsightAction::List {
                git_ref,
                time_period,
                actor_name,
                result,
                output,
            } => {
                let filter = RuleSuiteFilter {
                    git_ref,
                    time_period,
                    actor_name,
                    rule_suite_result: result,
                };
                let out = commands::insight_list(&provider, &scope, &filter, output.format())
                    .await
                    .context("failed to list rule suites")?;
                print!("{}", with_newline(out));
            }
            InsightAction::Get { id, output } => {
                let out = commands::insight_get(&provider, &scope, id, output.format())
                    .await
                    .with_context(|| format!("failed to get rule suite {}", id))?;
                print!("{}", with_newline(out));
            }
        },
    }

    Ok(())
}

fn check_includes_parent(kind: ScopeKind, includes_parent: bool) -> Result<()> {
    if includes_parent && kind == ScopeKind::Organization {
        bail!("--includes-parent only applies to repositories");
    }
    Ok(())
}

fn with_newline(mut out: String) -> String {
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}
