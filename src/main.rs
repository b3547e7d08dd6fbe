// ==========================================
// 焊接工时计算系统 - 命令行入口
// ==========================================
// 全局参数: --data-file / --db / --lang / --verbose / --json
// 日志: 仅在 --verbose 或设置 RUST_LOG 时输出（stderr）
// ==========================================

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use welding_time::api::{ApiError, CalculationRequest, InputValidator};
use welding_time::app::{
    render_calculation, render_groups, render_history, render_request, render_validation,
    AppState,
};
use welding_time::config::AppConfig;
use welding_time::i18n::{t, t_with_args};
use welding_time::logging;

#[derive(Parser)]
#[command(name = "welding-time", version)]
#[command(about = "Welding (heat-sealing) labor time calculator", long_about = None)]
struct Cli {
    /// Product group data file (JSON)
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,

    /// Calculation history database (SQLite)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Interface language (pl, en)
    #[arg(long, global = true)]
    lang: Option<String>,

    /// Enable logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List product groups with their methods and time tables
    Groups,
    /// Add a product group
    GroupAdd {
        name: String,
        /// Canonical methods to include (comma separated)
        #[arg(long, value_delimiter = ',', conflicts_with = "all")]
        methods: Vec<String>,
        /// Include all seven canonical methods
        #[arg(long)]
        all: bool,
    },
    /// Remove a product group
    GroupRemove { name: String },
    /// Rename a product group
    GroupRename { name: String, new_name: String },
    /// Add a welding method to a group
    MethodAdd { group: String, method: String },
    /// Remove a welding method from a group
    MethodRemove { group: String, method: String },
    /// Edit bracket times: --set "<bracket>=<workers>:<minutes per meter>"
    MethodEdit {
        group: String,
        method: String,
        #[arg(long = "set", required = true)]
        settings: Vec<String>,
    },
    /// Rename a welding method within a group
    MethodRename {
        group: String,
        method: String,
        new_name: String,
    },
    /// Calculate welding time and save it to history
    Calc {
        #[arg(long)]
        code: String,
        #[arg(long)]
        group: String,
        #[arg(long)]
        bracket: String,
        /// Meters per method: "<method>=<meters>" (repeatable)
        #[arg(long = "meters")]
        meters: Vec<String>,
        /// Forced worker count: "<method>=<workers>" (repeatable)
        #[arg(long = "force")]
        force: Vec<String>,
        /// Measured production time in minutes
        #[arg(long)]
        production: Option<String>,
    },
    /// Record the measured production time for a history entry
    Validate { id: i64, minutes: String },
    /// List calculation history (newest first)
    History,
    /// Delete a history entry
    HistoryDelete { id: i64 },
    /// Show a history entry as a ready-to-run calculation
    Recall { id: i64 },
    /// Export history to an .xlsx workbook
    Export { path: PathBuf },
}

fn main() {
    if let Err(e) = run() {
        match e.downcast_ref::<ApiError>() {
            Some(api_err) => eprintln!("{}", api_err.user_message()),
            None => eprintln!("{:#}", e),
        }
        std::process::exit(1);
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn changed(done: bool, ok_key: &str, fail_key: &str, name: &str) {
    if done {
        println!("{}", t_with_args(ok_key, &[("name", name)]));
    } else {
        println!("{}", t_with_args(fail_key, &[("name", name)]));
    }
}

fn parse_request(
    code: String,
    group: String,
    bracket: &str,
    meters: &[String],
    force: &[String],
    production: Option<&str>,
) -> Result<CalculationRequest> {
    let mut request = CalculationRequest::new(code, group, InputValidator::parse_bracket(bracket)?);
    for raw in meters {
        let (method, value) = InputValidator::parse_assignment(raw)?;
        let value = InputValidator::parse_meters(&method, &value)?;
        request.meters.insert(method, value);
    }
    for raw in force {
        let (method, value) = InputValidator::parse_assignment(raw)?;
        let workers = InputValidator::parse_workers(&method, &value)?;
        request.forced_workers.insert(method, workers);
    }
    if let Some(raw) = production {
        request.production_time = Some(InputValidator::parse_production_time(raw)?);
    }
    Ok(request)
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        logging::init_with_default("debug");
    } else if std::env::var_os("RUST_LOG").is_some() {
        logging::init();
    }

    let config = AppConfig::resolve().with_overrides(cli.data_file, cli.db, cli.lang);
    let mut state = AppState::new(config)?;

    match cli.command {
        Commands::Groups => {
            let groups = state.data_store.groups();
            if cli.json {
                print_json(&groups)?;
            } else {
                print!("{}", render_groups(groups));
            }
        }
        Commands::GroupAdd { name, methods, all } => {
            let mut api = state.group_api();
            let added = if all {
                api.add_group_with_all_methods(&name)?
            } else {
                api.add_group(&name, &methods)?
            };
            changed(added, "groups.added", "groups.exists", name.trim());
        }
        Commands::GroupRemove { name } => {
            state.group_api().remove_group(&name)?;
            println!("{}", t("groups.removed"));
        }
        Commands::GroupRename { name, new_name } => {
            let renamed = state.group_api().rename_group(&name, &new_name)?;
            changed(renamed, "groups.renamed", "groups.exists", new_name.trim());
        }
        Commands::MethodAdd { group, method } => {
            let added = state.group_api().add_method(&group, &method)?;
            changed(added, "groups.method_added", "groups.method_exists", method.trim());
        }
        Commands::MethodRemove { group, method } => {
            state.group_api().remove_method(&group, &method)?;
            println!("{}", t("groups.method_removed"));
        }
        Commands::MethodEdit {
            group,
            method,
            settings,
        } => {
            let settings = settings
                .iter()
                .map(|raw| InputValidator::parse_time_setting(raw))
                .collect::<Result<Vec<_>, _>>()?;
            state.group_api().edit_method(&group, &method, &settings)?;
            println!("{}", t("groups.method_updated"));
        }
        Commands::MethodRename {
            group,
            method,
            new_name,
        } => {
            let renamed = state
                .group_api()
                .rename_method(&group, &method, &new_name)?;
            changed(renamed, "groups.method_updated", "groups.method_exists", new_name.trim());
        }
        Commands::Calc {
            code,
            group,
            bracket,
            meters,
            force,
            production,
        } => {
            let request =
                parse_request(code, group, &bracket, &meters, &force, production.as_deref())?;
            let outcome = state
                .calculation_api()
                .calculate(&state.data_store, &request)?;
            if cli.json {
                print_json(&outcome)?;
            } else {
                print!("{}", render_calculation(&outcome));
            }
        }
        Commands::Validate { id, minutes } => {
            let minutes = InputValidator::parse_production_time(&minutes)?;
            let outcome = state.calculation_api().validate(id, minutes)?;
            if cli.json {
                print_json(&outcome)?;
            } else {
                print!("{}", render_validation(&outcome));
            }
        }
        Commands::History => {
            let records = state.history_api().list()?;
            if cli.json {
                print_json(&records)?;
            } else {
                print!("{}", render_history(&records));
            }
        }
        Commands::HistoryDelete { id } => {
            let id_text = id.to_string();
            if state.history_api().delete(id)? {
                println!("{}", t_with_args("history.deleted", &[("id", &id_text)]));
            } else {
                println!("{}", t_with_args("history.not_deleted", &[("id", &id_text)]));
            }
        }
        Commands::Recall { id } => {
            let request = state.history_api().recall(id)?;
            if cli.json {
                print_json(&request)?;
            } else {
                print!("{}", render_request(&request));
            }
        }
        Commands::Export { path } => {
            state.history_api().export(&path)?;
            println!(
                "{}",
                t_with_args("history.exported", &[("path", &path.display().to_string())])
            );
        }
    }

    state.close()?;
    Ok(())
}
