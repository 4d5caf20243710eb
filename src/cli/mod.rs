//! `cashcast_cli` argument handling and command dispatch.

pub mod report;

use std::{
    env, fs,
    io::{self, IsTerminal, Write},
    path::Path,
};

use cashcast_config::{Config, ConfigManager, OutputFormat};
use cashcast_core::{AdvancedAlertService, RequestValidator};
use cashcast_domain::{AlertDomain, AlertFilter, MonthKey, ProjectionRequest, Severity};
use tracing::{info, warn};

use crate::{errors::CliError, utils::build_info};

use self::report::{AlertReport, ProjectionReport};

const USAGE: &str = "Usage: cashcast_cli <command>\n\
Commands:\n  \
project <request.json> [--months N] [--format json|text]\n  \
alerts <request.json> [--min-severity LEVEL] [--domain DOMAIN] [--category NAME]\n         \
[--month YYYY-MM] [--format json|text]\n  \
config show | set <key> <value> | backup [note] | backups | restore <backup>\n  \
version";

/// Entry point used by the binary: reads process arguments and writes to stdout.
pub fn run_cli() -> Result<(), CliError> {
    let manager = ConfigManager::from_env()?;
    let stdout = io::stdout();
    let color = stdout.is_terminal() && env::var_os("NO_COLOR").is_none();
    let mut out = stdout.lock();
    run(env::args().skip(1), &manager, color, &mut out)
}

/// Runs one command against `manager`, writing its output to `out`.
pub fn run<I, W>(args: I, manager: &ConfigManager, color: bool, out: &mut W) -> Result<(), CliError>
where
    I: IntoIterator<Item = String>,
    W: Write,
{
    let mut args = args.into_iter();
    let command = args.next().ok_or_else(|| usage("missing command"))?;
    let rest: Vec<String> = args.collect();

    match command.as_str() {
        "project" => cmd_project(&rest, manager, color, out),
        "alerts" => cmd_alerts(&rest, manager, color, out),
        "config" => cmd_config(&rest, manager, out),
        "version" | "--version" => {
            writeln!(out, "{}", build_info::current().summary())?;
            Ok(())
        }
        "help" | "--help" | "-h" => {
            writeln!(out, "{}", USAGE)?;
            Ok(())
        }
        other => Err(usage(&format!("unknown command `{}`", other))),
    }
}

/// Positional arguments plus `--flag value` pairs.
#[derive(Debug, Default)]
struct ParsedArgs {
    positional: Vec<String>,
    options: Vec<(String, String)>,
}

impl ParsedArgs {
    fn parse(args: &[String], allowed: &[&str]) -> Result<Self, CliError> {
        let mut parsed = Self::default();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            if let Some(flag) = arg.strip_prefix("--") {
                if !allowed.contains(&flag) {
                    return Err(usage(&format!("unknown option `--{}`", flag)));
                }
                let value = iter
                    .next()
                    .ok_or_else(|| usage(&format!("option `--{}` needs a value", flag)))?;
                parsed.options.push((flag.to_string(), value.clone()));
            } else {
                parsed.positional.push(arg.clone());
            }
        }
        Ok(parsed)
    }

    /// Last value given for `flag`.
    fn option(&self, flag: &str) -> Option<&str> {
        self.options
            .iter()
            .rev()
            .find(|(name, _)| name == flag)
            .map(|(_, value)| value.as_str())
    }

    fn values<'a>(&'a self, flag: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.options
            .iter()
            .filter(move |(name, _)| name == flag)
            .map(|(_, value)| value.as_str())
    }

    fn request_path(&self) -> Result<&Path, CliError> {
        match self.positional.as_slice() {
            [path] => Ok(Path::new(path)),
            [] => Err(usage("missing request file")),
            _ => Err(usage("expected a single request file")),
        }
    }

    fn format(&self, config: &Config) -> Result<OutputFormat, CliError> {
        match self.option("format") {
            Some(raw) => raw.parse().map_err(|err: String| usage(&err)),
            None => Ok(config.output),
        }
    }
}

fn cmd_project<W: Write>(
    args: &[String],
    manager: &ConfigManager,
    color: bool,
    out: &mut W,
) -> Result<(), CliError> {
    let parsed = ParsedArgs::parse(args, &["months", "format"])?;
    let config = manager.load()?;
    let months = parsed
        .option("months")
        .map(|raw| {
            raw.parse::<i32>()
                .map_err(|_| usage(&format!("invalid month count `{}`", raw)))
        })
        .transpose()?;
    let request = load_request(parsed.request_path()?, months, &config)?;

    let filter = AlertFilter {
        min_severity: Some(config.min_alert_severity),
        ..AlertFilter::default()
    };
    let report = ProjectionReport::build(&request, config.advanced_alerts.then_some(&filter));
    info!(
        months = report.months.len(),
        alerts = report.alerts.len(),
        "projection complete"
    );

    match parsed.format(&config)? {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?,
        OutputFormat::Text => write!(
            out,
            "{}",
            report.render_text(&config.currency, color && config.ui_color_enabled)
        )?,
    }
    Ok(())
}

fn cmd_alerts<W: Write>(
    args: &[String],
    manager: &ConfigManager,
    color: bool,
    out: &mut W,
) -> Result<(), CliError> {
    let parsed = ParsedArgs::parse(
        args,
        &["min-severity", "domain", "category", "month", "format"],
    )?;
    let config = manager.load()?;
    let request = load_request(parsed.request_path()?, None, &config)?;

    let min_severity = match parsed.option("min-severity") {
        Some(raw) => raw.parse::<Severity>().map_err(|err| usage(&err))?,
        None => config.min_alert_severity,
    };
    let domains = parsed
        .values("domain")
        .map(|raw| raw.parse::<AlertDomain>().map_err(|err| usage(&err)))
        .collect::<Result<Vec<_>, _>>()?;
    let month = parsed
        .option("month")
        .map(|raw| raw.parse::<MonthKey>().map_err(|err| usage(&err.to_string())))
        .transpose()?;
    let filter = AlertFilter {
        min_severity: Some(min_severity),
        domains,
        category: parsed.option("category").map(str::to_string),
        month,
    };

    let projections = cashcast_core::ProjectionService::project(&request);
    let alerts = filter.apply(&AdvancedAlertService::generate(&projections));
    let report = AlertReport { alerts };

    match parsed.format(&config)? {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&report.alerts)?)?
        }
        OutputFormat::Text => {
            let text = report.render_text(color && config.ui_color_enabled);
            write!(out, "{}", text)?
        }
    }
    Ok(())
}

fn cmd_config<W: Write>(
    args: &[String],
    manager: &ConfigManager,
    out: &mut W,
) -> Result<(), CliError> {
    let action = args.first().map(String::as_str).unwrap_or("show");
    match (action, &args[args.len().min(1)..]) {
        ("show", []) => {
            let config = manager.load()?;
            for (key, value) in config.entries() {
                writeln!(out, "{} = {}", key, value)?;
            }
        }
        ("set", [key, value]) => {
            manager.set_value(key, value)?;
            info!(key = %key, value = %value, "configuration updated");
            writeln!(out, "{} = {}", key, value.trim())?;
        }
        ("backup", rest) if rest.len() <= 1 => {
            let config = manager.load()?;
            let note = rest.first().map(String::as_str);
            let name = manager.backup(&config, note)?;
            writeln!(out, "Backup created: {}", name)?;
        }
        ("backups", []) => {
            let backups = manager.list_backups()?;
            if backups.is_empty() {
                writeln!(out, "No configuration backups.")?;
            }
            for name in backups {
                writeln!(out, "{}", name)?;
            }
        }
        ("restore", [name]) => {
            manager.restore(name)?;
            writeln!(out, "Configuration restored from {}", name)?;
        }
        _ => return Err(usage("invalid config command")),
    }
    Ok(())
}

/// Reads a request file; `months` overrides the file, and the configured default fills
/// a missing horizon.
fn load_request(
    path: &Path,
    months: Option<i32>,
    config: &Config,
) -> Result<ProjectionRequest, CliError> {
    let data = fs::read_to_string(path)?;
    let mut value: serde_json::Value = serde_json::from_str(&data)?;
    if let Some(object) = value.as_object_mut() {
        match months {
            Some(months) => {
                object.insert("months".into(), months.into());
            }
            None => {
                object
                    .entry("months")
                    .or_insert_with(|| config.default_months.into());
            }
        }
    }
    let request: ProjectionRequest = serde_json::from_value(value)?;
    if let Err(err) = RequestValidator::validate(&request) {
        warn!(path = %path.display(), error = %err, "request rejected");
        return Err(err.into());
    }
    Ok(request)
}

fn usage(reason: &str) -> CliError {
    CliError::Usage(format!("{}\n{}", reason, USAGE))
}
