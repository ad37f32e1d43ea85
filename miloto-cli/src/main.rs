mod display;
mod source;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use log::{LevelFilter, info, warn};
use serde::Serialize;

use miloto_core::config::{AppConfig, HistoryConfig, PlanConfig};
use miloto_core::generator::ComboGenerator;
use miloto_core::history::score_sources;
use miloto_core::models::{Calendar, DRAWS_PER_WEEK, HistoryReport};
use miloto_core::parse::{parse_base_date, parse_hot_numbers};
use miloto_core::planner::{PlanRequest, build_plan_with};
use miloto_core::sampler::RngSampler;
use miloto_core::schedule::{Anchor, compute_weekly_weights, draw_dates_from};

use crate::display::{display_calendar, display_dates, display_history};
use crate::source::CsvSource;

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum AnchorArg {
    /// Lunes de la semana de la fecha base
    #[default]
    WeekMonday,
    /// Lunes siguiente (la misma fecha si ya es lunes)
    NextMonday,
}

impl From<AnchorArg> for Anchor {
    fn from(arg: AnchorArg) -> Self {
        match arg {
            AnchorArg::WeekMonday => Anchor::WeekMonday,
            AnchorArg::NextMonday => Anchor::NextMonday,
        }
    }
}

#[derive(Parser)]
#[command(name = "miloto", version, about = "Planificador quincenal de apuestas MiLoto")]
struct Cli {
    /// Archivo de configuración JSON
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Mostrar trazas de depuración
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug, Clone)]
struct HistoryArgs {
    /// CSV de sorteos (ruta o URL http/https)
    #[arg(long, requires = "plays")]
    draws: Option<String>,

    /// CSV de jugadas (ruta o URL http/https)
    #[arg(long, requires = "draws")]
    plays: Option<String>,

    /// Cantidad de números sugeridos
    #[arg(long)]
    top_n: Option<usize>,

    /// Mínimo de jugadas para entrar al ranking (0 = sin filtro)
    #[arg(long)]
    min_played: Option<u32>,

    /// Separador de columnas del CSV
    #[arg(long, default_value = ",", value_parser = parse_delimiter)]
    delimiter: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Generar el plan de 12 apuestas para dos semanas
    Plan {
        /// Fecha base AAAA-MM-DD (por defecto: hoy)
        #[arg(short, long)]
        start: Option<String>,

        /// Números calientes separados por comas (ej: 3,4,19,32,33,35)
        #[arg(long)]
        hot: Option<String>,

        /// Números calientes por jugada (0..3)
        #[arg(long)]
        hot_count: Option<String>,

        /// Inicio del calendario
        #[arg(long, value_enum, default_value = "week-monday")]
        anchor: AnchorArg,

        /// Semilla para reproducir el plan
        #[arg(long)]
        seed: Option<u64>,

        /// Salida JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        history: HistoryArgs,
    },

    /// Calcular los números calientes a partir del historial
    Score {
        #[command(flatten)]
        history: HistoryArgs,

        /// Salida JSON
        #[arg(long)]
        json: bool,
    },

    /// Mostrar las 8 fechas de sorteo y el reparto de apuestas
    Dates {
        /// Fecha base AAAA-MM-DD (por defecto: hoy)
        #[arg(short, long)]
        start: Option<String>,

        #[arg(long, value_enum, default_value = "week-monday")]
        anchor: AnchorArg,
    },

    /// Mostrar la configuración efectiva
    Config,
}

#[derive(Serialize)]
struct PlanOutput<'a> {
    hot: &'a [u8],
    hot_count: usize,
    calendar: &'a Calendar,
    history: Option<&'a HistoryReport>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let config = match &cli.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("No se pudo cargar la configuración {:?}", path))?,
        None => AppConfig::default(),
    };

    match cli.command {
        Command::Plan {
            start,
            hot,
            hot_count,
            anchor,
            seed,
            json,
            history,
        } => cmd_plan(
            &config,
            start.as_deref(),
            hot.as_deref(),
            hot_count.as_deref(),
            anchor.into(),
            seed,
            json,
            &history,
        ),
        Command::Score { history, json } => cmd_score(&config, &history, json),
        Command::Dates { start, anchor } => cmd_dates(&config.plan, start.as_deref(), anchor.into()),
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn init_logger(verbose: bool) {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_env("RUST_LOG")
        .format_timestamp(None)
        .init();
}

/// Le lecteur CSV n'accepte qu'un octet : un seul caractère ASCII.
fn parse_delimiter(text: &str) -> std::result::Result<u8, String> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c as u8),
        _ => Err(format!("'{text}' no es un separador ASCII de un solo carácter")),
    }
}

fn base_date(start: Option<&str>) -> NaiveDate {
    let today = || chrono::Local::now().date_naive();
    match start {
        None => today(),
        Some(text) => parse_base_date(text).unwrap_or_else(|| {
            if !text.trim().is_empty() {
                warn!("Fecha '{}' inválida (formato AAAA-MM-DD); se usa hoy", text);
            }
            today()
        }),
    }
}

/// Liste saisie par l'utilisateur, ou liste par défaut si absente ou invalide.
fn resolve_hot(text: Option<&str>, plan: &PlanConfig) -> Vec<u8> {
    match text {
        None => plan.default_hot.clone(),
        Some(t) if t.trim().is_empty() => plan.default_hot.clone(),
        Some(t) => parse_hot_numbers(t, plan.max_number).unwrap_or_else(|e| {
            eprintln!("Error en tus números calientes: {e}");
            warn!("Se usa la lista por defecto {:?}", plan.default_hot);
            plan.default_hot.clone()
        }),
    }
}

fn resolve_hot_count(text: Option<&str>, plan: &PlanConfig) -> i64 {
    match text.map(|t| t.trim().parse::<i64>()) {
        Some(Ok(n)) => n,
        Some(Err(_)) => {
            warn!("Cantidad de calientes inválida; se usa {}", plan.default_hot_count);
            plan.default_hot_count as i64
        }
        None => plan.default_hot_count as i64,
    }
}

fn history_config(base: &HistoryConfig, args: &HistoryArgs) -> HistoryConfig {
    HistoryConfig {
        top_n: args.top_n.unwrap_or(base.top_n),
        min_played: args.min_played.unwrap_or(base.min_played),
        ..base.clone()
    }
}

/// Classement historique ; `None` si aucune source n'est fournie.
fn run_history(config: &AppConfig, args: &HistoryArgs) -> Option<miloto_core::Result<HistoryReport>> {
    let (draws, plays) = (args.draws.as_deref()?, args.plays.as_deref()?);
    let draws = CsvSource::new("sorteos", draws, args.delimiter);
    let plays = CsvSource::new("jugadas", plays, args.delimiter);
    let history = history_config(&config.history, args);
    Some(score_sources(&draws, &plays, &history, config.plan.max_number))
}

/// Le classement historique remplace la liste manuelle ; une source illisible
/// ou vide laisse la liste manuelle en place.
fn choose_hot(
    manual: Vec<u8>,
    outcome: Option<miloto_core::Result<HistoryReport>>,
) -> Result<(Vec<u8>, Option<HistoryReport>)> {
    match outcome {
        Some(Ok(report)) => {
            info!("Números calientes del historial: {:?}", report.suggested);
            Ok((report.suggested.clone(), Some(report)))
        }
        Some(Err(e)) if e.is_recoverable() => {
            eprintln!("⚠️  No se pudo usar el historial: {e}");
            warn!("Se mantiene la lista {:?}", manual);
            Ok((manual, None))
        }
        Some(Err(e)) => Err(e).context("Error al calcular el historial"),
        None => Ok((manual, None)),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_plan(
    config: &AppConfig,
    start: Option<&str>,
    hot: Option<&str>,
    hot_count: Option<&str>,
    anchor: Anchor,
    seed: Option<u64>,
    json: bool,
    history_args: &HistoryArgs,
) -> Result<()> {
    let plan = &config.plan;
    let hot_count = resolve_hot_count(hot_count, plan);
    let (hot_numbers, report) = choose_hot(resolve_hot(hot, plan), run_history(config, history_args))?;

    let request = PlanRequest {
        base_date: base_date(start),
        anchor,
        hot_pool: &hot_numbers,
        hot_count,
    };
    let mut sampler = RngSampler::from_seed_option(seed);
    let calendar = build_plan_with(&request, plan, &mut sampler).context("Error al generar el plan")?;

    let effective_hot = ComboGenerator::new(plan, &hot_numbers, hot_count).hot_count();

    if json {
        let output = PlanOutput {
            hot: &hot_numbers,
            hot_count: effective_hot,
            calendar: &calendar,
            history: report.as_ref(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if let Some(report) = &report {
        display_history(report, history_config(&config.history, history_args).min_played);
    }
    display_calendar(&calendar, &hot_numbers, effective_hot);
    Ok(())
}

fn cmd_score(config: &AppConfig, args: &HistoryArgs, json: bool) -> Result<()> {
    let report = run_history(config, args)
        .context("Indique --draws y --plays")?
        .context("No se pudo calcular el historial")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let history = history_config(&config.history, args);
        display_history(&report, history.min_played);
    }
    Ok(())
}

fn cmd_dates(plan: &PlanConfig, start: Option<&str>, anchor: Anchor) -> Result<()> {
    let dates = draw_dates_from(anchor.start(base_date(start)));
    let weeks: Vec<_> = dates
        .chunks(DRAWS_PER_WEEK)
        .map(|week| (week.to_vec(), compute_weekly_weights(week, plan)))
        .collect();
    display_dates(&weeks, |d| plan.is_payroll_day(d.day_of_month()));
    Ok(())
}
