use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use tracing::{debug, error, info};
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use coachloc_core::IdScheme;

#[derive(Parser)]
#[command(name = "coachloc", version, about = "Coach translation toolkit (Rust)")]
struct Cli {
    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the translatable units of a coach
    Scan {
        #[arg(short, long)]
        coach: PathBuf,
        #[arg(long)]
        out_csv: Option<PathBuf>,
        #[arg(long)]
        lang: Option<String>,
        #[arg(long, default_value_t = false)]
        legacy_ids: bool,
    },

    /// Check the translatable units of a coach for problems
    Validate {
        #[arg(short, long)]
        coach: PathBuf,
        #[arg(long, default_value_t = false)]
        legacy_ids: bool,
    },

    /// Extract translatable content into an XLIFF file
    Extract {
        #[arg(short, long)]
        coach: PathBuf,
        #[arg(long)]
        out_xlf: PathBuf,
        #[arg(long, default_value_t = false)]
        legacy_ids: bool,
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Merge translations from an XLIFF file into a fresh copy of a coach
    Merge {
        #[arg(short, long)]
        coach: PathBuf,
        #[arg(long)]
        xlf: PathBuf,
        /// Target language of this run; defaults to the configured one
        #[arg(long)]
        target_lang: Option<String>,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = false)]
        legacy_ids: bool,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn scheme_for(legacy_ids: bool, cfg_legacy: Option<bool>) -> IdScheme {
    if legacy_ids || cfg_legacy.unwrap_or(false) {
        IdScheme::legacy()
    } else {
        IdScheme::default()
    }
}

trait Runnable {
    fn run(self, use_color: bool) -> Result<()>;
}

impl Runnable for Commands {
    fn run(self, use_color: bool) -> Result<()> {
        let cmd_name = format!("{:?}", self);
        info!("Starting command: {}", cmd_name);

        let cfg = coachloc_config::load_config().unwrap_or_default();

        let result = match self {
            Commands::Scan {
                coach,
                out_csv,
                lang,
                legacy_ids,
            } => {
                debug!(
                    "Scan args: coach={:?} out_csv={:?} lang={:?} legacy_ids={}",
                    coach, out_csv, lang, legacy_ids
                );
                let scheme = scheme_for(legacy_ids, None);
                let units = coachloc_services::scan_units(&coach, &scheme)?;
                let lang = lang.or_else(|| cfg.scan.as_ref().and_then(|s| s.lang.clone()));
                if let Some(path) = out_csv {
                    let file = std::fs::File::create(path)?;
                    coachloc_export_csv::write_csv(file, &units, lang.as_deref())?;
                } else {
                    let stdout = std::io::stdout();
                    let lock = stdout.lock();
                    coachloc_export_csv::write_csv(lock, &units, lang.as_deref())?;
                }
                Ok(())
            }

            Commands::Validate { coach, legacy_ids } => {
                debug!("Validate args: coach={:?} legacy_ids={}", coach, legacy_ids);
                let scheme = scheme_for(legacy_ids, None);
                let units = coachloc_services::scan_units(&coach, &scheme)?;
                let msgs = coachloc_validate::validate(&units)?;
                if msgs.is_empty() {
                    println!("✔ No problems found");
                } else {
                    for m in &msgs {
                        let detail = match m.kind.as_str() {
                            "duplicate" => format!(
                                "seen {} time(s) before",
                                m.duplicate_count.unwrap_or(0)
                            ),
                            "placeholder-check" => format!(
                                "placeholders: {}",
                                m.placeholders
                                    .as_ref()
                                    .map(|p| {
                                        p.iter().cloned().collect::<Vec<_>>().join(", ")
                                    })
                                    .unwrap_or_default()
                            ),
                            _ => String::new(),
                        };
                        if !use_color {
                            println!("[{}] {} {}", m.kind, m.id, detail);
                        } else {
                            use owo_colors::OwoColorize;
                            let tag = match m.kind.as_str() {
                                "duplicate" => "⚠",
                                "empty" => "✖",
                                "placeholder-check" => "ℹ",
                                _ => "•",
                            };
                            let colored_kind: String = match m.kind.as_str() {
                                "duplicate" => format!("{}", m.kind.yellow()),
                                "empty" => format!("{}", m.kind.red()),
                                "placeholder-check" => format!("{}", m.kind.cyan()),
                                _ => format!("{}", m.kind.white()),
                            };
                            println!("{} [{}] {} {}", tag, colored_kind, m.id.green(), detail);
                        }
                    }
                }
                Ok(())
            }

            Commands::Extract {
                coach,
                out_xlf,
                legacy_ids,
                json,
            } => {
                debug!(
                    "Extract args: coach={:?} out_xlf={:?} legacy_ids={} json={}",
                    coach, out_xlf, legacy_ids, json
                );
                let scheme =
                    scheme_for(legacy_ids, cfg.extract.as_ref().and_then(|e| e.legacy_ids));
                let summary = coachloc_services::extract_coach(&coach, &out_xlf, &scheme)?;
                if json {
                    println!("{}", serde_json::to_string(&summary)?);
                } else {
                    println!(
                        "✔ {} unit(s) extracted to {} (source language: {})",
                        summary.units, summary.out_file, summary.source_lang
                    );
                }
                Ok(())
            }

            Commands::Merge {
                coach,
                xlf,
                target_lang,
                out,
                legacy_ids,
                json,
            } => {
                debug!(
                    "Merge args: coach={:?} xlf={:?} target_lang={:?} out={:?} legacy_ids={} json={}",
                    coach, xlf, target_lang, out, legacy_ids, json
                );
                let target = target_lang
                    .or_else(|| cfg.merge.as_ref().and_then(|m| m.target_lang.clone()))
                    .or_else(|| cfg.target_lang.clone());
                let Some(target) = target else {
                    eprintln!("error: a target language is required (--target-lang or coachloc.toml)");
                    std::process::exit(2);
                };
                let scheme = scheme_for(legacy_ids, cfg.merge.as_ref().and_then(|m| m.legacy_ids));
                let summary = coachloc_services::merge_coach(&coach, &xlf, &target, &out, &scheme)?;
                if json {
                    println!("{}", serde_json::to_string(&summary)?);
                } else if summary.complete {
                    println!(
                        "✔ Merge complete: {} translation(s) applied, written to {}",
                        summary.applied, summary.out_file
                    );
                } else {
                    println!(
                        "⚠ Merge incomplete: {} applied, {} missing, written to {}",
                        summary.applied, summary.missed, summary.out_file
                    );
                }
                if !summary.complete {
                    // written in full anyway; the exit code is for scripted pipelines
                    std::process::exit(1);
                }
                Ok(())
            }
        };

        match &result {
            Ok(_) => info!("Finished command: {}", cmd_name),
            Err(e) => error!("Command {} failed: {:?}", cmd_name, e),
        }

        result
    }
}

fn init_tracing() -> tracing_appender::non_blocking::WorkerGuard {
    let file_appender = rolling::daily("logs", "coachloc.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(file_writer)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    guard
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let _guard = init_tracing();

    let cli = Cli::parse();

    let use_color = !cli.no_color
        && std::io::stdout().is_terminal()
        && std::env::var_os("NO_COLOR").is_none();

    cli.cmd.run(use_color)
}
