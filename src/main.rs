use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use camino::Utf8PathBuf;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::sync::Mutex;

use hue::legacy_api::ApiBridgeState;
use hue::sim::SimBridge;
use hue_skill::config;
use hue_skill::console::{Command, ConsoleHost};
use hue_skill::error::SkillResult;
use hue_skill::schedule;
use hue_skill::skill::HueSkill;

type Skill = HueSkill<SimBridge, ConsoleHost>;

/// How long the simulated link button stays active after `press`
const LINK_BUTTON_WINDOW: Duration = Duration::from_secs(30);

/// Address the simulated bridge is discovered at
const SIM_BRIDGE_ADDRESS: &str = "127.0.0.1";

#[derive(Parser, Debug)]
#[command(version, about = "Philips Hue voice skill, driven from the console")]
struct Args {
    /// Configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: Utf8PathBuf,
}

/*
 * Formatter function to output in syslog format. This makes sense when running
 * as a service (where output might go to a log file, or the system journal)
 */
#[allow(clippy::match_same_arms)]
fn syslog_format(
    buf: &mut pretty_env_logger::env_logger::fmt::Formatter,
    record: &log::Record,
) -> std::io::Result<()> {
    writeln!(
        buf,
        "<{}>{}: {}",
        match record.level() {
            log::Level::Error => 3,
            log::Level::Warn => 4,
            log::Level::Info => 6,
            log::Level::Debug => 7,
            log::Level::Trace => 7,
        },
        record.target(),
        record.args()
    )
}

fn init_logging() -> SkillResult<()> {
    /* Try to provide reasonable default filters, when RUST_LOG is not specified */
    const DEFAULT_LOG_FILTERS: &[&str] = &["debug", "hue=info"];

    let log_filters = std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTERS.join(","));

    /* Detect if we need syslog or human-readable formatting */
    if std::env::var("SYSTEMD_EXEC_PID").is_ok_and(|pid| pid == std::process::id().to_string()) {
        Ok(pretty_env_logger::env_logger::builder()
            .format(syslog_format)
            .parse_filters(&log_filters)
            .try_init()?)
    } else {
        Ok(pretty_env_logger::formatted_timed_builder()
            .parse_filters(&log_filters)
            .try_init()?)
    }
}

fn load_bridge(state_file: Option<&Utf8PathBuf>) -> SkillResult<SimBridge> {
    let bridge = match state_file {
        Some(file) if file.is_file() => {
            log::info!("Loading bridge state from [{file}]");
            SimBridge::from_file(file)?
        }
        _ => {
            log::warn!("No bridge state file found, starting with an empty bridge");
            SimBridge::new(ApiBridgeState::default())
        }
    };

    Ok(bridge.with_discovery(SIM_BRIDGE_ADDRESS))
}

async fn start(skill: &mut Skill) -> SkillResult<()> {
    match skill.on_start().await {
        Err(err) if err.is_retryable() => {
            log::warn!("{err}");
            log::warn!("Type \"press\" to press the link button on the bridge");
            skill.on_start().await
        }
        res => res,
    }
}

async fn handle(skill: &Mutex<Skill>, cmd: Command) -> SkillResult<()> {
    match cmd {
        Command::Intent { name, session } => {
            let res = skill.lock().await.dispatch(&name, session).await?;
            log::debug!("{name}: {res:?}");
        }
        Command::Sleep => skill.lock().await.on_sleep().await?,
        Command::Press => {
            let bridge = skill.lock().await.bridge();
            bridge.lock().await.press_link_button(LINK_BUTTON_WINDOW);
        }
        Command::Quit => {}
    }
    Ok(())
}

async fn run() -> SkillResult<()> {
    init_logging()?;

    let args = Args::parse();

    let config = config::parse(&args.config)?;
    log::debug!("Configuration loaded successfully");

    let bridge = load_bridge(config.hue.bridge_state_file.as_ref())?;

    let mut skill = HueSkill::new(config, bridge, Arc::new(ConsoleHost));
    start(&mut skill).await?;
    skill.on_booted().await?;

    let skill = Arc::new(Mutex::new(skill));

    let ticker = {
        let skill = skill.clone();
        schedule::spawn_full_hour_ticker(move || {
            let skill = skill.clone();
            async move {
                if let Err(err) = skill.lock().await.on_full_hour().await {
                    log::error!("Full hour update failed: {err}");
                }
            }
        })
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = signal::ctrl_c() => {
                log::warn!("Ctrl-C pressed, exiting..");
                break;
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }

                match line.parse::<Command>() {
                    Ok(Command::Quit) => break,
                    Ok(cmd) => {
                        if let Err(err) = handle(&skill, cmd).await {
                            log::error!("{err}");
                        }
                    }
                    Err(err) => log::warn!("Cannot parse {line:?}: {err}"),
                }
            }
        }
    }

    ticker.abort();
    skill.lock().await.shutdown().await;
    let _ = std::io::stderr().flush();

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        log::error!("Hue skill error: {err}");
        log::error!("Fatal error encountered, cannot continue.");
    }
}
