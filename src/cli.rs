use std::path::{Path, PathBuf};
use actix_web::cookie::Key;
use anyhow::Context;
use clap::{ArgAction, Parser};
use tracing::info;
use crate::display::{print_day_schedule, write_schedule_to_file};
use crate::export::{export_day, ExportFormat};
use crate::parser::load_roster;
use crate::schedule::{Day, DayView};
use crate::session::Workspace;
use crate::web::{start_server, ServerConfig};

/// Minimum length accepted by the cookie signing key
const SESSION_KEY_MIN_LEN: usize = 64;

#[derive(Debug, Parser)]
#[command(version, about = "Weekly shift scheduler with understaffing warnings and snapshot export")]
pub struct Cli {
    /// Verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Serve the scheduling page (default)
    Serve(ServeArgs),
    /// Print the schedule loaded from a roster CSV
    Show(ShowArgs),
    /// Export one day of a roster CSV as a snapshot document
    Export(ExportArgs),
}

#[derive(Debug, Parser)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, env = "SCHEDULER_BIND", default_value = "0.0.0.0")]
    bind: String,

    #[arg(short, long, env = "SCHEDULER_PORT", default_value_t = 8080)]
    port: u16,

    /// Idle minutes before a browser session's schedule is discarded
    #[arg(long, env = "SCHEDULER_SESSION_TTL_MINUTES", default_value_t = 240)]
    session_ttl_minutes: u32,

    /// Directory served under /static
    #[arg(long, env = "SCHEDULER_STATIC_DIR", default_value = "static")]
    static_dir: PathBuf,

    /// Cookie signing key (at least 64 bytes); generated at start when unset
    #[arg(long, env = "SCHEDULER_SESSION_KEY", hide_env_values = true)]
    session_key: Option<String>,
}

#[derive(Debug, clap::Args)]
pub struct ShowArgs {
    /// Roster CSV with columns day,location,employee,sales_projection
    roster: PathBuf,

    /// Only show this day
    #[arg(short, long)]
    day: Option<Day>,

    /// Also write the text schedule to this file (requires --day)
    #[arg(short, long, requires = "day")]
    out: Option<PathBuf>,
}

#[derive(Debug, clap::Args)]
pub struct ExportArgs {
    /// Roster CSV with columns day,location,employee,sales_projection
    roster: PathBuf,

    #[arg(short, long)]
    day: Day,

    #[arg(short, long, value_enum, default_value_t = ExportFormat::Pdf)]
    format: ExportFormat,

    /// Directory the document is written to
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        match self.command {
            Some(Command::Serve(args)) => args.run().await,
            Some(Command::Show(args)) => args.run(),
            Some(Command::Export(args)) => args.run(),
            None => ServeArgs::parse_from([env!("CARGO_PKG_NAME")]).run().await,
        }
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::INFO,
            1 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

impl ServeArgs {
    fn session_key(&self) -> anyhow::Result<Key> {
        match &self.session_key {
            Some(raw) if raw.len() < SESSION_KEY_MIN_LEN => anyhow::bail!(
                "SCHEDULER_SESSION_KEY must be at least {} bytes (got {})",
                SESSION_KEY_MIN_LEN,
                raw.len()
            ),
            Some(raw) => Ok(Key::from(raw.as_bytes())),
            None => {
                info!("no session key configured, sessions will not survive a restart");
                Ok(Key::generate())
            }
        }
    }

    async fn run(self) -> anyhow::Result<()> {
        let config = ServerConfig {
            session_key: self.session_key()?,
            bind: self.bind,
            port: self.port,
            session_ttl: chrono::Duration::minutes(i64::from(self.session_ttl_minutes)),
            static_dir: self.static_dir,
        };
        start_server(config).await.context("web server stopped with an error")
    }
}

fn load_workspace(roster: &Path) -> anyhow::Result<Workspace> {
    let schedule = load_roster(roster)
        .with_context(|| format!("failed to load roster {}", roster.display()))?;
    Ok(Workspace::with_schedule(schedule))
}

impl ShowArgs {
    fn run(self) -> anyhow::Result<()> {
        let mut workspace = load_workspace(&self.roster)?;
        let days = match self.day {
            Some(day) => vec![day],
            None => Day::ALL.to_vec(),
        };

        for day in days {
            workspace.select_day(day);
            print_day_schedule(&workspace.view());
        }

        if let Some(out) = &self.out {
            write_schedule_to_file(&workspace.view(), out)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Schedule saved to {}", out.display());
        }
        Ok(())
    }
}

impl ExportArgs {
    fn run(self) -> anyhow::Result<()> {
        let workspace = load_workspace(&self.roster)?;
        let view = DayView::build(workspace.schedule(), self.day);
        let document = export_day(&view, self.format)?;

        let path = self.out_dir.join(&document.file_name);
        std::fs::write(&path, &document.bytes)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Exported {} to {}", view.day, path.display());
        Ok(())
    }
}
