// crates/dh_cli/src/commands.rs
//
// One function per subcommand. Results go to stdout (or --out); errors are
// returned to main for exit-code mapping.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use dh_algo::coalition;
use dh_core::{SimulationRequest, SimulationSummary};
use dh_io::canonical_json::{canonical_string, write_atomic};
use dh_io::hasher::snapshot_digest;
use dh_io::loader::{load_request, load_request_from_reader};
use dh_io::{ServiceError, SimulationService, SqliteStore};
use dh_report::{build_model, percent_one_decimal, render_html, render_json, render_quotients, render_text};

use crate::args::{Args, CalcArgs, CoalitionArgs, Command, InputArgs, OutputArgs, Render, SimCommand};
use crate::config::Config;
use crate::CliError;

pub fn run(args: &Args, cfg: &Config) -> Result<(), CliError> {
    match &args.command {
        Command::Calc(a) => calc(a),
        Command::Quotients(a) => quotients(a),
        Command::Coalition(a) => coalition_cmd(a),
        Command::Sim(cmd) => {
            let db = cfg.db_path(args.db.as_deref());
            sim(cmd, &db)
        }
    }
}

fn read_request(input: &InputArgs) -> Result<SimulationRequest, CliError> {
    let req = if input.input.as_os_str() == "-" {
        load_request_from_reader(io::stdin().lock())?
    } else {
        load_request(&input.input)?
    };
    debug!(seats = req.seats, parties = req.parties.len(), "request loaded");
    Ok(req)
}

fn calc(a: &CalcArgs) -> Result<(), CliError> {
    let request = read_request(&a.input)?;
    let (summary, snapshot) = dh_pipeline::process(&request)?;
    let text = match a.output.render {
        Render::Summary => canonical_string(&summary)?,
        Render::Snapshot => canonical_string(&snapshot)?,
        _ => render_report(&summary, &a.output, None)?,
    };
    emit(a.output.out.as_deref(), &text)
}

fn quotients(a: &InputArgs) -> Result<(), CliError> {
    let request = read_request(a)?;
    let table = dh_pipeline::quotient_breakdown(&request)?;
    emit(None, &render_quotients(&table))
}

fn coalition_cmd(a: &CoalitionArgs) -> Result<(), CliError> {
    let request = read_request(&a.input)?;
    let (summary, _) = dh_pipeline::process(&request)?;
    let members: Vec<&str> = a.parties.iter().map(String::as_str).collect();
    let c = coalition(&summary.results, summary.seats, &members)?;
    let text = format!(
        "members: {}\nseats: {} / {} ({})\nmajority: {}\nreaches majority: {}\n",
        c.members.join(", "),
        c.seats,
        c.total_seats,
        percent_one_decimal(u128::from(c.seats), u128::from(c.total_seats)),
        c.majority,
        if c.reaches_majority { "yes" } else { "no" },
    );
    emit(None, &text)
}

/// json/html/text renderers; the canonical JSON modes are handled by callers.
fn render_report(summary: &SimulationSummary, out: &OutputArgs, fallback_title: Option<&str>) -> Result<String, CliError> {
    let model = build_model(summary, out.title.as_deref().or(fallback_title))?;
    Ok(match out.render {
        Render::Json => render_json(&model)?,
        Render::Html => render_html(&model),
        Render::Text | Render::Summary | Render::Snapshot => render_text(&model),
    })
}

fn sim(cmd: &SimCommand, db: &str) -> Result<(), CliError> {
    info!(db, "opening simulation store");
    let store = SqliteStore::open(db).map_err(ServiceError::from)?;
    let svc = SimulationService::new(store);

    match cmd {
        SimCommand::Save { account, name, input } => {
            let request = read_request(input)?;
            let (id, _summary) = svc.save(*account, name, &request)?;
            emit(None, &id.to_string())
        }
        SimCommand::List { account } => {
            let mut text = String::new();
            for row in svc.list(*account)? {
                text.push_str(&format!(
                    "{}\t{}\t{}\n",
                    row.id,
                    row.saved_at.format("%Y-%m-%dT%H:%M:%SZ"),
                    row.name
                ));
            }
            emit(None, &text)
        }
        SimCommand::Show { account, id, digest, output } => {
            let stored = svc.get(*account, *id)?;
            if *digest {
                return emit(None, &snapshot_digest(&stored.snapshot)?);
            }
            let text = match output.render {
                Render::Summary => canonical_string(&stored.snapshot.summary())?,
                Render::Snapshot => canonical_string(&stored.snapshot)?,
                _ => render_report(&stored.snapshot.summary(), output, Some(stored.name.as_str()))?,
            };
            emit(output.out.as_deref(), &text)
        }
        SimCommand::Update { account, id, name, input } => {
            let request = read_request(input)?;
            svc.update(*account, *id, name, &request)?;
            Ok(())
        }
        SimCommand::Delete { account, id } => {
            svc.delete(*account, *id)?;
            Ok(())
        }
        SimCommand::CheckName { account, name, exclude } => {
            if svc.name_available(*account, name, *exclude)? {
                Ok(())
            } else {
                Err(ServiceError::DuplicateName(name.trim().to_string()).into())
            }
        }
    }
}

/// Write to `out` atomically, or to stdout with a trailing newline.
fn emit(out: Option<&Path>, text: &str) -> Result<(), CliError> {
    match out {
        Some(path) => {
            write_atomic(path, text.as_bytes())
                .map_err(|source| CliError::Output { path: path.to_path_buf(), source })?;
            info!(path = %path.display(), bytes = text.len(), "output written");
            Ok(())
        }
        None => {
            let write = || -> io::Result<()> {
                let mut stdout = io::stdout().lock();
                stdout.write_all(text.as_bytes())?;
                if !text.is_empty() && !text.ends_with('\n') {
                    stdout.write_all(b"\n")?;
                }
                stdout.flush()
            };
            write().map_err(|source| CliError::Output { path: PathBuf::from("<stdout>"), source })
        }
    }
}
