//! freightdeck CLI — scripting client for the schedule API.
//!
//! Commands:
//! - `login` / `logout` — session management (tokens cached on disk)
//! - `vessels` / `ports` — reference listings
//! - `schedules` — filtered schedule listing (vessel path or origin path)
//! - `export` — write bulk, per-port, or template spreadsheets
//! - `import` — upload a filled-in spreadsheet
//! - `users` — account management

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use freightdeck_core::api::{HttpApi, ScheduleApi, SessionStore};
use freightdeck_core::cascade::ScheduleQuery;
use freightdeck_core::domain::Role;
use freightdeck_core::schema::{InviteRequest, UploadMode};
use freightdeck_exchange::{
    bulk_layout, export_bulk, export_per_port, export_template, group_by_port, report_lines,
    upload_file, write_csv, Config,
};

#[derive(Parser)]
#[command(name = "freightdeck", about = "freightdeck CLI — shipping schedule client")]
struct Cli {
    /// Config file. Defaults to the per-user config directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and cache the session tokens.
    Login {
        /// Account email. Prompts for the password.
        email: String,
    },
    /// Sign out and discard the cached tokens.
    Logout,
    /// List vessels.
    Vessels,
    /// List ports, optionally for one country.
    Ports {
        /// Country id to filter by.
        #[arg(long)]
        country: Option<String>,
    },
    /// List schedules for a complete filter path.
    Schedules {
        /// Vessel id (vessel path; needs --voyage, --transit, --destination).
        #[arg(long)]
        vessel: Option<String>,
        #[arg(long)]
        voyage: Option<String>,
        #[arg(long)]
        transit: Option<String>,

        /// Country id (origin path; needs --port, --destination).
        #[arg(long)]
        country: Option<String>,
        #[arg(long)]
        port: Option<String>,

        #[arg(long)]
        destination: Option<String>,
    },
    /// Export schedules as spreadsheets.
    Export {
        /// bulk (one grouped file), origin (one file per port), or template.
        #[arg(long, default_value = "bulk")]
        mode: String,

        /// Output directory. Defaults to the configured export dir.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Also write a CSV copy (bulk mode only).
        #[arg(long, default_value_t = false)]
        csv: bool,
    },
    /// Upload a filled-in spreadsheet.
    Import {
        /// The .xlsx file to upload.
        file: PathBuf,

        /// bulk (grouped sheet) or origin (single-port sheet).
        #[arg(long, default_value = "bulk")]
        mode: String,

        /// Update rows that already exist instead of skipping them.
        #[arg(long, default_value_t = false)]
        overwrite: bool,
    },
    /// Account management.
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },
}

#[derive(Subcommand)]
enum UsersAction {
    /// List all accounts.
    List,
    /// Invite a new account.
    Invite {
        name: String,
        email: String,
        /// admin, editor, or viewer.
        #[arg(long, default_value = "viewer")]
        role: String,
    },
    /// Remove an account.
    Remove { id: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(Config::default_path);
    let config = Config::load(&config_path)?;
    let session = SessionStore::load(Config::default_session_path());
    let api = HttpApi::with_timeout(
        config.api.base_url.clone(),
        session,
        std::time::Duration::from_secs(config.api.timeout_secs),
    );

    match cli.command {
        Commands::Login { email } => run_login(&api, &email),
        Commands::Logout => run_logout(&api),
        Commands::Vessels => run_vessels(&api),
        Commands::Ports { country } => run_ports(&api, country.as_deref()),
        Commands::Schedules {
            vessel,
            voyage,
            transit,
            country,
            port,
            destination,
        } => run_schedules(&api, vessel, voyage, transit, country, port, destination),
        Commands::Export { mode, out, csv } => {
            let out = out.unwrap_or_else(|| config.export.out_dir.clone());
            run_export(&api, &mode, &out, csv)
        }
        Commands::Import {
            file,
            mode,
            overwrite,
        } => run_import(&api, &file, &mode, overwrite),
        Commands::Users { action } => match action {
            UsersAction::List => run_users_list(&api),
            UsersAction::Invite { name, email, role } => run_users_invite(&api, name, email, &role),
            UsersAction::Remove { id } => run_users_remove(&api, &id),
        },
    }
}

fn run_login(api: &HttpApi, email: &str) -> Result<()> {
    let password = rpassword::prompt_password("Password: ")?;
    api.login(email, &password)
        .context("login failed")?;
    println!("Signed in as {email}.");
    Ok(())
}

fn run_logout(api: &HttpApi) -> Result<()> {
    if !api.is_logged_in() {
        println!("Not signed in.");
        return Ok(());
    }
    api.logout().context("logout failed")?;
    println!("Signed out.");
    Ok(())
}

fn run_vessels(api: &HttpApi) -> Result<()> {
    let vessels = api.vessels()?;
    println!("{:<26} {}", "Id", "Name");
    println!("{}", "-".repeat(50));
    for v in vessels {
        println!("{:<26} {}", v.id, v.name);
    }
    Ok(())
}

fn run_ports(api: &HttpApi, country: Option<&str>) -> Result<()> {
    let ports = api.ports(country)?;
    println!("{:<26} {:<20} {}", "Id", "Origin", "Transit hub");
    println!("{}", "-".repeat(64));
    for p in ports {
        println!("{:<26} {:<20} {}", p.id, p.origin_name, p.transit_name);
    }
    Ok(())
}

fn run_schedules(
    api: &HttpApi,
    vessel: Option<String>,
    voyage: Option<String>,
    transit: Option<String>,
    country: Option<String>,
    port: Option<String>,
    destination: Option<String>,
) -> Result<()> {
    let query = match (vessel, country) {
        (Some(vessel_id), None) => {
            let (Some(voyage), Some(transit), Some(destination)) = (voyage, transit, destination)
            else {
                bail!("the vessel path needs --voyage, --transit, and --destination");
            };
            ScheduleQuery::ByVessel {
                vessel_id,
                voyage,
                transit,
                destination,
            }
        }
        (None, Some(country_id)) => {
            let (Some(port_id), Some(destination)) = (port, destination) else {
                bail!("the origin path needs --port and --destination");
            };
            ScheduleQuery::ByOrigin {
                country_id,
                port_id,
                destination,
            }
        }
        (Some(_), Some(_)) => bail!("--vessel and --country are mutually exclusive"),
        (None, None) => bail!("one of --vessel or --country is required"),
    };

    let rows = api.schedules(Some(&query))?;
    if rows.is_empty() {
        println!("No schedules match.");
        return Ok(());
    }

    println!(
        "{:<20} {:<8} {:<14} {:<14} {:<10} {:<12} {:<10} {:>4}",
        "Vessel", "Voyage", "Origin", "Transit", "ETD", "Dest", "Dest ETA", "Days"
    );
    println!("{}", "-".repeat(98));
    for s in &rows {
        println!(
            "{:<20} {:<8} {:<14} {:<14} {:<10} {:<12} {:<10} {:>4}",
            s.vessel_name,
            s.voyage,
            s.origin_name,
            s.transit_name,
            s.etd.format("%d-%m-%Y"),
            s.destination,
            s.destination_eta.format("%d-%m-%Y"),
            s.transit_days,
        );
    }
    println!("{} schedule(s).", rows.len());
    Ok(())
}

fn run_export(api: &HttpApi, mode: &str, out: &std::path::Path, csv: bool) -> Result<()> {
    std::fs::create_dir_all(out)
        .with_context(|| format!("cannot create {}", out.display()))?;

    match mode {
        "template" => {
            let path = export_template(&out.join("schedule_template.xlsx"))?;
            println!("Wrote {}", path.display());
        }
        "bulk" => {
            let schedules = api.schedules(None)?;
            let path = export_bulk(&schedules, &out.join("schedules_bulk.xlsx"))?;
            println!("Wrote {}", path.display());
            if csv {
                let text = write_csv(&bulk_layout(&group_by_port(&schedules)))?;
                let csv_path = out.join("schedules_bulk.csv");
                std::fs::write(&csv_path, text)?;
                println!("Wrote {}", csv_path.display());
            }
        }
        "origin" => {
            let schedules = api.schedules(None)?;
            let files = export_per_port(&schedules, out)?;
            for file in &files {
                println!("Wrote {}", file.display());
            }
            println!("{} file(s).", files.len());
        }
        other => bail!("unknown export mode '{other}'. Valid: bulk, origin, template"),
    }
    Ok(())
}

fn run_import(api: &HttpApi, file: &std::path::Path, mode: &str, overwrite: bool) -> Result<()> {
    let mode = match mode {
        "bulk" => UploadMode::Bulk,
        "origin" => UploadMode::Origin,
        other => bail!("unknown import mode '{other}'. Valid: bulk, origin"),
    };
    let report = upload_file(api, file, overwrite, mode)?;
    for line in report_lines(&report) {
        println!("{line}");
    }
    if report.failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn run_users_list(api: &HttpApi) -> Result<()> {
    let users = api.users()?;
    println!("{:<26} {:<20} {:<28} {:<8} {}", "Id", "Name", "Email", "Role", "Status");
    println!("{}", "-".repeat(92));
    for u in users {
        println!(
            "{:<26} {:<20} {:<28} {:<8} {}",
            u.id,
            u.name,
            u.email,
            u.role.label(),
            u.status.label(),
        );
    }
    Ok(())
}

fn run_users_invite(api: &HttpApi, name: String, email: String, role: &str) -> Result<()> {
    let role = match role {
        "admin" => Role::Admin,
        "editor" => Role::Editor,
        "viewer" => Role::Viewer,
        other => bail!("unknown role '{other}'. Valid: admin, editor, viewer"),
    };
    let user = api.invite_user(&InviteRequest { name, email, role })?;
    println!("Invited {} ({}).", user.email, user.role.label());
    Ok(())
}

fn run_users_remove(api: &HttpApi, id: &str) -> Result<()> {
    api.delete_user(id)?;
    println!("Removed {id}.");
    Ok(())
}
