//! pgconsole — an interactive terminal dashboard for observing a running
//! PostgreSQL server's statistics catalogs.
//!
//! Usage:
//!   pgconsole [OPTIONS] [DBNAME [USERNAME]]

use std::io::{self, Write};

use clap::Parser;
use tikv_jemallocator::Jemalloc;

use pgconsole_core::collector::PgClient;
use pgconsole_core::config;
use pgconsole_core::console::{Console, MAX_CONSOLES};

mod tui;

#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

/// Interactive statistics dashboard for a running PostgreSQL server.
#[derive(Parser)]
#[command(
    name = "pgconsole",
    version,
    about = "Interactive statistics dashboard for a running PostgreSQL server",
    disable_help_flag = true
)]
struct Args {
    #[arg(short = 'h', long = "host", value_name = "HOSTNAME")]
    host: Option<String>,

    #[arg(short = 'p', long = "port", value_name = "PORT")]
    port: Option<u16>,

    #[arg(short = 'U', long = "user", value_name = "USERNAME")]
    user: Option<String>,

    #[arg(short = 'd', long = "dbname", value_name = "DBNAME")]
    dbname: Option<String>,

    /// Never issue a password prompt.
    #[arg(short = 'w', long = "no-password")]
    no_password: bool,

    /// Force a password prompt before connecting.
    #[arg(short = 'W', long = "password")]
    force_password: bool,

    #[arg(short = '?', long = "help", action = clap::ArgAction::Help)]
    help: Option<bool>,

    #[arg(value_name = "DBNAME")]
    pos_dbname: Option<String>,

    #[arg(value_name = "USERNAME")]
    pos_username: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut consoles: [Console; MAX_CONSOLES] = std::array::from_fn(Console::new);

    apply_cli_overrides(&mut consoles[0], &args);
    load_config_file(&mut consoles, &args);
    consoles[0].conn_used = true;

    if args.force_password {
        match prompt_password() {
            Ok(pw) => consoles[0].conn.password = Some(pw),
            Err(e) => {
                eprintln!("pgconsole: {e}");
                std::process::exit(0);
            }
        }
    } else if args.no_password {
        consoles[0].conn.password = None;
    }

    let client = match PgClient::connect(&consoles[0].conn) {
        Ok(client) => client,
        Err(e) => {
            let conn = &consoles[0].conn;
            eprintln!(
                "pgconsole: could not connect to {}@{}:{}/{}: {e}",
                conn.user, conn.host, conn.port, conn.dbname
            );
            std::process::exit(0);
        }
    };

    let app = tui::App::new(consoles, 0, client, "/proc");
    if let Err(e) = app.run(std::time::Duration::from_secs(1)) {
        eprintln!("pgconsole: terminal error: {e}");
        std::process::exit(0);
    }
}

/// Applies `-h/-p/-U/-d` and the positional `[DBNAME [USERNAME]]`, in
/// that priority order, to console 0's connection parameters.
fn apply_cli_overrides(console: &mut Console, args: &Args) {
    if let Some(host) = &args.host {
        console.conn.host = host.clone();
    }
    if let Some(port) = args.port {
        console.conn.port = port;
    }
    if let Some(user) = &args.user {
        console.conn.user = user.clone();
    } else if let Some(user) = &args.pos_username {
        console.conn.user = user.clone();
    }
    if let Some(dbname) = &args.dbname {
        console.conn.dbname = dbname.clone();
    } else if let Some(dbname) = &args.pos_dbname {
        console.conn.dbname = dbname.clone();
    }
}

/// Loads `~/.pgcenterrc`. Its first line fills console 0 only if no CLI
/// option already did; remaining lines fill consoles 1..7, per spec.md §6.
fn load_config_file(consoles: &mut [Console; MAX_CONSOLES], args: &Args) {
    let Some(path) = config::default_path() else {
        return;
    };
    let conns = match config::read_connections(&path) {
        Ok(conns) => conns,
        Err(e) => {
            eprintln!("pgconsole: warning: ignoring {}: {e}", path.display());
            return;
        }
    };

    let cli_supplied_console0 = args.host.is_some()
        || args.port.is_some()
        || args.user.is_some()
        || args.dbname.is_some()
        || args.pos_dbname.is_some();

    let mut lines = conns.into_iter();
    if cli_supplied_console0 {
        lines.next();
    } else if let Some(first) = lines.next() {
        consoles[0].conn = first;
        consoles[0].conn_used = true;
    }

    for (console, conn) in consoles[1..].iter_mut().zip(lines) {
        console.conn = conn;
        console.conn_used = true;
    }
}

/// Reads a password from the terminal with input hidden, using the same
/// `crossterm` raw-mode machinery as the rest of the terminal surface
/// rather than a separate password-prompt dependency.
fn prompt_password() -> io::Result<String> {
    use crossterm::event::{self, Event, KeyCode};
    use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

    print!("Password: ");
    io::stdout().flush()?;

    enable_raw_mode()?;
    let mut password = String::new();
    let result = loop {
        match event::read() {
            Ok(Event::Key(key)) => match key.code {
                KeyCode::Enter => break Ok(()),
                KeyCode::Backspace => {
                    password.pop();
                }
                KeyCode::Char(c) => password.push(c),
                KeyCode::Esc => {
                    break Err(io::Error::new(io::ErrorKind::Interrupted, "password entry aborted"));
                }
                _ => {}
            },
            Ok(_) => {}
            Err(e) => break Err(e),
        }
    };
    disable_raw_mode()?;
    println!();
    result.map(|()| password)
}
