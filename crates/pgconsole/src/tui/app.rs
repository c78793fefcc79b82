//! The single-threaded cooperative main loop (spec.md §5): a
//! non-blocking keystroke poll that doubles as the tick sleep, no
//! threads, no channels.

use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use pgconsole_core::collector::{
    CpuPercentages, CpuSample, HostSampler, PgClient, RealFs, cpu_percentages,
};
use pgconsole_core::console::{Console, MAX_CONSOLES};
use pgconsole_core::dispatch::{self, Command};
use pgconsole_core::engine::{self, ActivityCounts};
use pgconsole_core::table::ResultTable;
use pgconsole_core::view::ViewId;

use super::help::render_help;
use super::input::{self, AppAction};
use super::render::{self, SummaryData};

/// Normal tick interval (spec.md §4.7).
const NORMAL_TICK: Duration = Duration::from_secs(1);
/// Shortened retry after a skip tick, so the first real diff shows up fast.
const SKIP_TICK: Duration = Duration::from_millis(10);

pub struct App {
    consoles: [Console; MAX_CONSOLES],
    clients: [Option<PgClient>; MAX_CONSOLES],
    active: usize,
    status: String,
    help_open: bool,
    editing_min_age: Option<String>,
    last_table: [Option<ResultTable>; MAX_CONSOLES],
    last_activity: Option<ActivityCounts>,
    last_cpu_pct: CpuPercentages,
    host: HostSampler<RealFs>,
    prev_cpu: Option<CpuSample>,
    next_tick: Duration,
    should_quit: bool,
}

impl App {
    /// `first_client` must already be connected for `consoles[active]`.
    pub fn new(
        consoles: [Console; MAX_CONSOLES],
        active: usize,
        first_client: PgClient,
        proc_path: impl Into<String>,
    ) -> Self {
        let mut clients: [Option<PgClient>; MAX_CONSOLES] = std::array::from_fn(|_| None);
        clients[active] = Some(first_client);

        Self {
            consoles,
            clients,
            active,
            status: String::new(),
            help_open: false,
            editing_min_age: None,
            last_table: std::array::from_fn(|_| None),
            last_activity: None,
            last_cpu_pct: CpuPercentages::default(),
            host: HostSampler::new(RealFs::new(), proc_path),
            prev_cpu: None,
            next_tick: NORMAL_TICK,
            should_quit: false,
        }
    }

    pub fn run(mut self, tick_rate: Duration) -> io::Result<()> {
        self.next_tick = tick_rate;
        let mut terminal = setup_terminal()?;

        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;

            if event::poll(self.next_tick)? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
                continue;
            }

            self.on_tick();
        }

        teardown_terminal(&mut terminal)
    }

    fn handle_key(&mut self, key: crossterm::event::KeyEvent) {
        if self.help_open {
            self.help_open = false;
            return;
        }

        match input::map_key(key, self.editing_min_age.is_some()) {
            AppAction::Quit => self.should_quit = true,
            AppAction::ToggleHelp => self.help_open = true,
            AppAction::Dispatch(cmd) => self.handle_command(cmd),
            AppAction::Noop => {}
        }
    }

    fn handle_command(&mut self, cmd: Command) {
        if let Command::EditMinAge(step) = cmd {
            self.handle_edit_step(step);
            return;
        }

        let starting_edit = matches!(cmd, Command::StartEditMinAge);
        let result = dispatch::dispatch(cmd, self.active, &mut self.consoles);
        self.status = result.message;

        if let Some(target) = result.switched_to {
            self.active = target;
            self.ensure_connected(target);
        }

        if starting_edit && self.consoles[self.active].current_view == ViewId::LongActivity {
            self.editing_min_age = Some(String::new());
        }
    }

    fn handle_edit_step(&mut self, step: pgconsole_core::dispatch::EditStep) {
        use pgconsole_core::dispatch::EditStep;
        let Some(buffer) = self.editing_min_age.as_mut() else {
            return;
        };

        match step {
            EditStep::Append(c) => buffer.push(c),
            EditStep::Backspace => {
                buffer.pop();
            }
            EditStep::Abort => {
                self.status = "min age edit aborted".to_string();
                self.editing_min_age = None;
            }
            EditStep::Commit => {
                let value = buffer.clone();
                self.editing_min_age = None;
                let console = &mut self.consoles[self.active];
                match console.set_min_age(&value) {
                    Ok(()) => {
                        console.first_iter = true;
                        self.status = format!("min_age set to {value}");
                    }
                    Err(e) => self.status = e,
                }
            }
        }
    }

    /// Connects `idx`'s client on first activation; a console with no
    /// configured connection (`conn_used == false`) is never reached here
    /// because the dispatcher already refused the switch.
    fn ensure_connected(&mut self, idx: usize) {
        if self.clients[idx].is_some() {
            return;
        }
        match PgClient::connect(&self.consoles[idx].conn) {
            Ok(client) => self.clients[idx] = Some(client),
            Err(e) => self.status = format!("Unable to connect to console {}: {e}", idx + 1),
        }
    }

    fn on_tick(&mut self) {
        let cpu_sample = self.host.sample_cpu().ok();
        if let (Some(prev), Some(curr)) = (self.prev_cpu, cpu_sample) {
            self.last_cpu_pct = cpu_percentages(&prev, &curr);
        }
        if let Some(curr) = cpu_sample {
            self.prev_cpu = Some(curr);
        }

        let active = self.active;
        let Some(client) = self.clients[active].as_mut() else {
            self.next_tick = NORMAL_TICK;
            return;
        };

        match engine::tick(&mut self.consoles[active], client) {
            Ok(outcome) => {
                if self.consoles[active].current_view == ViewId::LongActivity {
                    self.last_activity = Some(engine::summarize_activity(&outcome.table));
                }
                if outcome.skip {
                    self.next_tick = SKIP_TICK;
                } else {
                    self.last_table[active] = Some(outcome.table);
                    self.next_tick = NORMAL_TICK;
                }
            }
            Err(e) => {
                self.status = "We didn't get any data.".to_string();
                self.next_tick = NORMAL_TICK;
                tracing::warn!(error = %e, console = active, "refresh tick failed");
            }
        }
    }

    fn draw(&self, frame: &mut ratatui::Frame) {
        let console = &self.consoles[self.active];
        let summary = SummaryData {
            now: current_time_string(),
            load: self.host.sample_load_avg(),
            cpu: self.last_cpu_pct,
            activity: self.last_activity,
        };

        render::draw(
            frame,
            console,
            &summary,
            &self.status,
            self.editing_min_age.as_deref(),
            self.last_table[self.active].as_ref(),
        );

        if self.help_open {
            render_help(frame, frame.area());
        }
    }
}

fn current_time_string() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn teardown_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()
}
