//! Draws the three stacked regions described in spec.md §6: the 5-line
//! system summary, the 1-line status line, and the data table.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use pgconsole_core::collector::{CpuPercentages, LoadAvg};
use pgconsole_core::console::Console;
use pgconsole_core::engine::ActivityCounts;
use pgconsole_core::table::ResultTable;

use super::style::Styles;

/// Everything the host/summary lines need that isn't already on [`Console`].
pub struct SummaryData {
    pub now: String,
    pub load: LoadAvg,
    pub cpu: CpuPercentages,
    pub activity: Option<ActivityCounts>,
}

/// Draws the full screen for one frame.
pub fn draw(
    frame: &mut Frame,
    console: &Console,
    summary: &SummaryData,
    status: &str,
    editing_buffer: Option<&str>,
    table: Option<&ResultTable>,
) {
    let area = frame.area();
    let chunks = Layout::vertical([
        Constraint::Length(5),
        Constraint::Length(1),
        Constraint::Min(1),
    ])
    .split(area);

    draw_summary(frame, chunks[0], console, summary);
    draw_status(frame, chunks[1], status, editing_buffer);
    draw_table(frame, chunks[2], console, table);
}

fn draw_summary(frame: &mut Frame, area: Rect, console: &Console, summary: &SummaryData) {
    let lines = vec![
        Line::from(format!("pgconsole — {}  {}", console.current_view.label(), summary.now)),
        Line::from(format!(
            "load average: {:.2} {:.2} {:.2}",
            summary.load.one, summary.load.five, summary.load.fifteen
        )),
        Line::from(format!(
            "%cpu: us {:.1} sy {:.1} ni {:.1} id {:.1} wa {:.1} hi {:.1} si {:.1} st {:.1}",
            summary.cpu.user,
            summary.cpu.sys,
            summary.cpu.nice,
            summary.cpu.idle,
            summary.cpu.iowait,
            summary.cpu.hardirq,
            summary.cpu.softirq,
            summary.cpu.steal
        )),
        Line::from(format!(
            "conn: {}@{}:{}/{}  console {}/{}",
            console.conn.user,
            console.conn.host,
            console.conn.port,
            console.conn.dbname,
            console.id + 1,
            pgconsole_core::console::MAX_CONSOLES
        )),
        Line::from(activity_line(summary.activity)),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn activity_line(activity: Option<ActivityCounts>) -> String {
    match activity {
        Some(a) => format!(
            "activity: total {} idle {} idle-in-txn {} active {} waiting {} other {}",
            a.total, a.idle, a.idle_in_transaction, a.active, a.waiting, a.other
        ),
        None => "activity: -- (switch to long activity view to sample)".to_string(),
    }
}

fn draw_status(frame: &mut Frame, area: Rect, status: &str, editing_buffer: Option<&str>) {
    let text = match editing_buffer {
        Some(buf) => format!("min age: {buf}_"),
        None => status.to_string(),
    };
    let paragraph = Paragraph::new(Line::from(Span::raw(text))).style(Styles::status_line());
    frame.render_widget(paragraph, area);
}

fn draw_table(frame: &mut Frame, area: Rect, console: &Console, table: Option<&ResultTable>) {
    let block = Block::default().borders(Borders::NONE);

    let Some(table) = table else {
        frame.render_widget(Paragraph::new("We didn't get any data.").block(block), area);
        return;
    };

    let sort = console.sort_state(console.current_view);
    let widths: Vec<Constraint> = table
        .column_widths()
        .into_iter()
        .map(|w| Constraint::Length(w as u16))
        .collect();

    let header_cells: Vec<Cell> = table
        .column_names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let style = if i as i32 == sort.order_key {
                Styles::sort_column_header()
            } else {
                Styles::table_header()
            };
            Cell::from(name.as_str()).style(style)
        })
        .collect();

    let rows = table.cells.iter().map(|row| {
        Row::new(row.iter().map(|c| Cell::from(c.as_str())).collect::<Vec<_>>())
    });

    let widget = Table::new(rows, widths)
        .header(Row::new(header_cells))
        .block(block);

    frame.render_widget(widget, area);
}
