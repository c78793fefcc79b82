//! Help popup: a static key-binding reference, dismissed by any key.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

/// Renders the help popup centered over `area`.
pub fn render_help(frame: &mut Frame, area: Rect) {
    let popup_width = (area.width * 60 / 100).clamp(40, 70);
    let popup_height = (area.height * 60 / 100).clamp(12, 20);
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" pgconsole help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let content = help_lines();
    let paragraph = Paragraph::new(content)
        .wrap(Wrap { trim: false })
        .block(block)
        .style(Style::default().fg(Color::White));
    frame.render_widget(paragraph, popup_area);
}

fn help_lines() -> Vec<Line<'static>> {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Yellow));
    let rest = |s: &'static str| Span::raw(s);

    vec![
        Line::from(vec![key("d r t i y s l f"), rest("  select view")]),
        Line::from(vec![key("1..8"), rest("            switch console")]),
        Line::from(vec![key("\u{2190} \u{2192}"), rest("            move sort column")]),
        Line::from(vec![key("m"), rest("                edit min age (long activity view)")]),
        Line::from(vec![key("q / Ctrl-C"), rest("       quit")]),
        Line::from(vec![key("? / h"), rest("             this help")]),
        Line::from(""),
        Line::from(Span::styled(
            "press any key to close",
            Style::default().fg(Color::DarkGray),
        )),
    ]
}
