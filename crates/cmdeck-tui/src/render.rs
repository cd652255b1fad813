// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use cmdeck_app::{
    Action, RunPhase, SessionState, Tab, UiState, run_phase, visible_lines,
};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph};
use time::macros::format_description;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const THEME_ENV: &str = "CMDECK_THEME";
pub const DEFAULT_SIZE: (u16, u16) = (120, 32);
/// Narrower terminals get a single tab-selected pane.
pub const TWO_PANE_MIN_COLUMNS: usize = 110;
const CHROME_ROWS: usize = 7;
const CURSOR_GLYPH: char = '▌';
const ELLIPSIS: char = '…';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    pub accent: Color,
    pub border: Color,
    pub muted: Color,
    pub reset: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "default",
            accent: Color::Cyan,
            border: Color::DarkGray,
            muted: Color::Gray,
            reset: Color::Reset,
        }
    }
}

impl Theme {
    pub const NAMES: [&'static str; 4] = ["default", "ocean", "amber", "mono"];

    pub fn named(name: &str) -> Option<Self> {
        let theme = match name.trim().to_lowercase().as_str() {
            "default" => Self::default(),
            "ocean" => Self {
                name: "ocean",
                accent: Color::LightBlue,
                border: Color::Blue,
                muted: Color::LightCyan,
                reset: Color::Reset,
            },
            "amber" => Self {
                name: "amber",
                accent: Color::Yellow,
                border: Color::LightYellow,
                muted: Color::DarkGray,
                reset: Color::Reset,
            },
            "mono" => Self {
                name: "mono",
                accent: Color::White,
                border: Color::Gray,
                muted: Color::DarkGray,
                reset: Color::Reset,
            },
            _ => return None,
        };
        Some(theme)
    }

    /// Environment value first, then the configured name, then the default.
    pub fn resolve(env_value: Option<&str>, configured: Option<&str>) -> Self {
        env_value
            .and_then(Self::named)
            .or_else(|| configured.and_then(Self::named))
            .unwrap_or_default()
    }

    pub fn from_env(configured: Option<&str>) -> Self {
        let env_value = std::env::var(THEME_ENV).ok();
        Self::resolve(env_value.as_deref(), configured)
    }

    fn style(&self, tone: Tone) -> Style {
        match tone {
            Tone::Plain => Style::default().fg(self.reset),
            Tone::Accent => Style::default().fg(self.accent).add_modifier(Modifier::BOLD),
            Tone::Border => Style::default().fg(self.border),
            Tone::Muted => Style::default().fg(self.muted),
            Tone::Selected => Style::default()
                .fg(self.accent)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Accent,
    Border,
    Muted,
    Selected,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrameRow {
    pub segments: Vec<(Tone, String)>,
}

impl FrameRow {
    fn plain(text: impl Into<String>) -> Self {
        Self::toned(Tone::Plain, text)
    }

    fn toned(tone: Tone, text: impl Into<String>) -> Self {
        Self {
            segments: vec![(tone, text.into())],
        }
    }

    fn push(&mut self, tone: Tone, text: impl Into<String>) {
        self.segments.push((tone, text.into()));
    }

    fn extend(&mut self, other: FrameRow) {
        self.segments.extend(other.segments);
    }

    pub fn text(&self) -> String {
        self.segments.iter().map(|(_, text)| text.as_str()).collect()
    }

    /// Width in terminal cells.
    pub fn width(&self) -> usize {
        self.segments
            .iter()
            .map(|(_, text)| UnicodeWidthStr::width(text.as_str()))
            .sum()
    }

    /// Truncates with an ellipsis or pads with spaces to exactly `width` cells.
    ///
    /// A wide glyph that would straddle the cut is dropped and its cell padded.
    fn fit(self, width: usize) -> Self {
        let total = self.width();
        if total <= width {
            let mut row = self;
            if total < width {
                row.push(Tone::Plain, " ".repeat(width - total));
            }
            return row;
        }

        let budget = width.saturating_sub(ELLIPSIS.width().unwrap_or(1));
        let mut used = 0;
        let mut segments = Vec::new();
        'segments: for (tone, text) in self.segments {
            let mut kept = String::new();
            for ch in text.chars() {
                let cells = ch.width().unwrap_or(0);
                if used + cells > budget {
                    if !kept.is_empty() {
                        segments.push((tone, kept));
                    }
                    break 'segments;
                }
                kept.push(ch);
                used += cells;
            }
            if !kept.is_empty() {
                segments.push((tone, kept));
            }
        }
        if width > 0 {
            let tone = segments.last().map_or(Tone::Plain, |(tone, _)| *tone);
            if used < budget {
                segments.push((Tone::Plain, " ".repeat(budget - used)));
            }
            segments.push((tone, ELLIPSIS.to_string()));
        }
        Self { segments }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedFrame {
    pub rows: Vec<FrameRow>,
    /// Output offset after clamping to the rendered viewport.
    pub output_offset: usize,
}

impl ComposedFrame {
    pub fn text_rows(&self) -> Vec<String> {
        self.rows.iter().map(FrameRow::text).collect()
    }

    fn lines(&self, theme: &Theme) -> Vec<Line<'static>> {
        self.rows
            .iter()
            .map(|row| {
                Line::from(
                    row.segments
                        .iter()
                        .map(|(tone, text)| Span::styled(text.clone(), theme.style(*tone)))
                        .collect::<Vec<_>>(),
                )
            })
            .collect()
    }
}

pub fn render(
    frame: &mut ratatui::Frame<'_>,
    ui: &mut UiState,
    session: &SessionState,
    catalog: &[Action],
    theme: &Theme,
) {
    let area = frame.area();
    let (columns, rows) = if area.width == 0 || area.height == 0 {
        DEFAULT_SIZE
    } else {
        (area.width, area.height)
    };
    let composed = compose_frame(ui, session, catalog, usize::from(columns), usize::from(rows));
    ui.output_offset = composed.output_offset;

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(composed.lines(theme)), area);
}

pub fn terminal_size() -> (u16, u16) {
    crossterm::terminal::size()
        .ok()
        .filter(|(columns, rows)| *columns > 0 && *rows > 0)
        .unwrap_or(DEFAULT_SIZE)
}

/// Lays out one full frame; the same inputs always produce the same rows.
pub fn compose_frame(
    ui: &UiState,
    session: &SessionState,
    catalog: &[Action],
    columns: usize,
    rows: usize,
) -> ComposedFrame {
    let inner = columns.saturating_sub(2);
    let content_rows = rows.saturating_sub(CHROME_ROWS).max(1);
    let phase = run_phase(ui, session);

    let mut frame_rows = Vec::with_capacity(content_rows + CHROME_ROWS);
    frame_rows.push(border_row('┌', '┐', inner));
    frame_rows.push(boxed(header_row(ui, phase, inner)));
    frame_rows.push(border_row('├', '┤', inner));

    let (content, output_offset) = if columns >= TWO_PANE_MIN_COLUMNS {
        compose_two_pane(ui, session, catalog, inner, content_rows)
    } else {
        compose_single_pane(ui, session, catalog, inner, content_rows)
    };
    frame_rows.extend(content.into_iter().map(boxed));

    frame_rows.push(border_row('├', '┤', inner));
    frame_rows.push(boxed(status_row(ui, session, phase).fit(inner)));
    frame_rows.push(boxed(legend_row(ui).fit(inner)));
    frame_rows.push(border_row('└', '┘', inner));

    ComposedFrame {
        rows: frame_rows,
        output_offset,
    }
}

fn border_row(left: char, right: char, inner: usize) -> FrameRow {
    FrameRow::toned(
        Tone::Border,
        format!("{left}{}{right}", "─".repeat(inner)),
    )
}

fn boxed(row: FrameRow) -> FrameRow {
    let mut boxed = FrameRow::toned(Tone::Border, "│");
    boxed.extend(row);
    boxed.push(Tone::Border, "│");
    boxed
}

fn header_row(ui: &UiState, phase: RunPhase, width: usize) -> FrameRow {
    let mut left = FrameRow::toned(Tone::Accent, " cmdeck ");
    for (index, tab) in Tab::ALL.iter().enumerate() {
        let label = format!(" {} {} ", index + 1, tab.label());
        let tone = if *tab == ui.tab {
            Tone::Selected
        } else {
            Tone::Muted
        };
        left.push(Tone::Plain, " ");
        left.push(tone, label);
    }

    let badge = format!("[{}] ", phase.badge());
    let used = left.width() + UnicodeWidthStr::width(badge.as_str());
    if used <= width {
        left.push(Tone::Plain, " ".repeat(width - used));
        left.push(Tone::Accent, badge);
        left
    } else {
        left.fit(width)
    }
}

fn compose_single_pane(
    ui: &UiState,
    session: &SessionState,
    catalog: &[Action],
    width: usize,
    height: usize,
) -> (Vec<FrameRow>, usize) {
    match ui.tab {
        Tab::Commands => (commands_pane(ui, catalog, width, height), ui.output_offset),
        Tab::Output => output_pane(ui, session, width, height),
        Tab::Help => (help_pane(width, height), ui.output_offset),
    }
}

fn compose_two_pane(
    ui: &UiState,
    session: &SessionState,
    catalog: &[Action],
    inner: usize,
    height: usize,
) -> (Vec<FrameRow>, usize) {
    let left_width = inner * 2 / 5;
    let right_width = inner - left_width - 1;
    let left = commands_pane(ui, catalog, left_width, height);
    let (right, offset) = if ui.tab == Tab::Help {
        (help_pane(right_width, height), ui.output_offset)
    } else {
        output_pane(ui, session, right_width, height)
    };

    let rows = left
        .into_iter()
        .zip(right)
        .map(|(mut row, right)| {
            row.push(Tone::Border, "│");
            row.extend(right);
            row
        })
        .collect();
    (rows, offset)
}

/// Fits each row to `width` and pads or cuts the list to `height` rows.
fn fill_pane(mut rows: Vec<FrameRow>, width: usize, height: usize) -> Vec<FrameRow> {
    rows.truncate(height);
    rows.resize_with(height, FrameRow::default);
    rows.into_iter().map(|row| row.fit(width)).collect()
}

fn commands_pane(ui: &UiState, catalog: &[Action], width: usize, height: usize) -> Vec<FrameRow> {
    let mut rows = Vec::new();
    for (index, action) in catalog.iter().enumerate() {
        let active = index == ui.active_index;
        let marker = if active { '›' } else { ' ' };
        let text = format!("{marker} {}. {:<9} {}", index + 1, action.label, action.hint);
        if active {
            rows.push(FrameRow::toned(Tone::Selected, text).fit(width));
        } else {
            rows.push(FrameRow::plain(text));
        }
    }

    if let Some(action) = catalog.get(ui.active_index) {
        rows.push(FrameRow::default());
        rows.push(FrameRow::toned(Tone::Accent, format!(" {}", action.label)));
        rows.push(FrameRow::plain(format!(" {}", action.summary)));
        rows.push(muted_pair("usage", action.hint));
        rows.push(muted_pair("example", action.example));
        rows.push(muted_pair("cost", action.cost_hint));
        if !action.fields.is_empty() {
            let fields = action
                .fields
                .iter()
                .map(|field| {
                    if field.required {
                        format!("{}*", field.name)
                    } else {
                        field.name.to_owned()
                    }
                })
                .collect::<Vec<_>>()
                .join(", ");
            rows.push(muted_pair("fields", &fields));
        }
    }

    fill_pane(rows, width, height)
}

fn muted_pair(label: &str, value: &str) -> FrameRow {
    let mut row = FrameRow::toned(Tone::Muted, format!(" {label}: "));
    row.push(Tone::Plain, value);
    row
}

fn output_pane(
    ui: &UiState,
    session: &SessionState,
    width: usize,
    height: usize,
) -> (Vec<FrameRow>, usize) {
    let stream = ui.output_stream();
    let viewport_height = height.saturating_sub(2);
    let view = visible_lines(
        &session.output,
        &ui.output_search,
        stream,
        ui.output_offset,
        viewport_height,
    );

    let mut title = format!(" {} ", stream.label());
    if !ui.output_search.is_empty() {
        title.push_str(&format!("· filter \"{}\" ", ui.output_search));
    }
    if session.output.evicted() > 0 {
        title.push_str(&format!("· {} older lines dropped ", session.output.evicted()));
    }

    let mut rows = vec![FrameRow::toned(Tone::Muted, title)];
    if view.total == 0 {
        let hint = if session.output.is_empty() {
            " no output yet · select an action and press enter"
        } else {
            " no matching lines"
        };
        rows.push(FrameRow::toned(Tone::Muted, hint));
    }
    rows.extend(view.lines.iter().map(|line| FrameRow::plain(line.text.clone())));
    rows.truncate(height.saturating_sub(1));
    rows.resize_with(height.saturating_sub(1), FrameRow::default);
    if height > 0 {
        rows.push(FrameRow::toned(Tone::Muted, format!(" {}", view.footer())));
    }

    (fill_pane(rows, width, height), view.offset)
}

const HELP_LINES: [(&str, &str); 12] = [
    ("↑/↓ or k/j", "move selection (wraps)"),
    ("enter", "run the selected action"),
    ("tab", "cycle commands → output → help"),
    ("1 / 2 / 3", "jump to commands, output, help"),
    ("pgup / pgdn", "scroll output by 10 lines"),
    ("/", "filter output (empty clears)"),
    (": or ctrl+p", "palette: jump to best matching action"),
    ("e", "toggle stdout / stderr view"),
    ("?", "toggle help"),
    ("esc or q", "quit"),
    ("ctrl+c", "quit, or abort the current prompt"),
    ("", "running commands always finish; quitting leaves them running"),
];

fn help_pane(width: usize, height: usize) -> Vec<FrameRow> {
    let rows = HELP_LINES
        .iter()
        .map(|(keys, description)| {
            let mut row = FrameRow::toned(Tone::Accent, format!(" {keys:<14}"));
            row.push(Tone::Plain, *description);
            row
        })
        .collect();
    fill_pane(rows, width, height)
}

fn status_row(ui: &UiState, session: &SessionState, phase: RunPhase) -> FrameRow {
    let mut row = FrameRow::toned(Tone::Accent, format!(" [{}] ", phase.badge()));
    if let Some(prompt) = &ui.inline_prompt {
        row.push(Tone::Plain, format!("{}: {}{CURSOR_GLYPH}", prompt.label, prompt.value));
        return row;
    }

    row.push(Tone::Plain, session.last_status.clone());
    if !session.last_command.is_empty() {
        row.push(Tone::Muted, format!(" · $ {}", session.last_command));
    }
    if let Some(finished) = session.last_finished_at
        && !session.is_running()
        && let Ok(stamp) = finished.format(format_description!("[hour]:[minute]:[second]"))
    {
        row.push(Tone::Muted, format!(" · {stamp} UTC"));
    }
    if let Some(notice) = &session.notice {
        row.push(Tone::Accent, format!(" · {notice}"));
    }
    row
}

fn legend_row(ui: &UiState) -> FrameRow {
    let legend = if ui.inline_prompt.is_some() {
        " enter accept · esc cancel · backspace delete"
    } else {
        " ↑↓ move · enter run · tab/1-3 tabs · / filter · : palette · e stderr · pgup/pgdn scroll · ? help · q quit"
    };
    FrameRow::toned(Tone::Muted, legend)
}

#[cfg(test)]
mod tests {
    use super::{
        ComposedFrame, FrameRow, THEME_ENV, Theme, Tone, compose_frame, render,
    };
    use cmdeck_app::{
        BUILTIN_ACTIONS, InlinePrompt, OutputLine, SessionState, Tab, UiState,
    };
    use cmdeck_testkit::session_with_output;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::style::Color;
    use unicode_width::UnicodeWidthStr;

    fn assert_uniform_width(frame: &ComposedFrame, columns: usize) {
        for (index, row) in frame.text_rows().iter().enumerate() {
            assert_eq!(row.width(), columns, "row {index}: {row:?}");
        }
    }

    fn busy_session() -> SessionState {
        let mut session = session_with_output(&["alpha", "beta", "gamma"], &["oops"]);
        session.last_command = "cmdeck-target search \"AI agents\"".to_owned();
        session.last_status = "success".to_owned();
        session
    }

    #[test]
    fn fit_pads_short_rows_and_truncates_long_ones() {
        let short = FrameRow::plain("abc").fit(6);
        assert_eq!(short.text(), "abc   ");

        let mut long = FrameRow::toned(Tone::Accent, "abcd");
        long.push(Tone::Plain, "efgh");
        let cut = long.fit(6);
        assert_eq!(cut.text(), "abcde…");
        assert_eq!(cut.width(), 6);

        assert_eq!(FrameRow::plain("abc").fit(0).text(), "");
        assert_eq!(FrameRow::plain("abc").fit(1).text(), "…");
    }

    fn wide_glyph_session() -> SessionState {
        let mut session = session_with_output(&[&"漢字".repeat(60), "ok 😀 done"], &[]);
        session.last_command = "cmdeck-target search 検索".to_owned();
        session
    }

    #[test]
    fn fit_measures_wide_glyphs_in_cells() {
        let padded = FrameRow::plain("漢").fit(3);
        assert_eq!(padded.text(), "漢 ");

        let cut = FrameRow::plain("漢字漢字").fit(6);
        assert_eq!(cut.text(), "漢字 …");
        assert_eq!(cut.width(), 6);

        let cut = FrameRow::plain("a漢字").fit(4);
        assert_eq!(cut.text(), "a漢…");
    }

    #[test]
    fn every_row_matches_terminal_width_in_both_layouts() {
        for session in [busy_session(), wide_glyph_session()] {
            for columns in [40, 80, 109, 110, 160] {
                for tab in Tab::ALL {
                    let ui = UiState {
                        tab,
                        ..UiState::default()
                    };
                    let frame = compose_frame(&ui, &session, BUILTIN_ACTIONS, columns, 24);
                    assert_uniform_width(&frame, columns);
                    assert_eq!(frame.rows.len(), 24);
                }
            }
        }
    }

    #[test]
    fn wide_output_keeps_the_right_border_on_screen() -> anyhow::Result<()> {
        let session = wide_glyph_session();
        let mut ui = UiState {
            tab: Tab::Output,
            ..UiState::default()
        };
        let mut terminal = Terminal::new(TestBackend::new(80, 20))?;
        terminal.draw(|frame| render(frame, &mut ui, &session, BUILTIN_ACTIONS, &Theme::default()))?;

        let buffer = terminal.backend().buffer();
        for y in 0..20 {
            let edge = buffer.cell((79, y)).map(|cell| cell.symbol().to_owned());
            assert!(
                matches!(edge.as_deref(), Some("┐" | "┤" | "│" | "┘")),
                "row {y} ends with {edge:?}"
            );
        }
        Ok(())
    }

    #[test]
    fn status_row_appends_notice_after_running_status() {
        let mut session = busy_session();
        session.begin_run("cmdeck-target doctor");
        session.notify("run in progress; wait for it to finish");
        let ui = UiState::default();
        let frame = compose_frame(&ui, &session, BUILTIN_ACTIONS, 120, 24);
        let status = frame.rows[frame.rows.len() - 3].text();
        assert!(status.contains("[RUNNING] running · $ cmdeck-target doctor"));
        assert!(status.contains("· run in progress"));
    }

    #[test]
    fn wide_terminals_show_menu_and_output_side_by_side() {
        let session = busy_session();
        let ui = UiState::default();

        let wide = compose_frame(&ui, &session, BUILTIN_ACTIONS, 120, 24).text_rows();
        assert!(wide.iter().any(|row| row.contains("Search") && row.contains("stdout")));
        assert!(wide.iter().any(|row| row.contains("gamma")));

        let narrow = compose_frame(&ui, &session, BUILTIN_ACTIONS, 100, 24).text_rows();
        assert!(narrow.iter().any(|row| row.contains("Search")));
        assert!(!narrow.iter().any(|row| row.contains("gamma")));
    }

    #[test]
    fn output_tab_shows_stdout_by_default_and_stderr_when_toggled() {
        let session = busy_session();
        let mut ui = UiState {
            tab: Tab::Output,
            ..UiState::default()
        };
        let stdout_rows = compose_frame(&ui, &session, BUILTIN_ACTIONS, 80, 20).text_rows();
        assert!(stdout_rows.iter().any(|row| row.contains("beta")));
        assert!(!stdout_rows.iter().any(|row| row.contains("oops")));
        assert!(stdout_rows.iter().any(|row| row.contains("view 1-3 of 3 · offset 0")));

        ui.show_stderr = true;
        let stderr_rows = compose_frame(&ui, &session, BUILTIN_ACTIONS, 80, 20).text_rows();
        assert!(stderr_rows.iter().any(|row| row.contains("oops")));
        assert!(!stderr_rows.iter().any(|row| row.contains("beta")));
    }

    #[test]
    fn compose_clamps_out_of_range_offset() {
        let session = busy_session();
        let ui = UiState {
            tab: Tab::Output,
            output_offset: 500,
            ..UiState::default()
        };
        let frame = compose_frame(&ui, &session, BUILTIN_ACTIONS, 80, 20);
        assert_eq!(frame.output_offset, 0);

        let mut long = SessionState::default();
        for index in 0..40 {
            long.push_line(OutputLine::stdout(format!("line {index}")));
        }
        let frame = compose_frame(&ui, &long, BUILTIN_ACTIONS, 80, 20);
        // 20 rows minus 7 chrome rows minus pane title and footer
        assert_eq!(frame.output_offset, 40 - 11);
    }

    #[test]
    fn inline_prompt_shows_value_with_cursor() {
        let session = SessionState::default();
        let ui = UiState {
            inline_prompt: Some(InlinePrompt {
                label: "search query".to_owned(),
                value: "AI ag".to_owned(),
            }),
            ..UiState::default()
        };
        let rows = compose_frame(&ui, &session, BUILTIN_ACTIONS, 80, 20).text_rows();
        assert!(rows.iter().any(|row| row.contains("[INPUT] search query: AI ag▌")));
        assert!(rows.iter().any(|row| row.contains("esc cancel")));
    }

    #[test]
    fn header_highlights_current_tab_and_badge() {
        let session = busy_session();
        let ui = UiState {
            tab: Tab::Help,
            ..UiState::default()
        };
        let frame = compose_frame(&ui, &session, BUILTIN_ACTIONS, 80, 20);
        let header = &frame.rows[1];
        assert!(
            header
                .segments
                .iter()
                .any(|(tone, text)| *tone == Tone::Selected && text.contains("Help"))
        );
        assert!(header.text().contains("[DONE]"));
    }

    #[test]
    fn composing_twice_yields_identical_frames() {
        let session = busy_session();
        let ui = UiState {
            tab: Tab::Output,
            output_search: "a".to_owned(),
            ..UiState::default()
        };
        let first = compose_frame(&ui, &session, BUILTIN_ACTIONS, 132, 40);
        let second = compose_frame(&ui, &session, BUILTIN_ACTIONS, 132, 40);
        assert_eq!(first, second);
    }

    #[test]
    fn tiny_terminals_still_produce_bounded_rows() {
        let session = busy_session();
        let ui = UiState::default();
        let frame = compose_frame(&ui, &session, BUILTIN_ACTIONS, 3, 2);
        assert_uniform_width(&frame, 3);
        assert_eq!(frame.rows.len(), 8);
    }

    #[test]
    fn render_writes_clamped_offset_back() -> anyhow::Result<()> {
        let session = busy_session();
        let mut ui = UiState {
            tab: Tab::Output,
            output_offset: 99,
            ..UiState::default()
        };
        let mut terminal = Terminal::new(TestBackend::new(90, 20))?;
        terminal.draw(|frame| render(frame, &mut ui, &session, BUILTIN_ACTIONS, &Theme::default()))?;
        assert_eq!(ui.output_offset, 0);
        Ok(())
    }

    #[test]
    fn theme_resolution_prefers_env_then_config() {
        assert_eq!(Theme::resolve(Some("ocean"), Some("mono")).name, "ocean");
        assert_eq!(Theme::resolve(Some("neon"), Some("mono")).name, "mono");
        assert_eq!(Theme::resolve(None, Some("bogus")).name, "default");
        assert_eq!(Theme::resolve(Some(" AMBER "), None).accent, Color::Yellow);
        assert_eq!(THEME_ENV, "CMDECK_THEME");
        assert!(Theme::NAMES.iter().all(|name| Theme::named(name).is_some()));
    }
}
