use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use serde::{Deserialize, Serialize};
use std::{fs, io, path::PathBuf};

const STORAGE_FILE: &str = "survey_responses.json";

const COUNTRIES: [&str; 195] = [
    "Afghanistan", "Albania", "Algeria", "Andorra", "Angola", "Antigua and Barbuda", "Argentina",
    "Armenia", "Australia", "Austria", "Azerbaijan", "Bahamas", "Bahrain", "Bangladesh",
    "Barbados", "Belarus", "Belgium", "Belize", "Benin", "Bhutan", "Bolivia",
    "Bosnia and Herzegovina", "Botswana", "Brazil", "Brunei", "Bulgaria", "Burkina Faso",
    "Burundi", "Cabo Verde", "Cambodia", "Cameroon", "Canada", "Central African Republic", "Chad",
    "Chile", "China", "Colombia", "Comoros", "Congo", "Costa Rica", "Croatia", "Cuba", "Cyprus",
    "Czech Republic", "Denmark", "Djibouti", "Dominica", "Dominican Republic", "East Timor",
    "Ecuador", "Egypt", "El Salvador", "Equatorial Guinea", "Eritrea", "Estonia", "Eswatini",
    "Ethiopia", "Fiji", "Finland", "France", "Gabon", "Gambia", "Georgia", "Germany", "Ghana",
    "Greece", "Grenada", "Guatemala", "Guinea", "Guinea-Bissau", "Guyana", "Haiti", "Honduras",
    "Hungary", "Iceland", "India", "Indonesia", "Iran", "Iraq", "Ireland", "Israel", "Italy",
    "Jamaica", "Japan", "Jordan", "Kazakhstan", "Kenya", "Kiribati", "Korea, North",
    "Korea, South", "Kosovo", "Kuwait", "Kyrgyzstan", "Laos", "Latvia", "Lebanon", "Lesotho",
    "Liberia", "Libya", "Liechtenstein", "Lithuania", "Luxembourg", "Madagascar", "Malawi",
    "Malaysia", "Maldives", "Mali", "Malta", "Marshall Islands", "Mauritania", "Mauritius",
    "Mexico", "Micronesia", "Moldova", "Monaco", "Mongolia", "Montenegro", "Morocco", "Mozambique",
    "Myanmar", "Namibia", "Nauru", "Nepal", "Netherlands", "New Zealand", "Nicaragua", "Niger",
    "Nigeria", "North Macedonia", "Norway", "Oman", "Pakistan", "Palau", "Palestine", "Panama",
    "Papua New Guinea", "Paraguay", "Peru", "Philippines", "Poland", "Portugal", "Qatar",
    "Romania", "Russia", "Rwanda", "Saint Kitts and Nevis", "Saint Lucia",
    "Saint Vincent and the Grenadines", "Samoa", "San Marino", "Sao Tome and Principe",
    "Saudi Arabia", "Senegal", "Serbia", "Seychelles", "Sierra Leone", "Singapore", "Slovakia",
    "Slovenia", "Solomon Islands", "Somalia", "South Africa", "South Sudan", "Spain", "Sri Lanka",
    "Sudan", "Suriname", "Sweden", "Switzerland", "Syria", "Taiwan", "Tajikistan", "Tanzania",
    "Thailand", "Togo", "Tonga", "Trinidad and Tobago", "Tunisia", "Turkey", "Turkmenistan",
    "Tuvalu", "Uganda", "Ukraine", "United Arab Emirates", "United Kingdom", "United States",
    "Uruguay", "Uzbekistan", "Vanuatu", "Vatican City", "Venezuela", "Vietnam", "Yemen", "Zambia",
    "Zimbabwe",
];

const LIKERT_SCALE: [&str; 5] = [
    "Strongly Agree",
    "Agree",
    "Neutral",
    "Disagree",
    "Strongly Disagree",
];

// Stored value first, display label second.
const YES_NO: [(&str, &str); 2] = [("yes", "Yes"), ("no", "No")];

/// One set of answers, in progress or recorded. Every field is a string,
/// including the numeric-looking ones; the serialized names match the
/// schema the responses file has always used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Response {
    name: String,
    country: String,
    #[serde(rename = "studyingInUS")]
    studying_in_us: String,
    tuition_difficulty: String,
    smaller_payments: String,
    tuition_amount: String,
    number_of_payments: String,
    payment_amount: String,
    late_payment_interest: String,
}

impl Response {
    /// Storage field names paired with current values, in schema order.
    fn entries(&self) -> [(&'static str, &str); 9] {
        [
            ("name", self.name.as_str()),
            ("country", self.country.as_str()),
            ("studyingInUS", self.studying_in_us.as_str()),
            ("tuitionDifficulty", self.tuition_difficulty.as_str()),
            ("smallerPayments", self.smaller_payments.as_str()),
            ("tuitionAmount", self.tuition_amount.as_str()),
            ("numberOfPayments", self.number_of_payments.as_str()),
            ("paymentAmount", self.payment_amount.as_str()),
            ("latePaymentInterest", self.late_payment_interest.as_str()),
        ]
    }

    /// Rederive the per-payment amount from the total and the payment count.
    ///
    /// Only runs when the amount parses as a float and the count as a
    /// positive integer. Otherwise the previous value is kept as-is, even
    /// when it was computed from inputs that have since been edited away
    /// (see DESIGN.md on whether that staleness is intended).
    fn recompute_payment_amount(&mut self) {
        let amount: f64 = match self.tuition_amount.parse() {
            Ok(amount) => amount,
            Err(_) => return,
        };
        let payments: i64 = match self.number_of_payments.parse() {
            Ok(payments) => payments,
            Err(_) => return,
        };
        if payments > 0 {
            self.payment_amount = format!("{:.2}", amount / payments as f64);
        }
    }
}

/// File-backed store for the response collection. One read at startup, one
/// whole-collection write per submission, last write wins.
struct ResponseStore {
    path: PathBuf,
}

impl ResponseStore {
    fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// A missing or malformed file yields an empty collection.
    fn load(&self) -> Vec<Response> {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    fn save(&self, responses: &[Response]) -> Result<()> {
        let raw = serde_json::to_string(responses)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

/// Screen the view toggle returns to when switched back off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resume {
    Editing,
    ThankYou,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Editing,
    ThankYou,
    Viewing { resume: Resume },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Country,
    StudyingInUs,
    TuitionDifficulty,
    SmallerPayments,
    TuitionAmount,
    NumberOfPayments,
    PaymentAmount,
    LatePaymentInterest,
    Submit,
}

// Tab order. The derived payment amount is display-only and never focused.
const FOCUS_ORDER: [Field; 9] = [
    Field::Name,
    Field::Country,
    Field::StudyingInUs,
    Field::TuitionDifficulty,
    Field::SmallerPayments,
    Field::TuitionAmount,
    Field::NumberOfPayments,
    Field::LatePaymentInterest,
    Field::Submit,
];

// Top-to-bottom order on screen, derived display included.
const FORM_LAYOUT: [Field; 10] = [
    Field::Name,
    Field::Country,
    Field::StudyingInUs,
    Field::TuitionDifficulty,
    Field::SmallerPayments,
    Field::TuitionAmount,
    Field::NumberOfPayments,
    Field::PaymentAmount,
    Field::LatePaymentInterest,
    Field::Submit,
];

impl Field {
    fn prompt(self) -> &'static str {
        match self {
            Field::Name => "What is your name?",
            Field::Country => "Where were you born?",
            Field::StudyingInUs => "Are you studying at a university in the U.S.?",
            Field::TuitionDifficulty => {
                "Please rate how you feel about this statement: It is difficult to pay full tuition on time"
            }
            Field::SmallerPayments => "Would you rather pay smaller amounts of tuition more often?",
            Field::TuitionAmount => "Total tuition amount per quarter",
            Field::NumberOfPayments => "Desired number of payments",
            Field::PaymentAmount => "Future payment amount",
            Field::LatePaymentInterest => "Would you feel fair paying interest on late payments?",
            Field::Submit => "Submit",
        }
    }

    fn is_choice(self) -> bool {
        matches!(
            self,
            Field::Country
                | Field::StudyingInUs
                | Field::TuitionDifficulty
                | Field::SmallerPayments
                | Field::LatePaymentInterest
        )
    }

    fn option_count(self) -> usize {
        match self {
            // Leading blank entry, same as the selector placeholder.
            Field::Country => COUNTRIES.len() + 1,
            Field::TuitionDifficulty => LIKERT_SCALE.len(),
            Field::StudyingInUs | Field::SmallerPayments | Field::LatePaymentInterest => {
                YES_NO.len()
            }
            _ => 0,
        }
    }

    fn option_value(self, idx: usize) -> &'static str {
        match self {
            Field::Country if idx == 0 => "",
            Field::Country => COUNTRIES[idx - 1],
            Field::TuitionDifficulty => LIKERT_SCALE[idx],
            Field::StudyingInUs | Field::SmallerPayments | Field::LatePaymentInterest => {
                YES_NO[idx].0
            }
            _ => "",
        }
    }

    fn option_label(self, idx: usize) -> &'static str {
        match self {
            Field::Country if idx == 0 => "Select a country",
            Field::Country => COUNTRIES[idx - 1],
            Field::TuitionDifficulty => LIKERT_SCALE[idx],
            Field::StudyingInUs | Field::SmallerPayments | Field::LatePaymentInterest => {
                YES_NO[idx].1
            }
            _ => "",
        }
    }
}

struct App {
    mode: Mode,
    form: Response,
    responses: Vec<Response>,
    store: ResponseStore,
    focus: usize,
    /// Highlighted option within the focused choice field.
    option_highlight: usize,
    view_scroll: u16,
}

impl App {
    fn new(store: ResponseStore) -> Self {
        let responses = store.load();
        Self {
            mode: Mode::Editing,
            form: Response::default(),
            responses,
            store,
            focus: 0,
            option_highlight: 0,
            view_scroll: 0,
        }
    }

    fn focused(&self) -> Field {
        FOCUS_ORDER[self.focus]
    }

    fn next_field(&mut self) {
        self.focus = (self.focus + 1) % FOCUS_ORDER.len();
        self.sync_option_highlight();
    }

    fn prev_field(&mut self) {
        self.focus = (self.focus + FOCUS_ORDER.len() - 1) % FOCUS_ORDER.len();
        self.sync_option_highlight();
    }

    // Landing on a choice field puts the highlight on its current answer.
    fn sync_option_highlight(&mut self) {
        let field = self.focused();
        if field.is_choice() {
            let current = self.field_value(field);
            self.option_highlight = (0..field.option_count())
                .find(|&idx| field.option_value(idx) == current)
                .unwrap_or(0);
        }
    }

    fn field_value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.form.name,
            Field::Country => &self.form.country,
            Field::StudyingInUs => &self.form.studying_in_us,
            Field::TuitionDifficulty => &self.form.tuition_difficulty,
            Field::SmallerPayments => &self.form.smaller_payments,
            Field::TuitionAmount => &self.form.tuition_amount,
            Field::NumberOfPayments => &self.form.number_of_payments,
            Field::PaymentAmount => &self.form.payment_amount,
            Field::LatePaymentInterest => &self.form.late_payment_interest,
            Field::Submit => "",
        }
    }

    // The derived payment amount has no mutable access path.
    fn field_value_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Name => Some(&mut self.form.name),
            Field::Country => Some(&mut self.form.country),
            Field::StudyingInUs => Some(&mut self.form.studying_in_us),
            Field::TuitionDifficulty => Some(&mut self.form.tuition_difficulty),
            Field::SmallerPayments => Some(&mut self.form.smaller_payments),
            Field::TuitionAmount => Some(&mut self.form.tuition_amount),
            Field::NumberOfPayments => Some(&mut self.form.number_of_payments),
            Field::LatePaymentInterest => Some(&mut self.form.late_payment_interest),
            Field::PaymentAmount | Field::Submit => None,
        }
    }

    // Any character goes into any editable field; nothing is rejected.
    fn input_char(&mut self, c: char) {
        let field = self.focused();
        if field.is_choice() || field == Field::Submit {
            return;
        }
        if let Some(value) = self.field_value_mut(field) {
            value.push(c);
        }
        if matches!(field, Field::TuitionAmount | Field::NumberOfPayments) {
            self.form.recompute_payment_amount();
        }
    }

    fn backspace(&mut self) {
        let field = self.focused();
        if field.is_choice() || field == Field::Submit {
            return;
        }
        if let Some(value) = self.field_value_mut(field) {
            value.pop();
        }
        if matches!(field, Field::TuitionAmount | Field::NumberOfPayments) {
            self.form.recompute_payment_amount();
        }
    }

    fn highlight_up(&mut self) {
        self.option_highlight = self.option_highlight.saturating_sub(1);
    }

    fn highlight_down(&mut self) {
        if self.option_highlight + 1 < self.focused().option_count() {
            self.option_highlight += 1;
        }
    }

    fn select_highlighted(&mut self) {
        let field = self.focused();
        if !field.is_choice() {
            return;
        }
        let chosen = field.option_value(self.option_highlight).to_string();
        if let Some(value) = self.field_value_mut(field) {
            *value = chosen;
        }
    }

    /// Append the current answers to the collection, rewrite the stored
    /// collection, and show the acknowledgment. The form buffer is not
    /// reset; there is no way back to it short of restarting.
    fn submit(&mut self) {
        self.responses.push(self.form.clone());
        if let Err(err) = self.store.save(&self.responses) {
            eprintln!("Error saving responses: {}", err);
        }
        self.mode = Mode::ThankYou;
    }

    /// Flip between the response listing and whatever screen was underneath.
    fn toggle_view(&mut self) {
        self.mode = match self.mode {
            Mode::Editing => {
                self.view_scroll = 0;
                Mode::Viewing {
                    resume: Resume::Editing,
                }
            }
            Mode::ThankYou => {
                self.view_scroll = 0;
                Mode::Viewing {
                    resume: Resume::ThankYou,
                }
            }
            Mode::Viewing {
                resume: Resume::Editing,
            } => Mode::Editing,
            Mode::Viewing {
                resume: Resume::ThankYou,
            } => Mode::ThankYou,
        };
    }

    fn view_total_lines(&self) -> u16 {
        // Header plus nine fields plus a separator per recorded response.
        (self.responses.len() * 11).min(u16::MAX as usize) as u16
    }
}

fn main() -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = App::new(ResponseStore::new(STORAGE_FILE));
    let res = run_app(&mut terminal, app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{:?}", err)
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, &app))?;

        if let Event::Key(key) = event::read()? {
            let done = match app.mode {
                Mode::Editing => handle_editing_input(&mut app, key)?,
                Mode::ThankYou => handle_thank_you_input(&mut app, key)?,
                Mode::Viewing { .. } => handle_viewing_input(&mut app, key)?,
            };
            if done {
                return Ok(());
            }
        }
    }
}

fn handle_editing_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => return Ok(true),
        KeyCode::F(2) => app.toggle_view(),
        KeyCode::Tab => app.next_field(),
        KeyCode::BackTab => app.prev_field(),
        KeyCode::Enter => {
            if app.focused() == Field::Submit {
                app.submit();
            } else if app.focused().is_choice() {
                app.select_highlighted();
                app.next_field();
            } else {
                app.next_field();
            }
        }
        KeyCode::Up => {
            if app.focused().is_choice() {
                app.highlight_up();
            } else {
                app.prev_field();
            }
        }
        KeyCode::Down => {
            if app.focused().is_choice() {
                app.highlight_down();
            } else {
                app.next_field();
            }
        }
        KeyCode::Char(' ') if app.focused().is_choice() => app.select_highlighted(),
        KeyCode::Char(c) => app.input_char(c),
        KeyCode::Backspace => app.backspace(),
        _ => {}
    }
    Ok(false)
}

fn handle_thank_you_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(true),
        KeyCode::F(2) => app.toggle_view(),
        _ => {}
    }
    Ok(false)
}

fn handle_viewing_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(true),
        KeyCode::F(2) => app.toggle_view(),
        KeyCode::Down | KeyCode::Char('j') => {
            if app.view_scroll + 1 < app.view_total_lines() {
                app.view_scroll += 1;
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.view_scroll = app.view_scroll.saturating_sub(1);
        }
        KeyCode::Char('g') => {
            app.view_scroll = 0;
        }
        KeyCode::Char('G') => {
            app.view_scroll = app.view_total_lines().saturating_sub(1);
        }
        _ => {}
    }
    Ok(false)
}

fn ui(f: &mut Frame, app: &App) {
    match app.mode {
        Mode::Editing => render_editing_screen(f, app),
        Mode::ThankYou => render_thank_you_screen(f),
        Mode::Viewing { .. } => render_viewing_screen(f, app),
    }
}

fn render_editing_screen(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(f.size());

    let title = Paragraph::new("Student Survey")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(title, chunks[0]);

    let mut lines: Vec<Line> = Vec::new();
    let mut focus_end: u16 = 0;

    for &field in FORM_LAYOUT.iter() {
        let is_focused = app.focused() == field;
        let marker = if is_focused { "▶ " } else { "  " };

        match field {
            Field::Submit => {
                lines.push(Line::from(""));
                lines.push(Line::from(format!("{}[ Submit ]", marker)).style(if is_focused {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::DarkGray)
                }));
            }
            Field::PaymentAmount => {
                // Read-only derived display.
                lines.push(
                    Line::from(format!("  {}: {}", field.prompt(), app.form.payment_amount))
                        .style(Style::default().fg(Color::DarkGray)),
                );
            }
            field if field.is_choice() => {
                let answer = app.field_value(field);
                lines.push(
                    Line::from(format!("{}{}: {}", marker, field.prompt(), answer)).style(
                        if is_focused {
                            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                        } else {
                            Style::default()
                        },
                    ),
                );

                if is_focused {
                    let count = field.option_count();
                    let visible = 7.min(count);
                    let start = app
                        .option_highlight
                        .saturating_sub(visible / 2)
                        .min(count - visible);
                    for idx in start..start + visible {
                        let chosen = field.option_value(idx) == answer;
                        let radio = if chosen { "(●)" } else { "( )" };
                        let style = if idx == app.option_highlight {
                            Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
                        } else if chosen {
                            Style::default().fg(Color::Yellow)
                        } else {
                            Style::default()
                        };
                        lines.push(
                            Line::from(format!("      {} {}", radio, field.option_label(idx)))
                                .style(style),
                        );
                    }
                }
            }
            field => {
                lines.push(
                    Line::from(format!(
                        "{}{}: {}",
                        marker,
                        field.prompt(),
                        app.field_value(field)
                    ))
                    .style(if is_focused {
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    }),
                );
            }
        }

        if is_focused {
            focus_end = lines.len() as u16;
        }
    }

    // Keep the focused field and its open option list on screen.
    let inner_height = chunks[1].height.saturating_sub(2);
    let scroll = focus_end.saturating_sub(inner_height);

    let body = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Survey"))
        .scroll((scroll, 0));
    f.render_widget(body, chunks[1]);

    let help = Paragraph::new(
        "Tab/Shift-Tab: move | ↑/↓: field or option | Space/Enter: choose | F2: view prior responses | Esc: quit",
    )
    .style(Style::default().fg(Color::DarkGray))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::TOP));
    f.render_widget(help, chunks[2]);
}

fn render_thank_you_screen(f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(f.size());

    let title = Paragraph::new("Student Survey")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(title, chunks[0]);

    let body = Paragraph::new(vec![
        Line::from(""),
        Line::from("Thank you!")
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
    ])
    .alignment(Alignment::Center);
    f.render_widget(body, chunks[1]);

    let help = Paragraph::new("F2: view prior responses | q: quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP));
    f.render_widget(help, chunks[2]);
}

fn render_viewing_screen(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(f.size());

    let title = Paragraph::new("Survey Responses")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(title, chunks[0]);

    let mut lines: Vec<Line> = Vec::new();
    for (idx, response) in app.responses.iter().enumerate() {
        lines.push(
            Line::from(format!("Response #{}", idx + 1))
                .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        );
        for (label, value) in response.entries() {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {}: ", label),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(value.to_string()),
            ]));
        }
        lines.push(Line::from(""));
    }

    let body = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL))
        .scroll((app.view_scroll, 0));
    f.render_widget(body, chunks[1]);

    let help = Paragraph::new("j/k or ↑/↓: scroll | g/G: top/bottom | F2: back to survey | q: quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP));
    f.render_widget(help, chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_app(dir: &TempDir) -> App {
        App::new(ResponseStore::new(dir.path().join("responses.json")))
    }

    fn focus_on(app: &mut App, field: Field) {
        app.focus = FOCUS_ORDER.iter().position(|&f| f == field).unwrap();
        app.sync_option_highlight();
    }

    fn type_into(app: &mut App, field: Field, text: &str) {
        focus_on(app, field);
        for c in text.chars() {
            app.input_char(c);
        }
    }

    #[test]
    fn payment_amount_divides_and_rounds() {
        let mut form = Response {
            tuition_amount: "1000".to_string(),
            number_of_payments: "4".to_string(),
            ..Response::default()
        };
        form.recompute_payment_amount();
        assert_eq!(form.payment_amount, "250.00");

        form.number_of_payments = "3".to_string();
        form.recompute_payment_amount();
        assert_eq!(form.payment_amount, "333.33");

        // Rounds, does not truncate.
        form.tuition_amount = "100".to_string();
        form.number_of_payments = "6".to_string();
        form.recompute_payment_amount();
        assert_eq!(form.payment_amount, "16.67");
    }

    #[test]
    fn payment_amount_untouched_by_bad_inputs() {
        let mut form = Response {
            tuition_amount: "1000".to_string(),
            number_of_payments: "4".to_string(),
            ..Response::default()
        };
        form.recompute_payment_amount();
        assert_eq!(form.payment_amount, "250.00");

        for bad in ["0", "-3", "abc", ""] {
            form.number_of_payments = bad.to_string();
            form.recompute_payment_amount();
            assert_eq!(form.payment_amount, "250.00", "payments = {:?}", bad);
        }

        form.number_of_payments = "4".to_string();
        form.tuition_amount = String::new();
        form.recompute_payment_amount();
        assert_eq!(form.payment_amount, "250.00");
    }

    #[test]
    fn payment_amount_stays_empty_until_inputs_are_valid() {
        let mut form = Response::default();
        form.recompute_payment_amount();
        assert_eq!(form.payment_amount, "");

        form.tuition_amount = "1000".to_string();
        form.number_of_payments = "0".to_string();
        form.recompute_payment_amount();
        assert_eq!(form.payment_amount, "");
    }

    #[test]
    fn derivation_runs_on_every_keystroke() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);

        type_into(&mut app, Field::TuitionAmount, "1000");
        assert_eq!(app.form.payment_amount, "");

        type_into(&mut app, Field::NumberOfPayments, "4");
        assert_eq!(app.form.payment_amount, "250.00");

        // Clearing a source mid-edit leaves the stale derived value alone.
        focus_on(&mut app, Field::NumberOfPayments);
        app.backspace();
        assert_eq!(app.form.number_of_payments, "");
        assert_eq!(app.form.payment_amount, "250.00");

        app.input_char('5');
        assert_eq!(app.form.payment_amount, "200.00");
    }

    #[test]
    fn empty_form_submits_one_record() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);

        app.submit();

        assert_eq!(app.mode, Mode::ThankYou);
        assert_eq!(app.responses.len(), 1);
        for (_, value) in app.responses[0].entries() {
            assert_eq!(value, "");
        }
    }

    #[test]
    fn submissions_accumulate_in_order_across_restarts() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("responses.json");

        for name in ["first", "second", "third"] {
            let mut app = App::new(ResponseStore::new(&path));
            type_into(&mut app, Field::Name, name);
            app.submit();
        }

        let app = App::new(ResponseStore::new(&path));
        let names: Vec<&str> = app.responses.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["first", "second", "third"]);
    }

    #[test]
    fn toggle_returns_to_editing() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        type_into(&mut app, Field::Name, "Ana");
        let form_before = app.form.clone();
        let responses_before = app.responses.clone();

        app.toggle_view();
        assert_eq!(
            app.mode,
            Mode::Viewing {
                resume: Resume::Editing
            }
        );
        assert_eq!(app.form, form_before);
        assert_eq!(app.responses, responses_before);

        app.toggle_view();
        assert_eq!(app.mode, Mode::Editing);
        assert_eq!(app.form, form_before);
    }

    #[test]
    fn toggle_returns_to_thank_you_after_submit() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);

        app.submit();
        assert_eq!(app.mode, Mode::ThankYou);

        app.toggle_view();
        assert_eq!(
            app.mode,
            Mode::Viewing {
                resume: Resume::ThankYou
            }
        );
        assert_eq!(app.responses.len(), 1);

        app.toggle_view();
        assert_eq!(app.mode, Mode::ThankYou);
    }

    #[test]
    fn country_list_is_complete_sorted_and_unique() {
        assert_eq!(COUNTRIES.len(), 195);
        assert!(COUNTRIES.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn selecting_a_country_reads_back_identically() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);

        focus_on(&mut app, Field::Country);
        let canada = (0..Field::Country.option_count())
            .find(|&idx| Field::Country.option_value(idx) == "Canada")
            .unwrap();
        app.option_highlight = canada;
        app.select_highlighted();
        assert_eq!(app.form.country, "Canada");

        // The blank placeholder is itself selectable.
        app.option_highlight = 0;
        app.select_highlighted();
        assert_eq!(app.form.country, "");
    }

    #[test]
    fn returning_to_a_choice_field_highlights_its_answer() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);

        focus_on(&mut app, Field::TuitionDifficulty);
        app.option_highlight = 2;
        app.select_highlighted();
        assert_eq!(app.form.tuition_difficulty, "Neutral");

        focus_on(&mut app, Field::Name);
        focus_on(&mut app, Field::TuitionDifficulty);
        assert_eq!(app.option_highlight, 2);
    }

    #[test]
    fn derived_field_rejects_direct_edits() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        assert!(app.field_value_mut(Field::PaymentAmount).is_none());
    }

    #[test]
    fn store_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = ResponseStore::new(dir.path().join("nothing_here.json"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn store_corrupt_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("responses.json");
        fs::write(&path, "not json at all {").unwrap();
        let store = ResponseStore::new(&path);
        assert!(store.load().is_empty());
    }

    #[test]
    fn store_round_trips_the_collection() {
        let dir = TempDir::new().unwrap();
        let store = ResponseStore::new(dir.path().join("responses.json"));

        let responses = vec![
            Response {
                name: "Ana".to_string(),
                country: "Brazil".to_string(),
                ..Response::default()
            },
            Response {
                tuition_amount: "9000".to_string(),
                number_of_payments: "3".to_string(),
                payment_amount: "3000.00".to_string(),
                ..Response::default()
            },
        ];
        store.save(&responses).unwrap();
        assert_eq!(store.load(), responses);
    }

    #[test]
    fn storage_schema_uses_camel_case_field_names() {
        let raw = serde_json::to_string(&Response::default()).unwrap();
        assert_eq!(
            raw,
            r#"{"name":"","country":"","studyingInUS":"","tuitionDifficulty":"","smallerPayments":"","tuitionAmount":"","numberOfPayments":"","paymentAmount":"","latePaymentInterest":""}"#
        );
    }

    #[test]
    fn store_tolerates_records_with_missing_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("responses.json");
        fs::write(&path, r#"[{"name":"only a name"}]"#).unwrap();

        let loaded = ResponseStore::new(&path).load();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "only a name");
        assert_eq!(loaded[0].country, "");
    }
}
