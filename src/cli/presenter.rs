//! CLI presenter for output formatting

use std::io::{self, Write};

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::diary::{DiaryEntry, DiaryListItem, SearchResults};
use crate::domain::recording::format_clock;
use crate::domain::view::ViewState;

/// Tags shown per row in collection views
const MAX_LIST_TAGS: usize = 3;

const EMPTY_LIST: &str = "No diary entries yet";

const BAR_WIDTH: usize = 20;

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Option<ProgressBar>,
}

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self { spinner: None }
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        let spinner = new_spinner();
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Update spinner message
    pub fn update_spinner(&self, message: &str) {
        if let Some(ref spinner) = self.spinner {
            spinner.set_message(message.to_string());
        }
    }

    /// Stop spinner without status
    pub fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    /// Spinner that follows the controller's view: ticking with the progress
    /// message while processing, cleared on any other view.
    pub fn processing_observer(&self) -> impl Fn(&ViewState) + Send + Sync + 'static {
        let spinner = new_spinner();
        move |state: &ViewState| match state {
            ViewState::Processing { message } => {
                spinner.enable_steady_tick(std::time::Duration::from_millis(80));
                spinner.set_message(message.clone());
            }
            _ => spinner.finish_and_clear(),
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Prompt on stderr without a newline
    pub fn prompt(&self, text: &str) {
        eprint!("{} ", text);
        let _ = io::stderr().flush();
    }

    /// Recording timer line: `REC m:ss [bar] / m:ss`
    pub fn format_recording(&self, elapsed_secs: u64, max_display_secs: u64) -> String {
        let shown = elapsed_secs.min(max_display_secs);
        let percent = if max_display_secs > 0 {
            shown as f64 / max_display_secs as f64
        } else {
            0.0
        };
        let filled = (percent * BAR_WIDTH as f64) as usize;
        let empty = BAR_WIDTH - filled;

        format!(
            "{} {} [{}{}] / {}",
            "REC".red().bold(),
            format_clock(shown),
            "█".repeat(filled).red(),
            "░".repeat(empty),
            format_clock(max_display_secs)
        )
    }

    /// Show the recording timer
    pub fn show_recording(&mut self, max_display_secs: u64) {
        self.start_spinner(&self.format_recording(0, max_display_secs));
    }

    /// Update the recording timer
    pub fn update_recording(&self, elapsed_secs: u64, max_display_secs: u64) {
        self.update_spinner(&self.format_recording(elapsed_secs, max_display_secs));
    }

    /// Render one page of the collection
    pub fn diary_page(&self, items: &[DiaryListItem], page: u32, total: u64) {
        if items.is_empty() {
            self.info(EMPTY_LIST);
            return;
        }
        for item in items {
            self.output(&format_list_item(item));
        }
        eprintln!(
            "{}",
            format!("page {} · {} of {} entries", page, items.len(), total).dimmed()
        );
    }

    /// Render search hits
    pub fn search_results(&self, results: &SearchResults) {
        if results.items.is_empty() {
            self.info(&format!("No entries match \"{}\"", results.query));
            return;
        }
        for item in &results.items {
            self.output(&format_list_item(item));
        }
        eprintln!(
            "{}",
            format!("{} result(s) for \"{}\"", results.total, results.query).dimmed()
        );
    }

    /// Render a full entry
    pub fn diary_detail(&self, entry: &DiaryEntry, show_transcript: bool) {
        self.output(&format_detail(entry, show_transcript));
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

fn new_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner:.cyan} {msg}")
    {
        spinner.set_style(style);
    }
    spinner
}

fn format_tags(tags: &[String], limit: usize) -> String {
    tags.iter()
        .take(limit)
        .map(|t| format!("#{}", t))
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_duration(duration_secs: Option<u64>) -> String {
    duration_secs.map(format_clock).unwrap_or_else(|| "-:--".to_string())
}

/// One row of a collection view
pub fn format_list_item(item: &DiaryListItem) -> String {
    let mut line = format!(
        "{} {}  {}  {}",
        item.mood.emoji(),
        item.title.bold(),
        item.created_date().dimmed(),
        format_duration(item.duration_secs()),
    );
    let tags = format_tags(&item.tags, MAX_LIST_TAGS);
    if !tags.is_empty() {
        line.push_str("  ");
        line.push_str(&tags.cyan().to_string());
    }
    line.push_str(&format!("  {}", item.id.dimmed()));
    line
}

fn push_section(out: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    out.push_str(&format!("\n{}\n", heading.bold()));
    for item in items {
        out.push_str(&format!("  • {}\n", item));
    }
}

/// Full detail view of an entry
pub fn format_detail(entry: &DiaryEntry, show_transcript: bool) -> String {
    let mut out = format!(
        "{} {}\n{}  {}  {}\n",
        entry.mood.emoji(),
        entry.title.bold(),
        entry.created_date().dimmed(),
        format_duration(entry.duration_secs()),
        entry.mood.as_str().dimmed(),
    );

    out.push('\n');
    out.push_str(&entry.content);
    out.push('\n');

    push_section(&mut out, "Key events", &entry.key_events);
    push_section(&mut out, "To-dos", &entry.todos);

    let tags = format_tags(&entry.tags, entry.tags.len());
    if !tags.is_empty() {
        out.push_str(&format!("\n{}\n", tags.cyan()));
    }

    if show_transcript && !entry.transcript.is_empty() {
        out.push_str(&format!("\n{}\n{}\n", "Transcript".bold(), entry.transcript));
    }

    out.push_str(&format!("\n{}", format!("id: {}", entry.id).dimmed()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::diary::Mood;

    fn item(tags: &[&str]) -> DiaryListItem {
        DiaryListItem {
            id: "d1".to_string(),
            title: "Morning run".to_string(),
            mood: Mood::Happy,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            duration_sec: Some(75.4),
            created_at: "2024-03-01 08:30:00".to_string(),
        }
    }

    #[test]
    fn format_recording_at_start() {
        let presenter = Presenter::new();
        let line = presenter.format_recording(0, 300);
        assert!(line.contains("0:00"));
        assert!(line.contains("5:00"));
    }

    #[test]
    fn format_recording_clamps_to_cap() {
        let presenter = Presenter::new();
        let line = presenter.format_recording(400, 300);
        assert!(line.contains("5:00 ["));
        assert!(!line.contains("6:40"));
    }

    #[test]
    fn list_item_shows_at_most_three_tags() {
        let line = format_list_item(&item(&["a", "b", "c", "d"]));
        assert!(line.contains("#a"));
        assert!(line.contains("#c"));
        assert!(!line.contains("#d"));
        assert!(line.contains("1:15"));
        assert!(line.contains("2024-03-01"));
        assert!(line.contains("😊"));
    }

    #[test]
    fn detail_includes_sections_and_optional_transcript() {
        let entry = DiaryEntry {
            id: "d1".to_string(),
            title: "Busy day".to_string(),
            content: "Lots happened.".to_string(),
            transcript: "um so today".to_string(),
            mood: Mood::from("bored"),
            key_events: vec!["Shipped release".to_string()],
            todos: vec![],
            tags: vec!["work".to_string()],
            audio_path: None,
            duration_sec: None,
            created_at: "2024-03-01T10:00:00Z".to_string(),
        };

        let without = format_detail(&entry, false);
        assert!(without.contains("Shipped release"));
        assert!(!without.contains("To-dos"));
        assert!(!without.contains("um so today"));
        assert!(without.contains("-:--"));
        assert!(without.contains("😐"));

        let with = format_detail(&entry, true);
        assert!(with.contains("um so today"));
    }
}
