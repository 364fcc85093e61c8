//! Shell context, view state and dispatch.

use std::{
    io,
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};

use dialoguer::{theme::ColorfulTheme, Confirm};
use strsim::levenshtein;

use crate::{
    config::{Config, ConfigManager},
    core::{
        debounce::Debouncer,
        errors::BudgetError,
        ledger_manager::LedgerManager,
        services::{CategoryFilter, FilterSpec, KindFilter, Month, ReportView, SortOrder},
        utils::PathResolver,
    },
    storage::JsonFileStore,
};

use super::commands;
use super::output;
use super::registry::{CommandEntry, CommandRegistry};
pub use crate::core::errors::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

/// Which search box a queued text belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SearchField {
    /// History: category and note.
    History,
    /// Report: category only.
    Report,
}

impl SearchField {
    const ALL: [SearchField; 2] = [SearchField::History, SearchField::Report];

    fn label(self) -> &'static str {
        match self {
            SearchField::History => "Search",
            SearchField::Report => "Report search",
        }
    }
}

/// Filters and selections carried between commands.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub kind: KindFilter,
    pub category: CategoryFilter,
    pub search: String,
    pub report_search: String,
    pub sort: SortOrder,
    pub month: Option<Month>,
    pub report_view: ReportView,
}

impl ViewState {
    pub fn new(sort: SortOrder) -> Self {
        Self {
            kind: KindFilter::All,
            category: CategoryFilter::All,
            search: String::new(),
            report_search: String::new(),
            sort,
            month: Some(Month::current()),
            report_view: ReportView::Both,
        }
    }

    /// History listing filter: type, category and search text.
    pub fn history_spec(&self) -> FilterSpec {
        FilterSpec {
            kind: self.kind,
            category: self.category.clone(),
            text: self.search.clone(),
            category_text: String::new(),
            month: None,
        }
    }

    /// Report filter: category search text and the selected month.
    pub fn report_spec(&self) -> FilterSpec {
        FilterSpec {
            category_text: self.report_search.clone(),
            month: self.month.clone(),
            ..FilterSpec::all()
        }
    }

    fn search_mut(&mut self, field: SearchField) -> &mut String {
        match field {
            SearchField::History => &mut self.search,
            SearchField::Report => &mut self.report_search,
        }
    }
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub ledger: LedgerManager,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub view: ViewState,
    pub theme: ColorfulTheme,
    pub last_command: Option<String>,
    pub running: bool,
    history_search: Debouncer<String>,
    report_search: Debouncer<String>,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_home(mode, PathResolver::base_dir())
    }

    /// Opens the config and the on-disk ledger under `home`.
    pub fn with_home(mode: CliMode, home: PathBuf) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(home)?;
        let config = config_manager.load_or_init();
        let data_dir = config.resolve_data_dir(config_manager.base_dir());
        let store = JsonFileStore::new(data_dir).map_err(BudgetError::from)?;
        let ledger = LedgerManager::new(Arc::new(store), config.categories.clone());

        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        Ok(Self {
            mode,
            registry,
            ledger,
            view: ViewState::new(config.default_sort),
            history_search: Debouncer::new(config.search_debounce()),
            report_search: Debouncer::new(config.search_debounce()),
            config_manager,
            config,
            theme: ColorfulTheme::default(),
            last_command: None,
            running: true,
        })
    }

    pub(crate) fn mode(&self) -> CliMode {
        self.mode
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    /// `(name, usage)` for every command name and alias.
    pub(crate) fn command_usages(&self) -> Vec<(&'static str, &'static str)> {
        self.registry
            .list()
            .flat_map(|entry| entry.all_names().map(move |name| (name, entry.usage)))
            .collect()
    }

    pub(crate) fn prompt(&self) -> String {
        match self.ledger.pending_edit() {
            Some(request) => format!("smart-budget (editing {})> ", request.kind),
            None => "smart-budget> ".to_string(),
        }
    }

    fn debouncer(&mut self, field: SearchField) -> &mut Debouncer<String> {
        match field {
            SearchField::History => &mut self.history_search,
            SearchField::Report => &mut self.report_search,
        }
    }

    /// Queues a search; bursts collapse to the last text per field.
    pub(crate) fn queue_search(&mut self, field: SearchField, text: String, now: Instant) {
        self.debouncer(field).push(text, now);
    }

    /// Longest wait before every queued search is due.
    pub(crate) fn search_remaining(&self, now: Instant) -> Duration {
        self.history_search
            .remaining(now)
            .max(self.report_search.remaining(now))
    }

    /// Applies queued searches that have been quiet long enough.
    pub(crate) fn poll_search(&mut self, now: Instant) {
        for field in SearchField::ALL {
            if let Some(text) = self.debouncer(field).poll(now) {
                self.apply_search(field, text);
            }
        }
    }

    /// Applies queued searches immediately.
    pub(crate) fn flush_search(&mut self) {
        for field in SearchField::ALL {
            if let Some(text) = self.debouncer(field).flush() {
                self.apply_search(field, text);
            }
        }
    }

    fn apply_search(&mut self, field: SearchField, text: String) {
        let applied = text.trim().to_string();
        if applied.is_empty() {
            output::info(format!("{} cleared.", field.label()));
        } else {
            output::info(format!("{}: `{applied}`", field.label()));
        }
        *self.view.search_mut(field) = applied;
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match crate::cli::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                output::warning(&err);
                return Ok(LoopControl::Continue);
            }
        };
        let Some((raw, rest)) = tokens.split_first() else {
            return Ok(LoopControl::Continue);
        };
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();
        self.dispatch(&raw.to_lowercase(), raw, &args)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &input.to_lowercase()), name))
            .min_by_key(|(distance, _)| *distance);
        if let Some((distance, name)) = best {
            if distance <= 3 {
                output::info(format!("Suggestion: `{name}`?"));
            }
        }
    }

    /// Asks before a destructive action; script mode never prompts.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(false);
        }
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(CommandError::from)
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        self.confirm("Exit shell?").map_err(CliError::from)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::info("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Core(err) if err.is_soft() => {
                output::error(err);
                Ok(())
            }
            CommandError::Core(err) => Err(err.into()),
            other => {
                output::error(other);
                Ok(())
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] BudgetError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Core(inner) => CliError::Budget(inner),
            CommandError::Io(inner) => CliError::Io(inner),
            other => CliError::Command(other.to_string()),
        }
    }
}

pub(crate) fn usage(entry: &str) -> CommandError {
    CommandError::InvalidArguments(format!("usage: {entry}"))
}

#[cfg(test)]
pub(crate) fn process_script(home: PathBuf, lines: &[&str]) -> Result<ShellContext, CliError> {
    let mut context = ShellContext::with_home(CliMode::Script, home)?;
    for line in lines {
        match context.process_line(line)? {
            LoopControl::Continue => {}
            LoopControl::Exit => break,
        }
    }
    Ok(context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EntryKind;
    use tempfile::TempDir;

    #[test]
    fn script_adds_and_deletes_entries() {
        let temp = TempDir::new().expect("temp dir");
        let context = process_script(
            temp.path().to_path_buf(),
            &[
                "add expense 100 Food 2024-05-01 lunch with team",
                "add income 500 Salary 2024-05-02",
                "delete expense 0",
            ],
        )
        .expect("script runs");
        assert!(context.ledger.entries(EntryKind::Expense).is_empty());
        assert_eq!(context.ledger.entries(EntryKind::Income).len(), 1);
    }

    #[test]
    fn note_words_are_joined() {
        let temp = TempDir::new().expect("temp dir");
        let context = process_script(
            temp.path().to_path_buf(),
            &["add expense 12 Food 2024-05-01 \"tea, milk\" and bread"],
        )
        .expect("script runs");
        let entries = context.ledger.entries(EntryKind::Expense);
        assert_eq!(entries[0].note.as_deref(), Some("tea, milk and bread"));
    }

    #[test]
    fn soft_failures_do_not_stop_the_script() {
        let temp = TempDir::new().expect("temp dir");
        let mut context =
            ShellContext::with_home(CliMode::Script, temp.path().to_path_buf()).expect("context");
        let err = context
            .process_line("delete income 3")
            .expect_err("out of range");
        assert!(matches!(
            err,
            CommandError::Core(BudgetError::IndexOutOfRange { .. })
        ));
        context.report_error(err).expect("reported inline");
    }

    #[test]
    fn filter_commands_update_view_state() {
        let temp = TempDir::new().expect("temp dir");
        let context = process_script(
            temp.path().to_path_buf(),
            &[
                "type income",
                "category Salary",
                "sort amount-asc",
                "month 2024-05",
                "view expenses",
            ],
        )
        .expect("script runs");
        assert_eq!(context.view.kind, KindFilter::Only(EntryKind::Income));
        assert_eq!(context.view.category, CategoryFilter::Named("Salary".into()));
        assert_eq!(context.view.sort, SortOrder::AmountAsc);
        assert_eq!(context.view.month.as_ref().map(Month::as_str), Some("2024-05"));
        assert_eq!(context.view.report_view, ReportView::Expenses);
    }

    #[test]
    fn queued_searches_collapse_to_the_last_text() {
        let temp = TempDir::new().expect("temp dir");
        let mut context =
            ShellContext::with_home(CliMode::Script, temp.path().to_path_buf()).expect("context");
        let start = Instant::now();
        context.queue_search(SearchField::History, "f".into(), start);
        context.queue_search(SearchField::History, "foo".into(), start + Duration::from_millis(50));
        context.poll_search(start + Duration::from_millis(100));
        assert_eq!(context.view.search, "");
        context.poll_search(start + Duration::from_millis(250));
        assert_eq!(context.view.search, "foo");
    }

    #[test]
    fn report_search_is_separate_and_matches_category_only() {
        let temp = TempDir::new().expect("temp dir");
        let mut context = process_script(
            temp.path().to_path_buf(),
            &[
                "add expense 10 Food 2024-05-01",
                "add expense 20 Transport 2024-05-02 food run",
                "month 2024-05",
            ],
        )
        .expect("script runs");
        let start = Instant::now();
        context.queue_search(SearchField::History, "food".into(), start);
        context.queue_search(SearchField::Report, "FOO".into(), start);
        context.flush_search();
        assert_eq!(context.view.search, "food");
        assert_eq!(context.view.report_search, "FOO");

        let history = context.ledger.list(&context.view.history_spec(), SortOrder::DateAsc);
        assert_eq!(history.len(), 2);
        let report = context.ledger.report(&context.view.report_spec());
        assert_eq!(report.categories.len(), 1);
        assert_eq!(report.categories[0].category, "Food");
    }

    #[test]
    fn exit_command_stops_the_loop() {
        let temp = TempDir::new().expect("temp dir");
        let mut context =
            ShellContext::with_home(CliMode::Script, temp.path().to_path_buf()).expect("context");
        assert_eq!(context.process_line("exit").expect("exit"), LoopControl::Exit);
    }
}
