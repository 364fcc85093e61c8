//! View-state commands and the history, totals and report listings.

use std::time::Instant;

use crate::cli::core::{usage, CommandError, CommandResult, SearchField, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};
use crate::core::services::{
    CategoryFilter, KindFilter, LedgerRow, Month, ReportView, SortOrder, Totals,
};

const RECENT_LIMIT: usize = 5;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "type",
            "Show or set the history type filter",
            "type [all|expense|income]",
            cmd_type,
        ),
        CommandEntry::new(
            "category",
            "Show or set the history category filter",
            "category [name|All]",
            cmd_category,
        ),
        CommandEntry::new(
            "sort",
            "Show or set the history sort order",
            "sort [date-desc|date-asc|amount-desc|amount-asc]",
            cmd_sort,
        ),
        CommandEntry::new(
            "search",
            "Filter by text in category or note (empty clears)",
            "search [text...]",
            cmd_search,
        ),
        CommandEntry::new(
            "report-search",
            "Filter the report by category text (empty clears)",
            "report-search [text...]",
            cmd_report_search,
        ),
        CommandEntry::new(
            "month",
            "Show or set the report month",
            "month [YYYY-MM|none]",
            cmd_month,
        ),
        CommandEntry::new(
            "view",
            "Show or set which series the report shows",
            "view [both|expenses|income]",
            cmd_view,
        ),
        CommandEntry::new(
            "dashboard",
            "Show overall totals and the latest entries",
            "dashboard",
            cmd_dashboard,
        ),
        CommandEntry::new("list", "Show the filtered history", "list", cmd_list),
        CommandEntry::new(
            "totals",
            "Show overall and filtered totals",
            "totals",
            cmd_totals,
        ),
        CommandEntry::new(
            "report",
            "Show per-category sums for the report month",
            "report",
            cmd_report,
        ),
    ]
}

fn parse_arg<T>(raw: &str) -> Result<T, CommandError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|err| CommandError::InvalidArguments(err.to_string()))
}

fn cmd_type(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {}
        [value] => context.view.kind = parse_arg::<KindFilter>(value)?,
        _ => return Err(usage("type [all|expense|income]")),
    }
    output::info(format!("Type filter: {}", context.view.kind));
    Ok(())
}

fn cmd_category(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if !args.is_empty() {
        context.view.category = CategoryFilter::parse(&args.join(" "));
    }
    output::info(format!("Category filter: {}", context.view.category));
    Ok(())
}

fn cmd_sort(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {}
        [value] => context.view.sort = parse_arg::<SortOrder>(value)?,
        _ => return Err(usage("sort [date-desc|date-asc|amount-desc|amount-asc]")),
    }
    output::info(format!("Sort order: {}", context.view.sort));
    Ok(())
}

/// Queued rather than applied; the shell releases it once input goes quiet.
fn cmd_search(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    context.queue_search(SearchField::History, args.join(" "), Instant::now());
    Ok(())
}

fn cmd_report_search(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    context.queue_search(SearchField::Report, args.join(" "), Instant::now());
    Ok(())
}

fn cmd_month(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {}
        [value] if value.eq_ignore_ascii_case("none") => context.view.month = None,
        [value] => context.view.month = Some(parse_arg::<Month>(value)?),
        _ => return Err(usage("month [YYYY-MM|none]")),
    }
    match &context.view.month {
        Some(month) => output::info(format!("Report month: {month}")),
        None => output::info("Report month: all months"),
    }
    Ok(())
}

fn cmd_view(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {}
        [value] => context.view.report_view = parse_arg::<ReportView>(value)?,
        _ => return Err(usage("view [both|expenses|income]")),
    }
    output::info(format!("Report view: {}", context.view.report_view));
    Ok(())
}

fn cmd_dashboard(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section("Dashboard");
    print_totals_line(&context.ledger.totals(None));
    output::section("Recent activity");
    let rows = context.ledger.recent(Some(RECENT_LIMIT));
    if rows.is_empty() {
        output::info("No entries yet. Add an expense or income to get started.");
    } else {
        output::info(history_table(&rows).render());
    }
    Ok(())
}

fn cmd_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let rows = context
        .ledger
        .list(&context.view.history_spec(), context.view.sort);
    output::section("History");
    if rows.is_empty() {
        output::info("No history found.");
    } else {
        output::info(history_table(&rows).render());
    }
    print_totals_line(&context.ledger.totals(None));
    Ok(())
}

fn cmd_totals(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section("Totals");
    output::info("All entries:");
    print_totals_line(&context.ledger.totals(None));
    output::info("Current history filter:");
    print_totals_line(&context.ledger.totals(Some(&context.view.history_spec())));
    Ok(())
}

fn cmd_report(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let report = context.ledger.report(&context.view.report_spec());
    let view = context.view.report_view;
    let period = report
        .month
        .as_ref()
        .map_or_else(|| "all months".to_string(), Month::to_string);
    output::section(format!("Report for {period} ({view})"));
    if !context.view.report_search.is_empty() {
        output::info(format!("Categories matching `{}`", context.view.report_search));
    }

    if report.is_empty_for(view) {
        output::info("No data for this selection.");
    } else {
        let mut columns = vec![TableColumn::left("Category")];
        if view != ReportView::Income {
            columns.push(TableColumn::right("Expenses"));
        }
        if view != ReportView::Expenses {
            columns.push(TableColumn::right("Income"));
        }
        let mut table = Table::new(columns);
        for aggregate in &report.categories {
            let mut row = vec![aggregate.category.clone()];
            if view != ReportView::Income {
                row.push(output::money(aggregate.expense));
            }
            if view != ReportView::Expenses {
                row.push(output::money(aggregate.income));
            }
            table.push_row(row);
        }
        output::info(table.render());
    }
    print_totals_line(&report.totals);
    Ok(())
}

fn history_table(rows: &[LedgerRow]) -> Table {
    let mut table = Table::new(vec![
        TableColumn::right("#"),
        TableColumn::left("Date"),
        TableColumn::left("Category"),
        TableColumn::left("Note").max_width(32),
        TableColumn::right("Amount"),
        TableColumn::left("Type"),
    ]);
    for row in rows {
        let entry = &row.entry;
        table.push_row(vec![
            row.index.to_string(),
            entry.date.clone(),
            non_empty_or_dash(&entry.category),
            non_empty_or_dash(entry.note_text()),
            output::colored_money(row.kind, entry.amount),
            row.kind.label().to_string(),
        ]);
    }
    table
}

fn non_empty_or_dash(text: &str) -> String {
    if text.is_empty() {
        "-".to_string()
    } else {
        text.to_string()
    }
}

fn print_totals_line(totals: &Totals) {
    output::info(format!(
        "Income: {}  Expenses: {}  Balance: {}",
        output::money(totals.income),
        output::money(totals.expense),
        output::money(totals.balance),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::QueryService;
    use crate::domain::{Entry, EntryKind};

    #[test]
    fn history_rows_show_collection_index_and_dash_placeholders() {
        let entry = Entry {
            id: uuid::Uuid::new_v4(),
            amount: 1000.0,
            category: "Salary".into(),
            note: None,
            date: "2024-05-02".into(),
        };
        let rows = QueryService::merged_view(Vec::new(), vec![entry]);
        let table = history_table(&rows);
        assert_eq!(table.rows[0][0], "0");
        assert_eq!(table.rows[0][3], "-");
        assert!(table.rows[0][4].contains("+$1,000.00"));
        assert_eq!(table.rows[0][5], EntryKind::Income.label());
    }
}
