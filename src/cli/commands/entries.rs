use crate::cli::core::{usage, CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::core::ledger_manager::SubmitOutcome;
use crate::domain::{Displayable, EntryDraft, EntryKind};

const SUBMIT_USAGE: &str = "add <expense|income> <amount> <category> <YYYY-MM-DD> [note...]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "add",
            "Record an entry, or apply the staged edit",
            SUBMIT_USAGE,
            cmd_submit,
        )
        .with_aliases(&["submit"]),
        CommandEntry::new(
            "edit",
            "Stage an entry for replacement by the next submit",
            "edit <expense|income> <index>",
            cmd_edit,
        ),
        CommandEntry::new(
            "cancel-edit",
            "Drop the staged edit",
            "cancel-edit",
            cmd_cancel_edit,
        ),
        CommandEntry::new(
            "delete",
            "Delete an entry by type and index",
            "delete <expense|income> <index>",
            cmd_delete,
        ),
        CommandEntry::new(
            "clear-all",
            "Delete ALL expenses and incomes",
            "clear-all [--yes]",
            cmd_clear_all,
        ),
    ]
}

pub(crate) fn parse_kind(raw: &str) -> Result<EntryKind, CommandError> {
    raw.parse::<EntryKind>()
        .map_err(|err| CommandError::InvalidArguments(err.to_string()))
}

fn parse_index(raw: &str) -> Result<usize, CommandError> {
    raw.parse::<usize>().map_err(|_| {
        CommandError::InvalidArguments(format!("`{raw}` is not an entry index"))
    })
}

fn cmd_submit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [kind, amount, category, date, note @ ..] = args else {
        return Err(usage(SUBMIT_USAGE));
    };
    let kind = parse_kind(kind)?;
    // An unparsable amount falls through to validation, which names the field.
    let amount = amount.trim().parse::<f64>().unwrap_or(f64::NAN);
    let mut draft = EntryDraft::new(amount, *category, *date);
    if !note.is_empty() {
        draft = draft.with_note(note.join(" "));
    }

    let verb = match context.ledger.submit(kind, &draft)? {
        SubmitOutcome::Added(_) => "added",
        SubmitOutcome::Updated(_) => "updated",
    };
    output::success(format!("{} {verb} successfully!", kind.label()));
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [kind, index] = args else {
        return Err(usage("edit <expense|income> <index>"));
    };
    let kind = parse_kind(kind)?;
    let index = parse_index(index)?;
    context.ledger.stage_edit(kind, index)?;
    if let Some(target) = context.ledger.entries(kind).get(index) {
        output::info(format!("Editing {kind} #{index}: {}.", target.display_label()));
    }
    output::info(format!(
        "Submit the replacement with `submit {kind} ...`, or `cancel-edit`."
    ));
    Ok(())
}

fn cmd_cancel_edit(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.ledger.cancel_edit()? {
        output::info("Edit cancelled.");
    } else {
        output::info("No edit is staged.");
    }
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [kind, index] = args else {
        return Err(usage("delete <expense|income> <index>"));
    };
    let kind = parse_kind(kind)?;
    let index = parse_index(index)?;
    context.ledger.delete(kind, index)?;
    output::success(format!("{} deleted successfully", kind.label()));
    Ok(())
}

fn cmd_clear_all(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let confirmed = match args {
        ["--yes"] => true,
        [] if context.mode() == CliMode::Script => {
            return Err(CommandError::InvalidArguments(
                "clear-all needs `--yes` when not interactive".into(),
            ));
        }
        [] => context.confirm("This will delete ALL expenses and incomes. Continue?")?,
        _ => return Err(usage("clear-all [--yes]")),
    };
    if !confirmed {
        output::info("Nothing was deleted.");
        return Ok(());
    }
    context.ledger.clear_all()?;
    output::success("All history cleared.");
    Ok(())
}
