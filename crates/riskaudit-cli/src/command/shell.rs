//! Line-oriented analyzer shell
//!
//! Each line is one command; a failing command is logged and the shell keeps
//! reading. End of input behaves like `quit`.

use std::io::{self, BufRead, Write};

use riskaudit_analysis::partition::TraitSelection;

use crate::command::{
    DatasetArg, ModelKind,
    analyzer::{Analyzer, CorrectionRequest},
};

const INTRO: &str = "Welcome to the analyzer shell. Type help or ? to list commands.";
const PROMPT: &str = "(analyzer) ";
const FAREWELL: &str = "Thank you for using analyzer";

/// `(name, usage, description)` of every command
const COMMANDS: [(&str, &str, &str); 9] = [
    (
        "trait_breakdown",
        "trait_breakdown <column>",
        "Count the rows carrying each value of a column",
    ),
    (
        "correct_for",
        "correct_for <score_col> <group_col> <trait, trait | ALL>",
        "Measure and correct linear bias",
    ),
    (
        "correct_for_rms",
        "correct_for_rms <score_col> <group_col> <trait, trait | ALL>",
        "Same as correct_for, reporting RMS error",
    ),
    (
        "correct_for_bucketed",
        "correct_for_bucketed <score_col> <group_col> <trait, trait | ALL>",
        "Correct each (trait, score) bucket separately and chart the errors",
    ),
    (
        "correct_for_threshold",
        "correct_for_threshold <score_col> <group_col> <trait, trait | ALL>",
        "Measure and correct misclassifications at the threshold",
    ),
    (
        "plot_recid",
        "plot_recid <group_col> <trait> <score_col>",
        "Chart outcome counts per score value of one trait",
    ),
    (
        "plot_threshold",
        "plot_threshold <group_col> <trait | ALL> <score_col>",
        "Sweep every threshold and chart false positives against false negatives",
    ),
    ("help", "help", "List commands"),
    ("quit", "quit", "Leave the shell"),
];

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub(crate) enum ShellError {
    #[display("Malformed arguments for {command}, usage: {usage}")]
    MalformedArgument {
        command: &'static str,
        usage: &'static str,
    },
    #[display("Unknown command '{command}', type help to list commands")]
    UnknownCommand { command: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ShellCommand {
    TraitBreakdown {
        column: String,
    },
    CorrectFor {
        model: ModelKind,
        score_column: String,
        group_column: String,
        selection: TraitSelection,
    },
    PlotRecid {
        group_column: String,
        trait_name: String,
        score_column: String,
    },
    PlotThreshold {
        group_column: String,
        selection: TraitSelection,
        score_column: String,
    },
    Help,
    Quit,
}

impl ShellCommand {
    /// Parses one input line; a blank line is `None`.
    pub(crate) fn parse(line: &str) -> Result<Option<Self>, ShellError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (name, args) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(name, args)| (name, args.trim()));

        let Some(&(name, usage, _)) = COMMANDS.iter().find(|(command, ..)| *command == name)
        else {
            return match name {
                "?" => Ok(Some(ShellCommand::Help)),
                "exit" | "EOF" => Ok(Some(ShellCommand::Quit)),
                _ => Err(ShellError::UnknownCommand {
                    command: name.to_owned(),
                }),
            };
        };
        let malformed = || ShellError::MalformedArgument {
            command: name,
            usage,
        };

        let command = match name {
            "trait_breakdown" => {
                if args.is_empty() {
                    return Err(malformed());
                }
                ShellCommand::TraitBreakdown {
                    column: args.to_owned(),
                }
            }
            "correct_for" | "correct_for_rms" | "correct_for_bucketed" | "correct_for_threshold" => {
                let mut parts = args.splitn(3, ' ').map(str::trim);
                let (Some(score), Some(group), Some(traits)) =
                    (parts.next(), parts.next(), parts.next())
                else {
                    return Err(malformed());
                };
                if score.is_empty() || group.is_empty() || traits.is_empty() {
                    return Err(malformed());
                }
                let model = match name {
                    "correct_for_rms" => ModelKind::Rms,
                    "correct_for_bucketed" => ModelKind::Bucketed,
                    "correct_for_threshold" => ModelKind::Threshold,
                    _ => ModelKind::Linear,
                };
                ShellCommand::CorrectFor {
                    model,
                    score_column: score.to_owned(),
                    group_column: group.to_owned(),
                    selection: TraitSelection::parse(traits),
                }
            }
            "plot_recid" | "plot_threshold" => {
                // the trait sits between the two column names and may contain spaces
                let Some((group, rest)) = args.split_once(' ') else {
                    return Err(malformed());
                };
                let Some((middle, score)) = rest.trim().rsplit_once(' ') else {
                    return Err(malformed());
                };
                let middle = middle.trim();
                if middle.is_empty() {
                    return Err(malformed());
                }
                if name == "plot_recid" {
                    ShellCommand::PlotRecid {
                        group_column: group.to_owned(),
                        trait_name: middle.to_owned(),
                        score_column: score.to_owned(),
                    }
                } else {
                    ShellCommand::PlotThreshold {
                        group_column: group.to_owned(),
                        selection: TraitSelection::parse(middle),
                        score_column: score.to_owned(),
                    }
                }
            }
            "help" => ShellCommand::Help,
            _ => ShellCommand::Quit,
        };
        Ok(Some(command))
    }
}

pub(crate) fn run(arg: &DatasetArg) -> anyhow::Result<()> {
    let mut analyzer = Analyzer::load(arg)?;
    run_loop(&mut analyzer, io::stdin().lock(), &mut io::stdout().lock())
}

fn run_loop<R>(analyzer: &mut Analyzer, mut input: R, out: &mut dyn Write) -> anyhow::Result<()>
where
    R: BufRead,
{
    writeln!(out, "{INTRO}")?;
    let mut line = String::new();
    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            break;
        }
        let command = match ShellCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                log::error!("{e}");
                continue;
            }
        };
        if command == ShellCommand::Quit {
            break;
        }
        if let Err(e) = execute(analyzer, &command, out) {
            log::error!("{e:#}");
        }
    }
    writeln!(out, "{FAREWELL}")?;
    Ok(())
}

fn execute(
    analyzer: &mut Analyzer,
    command: &ShellCommand,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    match command {
        ShellCommand::TraitBreakdown { column } => analyzer.trait_breakdown(column, out)?,
        ShellCommand::CorrectFor {
            model,
            score_column,
            group_column,
            selection,
        } => {
            let request = CorrectionRequest {
                score_column,
                group_column,
                selection: selection.clone(),
                model: model.error_model(analyzer.settings().threshold),
                plot: *model == ModelKind::Bucketed,
            };
            analyzer.correct_for(&request, out)?;
        }
        ShellCommand::PlotRecid {
            group_column,
            trait_name,
            score_column,
        } => analyzer.plot_recid(group_column, trait_name, score_column)?,
        ShellCommand::PlotThreshold {
            group_column,
            selection,
            score_column,
        } => analyzer.plot_threshold(group_column, selection, score_column, out)?,
        ShellCommand::Help => {
            writeln!(out, "Commands:")?;
            for (_, usage, description) in COMMANDS {
                writeln!(out, "  {usage:<68} {description}")?;
            }
        }
        ShellCommand::Quit => {}
    }
    Ok(())
}
