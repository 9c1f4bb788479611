use crate::CLAP_STYLING;
use clap::{arg, command};

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("skillock")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("skillock")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress banner and non-essential output")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-v --"verbose" "Show debug logging")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-d --"data-dir" <PATH>)
                .required(false)
                .global(true)
                .help("Directory holding skills.txt, quests.txt and breakdowns")
                .default_value("~/.config/skillock/"),
        )
        .subcommand_required(false)
        .subcommand(
            command!("init")
                .about("Initializes the skillock data directory on your filesystem")
                .arg(
                    arg!([PATH])
                        .required(false)
                        .help("Location of the data directory (default: --data-dir)"),
                )
                .arg(
                    arg!(-f --"force")
                        .help("Empties any existing skill and quest files in the data directory.")
                        .required(false),
                ),
        )
        .subcommand(
            command!("breakdown")
                .about(
                    "Compile the total skill and quest requirements needed to unlock and \
                complete quests. Analyzes every recorded quest when none are named.",
                )
                .arg(
                    arg!([QUEST] ...)
                        .required(false)
                        .help("Names of the quests to analyze"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Directory to write breakdowns to (default: <data-dir>/breakdown)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(--"format" <FORMAT>)
                        .required(false)
                        .help("Breakdown format: text, json")
                        .value_parser(["text", "json"])
                        .default_value("text"),
                )
                .arg(
                    arg!(--"stdout")
                        .required(false)
                        .help("Print breakdowns instead of writing files")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"skip-malformed")
                        .required(false)
                        .help("Skip lines that do not follow the record layout instead of aborting")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            command!("show")
                .about("Show the requirements recorded for a single quest, without its ancestors")
                .arg(
                    arg!(<QUEST>)
                        .required(true)
                        .help("The name of the quest"),
                ),
        )
        .subcommand(
            command!("verify")
                .about("Check that the skill and quest files load and re-serialize cleanly")
                .arg(
                    arg!(--"skip-malformed")
                        .required(false)
                        .help("Skip lines that do not follow the record layout instead of aborting")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            command!("export")
                .about("Write normalized skill and quest files derived from the quest records")
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(true)
                        .help("Directory to write skills.txt and quests.txt to")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                ),
        )
}
