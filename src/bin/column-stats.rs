use rusty_chemtools::cli::columns::StatsArgs;

fn main() -> std::process::ExitCode {
    rusty_chemtools::cli::main_for::<StatsArgs>()
}
