use rusty_chemtools::cli::plots::HistArgs;

fn main() -> std::process::ExitCode {
    rusty_chemtools::cli::main_for::<HistArgs>()
}
