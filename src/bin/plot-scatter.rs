use rusty_chemtools::cli::plots::ScatterArgs;

fn main() -> std::process::ExitCode {
    rusty_chemtools::cli::main_for::<ScatterArgs>()
}
