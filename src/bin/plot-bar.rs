use rusty_chemtools::cli::plots::BarArgs;

fn main() -> std::process::ExitCode {
    rusty_chemtools::cli::main_for::<BarArgs>()
}
