use rusty_chemtools::cli::plots::PolarArgs;

fn main() -> std::process::ExitCode {
    rusty_chemtools::cli::main_for::<PolarArgs>()
}
