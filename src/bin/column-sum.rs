use rusty_chemtools::cli::columns::SumArgs;

fn main() -> std::process::ExitCode {
    rusty_chemtools::cli::main_for::<SumArgs>()
}
