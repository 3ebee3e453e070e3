use rusty_chemtools::cli::plots::XyArgs;

fn main() -> std::process::ExitCode {
    rusty_chemtools::cli::main_for::<XyArgs>()
}
