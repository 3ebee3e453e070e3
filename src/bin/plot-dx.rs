use rusty_chemtools::cli::plots::DxArgs;

fn main() -> std::process::ExitCode {
    rusty_chemtools::cli::main_for::<DxArgs>()
}
