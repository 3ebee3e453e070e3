use rusty_chemtools::cli::plots::SdfArgs;

fn main() -> std::process::ExitCode {
    rusty_chemtools::cli::main_for::<SdfArgs>()
}
