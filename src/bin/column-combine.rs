use rusty_chemtools::cli::columns::CombineArgs;

fn main() -> std::process::ExitCode {
    rusty_chemtools::cli::main_for::<CombineArgs>()
}
