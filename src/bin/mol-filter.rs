use rusty_chemtools::cli::molecules::FilterArgs;

fn main() -> std::process::ExitCode {
    rusty_chemtools::cli::main_for::<FilterArgs>()
}
