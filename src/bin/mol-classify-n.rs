use rusty_chemtools::cli::molecules::ClassifyArgs;

fn main() -> std::process::ExitCode {
    rusty_chemtools::cli::main_for::<ClassifyArgs>()
}
