use rusty_chemtools::cli::molecules::ConvertArgs;

fn main() -> std::process::ExitCode {
    rusty_chemtools::cli::main_for::<ConvertArgs>()
}
