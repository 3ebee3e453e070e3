use rusty_chemtools::cli::molecules::ChargeArgs;

fn main() -> std::process::ExitCode {
    rusty_chemtools::cli::main_for::<ChargeArgs>()
}
