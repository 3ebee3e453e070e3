use rusty_chemtools::cli::molecules::CombineMolsArgs;

fn main() -> std::process::ExitCode {
    rusty_chemtools::cli::main_for::<CombineMolsArgs>()
}
