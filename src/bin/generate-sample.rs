use rusty_chemtools::cli::sample::SampleArgs;

fn main() -> std::process::ExitCode {
    rusty_chemtools::cli::main_for::<SampleArgs>()
}
