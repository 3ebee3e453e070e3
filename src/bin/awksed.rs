use rusty_chemtools::cli::awksed::AwksedArgs;

fn main() -> std::process::ExitCode {
    rusty_chemtools::cli::main_for::<AwksedArgs>()
}
