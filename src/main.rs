use std::process::ExitCode;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = clinicdb::cli::run() {
        eprintln!("Error: {e}");
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}
