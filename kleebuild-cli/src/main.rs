//! Binary entrypoint for kleebuild-cli.

fn main() {
    if let Err(err) = kleebuild_cli::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
