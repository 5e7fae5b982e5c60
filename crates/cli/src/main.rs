//! `apigen` binary entry point.

fn main() {
    apigen_cli::logging::init_tracing();
    let code = apigen_cli::run_cli(std::env::args().collect());
    std::process::exit(code);
}
