use std::process;

fn main() {
    env_logger::init();
    if let Err(e) = hdrguard_cli::run() {
        eprintln!("✖ {e:#}");
        process::exit(1);
    }
}
