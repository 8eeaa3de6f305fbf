fn main() {
    let guard = match draftex_log::init(draftex_log::LogConfig { log_file_path: None }) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            None
        }
    };

    tracing::info!("Starting draftex");

    if let Err(e) = draftex_cli::run() {
        eprintln!("Error: {e}");
        drop(guard);
        std::process::exit(1);
    }
}
