fn main() {
    if let Err(e) = energoboard_lib::cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
