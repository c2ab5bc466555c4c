fn main() {
    if let Err(e) = groundchat::cli::main() {
        eprintln!("❌ {e}");
        std::process::exit(1);
    }
}
