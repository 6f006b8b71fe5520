fn main() {
    if let Err(err) = evolance::cli::main() {
        eprintln!("❌ {err}");
        std::process::exit(1);
    }
}
