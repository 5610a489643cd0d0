fn main() {
    if let Err(e) = glimmer::cli::main() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
