fn main() {
    if let Err(err) = qr_shelf::entry() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
