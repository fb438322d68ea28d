//! Short binary name (`qs`) that forwards to the `qr_shelf` library.

fn main() {
    if let Err(err) = qr_shelf::entry() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
