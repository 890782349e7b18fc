fn main() {
    std::process::exit(nobg_lib::run())
}
