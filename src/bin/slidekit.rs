fn main() {
    slidekit::cli::run();
}
