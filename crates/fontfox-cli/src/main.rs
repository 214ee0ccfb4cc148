fn main() {
    fontfox_cli::main();
}
