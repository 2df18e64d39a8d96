fn main() {
    tamplete::run();
}
