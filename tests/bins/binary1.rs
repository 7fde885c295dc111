//! Fixture executable: prints a greeting and exits successfully.

fn main() {
    println!("binary1: ok");
}
