fn main() {
    // Network and broker settings come from `.env` via `env!`
    if let Err(e) = dotenv_build::output(dotenv_build::Config::default()) {
        println!("cargo:warning=.env not loaded: {e}");
    }
    println!("cargo:rerun-if-changed=.env");
    println!("cargo:rustc-link-arg=-Tlinkall.x");
}
