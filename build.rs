//! Embeds the compile timestamp reported by `foodlog_status`.

fn main() {
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-changed=Cargo.toml");

    let compiled_at = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
    println!("cargo:rustc-env=FOODLOG_COMPILED_AT={}", compiled_at);
}
