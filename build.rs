use std::env;
use std::process::Command;

fn main() {
    let profile = env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());
    let target = env::var("TARGET").unwrap_or_else(|_| "unknown".to_string());
    let host = env::var("HOST").unwrap_or_else(|_| "unknown".to_string());

    println!("cargo:rustc-env=BUILD_PROFILE={}", profile);
    println!("cargo:rustc-env=BUILD_TARGET={}", target);
    println!("cargo:rustc-env=BUILD_HOST={}", host);

    match Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
    {
        Ok(output) if output.status.success() => {
            let hash = String::from_utf8_lossy(&output.stdout).trim().to_string();
            println!("cargo:rustc-env=GIT_HASH={}", hash);

            let clean = Command::new("git")
                .args(["status", "--porcelain"])
                .output()
                .map(|o| o.stdout.is_empty())
                .unwrap_or(false);
            println!("cargo:rustc-env=GIT_CLEAN={}", clean);
        }
        _ => {
            println!("cargo:rustc-env=GIT_HASH=unknown");
            println!("cargo:rustc-env=GIT_CLEAN=unknown");
        }
    }

    println!(
        "cargo:rustc-env=BUILD_DATE={}",
        chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ")
    );
}
