//! Environment readiness check.

use crate::driver::chromium::find_chromium;
use anyhow::Result;

/// Check Chromium availability, destination writability, and cache config.
pub async fn run() -> Result<()> {
    println!("Gleaner Doctor");
    println!("==============");
    println!();

    // OS and architecture
    let os = std::env::consts::OS;
    let arch = std::env::consts::ARCH;
    println!("OS:   {os}");
    println!("Arch: {arch}");
    println!();

    // Check Chromium
    let chromium_path = find_chromium();
    match &chromium_path {
        Some(path) => println!("[OK] Chromium found: {}", path.display()),
        None => println!(
            "[!!] Chromium NOT found. Install Chrome or set GLEANER_CHROMIUM_PATH."
        ),
    }

    // Check that export destinations in the working directory are writable
    let probe = std::env::current_dir()?.join(".gleaner-doctor-probe");
    match std::fs::write(&probe, b"probe") {
        Ok(()) => {
            let _ = std::fs::remove_file(&probe);
            println!("[OK] Working directory is writable");
        }
        Err(e) => println!("[!!] Working directory is NOT writable: {e}"),
    }

    // Optional record cache
    match std::env::var("GLEANER_REDIS_URL") {
        Ok(_) => println!("[OK] GLEANER_REDIS_URL is set (record caching enabled)"),
        Err(_) => println!("[--] GLEANER_REDIS_URL not set (record caching skipped; optional)"),
    }

    println!();
    if chromium_path.is_some() {
        println!("Status: READY");
    } else {
        println!("Status: NOT READY");
        println!("  Install Chrome or point GLEANER_CHROMIUM_PATH at a Chromium binary.");
    }

    Ok(())
}
