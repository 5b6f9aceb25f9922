//! Bakes the default network credentials into the image.
//!
//! `WIFI_SSID` and `WIFI_PASSWORD` are taken from the environment, or from a
//! `.env` file next to this crate when the environment does not set them.
//! Both are optional: without them the firmware relies on the configuration
//! saved in flash.

const CREDENTIAL_KEYS: [&str; 2] = ["WIFI_SSID", "WIFI_PASSWORD"];

fn main() {
    println!("cargo:rustc-link-arg=-Tlinkall.x");

    println!("cargo:rerun-if-changed=.env");
    for key in CREDENTIAL_KEYS {
        println!("cargo:rerun-if-env-changed={key}");
    }

    let Ok(entries) = dotenvy::dotenv_iter() else {
        return;
    };

    for (key, value) in entries.flatten() {
        if CREDENTIAL_KEYS.contains(&key.as_str()) && std::env::var_os(&key).is_none() {
            println!("cargo:rustc-env={key}={value}");
        }
    }
}
