fn main() {
    // Build-time configuration baked into `SystemConfig::load()`.
    println!("cargo:rerun-if-env-changed=AQUA_CONFIG_JSON");
    println!("cargo:rerun-if-env-changed=AQUA_WIFI_SSID");
    println!("cargo:rerun-if-env-changed=AQUA_WIFI_PASSWORD");

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
