use crate::config;

/// Load and validate settings. Logging is not up yet, so problems go to
/// stderr and the defaults are used.
pub fn load_settings() -> config::Settings {
    match config::Settings::load() {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                eprintln!("spindle: invalid config, using defaults: {msg}");
                config::Settings::default()
            } else {
                s
            }
        }
        Err(e) => {
            // Config is optional; failures should not prevent the app from starting.
            eprintln!("spindle: failed to load config, using defaults: {e}");
            config::Settings::default()
        }
    }
}
