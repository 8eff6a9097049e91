//! Commented config written on first run.

use std::path::Path;

use crate::CONFIG_SCHEMA_VERSION;

const BODY: &str = r##"
# no_sandbox = true
# pump_interval_ms = 10      # 1-1000
# log_severity = "warning"   # verbose, info, warning, error, disable

[window]
# title = "Portico"
# x = 0
# y = 0
# width = 1024               # 1-16384
# height = 768               # 1-16384
# visible = true
# center_screen = true

[client]
render_handler = "default"
# start_url = "about:blank"

[logging]
# level = "INFO"             # TRACE, DEBUG, INFO, WARNING, ERROR
"##;

/// Seed config text. The commented engine paths point into `data_root`,
/// the last root searched for engine data, when one is known.
pub fn seed_config_toml(data_root: Option<&Path>) -> String {
    let root = data_root
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "/opt/portico".into());
    format!(
        "# Portico configuration (schema {CONFIG_SCHEMA_VERSION})\n\
         # Missing fields use defaults; set only what you change.\n\
         \n\
         [engine]\n\
         # Unset dirs are searched for under $PORTICO_DATA_DIR, next to the\n\
         # executable, in the working directory, then under {root}.\n\
         # resources_dir = \"{root}/libs/engine/res\"\n\
         # locales_dir = \"{root}/libs/engine/res/locales\"{BODY}"
    )
}
