use crate::schema::PorticoConfig;

use super::helpers::validate_range;

pub(crate) fn validate_engine(errors: &mut Vec<String>, config: &PorticoConfig) {
    validate_range(
        errors,
        "engine.pump_interval_ms",
        config.engine.pump_interval_ms,
        1,
        1000,
    );

    for (name, dir) in [
        ("engine.resources_dir", &config.engine.resources_dir),
        ("engine.locales_dir", &config.engine.locales_dir),
    ] {
        if let Some(dir) = dir {
            if dir.as_os_str().is_empty() {
                errors.push(format!("{name} must not be empty when set"));
            }
        }
    }
}
