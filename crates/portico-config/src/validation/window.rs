use crate::schema::PorticoConfig;

use super::helpers::validate_range;

const MAX_WINDOW_EXTENT: u32 = 16384;

pub(crate) fn validate_window(errors: &mut Vec<String>, config: &PorticoConfig) {
    validate_range(
        errors,
        "window.width",
        config.window.width,
        1,
        MAX_WINDOW_EXTENT,
    );
    validate_range(
        errors,
        "window.height",
        config.window.height,
        1,
        MAX_WINDOW_EXTENT,
    );
}
