/// Net error code for a navigation the user or the engine cancelled.
pub const ERR_ABORTED: i32 = -3;

/// Inline page shown in place of a document that failed to load.
pub fn render(url: &str, error_text: &str, error_code: i32) -> String {
    format!(
        "<html><body><h2>Failed to load URL {}</h2><p>{} ({}).</p></body></html>",
        html_escape::encode_text(url),
        html_escape::encode_text(error_text),
        error_code,
    )
}
