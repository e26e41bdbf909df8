use std::path::Path;

pub const WAV_MIME: &str = "audio/wav";

const WAV_MIME_IDENTIFIERS: [&str; 3] = ["audio/wav", "audio/wave", "audio/x-wav"];

/// Client media type declarations are unreliable; a `.wav` extension is an
/// accepted fallback.
pub fn is_wav_upload(declared_mime: Option<&str>, filename: &str) -> bool {
    if let Some(mime) = declared_mime {
        let essence = mime.split(';').next().unwrap_or(mime).trim();
        if WAV_MIME_IDENTIFIERS
            .iter()
            .any(|m| essence.eq_ignore_ascii_case(m))
        {
            return true;
        }
    }
    Path::new(filename)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"))
}
