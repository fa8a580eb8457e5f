use url::Url;

pub const INVALID_URL_MESSAGE: &str =
    "Please enter a valid YouTube URL (youtube.com/watch?v=... or youtu.be/...)";

/// Accepts `https://www.youtube.com/watch?v=<id>`, `https://youtube.com/watch?v=<id>`
/// and `https://youtu.be/<id>`. Anything else is rejected before it reaches the
/// network.
pub fn is_valid_youtube_url(raw: &str) -> bool {
    let Ok(parsed) = Url::parse(raw.trim()) else {
        return false;
    };
    if parsed.scheme() != "https" {
        return false;
    }

    match parsed.host_str() {
        Some("youtu.be") => parsed.path().len() > 1,
        Some("www.youtube.com") | Some("youtube.com") => {
            parsed.path() == "/watch"
                && parsed
                    .query_pairs()
                    .any(|(key, value)| key == "v" && !value.is_empty())
        }
        _ => false,
    }
}
