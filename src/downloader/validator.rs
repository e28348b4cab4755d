// YouTube URL validation

use regex::Regex;

lazy_static::lazy_static! {
    // Prefix-anchored; whatever follows the 11-char id (query params, fragments) is tolerated.
    static ref YOUTUBE_URL_RE: Regex = Regex::new(
        r"^(?:https?://)?(?:www\.)?(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/shorts/)([a-zA-Z0-9_-]{11})"
    ).expect("YouTube URL pattern is valid");
}

/// Check whether `url` has one of the accepted YouTube shapes:
/// watch (`youtube.com/watch?v=`), short (`youtu.be/`) or shorts (`youtube.com/shorts/`).
pub fn is_valid_youtube_url(url: &str) -> bool {
    YOUTUBE_URL_RE.is_match(url)
}

/// Video id of an accepted URL
pub fn extract_video_id(url: &str) -> Option<String> {
    YOUTUBE_URL_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_shapes() {
        assert!(is_valid_youtube_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(is_valid_youtube_url("https://youtu.be/dQw4w9WgXcQ"));
        assert!(is_valid_youtube_url("https://youtube.com/shorts/dQw4w9WgXcQ"));
    }

    #[test]
    fn test_optional_scheme_and_www() {
        for prefix in ["", "http://", "https://", "www.", "http://www.", "https://www."] {
            for shape in [
                "youtube.com/watch?v=dQw4w9WgXcQ",
                "youtu.be/dQw4w9WgXcQ",
                "youtube.com/shorts/dQw4w9WgXcQ",
            ] {
                let url = format!("{}{}", prefix, shape);
                assert!(is_valid_youtube_url(&url), "{}", url);
            }
        }
    }

    #[test]
    fn test_trailing_parameters_tolerated() {
        assert!(is_valid_youtube_url("https://youtu.be/Z2XzaUM1JiM?si=S5HC5oSUVWkcpL4Y"));
        assert!(is_valid_youtube_url(
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s&list=PL123"
        ));
    }

    #[test]
    fn test_id_charset() {
        assert!(is_valid_youtube_url("youtu.be/a-B_c9d-E_f"));
        assert!(!is_valid_youtube_url("youtu.be/a-B_c9d*E_f"));
    }

    #[test]
    fn test_rejected_inputs() {
        assert!(!is_valid_youtube_url(""));
        assert!(!is_valid_youtube_url("not a url"));
        // 10-char id
        assert!(!is_valid_youtube_url("https://www.youtube.com/watch?v=dQw4w9WgXc"));
        assert!(!is_valid_youtube_url("https://vimeo.com/123456789"));
        assert!(!is_valid_youtube_url("ftp://youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(!is_valid_youtube_url("https://m.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(!is_valid_youtube_url(" https://youtu.be/dQw4w9WgXcQ"));
        assert!(!is_valid_youtube_url("https://youtube.com/embed/dQw4w9WgXcQ"));
    }

    #[test]
    fn test_extract_video_id() {
        assert_eq!(
            extract_video_id("https://youtu.be/Z2XzaUM1JiM?si=S5HC5oSUVWkcpL4Y").as_deref(),
            Some("Z2XzaUM1JiM")
        );
        assert_eq!(extract_video_id("not a url"), None);
    }
}
