use unicode_width::UnicodeWidthChar;

use url::Url;

/// Safely truncate a string, ensuring it is not truncated in the middle of multi-byte characters
///
/// This function will:
/// 1. Correctly handle Unicode characters (including Chinese, emoji, etc.)
/// 2. Add ellipsis when maximum length is reached
/// 3. Ensure the output string's display width does not exceed the specified length
#[allow(dead_code)]
pub fn truncate_str(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthStr;

    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(1);

        if current_width + char_width + 3 > max_width {
            break;
        }

        result.push(c);
        current_width += char_width;
    }

    result.push_str("...");
    result
}

/// `<scheme>://<host[:port]>/favicon.ico` for `url`, using `https` and
/// `default_host` when the URL lacks them. The icon is not checked for existence.
pub fn favicon_url(url: &Url, default_host: &str) -> String {
    let scheme = match url.scheme() {
        "" => "https",
        scheme => scheme,
    };

    let host = match url.host_str() {
        Some(host) if !host.is_empty() => match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        },
        _ => default_host.to_string(),
    };

    format!("{scheme}://{host}/favicon.ico")
}
