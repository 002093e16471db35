use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine;

/// Plain-text email ready to be stored as a Gmail draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftMessage {
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

impl DraftMessage {
    pub fn new(to: Vec<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to,
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// RFC 2822 message with CRLF line endings
    pub fn to_mime(&self) -> String {
        let body = self.body.replace("\r\n", "\n").replace('\n', "\r\n");
        format!(
            "Content-Type: text/plain; charset=\"utf-8\"\r\n\
             MIME-Version: 1.0\r\n\
             Content-Transfer-Encoding: 8bit\r\n\
             to: {}\r\n\
             subject: {}\r\n\
             \r\n\
             {}",
            recipients(&self.to),
            encode_header(&single_line(&self.subject)),
            body
        )
    }

    /// URL-safe base64 of the MIME message, as the `raw` field expects
    pub fn to_raw(&self) -> String {
        URL_SAFE.encode(self.to_mime().as_bytes())
    }
}

// Header values must not break onto new lines
fn single_line(value: &str) -> String {
    value
        .split(|c: char| c.is_control())
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn recipients(to: &[String]) -> String {
    to.iter()
        .map(|r| single_line(r))
        .filter(|r| !r.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

// Raw bytes per RFC 2047 encoded word, keeps each word under 76 characters
const ENCODED_WORD_BYTES: usize = 45;

/// ASCII values pass through; anything else becomes folded
/// `=?utf-8?b?...?=` encoded words split on character boundaries
fn encode_header(value: &str) -> String {
    if value.is_ascii() {
        return value.to_string();
    }

    let mut words = Vec::new();
    let mut chunk = String::new();
    for c in value.chars() {
        if chunk.len() + c.len_utf8() > ENCODED_WORD_BYTES {
            words.push(format!("=?utf-8?b?{}?=", STANDARD.encode(chunk.as_bytes())));
            chunk.clear();
        }
        chunk.push(c);
    }
    if !chunk.is_empty() {
        words.push(format!("=?utf-8?b?{}?=", STANDARD.encode(chunk.as_bytes())));
    }

    words.join("\r\n ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> DraftMessage {
        DraftMessage::new(
            vec!["a@example.com".to_string(), "b@example.com".to_string()],
            "Rescheduling our sync",
            "Hi,\nI'm out next week.\n",
        )
    }

    #[test]
    fn test_mime_layout() {
        let mime = message().to_mime();
        let (headers, body) = mime.split_once("\r\n\r\n").unwrap();

        assert!(headers.contains("to: a@example.com, b@example.com"));
        assert!(headers.contains("subject: Rescheduling our sync"));
        assert!(headers.starts_with("Content-Type: text/plain; charset=\"utf-8\""));
        assert_eq!(body, "Hi,\r\nI'm out next week.\r\n");
    }

    #[test]
    fn test_subject_cannot_inject_headers() {
        let message = DraftMessage::new(
            vec!["a@example.com".to_string()],
            "Hello\r\nBcc: someone@example.com",
            "body",
        );
        let mime = message.to_mime();
        assert!(mime.contains("subject: Hello Bcc: someone@example.com\r\n"));
        assert!(!mime.contains("\r\nBcc:"));
    }

    #[test]
    fn test_recipients_cannot_inject_headers() {
        let message = DraftMessage::new(
            vec![
                "a@example.com\r\nBcc: evil@example.com".to_string(),
                "b@example.com\n".to_string(),
            ],
            "Hello",
            "body",
        );
        let mime = message.to_mime();
        assert!(mime.contains("to: a@example.com Bcc: evil@example.com, b@example.com\r\n"));
        assert!(!mime.contains("\r\nBcc:"));
    }

    #[test]
    fn test_non_ascii_subject_is_encoded() {
        let message = DraftMessage::new(vec!["a@example.com".to_string()], "Päivän palaveri", "body");
        let mime = message.to_mime();
        let expected = format!("subject: =?utf-8?b?{}?=\r\n", STANDARD.encode("Päivän palaveri"));
        assert!(mime.contains(&expected));

        // Long subjects fold into several encoded words
        let long = "ä".repeat(40);
        let encoded = encode_header(&long);
        let words: Vec<&str> = encoded.split("\r\n ").collect();
        assert_eq!(words.len(), 2);
        assert!(words.iter().all(|w| w.len() <= 75));
        let decoded: String = words
            .iter()
            .map(|w| {
                let inner = w.trim_start_matches("=?utf-8?b?").trim_end_matches("?=");
                String::from_utf8(STANDARD.decode(inner).unwrap()).unwrap()
            })
            .collect();
        assert_eq!(decoded, long);
    }

    #[test]
    fn test_raw_is_url_safe_base64() {
        let raw = message().to_raw();
        assert!(!raw.contains('+'));
        assert!(!raw.contains('/'));

        let decoded = URL_SAFE.decode(raw.as_bytes()).unwrap();
        assert_eq!(String::from_utf8(decoded).unwrap(), message().to_mime());
    }
}
