//! Slide documents reduced to what the native renderer draws.
//!
//! Slides are HTML pages. The viewer does not run a browser engine, so a page
//! is flattened to its title, its text blocks and its links. Scripts and
//! styles are dropped outright; nothing in a document can execute.

use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use crate::source::{Resource, join_url};

const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("valid regex"));
static STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").expect("valid regex"));
static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));
static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title\b[^>]*>(.*?)</title\s*>").expect("valid regex"));
static BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(h[1-6]|p|li|blockquote|pre)\b[^>]*>(.*?)</(?:h[1-6]|p|li|blockquote|pre)\s*>")
        .expect("valid regex")
});
static BODY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<body\b[^>]*>(.*?)(?:</body\s*>|$)").expect("valid regex"));
static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\b[^>]*?\bhref\s*=\s*["']([^"']+)["'][^>]*>(.*?)</a\s*>"#)
        .expect("valid regex")
});
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid regex"));
static ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").expect("valid regex"));
static SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("failed to fetch {url}: {message}")]
    Http { url: String, message: String },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph(String),
    Quote(String),
    Preformatted(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub text: String,
    pub href: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub title: Option<String>,
    pub blocks: Vec<Block>,
    pub links: Vec<Link>,
}

impl Document {
    pub fn parse(html: &str) -> Self {
        let cleaned = COMMENT_RE.replace_all(html, "");
        let cleaned = SCRIPT_RE.replace_all(&cleaned, "");
        let cleaned = STYLE_RE.replace_all(&cleaned, "");

        let title = TITLE_RE
            .captures(&cleaned)
            .map(|c| inline_text(&c[1]))
            .filter(|t| !t.is_empty());

        let mut blocks = Vec::new();
        for caps in BLOCK_RE.captures_iter(&cleaned) {
            let tag = caps[1].to_ascii_lowercase();
            let block = if tag == "pre" {
                let text = decode_entities(&TAG_RE.replace_all(&caps[2], ""));
                let text = text.trim_matches('\n').to_string();
                if text.trim().is_empty() {
                    continue;
                }
                Block::Preformatted(text)
            } else {
                let text = inline_text(&caps[2]);
                if text.is_empty() {
                    continue;
                }
                match tag.as_str() {
                    "blockquote" => Block::Quote(text),
                    "p" | "li" => Block::Paragraph(text),
                    heading => Block::Heading {
                        level: heading[1..].parse().unwrap_or(1),
                        text,
                    },
                }
            };
            blocks.push(block);
        }

        // Pages without block markup still have body text worth showing.
        if blocks.is_empty() {
            let body = BODY_RE
                .captures(&cleaned)
                .map(|c| c[1].to_string())
                .unwrap_or_else(|| TITLE_RE.replace_all(&cleaned, "").into_owned());
            let text = inline_text(&body);
            if !text.is_empty() {
                blocks.push(Block::Paragraph(text));
            }
        }

        let links = LINK_RE
            .captures_iter(&cleaned)
            .map(|c| Link {
                href: decode_entities(c[1].trim()),
                text: inline_text(&c[2]),
            })
            .filter(|l| !l.href.starts_with('#') && !l.href.to_ascii_lowercase().starts_with("javascript:"))
            .collect();

        Self {
            title,
            blocks,
            links,
        }
    }
}

/// Load and parse the document behind `resource`.
pub fn fetch(resource: &Resource) -> Result<Document, DocumentError> {
    let html = match resource {
        Resource::Inline(html) => html.clone(),
        Resource::Local(path) => {
            std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
                path: path.clone(),
                source,
            })?
        }
        Resource::Remote(url) => {
            let agent: ureq::Agent = ureq::Agent::config_builder()
                .timeout_global(Some(FETCH_TIMEOUT))
                .build()
                .into();
            agent
                .get(url)
                .call()
                .and_then(|mut response| response.body_mut().read_to_string())
                .map_err(|e| DocumentError::Http {
                    url: url.clone(),
                    message: e.to_string(),
                })?
        }
    };
    Ok(Document::parse(&html))
}

/// Where a link inside a document points, if it can be opened at all.
/// Links in inline or local documents only open when already absolute.
pub fn link_target(resource: &Resource, href: &str) -> Option<String> {
    match resource {
        Resource::Remote(base) => Some(join_url(base, href)),
        _ if crate::source::is_absolute_url(href) => Some(href.to_string()),
        _ => None,
    }
}

fn inline_text(fragment: &str) -> String {
    let stripped = TAG_RE.replace_all(fragment, " ");
    let decoded = decode_entities(&stripped);
    SPACE_RE.replace_all(decoded.trim(), " ").into_owned()
}

fn decode_entities(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &regex::Captures| {
            let entity = &caps[1];
            let decoded = if let Some(hex) = entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = entity.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match entity {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some('\u{a0}'),
                    "mdash" => Some('\u{2014}'),
                    "ndash" => Some('\u{2013}'),
                    "hellip" => Some('\u{2026}'),
                    "copy" => Some('\u{a9}'),
                    _ => None,
                }
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_structure() {
        let html = r#"<html><head><title> Intro &amp; Goals </title>
            <style>h1 { color: red }</style></head>
            <body>
              <h1>Welcome</h1>
              <p>First <b>bold</b>
                 paragraph.</p>
              <ul><li>one</li><li>two</li></ul>
              <blockquote>Wise words</blockquote>
              <script>document.write("<p>injected</p>")</script>
            </body></html>"#;
        let doc = Document::parse(html);
        assert_eq!(doc.title.as_deref(), Some("Intro & Goals"));
        assert_eq!(
            doc.blocks,
            vec![
                Block::Heading {
                    level: 1,
                    text: "Welcome".to_string()
                },
                Block::Paragraph("First bold paragraph.".to_string()),
                Block::Paragraph("one".to_string()),
                Block::Paragraph("two".to_string()),
                Block::Quote("Wise words".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_links() {
        let html = r##"<p><a href="https://example.com/a">Site</a>
            <a class="x" href='/b.html'>B</a>
            <a href="#top">Top</a>
            <a href="javascript:alert(1)">Bad</a></p>"##;
        let doc = Document::parse(html);
        assert_eq!(
            doc.links,
            vec![
                Link {
                    text: "Site".to_string(),
                    href: "https://example.com/a".to_string()
                },
                Link {
                    text: "B".to_string(),
                    href: "/b.html".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_plain_body_fallback() {
        let doc = Document::parse("<html><body>Just some <i>text</i></body></html>");
        assert_eq!(doc.blocks, vec![Block::Paragraph("Just some text".to_string())]);
        assert!(Document::parse("").blocks.is_empty());
    }

    #[test]
    fn test_preformatted_keeps_lines() {
        let doc = Document::parse("<pre>\nfn main() {\n    1 &lt; 2;\n}\n</pre>");
        assert_eq!(
            doc.blocks,
            vec![Block::Preformatted("fn main() {\n    1 < 2;\n}".to_string())]
        );
    }

    #[test]
    fn test_entities() {
        assert_eq!(decode_entities("&#65;&#x42;&lt;&unknown;"), "AB<&unknown;");
    }

    #[test]
    fn test_link_target() {
        let remote = Resource::Remote("http://host/slides/1.html".to_string());
        assert_eq!(
            link_target(&remote, "2.html").as_deref(),
            Some("http://host/slides/2.html")
        );
        let inline = Resource::Inline(String::new());
        assert_eq!(link_target(&inline, "2.html"), None);
        assert_eq!(
            link_target(&inline, "https://example.com").as_deref(),
            Some("https://example.com")
        );
    }

    #[test]
    fn test_fetch_inline_and_local() {
        let doc = fetch(&Resource::Inline("<h2>Hi</h2>".to_string())).unwrap();
        assert_eq!(
            doc.blocks,
            vec![Block::Heading {
                level: 2,
                text: "Hi".to_string()
            }]
        );

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.html");
        std::fs::write(&path, "<p>local</p>").unwrap();
        let doc = fetch(&Resource::Local(path)).unwrap();
        assert_eq!(doc.blocks, vec![Block::Paragraph("local".to_string())]);

        let err = fetch(&Resource::Local(dir.path().join("missing.html"))).unwrap_err();
        assert!(matches!(err, DocumentError::Io { .. }));
    }
}
