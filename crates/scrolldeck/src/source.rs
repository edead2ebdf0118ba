//! Where slide lists come from.
//!
//! The viewer only ever asks a [`SlideSource`] for the whole ordered list; it
//! never writes back. Implementations: the HTTP list endpoint, a YAML/JSON
//! file on disk, and an in-memory list (used for the built-in demo deck).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info};

use crate::slide::{Slide, validate_sequence};

/// Route of the list endpoint, relative to the service location.
pub const SLIDES_PATH: &str = "/api/slides";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("request to {url} failed: {message}")]
    Http { url: String, message: String },

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("malformed slide list: {0}")]
    Malformed(String),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("slides are not sorted by order (slide {id} at position {position})")]
    Unsorted { id: i64, position: usize },

    #[error("duplicate slide id {0}")]
    DuplicateId(i64),
}

/// Resolved location of a slide document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Remote(String),
    Local(PathBuf),
    /// Document text carried by the source itself.
    Inline(String),
}

pub trait SlideSource: Send + Sync {
    /// Fetch the full, ordered slide list.
    fn list_slides(&self) -> Result<Vec<Slide>, SourceError>;

    /// Human-readable origin, for window titles and logs.
    fn describe(&self) -> String;

    /// Turn a slide's opaque `url` into something loadable.
    fn resolve(&self, url: &str) -> Resource;
}

/// Reads `GET {endpoint}/api/slides`.
pub struct HttpSlideSource {
    endpoint: String,
    agent: ureq::Agent,
}

impl HttpSlideSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build()
            .into();
        Self { endpoint, agent }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn list_url(&self) -> String {
        format!("{}{}", self.endpoint, build_url(SLIDES_PATH, &[]))
    }
}

impl SlideSource for HttpSlideSource {
    fn list_slides(&self) -> Result<Vec<Slide>, SourceError> {
        let url = self.list_url();
        debug!(%url, "requesting slide list");

        let mut response = self.agent.get(&url).call().map_err(|e| match e {
            ureq::Error::StatusCode(status) => SourceError::Status {
                url: url.clone(),
                status,
            },
            other => SourceError::Http {
                url: url.clone(),
                message: other.to_string(),
            },
        })?;

        let slides: Vec<Slide> = response.body_mut().read_json().map_err(|e| match e {
            ureq::Error::Json(e) => SourceError::Malformed(e.to_string()),
            other => SourceError::Http {
                url: url.clone(),
                message: other.to_string(),
            },
        })?;

        validate_sequence(&slides)?;
        info!(count = slides.len(), %url, "slide list fetched");
        Ok(slides)
    }

    fn describe(&self) -> String {
        self.endpoint.clone()
    }

    fn resolve(&self, url: &str) -> Resource {
        Resource::Remote(join_url(&self.endpoint, url))
    }
}

/// Slide list stored as YAML or JSON on disk. Relative slide urls resolve
/// against the file's directory.
pub struct FileSlideSource {
    path: PathBuf,
    base_dir: PathBuf,
}

impl FileSlideSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let base_dir = path
            .parent()
            .unwrap_or(Path::new("."))
            .to_path_buf();
        Self { path, base_dir }
    }
}

impl SlideSource for FileSlideSource {
    fn list_slides(&self) -> Result<Vec<Slide>, SourceError> {
        let contents = std::fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        let slides = parse_slide_list(&contents, &self.path)?;
        validate_sequence(&slides)?;
        info!(count = slides.len(), path = %self.path.display(), "slide list read");
        Ok(slides)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn resolve(&self, url: &str) -> Resource {
        if is_absolute_url(url) {
            Resource::Remote(url.to_string())
        } else {
            Resource::Local(self.base_dir.join(url.trim_start_matches('/')))
        }
    }
}

fn parse_slide_list(contents: &str, path: &Path) -> Result<Vec<Slide>, SourceError> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str(contents).map_err(|e| SourceError::Malformed(e.to_string()))
    } else {
        serde_yaml::from_str(contents).map_err(|e| SourceError::Malformed(e.to_string()))
    }
}

/// A fixed list held in memory, optionally with the documents themselves.
#[derive(Debug, Clone, Default)]
pub struct MemorySlideSource {
    slides: Vec<Slide>,
    documents: HashMap<String, String>,
    base: Option<String>,
}

impl MemorySlideSource {
    pub fn new(slides: Vec<Slide>) -> Self {
        Self {
            slides,
            ..Self::default()
        }
    }

    /// Twelve numbered slides (`/slides/1.html` .. `/slides/12.html`) with
    /// their documents inlined, so the viewer runs without a backend.
    pub fn demo() -> Self {
        let mut source = Self::default();
        for i in 1..=12 {
            let url = format!("/slides/{i}.html");
            source
                .documents
                .insert(url.clone(), demo_document(i));
            source.slides.push(Slide::new(i, format!("Slide {i}"), url, i));
        }
        source
    }

    /// Resolve urls without an inline document against `base`.
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn with_document(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.documents.insert(url.into(), html.into());
        self
    }
}

impl SlideSource for MemorySlideSource {
    fn list_slides(&self) -> Result<Vec<Slide>, SourceError> {
        validate_sequence(&self.slides)?;
        Ok(self.slides.clone())
    }

    fn describe(&self) -> String {
        "built-in slides".to_string()
    }

    fn resolve(&self, url: &str) -> Resource {
        if let Some(html) = self.documents.get(url) {
            return Resource::Inline(html.clone());
        }
        match &self.base {
            Some(base) => Resource::Remote(join_url(base, url)),
            None => Resource::Local(PathBuf::from(url)),
        }
    }
}

fn demo_document(i: i64) -> String {
    format!(
        "<!DOCTYPE html>\n<html><head><title>Slide {i}</title></head>\n<body>\n\
         <h1>Slide {i}</h1>\n\
         <p>This is slide {i} of the built-in demo deck.</p>\n\
         <p>Scroll, use the arrow keys, or click the dots on the right to move between slides.</p>\n\
         </body></html>\n"
    )
}

/// Substitute `:name` placeholders in a route path.
/// Parameters with no matching placeholder are ignored.
pub fn build_url(path: &str, params: &[(&str, &str)]) -> String {
    let mut url = path.to_string();
    for (key, value) in params {
        let placeholder = format!(":{key}");
        if url.contains(&placeholder) {
            url = url.replace(&placeholder, value);
        }
    }
    url
}

pub fn is_absolute_url(url: &str) -> bool {
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Resolve `href` against `base` the way a browser resolves a link:
/// absolute urls pass through, `/path` is origin-relative, anything else is
/// relative to the base's directory.
pub fn join_url(base: &str, href: &str) -> String {
    if is_absolute_url(href) {
        return href.to_string();
    }
    let scheme_end = base.find("://").map(|i| i + 3);
    let origin_end = scheme_end
        .and_then(|start| base[start..].find('/').map(|i| start + i))
        .unwrap_or(base.len());
    let origin = &base[..origin_end];

    if let Some(rest) = href.strip_prefix("//") {
        let scheme = scheme_end.map_or("http://", |end| &base[..end]);
        return format!("{scheme}{rest}");
    }
    if href.starts_with('/') {
        return format!("{origin}{href}");
    }

    let path = &base[origin_end..];
    let dir = match path.rfind('/') {
        Some(i) => &path[..=i],
        None => "/",
    };
    format!("{origin}{dir}{href}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_substitutes_params() {
        assert_eq!(build_url("/api/slides/:id", &[("id", "4")]), "/api/slides/4");
        assert_eq!(build_url(SLIDES_PATH, &[]), "/api/slides");
        assert_eq!(build_url("/api/slides", &[("id", "4")]), "/api/slides");
    }

    #[test]
    fn test_join_url() {
        let base = "http://localhost:5000";
        assert_eq!(join_url(base, "/slides/1.html"), "http://localhost:5000/slides/1.html");
        assert_eq!(join_url(base, "slides/1.html"), "http://localhost:5000/slides/1.html");
        assert_eq!(
            join_url("http://host/deck/intro.html", "next.html"),
            "http://host/deck/next.html"
        );
        assert_eq!(
            join_url("http://host/deck/intro.html", "/root.html"),
            "http://host/root.html"
        );
        assert_eq!(
            join_url("https://host/a", "//cdn.example.com/x.html"),
            "https://cdn.example.com/x.html"
        );
        assert_eq!(
            join_url(base, "https://example.com/page"),
            "https://example.com/page"
        );
    }

    #[test]
    fn test_http_source_urls() {
        let source = HttpSlideSource::new("http://localhost:5000/");
        assert_eq!(source.endpoint(), "http://localhost:5000");
        assert_eq!(source.list_url(), "http://localhost:5000/api/slides");
        assert_eq!(
            source.resolve("/slides/2.html"),
            Resource::Remote("http://localhost:5000/slides/2.html".to_string())
        );
    }

    #[test]
    fn test_demo_source() {
        let source = MemorySlideSource::demo();
        let slides = source.list_slides().unwrap();
        assert_eq!(slides.len(), 12);
        assert_eq!(slides[0], Slide::new(1, "Slide 1", "/slides/1.html", 1));
        assert_eq!(slides[11].url, "/slides/12.html");
        assert!(matches!(source.resolve("/slides/5.html"), Resource::Inline(html) if html.contains("Slide 5")));
    }

    #[test]
    fn test_memory_source_resolution() {
        let source = MemorySlideSource::new(vec![Slide::new(1, "a", "/a.html", 1)])
            .with_base("http://example.com");
        assert_eq!(
            source.resolve("/a.html"),
            Resource::Remote("http://example.com/a.html".to_string())
        );
        let source = MemorySlideSource::default().with_document("/a.html", "<p>hi</p>");
        assert_eq!(source.resolve("/a.html"), Resource::Inline("<p>hi</p>".to_string()));
        assert_eq!(source.resolve("b.html"), Resource::Local(PathBuf::from("b.html")));
    }

    #[test]
    fn test_memory_source_empty_is_ok() {
        let slides = MemorySlideSource::new(Vec::new()).list_slides().unwrap();
        assert!(slides.is_empty());
    }

    #[test]
    fn test_file_source_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slides.yaml");
        std::fs::write(
            &path,
            "- id: 1\n  title: Intro\n  url: intro.html\n  order: 1\n\
             - id: 2\n  title: Outro\n  url: https://example.com/outro.html\n  order: 2\n",
        )
        .unwrap();

        let source = FileSlideSource::new(&path);
        let slides = source.list_slides().unwrap();
        assert_eq!(slides.len(), 2);
        assert_eq!(slides[1].title, "Outro");
        assert_eq!(
            source.resolve(&slides[0].url),
            Resource::Local(dir.path().join("intro.html"))
        );
        assert_eq!(
            source.resolve(&slides[1].url),
            Resource::Remote("https://example.com/outro.html".to_string())
        );
    }

    #[test]
    fn test_file_source_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slides.json");
        std::fs::write(&path, r#"[{"id":1,"title":"A","url":"/1.html","order":1}]"#).unwrap();
        let slides = FileSlideSource::new(&path).list_slides().unwrap();
        assert_eq!(slides, vec![Slide::new(1, "A", "/1.html", 1)]);
    }

    #[test]
    fn test_file_source_errors() {
        let dir = tempfile::tempdir().unwrap();

        let missing = FileSlideSource::new(dir.path().join("nope.yaml"));
        assert!(matches!(missing.list_slides(), Err(SourceError::Io { .. })));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{not json").unwrap();
        assert!(matches!(
            FileSlideSource::new(&bad).list_slides(),
            Err(SourceError::Malformed(_))
        ));

        let unsorted = dir.path().join("unsorted.json");
        std::fs::write(
            &unsorted,
            r#"[{"id":1,"title":"A","url":"a","order":5},{"id":2,"title":"B","url":"b","order":1}]"#,
        )
        .unwrap();
        assert!(matches!(
            FileSlideSource::new(&unsorted).list_slides(),
            Err(SourceError::Unsorted { .. })
        ));
    }
}
