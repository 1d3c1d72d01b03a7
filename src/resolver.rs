use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Component, Path, PathBuf};

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;

/// Failure while extracting the dependencies of a single file.
///
/// Any of these aborts the whole traversal; there is no per-file recovery.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("markup error in {} at byte {position}: {source}", path.display())]
    Markup {
        path: PathBuf,
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    #[error("malformed href \"{href}\" in {}: {reason}", path.display())]
    MalformedHref {
        path: PathBuf,
        href: String,
        reason: &'static str,
    },
}

/// How a single href value is treated.
#[derive(Debug, PartialEq, Eq)]
enum HrefKind {
    /// Relative reference into the same tree; resolves to a local file.
    Relative,
    /// Absolute URL or root-relative path; not resolvable to a local file.
    NonLocal,
}

/// Extract the direct dependencies of `path`, in document order.
///
/// Scans the file's markup for `<link rel="import" href="...">` tags
/// (self-closing included) and resolves each relative href against the
/// directory containing `path`. Absolute and root-relative hrefs are skipped:
/// only same-tree imports are tracked. Tokenization runs until end-of-input;
/// any reader error before that propagates.
pub fn dependencies(path: &Path) -> Result<Vec<PathBuf>, ResolveError> {
    let file = File::open(path).map_err(|source| ResolveError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = Reader::from_reader(BufReader::new(file));
    // Component HTML leaves void elements like <link> unclosed; without this
    // the reader rejects the enclosing end tags.
    reader.config_mut().check_end_names = false;

    let mut deps = Vec::new();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                if e.name().as_ref().eq_ignore_ascii_case(b"link") {
                    let href = import_href(e).map_err(|source| ResolveError::Markup {
                        path: path.to_path_buf(),
                        position: reader.buffer_position(),
                        source,
                    })?;
                    if let Some(href) = href {
                        match classify_href(&href) {
                            Ok(HrefKind::Relative) => deps.push(join_relative(path, &href)),
                            Ok(HrefKind::NonLocal) => {}
                            Err(reason) => {
                                return Err(ResolveError::MalformedHref {
                                    path: path.to_path_buf(),
                                    href,
                                    reason,
                                });
                            }
                        }
                    }
                }
            }
            Ok(Event::Eof) => return Ok(deps),
            Ok(_) => {}
            Err(source) => {
                return Err(ResolveError::Markup {
                    path: path.to_path_buf(),
                    position: reader.error_position(),
                    source,
                });
            }
        }
        buf.clear();
    }
}

/// Scan a `link` tag's attributes for the `rel="import"` marker and the href
/// value. Returns the href only when the tag is an import declaration with a
/// non-empty href.
///
/// Attribute keys match ASCII case-insensitively (what a lowercasing HTML
/// tokenizer would report); the `rel` value must equal `import` exactly.
fn import_href(tag: &BytesStart) -> Result<Option<String>, quick_xml::Error> {
    let mut is_import = false;
    let mut href: Option<String> = None;

    for attr in tag.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = attr.key.as_ref();
        if key.eq_ignore_ascii_case(b"rel") {
            if attr.unescape_value().map_err(quick_xml::Error::from)? == "import" {
                is_import = true;
            }
        } else if key.eq_ignore_ascii_case(b"href") {
            let value = attr.unescape_value().map_err(quick_xml::Error::from)?;
            if !value.is_empty() {
                href = Some(value.into_owned());
            }
        }
    }

    Ok(if is_import { href } else { None })
}

/// Classify an href as local-relative or non-local, or reject it as malformed.
fn classify_href(href: &str) -> Result<HrefKind, &'static str> {
    if href.chars().any(|c| c.is_ascii_control()) {
        return Err("control character in reference");
    }
    if href.starts_with('/') {
        return Ok(HrefKind::NonLocal);
    }
    // A colon in the first path segment either opens a URL scheme (absolute,
    // skipped) or makes the reference unparseable as a relative path.
    if let Some(colon) = href.find(':')
        && !href[..colon].contains('/')
    {
        return if is_scheme(&href[..colon]) {
            Ok(HrefKind::NonLocal)
        } else {
            Err("colon in first path segment")
        };
    }
    Ok(HrefKind::Relative)
}

/// True when `head` is a valid URL scheme: `[a-zA-Z][a-zA-Z0-9+.-]*`.
fn is_scheme(head: &str) -> bool {
    let mut chars = head.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Join `href` onto the directory containing `importer` and clean the result
/// lexically: `.` segments drop, `..` folds against the segment before it.
fn join_relative(importer: &Path, href: &str) -> PathBuf {
    let dir = importer.parent().unwrap_or_else(|| Path::new(""));
    let mut out = PathBuf::new();
    for comp in dir.join(href).components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) => {}
                _ => out.push(".."),
            },
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("tempdir")
    }

    fn write(dir: &TempDir, name: &str, body: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_imports_in_document_order() {
        let dir = tmp();
        let page = write(
            &dir,
            "page.html",
            b"<!DOCTYPE html>\n\
              <html>\n\
              <head>\n\
              <link rel=\"stylesheet\" href=\"style.css\">\n\
              <link rel=\"import\" href=\"b.html\">\n\
              <link rel=\"import\" href=\"a.html\">\n\
              </head>\n\
              <body><p>demo</p></body>\n\
              </html>\n",
        );

        let deps = dependencies(&page).unwrap();
        assert_eq!(
            deps,
            vec![dir.path().join("b.html"), dir.path().join("a.html")],
            "imports should come back in the order the tags appear"
        );
    }

    #[test]
    fn test_self_closing_and_attribute_order() {
        let dir = tmp();
        let page = write(
            &dir,
            "page.html",
            b"<link rel=\"import\" href=\"closed.html\"/>\n\
              <link href=\"reversed.html\" rel=\"import\">\n",
        );

        let deps = dependencies(&page).unwrap();
        assert_eq!(
            deps,
            vec![dir.path().join("closed.html"), dir.path().join("reversed.html")]
        );
    }

    #[test]
    fn test_tag_and_key_case_insensitive_value_exact() {
        let dir = tmp();
        let page = write(
            &dir,
            "page.html",
            b"<LINK REL=\"import\" HREF=\"upper.html\">\n\
              <link rel=\"IMPORT\" href=\"shouty.html\">\n",
        );

        let deps = dependencies(&page).unwrap();
        assert_eq!(
            deps,
            vec![dir.path().join("upper.html")],
            "tag/attribute names fold case, the rel value does not"
        );
    }

    #[test]
    fn test_link_without_marker_or_href_contributes_nothing() {
        let dir = tmp();
        let page = write(
            &dir,
            "page.html",
            b"<link rel=\"import\">\n\
              <link rel=\"import\" href=\"\">\n\
              <link href=\"plain.html\">\n\
              <a href=\"elsewhere.html\">x</a>\n",
        );

        let deps = dependencies(&page).unwrap();
        assert!(deps.is_empty(), "got {:?}", deps);
    }

    #[test]
    fn test_absolute_and_rooted_hrefs_skipped() {
        let dir = tmp();
        let page = write(
            &dir,
            "page.html",
            b"<link rel=\"import\" href=\"http://example.com/remote.html\">\n\
              <link rel=\"import\" href=\"/rooted.html\">\n\
              <link rel=\"import\" href=\"local.html\">\n",
        );

        let deps = dependencies(&page).unwrap();
        assert_eq!(deps, vec![dir.path().join("local.html")]);
    }

    #[test]
    fn test_malformed_href_aborts() {
        let dir = tmp();
        let page = write(
            &dir,
            "page.html",
            b"<link rel=\"import\" href=\"good.html\">\n\
              <link rel=\"import\" href=\":nope\">\n",
        );

        let err = dependencies(&page).unwrap_err();
        match err {
            ResolveError::MalformedHref { href, .. } => assert_eq!(href, ":nope"),
            other => panic!("expected MalformedHref, got {:?}", other),
        }
    }

    #[test]
    fn test_control_character_href_aborts() {
        let dir = tmp();
        let page = write(&dir, "page.html", b"<link rel=\"import\" href=\"bad\x01.html\">\n");

        let err = dependencies(&page).unwrap_err();
        assert!(
            matches!(err, ResolveError::MalformedHref { .. }),
            "expected MalformedHref, got {:?}",
            err
        );
    }

    #[test]
    fn test_missing_file_is_open_error() {
        let dir = tmp();
        let err = dependencies(&dir.path().join("ghost.html")).unwrap_err();
        assert!(
            matches!(err, ResolveError::Open { .. }),
            "expected Open, got {:?}",
            err
        );
    }

    #[test]
    fn test_truncated_tag_is_markup_error() {
        let dir = tmp();
        let page = write(&dir, "page.html", b"<link rel=\"import\" href=\"x.html\"");

        let err = dependencies(&page).unwrap_err();
        assert!(
            matches!(err, ResolveError::Markup { .. }),
            "expected Markup, got {:?}",
            err
        );
    }

    #[test]
    fn test_classify_href() {
        assert_eq!(classify_href("a.html"), Ok(HrefKind::Relative));
        assert_eq!(classify_href("./a.html"), Ok(HrefKind::Relative));
        assert_eq!(classify_href("dir/a:b.html"), Ok(HrefKind::Relative));
        assert_eq!(classify_href("/a.html"), Ok(HrefKind::NonLocal));
        assert_eq!(classify_href("//cdn.example.com/a.html"), Ok(HrefKind::NonLocal));
        assert_eq!(classify_href("https://example.com/a.html"), Ok(HrefKind::NonLocal));
        assert_eq!(classify_href("mailto:someone@example.com"), Ok(HrefKind::NonLocal));
        assert!(classify_href(":nope").is_err());
        assert!(classify_href("1st:thing").is_err());
        assert!(classify_href("bad\x07.html").is_err());
    }

    #[test]
    fn test_join_relative_cleans_lexically() {
        let join = |importer: &str, href: &str| join_relative(Path::new(importer), href);
        assert_eq!(join("testdata/index.html", "hello.html"), Path::new("testdata/hello.html"));
        assert_eq!(join("index.html", "hello.html"), Path::new("hello.html"));
        assert_eq!(join("index.html", "./hello.html"), Path::new("hello.html"));
        assert_eq!(join("components/button.html", "../shared.html"), Path::new("shared.html"));
        assert_eq!(join("a/b/c.html", "../../up.html"), Path::new("up.html"));
        assert_eq!(join("index.html", "../up.html"), Path::new("../up.html"));
        assert_eq!(join("index.html", "../../up.html"), Path::new("../../up.html"));
    }
}
