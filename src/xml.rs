//! XML input.
//!
//! Documents are mapped onto a tree the way classic property trees do it:
//!
//! ```text
//! <server name="web">              server
//!   <port>8080</port>                <xmlattr>
//!   <!-- primary -->                   name = "web"
//! </server>                          port = 8080
//!                                    <xmlcomment> = " primary "
//! ```
//!
//! - the document element becomes a child of the root
//! - attributes are collected under an `<xmlattr>` child
//! - text and CDATA are concatenated into the element's datum, or kept as
//!   separate `<xmltext>` children with [`XmlFlags::NO_CONCAT_TEXT`]
//! - comments become `<xmlcomment>` children unless [`XmlFlags::NO_COMMENTS`]
//! - whitespace-only text is dropped
//!
//! Every datum is typed with the crate-wide scalar rules as soon as it is
//! complete, so conversion errors carry the line of the attribute, text or
//! closing tag that produced them.

use crate::variant::Translator;
use crate::{Error, Result, StringTranslator, Variant, VariantTree, XmlFlags};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

pub const ATTRIBUTES_KEY: &str = "<xmlattr>";
pub const COMMENT_KEY: &str = "<xmlcomment>";
pub const TEXT_KEY: &str = "<xmltext>";

/// Parses an XML document into a typed tree.
pub(crate) fn parse(text: &str, file: &str, flags: XmlFlags) -> Result<VariantTree> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text_start = false;
    reader.config_mut().trim_text_end = false;

    let mut builder = Builder {
        file,
        flags,
        root: VariantTree::new(),
        open: Vec::new(),
    };
    let line_at = |pos: u64| line_of(text, pos);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let element = element_node(&e, file, line_at(reader.buffer_position()))?;
                builder.open.push(element);
            }
            Ok(Event::Empty(e)) => {
                let (name, node) = element_node(&e, file, line_at(reader.buffer_position()))?;
                builder.top().push_back(name, node);
            }
            Ok(Event::End(_)) => {
                if let Some((name, mut node)) = builder.open.pop() {
                    type_data(&mut node, file, line_at(reader.buffer_position()))?;
                    builder.top().push_back(name, node);
                }
            }
            Ok(Event::Text(e)) => {
                let line = line_at(reader.buffer_position());
                let content = e.unescape().map_err(|err| Error::parse(file, line, err))?;
                builder.add_text(&content, line)?;
            }
            Ok(Event::CData(e)) => {
                let line = line_at(reader.buffer_position());
                builder.add_text(&String::from_utf8_lossy(&e.into_inner()), line)?;
            }
            Ok(Event::Comment(e)) => {
                let line = line_at(reader.buffer_position());
                builder.add_comment(&String::from_utf8_lossy(&e.into_inner()), line)?;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                return Err(Error::parse(file, line_at(reader.error_position()), err));
            }
        }
    }

    if let Some((name, _)) = builder.open.last() {
        return Err(Error::parse(
            file,
            line_at(reader.buffer_position()),
            format!("unexpected end of file: missing closing tag </{}>", name),
        ));
    }

    let mut root = builder.root;
    type_data(&mut root, file, line_at(reader.buffer_position()))?;
    Ok(root)
}

fn line_of(text: &str, pos: u64) -> usize {
    let end = usize::try_from(pos).map_or(text.len(), |pos| pos.min(text.len()));
    1 + text.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count()
}

fn element_node(e: &BytesStart<'_>, file: &str, line: usize) -> Result<(String, VariantTree)> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut node = VariantTree::new();
    let mut attributes = VariantTree::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| Error::parse(file, line, err))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| Error::parse(file, line, err))?;
        attributes.add(key, typed(&value, file, line)?);
    }
    if !attributes.is_empty() {
        node.push_back(ATTRIBUTES_KEY, attributes);
    }
    Ok((name, node))
}

fn typed(text: &str, file: &str, line: usize) -> Result<Variant> {
    StringTranslator.get_value(text).map_err(|e| e.at(file, line))
}

/// Types the text concatenated into a node once no more text can follow.
fn type_data(node: &mut VariantTree, file: &str, line: usize) -> Result<()> {
    if let Variant::String(text) = node.data() {
        let data = typed(text, file, line)?;
        node.set_data(data);
    }
    Ok(())
}

struct Builder<'s> {
    file: &'s str,
    flags: XmlFlags,
    root: VariantTree,
    open: Vec<(String, VariantTree)>,
}

impl Builder<'_> {
    fn top(&mut self) -> &mut VariantTree {
        match self.open.last_mut() {
            Some((_, node)) => node,
            None => &mut self.root,
        }
    }

    fn normalize(&self, text: &str) -> String {
        if self.flags.contains(XmlFlags::TRIM_WHITESPACE) {
            text.split_whitespace().collect::<Vec<_>>().join(" ")
        } else {
            text.to_string()
        }
    }

    fn add_text(&mut self, text: &str, line: usize) -> Result<()> {
        if text.trim().is_empty() {
            return Ok(());
        }
        let text = self.normalize(text);
        if self.flags.contains(XmlFlags::NO_CONCAT_TEXT) {
            let data = typed(&text, self.file, line)?;
            self.top().add(TEXT_KEY, data);
            return Ok(());
        }
        match self.top().data_mut() {
            Variant::String(data) => data.push_str(&text),
            data => *data = Variant::String(text),
        }
        Ok(())
    }

    fn add_comment(&mut self, text: &str, line: usize) -> Result<()> {
        if self.flags.contains(XmlFlags::NO_COMMENTS) {
            return Ok(());
        }
        let data = typed(&self.normalize(text), self.file, line)?;
        self.top().add(COMMENT_KEY, data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"<?xml version="1.0"?>
<config version="2">
  <!-- listeners -->
  <listen port="8080">web</listen>
  <ratio>0.5</ratio>
  <motd>  hello
     world  </motd>
  <script><![CDATA[a < b]]></script>
  <empty/>
</config>
"#;

    #[test]
    fn test_document_mapping() {
        let tree = parse(DOC, "app.xml", XmlFlags::empty()).unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.get::<i64>("config.<xmlattr>.version").unwrap(), 2);
        assert_eq!(tree.get_value("config.listen"), Some(&Variant::from("web")));
        assert_eq!(tree.get::<i64>("config.listen.<xmlattr>.port").unwrap(), 8080);
        assert_eq!(tree.get_value("config.ratio"), Some(&Variant::Float(0.5)));
        assert_eq!(tree.get::<String>("config.script").unwrap(), "a < b");
        assert_eq!(tree.get_value("config.empty"), Some(&Variant::Null));
        assert_eq!(
            tree.get::<String>("config.<xmlcomment>").unwrap(),
            " listeners "
        );
    }

    #[test]
    fn test_flags() {
        let flags = XmlFlags::NO_COMMENTS | XmlFlags::TRIM_WHITESPACE;
        let tree = parse(DOC, "app.xml", flags).unwrap();
        assert!(tree.get_child("config.<xmlcomment>").is_none());
        assert_eq!(tree.get::<String>("config.motd").unwrap(), "hello world");

        let tree = parse("<a>x<b/>y</a>", "", XmlFlags::NO_CONCAT_TEXT).unwrap();
        let a = tree.find("a").unwrap();
        let texts: Vec<_> = a.find_all(TEXT_KEY).map(|t| t.data().clone()).collect();
        assert_eq!(texts, vec![Variant::from("x"), Variant::from("y")]);
        assert!(a.data().is_null());
    }

    #[test]
    fn test_repeated_elements_keep_order() {
        let tree = parse("<r><x>1</x><x>2</x></r>", "", XmlFlags::empty()).unwrap();
        let xs: Vec<_> = tree
            .get_child("r")
            .unwrap()
            .find_all("x")
            .map(|t| t.data().clone())
            .collect();
        assert_eq!(xs, vec![Variant::Int(1), Variant::Int(2)]);
    }

    #[test]
    fn test_malformed_reports_line() {
        let err = parse("<a>\n<b>\n</c>\n</a>", "bad.xml", XmlFlags::empty()).unwrap_err();
        match err {
            Error::Parse { file, line, .. } => {
                assert_eq!(file, "bad.xml");
                assert_eq!(line, 3);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_unclosed_element() {
        assert!(parse("<a><b></b>", "", XmlFlags::empty()).is_err());
    }

    #[test]
    fn test_conversion_errors_carry_line() {
        let big = "99999999999999999999";
        let cases = [
            (format!("<r>\n<p v=\"{}\"/>\n</r>", big), XmlFlags::empty(), 2),
            (format!("<r>\n\n<p>{}</p>\n</r>", big), XmlFlags::empty(), 3),
            (format!("<r>\n<p>\n{}\n</p>\n</r>", big), XmlFlags::empty(), 4),
            (format!("<r>\n<p>{}</p>\n</r>", big), XmlFlags::NO_CONCAT_TEXT, 2),
        ];
        for (doc, flags, expected) in cases {
            match parse(&doc, "app.xml", flags).unwrap_err() {
                Error::Conversion { file, line, .. } => {
                    assert_eq!(file, "app.xml");
                    assert_eq!(line, expected, "document {:?}", doc);
                }
                other => panic!("unexpected error: {:?}", other),
            }
        }
    }
}
