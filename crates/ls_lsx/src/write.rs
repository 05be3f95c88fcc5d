//! Types for writing LSX documents
//!

use std::io::Write;

use bon::Builder;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use tracing::instrument;

use ls_resource::{AttributeValue, NodeId, Resource, TranslatedFSString};

use crate::error::{Error, Result};
use crate::types::LsxVersion;

/// Marker recorded on the version element of written documents.
pub const SERIALIZER: &str = concat!("ls_lsx/", env!("CARGO_PKG_VERSION"));

/// Options for how the LSX document should be written
#[derive(Debug, Clone, Copy, Builder)]
pub struct LsxWriterOptions {
    /// Dialect to emit; v3 writes numeric attribute type ids, v4 names
    #[builder(default)]
    pub version: LsxVersion,

    /// Indent the output with tabs
    #[builder(default)]
    pub pretty: bool,
}

/// LSX document generator
///
/// ```
/// # fn doit() -> ls_lsx::error::Result<()>
/// # {
/// use ls_lsx::{LsxVersion, LsxWriter, LsxWriterOptions};
/// use ls_resource::{Node, Resource};
///
/// let mut resource = Resource::new();
/// resource.metadata.major_version = 4;
/// resource.add_region("Config", Node::new("Config"));
///
/// let mut writer = LsxWriter::new(
///     Vec::new(),
///     LsxWriterOptions::builder().version(LsxVersion::V4).build(),
/// );
/// writer.write(&resource)?;
///
/// let xml = String::from_utf8(writer.into_inner()).unwrap();
/// assert!(xml.contains(r#"<region id="Config">"#));
///
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
pub struct LsxWriter<W: Write> {
    writer: Writer<W>,
    version: LsxVersion,
}

impl<W: Write> LsxWriter<W> {
    /// Create a writer over `inner`.
    pub fn new(inner: W, options: LsxWriterOptions) -> LsxWriter<W> {
        let writer = if options.pretty {
            Writer::new_with_indent(inner, b'\t', 1)
        } else {
            Writer::new(inner)
        };

        LsxWriter {
            writer,
            version: options.version,
        }
    }

    /// Consume the writer and return the underlying sink.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    /// Write `resource` as a complete LSX document.
    ///
    /// The creation timestamp is not part of the text format and is dropped.
    #[instrument(skip_all, err)]
    pub fn write(&mut self, resource: &Resource) -> Result<()> {
        let metadata = &resource.metadata;
        if metadata.major_version >= 4 && self.version < LsxVersion::V4 {
            return Err(Error::IncompatibleDowngrade {
                major: metadata.major_version,
            });
        }

        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        self.writer
            .write_event(Event::Start(BytesStart::new("save")))?;

        let mut version = BytesStart::new("version");
        version.push_attribute(("major", metadata.major_version.to_string().as_str()));
        version.push_attribute(("minor", metadata.minor_version.to_string().as_str()));
        version.push_attribute(("revision", metadata.revision.to_string().as_str()));
        version.push_attribute(("build", metadata.build_number.to_string().as_str()));
        version.push_attribute(("serializer", SERIALIZER));
        self.writer.write_event(Event::Empty(version))?;

        for region in resource.regions.values() {
            let mut start = BytesStart::new("region");
            start.push_attribute(("id", region.name.as_str()));
            self.writer.write_event(Event::Start(start))?;
            self.write_node(resource, region.root)?;
            self.writer.write_event(Event::End(BytesEnd::new("region")))?;
        }

        self.writer.write_event(Event::End(BytesEnd::new("save")))?;
        Ok(())
    }

    /// Write the subtree rooted at `id` as a document fragment.
    pub fn write_node(&mut self, resource: &Resource, id: NodeId) -> Result<()> {
        let node = resource.node(id);
        let mut start = BytesStart::new("node");
        start.push_attribute(("id", node.name.as_str()));

        if node.attributes.is_empty() && node.child_count() == 0 {
            self.writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        self.writer.write_event(Event::Start(start))?;

        for (name, value) in &node.attributes {
            self.write_attribute(name, value)?;
        }

        if node.child_count() > 0 {
            self.writer
                .write_event(Event::Start(BytesStart::new("children")))?;
            for group in node.children().values() {
                for &child in group {
                    self.write_node(resource, child)?;
                }
            }
            self.writer
                .write_event(Event::End(BytesEnd::new("children")))?;
        }

        self.writer.write_event(Event::End(BytesEnd::new("node")))?;
        Ok(())
    }

    fn write_attribute(&mut self, name: &str, value: &AttributeValue) -> Result<()> {
        let mut start = BytesStart::new("attribute");
        start.push_attribute(("id", name));
        match self.version {
            LsxVersion::V4 => start.push_attribute(("type", value.ty().name())),
            LsxVersion::V3 => {
                start.push_attribute(("type", value.ty().id().to_string().as_str()))
            }
        }

        match value {
            AttributeValue::TranslatedString(ts) => {
                start.push_attribute(("handle", ts.handle.as_str()));
                match &ts.value {
                    Some(text) => start.push_attribute(("value", text.as_str())),
                    None => start.push_attribute((
                        "version",
                        ts.version.unwrap_or_default().to_string().as_str(),
                    )),
                }
                self.writer.write_event(Event::Empty(start))?;
            }
            AttributeValue::TranslatedFSString(fs) => {
                start.push_attribute(("value", fs.value.as_str()));
                self.write_fs_string(start, "attribute", fs)?;
            }
            other => {
                // 0x1F shows up in game data and breaks XML; strip it.
                start.push_attribute(("value", other.to_string().replace('\u{1f}', "").as_str()));
                self.writer.write_event(Event::Empty(start))?;
            }
        }

        Ok(())
    }

    fn write_fs_string(
        &mut self,
        mut start: BytesStart<'static>,
        name: &'static str,
        fs: &TranslatedFSString,
    ) -> Result<()> {
        start.push_attribute(("handle", fs.handle.as_str()));
        start.push_attribute(("arguments", fs.arguments.len().to_string().as_str()));

        if fs.arguments.is_empty() {
            self.writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        self.writer.write_event(Event::Start(start))?;
        self.writer
            .write_event(Event::Start(BytesStart::new("arguments")))?;

        for argument in &fs.arguments {
            let mut arg = BytesStart::new("argument");
            arg.push_attribute(("key", argument.key.as_str()));
            arg.push_attribute(("value", argument.value.as_str()));
            self.writer.write_event(Event::Start(arg))?;

            let mut string = BytesStart::new("string");
            string.push_attribute(("value", argument.string.value.as_str()));
            self.write_fs_string(string, "string", &argument.string)?;

            self.writer
                .write_event(Event::End(BytesEnd::new("argument")))?;
        }

        self.writer
            .write_event(Event::End(BytesEnd::new("arguments")))?;
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }
}
