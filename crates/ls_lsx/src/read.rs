//! Types for reading LSX documents
//!

use std::io::BufRead;
use std::mem;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::instrument;

use ls_resource::{
    AttributeType, AttributeValue, Node, NodeId, Resource, TranslatedFSString,
    TranslatedFSStringArgument, TranslatedString,
};

use crate::error::{Error, Result};
use crate::types::LsxVersion;

/// Maximum nesting depth accepted for localized string arguments.
const MAX_ARGUMENT_DEPTH: usize = 32;

/// LSX document reader
///
/// ```
/// # fn doit() -> ls_lsx::error::Result<()>
/// # {
/// use ls_lsx::LsxReader;
///
/// let xml = r#"<?xml version="1.0" encoding="utf-8"?>
/// <save>
///     <version major="4" minor="0" revision="9" build="331"/>
///     <region id="Config">
///         <node id="Config">
///             <attribute id="Slot" type="uint8" value="2"/>
///         </node>
///     </region>
/// </save>"#;
///
/// let resource = LsxReader::new(xml.as_bytes()).read()?;
/// assert_eq!(resource.metadata.major_version, 4);
/// assert!(resource.regions.contains_key("Config"));
///
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
pub struct LsxReader<R: BufRead> {
    reader: Reader<R>,
    resource: Resource,
    current_region: Option<NodeId>,
    stack: Vec<NodeId>,
    version: LsxVersion,
}

impl<R: BufRead> LsxReader<R> {
    /// Create a reader over an LSX document.
    pub fn new(reader: R) -> LsxReader<R> {
        let mut reader = Reader::from_reader(reader);
        let config = reader.config_mut();
        config.trim_text(true);
        // End tags are balanced by the region/node stack below, which
        // produces format-level errors instead of generic XML ones.
        config.check_end_names = false;

        LsxReader {
            reader,
            resource: Resource::new(),
            current_region: None,
            stack: Vec::new(),
            version: LsxVersion::default(),
        }
    }

    /// Read the whole document into a [`Resource`].
    #[instrument(skip_all, err)]
    pub fn read(mut self) -> Result<Resource> {
        match self.read_document() {
            Ok(()) => Ok(mem::take(&mut self.resource)),
            Err(source) => Err(Error::Parse {
                position: self.reader.buffer_position(),
                source: Box::new(source),
            }),
        }
    }

    fn read_document(&mut self) -> Result<()> {
        let mut buf = Vec::new();
        loop {
            match self.reader.read_event_into(&mut buf)? {
                Event::Start(e) => self.read_element(&e, false)?,
                Event::Empty(e) => self.read_element(&e, true)?,
                Event::End(e) => self.read_end_element(e.name().as_ref())?,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if self.current_region.is_some() || !self.stack.is_empty() {
            return Err(Error::UnexpectedEof);
        }

        Ok(())
    }

    fn read_element(&mut self, e: &BytesStart<'_>, empty: bool) -> Result<()> {
        match e.name().as_ref() {
            b"save" => {
                if self.current_region.is_some() || !self.resource.regions.is_empty() {
                    return Err(Error::UnexpectedRoot);
                }
            }
            b"header" => {
                if let Some(time) = attr(e, "time")? {
                    self.resource.metadata.timestamp = time.parse()?;
                }
            }
            b"version" => self.read_version(e)?,
            b"region" => {
                if self.current_region.is_some() {
                    return Err(Error::NestedRegion);
                }
                let id = required_attr(e, "id")?;
                // The first node element inside the region becomes the root;
                // until then the root carries the region's name.
                let root = self.resource.add_region(id.clone(), Node::new(id));
                if !empty {
                    self.current_region = Some(root);
                }
            }
            b"node" => self.read_node(e, empty)?,
            b"attribute" => self.read_attribute(e, empty)?,
            // Grouping wrapper around a node's child nodes
            b"children" => {}
            other => {
                return Err(Error::UnknownElement(
                    String::from_utf8_lossy(other).into_owned(),
                ))
            }
        }

        Ok(())
    }

    fn read_end_element(&mut self, name: &[u8]) -> Result<()> {
        match name {
            b"region" => {
                if !self.stack.is_empty() {
                    return Err(Error::UnbalancedRegion(self.stack.len()));
                }
                self.current_region = None;
            }
            b"node" => {
                self.stack.pop();
            }
            b"save" | b"header" | b"version" | b"attribute" | b"children" => {}
            other => {
                return Err(Error::UnknownElement(
                    String::from_utf8_lossy(other).into_owned(),
                ))
            }
        }

        Ok(())
    }

    fn read_version(&mut self, e: &BytesStart<'_>) -> Result<()> {
        let metadata = &mut self.resource.metadata;
        if let Some(major) = attr(e, "major")? {
            metadata.major_version = major.parse()?;
        }
        if let Some(minor) = attr(e, "minor")? {
            metadata.minor_version = minor.parse()?;
        }
        if let Some(revision) = attr(e, "revision")? {
            metadata.revision = revision.parse()?;
        }
        if let Some(build) = attr(e, "build")? {
            metadata.build_number = build.parse()?;
        }

        self.version = LsxVersion::from_major_version(metadata.major_version);
        Ok(())
    }

    fn read_node(&mut self, e: &BytesStart<'_>, empty: bool) -> Result<()> {
        let Some(region_root) = self.current_region else {
            return Err(Error::NodeOutsideRegion);
        };
        let id = required_attr(e, "id")?;

        let node = match self.stack.last() {
            // The region element and its root node are one object; the first
            // node element names the placeholder created by the region.
            None => {
                self.resource.node_mut(region_root).name = id;
                region_root
            }
            Some(&parent) => self.resource.append_child(parent, Node::new(id)),
        };

        if !empty {
            self.stack.push(node);
        }

        Ok(())
    }

    fn read_attribute(&mut self, e: &BytesStart<'_>, empty: bool) -> Result<()> {
        let Some(&node) = self.stack.last() else {
            return Err(Error::AttributeOutsideNode);
        };

        let id = required_attr(e, "id")?;
        let ty = self.resolve_type(e)?;

        let value = match ty {
            AttributeType::None => AttributeValue::None,
            AttributeType::TranslatedString => {
                let handle = required_attr(e, "handle")?;
                let value = attr(e, "value")?;
                let version = match attr(e, "version")? {
                    Some(version) => Some(version.parse()?),
                    None => None,
                };
                if value.is_none() && version.is_none() {
                    return Err(Error::MissingRequiredField("version"));
                }
                AttributeValue::TranslatedString(TranslatedString {
                    handle,
                    value,
                    version,
                })
            }
            AttributeType::TranslatedFSString => {
                AttributeValue::TranslatedFSString(self.read_fs_string(e, empty, 0)?)
            }
            _ => {
                let text = attr(e, "value")?.ok_or(Error::MissingRequiredField("value"))?;
                AttributeValue::from_text(ty, &text)?
            }
        };

        self.resource.node_mut(node).attributes.insert(id, value);
        Ok(())
    }

    fn resolve_type(&self, e: &BytesStart<'_>) -> Result<AttributeType> {
        let text = required_attr(e, "type")?;
        let ty = match self.version {
            LsxVersion::V4 => text.parse()?,
            // v3 documents carry numeric ids, but symbolic names show up in
            // hand-edited files and are accepted as a fallback.
            LsxVersion::V3 => match text.parse::<u32>() {
                Ok(id) => AttributeType::try_from(id)?,
                Err(_) => text.parse()?,
            },
        };

        Ok(ty)
    }

    /// Read one localized template string, consuming its argument elements
    /// when the element has a body.
    fn read_fs_string(
        &mut self,
        e: &BytesStart<'_>,
        empty: bool,
        depth: usize,
    ) -> Result<TranslatedFSString> {
        if depth >= MAX_ARGUMENT_DEPTH {
            return Err(Error::RecursionLimit(MAX_ARGUMENT_DEPTH));
        }

        let end_name = e.name().as_ref().to_vec();
        let value = attr(e, "value")?.unwrap_or_default();
        let handle = required_attr(e, "handle")?;
        let declared = match attr(e, "arguments")? {
            Some(count) => count.parse()?,
            None => 0,
        };

        let mut arguments = Vec::new();
        if !empty {
            let mut buf = Vec::new();
            loop {
                match self.reader.read_event_into(&mut buf)? {
                    Event::Start(el) | Event::Empty(el)
                        if el.name().as_ref() == b"arguments" => {}
                    Event::Start(el) if el.name().as_ref() == b"argument" => {
                        let argument = self.read_argument(&el, depth)?;
                        arguments.push(argument);
                    }
                    Event::Empty(el) if el.name().as_ref() == b"argument" => {
                        return Err(Error::MissingRequiredField("string"))
                    }
                    Event::Start(el) | Event::Empty(el) => {
                        return Err(Error::UnknownElement(
                            String::from_utf8_lossy(el.name().as_ref()).into_owned(),
                        ))
                    }
                    Event::End(el) if el.name().as_ref() == end_name => break,
                    Event::End(_) => {}
                    Event::Eof => return Err(Error::UnexpectedEof),
                    _ => {}
                }
                buf.clear();
            }
        }

        if arguments.len() != declared {
            return Err(Error::ArgumentCountMismatch {
                declared,
                found: arguments.len(),
            });
        }

        Ok(TranslatedFSString {
            handle,
            value,
            arguments,
        })
    }

    fn read_argument(
        &mut self,
        e: &BytesStart<'_>,
        depth: usize,
    ) -> Result<TranslatedFSStringArgument> {
        let key = attr(e, "key")?.unwrap_or_default();
        let value = attr(e, "value")?.unwrap_or_default();

        let mut string = None;
        let mut buf = Vec::new();
        loop {
            match self.reader.read_event_into(&mut buf)? {
                Event::Start(el) if el.name().as_ref() == b"string" => {
                    string = Some(self.read_fs_string(&el, false, depth + 1)?);
                }
                Event::Empty(el) if el.name().as_ref() == b"string" => {
                    string = Some(self.read_fs_string(&el, true, depth + 1)?);
                }
                Event::End(el) if el.name().as_ref() == b"argument" => break,
                Event::Eof => return Err(Error::UnexpectedEof),
                _ => {}
            }
            buf.clear();
        }

        let string = string.ok_or(Error::MissingRequiredField("string"))?;
        Ok(TranslatedFSStringArgument {
            key,
            value,
            string,
        })
    }
}

fn attr(e: &BytesStart<'_>, name: &str) -> Result<Option<String>> {
    for attr in e.attributes().with_checks(false) {
        let attr = attr?;
        if attr.key.as_ref() == name.as_bytes() {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }

    Ok(None)
}

fn required_attr(e: &BytesStart<'_>, name: &'static str) -> Result<String> {
    attr(e, name)?.ok_or(Error::MissingRequiredField(name))
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    use ls_resource::{AttributeValue, Resource};

    use crate::error::{Error, Result};
    use crate::read::LsxReader;

    fn read(xml: &str) -> Result<Resource> {
        LsxReader::new(xml.as_bytes()).read()
    }

    fn read_err(xml: &str) -> Error {
        match read(xml).unwrap_err() {
            Error::Parse { source, .. } => *source,
            other => other,
        }
    }

    #[test]
    #[traced_test]
    fn reads_metadata_and_regions() -> Result<()> {
        let resource = read(
            r#"<save>
                <header time="1705432217"/>
                <version major="4" minor="0" revision="9" build="331" lslib_meta="v1,bswap_guids"/>
                <region id="Config">
                    <node id="root"/>
                </region>
                <region id="Templates">
                    <node id="Templates"/>
                </region>
            </save>"#,
        )?;

        assert_eq!(resource.metadata.timestamp, 1705432217);
        assert_eq!(resource.metadata.major_version, 4);
        assert_eq!(resource.metadata.revision, 9);
        assert_eq!(resource.metadata.build_number, 331);
        let names: Vec<&str> = resource.regions.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Config", "Templates"]);
        assert_eq!(resource.node(resource.regions["Config"].root).name, "root");

        Ok(())
    }

    #[test]
    fn missing_version_fields_default_to_zero() -> Result<()> {
        let resource = read(r#"<save><version major="4"/></save>"#)?;

        assert_eq!(resource.metadata.major_version, 4);
        assert_eq!(resource.metadata.minor_version, 0);
        assert_eq!(resource.metadata.revision, 0);
        assert_eq!(resource.metadata.build_number, 0);

        Ok(())
    }

    #[test]
    fn reads_nested_nodes_in_document_order() -> Result<()> {
        let resource = read(
            r#"<save>
                <version major="4"/>
                <region id="Templates">
                    <node id="Templates">
                        <children>
                            <node id="GameObjects">
                                <attribute id="Name" type="FixedString" value="Chest"/>
                            </node>
                            <node id="Extra"/>
                            <node id="GameObjects"/>
                        </children>
                    </node>
                </region>
            </save>"#,
        )?;

        let root = resource.regions["Templates"].root;
        let groups: Vec<(&str, usize)> = resource
            .node(root)
            .children()
            .iter()
            .map(|(name, group)| (name.as_str(), group.len()))
            .collect();
        assert_eq!(groups, vec![("GameObjects", 2), ("Extra", 1)]);

        let first = resource.node(root).children()["GameObjects"][0];
        assert_eq!(resource.node(first).parent(), Some(root));
        assert_eq!(
            resource.node(first).attributes["Name"],
            AttributeValue::FixedString("Chest".into())
        );

        Ok(())
    }

    #[test]
    fn v3_documents_use_numeric_type_ids() -> Result<()> {
        let resource = read(
            r#"<save>
                <version major="3"/>
                <region id="r">
                    <node id="n">
                        <attribute id="Level" type="4" value="12"/>
                        <attribute id="Named" type="bool" value="1"/>
                    </node>
                </region>
            </save>"#,
        )?;

        let root = resource.regions["r"].root;
        assert_eq!(resource.node(root).attributes["Level"], AttributeValue::Int(12));
        assert_eq!(resource.node(root).attributes["Named"], AttributeValue::Bool(true));

        Ok(())
    }

    #[test]
    fn v4_documents_reject_numeric_type_ids() {
        let err = read_err(
            r#"<save>
                <version major="4"/>
                <region id="r">
                    <node id="n">
                        <attribute id="Level" type="4" value="12"/>
                    </node>
                </region>
            </save>"#,
        );
        assert!(matches!(err, Error::ResourceError(_)));
    }

    #[test]
    fn translated_string_with_inline_value() -> Result<()> {
        let resource = read(
            r#"<save>
                <version major="4"/>
                <region id="r">
                    <node id="n">
                        <attribute id="DisplayName" type="TranslatedString" handle="h09d81abc" value="Chest"/>
                    </node>
                </region>
            </save>"#,
        )?;

        let root = resource.regions["r"].root;
        let AttributeValue::TranslatedString(ts) = &resource.node(root).attributes["DisplayName"]
        else {
            panic!("wrong variant");
        };
        assert_eq!(ts.handle, "h09d81abc");
        assert_eq!(ts.value.as_deref(), Some("Chest"));

        Ok(())
    }

    #[test]
    fn legacy_translated_string_uses_a_version_stamp() -> Result<()> {
        let resource = read(
            r#"<save>
                <version major="4"/>
                <region id="r">
                    <node id="n">
                        <attribute id="DisplayName" type="TranslatedString" handle="h09d81abc" version="7"/>
                    </node>
                </region>
            </save>"#,
        )?;

        let root = resource.regions["r"].root;
        let AttributeValue::TranslatedString(ts) = &resource.node(root).attributes["DisplayName"]
        else {
            panic!("wrong variant");
        };
        assert_eq!(ts.value, None);
        assert_eq!(ts.version, Some(7));

        Ok(())
    }

    #[test]
    fn translated_string_requires_a_value_or_version() {
        let err = read_err(
            r#"<save>
                <version major="4"/>
                <region id="r">
                    <node id="n">
                        <attribute id="DisplayName" type="TranslatedString" handle="h09d81abc"/>
                    </node>
                </region>
            </save>"#,
        );
        assert!(matches!(err, Error::MissingRequiredField("version")));
    }

    #[test]
    fn fs_string_arguments_nest() -> Result<()> {
        let resource = read(
            r#"<save>
                <version major="4"/>
                <region id="r">
                    <node id="n">
                        <attribute id="Text" type="TranslatedFSString" value="Greetings, [1]" handle="ha" arguments="1">
                            <arguments>
                                <argument key="[1]" value="traveller">
                                    <string value="traveller" handle="hb" arguments="0"/>
                                </argument>
                            </arguments>
                        </attribute>
                    </node>
                </region>
            </save>"#,
        )?;

        let root = resource.regions["r"].root;
        let AttributeValue::TranslatedFSString(fs) = &resource.node(root).attributes["Text"] else {
            panic!("wrong variant");
        };
        assert_eq!(fs.value, "Greetings, [1]");
        assert_eq!(fs.arguments.len(), 1);
        assert_eq!(fs.arguments[0].key, "[1]");
        assert_eq!(fs.arguments[0].string.handle, "hb");

        Ok(())
    }

    #[test]
    fn fs_string_argument_count_is_checked() {
        let err = read_err(
            r#"<save>
                <version major="4"/>
                <region id="r">
                    <node id="n">
                        <attribute id="Text" type="TranslatedFSString" value="v" handle="ha" arguments="2">
                            <arguments>
                                <argument key="k" value="v">
                                    <string value="v" handle="hb" arguments="0"/>
                                </argument>
                            </arguments>
                        </attribute>
                    </node>
                </region>
            </save>"#,
        );
        assert!(matches!(
            err,
            Error::ArgumentCountMismatch {
                declared: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn deeply_nested_fs_string_arguments_are_rejected() {
        let mut string = String::from(r#"<string value="v" handle="h" arguments="0"/>"#);
        for _ in 0..33 {
            string = format!(
                concat!(
                    r#"<string value="v" handle="h" arguments="1">"#,
                    r#"<arguments><argument key="k" value="v">{}</argument></arguments>"#,
                    r#"</string>"#,
                ),
                string
            );
        }
        let xml = format!(
            concat!(
                r#"<save><version major="4"/><region id="r"><node id="n">"#,
                r#"<attribute id="Text" type="TranslatedFSString" value="v" handle="h" arguments="1">"#,
                r#"<arguments><argument key="k" value="v">{}</argument></arguments>"#,
                r#"</attribute>"#,
                r#"</node></region></save>"#,
            ),
            string
        );

        assert!(matches!(read_err(&xml), Error::RecursionLimit(32)));
    }

    #[test]
    fn self_closing_region_keeps_the_region_name_as_its_root() -> Result<()> {
        let resource = read(r#"<save><version major="4"/><region id="Config"/></save>"#)?;

        assert_eq!(resource.node(resource.regions["Config"].root).name, "Config");

        Ok(())
    }

    #[test]
    fn missing_value_is_an_error() {
        let err = read_err(
            r#"<save>
                <version major="4"/>
                <region id="r">
                    <node id="n">
                        <attribute id="Level" type="int32"/>
                    </node>
                </region>
            </save>"#,
        );
        assert!(matches!(err, Error::MissingRequiredField("value")));
    }

    #[test]
    fn structural_errors_are_reported() {
        assert!(matches!(
            read_err(r#"<save><region id="r"><node id="n"/></region><save/></save>"#),
            Error::UnexpectedRoot
        ));
        assert!(matches!(
            read_err(r#"<save><region id="a"><region id="b"/></region></save>"#),
            Error::NestedRegion
        ));
        assert!(matches!(
            read_err(r#"<save><node id="n"/></save>"#),
            Error::NodeOutsideRegion
        ));
        assert!(matches!(
            read_err(r#"<save><region id="r"><attribute id="a" type="int32" value="1"/></region></save>"#),
            Error::AttributeOutsideNode
        ));
        assert!(matches!(
            read_err(r#"<save><region id="r"><node id="n"></region></save>"#),
            Error::UnbalancedRegion(1)
        ));
        assert!(matches!(
            read_err(r#"<save><blorb/></save>"#),
            Error::UnknownElement(_)
        ));
    }

    #[test]
    fn truncated_documents_are_an_error() {
        assert!(matches!(
            read_err(r#"<save><region id="r"><node id="n">"#),
            Error::UnexpectedEof
        ));
    }

    #[test]
    fn errors_carry_the_byte_offset() {
        let err = read(r#"<save><blorb/></save>"#).unwrap_err();
        assert!(matches!(err, Error::Parse { position, .. } if position > 0));
    }
}
