use ls_lsx::{LsxReader, LsxVersion, LsxWriter, LsxWriterOptions};
use ls_resource::{
    AttributeValue, Node, NodeId, Resource, TranslatedFSString, TranslatedFSStringArgument,
    TranslatedString,
};
use pretty_assertions::assert_eq;
use tracing_test::traced_test;
use uuid::Uuid;

/// Build a resource exercising every attribute kind across several regions
/// and nesting levels.
fn sample_resource() -> Resource {
    let mut resource = Resource::new();
    resource.metadata.timestamp = 1705432217;
    resource.metadata.major_version = 4;
    resource.metadata.minor_version = 0;
    resource.metadata.revision = 9;
    resource.metadata.build_number = 331;

    let config = resource.add_region("Config", Node::new("Config"));
    let attrs = &mut resource.node_mut(config).attributes;
    attrs.insert("None".into(), AttributeValue::None);
    attrs.insert("Byte".into(), AttributeValue::Byte(250));
    attrs.insert("Short".into(), AttributeValue::Short(-300));
    attrs.insert("UShort".into(), AttributeValue::UShort(60000));
    attrs.insert("Int".into(), AttributeValue::Int(-70000));
    attrs.insert("UInt".into(), AttributeValue::UInt(4000000000));
    attrs.insert("Float".into(), AttributeValue::Float(1.5));
    attrs.insert("Double".into(), AttributeValue::Double(-0.25));
    attrs.insert("IVec2".into(), AttributeValue::IVec2([1, -2]));
    attrs.insert("IVec3".into(), AttributeValue::IVec3([3, 4, 5]));
    attrs.insert("IVec4".into(), AttributeValue::IVec4([6, 7, 8, 9]));
    attrs.insert("Vec2".into(), AttributeValue::Vec2([0.5, 1.5]));
    attrs.insert("Vec3".into(), AttributeValue::Vec3([1.0, 2.0, 3.0]));
    attrs.insert("Vec4".into(), AttributeValue::Vec4([0.0, 0.25, 0.5, 0.75]));
    attrs.insert("Mat2".into(), AttributeValue::Mat2([1.0, 0.0, 0.0, 1.0]));
    attrs.insert(
        "Mat3".into(),
        AttributeValue::Mat3([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]),
    );
    attrs.insert(
        "Mat3x4".into(),
        AttributeValue::Mat3x4([
            1.0, 0.0, 0.0, 0.5, 0.0, 1.0, 0.0, 0.5, 0.0, 0.0, 1.0, 0.5,
        ]),
    );
    attrs.insert(
        "Mat4x3".into(),
        AttributeValue::Mat4x3([
            1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.5, 0.5, 0.5,
        ]),
    );
    attrs.insert(
        "Mat4".into(),
        AttributeValue::Mat4([
            1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0,
        ]),
    );
    attrs.insert("Bool".into(), AttributeValue::Bool(true));
    attrs.insert("String".into(), AttributeValue::String("plain text".into()));
    attrs.insert("Path".into(), AttributeValue::Path("Public/Game/Chest.lsx".into()));
    attrs.insert(
        "FixedString".into(),
        AttributeValue::FixedString("CHEST_01".into()),
    );
    attrs.insert("LSString".into(), AttributeValue::LSString("long text".into()));
    attrs.insert("ULongLong".into(), AttributeValue::ULongLong(u64::MAX));
    attrs.insert(
        "ScratchBuffer".into(),
        AttributeValue::ScratchBuffer(vec![0xDE, 0xAD, 0xBE, 0xEF]),
    );
    attrs.insert("Long".into(), AttributeValue::Long(-1234567890123));
    attrs.insert("Int8".into(), AttributeValue::Int8(-100));
    attrs.insert(
        "TranslatedString".into(),
        AttributeValue::TranslatedString(TranslatedString::new("h09d81abc", "Chest")),
    );
    attrs.insert("WString".into(), AttributeValue::WString("wide".into()));
    attrs.insert("LSWString".into(), AttributeValue::LSWString("long wide".into()));
    attrs.insert(
        "Uuid".into(),
        AttributeValue::Uuid(Uuid::parse_str("123e4567-e89b-12d3-a456-426614174000").unwrap()),
    );
    attrs.insert("Int64".into(), AttributeValue::Int64(i64::MIN));
    attrs.insert(
        "TranslatedFSString".into(),
        AttributeValue::TranslatedFSString(TranslatedFSString {
            handle: "ha".into(),
            value: "Greetings, [1]".into(),
            arguments: vec![TranslatedFSStringArgument {
                key: "[1]".into(),
                value: "traveller".into(),
                string: TranslatedFSString {
                    handle: "hb".into(),
                    value: "[2] the brave".into(),
                    arguments: vec![TranslatedFSStringArgument {
                        key: "[2]".into(),
                        value: "Astarion".into(),
                        string: TranslatedFSString::new("hc", "Astarion"),
                    }],
                },
            }],
        }),
    );

    let templates = resource.add_region("Templates", Node::new("Templates"));
    let objects = resource.append_child(templates, Node::new("GameObjects"));
    resource
        .node_mut(objects)
        .attributes
        .insert("Name".into(), AttributeValue::FixedString("Chest".into()));
    let transform = resource.append_child(objects, Node::new("Transform"));
    resource
        .node_mut(transform)
        .attributes
        .insert("Position".into(), AttributeValue::Vec3([1.0, 2.0, 3.0]));
    resource.append_child(objects, Node::new("Transform"));
    resource.append_child(templates, Node::new("GameObjects"));

    resource
}

fn write(resource: &Resource, version: LsxVersion, pretty: bool) -> String {
    let mut writer = LsxWriter::new(
        Vec::new(),
        LsxWriterOptions::builder()
            .version(version)
            .pretty(pretty)
            .build(),
    );
    writer.write(resource).unwrap();
    String::from_utf8(writer.into_inner()).unwrap()
}

fn read(xml: &str) -> Resource {
    LsxReader::new(xml.as_bytes()).read().unwrap()
}

/// Compare two resources structurally.
///
/// The creation timestamp is not part of the text format, so it is excluded.
fn assert_equivalent(left: &Resource, right: &Resource) {
    assert_eq!(left.metadata.major_version, right.metadata.major_version);
    assert_eq!(left.metadata.minor_version, right.metadata.minor_version);
    assert_eq!(left.metadata.revision, right.metadata.revision);
    assert_eq!(left.metadata.build_number, right.metadata.build_number);

    let left_names: Vec<&String> = left.regions.keys().collect();
    let right_names: Vec<&String> = right.regions.keys().collect();
    assert_eq!(left_names, right_names);

    for (name, region) in &left.regions {
        assert_subtree_eq(left, region.root, right, right.regions[name].root);
    }
}

fn assert_subtree_eq(left: &Resource, left_id: NodeId, right: &Resource, right_id: NodeId) {
    let l = left.node(left_id);
    let r = right.node(right_id);
    assert_eq!(l.name, r.name);
    assert_eq!(l.attributes, r.attributes);

    let left_groups: Vec<&String> = l.children().keys().collect();
    let right_groups: Vec<&String> = r.children().keys().collect();
    assert_eq!(left_groups, right_groups, "child groups of {}", l.name);

    for (name, left_group) in l.children() {
        let right_group = &r.children()[name];
        assert_eq!(left_group.len(), right_group.len(), "group {name} size");
        for (&lc, &rc) in left_group.iter().zip(right_group) {
            assert_subtree_eq(left, lc, right, rc);
        }
    }
}

#[traced_test]
#[test]
fn v4_round_trip_preserves_every_attribute_kind() {
    let original = sample_resource();
    let xml = write(&original, LsxVersion::V4, false);
    let reread = read(&xml);

    assert_equivalent(&original, &reread);
}

#[traced_test]
#[test]
fn v3_round_trip_preserves_every_attribute_kind() {
    let mut original = sample_resource();
    original.metadata.major_version = 3;
    let xml = write(&original, LsxVersion::V3, false);
    let reread = read(&xml);

    assert_equivalent(&original, &reread);
}

#[traced_test]
#[test]
fn pretty_output_reads_back_identically() {
    let original = sample_resource();
    let compact = write(&original, LsxVersion::V4, false);
    let pretty = write(&original, LsxVersion::V4, true);
    assert_ne!(compact, pretty);

    assert_equivalent(&read(&compact), &read(&pretty));
}

#[traced_test]
#[test]
fn rewriting_a_parsed_document_is_stable() {
    let original = sample_resource();
    let first = write(&original, LsxVersion::V4, false);
    let second = write(&read(&first), LsxVersion::V4, false);

    assert_eq!(first, second);
}
