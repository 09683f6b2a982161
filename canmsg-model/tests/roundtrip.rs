//! Parse/serialize round-trip over a realistic message file

use canmsg_model::{CanFile, CrossRefIndex, Endianness};

const BIDIR_FILE: &str = r#"[
    {
        "id": "0x101",
        "desc": "Bidirectional state report",
        "key": "calypso",
        "sim_freq": 10,
        "points": [
            {
                "size": 32,
                "signed": true,
                "endianness": "little",
                "format": "divide10000",
                "default": 18.443,
                "sim": {"min": 1, "max": 100, "inc_min": 1, "inc_max": 2}
            },
            {
                "size": 16,
                "signed": true,
                "endianness": "little",
                "format": "divide100",
                "default": -21.8
            },
            {
                "size": 8,
                "default": 19,
                "sim": {"options": [[0, 1], [1, 3]], "round": true}
            }
        ],
        "fields": [
            {"name": "Calypso/Bidir/State/{1}/{2}", "unit": "Z", "values": []},
            {"name": "Calypso/Bidir/Mode", "unit": "", "values": [3]}
        ]
    },
    {
        "id": "0x1F000000",
        "desc": "Extended telemetry",
        "is_ext": true,
        "points": [
            {"size": 32, "ieee754_f32": true, "endianness": "big"}
        ],
        "fields": [
            {"name": "Telemetry/Pack/Voltage/{1}", "unit": "V", "values": [1]}
        ]
    }
]"#;

#[test]
fn parse_then_serialize_round_trips() {
    let parsed = CanFile::parse("bidir.json", BIDIR_FILE).unwrap();
    let serialized = parsed.serialize().unwrap();
    let reparsed = CanFile::parse("bidir.json", &serialized).unwrap();
    assert_eq!(parsed, reparsed);

    // Index-significant order survives
    assert_eq!(reparsed.content[0].points[0].size, 32);
    assert_eq!(reparsed.content[0].points[2].size, 8);
    assert_eq!(
        reparsed.content[0].fields[0].name,
        "Calypso/Bidir/State/{1}/{2}"
    );
}

#[test]
fn optional_attributes_survive_round_trip() {
    let parsed = CanFile::parse("bidir.json", BIDIR_FILE).unwrap();
    let msg = &parsed.content[0];
    assert_eq!(msg.key.as_deref(), Some("calypso"));
    assert_eq!(msg.sim_freq, Some(10.0));
    assert_eq!(msg.points[0].endianness, Some(Endianness::Little));
    assert_eq!(msg.points[0].default, Some(18.443));

    let sim = msg.points[2].sim.as_ref().unwrap();
    assert_eq!(sim.options.as_deref(), Some(&[(0.0, 1.0), (1.0, 3.0)][..]));

    // Absent options must stay absent after a round trip, not become null
    let serialized = parsed.serialize().unwrap();
    assert!(!serialized.contains("null"));
}

#[test]
fn cross_reference_index_over_parsed_file() {
    let parsed = CanFile::parse("bidir.json", BIDIR_FILE).unwrap();
    let index = CrossRefIndex::build(&parsed.content[0]);

    let state_refs = index.point_indices_for_field("Calypso/Bidir/State/{1}/{2}");
    assert_eq!(state_refs.into_iter().collect::<Vec<_>>(), vec![1, 2]);

    let mode_refs = index.point_indices_for_field("Calypso/Bidir/Mode");
    assert_eq!(mode_refs.into_iter().collect::<Vec<_>>(), vec![3]);

    assert!(index.unresolved_references().is_empty());
    assert!(index
        .fields_referencing_point(2)
        .contains("Calypso/Bidir/State/{1}/{2}"));
}

#[test]
fn extended_id_parses() {
    let parsed = CanFile::parse("bidir.json", BIDIR_FILE).unwrap();
    let ext = parsed.message("0x1F000000").unwrap();
    assert!(ext.is_extended());
    assert_eq!(canmsg_model::parse_can_id(&ext.id), Some(0x1F00_0000));
}
