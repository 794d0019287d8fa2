//! Canonicalisation properties of the state encoder

use micromouse::{Direction, Error, StateEncoder, navigation::Position};

#[test]
fn all_heading_spellings_encode_identically() {
    let encoder = StateEncoder::new();
    let position = Position::new(3, 7);
    let readings = [1, 0, 2];

    for (full, short, direction) in [
        ("up", "u", Direction::Up),
        ("right", "r", Direction::Right),
        ("down", "d", Direction::Down),
        ("left", "l", Direction::Left),
    ] {
        let long_key = encoder.encode(position, full, &readings).unwrap();
        let short_key = encoder.encode(position, short, &readings).unwrap();
        assert_eq!(long_key, short_key, "{full} and {short} differ");
        assert_eq!(long_key.heading, direction);
    }
}

#[test]
fn distinct_headings_give_distinct_states() {
    let encoder = StateEncoder::new();
    let position = Position::new(0, 11);
    let keys: Vec<_> = ["u", "r", "d", "l"]
        .iter()
        .map(|heading| encoder.encode(position, heading, &[0, 2, 0]).unwrap())
        .collect();

    for (i, a) in keys.iter().enumerate() {
        for b in &keys[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn obstacle_flags_ignore_distance_beyond_first_cell() {
    let encoder = StateEncoder::new();
    let position = Position::new(4, 4);
    let near = encoder.encode(position, "up", &[1, 1, 0]).unwrap();
    let far = encoder.encode(position, "up", &[3, 2, 0]).unwrap();
    assert_eq!(near, far);
}

#[test]
fn unknown_heading_is_rejected() {
    let err = StateEncoder::new()
        .encode(Position::new(0, 0), "north", &[0, 0, 0])
        .unwrap_err();
    assert!(matches!(err, Error::InvalidHeading { heading } if heading == "north"));
}

#[test]
fn negative_reading_is_rejected() {
    let err = StateEncoder::new()
        .encode(Position::new(0, 0), "up", &[0, -1, 0])
        .unwrap_err();
    assert!(matches!(err, Error::InvalidSensor { .. }));
}
