use super::position::*;

#[test]
fn test_offsets_map_to_lines() {
    let source = "type A = 1\ntype B = 2\ntype C = 3";
    let map = LineMap::build(source);

    assert_eq!(map.line_count(), 3);
    assert_eq!(map.offset_to_position(0, source), Position::new(0, 0));
    assert_eq!(map.offset_to_position(9, source), Position::new(0, 9));
    // The newline itself belongs to the line it ends.
    assert_eq!(map.offset_to_position(10, source), Position::new(0, 10));
    assert_eq!(map.offset_to_position(11, source), Position::new(1, 0));
    assert_eq!(map.offset_to_position(22, source), Position::new(2, 0));
}

#[test]
fn test_crlf_and_lone_cr() {
    let source = "a\r\nb\rc";
    let map = LineMap::build(source);

    assert_eq!(map.line_count(), 3);
    assert_eq!(map.offset_to_position(3, source), Position::new(1, 0));
    assert_eq!(map.offset_to_position(5, source), Position::new(2, 0));
}

#[test]
fn test_offset_past_end_clamps() {
    let source = "ab\ncd";
    let map = LineMap::build(source);
    assert_eq!(map.offset_to_position(100, source), Position::new(1, 2));
}

#[test]
fn test_columns_count_utf16_units() {
    let source = "A \u{1F680} B";
    let map = LineMap::build(source);

    assert_eq!(map.offset_to_position(2, source).character, 2);
    assert_eq!(map.offset_to_position(7, source).character, 5);
}
