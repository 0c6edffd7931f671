// tests/map_tests.rs

use tile_map_editor::{Map, MapError, TileId};

#[test]
fn set_get_in_and_out_of_bounds() {
    let mut map = Map::new(5, 5, 32).unwrap();
    assert!(map.set_tile_id(2, 2, TileId(42)));
    assert_eq!(map.get_tile_id(2, 2), TileId(42));

    assert!(!map.set_tile_id(10, 10, TileId(42)));
    assert_eq!(map.get_tile_id(10, 10), TileId(0));
}

#[test]
fn resize_expand_preserves_cells() {
    let mut map = Map::new(5, 5, 32).unwrap();
    map.set_tile_id(0, 0, TileId(99));
    map.set_tile_id(4, 4, TileId(98));

    map.resize_with(10, 10, TileId(3)).unwrap();
    assert_eq!((map.width(), map.height()), (10, 10));
    assert_eq!(map.get_tile_id(0, 0), TileId(99));
    assert_eq!(map.get_tile_id(4, 4), TileId(98));
    assert_eq!(map.get_tile_id(9, 9), TileId(3));
    assert_eq!(map.get_tile_id(5, 0), TileId(3));
}

#[test]
fn resize_shrink_discards_outside_cells() {
    let mut map = Map::new(10, 10, 32).unwrap();
    map.set_tile_id(0, 0, TileId(99));
    map.set_tile_id(9, 9, TileId(88));

    map.resize(5, 5).unwrap();
    assert_eq!((map.width(), map.height()), (5, 5));
    assert_eq!(map.get_tile_id(0, 0), TileId(99));
    assert_eq!(map.get_tile_id(9, 9), TileId(0));
    assert_eq!(map.grid().as_slice().len(), 25);
    assert!(!map.grid().as_slice().contains(&TileId(88)));

    // growing back does not resurrect discarded cells
    map.resize(10, 10).unwrap();
    assert_eq!(map.get_tile_id(9, 9), TileId(0));
}

#[test]
fn palette_queries() {
    let map = Map::new(1, 1, 32).unwrap();
    assert_eq!(map.tileset_names(), vec!["Field", "Dungeon"]);
    let field: Vec<&str> = map
        .tiles_for_set("Field")
        .iter()
        .map(|t| t.name.as_str())
        .collect();
    assert_eq!(field, vec!["Grass", "Road", "Water", "Mountain"]);
    assert!(map.tiles_for_set("Unknown").is_empty());
    assert!(map.tile_definition(TileId(5)).is_some());
    assert!(map.tile_definition(TileId(42)).is_none());
}

#[test]
fn resize_rejects_overflowing_dimensions() {
    let mut map = Map::new(4, 4, 32).unwrap();
    map.set_tile_id(3, 3, TileId(7));

    let err = map.resize(usize::MAX, 2).unwrap_err();
    assert!(matches!(err, MapError::GridTooLarge { .. }));
    assert_eq!((map.width(), map.height()), (4, 4));
    assert_eq!(map.get_tile_id(3, 3), TileId(7));
}

#[test]
fn zero_width_map_has_empty_rows() {
    let map = Map::new(0, 5, 32).unwrap();
    assert_eq!(map.height(), 5);
    assert_eq!(map.grid().rows().count(), 5);
    assert!(map.grid().rows().all(|row| row.is_empty()));
    assert_eq!(map.get_tile_id(0, 0), TileId(0));
}
