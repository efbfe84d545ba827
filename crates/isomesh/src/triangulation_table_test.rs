use super::*;
use crate::constants::CORNER_OFFSETS;

fn row_edges(config: usize) -> Vec<u8> {
  TRIANGULATION[config]
    .iter()
    .take_while(|&&e| e != END)
    .map(|&e| e as u8)
    .collect()
}

#[test]
fn test_homogeneous_configs_are_empty() {
  assert_eq!(triangle_count(0), 0, "All above should emit nothing");
  assert_eq!(triangle_count(255), 0, "All below should emit nothing");
  assert_eq!(EDGE_TABLE[0], 0);
  assert_eq!(EDGE_TABLE[255], 0);
}

#[test]
fn test_mixed_configs_emit_triangles() {
  for config in 1..255u8 {
    assert!(
      triangle_count(config) > 0,
      "Config {} has crossings but no triangles",
      config
    );
  }
}

#[test]
fn test_rows_are_well_formed() {
  for (config, row) in TRIANGULATION.iter().enumerate() {
    let used = row.iter().take_while(|&&e| e != END).count();
    assert_eq!(used % 3, 0, "Config {} has a partial triangle", config);
    assert!(
      row[used..].iter().all(|&e| e == END),
      "Config {} has entries after the terminator",
      config
    );
    assert!(row[..used].iter().all(|&e| (0..12).contains(&e)));
  }
}

#[test]
fn test_max_triangles_per_voxel() {
  assert_eq!(max_triangle_count(), 5);
  let at_max = (0..=255u8).filter(|&c| triangle_count(c) == 5).count();
  assert!(at_max > 0);
}

#[test]
fn test_rows_use_exactly_the_crossing_edges() {
  for config in 0..256 {
    let mut used = 0u16;
    for edge in row_edges(config) {
      used |= 1 << edge;
    }
    assert_eq!(
      used, EDGE_TABLE[config],
      "Config {} edges {:012b} differ from crossings {:012b}",
      config, used, EDGE_TABLE[config]
    );
  }
}

#[test]
fn test_edge_table_single_corner() {
  for corner in 0..8 {
    let mask = 1usize << corner;
    assert_eq!(EDGE_TABLE[mask].count_ones(), 3);
    assert_eq!(triangle_count(mask as u8), 1);
  }
}

#[test]
fn test_complementary_configs_share_crossings() {
  for i in 0..128 {
    assert_eq!(EDGE_TABLE[i], EDGE_TABLE[255 - i]);
  }
}

#[test]
fn test_edges_join_adjacent_corners() {
  for edge in 0..12 {
    let a = CORNER_OFFSETS[CORNER_INDEX_A_FROM_EDGE[edge] as usize];
    let b = CORNER_OFFSETS[CORNER_INDEX_B_FROM_EDGE[edge] as usize];
    let manhattan: usize = (0..3).map(|i| a[i].abs_diff(b[i])).sum();
    assert_eq!(manhattan, 1, "Edge {} is not a cube edge", edge);
  }
}

#[test]
fn test_single_corner_row() {
  assert_eq!(row_edges(1), vec![0, 8, 3]);
  assert_eq!(row_edges(254), vec![0, 3, 8]);
}
