use std::error::Error;
use std::path::Path;

use heat_core::{ConfidenceMap, HeatConfig};
use heat_edge::TableOracle;
use image::GrayImage;
use serde::{Deserialize, Serialize};

/// One scored segment of an edge table file
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentRecord {
    pub a: [usize; 2],
    pub b: [usize; 2],
    pub p: f32,
}

/// Corner confidences from an 8-bit heatmap, `255` mapping to `1.0`
pub fn confidence_map_from_luma(img: &GrayImage) -> ConfidenceMap {
    let (w, h) = img.dimensions();
    let data = img.as_raw().iter().map(|&v| v as f32 / 255.0).collect();
    ConfidenceMap::new(w as usize, h as usize, data)
}

pub fn load_heatmap<P: AsRef<Path>>(path: P) -> Result<ConfidenceMap, Box<dyn Error>> {
    let img = image::open(path)?.to_luma8();
    Ok(confidence_map_from_luma(&img))
}

pub fn table_from_records(records: &[SegmentRecord], default_probability: f32) -> TableOracle {
    TableOracle::from_segments(
        records.iter().map(|r| ((r.a[0], r.a[1]), (r.b[0], r.b[1]), r.p)),
        default_probability,
    )
}

/// Reads a JSON array of `{"a": [x, y], "b": [x, y], "p": prob}`
pub fn load_edge_table<P: AsRef<Path>>(path: P, default_probability: f32) -> Result<TableOracle, Box<dyn Error>> {
    let text = std::fs::read_to_string(path)?;
    let records: Vec<SegmentRecord> = serde_json::from_str(&text)?;
    Ok(table_from_records(&records, default_probability))
}

/// TOML or JSON by file extension
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<HeatConfig, Box<dyn Error>> {
    let path = path.as_ref();
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => HeatConfig::load_json(path),
        _ => HeatConfig::load_toml(path),
    }
}

pub fn save_config<P: AsRef<Path>>(cfg: &HeatConfig, path: P) -> Result<(), Box<dyn Error>> {
    let path = path.as_ref();
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => cfg.save_json(path),
        _ => cfg.save_toml(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_luma_scaling() {
        let mut img = GrayImage::new(3, 2);
        img.put_pixel(2, 1, Luma([255]));
        img.put_pixel(0, 0, Luma([51]));
        let map = confidence_map_from_luma(&img);
        assert_eq!((map.width, map.height), (3, 2));
        assert_eq!(map.get(2, 1), 1.0);
        assert!((map.get(0, 0) - 0.2).abs() < 1e-6);
        assert_eq!(map.get(1, 1), 0.0);
    }

    #[test]
    fn test_segment_records_parse() {
        let json = r#"[{"a": [0, 0], "b": [10, 0], "p": 0.97}, {"a": [10, 0], "b": [10, 10], "p": 0.2}]"#;
        let records: Vec<SegmentRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], SegmentRecord { a: [0, 0], b: [10, 0], p: 0.97 });

        let table = table_from_records(&records, 0.0);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_config_round_trip_by_extension() {
        let dir = std::env::temp_dir();
        let cfg = HeatConfig::floorplan_preset();
        for name in ["heat_io_test.toml", "heat_io_test.json"] {
            let path = dir.join(name);
            save_config(&cfg, &path).unwrap();
            let loaded = load_config(&path).unwrap();
            assert_eq!(loaded, cfg);
            let _ = std::fs::remove_file(&path);
        }
    }
}
