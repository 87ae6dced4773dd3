use std::fs;
use std::path::Path;
use csv::Writer;

use crate::errors::Result;
use crate::pipeline::{contour_level_summary, PipelineOutput};
use crate::polydata::PolyData;

fn create_writer(path: &Path) -> Result<Writer<fs::File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(Writer::from_path(path)?)
}

/// Write every contour segment as one CSV row
pub fn write_contour_csv<P: AsRef<Path>>(contours: &PolyData, path: P) -> Result<()> {
    let mut writer = create_writer(path.as_ref())?;

    writer.write_record([
        "Line_Index",
        "Contour_Value",
        "X0",
        "Y0",
        "X1",
        "Y1",
    ])?;

    for index in 0..contours.number_of_lines() {
        let (start, end) = contours.line_endpoints(index);
        let value = contours
            .line_scalars(index)
            .map(|(s, _)| format!("{:.6}", s))
            .unwrap_or_default();
        writer.write_record(&[
            index.to_string(),
            value,
            format!("{:.6}", start[0]),
            format!("{:.6}", start[1]),
            format!("{:.6}", end[0]),
            format!("{:.6}", end[1]),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write per-level point and line counts
pub fn write_summary_csv<P: AsRef<Path>>(output: &PipelineOutput, path: P) -> Result<()> {
    let mut writer = create_writer(path.as_ref())?;

    writer.write_record(["Image", "Contour_Value", "Points", "Lines"])?;

    for level in contour_level_summary(output) {
        writer.write_record(&[
            output.filename.clone(),
            format!("{:.6}", level.value),
            level.points.to_string(),
            level.lines.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contour_csv_has_row_per_line() {
        let data = PolyData {
            points: vec![[0.0, 0.0, 0.0], [1.5, 2.0, 0.0], [3.0, 1.0, 0.0]],
            lines: vec![[0, 1], [1, 2]],
            scalars: Some(vec![7.0; 3]),
        };
        let path = std::env::temp_dir()
            .join(format!("isocontour_{}_lines", std::process::id()))
            .join("lines.csv");

        write_contour_csv(&data, &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let rows: Vec<&str> = text.lines().collect();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], "Line_Index,Contour_Value,X0,Y0,X1,Y1");
        assert_eq!(rows[1], "0,7.000000,0.000000,0.000000,1.500000,2.000000");

        fs::remove_dir_all(path.parent().unwrap()).ok();
    }
}
